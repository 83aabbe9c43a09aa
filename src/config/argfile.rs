//! `@file` expansion: a token naming an argument file is replaced by the
//! file's lines, one argument per line.

use crate::error::{Result, YaapError};
use std::ffi::OsString;
use std::path::PathBuf;

/// Expand argument files in `args`. The first token (binary name) is kept as is.
pub fn expand(args: Vec<OsString>, prefix: char) -> Result<Vec<OsString>> {
    let mut tokens = args.into_iter();
    let mut expanded = Vec::new();
    expanded.extend(tokens.next());
    let mut active = Vec::new();
    for token in tokens {
        expand_token(token, prefix, &mut active, &mut expanded)?;
    }
    Ok(expanded)
}

fn expand_token(
    token: OsString,
    prefix: char,
    active: &mut Vec<PathBuf>,
    out: &mut Vec<OsString>,
) -> Result<()> {
    let path = match token.to_str().and_then(|s| s.strip_prefix(prefix)) {
        Some(path) => PathBuf::from(path),
        None => {
            out.push(token);
            return Ok(());
        }
    };

    if active.contains(&path) {
        return Err(YaapError::ArgumentFile {
            path,
            source: std::io::Error::other("argument file includes itself"),
        });
    }
    let content = std::fs::read_to_string(&path).map_err(|source| YaapError::ArgumentFile {
        path: path.clone(),
        source,
    })?;
    tracing::debug!("Reading arguments from {}", path.display());

    active.push(path);
    for line in content.lines().filter(|line| !line.trim().is_empty()) {
        expand_token(OsString::from(line), prefix, active, out)?;
    }
    active.pop();
    Ok(())
}
