//! Rewrites relative path arguments into absolute paths.
//!
//! Relative values are anchored at a base directory: the directory of the
//! config file when one was given (and the parser anchors on it), otherwise
//! the working directory. Nothing here checks that a path exists.

use crate::error::{Result, YaapError};
use crate::parsed::{ParsedArgs, Value};
use std::path::{Component, Path, PathBuf};

/// Resolve one path against `base_dir`. Absolute paths are returned as is.
pub fn resolve_path(base_dir: &Path, value: &Path) -> PathBuf {
    if value.is_absolute() {
        value.to_path_buf()
    } else {
        base_dir.join(value)
    }
}

/// Choose the directory relative path arguments are resolved against.
///
/// An absolute config path never reads the working directory.
pub fn base_directory(config: Option<&Path>, config_path_base: bool) -> Result<PathBuf> {
    let base = match config {
        Some(config) if config_path_base && !config.as_os_str().is_empty() => {
            let config = if config.is_absolute() {
                normalize(config)
            } else {
                normalize(&current_dir()?.join(config))
            };
            match config.parent() {
                Some(parent) => parent.to_path_buf(),
                None => config,
            }
        }
        _ => current_dir()?,
    };
    tracing::debug!("Resolving relative paths against {}", base.display());
    Ok(base)
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(YaapError::WorkingDirectory)
}

/// Lexical normal form of an absolute path: `.` dropped and `..` folded.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Rewrite every listed path destination of `args` in place.
pub(crate) fn resolve_paths<'a>(
    args: &mut ParsedArgs,
    dests: impl IntoIterator<Item = &'a str>,
    base_dir: &Path,
) {
    for dest in dests {
        if let Some(value) = args.get_mut(dest) {
            resolve_value(value, base_dir);
            tracing::debug!("Resolved '{}' to {}", dest, value);
        }
    }
}

fn resolve_value(value: &mut Value, base_dir: &Path) {
    match value {
        Value::Path(path) if path.as_os_str().is_empty() => {}
        Value::Path(path) => *path = resolve_path(base_dir, path),
        Value::List(items) => {
            for item in items.iter_mut() {
                resolve_value(item, base_dir);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_is_unchanged() {
        let base = Path::new("/base");
        assert_eq!(
            resolve_path(base, Path::new("/etc/hosts")),
            PathBuf::from("/etc/hosts")
        );
    }

    #[test]
    fn test_relative_path_joins_base() {
        let base = Path::new("/tmp/example");
        assert_eq!(
            resolve_path(base, Path::new("a.txt")),
            PathBuf::from("/tmp/example/a.txt")
        );
        assert_eq!(
            resolve_path(base, Path::new("../b/c.txt")),
            PathBuf::from("/tmp/example/../b/c.txt")
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let base = Path::new("/tmp/example");
        for value in ["a.txt", "/abs/x", "nested/dir/", "."] {
            let once = resolve_path(base, Path::new(value));
            assert_eq!(resolve_path(base, &once), once);
        }
    }

    #[test]
    fn test_normalize_folds_dots() {
        assert_eq!(
            normalize(Path::new("/home/user/./conf/../config.yml")),
            PathBuf::from("/home/user/config.yml")
        );
        assert_eq!(
            normalize(Path::new("/tmp/example/config.yml")),
            PathBuf::from("/tmp/example/config.yml")
        );
    }

    #[test]
    fn test_relative_config_joins_working_directory() {
        let base = base_directory(Some(Path::new("./conf/../cfg/config.yml")), true).unwrap();
        assert_eq!(base, std::env::current_dir().unwrap().join("cfg"));
    }

    #[test]
    fn test_base_directory_uses_config_parent() {
        let base = base_directory(Some(Path::new("/tmp/example/config.yml")), true).unwrap();
        assert_eq!(base, PathBuf::from("/tmp/example"));
    }

    #[test]
    fn test_base_directory_ignores_config_when_disabled() {
        let base = base_directory(Some(Path::new("/tmp/example/config.yml")), false).unwrap();
        assert_eq!(base, std::env::current_dir().unwrap());
        let base = base_directory(None, true).unwrap();
        assert_eq!(base, std::env::current_dir().unwrap());
    }

    #[test]
    fn test_resolve_paths_touches_only_listed_destinations() {
        let mut args = ParsedArgs::new();
        args.insert("foo", Value::Path(PathBuf::from("a.txt")));
        args.insert(
            "inputs",
            Value::List(vec![
                Value::Path(PathBuf::from("x")),
                Value::Path(PathBuf::from("/y")),
            ]),
        );
        args.insert("name", Value::Text("a.txt".to_string()));
        args.insert("empty", Value::Path(PathBuf::new()));

        resolve_paths(
            &mut args,
            ["foo", "inputs", "empty", "missing"],
            Path::new("/base"),
        );

        assert_eq!(args.get_path("foo"), Some(Path::new("/base/a.txt")));
        assert_eq!(
            args.get_paths("inputs"),
            Some(vec![Path::new("/base/x"), Path::new("/y")])
        );
        assert_eq!(args.get_text("name"), Some("a.txt"));
        assert_eq!(args.get_path("empty"), Some(Path::new("")));
        assert!(!args.contains("missing"));
    }
}
