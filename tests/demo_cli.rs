use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn write_demo(dir: &Path, config: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    fs::write(dir.join("a.txt"), "This text is originally from \"a.txt\"")?;
    let config_path = dir.join("config.yml");
    fs::write(&config_path, config)?;
    Ok(config_path)
}

#[test]
fn test_debug_flag_logs_the_parse() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir()?;
    let config_path = write_demo(temp_dir.path(), "foo: a.txt\nbar: this\n")?;

    let mut cmd = Command::cargo_bin("yaap-demo")?;
    cmd.arg("--config").arg(&config_path).arg("--debug");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Resolving relative paths against"))
        .stdout(predicate::str::contains("Resolved 'foo' to"))
        .stdout(predicate::str::contains("This text is originally from"));
    Ok(())
}

#[test]
fn test_debug_from_config_file_logs_the_parse() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir()?;
    let config_path = write_demo(temp_dir.path(), "foo: a.txt\ndebug: true\n")?;

    let mut cmd = Command::cargo_bin("yaap-demo")?;
    cmd.arg("--config").arg(&config_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Resolving relative paths against"));
    Ok(())
}

#[test]
fn test_without_debug_the_parse_is_quiet() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir()?;
    let config_path = write_demo(temp_dir.path(), "foo: a.txt\n")?;

    let mut cmd = Command::cargo_bin("yaap-demo")?;
    cmd.arg("--config").arg(&config_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Contents of foo:"))
        .stdout(predicate::str::contains("Resolving relative paths").not());
    Ok(())
}
