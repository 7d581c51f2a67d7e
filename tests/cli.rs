use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn batchpile(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_batchpile"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child.stdin.take().unwrap().write_all(stdin).unwrap();
    child.wait_with_output().unwrap()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn write_config(name: &str, contents: &str) -> PathBuf {
    let file = format!("batchpile-{}-{}.json", std::process::id(), name);
    let path = std::env::temp_dir().join(file);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_flush_at_and_shutdown_flush() {
    let output = batchpile(&["-c", "2", "--flush-at", "3"], b"a\nb\nc\nd\n");
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec![
            r#"{"flush":1,"batches":[["a","b"],["c"]]}"#,
            r#"{"flush":2,"batches":[["d"]]}"#,
        ]
    );
}

#[test]
fn test_config_file() {
    let path = write_config("valid", r#"{"capacity": 2}"#);
    let output = batchpile(&["--config", path.to_str().unwrap()], b"a\nb\nc\n");
    fs::remove_file(&path).unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec![r#"{"flush":1,"batches":[["a","b"],["c"]]}"#]
    );
}

#[test]
fn test_config_file_with_unknown_key() {
    let path = write_config("typo", r#"{"capacty": 2}"#);
    let output = batchpile(&["--config", path.to_str().unwrap()], b"a\nb\nc\n");
    fs::remove_file(&path).unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid config"));
}

#[test]
fn test_reject_zero_flush_at() {
    let output = batchpile(&["--flush-at", "0"], b"a\n");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--flush-at must be at least 1"));
}

#[test]
fn test_reject_zero_capacity() {
    let output = batchpile(&["-c", "0"], b"a\n");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid argument"));
}

#[test]
fn test_capacity_conflicts_with_config() {
    let output = batchpile(&["-c", "2", "--config", "c.json"], b"");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_read_error_keeps_held_items() {
    let output = batchpile(&["-c", "2"], b"a\nb\n\xff\nd\n");
    assert!(!output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec![r#"{"flush":1,"batches":[["a","b"]]}"#]
    );
}
