//! Integration tests running the `flagdemo` binary.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn flagdemo_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_flagdemo"))
}

fn flagdemo(args: &[&str]) -> Output {
    Command::new(flagdemo_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run flagdemo")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---- dispatch ----

#[test]
fn test_no_command_prints_usage_and_fails() {
    let output = flagdemo(&[]);

    assert_eq!(output.status.code(), Some(1));
    let usage = stdout(&output);
    assert!(usage.starts_with("flagdemo by command-flags contributors\n"));
    assert!(usage.contains("Available commands:\n"));
    assert!(usage.contains("flagdemo greet --name=<string> [--shout]\n"));
    assert!(usage.contains("flagdemo sum --values=<int[,int...]>\n"));
}

#[test]
fn test_unknown_command() {
    let output = flagdemo(&["launch"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("ERROR: Command launch is not available!"));
    assert!(stdout(&output).contains("Available commands:"));
}

#[test]
fn test_greet() {
    let output = flagdemo(&["greet", "--name", "Ferris"]);
    assert!(output.status.success(), "greet failed: {}", stderr(&output));
    assert_eq!(stdout(&output), "Hello, Ferris!\n");

    let output = flagdemo(&["greet", "--name=Ferris", "--shout"]);
    assert_eq!(stdout(&output), "HELLO, FERRIS!\n");
}

#[test]
fn test_greet_missing_name() {
    let output = flagdemo(&["greet", "--shout"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("ERROR: Flag --name is missing!"));
}

// ---- validation ----

#[test]
fn test_sum_validates_integers() {
    let output = flagdemo(&["sum", "--values=10,20,12"]);
    assert!(output.status.success(), "sum failed: {}", stderr(&output));
    assert_eq!(stdout(&output), "42\n");

    let output = flagdemo(&["sum", "--values=10;20"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Flag --values is not a valid integer!"));
}

#[test]
fn test_stat_checks_existence() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let file = dir.path().join("payload.bin");
    fs::write(&file, [0u8; 5]).expect("failed to write payload");
    let file = file.to_str().expect("temp path is utf-8");

    let output = flagdemo(&["stat", "--file", file]);
    assert!(output.status.success(), "stat failed: {}", stderr(&output));
    assert_eq!(stdout(&output), format!("{file}: 5 bytes\n"));

    let missing = dir.path().join("missing.bin");
    let missing = missing.to_str().expect("temp path is utf-8");
    let output = flagdemo(&["stat", &format!("--file={missing}")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(&format!("File {missing} from --file does not exist!")));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_argument_is_a_diagnostic() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let output = Command::new(flagdemo_bin())
        .arg("stat")
        .arg(OsStr::from_bytes(b"--file=bad\xff.bin"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run flagdemo");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("does not exist"));
}

#[test]
fn test_inspect_json() {
    let output = flagdemo(&["inspect", "--tags=v1.2;rc_1", "--ratio=0.5", "--json"]);
    assert!(output.status.success(), "inspect failed: {}", stderr(&output));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("inspect --json prints JSON");
    assert_eq!(json["tags"], "v1.2;rc_1");
    assert_eq!(json["ratio"], "0.5");
    assert_eq!(json["json"], "true");
}

#[test]
fn test_inspect_rejects_bad_values() {
    let output = flagdemo(&["inspect", "--ratio=2"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Flag --ratio is not a valid float!"));

    let output = flagdemo(&["inspect", "--tags=v1,v2"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Flag --tags is not a valid alphanumeric value!"));
}

#[test]
fn test_inspect_lists_tags() {
    let output = flagdemo(&["inspect", "--tags=a;b"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("tags=a;b\n"));
    assert!(text.contains("json=false\n"));
    assert!(text.contains("tag: a\ntag: b\n"));
}
