//! Binary-level tests: piped stdin in, conversation on stdout.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const ENV_KEYS: [&str; 6] = [
    "CHATBUDDY_NAME",
    "CHATBUDDY_PROFILE",
    "CHATBUDDY_SEED",
    "CHATBUDDY_SESSION_LOG",
    "CHATBUDDY_LOG_FORMAT",
    "RUST_LOG",
];

fn chatbuddy() -> Command {
    let mut cmd = Command::cargo_bin("chatbuddy").expect("Failed to find chatbuddy binary");
    for key in ENV_KEYS {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn test_greeting_then_quit() {
    chatbuddy()
        .write_stdin("hello\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "GrokBot: Hi! I'm GrokBot, your chat buddy. What's up? (Type 'quit' to exit)\n",
        ))
        .stdout(predicate::str::contains("Input ended?").not())
        .stdout(predicate::str::contains("You: ").not());
}

#[test]
fn test_end_of_input_exits_cleanly() {
    chatbuddy()
        .write_stdin("what is this?\n")
        .assert()
        .success()
        .stdout(predicate::str::ends_with(
            "\n\nGrokBot: Input ended? Catch you later!\n",
        ));
}

#[test]
fn test_empty_line_prompt() {
    chatbuddy()
        .write_stdin("\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "GrokBot: Don't be shy, say something!\n",
        ));
}

#[test]
fn test_custom_name_and_profile() {
    let dir = TempDir::new().unwrap();
    let profile = dir.path().join("profile.json");
    fs::write(&profile, r#"{ "replies": { "greeting": ["Ahoy!"] } }"#).unwrap();

    chatbuddy()
        .arg("--name")
        .arg("Rusty")
        .arg("--profile")
        .arg(&profile)
        .write_stdin("hey\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rusty: Ahoy!\n"));
}

#[test]
fn test_seed_makes_replies_reproducible() {
    let run = || {
        chatbuddy()
            .args(["--seed", "17"])
            .write_stdin("hi\nwhy?\ni love pizza\nbye\n")
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_missing_profile_fails() {
    let dir = TempDir::new().unwrap();

    chatbuddy()
        .arg("--profile")
        .arg(dir.path().join("absent.json"))
        .write_stdin("hello\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load profile"));
}

#[test]
fn test_session_log_written() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("sessions.log");

    chatbuddy()
        .arg("--session-log")
        .arg(&log)
        .write_stdin("hello\nquit\n")
        .assert()
        .success();

    let contents = fs::read_to_string(&log).unwrap();
    assert!(contents.contains("\"end_reason\":\"quit\""));
    assert!(contents.contains("\"turns\":1"));
}

#[cfg(unix)]
#[test]
fn test_interrupt_on_idle_piped_input() {
    use std::io::{BufRead, BufReader, Read};
    use std::process::{Command as StdCommand, Stdio};

    let mut cmd = StdCommand::new(assert_cmd::cargo::cargo_bin("chatbuddy"));
    for key in ENV_KEYS {
        cmd.env_remove(key);
    }
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to start chatbuddy");

    // The banner is printed after the interrupt handler is installed
    let mut stdout = BufReader::new(child.stdout.take().unwrap());
    let mut banner = String::new();
    stdout.read_line(&mut banner).unwrap();
    assert!(banner.starts_with("GrokBot: Hi! I'm GrokBot"));

    let kill = StdCommand::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(kill.success());

    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();
    let status = child.wait().unwrap();

    assert!(status.success(), "exit status {:?}", status);
    assert_eq!(rest, "\nGrokBot: Interrupted? No worries, bye!\n");
}
