//! Common utilities for CLI E2E tests.

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// A throwaway home directory so tests never touch the real config.
pub struct Sandbox {
    home: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().expect("Failed to create temp home"),
        }
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.home.path().join(".config/wodtimer/config.toml")
    }

    /// Invoke a CLI command and return (stdout, stderr, exit code).
    pub fn run_cli(&self, args: &[&str]) -> (String, String, i32) {
        self.run_cli_with_input(args, None)
    }

    /// Invoke a CLI command, feeding `input` on stdin (closed when `None`).
    pub fn run_cli_with_input(&self, args: &[&str], input: Option<&str>) -> (String, String, i32) {
        let mut child = Command::new(env!("CARGO_BIN_EXE_wodtimer-cli"))
            .args(args)
            .env("HOME", self.home.path())
            .env_remove("WODTIMER_ENV")
            .env_remove("RUST_LOG")
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to execute CLI command");

        if let Some(input) = input {
            let mut stdin = child.stdin.take().expect("stdin piped");
            stdin
                .write_all(input.as_bytes())
                .expect("Failed to write stdin");
        }

        let output = child.wait_with_output().expect("Failed to wait for CLI");
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    /// Invoke a CLI command and expect success.
    pub fn run_cli_success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run_cli(args);
        if code != 0 && !stderr.is_empty() {
            eprintln!("CLI error output: {}", stderr);
        }
        assert_eq!(code, 0, "CLI command failed with code {}: {:?}", code, args);
        stdout
    }

    /// Invoke a CLI command and expect failure.
    pub fn run_cli_failure(&self, args: &[&str]) -> String {
        let (_, stderr, code) = self.run_cli(args);
        assert_ne!(code, 0, "CLI command unexpectedly succeeded: {:?}", args);
        stderr
    }
}

/// Parse every stdout line that is a JSON object.
pub fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}
