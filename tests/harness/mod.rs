//! Test harness utilities for sigex integration tests.
//!
//! Provides an isolated test environment and shared assertion helpers.

mod skip;

use std::path::PathBuf;
use std::process::Output;

use assert_cmd::Command;
use tempfile::TempDir;

/// Test environment with an isolated temp directory for env files.
pub struct TestEnv {
    /// Temporary directory for the test's env files
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Create a sigex command rooted in the test directory.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("sigex").expect("failed to find sigex binary");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Write an env file into the test directory and return its path.
    pub fn write_env(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("failed to write env file");
        path
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "expected success, got {:?}\nstderr: {}",
        output.status,
        stderr(output)
    );
}

pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "expected failure, got success\nstdout: {}",
        stdout(output)
    );
}
