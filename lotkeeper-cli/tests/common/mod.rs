//! Common test utilities for CLI integration tests.
//!
//! Every test gets its own data directory and working directory, so neither
//! the operator's `~/.lotkeeper` nor a stray `lotkeeper.yaml` is touched.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated data and working directories for one test.
pub struct TestEnv {
    temp_dir: TempDir,
    /// Where the database lives.
    pub data_dir: PathBuf,
    /// Working directory the binary is started in.
    pub work_dir: PathBuf,
}

impl TestEnv {
    /// Creates the directories; the database itself is created on first use.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("lotkeeper-data");
        let work_dir = temp_dir.path().join("site");
        std::fs::create_dir_all(&work_dir).expect("Failed to create work dir");

        Self {
            temp_dir,
            data_dir,
            work_dir,
        }
    }

    /// A facility with one slot of each category.
    pub fn with_standard_lot() -> Self {
        let env = Self::new();
        for (number, category) in [
            ("R-01", "regular"),
            ("R-02", "regular"),
            ("C-01", "compact"),
            ("EV-01", "electric_charging"),
            ("AR-01", "accessible_reserved"),
        ] {
            env.add_slot(number, category);
        }
        env
    }

    /// The binary with no flags, started in the working directory.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("lotkeeper").expect("Failed to find lotkeeper binary");
        cmd.current_dir(&self.work_dir)
            .env_remove("LOTKEEPER_DATA_DIR")
            .env_remove("LOTKEEPER_OUTPUT_FORMAT")
            .env_remove("LOTKEEPER_LOG_MODE");
        cmd
    }

    /// The binary with `--data-dir` pointing at this environment.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Root of the temporary tree.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes a file into the working directory.
    pub fn write_site_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.work_dir.join(name);
        std::fs::write(&path, content).expect("Failed to write site file");
        path
    }

    /// Runs `slot add`.
    pub fn add_slot(&self, number: &str, category: &str) {
        self.command()
            .args(["slot", "add", number, "--category", category])
            .assert()
            .success();
    }

    /// Runs `enter` and returns the assigned slot number.
    pub fn enter(&self, plate: &str, category: &str) -> String {
        let output = self
            .command()
            .args(["--quiet", "enter", plate, "--category", category])
            .output()
            .expect("Failed to run enter");
        assert!(
            output.status.success(),
            "enter failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .to_string()
    }

    /// Runs a command with `--format json` and parses stdout.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .command()
            .args(args)
            .args(["--format", "json"])
            .output()
            .expect("Failed to run command");
        assert!(
            output.status.success(),
            "{args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("Output is not JSON")
    }

    /// Id of the vehicle's active session.
    pub fn session_id(&self, plate: &str) -> i64 {
        let sessions = self.json(&["sessions"]);
        sessions
            .as_array()
            .expect("sessions is an array")
            .iter()
            .find(|s| s["plate"] == plate)
            .and_then(|s| s["id"].as_i64())
            .expect("vehicle has an active session")
    }
}
