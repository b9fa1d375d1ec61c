//! Shared test infrastructure for integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Environment the binary reads; cleared so the host setup cannot leak in.
const CWIZ_ENV: [&str; 4] = [
    "CWIZ_BACKEND_URL",
    "CWIZ_DEV_MODE",
    "CWIZ_GITHUB_TOKEN",
    "CWIZ_LOG",
];

/// A scratch directory holding one session plus any input files.
pub struct TestSession {
    temp_dir: TempDir,
}

impl TestSession {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("tempdir"),
        }
    }

    pub fn session_dir(&self) -> PathBuf {
        self.temp_dir.path().join("session")
    }

    /// Path for an auxiliary file next to the session.
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("write input file");
        path
    }

    /// Run `cwiz <command> --session <dir> <args>`.
    pub fn run(&self, command: &str, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_cwiz"));
        cmd.arg(command)
            .arg("--session")
            .arg(self.session_dir())
            .args(args)
            .env("CWIZ_CONFIG", self.path("missing-config.json"));
        for key in CWIZ_ENV {
            cmd.env_remove(key);
        }
        cmd.output().expect("spawn cwiz")
    }

    /// Like `run`, but panics with stderr when the command fails.
    pub fn ok(&self, command: &str, args: &[&str]) -> String {
        let output = self.run(command, args);
        assert!(
            output.status.success(),
            "cwiz {command} failed: {}",
            stderr(&output)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    pub fn status_json(&self) -> serde_json::Value {
        let text = self.ok("status", &["--json"]);
        serde_json::from_str(&text).expect("status JSON")
    }

    /// Exported YAML document as text.
    pub fn export(&self) -> String {
        self.ok("export", &[])
    }

    pub fn history_len(&self) -> usize {
        read_lines(&self.session_dir().join("history.jsonl"))
    }
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn read_lines(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .map(|text| text.lines().filter(|line| !line.trim().is_empty()).count())
        .unwrap_or(0)
}
