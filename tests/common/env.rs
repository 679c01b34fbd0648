//! Test environment for running the fabric-wall binary in isolation.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Variables that would leak the developer's setup into a test run
const SCRUBBED_VARS: &[&str] = &[
    "ACCESS_TOKEN",
    "SQL_ACCESS_TOKEN",
    "RUST_LOG",
    "CI",
    "GITHUB_ACTIONS",
    "FABRIC_WALL_TENANT_ID",
    "FABRIC_WALL_PROVIDER_WORKSPACE_ID",
    "FABRIC_WALL_CONSUMER_WORKSPACE_ID",
    "FABRIC_WALL_PROVIDER_LAKEHOUSE_ID",
    "FABRIC_WALL_CONSUMER_LAKEHOUSE_ID",
    "FABRIC_WALL_SQL_CONNECTION_STRING",
    "FABRIC_WALL_FABRIC_BASE_URL",
    "FABRIC_WALL_POWERBI_BASE_URL",
    "FABRIC_WALL_TIMEOUT_SECS",
    "FABRIC_WALL_REPORT_DIR",
    "FABRIC_WALL_SKIP_SQL",
    "FABRIC_WALL_SKIP_POWERBI",
    "FABRIC_WALL_COLOR",
];

/// Result of running a fabric-wall command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as NDJSON
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l)
                    .unwrap_or_else(|e| panic!("not a JSON line ({}): {}", e, l))
            })
            .collect()
    }
}

/// Isolated project and home directories
pub struct TestEnv {
    pub project_root: TempDir,
    pub home_dir: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: tempfile::tempdir().expect("create project dir"),
            home_dir: tempfile::tempdir().expect("create home dir"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_fabric-wall")),
        }
    }

    /// Create an environment with `fabric-wall.toml` already written
    pub fn with_config(config: &str) -> Self {
        let env = Self::new();
        env.write_project_file("fabric-wall.toml", config);
        env
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(self.project_root.path())
            .args(args)
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("NO_COLOR", "1");
        for key in SCRUBBED_VARS {
            cmd.env_remove(key);
        }
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("failed to execute fabric-wall");
        to_result(output)
    }

    pub fn write_project_file(&self, relative: &str, content: &str) {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write project file");
    }

    pub fn read_project_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.project_path(relative))
            .unwrap_or_else(|e| panic!("failed to read {}: {}", relative, e))
    }

    /// Report files written into `dir` (relative to the project root)
    pub fn reports_in(&self, dir: &str) -> Vec<PathBuf> {
        let dir = self.project_path(dir);
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut reports: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| is_report(p))
            .collect();
        reports.sort();
        reports
    }
}

fn is_report(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains("-results-") && n.ends_with(".json"))
}

fn to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
