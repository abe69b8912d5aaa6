//! Shared harness for driving the built `advisor` binary.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Captured outcome of one CLI invocation.
pub struct CliCaseResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

/// Run `advisor` with `args`, isolated from any user configuration.
pub fn run_cli_case(case_name: &str, args: &[&str]) -> CliCaseResult {
    run_cli_case_with_env(case_name, args, &[])
}

/// Like [`run_cli_case`], with extra environment variables.
pub fn run_cli_case_with_env(
    case_name: &str,
    args: &[&str],
    env: &[(&str, &str)],
) -> CliCaseResult {
    let sandbox = tempfile::tempdir().expect("create sandbox home");
    let mut command = Command::new(env!("CARGO_BIN_EXE_advisor"));
    command
        .args(args)
        .env_remove("ADVISOR_CONFIG")
        .env_remove("ADVISOR_OUTPUT_FORMAT")
        .env_remove("ADVISOR_LOG")
        .env("HOME", sandbox.path())
        .env("XDG_CONFIG_HOME", sandbox.path().join("config"))
        .env("XDG_DATA_HOME", sandbox.path().join("data"))
        .env("NO_COLOR", "1");
    for (key, value) in env {
        command.env(key, value);
    }

    let output = command.output().expect("spawn advisor binary");
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let log_path = write_case_log(case_name, args, &stdout, &stderr);

    CliCaseResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

fn write_case_log(case_name: &str, args: &[&str], stdout: &str, stderr: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("advisor-cli-cases");
    let _ = fs::create_dir_all(&dir);
    let log_path = dir.join(format!("{case_name}.log"));
    let body = format!(
        "args: {args:?}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}\n"
    );
    let _ = fs::write(&log_path, body);
    log_path
}

/// Create `path` (and parents) holding `len` bytes.
pub fn write_file(path: &Path, len: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    fs::write(path, vec![b'x'; len]).expect("write fixture file");
}
