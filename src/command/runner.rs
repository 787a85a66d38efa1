//! # Command Runner
//!
//! Runs one concrete control-plane command as a subprocess. The command line
//! is split on whitespace, the machine-readable format arguments are appended,
//! and the process gets a hard ceiling after which it is killed.
//!
//! The runner never fails: launch errors, timeouts and non-zero exits all come
//! back as a [`CommandOutput`] so the caller decides what a failure means for
//! the batch.

use crate::constants::{batch::SYNTHETIC_FAILURE_EXIT_CODE, control_plane::OUTPUT_FORMAT_ARGS};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured result of one subprocess run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
    pub started_at: DateTime<Utc>,
}

impl CommandOutput {
    /// Output for a run that never produced an exit status
    pub fn synthetic_failure(
        reason: impl Into<String>,
        duration: Duration,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            stdout: String::new(),
            stderr: reason.into(),
            exit_code: SYNTHETIC_FAILURE_EXIT_CODE,
            duration,
            started_at,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes concrete command lines against the control plane
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, command: &str) -> CommandOutput;
}

/// Subprocess-backed [`CommandExecutor`]
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
    format_args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl ProcessRunner {
    /// Create a runner with the given hard timeout and the default
    /// `--format json` arguments
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            format_args: OUTPUT_FORMAT_ARGS.iter().map(|s| s.to_string()).collect(),
            envs: Vec::new(),
        }
    }

    /// Replace the arguments appended to every command
    pub fn with_format_args(mut self, args: Vec<String>) -> Self {
        self.format_args = args;
        self
    }

    /// Set an environment variable on top of the inherited environment
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Program and arguments for a command line
    pub fn argv(&self, command: &str) -> Vec<String> {
        command
            .split_whitespace()
            .map(str::to_string)
            .chain(self.format_args.iter().cloned())
            .collect()
    }
}

#[async_trait]
impl CommandExecutor for ProcessRunner {
    async fn execute(&self, command: &str) -> CommandOutput {
        let argv = self.argv(command);
        let started_at = Utc::now();
        let start = Instant::now();

        let Some((program, args)) = argv.split_first() else {
            return CommandOutput::synthetic_failure("empty command", start.elapsed(), started_at);
        };

        let child = Command::new(program)
            .args(args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                warn!(program = %program, error = %e, "Failed to launch command");
                return CommandOutput::synthetic_failure(e.to_string(), start.elapsed(), started_at);
            }
        };

        // Dropping the wait future on timeout drops the child, which kills it.
        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let duration = start.elapsed();
                let exit_code = output.status.code().unwrap_or(SYNTHETIC_FAILURE_EXIT_CODE);
                debug!(
                    program = %program,
                    exit_code = exit_code,
                    duration_ms = duration.as_millis() as u64,
                    "Command finished"
                );
                CommandOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    exit_code,
                    duration,
                    started_at,
                }
            }
            Ok(Err(e)) => {
                CommandOutput::synthetic_failure(e.to_string(), start.elapsed(), started_at)
            }
            Err(_) => {
                warn!(
                    program = %program,
                    timeout_secs = self.timeout.as_secs(),
                    "Command exceeded its timeout and was killed"
                );
                CommandOutput::synthetic_failure(
                    format!("command timed out after {:?} and was killed", self.timeout),
                    start.elapsed(),
                    started_at,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv_appends_format_flag() {
        let runner = ProcessRunner::new(Duration::from_secs(1));
        assert_eq!(
            runner.argv("neutron  lbaas-pool-show   pl-1"),
            vec!["neutron", "lbaas-pool-show", "pl-1", "--format", "json"]
        );
    }

    #[tokio::test]
    async fn test_empty_command_is_synthetic_failure() {
        let runner = ProcessRunner::new(Duration::from_secs(1)).with_format_args(vec![]);
        let output = runner.execute("   ").await;
        assert_eq!(output.exit_code, SYNTHETIC_FAILURE_EXIT_CODE);
        assert_eq!(output.stderr, "empty command");
    }

    #[tokio::test]
    async fn test_launch_failure_records_error_text() {
        let runner = ProcessRunner::new(Duration::from_secs(5));
        let output = runner
            .execute("definitely-not-a-real-binary-lbaas-batchops lbaas-pool-list")
            .await;
        assert_eq!(output.exit_code, SYNTHETIC_FAILURE_EXIT_CODE);
        assert!(!output.stderr.is_empty());
        assert!(!output.succeeded());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let runner = ProcessRunner::new(Duration::from_secs(5));
        let output = runner.execute("echo hello").await;
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, "hello --format json\n");
        assert!(output.stderr.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_captured() {
        let runner = ProcessRunner::new(Duration::from_secs(5)).with_format_args(vec![]);
        let output = runner.execute("false").await;
        assert_ne!(output.exit_code, 0);
        assert_ne!(output.exit_code, SYNTHETIC_FAILURE_EXIT_CODE);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_process() {
        let runner = ProcessRunner::new(Duration::from_millis(200)).with_format_args(vec![]);
        let output = runner.execute("sleep 10").await;
        assert_eq!(output.exit_code, SYNTHETIC_FAILURE_EXIT_CODE);
        assert!(output.stderr.contains("timed out"));
        assert!(output.duration < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_extra_environment_is_passed() {
        let runner = ProcessRunner::new(Duration::from_secs(5))
            .with_format_args(vec![])
            .with_env("LBAAS_BATCHOPS_TEST_VAR", "present");
        let output = runner.execute("printenv LBAAS_BATCHOPS_TEST_VAR").await;
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout.trim(), "present");
    }
}
