//! # Batch Orchestrator
//!
//! Runs a [`BatchPlan`] strictly sequentially. For each command:
//!
//! 1. build its record (1-based sequence number, classified subcommand)
//! 2. pre-check the load balancer; a failed check aborts the batch and the
//!    command is neither run nor recorded
//! 3. run the command and fill the record from its output
//! 4. pause for the pacing interval
//! 5. optionally post-check; a failure is logged on the record, never fatal
//! 6. append the record to the shared [`ExecutionLog`]
//!
//! A non-zero exit status is recorded and the batch continues.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lbaas_batchops::orchestration::{BatchOrchestrator, BatchPlan, ExecutionLog, OrchestratorSettings};
//! use lbaas_batchops::readiness::{CliStatusProbe, GatePolicy, ReadinessGate};
//! use lbaas_batchops::ProcessRunner;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let runner = Arc::new(ProcessRunner::new(Duration::from_secs(1800)));
//! let gate = ReadinessGate::new(
//!     Arc::new(CliStatusProbe::new(runner.clone(), "neutron")),
//!     GatePolicy::default(),
//!     GatePolicy::post_check(Duration::from_secs(1)),
//! );
//! let orchestrator = BatchOrchestrator::new(
//!     runner,
//!     gate,
//!     ExecutionLog::new(),
//!     OrchestratorSettings::default(),
//! );
//!
//! let plan = BatchPlan::new("lb-web", vec!["neutron lbaas-pool-delete pl-1".to_string()]);
//! let outcome = orchestrator.run(&plan).await;
//! println!("{} of {} commands ran", outcome.executed, outcome.total);
//! # });
//! ```

use super::execution_log::ExecutionLog;
use super::plan::BatchPlan;
use crate::command::{CommandExecutor, ExecutionRecord};
use crate::config::BatchConfig;
use crate::error::BatchError;
use crate::readiness::{GateState, ReadinessGate};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};

/// Per-run orchestration settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorSettings {
    /// Pause after each command
    pub pacing: Duration,
    /// Run the post-execution check after successful mutating commands
    pub post_check_enabled: bool,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(crate::constants::batch::PACING_MS),
            post_check_enabled: false,
        }
    }
}

impl From<&BatchConfig> for OrchestratorSettings {
    fn from(config: &BatchConfig) -> Self {
        Self {
            pacing: config.pacing(),
            post_check_enabled: config.readiness.post_check_enabled,
        }
    }
}

/// Why a batch stopped before its last command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchAbort {
    pub seq: usize,
    pub total: usize,
    pub command: String,
    pub state: GateState,
    pub reason: String,
}

impl From<BatchAbort> for BatchError {
    fn from(abort: BatchAbort) -> Self {
        BatchError::NotReady {
            seq: abort.seq,
            total: abort.total,
            reason: abort.reason,
        }
    }
}

/// Summary of one [`BatchOrchestrator::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub total: usize,
    pub executed: usize,
    pub failed: usize,
    pub abort: Option<BatchAbort>,
    pub elapsed: Duration,
}

impl BatchOutcome {
    pub fn completed(&self) -> bool {
        self.abort.is_none()
    }
}

pub struct BatchOrchestrator {
    executor: Arc<dyn CommandExecutor>,
    gate: ReadinessGate,
    log: ExecutionLog,
    settings: OrchestratorSettings,
}

impl std::fmt::Debug for BatchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchOrchestrator")
            .field("records", &self.log.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl BatchOrchestrator {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        gate: ReadinessGate,
        log: ExecutionLog,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            executor,
            gate,
            log,
            settings,
        }
    }

    /// Shared handle on the records appended by this orchestrator
    pub fn log(&self) -> &ExecutionLog {
        &self.log
    }

    /// Run every command of `plan` in order
    #[instrument(skip(self, plan), fields(total = plan.len(), load_balancer = %plan.load_balancer()))]
    pub async fn run(&self, plan: &BatchPlan) -> BatchOutcome {
        let start = Instant::now();
        let total = plan.len();
        let mut executed = 0usize;
        let mut failed = 0usize;

        info!(total = total, "Starting batch");

        for (index, command) in plan.commands().iter().enumerate() {
            let seq = index + 1;
            let mut record = ExecutionRecord::new(seq, command.as_str(), plan.load_balancer());

            let evaluation = self.gate.pre_check(&record, total).await;
            if !evaluation.allows_progress() {
                let reason = evaluation
                    .failure_reason(plan.load_balancer())
                    .unwrap_or_else(|| format!("readiness check ended in {}", evaluation.state));
                error!(
                    seq = seq,
                    total = total,
                    command = %command,
                    state = %evaluation.state,
                    reason = %reason,
                    "Load balancer not ready, aborting batch"
                );
                return BatchOutcome {
                    total,
                    executed,
                    failed,
                    abort: Some(BatchAbort {
                        seq,
                        total,
                        command: command.clone(),
                        state: evaluation.state,
                        reason,
                    }),
                    elapsed: start.elapsed(),
                };
            }

            info!(seq = seq, total = total, command = %command, "Running command");
            let output = self.executor.execute(command).await;
            record.apply_output(output);
            executed += 1;

            if record.succeeded() {
                info!(
                    seq = seq,
                    total = total,
                    exit_code = record.exit_code,
                    duration_ms = record.duration_ms() as u64,
                    "Command finished"
                );
            } else {
                failed += 1;
                warn!(
                    seq = seq,
                    total = total,
                    exit_code = record.exit_code,
                    duration_ms = record.duration_ms() as u64,
                    stderr = %record.stderr.trim_end(),
                    "Command failed"
                );
            }

            if !self.settings.pacing.is_zero() {
                tokio::time::sleep(self.settings.pacing).await;
            }

            if self.settings.post_check_enabled && record.succeeded() {
                let evaluation = self.gate.post_check(&record, total).await;
                if evaluation.state.is_failure() {
                    let reason = evaluation
                        .failure_reason(plan.load_balancer())
                        .unwrap_or_default();
                    warn!(
                        seq = seq,
                        total = total,
                        state = %evaluation.state,
                        reason = %reason,
                        "Load balancer left pending after command"
                    );
                }
                record.post_check = Some(evaluation.state);
            }

            self.log.append(record);
        }

        let elapsed = start.elapsed();
        info!(
            total = total,
            executed = executed,
            failed = failed,
            elapsed_ms = elapsed.as_millis() as u64,
            "Batch finished"
        );

        BatchOutcome {
            total,
            executed,
            failed,
            abort: None,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandOutput;
    use crate::error::Result;
    use crate::readiness::{GatePolicy, StatusProbe};
    use async_trait::async_trait;
    use chrono::Utc;
    use parking_lot::Mutex;

    struct ExitCodes(Mutex<Vec<i32>>);

    #[async_trait]
    impl CommandExecutor for ExitCodes {
        async fn execute(&self, command: &str) -> CommandOutput {
            let code = {
                let mut codes = self.0.lock();
                if codes.is_empty() { 0 } else { codes.remove(0) }
            };
            CommandOutput {
                stdout: format!("ran {command}"),
                stderr: if code == 0 { String::new() } else { "boom".to_string() },
                exit_code: code,
                duration: Duration::from_millis(1),
                started_at: Utc::now(),
            }
        }
    }

    struct AlwaysActive;

    #[async_trait]
    impl StatusProbe for AlwaysActive {
        async fn provisioning_status(&self, _load_balancer: &str) -> Result<String> {
            Ok("ACTIVE".to_string())
        }

        fn description(&self) -> &'static str {
            "always-active"
        }
    }

    fn orchestrator(codes: Vec<i32>, post_check: bool) -> BatchOrchestrator {
        let gate = ReadinessGate::new(
            Arc::new(AlwaysActive),
            GatePolicy::pre_check(4, Duration::ZERO),
            GatePolicy::post_check(Duration::ZERO),
        );
        BatchOrchestrator::new(
            Arc::new(ExitCodes(Mutex::new(codes))),
            gate,
            ExecutionLog::new(),
            OrchestratorSettings {
                pacing: Duration::ZERO,
                post_check_enabled: post_check,
            },
        )
    }

    #[tokio::test]
    async fn test_failed_command_does_not_stop_batch() {
        let orchestrator = orchestrator(vec![0, 2, 0], false);
        let plan = BatchPlan::new(
            "lb1",
            vec![
                "neutron lbaas-pool-delete pl-1".to_string(),
                "neutron lbaas-pool-delete pl-2".to_string(),
                "neutron lbaas-pool-delete pl-3".to_string(),
            ],
        );

        let outcome = orchestrator.run(&plan).await;
        assert!(outcome.completed());
        assert_eq!(outcome.executed, 3);
        assert_eq!(outcome.failed, 1);

        let records = orchestrator.log().snapshot();
        assert_eq!(records.iter().map(|r| r.seq).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(records[1].exit_code, 2);
        assert_eq!(records[1].stderr, "boom");
        assert!(records.iter().all(|r| r.post_check.is_none()));
    }

    #[tokio::test]
    async fn test_post_check_recorded_when_enabled() {
        let orchestrator = orchestrator(vec![0, 1], true);
        let plan = BatchPlan::new(
            "lb1",
            vec![
                "neutron lbaas-member-create --name mb-1 pl-1".to_string(),
                "neutron lbaas-member-create --name mb-2 pl-1".to_string(),
            ],
        );

        orchestrator.run(&plan).await;
        let records = orchestrator.log().snapshot();
        assert_eq!(records[0].post_check, Some(GateState::Ready));
        // failed commands skip the post-check
        assert_eq!(records[1].post_check, None);
    }

    #[test]
    fn test_abort_converts_to_not_ready() {
        let abort = BatchAbort {
            seq: 3,
            total: 5,
            command: "neutron lbaas-pool-delete pl-3".to_string(),
            state: GateState::FailedPendingTimeout,
            reason: "still pending".to_string(),
        };
        let err: BatchError = abort.into();
        assert_eq!(err.to_string(), "Command(3/5) not ready to run: still pending");
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = BatchConfig::default();
        config.pacing_ms = 250;
        config.readiness.post_check_enabled = true;
        let settings = OrchestratorSettings::from(&config);
        assert_eq!(settings.pacing, Duration::from_millis(250));
        assert!(settings.post_check_enabled);
    }
}
