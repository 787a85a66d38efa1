//! # Batch Orchestration
//!
//! Sequences the generated commands through the readiness gate and the
//! command runner, strictly one at a time and in generation order.
//!
//! ## Core Components
//!
//! - **BatchPlan**: the generated command list and the load balancer it gates on
//! - **BatchOrchestrator**: pre-check, run, pacing, optional post-check per command
//! - **ExecutionLog**: owned append-only record log, snapshot-readable from the
//!   interruption listener
//! - **ReportWriter**: JSON records and the plain-text execution report

pub mod batch;
pub mod execution_log;
pub mod plan;
pub mod report;

pub use batch::{BatchAbort, BatchOrchestrator, BatchOutcome, OrchestratorSettings};
pub use execution_log::ExecutionLog;
pub use plan::BatchPlan;
pub use report::{print_summary, render_summary, ReportWriter};
