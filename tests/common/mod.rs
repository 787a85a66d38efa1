#![allow(dead_code)]

pub mod mock_executor;
pub mod mock_probe;
pub mod strategies;

pub use mock_executor::*;
pub use mock_probe::*;

use lbaas_batchops::orchestration::{BatchOrchestrator, ExecutionLog, OrchestratorSettings};
use lbaas_batchops::readiness::{GatePolicy, ReadinessGate};
use std::sync::Arc;
use std::time::Duration;

/// Gate with zero poll interval and the given pre-check budget
pub fn fast_gate(probe: Arc<ScriptedProbe>, max_check_times: u32) -> ReadinessGate {
    ReadinessGate::new(
        probe,
        GatePolicy::pre_check(max_check_times, Duration::ZERO),
        GatePolicy::post_check(Duration::ZERO),
    )
}

/// Orchestrator without pacing, wired to the given fakes
pub fn fast_orchestrator(
    executor: Arc<RecordingExecutor>,
    probe: Arc<ScriptedProbe>,
    max_check_times: u32,
    post_check_enabled: bool,
) -> BatchOrchestrator {
    BatchOrchestrator::new(
        executor,
        fast_gate(probe, max_check_times),
        ExecutionLog::new(),
        OrchestratorSettings {
            pacing: Duration::ZERO,
            post_check_enabled,
        },
    )
}
