//! Execution records: the durable outcome of one generated command.

use super::classification::{OperationKind, ResourceKind, Subcommand};
use super::runner::CommandOutput;
use crate::readiness::GateState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of running one generated command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// 1-based position in generation order
    #[serde(rename = "seqnum")]
    pub seq: usize,
    pub command: String,
    #[serde(rename = "output")]
    pub stdout: String,
    #[serde(rename = "error")]
    pub stderr: String,
    #[serde(rename = "exitcode")]
    pub exit_code: i32,
    #[serde(with = "crate::utils::serde::duration_nanos")]
    pub duration: Duration,
    pub resource_type: Option<ResourceKind>,
    pub operation_type: Option<OperationKind>,
    /// Load balancer the batch gates on; empty when none was given
    #[serde(rename = "loadbalancer")]
    pub load_balancer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Outcome of the post-execution check, when that check is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_check: Option<GateState>,
}

impl ExecutionRecord {
    /// Create the record for `command`, classifying its subcommand
    pub fn new(seq: usize, command: impl Into<String>, load_balancer: impl Into<String>) -> Self {
        let command = command.into();
        let subcommand = Subcommand::classify(&command);
        Self {
            seq,
            command,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
            duration: Duration::ZERO,
            resource_type: subcommand.resource(),
            operation_type: subcommand.operation(),
            load_balancer: load_balancer.into(),
            started_at: None,
            post_check: None,
        }
    }

    pub fn subcommand(&self) -> Subcommand {
        match (self.resource_type, self.operation_type) {
            (Some(resource), Some(operation)) => Subcommand::Classified {
                resource,
                operation,
            },
            _ => Subcommand::classify(&self.command),
        }
    }

    /// Fill the output fields from a finished run
    pub fn apply_output(&mut self, output: CommandOutput) {
        self.stdout = output.stdout;
        self.stderr = output.stderr;
        self.exit_code = output.exit_code;
        self.duration = output.duration;
        self.started_at = Some(output.started_at);
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    pub fn duration_ms(&self) -> u128 {
        self.duration.as_millis()
    }
}
