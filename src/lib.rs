#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # LBaaS Batch Operations
//!
//! Batch-generates and executes load-balancer control-plane commands from a
//! single templated command line, gating every mutating command on the target
//! load balancer leaving its `PENDING_*` provisioning state.
//!
//! ## Pipeline
//!
//! ```text
//! template + `name:spec` assignments
//!     -> template::range      (value lists)
//!     -> template::expander   (ordered cross product)
//!     -> readiness::gate      (pre-check, per command)
//!     -> command::runner      (subprocess, 30 min ceiling)
//!     -> orchestration::execution_log (append-only records)
//!     -> orchestration::report
//! ```
//!
//! ## Module Organization
//!
//! - [`template`] - Range parsing, variable sets and template expansion
//! - [`command`] - Subcommand classification, execution records, the process runner
//! - [`readiness`] - Status probes and the pending/retry polling state machine
//! - [`orchestration`] - Batch sequencing, the shared record log and reporting
//! - [`database`] - Optional direct provisioning-status reads
//! - [`config`] - Configuration defaults, file loading and validation
//! - [`cli`] - Command-line sections and flags
//! - [`logging`] - Tracing initialisation
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use lbaas_batchops::template::{CommandTemplate, VariableSet};
//!
//! let template = CommandTemplate::parse("neutron lbaas-member-create --name mb-%{n} %{pool}");
//! let variables = VariableSet::from_assignments(&template, &["n:1-2", "pool:pl-1"]).unwrap();
//! let commands = template.expand(&variables);
//!
//! assert_eq!(commands, vec![
//!     "neutron lbaas-member-create --name mb-1 pl-1",
//!     "neutron lbaas-member-create --name mb-2 pl-1",
//! ]);
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod logging;
pub mod orchestration;
pub mod readiness;
pub mod template;
pub mod utils;

pub use command::{
    CommandExecutor, CommandOutput, ExecutionRecord, OperationKind, ProcessRunner, ResourceKind,
    Subcommand,
};
pub use config::{BatchConfig, ControlPlaneConfig, DatabaseConfig, ReadinessConfig};
pub use error::{BatchError, Result};
pub use orchestration::{BatchOrchestrator, BatchOutcome, BatchPlan, ExecutionLog};
pub use readiness::{GateEvaluation, GatePolicy, GateState, ReadinessGate, StatusProbe};
pub use template::{parse_range, CommandTemplate, VariableSet};
