//! # Control-Plane Commands
//!
//! Classification of generated commands, their execution records, and the
//! subprocess runner that executes them.

pub mod classification;
pub mod preflight;
pub mod record;
pub mod runner;

pub use classification::{OperationKind, ResourceKind, Subcommand};
pub use preflight::{check_credentials, resolve_binary};
pub use record::ExecutionRecord;
pub use runner::{CommandExecutor, CommandOutput, ProcessRunner};
