//! # Batch Configuration
//!
//! Every setting has a default, so the tool runs with no configuration file at
//! all. Values are layered:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config` or `LBAAS_BATCHOPS_CONFIG_PATH`)
//! 3. command-line flags
//!
//! ```toml
//! output_path = "/var/log/batchops/members.json"
//! check_lb = "lb-web"
//!
//! [readiness]
//! max_check_times = 128
//! post_check_enabled = true
//!
//! [database]
//! username = "neutron"
//! password = "secret"
//! dbname = "neutron"
//! hostname = "10.0.0.5"
//! port = 3306
//! ```

pub mod loader;

use crate::constants::{batch, control_plane, readiness};
use crate::error::{BatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use loader::ConfigLoader;

/// Where the JSON execution records go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// Root configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Result file, appended to; the stdout sentinel writes to standard output
    pub output_path: String,

    /// Load balancer (id or name) every gated command waits on
    pub check_lb: String,

    /// Pause after each command, in milliseconds
    pub pacing_ms: u64,

    pub control_plane: ControlPlaneConfig,
    pub readiness: ReadinessConfig,
    pub database: DatabaseConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            output_path: batch::STDOUT_SENTINEL.to_string(),
            check_lb: String::new(),
            pacing_ms: batch::PACING_MS,
            control_plane: ControlPlaneConfig::default(),
            readiness: ReadinessConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl BatchConfig {
    pub fn output_target(&self) -> OutputTarget {
        if self.output_path == batch::STDOUT_SENTINEL {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(PathBuf::from(&self.output_path))
        }
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    /// Reject settings the batch cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.output_path.trim().is_empty() {
            return Err(BatchError::configuration("output_path must not be empty"));
        }
        self.control_plane.validate()?;
        self.readiness.validate()?;
        Ok(())
    }

    /// Copy with secrets masked, for logging
    pub fn sanitized(&self) -> Self {
        let mut copy = self.clone();
        if copy.database.password.is_some() {
            copy.database.password = Some("***REDACTED***".to_string());
        }
        copy
    }
}

/// Control-plane client settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlPlaneConfig {
    /// Client binary prefixed to the command template
    pub binary: String,
    /// Hard ceiling per command
    pub command_timeout_seconds: u64,
    /// Arguments appended to every command
    pub output_format_args: Vec<String>,
    /// Variable that must be present in the environment
    pub credential_env_var: String,
}

impl Default for ControlPlaneConfig {
    fn default() -> Self {
        Self {
            binary: control_plane::DEFAULT_BINARY.to_string(),
            command_timeout_seconds: batch::COMMAND_TIMEOUT_SECONDS,
            output_format_args: control_plane::OUTPUT_FORMAT_ARGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            credential_env_var: control_plane::CREDENTIAL_ENV_VAR.to_string(),
        }
    }
}

impl ControlPlaneConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_seconds)
    }

    fn validate(&self) -> Result<()> {
        if self.binary.trim().is_empty() || self.binary.contains(char::is_whitespace) {
            return Err(BatchError::configuration(format!(
                "control_plane.binary '{}' must be a single non-empty word",
                self.binary
            )));
        }
        if self.command_timeout_seconds == 0 {
            return Err(BatchError::configuration(
                "control_plane.command_timeout_seconds must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Readiness polling settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadinessConfig {
    /// Pending-retry budget of the pre-execution check
    pub max_check_times: u32,
    /// Delay between status probes, in milliseconds
    pub poll_interval_ms: u64,
    /// Run the post-execution check after successful mutating commands
    pub post_check_enabled: bool,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            max_check_times: readiness::DEFAULT_MAX_CHECK_TIMES,
            poll_interval_ms: readiness::POLL_INTERVAL_MS,
            post_check_enabled: false,
        }
    }
}

impl ReadinessConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.max_check_times == 0 {
            return Err(BatchError::configuration(
                "readiness.max_check_times must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Direct status-read database parameters; all five or none
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub dbname: Option<String>,
    pub hostname: Option<String>,
    #[serde(deserialize_with = "crate::utils::serde::deserialize_optional_flexible_u64")]
    pub port: Option<u64>,
}

impl DatabaseConfig {
    fn present(value: &Option<String>) -> bool {
        value.as_deref().is_some_and(|v| !v.is_empty())
    }

    fn provided_count(&self) -> usize {
        [
            Self::present(&self.username),
            Self::present(&self.password),
            Self::present(&self.dbname),
            Self::present(&self.hostname),
            self.port.is_some(),
        ]
        .into_iter()
        .filter(|p| *p)
        .count()
    }

    /// All five parameters are set: the database status path is available
    pub fn is_complete(&self) -> bool {
        self.provided_count() == 5
    }

    /// Some but not all parameters are set
    pub fn is_partial(&self) -> bool {
        (1..5).contains(&self.provided_count())
    }
}
