//! Environment checks run before any command is generated.

use crate::error::{BatchError, Result};
use std::path::PathBuf;

/// Require `var` to be set, proving control-plane credentials were sourced
pub fn check_credentials(var: &str) -> Result<()> {
    check_credentials_in(var, std::env::var_os(var).is_some())
}

fn check_credentials_in(var: &str, present: bool) -> Result<()> {
    if present {
        Ok(())
    } else {
        Err(BatchError::EnvironmentPrecondition(format!(
            "No {var} environment found. Execute `source <path/to/openrc>` first!"
        )))
    }
}

/// Resolve `binary` the way the shell would, through `PATH`
pub fn resolve_binary(binary: &str) -> Result<PathBuf> {
    which::which(binary).map_err(|e| not_found(binary, e))
}

fn not_found(binary: &str, error: which::Error) -> BatchError {
    BatchError::EnvironmentPrecondition(format!(
        "executable '{binary}' not found in PATH: {error}"
    ))
}
