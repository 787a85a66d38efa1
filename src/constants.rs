//! # System Constants
//!
//! Fixed values of the control-plane contract and the batch protocol.
//! Tunable defaults live in [`crate::config`]; the values here are not
//! meant to be overridden.

/// Control-plane command-line contract
pub mod control_plane {
    /// Default control-plane client binary
    pub const DEFAULT_BINARY: &str = "neutron";

    /// Prefix of every load-balancer subcommand (`lbaas-<resource>-<operation>`)
    pub const SUBCOMMAND_PREFIX: &str = "lbaas-";

    /// Subcommand used by the status probe
    pub const LOADBALANCER_SHOW: &str = "lbaas-loadbalancer-show";

    /// Arguments appended to every command to force machine-readable output
    pub const OUTPUT_FORMAT_ARGS: &[&str] = &["--format", "json"];

    /// Environment variable whose presence proves credentials were sourced
    pub const CREDENTIAL_ENV_VAR: &str = "OS_USERNAME";
}

/// Readiness polling protocol
pub mod readiness {
    /// Status prefix of an in-flight asynchronous transition
    pub const PENDING_PREFIX: &str = "PENDING_";

    /// Default pending-retry budget for the pre-execution check
    pub const DEFAULT_MAX_CHECK_TIMES: u32 = 64;

    /// Pending-retry budget of the post-execution check (not configurable)
    pub const POST_CHECK_MAX_TIMES: u32 = 32;

    /// Consecutive probe errors tolerated by the pre-execution check
    pub const MAX_PROBE_ERRORS: u32 = 3;

    /// Delay between two status probes
    pub const POLL_INTERVAL_MS: u64 = 1000;
}

/// Batch execution protocol
pub mod batch {
    /// Hard ceiling for a single control-plane command
    pub const COMMAND_TIMEOUT_SECONDS: u64 = 30 * 60;

    /// Pause after every command so the control plane can pick it up
    pub const PACING_MS: u64 = 1000;

    /// Synthetic exit code for commands that never produced one
    /// (launch failure, timeout, killed by signal)
    pub const SYNTHETIC_FAILURE_EXIT_CODE: i32 = -1;

    /// Output path that selects standard output instead of a file
    pub const STDOUT_SENTINEL: &str = "/dev/stdout";
}

/// Command-line section markers
pub mod cli {
    /// Start of the command template
    pub const TEMPLATE_MARKER: &str = "--";

    /// Start of the variable assignments
    pub const VARIABLES_MARKER: &str = "++";

    /// Separator between a variable name and its value specification
    pub const ASSIGNMENT_SEPARATOR: char = ':';
}
