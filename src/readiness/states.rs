use serde::{Deserialize, Serialize};
use std::fmt;

/// Readiness gate states
///
/// ```text
///                  ┌── non-pending status ──▶ Ready
/// Checking ──probe─┼── budget exhausted ────▶ FailedPendingTimeout
///    ▲             ├── too many errors ─────▶ FailedCheckErrors
///    └── pending / probe error (within budget)
/// ```
///
/// `NotApplicable` is decided before any probe is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// The command never blocks (read-only, or creates the load balancer itself)
    NotApplicable,
    /// Actively polling the target's status
    Checking,
    /// The target left its pending state
    Ready,
    /// The target stayed pending past the retry budget
    FailedPendingTimeout,
    /// The status probe kept failing past its error budget
    FailedCheckErrors,
}

impl GateState {
    /// Check if this is a terminal state (polling has stopped)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Checking)
    }

    /// Check if the next command may run
    pub fn allows_progress(&self) -> bool {
        matches!(self, Self::NotApplicable | Self::Ready)
    }

    /// Check if this is one of the failure states
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FailedPendingTimeout | Self::FailedCheckErrors)
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApplicable => write!(f, "not_applicable"),
            Self::Checking => write!(f, "checking"),
            Self::Ready => write!(f, "ready"),
            Self::FailedPendingTimeout => write!(f, "failed_pending_timeout"),
            Self::FailedCheckErrors => write!(f, "failed_check_errors"),
        }
    }
}

impl std::str::FromStr for GateState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_applicable" => Ok(Self::NotApplicable),
            "checking" => Ok(Self::Checking),
            "ready" => Ok(Self::Ready),
            "failed_pending_timeout" => Ok(Self::FailedPendingTimeout),
            "failed_check_errors" => Ok(Self::FailedCheckErrors),
            _ => Err(format!("Invalid gate state: {s}")),
        }
    }
}

impl Default for GateState {
    fn default() -> Self {
        Self::Checking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_and_progress_checks() {
        assert!(!GateState::Checking.is_terminal());
        assert!(GateState::Ready.is_terminal());
        assert!(GateState::NotApplicable.is_terminal());

        assert!(GateState::Ready.allows_progress());
        assert!(GateState::NotApplicable.allows_progress());
        assert!(!GateState::FailedPendingTimeout.allows_progress());
        assert!(!GateState::FailedCheckErrors.allows_progress());
        assert!(!GateState::Checking.allows_progress());
    }

    #[test]
    fn test_state_string_conversion() {
        assert_eq!(GateState::FailedCheckErrors.to_string(), "failed_check_errors");
        assert_eq!(
            "failed_pending_timeout".parse::<GateState>().unwrap(),
            GateState::FailedPendingTimeout
        );
        assert!("bogus".parse::<GateState>().is_err());
    }

    #[test]
    fn test_state_serde() {
        let json = serde_json::to_string(&GateState::NotApplicable).unwrap();
        assert_eq!(json, "\"not_applicable\"");
        let parsed: GateState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, GateState::NotApplicable);
    }
}
