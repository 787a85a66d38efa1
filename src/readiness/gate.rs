//! # Readiness Gate
//!
//! Polling state machine that waits for a load balancer to leave its
//! `PENDING_*` provisioning state.
//!
//! Two checks share the same loop with different policies:
//!
//! - **pre-check**, before a command runs: configurable pending budget
//!   (default 64) and a budget of 3 consecutive probe errors.
//! - **post-check**, after a successful create/update/delete: fixed pending
//!   budget of 32, and the first probe error ends the check.
//!
//! Probe errors do not consume the pending budget. A successful probe resets
//! the consecutive-error count.

use super::probe::StatusProbe;
use super::states::GateState;
use crate::command::{ExecutionRecord, OperationKind, ResourceKind, Subcommand};
use crate::constants::readiness::{
    DEFAULT_MAX_CHECK_TIMES, MAX_PROBE_ERRORS, PENDING_PREFIX, POLL_INTERVAL_MS,
    POST_CHECK_MAX_TIMES,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Check if a provisioning status denotes an in-flight transition
pub fn is_pending(status: &str) -> bool {
    status.starts_with(PENDING_PREFIX)
}

/// Retry budgets and pacing for one polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatePolicy {
    /// Pending observations tolerated before giving up
    pub max_pending_retries: u32,
    /// Consecutive probe errors tolerated before giving up
    pub max_probe_errors: u32,
    /// Delay between probes
    pub poll_interval: Duration,
}

impl GatePolicy {
    /// Pre-execution policy with the given pending budget
    pub fn pre_check(max_check_times: u32, poll_interval: Duration) -> Self {
        Self {
            max_pending_retries: max_check_times,
            max_probe_errors: MAX_PROBE_ERRORS,
            poll_interval,
        }
    }

    /// Post-execution policy: fixed budget, first probe error is terminal
    pub fn post_check(poll_interval: Duration) -> Self {
        Self {
            max_pending_retries: POST_CHECK_MAX_TIMES,
            max_probe_errors: 1,
            poll_interval,
        }
    }
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self::pre_check(
            DEFAULT_MAX_CHECK_TIMES,
            Duration::from_millis(POLL_INTERVAL_MS),
        )
    }
}

/// Result of one gate evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateEvaluation {
    pub state: GateState,
    /// Pending observations consumed from the budget
    pub pending_retries: u32,
    /// Probe errors seen in total
    pub probe_errors: u32,
    pub last_status: Option<String>,
    pub last_error: Option<String>,
    pub elapsed: Duration,
}

impl GateEvaluation {
    fn not_applicable() -> Self {
        Self {
            state: GateState::NotApplicable,
            pending_retries: 0,
            probe_errors: 0,
            last_status: None,
            last_error: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn allows_progress(&self) -> bool {
        self.state.allows_progress()
    }

    /// Human-readable reason for a failed evaluation
    pub fn failure_reason(&self, load_balancer: &str) -> Option<String> {
        match self.state {
            GateState::FailedPendingTimeout => Some(format!(
                "Loadbalancer {load_balancer} is still PENDING after {} checks (last status: {})",
                self.pending_retries,
                self.last_status.as_deref().unwrap_or("unknown")
            )),
            GateState::FailedCheckErrors => Some(format!(
                "Loadbalancer {load_balancer} status check failed {} times, last failure: {}",
                self.probe_errors,
                self.last_error.as_deref().unwrap_or("unknown")
            )),
            _ => None,
        }
    }
}

/// Readiness gate over a [`StatusProbe`]
#[derive(Clone)]
pub struct ReadinessGate {
    probe: Arc<dyn StatusProbe>,
    pre_policy: GatePolicy,
    post_policy: GatePolicy,
}

impl ReadinessGate {
    pub fn new(probe: Arc<dyn StatusProbe>, pre_policy: GatePolicy, post_policy: GatePolicy) -> Self {
        Self {
            probe,
            pre_policy,
            post_policy,
        }
    }

    pub fn pre_policy(&self) -> GatePolicy {
        self.pre_policy
    }

    pub fn post_policy(&self) -> GatePolicy {
        self.post_policy
    }

    /// Whether the pre-execution check has to poll for this command
    pub fn pre_check_applies(subcommand: &Subcommand, load_balancer: &str) -> bool {
        if load_balancer.is_empty() {
            return false;
        }
        match subcommand.operation() {
            Some(OperationKind::Show | OperationKind::List) => false,
            _ => !subcommand.is(ResourceKind::LoadBalancer, OperationKind::Create),
        }
    }

    /// Whether the post-execution check has anything to poll for this command
    pub fn post_check_applies(subcommand: &Subcommand, load_balancer: &str) -> bool {
        let mutating = subcommand.operation().is_some_and(|op| op.is_mutating());
        mutating
            && !load_balancer.is_empty()
            && !subcommand.is(ResourceKind::LoadBalancer, OperationKind::Delete)
    }

    /// Decide whether `record`'s command may run now
    pub async fn pre_check(&self, record: &ExecutionRecord, total: usize) -> GateEvaluation {
        if !Self::pre_check_applies(&record.subcommand(), &record.load_balancer) {
            debug!(seq = record.seq, total = total, "Pre-check not applicable");
            return GateEvaluation::not_applicable();
        }

        info!(
            seq = record.seq,
            total = total,
            load_balancer = %record.load_balancer,
            probe = self.probe.description(),
            "Confirming load balancer is not pending"
        );
        self.poll(&record.load_balancer, self.pre_policy, record.seq, total)
            .await
    }

    /// Decide whether the batch may proceed after `record`'s command ran
    pub async fn post_check(&self, record: &ExecutionRecord, total: usize) -> GateEvaluation {
        let subcommand = record.subcommand();
        if !Self::post_check_applies(&subcommand, &record.load_balancer) {
            debug!(
                seq = record.seq,
                total = total,
                load_balancer = %record.load_balancer,
                "Nothing to check after this command"
            );
            return GateEvaluation::not_applicable();
        }

        let evaluation = self
            .poll(&record.load_balancer, self.post_policy, record.seq, total)
            .await;
        info!(
            seq = record.seq,
            total = total,
            checked_ms = evaluation.elapsed.as_millis() as u64,
            state = %evaluation.state,
            "Post-check finished"
        );
        evaluation
    }

    /// Poll `load_balancer` until it settles or a budget runs out
    pub async fn poll(
        &self,
        load_balancer: &str,
        policy: GatePolicy,
        seq: usize,
        total: usize,
    ) -> GateEvaluation {
        let start = Instant::now();
        let mut evaluation = GateEvaluation {
            state: GateState::Checking,
            pending_retries: 0,
            probe_errors: 0,
            last_status: None,
            last_error: None,
            elapsed: Duration::ZERO,
        };
        let mut consecutive_errors = 0u32;

        while !evaluation.state.is_terminal() {
            match self.probe.provisioning_status(load_balancer).await {
                Err(e) => {
                    consecutive_errors += 1;
                    evaluation.probe_errors += 1;
                    evaluation.last_error = Some(e.to_string());
                    warn!(
                        seq = seq,
                        total = total,
                        load_balancer = %load_balancer,
                        consecutive_errors = consecutive_errors,
                        error = %e,
                        "Checking load balancer status failed"
                    );
                    if consecutive_errors >= policy.max_probe_errors {
                        evaluation.state = GateState::FailedCheckErrors;
                    }
                }
                Ok(status) => {
                    consecutive_errors = 0;
                    debug!(
                        seq = seq,
                        total = total,
                        load_balancer = %load_balancer,
                        status = %status,
                        "Checked load balancer status"
                    );
                    if is_pending(&status) {
                        evaluation.pending_retries += 1;
                        if evaluation.pending_retries >= policy.max_pending_retries {
                            evaluation.state = GateState::FailedPendingTimeout;
                        }
                    } else {
                        evaluation.state = GateState::Ready;
                    }
                    evaluation.last_status = Some(status);
                }
            }

            if !evaluation.state.is_terminal() && !policy.poll_interval.is_zero() {
                tokio::time::sleep(policy.poll_interval).await;
            }
        }

        evaluation.elapsed = start.elapsed();
        evaluation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_prefix() {
        assert!(is_pending("PENDING_CREATE"));
        assert!(is_pending("PENDING_DELETE"));
        assert!(!is_pending("ACTIVE"));
        assert!(!is_pending("ERROR"));
        assert!(!is_pending("pending_create"));
        assert!(!is_pending(""));
    }

    #[test]
    fn test_pre_check_applicability() {
        let applies = |cmd: &str, lb: &str| {
            ReadinessGate::pre_check_applies(&Subcommand::classify(cmd), lb)
        };

        assert!(applies("neutron lbaas-member-create --name mb-1 pl-1", "lb1"));
        assert!(applies("neutron lbaas-loadbalancer-delete lb1", "lb1"));
        assert!(applies("neutron lbaas-loadbalancer-stats lb1", "lb1"));
        assert!(!applies("neutron lbaas-loadbalancer-create --name lb1 subnet", "lb1"));
        assert!(!applies("neutron lbaas-pool-show pl-1", "lb1"));
        assert!(!applies("neutron lbaas-member-list pl-1", "lb1"));
        assert!(!applies("neutron lbaas-member-create pl-1", ""));
    }

    #[test]
    fn test_post_check_applicability() {
        let applies = |cmd: &str, lb: &str| {
            ReadinessGate::post_check_applies(&Subcommand::classify(cmd), lb)
        };

        assert!(applies("neutron lbaas-pool-update pl-1", "lb1"));
        assert!(applies("neutron lbaas-loadbalancer-create --name lb1 s", "lb1"));
        assert!(!applies("neutron lbaas-loadbalancer-delete lb1", "lb1"));
        assert!(!applies("neutron lbaas-member-create pl-1", ""));
        assert!(!applies("neutron lbaas-pool-show pl-1", "lb1"));
        assert!(!applies("neutron net-list", "lb1"));
    }

    #[test]
    fn test_policies() {
        let pre = GatePolicy::default();
        assert_eq!(pre.max_pending_retries, 64);
        assert_eq!(pre.max_probe_errors, 3);

        let post = GatePolicy::post_check(Duration::ZERO);
        assert_eq!(post.max_pending_retries, 32);
        assert_eq!(post.max_probe_errors, 1);
    }

    #[test]
    fn test_failure_reasons() {
        let mut evaluation = GateEvaluation::not_applicable();
        assert!(evaluation.failure_reason("lb1").is_none());

        evaluation.state = GateState::FailedPendingTimeout;
        evaluation.pending_retries = 64;
        evaluation.last_status = Some("PENDING_UPDATE".to_string());
        let reason = evaluation.failure_reason("lb1").unwrap();
        assert!(reason.contains("still PENDING after 64 checks"));
        assert!(reason.contains("PENDING_UPDATE"));
    }
}
