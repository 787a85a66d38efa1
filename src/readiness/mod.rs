//! # Readiness
//!
//! Status probes and the polling gate that keeps commands from racing a load
//! balancer's in-flight asynchronous transition.

pub mod gate;
pub mod probe;
pub mod states;

pub use gate::{is_pending, GateEvaluation, GatePolicy, ReadinessGate};
pub use probe::{CliStatusProbe, DatabaseStatusProbe, StatusProbe};
pub use states::GateState;
