//! # Command Templates
//!
//! Turns one templated control-plane command plus `name:spec` variable
//! assignments into the ordered list of concrete commands.

pub mod expander;
pub mod range;
pub mod variables;

pub use expander::CommandTemplate;
pub use range::parse_range;
pub use variables::VariableSet;
