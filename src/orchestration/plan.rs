//! Batch plans: the concrete commands of one invocation.

use crate::template::{CommandTemplate, VariableSet};
use tracing::{info, warn};

/// Ordered commands plus the load balancer they are gated on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    load_balancer: String,
    commands: Vec<String>,
}

impl BatchPlan {
    pub fn new(load_balancer: impl Into<String>, commands: Vec<String>) -> Self {
        Self {
            load_balancer: load_balancer.into(),
            commands,
        }
    }

    /// Expand `template` against `variables`
    pub fn build(
        template: &CommandTemplate,
        variables: &VariableSet,
        load_balancer: impl Into<String>,
    ) -> Self {
        let unbound = variables.unbound();
        if !unbound.is_empty() {
            warn!(
                variables = ?unbound,
                "Variables without values; their branches generate no commands"
            );
        }

        let commands = template.expand(variables);
        info!(
            template = %template,
            commands = commands.len(),
            "Generated command list"
        );

        Self::new(load_balancer, commands)
    }

    pub fn load_balancer(&self) -> &str {
        &self.load_balancer
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
