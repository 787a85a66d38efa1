//! Status probes: read a load balancer's current provisioning status.

use crate::command::{CommandExecutor, ResourceKind};
use crate::constants::control_plane::LOADBALANCER_SHOW;
use crate::database::ProvisioningStatusLookup;
use crate::error::{BatchError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// Source of provisioning status for the readiness gate
#[async_trait]
pub trait StatusProbe: Send + Sync {
    /// Current provisioning status of the load balancer, by id or name
    async fn provisioning_status(&self, load_balancer: &str) -> Result<String>;

    /// Get a description of this probe for logging
    fn description(&self) -> &'static str;
}

/// Fields of `lbaas-loadbalancer-show --format json` the probe cares about
#[derive(Debug, Clone, Deserialize)]
struct ShowResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    provisioning_status: String,
}

/// Probe that re-runs the control-plane CLI: `<binary> lbaas-loadbalancer-show <lb>`
pub struct CliStatusProbe {
    executor: Arc<dyn CommandExecutor>,
    binary: String,
}

impl CliStatusProbe {
    pub fn new(executor: Arc<dyn CommandExecutor>, binary: impl Into<String>) -> Self {
        Self {
            executor,
            binary: binary.into(),
        }
    }

    /// Command line used to probe `load_balancer`
    pub fn probe_command(&self, load_balancer: &str) -> String {
        format!("{} {LOADBALANCER_SHOW} {load_balancer}", self.binary)
    }
}

#[async_trait]
impl StatusProbe for CliStatusProbe {
    async fn provisioning_status(&self, load_balancer: &str) -> Result<String> {
        let output = self
            .executor
            .execute(&self.probe_command(load_balancer))
            .await;

        if !output.succeeded() {
            return Err(BatchError::status_probe(
                load_balancer,
                format!("exit code {}: {}", output.exit_code, output.stderr.trim()),
            ));
        }

        let response: ShowResponse = serde_json::from_str(&output.stdout).map_err(|e| {
            BatchError::status_probe(load_balancer, format!("unreadable show output: {e}"))
        })?;
        tracing::trace!(
            id = response.id.as_deref().unwrap_or(""),
            name = response.name.as_deref().unwrap_or(""),
            status = %response.provisioning_status,
            "Parsed load balancer show output"
        );

        Ok(response.provisioning_status)
    }

    fn description(&self) -> &'static str {
        "control-plane CLI (lbaas-loadbalancer-show)"
    }
}

/// Probe that reads the provisioning status straight from the database
pub struct DatabaseStatusProbe {
    lookup: ProvisioningStatusLookup,
}

impl DatabaseStatusProbe {
    pub fn new(lookup: ProvisioningStatusLookup) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl StatusProbe for DatabaseStatusProbe {
    async fn provisioning_status(&self, load_balancer: &str) -> Result<String> {
        self.lookup
            .provisioning_status(ResourceKind::LoadBalancer, load_balancer)
            .await
            .map_err(|e| BatchError::status_probe(load_balancer, e.to_string()))
    }

    fn description(&self) -> &'static str {
        "database (lbaas_loadbalancers)"
    }
}
