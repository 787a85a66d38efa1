use async_trait::async_trait;
use lbaas_batchops::readiness::StatusProbe;
use lbaas_batchops::{BatchError, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// One scripted probe answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStep {
    Status(String),
    Error(String),
}

impl ProbeStep {
    pub fn status(status: &str) -> Self {
        Self::Status(status.to_string())
    }

    pub fn error(message: &str) -> Self {
        Self::Error(message.to_string())
    }
}

/// Status probe that plays back a script, then repeats a fallback answer
#[derive(Debug)]
pub struct ScriptedProbe {
    script: Mutex<VecDeque<ProbeStep>>,
    fallback: ProbeStep,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    pub fn new(script: Vec<ProbeStep>, fallback: ProbeStep) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Probe that always reports `status`
    pub fn always(status: &str) -> Self {
        Self::new(Vec::new(), ProbeStep::status(status))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Load balancers probed, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl StatusProbe for ScriptedProbe {
    async fn provisioning_status(&self, load_balancer: &str) -> Result<String> {
        self.calls.lock().push(load_balancer.to_string());
        let step = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match step {
            ProbeStep::Status(status) => Ok(status),
            ProbeStep::Error(message) => Err(BatchError::status_probe(load_balancer, message)),
        }
    }

    fn description(&self) -> &'static str {
        "scripted"
    }
}
