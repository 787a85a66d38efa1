use async_trait::async_trait;
use chrono::Utc;
use lbaas_batchops::command::{CommandExecutor, CommandOutput};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

/// Executor that records every command line and answers from a table
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    executed: Mutex<Vec<String>>,
    /// Exit codes for commands containing the key
    failures: HashMap<String, (i32, String)>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every command containing `needle` exit with `code`
    pub fn failing_on(mut self, needle: &str, code: i32, stderr: &str) -> Self {
        self.failures
            .insert(needle.to_string(), (code, stderr.to_string()));
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().clone()
    }
}

#[async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn execute(&self, command: &str) -> CommandOutput {
        self.executed.lock().push(command.to_string());

        let failure = self
            .failures
            .iter()
            .find(|(needle, _)| command.contains(needle.as_str()))
            .map(|(_, failure)| failure.clone());

        let (exit_code, stderr, stdout) = match failure {
            Some((code, stderr)) => (code, stderr, String::new()),
            None => (0, String::new(), r#"{"id": "generated"}"#.to_string()),
        };

        CommandOutput {
            stdout,
            stderr,
            exit_code,
            duration: Duration::from_millis(5),
            started_at: Utc::now(),
        }
    }
}
