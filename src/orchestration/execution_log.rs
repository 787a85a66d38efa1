//! Append-only log of execution records.
//!
//! The orchestrator is the only writer. The interruption listener holds a
//! clone and takes a snapshot; a snapshot always contains whole records in
//! generation order.

use crate::command::ExecutionRecord;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    records: Arc<RwLock<Vec<ExecutionRecord>>>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: ExecutionRecord) {
        self.records.write().push(record);
    }

    /// Copy of every record appended so far
    pub fn snapshot(&self) -> Vec<ExecutionRecord> {
        self.records.read().clone()
    }

    /// Records whose command exited non-zero
    pub fn failed(&self) -> Vec<ExecutionRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| !r.succeeded())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
