use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One steady-state response time, numbered in arrival order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyObservation {
    pub sequence_index: u64,
    pub elapsed_millis: u64,
}

/// Average latency over one closed batch of observations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// 1-based batch number
    pub batch_index: u64,
    /// `total_millis / batch_size`, truncated
    pub average_millis: u64,
    pub total_millis: u64,
    pub batch_size: usize,
    pub emitted_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn new(batch_index: u64, total_millis: u64, batch_size: usize) -> Self {
        Self {
            batch_index,
            average_millis: total_millis / batch_size.max(1) as u64,
            total_millis,
            batch_size,
            emitted_at: Utc::now(),
        }
    }
}
