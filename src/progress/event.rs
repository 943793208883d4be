use serde::{Deserialize, Serialize};

/// Remaining time reported before any unit of work has finished
pub const UNKNOWN_REMAINING: i64 = -1;

/// Snapshot of a running job's completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub job_name: String,
    pub percent: u8,
    pub remaining_millis: i64,
}

impl ProgressEvent {
    pub fn new(job_name: impl Into<String>, percent: u8, remaining_millis: i64) -> Self {
        Self {
            job_name: job_name.into(),
            percent: percent.min(100),
            remaining_millis,
        }
    }

    pub fn is_start(&self) -> bool {
        self.percent == 0
    }

    pub fn is_finished(&self) -> bool {
        self.percent == 100
    }
}
