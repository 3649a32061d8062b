//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CHECK_INTERVAL_SECS, DEFAULT_EXECUTION_TIMEOUT_SECS};

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between due-job scans
    pub check_interval_seconds: u64,
    /// Seconds a single report execution may take before it is abandoned
    pub execution_timeout_seconds: u64,
    /// Whether the scheduler loop should be started at all
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            check_interval_seconds: DEFAULT_CHECK_INTERVAL_SECS,
            execution_timeout_seconds: DEFAULT_EXECUTION_TIMEOUT_SECS,
            enabled: true,
        }
    }
}
