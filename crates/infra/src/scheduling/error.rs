//! Scheduler error types

use std::time::Duration;

use cadenza_domain::CadenzaError;
use thiserror::Error;
use tokio::task::JoinError;
use tokio::time::error::Elapsed;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler is already running
    #[error("Scheduler already running")]
    AlreadyRunning,

    /// Scheduler is not running
    #[error("Scheduler not running")]
    NotRunning,

    /// Operation timed out
    #[error("Operation timed out after {duration:?}")]
    Timeout {
        /// Timeout that elapsed
        duration: Duration,
        /// Underlying timer error
        source: Elapsed,
    },

    /// Task join failed
    #[error("Task join failed: {0}")]
    TaskJoinFailed(#[from] JoinError),
}

impl From<SchedulerError> for CadenzaError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                Self::Config(err.to_string())
            }
            SchedulerError::Timeout { .. } | SchedulerError::TaskJoinFailed(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
