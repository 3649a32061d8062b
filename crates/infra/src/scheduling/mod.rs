//! Scheduling infrastructure for automated report execution
//!
//! This module provides the periodic loop that drives the registry:
//! - Explicit lifecycle management (start/stop/destroy)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Non-overlapping ticks (the scan runs inline in the loop task)
//! - Structured tracing

pub mod error;
pub mod report_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use report_scheduler::{ReportScheduler, ReportSchedulerConfig};
