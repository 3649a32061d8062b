//! Scheduler lifecycle event catalog
//!
//! Events are published on a typed channel rather than a named-event bus,
//! so subscribers match on variants instead of string topics. The serde
//! tags keep the wire names stable for external consumers (delivery,
//! audit, observability).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ReportExport;

/// Lifecycle events emitted by the scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchedulerEvent {
    /// A job was registered and its first due instant computed
    Scheduled {
        /// Report the job executes
        report_id: String,
        /// Computed due instant
        next_run: DateTime<Utc>,
    },

    /// A job was removed from the registry
    Unscheduled {
        /// Report the job executed
        report_id: String,
    },

    /// A job's schedule was replaced or its enabled flag toggled
    ScheduleUpdated {
        /// Report the job executes
        report_id: String,
        /// Recomputed due instant, present when the descriptor changed
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next_run: Option<DateTime<Utc>>,
        /// New enabled state, present when the flag was toggled
        #[serde(default, skip_serializing_if = "Option::is_none")]
        enabled: Option<bool>,
    },

    /// A due job executed successfully
    ExecutedScheduled {
        /// Report that ran
        report_id: String,
        /// Wall-clock execution duration in milliseconds
        execution_time_ms: u64,
        /// Output format produced
        format: String,
        /// Delivery destinations configured on the schedule
        recipients: Vec<String>,
        /// Due instant computed for the following occurrence
        next_run: DateTime<Utc>,
    },

    /// A job execution failed; the job stays due and retries next tick
    ExecutionFailed {
        /// Report that failed
        report_id: String,
        /// Rendered executor error
        error: String,
        /// Wall-clock execution duration in milliseconds
        execution_time_ms: u64,
    },

    /// A finished export needs delivery by an external collaborator
    DeliveryRequired {
        /// Report that ran
        report_id: String,
        /// Export produced by the executor
        result: ReportExport,
        /// Output format produced
        format: String,
        /// Delivery destinations configured on the schedule
        recipients: Vec<String>,
    },

    /// The scheduler loop started ticking
    #[serde(rename = "scheduler:started")]
    SchedulerStarted {
        /// Tick interval in seconds
        check_interval_secs: u64,
    },

    /// One tick scanned the registry
    #[serde(rename = "scheduler:checking")]
    SchedulerChecking {
        /// Jobs registered at scan time
        total_jobs: usize,
        /// Jobs selected as due in this tick
        due_jobs: usize,
    },
}

impl SchedulerEvent {
    /// Report id the event refers to, when it refers to a single job
    pub fn report_id(&self) -> Option<&str> {
        match self {
            Self::Scheduled { report_id, .. }
            | Self::Unscheduled { report_id }
            | Self::ScheduleUpdated { report_id, .. }
            | Self::ExecutedScheduled { report_id, .. }
            | Self::ExecutionFailed { report_id, .. }
            | Self::DeliveryRequired { report_id, .. } => Some(report_id),
            Self::SchedulerStarted { .. } | Self::SchedulerChecking { .. } => None,
        }
    }
}
