//! Core types for report scheduling
//!
//! This module centralizes the data model shared by the registry service
//! and the scheduler loop:
//! - Schedule descriptors (frequency, time-of-day, day targeting)
//! - Scheduled job state
//! - Executor output
//! - Registry statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/* -------------------------------------------------------------------------- */
/* Schedule Descriptor */
/* -------------------------------------------------------------------------- */

/// Recurrence frequency for a scheduled report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFrequency {
    /// Every hour, on the hour
    Hourly,
    /// Once per day
    Daily,
    /// Once per week, on a configured weekday
    Weekly,
    /// Once per month, on a configured day of month
    Monthly,
}

/// Immutable schedule descriptor attached to a report
///
/// Descriptors are treated as values: an update replaces the descriptor
/// wholesale rather than mutating it in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSchedule {
    /// Recurrence frequency
    pub frequency: ReportFrequency,

    /// Time-of-day in 24h "HH:MM" form, used by daily/weekly/monthly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Target weekday for weekly schedules, 0-6 with 0 = Sunday
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,

    /// Target day for monthly schedules, 1-31
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u8>,

    /// Output format identifier, passed through to the executor
    pub format: String,

    /// Ordered delivery destinations, opaque to the scheduler
    #[serde(default)]
    pub recipients: Vec<String>,
}

/* -------------------------------------------------------------------------- */
/* Scheduled Job */
/* -------------------------------------------------------------------------- */

/// Mutable scheduling state for one report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledJob {
    /// Unique report identifier; doubles as the registry key
    pub report_id: String,

    /// Current schedule descriptor
    pub schedule: ReportSchedule,

    /// Next due instant; the job is due when `next_run <= now`
    pub next_run: DateTime<Utc>,

    /// Most recent successful execution, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,

    /// Disabled jobs are retained but never selected as due
    pub enabled: bool,
}

/// Input to `schedule_report`
///
/// The schedule is optional at this boundary so that an absent descriptor
/// can be rejected as a configuration error rather than a type error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDefinition {
    /// Unique report identifier
    pub report_id: String,

    /// Schedule descriptor; required for scheduling to succeed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ReportSchedule>,
}

/* -------------------------------------------------------------------------- */
/* Executor Output */
/* -------------------------------------------------------------------------- */

/// Result of a single report execution
///
/// The payload is opaque to the scheduler; it is forwarded unchanged to
/// delivery subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportExport {
    /// Report that was executed
    pub report_id: String,

    /// Output format the executor produced
    pub format: String,

    /// Opaque export payload
    pub data: serde_json::Value,

    /// Instant the export was produced
    pub generated_at: DateTime<Utc>,
}

/* -------------------------------------------------------------------------- */
/* Registry Statistics */
/* -------------------------------------------------------------------------- */

/// Registry statistics snapshot
///
/// Primarily used for monitoring and debugging surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerStats {
    /// Total number of registered jobs
    pub total_jobs: usize,

    /// Number of enabled jobs
    pub enabled_jobs: usize,

    /// Number of disabled jobs
    pub disabled_jobs: usize,

    /// Enabled job with the earliest `next_run`, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_job: Option<ScheduledJob>,
}
