//! Report scheduling service - core business logic
//!
//! Owns the job registry (one job per report id) and the per-job execution
//! routine shared by the periodic loop and manual triggers. The registry
//! lock is never held across the executor await, so external callers can
//! mutate the registry while a tick is executing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cadenza_domain::constants::DEFAULT_EXECUTION_TIMEOUT_SECS;
use cadenza_domain::{
    CadenzaError, ReportDefinition, ReportExport, ReportSchedule, Result, ScheduledJob,
    SchedulerEvent, SchedulerStats,
};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::notifier::EventNotifier;
use super::ports::ReportExecutor;
use crate::cadence;

/// Job registry and execution service
pub struct ReportSchedulingService {
    jobs: RwLock<HashMap<String, ScheduledJob>>,
    executor: Arc<dyn ReportExecutor>,
    notifier: Arc<EventNotifier>,
    execution_timeout: Duration,
}

impl ReportSchedulingService {
    /// Create a new scheduling service
    pub fn new(executor: Arc<dyn ReportExecutor>) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            executor,
            notifier: Arc::new(EventNotifier::new()),
            execution_timeout: Duration::from_secs(DEFAULT_EXECUTION_TIMEOUT_SECS),
        }
    }

    /// Override the per-execution timeout
    pub fn with_execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout = timeout;
        self
    }

    /// Handle to the lifecycle event notifier
    pub fn notifier(&self) -> Arc<EventNotifier> {
        Arc::clone(&self.notifier)
    }

    /// Register a report for recurring execution
    ///
    /// Computes the first due instant from now and emits `scheduled`.
    /// Re-scheduling an already-registered id replaces the existing job.
    ///
    /// # Errors
    ///
    /// Returns `CadenzaError::Config` when the definition carries no
    /// schedule or the schedule cannot produce a due instant; no job is
    /// created and no event is emitted.
    pub async fn schedule_report(&self, definition: ReportDefinition) -> Result<ScheduledJob> {
        let schedule = definition.schedule.ok_or_else(|| {
            CadenzaError::Config(format!("report {} has no schedule", definition.report_id))
        })?;

        let next_run = cadence::next_run(&schedule, Utc::now())?;
        let job = ScheduledJob {
            report_id: definition.report_id,
            schedule,
            next_run,
            last_run: None,
            enabled: true,
        };

        self.jobs.write().await.insert(job.report_id.clone(), job.clone());

        info!(report_id = %job.report_id, next_run = %next_run, "Report scheduled");
        self.notifier
            .emit(SchedulerEvent::Scheduled { report_id: job.report_id.clone(), next_run });

        Ok(job)
    }

    /// Remove a job; returns false when the id is unknown
    pub async fn unschedule_report(&self, report_id: &str) -> bool {
        let removed = self.jobs.write().await.remove(report_id).is_some();

        if removed {
            info!(report_id, "Report unscheduled");
            self.notifier.emit(SchedulerEvent::Unscheduled { report_id: report_id.to_string() });
        } else {
            debug!(report_id, "Unschedule requested for unknown report");
        }

        removed
    }

    /// Enable or disable a job without recomputing its due instant
    ///
    /// Disabled jobs keep their `next_run`/`last_run`; re-enabling does not
    /// recompute them. Returns false when the id is unknown.
    pub async fn set_job_enabled(&self, report_id: &str, enabled: bool) -> bool {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(report_id) else {
            return false;
        };
        job.enabled = enabled;
        drop(jobs);

        debug!(report_id, enabled, "Job enabled flag updated");
        self.notifier.emit(SchedulerEvent::ScheduleUpdated {
            report_id: report_id.to_string(),
            next_run: None,
            enabled: Some(enabled),
        });

        true
    }

    /// Look up a single job
    pub async fn get_scheduled_job(&self, report_id: &str) -> Option<ScheduledJob> {
        self.jobs.read().await.get(report_id).cloned()
    }

    /// List jobs ascending by due instant, optionally filtered by enabled state
    pub async fn list_scheduled_jobs(&self, enabled: Option<bool>) -> Vec<ScheduledJob> {
        let mut jobs: Vec<ScheduledJob> = self
            .jobs
            .read()
            .await
            .values()
            .filter(|job| enabled.map_or(true, |wanted| job.enabled == wanted))
            .cloned()
            .collect();

        jobs.sort_by(|a, b| {
            a.next_run.cmp(&b.next_run).then_with(|| a.report_id.cmp(&b.report_id))
        });
        jobs
    }

    /// Replace a job's schedule and recompute its due instant from now
    ///
    /// Returns false when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns `CadenzaError::Config` when the new schedule cannot produce
    /// a due instant; the existing job is left untouched.
    pub async fn update_schedule(
        &self,
        report_id: &str,
        schedule: ReportSchedule,
    ) -> Result<bool> {
        let next_run = cadence::next_run(&schedule, Utc::now())?;

        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(report_id) else {
            return Ok(false);
        };
        job.schedule = schedule;
        job.next_run = next_run;
        drop(jobs);

        info!(report_id, next_run = %next_run, "Schedule updated");
        self.notifier.emit(SchedulerEvent::ScheduleUpdated {
            report_id: report_id.to_string(),
            next_run: Some(next_run),
            enabled: None,
        });

        Ok(true)
    }

    /// Execute a job immediately, regardless of its due instant
    ///
    /// Goes through the same execution routine as the periodic loop, so a
    /// success reschedules the job and emits the usual events.
    ///
    /// # Errors
    ///
    /// Returns `CadenzaError::NotFound` for an unknown id; executor
    /// failures propagate to the caller instead of being swallowed.
    pub async fn trigger_report(&self, report_id: &str) -> Result<ReportExport> {
        let job = self
            .get_scheduled_job(report_id)
            .await
            .ok_or_else(|| CadenzaError::NotFound(format!("no scheduled job for {report_id}")))?;

        self.execute_job(&job).await
    }

    /// Registry statistics snapshot
    pub async fn get_stats(&self) -> SchedulerStats {
        let jobs = self.jobs.read().await;
        let total_jobs = jobs.len();
        let enabled_jobs = jobs.values().filter(|job| job.enabled).count();
        let next_job = jobs
            .values()
            .filter(|job| job.enabled)
            .min_by(|a, b| a.next_run.cmp(&b.next_run))
            .cloned();

        SchedulerStats {
            total_jobs,
            enabled_jobs,
            disabled_jobs: total_jobs - enabled_jobs,
            next_job,
        }
    }

    /// Scan and execute jobs due as of now; returns (total, due) counts
    pub async fn run_due_jobs(&self) -> (usize, usize) {
        self.run_due_jobs_at(Utc::now()).await
    }

    /// Scan and execute jobs due as of `now`
    ///
    /// Due jobs run sequentially, ascending by due instant; a failing job
    /// never aborts the remainder of the scan. Emits `scheduler:checking`
    /// with the scan counts.
    pub async fn run_due_jobs_at(&self, now: DateTime<Utc>) -> (usize, usize) {
        let (total_jobs, mut due) = {
            let jobs = self.jobs.read().await;
            let due: Vec<ScheduledJob> = jobs
                .values()
                .filter(|job| job.enabled && job.next_run <= now)
                .cloned()
                .collect();
            (jobs.len(), due)
        };

        due.sort_by(|a, b| {
            a.next_run.cmp(&b.next_run).then_with(|| a.report_id.cmp(&b.report_id))
        });
        let due_jobs = due.len();

        debug!(total_jobs, due_jobs, "Scanning for due reports");
        self.notifier.emit(SchedulerEvent::SchedulerChecking { total_jobs, due_jobs });

        for job in due {
            if let Err(err) = self.execute_job(&job).await {
                // execute_job already published execution_failed; log and
                // keep processing the remaining due jobs
                error!(report_id = %job.report_id, error = %err, "Scheduled execution failed");
            }
        }

        (total_jobs, due_jobs)
    }

    /// Remove every job (teardown path)
    pub async fn clear(&self) {
        let mut jobs = self.jobs.write().await;
        let cleared = jobs.len();
        jobs.clear();
        drop(jobs);
        debug!(cleared, "Job registry cleared");
    }

    /// Shared execution routine for ticks and manual triggers
    ///
    /// On success, `last_run` becomes now and `next_run` is recomputed from
    /// it; `executed_scheduled` and `delivery_required` are emitted. On
    /// failure, the job's state is untouched (it stays due and retries at
    /// the next tick with no backoff) and `execution_failed` is emitted
    /// exactly once.
    async fn execute_job(&self, job: &ScheduledJob) -> Result<ReportExport> {
        let started = Instant::now();
        debug!(report_id = %job.report_id, format = %job.schedule.format, "Executing report");

        let outcome = tokio::time::timeout(
            self.execution_timeout,
            self.executor.execute_report_for_export(&job.report_id, &job.schedule.format),
        )
        .await;

        let export = match outcome {
            Ok(Ok(export)) => export,
            Ok(Err(err)) => {
                self.emit_execution_failed(&job.report_id, &err, started);
                return Err(err);
            }
            Err(_elapsed) => {
                let err = CadenzaError::Execution(format!(
                    "report {} timed out after {:?}",
                    job.report_id, self.execution_timeout
                ));
                self.emit_execution_failed(&job.report_id, &err, started);
                return Err(err);
            }
        };

        let execution_time_ms = elapsed_ms(started);
        let last_run = Utc::now();

        // Recompute from the job's current schedule, which may have been
        // replaced while the executor ran; fall back to the snapshot when
        // the job was unscheduled mid-flight
        let recomputed = {
            let mut jobs = self.jobs.write().await;
            match jobs.get_mut(&job.report_id) {
                Some(entry) => cadence::next_run(&entry.schedule, last_run).map(|next_run| {
                    entry.last_run = Some(last_run);
                    entry.next_run = next_run;
                    next_run
                }),
                None => cadence::next_run(&job.schedule, last_run),
            }
        };
        let next_run = match recomputed {
            Ok(next_run) => next_run,
            // A schedule that cannot produce a due instant fails the
            // execution like any other error: one execution_failed event,
            // job state untouched
            Err(err) => {
                self.emit_execution_failed(&job.report_id, &err, started);
                return Err(err);
            }
        };

        info!(
            report_id = %job.report_id,
            execution_time_ms,
            next_run = %next_run,
            "Report executed"
        );
        self.notifier.emit(SchedulerEvent::ExecutedScheduled {
            report_id: job.report_id.clone(),
            execution_time_ms,
            format: job.schedule.format.clone(),
            recipients: job.schedule.recipients.clone(),
            next_run,
        });
        self.notifier.emit(SchedulerEvent::DeliveryRequired {
            report_id: job.report_id.clone(),
            result: export.clone(),
            format: job.schedule.format.clone(),
            recipients: job.schedule.recipients.clone(),
        });

        Ok(export)
    }

    fn emit_execution_failed(&self, report_id: &str, err: &CadenzaError, started: Instant) {
        let execution_time_ms = elapsed_ms(started);
        warn!(report_id, error = %err, execution_time_ms, "Report execution failed");
        self.notifier.emit(SchedulerEvent::ExecutionFailed {
            report_id: report_id.to_string(),
            error: err.to_string(),
            execution_time_ms,
        });
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
