//! Periodic report scheduler with explicit lifecycle management.
//!
//! Drives [`ReportSchedulingService`] on a fixed interval: each tick scans
//! the registry for due jobs and executes them through the service's
//! execution routine. The scan runs inline in the single loop task, so a
//! new tick cannot begin while a previous one is still executing.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use cadenza_core::{ReportExecutor, ReportSchedulingService};
//! use cadenza_infra::scheduling::{ReportScheduler, ReportSchedulerConfig, SchedulerResult};
//!
//! # async fn example(executor: Arc<dyn ReportExecutor>) -> SchedulerResult<()> {
//! let service = Arc::new(ReportSchedulingService::new(executor));
//! let mut scheduler = ReportScheduler::new(
//!     Arc::clone(&service),
//!     ReportSchedulerConfig {
//!         check_interval: Duration::from_secs(60),
//!         ..Default::default()
//!     },
//! );
//!
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.destroy().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use cadenza_core::ReportSchedulingService;
use cadenza_domain::constants::{DEFAULT_CHECK_INTERVAL_SECS, DEFAULT_JOIN_TIMEOUT_SECS};
use cadenza_domain::{SchedulerConfig, SchedulerEvent};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for the report scheduler loop
#[derive(Debug, Clone)]
pub struct ReportSchedulerConfig {
    /// Interval between due-job scans
    pub check_interval: Duration,
    /// Timeout for awaiting the loop task join handle on stop
    pub join_timeout: Duration,
}

impl Default for ReportSchedulerConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
            join_timeout: Duration::from_secs(DEFAULT_JOIN_TIMEOUT_SECS),
        }
    }
}

impl From<&SchedulerConfig> for ReportSchedulerConfig {
    fn from(config: &SchedulerConfig) -> Self {
        Self {
            check_interval: Duration::from_secs(config.check_interval_seconds),
            ..Default::default()
        }
    }
}

/// Report scheduler loop with explicit lifecycle management
///
/// Construction does not arm the timer: no tick runs until [`start`] is
/// called, and a stopped scheduler can be started again. [`destroy`] is
/// the terminal transition; it clears the registry and detaches all event
/// subscribers.
///
/// [`start`]: ReportScheduler::start
/// [`destroy`]: ReportScheduler::destroy
pub struct ReportScheduler {
    service: Arc<ReportSchedulingService>,
    config: ReportSchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl ReportScheduler {
    /// Create a scheduler over the given service
    pub fn new(service: Arc<ReportSchedulingService>, config: ReportSchedulerConfig) -> Self {
        Self {
            service,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the loop, spawning the tick task
    ///
    /// Emits `scheduler:started` with the configured interval.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::AlreadyRunning`] when the loop is active.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!(interval_secs = self.config.check_interval.as_secs(), "Starting report scheduler");

        // Fresh token so the scheduler supports restart after stop
        self.cancellation_token = CancellationToken::new();

        let service = Arc::clone(&self.service);
        let interval = self.config.check_interval;
        let cancel = self.cancellation_token.clone();

        self.service.notifier().emit(SchedulerEvent::SchedulerStarted {
            check_interval_secs: interval.as_secs(),
        });

        let handle = tokio::spawn(async move {
            Self::check_loop(service, interval, cancel).await;
        });
        *self.task_handle.lock().await = Some(handle);

        info!("Report scheduler started");
        Ok(())
    }

    /// Stop the loop gracefully
    ///
    /// Cancels the tick task and awaits it; an in-flight tick completes
    /// before the task exits, and no tick begins afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NotRunning`] when the loop is stopped, or
    /// a timeout/join error when the task does not wind down in time.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        info!("Stopping report scheduler");
        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            let join_timeout = self.config.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|source| SchedulerError::Timeout { duration: join_timeout, source })??;
        }

        info!("Report scheduler stopped");
        Ok(())
    }

    /// Tear the scheduler down: stop the loop, clear every job, and detach
    /// all event subscribers
    ///
    /// After this returns no tick executes and no event is delivered.
    ///
    /// # Errors
    ///
    /// Returns a timeout/join error when a running loop does not wind down.
    #[instrument(skip(self))]
    pub async fn destroy(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            self.stop().await?;
        }

        self.service.clear().await;
        self.service.notifier().close();

        info!("Report scheduler destroyed");
        Ok(())
    }

    /// Check if the loop task is active
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    /// Background tick loop
    ///
    /// Each iteration sleeps for the interval, then runs the scan inline;
    /// the next sleep only starts after the scan finishes, which keeps
    /// ticks non-overlapping and skips any fire times missed by a long
    /// scan.
    async fn check_loop(
        service: Arc<ReportSchedulingService>,
        interval: Duration,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Check loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    let (total_jobs, due_jobs) = service.run_due_jobs().await;
                    if due_jobs > 0 {
                        debug!(total_jobs, due_jobs, "Tick complete");
                    }
                }
            }
        }
    }
}

/// Ensure the loop is cancelled when the scheduler is dropped
impl Drop for ReportScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("ReportScheduler dropped while running; cancelling loop task");
            self.cancellation_token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use cadenza_core::ReportExecutor;
    use cadenza_domain::{
        ReportDefinition, ReportExport, ReportFrequency, ReportSchedule, Result,
    };
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    struct CountingExecutor {
        runs: AtomicUsize,
    }

    impl CountingExecutor {
        fn new() -> Self {
            Self { runs: AtomicUsize::new(0) }
        }

        fn run_count(&self) -> usize {
            self.runs.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReportExecutor for CountingExecutor {
        async fn execute_report_for_export(
            &self,
            report_id: &str,
            format: &str,
        ) -> Result<ReportExport> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(ReportExport {
                report_id: report_id.to_string(),
                format: format.to_string(),
                data: json!({}),
                generated_at: Utc::now(),
            })
        }
    }

    fn hourly_definition(report_id: &str) -> ReportDefinition {
        ReportDefinition {
            report_id: report_id.to_string(),
            schedule: Some(ReportSchedule {
                frequency: ReportFrequency::Hourly,
                time: None,
                day_of_week: None,
                day_of_month: None,
                format: "csv".to_string(),
                recipients: vec![],
            }),
        }
    }

    fn fast_config() -> ReportSchedulerConfig {
        ReportSchedulerConfig {
            check_interval: Duration::from_millis(25),
            join_timeout: Duration::from_secs(2),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn lifecycle_emits_started_and_checking_events() {
        let service = Arc::new(ReportSchedulingService::new(Arc::new(CountingExecutor::new())));
        service.schedule_report(hourly_definition("daily-usage")).await.unwrap();
        let mut rx = service.notifier().subscribe().unwrap();

        let mut scheduler = ReportScheduler::new(Arc::clone(&service), fast_config());
        assert!(!scheduler.is_running());

        scheduler.start().await.unwrap();
        assert!(scheduler.is_running());
        tokio::time::sleep(Duration::from_millis(120)).await;
        scheduler.stop().await.unwrap();
        assert!(!scheduler.is_running());

        let mut saw_started = false;
        let mut checking_ticks = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                SchedulerEvent::SchedulerStarted { check_interval_secs: 0 } => saw_started = true,
                SchedulerEvent::SchedulerChecking { total_jobs: 1, .. } => checking_ticks += 1,
                _ => {}
            }
        }
        assert!(saw_started);
        assert!(checking_ticks >= 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn double_start_is_rejected() {
        let service = Arc::new(ReportSchedulingService::new(Arc::new(CountingExecutor::new())));
        let mut scheduler = ReportScheduler::new(service, fast_config());

        scheduler.start().await.unwrap();
        let err = scheduler.start().await.unwrap_err();
        assert!(matches!(err, SchedulerError::AlreadyRunning));
        scheduler.stop().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stop_when_stopped_is_rejected() {
        let service = Arc::new(ReportSchedulingService::new(Arc::new(CountingExecutor::new())));
        let mut scheduler = ReportScheduler::new(service, fast_config());

        let err = scheduler.stop().await.unwrap_err();
        assert!(matches!(err, SchedulerError::NotRunning));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn restart_after_stop_succeeds() {
        let service = Arc::new(ReportSchedulingService::new(Arc::new(CountingExecutor::new())));
        let mut scheduler = ReportScheduler::new(service, fast_config());

        scheduler.start().await.unwrap();
        scheduler.stop().await.unwrap();
        assert!(!scheduler.is_running());

        scheduler.start().await.unwrap();
        scheduler.stop().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn destroy_clears_jobs_and_detaches_subscribers() {
        let executor = Arc::new(CountingExecutor::new());
        let service = Arc::new(ReportSchedulingService::new(
            Arc::clone(&executor) as Arc<dyn ReportExecutor>
        ));
        service.schedule_report(hourly_definition("doomed")).await.unwrap();
        let mut rx = service.notifier().subscribe().unwrap();

        let mut scheduler = ReportScheduler::new(Arc::clone(&service), fast_config());
        scheduler.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        scheduler.destroy().await.unwrap();

        assert!(!scheduler.is_running());
        assert_eq!(service.get_stats().await.total_jobs, 0);
        assert!(service.notifier().is_closed());

        // No further ticks or events after destroy returns
        let runs_after_destroy = executor.run_count();
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(executor.run_count(), runs_after_destroy);
        assert!(matches!(
            rx.try_recv(),
            Err(tokio::sync::broadcast::error::TryRecvError::Closed)
        ));
    }
}
