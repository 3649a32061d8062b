//! Minimal end-to-end scheduler run with a stub executor.
//!
//! Schedules a daily report, triggers it once by hand, then lets the loop
//! tick for a few seconds before tearing everything down.
//!
//! Run with: `cargo run -p cadenza-infra --example scheduler_demo`

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use cadenza_core::{ReportExecutor, ReportSchedulingService};
use cadenza_domain::{
    ReportDefinition, ReportExport, ReportFrequency, ReportSchedule, Result,
};
use cadenza_infra::scheduling::{ReportScheduler, ReportSchedulerConfig};
use chrono::Utc;
use serde_json::json;
use tracing::info;

struct DemoExecutor;

#[async_trait]
impl ReportExecutor for DemoExecutor {
    async fn execute_report_for_export(
        &self,
        report_id: &str,
        format: &str,
    ) -> Result<ReportExport> {
        Ok(ReportExport {
            report_id: report_id.to_string(),
            format: format.to_string(),
            data: json!({ "rows": 7 }),
            generated_at: Utc::now(),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let service = Arc::new(ReportSchedulingService::new(Arc::new(DemoExecutor)));

    let mut events = service.notifier().subscribe().context("notifier already closed")?;
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!(?event, "scheduler event");
        }
    });

    service
        .schedule_report(ReportDefinition {
            report_id: "daily-usage".to_string(),
            schedule: Some(ReportSchedule {
                frequency: ReportFrequency::Daily,
                time: Some("09:00".to_string()),
                day_of_week: None,
                day_of_month: None,
                format: "pdf".to_string(),
                recipients: vec!["ops@example.com".to_string()],
            }),
        })
        .await?;

    let export = service.trigger_report("daily-usage").await?;
    info!(report_id = %export.report_id, "manual trigger complete");

    let mut scheduler = ReportScheduler::new(
        Arc::clone(&service),
        ReportSchedulerConfig { check_interval: Duration::from_secs(2), ..Default::default() },
    );
    scheduler.start().await?;
    tokio::time::sleep(Duration::from_secs(5)).await;
    scheduler.destroy().await?;

    Ok(())
}
