//! Port interfaces for report scheduling
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use cadenza_domain::{ReportExport, Result};

/// Trait for executing a report and producing an export
///
/// The scheduler never renders report content itself; implementations live
/// behind this seam (database queries, rendering pipelines, remote calls).
#[async_trait]
pub trait ReportExecutor: Send + Sync {
    /// Execute the report identified by `report_id` in the given format
    async fn execute_report_for_export(&self, report_id: &str, format: &str)
        -> Result<ReportExport>;
}
