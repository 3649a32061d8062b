//! Report scheduling business logic
//!
//! This module provides the registry half of the scheduler:
//! - Port trait for the external report executor
//! - Typed lifecycle event notifier
//! - The job registry service (create/update/enable/trigger/scan)
//!
//! The periodic loop that drives scans lives in `cadenza-infra`; the
//! service exposes the tick body so the loop stays a thin lifecycle shell.

pub mod notifier;
pub mod ports;
pub mod service;

pub use notifier::EventNotifier;
pub use ports::ReportExecutor;
pub use service::ReportSchedulingService;
