//! # Cadenza Core
//!
//! Business logic for the Cadenza report scheduler.
//!
//! This crate contains:
//! - The cadence calculator (pure next-due-instant arithmetic)
//! - Port traits at the core/infra seam (report execution)
//! - The typed lifecycle event notifier
//! - The job registry service
//!
//! ## Architecture
//! - Depends only on `cadenza-domain` internally
//! - No I/O beyond the executor port; infrastructure drives the loop

pub mod cadence;
pub mod scheduling;

pub use scheduling::notifier::EventNotifier;
pub use scheduling::ports::ReportExecutor;
pub use scheduling::service::ReportSchedulingService;
