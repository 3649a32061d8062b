//! # Cadenza Infra
//!
//! Infrastructure for the Cadenza report scheduler.
//!
//! This crate contains:
//! - The periodic scheduler loop with explicit lifecycle management
//! - Scheduler-specific error types
//! - Environment-based configuration loading
//!
//! ## Architecture
//! - Drives `cadenza-core` business logic; owns no scheduling decisions
//! - Explicit start/stop/destroy lifecycle with join-handle tracking
//! - Cancellation token support on the loop task

pub mod config;
pub mod scheduling;

pub use scheduling::{ReportScheduler, ReportSchedulerConfig, SchedulerError, SchedulerResult};
