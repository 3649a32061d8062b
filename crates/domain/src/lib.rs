//! # Cadenza Domain
//!
//! Business domain types and models for the Cadenza report scheduler.
//!
//! This crate contains:
//! - Domain data types (ReportSchedule, ScheduledJob, etc.)
//! - The scheduler lifecycle event catalog
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Cadenza crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use events::*;
pub use types::*;
