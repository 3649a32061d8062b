//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Scheduler loop configuration
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_EXECUTION_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_JOIN_TIMEOUT_SECS: u64 = 5;

// Event channel configuration
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

// Schedule descriptor bounds
pub const MAX_DAY_OF_WEEK: u8 = 6;
pub const MIN_DAY_OF_MONTH: u8 = 1;
pub const MAX_DAY_OF_MONTH: u8 = 31;
