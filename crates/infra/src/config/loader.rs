//! Configuration loader
//!
//! Loads scheduler configuration from environment variables, falling back
//! to compiled defaults for anything unset.
//!
//! ## Environment Variables
//! - `CADENZA_CHECK_INTERVAL`: Seconds between due-job scans
//! - `CADENZA_EXECUTION_TIMEOUT`: Seconds a single execution may take
//! - `CADENZA_SCHEDULER_ENABLED`: Whether the loop starts (true/false)

use cadenza_domain::{CadenzaError, Result, SchedulerConfig};

/// Load configuration, preferring environment variables over defaults
///
/// # Errors
/// Returns `CadenzaError::Config` when a set variable fails to parse.
pub fn load() -> Result<SchedulerConfig> {
    let config = load_from_env()?;
    tracing::info!(
        check_interval_seconds = config.check_interval_seconds,
        enabled = config.enabled,
        "Scheduler configuration loaded"
    );
    Ok(config)
}

/// Load configuration from environment variables
///
/// Unset variables fall back to the defaults in
/// [`SchedulerConfig::default`].
///
/// # Errors
/// Returns `CadenzaError::Config` when a set variable has an invalid value.
pub fn load_from_env() -> Result<SchedulerConfig> {
    let defaults = SchedulerConfig::default();

    Ok(SchedulerConfig {
        check_interval_seconds: env_u64("CADENZA_CHECK_INTERVAL", defaults.check_interval_seconds)?,
        execution_timeout_seconds: env_u64(
            "CADENZA_EXECUTION_TIMEOUT",
            defaults.execution_timeout_seconds,
        )?,
        enabled: env_bool("CADENZA_SCHEDULER_ENABLED", defaults.enabled),
    })
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|err| CadenzaError::Config(format!("invalid {name}: {err}"))),
        Err(_) => Ok(default),
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|raw| matches!(raw.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_unset() {
        let config = load_from_env().unwrap();
        assert_eq!(config.check_interval_seconds, 60);
        assert_eq!(config.execution_timeout_seconds, 300);
        assert!(config.enabled);
    }

    #[test]
    fn env_u64_rejects_garbage() {
        std::env::set_var("CADENZA_TEST_GARBAGE_INTERVAL", "soon");
        let err = env_u64("CADENZA_TEST_GARBAGE_INTERVAL", 60).unwrap_err();
        assert!(matches!(err, CadenzaError::Config(_)));
        std::env::remove_var("CADENZA_TEST_GARBAGE_INTERVAL");
    }

    #[test]
    fn env_bool_parses_common_truthy_values() {
        std::env::set_var("CADENZA_TEST_ENABLED_FLAG", "YES");
        assert!(env_bool("CADENZA_TEST_ENABLED_FLAG", false));
        std::env::set_var("CADENZA_TEST_ENABLED_FLAG", "off");
        assert!(!env_bool("CADENZA_TEST_ENABLED_FLAG", true));
        std::env::remove_var("CADENZA_TEST_ENABLED_FLAG");
    }
}
