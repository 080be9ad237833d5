//! Configuration validation.
//!
//! # Responsibilities
//! - Apply corrections that are not failures (graceful-shutdown floor)
//! - Check value ranges (port, concurrency) and required secrets
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Each violation is logged on its own before the aggregate is returned
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::constants::{Limits, LIMITS};
use crate::config::schema::AppConfig;

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("port must be between {min}-{max}")]
    PortOutOfRange { port: i64, min: i64, max: i64 },

    #[error("max concurrent requests cannot be less than {min}")]
    TooFewConcurrentRequests { value: i64, min: i64 },

    #[error("AUTH_KEY is required and cannot be empty")]
    MissingAuthKey,
}

/// Every violation found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_messages(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raise the graceful-shutdown timeout to the floor.
///
/// Returns `true` if the value changed.
pub fn clamp_graceful_shutdown(config: &mut AppConfig, limits: &Limits) -> bool {
    let current = config.server.graceful_shutdown_timeout_secs;
    if current >= limits.min_graceful_shutdown_secs {
        return false;
    }
    tracing::warn!(
        configured_secs = current,
        minimum_secs = limits.min_graceful_shutdown_secs,
        "SERVER_GRACEFUL_SHUTDOWN_TIMEOUT is too short, resetting to minimum"
    );
    config.server.graceful_shutdown_timeout_secs = limits.min_graceful_shutdown_secs;
    true
}

/// Run every rule against `config` without modifying it.
pub fn check(config: &AppConfig, limits: &Limits) -> Vec<Violation> {
    let mut violations = Vec::new();

    let port = config.server.port;
    if port < limits.min_port || port > limits.max_port {
        violations.push(Violation::PortOutOfRange {
            port,
            min: limits.min_port,
            max: limits.max_port,
        });
    }

    let max_concurrent = config.performance.max_concurrent_requests;
    if max_concurrent < limits.min_concurrent_requests {
        violations.push(Violation::TooFewConcurrentRequests {
            value: max_concurrent,
            min: limits.min_concurrent_requests,
        });
    }

    if config.auth.key.is_empty() {
        violations.push(Violation::MissingAuthKey);
    }

    violations
}

/// Correct, then validate, a freshly loaded configuration.
pub fn validate(config: &mut AppConfig) -> Result<(), ValidationError> {
    clamp_graceful_shutdown(config, &LIMITS);

    let violations = check(config, &LIMITS);
    if violations.is_empty() {
        return Ok(());
    }

    tracing::error!(count = violations.len(), "Configuration validation failed");
    for violation in &violations {
        tracing::error!("   - {}", violation);
    }
    Err(ValidationError { violations })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.key = "secret".into();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        let mut config = valid_config();
        assert!(validate(&mut config).is_ok());
    }

    #[test]
    fn test_port_range() {
        let mut config = valid_config();
        config.server.port = 70000;
        let err = validate(&mut config).unwrap_err();
        assert_eq!(err.to_string(), "port must be between 1-65535");

        config.server.port = 0;
        assert!(validate(&mut config).is_err());

        config.server.port = 3001;
        assert!(validate(&mut config).is_ok());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let mut config = valid_config();
        config.auth.key.clear();
        config.performance.max_concurrent_requests = 0;

        let err = validate(&mut config).unwrap_err();
        assert_eq!(err.violations().len(), 2);
        assert_eq!(
            err.to_string(),
            "max concurrent requests cannot be less than 1; AUTH_KEY is required and cannot be empty"
        );
    }

    #[test]
    fn test_graceful_shutdown_is_clamped_not_rejected() {
        for secs in [0, 1, 9] {
            let mut config = valid_config();
            config.server.graceful_shutdown_timeout_secs = secs;
            assert!(validate(&mut config).is_ok());
            assert_eq!(config.server.graceful_shutdown_timeout_secs, 10);
        }

        let mut config = valid_config();
        config.server.graceful_shutdown_timeout_secs = 45;
        assert!(!clamp_graceful_shutdown(&mut config, &LIMITS));
        assert_eq!(config.server.graceful_shutdown_timeout_secs, 45);
    }

    #[test]
    fn test_clamp_applies_even_when_invalid() {
        let mut config = AppConfig::default();
        config.server.graceful_shutdown_timeout_secs = 2;
        assert!(validate(&mut config).is_err());
        assert_eq!(config.server.graceful_shutdown_timeout_secs, 10);
    }
}
