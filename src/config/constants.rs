//! Fixed limits applied during validation.

/// Bounds enforced on a loaded configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Lowest acceptable listen port.
    pub min_port: i64,
    /// Highest acceptable listen port.
    pub max_port: i64,
    /// Lowest acceptable `MAX_CONCURRENT_REQUESTS`.
    pub min_concurrent_requests: i64,
    /// Graceful-shutdown timeouts below this are raised to it.
    pub min_graceful_shutdown_secs: u64,
}

/// The limits used by [`crate::config::validation::validate`].
pub const LIMITS: Limits = Limits {
    min_port: 1,
    max_port: 65535,
    min_concurrent_requests: 1,
    min_graceful_shutdown_secs: 10,
};
