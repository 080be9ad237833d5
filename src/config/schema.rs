//! Configuration schema definitions.
//!
//! This module defines the complete configuration aggregate for the service.
//! Every `Default` impl carries the documented default for its environment
//! variables, so the loader never has to invent a value of its own.

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener and timeout settings.
    pub server: ServerConfig,

    /// Shared-secret authentication.
    pub auth: AuthConfig,

    /// Cross-origin resource sharing policy.
    pub cors: CorsConfig,

    /// Concurrency limits.
    pub performance: PerformanceConfig,

    /// Log sink settings.
    pub log: LogConfig,

    /// Primary database.
    pub database: DatabaseConfig,

    /// Redis connection string. Empty selects the in-memory store.
    pub redis_dsn: String,
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host (e.g., "0.0.0.0").
    pub host: String,

    /// Bind port. Kept wide so out-of-range input reaches validation.
    pub port: i64,

    /// Read timeout in seconds. Informational: validated and logged, but
    /// the listener does not enforce it.
    pub read_timeout_secs: u64,

    /// Write timeout in seconds, applied as the per-request timeout.
    pub write_timeout_secs: u64,

    /// Idle connection timeout in seconds. Informational: validated and
    /// logged, but the listener does not enforce it.
    pub idle_timeout_secs: u64,

    /// Time allowed for in-flight requests to drain on shutdown, in seconds.
    pub graceful_shutdown_timeout_secs: u64,

    /// False when `IS_SLAVE` is set.
    pub is_master: bool,
}

impl ServerConfig {
    /// `host:port` suitable for binding a listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Host shown to operators; the wildcard address reads as `localhost`.
    pub fn display_host(&self) -> &str {
        if self.host == "0.0.0.0" {
            "localhost"
        } else {
            &self.host
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            read_timeout_secs: 60,
            write_timeout_secs: 600,
            idle_timeout_secs: 120,
            graceful_shutdown_timeout_secs: 10,
            is_master: true,
        }
    }
}

/// Authentication configuration.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret protecting the management API.
    pub key: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("key", &if self.key.is_empty() { "" } else { "<redacted>" })
            .finish()
    }
}

/// CORS configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Attach CORS headers to responses.
    pub enabled: bool,

    /// Allowed origins; `*` allows any.
    pub allowed_origins: Vec<String>,

    /// Allowed request methods.
    pub allowed_methods: Vec<String>,

    /// Allowed request headers; `*` allows any.
    pub allowed_headers: Vec<String>,

    /// Send `Access-Control-Allow-Credentials`.
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            allowed_headers: vec!["*".to_string()],
            allow_credentials: false,
        }
    }
}

/// Performance configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Maximum requests handled at once (must be at least 1).
    pub max_concurrent_requests: i64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 100,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// `text` or `json`.
    pub format: String,

    /// Also write logs to `file_path`.
    pub enable_file: bool,

    /// Log file location, created on demand.
    pub file_path: String,
}

impl LogConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            enable_file: false,
            file_path: "./data/logs/app.log".to_string(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string; the default is a local SQLite file.
    pub dsn: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "./data/loadgate.db".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_host_hides_wildcard() {
        let mut server = ServerConfig::default();
        assert_eq!(server.display_host(), "localhost");

        server.host = "127.0.0.1".into();
        assert_eq!(server.display_host(), "127.0.0.1");
        assert_eq!(server.bind_address(), "127.0.0.1:3001");
    }

    #[test]
    fn test_auth_key_not_in_debug_output() {
        let auth = AuthConfig { key: "sk-secret".into() };
        let printed = format!("{:?}", auth);
        assert!(!printed.contains("sk-secret"));
    }
}
