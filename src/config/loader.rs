//! Configuration loading from the environment.
//!
//! # Responsibilities
//! - Read the settings file into a layer below the real environment
//! - Read every recognized variable into an [`AppConfig`]
//!
//! # Design Decisions
//! - Loading never fails; absent or malformed values yield the defaults
//!   carried by the schema's `Default` impls
//! - `AUTH_KEY` has no loader default so validation can report it missing

use std::path::Path;

use crate::config::env::{EnvStore, MapEnv};
use crate::config::parse::{parse_array, parse_boolean, parse_integer};
use crate::config::schema::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, LogConfig, PerformanceConfig, ServerConfig,
};

/// Recognized environment variable names.
pub mod keys {
    pub const PORT: &str = "PORT";
    pub const HOST: &str = "HOST";
    pub const SERVER_READ_TIMEOUT: &str = "SERVER_READ_TIMEOUT";
    pub const SERVER_WRITE_TIMEOUT: &str = "SERVER_WRITE_TIMEOUT";
    pub const SERVER_IDLE_TIMEOUT: &str = "SERVER_IDLE_TIMEOUT";
    pub const SERVER_GRACEFUL_SHUTDOWN_TIMEOUT: &str = "SERVER_GRACEFUL_SHUTDOWN_TIMEOUT";
    pub const IS_SLAVE: &str = "IS_SLAVE";
    pub const AUTH_KEY: &str = "AUTH_KEY";
    pub const MAX_CONCURRENT_REQUESTS: &str = "MAX_CONCURRENT_REQUESTS";
    pub const ENABLE_CORS: &str = "ENABLE_CORS";
    pub const ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
    pub const ALLOWED_METHODS: &str = "ALLOWED_METHODS";
    pub const ALLOWED_HEADERS: &str = "ALLOWED_HEADERS";
    pub const ALLOW_CREDENTIALS: &str = "ALLOW_CREDENTIALS";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    pub const LOG_ENABLE_FILE: &str = "LOG_ENABLE_FILE";
    pub const LOG_FILE_PATH: &str = "LOG_FILE_PATH";
    pub const DATABASE_DSN: &str = "DATABASE_DSN";
    pub const REDIS_DSN: &str = "REDIS_DSN";
}

/// Read the settings file into its own layer.
///
/// The process environment is never written; callers stack the result under
/// the real environment so existing variables always win. A missing or
/// unreadable file yields an empty layer.
pub fn load_settings_file(path: &Path) -> MapEnv {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => {
            tracing::debug!(path = %path.display(), "Settings file not found");
            return MapEnv::new();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to open settings file");
            return MapEnv::new();
        }
    };

    let mut vars = MapEnv::new();
    for entry in entries {
        match entry {
            Ok((key, value)) => vars.insert(key, value),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Skipping malformed settings line"
                );
            }
        }
    }

    tracing::debug!(path = %path.display(), variables = vars.len(), "Settings file loaded");
    vars
}

/// Build a configuration from the variables in `env`.
pub fn load_from_env(env: &dyn EnvStore) -> AppConfig {
    let var = |key: &str| env.get_or_empty(key);
    let or_default = |key: &str, default: String| match env.get(key) {
        Some(v) if !v.is_empty() => v,
        _ => default,
    };

    let server = ServerConfig::default();
    let cors = CorsConfig::default();
    let performance = PerformanceConfig::default();
    let log = LogConfig::default();
    let database = DatabaseConfig::default();

    AppConfig {
        server: ServerConfig {
            is_master: !parse_boolean(&var(keys::IS_SLAVE), !server.is_master),
            port: parse_integer(&var(keys::PORT), server.port),
            host: or_default(keys::HOST, server.host),
            read_timeout_secs: parse_integer(
                &var(keys::SERVER_READ_TIMEOUT),
                server.read_timeout_secs,
            ),
            write_timeout_secs: parse_integer(
                &var(keys::SERVER_WRITE_TIMEOUT),
                server.write_timeout_secs,
            ),
            idle_timeout_secs: parse_integer(
                &var(keys::SERVER_IDLE_TIMEOUT),
                server.idle_timeout_secs,
            ),
            graceful_shutdown_timeout_secs: parse_integer(
                &var(keys::SERVER_GRACEFUL_SHUTDOWN_TIMEOUT),
                server.graceful_shutdown_timeout_secs,
            ),
        },
        auth: AuthConfig {
            key: var(keys::AUTH_KEY),
        },
        cors: CorsConfig {
            enabled: parse_boolean(&var(keys::ENABLE_CORS), cors.enabled),
            allowed_origins: parse_array(&var(keys::ALLOWED_ORIGINS), cors.allowed_origins),
            allowed_methods: parse_array(&var(keys::ALLOWED_METHODS), cors.allowed_methods),
            allowed_headers: parse_array(&var(keys::ALLOWED_HEADERS), cors.allowed_headers),
            allow_credentials: parse_boolean(&var(keys::ALLOW_CREDENTIALS), cors.allow_credentials),
        },
        performance: PerformanceConfig {
            max_concurrent_requests: parse_integer(
                &var(keys::MAX_CONCURRENT_REQUESTS),
                performance.max_concurrent_requests,
            ),
        },
        log: LogConfig {
            level: or_default(keys::LOG_LEVEL, log.level),
            format: or_default(keys::LOG_FORMAT, log.format),
            enable_file: parse_boolean(&var(keys::LOG_ENABLE_FILE), log.enable_file),
            file_path: or_default(keys::LOG_FILE_PATH, log.file_path),
        },
        database: DatabaseConfig {
            dsn: or_default(keys::DATABASE_DSN, database.dsn),
        },
        redis_dsn: var(keys::REDIS_DSN),
    }
}
