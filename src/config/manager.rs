//! The configuration facade shared by the rest of the service.
//!
//! # Responsibilities
//! - Run bootstrap → load → validate on creation and on every reload
//! - Publish the validated snapshot atomically
//! - Hand out copies of each configuration section
//!
//! # Design Decisions
//! - Snapshots are `Arc<AppConfig>` behind `ArcSwap`: readers never block
//!   and never observe a half-built aggregate
//! - A reload that fails validation leaves the previous snapshot in place
//! - Reloads are serialized; the interactive bootstrap runs at most once

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use thiserror::Error;

use crate::config::bootstrap::{required_defaults, Bootstrapper, Console, LineConsole};
use crate::config::env::{EnvStore, Layered, MapEnv, ProcessEnv};
use crate::config::loader::{load_from_env, load_settings_file};
use crate::config::schema::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, LogConfig, PerformanceConfig, ServerConfig,
};
use crate::config::validation::{validate, ValidationError};
use crate::observability::logging::SilentMode;

/// Default settings file location, relative to the working directory.
pub const DEFAULT_SETTINGS_PATH: &str = ".env";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Everything a [`ConfigManager`] reads from.
pub struct ConfigSources {
    /// Settings file to load, and to create on first run.
    pub settings_path: PathBuf,

    /// Variable storage.
    pub env: Box<dyn EnvStore>,

    /// Operator console for the first-run prompts.
    pub console: Box<dyn Console>,

    /// Silenced while prompting.
    pub silent: SilentMode,
}

impl ConfigSources {
    /// The process environment, stdin/stdout, and `settings_path`.
    pub fn process(settings_path: impl Into<PathBuf>, silent: SilentMode) -> Self {
        Self {
            settings_path: settings_path.into(),
            env: Box::new(ProcessEnv),
            console: Box::new(LineConsole::stdio()),
            silent,
        }
    }
}

struct ReloadContext {
    sources: ConfigSources,
    bootstrapped: bool,
    /// Lowest-priority layer, filled when the first run left no settings file.
    defaults: MapEnv,
}

impl ReloadContext {
    /// Build and validate a new aggregate without publishing it.
    ///
    /// The settings file is re-read on every call, so keys removed from it
    /// disappear from the next snapshot.
    fn assemble(&mut self) -> Result<AppConfig, ValidationError> {
        let sources = &mut self.sources;

        if !self.bootstrapped {
            self.bootstrapped = true;
            let outcome = Bootstrapper::new(
                &sources.settings_path,
                sources.console.as_mut(),
                &sources.silent,
            )
            .run();
            tracing::debug!(?outcome, "Settings bootstrap finished");
            if !outcome.has_file() {
                self.defaults = required_defaults();
            }
        }

        let settings = load_settings_file(&sources.settings_path);
        let env = Layered::new()
            .then(&*sources.env)
            .then(&settings)
            .then(&self.defaults);
        let mut config = load_from_env(&env);
        validate(&mut config)?;
        Ok(config)
    }
}

/// Owner of the current configuration snapshot.
pub struct ConfigManager {
    current: ArcSwap<AppConfig>,
    reload: Mutex<ReloadContext>,
}

impl ConfigManager {
    /// Load the first snapshot. Fails if it does not validate.
    pub fn new(sources: ConfigSources) -> Result<Self, ConfigError> {
        let mut context = ReloadContext {
            sources,
            bootstrapped: false,
            defaults: MapEnv::new(),
        };
        let config = context.assemble()?;

        tracing::info!(
            settings_path = %context.sources.settings_path.display(),
            "Configuration loaded"
        );

        Ok(Self {
            current: ArcSwap::from_pointee(config),
            reload: Mutex::new(context),
        })
    }

    /// Rebuild the configuration and publish it if it validates.
    ///
    /// On failure the current snapshot is kept.
    pub fn reload_config(&self) -> Result<(), ConfigError> {
        let mut context = self.reload.lock().unwrap_or_else(|e| e.into_inner());
        match context.assemble() {
            Ok(config) => {
                self.current.store(Arc::new(config));
                tracing::info!("Configuration reloaded");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Configuration reload rejected, keeping current configuration"
                );
                Err(e.into())
            }
        }
    }

    /// Re-run validation against the current snapshot.
    ///
    /// The (possibly clamped) result is republished when it passes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _serialized = self.reload.lock().unwrap_or_else(|e| e.into_inner());
        let mut config = AppConfig::clone(&self.current.load());
        validate(&mut config)?;
        self.current.store(Arc::new(config));
        Ok(())
    }

    /// The shared current snapshot.
    pub fn snapshot(&self) -> Arc<AppConfig> {
        self.current.load_full()
    }

    pub fn server_config(&self) -> ServerConfig {
        self.current.load().server.clone()
    }

    /// Server settings used to bind the listener and report its address.
    pub fn effective_server_config(&self) -> ServerConfig {
        self.server_config()
    }

    pub fn is_master(&self) -> bool {
        self.current.load().server.is_master
    }

    pub fn auth_config(&self) -> AuthConfig {
        self.current.load().auth.clone()
    }

    pub fn cors_config(&self) -> CorsConfig {
        self.current.load().cors.clone()
    }

    pub fn performance_config(&self) -> PerformanceConfig {
        self.current.load().performance.clone()
    }

    pub fn log_config(&self) -> LogConfig {
        self.current.load().log.clone()
    }

    pub fn database_config(&self) -> DatabaseConfig {
        self.current.load().database.clone()
    }

    pub fn redis_dsn(&self) -> String {
        self.current.load().redis_dsn.clone()
    }

    /// Log the effective configuration. The auth key is never printed.
    pub fn log_summary(&self) {
        let config = self.snapshot();
        let server = &config.server;

        tracing::info!(
            listen_address = %server.bind_address(),
            role = if server.is_master { "master" } else { "slave" },
            read_timeout_secs = server.read_timeout_secs,
            write_timeout_secs = server.write_timeout_secs,
            idle_timeout_secs = server.idle_timeout_secs,
            graceful_shutdown_timeout_secs = server.graceful_shutdown_timeout_secs,
            "Server configuration"
        );
        tracing::info!(
            max_concurrent_requests = config.performance.max_concurrent_requests,
            "Performance configuration"
        );

        let cors = if config.cors.enabled {
            format!("enabled (origins: {})", config.cors.allowed_origins.join(", "))
        } else {
            "disabled".to_string()
        };
        tracing::info!(
            authentication = "enabled (key loaded)",
            cors = %cors,
            "Security configuration"
        );

        tracing::info!(
            level = %config.log.level,
            format = %config.log.format,
            file_logging = config.log.enable_file,
            file_path = config.log.enable_file.then_some(config.log.file_path.as_str()),
            "Logging configuration"
        );
        tracing::info!(
            database = if config.database.dsn.is_empty() { "not configured" } else { "configured" },
            redis = if config.redis_dsn.is_empty() {
                "not configured (in-memory store)"
            } else {
                "configured"
            },
            "Dependencies"
        );
    }
}
