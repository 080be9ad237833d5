//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration before anything else starts
//! - Report where the service is listening
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Configuration loads under a temporary console subscriber, since the
//!   real one depends on the configuration being loaded

use std::path::Path;

use crate::config::{ConfigError, ConfigManager, ConfigSources, ServerConfig};
use crate::observability::logging::{bootstrap_subscriber, SilentMode};

/// Build the configuration manager from the process environment.
///
/// Blocks on operator input when the settings file is missing; run it on a
/// blocking thread.
pub fn load_configuration(
    settings_path: &Path,
    silent: &SilentMode,
) -> Result<ConfigManager, ConfigError> {
    let subscriber = bootstrap_subscriber(silent);
    tracing::subscriber::with_default(subscriber, || {
        ConfigManager::new(ConfigSources::process(settings_path, silent.clone()))
    })
}

/// Operator-facing line announcing the listen address.
pub fn startup_banner(server: &ServerConfig) -> String {
    format!(
        "Service started at http://{}:{}",
        server.display_host(),
        server.port
    )
}
