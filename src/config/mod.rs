//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file missing?
//!     → bootstrap.rs (prompt operator, write template)
//! settings file (dotenv)
//!     → loader.rs (file layer under the environment, parse variables)
//!     → validation.rs (clamp, semantic checks)
//!     → AppConfig (validated, immutable)
//!     → manager.rs publishes via atomic swap of Arc<AppConfig>
//!
//! On reload (SIGHUP):
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap, or keep the current snapshot on failure
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - Every field has a default so a bare environment still loads
//! - Parsing never fails; validation reports every problem at once

pub mod bootstrap;
pub mod constants;
pub mod env;
pub mod loader;
pub mod manager;
pub mod parse;
pub mod schema;
pub mod validation;

pub use env::{EnvStore, Layered, MapEnv, ProcessEnv};
pub use manager::{ConfigError, ConfigManager, ConfigSources, DEFAULT_SETTINGS_PATH};
pub use schema::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, LogConfig, PerformanceConfig, ServerConfig,
};
pub use validation::{ValidationError, Violation};
