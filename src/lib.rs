//! Environment-driven configuration for the loadgate service.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{AppConfig, ConfigManager, ConfigSources};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
