//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!
//! logging.rs routes them to:
//!     → console (unless silent)
//!     → log file (when enabled)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Console output can be muted at runtime without reinstalling the subscriber

pub mod logging;

pub use logging::{init_logging, LoggingGuard, SilentGuard, SilentMode};
