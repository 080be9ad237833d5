//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware from the config snapshot)
//!     → /health handler
//!     → Send to client
//! ```

pub mod server;

pub use server::{build_router, concurrency_limit, HttpServer};
