//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the health handler
//! - Wire up middleware (CORS, concurrency limit, timeout, tracing) from
//!   the configuration snapshot
//! - Serve until shutdown, then drain within the graceful timeout

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigManager, CorsConfig};
use crate::lifecycle::ShutdownSignal;

/// Body returned by `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub role: &'static str,
}

/// HTTP server for the service.
pub struct HttpServer {
    router: Router,
    graceful_timeout: Duration,
}

impl HttpServer {
    /// Create a server from the current configuration snapshot.
    pub fn new(config: Arc<ConfigManager>) -> Self {
        let graceful_timeout =
            Duration::from_secs(config.server_config().graceful_shutdown_timeout_secs);
        Self {
            router: build_router(config),
            graceful_timeout,
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut serve = Box::pin(
            axum::serve(listener, self.router)
                .with_graceful_shutdown(shutdown.clone().recv())
                .into_future(),
        );

        tokio::select! {
            result = &mut serve => return result,
            _ = shutdown.recv() => {}
        }

        tracing::info!(
            timeout_secs = self.graceful_timeout.as_secs(),
            "Draining in-flight requests"
        );
        match tokio::time::timeout(self.graceful_timeout, serve).await {
            Ok(result) => result?,
            Err(_) => tracing::warn!("Graceful shutdown timed out, dropping remaining connections"),
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: Arc<ConfigManager>) -> Router {
    let snapshot = config.snapshot();
    let max_concurrent = concurrency_limit(snapshot.performance.max_concurrent_requests);

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .with_state(config)
        .layer(TimeoutLayer::new(Duration::from_secs(
            snapshot.server.write_timeout_secs,
        )))
        .layer(GlobalConcurrencyLimitLayer::new(max_concurrent));

    if snapshot.cors.enabled {
        router = router.layer(cors_layer(&snapshot.cors));
    }

    router.layer(TraceLayer::new_for_http())
}

/// Permits for the global concurrency limit.
///
/// The semaphore behind the limit cannot hold more than
/// [`Semaphore::MAX_PERMITS`], so larger values are lowered to it.
pub fn concurrency_limit(requested: i64) -> usize {
    let permits = usize::try_from(requested.max(1)).unwrap_or(usize::MAX);
    if permits > Semaphore::MAX_PERMITS {
        tracing::warn!(
            requested,
            applied = Semaphore::MAX_PERMITS,
            "max concurrent requests exceeds the supported maximum, clamping"
        );
        return Semaphore::MAX_PERMITS;
    }
    permits
}

async fn health_handler(State(config): State<Arc<ConfigManager>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        role: if config.is_master() { "master" } else { "slave" },
    })
}

/// Translate the CORS section into a tower-http layer.
///
/// Wildcards cannot be combined with credentials, so in that case the
/// request's origin and headers are mirrored back instead.
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let wildcard = |items: &[String]| items.iter().any(|i| i == "*");

    let origin = if wildcard(&cors.allowed_origins) {
        if cors.allow_credentials {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::from(Any)
        }
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    let headers = if wildcard(&cors.allowed_headers) {
        if cors.allow_credentials {
            AllowHeaders::mirror_request()
        } else {
            AllowHeaders::from(Any)
        }
    } else {
        AllowHeaders::list(
            cors.allowed_headers
                .iter()
                .filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok()),
        )
    };

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.to_ascii_uppercase().as_bytes()).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(cors.allow_credentials)
}
