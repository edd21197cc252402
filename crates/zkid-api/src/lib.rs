//! # zkid-api — HTTP Service
//!
//! Axum service over the zkid lifecycle. Handlers stay thin: they parse,
//! delegate to [`zkid_lifecycle::ProofLifecycleCoordinator`], and map
//! errors through [`AppError`].
//!
//! ## API Surface
//!
//! | Route                        | Module                    |
//! |------------------------------|---------------------------|
//! | `/`, `/generate-proof`, `/verify`, `/verify-onchain` | [`routes::proofs`] |
//! | `/v1/commitments`, `/v1/credentials/*` | [`routes::credentials`] |
//! | `/health/*`                  | this module               |
//! | `/openapi.json`              | [`openapi`]               |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::MetricsSnapshot;

pub use config::ServiceConfig;
pub use error::AppError;
pub use state::AppState;

/// Assemble the application router.
///
/// Health probes are mounted outside the metrics and trace layers.
pub fn app(state: AppState) -> Router {
    let metrics = state.metrics.clone();

    let api = Router::new()
        .merge(routes::proofs::router())
        .merge(routes::credentials::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(axum::Extension(metrics))
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/health/metrics", get(metrics_snapshot))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once circuit keys are loaded, 503 before.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.keys_loaded() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "keys not loaded")
    }
}

async fn metrics_snapshot(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
