//! # Request Metrics
//!
//! In-process atomic counters, exposed at `/health/metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use serde::Serialize;
use utoipa::ToSchema;

/// Shared counters.
#[derive(Debug, Clone, Default)]
pub struct ApiMetrics {
    request_count: Arc<AtomicU64>,
    error_count: Arc<AtomicU64>,
    proofs_generated: Arc<AtomicU64>,
    verifications: Arc<AtomicU64>,
}

/// Point-in-time view of [`ApiMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Requests served.
    pub requests: u64,
    /// Responses with a 4xx or 5xx status.
    pub errors: u64,
    /// Proofs produced.
    pub proofs_generated: u64,
    /// Verification runs completed.
    pub verifications: u64,
}

impl ApiMetrics {
    /// Fresh counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a served response.
    pub fn record_response(&self, status: StatusCode) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        if status.is_client_error() || status.is_server_error() {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Count a generated proof.
    pub fn record_proof(&self) {
        self.proofs_generated.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a completed verification.
    pub fn record_verification(&self) {
        self.verifications.fetch_add(1, Ordering::Relaxed);
    }

    /// Current values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.request_count.load(Ordering::Relaxed),
            errors: self.error_count.load(Ordering::Relaxed),
            proofs_generated: self.proofs_generated.load(Ordering::Relaxed),
            verifications: self.verifications.load(Ordering::Relaxed),
        }
    }
}

/// Counts every response passing through, and every 4xx/5xx among them.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let Some(metrics) = request.extensions().get::<ApiMetrics>().cloned() else {
        return next.run(request).await;
    };
    let response = next.run(request).await;
    metrics.record_response(response.status());
    response
}
