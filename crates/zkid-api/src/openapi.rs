//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "zkid API",
        version = "0.1.0",
        description = "Zero-knowledge student identity: Groth16 proof generation, off-chain and ledger verification, and selective-disclosure credentials.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::proofs::generate_proof,
        crate::routes::proofs::verify_off_chain,
        crate::routes::proofs::verify_on_chain,
        crate::routes::credentials::compute_commitment,
        crate::routes::credentials::issue_credential,
        crate::routes::credentials::verify_credential,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::middleware::metrics::MetricsSnapshot,
        crate::routes::proofs::GenerateProofRequest,
        crate::routes::proofs::ProofResponse,
        crate::routes::proofs::VerifyResponse,
        crate::routes::credentials::AttributesRequest,
        crate::routes::credentials::IssueRequest,
        crate::routes::credentials::CommitmentResponse,
        crate::routes::credentials::BundlePayload,
        crate::routes::credentials::IssueResponse,
        crate::routes::credentials::VerifyCredentialResponse,
    )),
    tags(
        (name = "proofs", description = "Single-step proving and verification"),
        (name = "credentials", description = "Issuance and verification lifecycles"),
    )
)]
pub struct ApiDoc;

/// Router serving `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
