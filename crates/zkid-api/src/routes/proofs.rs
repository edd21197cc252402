//! # Proof Endpoints
//!
//! The single-step surface used by the holder and verifier apps:
//!
//! - `GET /`: banner.
//! - `POST /generate-proof`: prove a circuit input.
//! - `POST /verify`: off-chain check only.
//! - `POST /verify-onchain`: ledger check only.
//!
//! Each verification endpoint answers `{ valid }` only when its path
//! executed. A path that could not run is an error response, never
//! `valid: false`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use zkid_core::{ProofArtifact, VerificationOutcome};
use zkid_credential::{CodecError, DisclosureCodec};
use zkid_crypto::CircuitInput;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Banner returned by `GET /`.
pub const BANNER: &str = "ZKP backend running";

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// OpenAPI shape of the circuit input wire form accepted for proving.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProofRequest {
    /// Hash of the name, decimal string.
    pub name: String,
    /// Hash of the roll number, decimal string.
    pub roll_no: String,
    /// Date of birth as a `ddmmyyyy` integer.
    #[schema(value_type = u64)]
    pub dob: Value,
    /// Phone number as an integer.
    #[schema(value_type = u64)]
    pub phone_no: Value,
    /// Hash of the branch code, decimal string.
    pub branch: String,
}

/// A Groth16 proof with its public signals.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProofResponse {
    /// `pi_a`, `pi_b`, `pi_c` in snarkjs layout.
    #[schema(value_type = Object)]
    pub proof: Value,
    /// Public signals as decimal strings.
    pub public_signals: Vec<String>,
}

/// A verification verdict.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    /// Whether the proof verified.
    pub valid: bool,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the proof router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/generate-proof", post(generate_proof))
        .route("/verify", post(verify_off_chain))
        .route("/verify-onchain", post(verify_on_chain))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn banner() -> &'static str {
    BANNER
}

/// POST /generate-proof: Prove knowledge of a circuit input.
#[utoipa::path(
    post,
    path = "/generate-proof",
    request_body = GenerateProofRequest,
    responses(
        (status = 200, description = "Proof generated", body = ProofResponse),
        (status = 400, description = "Unparseable circuit input", body = crate::error::ErrorBody),
        (status = 500, description = "Proof generation failed", body = crate::error::ErrorBody),
    ),
    tag = "proofs"
)]
pub(crate) async fn generate_proof(
    State(state): State<AppState>,
    body: Result<Json<CircuitInput>, JsonRejection>,
) -> Result<Json<ProofArtifact>, AppError> {
    let input = extract_json(body)?;
    let artifact = state.coordinator.generate(input).await?;
    state.metrics.record_proof();
    tracing::info!(commitment = ?artifact.commitment(), "proof generated");
    Ok(Json(artifact))
}

/// POST /verify: Check a proof against the local verification key.
#[utoipa::path(
    post,
    path = "/verify",
    request_body = ProofResponse,
    responses(
        (status = 200, description = "Verification executed", body = VerifyResponse),
        (status = 400, description = "Missing fields, unparseable body, or verification could not run",
            body = crate::error::ErrorBody),
    ),
    tag = "proofs"
)]
pub(crate) async fn verify_off_chain(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let payload = extract_json(body)?;
    let bundle =
        DisclosureCodec::decode_value(payload).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let outcome = state
        .coordinator
        .verifier()
        .verify_off_chain(&bundle.artifact())
        .await;
    state.metrics.record_verification();
    verdict(outcome).map_err(AppError::BadRequest)
}

/// POST /verify-onchain: Check a proof with the ledger verifier contract.
#[utoipa::path(
    post,
    path = "/verify-onchain",
    request_body = ProofResponse,
    responses(
        (status = 200, description = "Ledger call executed", body = VerifyResponse),
        (status = 400, description = "Missing proof or public signals, or an unparseable bundle",
            body = crate::error::ErrorBody),
        (status = 500, description = "Ledger call did not execute", body = crate::error::ErrorBody),
    ),
    tag = "proofs"
)]
pub(crate) async fn verify_on_chain(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let payload = extract_json(body)?;
    let bundle = DisclosureCodec::decode_value(payload).map_err(|e| match e {
        CodecError::MissingFields(_) => {
            AppError::BadRequest("Missing proof or public signals".into())
        }
        other => AppError::BadRequest(other.to_string()),
    })?;
    let outcome = state
        .coordinator
        .verifier()
        .verify_on_chain(&bundle.artifact())
        .await;
    state.metrics.record_verification();
    verdict(outcome).map_err(AppError::OnChainFailed)
}

/// `{ valid }` for an executed path, the failure reason otherwise.
fn verdict(outcome: VerificationOutcome) -> Result<Json<VerifyResponse>, String> {
    match outcome.definitive() {
        Some(valid) => Ok(Json(VerifyResponse { valid })),
        None => Err(outcome
            .error
            .unwrap_or_else(|| "verification did not execute".to_string())),
    }
}
