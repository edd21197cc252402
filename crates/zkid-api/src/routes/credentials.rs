//! # Credential Lifecycle Endpoints
//!
//! Full lifecycle runs, as opposed to the single-step proof endpoints:
//!
//! - `POST /v1/commitments`: hash attributes into a circuit input.
//! - `POST /v1/credentials/issue`: validate, prove, dual-verify, package.
//! - `POST /v1/credentials/verify`: decode a presented bundle and
//!   dual-verify it.
//!
//! Responses carry both path outcomes and the trust classification, so a
//! client can tell an invalid proof from an unreachable ledger.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use zkid_core::{FieldElement, RawAttributes};
use zkid_credential::PrivacySettings;
use zkid_crypto::{to_field_element, CircuitInput};
use zkid_lifecycle::{IssuanceReport, VerificationReport};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Identity attributes as entered by the holder.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct AttributesRequest(pub RawAttributes);

/// Request body for issuance.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    /// `name`, `rollNo`, `dob`, `phoneNo`, `branch`.
    #[schema(value_type = Object)]
    pub attributes: RawAttributes,
    /// Per-attribute reveal flags. Defaults to revealing name, roll number,
    /// and branch.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub privacy_settings: Option<PrivacySettings>,
}

/// Circuit input and the commitment it hashes to.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentResponse {
    /// The input a prover would submit.
    #[schema(value_type = Object)]
    pub circuit_input: CircuitInput,
    /// Poseidon hash of the five circuit inputs, decimal.
    #[schema(value_type = String)]
    pub commitment: FieldElement,
    /// String-attribute hash scheme in use.
    pub scheme: String,
}

/// A disclosure bundle, as an object or a JSON string holding one.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct BundlePayload(pub Value);

/// A completed issuance run.
#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct IssueResponse(pub IssuanceReport);

/// A completed verification run.
#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct VerifyCredentialResponse(pub VerificationReport);

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the credentials router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/commitments", post(compute_commitment))
        .route("/v1/credentials/issue", post(issue_credential))
        .route("/v1/credentials/verify", post(verify_credential))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/commitments: Compute the circuit input and commitment.
///
/// Every invalid attribute is reported, not just the first.
#[utoipa::path(
    post,
    path = "/v1/commitments",
    request_body = AttributesRequest,
    responses(
        (status = 200, description = "Commitment computed", body = CommitmentResponse),
        (status = 400, description = "Unparseable body", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid attributes", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn compute_commitment(
    State(state): State<AppState>,
    body: Result<Json<RawAttributes>, JsonRejection>,
) -> Result<Json<CommitmentResponse>, AppError> {
    let raw = extract_json(body)?;
    let problems = raw.validate_all();
    if !problems.is_empty() {
        let details: Vec<String> = problems.iter().map(ToString::to_string).collect();
        return Err(AppError::Validation(details.join("; ")));
    }
    let attributes = raw.validate()?;

    let hasher = state.coordinator.hasher();
    let circuit_input = hasher.circuit_input(&attributes);
    Ok(Json(CommitmentResponse {
        commitment: to_field_element(&circuit_input.commitment()),
        circuit_input,
        scheme: hasher.scheme().to_string(),
    }))
}

/// POST /v1/credentials/issue: Run the issuance lifecycle.
#[utoipa::path(
    post,
    path = "/v1/credentials/issue",
    request_body = IssueRequest,
    responses(
        (status = 200, description = "Credential issued", body = IssueResponse),
        (status = 400, description = "Unparseable body", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid attributes", body = crate::error::ErrorBody),
        (status = 500, description = "Proof generation failed", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn issue_credential(
    State(state): State<AppState>,
    body: Result<Json<IssueRequest>, JsonRejection>,
) -> Result<Json<IssueResponse>, AppError> {
    let req = extract_json(body)?;
    let attributes = req.attributes.validate()?;
    let report = state
        .coordinator
        .issue(attributes, req.privacy_settings)
        .await?;
    state.metrics.record_proof();
    Ok(Json(IssueResponse(report)))
}

/// POST /v1/credentials/verify: Run the verification lifecycle.
///
/// Accepts the bundle as a JSON object or as a JSON string holding one, the
/// form it takes when scanned from a QR code.
#[utoipa::path(
    post,
    path = "/v1/credentials/verify",
    request_body = BundlePayload,
    responses(
        (status = 200, description = "Verification completed", body = VerifyCredentialResponse),
        (status = 400, description = "Bundle unparseable or missing proof/publicSignals",
            body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub(crate) async fn verify_credential(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<VerifyCredentialResponse>, AppError> {
    let payload = extract_json(body)?;
    let report = state.coordinator.verify_bundle(payload).await?;
    state.metrics.record_verification();
    Ok(Json(VerifyCredentialResponse(report)))
}
