//! # Verification Convenience Route
//!
//! `POST /verify` — recomputes the visible-subset commitment from submitted
//! openings and checks the partition equation. A failed equation is a
//! protocol result (`valid: false`), not an error.
//!
//! This endpoint checks whatever commitments the caller submits; a delegate
//! who does not trust the server should run the verifier locally against
//! the commitment inside the signed token instead.

use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use vsdl_crypto::Point;
use vsdl_token::Opening;

use crate::delegation;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::ServerState;

/// Build the verification router.
pub fn router() -> Router<ServerState> {
    Router::new().route("/verify", post(verify_proof))
}

/// Request to check the partition equation.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Openings for the claimed visible fields.
    #[schema(value_type = Vec<Object>)]
    pub visible_fields: Vec<Opening>,
    /// The full-record commitment, hex-encoded.
    #[schema(value_type = String)]
    pub record_commitment: Point,
    /// The hidden-subset commitment, hex-encoded.
    #[schema(value_type = String)]
    pub hidden_commitment: Point,
}

impl Validate for VerifyRequest {
    fn validate(&self) -> Result<(), String> {
        // An empty opening list is legitimate: an all-hidden partition
        // verifies with recomputed-visible = identity.
        Ok(())
    }
}

/// Response to an equation check.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    /// Whether the partition equation held.
    pub valid: bool,
    /// Hex of the visible-subset commitment recomputed from the openings.
    pub recomputed_visible: String,
    /// The equation that was checked, for display.
    pub verification: String,
}

/// POST /verify — check the partition equation for submitted openings.
#[utoipa::path(
    post,
    path = "/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Equation checked", body = VerifyResponse),
        (status = 422, description = "Malformed openings or commitments"),
    ),
    tag = "delegation"
)]
pub async fn verify_proof(
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let request = extract_validated_json(body)?;
    let outcome = delegation::verify_openings(
        &request.visible_fields,
        request.record_commitment,
        request.hidden_commitment,
    );

    let verification = if outcome.valid {
        "recordCommitment == hiddenCommitment + recomputedVisible".to_string()
    } else {
        "recordCommitment != hiddenCommitment + recomputedVisible".to_string()
    };

    Ok(Json(VerifyResponse {
        valid: outcome.valid,
        recomputed_visible: outcome.recomputed_visible.to_hex(),
        verification,
    }))
}
