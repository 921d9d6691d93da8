//! # Token Issuance Route
//!
//! `POST /token/create` — the owner-facing operation. Looks up the record
//! and policy, commits to every field, signs the delegation token, and
//! returns it together with the delegation URL and the public commitment
//! material for the owner's display.

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use vsdl_core::{PolicyId, RecordId};
use vsdl_crypto::group::GROUP_NAME;

use crate::delegation;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::ServerState;

/// Longest permitted token lifetime: 30 days.
const MAX_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Build the issuance router.
pub fn router() -> Router<ServerState> {
    Router::new().route("/token/create", post(create_token))
}

/// Request to issue a delegation token.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenRequest {
    /// The record to delegate.
    #[schema(value_type = String)]
    pub record_id: RecordId,
    /// The policy governing what the delegate may see.
    #[schema(value_type = String)]
    pub policy_id: PolicyId,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

impl Validate for CreateTokenRequest {
    fn validate(&self) -> Result<(), String> {
        if self.expires_in == 0 {
            return Err("expiresIn must be at least 1 second".into());
        }
        if self.expires_in > MAX_TTL_SECS {
            return Err(format!("expiresIn must not exceed {MAX_TTL_SECS} seconds"));
        }
        Ok(())
    }
}

/// Public cryptographic material returned for the owner's display.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CryptographyMaterial {
    /// Hex-encoded record commitment bound into the token.
    pub record_commitment: String,
    /// Hex-encoded per-field commitment points, keyed by field name.
    #[schema(value_type = Object)]
    pub field_commitments: BTreeMap<String, String>,
    /// The policy's full partition digest.
    pub policy_hash: String,
    /// The group parameter in use.
    pub group: String,
}

/// Response to a successful issuance.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenResponse {
    /// Fresh token identifier.
    pub token_id: String,
    /// The signed compact token.
    pub token: String,
    /// Delegation URL embedding the token.
    pub url: String,
    /// Absolute expiry, seconds since the Unix epoch.
    pub expires_at: i64,
    /// Commitment material for display.
    pub cryptography: CryptographyMaterial,
}

/// POST /token/create — issue a delegation token.
#[utoipa::path(
    post,
    path = "/token/create",
    request_body = CreateTokenRequest,
    responses(
        (status = 200, description = "Token issued", body = CreateTokenResponse),
        (status = 404, description = "Unknown record or policy"),
        (status = 422, description = "Malformed request"),
        (status = 500, description = "Internal error"),
    ),
    tag = "delegation"
)]
pub async fn create_token(
    State(state): State<ServerState>,
    body: Result<Json<CreateTokenRequest>, JsonRejection>,
) -> Result<Json<CreateTokenResponse>, AppError> {
    let request = extract_validated_json(body)?;
    let issued = delegation::issue(
        &state,
        &request.record_id,
        &request.policy_id,
        request.expires_in,
    )?;

    Ok(Json(CreateTokenResponse {
        token_id: issued.token_id.to_string(),
        token: issued.token,
        url: issued.url,
        expires_at: issued.expires_at,
        cryptography: CryptographyMaterial {
            record_commitment: issued.commitment.to_hex(),
            field_commitments: issued
                .field_commitments
                .iter()
                .map(|(name, point)| (name.clone(), point.to_hex()))
                .collect(),
            policy_hash: issued.policy_hash.to_string(),
            group: GROUP_NAME.to_string(),
        },
    }))
}
