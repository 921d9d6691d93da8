//! # Token Redemption Route
//!
//! `GET /delegate/:token` — the delegate-facing operation. Verifies the
//! presented token, partitions the snapshotted record per the bound policy,
//! and returns the visible values together with the partition proof the
//! delegate verifies locally.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use vsdl_token::PartitionProof;

use crate::delegation;
use crate::error::AppError;
use crate::state::ServerState;

/// Build the redemption router.
pub fn router() -> Router<ServerState> {
    Router::new().route("/delegate/:token", get(dispense_token))
}

/// Response to a successful redemption.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispenseResponse {
    /// The visible subset of the record, name → value.
    #[schema(value_type = Object)]
    pub filtered_record: BTreeMap<String, String>,
    /// Capability strings granted by the bound policy.
    pub actions: Vec<String>,
    /// The partition proof covering exactly the visible fields.
    #[schema(value_type = Object)]
    pub proof: PartitionProof,
}

/// GET /delegate/:token — redeem a delegation token.
#[utoipa::path(
    get,
    path = "/delegate/{token}",
    params(("token" = String, Path, description = "Signed delegation token")),
    responses(
        (status = 200, description = "Filtered record and partition proof", body = DispenseResponse),
        (status = 401, description = "Invalid or expired token"),
        (status = 404, description = "No delegation state for this token"),
        (status = 500, description = "Policy/record coverage violation"),
    ),
    tag = "delegation"
)]
pub async fn dispense_token(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> Result<Json<DispenseResponse>, AppError> {
    let outcome = delegation::dispense(&state, &token)?;
    Ok(Json(DispenseResponse {
        filtered_record: outcome.filtered,
        actions: outcome.actions,
        proof: outcome.proof,
    }))
}
