//! # Diagnostics and Catalog Routes
//!
//! `GET /generators` reports the public generator pair so delegates can
//! pin their verifier to the same group parameters; `GET /policies` lists
//! the catalog with each policy's partition digest.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use vsdl_crypto::group::GROUP_NAME;
use vsdl_crypto::{generator_g, generator_h};

use crate::state::ServerState;

/// Build the diagnostics/catalog router.
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/generators", get(generators))
        .route("/policies", get(policies))
}

/// The public group parameters.
#[derive(Debug, Serialize, ToSchema)]
pub struct GeneratorsResponse {
    /// Hex of the basepoint `g`.
    pub g: String,
    /// Hex of the second generator `h` (discrete log unknown).
    pub h: String,
    /// Group name.
    pub group: String,
}

/// GET /generators — the commitment generator pair.
#[utoipa::path(
    get,
    path = "/generators",
    responses((status = 200, description = "Group parameters", body = GeneratorsResponse)),
    tag = "meta"
)]
pub async fn generators() -> Json<GeneratorsResponse> {
    Json(GeneratorsResponse {
        g: generator_g().to_hex(),
        h: generator_h().to_hex(),
        group: GROUP_NAME.to_string(),
    })
}

/// One catalog entry in the policies listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyEntry {
    /// Policy identifier.
    pub id: String,
    /// Human-readable label.
    pub label: String,
    /// Field names the delegate may see.
    pub visible: Vec<String>,
    /// Field names withheld.
    pub hidden: Vec<String>,
    /// Capability strings granted.
    pub actions: Vec<String>,
    /// Full partition digest.
    pub policy_hash: String,
}

/// The policy catalog.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoliciesResponse {
    /// All known policies, sorted by identifier.
    pub policies: Vec<PolicyEntry>,
}

/// GET /policies — list the policy catalog.
#[utoipa::path(
    get,
    path = "/policies",
    responses((status = 200, description = "Policy catalog", body = PoliciesResponse)),
    tag = "meta"
)]
pub async fn policies(State(state): State<ServerState>) -> Json<PoliciesResponse> {
    let mut entries: Vec<PolicyEntry> = state
        .policies()
        .iter()
        .map(|entry| {
            let p = entry.value();
            PolicyEntry {
                id: p.id.to_string(),
                label: p.label.clone(),
                visible: p.visible.iter().cloned().collect(),
                hidden: p.hidden.iter().cloned().collect(),
                actions: p.actions.clone(),
                policy_hash: p.partition_hash().to_string(),
            }
        })
        .collect();
    entries.sort_by(|a, b| a.id.cmp(&b.id));
    Json(PoliciesResponse { policies: entries })
}
