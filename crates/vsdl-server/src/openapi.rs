//! # OpenAPI Document
//!
//! OpenAPI 3.1 spec auto-generated from handler annotations, served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::error::{ErrorBody, ErrorDetail};
use crate::routes;
use crate::state::ServerState;

/// The assembled API document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "vsdl-gov-portal",
        description = "Verifiable selective-disclosure delegation for custodial records",
    ),
    paths(
        routes::tokens::create_token,
        routes::delegate::dispense_token,
        routes::verify::verify_proof,
        routes::meta::generators,
        routes::meta::policies,
    ),
    components(schemas(
        routes::tokens::CreateTokenRequest,
        routes::tokens::CreateTokenResponse,
        routes::tokens::CryptographyMaterial,
        routes::delegate::DispenseResponse,
        routes::verify::VerifyRequest,
        routes::verify::VerifyResponse,
        routes::meta::GeneratorsResponse,
        routes::meta::PoliciesResponse,
        routes::meta::PolicyEntry,
        ErrorBody,
        ErrorDetail,
    )),
    tags(
        (name = "delegation", description = "Issue, redeem, and verify delegations"),
        (name = "meta", description = "Diagnostics and policy catalog"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<ServerState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
