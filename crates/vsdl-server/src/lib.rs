//! # vsdl-server — Custodial Server for Verifiable Delegations
//!
//! The orchestration layer of the delegation protocol. Owns the explicit
//! [`ServerState`] (signing secret, record store, policy catalog, token
//! map) and exposes the three protocol operations over HTTP:
//!
//! | Method/Path | Module | Operation |
//! |---|---|---|
//! | `POST /token/create` | [`routes::tokens`] | Owner issues a delegation |
//! | `GET /delegate/:token` | [`routes::delegate`] | Delegate redeems it |
//! | `POST /verify` | [`routes::verify`] | Convenience equation check |
//! | `GET /generators` | [`routes::meta`] | Group parameters |
//! | `GET /policies` | [`routes::meta`] | Policy catalog |
//! | `GET /health/*` | — | Probes (always unauthenticated) |
//! | `GET /openapi.json` | [`openapi`] | OpenAPI 3.1 document |
//!
//! ## Architecture
//!
//! No business logic in route handlers — they delegate to [`delegation`],
//! which is also driven directly by the CLI demo and the integration
//! tests. All errors map to structured HTTP responses via
//! [`error::AppError`].

pub mod delegation;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod seed;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{ServerConfig, ServerState};

/// Assemble the full application router.
pub fn app(state: ServerState) -> Router {
    let api = Router::new()
        .merge(routes::tokens::router())
        .merge(routes::delegate::router())
        .merge(routes::verify::router())
        .merge(routes::meta::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let probes = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(state);

    Router::new().merge(probes).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the application can serve traffic.
///
/// Checks:
/// - The signing secret is loaded and of usable size.
/// - The in-memory stores are accessible.
/// - The generator pair derives to non-identity points.
async fn readiness(State(state): State<ServerState>) -> impl IntoResponse {
    if state.secret().len() < 16 {
        return (StatusCode::SERVICE_UNAVAILABLE, "signing secret degraded").into_response();
    }

    let _ = state.records().len();
    let _ = state.policies().len();
    let _ = state.tokens().len();

    let identity = vsdl_crypto::Point::identity();
    if vsdl_crypto::generator_g() == identity || vsdl_crypto::generator_h() == identity {
        return (StatusCode::SERVICE_UNAVAILABLE, "generator derivation degraded").into_response();
    }

    (StatusCode::OK, "ready").into_response()
}
