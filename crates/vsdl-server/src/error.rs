//! # Server Error Types
//!
//! [`DelegationError`] is the domain-level error of the orchestration
//! operations; [`AppError`] maps it onto structured HTTP responses. Token
//! rejection details and policy misconfiguration specifics are logged
//! server-side and never returned to clients — an endpoint that explains
//! exactly why a token failed is an oracle.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use vsdl_core::{PolicyId, RecordId};
use vsdl_crypto::CryptoError;

/// Errors from the delegation operations.
#[derive(Error, Debug)]
pub enum DelegationError {
    /// No record with this identifier.
    #[error("record not found: {0}")]
    RecordNotFound(RecordId),

    /// No policy with this identifier.
    #[error("policy not found: {0}")]
    PolicyNotFound(PolicyId),

    /// The token's `jti` has no server-side state (expired and reclaimed,
    /// or never issued here).
    #[error("no delegation state for this token")]
    TokenNotFound,

    /// Signature, expiry, issuer, or structural check failed. The reason is
    /// for logs only.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The policy's visible ∪ hidden sets do not cover the record —
    /// a misconfiguration that would let fields escape the audit.
    #[error("policy {policy} leaves fields unaccounted: {unaccounted:?}")]
    PolicyRecordMismatch {
        /// The offending policy.
        policy: String,
        /// Record fields covered by neither set.
        unaccounted: Vec<String>,
    },

    /// Cryptographic failure (randomness source, malformed stored state).
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Any other internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "INVALID_TOKEN").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown record or token state (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Unknown policy (404, distinct code so owners can tell the two
    /// lookups apart).
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    /// Token failed signature or expiry checks (401). Carries no detail;
    /// the reason was logged where the failure was observed.
    #[error("invalid or expired delegation token")]
    InvalidToken,

    /// Request body or proof material could not be decoded (422).
    #[error("malformed request: {0}")]
    Malformed(String),

    /// Policy/record coverage violation (500). Message is logged but not
    /// returned to the client.
    #[error("policy does not cover record: {0}")]
    PolicyRecordMismatch(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::InvalidPolicy(_) => (StatusCode::NOT_FOUND, "INVALID_POLICY"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            Self::Malformed(_) => (StatusCode::UNPROCESSABLE_ENTITY, "MALFORMED"),
            Self::PolicyRecordMismatch(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "POLICY_RECORD_MISMATCH")
            }
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal details to clients.
        let message = match &self {
            Self::PolicyRecordMismatch(_) => {
                "the policy bound to this token is misconfigured".to_string()
            }
            Self::Internal(_) => "an internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::PolicyRecordMismatch(_) => {
                tracing::error!(error = %self, "policy/record coverage violation")
            }
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<DelegationError> for AppError {
    fn from(err: DelegationError) -> Self {
        match err {
            DelegationError::RecordNotFound(id) => Self::NotFound(format!("record {id}")),
            DelegationError::PolicyNotFound(id) => Self::InvalidPolicy(id.to_string()),
            DelegationError::TokenNotFound => {
                Self::NotFound("no delegation state for this token".to_string())
            }
            DelegationError::InvalidToken(reason) => {
                // The only place the detailed rejection reason is recorded.
                tracing::warn!(%reason, "delegation token rejected");
                Self::InvalidToken
            }
            DelegationError::PolicyRecordMismatch { .. } => {
                Self::PolicyRecordMismatch(err.to_string())
            }
            DelegationError::Crypto(e) => Self::Internal(e.to_string()),
            DelegationError::Internal(msg) => Self::Internal(msg),
        }
    }
}
