use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// The closed taxonomy of rejections the verification pipeline can produce,
/// plus the internal faults that are the only 500s.
///
/// The variant name doubles as the wire error code (see `code()`): callers
/// depend on these exact strings, so renaming a variant is a breaking change.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum VerifierError {
    #[error("request body absent or blank")]
    MissingToken,

    #[error("assertion could not be parsed")]
    InvalidTokenFormat,

    #[error("assertion header is missing a key id")]
    MissingKid,

    #[error("DID in the key id could not be resolved to a key")]
    KeyResolutionFailed,

    #[error("audience claim does not match this verifier")]
    AudMismatch,

    #[error("nonce claim is missing or empty")]
    MissingNonce,

    #[error("no holder identifier (sub/holder_id) in claims")]
    MissingHolderId,

    #[error("nonce was never issued by this verifier")]
    InvalidNonce,

    #[error("nonce has already been consumed")]
    NonceUsed,

    #[error("nonce is past its expiry")]
    NonceExpired,

    #[error("method claim does not match the configured binding")]
    MethodMismatch,

    #[error("path claim does not match the configured binding")]
    PathMismatch,

    #[error("signature is invalid or the assertion has expired")]
    SigInvalidOrExpired,

    #[error("internal error: {0}")]
    Internal(&'static str),
}

/// Result type alias for verifier operations.
pub type Result<T> = std::result::Result<T, VerifierError>;

impl VerifierError {
    /// The wire error code — part of the external contract, never renamed.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::InvalidTokenFormat => "invalid_token_format",
            Self::MissingKid => "missing_kid",
            Self::KeyResolutionFailed => "key_resolution_failed",
            Self::AudMismatch => "aud_mismatch",
            Self::MissingNonce => "missing_nonce",
            Self::MissingHolderId => "missing_holder_id",
            Self::InvalidNonce => "invalid_nonce",
            Self::NonceUsed => "nonce_used",
            Self::NonceExpired => "nonce_expired",
            Self::MethodMismatch => "method_mismatch",
            Self::PathMismatch => "path_mismatch",
            Self::SigInvalidOrExpired => "sig_invalid_or_expired",
            Self::Internal(_) => "internal_error",
        }
    }

    /// HTTP status mirroring the outcome: 500 is reserved for genuinely
    /// internal faults (entropy exhaustion, a corrupted store entry).
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl IntoResponse for VerifierError {
    fn into_response(self) -> Response {
        let detail = match self {
            Self::Internal(msg) => Some(msg.to_string()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.code(),
            detail,
        };
        (self.status_code(), Json(body)).into_response()
    }
}
