use axum::extract::Extension;
use axum::Json;
use std::sync::Arc;
use tracing::{error, info};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::api::schemas::{ChallengeResponse, ErrorResponse};
use crate::api::AppState;
use crate::issuer;
use crate::types::Result;

use super::CHALLENGE_TAG;

/// Challenge issuance route.
pub fn router() -> OpenApiRouter {
    OpenApiRouter::new().routes(routes!(handle_challenge))
}

/// Issue a challenge
///
/// Mints a fresh single-use nonce and registers it with the nonce store.
/// The holder must bind this nonce into a signed assertion before its
/// `expires_at` to successfully complete `/verify`.
#[utoipa::path(
    post,
    path = "/challenge",
    tag = CHALLENGE_TAG,
    responses(
        (status = 200, description = "Challenge issued", body = ChallengeResponse),
        (status = 500, description = "Internal error (nonce entropy exhaustion)", body = ErrorResponse),
    )
)]
pub(crate) async fn handle_challenge(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<ChallengeResponse>> {
    let challenge = issuer::issue(
        &state.nonce_store,
        state.clock.as_ref(),
        &state.config.audience,
        state.config.nonce_ttl_seconds,
    )
    .map_err(|e| {
        error!(error = %e, "failed to issue challenge");
        e
    })?;

    info!(nonce = %challenge.nonce, "issued challenge");

    Ok(Json(ChallengeResponse {
        nonce: challenge.nonce,
        expires_at: challenge.expires_at,
        audience: challenge.audience,
    }))
}
