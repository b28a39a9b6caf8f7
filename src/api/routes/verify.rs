use axum::extract::Extension;
use axum::Json;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::api::schemas::{ErrorResponse, VerifyRequest, VerifyResponse};
use crate::api::AppState;
use crate::pipeline::{self, Binding};
use crate::types::Result;

use super::VERIFY_TAG;

/// Assertion verification route.
pub fn router() -> OpenApiRouter {
    OpenApiRouter::new().routes(routes!(handle_verify))
}

/// Verify an assertion
///
/// Runs the full verification pipeline against the submitted token:
/// structural parse, key resolution, claim extraction, nonce freshness
/// and single-use enforcement, request binding, and signature/temporal
/// validation, in that fixed order.
#[utoipa::path(
    post,
    path = "/verify",
    tag = VERIFY_TAG,
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Assertion is valid", body = VerifyResponse),
        (status = 400, description = "Assertion was rejected", body = ErrorResponse),
    )
)]
pub(crate) async fn handle_verify(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>> {
    let binding = Binding {
        audience: &state.config.audience,
        verify_method: &state.config.verify_method,
        verify_path: &state.config.verify_path,
        clock_skew_seconds: state.config.clock_skew_seconds,
    };

    let result = pipeline::verify(
        &request.token,
        &state.nonce_store,
        state.clock.as_ref(),
        &binding,
    );

    match result {
        Ok(claim) => {
            info!(holder_id = %claim.holder_id, kid = %claim.kid, "assertion verified");
            Ok(Json(VerifyResponse {
                status: claim.status.to_string(),
                holder_id: claim.holder_id,
                kid: claim.kid,
                verified_at: claim.verified_at,
            }))
        }
        Err(err) => {
            warn!(code = err.code(), "assertion rejected");
            Err(err)
        }
    }
}
