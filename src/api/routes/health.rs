use axum::Json;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::api::schemas::HealthResponse;

use super::HEALTH_TAG;

/// Health and status routes.
pub fn router() -> OpenApiRouter {
    OpenApiRouter::new().routes(routes!(handle_health))
}

/// Liveness check
///
/// Always returns 200 if the process is accepting connections; does not
/// touch the nonce store or perform any cryptographic work.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse),
    )
)]
pub(crate) async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
