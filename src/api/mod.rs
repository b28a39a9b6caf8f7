pub mod routes;
pub mod schemas;

use std::sync::Arc;
use utoipa::OpenApi;

use crate::clock::Clock;
use crate::config::Config;
use crate::storage::NonceStore;

/// Shared state handed to every route via an `Extension` layer.
pub struct AppState {
    pub config: Config,
    pub nonce_store: NonceStore,
    pub clock: Arc<dyn Clock>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::challenge::handle_challenge,
        routes::verify::handle_verify,
        routes::health::handle_health,
    ),
    components(schemas(
        schemas::ChallengeResponse,
        schemas::VerifyRequest,
        schemas::VerifyResponse,
        schemas::ErrorResponse,
        schemas::HealthResponse,
    )),
    tags(
        (name = routes::CHALLENGE_TAG, description = "Nonce issuance"),
        (name = routes::VERIFY_TAG, description = "Proof-of-possession verification"),
        (name = routes::HEALTH_TAG, description = "Liveness"),
    )
)]
pub struct ApiDoc;
