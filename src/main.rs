mod api;
mod clock;
mod codec;
mod config;
mod constants;
mod crypto;
mod issuer;
mod pipeline;
mod storage;
mod types;

use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use api::{ApiDoc, AppState};
use clock::SystemClock;
use config::Config;
use constants::NONCE_SWEEP_INTERVAL_SECONDS;
use storage::NonceStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let nonce_store = NonceStore::new();

    let state = Arc::new(AppState {
        config,
        nonce_store,
        clock: Arc::new(SystemClock),
    });

    // Periodic reaper keeps the nonce store bounded without touching
    // entries still inside their replay-detection window.
    let sweep_state = Arc::clone(&state);
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(NONCE_SWEEP_INTERVAL_SECONDS));
        loop {
            interval.tick().await;
            sweep_state.nonce_store.sweep_expired(sweep_state.clock.now());
        }
    });

    let (router, api_spec) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(api::routes::challenge::router())
        .merge(api::routes::verify::router())
        .merge(api::routes::health::router())
        .layer(axum::extract::Extension(Arc::clone(&state)))
        .split_for_parts();

    let openapi_route = axum::Router::new().route(
        "/api-docs/openapi.json",
        axum::routing::get(move || {
            let api_spec = api_spec.clone();
            async move { axum::Json(api_spec) }
        }),
    );

    let app = router.merge(openapi_route);

    let bind_addr = state.config.http_bind_addr();

    info!("DID proof-of-possession verifier");
    info!("   HTTP API:     http://{}", bind_addr);
    info!("   Audience:     {}", state.config.audience);
    info!("   Verify path:  {} {}", state.config.verify_method, state.config.verify_path);
    info!(
        "   OpenAPI spec: http://{}/api-docs/openapi.json",
        bind_addr
    );

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(error = %e, "failed to bind HTTP server");
            std::process::exit(1);
        }
    };

    info!("HTTP server listening on {}", bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "HTTP server error");
        std::process::exit(1);
    }
}
