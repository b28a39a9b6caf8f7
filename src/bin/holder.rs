//! Thin CLI shell: fetches a challenge, signs it, and posts the assertion.
//!
//! Intentionally minimal — the wire contract lives in `didpop_verifier::holder`,
//! this binary is just environment-variable-driven glue.

use chrono::Utc;
use didpop_verifier::holder::{sign_assertion, AssertionParams};

#[derive(serde::Deserialize)]
struct Challenge {
    nonce: String,
    audience: String,
}

#[derive(serde::Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let holder_id = std::env::var("HOLDER_ID").unwrap_or_else(|_| "did:example:holder-123".to_string());
    let verifier_base = std::env::var("VERIFIER_BASE").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let challenge_url = std::env::var("CHALLENGE_URL")
        .unwrap_or_else(|_| format!("{verifier_base}/challenge"));
    let verify_url =
        std::env::var("VERIFY_URL").unwrap_or_else(|_| format!("{verifier_base}/verify"));

    let signing_key = didpop_verifier::crypto::generate_signing_key();

    let client = reqwest::Client::new();

    let challenge: Challenge = client
        .post(&challenge_url)
        .send()
        .await
        .expect("challenge request failed")
        .json()
        .await
        .expect("challenge response was not valid JSON");

    tracing::info!(nonce = %challenge.nonce, "received challenge");

    let now = Utc::now();
    let params = AssertionParams {
        audience: &challenge.audience,
        nonce: &challenge.nonce,
        holder_id: &holder_id,
        method: "POST",
        path: "/verify",
        issued_at: now,
        not_before: now,
        expires_at: now + chrono::Duration::seconds(60),
    };
    let token = sign_assertion(&signing_key, &params);

    let response = client
        .post(&verify_url)
        .json(&VerifyRequest { token: &token })
        .send()
        .await
        .expect("verify request failed");

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::info!(%status, %body, "verify response");
}
