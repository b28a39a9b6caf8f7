use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body for `POST /challenge`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChallengeResponse {
    /// Single-use, URL-safe nonce the holder must bind into its assertion.
    #[schema(example = "nQ2f1m8K3pXvZ9yT7bR0cQ")]
    pub nonce: String,

    /// ISO-8601 instant the nonce stops being accepted.
    #[schema(example = "2026-07-30T12:02:00Z")]
    pub expires_at: chrono::DateTime<chrono::Utc>,

    /// The audience the holder's assertion must carry in `aud`.
    #[schema(example = "urn:example:verifier")]
    pub audience: String,
}

/// Request body for `POST /verify`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VerifyRequest {
    /// The three-segment signed assertion.
    #[schema(example = "eyJhbGciOiJFUzI1NiJ9.eyJhdWQiOiJ1cm46ZXhhbXBsZTp2ZXJpZmllciJ9.MEQCIA...")]
    pub token: String,
}

/// Success body for `POST /verify`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerifyResponse {
    /// Always `"valid"` on a 200 response.
    #[schema(example = "valid")]
    pub status: String,

    /// The `sub`/`holder_id` claim from the verified assertion.
    #[schema(example = "did:example:holder-123")]
    pub holder_id: String,

    /// The key id (DID) the signature was verified against.
    #[schema(example = "did:jwk:eyJrdHkiOiJFQyJ9...")]
    pub kid: String,

    /// The instant the verification completed.
    #[schema(example = "2026-07-30T12:00:30Z")]
    pub verified_at: chrono::DateTime<chrono::Utc>,
}

/// Error body for any non-2xx response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable code drawn from the closed error taxonomy.
    #[schema(example = "nonce_used")]
    pub error: String,

    /// Optional human-readable detail, present only for internal faults.
    #[schema(example = json!(null))]
    pub detail: Option<String>,
}

/// Liveness response for `GET /healthz`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
}
