//! System-wide constants for the DID proof-of-possession verifier.
//! This module contains all magic numbers and strings used throughout the application.

// P-256 key/signature sizes
pub const P256_COORDINATE_SIZE: usize = 32;
pub const P256_SIGNATURE_SIZE: usize = 64;

// Nonce entropy, before base64url encoding
pub const NONCE_ENTROPY_BYTES: usize = 16;

// Default configuration values (overridable via environment, see config.rs)
pub const DEFAULT_VERIFY_METHOD: &str = "POST";
pub const DEFAULT_VERIFY_PATH: &str = "/verify";
pub const DEFAULT_NONCE_TTL_SECONDS: i64 = 120;
pub const DEFAULT_CLOCK_SKEW_SECONDS: i64 = 120;
pub const DEFAULT_HTTP_PORT: &str = "8080";

// DID method prefix this resolver understands; any other prefix is rejected
pub const DID_JWK_PREFIX: &str = "did:jwk:";

// Grace period kept past expires_at before a nonce record is reaped,
// and the interval at which the background sweep runs
pub const NONCE_REAP_GRACE_SECONDS: i64 = 60;
pub const NONCE_SWEEP_INTERVAL_SECONDS: u64 = 30;

// Assertion header fields this verifier accepts
pub const SUPPORTED_ALG: &str = "ES256";
pub const SUPPORTED_TYP: &str = "JWT";
pub const SUPPORTED_CURVE: &str = "P-256";
pub const SUPPORTED_KTY: &str = "EC";
