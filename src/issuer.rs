//! Challenge issuance: mints a single-use nonce and registers it with the
//! nonce store.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::Serialize;

use crate::clock::Clock;
use crate::constants::NONCE_ENTROPY_BYTES;
use crate::storage::NonceStore;
use crate::types::{Result, VerifierError};

/// The value returned to a holder from `POST /challenge`.
#[derive(Debug, Serialize)]
pub struct Challenge {
    pub nonce: String,
    pub expires_at: DateTime<Utc>,
    pub audience: String,
}

/// Draw 16 bytes from the OS CSPRNG, register the nonce, and return a
/// challenge for `audience`. A `try_add` collision is treated as a fatal
/// internal error — never retried against the same value, since a
/// collision at this entropy size means something is badly wrong with
/// the randomness source.
pub fn issue(
    store: &NonceStore,
    clock: &dyn Clock,
    audience: &str,
    ttl_seconds: i64,
) -> Result<Challenge> {
    let mut raw = [0u8; NONCE_ENTROPY_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut raw);
    let nonce = URL_SAFE_NO_PAD.encode(raw);

    let expires_at = clock.now() + chrono::Duration::seconds(ttl_seconds);

    if !store.try_add(&nonce, expires_at) {
        return Err(VerifierError::Internal("nonce entropy collision"));
    }

    Ok(Challenge {
        nonce,
        expires_at,
        audience: audience.to_string(),
    })
}
