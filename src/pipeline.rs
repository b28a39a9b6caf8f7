//! The verification pipeline: the linear, ordered sequence of guarded
//! stages that turns a raw token into a typed outcome.
//!
//! Ordering here is part of the external contract (see the error taxonomy
//! table) — reordering stages changes which error code a malformed
//! request receives, which is an observable, tested behavior.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clock::Clock;
use crate::codec::Assertion;
use crate::constants::{P256_COORDINATE_SIZE, P256_SIGNATURE_SIZE, SUPPORTED_ALG, SUPPORTED_TYP};
use crate::crypto::did;
use crate::crypto::signature::verify_signature;
use crate::storage::{log_mark_used_race, NonceStore};
use crate::types::{Result, VerifierError};

/// The external contract of a successful verification.
#[derive(Debug, Clone, Serialize)]
pub struct VerifiedClaim {
    pub status: &'static str,
    pub holder_id: String,
    pub kid: String,
    pub verified_at: DateTime<Utc>,
}

/// Configuration the pipeline checks claims against — a narrow view of
/// `Config` so tests can construct one without touching the environment.
pub struct Binding<'a> {
    pub audience: &'a str,
    pub verify_method: &'a str,
    pub verify_path: &'a str,
    pub clock_skew_seconds: i64,
}

/// Run the full nine-stage pipeline against a raw, untrusted token.
pub fn verify(
    token: &str,
    store: &NonceStore,
    clock: &dyn Clock,
    binding: &Binding,
) -> Result<VerifiedClaim> {
    // 1. Token presence.
    if token.trim().is_empty() {
        return Err(VerifierError::MissingToken);
    }

    // 2. Structural parse.
    let assertion = Assertion::parse(token)?;

    // 3. Key resolution.
    let kid = &assertion.header().kid;
    if kid.trim().is_empty() {
        return Err(VerifierError::MissingKid);
    }
    let verifying_key = did::resolve(kid)?;

    // 4. Claim extraction.
    let aud = assertion
        .claim_str("aud")
        .ok_or(VerifierError::AudMismatch)?;
    if aud != binding.audience {
        return Err(VerifierError::AudMismatch);
    }

    let nonce = assertion
        .claim_str("nonce")
        .filter(|n| !n.is_empty())
        .ok_or(VerifierError::MissingNonce)?;

    let holder_id = assertion
        .holder_id()
        .ok_or(VerifierError::MissingHolderId)?
        .to_string();

    let method = assertion.claim_str("method").unwrap_or_default();
    let path = assertion.claim_str("path").unwrap_or_default();

    // 5. Nonce validation.
    let now = clock.now();
    let record = store.try_get(nonce).ok_or(VerifierError::InvalidNonce)?;
    if record.used {
        return Err(VerifierError::NonceUsed);
    }
    if now > record.expires_at {
        return Err(VerifierError::NonceExpired);
    }

    // 6. Request binding. Method compares case-insensitively, path
    // case-sensitively — this asymmetry is intentional, not an oversight.
    if !method.eq_ignore_ascii_case(binding.verify_method) {
        return Err(VerifierError::MethodMismatch);
    }
    if path != binding.verify_path {
        return Err(VerifierError::PathMismatch);
    }

    // 7. Signature + temporal validation. Every failure in this stage
    // merges into one code to avoid a bad-signature-vs-expired oracle,
    // including a header whose alg or typ doesn't match what this
    // verifier accepts.
    if assertion.header().alg != SUPPORTED_ALG || assertion.header().typ != SUPPORTED_TYP {
        return Err(VerifierError::SigInvalidOrExpired);
    }

    let nbf = assertion
        .claim_i64("nbf")
        .ok_or(VerifierError::SigInvalidOrExpired)?;
    let exp = assertion
        .claim_i64("exp")
        .ok_or(VerifierError::SigInvalidOrExpired)?;
    let skew = binding.clock_skew_seconds;
    let now_ts = now.timestamp();
    if now_ts < nbf - skew || now_ts > exp + skew {
        return Err(VerifierError::SigInvalidOrExpired);
    }

    let signature_bytes = assertion.signature_bytes();
    let signature: [u8; P256_SIGNATURE_SIZE] = signature_bytes
        .try_into()
        .map_err(|_| VerifierError::SigInvalidOrExpired)?;
    let point = verifying_key.to_encoded_point(false);
    let x: [u8; P256_COORDINATE_SIZE] = point
        .x()
        .ok_or(VerifierError::SigInvalidOrExpired)?
        .as_slice()
        .try_into()
        .map_err(|_| VerifierError::SigInvalidOrExpired)?;
    let y: [u8; P256_COORDINATE_SIZE] = point
        .y()
        .ok_or(VerifierError::SigInvalidOrExpired)?
        .as_slice()
        .try_into()
        .map_err(|_| VerifierError::SigInvalidOrExpired)?;
    verify_signature(&assertion.signing_input(), &signature, &x, &y)?;

    // 8. Mark nonce used. A lost race here means another verifier won
    // the same nonce first; the single-use invariant requires rejecting
    // this caller too, not just the normal nonce_used path at step 5.
    if !store.mark_used(nonce) {
        log_mark_used_race(nonce);
        return Err(VerifierError::NonceUsed);
    }

    // 9. Emit.
    Ok(VerifiedClaim {
        status: "valid",
        holder_id,
        kid: kid.clone(),
        verified_at: now,
    })
}
