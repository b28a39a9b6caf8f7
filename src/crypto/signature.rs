//! ES256 (ECDSA P-256 + SHA-256) signing and verification.
//!
//! Signatures are the raw `r || s` concatenation (64 bytes), matching the
//! JWS compact-serialization convention for ES256 — never DER. Verification
//! is delegated entirely to `p256`'s `ecdsa` feature, which performs the
//! scalar comparisons in constant time; this module never compares field
//! elements itself.

use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::EncodedPoint;

use crate::constants::P256_COORDINATE_SIZE;
use crate::types::{Result, VerifierError};

/// Sign `message` (the raw signing input bytes, never a re-serialized copy)
/// with `signing_key`, returning the 64-byte `r || s` signature.
pub fn sign_message(message: &[u8], signing_key: &SigningKey) -> [u8; 64] {
    let signature: Signature = signing_key.sign(message);
    signature.to_bytes().into()
}

/// Verify a 64-byte `r || s` signature over `message` against a public key
/// given as raw affine coordinates `(x, y)`.
///
/// Returns `Err(VerifierError::SigInvalidOrExpired)` on any failure —
/// malformed coordinates, malformed signature, or a genuine mismatch are
/// all merged into the same outcome by the caller, so this function's own
/// error variant never leaks past the pipeline.
pub fn verify_signature(
    message: &[u8],
    signature: &[u8],
    x: &[u8; P256_COORDINATE_SIZE],
    y: &[u8; P256_COORDINATE_SIZE],
) -> Result<()> {
    let verifying_key = verifying_key_from_coordinates(x, y)?;

    let signature = Signature::try_from(signature)
        .map_err(|_| VerifierError::SigInvalidOrExpired)?;

    verifying_key
        .verify(message, &signature)
        .map_err(|_| VerifierError::SigInvalidOrExpired)
}

/// Reconstruct a P-256 verifying key from uncompressed affine coordinates.
pub fn verifying_key_from_coordinates(
    x: &[u8; P256_COORDINATE_SIZE],
    y: &[u8; P256_COORDINATE_SIZE],
) -> Result<VerifyingKey> {
    let mut uncompressed = [0u8; 1 + 2 * P256_COORDINATE_SIZE];
    uncompressed[0] = 0x04;
    uncompressed[1..1 + P256_COORDINATE_SIZE].copy_from_slice(x);
    uncompressed[1 + P256_COORDINATE_SIZE..].copy_from_slice(y);

    let point = EncodedPoint::from_bytes(uncompressed)
        .map_err(|_| VerifierError::KeyResolutionFailed)?;

    VerifyingKey::from_encoded_point(&point).map_err(|_| VerifierError::KeyResolutionFailed)
}

/// Generate a fresh P-256 signing key (used by the holder and by tests).
pub fn generate_signing_key() -> SigningKey {
    loop {
        let candidate = rand::random::<[u8; P256_COORDINATE_SIZE]>();
        if let Ok(key) = SigningKey::from_bytes(&candidate.into()) {
            return key;
        }
    }
}

/// Affine coordinates of a verifying key, as used in a `did:jwk:` JWK body.
pub fn public_coordinates(
    signing_key: &SigningKey,
) -> ([u8; P256_COORDINATE_SIZE], [u8; P256_COORDINATE_SIZE]) {
    let point = signing_key.verifying_key().to_encoded_point(false);
    let x: [u8; P256_COORDINATE_SIZE] = point.x().expect("uncompressed point has x").as_slice()
        .try_into()
        .expect("P-256 x coordinate is 32 bytes");
    let y: [u8; P256_COORDINATE_SIZE] = point.y().expect("uncompressed point has y").as_slice()
        .try_into()
        .expect("P-256 y coordinate is 32 bytes");
    (x, y)
}
