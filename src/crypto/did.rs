//! Resolution of `did:jwk:` identifiers to P-256 verifying keys.
//!
//! A `did:jwk` is self-certifying: the identifier is the base64url-encoded
//! JWK itself, so "resolving" it never touches the network — it is pure
//! decode-and-validate. Any other DID method, or a JWK with an unsupported
//! `kty`/`crv`, is rejected as `key_resolution_failed`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::constants::{DID_JWK_PREFIX, P256_COORDINATE_SIZE, SUPPORTED_CURVE, SUPPORTED_KTY};
use crate::crypto::signature::verifying_key_from_coordinates;
use crate::types::{Result, VerifierError};
use p256::ecdsa::VerifyingKey;

/// The subset of RFC 7517 JWK fields this resolver understands: a public
/// EC key on P-256, in affine coordinates.
#[derive(Debug, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub crv: String,
    pub x: String,
    pub y: String,
}

/// Parse a `did:jwk:` identifier and reconstruct the embedded verifying key.
pub fn resolve(did: &str) -> Result<VerifyingKey> {
    let jwk = parse_jwk(did)?;
    jwk_to_verifying_key(&jwk)
}

/// Decode and validate the JWK embedded in a `did:jwk:` identifier, without
/// reconstructing the key — used where callers want the raw JWK fields.
pub fn parse_jwk(did: &str) -> Result<Jwk> {
    let encoded = did
        .strip_prefix(DID_JWK_PREFIX)
        .ok_or(VerifierError::KeyResolutionFailed)?;

    // A did:jwk may carry a fragment (e.g. `#0`); only the method-specific
    // id before it is the encoded JWK.
    let encoded = encoded.split('#').next().unwrap_or(encoded);

    let decoded = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| VerifierError::KeyResolutionFailed)?;

    serde_json::from_slice(&decoded).map_err(|_| VerifierError::KeyResolutionFailed)
}

/// Validate a JWK's `kty`/`crv` and decode its coordinates into a key.
pub fn jwk_to_verifying_key(jwk: &Jwk) -> Result<VerifyingKey> {
    if jwk.kty != SUPPORTED_KTY || jwk.crv != SUPPORTED_CURVE {
        return Err(VerifierError::KeyResolutionFailed);
    }

    let x = decode_coordinate(&jwk.x)?;
    let y = decode_coordinate(&jwk.y)?;
    verifying_key_from_coordinates(&x, &y)
}

fn decode_coordinate(field: &str) -> Result<[u8; P256_COORDINATE_SIZE]> {
    let bytes = URL_SAFE_NO_PAD
        .decode(field)
        .map_err(|_| VerifierError::KeyResolutionFailed)?;
    bytes
        .try_into()
        .map_err(|_| VerifierError::KeyResolutionFailed)
}

/// Build a `did:jwk:` identifier from a public key's affine coordinates —
/// the inverse of `resolve`, used by the holder to publish its own DID.
pub fn encode_did_jwk(x: &[u8; P256_COORDINATE_SIZE], y: &[u8; P256_COORDINATE_SIZE]) -> String {
    let jwk = serde_json::json!({
        "kty": SUPPORTED_KTY,
        "crv": SUPPORTED_CURVE,
        "x": URL_SAFE_NO_PAD.encode(x),
        "y": URL_SAFE_NO_PAD.encode(y),
    });
    format!(
        "{}{}",
        DID_JWK_PREFIX,
        URL_SAFE_NO_PAD.encode(jwk.to_string())
    )
}
