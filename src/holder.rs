//! Holder-side assertion signing: builds the wire contract the verifier
//! accepts. This is the only part of the holder in scope — the CLI shell
//! that wires it to a terminal lives in `src/bin/holder.rs` and is
//! intentionally thin.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use p256::ecdsa::SigningKey;
use serde_json::json;

use crate::crypto::did::encode_did_jwk;
use crate::crypto::signature::{public_coordinates, sign_message};

/// Everything needed to bind a nonce into a signed assertion.
pub struct AssertionParams<'a> {
    pub audience: &'a str,
    pub nonce: &'a str,
    pub holder_id: &'a str,
    pub method: &'a str,
    pub path: &'a str,
    pub issued_at: DateTime<Utc>,
    pub not_before: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Sign a fresh assertion over `params`, using `signing_key`'s own public
/// key (encoded as a `did:jwk:`) as the header's `kid`.
pub fn sign_assertion(signing_key: &SigningKey, params: &AssertionParams) -> String {
    let (x, y) = public_coordinates(signing_key);
    let kid = encode_did_jwk(&x, &y);

    let header = json!({
        "alg": "ES256",
        "typ": "JWT",
        "kid": kid,
    });
    let claims = json!({
        "aud": params.audience,
        "nonce": params.nonce,
        "sub": params.holder_id,
        "method": params.method,
        "path": params.path,
        "iat": params.issued_at.timestamp(),
        "nbf": params.not_before.timestamp(),
        "exp": params.expires_at.timestamp(),
    });

    let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
    let payload_b64 = URL_SAFE_NO_PAD.encode(claims.to_string());
    let signing_input = format!("{header_b64}.{payload_b64}");
    let signature = sign_message(signing_input.as_bytes(), signing_key);
    let signature_b64 = URL_SAFE_NO_PAD.encode(signature);

    format!("{signing_input}.{signature_b64}")
}

/// Derive this holder's own `did:jwk:` identifier from its signing key.
pub fn did_for(signing_key: &SigningKey) -> String {
    let (x, y) = public_coordinates(signing_key);
    encode_did_jwk(&x, &y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Assertion;
    use crate::crypto::signature::generate_signing_key;

    #[test]
    fn signed_assertion_round_trips_through_the_codec() {
        let signing_key = generate_signing_key();
        let now = Utc::now();
        let params = AssertionParams {
            audience: "urn:example:verifier",
            nonce: "n1",
            holder_id: "did:example:holder-123",
            method: "POST",
            path: "/verify",
            issued_at: now,
            not_before: now,
            expires_at: now + chrono::Duration::seconds(60),
        };

        let token = sign_assertion(&signing_key, &params);
        let assertion = Assertion::parse(&token).unwrap();

        assert_eq!(assertion.header().alg, "ES256");
        assert_eq!(assertion.header().kid, did_for(&signing_key));
        assert_eq!(assertion.claim_str("nonce"), Some("n1"));
        assert_eq!(assertion.holder_id(), Some("did:example:holder-123"));
    }
}
