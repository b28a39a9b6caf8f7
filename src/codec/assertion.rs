//! Parsing of the three-segment signed assertion (`H.P.S`).
//!
//! The signing input is preserved as the original, unmodified base64url
//! bytes of the header and payload segments — never reconstructed from
//! parsed JSON. Re-serializing would silently accept a payload whose
//! whitespace or key order differs from what was actually signed.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

use crate::types::{Result, VerifierError};

/// Decoded assertion header. Unknown top-level JSON keys are ignored, not
/// rejected — forward compatibility per the wire format.
#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub alg: String,
    #[serde(default)]
    pub typ: String,
    #[serde(default)]
    pub kid: String,
}

/// A parsed assertion: the two raw base64url segments plus their decoded
/// contents, and the raw signature bytes.
pub struct Assertion {
    header_b64: String,
    payload_b64: String,
    header: Header,
    claims: Value,
    signature: Vec<u8>,
}

impl Assertion {
    /// Split `token` on `.` into exactly three segments and decode the
    /// first two. Any structural failure collapses to one error code —
    /// the caller must not distinguish which stage failed.
    pub fn parse(token: &str) -> Result<Self> {
        let mut parts = token.split('.');
        let header_b64 = parts.next().ok_or(VerifierError::InvalidTokenFormat)?;
        let payload_b64 = parts.next().ok_or(VerifierError::InvalidTokenFormat)?;
        let signature_b64 = parts.next().ok_or(VerifierError::InvalidTokenFormat)?;
        if parts.next().is_some() {
            return Err(VerifierError::InvalidTokenFormat);
        }

        let header_bytes = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| VerifierError::InvalidTokenFormat)?;
        let header: Header =
            serde_json::from_slice(&header_bytes).map_err(|_| VerifierError::InvalidTokenFormat)?;

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| VerifierError::InvalidTokenFormat)?;
        let claims: Value = serde_json::from_slice(&payload_bytes)
            .map_err(|_| VerifierError::InvalidTokenFormat)?;
        if !claims.is_object() {
            return Err(VerifierError::InvalidTokenFormat);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| VerifierError::InvalidTokenFormat)?;

        Ok(Self {
            header_b64: header_b64.to_string(),
            payload_b64: payload_b64.to_string(),
            header,
            claims,
            signature,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The exact bytes that were signed: the original base64url header and
    /// payload segments joined by a single period. Never reconstructed
    /// from the parsed JSON.
    pub fn signing_input(&self) -> Vec<u8> {
        format!("{}.{}", self.header_b64, self.payload_b64).into_bytes()
    }

    pub fn signature_bytes(&self) -> &[u8] {
        &self.signature
    }

    /// Look up a string-valued claim by name.
    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Value::as_str)
    }

    /// Look up a numeric claim (`iat`, `nbf`, `exp`) as seconds since epoch.
    pub fn claim_i64(&self, name: &str) -> Option<i64> {
        self.claims.get(name).and_then(Value::as_i64)
    }

    /// The holder identifier: `sub` is preferred, `holder_id` is the fallback.
    pub fn holder_id(&self) -> Option<&str> {
        self.claim_str("sub").or_else(|| self.claim_str("holder_id"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::signature::{generate_signing_key, sign_message};

    fn encode_segment(value: &Value) -> String {
        URL_SAFE_NO_PAD.encode(value.to_string())
    }

    fn build_token(header: &Value, payload: &Value, sign: bool) -> String {
        let header_b64 = encode_segment(header);
        let payload_b64 = encode_segment(payload);
        let signing_input = format!("{header_b64}.{payload_b64}");
        let signature_b64 = if sign {
            let key = generate_signing_key();
            let sig = sign_message(signing_input.as_bytes(), &key);
            URL_SAFE_NO_PAD.encode(sig)
        } else {
            URL_SAFE_NO_PAD.encode([0u8; 64])
        };
        format!("{signing_input}.{signature_b64}")
    }

    #[test]
    fn parses_well_formed_token() {
        let header = serde_json::json!({"alg": "ES256", "typ": "JWT", "kid": "did:jwk:xyz"});
        let payload = serde_json::json!({"aud": "urn:example:verifier", "nonce": "abc", "sub": "did:example:h1"});
        let token = build_token(&header, &payload, true);

        let assertion = Assertion::parse(&token).unwrap();
        assert_eq!(assertion.header().alg, "ES256");
        assert_eq!(assertion.header().kid, "did:jwk:xyz");
        assert_eq!(assertion.claim_str("nonce"), Some("abc"));
        assert_eq!(assertion.holder_id(), Some("did:example:h1"));
    }

    #[test]
    fn holder_id_falls_back_to_holder_id_field() {
        let header = serde_json::json!({"alg": "ES256"});
        let payload = serde_json::json!({"holder_id": "did:example:h2"});
        let token = build_token(&header, &payload, true);

        let assertion = Assertion::parse(&token).unwrap();
        assert_eq!(assertion.holder_id(), Some("did:example:h2"));
    }

    #[test]
    fn rejects_too_few_segments() {
        let err = Assertion::parse("only.two").unwrap_err();
        assert_eq!(err, VerifierError::InvalidTokenFormat);
    }

    #[test]
    fn rejects_too_many_segments() {
        let err = Assertion::parse("a.b.c.d").unwrap_err();
        assert_eq!(err, VerifierError::InvalidTokenFormat);
    }

    #[test]
    fn rejects_non_base64_header() {
        let err = Assertion::parse("not base64!.cGF5bG9hZA.c2ln").unwrap_err();
        assert_eq!(err, VerifierError::InvalidTokenFormat);
    }

    #[test]
    fn rejects_non_object_payload() {
        let header = serde_json::json!({"alg": "ES256"});
        let payload = serde_json::json!(["not", "an", "object"]);
        let token = build_token(&header, &payload, true);
        let err = Assertion::parse(&token).unwrap_err();
        assert_eq!(err, VerifierError::InvalidTokenFormat);
    }

    #[test]
    fn signing_input_uses_the_original_segment_bytes() {
        let header = serde_json::json!({"alg": "ES256"});
        let payload = serde_json::json!({"nonce": "abc", "extra": "  spacey  "});
        let token = build_token(&header, &payload, true);
        let header_b64 = token.split('.').next().unwrap();
        let payload_b64 = token.split('.').nth(1).unwrap();

        let assertion = Assertion::parse(&token).unwrap();
        assert_eq!(
            assertion.signing_input(),
            format!("{header_b64}.{payload_b64}").into_bytes()
        );
    }
}
