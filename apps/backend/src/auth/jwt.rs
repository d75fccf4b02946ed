//! Hand-rolled HS256 access tokens.
//!
//! Wire format is the compact JWT serialization:
//! `b64url(header).b64url(payload).b64url(hmac_sha256(header "." payload))`
//! with the fixed header `{"typ":"JWT","alg":"HS256"}` and an unpadded
//! URL-safe base64 alphabet. Tokens are stateless: `iat`/`exp` are stamped
//! at mint time and there is no server-side revocation.
//!
//! Decode checks structure, then signature, then expiry, in that order.
//! A well-formed, correctly signed but expired token reports `Expired`,
//! never `InvalidSignature`.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::GeneralPurpose;
use base64::engine::{DecodePaddingMode, GeneralPurposeConfig};
use base64::{alphabet, Engine};
use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha256;
use thiserror::Error;

use crate::state::security_config::SecurityConfig;

type HmacSha256 = Hmac<Sha256>;

/// Fixed token header. Key order is part of the wire format.
const HEADER_JSON: &[u8] = br#"{"typ":"JWT","alg":"HS256"}"#;

/// Unpadded URL-safe base64; decoding tolerates padded input from older
/// clients.
const B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Not three dot-separated segments, or header/payload is not
    /// base64url-encoded JSON object data.
    #[error("malformed token")]
    Malformed,
    /// Signature segment does not match a recomputation under our secret.
    #[error("invalid signature")]
    InvalidSignature,
    /// Signature checks out but `exp` is absent or in the past.
    #[error("token expired")]
    Expired,
}

/// Mint a signed token carrying `extra_claims` plus `iat`/`exp`.
///
/// Caller-supplied values for `iat`/`exp` are overwritten; the lifetime
/// always comes from `security.session_ttl`. Infallible: a claims map is
/// always serializable and HMAC-SHA256 accepts keys of any length.
pub fn mint_token(
    extra_claims: Map<String, Value>,
    now: SystemTime,
    security: &SecurityConfig,
) -> String {
    let iat = unix_seconds(now);
    let exp = iat + security.session_ttl.as_secs() as i64;

    let mut payload = extra_claims;
    payload.insert("iat".to_string(), Value::from(iat));
    payload.insert("exp".to_string(), Value::from(exp));

    let header_b64 = B64.encode(HEADER_JSON);
    let payload_b64 = B64.encode(Value::Object(payload).to_string());

    let signing_input = format!("{header_b64}.{payload_b64}");
    let signature_b64 = B64.encode(sign(signing_input.as_bytes(), &security.jwt_secret));

    format!("{signing_input}.{signature_b64}")
}

/// Verify a token and return its payload claims.
pub fn decode_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<Map<String, Value>, TokenError> {
    decode_token_at(token, SystemTime::now(), security)
}

fn decode_token_at(
    token: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<Map<String, Value>, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Malformed);
    }
    let (header_b64, payload_b64, signature_b64) = (parts[0], parts[1], parts[2]);

    // Structure: header and payload must be base64url JSON objects.
    decode_json_object(header_b64)?;
    let payload = decode_json_object(payload_b64)?;

    // Signature over the two received segments, compared in constant time.
    let signature = B64
        .decode(signature_b64)
        .map_err(|_| TokenError::InvalidSignature)?;
    let signing_input = format!("{header_b64}.{payload_b64}");
    verify(signing_input.as_bytes(), &signature, &security.jwt_secret)?;

    // Expiry last: a correctly signed token past its exp is Expired, not
    // invalid. `exp == now` is still accepted.
    match payload.get("exp").and_then(Value::as_i64) {
        Some(exp) if exp >= unix_seconds(now) => Ok(payload),
        _ => Err(TokenError::Expired),
    }
}

fn decode_json_object(segment: &str) -> Result<Map<String, Value>, TokenError> {
    let bytes = B64.decode(segment).map_err(|_| TokenError::Malformed)?;
    match serde_json::from_slice(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(TokenError::Malformed),
    }
}

fn sign(signing_input: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC key must be valid");
    mac.update(signing_input);
    mac.finalize().into_bytes().to_vec()
}

fn verify(signing_input: &[u8], signature: &[u8], secret: &[u8]) -> Result<(), TokenError> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC key must be valid");
    mac.update(signing_input);
    // verify_slice is a constant-time comparison
    mac.verify_slice(signature)
        .map_err(|_| TokenError::InvalidSignature)
}

fn unix_seconds(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}
