//! Typed view of an access-token payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::jwt::TokenError;

/// Authenticated principal carried by a verified access token. Stored in
/// request extensions / handed to handlers by the `AccessClaims` extractor.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Subject user id (`users.id`)
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl AccessClaims {
    /// Parse the typed principal out of a decoded payload map.
    ///
    /// A token that verified but does not carry an integer `userId` is not
    /// one of ours; it is reported as invalid, not a server error.
    pub fn from_payload(payload: Map<String, Value>) -> Result<Self, TokenError> {
        serde_json::from_value(Value::Object(payload)).map_err(|_| TokenError::Malformed)
    }
}
