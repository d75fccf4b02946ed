use std::time::Duration;

/// Default token lifetime: 7 days, matching the session duration the
/// frontend was built around.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default bcrypt cost factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Immutable security settings, constructed once at startup and shared
/// read-only through `AppState`.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// HMAC secret for signing and verifying access tokens
    pub jwt_secret: Vec<u8>,
    /// Lifetime of issued tokens (`exp - iat`)
    pub session_ttl: Duration,
    /// bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given secret and default
    /// session TTL / bcrypt cost.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            session_ttl: DEFAULT_SESSION_TTL,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    pub fn with_session_ttl(mut self, session_ttl: Duration) -> Self {
        self.session_ttl = session_ttl;
        self
    }

    pub fn with_bcrypt_cost(mut self, bcrypt_cost: u32) -> Self {
        self.bcrypt_cost = bcrypt_cost;
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
