pub mod access_claims;
pub mod auth_token;
