//! Token and account helpers for integration tests

use std::time::{Duration, SystemTime};

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, Error};
use backend::issue_token;
use backend::mint_token;
use backend::state::security_config::SecurityConfig;
use serde_json::{json, Map, Value};

/// Register a fresh user through the API; returns (user_id, token).
pub async fn register_user<S>(app: &S, username: &str, email: &str, password: &str) -> (i64, String)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": username,
            "email": email,
            "password": password,
        }))
        .to_request();

    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 201, "registration should succeed");

    let body: Value = test::read_body_json(resp).await;
    let user_id = body["user"]["id"].as_i64().expect("user id in response");
    let token = body["token"].as_str().expect("token in response").to_string();
    (user_id, token)
}

/// Mint a valid bearer token for the given user id.
pub fn mint_test_token(user_id: i64, sec: &SecurityConfig) -> String {
    issue_token(user_id, sec)
}

/// Full Authorization header value including the "Bearer " prefix.
pub fn bearer_header(user_id: i64, sec: &SecurityConfig) -> String {
    format!("Bearer {}", mint_test_token(user_id, sec))
}

/// Mint a token whose exp is already behind us. The signature is still
/// valid, so this exercises the expiry branch specifically.
pub fn mint_expired_token(user_id: i64, sec: &SecurityConfig) -> String {
    let past = SystemTime::now() - sec.session_ttl - Duration::from_secs(3600);

    let mut claims = Map::new();
    claims.insert("userId".to_string(), Value::from(user_id));
    mint_token(claims, past, sec)
}
