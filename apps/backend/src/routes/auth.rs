use std::time::SystemTime;

use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::claims::AccessClaims;
use crate::auth::jwt::mint_token;
use crate::db::require_db;
use crate::entities::users;
use crate::error::AppError;
use crate::repos::users as users_repo;
use crate::routes::fmt_timestamp;
use crate::services::users as users_service;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
struct RegisterResponse {
    message: &'static str,
    user: RegisteredUser,
    token: String,
}

#[derive(Debug, Serialize)]
struct RegisteredUser {
    id: i64,
    username: String,
    email: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    message: &'static str,
    user: LoginUser,
    token: String,
}

#[derive(Debug, Serialize)]
struct LoginUser {
    id: i64,
    username: String,
    email: String,
    last_login: Option<String>,
}

#[derive(Debug, Serialize)]
struct MeResponse {
    user: MeUser,
}

#[derive(Debug, Serialize)]
struct MeUser {
    id: i64,
    username: String,
    email: String,
    created_at: String,
    last_login: Option<String>,
}

#[derive(Debug, Serialize)]
struct VerifyResponse {
    message: &'static str,
    #[serde(rename = "userId")]
    user_id: i64,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

/// Mint an access token asserting `{userId}` for the given user.
pub fn issue_token(user_id: i64, security: &SecurityConfig) -> String {
    let mut claims = Map::new();
    claims.insert("userId".to_string(), Value::from(user_id));
    mint_token(claims, SystemTime::now(), security)
}

/// Minimal `local@domain` shape check; full RFC validation is the mail
/// server's problem.
fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Create a new account and log it straight in.
async fn register(
    req: web::Json<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let username = req.username.trim();
    let email = req.email.trim();

    if username.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(AppError::bad_request(
            "MISSING_FIELDS",
            "Username, email, and password are required".to_string(),
        ));
    }

    if req.password.len() < 6 {
        return Err(AppError::bad_request(
            "PASSWORD_TOO_SHORT",
            "Password must be at least 6 characters long".to_string(),
        ));
    }

    if !is_valid_email(email) {
        return Err(AppError::bad_request(
            "INVALID_EMAIL",
            "Invalid email format".to_string(),
        ));
    }

    let db = require_db(&app_state)?;
    let user =
        users_service::register(db, username, email, &req.password, &app_state.security).await?;

    let token = issue_token(user.id, &app_state.security);

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully",
        user: RegisteredUser {
            id: user.id,
            username: user.username,
            email: user.email,
        },
        token,
    }))
}

/// Exchange email + password for an access token.
async fn login(
    req: web::Json<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let email = req.email.trim();

    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::bad_request(
            "MISSING_FIELDS",
            "Email and password are required".to_string(),
        ));
    }

    let db = require_db(&app_state)?;
    let user = users_service::login(db, email, &req.password).await?;

    let token = issue_token(user.id, &app_state.security);

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful",
        user: LoginUser {
            id: user.id,
            username: user.username,
            email: user.email,
            last_login: user.last_login.map(fmt_timestamp),
        },
        token,
    }))
}

/// Current account details for the authenticated user.
async fn me(
    claims: AccessClaims,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;

    let user: users::Model = users_repo::find_by_id(db, claims.user_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("USER_NOT_FOUND", "User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(MeResponse {
        user: MeUser {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: fmt_timestamp(user.created_at),
            last_login: user.last_login.map(fmt_timestamp),
        },
    }))
}

/// Logout is client-side token deletion; the token stays valid until its
/// exp. The guard still runs so an unauthenticated logout is rejected.
async fn logout(_claims: AccessClaims) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Logged out successfully",
    }))
}

/// Cheap token validity probe for the frontend auth manager.
async fn verify(claims: AccessClaims) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(VerifyResponse {
        message: "Token is valid",
        user_id: claims.user_id,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/logout").route(web::post().to(logout)))
        .service(web::resource("/me").route(web::get().to(me)))
        .service(web::resource("/verify").route(web::get().to(verify)));
}

#[cfg(test)]
mod tests {
    use super::is_valid_email;

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("trainer@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));

        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@domain.com "));
        assert!(!is_valid_email("us er@domain.com"));
    }
}
