//! Account flows: registration and credential login.

use sea_orm::ConnectionTrait;
use tracing::{debug, info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::entities::users;
use crate::error::AppError;
use crate::repos::users as users_repo;
use crate::state::security_config::SecurityConfig;

/// Register a new account.
///
/// Uniqueness is checked on email first, then username, mirroring the
/// response codes the frontend distinguishes. The field-shape validation
/// (presence, password length, email format) happens at the route boundary.
pub async fn register(
    conn: &(impl ConnectionTrait + Send + Sync),
    username: &str,
    email: &str,
    password: &str,
    security: &SecurityConfig,
) -> Result<users::Model, AppError> {
    if users_repo::find_by_email(conn, email).await?.is_some() {
        debug!(username, "registration rejected: email already registered");
        return Err(AppError::conflict(
            "EMAIL_TAKEN",
            "Email already registered".to_string(),
        ));
    }

    if users_repo::find_by_username(conn, username).await?.is_some() {
        debug!(username, "registration rejected: username already taken");
        return Err(AppError::conflict(
            "USERNAME_TAKEN",
            "Username already taken".to_string(),
        ));
    }

    let password_hash = hash_password(password, security.bcrypt_cost)?;

    let user = users_repo::create_user(conn, username, email, &password_hash).await?;
    users_repo::touch_last_login(conn, user.id).await?;

    info!(user_id = user.id, username, "user registered");
    Ok(user)
}

/// Authenticate an email/password pair.
///
/// Unknown email and wrong password are deliberately indistinguishable.
/// The active-flag check runs after password verification, so a disabled
/// account with a wrong password still reads as invalid credentials.
pub async fn login(
    conn: &(impl ConnectionTrait + Send + Sync),
    email: &str,
    password: &str,
) -> Result<users::Model, AppError> {
    let user = users_repo::find_by_email(conn, email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(password, &user.password_hash)? {
        debug!(user_id = user.id, "login rejected: wrong password");
        return Err(AppError::invalid_credentials());
    }

    if !user.is_active {
        warn!(user_id = user.id, "login rejected: account disabled");
        return Err(AppError::account_disabled());
    }

    users_repo::touch_last_login(conn, user.id).await?;

    debug!(user_id = user.id, "login ok");
    Ok(user)
}
