//! Request guard for protected endpoints.
//!
//! `AccessClaims: FromRequest` is the per-route equivalent of the frontend
//! contract: no bearer token → 401, any token that fails verification →
//! 403. Handlers that take `AccessClaims` as a parameter are guarded; the
//! extractor does no I/O beyond header inspection and HMAC verification.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use tracing::debug;

use crate::auth::claims::AccessClaims;
use crate::auth::jwt::decode_token;
use crate::error::AppError;
use crate::extractors::auth_token::bearer_token;
use crate::state::app_state::AppState;

impl FromRequest for AccessClaims {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = bearer_token(&req)?;

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available".to_string()))?;

            let payload = decode_token(&token, &app_state.security).map_err(|e| {
                debug!(reason = %e, "access token rejected");
                AppError::forbidden_invalid_token()
            })?;

            AccessClaims::from_payload(payload).map_err(|e| {
                debug!(reason = %e, "access token payload not usable as claims");
                AppError::forbidden_invalid_token()
            })
        })
    }
}
