use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest};

use crate::error::AppError;

/// Bearer token extracted from the Authorization header
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
}

/// Parse `Authorization: Bearer <token>` out of a request.
///
/// Header name lookup is case-insensitive (HTTP semantics). The value must
/// be exactly the `Bearer` scheme keyword plus one non-empty token; anything
/// else is treated the same as an absent header.
pub fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(AppError::unauthorized_missing_bearer)?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;

    let parts: Vec<&str> = auth_value.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(AppError::unauthorized_missing_bearer());
    }

    let token = parts[1];
    if token.is_empty() {
        return Err(AppError::unauthorized_missing_bearer());
    }

    Ok(token.to_string())
}

impl FromRequest for AuthToken {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = bearer_token(&req)?;
            Ok(AuthToken { token })
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use actix_web::FromRequest;

    use super::{bearer_token, AuthToken};
    use crate::error::AppError;

    #[actix_web::test]
    async fn extractor_yields_the_token() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();

        let auth = AuthToken::extract(&req).await.unwrap();
        assert_eq!(auth.token, "abc.def.ghi");
    }

    #[test]
    fn extracts_the_token_after_the_bearer_keyword() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();

        assert_eq!(bearer_token(&req).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn header_name_is_case_insensitive() {
        let req = TestRequest::default()
            .insert_header(("authorization", "Bearer abc.def.ghi"))
            .to_http_request();

        assert_eq!(bearer_token(&req).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_absent() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            bearer_token(&req),
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[test]
    fn wrong_scheme_is_absent() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic abc.def.ghi"))
            .to_http_request();

        assert!(bearer_token(&req).is_err());
    }

    #[test]
    fn bare_scheme_or_extra_parts_are_absent() {
        for value in ["Bearer", "Bearer ", "Bearer a b"] {
            let req = TestRequest::default()
                .insert_header(("Authorization", value))
                .to_http_request();

            assert!(bearer_token(&req).is_err(), "value {value:?}");
        }
    }
}
