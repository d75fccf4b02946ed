mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use backend::decode_token;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use backend_test_support::unique_helpers::{unique_email, unique_str};
use serde_json::json;
use support::create_test_app;
use support::test_state::{build_test_state, test_security};

#[actix_web::test]
async fn register_creates_user_and_returns_usable_token(
) -> Result<(), Box<dyn std::error::Error>> {
    let security = test_security();
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let username = unique_str("trainer");
    let email = unique_email("trainer");

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": username,
            "email": email,
            "password": "opening-hand",
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["username"], username.as_str());
    assert_eq!(body["user"]["email"], email.as_str());

    // The issued token asserts this user and the configured 7-day lifetime
    let token = body["token"].as_str().expect("token in response");
    let payload = decode_token(token, &security).expect("token should verify");
    assert_eq!(
        payload.get("userId").and_then(serde_json::Value::as_i64),
        body["user"]["id"].as_i64()
    );
    let iat = payload.get("iat").and_then(serde_json::Value::as_i64).unwrap();
    let exp = payload.get("exp").and_then(serde_json::Value::as_i64).unwrap();
    assert_eq!(exp - iat, 7 * 24 * 60 * 60);

    Ok(())
}

#[actix_web::test]
async fn register_rejects_duplicate_email_and_username(
) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let username = unique_str("dup");
    let email = unique_email("dup");

    let first = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": username, "email": email, "password": "secret1" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, first).await.status(),
        StatusCode::CREATED
    );

    // Same email, fresh username
    let same_email = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": unique_str("dup"),
            "email": email,
            "password": "secret1",
        }))
        .to_request();
    let resp = test::call_service(&app, same_email).await;
    assert_problem_details_from_service_response(
        resp,
        "EMAIL_TAKEN",
        StatusCode::CONFLICT,
        Some("already registered"),
    )
    .await;

    // Same username, fresh email
    let same_username = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": username,
            "email": unique_email("dup"),
            "password": "secret1",
        }))
        .to_request();
    let resp = test::call_service(&app, same_username).await;
    assert_problem_details_from_service_response(
        resp,
        "USERNAME_TAKEN",
        StatusCode::CONFLICT,
        Some("already taken"),
    )
    .await;

    Ok(())
}

#[actix_web::test]
async fn register_validates_fields() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    // All fields missing
    let empty = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, empty).await;
    assert_problem_details_from_service_response(
        resp,
        "MISSING_FIELDS",
        StatusCode::BAD_REQUEST,
        Some("required"),
    )
    .await;

    // Password too short
    let short_password = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": unique_str("val"),
            "email": unique_email("val"),
            "password": "five5",
        }))
        .to_request();
    let resp = test::call_service(&app, short_password).await;
    assert_problem_details_from_service_response(
        resp,
        "PASSWORD_TOO_SHORT",
        StatusCode::BAD_REQUEST,
        Some("at least 6 characters"),
    )
    .await;

    // Email without a domain
    let bad_email = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": unique_str("val"),
            "email": "not-an-email",
            "password": "secret1",
        }))
        .to_request();
    let resp = test::call_service(&app, bad_email).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_EMAIL",
        StatusCode::BAD_REQUEST,
        Some("Invalid email"),
    )
    .await;

    Ok(())
}
