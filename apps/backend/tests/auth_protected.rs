//! Guard behavior on protected endpoints: 401 for a missing bearer, 403 for
//! anything that fails verification, and the end-to-end token flow.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use backend::SecurityConfig;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use backend_test_support::unique_helpers::{unique_email, unique_str};
use support::auth::{bearer_header, mint_expired_token, mint_test_token, register_user};
use support::create_test_app;
use support::test_state::{build_test_state, test_security};

#[actix_web::test]
async fn end_to_end_token_flow() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let username = unique_str("e2e");
    let email = unique_email("e2e");
    let (user_id, token) = register_user(&app, &username, &email, "opening-hand").await;

    // /me returns the stored account
    let me = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, me).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"].as_i64(), Some(user_id));
    assert_eq!(body["user"]["username"], username.as_str());
    assert!(body["user"]["created_at"].as_str().is_some());

    // /verify echoes the principal without touching the store
    let verify = test::TestRequest::get()
        .uri("/api/auth/verify")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, verify).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Token is valid");
    assert_eq!(body["userId"].as_i64(), Some(user_id));

    // /logout succeeds and is stateless: the token still works afterwards
    let logout = test::TestRequest::post()
        .uri("/api/auth/logout")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, logout).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let verify_again = test::TestRequest::get()
        .uri("/api/auth/verify")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, verify_again).await;
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

#[actix_web::test]
async fn missing_bearer_is_401() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    for uri in ["/api/auth/me", "/api/auth/verify"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details_from_service_response(
            resp,
            "ACCESS_TOKEN_REQUIRED",
            StatusCode::UNAUTHORIZED,
            Some("Access token required"),
        )
        .await;
    }

    // Wrong scheme reads as absent, same 401
    let basic = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", "Basic abc"))
        .to_request();
    let resp = test::call_service(&app, basic).await;
    assert_problem_details_from_service_response(
        resp,
        "ACCESS_TOKEN_REQUIRED",
        StatusCode::UNAUTHORIZED,
        None,
    )
    .await;

    let logout = test::TestRequest::post().uri("/api/auth/logout").to_request();
    let resp = test::call_service(&app, logout).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[actix_web::test]
async fn unverifiable_tokens_are_403() -> Result<(), Box<dyn std::error::Error>> {
    let security = test_security();
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let garbage = "Bearer not.a.token".to_string();
    let wrong_key = format!(
        "Bearer {}",
        mint_test_token(1, &SecurityConfig::new("some-other-secret".as_bytes()))
    );
    let expired = format!("Bearer {}", mint_expired_token(1, &security));

    for header in [garbage, wrong_key, expired] {
        let req = test::TestRequest::get()
            .uri("/api/auth/verify")
            .insert_header(("Authorization", header.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details_from_service_response(
            resp,
            "INVALID_OR_EXPIRED_TOKEN",
            StatusCode::FORBIDDEN,
            Some("Invalid or expired token"),
        )
        .await;
    }

    Ok(())
}

#[actix_web::test]
async fn me_is_404_when_the_user_is_gone() -> Result<(), Box<dyn std::error::Error>> {
    let security = test_security();
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    // Valid token for an id that was never created
    let header = bearer_header(999_999, &security);

    let me = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", header.clone()))
        .to_request();
    let resp = test::call_service(&app, me).await;
    assert_problem_details_from_service_response(
        resp,
        "USER_NOT_FOUND",
        StatusCode::NOT_FOUND,
        Some("User not found"),
    )
    .await;

    // /verify only checks the token, so it still accepts the principal
    let verify = test::TestRequest::get()
        .uri("/api/auth/verify")
        .insert_header(("Authorization", header))
        .to_request();
    let resp = test::call_service(&app, verify).await;
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}
