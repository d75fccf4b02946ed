mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use backend::decode_token;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use backend_test_support::unique_helpers::{unique_email, unique_str};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;
use support::auth::register_user;
use support::create_test_app;
use support::test_state::{build_test_state, test_security};

#[actix_web::test]
async fn login_returns_token_for_registered_user() -> Result<(), Box<dyn std::error::Error>> {
    let security = test_security();
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let username = unique_str("login");
    let email = unique_email("login");
    let (user_id, _) = register_user(&app, &username, &email, "opening-hand").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": "opening-hand" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["id"].as_i64(), Some(user_id));
    assert_eq!(body["user"]["username"], username.as_str());
    // Registration already touched last_login, so it is present by now
    assert!(body["user"]["last_login"].as_str().is_some());

    let token = body["token"].as_str().expect("token in response");
    let payload = decode_token(token, &security).expect("token should verify");
    assert_eq!(
        payload.get("userId").and_then(serde_json::Value::as_i64),
        Some(user_id)
    );

    Ok(())
}

#[actix_web::test]
async fn login_rejects_bad_credentials_uniformly() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let email = unique_email("creds");
    register_user(&app, &unique_str("creds"), &email, "opening-hand").await;

    // Wrong password
    let wrong_password = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": "wrong-hand" }))
        .to_request();
    let resp = test::call_service(&app, wrong_password).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_CREDENTIALS",
        StatusCode::UNAUTHORIZED,
        Some("Invalid credentials"),
    )
    .await;

    // Unknown email yields the same code, not a user-enumeration hint
    let unknown_email = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": unique_email("ghost"), "password": "opening-hand" }))
        .to_request();
    let resp = test::call_service(&app, unknown_email).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_CREDENTIALS",
        StatusCode::UNAUTHORIZED,
        Some("Invalid credentials"),
    )
    .await;

    // Missing fields
    let missing = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email }))
        .to_request();
    let resp = test::call_service(&app, missing).await;
    assert_problem_details_from_service_response(
        resp,
        "MISSING_FIELDS",
        StatusCode::BAD_REQUEST,
        Some("required"),
    )
    .await;

    Ok(())
}

#[actix_web::test]
async fn login_rejects_disabled_accounts() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;

    let email = unique_email("disabled");
    let (user_id, _) = register_user(&app, &unique_str("disabled"), &email, "opening-hand").await;

    // Disable the account directly in the store
    let db = state.db().expect("test state has a db");
    let user_active = backend::entities::users::ActiveModel {
        id: Set(user_id),
        is_active: Set(false),
        ..Default::default()
    };
    user_active.update(db).await?;

    // Correct password, disabled account: 403, not 401
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": "opening-hand" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "ACCOUNT_DISABLED",
        StatusCode::FORBIDDEN,
        Some("disabled"),
    )
    .await;

    Ok(())
}
