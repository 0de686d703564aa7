//! Social token login and the browser OAuth flow over HTTP

mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use common::TestContext;
use lc_api::create_app;
use serde_json::{json, Value};

fn social_login(provider: &str, token: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(&format!("/auth/social/{}", provider))
        .set_json(json!({ "access_token": token }))
}

async fn body_text(resp: actix_web::dev::ServiceResponse) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[actix_web::test]
async fn test_line_login_creates_then_reuses_account() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, social_login("line", "line-access-token").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let first: Value = test::read_body_json(resp).await;
    assert_eq!(first["display_name"], "Line Tester");
    assert_eq!(first["token_type"], "bearer");

    let resp = test::call_service(&app, social_login("LINE", "another-token").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let second: Value = test::read_body_json(resp).await;
    assert_eq!(second["user_id"], first["user_id"]);
    assert_eq!(ctx.store.user_count().await, 1);
    assert_eq!(ctx.store.social_account_count().await, 1);
}

#[actix_web::test]
async fn test_social_login_failures() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, social_login("line", "bad").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(&app, social_login("apple", "token").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_implemented");

    let resp = test::call_service(&app, social_login("google", "id-token").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "provider_not_configured");

    let resp = test::call_service(&app, social_login("myspace", "token").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unknown_provider");

    let resp = test::call_service(&app, social_login("line", "").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.store.user_count().await, 0);
}

#[actix_web::test]
async fn test_browser_flow_is_single_read() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post().uri("/auth/social/line/session").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let start: Value = test::read_body_json(resp).await;
    let session_id = start["session_id"].as_str().unwrap().to_string();
    let authorize_url = start["authorize_url"].as_str().unwrap();
    assert!(authorize_url.contains(&session_id));
    assert!(authorize_url.contains("/auth/social/line/callback"));

    let status_uri = format!("/auth/social/session/{}/status", session_id);
    let req = test::TestRequest::get().uri(&status_uri).to_request();
    let status: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(status, json!({ "status": "pending" }));

    let req = test::TestRequest::get()
        .uri(&format!("/auth/social/line/callback?code=good-code&state={}", session_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    assert!(body_text(resp).await.contains("Login Successful!"));

    let req = test::TestRequest::get().uri(&status_uri).to_request();
    let status: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(status, json!({ "status": "completed", "access_token": "line-access-token" }));

    // Terminal records are cleared after the first read
    let req = test::TestRequest::get().uri(&status_uri).to_request();
    let status: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(status["status"], "pending");
}

#[actix_web::test]
async fn test_callback_records_provider_failures() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/auth/social/line/callback?state=denied-state&error=access_denied&error_description=User%20cancelled")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("User cancelled"));

    let req = test::TestRequest::get()
        .uri("/auth/social/session/denied-state/status")
        .to_request();
    let status: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(status, json!({ "status": "failed", "error": "User cancelled" }));

    let req = test::TestRequest::get()
        .uri("/auth/social/line/callback?code=expired-code&state=exchange-state")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Login Error"));

    let req = test::TestRequest::get()
        .uri("/auth/social/session/exchange-state/status")
        .to_request();
    let status: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(status["status"], "failed");
}

#[actix_web::test]
async fn test_callback_error_pages() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/auth/social/line/callback?state=some-state")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("Login Error"));

    let req = test::TestRequest::get()
        .uri("/auth/social/google/callback?code=abc&state=some-state")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let req = test::TestRequest::get()
        .uri("/auth/social/myspace/callback?code=abc&state=some-state")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("Login Error"));
}

#[actix_web::test]
async fn test_start_session_requires_configured_provider() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post().uri("/auth/social/facebook/session").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let req = test::TestRequest::get()
        .uri("/auth/social/session/never-started/status")
        .to_request();
    let status: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(status["status"], "pending");
}
