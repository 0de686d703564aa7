mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::TestContext;
use lc_api::create_app;
use serde_json::Value;

#[actix_web::test]
async fn test_health_check() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "live-commerce-api");
    assert!(body["version"].is_string());
}

#[actix_web::test]
async fn test_unknown_route_returns_json_404() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/api/v1/nothing-here").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found");
}
