//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use tower::ServiceExt;

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let test = common::build_test_app(vec![]);
    let response = get(test.app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let test = common::build_test_app(vec![]);
    let response = get(test.app(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let test = common::build_test_app(vec![]);
    let response = get(test.app(), "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36, "x-request-id should be a UUID");
}

#[tokio::test]
async fn cors_preflight_allows_frontend_origin() {
    let test = common::build_test_app(vec![]);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/generate-video")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = test.app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );
}
