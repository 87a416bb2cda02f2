mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let ctx = common::create_test_state();
    let server = common::test_server(&ctx);

    let response = server.get("/api/v1/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let ctx = common::create_test_state();
    let server = common::test_server(&ctx);

    let response = server.get("/api/v1/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("database").is_some());
    assert!(json["checks"].get("cache").is_some());
    assert_eq!(json["checks"]["cache"]["message"], "memory connected");
}

#[tokio::test]
async fn test_health_is_public() {
    let ctx = common::create_test_state();
    let server = common::test_server(&ctx);

    let response = server.get("/api/v1/health").await;

    assert_ne!(response.status_code(), StatusCode::UNAUTHORIZED);
}
