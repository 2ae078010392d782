mod test_utils;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use teamsync_core::models::community::ConfigDocument;
use test_utils::TestContext;

#[tokio::test]
async fn test_health_reports_engine_status() {
    let ctx = TestContext::new(ConfigDocument::default());
    {
        let mut status = ctx.state.status.write().await;
        status.running = true;
        status.ticks = 3;
        status.total_emitted = 2;
    }

    let (status, body) = ctx.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["engine"]["running"], true);
    assert_eq!(body["engine"]["ticks"], 3);
    assert_eq!(body["engine"]["total_emitted"], 2);
}

#[tokio::test]
async fn test_health_is_degraded_after_a_failed_tick() {
    let ctx = TestContext::new(ConfigDocument::default());
    ctx.state.status.write().await.last_error = Some("disk full".to_string());

    let (_, body) = ctx.get("/health").await;

    assert_eq!(body["status"], "degraded");
    assert_eq!(body["engine"]["last_error"], "disk full");
}

#[tokio::test]
async fn test_version() {
    let ctx = TestContext::new(ConfigDocument::default());

    let (status, body) = ctx.get("/version").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_unknown_route() {
    let ctx = TestContext::new(ConfigDocument::default());

    let (status, _) = ctx.get("/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
