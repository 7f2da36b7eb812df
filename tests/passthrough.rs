//! Health, status and profile read/delete passthrough.

mod common;

use axum::http::Method;
use common::{closed_port, error_body, test_config, MockResponse, MockSlicer, TestProxy};
use serde_json::json;
use std::time::Duration;

async fn setup() -> (MockSlicer, TestProxy, tempfile::TempDir) {
    let mock = MockSlicer::start().await;
    let out = tempfile::tempdir().unwrap();
    let proxy = TestProxy::start(test_config(&mock.base_url(), out.path())).await;
    (mock, proxy, out)
}

#[tokio::test]
async fn test_health_passthrough() {
    let (mock, proxy, _out) = setup().await;
    mock.respond(
        Method::GET,
        "/api/health",
        MockResponse::json(200, json!({"status": "ok", "version": "2.1.0"})),
    );

    let res = reqwest::get(proxy.url("/health")).await.unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({"status": "ok", "version": "2.1.0"}));

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::GET);
    assert_eq!(calls[0].path, "/api/health");
}

#[tokio::test]
async fn test_status_passthrough() {
    let (mock, proxy, _out) = setup().await;
    mock.respond(
        Method::GET,
        "/api/slice/status",
        MockResponse::json(200, json!({"busy": false})),
    );

    let res = reqwest::get(proxy.url("/status")).await.unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["busy"], false);
}

#[tokio::test]
async fn test_list_profiles_passthrough() {
    let (mock, proxy, _out) = setup().await;
    mock.respond(
        Method::GET,
        "/api/profiles/filament",
        MockResponse::json(200, json!({"profiles": ["PLA"]})),
    );

    let res = reqwest::get(proxy.url("/profiles/filament")).await.unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({"profiles": ["PLA"]}));
}

#[tokio::test]
async fn test_get_profile_encodes_name() {
    let (mock, proxy, _out) = setup().await;
    mock.respond(
        Method::GET,
        "/api/profiles/printer/Voron%20350",
        MockResponse::json(200, json!({"name": "Voron 350"})),
    );

    let res = reqwest::get(proxy.url("/profiles/printer/Voron%20350"))
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Voron 350");
    assert_eq!(mock.calls()[0].path, "/api/profiles/printer/Voron%20350");
}

#[tokio::test]
async fn test_delete_profile() {
    let (mock, proxy, _out) = setup().await;
    mock.respond(
        Method::DELETE,
        "/api/profiles/process/Draft",
        MockResponse::json(200, json!({"deleted": "Draft"})),
    );

    let res = reqwest::Client::new()
        .delete(proxy.url("/profiles/process/Draft"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::DELETE);
}

#[tokio::test]
async fn test_backend_error_status_forwarded() {
    let (mock, proxy, _out) = setup().await;
    mock.respond(
        Method::GET,
        "/api/profiles/printer/Ghost",
        MockResponse::raw(404, "profile not found"),
    );

    let res = reqwest::get(proxy.url("/profiles/printer/Ghost")).await.unwrap();
    assert_eq!(res.status(), 404);
    let (code, message) = error_body(res).await;
    assert_eq!(code, 404);
    assert!(message.contains("profile not found"));
}

#[tokio::test]
async fn test_non_json_success_is_bad_gateway() {
    let (mock, proxy, _out) = setup().await;
    mock.respond(Method::GET, "/api/health", MockResponse::raw(200, "OK"));

    let res = reqwest::get(proxy.url("/health")).await.unwrap();
    assert_eq!(res.status(), 502);
    let (code, _) = error_body(res).await;
    assert_eq!(code, 502);
}

#[tokio::test]
async fn test_invalid_category_never_reaches_backend() {
    let (mock, proxy, _out) = setup().await;
    let client = reqwest::Client::new();

    let responses = vec![
        client.get(proxy.url("/profiles/nozzle")).send().await.unwrap(),
        client
            .post(proxy.url("/profiles/nozzle"))
            .body("x")
            .send()
            .await
            .unwrap(),
        client.get(proxy.url("/profiles/nozzle/A")).send().await.unwrap(),
        client
            .delete(proxy.url("/profiles/nozzle/A"))
            .send()
            .await
            .unwrap(),
        client
            .post(proxy.url("/profiles/nozzle/A"))
            .json(&json!({"new_name": "B"}))
            .send()
            .await
            .unwrap(),
    ];

    for res in responses {
        assert_eq!(res.status(), 400);
        let (code, message) = error_body(res).await;
        assert_eq!(code, 400);
        assert!(message.contains("nozzle"));
        assert!(message.contains("filament, printer, process"));
    }
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_unreachable_backend_is_503() {
    let addr = closed_port().await;
    let out = tempfile::tempdir().unwrap();
    let proxy = TestProxy::start(test_config(&format!("http://{}", addr), out.path())).await;

    let res = reqwest::get(proxy.url("/health")).await.unwrap();
    assert_eq!(res.status(), 503);
    let (code, message) = error_body(res).await;
    assert_eq!(code, 503);
    assert!(message.contains("unreachable"));
}

#[tokio::test]
async fn test_backend_timeout_is_503() {
    let mock = MockSlicer::start().await;
    mock.respond(
        Method::GET,
        "/api/slice/status",
        MockResponse::json(200, json!({"busy": true})).with_delay(Duration::from_secs(3)),
    );
    let out = tempfile::tempdir().unwrap();
    let mut config = test_config(&mock.base_url(), out.path());
    config.backend.simple_timeout_secs = 1;
    let proxy = TestProxy::start(config).await;

    let res = reqwest::get(proxy.url("/status")).await.unwrap();
    assert_eq!(res.status(), 503);
    let (_, message) = error_body(res).await;
    assert!(message.contains("timed out"));
}

#[tokio::test]
async fn test_request_id_propagated() {
    let (mock, proxy, _out) = setup().await;
    mock.respond(
        Method::GET,
        "/api/health",
        MockResponse::json(200, json!({"status": "ok"})),
    );

    let res = reqwest::get(proxy.url("/health")).await.unwrap();
    let request_id = res.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_routes_live_under_prefix_only() {
    let (mock, proxy, _out) = setup().await;
    mock.respond(
        Method::GET,
        "/api/health",
        MockResponse::json(200, json!({"status": "ok"})),
    );

    let res = reqwest::get(format!("http://{}/health", proxy.addr))
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(mock.call_count(), 0);
}
