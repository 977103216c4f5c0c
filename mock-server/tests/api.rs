use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_get_with_query() {
    let resp = app()
        .oneshot(empty_request("GET", "/echo?foo%5B%5D=1&foo%5B%5D=2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.query.as_deref(), Some("foo%5B%5D=1&foo%5B%5D=2"));
    assert!(echo.body.is_empty());
}

#[tokio::test]
async fn echo_reflects_body_and_headers() {
    let req = Request::builder()
        .method("POST")
        .uri("/echo")
        .header(http::header::CONTENT_TYPE, "application/json;charset=utf-8")
        .header("X-Custom", "yes")
        .body(r#"{"a":1}"#.to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.body, r#"{"a":1}"#);
    assert_eq!(echo.headers["content-type"], "application/json;charset=utf-8");
    assert_eq!(echo.headers["x-custom"], "yes");
    assert!(echo.query.is_none());
}

#[tokio::test]
async fn echo_accepts_every_method() {
    for method in ["GET", "DELETE", "OPTIONS", "POST", "PUT", "PATCH"] {
        let resp = app().oneshot(empty_request(method, "/echo")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{method}");
        let echo: Echo = body_json(resp).await;
        assert_eq!(echo.method, method);
    }
}

// --- status ---

#[tokio::test]
async fn status_route_returns_requested_code() {
    let resp = app().oneshot(empty_request("GET", "/status/404")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_bytes(resp).await, "Not Found");
}

#[tokio::test]
async fn status_route_rejects_non_numeric_code() {
    let resp = app().oneshot(empty_request("GET", "/status/abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delay ---

#[tokio::test]
async fn delay_route_eventually_responds() {
    let resp = app().oneshot(empty_request("GET", "/delay/10")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, "done");
}

// --- text ---

#[tokio::test]
async fn text_route_is_not_json() {
    let resp = app().oneshot(empty_request("GET", "/text")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<serde_json::Value>(&bytes).is_err());
    assert_eq!(bytes, "hello, plain world");
}
