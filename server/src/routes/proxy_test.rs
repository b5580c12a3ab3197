use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::response::AppendHeaders;
use axum::routing::{any, get};

use super::*;
use crate::config::ServerConfig;

// =============================================================
// Helpers
// =============================================================

fn config(api_base_url: &str) -> ServerConfig {
    ServerConfig {
        port: 0,
        api_base_url: api_base_url.to_owned(),
        proxy_timeout: Duration::from_secs(5),
        log_json: false,
    }
}

/// Upstream that echoes what it received and answers `/api/secure` with 401.
async fn spawn_upstream() -> String {
    async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Response {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let payload = serde_json::json!({
            "method": method.as_str(),
            "uri": uri.to_string(),
            "authorization": auth,
            "keep_alive": headers.contains_key("keep-alive"),
            "body": body,
        });
        (
            AppendHeaders([(header::SET_COOKIE, "a=1"), (header::SET_COOKIE, "b=2")]),
            axum::Json(payload),
        )
            .into_response()
    }

    let app = Router::new()
        .route("/api/secure", get(|| async { (StatusCode::UNAUTHORIZED, "expired") }))
        .route("/api/{*path}", any(echo));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn call(state: AppState, method: Method, uri: &str, headers: HeaderMap, body: &str) -> Response {
    forward(State(state), method, uri.parse().unwrap(), headers, Bytes::from(body.to_owned())).await
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================
// Pure helpers
// =============================================================

#[test]
fn upstream_url_keeps_path_and_query() {
    let uri: Uri = "/api/patients?page=2".parse().unwrap();
    assert_eq!(upstream_url("http://api:3000", &uri), "http://api:3000/api/patients?page=2");
    assert_eq!(upstream_url("http://api:3000/", &uri), "http://api:3000/api/patients?page=2");
}

#[test]
fn forwardable_strips_hop_by_hop_headers() {
    let mut headers = HeaderMap::new();
    headers.insert(header::HOST, HeaderValue::from_static("saluki.local"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-trace"));
    headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
    headers.insert("x-trace", HeaderValue::from_static("1"));
    headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
    headers.insert(header::COOKIE, HeaderValue::from_static("auth_token=abc"));

    let out = forwardable(&headers);
    assert_eq!(out.len(), 2);
    assert_eq!(out.get(header::AUTHORIZATION).unwrap(), "Bearer abc");
    assert_eq!(out.get(header::COOKIE).unwrap(), "auth_token=abc");
}

#[test]
fn forwardable_keeps_repeated_headers() {
    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
    headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));
    assert_eq!(forwardable(&headers).get_all(header::SET_COOKIE).iter().count(), 2);
}

// =============================================================
// Forwarding
// =============================================================

#[tokio::test]
async fn forwards_request_and_relays_response() {
    let base = spawn_upstream().await;
    let state = AppState::new(config(&base)).unwrap();

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
    headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
    let response = call(state, Method::POST, "/api/patients?clinic=7", headers, r#"{"name":"Rex"}"#).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get_all(header::SET_COOKIE).iter().count(), 2);
    let echoed = body_json(response).await;
    assert_eq!(echoed["method"], "POST");
    assert_eq!(echoed["uri"], "/api/patients?clinic=7");
    assert_eq!(echoed["authorization"], "Bearer abc");
    assert_eq!(echoed["keep_alive"], false);
    assert_eq!(echoed["body"], r#"{"name":"Rex"}"#);
}

#[tokio::test]
async fn relays_unauthorized_untouched() {
    let base = spawn_upstream().await;
    let state = AppState::new(config(&base)).unwrap();

    let response = call(state, Method::GET, "/api/secure", HeaderMap::new(), "").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"expired");
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let state = AppState::new(config(&format!("http://{addr}"))).unwrap();
    let response = call(state, Method::GET, "/api/patients", HeaderMap::new(), "").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
