//! Same-origin proxy from `/api/*` to the ERP API.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser bundle calls the API on its own origin, so the session cookie
//! and bearer header reach the API without CORS. This handler forwards method,
//! path, query, headers and body to `API_BASE_URL` and relays the upstream
//! response as-is, status codes included (a 401 must reach the client's
//! request layer untouched).
//!
//! ERROR HANDLING
//! ==============
//! Upstream connection failures and timeouts become `502 Bad Gateway`.

#[cfg(test)]
#[path = "proxy_test.rs"]
mod proxy_test;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Connection-scoped headers that must not be forwarded (RFC 9110 §7.6.1),
/// plus the ones the HTTP client recomputes.
const HOP_BY_HOP: [&str; 10] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

/// `ANY /api/{*path}`
pub async fn forward(State(state): State<AppState>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let url = upstream_url(&state.config.api_base_url, &uri);
    match relay(&state.http, method.clone(), &url, &headers, body).await {
        Ok(response) => {
            tracing::debug!(%method, %url, status = %response.status(), "proxied");
            response
        }
        Err(e) => {
            tracing::error!(%method, %url, error = %e, "upstream request failed");
            (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response()
        }
    }
}

async fn relay(
    http: &reqwest::Client,
    method: Method,
    url: &str,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, reqwest::Error> {
    let upstream = http
        .request(method, url)
        .headers(forwardable(headers))
        .body(body)
        .send()
        .await?;

    let status = upstream.status();
    let headers = forwardable(upstream.headers());
    let bytes = upstream.bytes().await?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

/// Upstream URL for an incoming request: base URL + original path and query.
pub(crate) fn upstream_url(base: &str, uri: &Uri) -> String {
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
    format!("{}{path_and_query}", base.trim_end_matches('/'))
}

/// Copy of `headers` without hop-by-hop fields or fields listed in `Connection`.
pub(crate) fn forwardable(headers: &HeaderMap) -> HeaderMap {
    let listed: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name_str = name.as_str();
        if HOP_BY_HOP.contains(&name_str) || listed.iter().any(|l| l == name_str) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}
