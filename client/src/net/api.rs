//! Authenticated request layer for API calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every outbound API call goes through `ApiClient::send`, which attaches the
//! session token as a bearer credential and reacts to `401 Unauthorized` by
//! invalidating the session. The wire transport is pluggable (`gloo-net` in
//! the browser, a recording fake in tests).
//!
//! ERROR HANDLING
//! ==============
//! `send` passes every response through untouched, 401 included; the
//! invalidation is a side effect, not an error. `json` additionally maps
//! non-success statuses into `ApiError` for callers that want a typed body.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::RouteConfig;
use crate::session::guard::{Destination, login_location};
use crate::session::{Invalidation, SessionCell, SessionStore, User};
use crate::storage::ExecutionContext;

pub const STATUS_UNAUTHORIZED: u16 = 401;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server rejected the session credential.
    #[error("session rejected by server")]
    Unauthorized,

    /// The server returned a non-success status.
    #[error("request failed with status {status}")]
    Status { status: u16, body: String },

    /// The request or response body was not the expected JSON.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Outbound API request, relative to the configured base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    /// JSON body, already serialized.
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn get(path: &str) -> Self {
        Self { method: Method::Get, path: path.to_owned(), headers: Vec::new(), body: None }
    }

    /// # Errors
    ///
    /// Returns an error if `body` cannot be serialized.
    pub fn post_json<T: Serialize>(path: &str, body: &T) -> Result<Self, ApiError> {
        Ok(Self {
            method: Method::Post,
            path: path.to_owned(),
            headers: vec![("Content-Type".to_owned(), "application/json".to_owned())],
            body: Some(serde_json::to_string(body)?),
        })
    }

    /// First header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Low-level wire transport. Futures are `?Send`: in the browser they run on
/// the single JS thread.
#[async_trait::async_trait(?Send)]
pub trait Transport {
    /// # Errors
    ///
    /// Returns `ApiError::Transport` when no response was received.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

// =============================================================================
// SESSION HOOKS
// =============================================================================

/// Token to attach to an outbound request.
///
/// In the browser an unauthenticated store is rehydrated first, covering
/// calls issued right after a hard reload.
pub fn bearer_token(store: &mut SessionStore) -> Option<String> {
    if store.context() == ExecutionContext::Browser && !store.is_authenticated() {
        store.rehydrate();
    }
    store.token().map(str::to_owned)
}

/// React to a response status. Only 401 has an effect.
pub fn on_response_status(store: &mut SessionStore, status: u16) -> Option<Invalidation> {
    if status != STATUS_UNAUTHORIZED {
        return None;
    }
    log::info!("API rejected the session credential; invalidating session");
    Some(store.invalidate())
}

// =============================================================================
// CLIENT
// =============================================================================

/// API client bound to a session and a navigation callback.
///
/// `navigate` receives the login location when a 401 invalidates a browser
/// session. With `with_current_path`, that location is the same one the route
/// guard redirects to (`/login?redirect=<current page>`), and no navigation is
/// issued from a public page.
pub struct ApiClient<T, C, N> {
    transport: T,
    session: C,
    navigate: N,
    routes: RouteConfig,
    current_path: Option<Box<dyn Fn() -> String>>,
}

impl<T, C, N> ApiClient<T, C, N>
where
    T: Transport,
    C: SessionCell,
    N: Fn(&str),
{
    pub fn new(transport: T, session: C, navigate: N, routes: RouteConfig) -> Self {
        Self { transport, session, navigate, routes, current_path: None }
    }

    /// Source of the page the user is on, read when a 401 arrives.
    #[must_use]
    pub fn with_current_path(mut self, current_path: impl Fn() -> String + 'static) -> Self {
        self.current_path = Some(Box::new(current_path));
        self
    }

    /// Where to send the user after the session was rejected.
    fn login_target(&self) -> Option<String> {
        let Some(current_path) = &self.current_path else {
            return Some(self.routes.login_path.clone());
        };
        let here = Destination::parse(&current_path());
        if self.routes.is_public(here.path()) {
            return None;
        }
        Some(login_location(&self.routes, &here.full_path()))
    }

    /// Send `request` with the session credential attached.
    ///
    /// # Errors
    ///
    /// Returns an error only when the transport fails; every status code is
    /// returned as a response.
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if let Some(token) = self.session.with_store(bearer_token).flatten() {
            request
                .headers
                .push(("Authorization".to_owned(), format!("Bearer {token}")));
        }

        let response = self.transport.send(request).await?;

        let invalidation = self
            .session
            .with_store(|store| on_response_status(store, response.status))
            .flatten();
        if invalidation == Some(Invalidation::RedirectToLogin) {
            if let Some(target) = self.login_target() {
                (self.navigate)(&target);
            }
        }
        Ok(response)
    }

    /// Send `request` and decode a successful JSON body.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` on 401, `Status` on other non-success statuses,
    /// and `Json` when the body does not decode.
    pub async fn json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let response = self.send(request).await?;
        if response.status == STATUS_UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !response.is_success() {
            return Err(ApiError::Status { status: response.status, body: response.body });
        }
        response.json()
    }
}

// =============================================================================
// ENDPOINTS
// =============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Body of a successful `POST /api/auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Exchange credentials for a session token and profile.
///
/// # Errors
///
/// Returns an error if the request fails or the credentials are rejected.
pub async fn login<T, C, N>(api: &ApiClient<T, C, N>, email: &str, password: &str) -> Result<LoginResponse, ApiError>
where
    T: Transport,
    C: SessionCell,
    N: Fn(&str),
{
    let request = ApiRequest::post_json("/api/auth/login", &LoginRequest { email, password })?;
    api.json(request).await
}

/// Fetch the profile behind the current session from `GET /api/auth/me`.
///
/// # Errors
///
/// Returns an error if the request fails; `Unauthorized` means the session was
/// rejected and has already been invalidated.
pub async fn current_user<T, C, N>(api: &ApiClient<T, C, N>) -> Result<User, ApiError>
where
    T: Transport,
    C: SessionCell,
    N: Fn(&str),
{
    api.json(ApiRequest::get("/api/auth/me")).await
}
