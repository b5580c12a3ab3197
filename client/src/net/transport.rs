//! Browser transport over `gloo-net` (`fetch`).

use gloo_net::http::{Method as HttpMethod, RequestBuilder};
use leptos::prelude::{GetUntracked, RwSignal};
use leptos_router::NavigateOptions;
use leptos_router::location::Location;

use super::api::{ApiClient, ApiError, ApiRequest, ApiResponse, Method, Transport};
use crate::config::ClientConfig;
use crate::session::SessionStore;
use crate::session::guard::Destination;

/// `fetch`-backed transport rooted at the configured API base URL.
#[derive(Clone, Debug)]
pub struct GlooTransport {
    base_url: String,
}

impl GlooTransport {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.to_owned() }
    }
}

fn http_method(method: Method) -> HttpMethod {
    match method {
        Method::Get => HttpMethod::GET,
        Method::Post => HttpMethod::POST,
        Method::Put => HttpMethod::PUT,
        Method::Patch => HttpMethod::PATCH,
        Method::Delete => HttpMethod::DELETE,
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = RequestBuilder::new(&url).method(http_method(request.method));
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let prepared = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Transport(e.to_string()))?;

        let resp = prepared
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}

/// API client for the current tab, navigating through the router on a
/// session-ending 401 to the same login location the route guard computes.
pub fn browser_client<F>(
    session: RwSignal<SessionStore>,
    config: &ClientConfig,
    navigate: F,
    location: Location,
) -> ApiClient<GlooTransport, RwSignal<SessionStore>, impl Fn(&str) + use<F>>
where
    F: Fn(&str, NavigateOptions) + 'static,
{
    ApiClient::new(
        GlooTransport::new(&config.api_base_url),
        session,
        move |path: &str| navigate(path, NavigateOptions::default()),
        config.routes.clone(),
    )
    .with_current_path(move || {
        Destination::from_parts(
            &location.pathname.get_untracked(),
            &location.search.get_untracked(),
            &location.hash.get_untracked(),
        )
        .full_path()
    })
}
