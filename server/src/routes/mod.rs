//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the Leptos SSR app, its static assets under `/pkg`,
//! the same-origin API proxy under `/api`, and a health probe.

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

pub mod proxy;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{any, get};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Failures assembling the router.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Missing or malformed `[[workspace.metadata.leptos]]` / `LEPTOS_*` settings.
    #[error("leptos configuration: {0}")]
    LeptosConfig(String),
}

/// Non-Leptos routes: API proxy and health probe.
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/{*path}", any(proxy::forward))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Full application: API routes + Leptos SSR + `/pkg` assets.
///
/// # Errors
///
/// Returns `RouterError::LeptosConfig` if the Leptos configuration cannot be
/// loaded.
pub fn app(state: AppState) -> Result<Router, RouterError> {
    let conf = get_configuration(None).map_err(|e| RouterError::LeptosConfig(e.to_string()))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
