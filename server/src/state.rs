//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the server configuration and one pooled HTTP client used by the API
//! proxy.

use std::sync::Arc;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub http: reqwest::Client,
}

impl AppState {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialization).
    pub fn new(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.proxy_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { config: Arc::new(config), http })
    }
}
