//! Client configuration.
//!
//! The browser bundle has no runtime environment, so the API base URL is fixed
//! at build time (`SALUKI_PUBLIC_API_BASE_URL`). The default is empty: calls
//! stay same-origin and reach the API through the host server's proxy.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Route layout the guard works against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteConfig {
    pub login_path: String,
    /// Default destination after login.
    pub landing_path: String,
    /// Paths reachable without a session.
    pub public_paths: Vec<String>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self { login_path: "/login".to_owned(), landing_path: "/".to_owned(), public_paths: vec!["/login".to_owned()] }
    }
}

impl RouteConfig {
    /// Trailing slashes are ignored, so `/login/` is the login page too.
    pub fn is_public(&self, path: &str) -> bool {
        let path = trim_trailing_slash(path);
        self.public_paths.iter().any(|public| trim_trailing_slash(public) == path)
    }

    pub fn is_login(&self, path: &str) -> bool {
        trim_trailing_slash(path) == trim_trailing_slash(&self.login_path)
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for API calls, without trailing `/`.
    pub api_base_url: String,
    pub routes: RouteConfig,
}

impl ClientConfig {
    /// Config baked in at compile time.
    pub fn from_build_env() -> Self {
        Self::with_api_base_url(option_env!("SALUKI_PUBLIC_API_BASE_URL"))
    }

    fn with_api_base_url(raw: Option<&str>) -> Self {
        let api_base_url = raw.map(str::trim).unwrap_or_default().trim_end_matches('/').to_owned();
        Self { api_base_url, routes: RouteConfig::default() }
    }

    /// Absolute (or same-origin) URL for an API path such as `/api/auth/me`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url)
    }
}
