//! Cookie jar of a single SSR request.
//!
//! Reads come from the incoming `Cookie` header; writes update the in-request
//! view and are appended to the response as `Set-Cookie` headers so the
//! browser converges with whatever the render pass decided.

use http::header::{COOKIE, SET_COOKIE};
use http::request::Parts;
use http::HeaderValue;
use leptos::prelude::use_context;
use leptos_axum::ResponseOptions;

use super::memory::MemoryCookies;
use super::{CookieOptions, CookieStore};

/// Request-scoped cookies for the current Leptos render.
#[derive(Clone)]
pub struct RequestCookies {
    current: MemoryCookies,
    response: Option<ResponseOptions>,
}

impl RequestCookies {
    /// Pull the request parts and response options from the Leptos context.
    ///
    /// Outside a request (e.g. route list generation) this yields an empty
    /// jar whose writes go nowhere.
    pub fn from_context() -> Self {
        let header = use_context::<Parts>()
            .map(|parts| {
                parts
                    .headers
                    .get_all(COOKIE)
                    .iter()
                    .filter_map(|value| value.to_str().ok())
                    .collect::<Vec<_>>()
                    .join("; ")
            })
            .unwrap_or_default();
        Self { current: MemoryCookies::from_header(&header), response: use_context::<ResponseOptions>() }
    }

    fn emit(&self, raw: &str) {
        let Some(response) = &self.response else {
            return;
        };
        match HeaderValue::from_str(raw) {
            Ok(value) => response.append_header(SET_COOKIE, value),
            Err(err) => log::warn!("dropping unencodable Set-Cookie header: {err}"),
        }
    }
}

impl CookieStore for RequestCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.current.get(name)
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) {
        self.current.set(name, value, options);
        self.emit(&super::set_cookie_string(name, value, options));
    }

    fn remove(&self, name: &str, options: &CookieOptions) {
        self.current.remove(name, options);
        self.emit(&super::removal_cookie_string(name, options));
    }
}
