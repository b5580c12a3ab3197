//! Persistence substrates backing the session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! A session is persisted in two places: a server-visible cookie that every
//! SSR request can read, and a browser-only local store. The server render
//! pass can only see the first; a browser tab sees both.
//!
//! DESIGN
//! ======
//! `Substrate` is the capability handed to the session store at construction
//! time. `ServerSubstrate` exposes cookies only, `BrowserSubstrate` exposes
//! cookies plus the local store. Store logic asks the substrate what it can
//! do instead of branching on the build target at every call site.
//!
//! All substrate methods take `&self`: browser implementations are stateless
//! handles over `document`/`window`, and in-memory ones share their state so a
//! fresh store built over the same substrate behaves like a page reload.


#[cfg(feature = "hydrate")]
pub mod browser;
pub mod memory;
#[cfg(feature = "ssr")]
pub mod request;

use std::collections::HashMap;

use cookie::{Cookie, SameSite};

// =============================================================================
// ERRORS
// =============================================================================

/// Failures writing to the browser-local store.
///
/// These never reach session callers; the store logs them and carries on with
/// the cookie as the source of truth.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No local store is reachable (no window, storage disabled by the user).
    #[error("local storage unavailable")]
    Unavailable,

    /// The store refused the write (quota exceeded, permission denied).
    #[error("local storage rejected write: {0}")]
    Rejected(String),

    /// A value could not be serialized before writing.
    #[error("serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

// =============================================================================
// EXECUTION CONTEXT
// =============================================================================

/// Where the current code is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionContext {
    /// A server render pass: stateless per request, cookies only.
    Server,
    /// A browser tab: long-lived, cookies plus durable local storage.
    Browser,
}

// =============================================================================
// SUBSTRATE TRAITS
// =============================================================================

/// Attributes applied to every session cookie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: String,
    pub same_site: SameSite,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self { path: "/".to_owned(), same_site: SameSite::Lax }
    }
}

/// Server-visible cookie jar.
pub trait CookieStore: Send + Sync {
    /// Current value of cookie `name`, if set.
    fn get(&self, name: &str) -> Option<String>;

    /// Set cookie `name`. Best-effort: failures are not reported.
    fn set(&self, name: &str, value: &str, options: &CookieOptions);

    /// Expire cookie `name`.
    fn remove(&self, name: &str, options: &CookieOptions);
}

/// Browser-local key/value store.
pub trait LocalStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error when the store is unreachable or refuses the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str);
}

/// Persistence capability of one execution context.
pub trait Substrate: Send + Sync {
    fn context(&self) -> ExecutionContext;

    fn cookies(&self) -> &dyn CookieStore;

    /// The browser-local store, when this context has one.
    fn local_store(&self) -> Option<&dyn LocalStore>;
}

/// Substrate of a server render pass: only the cookie is visible.
#[derive(Debug, Default)]
pub struct ServerSubstrate<C> {
    cookies: C,
}

impl<C: CookieStore> ServerSubstrate<C> {
    pub fn new(cookies: C) -> Self {
        Self { cookies }
    }
}

impl<C: CookieStore> Substrate for ServerSubstrate<C> {
    fn context(&self) -> ExecutionContext {
        ExecutionContext::Server
    }

    fn cookies(&self) -> &dyn CookieStore {
        &self.cookies
    }

    fn local_store(&self) -> Option<&dyn LocalStore> {
        None
    }
}

/// Substrate of a browser tab: cookie plus local store.
#[derive(Debug, Default)]
pub struct BrowserSubstrate<C, L> {
    cookies: C,
    local: L,
}

impl<C: CookieStore, L: LocalStore> BrowserSubstrate<C, L> {
    pub fn new(cookies: C, local: L) -> Self {
        Self { cookies, local }
    }
}

impl<C: CookieStore, L: LocalStore> Substrate for BrowserSubstrate<C, L> {
    fn context(&self) -> ExecutionContext {
        ExecutionContext::Browser
    }

    fn cookies(&self) -> &dyn CookieStore {
        &self.cookies
    }

    fn local_store(&self) -> Option<&dyn LocalStore> {
        Some(&self.local)
    }
}

// =============================================================================
// COOKIE STRINGS
// =============================================================================

/// Build a `Set-Cookie` / `document.cookie` string for `name=value`.
pub fn set_cookie_string(name: &str, value: &str, options: &CookieOptions) -> String {
    build_cookie(name, value, options).encoded().to_string()
}

/// Build a string that expires cookie `name` immediately.
pub fn removal_cookie_string(name: &str, options: &CookieOptions) -> String {
    let mut cookie = build_cookie(name, "", options);
    cookie.make_removal();
    cookie.encoded().to_string()
}

fn build_cookie(name: &str, value: &str, options: &CookieOptions) -> Cookie<'static> {
    Cookie::build((name.to_owned(), value.to_owned()))
        .path(options.path.clone())
        .same_site(options.same_site)
        .build()
}

/// Parse a `Cookie` header (or `document.cookie`) into name/value pairs.
///
/// Malformed pairs are skipped. When a name repeats, the first value wins,
/// matching how browsers order the more specific path first.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for cookie in Cookie::split_parse_encoded(header.to_owned()).flatten() {
        values
            .entry(cookie.name().to_owned())
            .or_insert_with(|| cookie.value().to_owned());
    }
    values
}
