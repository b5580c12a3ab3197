//! Route guard evaluated before every navigation, on the server and in the
//! browser.
//!
//! SYSTEM CONTEXT
//! ==============
//! The guard may be the first code touching the session after a hard reload
//! (SSR pass, or a browser navigation racing the bootstrapper), so it
//! rehydrates an unauthenticated store before deciding.
//!
//! SECURITY
//! ========
//! The `redirect` query parameter on the login page is attacker-controlled.
//! Only same-origin absolute paths that are not the login page itself are
//! followed; everything else falls back to the landing path.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use url::{Position, Url, form_urlencoded};

use super::store::SessionStore;
use crate::config::RouteConfig;

/// Query parameter carrying the post-login destination.
pub const REDIRECT_PARAM: &str = "redirect";

/// Navigation target as seen by the guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Destination {
    path: String,
    query: String,
    fragment: String,
}

impl Destination {
    /// Build from router parts. Leading `?`/`#` are accepted and stripped.
    pub fn from_parts(path: &str, query: &str, fragment: &str) -> Self {
        Self {
            path: if path.is_empty() { "/".to_owned() } else { path.to_owned() },
            query: query.trim_start_matches('?').to_owned(),
            fragment: fragment.trim_start_matches('#').to_owned(),
        }
    }

    /// Parse a full path such as `/login?redirect=/reports#top`.
    pub fn parse(full_path: &str) -> Self {
        let (rest, fragment) = full_path.split_once('#').unwrap_or((full_path, ""));
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        Self::from_parts(path, query, fragment)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// First value of query parameter `name`, decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        form_urlencoded::parse(self.query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Path, query and fragment, as the user requested them.
    pub fn full_path(&self) -> String {
        let mut full = self.path.clone();
        if !self.query.is_empty() {
            full.push('?');
            full.push_str(&self.query);
        }
        if !self.fragment.is_empty() {
            full.push('#');
            full.push_str(&self.fragment);
        }
        full
    }
}

/// Terminal decision for one navigation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    /// Unauthenticated request for a protected page; `redirect` is the
    /// originally requested full path.
    RedirectToLogin { redirect: String },
    /// Authenticated request for a public page; `target` is already sanitized.
    RedirectToLanding { target: String },
}

impl GuardOutcome {
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Location to navigate to, or `None` when navigation is allowed.
    pub fn location(&self, routes: &RouteConfig) -> Option<String> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin { redirect } => Some(login_location(routes, redirect)),
            Self::RedirectToLanding { target } => Some(target.clone()),
        }
    }
}

/// Login page URL carrying `redirect` as its return target.
pub fn login_location(routes: &RouteConfig, redirect: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(REDIRECT_PARAM, redirect)
        .finish();
    format!("{}?{query}", routes.login_path)
}

/// Decide whether navigation to `to` may proceed.
pub fn evaluate(store: &mut SessionStore, routes: &RouteConfig, to: &Destination) -> GuardOutcome {
    if !store.is_authenticated() {
        store.rehydrate();
    }
    let authenticated = store.is_authenticated();

    let outcome = match (routes.is_public(to.path()), authenticated) {
        (true, true) => GuardOutcome::RedirectToLanding {
            target: normalize_redirect(to.query_param(REDIRECT_PARAM).as_deref(), routes),
        },
        (true, false) | (false, true) => GuardOutcome::Allow,
        (false, false) => GuardOutcome::RedirectToLogin { redirect: to.full_path() },
    };
    if !outcome.is_allow() {
        log::debug!("route guard: {} -> {outcome:?}", to.full_path());
    }
    outcome
}

/// Origin that redirect targets are resolved against; only targets that keep
/// it are followed.
const RESOLVE_ORIGIN: &str = "http://saluki.invalid/";

/// Sanitize a post-login redirect target.
///
/// Accepts only absolute paths that resolve on the current origin, rejecting
/// protocol-relative forms (`//host`, `/\host`), targets carrying whitespace
/// or control characters (URL parsers drop tab/CR/LF, turning `/\t/host` into
/// `//host`), and the login page itself. The accepted target is returned in
/// its resolved form (path, query, fragment).
pub fn normalize_redirect(target: Option<&str>, routes: &RouteConfig) -> String {
    let Some(target) = target else {
        return routes.landing_path.clone();
    };
    same_origin_path(target)
        .filter(|resolved| !routes.is_login(resolved.path()))
        .map_or_else(|| routes.landing_path.clone(), |resolved| resolved[Position::BeforePath..].to_owned())
}

fn same_origin_path(target: &str) -> Option<Url> {
    if !target.starts_with('/')
        || target.starts_with("//")
        || target.starts_with("/\\")
        || target.chars().any(|c| c.is_control() || c.is_whitespace())
    {
        return None;
    }
    let base = Url::parse(RESOLVE_ORIGIN).ok()?;
    let resolved = base.join(target).ok()?;
    (resolved.origin() == base.origin()).then_some(resolved)
}
