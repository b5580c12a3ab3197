//! Session store: in-memory session plus its persistence and rehydration.
//!
//! SYSTEM CONTEXT
//! ==============
//! One store exists per execution context: per browser tab, and per SSR
//! request. It is the only writer of the session cookie and of the
//! browser-local session entries; guards and the request layer go through it.
//!
//! PERSISTENCE
//! ===========
//! - cookie `auth_token`: source of truth across hard reloads, visible to SSR.
//! - local `auth_user`: JSON profile, browser only, advisory.
//! - local `auth_token`: copy of the token; older builds kept the session only
//!   here, so rehydration promotes it into the cookie once.
//! - cookie `auth_user`: legacy full-profile cookie, expired on every
//!   establish/invalidate so it cannot come back.
//!
//! ERROR HANDLING
//! ==============
//! No operation fails. Local-store write failures and corrupted profile
//! records are logged and absorbed; the cookie keeps the session valid.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use super::types::{Session, User};
use crate::storage::{CookieOptions, ExecutionContext, LocalStore, StorageError, Substrate};

/// Cookie holding the session token.
pub const TOKEN_COOKIE: &str = "auth_token";
/// Legacy cookie that used to hold the whole profile.
pub const LEGACY_PROFILE_COOKIE: &str = "auth_user";
/// Local-store key holding a copy of the token.
pub const TOKEN_KEY: &str = "auth_token";
/// Local-store key holding the serialized profile.
pub const PROFILE_KEY: &str = "auth_user";

/// What the caller should do after `invalidate`.
///
/// The store never navigates; the guard or request layer acts on this.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invalidation {
    /// A navigable client exists: send it to the login destination.
    RedirectToLogin,
    /// Server render pass: state is cleared, there is nothing to navigate.
    Cleared,
}

/// Session state bound to the substrate of one execution context.
pub struct SessionStore {
    session: Session,
    substrate: Box<dyn Substrate>,
    cookie_options: CookieOptions,
    bootstrapped: bool,
}

impl SessionStore {
    /// Create an empty store. Nothing is read until `rehydrate`.
    pub fn new(substrate: impl Substrate + 'static) -> Self {
        Self {
            session: Session::default(),
            substrate: Box::new(substrate),
            cookie_options: CookieOptions::default(),
            bootstrapped: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    pub fn context(&self) -> ExecutionContext {
        self.substrate.context()
    }

    /// Mark the startup hook as run; returns `false` if it already had.
    pub(crate) fn mark_bootstrapped(&mut self) -> bool {
        !std::mem::replace(&mut self.bootstrapped, true)
    }

    /// Recover a persisted session. Idempotent.
    ///
    /// 1. A token cookie wins: adopt it, then (browser only) load the profile.
    /// 2. Otherwise a browser-local token is promoted into the cookie, and the
    ///    profile is loaded alongside it.
    /// 3. Otherwise the session is empty.
    pub fn rehydrate(&mut self) -> &Session {
        let cookie_token = self
            .substrate
            .cookies()
            .get(TOKEN_COOKIE)
            .filter(|token| !token.is_empty());

        if let Some(token) = cookie_token {
            self.session.token = Some(token);
            if let Some(local) = self.substrate.local_store() {
                self.session.user = load_profile(local);
            }
            return &self.session;
        }

        self.session = Session::default();

        let Some(local) = self.substrate.local_store() else {
            return &self.session;
        };
        let Some(token) = local.get_item(TOKEN_KEY).filter(|token| !token.is_empty()) else {
            return &self.session;
        };

        log::info!("migrating browser-only session token into the session cookie");
        let user = load_profile(local);
        self.substrate
            .cookies()
            .set(TOKEN_COOKIE, &token, &self.cookie_options);
        self.session = Session { token: Some(token), user };
        &self.session
    }

    /// Adopt a freshly issued session. Persistence is best-effort.
    pub fn establish(&mut self, token: String, user: User) {
        let cookies = self.substrate.cookies();
        cookies.set(TOKEN_COOKIE, &token, &self.cookie_options);
        cookies.remove(LEGACY_PROFILE_COOKIE, &self.cookie_options);

        if let Some(local) = self.substrate.local_store() {
            if let Err(err) = persist_local(local, &token, &user) {
                log::warn!("session kept without local copy: {err}");
            }
        }

        self.session = Session { token: Some(token), user: Some(user) };
    }

    /// Drop the session from memory and from every substrate.
    pub fn invalidate(&mut self) -> Invalidation {
        self.session = Session::default();

        let cookies = self.substrate.cookies();
        cookies.remove(TOKEN_COOKIE, &self.cookie_options);
        cookies.remove(LEGACY_PROFILE_COOKIE, &self.cookie_options);

        if let Some(local) = self.substrate.local_store() {
            local.remove_item(TOKEN_KEY);
            local.remove_item(PROFILE_KEY);
        }

        match self.context() {
            ExecutionContext::Browser => Invalidation::RedirectToLogin,
            ExecutionContext::Server => Invalidation::Cleared,
        }
    }
}

/// Parse the persisted profile; a corrupted record is deleted, not fatal.
fn load_profile(local: &dyn LocalStore) -> Option<User> {
    let raw = local.get_item(PROFILE_KEY)?;
    match serde_json::from_str::<User>(&raw) {
        Ok(user) => Some(user),
        Err(err) => {
            log::warn!("discarding unreadable profile record: {err}");
            local.remove_item(PROFILE_KEY);
            None
        }
    }
}

fn persist_local(local: &dyn LocalStore, token: &str, user: &User) -> Result<(), StorageError> {
    let profile = serde_json::to_string(user)?;
    local.set_item(TOKEN_KEY, token)?;
    local.set_item(PROFILE_KEY, &profile)
}
