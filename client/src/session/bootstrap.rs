//! Startup hook that rehydrates the session before anything reads it.
//!
//! Runs once per store, in the browser only: an SSR pass owns no durable
//! client storage, and its guard rehydrates from the cookie on demand.

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod bootstrap_test;

use super::store::SessionStore;
use crate::storage::ExecutionContext;

/// What the startup hook did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bootstrap {
    /// Server render pass; nothing to do.
    SkippedOnServer,
    /// The hook already ran for this store.
    AlreadyRan,
    /// A session was already in memory.
    AlreadyAuthenticated,
    /// Rehydration ran; `authenticated` is its result.
    Rehydrated { authenticated: bool },
}

/// Rehydrate `store` if this is the first run in a browser context.
pub fn bootstrap(store: &mut SessionStore) -> Bootstrap {
    if store.context() == ExecutionContext::Server {
        return Bootstrap::SkippedOnServer;
    }
    if !store.mark_bootstrapped() {
        return Bootstrap::AlreadyRan;
    }
    if store.is_authenticated() {
        return Bootstrap::AlreadyAuthenticated;
    }
    let authenticated = store.rehydrate().is_authenticated();
    log::debug!("session bootstrap complete (authenticated: {authenticated})");
    Bootstrap::Rehydrated { authenticated }
}
