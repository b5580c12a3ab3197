use super::*;
use crate::session::store::TOKEN_COOKIE;
use crate::session::types::{Role, User};
use crate::storage::memory::{MemoryCookies, MemoryLocalStore};
use crate::storage::{BrowserSubstrate, CookieOptions, CookieStore, ServerSubstrate};

fn signed_in_cookies() -> MemoryCookies {
    let cookies = MemoryCookies::default();
    cookies.set(TOKEN_COOKIE, "abc", &CookieOptions::default());
    cookies
}

#[test]
fn browser_bootstrap_rehydrates_from_cookie() {
    let mut store = SessionStore::new(BrowserSubstrate::new(signed_in_cookies(), MemoryLocalStore::default()));
    assert_eq!(bootstrap(&mut store), Bootstrap::Rehydrated { authenticated: true });
    assert_eq!(store.token(), Some("abc"));
}

#[test]
fn browser_bootstrap_without_session_stays_empty() {
    let mut store = SessionStore::new(BrowserSubstrate::new(MemoryCookies::default(), MemoryLocalStore::default()));
    assert_eq!(bootstrap(&mut store), Bootstrap::Rehydrated { authenticated: false });
    assert!(!store.is_authenticated());
}

#[test]
fn bootstrap_runs_once_per_store() {
    let cookies = MemoryCookies::default();
    let mut store = SessionStore::new(BrowserSubstrate::new(cookies.clone(), MemoryLocalStore::default()));
    assert_eq!(bootstrap(&mut store), Bootstrap::Rehydrated { authenticated: false });

    cookies.set(TOKEN_COOKIE, "late", &CookieOptions::default());
    assert_eq!(bootstrap(&mut store), Bootstrap::AlreadyRan);
    assert!(!store.is_authenticated());
}

#[test]
fn bootstrap_skips_rehydrate_when_already_authenticated() {
    let mut store = SessionStore::new(BrowserSubstrate::new(MemoryCookies::default(), MemoryLocalStore::default()));
    let user = User { id: 1, name: "a".to_owned(), email: "a@b".to_owned(), roles: vec![Role::new("VET")] };
    store.establish("fresh".to_owned(), user);
    assert_eq!(bootstrap(&mut store), Bootstrap::AlreadyAuthenticated);
    assert_eq!(store.token(), Some("fresh"));
}

#[test]
fn bootstrap_is_skipped_on_server() {
    let mut store = SessionStore::new(ServerSubstrate::new(signed_in_cookies()));
    assert_eq!(bootstrap(&mut store), Bootstrap::SkippedOnServer);
    assert!(!store.is_authenticated());
}
