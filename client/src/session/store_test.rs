use super::*;
use crate::session::types::Role;
use crate::storage::memory::{MemoryCookies, MemoryLocalStore};
use crate::storage::{BrowserSubstrate, CookieStore, ServerSubstrate};

// =============================================================
// Helpers
// =============================================================

/// One browser profile: cookie jar plus local storage. Every `tab()` is a
/// fresh store over the same substrates, i.e. a hard reload.
#[derive(Clone, Default)]
struct Browser {
    cookies: MemoryCookies,
    local: MemoryLocalStore,
}

impl Browser {
    fn tab(&self) -> SessionStore {
        SessionStore::new(BrowserSubstrate::new(self.cookies.clone(), self.local.clone()))
    }

    /// SSR pass for a request carrying this browser's cookies.
    fn server_pass(&self) -> SessionStore {
        SessionStore::new(ServerSubstrate::new(self.cookies.clone()))
    }
}

fn vet() -> User {
    User {
        id: 3,
        name: "Carla".to_owned(),
        email: "carla@salukivet.com.br".to_owned(),
        roles: vec![Role::new("VET")],
    }
}

fn admin() -> User {
    User {
        id: 1,
        name: "Admin".to_owned(),
        email: "admin@salukivet.com.br".to_owned(),
        roles: vec![Role::new("ADMIN")],
    }
}

// =============================================================
// Fresh store
// =============================================================

#[test]
fn new_store_is_empty_before_rehydrate() {
    let browser = Browser::default();
    browser.cookies.set(TOKEN_COOKIE, "t", &CookieOptions::default());
    let store = browser.tab();
    assert!(!store.is_authenticated());
    assert!(!store.is_admin());
    assert!(store.user().is_none());
}

#[test]
fn rehydrate_with_nothing_persisted_stays_empty() {
    let mut store = Browser::default().tab();
    assert_eq!(store.rehydrate(), &Session::default());
}

// =============================================================
// establish
// =============================================================

#[test]
fn establish_sets_memory_and_both_substrates() {
    let browser = Browser::default();
    let mut store = browser.tab();
    store.establish("abc".to_owned(), vet());

    assert_eq!(store.token(), Some("abc"));
    assert_eq!(store.user(), Some(&vet()));
    assert_eq!(browser.cookies.get(TOKEN_COOKIE).as_deref(), Some("abc"));
    assert_eq!(browser.local.get_item(TOKEN_KEY).as_deref(), Some("abc"));
    assert!(browser.local.get_item(PROFILE_KEY).is_some());
}

#[test]
fn establish_expires_legacy_profile_cookie() {
    let browser = Browser::default();
    browser
        .cookies
        .set(LEGACY_PROFILE_COOKIE, r#"{"id":1}"#, &CookieOptions::default());
    browser.tab().establish("abc".to_owned(), vet());
    assert!(browser.cookies.get(LEGACY_PROFILE_COOKIE).is_none());
}

#[test]
fn establish_then_rehydrate_in_new_tab_restores_session() {
    let browser = Browser::default();
    browser.tab().establish("abc".to_owned(), admin());

    let mut reloaded = browser.tab();
    let session = reloaded.rehydrate().clone();
    assert_eq!(session, Session { token: Some("abc".to_owned()), user: Some(admin()) });
    assert!(reloaded.is_admin());
}

#[test]
fn establish_then_rehydrate_in_same_store_is_unchanged() {
    let browser = Browser::default();
    let mut store = browser.tab();
    store.establish("abc".to_owned(), vet());
    let before = store.session().clone();
    assert_eq!(store.rehydrate(), &before);
}

#[test]
fn persisted_profile_parses_back_to_established_user() {
    let browser = Browser::default();
    let user = User { roles: vec![Role::new("VET"), Role::new("ADMIN")], ..vet() };
    browser.tab().establish("abc".to_owned(), user.clone());

    let raw = browser.local.get_item(PROFILE_KEY).unwrap();
    let parsed: User = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, user);
}

#[test]
fn establish_survives_local_store_write_failure() {
    let browser = Browser { cookies: MemoryCookies::default(), local: MemoryLocalStore::rejecting() };
    let mut store = browser.tab();
    store.establish("abc".to_owned(), vet());

    assert_eq!(store.token(), Some("abc"));
    assert_eq!(browser.cookies.get(TOKEN_COOKIE).as_deref(), Some("abc"));

    // Reload: the cookie still carries the session, the profile is gone.
    let mut reloaded = browser.tab();
    reloaded.rehydrate();
    assert_eq!(reloaded.token(), Some("abc"));
    assert!(reloaded.user().is_none());
}

#[test]
fn establish_on_server_writes_cookie_only() {
    let browser = Browser::default();
    let mut store = browser.server_pass();
    store.establish("srv".to_owned(), vet());
    assert_eq!(browser.cookies.get(TOKEN_COOKIE).as_deref(), Some("srv"));
    assert!(browser.local.get_item(TOKEN_KEY).is_none());
    assert!(browser.local.get_item(PROFILE_KEY).is_none());
}

// =============================================================
// invalidate
// =============================================================

#[test]
fn invalidate_clears_everything_and_requests_login_redirect() {
    let browser = Browser::default();
    browser
        .cookies
        .set(LEGACY_PROFILE_COOKIE, "stale", &CookieOptions::default());
    let mut store = browser.tab();
    store.establish("abc".to_owned(), vet());

    assert_eq!(store.invalidate(), Invalidation::RedirectToLogin);
    assert_eq!(store.session(), &Session::default());
    assert!(browser.cookies.get(TOKEN_COOKIE).is_none());
    assert!(browser.cookies.get(LEGACY_PROFILE_COOKIE).is_none());
    assert!(browser.local.get_item(TOKEN_KEY).is_none());
    assert!(browser.local.get_item(PROFILE_KEY).is_none());
}

#[test]
fn invalidate_then_rehydrate_does_not_resurrect() {
    let browser = Browser::default();
    let mut store = browser.tab();
    store.establish("abc".to_owned(), vet());
    let _ = store.invalidate();

    assert_eq!(store.rehydrate(), &Session::default());
    assert_eq!(browser.tab().rehydrate(), &Session::default());
}

#[test]
fn invalidate_on_server_only_clears() {
    let browser = Browser::default();
    browser.cookies.set(TOKEN_COOKIE, "abc", &CookieOptions::default());
    let mut store = browser.server_pass();
    store.rehydrate();

    assert_eq!(store.invalidate(), Invalidation::Cleared);
    assert!(!store.is_authenticated());
    assert!(browser.cookies.get(TOKEN_COOKIE).is_none());
}

// =============================================================
// rehydrate
// =============================================================

#[test]
fn rehydrate_is_idempotent() {
    let browser = Browser::default();
    browser.tab().establish("abc".to_owned(), vet());

    let mut store = browser.tab();
    let first = store.rehydrate().clone();
    let second = store.rehydrate().clone();
    assert_eq!(first, second);
}

#[test]
fn cookie_wins_over_local_token() {
    let browser = Browser::default();
    browser.cookies.set(TOKEN_COOKIE, "cookie", &CookieOptions::default());
    browser.local.set_item(TOKEN_KEY, "local").unwrap();

    let mut store = browser.tab();
    store.rehydrate();
    assert_eq!(store.token(), Some("cookie"));
    assert_eq!(browser.cookies.get(TOKEN_COOKIE).as_deref(), Some("cookie"));
}

#[test]
fn cleared_cookie_drops_in_memory_token() {
    let browser = Browser::default();
    let mut store = browser.tab();
    store.establish("abc".to_owned(), vet());

    browser.cookies.remove(TOKEN_COOKIE, &CookieOptions::default());
    browser.local.remove_item(TOKEN_KEY);
    store.rehydrate();
    assert!(!store.is_authenticated());
    assert!(store.user().is_none());
}

#[test]
fn empty_cookie_counts_as_absent() {
    let browser = Browser::default();
    browser.cookies.set(TOKEN_COOKIE, "", &CookieOptions::default());
    let mut store = browser.tab();
    store.rehydrate();
    assert!(!store.is_authenticated());
}

#[test]
fn legacy_local_token_is_migrated_once() {
    let browser = Browser::default();
    browser.local.set_item(TOKEN_KEY, "legacy").unwrap();
    browser
        .local
        .set_item(PROFILE_KEY, &serde_json::to_string(&vet()).unwrap())
        .unwrap();

    let mut store = browser.tab();
    let migrated = store.rehydrate().clone();
    assert_eq!(migrated, Session { token: Some("legacy".to_owned()), user: Some(vet()) });
    assert_eq!(browser.cookies.get(TOKEN_COOKIE).as_deref(), Some("legacy"));

    browser.local.remove_item(TOKEN_KEY);
    let mut reloaded = browser.tab();
    assert_eq!(reloaded.rehydrate(), &migrated);
}

#[test]
fn malformed_profile_is_discarded_but_token_kept() {
    let browser = Browser::default();
    browser.cookies.set(TOKEN_COOKIE, "abc", &CookieOptions::default());
    browser.local.set_item(PROFILE_KEY, "{not json").unwrap();

    let mut store = browser.tab();
    store.rehydrate();
    assert_eq!(store.token(), Some("abc"));
    assert!(store.user().is_none());
    assert!(browser.local.get_item(PROFILE_KEY).is_none());
}

#[test]
fn malformed_profile_during_migration_keeps_token() {
    let browser = Browser::default();
    browser.local.set_item(TOKEN_KEY, "legacy").unwrap();
    browser.local.set_item(PROFILE_KEY, "[]").unwrap();

    let mut store = browser.tab();
    store.rehydrate();
    assert_eq!(store.token(), Some("legacy"));
    assert!(store.user().is_none());
}

#[test]
fn server_pass_sees_cookie_but_not_local_store() {
    let browser = Browser::default();
    browser.tab().establish("abc".to_owned(), vet());

    let mut store = browser.server_pass();
    store.rehydrate();
    assert_eq!(store.token(), Some("abc"));
    assert!(store.user().is_none());
}

#[test]
fn server_pass_ignores_legacy_local_token() {
    let browser = Browser::default();
    browser.local.set_item(TOKEN_KEY, "legacy").unwrap();

    let mut store = browser.server_pass();
    store.rehydrate();
    assert!(!store.is_authenticated());
    assert!(browser.cookies.get(TOKEN_COOKIE).is_none());
}
