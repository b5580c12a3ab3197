//! In-memory substrates.
//!
//! Clones share the same underlying map, so a store rebuilt over a clone sees
//! what the previous store wrote. `RequestCookies` keeps the incoming request
//! cookies in a `MemoryCookies`; tests use both types to stand in for a
//! browser.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{CookieOptions, CookieStore, LocalStore, StorageError};

type SharedMap = Arc<Mutex<HashMap<String, String>>>;

fn lock(map: &SharedMap) -> MutexGuard<'_, HashMap<String, String>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cookie jar held in memory. Attributes are accepted and ignored.
#[derive(Clone, Debug, Default)]
pub struct MemoryCookies {
    values: SharedMap,
}

impl MemoryCookies {
    /// Seed a jar from a `Cookie` request header.
    pub fn from_header(header: &str) -> Self {
        Self { values: Arc::new(Mutex::new(super::parse_cookie_header(header))) }
    }
}

impl CookieStore for MemoryCookies {
    fn get(&self, name: &str) -> Option<String> {
        lock(&self.values).get(name).cloned()
    }

    fn set(&self, name: &str, value: &str, _options: &CookieOptions) {
        lock(&self.values).insert(name.to_owned(), value.to_owned());
    }

    fn remove(&self, name: &str, _options: &CookieOptions) {
        lock(&self.values).remove(name);
    }
}

/// Local store held in memory.
///
/// `rejecting()` builds a store whose writes fail, the way a full or
/// locked-down `localStorage` does.
#[derive(Clone, Debug, Default)]
pub struct MemoryLocalStore {
    items: SharedMap,
    reject_writes: bool,
}

impl MemoryLocalStore {
    pub fn rejecting() -> Self {
        Self { items: SharedMap::default(), reject_writes: true }
    }
}

impl LocalStore for MemoryLocalStore {
    fn get_item(&self, key: &str) -> Option<String> {
        lock(&self.items).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::Rejected("quota exceeded".to_owned()));
        }
        lock(&self.items).insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        lock(&self.items).remove(key);
    }
}
