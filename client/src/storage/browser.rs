//! Browser substrates over `document.cookie` and `window.localStorage`.
//!
//! Both types are zero-sized handles that look up the DOM on every call, the
//! same way the UI helpers reach `web_sys::window()`. Missing window/document
//! or a storage exception degrades to "no value" / `StorageError`.

use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, Storage};

use super::{CookieOptions, CookieStore, LocalStore, StorageError};

fn html_document() -> Option<HtmlDocument> {
    web_sys::window()?
        .document()?
        .dyn_into::<HtmlDocument>()
        .ok()
}

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Cookie jar of the current page.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentCookies;

impl DocumentCookies {
    fn write(raw: &str) {
        let Some(doc) = html_document() else {
            return;
        };
        if let Err(err) = doc.set_cookie(raw) {
            log::warn!("document.cookie write failed: {err:?}");
        }
    }
}

impl CookieStore for DocumentCookies {
    fn get(&self, name: &str) -> Option<String> {
        let raw = html_document()?.cookie().ok()?;
        super::parse_cookie_header(&raw).remove(name)
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) {
        Self::write(&super::set_cookie_string(name, value, options));
    }

    fn remove(&self, name: &str, options: &CookieOptions) {
        Self::write(&super::removal_cookie_string(name, options));
    }
}

/// `window.localStorage` of the current origin.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowLocalStorage;

impl LocalStore for WindowLocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|err| StorageError::Rejected(format!("{err:?}")))
    }

    fn remove_item(&self, key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}
