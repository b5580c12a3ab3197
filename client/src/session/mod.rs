//! Authentication session: store, startup hook, and navigation guard.
//!
//! DESIGN
//! ======
//! There is no global session. The application root builds one
//! `SessionStore` for its execution context and injects it (as a Leptos
//! signal) into the guard, the request layer and the pages. Non-UI code
//! reaches it through the `SessionCell` seam so it can be driven from tests
//! without a reactive runtime.

pub mod bootstrap;
pub mod guard;
pub mod store;
pub mod types;

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;

pub use store::{Invalidation, SessionStore};
pub use types::{Role, Session, User};

/// Shared handle through which collaborators borrow the session store.
pub trait SessionCell: Clone {
    /// Run `f` against the store. `None` when the store has been disposed.
    fn with_store<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> Option<R>;
}

impl SessionCell for RwSignal<SessionStore> {
    fn with_store<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> Option<R> {
        self.try_update(f)
    }
}

impl SessionCell for Rc<RefCell<SessionStore>> {
    fn with_store<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

/// Build the store for the context this code was compiled for.
///
/// - `hydrate`: browser tab over `document.cookie` + `localStorage`.
/// - `ssr`: the current request's cookies, writes go to the response.
/// - neither (unit tests, tooling): an empty in-memory cookie jar.
pub fn store_for_current_context() -> SessionStore {
    #[cfg(feature = "hydrate")]
    {
        use crate::storage::browser::{DocumentCookies, WindowLocalStorage};
        SessionStore::new(crate::storage::BrowserSubstrate::new(DocumentCookies, WindowLocalStorage))
    }
    #[cfg(all(feature = "ssr", not(feature = "hydrate")))]
    {
        use crate::storage::request::RequestCookies;
        SessionStore::new(crate::storage::ServerSubstrate::new(RequestCookies::from_context()))
    }
    #[cfg(not(any(feature = "hydrate", feature = "ssr")))]
    {
        use crate::storage::memory::MemoryCookies;
        SessionStore::new(crate::storage::ServerSubstrate::new(MemoryCookies::default()))
    }
}
