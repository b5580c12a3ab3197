//! Networking for API calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` owns the authenticated request layer and endpoint helpers;
//! `transport` is the browser `fetch` binding behind it.

pub mod api;
#[cfg(feature = "hydrate")]
pub mod transport;
