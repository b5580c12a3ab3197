//! # client
//!
//! Leptos frontend for Saluki ERP, compiled twice: with `ssr` into the host
//! server for the render pass, and with `hydrate` into WASM for the browser.
//!
//! The session core lives in `session` (store, startup hook, route guard),
//! `storage` (cookie / local-store substrates per execution context) and
//! `net::api` (authenticated request layer). `app`, `components` and `pages`
//! wire it into the router.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod session;
pub mod storage;

/// WASM entry point: install browser logging and hydrate the SSR markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
