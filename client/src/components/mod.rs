//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components shared across pages; they read the session from Leptos context.

pub mod route_guard;
