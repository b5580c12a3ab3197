//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Pages read the session from context and call the API through the
//! authenticated request layer; access control itself is the route guard's.

pub mod admin;
pub mod home;
pub mod login;
