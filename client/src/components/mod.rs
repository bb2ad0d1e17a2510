//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the shared [`crate::state::session::SessionContext`] from
//! Leptos context; none of them own session state.

pub mod navbar;
pub mod protected_route;
