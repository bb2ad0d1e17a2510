//! Networking modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `supabase` talks to the auth provider directly from the browser; `api`
//! calls this app's own server with the provider's bearer token.

pub mod api;
pub mod supabase;
