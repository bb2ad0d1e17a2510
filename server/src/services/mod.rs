//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and external I/O (Postgres, the
//! Supabase auth server, the image API) behind traits, so route handlers stay
//! focused on protocol translation and auth plumbing.

pub mod credits;
pub mod icons;
pub mod identity;
pub mod image;
pub mod users;
