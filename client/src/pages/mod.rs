//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration. Access control is applied in
//! `app.rs` by wrapping pages in `ProtectedRoute`, never inside the pages.

pub mod create;
pub mod dashboard;
pub mod home;
pub mod pricing;
pub mod signup;
