//! # client
//!
//! Leptos front-end for Ink Blink: landing, pricing, signup/login, icon
//! creation and dashboard pages. Server-rendered by the `server` crate and
//! hydrated in the browser, where it talks to Supabase for auth and to the
//! server's JSON API for the user record and icon generation.
//!
//! Session state, the route-guard decision and the sync bookkeeping live in
//! the framework-agnostic `session` crate; this crate wires them into Leptos
//! context and components.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered `App`.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
