//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from page and component
//! logic so both compile (as no-ops) during SSR.

pub mod browser;
pub mod storage;
