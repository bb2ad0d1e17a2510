//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Every external collaborator (user records, credit ledger, token verifier,
//! image API) sits behind a trait object so handlers can be exercised with
//! in-memory doubles. Optional collaborators are `None` when their env config
//! is missing; the routes that need them answer 503.

use std::sync::Arc;

use client::app::PublicConfig;
use session::{BackendSync, RecordStore};
use sqlx::PgPool;

use crate::services::credits::{CreditLedger, PgCreditLedger};
use crate::services::identity::IdentityVerifier;
use crate::services::image::ImageGenerator;
use crate::services::users::PgUserStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordStore>,
    pub sync: BackendSync<dyn RecordStore>,
    pub ledger: Arc<dyn CreditLedger>,
    /// Bearer-token verifier. `None` if Supabase env vars are not configured.
    pub verifier: Option<Arc<dyn IdentityVerifier>>,
    /// Image API client. `None` if image env vars are not configured.
    pub images: Option<Arc<dyn ImageGenerator>>,
    /// Values injected into the HTML shell for the browser.
    pub public: PublicConfig,
}

impl AppState {
    /// Postgres-backed state used by `main`.
    #[must_use]
    pub fn new(
        pool: PgPool,
        verifier: Option<Arc<dyn IdentityVerifier>>,
        images: Option<Arc<dyn ImageGenerator>>,
        public: PublicConfig,
    ) -> Self {
        Self::with_stores(
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgCreditLedger::new(pool)),
            verifier,
            images,
            public,
        )
    }

    #[must_use]
    pub fn with_stores(
        records: Arc<dyn RecordStore>,
        ledger: Arc<dyn CreditLedger>,
        verifier: Option<Arc<dyn IdentityVerifier>>,
        images: Option<Arc<dyn ImageGenerator>>,
        public: PublicConfig,
    ) -> Self {
        let sync = BackendSync::new(Arc::clone(&records));
        Self { records, sync, ledger, verifier, images, public }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
#[path = "state_helpers_test.rs"]
pub mod test_helpers;

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
