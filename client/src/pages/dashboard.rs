//! Dashboard: greeting, InkBuck balance, and the account sync banner.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. The user record sync itself is
//! started by the root `App`; this page renders its progress, offers a retry
//! when it failed, and reloads the record on mount to pick up spending from
//! other tabs.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::session::{SessionContext, SyncStatus};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let state = session.state;
    let sync = session.sync;

    let refresh = session.clone();
    Effect::new(move |_| refresh.refresh_record());

    let email = move || state.get().identity().map(|i| i.email.clone()).unwrap_or_default();
    let on_retry = move |_| session.retry_sync();

    view! {
        <div class="dashboard">
            <h2 class="dashboard__greeting">"Welcome, " {email} "!"</h2>

            <div class="dashboard__balance">
                {move || match sync.get() {
                    SyncStatus::Synced(record) => format!("{} InkBucks", record.balance),
                    SyncStatus::Idle | SyncStatus::Syncing => "Loading your account...".to_owned(),
                    SyncStatus::Failed(_) => "Balance unavailable".to_owned(),
                }}
            </div>

            <Show when=move || sync.with(|s| s.warning().is_some())>
                <div class="dashboard__warning" role="status">
                    <span>{move || sync.with(|s| s.warning().unwrap_or_default())}</span>
                    <button class="btn btn--outline" type="button" on:click=on_retry.clone()>"Retry"</button>
                </div>
            </Show>

            <A href="/create" attr:class="btn btn--pill btn--primary">"Create icons"</A>
        </div>
    }
}
