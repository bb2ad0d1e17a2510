//! Route guard component.
//!
//! Wraps a page and decides, from the session state and the current path,
//! whether it renders, shows a loading placeholder, or redirects. Protected
//! content is never rendered before the session is known, nor when the
//! guard configuration is missing.

use leptos::either::Either;
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};
use session::{AccessPolicy, GuardConfig, GuardDecision, RedirectLatch, RouteGuard};

use crate::state::session::SessionContext;

#[component]
pub fn ProtectedRoute(
    /// Who may see the wrapped content. Defaults to signed-in viewers only.
    #[prop(optional)]
    policy: AccessPolicy,
    children: ChildrenFn,
) -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let Some(config) = use_context::<GuardConfig>() else {
        return Either::Left(view! {
            <div class="guard-error" role="alert">"This page is unavailable right now."</div>
        });
    };
    let guard = RouteGuard::new(policy, config);
    let location = use_location();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| guard.decide(&session.state.get(), &location.pathname.get()));

    // One redirect per run of redirect decisions.
    let latch = StoredValue::new(RedirectLatch::new());
    Effect::new(move || {
        let decision = decision.get();
        let mut target = None;
        latch.update_value(|l| target = l.observe(&decision));
        if let (Some(to), GuardDecision::Redirect { replace, .. }) = (target, &decision) {
            navigate(&to, NavigateOptions { replace: *replace, ..NavigateOptions::default() });
        }
    });

    Either::Right(view! {
        <Show
            when=move || decision.get() == GuardDecision::Render
            fallback=|| view! { <div class="guard-loading" aria-busy="true">"Loading..."</div> }
        >
            {children()}
        </Show>
    })
}
