//! Root application component with routing and context providers.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use session::{AccessPolicy, GuardConfig, GuardConfigError};

use crate::components::navbar::Navbar;
use crate::components::protected_route::ProtectedRoute;
use crate::net::supabase::{SupabaseAuth, SupabaseClientConfig};
use crate::pages::{
    create::CreatePage, dashboard::DashboardPage, home::HomePage, pricing::PricingPage, signup::SignupPage,
};
use crate::state::session::SessionContext;

/// Every path registered in the router below.
pub const ROUTES: [&str; 5] = ["/", "/pricing", "/signup", "/create", "/dashboard"];
/// Where anonymous viewers of protected pages are sent.
pub const ENTRY_PATH: &str = "/signup";
/// Where signed-in viewers of the signup page are sent.
pub const HOME_PATH: &str = "/dashboard";

/// Public (browser-safe) configuration the server injects into the shell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublicConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

/// Guard redirect targets, validated against [`ROUTES`].
///
/// # Errors
///
/// Returns an error if a target is not a registered route.
pub fn guard_config() -> Result<GuardConfig, GuardConfigError> {
    GuardConfig::new(ENTRY_PATH, HOME_PATH, &ROUTES)
}

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions, public: PublicConfig) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <meta name="supabase-url" content=public.supabase_url/>
                <meta name="supabase-anon-key" content=public.supabase_anon_key/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Owns the session context, mounts the session subscriber (browser only),
/// and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = Arc::new(SupabaseAuth::new(SupabaseClientConfig::from_document()));
    let session = SessionContext::new(auth);
    provide_context(session.clone());

    // Without a config every guarded route renders an error instead of its
    // content.
    match guard_config() {
        Ok(config) => provide_context(config),
        Err(e) => leptos::logging::error!("invalid guard configuration, guarded routes disabled: {e}"),
    }

    #[cfg(feature = "hydrate")]
    mount_session(&session);

    // Sync the application user record whenever a new identity signs in.
    Effect::new({
        let session = session.clone();
        move || {
            let state = session.state.get();
            session.on_session_change(&state);
        }
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/inkblink.css"/>
        <Title text="Ink Blink"/>

        <Router>
            <Navbar/>
            <main class="page">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("pricing") view=PricingPage/>
                    <Route
                        path=StaticSegment("signup")
                        view=|| view! { <ProtectedRoute policy=AccessPolicy::GuestOnly><SignupPage/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment("create")
                        view=|| view! { <ProtectedRoute><CreatePage/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment("dashboard")
                        view=|| view! { <ProtectedRoute><DashboardPage/></ProtectedRoute> }
                    />
                </Routes>
            </main>
        </Router>
    }
}

/// Bridge provider notifications into the store, and the store into the
/// reactive `state` signal, for the lifetime of the root component.
#[cfg(feature = "hydrate")]
fn mount_session(session: &SessionContext) {
    use session::{AuthProvider, DEFAULT_SESSION_TIMEOUT, SessionSubscriber};

    let state = session.state;
    let mirror = session.store.subscribe(move |next| state.set(next.clone()));

    let provider: Arc<dyn AuthProvider> = session.auth.clone();
    let (subscriber, initial_fetch) = SessionSubscriber::mount(
        provider,
        session.store.clone(),
        gloo_timers::future::sleep(DEFAULT_SESSION_TIMEOUT),
    );
    leptos::task::spawn_local(initial_fetch);

    on_cleanup(move || {
        subscriber.unmount();
        mirror.unsubscribe();
    });
}
