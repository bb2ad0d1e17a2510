//! Top navigation bar with session-aware account controls.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::{use_location, use_navigate};

use crate::state::session::SessionContext;

#[component]
pub fn Navbar() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let state = session.state;
    let menu_open = RwSignal::new(false);
    let signed_out = RwSignal::new(false);

    // Back to the landing page after logout.
    let navigate = use_navigate();
    Effect::new(move || {
        if signed_out.get() {
            navigate("/", NavigateOptions::default());
        }
    });

    // Close the account menu on every navigation.
    let pathname = use_location().pathname;
    Effect::new(move || {
        pathname.track();
        menu_open.set(false);
    });

    let email = move || state.get().identity().map(|i| i.email.clone()).unwrap_or_default();
    let initial = move || state.get().identity().map_or('?', |i| i.initial()).to_string();

    let session = StoredValue::new(session);
    let on_logout = move |_| {
        menu_open.set(false);
        session.with_value(|s| s.sign_out());
        signed_out.set(true);
    };

    view! {
        <nav class="navbar">
            <A href="/" attr:class="navbar__brand">"Ink Blink"</A>
            <ul class="navbar__links">
                <li><A href="/pricing">"Pricing"</A></li>
                <li><A href="/create">"Create"</A></li>
            </ul>
            <div class="navbar__account">
                <Show
                    when=move || state.get().is_authenticated()
                    fallback=|| view! { <A href="/signup" attr:class="btn btn--pill">"Sign Up"</A> }
                >
                    <button class="navbar__user" on:click=move |_| menu_open.update(|open| *open = !*open)>
                        <span class="avatar">{initial}</span>
                        <span class="navbar__email">{email}</span>
                    </button>
                    <Show when=move || menu_open.get()>
                        <div class="navbar__menu">
                            <A href="/dashboard" attr:class="navbar__menu-item">"Dashboard"</A>
                            <button class="navbar__menu-item" on:click=on_logout.clone()>"Logout"</button>
                        </div>
                    </Show>
                </Show>
            </div>
        </nav>
    }
}
