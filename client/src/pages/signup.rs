//! Signup / login page with email + password and Google OAuth.
//!
//! Mounted behind a guest-only guard: signed-in viewers never see it.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use leptos::prelude::*;

use crate::state::session::SessionContext;

/// Minimum password length enforced by the auth provider.
pub(crate) const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthTab {
    #[default]
    Login,
    SignUp,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Credentials {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

pub(crate) fn validate_login_input(email: &str, password: &str) -> Result<Credentials, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    if !looks_like_email(email) {
        return Err("Enter a valid email address.");
    }
    Ok(Credentials { email: email.to_owned(), password: password.to_owned(), display_name: None })
}

pub(crate) fn validate_signup_input(name: &str, email: &str, password: &str) -> Result<Credentials, &'static str> {
    let mut credentials = validate_login_input(email, password)?;
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err("Password must be at least 6 characters.");
    }
    let name = name.trim();
    credentials.display_name = (!name.is_empty()).then(|| name.to_owned());
    Ok(credentials)
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let tab = RwSignal::new(AuthTab::default());
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = {
        let session = session.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if busy.get() {
                return;
            }
            let current = tab.get();
            let validated = match current {
                AuthTab::Login => validate_login_input(&email.get(), &password.get()),
                AuthTab::SignUp => validate_signup_input(&name.get(), &email.get(), &password.get()),
            };
            let credentials = match validated {
                Ok(credentials) => credentials,
                Err(message) => {
                    error.set(message.to_owned());
                    return;
                }
            };
            error.set(String::new());
            busy.set(true);

            #[cfg(feature = "hydrate")]
            {
                use session::AuthProvider;

                let auth = std::sync::Arc::clone(&session.auth);
                leptos::task::spawn_local(async move {
                    let result = match current {
                        AuthTab::Login => auth.sign_in_with_password(&credentials.email, &credentials.password).await,
                        AuthTab::SignUp => {
                            auth.sign_up(&credentials.email, &credentials.password, credentials.display_name.as_deref())
                                .await
                        }
                    };
                    busy.set(false);
                    match result {
                        // The guest-only guard redirects to the dashboard once the
                        // store sees the new identity.
                        Ok(_) => password.set(String::new()),
                        Err(e) => error.set(e.to_string()),
                    }
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (&session, credentials);
            }
        }
    };

    let on_google = move |_| {
        if busy.get() {
            return;
        }
        error.set(String::new());
        #[cfg(feature = "hydrate")]
        {
            use session::{AuthProvider, OAuthProvider};

            let auth = std::sync::Arc::clone(&session.auth);
            leptos::task::spawn_local(async move {
                match auth.sign_in_with_oauth(OAuthProvider::Google).await {
                    Ok(url) => crate::util::browser::assign_location(&url),
                    Err(e) => error.set(e.to_string()),
                }
            });
        }
    };

    let select = move |next: AuthTab| {
        tab.set(next);
        error.set(String::new());
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <div class="tabs" role="tablist">
                    <button
                        class="tabs__trigger"
                        class:tabs__trigger--active=move || tab.get() == AuthTab::Login
                        type="button"
                        on:click=move |_| select(AuthTab::Login)
                    >
                        "Login"
                    </button>
                    <button
                        class="tabs__trigger"
                        class:tabs__trigger--active=move || tab.get() == AuthTab::SignUp
                        type="button"
                        on:click=move |_| select(AuthTab::SignUp)
                    >
                        "Sign Up"
                    </button>
                </div>

                <form class="auth-form" on:submit=on_submit>
                    <div class="auth-form__header">
                        {move || match tab.get() {
                            AuthTab::Login => {
                                view! {
                                    <h2>"Welcome back"</h2>
                                    <p>"Login to your account"</p>
                                }
                                    .into_any()
                            }
                            AuthTab::SignUp => {
                                view! {
                                    <h2>"Create an account"</h2>
                                    <p>"Sign up for a new account"</p>
                                }
                                    .into_any()
                            }
                        }}
                    </div>

                    <Show when=move || !error.get().is_empty()>
                        <p class="auth-form__error" role="alert">{move || error.get()}</p>
                    </Show>

                    <Show when=move || tab.get() == AuthTab::SignUp>
                        <label class="field">
                            <span>"Name"</span>
                            <input
                                type="text"
                                placeholder="IconLover"
                                prop:value=move || name.get()
                                on:input=move |ev| name.set(event_target_value(&ev))
                            />
                        </label>
                    </Show>
                    <label class="field">
                        <span>"Email"</span>
                        <input
                            type="email"
                            placeholder="m@example.com"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="field">
                        <span>"Password"</span>
                        <input
                            type="password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </label>

                    <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                        {move || match (tab.get(), busy.get()) {
                            (_, true) => "Please wait...",
                            (AuthTab::Login, false) => "Login",
                            (AuthTab::SignUp, false) => "Sign Up",
                        }}
                    </button>
                    <button class="btn btn--outline" type="button" disabled=move || busy.get() on:click=on_google>
                        {move || match tab.get() {
                            AuthTab::Login => "Login with Google",
                            AuthTab::SignUp => "Sign Up with Google",
                        }}
                    </button>
                </form>
            </div>
        </div>
    }
}
