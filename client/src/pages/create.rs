//! Icon creation page: prompt in, generated icon out, one InkBuck per image.
//! A generated base icon can then be restyled for another subject.

#[cfg(test)]
#[path = "create_test.rs"]
mod create_test;

use leptos::prelude::*;
use session::GeneratedIcon;

use crate::state::session::{SessionContext, SyncStatus};

/// Matches the server-side prompt limit.
pub(crate) const MAX_PROMPT_CHARS: usize = 200;

pub(crate) fn validate_prompt_input(raw: &str) -> Result<String, &'static str> {
    let prompt = raw.trim();
    if prompt.is_empty() {
        return Err("Enter a prompt for your icon.");
    }
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err("Keep the prompt under 200 characters.");
    }
    Ok(prompt.to_owned())
}

/// A styling request needs a base icon and its own prompt.
pub(crate) fn validate_style_input(base: Option<&GeneratedIcon>, raw: &str) -> Result<String, &'static str> {
    if base.is_none() {
        return Err("Generate a base image first.");
    }
    validate_prompt_input(raw).map_err(|_| "Enter a prompt for the styled image (at most 200 characters).")
}

/// Balance to display: the latest generation wins over the synced record.
pub(crate) fn displayed_balance(last_icon: Option<&GeneratedIcon>, sync: &SyncStatus) -> Option<i32> {
    last_icon.map(|icon| icon.balance).or_else(|| sync.balance())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Step {
    Base,
    Styled,
}

#[component]
pub fn CreatePage() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let sync = session.sync;
    let auth = StoredValue::new(std::sync::Arc::clone(&session.auth));
    let prompt = RwSignal::new(String::new());
    let style_prompt = RwSignal::new(String::new());
    let busy = RwSignal::new(None::<Step>);
    let error = RwSignal::new(String::new());
    let icon = RwSignal::new(None::<GeneratedIcon>);
    let styled = RwSignal::new(None::<GeneratedIcon>);
    let latest = RwSignal::new(None::<GeneratedIcon>);

    let balance = move || latest.with(|last| sync.with(|status| displayed_balance(last.as_ref(), status)));
    let out_of_credits = move || balance() == Some(0);

    let submit = move |step: Step| {
        if busy.get().is_some() {
            return;
        }
        let checked = match step {
            Step::Base => validate_prompt_input(&prompt.get()),
            Step::Styled => icon.with(|base| validate_style_input(base.as_ref(), &style_prompt.get())),
        };
        let subject = match checked {
            Ok(subject) => subject,
            Err(message) => {
                error.set(message.to_owned());
                return;
            }
        };
        error.set(String::new());
        busy.set(Some(step));

        #[cfg(feature = "hydrate")]
        {
            let auth = auth.get_value();
            let base = icon.get_untracked();
            leptos::task::spawn_local(async move {
                let result = match auth.access_token().await {
                    Ok(Some(token)) => match (step, base) {
                        (Step::Styled, Some(base)) => crate::net::api::style_icon(&token, &subject, &base).await,
                        _ => crate::net::api::generate_icon(&token, &subject).await,
                    },
                    Ok(None) => Err("Your session expired. Log in again.".to_owned()),
                    Err(e) => Err(e.to_string()),
                };
                busy.set(None);
                match result {
                    Ok(generated) => {
                        sync.update(|status| {
                            if let SyncStatus::Synced(record) = status {
                                record.balance = generated.balance;
                            }
                        });
                        latest.set(Some(generated.clone()));
                        match step {
                            Step::Base => {
                                icon.set(Some(generated));
                                styled.set(None);
                            }
                            Step::Styled => styled.set(Some(generated)),
                        }
                    }
                    Err(message) => error.set(message),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (auth, subject);
        }
    };

    let on_generate = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        submit(Step::Base);
    };
    let on_style = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        submit(Step::Styled);
    };

    view! {
        <div class="create">
            <h1 class="create__title">"Create Your Images"</h1>
            <form class="create__form" on:submit=on_generate>
                <label class="field">
                    <span>"Create your base image " <small>"(1 IB per generation)"</small></span>
                    <input
                        type="text"
                        maxlength="200"
                        placeholder="Enter prompt for initial image"
                        prop:value=move || prompt.get()
                        on:input=move |ev| prompt.set(event_target_value(&ev))
                    />
                </label>
                <button class="btn btn--primary" type="submit" disabled=move || busy.get().is_some() || out_of_credits()>
                    {move || if busy.get() == Some(Step::Base) { "Generating..." } else { "Generate" }}
                </button>
            </form>

            <p class="create__balance">
                {move || match balance() {
                    Some(n) => format!("{n} InkBucks left"),
                    None => "Loading balance...".to_owned(),
                }}
            </p>
            <Show when=out_of_credits>
                <p class="create__notice">
                    "You are out of InkBucks. " <a href="/pricing">"Get more"</a>
                </p>
            </Show>
            <Show when=move || !error.get().is_empty()>
                <p class="create__error" role="alert">{move || error.get()}</p>
            </Show>

            {move || {
                icon.get()
                    .map(|generated| {
                        view! {
                            <figure class="create__preview">
                                <img src=generated.data_url() alt=generated.prompt.clone()/>
                                <figcaption>{generated.prompt.clone()}</figcaption>
                            </figure>
                        }
                    })
            }}

            <Show when=move || icon.with(Option::is_some)>
                <form class="create__form" on:submit=on_style>
                    <label class="field">
                        <span>"Generate Styled Image " <small>"(1 IB per styling)"</small></span>
                        <input
                            type="text"
                            maxlength="200"
                            placeholder="Enter prompt for styled image"
                            prop:value=move || style_prompt.get()
                            on:input=move |ev| style_prompt.set(event_target_value(&ev))
                        />
                    </label>
                    <button class="btn btn--primary" type="submit" disabled=move || busy.get().is_some() || out_of_credits()>
                        {move || if busy.get() == Some(Step::Styled) { "Generating..." } else { "Generate Styled Image" }}
                    </button>
                </form>
            </Show>

            {move || {
                styled.get()
                    .map(|generated| {
                        view! {
                            <figure class="create__preview create__preview--styled">
                                <img src=generated.data_url() alt=generated.prompt.clone()/>
                                <figcaption>"Styled: " {generated.prompt.clone()}</figcaption>
                            </figure>
                        }
                    })
            }}
        </div>
    }
}
