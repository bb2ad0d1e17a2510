//! Pricing page: InkBuck bundles, the monthly plan, and the FAQ.
//!
//! Checkout is handled by an external billing provider; the buttons here are
//! presentational.

#[cfg(test)]
#[path = "pricing_test.rs"]
mod pricing_test;

use leptos::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanKind {
    OneTime,
    Subscription,
}

#[derive(Clone, Copy, Debug)]
pub struct Plan {
    pub kind: PlanKind,
    /// InkBucks granted (per month for subscriptions).
    pub credits: u32,
    pub price_usd: u32,
    pub features: &'static [(&'static str, bool)],
}

const BASIC_FEATURES: &[(&str, bool)] = &[
    ("Free icon storage", true),
    ("Commercial License (CCO)", true),
    ("Export .png", true),
    ("Consistent style in packs", true),
    ("On the spot icon editing features", true),
    ("Export .svg", false),
];

const FULL_FEATURES: &[(&str, bool)] = &[
    ("Free icon storage", true),
    ("Commercial License (CCO)", true),
    ("Export .png", true),
    ("Consistent style in packs", true),
    ("On the spot icon editing features", true),
    ("Export .svg", true),
];

pub const PLANS: [Plan; 4] = [
    Plan { kind: PlanKind::OneTime, credits: 50, price_usd: 5, features: BASIC_FEATURES },
    Plan { kind: PlanKind::OneTime, credits: 120, price_usd: 10, features: FULL_FEATURES },
    Plan { kind: PlanKind::OneTime, credits: 250, price_usd: 20, features: FULL_FEATURES },
    Plan { kind: PlanKind::Subscription, credits: 200, price_usd: 15, features: FULL_FEATURES },
];

pub const FAQS: [(&str, &str); 6] = [
    (
        "What is an InkBuck (IB)?",
        "Inkbucks are the currency used within our platform to generate and edit icons. You can purchase them in bundles or through a monthly subscription.",
    ),
    (
        "How do I use Inkbucks?",
        "You can use Inkbucks to generate new icons or edit existing ones. Each generation or edit (adding elements) costs 1 IB.",
    ),
    (
        "Are there any free actions?",
        "Yes, cropping and removing elements from icons are free. Only adding new elements costs 1 IB.",
    ),
    (
        "What is an icon pack?",
        "An icon pack is a collection of icons that share the same style. Creating a pack is free, and all icons within a pack will maintain consistency in design.",
    ),
    (
        "Can I cancel my subscription?",
        "Yes, you can cancel your subscription at any time. Your Inkbucks will remain available until they are used.",
    ),
    ("Do Inkbucks expire?", "No, Inkbucks do not expire. You can use them whenever you need."),
];

impl Plan {
    #[must_use]
    pub fn is_subscription(&self) -> bool {
        self.kind == PlanKind::Subscription
    }

    #[must_use]
    pub fn description(&self) -> String {
        match self.kind {
            PlanKind::OneTime => format!("{} IB", self.credits),
            PlanKind::Subscription => format!("{} IB every month", self.credits),
        }
    }

    #[must_use]
    pub fn price_label(&self) -> String {
        match self.kind {
            PlanKind::OneTime => format!("${}", self.price_usd),
            PlanKind::Subscription => format!("${}/month", self.price_usd),
        }
    }

    #[must_use]
    pub fn call_to_action(&self) -> &'static str {
        if self.is_subscription() { "Subscribe Now" } else { "Buy Now" }
    }
}

#[component]
fn PricingCard(plan: Plan) -> impl IntoView {
    let class = if plan.is_subscription() { "plan plan--featured" } else { "plan" };
    view! {
        <div class=class>
            {plan.is_subscription().then(|| view! { <span class="plan__badge">"Recommended"</span> })}
            <h2 class="plan__title">{plan.description()}</h2>
            <p class="plan__price">{plan.price_label()}</p>
            <ul class="plan__features">
                {plan
                    .features
                    .iter()
                    .map(|(label, included)| {
                        let class = if *included { "plan__feature" } else { "plan__feature plan__feature--missing" };
                        view! {
                            <li class=class>
                                <span class="plan__mark">{if *included { "✓" } else { "✗" }}</span>
                                <span>{*label}</span>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
            <button class="btn btn--pill plan__cta" type="button">{plan.call_to_action()}</button>
        </div>
    }
}

#[component]
pub fn PricingPage() -> impl IntoView {
    let open_faq = RwSignal::new(None::<usize>);

    view! {
        <div class="pricing">
            <h1 class="pricing__title">"Pricing"</h1>
            <div class="pricing__plans">
                {PLANS.iter().map(|plan| view! { <PricingCard plan=*plan/> }).collect_view()}
            </div>

            <section class="usage">
                <h2>"What Can You Do with Inkbucks?"</h2>
                <div class="usage__item">
                    <h3>"Generate Icons"</h3>
                    <p>"Create unique icons tailored to your needs. Each generation costs 1 IB."</p>
                </div>
                <div class="usage__item">
                    <h3>"Edit Icons"</h3>
                    <p>"Modify existing icons to fit your style. Adding elements costs 1 IB, while cropping and removing are free."</p>
                </div>
                <div class="usage__item">
                    <h3>"Create Packs"</h3>
                    <p>"Organize your icons into packs with a consistent style. Creating packs is free."</p>
                </div>
            </section>

            <section class="faq">
                <h2>"Frequently Asked Questions"</h2>
                {FAQS
                    .iter()
                    .enumerate()
                    .map(|(index, (question, answer))| {
                        view! {
                            <div class="faq__item">
                                <button
                                    class="faq__question"
                                    type="button"
                                    on:click=move |_| {
                                        open_faq.update(|open| {
                                            *open = if *open == Some(index) { None } else { Some(index) };
                                        });
                                    }
                                >
                                    {*question}
                                </button>
                                <Show when=move || open_faq.get() == Some(index)>
                                    <p class="faq__answer">{*answer}</p>
                                </Show>
                            </div>
                        }
                    })
                    .collect_view()}
            </section>
        </div>
    }
}
