//! Landing page: hero, feature highlights and icon pack styles.

use leptos::prelude::*;
use leptos_router::components::A;

struct Feature {
    title: &'static str,
    body: &'static str,
}

const FEATURES: [Feature; 3] = [
    Feature {
        title: "Generate with Ease",
        body: "Pick a base style and let InkBlink create a cohesive icon pack in seconds.",
    },
    Feature {
        title: "Edit Like a Pro",
        body: "Fine-tune your icons with our intuitive editor. Spend InkBucks for premium features.",
    },
    Feature {
        title: "Style Your Way",
        body: "Use InkBucks to tweak colors, sizes, and effects. Make every icon pack uniquely yours.",
    },
];

const STYLES: [&str; 6] = ["Minimalist", "Bold", "Hand-Drawn", "Tech", "Animal", "Tools"];

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <section class="hero">
            <h1 class="hero__title">"Craft Icon Packs with " <span class="accent">"InkBlink"</span></h1>
            <p class="hero__tagline">
                "Generate, style, and edit cohesive icon sets using InkBucks. Your creativity, our tools."
            </p>
            <A href="/signup" attr:class="btn btn--pill btn--primary">"Join for free"</A>
        </section>

        <section class="features">
            {FEATURES
                .iter()
                .map(|f| {
                    view! {
                        <article class="feature">
                            <h2>{f.title}</h2>
                            <p>{f.body}</p>
                        </article>
                    }
                })
                .collect_view()}
        </section>

        <section class="styles">
            <h2>"Icon Packs"</h2>
            <ul class="styles__grid">
                {STYLES
                    .iter()
                    .map(|name| {
                        view! {
                            <li class="style-card">
                                <h3>{*name}</h3>
                                <p>"Starting at 50 InkBucks"</p>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </section>
    }
}
