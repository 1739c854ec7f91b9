//! Landing Page

use leptos::*;
use leptos_router::*;

use narrativeiq::views::layout::{FEATURES, PRODUCT_NAME, TAGLINE};
use narrativeiq::Route;

use crate::state::GlobalState;

#[component]
pub fn Index() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let cta = move || {
        if state.auth.with(|a| a.user().is_some()) {
            (Route::Dashboard.path(), "Open Workspace")
        } else {
            (Route::Auth.path(), "Get Started")
        }
    };

    view! {
        <div class="space-y-16 py-12">
            <section class="text-center space-y-6">
                <h1 class="text-5xl font-bold">{PRODUCT_NAME}</h1>
                <p class="text-xl text-gray-400">{TAGLINE}</p>
                {move || {
                    let (href, label) = cta();
                    view! {
                        <A
                            href=href
                            class="inline-block px-8 py-4 bg-primary-600 hover:bg-primary-700 rounded-lg font-semibold"
                        >
                            {label}
                        </A>
                    }
                }}
            </section>

            <section class="grid md:grid-cols-3 gap-6">
                {FEATURES
                    .into_iter()
                    .map(|feature| view! {
                        <div class="bg-gray-800 rounded-xl p-6">
                            <div class="flex items-center justify-between mb-2">
                                <h3 class="text-lg font-semibold">{feature.title}</h3>
                                {feature.badge.map(|b| view! {
                                    <span class="px-2 py-0.5 rounded-full bg-primary-600 text-xs">{b}</span>
                                })}
                            </div>
                            <p class="text-gray-400 text-sm">{feature.description}</p>
                        </div>
                    })
                    .collect_view()}
            </section>
        </div>
    }
}
