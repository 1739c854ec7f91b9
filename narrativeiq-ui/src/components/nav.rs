//! Navigation Component
//!
//! App header with brand, page links, credits badge and the account menu.

use leptos::*;
use leptos_router::*;

use narrativeiq::views::layout::{avatar_initial, credits_badge, NAV_ITEMS, PRODUCT_NAME};
use narrativeiq::Route;

use crate::state::GlobalState;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let signed_in = {
        let state = state.clone();
        move || state.auth.with(|a| a.user().is_some())
    };

    let logout = {
        let state = state.clone();
        move |_| {
            state.logout();
            navigate(Route::Index.path(), Default::default());
        }
    };

    let badge = {
        let state = state.clone();
        move || credits_badge(state.user().as_ref())
    };
    let initial = {
        let state = state.clone();
        move || state.user().map(|u| avatar_initial(&u)).unwrap_or_default()
    };

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href=Route::Index.path() class="flex items-center space-x-3">
                        <span class="text-2xl">"✍️"</span>
                        <span class="text-xl font-bold text-white">{PRODUCT_NAME}</span>
                    </A>

                    <Show
                        when=signed_in
                        fallback=|| view! {
                            <A
                                href=Route::Auth.path()
                                class="px-4 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium"
                            >
                                "Sign In"
                            </A>
                        }
                    >
                        <div class="flex items-center space-x-1">
                            {NAV_ITEMS
                                .iter()
                                .map(|item| view! { <NavLink href=item.route.path() label=item.label /> })
                                .collect_view()}
                        </div>

                        <div class="flex items-center space-x-3">
                            <A
                                href=Route::Credits.path()
                                class="px-3 py-1 rounded-full bg-gray-700 text-sm text-primary-300"
                            >
                                {badge.clone()}
                            </A>
                            <A
                                href=Route::Profile.path()
                                class="w-8 h-8 rounded-full bg-primary-600 flex items-center justify-center font-bold"
                            >
                                {initial.clone()}
                            </A>
                            <button
                                on:click=logout.clone()
                                class="px-3 py-2 text-sm text-gray-400 hover:text-white"
                            >
                                "Sign Out"
                            </button>
                        </div>
                    </Show>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A
            href=href
            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
            active_class="bg-gray-700 text-white"
        >
            {label}
        </A>
    }
}
