//! Route guard wrapper

use leptos::*;
use leptos_router::Redirect;

use narrativeiq::guard::{self, GuardDecision, Route};

use crate::components::Loading;
use crate::state::GlobalState;

/// Render `children` only when the guard for `route` allows it
#[component]
pub fn Guarded(route: Route, children: ChildrenFn) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    move || match state.auth.with(|auth| guard::resolve(route, auth)) {
        GuardDecision::Placeholder => view! { <Loading /> }.into_view(),
        GuardDecision::Nothing => ().into_view(),
        GuardDecision::Redirect(to) => view! { <Redirect path=to.path() /> }.into_view(),
        GuardDecision::Render => children().into_view(),
    }
}
