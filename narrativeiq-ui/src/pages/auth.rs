//! Sign In / Sign Up Page

use leptos::*;
use leptos_router::use_navigate;

use narrativeiq::controllers::{AuthFormController, AuthMode};
use narrativeiq::views::layout::PRODUCT_NAME;

use crate::components::InlineLoading;
use crate::state::{Controller, GlobalState};

#[component]
pub fn Auth() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();
    let form = Controller::new(AuthFormController::new(state.session.clone()));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let state = state.clone();
        let navigate = navigate.clone();
        form.spawn(move |c| async move {
            match c.submit().await {
                Ok((_, to)) => {
                    state.sync();
                    state.show_success(c.snapshot().mode.success_notice());
                    navigate(to.path(), Default::default());
                }
                Err(e) => state.show_error(&e.to_string()),
            }
        });
    };

    let sign_up = move || form.read(|c| c.snapshot().mode == AuthMode::SignUp);
    let toggle = move |_| {
        form.update(|c| {
            let next = match c.snapshot().mode {
                AuthMode::SignIn => AuthMode::SignUp,
                AuthMode::SignUp => AuthMode::SignIn,
            };
            c.set_mode(next);
        })
    };
    let busy = move || form.busy();

    view! {
        <div class="max-w-md mx-auto mt-16 bg-gray-800 rounded-xl p-8">
            <h1 class="text-2xl font-bold text-center mb-2">
                {move || if sign_up() { "Create your account" } else { "Welcome back" }}
            </h1>
            <p class="text-center text-gray-400 mb-6">{format!("to {}", PRODUCT_NAME)}</p>

            <form on:submit=on_submit class="space-y-4">
                <Show when=sign_up>
                    <input
                        type="text"
                        placeholder="Name"
                        on:input=move |ev| form.update(|c| c.set_name(event_target_value(&ev)))
                        class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600"
                    />
                </Show>
                <input
                    type="email"
                    placeholder="Email"
                    on:input=move |ev| form.update(|c| c.set_email(event_target_value(&ev)))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600"
                />
                <input
                    type="password"
                    placeholder="Password"
                    on:input=move |ev| form.update(|c| c.set_password(event_target_value(&ev)))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600"
                />
                <button
                    type="submit"
                    disabled=busy
                    class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600 rounded-lg py-3 font-semibold flex items-center justify-center space-x-2"
                >
                    {move || busy().then(|| view! { <InlineLoading /> })}
                    <span>{move || if sign_up() { "Sign Up" } else { "Sign In" }}</span>
                </button>
            </form>

            <button on:click=toggle class="w-full mt-4 text-sm text-gray-400 hover:text-white">
                {move || if sign_up() {
                    "Already have an account? Sign in"
                } else {
                    "New here? Create an account"
                }}
            </button>
        </div>
    }
}
