//! Profile Page

use leptos::*;

use narrativeiq::controllers::profile::{PASSWORD_CHANGED, PROFILE_UPDATED};
use narrativeiq::controllers::ProfileController;
use narrativeiq::views::layout::{avatar_initial, credits_badge};

use crate::state::{use_report, Controller, GlobalState};

#[component]
pub fn Profile() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let report = use_report();
    let profile = Controller::new(ProfileController::new(state.session.clone()));

    let save_profile = {
        let state = state.clone();
        let report = report.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            let state = state.clone();
            let report = report.clone();
            profile.spawn(move |c| async move {
                match c.save_profile().await {
                    Ok(_) => state.show_success(PROFILE_UPDATED),
                    Err(e) => report(None, &e),
                }
                state.sync();
            });
        }
    };

    let change_password = {
        let state = state.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            let state = state.clone();
            let report = report.clone();
            profile.spawn(move |c| async move {
                match c.change_password().await {
                    Ok(()) => state.show_success(PASSWORD_CHANGED),
                    Err(e) => report(None, &e),
                }
            });
        }
    };

    let busy = move || profile.busy();
    let header = {
        let state = state.clone();
        move || {
            state.user().map(|u| view! {
                <div class="flex items-center space-x-4">
                    <div class="w-16 h-16 rounded-full bg-primary-600 flex items-center justify-center text-2xl font-bold">
                        {avatar_initial(&u)}
                    </div>
                    <div>
                        <h1 class="text-3xl font-bold">{u.name.clone()}</h1>
                        <p class="text-gray-400">{format!("{} · {}", u.email, credits_badge(Some(&u)))}</p>
                    </div>
                </div>
            })
        }
    };

    view! {
        <div class="space-y-8 max-w-2xl">
            {header}

            <form on:submit=save_profile class="bg-gray-800 rounded-xl p-6 space-y-4">
                <h2 class="text-xl font-semibold">"Profile"</h2>
                <input
                    type="text"
                    placeholder="Name"
                    prop:value=move || profile.read(|c| c.snapshot().name)
                    on:input=move |ev| profile.update(|c| c.set_name(event_target_value(&ev)))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600"
                />
                <input
                    type="email"
                    placeholder="Email"
                    prop:value=move || profile.read(|c| c.snapshot().email)
                    on:input=move |ev| profile.update(|c| c.set_email(event_target_value(&ev)))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600"
                />
                <button
                    type="submit"
                    disabled=busy
                    class="px-6 py-3 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600 rounded-lg font-medium"
                >
                    "Save Changes"
                </button>
            </form>

            <form on:submit=change_password class="bg-gray-800 rounded-xl p-6 space-y-4">
                <h2 class="text-xl font-semibold">"Change Password"</h2>
                <input
                    type="password"
                    placeholder="Current password"
                    prop:value=move || profile.read(|c| c.snapshot().current_password)
                    on:input=move |ev| profile.update(|c| {
                        let new = c.snapshot().new_password;
                        c.set_passwords(event_target_value(&ev), new);
                    })
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600"
                />
                <input
                    type="password"
                    placeholder="New password"
                    prop:value=move || profile.read(|c| c.snapshot().new_password)
                    on:input=move |ev| profile.update(|c| {
                        let current = c.snapshot().current_password;
                        c.set_passwords(current, event_target_value(&ev));
                    })
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600"
                />
                <button
                    type="submit"
                    disabled=busy
                    class="px-6 py-3 bg-gray-600 hover:bg-gray-500 disabled:bg-gray-700 rounded-lg font-medium"
                >
                    "Update Password"
                </button>
            </form>
        </div>
    }
}
