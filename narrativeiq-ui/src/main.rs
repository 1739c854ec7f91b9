//! NarrativeIQ Web App
//!
//! Client-side rendered Leptos application compiled to WebAssembly. All
//! session, gateway and page logic lives in the `narrativeiq` crate; this
//! crate supplies the `fetch` transport, localStorage session and the views.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
