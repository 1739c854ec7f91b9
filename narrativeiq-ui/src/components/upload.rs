//! File picker that hands the chosen file to a callback

use leptos::*;
use wasm_bindgen::JsCast;

/// Accepted upload types
pub const ACCEPT: &str = ".pdf,.txt,.md";

#[component]
pub fn UploadButton(
    #[prop(into)] on_file: Callback<web_sys::File>,
    #[prop(into)] disabled: Signal<bool>,
) -> impl IntoView {
    let on_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            on_file.call(file);
        }
        input.set_value("");
    };

    view! {
        <label class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg cursor-pointer text-sm">
            <input
                type="file"
                accept=ACCEPT
                class="hidden"
                on:change=on_change
                disabled=move || disabled.get()
            />
            {move || if disabled.get() { "Uploading..." } else { "Upload File" }}
        </label>
    }
}
