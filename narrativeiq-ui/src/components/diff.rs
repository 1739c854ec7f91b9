//! Inline word diff

use leptos::*;

use narrativeiq::models::DiffSegment;
use narrativeiq::views::diff::spans;

#[component]
pub fn DiffView(diff: Vec<DiffSegment>) -> impl IntoView {
    let rendered = spans(&diff)
        .into_iter()
        .map(|span| {
            let class = span.css_class();
            let text = format!("{} ", span.text);
            view! { <span class=class>{text}</span> }
        })
        .collect_view();

    view! {
        <div class="bg-gray-900 rounded-lg p-4 leading-relaxed whitespace-pre-wrap">{rendered}</div>
    }
}
