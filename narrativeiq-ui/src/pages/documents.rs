//! Documents Page

use leptos::*;

use narrativeiq::controllers::documents::{LIST_FAILED, OPEN_FAILED};
use narrativeiq::controllers::DocumentsController;
use narrativeiq::models::Document;
use narrativeiq::views::text::{counts_line, format_date};

use crate::components::Loading;
use crate::state::{use_report, Controller, GlobalState};

#[component]
pub fn Documents() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let report = use_report();
    let docs = Controller::new(DocumentsController::new(state.session.clone()));

    {
        let report = report.clone();
        docs.spawn(move |c| async move {
            if let Err(e) = c.load().await {
                report(Some(LIST_FAILED), &e);
            }
        });
    }

    let open = move |id: String| {
        let report = report.clone();
        docs.spawn(move |c| async move {
            if let Err(e) = c.open(&id).await {
                report(Some(OPEN_FAILED), &e);
            }
        });
    };

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Documents"</h1>
                <p class="text-gray-400 mt-1">"Everything you've saved or enhanced"</p>
            </div>

            {move || {
                let snapshot = docs.read(|c| c.snapshot());
                if snapshot.loading {
                    return view! { <Loading /> }.into_view();
                }
                if let Some(doc) = snapshot.selected {
                    return view! {
                        <DocumentReader doc=doc on_close=move |_| docs.update(|c| c.close()) />
                    }
                    .into_view();
                }
                if snapshot.documents.is_empty() {
                    return view! {
                        <p class="text-gray-400">"No documents yet. Enhance some text to get started."</p>
                    }
                    .into_view();
                }

                let open = open.clone();
                view! {
                    <div class="grid md:grid-cols-2 gap-4">
                        {snapshot.documents.into_iter().map(|doc| {
                            let open = open.clone();
                            let id = doc.id.clone();
                            view! {
                                <button
                                    on:click=move |_| open(id.clone())
                                    class="text-left bg-gray-800 hover:bg-gray-700 rounded-xl p-4 transition-colors"
                                >
                                    <h3 class="font-semibold">{doc.title}</h3>
                                    <p class="text-xs text-gray-400 mb-2">{format_date(&doc.created_at)}</p>
                                    <p class="text-sm text-gray-300 line-clamp-3">{doc.preview.unwrap_or_default()}</p>
                                </button>
                            }
                        }).collect_view()}
                    </div>
                }
                .into_view()
            }}
        </div>
    }
}

#[component]
fn DocumentReader<F>(doc: Document, on_close: F) -> impl IntoView
where
    F: Fn(ev::MouseEvent) + 'static,
{
    let content = doc.content.unwrap_or_default();

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-4">
            <div class="flex items-center justify-between">
                <div>
                    <h2 class="text-2xl font-semibold">{doc.title}</h2>
                    <p class="text-xs text-gray-400">
                        {format!("{} · {}", format_date(&doc.created_at), counts_line(&content))}
                    </p>
                </div>
                <button on:click=on_close class="px-4 py-2 bg-gray-600 hover:bg-gray-500 rounded-lg text-sm">
                    "Back"
                </button>
            </div>
            <article class="whitespace-pre-wrap font-serif leading-relaxed">{content}</article>
        </section>
    }
}
