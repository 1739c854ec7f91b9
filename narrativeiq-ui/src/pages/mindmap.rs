//! Narrative Mindmap Page
//!
//! Renders the backend's PNG knowledge graph and offers it for download.

use leptos::*;

use narrativeiq::controllers::mindmap::{GENERATED_NOTICE, MIN_TEXT_CHARS};
use narrativeiq::controllers::{extracted_notice, MindmapController, UPLOAD_FAILED};
use narrativeiq::models::MindmapSummary;
use narrativeiq::views::text::counts_line;

use crate::api;
use crate::components::{InlineLoading, UploadButton};
use crate::state::{use_report, Controller, GlobalState};

#[component]
pub fn Mindmap() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let report = use_report();
    let mm = Controller::new(MindmapController::new(state.session.clone()));

    // Object URL for the current image; revoked when replaced
    let image_url = create_rw_signal(None::<String>);
    on_cleanup(move || {
        if let Some(url) = image_url.get_untracked() {
            let _ = web_sys::Url::revoke_object_url(&url);
        }
    });

    let generate = {
        let state = state.clone();
        let report = report.clone();
        move |_| {
            let state = state.clone();
            let report = report.clone();
            clear_image(image_url);
            mm.spawn(move |c| async move {
                let result = c.generate_image().await;
                // Mirror whatever the controller holds now; a locally rejected
                // request leaves the previous image in place
                image_url.set(c.snapshot().image.as_deref().and_then(api::image_url));
                match result {
                    Ok(_) => state.show_success(GENERATED_NOTICE),
                    Err(e) => report(None, &e),
                }
                state.sync();
            });
        }
    };

    let graph = {
        let state = state.clone();
        let report = report.clone();
        move |_| {
            let state = state.clone();
            let report = report.clone();
            mm.spawn(move |c| async move {
                if let Err(e) = c.generate_graph().await {
                    report(None, &e);
                }
                state.sync();
            });
        }
    };

    let upload = {
        let state = state.clone();
        move |file: web_sys::File| {
            let state = state.clone();
            let report = report.clone();
            mm.spawn(move |c| async move {
                let result = match api::read_file(file).await {
                    Ok(part) => c.upload(part).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(res) => state.show_success(&extracted_notice(&res)),
                    Err(e) => report(Some(UPLOAD_FAILED), &e),
                }
            });
        }
    };

    let download = move |_| {
        let snapshot = mm.read(|c| c.snapshot());
        if let Some(bytes) = &snapshot.image {
            api::download(bytes, &snapshot.download_name(), "image/png");
        }
    };

    let busy = move || mm.busy();
    let too_short = move || mm.read(|c| c.snapshot().text.chars().count() < MIN_TEXT_CHARS);

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Narrative Mindmap"</h1>
                <p class="text-gray-400 mt-1">
                    "Extract characters, locations, themes & relationships as a knowledge graph"
                </p>
            </div>

            <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                <div class="flex flex-wrap gap-3">
                    <input
                        type="text"
                        prop:value=move || mm.read(|c| c.snapshot().title)
                        on:input=move |ev| mm.update(|c| c.set_title(event_target_value(&ev)))
                        class="flex-1 bg-gray-700 rounded-lg px-4 py-2 border border-gray-600"
                    />
                    <UploadButton on_file=upload disabled=Signal::derive(busy) />
                </div>
                <textarea
                    rows="10"
                    placeholder="Paste at least 100 characters of narrative text..."
                    prop:value=move || mm.read(|c| c.snapshot().text)
                    on:input=move |ev| mm.update(|c| c.set_text(event_target_value(&ev)))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600 font-serif"
                />
                <p class="text-xs text-gray-400">
                    {move || mm.read(|c| counts_line(&c.snapshot().text))}
                    {move || too_short().then(|| format!(" · minimum {} characters", MIN_TEXT_CHARS))}
                </p>
                <div class="flex flex-wrap items-center gap-3">
                    <button
                        on:click=generate
                        disabled=busy
                        class="px-4 py-2 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600 rounded-lg font-medium"
                    >
                        "Generate Mindmap (2 credits)"
                    </button>
                    <button
                        on:click=graph
                        disabled=busy
                        class="px-4 py-2 bg-gray-700 hover:bg-gray-600 disabled:bg-gray-800 rounded-lg text-sm"
                    >
                        "Graph Data (2 credits)"
                    </button>
                    {move || busy().then(|| view! { <InlineLoading /> })}
                </div>
            </section>

            {move || image_url.get().map(|url| view! {
                <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                    <div class="flex items-center justify-between">
                        <h2 class="text-xl font-semibold">{move || mm.read(|c| c.snapshot().title)}</h2>
                        <button
                            on:click=download
                            class="px-4 py-2 bg-gray-600 hover:bg-gray-500 rounded-lg text-sm"
                        >
                            "Download PNG"
                        </button>
                    </div>
                    <img src=url alt="Narrative mindmap" class="w-full rounded-lg bg-white" />
                </section>
            })}

            {move || {
                mm.read(|c| c.snapshot().graph)
                    .map(|g| view! { <GraphSummary summary=g.summary /> })
            }}
        </div>
    }
}

/// Hide the displayed image and release its object URL
fn clear_image(image_url: RwSignal<Option<String>>) {
    if let Some(url) = image_url.get_untracked() {
        let _ = web_sys::Url::revoke_object_url(&url);
    }
    image_url.set(None);
}

#[component]
fn GraphSummary(summary: MindmapSummary) -> impl IntoView {
    let counts = [
        ("Characters", summary.character_count),
        ("Locations", summary.location_count),
        ("Themes", summary.theme_count),
        ("Relationships", summary.relationship_count),
    ];

    view! {
        <section class="grid grid-cols-2 md:grid-cols-4 gap-4">
            {counts
                .into_iter()
                .map(|(label, count)| view! {
                    <div class="bg-gray-800 rounded-xl p-4 text-center">
                        <div class="text-3xl font-bold">{count}</div>
                        <div class="text-sm text-gray-400">{label}</div>
                    </div>
                })
                .collect_view()}
        </section>
    }
}
