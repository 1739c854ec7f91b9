//! Workspace Page
//!
//! Text editor with persona enhancement, the four analyses, upload and save.

use leptos::*;

use narrativeiq::controllers::workspace::{
    self, AnalysisKind, WorkspaceController, APPLIED_NOTICE, SAVED_NOTICE,
};
use narrativeiq::controllers::{extracted_notice, UPLOAD_FAILED};
use narrativeiq::models::EnhanceResult;
use narrativeiq::views::analysis::format_score;
use narrativeiq::views::text::counts_line;
use narrativeiq::views::AnalysisView;

use crate::api;
use super::credits_label;
use crate::components::{AnalysisPanel, DiffView, InlineLoading, UploadButton};
use crate::state::{use_report, Controller, GlobalState};

/// Workspace page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let report = use_report();
    let ws = Controller::new(WorkspaceController::new(state.session.clone()));

    ws.spawn(|c| async move {
        if let Err(e) = c.load_personas().await {
            web_sys::console::warn_1(&format!("Persona list unavailable: {}", e).into());
        }
    });

    let enhance = {
        let state = state.clone();
        let report = report.clone();
        move |_| {
            let state = state.clone();
            let report = report.clone();
            ws.spawn(move |c| async move {
                match c.enhance().await {
                    Ok(res) => state.show_success(&workspace::enhanced_notice(&res)),
                    Err(e) => report(None, &e),
                }
                state.sync();
            });
        }
    };

    let analyze = {
        let state = state.clone();
        let report = report.clone();
        move |kind: AnalysisKind| {
            let state = state.clone();
            let report = report.clone();
            ws.spawn(move |c| async move {
                match c.analyze(kind).await {
                    Ok(()) => state.show_success(workspace::ANALYSIS_COMPLETE),
                    Err(e) => report(None, &e),
                }
                state.sync();
            });
        }
    };

    let upload = {
        let state = state.clone();
        let report = report.clone();
        move |file: web_sys::File| {
            let state = state.clone();
            let report = report.clone();
            ws.spawn(move |c| async move {
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

    let save = {
        let state = state.clone();
        let report = report.clone();
        move |_| {
            let state = state.clone();
            let report = report.clone();
            ws.spawn(move |c| async move {
                match c.save().await {
                    Ok(_) => state.show_success(SAVED_NOTICE),
                    Err(e) => report(None, &e),
                }
            });
        }
    };

    let apply = {
        let state = state.clone();
        move |_| {
            ws.update(|c| {
                if c.apply_enhanced() {
                    state.show_success(APPLIED_NOTICE);
                }
            })
        }
    };

    let busy = move || ws.busy();

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Workspace"</h1>
                <p class="text-gray-400 mt-1">"Enhance and analyze your writing"</p>
            </div>

            <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                <div class="flex flex-wrap gap-3">
                    <input
                        type="text"
                        placeholder="Untitled"
                        prop:value=move || ws.read(|c| c.snapshot().title)
                        on:input=move |ev| ws.update(|c| c.set_title(event_target_value(&ev)))
                        class="flex-1 bg-gray-700 rounded-lg px-4 py-2 border border-gray-600"
                    />
                    <UploadButton on_file=upload disabled=Signal::derive(busy) />
                </div>

                <textarea
                    rows="12"
                    placeholder="Paste or write your text here..."
                    prop:value=move || ws.read(|c| c.snapshot().text)
                    on:input=move |ev| ws.update(|c| c.set_text(event_target_value(&ev)))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600 font-serif"
                />
                <p class="text-xs text-gray-400">{move || ws.read(|c| counts_line(&c.snapshot().text))}</p>

                <div class="flex flex-wrap items-center gap-3">
                    <select
                        on:change=move |ev| ws.update(|c| c.set_persona(event_target_value(&ev)))
                        class="bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                    >
                        {move || {
                            let snapshot = ws.read(|c| c.snapshot());
                            snapshot
                                .persona_options()
                                .into_iter()
                                .map(|(key, label)| {
                                    let selected = key == snapshot.persona;
                                    view! { <option value=key selected=selected>{label}</option> }
                                })
                                .collect_view()
                        }}
                    </select>
                    <button
                        on:click=enhance
                        disabled=busy
                        class="px-4 py-2 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600 rounded-lg font-medium"
                    >
                        "Enhance (1 credit)"
                    </button>
                    <button
                        on:click=save
                        disabled=busy
                        class="px-4 py-2 bg-gray-600 hover:bg-gray-500 disabled:bg-gray-700 rounded-lg"
                    >
                        "Save"
                    </button>
                    {move || busy().then(|| view! { <InlineLoading /> })}
                </div>

                <div class="flex flex-wrap items-center gap-3 pt-4 border-t border-gray-700">
                    <input
                        type="text"
                        placeholder="Character name"
                        prop:value=move || ws.read(|c| c.snapshot().character_name)
                        on:input=move |ev| ws.update(|c| c.set_character_name(event_target_value(&ev)))
                        class="bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                    />
                    {AnalysisKind::ALL
                        .into_iter()
                        .map(|kind| {
                            let analyze = analyze.clone();
                            let label = format!(
                                "{} ({})",
                                kind.label(),
                                credits_label(kind.operation().cost())
                            );
                            view! {
                                <button
                                    on:click=move |_| analyze(kind)
                                    disabled=busy
                                    class="px-3 py-2 bg-gray-700 hover:bg-gray-600 disabled:bg-gray-800 rounded-lg text-sm"
                                >
                                    {label}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
            </section>

            {move || ws.read(|c| c.snapshot().enhance).map(|result| view! {
                <EnhanceCard result=result on_apply=apply.clone() />
            })}

            {move || {
                let snapshot = ws.read(|c| c.snapshot());
                let panels: Vec<AnalysisView> = snapshot
                    .consistency
                    .map(AnalysisView::Consistency)
                    .into_iter()
                    .chain(snapshot.structure.map(AnalysisView::Structure))
                    .chain(snapshot.character.map(AnalysisView::Character))
                    .collect();
                view! {
                    {snapshot.combined_score.map(|score| view! {
                        <div class="bg-gray-800 rounded-xl p-6 text-center">
                            <div class="text-4xl font-bold">{format_score(score)}</div>
                            <div class="text-sm text-gray-400">"Deep Scan score"</div>
                        </div>
                    })}
                    {panels
                        .into_iter()
                        .map(|analysis| view! { <AnalysisPanel analysis=analysis /> })
                        .collect_view()}
                }
            }}
        </div>
    }
}

/// Enhancement result with diff and highlighted changes
#[component]
fn EnhanceCard<F>(result: EnhanceResult, on_apply: F) -> impl IntoView
where
    F: Fn(ev::MouseEvent) + 'static,
{
    let changes = result.changes.clone();

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-xl font-semibold">"Enhanced"</h2>
                <div class="flex items-center space-x-4">
                    <span class="text-sm text-gray-400">
                        {format!("{}% similar", format_score(result.similarity_score))}
                    </span>
                    <button
                        on:click=on_apply
                        class="px-4 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg text-sm"
                    >
                        "Apply"
                    </button>
                </div>
            </div>

            {if result.diff.is_empty() {
                view! { <p class="whitespace-pre-wrap">{result.enhanced_text.clone()}</p> }.into_view()
            } else {
                view! { <DiffView diff=result.diff.clone() /> }.into_view()
            }}

            {(!changes.is_empty()).then(|| view! {
                <div>
                    <h3 class="font-semibold mb-2">"Key changes"</h3>
                    <ul class="space-y-2 text-sm">
                        {changes.into_iter().map(|change| view! {
                            <li>
                                <span class="line-through text-gray-500">{change.original}</span>
                                " → "
                                <span class="text-green-400">{change.enhanced}</span>
                                <p class="text-xs text-gray-400">{change.reason}</p>
                            </li>
                        }).collect_view()}
                    </ul>
                </div>
            })}
        </section>
    }
}
