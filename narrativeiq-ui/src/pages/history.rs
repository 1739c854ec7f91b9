//! History Page

use leptos::*;

use narrativeiq::controllers::history::{input_excerpt, operation_label, LOAD_FAILED};
use narrativeiq::controllers::HistoryController;
use narrativeiq::views::text::format_datetime;

use crate::components::Loading;
use crate::state::{use_report, Controller, GlobalState};

#[component]
pub fn History() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let report = use_report();
    let history = Controller::new(HistoryController::new(state.session.clone()));

    history.spawn(move |c| async move {
        if let Err(e) = c.load().await {
            report(Some(LOAD_FAILED), &e);
        }
    });

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"History"</h1>
                <p class="text-gray-400 mt-1">"Every operation and the credits it used"</p>
            </div>

            {move || {
                let snapshot = history.read(|c| c.snapshot());
                if snapshot.loading {
                    return view! { <Loading /> }.into_view();
                }
                if snapshot.entries.is_empty() {
                    return view! { <p class="text-gray-400">"No activity yet."</p> }.into_view();
                }

                view! {
                    <ul class="space-y-3">
                        {snapshot.entries.into_iter().map(|entry| {
                            let excerpt = input_excerpt(&entry);
                            view! {
                                <li class="bg-gray-800 rounded-xl p-4">
                                    <div class="flex items-center justify-between mb-2">
                                        <div class="flex items-center space-x-2">
                                            <span class="font-semibold">{operation_label(&entry.operation)}</span>
                                            {entry.persona.map(|p| view! {
                                                <span class="px-2 py-0.5 rounded bg-gray-700 text-xs capitalize">{p}</span>
                                            })}
                                        </div>
                                        <div class="text-xs text-gray-400 space-x-3">
                                            <span>{format!("{} credits", entry.credits_used)}</span>
                                            <span>{format_datetime(&entry.created_at)}</span>
                                        </div>
                                    </div>
                                    <p class="text-sm text-gray-300">{excerpt}</p>
                                </li>
                            }
                        }).collect_view()}
                    </ul>
                }
                .into_view()
            }}
        </div>
    }
}
