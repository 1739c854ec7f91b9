//! Story Completion Page

use leptos::*;

use narrativeiq::controllers::story::{COMPLETED_NOTICE, GENRES, LENGTHS, STYLES};
use narrativeiq::controllers::StoryController;
use narrativeiq::models::StoryResult;
use narrativeiq::views::text::counts_line;

use crate::components::InlineLoading;
use crate::state::{use_report, Controller, GlobalState};

#[component]
pub fn Story() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let report = use_report();
    let story = Controller::new(StoryController::new(state.session.clone()));

    let complete = {
        let state = state.clone();
        move |_| {
            let state = state.clone();
            let report = report.clone();
            story.spawn(move |c| async move {
                match c.complete().await {
                    Ok(_) => state.show_success(COMPLETED_NOTICE),
                    Err(e) => report(None, &e),
                }
                state.sync();
            });
        }
    };

    let busy = move || story.busy();

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Story Completion"</h1>
                <p class="text-gray-400 mt-1">"Start with an idea, get a full narrative with structure"</p>
            </div>

            <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                <input
                    type="text"
                    placeholder="My Story"
                    prop:value=move || story.read(|c| c.snapshot().title)
                    on:input=move |ev| story.update(|c| c.set_title(event_target_value(&ev)))
                    class="w-full bg-gray-700 rounded-lg px-4 py-2 border border-gray-600"
                />
                <textarea
                    rows="8"
                    placeholder="Write the opening of your story (at least 20 characters)..."
                    prop:value=move || story.read(|c| c.snapshot().text)
                    on:input=move |ev| story.update(|c| c.set_text(event_target_value(&ev)))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600 font-serif"
                />
                <p class="text-xs text-gray-400">{move || story.read(|c| counts_line(&c.snapshot().text))}</p>

                <div class="grid grid-cols-3 gap-4">
                    <OptionSelect
                        label="Genre"
                        options=&GENRES
                        current=Signal::derive(move || story.read(|c| c.snapshot().genre))
                        on_pick=move |v: String| story.update(|c| { let _ = c.set_genre(&v); })
                    />
                    <OptionSelect
                        label="Style"
                        options=&STYLES
                        current=Signal::derive(move || story.read(|c| c.snapshot().style))
                        on_pick=move |v: String| story.update(|c| { let _ = c.set_style(&v); })
                    />
                    <OptionSelect
                        label="Length"
                        options=&LENGTHS
                        current=Signal::derive(move || story.read(|c| c.snapshot().length))
                        on_pick=move |v: String| story.update(|c| { let _ = c.set_length(&v); })
                    />
                </div>

                <button
                    on:click=complete
                    disabled=busy
                    class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600 rounded-lg py-3 font-semibold flex items-center justify-center space-x-2"
                >
                    {move || if busy() {
                        view! { <InlineLoading /> <span>"Writing..."</span> }.into_view()
                    } else {
                        view! { <span>"Complete Story (2 credits)"</span> }.into_view()
                    }}
                </button>
            </section>

            {move || {
                story
                    .read(|c| c.snapshot().result)
                    .map(|result| view! { <StoryCard result=result /> })
            }}
        </div>
    }
}

#[component]
fn OptionSelect(
    label: &'static str,
    options: &'static [&'static str],
    current: Signal<String>,
    #[prop(into)] on_pick: Callback<String>,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm text-gray-400 mb-1">{label}</span>
            <select
                on:change=move |ev| on_pick.call(event_target_value(&ev))
                class="w-full bg-gray-700 rounded-lg px-3 py-2 border border-gray-600 capitalize"
            >
                {options
                    .iter()
                    .map(|opt| view! {
                        <option value=*opt selected=move || current.get() == *opt>{*opt}</option>
                    })
                    .collect_view()}
            </select>
        </label>
    }
}

#[component]
fn StoryCard(result: StoryResult) -> impl IntoView {
    let acts = result.story_structure.as_ref().map(|s| {
        s.acts()
            .into_iter()
            .map(|(act, summary)| {
                let summary = summary.to_string();
                view! {
                    <div class="bg-gray-700 rounded-lg p-3">
                        <p class="text-xs uppercase text-gray-400">{act}</p>
                        <p class="text-sm">{summary}</p>
                    </div>
                }
            })
            .collect_view()
    });

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-2xl font-semibold">{result.title.clone()}</h2>
                <span class="text-sm text-gray-400">
                    {format!("{} words · {}", result.word_count, result.genre_detected)}
                </span>
            </div>
            {(!result.summary.is_empty()).then(|| view! {
                <p class="text-gray-300 italic">{result.summary.clone()}</p>
            })}
            <article class="whitespace-pre-wrap font-serif leading-relaxed">{result.completed_story.clone()}</article>
            {acts.map(|acts| view! { <div class="grid md:grid-cols-4 gap-3">{acts}</div> })}
            {(!result.characters.is_empty()).then(|| view! {
                <p class="text-sm text-gray-400">{format!("Characters: {}", result.characters.join(", "))}</p>
            })}
        </section>
    }
}
