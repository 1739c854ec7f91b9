//! Analysis result panel

use leptos::*;

use narrativeiq::views::analysis::{format_score, AnalysisView, ScoreTone, Severity};

#[component]
pub fn AnalysisPanel(analysis: AnalysisView) -> impl IntoView {
    let badges = analysis
        .scores()
        .into_iter()
        .map(|(label, score)| {
            let class = format!("text-2xl font-bold {}", ScoreTone::of(score).css_class());
            view! {
                <div class="text-center">
                    <div class=class>{format_score(score)}</div>
                    {label.map(|l| view! { <div class="text-xs text-gray-400">{l}</div> })}
                </div>
            }
        })
        .collect_view();

    let body = match &analysis {
        AnalysisView::Consistency(c) => {
            let issues = c.issues.clone();
            view! {
                <p class="text-gray-300 mb-4">{c.summary.clone()}</p>
                <ul class="space-y-3">
                    {issues.into_iter().map(|issue| {
                        let tone = Severity::parse(&issue.severity).css_class();
                        let dot = format!("w-2 h-2 mt-2 rounded-full {}", tone);
                        view! {
                            <li class="flex items-start space-x-3">
                                <span class=dot />
                                <div>
                                    <p class="font-medium capitalize">{issue.kind}</p>
                                    <p class="text-sm text-gray-300">{issue.description}</p>
                                    {(!issue.excerpt.is_empty()).then(|| view! {
                                        <blockquote class="text-xs text-gray-400 italic mt-1">
                                            {format!("\u{201c}{}\u{201d}", issue.excerpt)}
                                        </blockquote>
                                    })}
                                </div>
                            </li>
                        }
                    }).collect_view()}
                </ul>
            }
            .into_view()
        }
        AnalysisView::Structure(s) => {
            let strengths = s.strengths.clone();
            let suggestions = s.suggestions.clone();
            view! {
                <p class="text-gray-300 mb-4">{s.overall_feedback.clone()}</p>
                {(!strengths.is_empty()).then(|| view! {
                    <h4 class="font-semibold mb-2">"Strengths"</h4>
                    <ul class="list-disc list-inside text-sm text-gray-300 mb-4">
                        {strengths.into_iter().map(|st| view! { <li>{st}</li> }).collect_view()}
                    </ul>
                })}
                {(!suggestions.is_empty()).then(|| view! {
                    <h4 class="font-semibold mb-2">"Suggestions"</h4>
                    <ul class="space-y-3">
                        {suggestions.into_iter().map(|sug| {
                            let tone = Severity::parse(&sug.priority).css_class();
                            let dot = format!("w-2 h-2 mt-2 rounded-full {}", tone);
                            view! {
                                <li class="flex items-start space-x-3">
                                    <span class=dot />
                                    <div>
                                        <p class="font-medium">{format!("{}: {}", sug.category, sug.issue)}</p>
                                        <p class="text-sm text-gray-300">{sug.suggestion}</p>
                                    </div>
                                </li>
                            }
                        }).collect_view()}
                    </ul>
                })}
            }
            .into_view()
        }
        AnalysisView::Character(c) => {
            let stages = c.evolution_stages.clone();
            view! {
                {(!c.arc_type.is_empty()).then(|| view! {
                    <span class="inline-block px-2 py-1 mb-3 rounded bg-gray-700 text-xs capitalize">
                        {c.arc_type.clone()}
                    </span>
                })}
                <p class="text-gray-300 mb-4">{c.overall_development.clone()}</p>
                <ol class="space-y-3 border-l border-gray-600 pl-4">
                    {stages.into_iter().map(|stage| view! {
                        <li>
                            <p class="font-medium">{format!("{}. {}", stage.stage, stage.label)}</p>
                            <p class="text-sm text-gray-300">
                                {format!("{} / {}", stage.emotional_state, stage.key_trait)}
                            </p>
                            <p class="text-xs text-gray-400">{stage.trigger}</p>
                        </li>
                    }).collect_view()}
                </ol>
            }
            .into_view()
        }
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <div class="flex items-center justify-between mb-4">
                <h3 class="text-xl font-semibold">{analysis.title()}</h3>
                <div class="flex space-x-4">{badges}</div>
            </div>
            {body}
        </section>
    }
}
