//! Credits Page
//!
//! Balance, the three credit packs and the per-operation price list.

use leptos::*;
use std::collections::BTreeMap;

use narrativeiq::controllers::credits::{purchase_notice, BUY_FAILED};
use narrativeiq::controllers::{CreditsController, Operation, CREDIT_PACKS};
use narrativeiq::models::PricingFeature;

use super::credits_label;
use crate::state::{use_report, Controller, GlobalState};

#[component]
pub fn Credits() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let report = use_report();
    let credits = Controller::new(CreditsController::new(state.session.clone()));
    let pricing = create_rw_signal(BTreeMap::<String, PricingFeature>::new());

    credits.spawn(move |c| async move {
        match c.pricing().await {
            Ok(table) => pricing.set(table),
            Err(e) => web_sys::console::warn_1(&format!("Pricing unavailable: {}", e).into()),
        }
    });

    let buy = {
        let state = state.clone();
        move |index: usize| {
            let state = state.clone();
            let report = report.clone();
            credits.spawn(move |c| async move {
                match c.buy(index).await {
                    Ok(res) => state.show_success(&purchase_notice(&CREDIT_PACKS[index], &res)),
                    Err(e) => report(Some(BUY_FAILED), &e),
                }
                state.sync();
            });
        }
    };

    let balance = {
        let state = state.clone();
        move || state.credits()
    };

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Credits"</h1>
                <p class="text-gray-400 mt-1">
                    {let balance = balance.clone(); move || format!("You have {} credits", balance())}
                </p>
            </div>

            <Show when={let balance = balance.clone(); move || balance() == 0}>
                <div class="bg-red-900/40 border border-red-700 rounded-xl p-4">
                    "You're out of credits! Pick a pack below to keep writing."
                </div>
            </Show>

            <section class="grid md:grid-cols-3 gap-6">
                {CREDIT_PACKS
                    .into_iter()
                    .enumerate()
                    .map(|(index, pack)| {
                        let buy = buy.clone();
                        let ring = if pack.highlight { "ring-2 ring-primary-500" } else { "" };
                        let buying = move || credits.read(|c| c.buying() == Some(index));
                        view! {
                            <div class=format!("bg-gray-800 rounded-xl p-6 flex flex-col {}", ring)>
                                <h2 class="text-xl font-semibold">{pack.label}</h2>
                                <p class="text-4xl font-bold my-2">{pack.amount}</p>
                                <p class="text-sm text-gray-400 flex-1">{pack.description}</p>
                                <button
                                    on:click=move |_| buy(index)
                                    disabled=move || credits.busy()
                                    class="mt-4 w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600 rounded-lg py-2 font-medium"
                                >
                                    {move || if buying() { "Adding...".to_string() } else { pack.price.to_string() }}
                                </button>
                            </div>
                        }
                    })
                    .collect_view()}
            </section>

            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">"Pricing"</h2>
                <table class="w-full text-sm">
                    <tbody>
                        {move || {
                            pricing_rows(pricing.get())
                                .into_iter()
                                .map(|(label, cost)| view! {
                                    <tr class="border-b border-gray-700 last:border-0">
                                        <td class="py-2">{label}</td>
                                        <td class="py-2 text-right">{credits_label(cost)}</td>
                                    </tr>
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>
            </section>
        </div>
    }
}

/// Backend price list as `(label, cost)` rows; the built-in costs when the
/// backend table is unavailable
fn pricing_rows(table: BTreeMap<String, PricingFeature>) -> Vec<(String, u32)> {
    if table.is_empty() {
        return Operation::ALL
            .iter()
            .map(|op| (op.label().to_string(), op.cost()))
            .collect();
    }
    table
        .into_iter()
        .map(|(key, f)| (if f.label.is_empty() { key } else { f.label }, f.cost))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_rows_fallback() {
        let rows = pricing_rows(BTreeMap::new());
        assert_eq!(rows.len(), Operation::ALL.len());
        assert!(rows.iter().all(|(_, cost)| *cost >= 1));
    }

    #[test]
    fn test_pricing_rows_prefer_labels() {
        let mut table = BTreeMap::new();
        table.insert(
            "deep_scan".to_string(),
            PricingFeature { cost: 2, label: "Deep Scan".to_string() },
        );
        table.insert(
            "persona_enhance".to_string(),
            PricingFeature { cost: 1, label: String::new() },
        );

        assert_eq!(
            pricing_rows(table),
            vec![("Deep Scan".to_string(), 2), ("persona_enhance".to_string(), 1)]
        );
    }
}
