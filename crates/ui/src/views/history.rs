use dioxus::prelude::*;

use assess_core::charts::LineLayout;

use crate::context::AppContext;
use crate::views::charts::LineChart;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{HistoryRowVm, map_history_rows, score_trend};

const HISTORY_LIMIT: u32 = 30;

#[derive(Clone, Debug, PartialEq)]
struct HistoryData {
    rows: Vec<HistoryRowVm>,
    trend: LineLayout,
}

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let activities = ctx.activities();

    let resource = use_resource(move || {
        let activities = activities.clone();
        async move {
            let records = activities
                .list_recent(HISTORY_LIMIT)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(HistoryData {
                rows: map_history_rows(&records),
                trend: score_trend(&records),
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "History" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.rows.is_empty() {
                        p { "No sessions yet. Start one from the home page." }
                    } else {
                        LineChart { title: "Recent scores", layout: data.trend }
                        ul { class: "history-list",
                            for row in data.rows {
                                HistoryRow { row }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "inline-error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn HistoryRow(row: HistoryRowVm) -> Element {
    rsx! {
        li { class: "history-row",
            span { class: "history-date", "{row.completed_at_str}" }
            span { class: "history-kind", " {row.kind_label}" }
            span { class: "history-language", " · {row.language}" }
            if let Some(score) = row.score_label {
                span { class: "history-score", " · {score}" }
            }
        }
    }
}
