use dioxus::prelude::*;
use dioxus_router::Link;

use assess_core::model::ResultId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::charts::LineChart;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{BreakdownRowVm, ResultVm, format_datetime, markdown_to_html};

pub(crate) const HISTORY_WINDOW: u32 = 50;

#[derive(Clone, Debug, PartialEq)]
struct ResultData {
    heading: String,
    completed_at_str: String,
    vm: ResultVm,
}

#[component]
pub fn ResultView(result_id: i64) -> Element {
    let ctx = use_context::<AppContext>();
    let results = ctx.results();
    let activities = ctx.activities();

    let resource = use_resource(move || {
        let results = results.clone();
        let activities = activities.clone();
        async move {
            let stored = results.get_result(ResultId::new(result_id)).await?;
            let history = activities
                .list_recent(HISTORY_WINDOW)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(ResultData {
                heading: format!(
                    "{} · {} · {}",
                    stored.config.kind.label(),
                    stored.config.language,
                    stored.config.difficulty.label()
                ),
                completed_at_str: format_datetime(stored.completed_at),
                vm: ResultVm::new(&stored.result, &history),
            })
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Result" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    p { class: "result-heading", "{data.heading}" }
                    p { class: "result-date", "Completed {data.completed_at_str}" }
                    ResultPanel { vm: data.vm }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "inline-error", "{err.message()}" }
                    if err.is_retryable() {
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let mut resource = resource;
                                resource.restart();
                            },
                            "Retry"
                        }
                    }
                    Link { to: Route::History {}, "Back to history" }
                },
            }
        }
    }
}

/// Score, feedback, per-question breakdown and trend for one evaluation.
#[component]
pub fn ResultPanel(vm: ResultVm) -> Element {
    let feedback_html = markdown_to_html(&vm.feedback);

    rsx! {
        section { class: "result",
            p { class: "score", "{vm.score_label}" }
            p { class: "score-detail", "{vm.correct_label}" }
            div { class: "feedback", dangerous_inner_html: "{feedback_html}" }
            h3 { "Breakdown" }
            for row in vm.rows {
                BreakdownRow { row }
            }
            LineChart { title: "Score trend", layout: vm.trend }
        }
    }
}

#[component]
fn BreakdownRow(row: BreakdownRowVm) -> Element {
    let class = if row.is_correct {
        "breakdown-row breakdown-row--correct"
    } else {
        "breakdown-row breakdown-row--incorrect"
    };
    let explanation_html = markdown_to_html(&row.explanation);

    rsx! {
        article { class: "{class}",
            header {
                span { class: "breakdown-number", "Q{row.number}. " }
                span { class: "breakdown-question", "{row.question}" }
                span { class: "breakdown-verdict", " {row.verdict}" }
            }
            p { "Your answer: {row.user_answer}" }
            if let Some(correct) = row.correct_answer {
                p { "Correct answer: {correct}" }
            }
            div { class: "breakdown-explanation", dangerous_inner_html: "{explanation_html}" }
            if let Some(solution) = row.model_solution {
                details {
                    summary { "Model solution" }
                    pre { code { "{solution}" } }
                }
            }
            if !row.rubric.is_empty() {
                table { class: "rubric",
                    tbody {
                        for criterion in row.rubric {
                            tr {
                                td { "{criterion.label}" }
                                td { "{criterion.score_label}" }
                            }
                        }
                    }
                }
            }
            if let Some(total) = row.rubric_total {
                p { class: "rubric-total", "Rubric total: {total}" }
            }
        }
    }
}
