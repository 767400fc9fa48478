use dioxus::prelude::*;

use assess_core::model::ProgressInsights;

use crate::context::AppContext;
use crate::views::charts::{BarChart, LineChart, PieChart};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::AnalyticsVm;

const ANALYTICS_WINDOW: u32 = 100;

#[component]
pub fn AnalyticsView() -> Element {
    let ctx = use_context::<AppContext>();
    let activities = ctx.activities();

    let resource = use_resource(move || {
        let activities = activities.clone();
        async move {
            let records = activities
                .list_recent(ANALYTICS_WINDOW)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(AnalyticsVm::new(&records))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Analytics" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(vm) => rsx! {
                    p { class: "analytics-summary", "Sessions: {vm.total_sessions}" }
                    if let Some(average) = vm.average_label.clone() {
                        p { class: "analytics-summary", "Average score: {average}" }
                    }
                    PieChart { title: "Sessions by language", layout: vm.languages }
                    BarChart { title: "Average score by language", layout: vm.language_scores }
                    LineChart { title: "Score trend", layout: vm.trend }
                    InsightsPanel {}
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

/// AI progress insights. Failures stay inline with a retry; the charts above remain usable.
#[component]
fn InsightsPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let activities = ctx.activities();
    let insights = ctx.insights();

    let resource = use_resource(move || {
        let activities = activities.clone();
        let insights = insights.clone();
        async move {
            let profile = activities
                .profile(None)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(insights.generate(&profile).await?)
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        section { class: "insights",
            h3 { "Insights" }
            match state {
                ViewState::Idle => rsx! {},
                ViewState::Loading => rsx! {
                    p { "Generating insights..." }
                },
                ViewState::Ready(report) => rsx! {
                    InsightsReport { report }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "inline-error", role: "alert", "{err.message()}" }
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
                },
            }
        }
    }
}

#[component]
fn InsightsReport(report: ProgressInsights) -> Element {
    rsx! {
        p { class: "insights-summary", "{report.progress_summary}" }
        if !report.language_analysis.is_empty() {
            p { "{report.language_analysis}" }
        }
        if !report.inactivity_analysis.is_empty() {
            p { "{report.inactivity_analysis}" }
        }
        if !report.next_steps.is_empty() {
            h4 { "Next steps" }
            ul {
                for step in report.next_steps {
                    li { "{step}" }
                }
            }
        }
    }
}
