use dioxus::prelude::*;
use dioxus_router::use_navigator;

use assess_core::model::{Difficulty, SessionKind};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{CUSTOM_LANGUAGE, ConfigFormVm, LANGUAGE_PRESETS};

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut form = use_signal(ConfigFormVm::default);
    let mut error = use_signal(|| None::<String>);

    let on_start = move |evt: FormEvent| {
        evt.prevent_default();
        match form.read().build() {
            Ok(config) => {
                tracing::debug!(language = %config.language, "session configured");
                ctx.set_pending_config(config);
                error.set(None);
                navigator.push(Route::Session {});
            }
            Err(message) => error.set(Some(message)),
        }
    };

    let current = form.read().clone();
    let is_assessment = current.kind == SessionKind::Assessment;
    let kind_value = if is_assessment { "assessment" } else { "quiz" };

    rsx! {
        div { class: "page",
            h2 { "Start a session" }
            form { class: "config-form", onsubmit: on_start,
                div { class: "form-row",
                    label { r#for: "config-kind", "Session type" }
                    select {
                        id: "config-kind",
                        value: kind_value,
                        onchange: move |evt| {
                            form.write().kind = if evt.value() == "quiz" {
                                SessionKind::Quiz
                            } else {
                                SessionKind::Assessment
                            };
                        },
                        option { value: "assessment", "Assessment" }
                        option { value: "quiz", "Quiz" }
                    }
                }
                div { class: "form-row",
                    label { r#for: "config-language", "Language or skill" }
                    select {
                        id: "config-language",
                        value: "{current.language_choice}",
                        onchange: move |evt| form.write().language_choice = evt.value(),
                        for language in LANGUAGE_PRESETS {
                            option { value: "{language}", "{language}" }
                        }
                        option { value: CUSTOM_LANGUAGE, "Other..." }
                    }
                    if current.uses_custom_language() {
                        input {
                            id: "config-custom-language",
                            placeholder: "Skill name",
                            value: "{current.custom_language}",
                            oninput: move |evt| form.write().custom_language = evt.value(),
                        }
                    }
                }
                div { class: "form-row",
                    label { r#for: "config-difficulty", "Difficulty" }
                    select {
                        id: "config-difficulty",
                        value: "{current.difficulty.label()}",
                        onchange: move |evt| {
                            if let Some(level) = Difficulty::from_label(&evt.value()) {
                                form.write().difficulty = level;
                            }
                        },
                        for level in Difficulty::ALL {
                            option { value: "{level.label()}", "{level.label()}" }
                        }
                    }
                }
                if is_assessment {
                    div { class: "form-row",
                        label { r#for: "config-topic", "Topic (optional)" }
                        input {
                            id: "config-topic",
                            value: "{current.topic}",
                            oninput: move |evt| form.write().topic = evt.value(),
                        }
                    }
                }
                div { class: "form-row",
                    label { r#for: "config-total", "Number of questions" }
                    input {
                        id: "config-total",
                        r#type: "number",
                        min: "1",
                        value: "{current.total}",
                        oninput: move |evt| form.write().total = evt.value(),
                    }
                }
                div { class: "form-row",
                    label { r#for: "config-programming", "Programming questions" }
                    input {
                        id: "config-programming",
                        r#type: "number",
                        min: "0",
                        value: "{current.programming}",
                        oninput: move |evt| form.write().programming = evt.value(),
                    }
                }
                if let Some(message) = error() {
                    p { class: "form-error", role: "alert", "{message}" }
                }
                button { class: "btn btn-primary", r#type: "submit", "Start" }
            }
        }
    }
}
