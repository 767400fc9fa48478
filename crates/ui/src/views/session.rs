use std::sync::Arc;

use dioxus::prelude::*;
use dioxus_router::Link;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use assess_core::model::{ActivityRecord, ResultId, SessionConfig};
use services::{
    ActivityService, AssessmentService, ExplanationKind, SessionEvent, SessionMachine, SessionPhase, Ticker,
    Transition,
};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::result::{HISTORY_WINDOW, ResultPanel};
use crate::vm::{FailureVm, QuestionBodyVm, QuestionVm, ResultVm, SessionVm};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Owns the ticker and applies every event to the session in arrival order.
///
/// Service calls run as separate tasks and report back through `events`, so
/// user input and ticks keep flowing while a request is outstanding.
struct SessionDriver {
    service: Arc<AssessmentService>,
    activities: Arc<ActivityService>,
    vm: Signal<Option<SessionVm>>,
    save_error: Signal<Option<String>>,
    history: Signal<Vec<ActivityRecord>>,
    events: UnboundedSender<SessionEvent>,
    persist_attempted: bool,
}

impl SessionDriver {
    async fn run(
        mut self,
        config: SessionConfig,
        mut inbox: UnboundedReceiver<SessionEvent>,
    ) {
        let (mut ticker, mut ticks) = Ticker::new();
        let transition = match SessionMachine::start(config) {
            Ok((machine, transition)) => {
                self.vm.set(Some(SessionVm::new(machine)));
                transition
            }
            Err(err) => {
                tracing::warn!(error = %err, "session could not start");
                return;
            }
        };
        self.follow(transition, &mut ticker).await;

        loop {
            let event = tokio::select! {
                Some(event) = inbox.recv() => event,
                Some(token) = ticks.recv() => SessionEvent::Tick(token),
                else => break,
            };
            let transition = match self.vm.write().as_mut() {
                Some(vm) => vm.apply(event),
                None => break,
            };
            self.follow(transition, &mut ticker).await;
        }
    }

    async fn follow(&mut self, transition: Transition, ticker: &mut Ticker) {
        ticker.follow(&transition);
        for command in transition.into_commands() {
            if command.is_timer() {
                continue;
            }
            let service = Arc::clone(&self.service);
            let events = self.events.clone();
            spawn(async move {
                if let Some(event) = service.perform(&command).await {
                    let _ = events.send(event);
                }
            });
        }
        self.persist_if_completed().await;
    }

    async fn persist_if_completed(&mut self) {
        if self.persist_attempted {
            return;
        }
        let completed = self.vm.read().as_ref().and_then(|vm| {
            let machine = vm.machine();
            match (machine.result(), machine.result_id()) {
                (Some(result), None) => Some((machine.config().clone(), result.clone())),
                _ => None,
            }
        });
        let Some((config, result)) = completed else {
            return;
        };
        self.persist_attempted = true;

        match self.service.persist_result(&config, &result).await {
            Ok(id) => {
                if let Some(vm) = self.vm.write().as_mut() {
                    vm.machine_mut().set_result_id(id);
                }
                match self.activities.list_recent(HISTORY_WINDOW).await {
                    Ok(records) => self.history.set(records),
                    Err(err) => tracing::warn!(error = %err, "score history not loaded"),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "session result not saved");
                self.save_error
                    .set(Some("Your result could not be saved.".to_string()));
            }
        }
    }
}

#[derive(Clone)]
struct SessionChannel {
    events: UnboundedSender<SessionEvent>,
    started: bool,
}

#[component]
pub fn SessionView() -> Element {
    let ctx = use_context::<AppContext>();
    let vm = use_signal(|| None::<SessionVm>);
    let save_error = use_signal(|| None::<String>);
    let history = use_signal(Vec::<ActivityRecord>::new);

    let channel = use_hook(|| {
        let (events, inbox) = mpsc::unbounded_channel();
        let started = match ctx.take_pending_config() {
            Some(config) => {
                let driver = SessionDriver {
                    service: ctx.assessments(),
                    activities: ctx.activities(),
                    vm,
                    save_error,
                    history,
                    events: events.clone(),
                    persist_attempted: false,
                };
                spawn(driver.run(config, inbox));
                true
            }
            None => false,
        };
        SessionChannel { events, started }
    });

    let send = {
        let events = channel.events.clone();
        use_callback(move |event: SessionEvent| {
            if events.send(event).is_err() {
                tracing::debug!("session driver stopped; event dropped");
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<SessionTestHandles>() {
                handles.register(channel.events.clone(), vm);
            }
        }
    }

    if !channel.started {
        return rsx! {
            div { class: "page",
                h2 { "Session" }
                p { "No session is configured." }
                Link { to: Route::Home {}, "Set one up" }
            }
        };
    }

    let history_guard = history.read();
    let vm_guard = vm.read();
    let phase = vm_guard.as_ref().map(SessionVm::phase);
    let question = vm_guard.as_ref().and_then(SessionVm::question);
    let failure = vm_guard.as_ref().and_then(SessionVm::failure);
    let notice = vm_guard
        .as_ref()
        .and_then(SessionVm::notice)
        .map(str::to_string);
    let completed = vm_guard.as_ref().and_then(|vm| {
        let machine = vm.machine();
        machine
            .result()
            .map(|result| (ResultVm::new(result, &history_guard), machine.result_id()))
    });
    let title = vm_guard.as_ref().map_or_else(String::new, |vm| {
        let config = vm.machine().config();
        format!("{} · {}", config.kind.label(), config.language)
    });
    drop(vm_guard);
    drop(history_guard);

    rsx! {
        div { class: "page session-page",
            h2 { "{title}" }
            match phase {
                None | Some(SessionPhase::Loading) => rsx! {
                    p { "Generating questions..." }
                },
                Some(SessionPhase::InProgress) => rsx! {
                    if let Some(question) = question {
                        QuestionPanel { question, notice, send }
                    }
                },
                Some(SessionPhase::Submitting) => rsx! {
                    p { "Evaluating your answers..." }
                },
                Some(SessionPhase::Completed) => rsx! {
                    if let Some((result, result_id)) = completed {
                        CompletionPanel { result, result_id, save_error: save_error() }
                    }
                },
                Some(SessionPhase::Failed) => rsx! {
                    if let Some(failure) = failure {
                        FailurePanel { failure, send }
                    }
                },
            }
        }
    }
}

#[component]
fn QuestionPanel(
    question: QuestionVm,
    notice: Option<String>,
    send: Callback<SessionEvent>,
) -> Element {
    let index = question.index;

    rsx! {
        header { class: "session-header",
            span { class: "session-position", "{question.position_label}" }
            span { class: "countdown", "{question.countdown_label}" }
        }
        p { class: "session-prompt", "{question.prompt}" }
        match question.body {
            QuestionBodyVm::Choice(options) => rsx! {
                ul { class: "options",
                    for option in options {
                        li {
                            button {
                                class: option_class(option.selected),
                                r#type: "button",
                                onclick: move |_| send.call(SessionEvent::SelectOption(option.index)),
                                "{option.label}"
                            }
                        }
                    }
                }
            },
            QuestionBodyVm::Code { buffer, constraints, samples, trial } => rsx! {
                if !constraints.is_empty() {
                    ul { class: "constraints",
                        for constraint in constraints {
                            li { "{constraint}" }
                        }
                    }
                }
                for sample in samples {
                    div { class: "sample-case",
                        pre { "Input: {sample.input}" }
                        pre { "Expected: {sample.expected_output}" }
                    }
                }
                textarea {
                    class: "code-editor",
                    spellcheck: "false",
                    value: "{buffer}",
                    oninput: move |evt| send.call(SessionEvent::EditCode(evt.value())),
                }
                button {
                    class: "btn",
                    r#type: "button",
                    disabled: trial.running,
                    onclick: move |_| send.call(SessionEvent::TrialRunStarted),
                    if trial.running { "Running..." } else { "Run Code" }
                }
                if let Some(summary) = trial.summary {
                    p { class: trial_class(trial.failed), "{summary}" }
                }
            },
        }
        div { class: "explanation-actions",
            for kind in ExplanationKind::ALL {
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: question.explanation_pending.is_some(),
                    onclick: move |_| send.call(SessionEvent::ExplanationRequested { index, kind }),
                    if question.explanation_pending == Some(kind) {
                        "Loading..."
                    } else {
                        "{kind.label()}"
                    }
                }
            }
        }
        for explanation in question.explanations {
            div { class: "explanation",
                h4 { "{explanation.kind.label()}" }
                div { dangerous_inner_html: "{explanation.html}" }
            }
        }
        if let Some(message) = question.explanation_error {
            p { class: "inline-error", "{message}" }
        }
        if let Some(message) = notice {
            p { class: "notice", role: "status", "{message}" }
        }
        footer { class: "session-footer",
            if question.is_last {
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| send.call(SessionEvent::Submit),
                    "Submit"
                }
            } else {
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| send.call(SessionEvent::Next),
                    "Next"
                }
            }
        }
    }
}

fn option_class(selected: bool) -> &'static str {
    if selected {
        "btn option option--selected"
    } else {
        "btn option"
    }
}

fn trial_class(failed: bool) -> &'static str {
    if failed { "trial trial--failed" } else { "trial" }
}

#[component]
fn CompletionPanel(
    result: ResultVm,
    result_id: Option<ResultId>,
    save_error: Option<String>,
) -> Element {
    rsx! {
        ResultPanel { vm: result }
        if let Some(id) = result_id {
            Link { to: Route::ResultDetail { result_id: id.value() }, "View saved result" }
        }
        if let Some(message) = save_error {
            p { class: "inline-error", "{message}" }
        }
        Link { to: Route::Home {}, "Start another session" }
    }
}

#[component]
fn FailurePanel(failure: FailureVm, send: Callback<SessionEvent>) -> Element {
    rsx! {
        p { class: "inline-error", role: "alert", "{failure.message}" }
        button {
            class: "btn btn-primary",
            r#type: "button",
            onclick: move |_| send.call(SessionEvent::Retry),
            "{failure.retry_label}"
        }
        Link { to: Route::Home {}, "Back to setup" }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SessionTestHandles {
    events: Rc<RefCell<Option<UnboundedSender<SessionEvent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<SessionVm>>>>>,
}

#[cfg(test)]
impl SessionTestHandles {
    pub(crate) fn register(
        &self,
        events: UnboundedSender<SessionEvent>,
        vm: Signal<Option<SessionVm>>,
    ) {
        *self.events.borrow_mut() = Some(events);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn send(&self, event: SessionEvent) {
        self.events
            .borrow()
            .as_ref()
            .expect("session sender registered")
            .send(event)
            .expect("session driver running");
    }

    pub(crate) fn vm(&self) -> Signal<Option<SessionVm>> {
        (*self.vm.borrow()).expect("session vm registered")
    }
}
