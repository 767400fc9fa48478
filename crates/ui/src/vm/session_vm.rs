use assess_core::model::{Answer, Question};
use services::sessions::{FailureStage, TrialRun};
use services::{
    ExplanationKind, SessionError, SessionEvent, SessionMachine, SessionPhase, Transition,
};

use super::markdown_vm::markdown_to_html;
use super::time_fmt::format_countdown;

/// Display model of a single option in a multiple-choice question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleCaseVm {
    pub input: String,
    pub expected_output: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialVm {
    pub running: bool,
    /// "2 / 3 tests passed", or the runner's error.
    pub summary: Option<String>,
    pub failed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionBodyVm {
    Choice(Vec<OptionVm>),
    Code {
        buffer: String,
        constraints: Vec<String>,
        samples: Vec<SampleCaseVm>,
        trial: TrialVm,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplanationVm {
    pub kind: ExplanationKind,
    pub html: String,
}

/// Everything the session page shows for the active question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub index: usize,
    pub position_label: String,
    pub prompt: String,
    pub countdown_label: String,
    pub is_last: bool,
    pub body: QuestionBodyVm,
    pub explanations: Vec<ExplanationVm>,
    pub explanation_pending: Option<ExplanationKind>,
    pub explanation_error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureVm {
    pub message: String,
    pub retry_label: &'static str,
}

/// Wraps a `SessionMachine` with the projections the session page needs.
#[derive(Clone, Debug)]
pub struct SessionVm {
    machine: SessionMachine,
    notice: Option<String>,
}

impl SessionVm {
    #[must_use]
    pub fn new(machine: SessionMachine) -> Self {
        Self {
            machine,
            notice: None,
        }
    }

    #[must_use]
    pub fn machine(&self) -> &SessionMachine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut SessionMachine {
        &mut self.machine
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.machine.phase()
    }

    /// Inline message for the last rejected user action.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Apply an event; a rejected user action becomes the inline notice.
    ///
    /// The notice stays up until the user acts again or the active question
    /// changes; ticks and service responses leave it alone.
    pub fn apply(&mut self, event: SessionEvent) -> Transition {
        let user_action = is_user_action(&event);
        let before = (self.machine.phase(), self.machine.active_index());
        match self.machine.apply(event) {
            Ok(transition) => {
                let after = (self.machine.phase(), self.machine.active_index());
                if user_action || before != after {
                    self.notice = None;
                }
                transition
            }
            Err(err) => {
                tracing::debug!(error = %err, "session event rejected");
                self.notice = user_message(&err).map(str::to_string);
                Transition::none()
            }
        }
    }

    #[must_use]
    pub fn question(&self) -> Option<QuestionVm> {
        let active = self.machine.in_progress()?;
        let progress = self.machine.progress()?;
        let question = self.machine.active_question()?;
        let index = progress.index;

        let body = match question {
            Question::MultipleChoice(choice) => {
                let selected = active
                    .ledger()
                    .get(index)
                    .and_then(Answer::selected_option);
                QuestionBodyVm::Choice(
                    choice
                        .options
                        .iter()
                        .enumerate()
                        .map(|(i, label)| OptionVm {
                            index: i,
                            label: label.clone(),
                            selected: selected == Some(i),
                        })
                        .collect(),
                )
            }
            Question::Programming(programming) => QuestionBodyVm::Code {
                buffer: active.code_buffer().to_string(),
                constraints: programming.constraints.clone(),
                samples: programming
                    .sample_cases()
                    .map(|case| SampleCaseVm {
                        input: case.input.clone(),
                        expected_output: case.expected_output.clone(),
                    })
                    .collect(),
                trial: trial_vm(active.trial()),
            },
        };

        let explanations = ExplanationKind::ALL
            .into_iter()
            .filter_map(|kind| {
                self.machine
                    .displayed_explanation(kind)
                    .map(|text| ExplanationVm {
                        kind,
                        html: markdown_to_html(text),
                    })
            })
            .collect();
        let cache = self.machine.explanations();

        Some(QuestionVm {
            index,
            position_label: format!("Question {} of {}", progress.position(), progress.total),
            prompt: question.prompt().to_string(),
            countdown_label: format_countdown(active.countdown().remaining()),
            is_last: progress.is_last,
            body,
            explanations,
            explanation_pending: cache
                .pending()
                .filter(|(pending_index, _)| *pending_index == index)
                .map(|(_, kind)| kind),
            explanation_error: cache.error_for(index).map(str::to_string),
        })
    }

    #[must_use]
    pub fn failure(&self) -> Option<FailureVm> {
        let failure = self.machine.failure()?;
        let retry_label = match failure.stage {
            FailureStage::Loading => "Reload questions",
            FailureStage::Evaluating(_) => "Resubmit",
        };
        Some(FailureVm {
            message: failure.message.clone(),
            retry_label,
        })
    }
}

fn trial_vm(trial: &TrialRun) -> TrialVm {
    let report = trial.report();
    let summary = report.map(|report| match &report.error {
        Some(error) => error.clone(),
        None => format!(
            "{} / {} tests passed",
            report.passed_count(),
            report.total_count()
        ),
    });
    TrialVm {
        running: trial.is_running(),
        summary,
        failed: report.is_some_and(|r| r.error.is_some() || !r.success),
    }
}

/// User-facing text for errors caused by the user's own action.
///
/// Ordering problems (late or duplicate responses) are not shown.
#[must_use]
pub fn user_message(err: &SessionError) -> Option<&'static str> {
    match err {
        SessionError::SelectionRequired => Some("Select an answer to continue."),
        SessionError::LastQuestion => Some("This is the last question. Submit when ready."),
        SessionError::NotLastQuestion => Some("Answer the remaining questions before submitting."),
        SessionError::SubmissionInFlight => Some("Your answers are already being evaluated."),
        SessionError::TrialRunBusy => Some("Your code is already running."),
        SessionError::ExplanationBusy => Some("Please wait for the current explanation."),
        _ => None,
    }
}

fn is_user_action(event: &SessionEvent) -> bool {
    matches!(
        event,
        SessionEvent::SelectOption(_)
            | SessionEvent::EditCode(_)
            | SessionEvent::TrialRunStarted
            | SessionEvent::Next
            | SessionEvent::Submit
            | SessionEvent::ExplanationRequested { .. }
            | SessionEvent::Retry
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::{Difficulty, SessionConfig, SessionKind, TestCase};

    fn vm_with(questions: Vec<Question>) -> SessionVm {
        let total = u32::try_from(questions.len()).unwrap();
        let config = SessionConfig::new(SessionKind::Assessment, "Rust", Difficulty::Beginner)
            .with_counts(total, 0);
        let (machine, _) = SessionMachine::start(config).unwrap();
        let mut vm = SessionVm::new(machine);
        let _ = vm.apply(SessionEvent::QuestionsLoaded(questions));
        vm
    }

    #[test]
    fn choice_question_marks_selection() {
        let mut vm = vm_with(vec![
            Question::multiple_choice("Borrowing?", ["&T", "T"]),
            Question::multiple_choice("Moving?", ["yes", "no"]),
        ]);
        let _ = vm.apply(SessionEvent::SelectOption(1));

        let question = vm.question().unwrap();
        assert_eq!(question.position_label, "Question 1 of 2");
        assert_eq!(question.countdown_label, "01:00");
        assert!(!question.is_last);
        let QuestionBodyVm::Choice(options) = question.body else {
            panic!("expected choice body");
        };
        assert!(!options[0].selected);
        assert!(options[1].selected);
    }

    #[test]
    fn rejected_action_sets_notice_until_next_success() {
        let mut vm = vm_with(vec![
            Question::multiple_choice("a", ["1", "2"]),
            Question::multiple_choice("b", ["1", "2"]),
        ]);
        assert!(vm.apply(SessionEvent::Next).is_empty());
        assert_eq!(vm.notice(), Some("Select an answer to continue."));

        let _ = vm.apply(SessionEvent::SelectOption(0));
        assert!(vm.notice().is_none());
    }

    #[test]
    fn notice_survives_ticks_until_the_user_acts() {
        let mut vm = vm_with(vec![
            Question::multiple_choice("a", ["1", "2"]),
            Question::multiple_choice("b", ["1", "2"]),
        ]);
        let token = vm
            .machine()
            .in_progress()
            .and_then(|progress| progress.countdown().token())
            .unwrap();
        assert!(vm.apply(SessionEvent::Next).is_empty());

        for _ in 0..5 {
            let _ = vm.apply(SessionEvent::Tick(token));
        }
        assert_eq!(vm.notice(), Some("Select an answer to continue."));
        assert_eq!(vm.question().unwrap().countdown_label, "00:55");
    }

    #[test]
    fn notice_clears_when_timeout_moves_to_the_next_question() {
        let mut vm = vm_with(vec![
            Question::multiple_choice("a", ["1", "2"]),
            Question::multiple_choice("b", ["1", "2"]),
        ]);
        let token = vm
            .machine()
            .in_progress()
            .and_then(|progress| progress.countdown().token())
            .unwrap();
        let _ = vm.apply(SessionEvent::Next);

        for _ in 0..60 {
            let _ = vm.apply(SessionEvent::Tick(token));
        }
        assert_eq!(vm.question().unwrap().position_label, "Question 2 of 2");
        assert!(vm.notice().is_none());
    }

    #[test]
    fn explanation_error_stays_with_its_question() {
        let mut vm = vm_with(vec![
            Question::multiple_choice("a", ["1", "2"]),
            Question::multiple_choice("b", ["1", "2"]),
        ]);
        let _ = vm.apply(SessionEvent::ExplanationRequested {
            index: 0,
            kind: ExplanationKind::Hint,
        });
        let _ = vm.apply(SessionEvent::ExplanationFailed {
            index: 0,
            kind: ExplanationKind::Hint,
            message: "Could not load the hint.".into(),
        });
        assert_eq!(
            vm.question().unwrap().explanation_error.as_deref(),
            Some("Could not load the hint.")
        );

        let _ = vm.apply(SessionEvent::SelectOption(0));
        let _ = vm.apply(SessionEvent::Next);
        assert!(vm.question().unwrap().explanation_error.is_none());
    }

    #[test]
    fn code_question_hides_hidden_cases() {
        let vm = vm_with(vec![Question::programming(
            "Add",
            "fn add() {}",
            vec![TestCase::sample("1 2", "3"), TestCase::hidden("5 5", "10")],
        )]);
        let question = vm.question().unwrap();
        assert_eq!(question.countdown_label, "30:00");
        let QuestionBodyVm::Code {
            buffer,
            samples,
            trial,
            ..
        } = question.body
        else {
            panic!("expected code body");
        };
        assert_eq!(buffer, "fn add() {}");
        assert_eq!(samples.len(), 1);
        assert!(trial.summary.is_none());
    }

    #[test]
    fn empty_generation_shows_reload() {
        let vm = vm_with(Vec::new());
        let failure = vm.failure().unwrap();
        assert_eq!(failure.retry_label, "Reload questions");
        assert!(vm.question().is_none());
    }
}
