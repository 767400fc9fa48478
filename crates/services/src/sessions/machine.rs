use serde::Serialize;

use assess_core::model::{
    Answer, EvaluationResult, IndexedAnswer, Question, ResultId, SessionConfig, TestCase,
    TrialRunReport,
};
use assess_core::{AnswerLedger, Countdown, Tick, TimeLimit, TimerToken};

use super::explanations::{ExplanationCache, ExplanationKind};
use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── EVENTS & COMMANDS ─────────────────────────────────────────────────────────
//

/// Everything that can happen to a session, from the user or from a collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    QuestionsLoaded(Vec<Question>),
    LoadFailed(String),
    SelectOption(usize),
    EditCode(String),
    TrialRunStarted,
    TrialRunFinished {
        index: usize,
        report: TrialRunReport,
    },
    Next,
    Tick(TimerToken),
    Submit,
    Evaluated(EvaluationResult),
    EvaluationFailed(String),
    ExplanationRequested {
        index: usize,
        kind: ExplanationKind,
    },
    ExplanationReceived {
        index: usize,
        kind: ExplanationKind,
        text: String,
    },
    ExplanationFailed {
        index: usize,
        kind: ExplanationKind,
        message: String,
    },
    Retry,
}

/// Side effects a transition asks its driver to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    LoadQuestions(SessionConfig),
    /// Replace any running ticker with one bound to this token.
    RestartTimer(TimerToken),
    StopTimer,
    RunTrial(TrialRunRequest),
    Evaluate(Submission),
    Explain(ExplanationRequest),
}

impl SessionCommand {
    #[must_use]
    pub fn is_timer(&self) -> bool {
        matches!(self, Self::RestartTimer(_) | Self::StopTimer)
    }
}

/// Commands produced by one `apply`, in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    commands: Vec<SessionCommand>,
}

impl Transition {
    pub fn none() -> Self {
        Self::default()
    }

    fn with(command: SessionCommand) -> Self {
        Self {
            commands: vec![command],
        }
    }

    pub(crate) fn push(&mut self, command: SessionCommand) {
        self.commands.push(command);
    }

    #[must_use]
    pub fn commands(&self) -> &[SessionCommand] {
        &self.commands
    }

    #[must_use]
    pub fn into_commands(self) -> Vec<SessionCommand> {
        self.commands
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Payload of the final evaluation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub questions: Vec<Question>,
    pub answers: Vec<IndexedAnswer>,
    pub config: SessionConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrialRunRequest {
    pub index: usize,
    pub code: String,
    pub language: String,
    /// Visible and hidden cases alike.
    pub test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationRequest {
    pub index: usize,
    pub kind: ExplanationKind,
    pub query: String,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialRun {
    running: bool,
    report: Option<TrialRunReport>,
}

impl TrialRun {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn report(&self) -> Option<&TrialRunReport> {
        self.report.as_ref()
    }

    fn passed_tests(&self) -> u32 {
        self.report.as_ref().map_or(0, TrialRunReport::passed_count)
    }
}

/// Traversal state while questions are being answered.
#[derive(Debug, Clone)]
pub struct InProgress {
    index: usize,
    ledger: AnswerLedger,
    countdown: Countdown,
    code_buffer: String,
    trial: TrialRun,
    revealed: Vec<ExplanationKind>,
}

impl InProgress {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    #[must_use]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    #[must_use]
    pub fn code_buffer(&self) -> &str {
        &self.code_buffer
    }

    #[must_use]
    pub fn trial(&self) -> &TrialRun {
        &self.trial
    }

    #[must_use]
    pub fn is_revealed(&self, kind: ExplanationKind) -> bool {
        self.revealed.contains(&kind)
    }

    fn reveal(&mut self, kind: ExplanationKind) {
        if !self.revealed.contains(&kind) {
            self.revealed.push(kind);
        }
    }

    fn code_answer(&self) -> Answer {
        Answer::code(self.code_buffer.clone(), self.trial.passed_tests())
    }
}

/// Where a failed session stopped, so `Retry` knows what to re-issue.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureStage {
    Loading,
    Evaluating(Submission),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionFailure {
    pub stage: FailureStage,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum SessionState {
    Loading,
    InProgress(InProgress),
    Submitting(Submission),
    Completed(EvaluationResult),
    Failed(SessionFailure),
}

/// Discriminant of `SessionState`, for callers that only branch on the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    InProgress,
    Submitting,
    Completed,
    Failed,
}

impl SessionState {
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self {
            Self::Loading => SessionPhase::Loading,
            Self::InProgress(_) => SessionPhase::InProgress,
            Self::Submitting(_) => SessionPhase::Submitting,
            Self::Completed(_) => SessionPhase::Completed,
            Self::Failed(_) => SessionPhase::Failed,
        }
    }
}

//
// ─── MACHINE ───────────────────────────────────────────────────────────────────
//

/// One assessment or quiz attempt, from question fetch to result.
///
/// All mutation goes through [`SessionMachine::apply`]. The machine never
/// performs I/O itself; it returns [`SessionCommand`]s for a driver to run and
/// feed back as events.
#[derive(Debug, Clone)]
pub struct SessionMachine {
    config: SessionConfig,
    questions: Vec<Question>,
    state: SessionState,
    explanations: ExplanationCache,
    result_id: Option<ResultId>,
}

impl SessionMachine {
    /// Create a machine in `Loading` and the command that fetches its questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` if the configuration is invalid.
    pub fn start(config: SessionConfig) -> Result<(Self, Transition), SessionError> {
        config.validate()?;
        let transition = Transition::with(SessionCommand::LoadQuestions(config.clone()));
        let machine = Self {
            config,
            questions: Vec::new(),
            state: SessionState::Loading,
            explanations: ExplanationCache::new(),
            result_id: None,
        };
        Ok((machine, transition))
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn in_progress(&self) -> Option<&InProgress> {
        match &self.state {
            SessionState::InProgress(progress) => Some(progress),
            _ => None,
        }
    }

    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.in_progress().map(InProgress::index)
    }

    #[must_use]
    pub fn active_question(&self) -> Option<&Question> {
        self.active_index().and_then(|index| self.questions.get(index))
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.in_progress().map(|p| p.countdown.remaining())
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.in_progress().map(|p| SessionProgress {
            total: self.questions.len(),
            index: p.index,
            answered: p.ledger.len(),
            is_last: p.index + 1 == self.questions.len(),
        })
    }

    #[must_use]
    pub fn result(&self) -> Option<&EvaluationResult> {
        match &self.state {
            SessionState::Completed(result) => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<&SessionFailure> {
        match &self.state {
            SessionState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    #[must_use]
    pub fn explanations(&self) -> &ExplanationCache {
        &self.explanations
    }

    /// Explanation currently shown for the active question, if revealed and fetched.
    #[must_use]
    pub fn displayed_explanation(&self, kind: ExplanationKind) -> Option<&str> {
        let progress = self.in_progress()?;
        if !progress.is_revealed(kind) {
            return None;
        }
        self.explanations.get(progress.index, kind)
    }

    #[must_use]
    pub fn result_id(&self) -> Option<ResultId> {
        self.result_id
    }

    /// Record where the completed result was persisted.
    pub fn set_result_id(&mut self, id: ResultId) {
        self.result_id = Some(id);
    }

    /// Advance the session by one event.
    ///
    /// Ticks for a cancelled countdown and trial results for a question that is
    /// no longer active are dropped without error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the event is not valid in the current state;
    /// the state is left unchanged.
    pub fn apply(&mut self, event: SessionEvent) -> Result<Transition, SessionError> {
        match event {
            SessionEvent::QuestionsLoaded(questions) => self.on_questions_loaded(questions),
            SessionEvent::LoadFailed(message) => self.on_load_failed(message),
            SessionEvent::SelectOption(option) => self.on_select_option(option),
            SessionEvent::EditCode(code) => self.on_edit_code(code),
            SessionEvent::TrialRunStarted => self.on_trial_started(),
            SessionEvent::TrialRunFinished { index, report } => {
                Ok(self.on_trial_finished(index, report))
            }
            SessionEvent::Next => self.on_next(),
            SessionEvent::Tick(token) => self.on_tick(token),
            SessionEvent::Submit => self.on_submit(),
            SessionEvent::Evaluated(result) => self.on_evaluated(result),
            SessionEvent::EvaluationFailed(message) => self.on_evaluation_failed(message),
            SessionEvent::ExplanationRequested { index, kind } => {
                self.on_explanation_requested(index, kind)
            }
            SessionEvent::ExplanationReceived { index, kind, text } => {
                self.on_explanation_received(index, kind, text)
            }
            SessionEvent::ExplanationFailed {
                index,
                kind,
                message,
            } => self.on_explanation_failed(index, kind, message),
            SessionEvent::Retry => self.on_retry(),
        }
    }

    // ─── loading ───

    fn on_questions_loaded(&mut self, questions: Vec<Question>) -> Result<Transition, SessionError> {
        if !matches!(self.state, SessionState::Loading) {
            return Err(SessionError::UnexpectedResponse);
        }
        if questions.is_empty() {
            tracing::warn!("question generation returned no questions");
            self.state = SessionState::Failed(SessionFailure {
                stage: FailureStage::Loading,
                message: "No questions were generated for this configuration.".into(),
            });
            return Ok(Transition::none());
        }

        tracing::info!(count = questions.len(), "session questions loaded");
        let mut progress = InProgress {
            index: 0,
            ledger: AnswerLedger::new(questions.len()),
            countdown: Countdown::new(),
            code_buffer: String::new(),
            trial: TrialRun::default(),
            revealed: Vec::new(),
        };
        let token = activate(&mut progress, &questions, 0);
        self.questions = questions;
        self.state = SessionState::InProgress(progress);
        Ok(Transition::with(SessionCommand::RestartTimer(token)))
    }

    fn on_load_failed(&mut self, message: String) -> Result<Transition, SessionError> {
        if !matches!(self.state, SessionState::Loading) {
            return Err(SessionError::UnexpectedResponse);
        }
        tracing::warn!(%message, "question generation failed");
        self.state = SessionState::Failed(SessionFailure {
            stage: FailureStage::Loading,
            message,
        });
        Ok(Transition::none())
    }

    // ─── traversal ───

    fn on_select_option(&mut self, option: usize) -> Result<Transition, SessionError> {
        let SessionState::InProgress(progress) = &mut self.state else {
            return Err(SessionError::NotInProgress);
        };
        let question = current(&self.questions, progress.index)?;
        let choice = question
            .as_multiple_choice()
            .ok_or(SessionError::NotMultipleChoice)?;
        if option >= choice.options.len() {
            return Err(SessionError::InvalidOption { option });
        }
        progress.ledger.upsert(progress.index, Answer::choice(option))?;
        Ok(Transition::none())
    }

    fn on_edit_code(&mut self, code: String) -> Result<Transition, SessionError> {
        let SessionState::InProgress(progress) = &mut self.state else {
            return Err(SessionError::NotInProgress);
        };
        if !current(&self.questions, progress.index)?.is_programming() {
            return Err(SessionError::NotProgramming);
        }
        progress.code_buffer = code;
        Ok(Transition::none())
    }

    fn on_next(&mut self) -> Result<Transition, SessionError> {
        let SessionState::InProgress(progress) = &mut self.state else {
            return Err(SessionError::NotInProgress);
        };
        let question = current(&self.questions, progress.index)?;
        let is_programming = question.is_programming();
        if !is_programming && !progress.ledger.contains(progress.index) {
            return Err(SessionError::SelectionRequired);
        }
        if progress.index + 1 >= self.questions.len() {
            return Err(SessionError::LastQuestion);
        }
        if is_programming {
            let answer = progress.code_answer();
            progress.ledger.upsert(progress.index, answer)?;
        }
        let next = progress.index + 1;
        let token = activate(progress, &self.questions, next);
        Ok(Transition::with(SessionCommand::RestartTimer(token)))
    }

    fn on_tick(&mut self, token: TimerToken) -> Result<Transition, SessionError> {
        let SessionState::InProgress(progress) = &mut self.state else {
            return Ok(Transition::none());
        };
        match progress.countdown.tick(token) {
            Tick::Remaining(_) | Tick::Stale => Ok(Transition::none()),
            Tick::Expired if progress.index + 1 < self.questions.len() => {
                tracing::debug!(index = progress.index, "question timed out, advancing");
                let next = progress.index + 1;
                let token = activate(progress, &self.questions, next);
                Ok(Transition::with(SessionCommand::RestartTimer(token)))
            }
            Tick::Expired => {
                tracing::debug!(index = progress.index, "last question timed out, submitting");
                self.begin_submission()
            }
        }
    }

    // ─── trial runs ───

    fn on_trial_started(&mut self) -> Result<Transition, SessionError> {
        let SessionState::InProgress(progress) = &mut self.state else {
            return Err(SessionError::NotInProgress);
        };
        let question = current(&self.questions, progress.index)?;
        let programming = question
            .as_programming()
            .ok_or(SessionError::NotProgramming)?;
        if progress.trial.running {
            return Err(SessionError::TrialRunBusy);
        }
        progress.trial.running = true;
        Ok(Transition::with(SessionCommand::RunTrial(TrialRunRequest {
            index: progress.index,
            code: progress.code_buffer.clone(),
            language: self.config.language.clone(),
            test_cases: programming.test_cases.clone(),
        })))
    }

    fn on_trial_finished(&mut self, index: usize, report: TrialRunReport) -> Transition {
        match &mut self.state {
            SessionState::InProgress(progress) if progress.index == index && progress.trial.running => {
                progress.trial.running = false;
                progress.trial.report = Some(report);
            }
            _ => tracing::debug!(index, "discarding trial result for inactive question"),
        }
        Transition::none()
    }

    // ─── submission ───

    fn on_submit(&mut self) -> Result<Transition, SessionError> {
        let progress = match &self.state {
            SessionState::InProgress(progress) => progress,
            SessionState::Submitting(_) => return Err(SessionError::SubmissionInFlight),
            _ => return Err(SessionError::NotInProgress),
        };
        if progress.index + 1 < self.questions.len() {
            return Err(SessionError::NotLastQuestion);
        }
        let question = current(&self.questions, progress.index)?;
        if !question.is_programming() && !progress.ledger.contains(progress.index) {
            return Err(SessionError::SelectionRequired);
        }
        self.begin_submission()
    }

    /// Gather answers and move to `Submitting`. Shared by user submit and
    /// last-question timeout; the latter skips the selection guard.
    fn begin_submission(&mut self) -> Result<Transition, SessionError> {
        let SessionState::InProgress(progress) = &mut self.state else {
            return Err(SessionError::NotInProgress);
        };
        let question = current(&self.questions, progress.index)?;
        if question.is_programming() && !progress.ledger.contains(progress.index) {
            let answer = progress.code_answer();
            progress.ledger.upsert(progress.index, answer)?;
        }
        progress.countdown.cancel();

        let submission = Submission {
            questions: self.questions.clone(),
            answers: progress.ledger.gather(),
            config: self.config.clone(),
        };
        tracing::info!(
            answered = submission.answers.len(),
            total = submission.questions.len(),
            "submitting session for evaluation"
        );
        self.state = SessionState::Submitting(submission.clone());

        let mut transition = Transition::with(SessionCommand::StopTimer);
        transition.push(SessionCommand::Evaluate(submission));
        Ok(transition)
    }

    fn on_evaluated(&mut self, result: EvaluationResult) -> Result<Transition, SessionError> {
        if !matches!(self.state, SessionState::Submitting(_)) {
            return Err(SessionError::UnexpectedResponse);
        }
        tracing::info!(score = result.score(), "session evaluated");
        self.state = SessionState::Completed(result);
        Ok(Transition::none())
    }

    fn on_evaluation_failed(&mut self, message: String) -> Result<Transition, SessionError> {
        let SessionState::Submitting(submission) = &self.state else {
            return Err(SessionError::UnexpectedResponse);
        };
        tracing::warn!(%message, "evaluation failed");
        self.state = SessionState::Failed(SessionFailure {
            stage: FailureStage::Evaluating(submission.clone()),
            message,
        });
        Ok(Transition::none())
    }

    fn on_retry(&mut self) -> Result<Transition, SessionError> {
        let SessionState::Failed(failure) = &self.state else {
            return Err(SessionError::NothingToRetry);
        };
        match failure.stage.clone() {
            FailureStage::Loading => {
                self.state = SessionState::Loading;
                Ok(Transition::with(SessionCommand::LoadQuestions(
                    self.config.clone(),
                )))
            }
            FailureStage::Evaluating(submission) => {
                self.state = SessionState::Submitting(submission.clone());
                Ok(Transition::with(SessionCommand::Evaluate(submission)))
            }
        }
    }

    // ─── explanations ───

    fn on_explanation_requested(
        &mut self,
        index: usize,
        kind: ExplanationKind,
    ) -> Result<Transition, SessionError> {
        if !matches!(
            self.state,
            SessionState::InProgress(_) | SessionState::Completed(_)
        ) {
            return Err(SessionError::NotInProgress);
        }
        let query = self
            .questions
            .get(index)
            .ok_or(SessionError::QuestionOutOfRange(index))?
            .prompt()
            .to_string();

        if self.explanations.contains(index, kind) {
            self.reveal(index, kind);
            return Ok(Transition::none());
        }
        if !self.explanations.begin(index, kind) {
            return Err(SessionError::ExplanationBusy);
        }
        self.reveal(index, kind);
        Ok(Transition::with(SessionCommand::Explain(
            ExplanationRequest { index, kind, query },
        )))
    }

    fn on_explanation_received(
        &mut self,
        index: usize,
        kind: ExplanationKind,
        text: String,
    ) -> Result<Transition, SessionError> {
        if !self.explanations.resolve(index, kind, text) {
            return Err(SessionError::UnexpectedResponse);
        }
        Ok(Transition::none())
    }

    fn on_explanation_failed(
        &mut self,
        index: usize,
        kind: ExplanationKind,
        message: String,
    ) -> Result<Transition, SessionError> {
        if !self.explanations.fail(index, kind, message) {
            return Err(SessionError::UnexpectedResponse);
        }
        Ok(Transition::none())
    }

    fn reveal(&mut self, index: usize, kind: ExplanationKind) {
        if let SessionState::InProgress(progress) = &mut self.state {
            if progress.index == index {
                progress.reveal(kind);
            }
        }
    }
}

fn current(questions: &[Question], index: usize) -> Result<&Question, SessionError> {
    questions
        .get(index)
        .ok_or(SessionError::QuestionOutOfRange(index))
}

/// Make `index` the active question: restart its countdown, hide explanations,
/// drop the trial report and prefill the code buffer.
fn activate(progress: &mut InProgress, questions: &[Question], index: usize) -> TimerToken {
    progress.index = index;
    progress.revealed.clear();
    progress.trial = TrialRun::default();
    progress.code_buffer.clear();

    let question = questions.get(index);
    if let Some(programming) = question.and_then(Question::as_programming) {
        progress.code_buffer = match progress.ledger.get(index) {
            Some(Answer::Code { code, .. }) => code.clone(),
            _ => programming.starter_code.clone(),
        };
    }
    let limit = question.map_or(TimeLimit::MULTIPLE_CHOICE, Question::time_limit);
    progress.countdown.start(limit)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
