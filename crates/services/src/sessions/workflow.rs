use std::collections::VecDeque;
use std::sync::Arc;

use assess_core::model::{
    ActivityRecord, EvaluationResult, NewStoredResult, ResultId, SessionConfig, TrialRunReport,
};
use assess_core::{Clock, TimerToken};
use storage::repository::{ActivityRepository, ResultRepository};

use super::explanations::ExplanationKind;
use super::machine::{SessionCommand, SessionEvent, SessionMachine, SessionState, Transition};
use crate::error::SessionError;
use crate::evaluation::EvaluationClient;

/// Runs sessions against the evaluation service and persists completed ones.
///
/// The machine itself stays synchronous; this service executes the commands it
/// emits and feeds the outcomes back until only timer work remains.
#[derive(Clone)]
pub struct AssessmentService {
    clock: Clock,
    client: Arc<dyn EvaluationClient>,
    activities: Arc<dyn ActivityRepository>,
    results: Arc<dyn ResultRepository>,
}

impl AssessmentService {
    #[must_use]
    pub fn new(
        clock: Clock,
        client: Arc<dyn EvaluationClient>,
        activities: Arc<dyn ActivityRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            clock,
            client,
            activities,
            results,
        }
    }

    /// Create a session and load its questions.
    ///
    /// The returned transition holds the timer commands for the first question.
    /// A generation failure is not an error here; the machine ends up `Failed`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` for an invalid configuration.
    pub async fn start_session(
        &self,
        config: SessionConfig,
    ) -> Result<(SessionMachine, Transition), SessionError> {
        tracing::info!(
            kind = config.kind.label(),
            language = %config.language,
            questions = config.number_of_questions,
            "starting session"
        );
        let (mut machine, transition) = SessionMachine::start(config)?;
        let timers = self.drive(&mut machine, transition).await?;
        Ok((machine, timers))
    }

    /// Apply a user or timer event and run whatever it triggers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the event is rejected or persistence fails.
    pub async fn dispatch(
        &self,
        machine: &mut SessionMachine,
        event: SessionEvent,
    ) -> Result<Transition, SessionError> {
        let transition = machine.apply(event)?;
        self.drive(machine, transition).await
    }

    /// # Errors
    ///
    /// See [`AssessmentService::dispatch`].
    pub async fn submit(&self, machine: &mut SessionMachine) -> Result<Transition, SessionError> {
        self.dispatch(machine, SessionEvent::Submit).await
    }

    /// Feed one timer tick; expiry may advance or submit.
    ///
    /// # Errors
    ///
    /// See [`AssessmentService::dispatch`].
    pub async fn expire_tick(
        &self,
        machine: &mut SessionMachine,
        token: TimerToken,
    ) -> Result<Transition, SessionError> {
        self.dispatch(machine, SessionEvent::Tick(token)).await
    }

    /// Trial-run the active programming question's code buffer.
    ///
    /// # Errors
    ///
    /// See [`AssessmentService::dispatch`].
    pub async fn run_code(&self, machine: &mut SessionMachine) -> Result<Transition, SessionError> {
        self.dispatch(machine, SessionEvent::TrialRunStarted).await
    }

    /// # Errors
    ///
    /// See [`AssessmentService::dispatch`].
    pub async fn explain(
        &self,
        machine: &mut SessionMachine,
        index: usize,
        kind: ExplanationKind,
    ) -> Result<Transition, SessionError> {
        self.dispatch(machine, SessionEvent::ExplanationRequested { index, kind })
            .await
    }

    /// # Errors
    ///
    /// See [`AssessmentService::dispatch`].
    pub async fn retry(&self, machine: &mut SessionMachine) -> Result<Transition, SessionError> {
        self.dispatch(machine, SessionEvent::Retry).await
    }

    /// Execute every non-timer command, feeding results back into the machine.
    ///
    /// Returns the timer commands, in order, for the caller's ticker. Persists
    /// the result once the machine reaches `Completed`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if a response is rejected or persistence fails.
    pub async fn drive(
        &self,
        machine: &mut SessionMachine,
        transition: Transition,
    ) -> Result<Transition, SessionError> {
        let mut queue: VecDeque<SessionCommand> = transition.into_commands().into();
        let mut timers = Transition::none();

        while let Some(command) = queue.pop_front() {
            if command.is_timer() {
                timers.push(command);
                continue;
            }
            if let Some(event) = self.perform(&command).await {
                queue.extend(machine.apply(event)?.into_commands());
            }
        }

        if matches!(machine.state(), SessionState::Completed(_)) && machine.result_id().is_none() {
            self.finalize_completion(machine).await?;
        }
        Ok(timers)
    }

    /// Execute a single command against the evaluation service.
    ///
    /// Client failures become failure events, so a session never waits on a
    /// call that already errored. Timer commands yield `None`.
    pub async fn perform(&self, command: &SessionCommand) -> Option<SessionEvent> {
        match command {
            SessionCommand::RestartTimer(_) | SessionCommand::StopTimer => None,
            SessionCommand::LoadQuestions(config) => {
                Some(match self.client.generate_questions(config).await {
                    Ok(questions) => SessionEvent::QuestionsLoaded(questions),
                    Err(err) => {
                        tracing::warn!(error = %err, "question generation failed");
                        SessionEvent::LoadFailed(
                            "Could not load questions. Please try again.".into(),
                        )
                    }
                })
            }
            SessionCommand::Evaluate(submission) => Some(
                match self
                    .client
                    .evaluate_assessment(
                        &submission.questions,
                        &submission.answers,
                        &submission.config,
                    )
                    .await
                {
                    Ok(result) => SessionEvent::Evaluated(result),
                    Err(err) => {
                        tracing::warn!(error = %err, "evaluation failed");
                        SessionEvent::EvaluationFailed(
                            "Could not evaluate your answers. Please try again.".into(),
                        )
                    }
                },
            ),
            SessionCommand::RunTrial(request) => {
                let report = match self
                    .client
                    .evaluate_code_against_test_cases(
                        &request.code,
                        &request.language,
                        &request.test_cases,
                    )
                    .await
                {
                    Ok(report) => report,
                    Err(err) => {
                        tracing::warn!(error = %err, index = request.index, "trial run failed");
                        TrialRunReport::failed(err.to_string())
                    }
                };
                Some(SessionEvent::TrialRunFinished {
                    index: request.index,
                    report,
                })
            }
            SessionCommand::Explain(request) => {
                Some(match self.client.get_concept_explanation(&request.query).await {
                    Ok(text) => SessionEvent::ExplanationReceived {
                        index: request.index,
                        kind: request.kind,
                        text,
                    },
                    Err(err) => {
                        tracing::warn!(error = %err, kind = %request.kind, "explanation failed");
                        SessionEvent::ExplanationFailed {
                            index: request.index,
                            kind: request.kind,
                            message: format!(
                                "Could not load the {}.",
                                request.kind.label().to_lowercase()
                            ),
                        }
                    }
                })
            }
        }
    }

    /// Persist a completed session and remember the result id on it.
    ///
    /// Idempotent once the result id is set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` if the session has no result yet.
    /// Returns `SessionError::Storage` if persistence fails.
    pub async fn finalize_completion(
        &self,
        machine: &mut SessionMachine,
    ) -> Result<ResultId, SessionError> {
        if let Some(id) = machine.result_id() {
            return Ok(id);
        }
        let result = machine.result().ok_or(SessionError::NotInProgress)?;
        let id = self.persist_result(machine.config(), result).await?;
        machine.set_result_id(id);
        Ok(id)
    }

    /// Save the evaluated result and append one activity record for it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if either write fails.
    pub async fn persist_result(
        &self,
        config: &SessionConfig,
        result: &EvaluationResult,
    ) -> Result<ResultId, SessionError> {
        let completed_at = self.clock.now();
        let id = self
            .results
            .save_result(&NewStoredResult {
                config: config.clone(),
                result: result.clone(),
                completed_at,
            })
            .await?;
        let record = ActivityRecord::new(
            config.kind.into(),
            config.language.clone(),
            result.score(),
            completed_at,
        );
        self.activities.append_activity(&record).await?;

        tracing::info!(result_id = %id, score = result.score(), "session result saved");
        Ok(id)
    }
}
