use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use assess_core::TimerToken;

use super::machine::{SessionCommand, Transition};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One-second clock feeding `SessionEvent::Tick` tokens back to a session.
///
/// At most one ticking task exists per ticker; restarting aborts the previous
/// task before spawning the next. Must be created inside a tokio runtime.
pub struct Ticker {
    tx: UnboundedSender<TimerToken>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<TimerToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, handle: None }, rx)
    }

    pub fn restart(&mut self, token: TimerToken) {
        self.cancel();
        let tx = self.tx.clone();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            loop {
                interval.tick().await;
                if tx.send(token).is_err() {
                    break;
                }
            }
        }));
        tracing::trace!(%token, "ticker restarted");
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Apply the timer commands of a transition in order.
    pub fn follow(&mut self, transition: &Transition) {
        for command in transition.commands() {
            match command {
                SessionCommand::RestartTimer(token) => self.restart(*token),
                SessionCommand::StopTimer => self.cancel(),
                _ => {}
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::{Difficulty, Question, SessionConfig, SessionKind};

    use crate::sessions::{SessionEvent, SessionMachine};

    fn one_question_machine() -> (SessionMachine, Transition) {
        let config = SessionConfig::new(SessionKind::Quiz, "Rust", Difficulty::Beginner)
            .with_counts(2, 0);
        let (mut machine, _) = SessionMachine::start(config).unwrap();
        let transition = machine
            .apply(SessionEvent::QuestionsLoaded(vec![
                Question::multiple_choice("q1", ["a", "b"]),
                Question::multiple_choice("q2", ["a", "b"]),
            ]))
            .unwrap();
        (machine, transition)
    }

    #[tokio::test(start_paused = true)]
    async fn emits_one_token_per_second() {
        let (machine, transition) = one_question_machine();
        let (mut ticker, mut rx) = Ticker::new();
        ticker.follow(&transition);
        let token = machine.in_progress().unwrap().countdown().token().unwrap();

        time::sleep(Duration::from_millis(3500)).await;
        let mut received = Vec::new();
        while let Ok(t) = rx.try_recv() {
            received.push(t);
        }
        assert_eq!(received, vec![token; 3]);
        assert!(ticker.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_the_previous_task() {
        let (mut machine, transition) = one_question_machine();
        let (mut ticker, mut rx) = Ticker::new();
        ticker.follow(&transition);

        time::sleep(Duration::from_millis(1500)).await;
        machine.apply(SessionEvent::SelectOption(0)).unwrap();
        let next = machine.apply(SessionEvent::Next).unwrap();
        ticker.follow(&next);
        let current = machine.in_progress().unwrap().countdown().token().unwrap();

        while rx.try_recv().is_ok() {}
        time::sleep(Duration::from_millis(2500)).await;
        let mut received = Vec::new();
        while let Ok(t) = rx.try_recv() {
            received.push(t);
        }
        assert_eq!(received, vec![current; 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_stop_ticking() {
        let (_machine, transition) = one_question_machine();
        let (mut ticker, mut rx) = Ticker::new();
        ticker.follow(&transition);
        ticker.cancel();
        assert!(!ticker.is_running());

        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());

        ticker.follow(&transition);
        drop(ticker);
        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.recv().await.is_none());
    }
}
