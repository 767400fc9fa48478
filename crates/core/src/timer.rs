//! Per-question countdown.
//!
//! `Countdown` is the pure half of the timer: it owns the remaining seconds and
//! decides when a question has expired. Something else (a tokio ticker, a UI
//! loop, a test) feeds it one tick per elapsed second.

use std::fmt;

/// Time allowed for a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeLimit(u32);

impl TimeLimit {
    pub const MULTIPLE_CHOICE: Self = Self(60);
    pub const PROGRAMMING: Self = Self(1800);

    #[must_use]
    pub fn seconds(self) -> u32 {
        self.0
    }
}

/// Identifies one `start` of a countdown.
///
/// Ticks carry the token they were scheduled for; a tick whose token belongs to
/// an earlier start is stale and must not affect the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// What a single tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Remaining(u32),
    /// The count reached zero. Reported once per `start`.
    Expired,
    /// The tick belonged to a cancelled or already-expired countdown.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct Countdown {
    generation: u64,
    remaining: u32,
    running: bool,
}

impl Countdown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to `limit` and begin counting. Invalidates every earlier token.
    pub fn start(&mut self, limit: TimeLimit) -> TimerToken {
        self.generation = self.generation.wrapping_add(1);
        self.remaining = limit.seconds();
        self.running = true;
        TimerToken(self.generation)
    }

    /// Stop counting without expiring; outstanding tokens become stale.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.running = false;
    }

    pub fn tick(&mut self, token: TimerToken) -> Tick {
        if !self.running || token.0 != self.generation {
            return Tick::Stale;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            Tick::Expired
        } else {
            Tick::Remaining(self.remaining)
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn token(&self) -> Option<TimerToken> {
        self.running.then_some(TimerToken(self.generation))
    }
}
