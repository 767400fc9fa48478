#![forbid(unsafe_code)]

pub mod charts;
pub mod ledger;
pub mod model;
pub mod time;
pub mod timer;

pub use ledger::{AnswerLedger, LedgerError};
pub use time::Clock;
pub use timer::{Countdown, Tick, TimeLimit, TimerToken};
