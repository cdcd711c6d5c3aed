use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::Credit;
use crate::timer::{Mode, RunState, SubscriptionId};

/// Every state change of the engine produces an Event.
/// The CLI prints them; the driver forwards them to its consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        mode: Mode,
        duration_secs: u64,
        subscription: SubscriptionId,
        at: DateTime<Utc>,
    },
    SessionPaused {
        mode: Mode,
        time_left_secs: u64,
        credit: Option<Credit>,
        at: DateTime<Utc>,
    },
    SessionResumed {
        mode: Mode,
        time_left_secs: u64,
        subscription: SubscriptionId,
        at: DateTime<Utc>,
    },
    SessionReset {
        mode: Mode,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: Mode,
        to: Mode,
        time_left_secs: u64,
        credit: Option<Credit>,
        at: DateTime<Utc>,
    },
    DurationUpdated {
        mode: Mode,
        duration_secs: u64,
        /// True when the idle countdown was reset to the new duration.
        applied: bool,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero. The engine is idle until the consumer answers.
    SessionCompleted {
        completed_mode: Mode,
        credit: Option<Credit>,
        at: DateTime<Utc>,
    },
    ProgressLogged {
        credit: Credit,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Mode,
        state: RunState,
        time_left_secs: u64,
        duration_secs: u64,
        formatted: String,
        progress_pct: f64,
        awaiting_response: Option<Mode>,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn completed_mode(&self) -> Option<Mode> {
        match self {
            Event::SessionCompleted { completed_mode, .. } => Some(*completed_mode),
            _ => None,
        }
    }
}
