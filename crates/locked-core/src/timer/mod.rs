mod duration;
mod engine;
mod mode;
mod session;
mod ticker;

pub use duration::{
    format_countdown, parse_duration_input, validate_duration_secs, MAX_DURATION_SECS,
    MIN_MINUTES_INPUT_SECS, MIN_SECONDS_INPUT_SECS,
};
pub use engine::{CompletionAction, EngineConfig, SessionEngine};
pub use mode::{Mode, RunState};
pub use session::{Durations, Session};
pub use ticker::{SubscriptionId, TickKind, COUNTDOWN_PERIOD, DEFAULT_FLUSH_INTERVAL};
