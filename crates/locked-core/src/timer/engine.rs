//! Session engine implementation.
//!
//! The countdown is tick-driven: the caller delivers one `tick()` per elapsed
//! second while running. Minute logging is wall-clock based and goes through
//! the [`ProgressLogger`]. The engine has no internal threads or timers.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -start-> Running -pause-> Paused -resume-> Running
//! Running -tick to 0-> Idle (completion pending until respond/start/reset/switch)
//! any -reset/switch_mode-> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::new(SystemClock, store, EngineConfig::default())?;
//! let sub = engine.start()?;
//! // Every second:
//! engine.tick(sub); // Some(Event::SessionCompleted { .. }) at zero
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::duration::{format_countdown, parse_duration_input, validate_duration_secs};
use super::mode::{Mode, RunState};
use super::session::{Durations, Session};
use super::ticker::{Subscriptions, SubscriptionId, TickKind, DEFAULT_FLUSH_INTERVAL};
use crate::clock::Clock;
use crate::error::{ConfigError, Result, TransitionError};
use crate::events::Event;
use crate::history::{Credit, Granularity, History, KvStore, ProgressLogger};

/// Consumer's answer to a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionAction {
    /// Start another run in the mode that just finished.
    Continue,
    /// Switch to the other mode and start a run there.
    Switch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub durations: Durations,
    pub granularity: Granularity,
    pub flush_interval: Duration,
    pub initial_mode: Mode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            durations: Durations::default(),
            granularity: Granularity::default(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            initial_mode: Mode::Work,
        }
    }
}

/// Owns the session, the configured durations and the progress logger.
pub struct SessionEngine<C, S> {
    clock: C,
    durations: Durations,
    session: Session,
    logger: ProgressLogger<S>,
    subscriptions: Subscriptions,
    awaiting_response: Option<Mode>,
    flush_interval: Duration,
}

impl<C: Clock, S: KvStore> SessionEngine<C, S> {
    /// Builds an idle engine. Both configured durations must be valid and
    /// the flush interval non-zero.
    pub fn new(clock: C, store: S, config: EngineConfig) -> Result<Self> {
        validate_duration_secs(config.durations.work_secs)?;
        validate_duration_secs(config.durations.rest_secs)?;
        if config.flush_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "flush_interval".into(),
                message: "must be greater than zero".into(),
            }
            .into());
        }
        let mode = config.initial_mode;
        Ok(Self {
            clock,
            durations: config.durations,
            session: Session::idle(mode, config.durations.get(mode)),
            logger: ProgressLogger::new(store, config.granularity),
            subscriptions: Subscriptions::default(),
            awaiting_response: None,
            flush_interval: config.flush_interval,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.session.mode
    }

    pub fn run_state(&self) -> RunState {
        self.session.run_state
    }

    pub fn time_left_secs(&self) -> u64 {
        self.session.time_left_secs
    }

    /// Configured duration of the active mode.
    pub fn current_duration_secs(&self) -> u64 {
        self.durations.get(self.session.mode)
    }

    pub fn duration_secs(&self, mode: Mode) -> u64 {
        self.durations.get(mode)
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn history(&self, mode: Mode) -> &History {
        self.logger.history(mode)
    }

    pub fn logger(&self) -> &ProgressLogger<S> {
        &self.logger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn flush_interval(&self) -> Duration {
        self.flush_interval
    }

    /// Subscription of the running segment, if any.
    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscriptions.active()
    }

    /// Mode of a completed session still waiting for continue/switch.
    pub fn awaiting_response(&self) -> Option<Mode> {
        self.awaiting_response
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.session.mode,
            state: self.session.run_state,
            time_left_secs: self.session.time_left_secs,
            duration_secs: self.session.run_duration_secs,
            formatted: format_countdown(self.session.time_left_secs),
            progress_pct: self.session.progress_pct(),
            awaiting_response: self.awaiting_response,
            at: self.at(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Result<Event> {
        if self.session.run_state != RunState::Idle {
            return Err(TransitionError::not_allowed("start", self.session.run_state).into());
        }
        self.awaiting_response = None;
        let duration = self.current_duration_secs();
        self.session = Session {
            mode: self.session.mode,
            run_state: RunState::Running,
            time_left_secs: duration,
            run_duration_secs: duration,
            started_at_ms: Some(self.clock.now_ms()),
            last_logged_minute: 0,
        };
        let subscription = self.subscriptions.arm();
        debug!(mode = %self.session.mode, duration, %subscription, "session started");
        Ok(Event::SessionStarted {
            mode: self.session.mode,
            duration_secs: duration,
            subscription,
            at: self.at(),
        })
    }

    pub fn pause(&mut self) -> Result<Event> {
        if self.session.run_state != RunState::Running {
            return Err(TransitionError::not_allowed("pause", self.session.run_state).into());
        }
        let credit = self.flush();
        self.subscriptions.cancel();
        self.session.run_state = RunState::Paused;
        debug!(mode = %self.session.mode, time_left = self.session.time_left_secs, "session paused");
        Ok(Event::SessionPaused {
            mode: self.session.mode,
            time_left_secs: self.session.time_left_secs,
            credit,
            at: self.at(),
        })
    }

    pub fn resume(&mut self) -> Result<Event> {
        if self.session.run_state != RunState::Paused {
            return Err(TransitionError::not_allowed("resume", self.session.run_state).into());
        }
        // Rebase the start so elapsed wall time equals what was counted down.
        let elapsed_secs = self.session.elapsed_countdown_secs();
        let now = self.clock.now_ms();
        self.session.started_at_ms = Some(now - (elapsed_secs as i64) * 1000);
        self.session.last_logged_minute = elapsed_secs / 60;
        self.session.run_state = RunState::Running;
        let subscription = self.subscriptions.arm();
        debug!(mode = %self.session.mode, elapsed_secs, %subscription, "session resumed");
        Ok(Event::SessionResumed {
            mode: self.session.mode,
            time_left_secs: self.session.time_left_secs,
            subscription,
            at: self.at(),
        })
    }

    /// Back to idle with a full countdown. Logged history is not touched.
    pub fn reset(&mut self) -> Event {
        self.subscriptions.cancel();
        self.awaiting_response = None;
        self.restore_idle(self.session.mode);
        debug!(mode = %self.session.mode, "session reset");
        Event::SessionReset {
            mode: self.session.mode,
            time_left_secs: self.session.time_left_secs,
            at: self.at(),
        }
    }

    pub fn switch_mode(&mut self, mode: Mode) -> Event {
        let credit = self.flush();
        let from = self.session.mode;
        self.subscriptions.cancel();
        self.awaiting_response = None;
        self.restore_idle(mode);
        debug!(%from, to = %mode, "mode switched");
        Event::ModeSwitched {
            from,
            to: mode,
            time_left_secs: self.session.time_left_secs,
            credit,
            at: self.at(),
        }
    }

    /// Sets the configured duration of `mode`.
    ///
    /// Only an idle session of the same mode picks it up immediately; a run
    /// in flight keeps the duration it started with.
    pub fn update_duration(&mut self, duration_secs: u64, mode: Mode) -> Result<Event> {
        validate_duration_secs(duration_secs)?;
        self.durations.set(mode, duration_secs);
        let applied = mode == self.session.mode && self.session.run_state == RunState::Idle;
        if applied {
            self.session.time_left_secs = duration_secs;
            self.session.run_duration_secs = duration_secs;
        }
        debug!(%mode, duration_secs, applied, "duration updated");
        Ok(Event::DurationUpdated {
            mode,
            duration_secs,
            applied,
            at: self.at(),
        })
    }

    /// Parses user input (`"45"` minutes or `"90s"`) and updates the duration.
    pub fn update_duration_input(&mut self, input: &str, mode: Mode) -> Result<Event> {
        let secs = parse_duration_input(input)?;
        self.update_duration(secs, mode)
    }

    /// One elapsed second. Ignored unless `subscription` is the live one.
    pub fn tick(&mut self, subscription: SubscriptionId) -> Option<Event> {
        self.deliver(TickKind::Countdown, subscription)
    }

    /// Periodic progress flush. Ignored unless `subscription` is the live one.
    pub fn flush_tick(&mut self, subscription: SubscriptionId) -> Option<Event> {
        self.deliver(TickKind::Flush, subscription)
    }

    pub fn deliver(&mut self, kind: TickKind, subscription: SubscriptionId) -> Option<Event> {
        if !self.session.is_running() || !self.subscriptions.is_active(subscription) {
            return None;
        }
        match kind {
            TickKind::Countdown => {
                self.session.time_left_secs = self.session.time_left_secs.saturating_sub(1);
                if self.session.time_left_secs == 0 {
                    return Some(self.complete());
                }
                None
            }
            TickKind::Flush => self.flush().map(|credit| Event::ProgressLogged {
                credit,
                at: self.at(),
            }),
        }
    }

    /// Answers a pending completion. Both answers start a new run.
    ///
    /// Returns only the `SessionStarted` event. On `Switch` the mode change
    /// happens on an idle session whose minutes were already credited at
    /// completion, so its `ModeSwitched` event carries nothing and is dropped.
    pub fn respond(&mut self, action: CompletionAction) -> Result<Event> {
        let completed = self
            .awaiting_response
            .ok_or(TransitionError::NoPendingCompletion)?;
        if action == CompletionAction::Switch {
            self.switch_mode(completed.other());
        }
        self.start()
    }

    /// Retries writing history that failed to persist earlier.
    pub fn sync_history(&mut self) -> Result<()> {
        self.logger.sync()?;
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn flush(&mut self) -> Option<Credit> {
        self.logger.flush(&mut self.session, &self.clock)
    }

    fn complete(&mut self) -> Event {
        let credit = self.flush();
        let completed_mode = self.session.mode;
        self.subscriptions.cancel();
        self.restore_idle(completed_mode);
        self.awaiting_response = Some(completed_mode);
        info!(mode = %completed_mode, "session completed");
        Event::SessionCompleted {
            completed_mode,
            credit,
            at: self.at(),
        }
    }

    fn restore_idle(&mut self, mode: Mode) {
        self.session = Session::idle(mode, self.durations.get(mode));
    }

    fn at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(self.clock.now_ms()).unwrap_or_default()
    }
}
