//! Single-threaded async driver.
//!
//! Owns a [`SessionEngine`] and multiplexes three sources on one task:
//! operator commands, the 1-second countdown interval and the periodic flush
//! interval. Both intervals belong to the engine's live subscription and are
//! dropped the moment it changes, so no tick can land after a pause, reset,
//! mode switch or completion.

use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::history::KvStore;
use crate::timer::{CompletionAction, Mode, SessionEngine, SubscriptionId, COUNTDOWN_PERIOD};

/// Operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Reset,
    SwitchMode(Mode),
    /// Raw duration input (`"25"` or `"90s"`); no mode means the active one.
    SetDuration { mode: Option<Mode>, input: String },
    Respond(CompletionAction),
    Snapshot,
    Shutdown,
}

#[derive(Debug)]
pub enum Output {
    Event(Event),
    /// A command was refused; the engine kept its previous state.
    Rejected { command: Command, error: CoreError },
}

/// Clock driven by the tokio runtime's notion of time.
///
/// Under `tokio::time::pause` it advances with virtual time, which keeps the
/// logger's wall-clock math in step with the intervals.
#[derive(Debug, Clone)]
pub struct RuntimeClock {
    base_ms: i64,
    origin: Instant,
}

impl RuntimeClock {
    pub fn new() -> Self {
        Self::starting_at(SystemClock.now_ms())
    }

    pub fn starting_at(base_ms: i64) -> Self {
        Self {
            base_ms,
            origin: Instant::now(),
        }
    }
}

impl Default for RuntimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for RuntimeClock {
    fn now_ms(&self) -> i64 {
        self.base_ms + self.origin.elapsed().as_millis() as i64
    }

    fn local_datetime(&self, ts_ms: i64) -> NaiveDateTime {
        SystemClock.local_datetime(ts_ms)
    }
}

type Armed = Option<(SubscriptionId, Interval)>;

/// Runs until a `Shutdown` command arrives or the command channel closes.
/// A running session is paused on the way out so its progress is flushed.
pub async fn run<C: Clock, S: KvStore>(
    engine: &mut SessionEngine<C, S>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    output: mpsc::UnboundedSender<Output>,
) {
    let mut countdown: Armed = None;
    let mut flush: Armed = None;

    loop {
        rearm(&mut countdown, engine.subscription(), COUNTDOWN_PERIOD);
        rearm(&mut flush, engine.subscription(), engine.flush_interval());

        tokio::select! {
            command = commands.recv() => {
                let command = match command {
                    None | Some(Command::Shutdown) => break,
                    Some(command) => command,
                };
                let message = match apply(engine, command.clone()) {
                    Ok(event) => Output::Event(event),
                    Err(error) => {
                        debug!(?command, %error, "command rejected");
                        Output::Rejected { command, error }
                    }
                };
                send(&output, message);
            }
            subscription = next_tick(&mut countdown) => {
                if let Some(event) = engine.tick(subscription) {
                    send(&output, Output::Event(event));
                }
            }
            subscription = next_tick(&mut flush) => {
                if let Some(event) = engine.flush_tick(subscription) {
                    send(&output, Output::Event(event));
                }
            }
        }
    }

    if engine.subscription().is_some() {
        match engine.pause() {
            Ok(event) => send(&output, Output::Event(event)),
            Err(e) => warn!(error = %e, "could not pause on shutdown"),
        }
    }
}

fn apply<C: Clock, S: KvStore>(engine: &mut SessionEngine<C, S>, command: Command) -> Result<Event> {
    match command {
        Command::Start => engine.start(),
        Command::Pause => engine.pause(),
        Command::Resume => engine.resume(),
        Command::Reset => Ok(engine.reset()),
        Command::SwitchMode(mode) => Ok(engine.switch_mode(mode)),
        Command::SetDuration { mode, input } => {
            let mode = mode.unwrap_or_else(|| engine.mode());
            engine.update_duration_input(&input, mode)
        }
        Command::Respond(action) => engine.respond(action),
        Command::Snapshot => Ok(engine.snapshot()),
        Command::Shutdown => Ok(engine.snapshot()),
    }
}

/// Keeps an interval only while it belongs to the live subscription.
fn rearm(slot: &mut Armed, live: Option<SubscriptionId>, period: Duration) {
    let armed = slot.as_ref().map(|(id, _)| *id);
    match live {
        Some(live) if armed == Some(live) => {}
        Some(live) => {
            // Missed ticks burst to catch up, so a stalled loop still counts
            // every second.
            let interval = interval_at(Instant::now() + period, period);
            *slot = Some((live, interval));
        }
        None => *slot = None,
    }
}

async fn next_tick(slot: &mut Armed) -> SubscriptionId {
    match slot {
        Some((subscription, interval)) => {
            interval.tick().await;
            *subscription
        }
        None => std::future::pending().await,
    }
}

fn send(output: &mpsc::UnboundedSender<Output>, message: Output) {
    if output.send(message).is_err() {
        debug!("output receiver dropped");
    }
}
