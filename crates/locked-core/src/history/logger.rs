//! Progress logger.
//!
//! Turns elapsed wall-clock time of a running session into whole minutes
//! credited to that session's mode. Minute-granular and idempotent, so the
//! flush cadence is a tunable rather than a correctness knob.
//!
//! Every write re-reads the category key, applies this logger's unsaved
//! credits on top of the latest stored value and writes that single key back.
//! Credits that fail to persist stay pending and ride along with the next
//! successful flush.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ledger::{Granularity, History};
use super::store::KvStore;
use crate::clock::Clock;
use crate::error::StorageError;
use crate::timer::{Mode, Session};

/// Minutes committed by one flush.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    pub mode: Mode,
    pub date_key: String,
    pub slot: Option<u8>,
    pub minutes: u64,
    /// False when the store rejected the write; minutes are held in memory.
    pub persisted: bool,
}

#[derive(Debug, Default)]
struct Ledger {
    /// Last known stored value plus pending credits.
    view: History,
    /// Credited but not yet written.
    pending: History,
}

pub struct ProgressLogger<S> {
    store: S,
    granularity: Granularity,
    work: Ledger,
    rest: Ledger,
}

impl<S: KvStore> ProgressLogger<S> {
    /// Loads both categories. Unreadable categories start empty in memory.
    pub fn new(store: S, granularity: Granularity) -> Self {
        let mut logger = Self {
            store,
            granularity,
            work: Ledger::default(),
            rest: Ledger::default(),
        };
        for mode in Mode::ALL {
            match load_history(&logger.store, mode) {
                Ok(history) => logger.ledger_mut(mode).view = history,
                Err(e) => warn!(%mode, error = %e, "history unavailable, starting in memory"),
            }
        }
        logger
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// History as this process sees it, including unsaved credits.
    pub fn history(&self, mode: Mode) -> &History {
        &self.ledger(mode).view
    }

    /// Minutes credited but not yet written to the store.
    pub fn pending_minutes(&self, mode: Mode) -> u64 {
        self.ledger(mode).pending.total_minutes()
    }

    /// Credits newly elapsed whole minutes of a running session.
    ///
    /// Returns `None` when the session is not running, has no start time, or
    /// no new minute has elapsed since the last flush.
    pub fn flush<C: Clock>(&mut self, session: &mut Session, clock: &C) -> Option<Credit> {
        if !session.is_running() {
            return None;
        }
        let started_at = session.started_at_ms?;
        let now = clock.now_ms();
        let elapsed_minutes = (now.saturating_sub(started_at).max(0) / 60_000) as u64;
        if elapsed_minutes <= session.last_logged_minute {
            return None;
        }

        let minutes = elapsed_minutes - session.last_logged_minute;
        let date_key = clock.local_date_key(now);
        let slot = match self.granularity {
            Granularity::Slotted => Some(clock.slot(now)),
            Granularity::Daily => None,
        };

        let ledger = self.ledger_mut(session.mode);
        ledger.pending.credit(&date_key, slot, minutes);
        ledger.view.credit(&date_key, slot, minutes);
        session.last_logged_minute = elapsed_minutes;

        let persisted = match self.persist(session.mode) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    mode = %session.mode,
                    minutes,
                    error = %e,
                    "history write failed, keeping minutes in memory"
                );
                false
            }
        };
        debug!(mode = %session.mode, %date_key, ?slot, minutes, persisted, "credited progress");

        Some(Credit {
            mode: session.mode,
            date_key,
            slot,
            minutes,
            persisted,
        })
    }

    /// Retries writing pending credits for both categories.
    pub fn sync(&mut self) -> Result<(), StorageError> {
        for mode in Mode::ALL {
            if !self.ledger(mode).pending.is_empty() {
                self.persist(mode)?;
            }
        }
        Ok(())
    }

    fn persist(&mut self, mode: Mode) -> Result<(), StorageError> {
        let mut latest = load_history(&self.store, mode)?;
        let ledger = self.ledger(mode);
        latest.absorb(&ledger.pending);
        let json = latest.to_json().map_err(|source| StorageError::Corrupt {
            mode,
            key: mode.history_key().to_string(),
            source,
        })?;
        self.store.set(mode.history_key(), &json)?;

        let ledger = self.ledger_mut(mode);
        ledger.view = latest;
        ledger.pending = History::new();
        Ok(())
    }

    fn ledger(&self, mode: Mode) -> &Ledger {
        match mode {
            Mode::Work => &self.work,
            Mode::Rest => &self.rest,
        }
    }

    fn ledger_mut(&mut self, mode: Mode) -> &mut Ledger {
        match mode {
            Mode::Work => &mut self.work,
            Mode::Rest => &mut self.rest,
        }
    }
}

/// Reads one category's history. A missing key is an empty history.
pub fn load_history<S: KvStore + ?Sized>(store: &S, mode: Mode) -> Result<History, StorageError> {
    let key = mode.history_key();
    match store.get(key)? {
        Some(json) => History::from_json(&json).map_err(|source| StorageError::Corrupt {
            mode,
            key: key.to_string(),
            source,
        }),
        None => Ok(History::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::history::MemoryStore;
    use crate::timer::RunState;
    use chrono::NaiveDateTime;

    fn clock() -> ManualClock {
        let start = NaiveDateTime::parse_from_str("2026-10-17 09:10:00", "%Y-%m-%d %H:%M:%S").unwrap();
        ManualClock::at_local(start, 0)
    }

    fn running(mode: Mode, clock: &ManualClock) -> Session {
        let mut session = Session::idle(mode, 3600);
        session.run_state = RunState::Running;
        session.started_at_ms = Some(clock.now_ms());
        session
    }

    #[test]
    fn credits_whole_minutes_only() {
        let clock = clock();
        let mut logger = ProgressLogger::new(MemoryStore::new(), Granularity::Daily);
        let mut session = running(Mode::Work, &clock);

        clock.advance_secs(59);
        assert!(logger.flush(&mut session, &clock).is_none());

        clock.advance_secs(1);
        let credit = logger.flush(&mut session, &clock).unwrap();
        assert_eq!(credit.minutes, 1);
        assert_eq!(credit.date_key, "2026-10-17");
        assert_eq!(credit.slot, None);
        assert_eq!(session.last_logged_minute, 1);

        clock.advance_secs(150);
        assert_eq!(logger.flush(&mut session, &clock).unwrap().minutes, 2);
        assert_eq!(logger.history(Mode::Work).day_total("2026-10-17"), 3);
        assert!(logger.history(Mode::Rest).is_empty());
    }

    #[test]
    fn second_flush_without_new_minute_is_noop() {
        let clock = clock();
        let mut logger = ProgressLogger::new(MemoryStore::new(), Granularity::Daily);
        let mut session = running(Mode::Rest, &clock);
        clock.advance_secs(61);
        assert!(logger.flush(&mut session, &clock).is_some());
        let writes = logger.store().writes();
        assert!(logger.flush(&mut session, &clock).is_none());
        assert_eq!(logger.store().writes(), writes);
    }

    #[test]
    fn ignores_sessions_that_are_not_running() {
        let clock = clock();
        let mut logger = ProgressLogger::new(MemoryStore::new(), Granularity::Daily);

        let mut idle = Session::idle(Mode::Work, 3600);
        clock.advance_secs(600);
        assert!(logger.flush(&mut idle, &clock).is_none());

        let mut paused = running(Mode::Work, &clock);
        paused.run_state = RunState::Paused;
        clock.advance_secs(600);
        assert!(logger.flush(&mut paused, &clock).is_none());

        let mut no_start = running(Mode::Work, &clock);
        no_start.started_at_ms = None;
        assert!(logger.flush(&mut no_start, &clock).is_none());
    }

    #[test]
    fn slotted_credit_uses_slot_at_flush_time() {
        let clock = clock();
        let mut logger = ProgressLogger::new(MemoryStore::new(), Granularity::Slotted);
        let mut session = running(Mode::Work, &clock);
        // 09:10 + 25 min = 09:35, slot 19, though most minutes ran in slot 18.
        clock.advance_secs(25 * 60);
        let credit = logger.flush(&mut session, &clock).unwrap();
        assert_eq!(credit.slot, Some(19));
        assert_eq!(logger.history(Mode::Work).day_slots("2026-10-17")[19], 25);
    }

    #[test]
    fn write_touches_only_its_category_and_keeps_foreign_updates() {
        let clock = clock();
        let store = MemoryStore::new().with_entry(Mode::Rest.history_key(), r#"{"2026-10-01":7}"#);
        let mut logger = ProgressLogger::new(&store, Granularity::Daily);

        // Someone else bumps work history after we loaded it.
        store.put_raw(Mode::Work.history_key(), r#"{"2026-10-16":4}"#);

        let mut session = running(Mode::Work, &clock);
        clock.advance_secs(120);
        logger.flush(&mut session, &clock).unwrap();

        assert_eq!(
            store.raw(Mode::Work.history_key()).as_deref(),
            Some(r#"{"2026-10-16":4,"2026-10-17":2}"#)
        );
        assert_eq!(
            store.raw(Mode::Rest.history_key()).as_deref(),
            Some(r#"{"2026-10-01":7}"#)
        );
        assert_eq!(logger.history(Mode::Work).total_minutes(), 6);
    }

    #[test]
    fn failed_write_is_retried_once_on_next_flush() {
        let clock = clock();
        let store = MemoryStore::new();
        let mut logger = ProgressLogger::new(&store, Granularity::Daily);
        let mut session = running(Mode::Work, &clock);

        store.set_unavailable(true);
        clock.advance_secs(180);
        let credit = logger.flush(&mut session, &clock).unwrap();
        assert!(!credit.persisted);
        assert_eq!(logger.pending_minutes(Mode::Work), 3);
        assert_eq!(logger.history(Mode::Work).day_total("2026-10-17"), 3);
        assert_eq!(session.last_logged_minute, 3);

        store.set_unavailable(false);
        clock.advance_secs(60);
        let credit = logger.flush(&mut session, &clock).unwrap();
        assert!(credit.persisted);
        assert_eq!(credit.minutes, 1);
        assert_eq!(logger.pending_minutes(Mode::Work), 0);
        assert_eq!(
            store.raw(Mode::Work.history_key()).as_deref(),
            Some(r#"{"2026-10-17":4}"#)
        );
    }

    #[test]
    fn sync_flushes_pending_without_new_minutes() {
        let clock = clock();
        let store = MemoryStore::new();
        let mut logger = ProgressLogger::new(&store, Granularity::Daily);
        let mut session = running(Mode::Rest, &clock);
        store.set_unavailable(true);
        clock.advance_secs(60);
        logger.flush(&mut session, &clock).unwrap();
        assert!(logger.sync().is_err());

        store.set_unavailable(false);
        logger.sync().unwrap();
        assert_eq!(
            store.raw(Mode::Rest.history_key()).as_deref(),
            Some(r#"{"2026-10-17":1}"#)
        );
    }

    #[test]
    fn corrupt_history_is_left_untouched() {
        let clock = clock();
        let store = MemoryStore::new().with_entry(Mode::Work.history_key(), "not json");
        let mut logger = ProgressLogger::new(&store, Granularity::Daily);
        let mut session = running(Mode::Work, &clock);
        clock.advance_secs(60);
        let credit = logger.flush(&mut session, &clock).unwrap();
        assert!(!credit.persisted);
        assert_eq!(store.raw(Mode::Work.history_key()).as_deref(), Some("not json"));
    }
}
