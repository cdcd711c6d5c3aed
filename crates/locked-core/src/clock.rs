//! Wall-clock collaborator.
//!
//! The engine never calls `SystemTime` directly; everything that needs the
//! time of day goes through a [`Clock`] so tests can drive time by hand.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike};

/// Number of 30-minute slots in a day.
pub const SLOTS_PER_DAY: usize = 48;

pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// Converts an epoch timestamp to the user's local calendar time.
    fn local_datetime(&self, ts_ms: i64) -> NaiveDateTime;

    /// `YYYY-MM-DD` of the local calendar day containing `ts_ms`.
    fn local_date_key(&self, ts_ms: i64) -> String {
        date_key(self.local_datetime(ts_ms).date())
    }

    /// 30-minute slot (0..=47) of the local time of day.
    fn slot(&self, ts_ms: i64) -> u8 {
        let t = self.local_datetime(ts_ms);
        (t.hour() * 2 + u32::from(t.minute() >= 30)) as u8
    }

    fn today(&self) -> NaiveDate {
        self.local_datetime(self.now_ms()).date()
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

fn utc_fallback(ts_ms: i64) -> NaiveDateTime {
    DateTime::<chrono::Utc>::from_timestamp_millis(ts_ms)
        .unwrap_or_default()
        .naive_utc()
}

/// System clock in the machine's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn local_datetime(&self, ts_ms: i64) -> NaiveDateTime {
        Local
            .timestamp_millis_opt(ts_ms)
            .earliest()
            .map(|t| t.naive_local())
            .unwrap_or_else(|| utc_fallback(ts_ms))
    }
}

/// Hand-driven clock with a fixed UTC offset.
///
/// Clones share the same instant, so a test can keep one handle while the
/// engine owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now_ms: Rc<Cell<i64>>,
    offset: FixedOffset,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(now_ms)),
            offset: utc(),
        }
    }

    /// Starts at the given local wall time in a zone `offset_secs` east of UTC.
    pub fn at_local(local: NaiveDateTime, offset_secs: i32) -> Self {
        let offset = FixedOffset::east_opt(offset_secs).unwrap_or_else(utc);
        let now_ms = offset
            .from_local_datetime(&local)
            .single()
            .map(|t| t.timestamp_millis())
            .unwrap_or_else(|| local.and_utc().timestamp_millis());
        Self {
            now_ms: Rc::new(Cell::new(now_ms)),
            offset,
        }
    }

    pub fn set_ms(&self, now_ms: i64) {
        self.now_ms.set(now_ms);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance_ms(secs * 1000);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }

    fn local_datetime(&self, ts_ms: i64) -> NaiveDateTime {
        self.offset
            .timestamp_millis_opt(ts_ms)
            .single()
            .map(|t| t.naive_local())
            .unwrap_or_else(|| utc_fallback(ts_ms))
    }
}

fn utc() -> FixedOffset {
    chrono::Utc.fix()
}
