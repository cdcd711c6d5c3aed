//! Per-category minute ledger.
//!
//! Serialized as the JSON object stored under a category key:
//!
//! ```text
//! daily:   {"2026-10-17": 42}
//! slotted: {"2026-10-17": {"18": 30, "19": 12}}
//! ```
//!
//! Values only ever grow and saturate at `u64::MAX` instead of wrapping. Both
//! day shapes may coexist in one ledger.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::{parse_date_key, SLOTS_PER_DAY};

/// How finely minutes are bucketed within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    #[default]
    Slotted,
}

/// Minutes recorded for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DayBucket {
    Total(u64),
    Slots(BTreeMap<u8, u64>),
}

impl DayBucket {
    pub fn total(&self) -> u64 {
        match self {
            DayBucket::Total(minutes) => *minutes,
            DayBucket::Slots(slots) => slots
                .values()
                .fold(0u64, |acc, m| acc.saturating_add(*m)),
        }
    }

    /// Minutes per slot. A bare daily total lands in slot 0.
    pub fn slots(&self) -> [u64; SLOTS_PER_DAY] {
        let mut out = [0; SLOTS_PER_DAY];
        match self {
            DayBucket::Total(minutes) => out[0] = *minutes,
            DayBucket::Slots(slots) => {
                for (&slot, &minutes) in slots {
                    if let Some(cell) = out.get_mut(slot as usize) {
                        *cell = cell.saturating_add(minutes);
                    }
                }
            }
        }
        out
    }

    fn credit(&mut self, slot: Option<u8>, minutes: u64) {
        match slot {
            None => {
                let total = self.total().saturating_add(minutes);
                *self = DayBucket::Total(total);
            }
            Some(slot) => {
                if let DayBucket::Total(total) = *self {
                    let mut slots = BTreeMap::new();
                    if total > 0 {
                        slots.insert(0, total);
                    }
                    *self = DayBucket::Slots(slots);
                }
                if let DayBucket::Slots(slots) = self {
                    let cell: &mut u64 = slots.entry(slot).or_insert(0);
                    *cell = cell.saturating_add(minutes);
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for DayBucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BucketVisitor;

        impl<'de> Visitor<'de> for BucketVisitor {
            type Value = DayBucket;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a minute count or a map of slot index to minutes")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<DayBucket, E> {
                Ok(DayBucket::Total(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<DayBucket, E> {
                u64::try_from(v)
                    .map(DayBucket::Total)
                    .map_err(|_| E::custom(format!("negative minute count {v}")))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<DayBucket, A::Error> {
                let mut slots = BTreeMap::new();
                while let Some((key, minutes)) = map.next_entry::<String, u64>()? {
                    let slot: u8 = key
                        .parse::<u8>()
                        .ok()
                        .filter(|s| (*s as usize) < SLOTS_PER_DAY)
                        .ok_or_else(|| {
                            <A::Error as de::Error>::custom(format!("invalid slot index '{key}'"))
                        })?;
                    let cell: &mut u64 = slots.entry(slot).or_insert(0);
                    *cell = cell.saturating_add(minutes);
                }
                Ok(DayBucket::Slots(slots))
            }
        }

        deserializer.deserialize_any(BucketVisitor)
    }
}

/// Date-key → minutes for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    days: BTreeMap<String, DayBucket>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Adds minutes to a day (and slot, when given). Creates the entry lazily.
    pub fn credit(&mut self, date_key: &str, slot: Option<u8>, minutes: u64) {
        if minutes == 0 {
            return;
        }
        match self.days.get_mut(date_key) {
            Some(bucket) => bucket.credit(slot, minutes),
            None => {
                let bucket = match slot {
                    Some(slot) => DayBucket::Slots(BTreeMap::from([(slot, minutes)])),
                    None => DayBucket::Total(minutes),
                };
                self.days.insert(date_key.to_string(), bucket);
            }
        }
    }

    /// Adds every entry of `other` into `self`, keeping its shape.
    pub fn absorb(&mut self, other: &History) {
        for (date_key, bucket) in &other.days {
            match bucket {
                DayBucket::Total(minutes) => self.credit(date_key, None, *minutes),
                DayBucket::Slots(slots) => {
                    for (&slot, &minutes) in slots {
                        self.credit(date_key, Some(slot), minutes);
                    }
                }
            }
        }
    }

    pub fn day(&self, date_key: &str) -> Option<&DayBucket> {
        self.days.get(date_key)
    }

    pub fn day_total(&self, date_key: &str) -> u64 {
        self.days.get(date_key).map(DayBucket::total).unwrap_or(0)
    }

    pub fn day_slots(&self, date_key: &str) -> [u64; SLOTS_PER_DAY] {
        self.days
            .get(date_key)
            .map(DayBucket::slots)
            .unwrap_or([0; SLOTS_PER_DAY])
    }

    pub fn total_minutes(&self) -> u64 {
        self.days
            .values()
            .fold(0u64, |acc, bucket| acc.saturating_add(bucket.total()))
    }

    /// Days with a parseable date key, in ascending order.
    pub fn dated_totals(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.days
            .iter()
            .filter_map(|(key, bucket)| parse_date_key(key).map(|d| (d, bucket.total())))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DayBucket)> {
        self.days.iter().map(|(k, v)| (k.as_str(), v))
    }
}
