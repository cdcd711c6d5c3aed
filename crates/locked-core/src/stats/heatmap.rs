use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::{date_key, SLOTS_PER_DAY};
use crate::history::History;

/// Days shown in the heatmap, ending today.
pub const HEATMAP_DAYS: u64 = 7;

/// Upper bounds (inclusive) of intensity levels 0..=3; anything above is 4.
const INTENSITY_THRESHOLDS: [u64; 4] = [0, 5, 15, 25];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapRow {
    pub date: NaiveDate,
    /// Minutes per 30-minute slot.
    pub cells: Vec<u64>,
}

impl HeatmapRow {
    pub fn total(&self) -> u64 {
        self.cells.iter().fold(0u64, |acc, m| acc.saturating_add(*m))
    }
}

/// Shade level 0..=4 for a cell.
pub fn intensity(minutes: u64) -> u8 {
    INTENSITY_THRESHOLDS
        .iter()
        .position(|&max| minutes <= max)
        .unwrap_or(INTENSITY_THRESHOLDS.len()) as u8
}

/// One row per day for the past week, oldest first. Days stored as a bare
/// total show it in slot 0.
pub fn week_heatmap(history: &History, today: NaiveDate) -> Vec<HeatmapRow> {
    (0..HEATMAP_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| HeatmapRow {
            date,
            cells: history.day_slots(&date_key(date)).to_vec(),
        })
        .collect()
}
