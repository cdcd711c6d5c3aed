//! Read-only analytics over minute history.
//!
//! Everything here is a pure function of a [`History`](crate::history::History)
//! and a reference day; nothing touches the engine or the store.

mod format;
mod heatmap;
mod range;
mod report;

pub use format::{format_hours, format_minutes, percentage_change};
pub use heatmap::{intensity, week_heatmap, HeatmapRow, HEATMAP_DAYS};
pub use range::{total_minutes_in_range, DateRange, Period};
pub use report::{combine, PeriodStats, StatsReport};
