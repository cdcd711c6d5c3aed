use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::format::{format_hours, percentage_change};
use super::range::{total_minutes_in_range, Period};
use crate::history::History;

/// Merges several categories into one history, day by day.
pub fn combine<'a>(histories: impl IntoIterator<Item = &'a History>) -> History {
    let mut combined = History::new();
    for history in histories {
        combined.absorb(history);
    }
    combined
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub current: u64,
    pub previous: u64,
    pub formatted: String,
    pub change: String,
}

impl PeriodStats {
    fn build(history: &History, period: Period, today: NaiveDate) -> Self {
        let current = total_minutes_in_range(history, period.range(today));
        let previous = period
            .previous()
            .map(|p| total_minutes_in_range(history, p.range(today)))
            .unwrap_or(0);
        Self {
            current,
            previous,
            formatted: format_hours(current),
            change: percentage_change(current, previous),
        }
    }
}

/// Today/week/month/year totals against their previous period, plus all time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub today: PeriodStats,
    pub this_week: PeriodStats,
    pub this_month: PeriodStats,
    pub this_year: PeriodStats,
    pub all_time: u64,
    pub all_time_formatted: String,
}

impl StatsReport {
    pub fn build(history: &History, today: NaiveDate) -> Self {
        let all_time = history.total_minutes();
        Self {
            today: PeriodStats::build(history, Period::Today, today),
            this_week: PeriodStats::build(history, Period::ThisWeek, today),
            this_month: PeriodStats::build(history, Period::ThisMonth, today),
            this_year: PeriodStats::build(history, Period::ThisYear, today),
            all_time,
            all_time_formatted: format_hours(all_time),
        }
    }
}
