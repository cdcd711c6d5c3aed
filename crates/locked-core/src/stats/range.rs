use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::history::History;

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Named reporting periods relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
}

impl Period {
    /// "This" periods end at `today`; "last" periods are the whole previous
    /// period. Weeks start on Sunday.
    pub fn range(self, today: NaiveDate) -> DateRange {
        let week_start = today - Days::new(u64::from(today.weekday().num_days_from_sunday()));
        let month_start = today.with_day(1).unwrap_or(today);
        let year_start = today.with_ordinal(1).unwrap_or(today);
        let before = |d: NaiveDate| d.pred_opt().unwrap_or(d);

        match self {
            Period::Today => DateRange::day(today),
            Period::Yesterday => DateRange::day(before(today)),
            Period::ThisWeek => DateRange::new(week_start, today),
            Period::LastWeek => DateRange::new(week_start - Days::new(7), before(week_start)),
            Period::ThisMonth => DateRange::new(month_start, today),
            Period::LastMonth => DateRange::new(
                month_start
                    .checked_sub_months(Months::new(1))
                    .unwrap_or(month_start),
                before(month_start),
            ),
            Period::ThisYear => DateRange::new(year_start, today),
            Period::LastYear => DateRange::new(
                year_start
                    .checked_sub_months(Months::new(12))
                    .unwrap_or(year_start),
                before(year_start),
            ),
        }
    }

    /// The period a "this" period is compared against.
    pub fn previous(self) -> Option<Period> {
        match self {
            Period::Today => Some(Period::Yesterday),
            Period::ThisWeek => Some(Period::LastWeek),
            Period::ThisMonth => Some(Period::LastMonth),
            Period::ThisYear => Some(Period::LastYear),
            _ => None,
        }
    }
}

/// Sum of day totals whose date falls in `range`. Unparseable keys are skipped.
pub fn total_minutes_in_range(history: &History, range: DateRange) -> u64 {
    history
        .dated_totals()
        .filter(|(date, _)| range.contains(*date))
        .fold(0u64, |acc, (_, minutes)| acc.saturating_add(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_ranges_start_on_sunday() {
        // 2026-10-17 is a Saturday.
        let today = d(2026, 10, 17);
        assert_eq!(Period::ThisWeek.range(today), DateRange::new(d(2026, 10, 11), today));
        assert_eq!(
            Period::LastWeek.range(today),
            DateRange::new(d(2026, 10, 4), d(2026, 10, 10))
        );
        let sunday = d(2026, 10, 18);
        assert_eq!(Period::ThisWeek.range(sunday), DateRange::day(sunday));
    }

    #[test]
    fn month_and_year_ranges() {
        let today = d(2026, 3, 15);
        assert_eq!(Period::ThisMonth.range(today), DateRange::new(d(2026, 3, 1), today));
        assert_eq!(
            Period::LastMonth.range(today),
            DateRange::new(d(2026, 2, 1), d(2026, 2, 28))
        );
        assert_eq!(Period::ThisYear.range(today), DateRange::new(d(2026, 1, 1), today));
        assert_eq!(
            Period::LastYear.range(today),
            DateRange::new(d(2025, 1, 1), d(2025, 12, 31))
        );
        assert_eq!(Period::Yesterday.range(d(2026, 1, 1)), DateRange::day(d(2025, 12, 31)));
    }

    #[test]
    fn totals_respect_inclusive_bounds() {
        let history = History::from_json(
            r#"{"2026-10-09":100,"2026-10-10":3,"2026-10-12":{"4":2,"30":5},"2026-10-14":1,"junk":50}"#,
        )
        .unwrap();
        let range = DateRange::new(d(2026, 10, 10), d(2026, 10, 14));
        assert_eq!(total_minutes_in_range(&history, range), 11);
        assert_eq!(total_minutes_in_range(&History::new(), range), 0);
    }
}
