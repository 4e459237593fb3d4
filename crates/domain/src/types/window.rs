//! Inclusive date window used to filter every time-bearing dataset

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{DashboardError, Result};

/// Inclusive `[start, end]` calendar-date range.
///
/// A `DateWindow` can only be built through [`DateWindow::new`], so holding
/// one proves `start <= end`. Deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawDateWindow")]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateWindow> for DateWindow {
    type Error = DashboardError;

    fn try_from(raw: RawDateWindow) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl DateWindow {
    /// Build a window, refusing `start > end`.
    ///
    /// # Errors
    /// Returns `DashboardError::InvalidWindow` when the start date falls after
    /// the end date.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window covering a single day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// First day of `today`'s month through `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        let start = today.with_day(1).unwrap_or(today);
        Self { start, end: today }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` lies inside the window, bounds included.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether `timestamp` falls on any day of the window. The end day is
    /// covered up to its last instant.
    pub fn contains_timestamp(&self, timestamp: NaiveDateTime) -> bool {
        self.contains_date(timestamp.date())
    }

    /// Number of calendar days covered, bounds included.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Human-readable period, e.g. `01/08/2025 a 31/08/2025`.
    pub fn label(&self) -> String {
        format!("{} a {}", self.start.format("%d/%m/%Y"), self.end.format("%d/%m/%Y"))
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_start_after_end() {
        let err = DateWindow::new(date(2025, 8, 2), date(2025, 8, 1)).unwrap_err();
        assert_eq!(
            err,
            DashboardError::InvalidWindow { start: date(2025, 8, 2), end: date(2025, 8, 1) }
        );
    }

    #[test]
    fn test_accepts_single_day() {
        let window = DateWindow::new(date(2025, 8, 1), date(2025, 8, 1)).unwrap();
        assert_eq!(window.day_count(), 1);
        assert_eq!(window, DateWindow::single_day(date(2025, 8, 1)));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let window = DateWindow::new(date(2025, 8, 1), date(2025, 8, 31)).unwrap();
        assert!(window.contains_date(date(2025, 8, 1)));
        assert!(window.contains_date(date(2025, 8, 31)));
        assert!(!window.contains_date(date(2025, 7, 31)));
        assert!(!window.contains_date(date(2025, 9, 1)));

        let last_instant = date(2025, 8, 31).and_hms_opt(23, 59, 59).unwrap();
        let next_midnight = date(2025, 9, 1).and_hms_opt(0, 0, 0).unwrap();
        assert!(window.contains_timestamp(last_instant));
        assert!(!window.contains_timestamp(next_midnight));
    }

    #[test]
    fn test_month_to_date() {
        let window = DateWindow::month_to_date(date(2025, 8, 17));
        assert_eq!(window.start(), date(2025, 8, 1));
        assert_eq!(window.end(), date(2025, 8, 17));
        assert_eq!(window.day_count(), 17);
    }

    #[test]
    fn test_label() {
        let window = DateWindow::new(date(2025, 8, 1), date(2025, 8, 31)).unwrap();
        assert_eq!(window.label(), "01/08/2025 a 31/08/2025");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: DateWindow =
            serde_json::from_str(r#"{"start":"2025-08-01","end":"2025-08-31"}"#).unwrap();
        assert_eq!(ok.end(), date(2025, 8, 31));

        let bad = serde_json::from_str::<DateWindow>(r#"{"start":"2025-09-01","end":"2025-08-31"}"#);
        assert!(bad.is_err());
    }
}
