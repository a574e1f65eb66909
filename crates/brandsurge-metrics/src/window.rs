use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;

use brandsurge_core::Slice;

/// Length of the default reporting window, ending today.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// An inclusive calendar-day range used to filter a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    /// Fills missing bounds: `to` defaults to `today`, `from` to 30 days before `to`.
    /// Reversed bounds are swapped.
    #[must_use]
    pub fn resolve(from: Option<NaiveDate>, to: Option<NaiveDate>, today: NaiveDate) -> Self {
        let to = to.unwrap_or(today);
        let from = from.unwrap_or(to - TimeDelta::days(DEFAULT_WINDOW_DAYS));
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    #[must_use]
    pub fn apply<'a>(&self, slice: &Slice<'a>) -> Slice<'a> {
        slice.within(self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    #[test]
    fn defaults_to_last_thirty_days() {
        let window = DateWindow::resolve(None, None, d(10, 31));
        assert_eq!(window, DateWindow { from: d(10, 1), to: d(10, 31) });
    }

    #[test]
    fn explicit_bounds_are_kept() {
        let window = DateWindow::resolve(Some(d(1, 1)), Some(d(2, 1)), d(10, 31));
        assert_eq!(window, DateWindow { from: d(1, 1), to: d(2, 1) });
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let window = DateWindow::resolve(Some(d(3, 1)), Some(d(2, 1)), d(10, 31));
        assert_eq!(window, DateWindow { from: d(2, 1), to: d(3, 1) });
    }
}
