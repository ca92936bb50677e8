//! The rainfall series held by a record store.
//!
//! A series maps year → month → one value per day of that month, in inches.
//! Every month entry has exactly [`length_month`] values; days that were never
//! recorded hold `0.0`.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calendar::length_month;
use crate::error::{Error, Result};

/// Daily rainfall amounts for one location, keyed by year then month.
///
/// Iteration is ascending by year, then month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RainfallSeries {
    years: BTreeMap<i32, BTreeMap<u32, Vec<f64>>>,
}

impl RainfallSeries {
    /// Create an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no month has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Number of (year, month) entries.
    #[must_use]
    pub fn month_count(&self) -> usize {
        self.years.values().map(BTreeMap::len).sum()
    }

    /// Years with at least one month entry, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    /// Months recorded for `year`, ascending.
    pub fn months(&self, year: i32) -> impl Iterator<Item = u32> + '_ {
        self.years
            .get(&year)
            .into_iter()
            .flat_map(|months| months.keys().copied())
    }

    /// Daily values for one month, indexed by day-of-month minus one.
    #[must_use]
    pub fn get(&self, year: i32, month: u32) -> Option<&[f64]> {
        self.years
            .get(&year)
            .and_then(|months| months.get(&month))
            .map(Vec::as_slice)
    }

    /// Value for a single 0-based day slot.
    #[must_use]
    pub fn day(&self, year: i32, month: u32, day: usize) -> Option<f64> {
        self.get(year, month).and_then(|days| days.get(day).copied())
    }

    /// Every month entry as `(year, month, days)`, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (i32, u32, &[f64])> + '_ {
        self.years.iter().flat_map(|(&year, months)| {
            months
                .iter()
                .map(move |(&month, days)| (year, month, days.as_slice()))
        })
    }

    /// Record `amount` for the 0-based `day` of `month` in `year`.
    ///
    /// Missing year and month entries are created, zero-filled to the month's
    /// length. A `day` outside the month, or outside an existing entry that
    /// was loaded short, is ignored and leaves the series untouched. Returns
    /// whether a value was written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MonthOutOfRange`] if `month` is not in 1-12.
    pub fn set_record(&mut self, year: i32, month: u32, day: i64, amount: f64) -> Result<bool> {
        let len = length_month(month, year)?;
        let Some(slot) = usize::try_from(day).ok().filter(|&d| d < len) else {
            trace!("Ignoring day {} for {}-{:02}", day, year, month);
            return Ok(false);
        };

        let days = self
            .years
            .entry(year)
            .or_default()
            .entry(month)
            .or_insert_with(|| vec![0.0; len]);
        match days.get_mut(slot) {
            Some(value) => {
                *value = amount;
                Ok(true)
            }
            None => {
                trace!("Ignoring day {} beyond stored {}-{:02}", day, year, month);
                Ok(false)
            }
        }
    }

    /// Insert a complete month entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the month is invalid, `days` has the wrong length,
    /// or the month is already present.
    pub(crate) fn insert_month(&mut self, year: i32, month: u32, days: Vec<f64>) -> Result<()> {
        let expected = length_month(month, year)?;
        if days.len() != expected {
            return Err(Error::DayCount {
                year,
                month,
                expected,
                found: days.len(),
            });
        }

        match self.years.entry(year).or_default().entry(month) {
            Entry::Occupied(_) => Err(Error::DuplicateMonth { year, month }),
            Entry::Vacant(slot) => {
                slot.insert(days);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let series = RainfallSeries::new();
        assert!(series.is_empty());
        assert_eq!(series.month_count(), 0);
        assert_eq!(series.years().count(), 0);
    }

    #[test]
    fn test_set_record_creates_zero_filled_month() {
        let mut series = RainfallSeries::new();
        assert!(series.set_record(2021, 2, 0, 0.5).unwrap());

        let days = series.get(2021, 2).unwrap();
        assert_eq!(days.len(), 28);
        assert!((days[0] - 0.5).abs() < f64::EPSILON);
        assert!(days[1..].iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_set_record_leap_february() {
        let mut series = RainfallSeries::new();
        series.set_record(2024, 2, 28, 1.25).unwrap();
        let days = series.get(2024, 2).unwrap();
        assert_eq!(days.len(), 29);
        assert_eq!(series.day(2024, 2, 28), Some(1.25));
    }

    #[test]
    fn test_set_record_keeps_existing_days() {
        let mut series = RainfallSeries::new();
        series.set_record(2021, 7, 3, 0.2).unwrap();
        series.set_record(2021, 7, 10, 0.9).unwrap();

        assert_eq!(series.day(2021, 7, 3), Some(0.2));
        assert_eq!(series.day(2021, 7, 10), Some(0.9));
        assert_eq!(series.month_count(), 1);
    }

    #[test]
    fn test_set_record_is_idempotent() {
        let mut once = RainfallSeries::new();
        once.set_record(2022, 5, 4, 0.33).unwrap();

        let mut twice = RainfallSeries::new();
        twice.set_record(2022, 5, 4, 0.33).unwrap();
        twice.set_record(2022, 5, 4, 0.33).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_set_record_out_of_range_day_is_ignored() {
        let mut series = RainfallSeries::new();
        series.set_record(2021, 4, 0, 0.1).unwrap();
        let before = series.clone();

        assert!(!series.set_record(2021, 4, -1, 9.0).unwrap());
        assert!(!series.set_record(2021, 4, 30, 9.0).unwrap());
        assert!(!series.set_record(2021, 2, 28, 9.0).unwrap());
        assert_eq!(series, before);
    }

    #[test]
    fn test_set_record_out_of_range_day_creates_nothing() {
        let mut series = RainfallSeries::new();
        series.set_record(1999, 1, 31, 1.0).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_set_record_short_stored_month() {
        let mut months = BTreeMap::new();
        months.insert(2, vec![0.0; 3]);
        let mut series = RainfallSeries {
            years: BTreeMap::from([(2021, months)]),
        };
        let before = series.clone();

        assert!(!series.set_record(2021, 2, 10, 1.0).unwrap());
        assert_eq!(series, before);
        assert!(series.set_record(2021, 2, 2, 1.0).unwrap());
        assert_eq!(series.day(2021, 2, 2), Some(1.0));
    }

    #[test]
    fn test_set_record_invalid_month() {
        let mut series = RainfallSeries::new();
        let err = series.set_record(2021, 13, 0, 1.0).unwrap_err();
        assert!(matches!(err, Error::MonthOutOfRange { month: 13 }));
        assert!(series.is_empty());
    }

    #[test]
    fn test_insert_month_rejects_wrong_length() {
        let mut series = RainfallSeries::new();
        let err = series.insert_month(2020, 2, vec![0.0; 27]).unwrap_err();
        assert!(matches!(
            err,
            Error::DayCount {
                expected: 29,
                found: 27,
                ..
            }
        ));
    }

    #[test]
    fn test_insert_month_rejects_duplicate() {
        let mut series = RainfallSeries::new();
        series.insert_month(2020, 3, vec![0.0; 31]).unwrap();
        let err = series.insert_month(2020, 3, vec![1.0; 31]).unwrap_err();
        assert!(matches!(err, Error::DuplicateMonth { year: 2020, month: 3 }));
        assert_eq!(series.day(2020, 3, 0), Some(0.0));
    }

    #[test]
    fn test_iter_is_sorted() {
        let mut series = RainfallSeries::new();
        series.set_record(2022, 3, 0, 1.0).unwrap();
        series.set_record(2021, 11, 0, 1.0).unwrap();
        series.set_record(2022, 1, 0, 1.0).unwrap();

        let keys: Vec<(i32, u32)> = series.iter().map(|(y, m, _)| (y, m)).collect();
        assert_eq!(keys, vec![(2021, 11), (2022, 1), (2022, 3)]);
        assert_eq!(series.years().collect::<Vec<_>>(), vec![2021, 2022]);
        assert_eq!(series.months(2022).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(series.months(1990).count(), 0);
    }

    #[test]
    fn test_serializes_as_nested_map() {
        let mut series = RainfallSeries::new();
        series.set_record(2021, 2, 0, 0.5).unwrap();
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["2021"]["2"][0], 0.5);
    }
}
