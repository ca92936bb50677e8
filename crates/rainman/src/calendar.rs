//! Gregorian calendar helpers.
//!
//! Month numbers are 1-based throughout the crate.

use crate::error::{Error, Result};

/// Three-letter month abbreviations, `MONTH_NAMES[0]` is January.
pub const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Whether `year` is a Gregorian leap year.
#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`.
///
/// # Errors
///
/// Returns [`Error::MonthOutOfRange`] if `month` is not in 1-12.
pub fn length_month(month: u32, year: i32) -> Result<usize> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Ok(31),
        4 | 6 | 9 | 11 => Ok(30),
        2 if is_leap_year(year) => Ok(29),
        2 => Ok(28),
        _ => Err(Error::MonthOutOfRange {
            month: i64::from(month),
        }),
    }
}

/// Abbreviated name for `month`, or `None` outside 1-12.
#[must_use]
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(index).copied()
}
