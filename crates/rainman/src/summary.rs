//! Human-readable rainfall summary.
//!
//! Built only from the read-only series, one block per year with monthly and
//! yearly totals in inches.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::calendar::month_name;
use crate::error::{Error, Result};
use crate::series::RainfallSeries;
use crate::storage::RecordStore;

/// Totals for one month entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthTotals {
    /// Days with nonzero rainfall.
    pub wet_days: usize,
    /// Sum of all days, in inches.
    pub inches: f64,
}

impl MonthTotals {
    /// Compute totals for a month's daily values.
    #[must_use]
    pub fn from_days(days: &[f64]) -> Self {
        Self {
            wet_days: days.iter().filter(|&&d| d > 0.0).count(),
            inches: days.iter().sum(),
        }
    }
}

/// Render the summary for `location`.
#[must_use]
pub fn render(location: &str, series: &RainfallSeries) -> String {
    let mut out = format!("Rainfall summary for {location}\n");
    if series.is_empty() {
        out.push_str("\nNo records.\n");
        return out;
    }

    for year in series.years() {
        let _ = write!(out, "\n{year}\n");
        let mut year_wet = 0;
        let mut year_inches = 0.0;

        for month in series.months(year) {
            let Some(days) = series.get(year, month) else {
                continue;
            };
            let totals = MonthTotals::from_days(days);
            year_wet += totals.wet_days;
            year_inches += totals.inches;

            let name = month_name(month).unwrap_or("???");
            let _ = writeln!(
                out,
                "  {name:<5} {:>3} wet day(s) {:>8.2} in",
                totals.wet_days, totals.inches
            );
        }

        let _ = writeln!(
            out,
            "  {:<5} {year_wet:>3} wet day(s) {year_inches:>8.2} in",
            "TOTAL"
        );
    }
    out
}

/// Write the summary for `store` to its summary file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_summary(store: &RecordStore) -> Result<PathBuf> {
    let path = store.paths().summary.clone();
    let report = render(store.location(), store.series());
    fs::write(&path, report).map_err(|e| Error::io(&path, e))?;
    info!("Wrote summary to {}", path.display());
    Ok(path)
}
