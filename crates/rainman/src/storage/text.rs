//! Delimited text form of a series.
//!
//! One line per month: `year,month,d1,d2,...,dN`, where N is the length of
//! that month. Older files separate fields with spaces instead of commas;
//! both are read transparently. Output is always comma separated.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::calendar::length_month;
use crate::error::{Error, Result};
use crate::series::RainfallSeries;

/// Parse one line into `(year, month, days)`.
///
/// The line must carry exactly `length_month(month, year) + 2` fields.
///
/// # Errors
///
/// Returns an error if a field is not a number, the month is outside 1-12, or
/// the number of day values does not match the month.
pub fn parse_line(line: &str) -> Result<(i32, u32, Vec<f64>)> {
    let tokens: Vec<&str> = line
        .trim_end_matches(['\r', '\n'])
        .split([',', ' '])
        .filter(|token| !token.is_empty())
        .collect();

    let [year, month, days @ ..] = tokens.as_slice() else {
        return Err(Error::parse(format!(
            "expected year and month, found {} field(s)",
            tokens.len()
        )));
    };

    let year: i32 = year
        .parse()
        .map_err(|_| Error::parse(format!("invalid year {year:?}")))?;
    let month: i64 = month
        .parse()
        .map_err(|_| Error::parse(format!("invalid month {month:?}")))?;
    let month = u32::try_from(month)
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or(Error::MonthOutOfRange { month })?;

    let expected = length_month(month, year)?;
    if days.len() != expected {
        return Err(Error::DayCount {
            year,
            month,
            expected,
            found: days.len(),
        });
    }

    let days = days
        .iter()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| Error::parse(format!("invalid rainfall amount {token:?}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((year, month, days))
}

/// Format one month entry as a comma separated line, without a newline.
#[must_use]
pub fn format_line(year: i32, month: u32, days: &[f64]) -> String {
    let mut line = format!("{year},{month}");
    for day in days {
        // `{:?}` keeps the decimal point on whole numbers and round-trips.
        let _ = write!(line, ",{day:?}");
    }
    line
}

/// Read a whole series from the delimited file at `path`.
///
/// Blank lines are skipped. Any bad line aborts the read.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any line is invalid. Line
/// errors carry the 1-based line number.
pub fn read_records(path: &Path) -> Result<RainfallSeries> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::new(file);

    let mut series = RainfallSeries::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }

        let line_no = index + 1;
        let (year, month, days) = parse_line(&line).map_err(|e| e.at_line(path, line_no))?;
        series
            .insert_month(year, month, days)
            .map_err(|e| e.at_line(path, line_no))?;
    }

    debug!(
        "Read {} month(s) from {}",
        series.month_count(),
        path.display()
    );
    Ok(series)
}

/// Rewrite the delimited file at `path` from scratch.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_records(path: &Path, series: &RainfallSeries) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);

    for (year, month, days) in series.iter() {
        writeln!(writer, "{}", format_line(year, month, days)).map_err(|e| Error::io(path, e))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;

    debug!(
        "Wrote {} month(s) to {}",
        series.month_count(),
        path.display()
    );
    Ok(())
}
