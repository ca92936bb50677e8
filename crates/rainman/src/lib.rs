//! `rainman` - Per-location daily rainfall records
//!
//! This library keeps a sparse year/month/day series of rainfall amounts for a
//! location and persists it as a binary snapshot plus a delimited text copy.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod calendar;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod series;
pub mod storage;
pub mod summary;

pub use calendar::{length_month, month_name};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use series::RainfallSeries;
pub use storage::{LoadSource, RecordStore, StorePaths};
