//! Query validation and source location.
//!
//! A [`Query`] can only be obtained through validation, so every value of the
//! type already satisfies the year range and non-empty airport invariants.
//! Validation performs no I/O and always runs before the fetch stage.

use crate::error::{DelayError, Result};
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;

/// First year published in the dataset.
pub const FIRST_YEAR: u16 = 1987;
/// Last year published in the dataset.
pub const LAST_YEAR: u16 = 2008;
/// Every year a query may ask for.
pub const SUPPORTED_YEARS: RangeInclusive<u16> = FIRST_YEAR..=LAST_YEAR;

/// Validated `(year, airport)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Query {
    year: u16,
    airport_code: String,
}

impl Query {
    /// Validate a numeric year and an airport code.
    ///
    /// The airport code is trimmed; matching against the dataset stays
    /// case-sensitive, so no case folding happens here.
    ///
    /// # Errors
    /// [`DelayError::InvalidArgument`] when the year is outside
    /// [`SUPPORTED_YEARS`] or the trimmed code is empty.
    pub fn new(year: i64, airport_code: impl AsRef<str>) -> Result<Self> {
        let year = u16::try_from(year)
            .ok()
            .filter(|y| SUPPORTED_YEARS.contains(y))
            .ok_or_else(|| DelayError::invalid_argument(format!("year {year} is out of range")))?;

        let airport_code = airport_code.as_ref().trim();
        if airport_code.is_empty() {
            return Err(DelayError::invalid_argument("airport code must not be empty"));
        }

        Ok(Self {
            year,
            airport_code: airport_code.to_string(),
        })
    }

    /// Validate raw, possibly missing, text input as collected by a form or a
    /// command line.
    ///
    /// # Errors
    /// [`DelayError::InvalidArgument`] when either input is absent, the year is
    /// not a decimal integer, or [`Query::new`] rejects the values.
    pub fn parse(year: Option<&str>, airport_code: Option<&str>) -> Result<Self> {
        let year = year.ok_or_else(|| DelayError::invalid_argument("year is missing"))?;
        let year = year.trim().parse::<i64>().map_err(|_| {
            DelayError::invalid_argument(format!("year {:?} is not a number", year.trim()))
        })?;
        let airport_code =
            airport_code.ok_or_else(|| DelayError::invalid_argument("airport code is missing"))?;
        Self::new(year, airport_code)
    }

    #[must_use]
    pub fn year(&self) -> u16 {
        self.year
    }

    #[must_use]
    pub fn airport_code(&self) -> &str {
        &self.airport_code
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} into {}", self.year, self.airport_code)
    }
}

/// Retrieval address of the dataset for `year` under `base_url`.
///
/// Trailing slashes on the base are ignored so `http://host/dir` and
/// `http://host/dir/` locate the same file.
#[must_use]
pub fn locate(base_url: &str, year: u16) -> String {
    format!("{}/{year}.csv.bz2", base_url.trim_end_matches('/'))
}
