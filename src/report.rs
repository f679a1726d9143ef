//! Final result of a run and the exact average computation.

use crate::combiners::AggregationState;
use crate::query::Query;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use serde::{Serialize, Serializer};
use std::fmt;

/// Fractional digits kept in an [`AverageDelay`].
pub const SCALE: u32 = 2;

/// Divide `sum` by `count`, keeping `scale` fractional digits, rounding
/// half away from zero.
///
/// The quotient is returned scaled by `10^scale` (e.g. `3.05` with scale 2
/// is `305`). A zero `count` yields zero.
#[must_use]
pub fn round_half_up(sum: &BigInt, count: &BigUint, scale: u32) -> BigInt {
    if count.is_zero() {
        return BigInt::zero();
    }
    // floor((2 * |sum| * 10^scale + count) / (2 * count)) rounds the magnitude half up.
    let factor = BigUint::from(10u32).pow(scale);
    let numerator = sum.magnitude() * &factor * 2u32 + count;
    let denominator = count * 2u32;
    BigInt::from_biguint(sum.sign(), numerator / denominator)
}

/// Average arrival delay in minutes with exactly two fractional digits.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AverageDelay {
    hundredths: BigInt,
}

impl AverageDelay {
    /// Exact average of `state`, `0.00` when no row was valid.
    #[must_use]
    pub fn of(state: &AggregationState) -> Self {
        Self {
            hundredths: round_half_up(state.delay_sum(), state.valid_records(), SCALE),
        }
    }

    #[must_use]
    pub fn from_hundredths(hundredths: impl Into<BigInt>) -> Self {
        Self {
            hundredths: hundredths.into(),
        }
    }

    /// Value scaled by 100.
    #[must_use]
    pub fn hundredths(&self) -> &BigInt {
        &self.hundredths
    }

    /// Nearest `f64`; lossy for large magnitudes.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for AverageDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = format!("{:0>3}", self.hundredths.magnitude().to_string());
        let (whole, frac) = digits.split_at(digits.len() - SCALE as usize);
        let sign = if self.hundredths.sign() == Sign::Minus { "-" } else { "" };
        write!(f, "{sign}{whole}.{frac}")
    }
}

impl Serialize for AverageDelay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of one successful run.
///
/// Counts and the average serialize as decimal strings so JSON consumers
/// receive them without precision loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelayReport {
    pub year: u16,
    pub airport_code: String,
    #[serde(serialize_with = "as_decimal_string")]
    pub all_records: BigUint,
    #[serde(serialize_with = "as_decimal_string")]
    pub valid_records: BigUint,
    pub average_delay: AverageDelay,
}

fn as_decimal_string<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Turn the totals of a finished aggregation into a report for `query`.
#[must_use]
pub fn finalize(state: AggregationState, query: &Query) -> DelayReport {
    let average_delay = AverageDelay::of(&state);
    let (all_records, valid_records, _) = state.into_parts();
    DelayReport {
        year: query.year(),
        airport_code: query.airport_code().to_string(),
        all_records,
        valid_records,
        average_delay,
    }
}

impl fmt::Display for DelayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "year:           {}", self.year)?;
        writeln!(f, "airport:        {}", self.airport_code)?;
        writeln!(f, "all records:    {}", self.all_records)?;
        writeln!(f, "valid records:  {}", self.valid_records)?;
        write!(f, "average delay:  {} min", self.average_delay)
    }
}
