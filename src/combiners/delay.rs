//! Arrival delay aggregation for one destination airport.

use crate::combiners::CombineFn;
use crate::error::Result;
use crate::io::csv::{RawRow, TableReader};
use crate::query::Query;
use num_bigint::{BigInt, BigUint};
use std::io::Read;
use std::str::FromStr;
use tracing::info;

pub const DEST_COLUMN: &str = "Dest";
pub const CANCELLED_COLUMN: &str = "Cancelled";
pub const ARR_DELAY_COLUMN: &str = "ArrDelay";

/// Cancellation flag value of a flight that operated.
const NOT_CANCELLED: &str = "0";

/* ===================== AggregationState ===================== */

/// Running totals of one aggregation.
///
/// `valid_records <= all_records` holds after every mutation, and
/// `delay_sum` covers exactly the rows counted in `valid_records`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationState {
    all_records: BigUint,
    valid_records: BigUint,
    delay_sum: BigInt,
}

impl AggregationState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row read, eligible or not.
    #[must_use]
    pub fn all_records(&self) -> &BigUint {
        &self.all_records
    }

    /// Eligible rows whose delay parsed as an integer.
    #[must_use]
    pub fn valid_records(&self) -> &BigUint {
        &self.valid_records
    }

    /// Sum of the delays of the valid rows, in minutes.
    #[must_use]
    pub fn delay_sum(&self) -> &BigInt {
        &self.delay_sum
    }

    /// `(all_records, valid_records, delay_sum)`.
    #[must_use]
    pub fn into_parts(self) -> (BigUint, BigUint, BigInt) {
        (self.all_records, self.valid_records, self.delay_sum)
    }

    fn count_row(&mut self) {
        self.all_records += 1u32;
    }

    fn count_delay(&mut self, minutes: BigInt) {
        self.valid_records += 1u32;
        self.delay_sum += minutes;
    }

    fn absorb(&mut self, other: Self) {
        self.all_records += other.all_records;
        self.valid_records += other.valid_records;
        self.delay_sum += other.delay_sum;
    }
}

/* ===================== DelayColumns ===================== */

/// Resolved positions of the three columns the aggregation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayColumns {
    pub dest: usize,
    pub cancelled: usize,
    pub arr_delay: usize,
}

impl DelayColumns {
    /// Look the columns up in `table`'s header.
    ///
    /// # Errors
    /// [`DelayError::Parse`](crate::DelayError::Parse) naming the first missing
    /// column.
    pub fn resolve<R: Read>(table: &TableReader<R>) -> Result<Self> {
        let [dest, cancelled, arr_delay] =
            table.resolve([DEST_COLUMN, CANCELLED_COLUMN, ARR_DELAY_COLUMN])?;
        Ok(Self {
            dest,
            cancelled,
            arr_delay,
        })
    }
}

/* ===================== ArrivalDelay ===================== */

/// Row combiner for one query.
///
/// - Input: [`RawRow`]
/// - Accumulator: [`AggregationState`]
/// - Output: [`AggregationState`]
///
/// A row is eligible when its trimmed destination equals the query's airport
/// code exactly and its trimmed cancellation flag is `"0"`. Eligible rows with
/// an integer delay contribute to the valid count and the sum; every row
/// contributes to the total count.
#[derive(Debug, Clone)]
pub struct ArrivalDelay {
    query: Query,
    columns: DelayColumns,
}

impl ArrivalDelay {
    #[must_use]
    pub fn new(query: Query, columns: DelayColumns) -> Self {
        Self { query, columns }
    }

    #[must_use]
    pub fn query(&self) -> &Query {
        &self.query
    }

    fn is_eligible(&self, row: &RawRow) -> bool {
        row.field(self.columns.dest).trim() == self.query.airport_code()
            && row.field(self.columns.cancelled).trim() == NOT_CANCELLED
    }
}

impl CombineFn<RawRow, AggregationState, AggregationState> for ArrivalDelay {
    fn create(&self) -> AggregationState {
        AggregationState::new()
    }

    fn add_input(&self, acc: &mut AggregationState, row: RawRow) {
        acc.count_row();
        if !self.is_eligible(&row) {
            return;
        }
        if let Some(minutes) = parse_delay(&row.field(self.columns.arr_delay)) {
            acc.count_delay(minutes);
        }
    }

    fn merge(&self, acc: &mut AggregationState, other: AggregationState) {
        acc.absorb(other);
    }

    fn finish(&self, acc: AggregationState) -> AggregationState {
        acc
    }
}

/// Parse a delay field as a signed decimal integer.
///
/// Surrounding whitespace is ignored. Anything else than an optional sign
/// followed by ASCII digits (placeholders like `NA`, blanks, fractions) yields
/// `None`.
#[must_use]
pub fn parse_delay(text: &str) -> Option<BigInt> {
    let text = text.trim();
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match text.parse::<i64>() {
        Ok(v) => Some(BigInt::from(v)),
        Err(_) => BigInt::from_str(text).ok(),
    }
}

/// Fold every row of `table` into a fresh [`AggregationState`] for `query`.
///
/// The required columns are resolved before the first row is read.
///
/// # Errors
/// [`DelayError::Parse`](crate::DelayError::Parse) for a missing column or a
/// record the CSV reader cannot split,
/// [`DelayError::Decompression`](crate::DelayError::Decompression) when the
/// underlying stream fails mid-way. Malformed field contents, including bytes
/// that are not UTF-8, are never an error.
pub fn aggregate<R: Read>(table: TableReader<R>, query: &Query) -> Result<AggregationState> {
    let columns = DelayColumns::resolve(&table)?;
    let comb = ArrivalDelay::new(query.clone(), columns);
    info!(%query, "computing average delay");
    let mut acc = comb.create();
    for row in table {
        comb.add_input(&mut acc, row?);
    }
    Ok(comb.finish(acc))
}
