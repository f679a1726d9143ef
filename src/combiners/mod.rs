//! Combiners folding a row stream into an accumulator.
//!
//! A combiner specifies its input type (`V`), accumulator type (`A`) and
//! output type (`O`). Accumulators built independently (for example from two
//! archives) can be merged before finishing.
//!
//! - [`ArrivalDelay`] -- counts rows and sums the arrival delay of eligible
//!   flights into one airport.
//!
//! # Examples
//! ```
//! use flightdelay::combiners::{ArrivalDelay, CombineFn, DelayColumns};
//! use flightdelay::io::csv::parse;
//! use flightdelay::Query;
//!
//! # fn main() -> flightdelay::Result<()> {
//! let text = "Dest,Cancelled,ArrDelay\nLAX,0,10\nLAX,0,-4\n";
//! let table = parse(text.as_bytes())?;
//! let columns = DelayColumns::resolve(&table)?;
//! let comb = ArrivalDelay::new(Query::new(1989, "LAX")?, columns);
//!
//! let mut acc = comb.create();
//! for row in table {
//!     comb.add_input(&mut acc, row?);
//! }
//! assert_eq!(acc.delay_sum().to_string(), "6");
//! # Ok(())
//! # }
//! ```

mod delay;

pub use delay::{
    aggregate, parse_delay, AggregationState, ArrivalDelay, DelayColumns, ARR_DELAY_COLUMN,
    CANCELLED_COLUMN, DEST_COLUMN,
};

/// Incremental aggregation over values of type `V`.
pub trait CombineFn<V, A, O>: Send + Sync {
    /// Fresh, empty accumulator.
    fn create(&self) -> A;

    /// Fold one input into `acc`.
    fn add_input(&self, acc: &mut A, v: V);

    /// Fold another accumulator into `acc`.
    fn merge(&self, acc: &mut A, other: A);

    /// Turn a final accumulator into the output.
    fn finish(&self, acc: A) -> O;
}
