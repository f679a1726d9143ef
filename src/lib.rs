//! # flightdelay
//!
//! Average arrival delay of the flights into one airport during one year,
//! computed from the yearly bzip2-compressed CSV archives of the ASA Data Expo
//! 2009 airline on-time dataset.
//!
//! ## Quick Start
//!
//! ```no_run
//! use flightdelay::{Config, DelayPipeline};
//! # fn main() -> flightdelay::Result<()> {
//! let pipeline = DelayPipeline::new(Config::default());
//! let report = pipeline.compute(1989, "LAX")?;
//! println!("{} of {} rows usable, average {}", report.valid_records, report.all_records, report.average_delay);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! One run is a single forward pass with bounded memory:
//!
//! 1. [`Query::new`] validates the year (1987 to 2008) and the airport code
//!    before any I/O.
//! 2. [`locate`] derives `<base_url>/<year>.csv.bz2`.
//! 3. [`io::fetch::fetch`] downloads it into a temporary file under connect
//!    and read timeouts.
//! 4. [`io::compression::open_archive`] wraps the file in a streaming bzip2
//!    decoder.
//! 5. [`io::csv::parse`] reads the header and yields rows lazily.
//! 6. [`combiners::aggregate`] counts every row and sums the integer delays
//!    of non-cancelled flights into the airport.
//! 7. [`report::finalize`] divides exactly and rounds half away from zero to
//!    two decimals.
//!
//! The temporary file is removed on every exit path.
//!
//! ## Errors
//!
//! Failures are one of four [`DelayError`] kinds: invalid argument, download,
//! decompression, parse. Rows with a malformed delay are skipped, not reported.
//!
//! ## Module Overview
//!
//! - [`query`] - Query validation and address derivation
//! - [`config`] - Base URL, timeouts and temp directory
//! - [`io`] - Fetching, decompression and CSV reading
//! - [`combiners`] - Row aggregation
//! - [`report`] - Exact average and the final report
//! - [`pipeline`] - The stages wired together
//! - [`testing`] - Fixtures and in-memory transports

pub mod combiners;
pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod query;
pub mod report;
pub mod testing;

// General re-exports
pub use combiners::{aggregate, AggregationState, ArrivalDelay, CombineFn};
pub use config::Config;
pub use error::{DelayError, ErrorKind, Result};
pub use io::fetch::{HttpTransport, Transport, TransportError};
pub use pipeline::{average_delay, average_delay_with, DelayPipeline};
pub use query::{locate, Query, SUPPORTED_YEARS};
pub use report::{finalize, AverageDelay, DelayReport};
