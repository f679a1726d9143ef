//! The end-to-end computation: validate, locate, fetch, decompress, parse,
//! aggregate, finalize.

use crate::combiners::{aggregate, AggregationState};
use crate::config::Config;
use crate::error::{DelayError, Result};
use crate::io::compression::{open_archive, Bzip2Codec};
use crate::io::csv::parse;
use crate::io::fetch::{fetch, FetchedArchive, HttpTransport, Transport};
use crate::query::{locate, Query};
use crate::report::{finalize, DelayReport};
use tracing::{info, warn};

/// Computes delay reports against one dataset location.
///
/// A pipeline holds no per-run state: each call to [`DelayPipeline::run`]
/// owns its own temporary archive and accumulator, so one pipeline can serve
/// any number of sequential or concurrent queries.
pub struct DelayPipeline<T = HttpTransport> {
    config: Config,
    transport: T,
    codec: Bzip2Codec,
}

impl DelayPipeline<HttpTransport> {
    /// Pipeline fetching over HTTP with the timeouts of `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let transport = HttpTransport::new(&config);
        Self::with_transport(config, transport)
    }
}

impl Default for DelayPipeline<HttpTransport> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<T: Transport> DelayPipeline<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            config,
            transport,
            codec: Bzip2Codec,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate the raw inputs, then [`run`](Self::run).
    ///
    /// Nothing touches the network when validation fails.
    ///
    /// # Errors
    /// Any [`DelayError`](crate::DelayError) kind.
    pub fn compute(&self, year: i64, airport_code: &str) -> Result<DelayReport> {
        let query = Query::new(year, airport_code)?;
        self.run(&query)
    }

    /// Compute the report for an already validated query.
    ///
    /// # Errors
    /// [`DelayError::Download`](crate::DelayError::Download),
    /// [`DelayError::Decompression`](crate::DelayError::Decompression) or
    /// [`DelayError::Parse`](crate::DelayError::Parse). The temporary archive
    /// is gone by the time this returns, whatever the outcome.
    pub fn run(&self, query: &Query) -> Result<DelayReport> {
        let url = locate(&self.config.base_url, query.year());
        let label = format!("{}_{}", query.year(), query.airport_code());
        let archive = fetch(&self.transport, &url, &label, &self.config)?;

        let outcome = self.process(&archive, query);
        release(archive);
        let state = outcome?;

        let report = finalize(state, query);
        info!(
            all_records = %report.all_records,
            valid_records = %report.valid_records,
            average_delay = %report.average_delay,
            "done"
        );
        Ok(report)
    }

    fn process(&self, archive: &FetchedArchive, query: &Query) -> Result<AggregationState> {
        let stream = open_archive(archive, &self.codec)?;
        let table = parse(stream)?;
        aggregate(table, query)
    }
}

fn release(archive: FetchedArchive) {
    let path = archive.path().to_path_buf();
    if let Err(err) = archive.close() {
        warn!(path = %path.display(), error = %err, "could not remove temporary archive");
    }
}

/// One-shot computation with the default configuration and environment
/// overrides.
///
/// # Errors
/// Any [`DelayError`] kind. An unusable environment override is reported as
/// [`DelayError::InvalidArgument`].
pub fn average_delay(year: i64, airport_code: &str) -> Result<DelayReport> {
    average_delay_with(year, airport_code, |key| std::env::var(key).ok())
}

/// [`average_delay`] with `FLIGHTDELAY_*` overrides taken from `lookup`
/// instead of the process environment.
///
/// The inputs are validated before `lookup` is consulted.
///
/// # Errors
/// See [`average_delay`].
pub fn average_delay_with(
    year: i64,
    airport_code: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<DelayReport> {
    let query = Query::new(year, airport_code)?;
    let config = Config::default()
        .apply_vars(lookup)
        .map_err(|e| DelayError::invalid_argument(format!("{e:#}")))?;
    DelayPipeline::new(config).run(&query)
}
