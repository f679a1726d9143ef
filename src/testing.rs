//! Testing utilities for delay pipelines.
//!
//! This module provides fixtures and in-memory transports so the whole
//! pipeline can be exercised without a network:
//!
//! - **Fixtures**: build bzip2 archives from CSV text ([`compress_csv`], [`sample_csv`])
//! - **Transports**: serve a fixed payload ([`StaticTransport`]), fail every
//!   request ([`FailingTransport`]), or count requests ([`RecordingTransport`])
//!
//! # Quick Start
//!
//! ```
//! use flightdelay::testing::*;
//! use flightdelay::{Config, DelayPipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let archive = compress_csv(&sample_csv())?;
//! let pipeline = DelayPipeline::with_transport(Config::default(), StaticTransport::new(archive));
//!
//! let report = pipeline.compute(1989, "LAX")?;
//! assert_eq!(report.average_delay.to_string(), "3.00");
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
pub mod transports;

pub use fixtures::*;
pub use transports::*;
