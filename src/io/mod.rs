//! Dataset I/O: retrieval, decompression and record reading.
//!
//! - [`fetch`] downloads the archive into transient local storage
//! - [`compression`] turns the archive into a decompressed byte stream
//! - [`csv`] reads that stream as a headed CSV table, one row at a time

pub mod compression;
pub mod csv;
pub mod fetch;
