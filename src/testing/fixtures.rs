//! Pre-built archives and tables for common testing scenarios.

use bzip2::write::BzEncoder;
use bzip2::Compression;
use std::io::{self, Write};

/// Header line of the minimal three-column table.
pub const SAMPLE_HEADER: &str = "Dest,Cancelled,ArrDelay";

/// Four flights, two of them valid arrivals into `LAX` (delays 10 and -4).
///
/// # Example
///
/// ```
/// use flightdelay::testing::sample_csv;
///
/// assert!(sample_csv().starts_with("Dest,Cancelled,ArrDelay"));
/// ```
#[must_use]
pub fn sample_csv() -> String {
    csv_table(SAMPLE_HEADER, &["LAX,0,10", "LAX,0,-4", "LAX,1,99", "JFK,0,5"])
}

/// Join a header and data lines into CSV text with a trailing newline.
#[must_use]
pub fn csv_table(header: &str, rows: &[&str]) -> String {
    let mut out = String::with_capacity(header.len() + rows.iter().map(|r| r.len() + 1).sum::<usize>() + 1);
    out.push_str(header);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

/// bzip2-compress `text` into an in-memory archive.
///
/// # Errors
///
/// Returns an error if the encoder fails.
pub fn compress_csv(text: &str) -> io::Result<Vec<u8>> {
    compress_bytes(text.as_bytes())
}

/// bzip2-compress raw bytes, for tables that are not valid UTF-8.
///
/// # Errors
///
/// Returns an error if the encoder fails.
pub fn compress_bytes(bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = BzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}

/// A valid archive of `text` cut to half its length.
///
/// # Errors
///
/// Returns an error if the encoder fails.
pub fn truncated_archive(text: &str) -> io::Result<Vec<u8>> {
    let mut archive = compress_csv(text)?;
    archive.truncate(archive.len() / 2);
    Ok(archive)
}
