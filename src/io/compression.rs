//! Streaming decompression of the fetched archive.
//!
//! The dataset is published in exactly one compressed layout, bzip2. The
//! [`CompressionCodec`] trait keeps the codec behind a small seam: it names the
//! format, declares the signature the payload must start with, and wraps a
//! reader with a forward-only decoder.
//!
//! ## Failure model
//! A payload that does not start with the codec's magic bytes is rejected
//! before any decoding. Corruption further in, including truncation, surfaces
//! from the returned reader as an `io::Error` while it is consumed; the record
//! reader maps those to [`DelayError::Decompression`].
//!
//! Decoding ends with the first bzip2 stream. Anything after it, a second
//! concatenated stream or trailing bytes, is not read.

use crate::error::{DelayError, Result};
use crate::io::fetch::FetchedArchive;
use std::io::{BufRead, BufReader, Read};
use tracing::info;

/// Pluggable streaming decoder.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so a pipeline holding one can be
/// moved across threads between runs.
pub trait CompressionCodec: Send + Sync {
    /// Human-readable codec name (e.g., "bzip2").
    fn name(&self) -> &str;

    /// Byte signature every valid payload starts with.
    fn magic_bytes(&self) -> &[u8];

    /// Wrap a reader with a decoder.
    ///
    /// Takes ownership of the input reader and returns a boxed trait object
    /// that transparently decompresses the stream.
    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> Box<dyn Read>;
}

/// bzip2, the layout of the yearly flight archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bzip2Codec;

impl CompressionCodec for Bzip2Codec {
    fn name(&self) -> &str {
        "bzip2"
    }

    fn magic_bytes(&self) -> &[u8] {
        b"BZh"
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> Box<dyn Read> {
        use bzip2::read::BzDecoder;
        Box::new(BzDecoder::new(reader))
    }
}

/// Check the signature of `reader` without consuming it, then wrap it with
/// `codec`'s decoder.
///
/// # Errors
/// [`DelayError::Decompression`] if the signature cannot be read or does not
/// match.
pub fn decompress<R, C>(reader: R, codec: &C) -> Result<Box<dyn Read>>
where
    R: Read + 'static,
    C: CompressionCodec + ?Sized,
{
    let mut buffered = BufReader::new(reader);
    let head = buffered.fill_buf().map_err(DelayError::decompression)?;
    let magic = codec.magic_bytes();
    if !head.starts_with(magic) {
        let reason = if head.is_empty() {
            "archive is empty".to_string()
        } else {
            format!("archive does not start with the {} signature", codec.name())
        };
        return Err(DelayError::decompression(reason));
    }
    Ok(codec.wrap_reader_dyn(Box::new(buffered)))
}

/// Open `archive` for sequential reading through `codec`.
///
/// # Errors
/// [`DelayError::Decompression`] if the file cannot be reopened or is not in
/// `codec`'s format.
pub fn open_archive<C>(archive: &FetchedArchive, codec: &C) -> Result<Box<dyn Read>>
where
    C: CompressionCodec + ?Sized,
{
    info!(codec = codec.name(), "decompressing dataset");
    let file = archive.open().map_err(DelayError::decompression)?;
    decompress(file, codec)
}
