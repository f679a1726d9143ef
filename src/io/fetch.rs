//! Retrieval of the yearly archive into transient local storage.
//!
//! The network side sits behind the synchronous [`Transport`] trait so the
//! pipeline can be driven by [`HttpTransport`] in production and by in-memory
//! transports in tests.
//!
//! The local copy is a [`FetchedArchive`] backed by a uniquely named
//! [`NamedTempFile`]. Its lifetime is the lifetime of the value: dropping it on
//! any exit path, including a failed transfer, removes the file.

use crate::config::Config;
use crate::error::{BoxError, DelayError, Result};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failure reported by a [`Transport`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("server answered with status {code}")]
    Status { code: u16 },

    #[error("transfer failed")]
    Network(#[source] BoxError),

    #[error("transfer interrupted")]
    Io(#[from] io::Error),
}

/// Blocking byte source for a retrieval address.
///
/// Implementations own their timeout policy; a call must fail rather than
/// block indefinitely.
pub trait Transport: Send + Sync {
    /// Open the resource at `url` and return its body as a reader.
    ///
    /// # Errors
    /// Returns [`TransportError::Status`] for a non-success response and
    /// [`TransportError::Network`] for connection or protocol failures.
    fn get(&self, url: &str) -> std::result::Result<Box<dyn Read + Send>, TransportError>;
}

/// Plain HTTP GET with bounded connect and read timeouts and an overall
/// deadline on the transfer.
///
/// The deadline starts when the request is issued and also bounds reads from
/// the returned body, so a server trickling bytes cannot hold a run open.
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout_read(config.read_timeout)
            .timeout(config.transfer_timeout)
            .build();
        Self { agent }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> std::result::Result<Box<dyn Read + Send>, TransportError> {
        match self.agent.get(url).call() {
            Ok(response) => Ok(Box::new(response.into_reader())),
            Err(ureq::Error::Status(code, _)) => Err(TransportError::Status { code }),
            Err(err) => Err(TransportError::Network(Box::new(err))),
        }
    }
}

/// Archive downloaded to a temporary file, deleted when dropped.
#[derive(Debug)]
pub struct FetchedArchive {
    file: NamedTempFile,
    len: u64,
}

impl FetchedArchive {
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of bytes written to local storage.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Independent read handle positioned at the start of the archive.
    ///
    /// # Errors
    /// Returns an error if the file can no longer be opened.
    pub fn open(&self) -> io::Result<File> {
        self.file.reopen()
    }

    /// Delete the file now and report whether removal succeeded.
    ///
    /// # Errors
    /// Returns the I/O error of the removal; the file handle is released
    /// either way.
    pub fn close(self) -> io::Result<()> {
        self.file.close()
    }
}

/// Download `url` into a fresh temporary file.
///
/// `label` becomes part of the file name prefix to make stray files
/// attributable; characters outside `[A-Za-z0-9_-]` are dropped from it.
///
/// # Errors
/// [`DelayError::Download`] wrapping the transport or storage failure. The
/// partially written file has already been removed when this returns.
pub fn fetch<T>(transport: &T, url: &str, label: &str, config: &Config) -> Result<FetchedArchive>
where
    T: Transport + ?Sized,
{
    let prefix = format!("{}_", sanitize(label));
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".csv.bz2");
    let mut file = match &config.temp_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| DelayError::download(url, e))?;

    info!(%url, "downloading dataset");
    debug!(path = %file.path().display(), "temporary archive");

    match copy_body(transport, url, file.as_file_mut()) {
        Ok(len) => {
            info!(%url, bytes = len, "download finished");
            Ok(FetchedArchive { file, len })
        }
        Err(err) => {
            warn!(%url, error = %err, "download failed");
            // Dropping the handle removes the partial file before the error surfaces.
            drop(file);
            Err(DelayError::download(url, err))
        }
    }
}

fn copy_body<T>(transport: &T, url: &str, out: &mut File) -> std::result::Result<u64, TransportError>
where
    T: Transport + ?Sized,
{
    let mut body = transport.get(url)?;
    let mut writer = BufWriter::new(out);
    let len = io::copy(&mut body, &mut writer)?;
    writer.flush()?;
    Ok(len)
}

fn sanitize(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
