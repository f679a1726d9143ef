//! In-memory [`Transport`] implementations.

use crate::io::fetch::{Transport, TransportError};
use std::io::{self, Cursor, Read};
use std::sync::Mutex;

/// Serves the same payload for every address.
#[derive(Debug, Clone)]
pub struct StaticTransport {
    payload: Vec<u8>,
}

impl StaticTransport {
    #[must_use]
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }
}

impl Transport for StaticTransport {
    fn get(&self, _url: &str) -> Result<Box<dyn Read + Send>, TransportError> {
        Ok(Box::new(Cursor::new(self.payload.clone())))
    }
}

/// How a [`FailingTransport`] fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Refuse the request with an HTTP status.
    Status(u16),
    /// Fail before any byte arrives.
    Connect(String),
    /// Deliver these bytes, then break the connection.
    Interrupted(Vec<u8>),
}

/// Fails every request the same way.
#[derive(Debug, Clone)]
pub struct FailingTransport {
    failure: Failure,
}

impl FailingTransport {
    #[must_use]
    pub fn new(failure: Failure) -> Self {
        Self { failure }
    }
}

impl Transport for FailingTransport {
    fn get(&self, _url: &str) -> Result<Box<dyn Read + Send>, TransportError> {
        match &self.failure {
            Failure::Status(code) => Err(TransportError::Status { code: *code }),
            Failure::Connect(msg) => Err(TransportError::Network(msg.clone().into())),
            Failure::Interrupted(prefix) => Ok(Box::new(
                Cursor::new(prefix.clone()).chain(BrokenPipe),
            )),
        }
    }
}

struct BrokenPipe;

impl Read for BrokenPipe {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::TimedOut, "read timed out"))
    }
}

/// Wraps another transport and records every requested address.
#[derive(Debug)]
pub struct RecordingTransport<T> {
    inner: T,
    urls: Mutex<Vec<String>>,
}

impl<T> RecordingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            urls: Mutex::new(Vec::new()),
        }
    }

    /// Addresses requested so far, in order.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().map(|u| u.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.urls().len()
    }
}

impl<T: Transport> Transport for RecordingTransport<T> {
    fn get(&self, url: &str) -> Result<Box<dyn Read + Send>, TransportError> {
        if let Ok(mut urls) = self.urls.lock() {
            urls.push(url.to_string());
        }
        self.inner.get(url)
    }
}
