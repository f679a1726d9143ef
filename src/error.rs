//! Failure kinds of a delay computation.
//!
//! Every stage of the pipeline either produces its output or fails with
//! exactly one [`DelayError`] variant. The wrapped low-level cause stays
//! reachable through [`std::error::Error::source`] for diagnostics.

use thiserror::Error;

/// Boxed cause carried by the wrapping variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DelayError>;

#[derive(Debug, Error)]
pub enum DelayError {
    /// The query was rejected before any I/O took place.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The dataset could not be retrieved.
    #[error("error occurred while downloading {url}")]
    Download {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The retrieved bytes are not a valid compressed stream.
    #[error("a decompression related error occurred while reading the dataset")]
    Decompression {
        #[source]
        source: BoxError,
    },

    /// The decompressed text is not the expected tabular layout.
    #[error("error occurred while reading the dataset: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

/// Fieldless tag of a [`DelayError`], for callers that only branch on the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    Download,
    Decompression,
    Parse,
}

impl DelayError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn download(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Download {
            url: url.into(),
            source: source.into(),
        }
    }

    pub(crate) fn decompression(source: impl Into<BoxError>) -> Self {
        Self::Decompression {
            source: source.into(),
        }
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn parse_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Parse {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Download { .. } => ErrorKind::Download,
            Self::Decompression { .. } => ErrorKind::Decompression,
            Self::Parse { .. } => ErrorKind::Parse,
        }
    }
}

/// Splits a `csv` failure between the two stages it can come from.
///
/// Reader I/O errors originate in the decompressor underneath the CSV layer,
/// everything else is a structural problem with the text itself.
impl From<csv::Error> for DelayError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            return Self::decompression(err);
        }
        let message = match err.position() {
            Some(pos) => format!("malformed record at line {}", pos.line()),
            None => "malformed record".to_string(),
        };
        Self::parse_with(message, err)
    }
}
