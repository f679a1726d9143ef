//! Header-driven CSV record reading.
//!
//! This module provides:
//! - [`Header`]: the column names of the first line and a name-to-position index
//! - [`RawRow`]: one data line, addressable by column name or resolved position
//! - [`TableReader`]: a lazy, forward-only iterator of [`RawRow`]s
//!
//! # Design notes
//! - Rows are read one at a time into fresh records; nothing is buffered beyond
//!   the `csv` reader's own input buffer.
//! - Records may be shorter or longer than the header. Missing trailing fields
//!   read as empty text, which downstream predicates treat as absent data.
//! - The header must be UTF-8. Data lines are kept as raw bytes and a field is
//!   decoded only when asked for, with invalid sequences replaced by U+FFFD, so
//!   a stray byte in one column never ends the read.
//! - Looking up a column the header does not name is a contract violation and
//!   fails with [`DelayError::Parse`]. Callers resolve the columns they depend on
//!   once, up front, with [`TableReader::resolve`].

use crate::error::{DelayError, Result};
use csv::ByteRecord;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

/// Column names of a table and their positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    /// Build a header from column names.
    ///
    /// # Errors
    /// [`DelayError::Parse`] if there are no columns or a name repeats.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .collect();
        if names.is_empty() || names.iter().all(String::is_empty) {
            return Err(DelayError::parse("dataset has no header line"));
        }
        let mut index = HashMap::with_capacity(names.len());
        for (pos, name) in names.iter().enumerate() {
            if index.insert(name.clone(), pos).is_some() {
                return Err(DelayError::parse(format!("duplicate column {name:?} in header")));
            }
        }
        Ok(Self { names, index })
    }

    /// Position of `column`.
    ///
    /// # Errors
    /// [`DelayError::Parse`] if the header does not name `column`.
    pub fn position(&self, column: &str) -> Result<usize> {
        self.index
            .get(column)
            .copied()
            .ok_or_else(|| DelayError::parse(format!("required column {column:?} is missing from the header")))
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One data line of the table.
#[derive(Debug, Clone)]
pub struct RawRow {
    header: Arc<Header>,
    record: ByteRecord,
}

impl RawRow {
    /// Field text of `column`, untrimmed.
    ///
    /// # Errors
    /// [`DelayError::Parse`] if the header does not name `column`.
    pub fn get(&self, column: &str) -> Result<Cow<'_, str>> {
        self.header.position(column).map(|pos| self.field(pos))
    }

    /// Field text at a resolved position; empty when the line is short.
    ///
    /// Borrowed when the bytes are valid UTF-8, otherwise a lossy copy.
    #[must_use]
    pub fn field(&self, pos: usize) -> Cow<'_, str> {
        self.record
            .get(pos)
            .map_or(Cow::Borrowed(""), String::from_utf8_lossy)
    }

    /// `(column, field)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)> {
        self.header
            .names()
            .iter()
            .enumerate()
            .map(|(pos, name)| (name.as_str(), self.field(pos)))
    }

    /// 1-based line number in the source text, when known.
    #[must_use]
    pub fn line(&self) -> Option<u64> {
        self.record.position().map(csv::Position::line)
    }
}

/// Lazy iterator over the data lines of a CSV stream.
///
/// Yields `Err` at most once; iteration ends after the first failure.
pub struct TableReader<R> {
    reader: csv::Reader<R>,
    header: Arc<Header>,
    done: bool,
}

impl<R: Read> TableReader<R> {
    /// Read the header line of `input` and prepare to stream the rest.
    ///
    /// # Errors
    /// [`DelayError::Decompression`] if the underlying stream fails,
    /// [`DelayError::Parse`] if the header is missing, malformed or not UTF-8.
    pub fn new(input: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);
        let header = Header::new(reader.headers()?.iter())?;
        Ok(Self {
            reader,
            header: Arc::new(header),
            done: false,
        })
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Resolve several columns at once.
    ///
    /// # Errors
    /// [`DelayError::Parse`] naming the first column the header lacks.
    pub fn resolve<const N: usize>(&self, columns: [&str; N]) -> Result<[usize; N]> {
        let mut out = [0usize; N];
        for (slot, column) in out.iter_mut().zip(columns) {
            *slot = self.header.position(column)?;
        }
        Ok(out)
    }
}

impl<R: Read> Iterator for TableReader<R> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut record = ByteRecord::new();
        match self.reader.read_byte_record(&mut record) {
            Ok(true) => Some(Ok(RawRow {
                header: Arc::clone(&self.header),
                record,
            })),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err.into()))
            }
        }
    }
}

/// Start reading `input` as a headed CSV table.
///
/// # Errors
/// See [`TableReader::new`].
pub fn parse<R: Read>(input: R) -> Result<TableReader<R>> {
    TableReader::new(input)
}
