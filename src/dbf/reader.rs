use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use std::sync::Arc;

use encoding_rs::{Encoding, WINDOWS_1252};
use log::{debug, info};

use super::format::{header, value};
use super::iter::Rows;
use super::row::DbfRow;
use super::source::ReadSource;
use super::types::error::{DbfError, Result};
use super::types::models::DbfHeader;

/// End-of-data sentinel: appears where a record's deletion flag would be.
const DATA_ENDED: u8 = 0x1A;
/// Deletion flag value marking a soft-deleted record (`'*'`).
const DATA_DELETED: u8 = 0x2A;

/// Cursor over the record region of a DBF file.
///
/// Reads records forward with [`advance`](DbfReader::advance), skipping
/// soft-deleted records and stopping at the end-of-data sentinel. Sources
/// that support random access can reposition with
/// [`seek_to_record`](DbfReader::seek_to_record).
///
/// The cursor owns a single raw record buffer of `record_length - 1` bytes
/// that is reused across reads; [`record_data`](DbfReader::record_data)
/// borrows it for zero-allocation scans, while
/// [`next_row`](DbfReader::next_row) copies values out into an owned row.
///
/// Not safe for concurrent use: callers needing parallel scans over one
/// file must open independent readers, each with its own buffer.
pub struct DbfReader<S: ReadSource> {
    source: Option<S>,
    header: Arc<DbfHeader>,
    encoding: &'static Encoding,
    buffer: Vec<u8>,
    exhausted: bool,
}

impl DbfReader<File> {
    /// Open a DBF file from a path with the default `WINDOWS_1252` encoding.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening DBF file: {}", path.display());
        Self::new(File::open(path)?)
    }
}

impl<S: ReadSource> DbfReader<S> {
    /// Read a DBF table from the given source.
    ///
    /// Character fields will be decoded as `WINDOWS_1252`, the usual
    /// dBASE-era codepage; use [`with_encoding`](DbfReader::with_encoding)
    /// to choose another.
    ///
    /// # Errors
    /// Fails with [`DbfError::InvalidFormat`] if the stream ends before a
    /// complete header and field-descriptor table could be read, or if the
    /// declared geometry is inconsistent.
    pub fn new(source: S) -> Result<Self> {
        Self::with_encoding(source, WINDOWS_1252)
    }

    /// Read a DBF table, decoding character fields with `encoding`.
    pub fn with_encoding(mut source: S, encoding: &'static Encoding) -> Result<Self> {
        let header = header::parse(&mut source)?;
        let buffer = vec![0u8; header.record_data_length()];

        let mut reader = Self {
            source: Some(source),
            header: Arc::new(header),
            encoding,
            buffer,
            exhausted: false,
        };
        reader.skip_to_data_start()?;

        info!(
            "DBF table opened: {} fields, {} records declared, encoding {}",
            reader.header.field_count(),
            reader.header.record_count(),
            encoding.name()
        );
        Ok(reader)
    }

    /// Consume header padding not covered by descriptor parsing.
    ///
    /// Some writers declare a header length that includes reserved bytes
    /// after the descriptor-table terminator; the first record starts at
    /// `header_length`, not at the terminator.
    fn skip_to_data_start(&mut self) -> Result<()> {
        let consumed = 32 * (self.header.field_count() + 1) + 1;
        let residual = self.header.header_length() as i64 - consumed as i64;
        if residual > 0 {
            debug!("Skipping {} padding bytes before first record", residual);
            let source = self.source.as_mut().ok_or(DbfError::Closed)?;
            io::copy(&mut source.by_ref().take(residual as u64), &mut io::sink())?;
        }
        Ok(())
    }

    /// Table header shared by this reader.
    pub fn header(&self) -> &DbfHeader {
        &self.header
    }

    /// Declared number of records in the table.
    pub fn record_count(&self) -> u32 {
        self.header.record_count()
    }

    /// Encoding used to decode character fields in materialized rows.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Whether the underlying source supports [`seek_to_record`](DbfReader::seek_to_record).
    pub fn can_seek(&self) -> bool {
        self.source.as_ref().map_or(false, |s| s.can_seek())
    }

    /// Advance to the next active record, filling the raw record buffer.
    ///
    /// Returns `false` once the end-of-data sentinel (`0x1A`) is seen, and
    /// on any truncation mid-record, which the legacy convention treats as
    /// benign trailing garbage rather than an error. Soft-deleted records
    /// are skipped and never surfaced.
    ///
    /// After the sentinel has been seen the cursor stays exhausted and does
    /// no further I/O until a seek repositions it.
    pub fn advance(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        let source = self.source.as_mut().ok_or(DbfError::Closed)?;
        let body_len = self.buffer.len() as u64;

        loop {
            let mut flag = [0u8; 1];
            match source.read_exact(&mut flag) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(false),
                Err(e) => return Err(e.into()),
            }

            match flag[0] {
                DATA_ENDED => {
                    debug!("End-of-data sentinel reached");
                    self.exhausted = true;
                    return Ok(false);
                }
                DATA_DELETED => {
                    // Skip the record body and retry on the next flag byte.
                    let skipped = io::copy(&mut source.by_ref().take(body_len), &mut io::sink())?;
                    if skipped < body_len {
                        return Ok(false);
                    }
                }
                _ => {
                    return match source.read_exact(&mut self.buffer) {
                        Ok(()) => Ok(true),
                        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
                        Err(e) => Err(e.into()),
                    };
                }
            }
        }
    }

    /// Raw data of the current record, excluding the deletion-flag byte.
    ///
    /// The returned slice aliases the reader's reusable buffer and is
    /// overwritten by the next [`advance`](DbfReader::advance); copy it out
    /// if it must outlive the current position.
    pub fn record_data(&self) -> &[u8] {
        &self.buffer
    }

    /// Advance and borrow the next record's raw data, or `None` at end.
    pub fn next_record_data(&mut self) -> Result<Option<&[u8]>> {
        if self.advance()? {
            Ok(Some(&self.buffer))
        } else {
            Ok(None)
        }
    }

    /// Advance and decode the next record into an owned row, or `None` at end.
    ///
    /// A decode failure in one field aborts only this row; the record's
    /// bytes have already been consumed, so the cursor stays positioned on
    /// the following record.
    pub fn next_row(&mut self) -> Result<Option<DbfRow>> {
        if !self.advance()? {
            return Ok(None);
        }
        let values = self
            .header
            .fields()
            .iter()
            .map(|field| value::decode(field, &self.buffer))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(DbfRow::new(
            Arc::clone(&self.header),
            self.encoding,
            values,
        )))
    }

    /// Iterator over all remaining rows, yielding `Result<DbfRow>`.
    pub fn rows(&mut self) -> Rows<'_, S> {
        Rows::new(self)
    }

    /// Position the cursor at the zero-based record index `n`.
    ///
    /// The position includes the record's deletion flag, so seeking onto a
    /// deleted record is correctly skipped by the next
    /// [`advance`](DbfReader::advance). Repositioning clears the exhausted
    /// state set by a previously seen end-of-data sentinel.
    ///
    /// # Errors
    /// [`DbfError::SeekUnsupported`] for sequential-only sources,
    /// [`DbfError::RecordIndexOutOfRange`] unless `0 <= n < record_count`.
    pub fn seek_to_record(&mut self, n: u32) -> Result<()> {
        let header = Arc::clone(&self.header);
        let source = self.source.as_mut().ok_or(DbfError::Closed)?;
        if !source.can_seek() {
            return Err(DbfError::SeekUnsupported);
        }
        if n >= header.record_count() {
            return Err(DbfError::RecordIndexOutOfRange {
                index: n,
                count: header.record_count(),
            });
        }

        let position = header.header_length() as u64 + u64::from(n) * header.record_length() as u64;
        debug!("Seeking to record {} at byte offset {}", n, position);
        source.seek_abs(position)?;
        self.exhausted = false;
        Ok(())
    }

    /// Release the underlying source. Idempotent; all subsequent cursor
    /// operations fail with [`DbfError::Closed`].
    pub fn close(&mut self) {
        self.source = None;
    }
}
