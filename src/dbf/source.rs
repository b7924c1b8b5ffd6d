//! Byte sources the record cursor pulls from.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};

use super::types::error::{DbfError, Result};

/// A source of DBF bytes: sequential reads always, absolute seeks optionally.
///
/// The default implementation is non-seekable; sources backed by a file or
/// an in-memory buffer override both methods. This mirrors the split between
/// random-access files and plain input streams: wrapping a `File` in a
/// [`BufReader`] deliberately yields a streaming, non-seekable source.
pub trait ReadSource: Read {
    /// Whether [`seek_abs`](ReadSource::seek_abs) is supported.
    fn can_seek(&self) -> bool {
        false
    }

    /// Reposition to an absolute byte offset from the start of the source.
    fn seek_abs(&mut self, _pos: u64) -> Result<()> {
        Err(DbfError::SeekUnsupported)
    }
}

impl ReadSource for File {
    fn can_seek(&self) -> bool {
        true
    }

    fn seek_abs(&mut self, pos: u64) -> Result<()> {
        self.seek(SeekFrom::Start(pos))?;
        Ok(())
    }
}

impl<T: AsRef<[u8]>> ReadSource for Cursor<T> {
    fn can_seek(&self) -> bool {
        true
    }

    fn seek_abs(&mut self, pos: u64) -> Result<()> {
        self.seek(SeekFrom::Start(pos))?;
        Ok(())
    }
}

/// Streaming source: sequential only, no seeking.
impl<R: Read> ReadSource for BufReader<R> {}
