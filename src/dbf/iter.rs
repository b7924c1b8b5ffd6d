//! Sequential row iteration.

use super::reader::DbfReader;
use super::row::DbfRow;
use super::source::ReadSource;
use super::types::error::Result;

/// Iterator over the remaining rows of a [`DbfReader`].
///
/// Yields `Result<DbfRow>` and terminates at the end-of-data sentinel or
/// on truncation. Soft-deleted records are skipped by the underlying
/// cursor and never yielded.
///
/// Created by [`DbfReader::rows()`].
pub struct Rows<'a, S: ReadSource> {
    reader: &'a mut DbfReader<S>,
}

impl<'a, S: ReadSource> Rows<'a, S> {
    pub(super) fn new(reader: &'a mut DbfReader<S>) -> Self {
        Self { reader }
    }
}

impl<'a, S: ReadSource> Iterator for Rows<'a, S> {
    type Item = Result<DbfRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_row().transpose()
    }
}
