//! Materialized rows with typed by-name getters.

use std::sync::Arc;

use encoding_rs::Encoding;

use super::types::error::Result;
use super::types::models::{DbfDate, DbfHeader, DbfValue};
use super::utils;

/// One decoded record: an ordered sequence of typed values, index-aligned
/// with the header's field order.
///
/// Rows are immutable value snapshots whose lifetime is independent of the
/// reader's reusable record buffer.
///
/// The typed getters are a convenience projection over the decoded values:
/// numeric getters default an absent cell to zero and [`get_bool`](DbfRow::get_bool)
/// defaults it to false. Code that must distinguish absent from zero should
/// use [`get`](DbfRow::get) and match on the [`DbfValue`] directly.
#[derive(Debug, Clone)]
pub struct DbfRow {
    header: Arc<DbfHeader>,
    encoding: &'static Encoding,
    values: Vec<DbfValue>,
}

impl DbfRow {
    pub(super) fn new(
        header: Arc<DbfHeader>,
        encoding: &'static Encoding,
        values: Vec<DbfValue>,
    ) -> Self {
        Self {
            header,
            encoding,
            values,
        }
    }

    /// Header describing this row's fields.
    pub fn header(&self) -> &DbfHeader {
        &self.header
    }

    /// All values in field order.
    pub fn values(&self) -> &[DbfValue] {
        &self.values
    }

    /// Value by positional index.
    pub fn value(&self, index: usize) -> Option<&DbfValue> {
        self.values.get(index)
    }

    /// Value by field name.
    pub fn get(&self, field_name: &str) -> Result<&DbfValue> {
        let index = self.header.field_index(field_name)?;
        Ok(&self.values[index])
    }

    /// Character field as text, trimmed of trailing spaces and decoded with
    /// the row's encoding. `None` for blank or non-character values.
    pub fn get_string(&self, field_name: &str) -> Result<Option<String>> {
        self.get_string_with(field_name, self.encoding)
    }

    /// Like [`get_string`](DbfRow::get_string), with an explicit encoding.
    pub fn get_string_with(
        &self,
        field_name: &str,
        encoding: &'static Encoding,
    ) -> Result<Option<String>> {
        let value = self.get(field_name)?;
        Ok(value.as_bytes().and_then(|raw| {
            let trimmed = utils::trim_trailing_spaces(raw);
            if trimmed.is_empty() {
                None
            } else {
                let (text, _, _) = encoding.decode(trimmed);
                Some(text.into_owned())
            }
        }))
    }

    /// Numeric view of a field; an absent cell reads as `0.0`.
    pub fn get_f64(&self, field_name: &str) -> Result<f64> {
        Ok(self.get(field_name)?.as_f64().unwrap_or(0.0))
    }

    /// Numeric view of a field truncated to `i64`; absent reads as `0`.
    pub fn get_i64(&self, field_name: &str) -> Result<i64> {
        Ok(self.get_f64(field_name)? as i64)
    }

    /// Numeric view of a field truncated to `i32`; absent reads as `0`.
    pub fn get_i32(&self, field_name: &str) -> Result<i32> {
        Ok(self.get_f64(field_name)? as i32)
    }

    /// Logical field as a boolean; absent or non-logical reads as `false`.
    pub fn get_bool(&self, field_name: &str) -> Result<bool> {
        Ok(self.get(field_name)?.as_bool().unwrap_or(false))
    }

    /// Date field, or `None` for a non-date value.
    pub fn get_date(&self, field_name: &str) -> Result<Option<DbfDate>> {
        Ok(self.get(field_name)?.as_date())
    }

    /// Memo-link index, or `None` for a blank or non-memo value.
    pub fn get_memo_link(&self, field_name: &str) -> Result<Option<i64>> {
        match self.get(field_name)? {
            DbfValue::Memo(link) => Ok(*link),
            _ => Ok(None),
        }
    }
}
