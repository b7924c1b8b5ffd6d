//! Core data structures for the DBF format.
//!
//! This module defines the fundamental types used throughout the library:
//! - Header and field descriptor metadata
//! - Field type tags
//! - Decoded cell values

use super::error::{DbfError, Result};

/// Field type tag from the single-character code in a field descriptor.
///
/// Codes outside the supported set map to [`DbfFieldType::Unknown`] instead
/// of failing, to tolerate dialect variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbfFieldType {
    /// `'C'`: fixed-width text, space padded.
    Character,
    /// `'D'`: eight ASCII digits, `YYYYMMDD`.
    Date,
    /// `'F'`: decimal literal, space padded.
    Float,
    /// `'L'`: single-byte logical flag.
    Logical,
    /// `'N'`: decimal literal, space padded.
    Numeric,
    /// `'M'`: link into a companion memo file.
    Memo,
    /// Any unrecognized type code.
    Unknown,
}

impl From<u8> for DbfFieldType {
    fn from(code: u8) -> Self {
        match code {
            b'C' => Self::Character,
            b'D' => Self::Date,
            b'F' => Self::Float,
            b'L' => Self::Logical,
            b'N' => Self::Numeric,
            b'M' => Self::Memo,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for DbfFieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::Character => "character",
            Self::Date => "date",
            Self::Float => "float",
            Self::Logical => "logical",
            Self::Numeric => "numeric",
            Self::Memo => "memo",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Descriptor for a single column: name, type, and byte layout.
///
/// Created once during header parsing and never mutated. The `offset` is
/// relative to the start of the record data, excluding the leading
/// deletion-flag byte, and is derived as the cumulative sum of the lengths
/// of all prior fields. The on-disk offset bytes are not trusted; deriving
/// offsets guarantees they are strictly increasing and non-overlapping.
#[derive(Debug, Clone)]
pub struct DbfField {
    pub name: String,
    pub field_type: DbfFieldType,
    pub offset: usize,
    pub length: usize,
    pub decimal_count: u8,
}

/// A calendar date decoded from a DBF cell or the header's last-update stamp.
///
/// Calendar validity is not checked: malformed digit runs may yield an
/// out-of-range month or day, which callers validate if they care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbfDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl std::fmt::Display for DbfDate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Parsed DBF file header.
///
/// Immutable once parsed; safe to share read-only across cursors opened on
/// the same file.
#[derive(Debug)]
pub struct DbfHeader {
    pub(crate) signature: u8,
    pub(crate) last_update: DbfDate,
    pub(crate) record_count: u32,
    pub(crate) header_length: u16,
    pub(crate) record_length: u16,
    pub(crate) fields: Vec<DbfField>,
}

impl DbfHeader {
    /// Version/type byte at offset 0.
    pub fn signature(&self) -> u8 {
        self.signature
    }

    /// Date the table was last written, from the 3-byte header stamp.
    pub fn last_update(&self) -> DbfDate {
        self.last_update
    }

    /// Declared number of records in the table.
    pub fn record_count(&self) -> u32 {
        self.record_count
    }

    /// Total byte length of the header, including the descriptor table.
    pub fn header_length(&self) -> usize {
        self.header_length as usize
    }

    /// On-disk byte length of one record, including the deletion-flag byte.
    pub fn record_length(&self) -> usize {
        self.record_length as usize
    }

    /// Byte length of the record data, excluding the deletion-flag byte.
    pub fn record_data_length(&self) -> usize {
        self.record_length as usize - 1
    }

    /// Number of fields in the descriptor table.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Field descriptor by positional index.
    pub fn field(&self, index: usize) -> Option<&DbfField> {
        self.fields.get(index)
    }

    /// All field descriptors in on-disk (row layout) order.
    pub fn fields(&self) -> &[DbfField] {
        &self.fields
    }

    /// Positional index of the field with the given name.
    pub fn field_index(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| DbfError::FieldNotFound(name.to_string()))
    }

    /// Field descriptor by name.
    pub fn field_by_name(&self, name: &str) -> Result<&DbfField> {
        let index = self.field_index(name)?;
        Ok(&self.fields[index])
    }
}

/// A single decoded cell value.
///
/// Absence is explicit: a blank or `'?'`-filled Float/Numeric cell decodes
/// to `None` inside its variant, never to a magic zero. Defaulting absent
/// values to zero is the business of the [`DbfRow`](crate::DbfRow)
/// convenience getters, not of the decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum DbfValue {
    /// Raw bytes of a character field, untrimmed. Text decoding is deferred
    /// to the caller so the encoding remains a caller policy.
    Character(Vec<u8>),
    Date(DbfDate),
    Float(Option<f32>),
    Numeric(Option<f64>),
    Logical(bool),
    /// Index into the companion memo file, or `None` for a blank cell.
    Memo(Option<i64>),
    /// Produced for fields with an unrecognized type code.
    Null,
}

impl DbfValue {
    /// Numeric view of this value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DbfValue::Float(v) => v.map(f64::from),
            DbfValue::Numeric(v) => *v,
            DbfValue::Memo(v) => v.map(|link| link as f64),
            _ => None,
        }
    }

    /// Raw bytes of a character value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            DbfValue::Character(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Boolean view of a logical value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DbfValue::Logical(v) => Some(*v),
            _ => None,
        }
    }

    /// Date view of a date value.
    pub fn as_date(&self) -> Option<DbfDate> {
        match self {
            DbfValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}
