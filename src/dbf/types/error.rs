//! Custom error types for the dbf-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum DbfError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The file is structurally invalid, truncated mid-header, or does not
    /// conform to the DBF layout.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A Float/Numeric cell's trimmed bytes are not a valid decimal literal.
    ///
    /// This is isolated to the field being decoded; the cursor position is
    /// unaffected and other fields of the same record decode normally.
    #[error("Failed to parse {data_type} value from field '{field}'")]
    Parse {
        data_type: &'static str,
        field: String,
    },

    /// A memo field has a byte length other than 4 (binary link) or
    /// 10 (ASCII-digit link).
    #[error("Unknown memo mode: field length {0} (expected 4 or 10)")]
    UnsupportedMemoMode(usize),

    /// A by-name field lookup did not match any field in the header.
    #[error("Field \"{0}\" does not exist")]
    FieldNotFound(String),

    /// A record index passed to seek was outside `[0, record_count)`.
    #[error("Record index out of range [0, {count}): {index}")]
    RecordIndexOutOfRange { index: u32, count: u32 },

    /// A seek was requested on a source that only supports sequential reads.
    #[error("Seeking is not supported by this source")]
    SeekUnsupported,

    /// An operation was attempted after `close()`.
    #[error("Reader is closed")]
    Closed,
}

/// A convenience `Result` type alias using the crate's `DbfError` type.
pub type Result<T> = std::result::Result<T, DbfError>;
