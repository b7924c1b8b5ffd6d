//! # dbf-reader
//!
//! A reader for dBASE/xBase DBF table files.
//!
//! Decodes the fixed-size header and field-descriptor table, then iterates
//! the fixed-width record region, skipping soft-deleted records and
//! decoding typed cell values (character, date, float, numeric, logical,
//! memo-link). Reading is strictly sequential by default; file and
//! in-memory sources additionally support random access by record index.
//!
//! ```no_run
//! # use dbf_reader::DbfReader;
//! let mut reader = DbfReader::open("table.dbf").unwrap();
//! for row in reader.rows() {
//!     let row = row.unwrap();
//!     println!("{:?}", row.get_string("NAME").unwrap());
//! }
//! ```
pub mod dbf;

// Re-export the main types for convenience
pub use dbf::{
    DbfDate, DbfError, DbfField, DbfFieldType, DbfHeader, DbfReader, DbfRow, DbfValue,
    ReadSource, Result, Rows,
};
