//! Core DBF reader module

pub mod format;
pub mod types;
pub mod utils;

mod iter;
mod reader;
mod row;
mod source;

pub use iter::Rows;
pub use reader::DbfReader;
pub use row::DbfRow;
pub use source::ReadSource;
pub use types::error::{DbfError, Result};
pub use types::models::{DbfDate, DbfField, DbfFieldType, DbfHeader, DbfValue};
