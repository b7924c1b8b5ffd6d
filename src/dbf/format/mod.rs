//! File format parsing layer.
//!
//! This module bridges raw bytes and the high-level
//! [`DbfReader`](crate::dbf::reader::DbfReader).
//!
//! # Module Organization
//!
//! - [`header`]: Parses the fixed header prefix and field-descriptor table
//! - [`value`]: Decodes typed cell values from raw record bytes
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌──────────────────┐
//! │  Fixed prefix    │ ← header::parse()
//! │  (32 bytes)      │
//! ├──────────────────┤
//! │  Field table     │
//! │  (32 B entries,  │
//! │   0x0D ended)    │
//! ├──────────────────┤
//! │  Record region   │ ← reader cursor + value::decode()
//! │  (fixed-width,   │
//! │   0x1A ended)    │
//! └──────────────────┘
//! ```

pub mod header;
pub mod value;
