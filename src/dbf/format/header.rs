//! DBF header and field-descriptor table parsing.
//!
//! Layout of the fixed 32-byte prefix (multi-byte integers little-endian):
//!
//! ```text
//! offset 0       version/type byte
//! offset 1..4    last-update date (year-1900, month, day)
//! offset 4..8    record count (u32)
//! offset 8..10   header length (u16)
//! offset 10..12  record length (u16)
//! offset 12..32  reserved
//! ```
//!
//! The descriptor table follows as repeating 32-byte entries, ending at a
//! `0x0D` terminator byte or at the declared header length.

use std::io::{self, Read};

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::dbf::types::error::{DbfError, Result};
use crate::dbf::types::models::{DbfDate, DbfField, DbfFieldType, DbfHeader};

/// Byte that terminates the field-descriptor table.
pub(crate) const FIELD_TABLE_TERMINATOR: u8 = 0x0D;

const PREFIX_LENGTH: usize = 32;
const DESCRIPTOR_LENGTH: usize = 32;
const NAME_LENGTH: usize = 11;

/// Parse the DBF header, leaving `input` positioned just past the
/// descriptor-table terminator.
///
/// Field offsets are derived as the cumulative sum of prior field lengths
/// rather than read from the descriptor's reserved bytes, which guarantees
/// they are strictly increasing and non-overlapping.
pub fn parse<R: Read>(input: &mut R) -> Result<DbfHeader> {
    let mut prefix = [0u8; PREFIX_LENGTH];
    read_exact_or_truncated(input, &mut prefix, "header prefix")?;

    let signature = prefix[0];
    let last_update = DbfDate {
        year: 1900 + i32::from(prefix[1]),
        month: u32::from(prefix[2]),
        day: u32::from(prefix[3]),
    };
    let record_count = LittleEndian::read_u32(&prefix[4..8]);
    let header_length = LittleEndian::read_u16(&prefix[8..10]);
    let record_length = LittleEndian::read_u16(&prefix[10..12]);

    if record_length == 0 {
        return Err(DbfError::InvalidFormat(
            "Record length must be non-zero".to_string(),
        ));
    }

    let fields = parse_field_table(input, header_length as usize)?;

    let data_length: usize = fields.iter().map(|f| f.length).sum();
    if data_length + 1 > record_length as usize {
        return Err(DbfError::InvalidFormat(format!(
            "Field lengths ({} + 1 flag byte) exceed record length {}",
            data_length, record_length
        )));
    }

    debug!(
        "Parsed DBF header: {} fields, {} records, record length {}",
        fields.len(),
        record_count,
        record_length
    );

    Ok(DbfHeader {
        signature,
        last_update,
        record_count,
        header_length,
        record_length,
        fields,
    })
}

/// Parse repeating 32-byte field descriptors until the terminator byte or
/// the declared header length is exhausted.
fn parse_field_table<R: Read>(input: &mut R, header_length: usize) -> Result<Vec<DbfField>> {
    let mut fields = Vec::new();
    let mut consumed = PREFIX_LENGTH;
    let mut offset = 0usize;

    while consumed + DESCRIPTOR_LENGTH <= header_length {
        let mut entry = [0u8; DESCRIPTOR_LENGTH];
        read_exact_or_truncated(input, &mut entry[..1], "field descriptor")?;
        consumed += 1;
        if entry[0] == FIELD_TABLE_TERMINATOR {
            return validated(fields);
        }
        read_exact_or_truncated(input, &mut entry[1..], "field descriptor")?;
        consumed += DESCRIPTOR_LENGTH - 1;

        let name = descriptor_name(&entry[..NAME_LENGTH]);
        let field_type = DbfFieldType::from(entry[11]);
        let length = entry[16] as usize;
        let decimal_count = entry[17];

        fields.push(DbfField {
            name,
            field_type,
            offset,
            length,
            decimal_count,
        });
        offset += length;
    }

    // Header length ran out before a terminator; consume the terminator byte
    // if it is the very next one, otherwise the stream is malformed.
    let mut terminator = [0u8; 1];
    read_exact_or_truncated(input, &mut terminator, "field table terminator")?;
    if terminator[0] != FIELD_TABLE_TERMINATOR {
        return Err(DbfError::InvalidFormat(format!(
            "Expected field table terminator 0x0D, found {:#04x}",
            terminator[0]
        )));
    }
    validated(fields)
}

fn validated(fields: Vec<DbfField>) -> Result<Vec<DbfField>> {
    for (i, field) in fields.iter().enumerate() {
        if fields[..i].iter().any(|prior| prior.name == field.name) {
            return Err(DbfError::InvalidFormat(format!(
                "Duplicate field name \"{}\"",
                field.name
            )));
        }
    }
    Ok(fields)
}

/// Field names are 11 bytes, NUL/space padded.
fn descriptor_name(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let trimmed = crate::dbf::utils::trim_trailing_spaces(&raw[..end]);
    String::from_utf8_lossy(trimmed).into_owned()
}

fn read_exact_or_truncated<R: Read>(input: &mut R, buf: &mut [u8], context: &str) -> Result<()> {
    input.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            DbfError::InvalidFormat(format!("Stream ended while reading {}", context))
        } else {
            DbfError::Io(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn descriptor(name: &str, type_code: u8, length: u8, decimals: u8) -> [u8; 32] {
        let mut entry = [0u8; 32];
        entry[..name.len()].copy_from_slice(name.as_bytes());
        entry[11] = type_code;
        entry[16] = length;
        entry[17] = decimals;
        entry
    }

    fn header_bytes(record_length: u16, descriptors: &[[u8; 32]]) -> Vec<u8> {
        let header_length = (32 + 32 * descriptors.len() + 1) as u16;
        let mut bytes = vec![0u8; 32];
        bytes[0] = 0x03;
        bytes[1] = 95; // 1995-07-26
        bytes[2] = 7;
        bytes[3] = 26;
        bytes[4..8].copy_from_slice(&2u32.to_le_bytes());
        bytes[8..10].copy_from_slice(&header_length.to_le_bytes());
        bytes[10..12].copy_from_slice(&record_length.to_le_bytes());
        for d in descriptors {
            bytes.extend_from_slice(d);
        }
        bytes.push(FIELD_TABLE_TERMINATOR);
        bytes
    }

    #[test]
    fn parses_prefix_and_descriptors() {
        let bytes = header_bytes(
            14,
            &[descriptor("NAME", b'C', 10, 0), descriptor("AGE", b'N', 3, 0)],
        );
        let header = parse(&mut Cursor::new(bytes)).unwrap();

        assert_eq!(header.signature(), 0x03);
        assert_eq!(header.last_update(), DbfDate { year: 1995, month: 7, day: 26 });
        assert_eq!(header.record_count(), 2);
        assert_eq!(header.record_length(), 14);
        assert_eq!(header.field_count(), 2);

        let name = header.field(0).unwrap();
        assert_eq!(name.name, "NAME");
        assert_eq!(name.field_type, DbfFieldType::Character);
        assert_eq!(name.offset, 0);
        assert_eq!(name.length, 10);

        let age = header.field(1).unwrap();
        assert_eq!(age.name, "AGE");
        assert_eq!(age.field_type, DbfFieldType::Numeric);
        assert_eq!(age.offset, 10);
        assert_eq!(age.length, 3);
    }

    #[test]
    fn offsets_are_strictly_increasing_and_bounded() {
        let bytes = header_bytes(
            22,
            &[
                descriptor("A", b'C', 5, 0),
                descriptor("B", b'N', 8, 2),
                descriptor("C", b'L', 1, 0),
                descriptor("D", b'D', 7, 0),
            ],
        );
        let header = parse(&mut Cursor::new(bytes)).unwrap();

        let mut expected_offset = 0;
        for field in header.fields() {
            assert_eq!(field.offset, expected_offset);
            expected_offset += field.length;
        }
        assert!(expected_offset + 1 <= header.record_length());
    }

    #[test]
    fn unknown_type_code_is_tolerated() {
        let bytes = header_bytes(9, &[descriptor("BLOB", b'X', 8, 0)]);
        let header = parse(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(header.field(0).unwrap().field_type, DbfFieldType::Unknown);
    }

    #[test]
    fn truncated_prefix_is_a_format_error() {
        let result = parse(&mut Cursor::new(vec![0x03, 95, 7]));
        assert!(matches!(result, Err(DbfError::InvalidFormat(_))));
    }

    #[test]
    fn truncated_descriptor_table_is_a_format_error() {
        let mut bytes = header_bytes(14, &[descriptor("NAME", b'C', 10, 0)]);
        bytes.truncate(40);
        let result = parse(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(DbfError::InvalidFormat(_))));
    }

    #[test]
    fn oversized_field_lengths_are_rejected() {
        // Two 10-byte fields cannot fit a declared record length of 12.
        let bytes = header_bytes(
            12,
            &[descriptor("A", b'C', 10, 0), descriptor("B", b'C', 10, 0)],
        );
        let result = parse(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(DbfError::InvalidFormat(_))));
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let bytes = header_bytes(
            21,
            &[descriptor("NAME", b'C', 10, 0), descriptor("NAME", b'C', 10, 0)],
        );
        let result = parse(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(DbfError::InvalidFormat(_))));
    }
}
