//! Field value decoding.
//!
//! Turns the raw bytes of one record into typed [`DbfValue`]s, dispatching
//! purely on the field's type tag. Decoding reads only the supplied byte
//! span and has no side effects, so a failed decode of one field leaves
//! every other field (and the cursor) untouched.

use byteorder::{ByteOrder, LittleEndian};

use crate::dbf::types::error::{DbfError, Result};
use crate::dbf::types::models::{DbfDate, DbfField, DbfFieldType, DbfValue};
use crate::dbf::utils;

/// Fill byte marking an unparsable numeric/float cell.
const UNPARSABLE_SENTINEL: u8 = b'?';

/// Decode the value of `field` from a record's raw data bytes.
///
/// `data` is the record data excluding the deletion-flag byte, so field
/// offsets index it directly.
pub fn decode(field: &DbfField, data: &[u8]) -> Result<DbfValue> {
    let span = field_span(field, data)?;
    match field.field_type {
        DbfFieldType::Character => Ok(DbfValue::Character(span.to_vec())),
        DbfFieldType::Date => decode_date(field, span),
        DbfFieldType::Float => Ok(DbfValue::Float(decode_decimal(field, span, "float")?)),
        DbfFieldType::Numeric => Ok(DbfValue::Numeric(decode_decimal(field, span, "numeric")?)),
        DbfFieldType::Logical => {
            let flag = span.first().copied().unwrap_or(b' ');
            Ok(DbfValue::Logical(decode_logical(flag)))
        }
        DbfFieldType::Memo => decode_memo(field, span),
        DbfFieldType::Unknown => Ok(DbfValue::Null),
    }
}

fn field_span<'a>(field: &DbfField, data: &'a [u8]) -> Result<&'a [u8]> {
    data.get(field.offset..field.offset + field.length)
        .ok_or_else(|| {
            DbfError::InvalidFormat(format!(
                "Field '{}' spans [{}, {}) but record data is {} bytes",
                field.name,
                field.offset,
                field.offset + field.length,
                data.len()
            ))
        })
}

/// Eight ASCII digits, `YYYYMMDD`. Calendar validity is not checked.
fn decode_date(field: &DbfField, span: &[u8]) -> Result<DbfValue> {
    if span.len() < 8 {
        return Err(DbfError::InvalidFormat(format!(
            "Date field '{}' is {} bytes, expected at least 8",
            field.name,
            span.len()
        )));
    }
    Ok(DbfValue::Date(DbfDate {
        year: utils::parse_int(&span[0..4]),
        month: utils::parse_int(&span[4..6]) as u32,
        day: utils::parse_int(&span[6..8]) as u32,
    }))
}

/// Shared rule for Float and Numeric cells: trim trailing spaces, treat an
/// empty or `'?'`-marked cell as absent, otherwise parse a decimal literal.
fn decode_decimal<T: std::str::FromStr>(
    field: &DbfField,
    span: &[u8],
    data_type: &'static str,
) -> Result<Option<T>> {
    let trimmed = utils::trim_trailing_spaces(span);
    if trimmed.is_empty() || utils::contains(trimmed, UNPARSABLE_SENTINEL) {
        return Ok(None);
    }
    // The digits may still be left-padded with spaces.
    std::str::from_utf8(trimmed)
        .ok()
        .and_then(|s| s.trim_start().parse::<T>().ok())
        .map(Some)
        .ok_or_else(|| DbfError::Parse {
            data_type,
            field: field.name.clone(),
        })
}

/// `Y`/`y`/`T`/`t` are true, everything else is false.
///
/// The format nominally supports an "unset" `'?'` state; it is
/// intentionally collapsed to false rather than modeled as a tri-state.
fn decode_logical(flag: u8) -> bool {
    matches!(flag, b'Y' | b'y' | b'T' | b't')
}

/// Memo links come in two widths: 4 bytes holding a little-endian binary
/// index, or 10 bytes holding an ASCII-digit index decoded by the numeric
/// rule. Any other width is unsupported.
fn decode_memo(field: &DbfField, span: &[u8]) -> Result<DbfValue> {
    match field.length {
        4 => Ok(DbfValue::Memo(Some(i64::from(LittleEndian::read_i32(span))))),
        10 => {
            let value: Option<f64> = decode_decimal(field, span, "memo")?;
            Ok(DbfValue::Memo(value.map(|v| v as i64)))
        }
        other => Err(DbfError::UnsupportedMemoMode(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, field_type: DbfFieldType, offset: usize, length: usize) -> DbfField {
        DbfField {
            name: name.to_string(),
            field_type,
            offset,
            length,
            decimal_count: 0,
        }
    }

    #[test]
    fn character_keeps_raw_bytes() {
        let f = field("NAME", DbfFieldType::Character, 0, 10);
        let value = decode(&f, b"ALICE     123").unwrap();
        assert_eq!(value, DbfValue::Character(b"ALICE     ".to_vec()));
    }

    #[test]
    fn date_parses_yyyymmdd() {
        let f = field("BORN", DbfFieldType::Date, 2, 8);
        let value = decode(&f, b"xx19870326").unwrap();
        assert_eq!(
            value.as_date(),
            Some(DbfDate { year: 1987, month: 3, day: 26 })
        );
    }

    #[test]
    fn numeric_parses_left_padded_digits() {
        let f = field("AGE", DbfFieldType::Numeric, 0, 5);
        assert_eq!(decode(&f, b"   25").unwrap(), DbfValue::Numeric(Some(25.0)));
        assert_eq!(decode(&f, b"3.25 ").unwrap(), DbfValue::Numeric(Some(3.25)));
        assert_eq!(decode(&f, b"-12.5").unwrap(), DbfValue::Numeric(Some(-12.5)));
    }

    #[test]
    fn blank_and_sentinel_cells_are_absent_not_zero() {
        let f = field("AGE", DbfFieldType::Numeric, 0, 5);
        assert_eq!(decode(&f, b"     ").unwrap(), DbfValue::Numeric(None));
        assert_eq!(decode(&f, b"?????").unwrap(), DbfValue::Numeric(None));
        assert_eq!(decode(&f, b"1?3  ").unwrap(), DbfValue::Numeric(None));

        let f = field("RATE", DbfFieldType::Float, 0, 5);
        assert_eq!(decode(&f, b"     ").unwrap(), DbfValue::Float(None));
        assert_eq!(decode(&f, b"??   ").unwrap(), DbfValue::Float(None));
    }

    #[test]
    fn malformed_decimal_is_a_parse_error() {
        let f = field("AGE", DbfFieldType::Numeric, 0, 5);
        let result = decode(&f, b"12x34");
        assert!(matches!(
            result,
            Err(DbfError::Parse { data_type: "numeric", .. })
        ));
    }

    #[test]
    fn float_parses_decimal_literals() {
        let f = field("RATE", DbfFieldType::Float, 0, 8);
        assert_eq!(
            decode(&f, b"   3.14 ").unwrap(),
            DbfValue::Float(Some(3.14))
        );
    }

    #[test]
    fn logical_is_two_state() {
        let f = field("OK", DbfFieldType::Logical, 0, 1);
        for flag in [b"Y", b"y", b"T", b"t"] {
            assert_eq!(decode(&f, flag).unwrap(), DbfValue::Logical(true));
        }
        for flag in [b"N", b"n", b"F", b"f", b"?", b" "] {
            assert_eq!(decode(&f, flag).unwrap(), DbfValue::Logical(false));
        }
    }

    #[test]
    fn memo_length_four_is_little_endian() {
        let f = field("NOTES", DbfFieldType::Memo, 0, 4);
        let value = decode(&f, &[0x2A, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(value, DbfValue::Memo(Some(42)));
    }

    #[test]
    fn memo_length_ten_is_ascii_digits() {
        let f = field("NOTES", DbfFieldType::Memo, 0, 10);
        assert_eq!(
            decode(&f, b"       123").unwrap(),
            DbfValue::Memo(Some(123))
        );
        assert_eq!(decode(&f, b"          ").unwrap(), DbfValue::Memo(None));
    }

    #[test]
    fn memo_other_lengths_are_unsupported() {
        let f = field("NOTES", DbfFieldType::Memo, 0, 8);
        assert!(matches!(
            decode(&f, b"12345678"),
            Err(DbfError::UnsupportedMemoMode(8))
        ));
    }

    #[test]
    fn unknown_type_decodes_to_null() {
        let f = field("BLOB", DbfFieldType::Unknown, 0, 3);
        assert_eq!(decode(&f, b"abc").unwrap(), DbfValue::Null);
    }

    #[test]
    fn short_record_data_is_rejected() {
        let f = field("NAME", DbfFieldType::Character, 5, 10);
        assert!(matches!(
            decode(&f, b"short"),
            Err(DbfError::InvalidFormat(_))
        ));
    }
}
