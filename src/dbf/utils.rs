//! Low-level byte pattern utilities.
//!
//! DBF cells store numbers as space-padded ASCII digit runs rather than
//! native binary, so most helpers here operate on byte slices. Multi-byte
//! binary integers (record count, memo links) go through `byteorder`
//! instead.

/// Parse a run of ASCII digits as a positive `i32`.
///
/// Stops at the first space or at the end of the slice. The format has no
/// negative-number convention on this path, so no sign handling is done.
pub fn parse_int(bytes: &[u8]) -> i32 {
    let mut result = 0i32;
    for &b in bytes {
        if b == b' ' {
            break;
        }
        result = result * 10 + i32::from(b.wrapping_sub(b'0'));
    }
    result
}

/// Parse a run of ASCII digits as a positive `i64`.
///
/// Same contract as [`parse_int`], for wider values.
pub fn parse_long(bytes: &[u8]) -> i64 {
    let mut result = 0i64;
    for &b in bytes {
        if b == b' ' {
            break;
        }
        result = result * 10 + i64::from(b.wrapping_sub(b'0'));
    }
    result
}

/// Length of `bytes` after stripping trailing ASCII spaces.
pub fn trimmed_len(bytes: &[u8]) -> usize {
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1] == b' ' {
        end -= 1;
    }
    end
}

/// Slice of `bytes` with trailing ASCII spaces stripped. Idempotent.
pub fn trim_trailing_spaces(bytes: &[u8]) -> &[u8] {
    &bytes[..trimmed_len(bytes)]
}

/// Whether `bytes` contains the given byte.
///
/// Used to detect the `'?'` fill pattern marking an unparsable cell.
pub fn contains(bytes: &[u8], value: u8) -> bool {
    bytes.iter().any(|&b| b == value)
}
