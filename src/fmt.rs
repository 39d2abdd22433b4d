//! Formatting utilities for displaying decoded SCTE-35 data.

use crate::time::TICKS_PER_SECOND;

/// Converts a 32-bit identifier to a human-readable string.
///
/// Returns the ASCII text if all four bytes are ASCII letters or digits,
/// otherwise the hex representation.
///
/// # Examples
/// ```rust
/// use scte35_decoder::fmt::format_identifier_to_string;
///
/// assert_eq!(format_identifier_to_string(0x43554549), "CUEI");
/// assert_eq!(format_identifier_to_string(0x12345678), "0x12345678");
/// ```
pub fn format_identifier_to_string(identifier: u32) -> String {
    let bytes = identifier.to_be_bytes();
    if bytes.iter().all(|b| b.is_ascii_alphanumeric()) {
        bytes.iter().map(|&b| char::from(b)).collect()
    } else {
        format!("0x{identifier:08X}")
    }
}

/// Renders a 90 kHz tick count together with its value in seconds.
///
/// # Examples
/// ```rust
/// use scte35_decoder::fmt::format_ticks;
///
/// assert_eq!(format_ticks(5_400_000), "5400000 (60.000000s)");
/// ```
pub fn format_ticks(ticks: u64) -> String {
    format!("{ticks} ({:.6}s)", ticks as f64 / TICKS_PER_SECOND as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_identifier_to_string() {
        assert_eq!(format_identifier_to_string(0x43554549), "CUEI");
        assert_eq!(format_identifier_to_string(0x41424344), "ABCD");

        assert_eq!(format_identifier_to_string(0x41422D44), "0x41422D44"); // "AB-D"
        assert_eq!(format_identifier_to_string(0x00000000), "0x00000000");
    }

    #[test]
    fn test_format_ticks() {
        assert_eq!(format_ticks(0), "0 (0.000000s)");
        assert_eq!(format_ticks(4_453_646_850), "4453646850 (49484.965000s)");
    }
}
