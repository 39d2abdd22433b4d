//! ISO 7064 "mod 37,36" check characters.
//!
//! ISAN and versioned ISAN identifiers carry one or two check characters
//! computed with this hybrid system over their base-36 digits.

use crate::error::CodecError;

/// The 36-character alphabet check values are drawn from.
pub const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Computes the check character for a sequence of base-36 digit values.
///
/// # Examples
///
/// ```rust
/// use scte35_decoder::check_digit::check_character;
///
/// let digits = [0xB, 0x1, 0x5, 0x9, 0xD, 0x8, 0xF, 0xA, 0x0, 0x1, 0x2, 0x4, 0x0, 0x0, 0x0, 0x0];
/// assert_eq!(check_character(&digits).unwrap(), 'K');
/// ```
///
/// # Errors
///
/// Returns [`CodecError::CheckCharacter`] if the final check value has no
/// character in [`ALPHABET`].
pub fn check_character(digits: &[u8]) -> Result<char, CodecError> {
    let mut product: u32 = 36;
    for &digit in digits {
        let mut sum = digit as u32 + product;
        if sum >= 36 {
            sum -= 36;
        }
        if sum == 0 {
            sum = 36;
        }
        product = sum * 2;
        if product >= 37 {
            product -= 37;
        }
    }

    let check = 37 - product;
    ALPHABET
        .get(check as usize)
        .map(|&c| c as char)
        .ok_or(CodecError::CheckCharacter(check))
}

/// Maps an alphanumeric character (either case) to its base-36 digit value.
pub fn digit_value(c: char) -> Option<u8> {
    let upper = c.to_ascii_uppercase() as u32;
    ALPHABET
        .iter()
        .position(|&a| a as u32 == upper)
        .map(|p| p as u8)
}
