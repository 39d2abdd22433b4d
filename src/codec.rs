//! Scalar conversions between raw bit fields and their textual forms.
//!
//! Every decoder takes a [`BitCursor`] window holding exactly the field's bits
//! and renders it as text, failing with a [`CodecError`] when the width or the
//! characters do not fit the format. The `*_to_bits` functions are the
//! reverse direction, used when re-encoding.

use crate::bit_reader::{BitCursor, Bits};
use crate::check_digit::{check_character, digit_value};
use crate::error::CodecError;

/// Rendered in place of the EIDR check character, which is not computed.
pub const EIDR_CHECK_PLACEHOLDER: char = '?';

fn expect_width(bits: &BitCursor<'_>, expected: usize) -> Result<(), CodecError> {
    if bits.remaining() != expected {
        return Err(CodecError::WrongWidth {
            expected,
            actual: bits.remaining(),
        });
    }
    Ok(())
}

fn nibbles(mut bits: BitCursor<'_>) -> Result<Vec<u8>, CodecError> {
    if bits.remaining() % 4 != 0 {
        return Err(CodecError::Misaligned {
            bits: bits.remaining(),
            unit: 4,
        });
    }
    let mut out = Vec::with_capacity(bits.remaining() / 4);
    while let Ok(nibble) = bits.take_uint(4) {
        out.push(nibble as u8);
    }
    Ok(out)
}

fn hex_digit(nibble: u8) -> char {
    char::from_digit(nibble as u32, 16)
        .unwrap_or('0')
        .to_ascii_uppercase()
}

fn hex_digits_to_bits(text: &str, format: &'static str) -> Result<Bits, CodecError> {
    let mut bits = Bits::with_capacity(text.len() * 4);
    for c in text.chars() {
        let value = c.to_digit(16).ok_or_else(|| CodecError::MalformedText {
            format,
            value: text.to_string(),
        })?;
        bits.push_uint(value as u64, 4);
    }
    Ok(bits)
}

/// Renders bits as `0x` followed by uppercase hex digits.
///
/// # Examples
///
/// ```rust
/// use scte35_decoder::BitCursor;
/// use scte35_decoder::codec::bits_to_hex;
///
/// let bytes = [0x2C, 0xA0];
/// assert_eq!(bits_to_hex(BitCursor::new(&bytes)).unwrap(), "0x2CA0");
/// ```
pub fn bits_to_hex(bits: BitCursor<'_>) -> Result<String, CodecError> {
    let digits = nibbles(bits)?;
    let mut text = String::with_capacity(2 + digits.len());
    text.push_str("0x");
    text.extend(digits.into_iter().map(hex_digit));
    Ok(text)
}

/// Parses hex digits, with or without a `0x` prefix, back into bits.
pub fn hex_to_bits(text: &str) -> Result<Bits, CodecError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex_digits_to_bits(digits, "hex")
}

/// Decodes whole bytes as characters, one Unicode scalar per byte.
pub fn bits_to_ascii(mut bits: BitCursor<'_>) -> Result<String, CodecError> {
    if bits.remaining() % 8 != 0 {
        return Err(CodecError::Misaligned {
            bits: bits.remaining(),
            unit: 8,
        });
    }
    let mut text = String::with_capacity(bits.remaining() / 8);
    while let Ok(byte) = bits.take_uint(8) {
        text.push(char::from(byte as u8));
    }
    Ok(text)
}

/// Encodes characters back into one byte each.
///
/// # Errors
///
/// Fails if a character does not fit in a single byte.
pub fn ascii_to_bits(text: &str) -> Result<Bits, CodecError> {
    let mut bits = Bits::with_capacity(text.len() * 8);
    for c in text.chars() {
        let byte = u8::try_from(c).map_err(|_| CodecError::MalformedText {
            format: "ASCII",
            value: text.to_string(),
        })?;
        bits.push_uint(byte as u64, 8);
    }
    Ok(bits)
}

/// Renders a 256-bit SMPTE UMID as eight dot-separated groups of eight hex
/// digits.
pub fn bits_to_umid(bits: BitCursor<'_>) -> Result<String, CodecError> {
    expect_width(&bits, 256)?;
    let digits = nibbles(bits)?;
    let groups: Vec<String> = digits
        .chunks(8)
        .map(|group| group.iter().copied().map(hex_digit).collect())
        .collect();
    Ok(groups.join("."))
}

/// Parses UMID text back into its 256 bits.
pub fn umid_to_bits(text: &str) -> Result<Bits, CodecError> {
    let malformed = || CodecError::MalformedText {
        format: "UMID",
        value: text.to_string(),
    };
    let groups: Vec<&str> = text.split('.').collect();
    if groups.len() != 8 || groups.iter().any(|g| g.len() != 8) {
        return Err(malformed());
    }

    let mut bits = Bits::with_capacity(256);
    for group in groups {
        let value = u32::from_str_radix(group, 16).map_err(|_| malformed())?;
        bits.push_uint(value as u64, 32);
    }
    Ok(bits)
}

/// Renders a 64-bit ISAN (root and episode) or a 96-bit versioned ISAN,
/// including the computed check characters.
///
/// A 64-bit field yields `XXXX-XXXX-XXXX-XXXX-C`; a 96-bit field yields
/// `XXXX-XXXX-XXXX-XXXX-C-XXXX-XXXX-C`, where the second check character
/// covers all 24 digits.
pub fn bits_to_isan(bits: BitCursor<'_>) -> Result<String, CodecError> {
    let versioned = match bits.remaining() {
        64 => false,
        96 => true,
        actual => {
            return Err(CodecError::WrongWidth {
                expected: 96,
                actual,
            });
        }
    };
    let digits = nibbles(bits)?;
    let first_check = check_character(&digits[..16])?;

    let mut text = String::with_capacity(33);
    for (index, &digit) in digits.iter().enumerate() {
        if index != 0 && index % 4 == 0 {
            text.push('-');
            if index == 16 {
                text.push(first_check);
                text.push('-');
            }
        }
        text.push(hex_digit(digit));
    }
    text.push('-');
    if versioned {
        text.push(check_character(&digits)?);
    } else {
        text.push(first_check);
    }
    Ok(text)
}

/// Parses ISAN text back into 64 or 96 bits, dropping the check characters.
pub fn isan_to_bits(text: &str) -> Result<Bits, CodecError> {
    let versioned = match text.chars().count() {
        21 => false,
        33 => true,
        _ => {
            return Err(CodecError::MalformedText {
                format: "ISAN",
                value: text.to_string(),
            });
        }
    };

    let mut digits: Vec<char> = text.chars().filter(|&c| c != '-').collect();
    digits.pop();
    if versioned && digits.len() > 16 {
        digits.remove(16);
    }
    let digits: String = digits.into_iter().collect();
    hex_digits_to_bits(&digits, "ISAN")
}

/// Renders a 96-bit compact EIDR as `10.<sub-prefix>/<suffix>-?`.
///
/// The check character is not computed and is always
/// [`EIDR_CHECK_PLACEHOLDER`].
pub fn bits_to_eidr(mut bits: BitCursor<'_>) -> Result<String, CodecError> {
    expect_width(&bits, 96)?;
    let sub_prefix = bits.take_uint(16).map_err(|u| CodecError::WrongWidth {
        expected: 96,
        actual: u.available,
    })?;
    let digits = nibbles(bits)?;

    let mut text = format!("10.{sub_prefix}/");
    for (index, &digit) in digits.iter().enumerate() {
        if index != 0 && index % 4 == 0 {
            text.push('-');
        }
        text.push(hex_digit(digit));
    }
    text.push('-');
    text.push(EIDR_CHECK_PLACEHOLDER);
    Ok(text)
}

/// Parses EIDR text back into its 96 bits, dropping the check character.
pub fn eidr_to_bits(text: &str) -> Result<Bits, CodecError> {
    let malformed = || CodecError::MalformedText {
        format: "EIDR",
        value: text.to_string(),
    };
    let stripped = text.strip_prefix("10.").ok_or_else(malformed)?;
    let (sub_prefix, suffix) = stripped.split_once('/').ok_or_else(malformed)?;
    let sub_prefix: u16 = sub_prefix.parse().map_err(|_| malformed())?;

    let mut digits: String = suffix.chars().filter(|&c| c != '-').collect();
    digits.pop();

    let mut bits = Bits::with_capacity(96);
    bits.push_uint(sub_prefix as u64, 16);
    for bit in hex_digits_to_bits(&digits, "EIDR")?.iter() {
        bits.push(bit);
    }
    if bits.len() != 96 {
        return Err(malformed());
    }
    Ok(bits)
}

fn check_classes(
    text: String,
    format: &'static str,
    prefix_len: usize,
    prefix: fn(&char) -> bool,
    rest: fn(&char) -> bool,
) -> Result<String, CodecError> {
    let valid = text.chars().count() == 12
        && text.chars().take(prefix_len).all(|c| prefix(&c))
        && text.chars().skip(prefix_len).all(|c| rest(&c));
    if !valid {
        return Err(CodecError::CharacterClass {
            format,
            value: text,
        });
    }
    Ok(text)
}

/// Decodes an Ad-ID: 12 characters, 4 letters followed by 8 alphanumerics.
pub fn bits_to_ad_id(bits: BitCursor<'_>) -> Result<String, CodecError> {
    let text = bits_to_ascii(bits)?;
    check_classes(
        text,
        "Ad-ID",
        4,
        char::is_ascii_alphabetic,
        char::is_ascii_alphanumeric,
    )
}

/// Decodes a TID: 12 characters, 2 letters followed by 10 digits.
pub fn bits_to_tid(bits: BitCursor<'_>) -> Result<String, CodecError> {
    let text = bits_to_ascii(bits)?;
    check_classes(
        text,
        "TID",
        2,
        char::is_ascii_alphabetic,
        char::is_ascii_digit,
    )
}

/// The closed set of CableLabs ADI element names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum AdiElement {
    Preview,
    Mpeg2Hd,
    Mpeg2Sd,
    AvcHd,
    AvcSd,
    HevcHd,
    HevcSd,
    Signal,
    PlacementOpportunity,
    Blackout,
    Other,
}

impl AdiElement {
    /// The element name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdiElement::Preview => "PREVIEW",
            AdiElement::Mpeg2Hd => "MPEG2HD",
            AdiElement::Mpeg2Sd => "MPEG2SD",
            AdiElement::AvcHd => "AVCHD",
            AdiElement::AvcSd => "AVCSD",
            AdiElement::HevcHd => "HEVCHD",
            AdiElement::HevcSd => "HEVCSD",
            AdiElement::Signal => "SIGNAL",
            AdiElement::PlacementOpportunity => "PO",
            AdiElement::Blackout => "BLACKOUT",
            AdiElement::Other => "OTHER",
        }
    }

    /// Looks up an element by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "PREVIEW" => AdiElement::Preview,
            "MPEG2HD" => AdiElement::Mpeg2Hd,
            "MPEG2SD" => AdiElement::Mpeg2Sd,
            "AVCHD" => AdiElement::AvcHd,
            "AVCSD" => AdiElement::AvcSd,
            "HEVCHD" => AdiElement::HevcHd,
            "HEVCSD" => AdiElement::HevcSd,
            "SIGNAL" => AdiElement::Signal,
            "PO" => AdiElement::PlacementOpportunity,
            "BLACKOUT" => AdiElement::Blackout,
            "OTHER" => AdiElement::Other,
            _ => return None,
        })
    }
}

/// Decodes an ADI identifier of the form `ELEMENT: provider/asset`.
///
/// Returns the element and the identifier part, whitespace-trimmed.
pub fn bits_to_adi(bits: BitCursor<'_>) -> Result<(AdiElement, String), CodecError> {
    let text = bits_to_ascii(bits)?;
    let parts: Vec<&str> = text.split(':').map(str::trim).collect();
    if let [element, id] = parts.as_slice() {
        if let Some(element) = AdiElement::from_name(element) {
            if id.contains('/') {
                return Ok((element, id.to_string()));
            }
        }
    }
    Err(CodecError::CharacterClass {
        format: "ADI",
        value: text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let bytes = [0x00, 0x00, 0x00, 0x00, 0x2C, 0xA0, 0xA1, 0x8A];
        let text = bits_to_hex(BitCursor::new(&bytes)).unwrap();
        assert_eq!(text, "0x000000002CA0A18A");

        let bits = hex_to_bits(&text).unwrap();
        assert_eq!(bits.as_bytes(), &bytes);
        assert_eq!(hex_to_bits("2ca0a18a").unwrap().len(), 32);
    }

    #[test]
    fn test_hex_round_trip_every_nibble_width() {
        for width in (0..=256).step_by(4) {
            let mut bits = Bits::new();
            for i in 0..width / 4 {
                bits.push_uint((i * 7 + width) as u64 % 16, 4);
            }
            let text = bits_to_hex(bits.cursor()).unwrap();
            assert_eq!(text.len(), 2 + width / 4);

            let back = hex_to_bits(&text).unwrap();
            assert_eq!(back.len(), width);
            assert_eq!(back, bits, "width {width}");
        }

        let twelve = hex_to_bits("0xABC").unwrap();
        assert_eq!(twelve.len(), 12);
        assert_eq!(bits_to_hex(twelve.cursor()).unwrap(), "0xABC");
        assert_eq!(bits_to_hex(Bits::new().cursor()).unwrap(), "0x");
    }

    #[test]
    fn test_hex_rejects_partial_nibble() {
        let bytes = [0xFF];
        let mut cursor = BitCursor::new(&bytes);
        let six = cursor.take_slice(6).unwrap();
        assert_eq!(
            bits_to_hex(six),
            Err(CodecError::Misaligned { bits: 6, unit: 4 })
        );
        assert!(hex_to_bits("0xZZ").is_err());
    }

    #[test]
    fn test_ascii_round_trip() {
        let bits = ascii_to_bits("ABCD0123456H").unwrap();
        assert_eq!(bits.len(), 96);
        assert_eq!(bits_to_ascii(bits.cursor()).unwrap(), "ABCD0123456H");
        assert!(ascii_to_bits("snow☃").is_err());
    }

    #[test]
    fn test_ascii_round_trip_every_byte_value() {
        let all: Vec<u8> = (0..=255).collect();
        let empty = Bits::new();
        assert_eq!(bits_to_ascii(empty.cursor()).unwrap(), "");
        assert_eq!(ascii_to_bits("").unwrap(), empty);

        for len in 1..=32 {
            for chunk in all.chunks(len) {
                let bits = Bits::from_bytes(chunk.to_vec());
                let text = bits_to_ascii(bits.cursor()).unwrap();
                assert_eq!(text.chars().count(), chunk.len());

                let back = ascii_to_bits(&text).unwrap();
                assert_eq!(back.len(), chunk.len() * 8);
                assert_eq!(back, bits, "bytes {chunk:02X?}");
            }
        }
    }

    #[test]
    fn test_ascii_rejects_partial_byte() {
        let bits: Bits = [true, false, true, false].into_iter().collect();
        assert!(matches!(
            bits_to_ascii(bits.cursor()),
            Err(CodecError::Misaligned { bits: 4, unit: 8 })
        ));
    }

    #[test]
    fn test_umid_round_trip() {
        let umid = "060A2B34.01010105.01010D20.13000000.D2C9036C.8F195343.AB7014D2.D718BFDA";
        let bits = umid_to_bits(umid).unwrap();
        assert_eq!(bits.len(), 256);
        assert_eq!(bits_to_umid(bits.cursor()).unwrap(), umid);
    }

    #[test]
    fn test_umid_width() {
        let bytes = [0u8; 31];
        assert_eq!(
            bits_to_umid(BitCursor::new(&bytes)),
            Err(CodecError::WrongWidth {
                expected: 256,
                actual: 248
            })
        );
        assert!(umid_to_bits("060A2B34.01010105").is_err());
    }

    #[test]
    fn test_isan_without_version() {
        let bytes = [0xB1, 0x59, 0xD8, 0xFA, 0x01, 0x24, 0x00, 0x00];
        let text = bits_to_isan(BitCursor::new(&bytes)).unwrap();
        assert_eq!(text, "B159-D8FA-0124-0000-K");
        assert_eq!(isan_to_bits(&text).unwrap().as_bytes(), &bytes);
    }

    #[test]
    fn test_isan_with_version() {
        let bytes = [
            0x01, 0x23, 0x0E, 0x00, 0xD0, 0x7A, 0x00, 0x90, 0x00, 0xA0, 0x07, 0x0F,
        ];
        let text = bits_to_isan(BitCursor::new(&bytes)).unwrap();
        assert_eq!(text, "0123-0E00-D07A-0090-O-00A0-070F-G");
        assert_eq!(isan_to_bits(&text).unwrap().as_bytes(), &bytes);
    }

    #[test]
    fn test_isan_width() {
        let bytes = [0u8; 10];
        assert!(matches!(
            bits_to_isan(BitCursor::new(&bytes)),
            Err(CodecError::WrongWidth { actual: 80, .. })
        ));
    }

    #[test]
    fn test_eidr_renders_placeholder_check() {
        let bytes = [
            0x14, 0x78, 0xF8, 0x5A, 0xE1, 0x00, 0xB0, 0x68, 0x5B, 0x8F, 0xB1, 0xC8,
        ];
        let text = bits_to_eidr(BitCursor::new(&bytes)).unwrap();
        // The trailing check character is a known gap and stays a placeholder.
        assert_eq!(text, "10.5240/F85A-E100-B068-5B8F-B1C8-?");
        assert_eq!(eidr_to_bits(&text).unwrap().as_bytes(), &bytes);
    }

    #[test]
    fn test_eidr_rejects_malformed_text() {
        assert!(eidr_to_bits("5240/F85A-E100-B068-5B8F-B1C8-?").is_err());
        assert!(eidr_to_bits("10.99999/F85A-E100-B068-5B8F-B1C8-?").is_err());
        assert!(eidr_to_bits("10.5240/F85A-?").is_err());
    }

    #[test]
    fn test_ad_id_character_classes() {
        let good = ascii_to_bits("ABCD0123456H").unwrap();
        assert_eq!(bits_to_ad_id(good.cursor()).unwrap(), "ABCD0123456H");

        let bad = ascii_to_bits("ABC10123456H").unwrap();
        assert!(matches!(
            bits_to_ad_id(bad.cursor()),
            Err(CodecError::CharacterClass { format: "Ad-ID", .. })
        ));
    }

    #[test]
    fn test_tid_character_classes() {
        let good = ascii_to_bits("MV0004146400").unwrap();
        assert_eq!(bits_to_tid(good.cursor()).unwrap(), "MV0004146400");

        let bad = ascii_to_bits("MV000414640A").unwrap();
        assert!(bits_to_tid(bad.cursor()).is_err());
    }

    #[test]
    fn test_adi() {
        let bits = ascii_to_bits("SIGNAL: provider.com/ABCD1234").unwrap();
        let (element, id) = bits_to_adi(bits.cursor()).unwrap();
        assert_eq!(element, AdiElement::Signal);
        assert_eq!(id, "provider.com/ABCD1234");

        let no_slash = ascii_to_bits("PO:ABCD1234").unwrap();
        assert!(bits_to_adi(no_slash.cursor()).is_err());

        let bad_element = ascii_to_bits("MOVIE:provider.com/ABCD1234").unwrap();
        assert!(bits_to_adi(bad_element.cursor()).is_err());
    }
}
