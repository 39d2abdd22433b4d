//! CRC validation for SCTE-35 messages.
//!
//! Decoding only extracts the `CRC_32` field. This module recomputes the
//! CRC-32/MPEG-2 checksum over the message so callers can verify it
//! separately.

use crate::types::SpliceInfoSection;

#[cfg(feature = "crc-validation")]
use crate::error::{DecodeError, DecodeResult};

#[cfg(feature = "crc-validation")]
use crc::{CRC_32_MPEG_2, Crc};

/// MPEG-2 CRC-32 algorithm instance for SCTE-35 validation
#[cfg(feature = "crc-validation")]
pub const MPEG_2: Crc<u32> = Crc::<u32>::new(&CRC_32_MPEG_2);

/// Calculates the CRC-32/MPEG-2 checksum of `data`.
#[cfg(feature = "crc-validation")]
pub fn calculate_crc(data: &[u8]) -> u32 {
    MPEG_2.checksum(data)
}

/// Validates the CRC-32 checksum of a complete SCTE-35 message.
///
/// The stored CRC is read from the last four bytes and compared with the
/// checksum of everything before them.
///
/// # Example
///
/// ```rust
/// use data_encoding::BASE64;
/// use scte35_decoder::crc::validate_message_crc;
///
/// let buffer = BASE64
///     .decode(b"/DAvAAAAAAAAAP///wViAAWKf+//CXVCAv4AUmXAAzUAAAAKAAhDVUVJADgyMWLvc/g=")
///     .unwrap();
/// assert_eq!(validate_message_crc(&buffer), Ok(true));
/// ```
///
/// # Errors
///
/// Returns [`DecodeError::TooShort`] if the buffer cannot hold a CRC field.
#[cfg(feature = "crc-validation")]
pub fn validate_message_crc(buffer: &[u8]) -> DecodeResult<bool> {
    let Some(split) = buffer.len().checked_sub(4) else {
        return Err(DecodeError::TooShort {
            bits: buffer.len() * 8,
        });
    };
    let (data, crc_bytes) = buffer.split_at(split);
    let stored_crc = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
    Ok(calculate_crc(data) == stored_crc)
}

impl SpliceInfoSection {
    /// The `CRC_32` field as a number.
    pub fn crc_value(&self) -> Option<u32> {
        let digits = self.crc_32.strip_prefix("0x")?;
        u32::from_str_radix(digits, 16).ok()
    }

    /// Checks this section's CRC against the message it was decoded from.
    ///
    /// `original` must be the exact buffer passed to [`decode`](crate::decode).
    /// Returns `Ok(false)` when the checksum does not match or the buffer does
    /// not end in this section's CRC field.
    #[cfg(feature = "crc-validation")]
    pub fn verify_crc(&self, original: &[u8]) -> DecodeResult<bool> {
        let Some(stored) = self.crc_value() else {
            return Ok(false);
        };
        let Some(split) = original.len().checked_sub(4) else {
            return Err(DecodeError::TooShort {
                bits: original.len() * 8,
            });
        };
        if original[split..] != stored.to_be_bytes() {
            return Ok(false);
        }
        validate_message_crc(original)
    }
}
