//! Bit-level writer for encoding binary data.

use super::error::{EncodingError, EncodingResult};
use crate::bit_reader::Bits;

/// A writer that can write individual bits to a byte buffer.
///
/// This is the encoding counterpart to [`BitCursor`](crate::BitCursor),
/// handling values of arbitrary bit width across byte boundaries. The number
/// of bits written is tracked exactly, so the output may end mid-byte.
pub struct BitWriter {
    /// Completed bytes.
    buffer: Vec<u8>,
    /// Current bit position within the current byte (0-7).
    bit_position: u8,
    /// Current byte being written.
    current_byte: u8,
}

impl BitWriter {
    /// Creates a new `BitWriter` with an empty buffer.
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            bit_position: 0,
            current_byte: 0,
        }
    }

    /// Creates a new `BitWriter` with a pre-allocated buffer capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            bit_position: 0,
            current_byte: 0,
        }
    }

    /// Writes a value using the specified number of bits.
    ///
    /// Only the low `bits` bits of `value` are written.
    ///
    /// # Errors
    ///
    /// Returns an error if `bits` is 0 or greater than 64.
    pub fn write_bits(&mut self, value: u64, bits: u8) -> EncodingResult<()> {
        if bits == 0 || bits > 64 {
            return Err(EncodingError::InvalidFieldValue {
                field: "bits",
                value: bits.to_string(),
            });
        }

        let mut remaining_bits = bits;
        let mut value_to_write = if bits == 64 {
            value
        } else {
            value & ((1u64 << bits) - 1)
        };

        while remaining_bits > 0 {
            let bits_available_in_current_byte = 8 - self.bit_position;
            let bits_to_write = remaining_bits.min(bits_available_in_current_byte);

            let shift_amount = remaining_bits - bits_to_write;
            let bits_value = (value_to_write >> shift_amount) as u8;
            let mask = ((1u16 << bits_to_write) - 1) as u8;

            self.current_byte |=
                (bits_value & mask) << (bits_available_in_current_byte - bits_to_write);
            self.bit_position += bits_to_write;

            if self.bit_position == 8 {
                self.buffer.push(self.current_byte);
                self.current_byte = 0;
                self.bit_position = 0;
            }

            remaining_bits -= bits_to_write;
            value_to_write &= (1u64 << shift_amount) - 1;
        }

        Ok(())
    }

    /// Writes a named field, rejecting values that do not fit in `bits` bits.
    pub fn write_field(&mut self, field: &'static str, value: u64, bits: u8) -> EncodingResult<()> {
        let max_value = if bits >= 64 {
            u64::MAX
        } else {
            (1u64 << bits) - 1
        };
        if value > max_value {
            return Err(EncodingError::ValueTooLarge {
                field,
                max_value,
                actual_value: value,
            });
        }
        self.write_bits(value, bits)
    }

    /// Writes a single bit.
    pub fn write_bit(&mut self, bit: bool) -> EncodingResult<()> {
        self.write_bits(u64::from(bit), 1)
    }

    /// Writes a complete byte array.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> EncodingResult<()> {
        for &byte in bytes {
            self.write_bits(byte as u64, 8)?;
        }
        Ok(())
    }

    /// Writes every bit of `bits`, which need not be byte-aligned.
    pub fn write_bits_from(&mut self, bits: &Bits) -> EncodingResult<()> {
        let whole_bytes = bits.len() / 8;
        self.write_bytes(&bits.as_bytes()[..whole_bytes])?;
        let tail = bits.len() % 8;
        if tail > 0 {
            let last = bits.as_bytes()[whole_bytes];
            self.write_bits((last >> (8 - tail)) as u64, tail as u8)?;
        }
        Ok(())
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.buffer.len() * 8 + self.bit_position as usize
    }

    /// Returns true if no bits have been written yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && self.bit_position == 0
    }

    /// Finishes writing and returns the complete buffer, zero-padding the
    /// last byte if necessary.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_position > 0 {
            self.buffer.push(self.current_byte);
        }
        self.buffer
    }

    /// Finishes writing and returns exactly the bits written.
    pub fn into_bits(self) -> Bits {
        let len = self.bit_len();
        Bits::from_parts(self.finish(), len)
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}
