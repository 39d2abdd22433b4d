//! Bit-level reading utilities for decoding SCTE-35 binary data.
//!
//! This module provides [`BitCursor`], a bounded read window over a byte buffer
//! that peels off arbitrary-width fields most-significant-bit first, and
//! [`Bits`], an owned bit sequence for fields that are not byte aligned.

use crate::error::Underflow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A read window over a borrowed byte buffer, addressed in bits.
///
/// SCTE-35 messages contain fields that are not byte-aligned, and nested
/// structures whose extent is given by a length prefix. A cursor tracks the
/// current bit offset together with the end of its window, so a sub-structure
/// can be handed its own cursor via [`take_slice`](Self::take_slice) and can
/// never read past the bits it was given.
///
/// Cursors are `Copy`: cloning one is a cheap way to look at the same bits
/// twice without disturbing the original position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitCursor<'a> {
    buffer: &'a [u8],
    offset: usize,
    end: usize,
}

impl<'a> BitCursor<'a> {
    /// Creates a cursor over every bit of `buffer`, starting at bit 0.
    pub fn new(buffer: &'a [u8]) -> Self {
        BitCursor {
            buffer,
            offset: 0,
            end: buffer.len() * 8,
        }
    }

    /// Creates a cursor over the first `bits` bits of `buffer`.
    pub(crate) fn with_len(buffer: &'a [u8], bits: usize) -> Self {
        BitCursor {
            buffer,
            offset: 0,
            end: bits.min(buffer.len() * 8),
        }
    }

    /// Number of bits left in this window.
    pub fn remaining(&self) -> usize {
        self.end - self.offset
    }

    /// Returns `true` when every bit of the window has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn ensure(&self, num_bits: usize) -> Result<(), Underflow> {
        if num_bits > self.remaining() {
            return Err(Underflow {
                needed: num_bits,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Consumes `num_bits` bits (at most 64) and returns them as an unsigned
    /// integer, right-aligned.
    ///
    /// # Errors
    ///
    /// Returns [`Underflow`] if fewer than `num_bits` bits remain. Nothing is
    /// consumed in that case.
    pub fn take_uint(&mut self, num_bits: usize) -> Result<u64, Underflow> {
        debug_assert!(num_bits <= 64, "take_uint is limited to 64 bits");
        self.ensure(num_bits)?;

        let mut value: u64 = 0;
        let mut bits_read = 0;
        while bits_read < num_bits {
            let byte = self.buffer[self.offset / 8];
            let bit_offset = self.offset % 8;
            let bits_to_read = (num_bits - bits_read).min(8 - bit_offset);
            let mask = ((1u16 << bits_to_read) - 1) as u8;
            let bits_value = (byte >> (8 - bit_offset - bits_to_read)) & mask;

            value = (value << bits_to_read) | bits_value as u64;
            self.offset += bits_to_read;
            bits_read += bits_to_read;
        }

        Ok(value)
    }

    /// Consumes a single bit and returns it as a flag.
    pub fn take_flag(&mut self) -> Result<bool, Underflow> {
        Ok(self.take_uint(1)? == 1)
    }

    /// Consumes `num_bits` bits without interpreting them.
    pub fn skip(&mut self, num_bits: usize) -> Result<(), Underflow> {
        self.ensure(num_bits)?;
        self.offset += num_bits;
        Ok(())
    }

    /// Splits off the next `num_bits` bits as a cursor of their own and
    /// advances past them.
    ///
    /// The returned window has no width limit beyond the buffer itself, so
    /// fields wider than 64 bits (a 256-bit UMID, say) stay as raw bits.
    pub fn take_slice(&mut self, num_bits: usize) -> Result<BitCursor<'a>, Underflow> {
        self.ensure(num_bits)?;
        let slice = BitCursor {
            buffer: self.buffer,
            offset: self.offset,
            end: self.offset + num_bits,
        };
        self.offset += num_bits;
        Ok(slice)
    }

    /// Takes every remaining bit, leaving this cursor empty.
    pub fn take_rest(&mut self) -> BitCursor<'a> {
        let rest = *self;
        self.offset = self.end;
        rest
    }

    /// Copies the remaining bits into an owned [`Bits`].
    pub fn to_bits(&self) -> Bits {
        let mut cursor = *self;
        let mut bits = Bits::with_capacity(cursor.remaining());
        while !cursor.is_empty() {
            let chunk = cursor.remaining().min(8);
            // Cannot underflow: chunk never exceeds what remains.
            let value = cursor.take_uint(chunk).unwrap_or_default();
            bits.push_uint(value, chunk);
        }
        bits
    }

    /// Copies the remaining bits into bytes, zero-padding the last byte when
    /// the bit count is not a multiple of eight.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_bits().into_bytes()
    }
}

/// An owned, MSB-first sequence of bits whose length need not be a multiple
/// of eight.
///
/// Used for fields such as the ATSC content identifier tail, whose width is
/// whatever is left of an enclosing structure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bits {
    bytes: Vec<u8>,
    len: usize,
}

impl Bits {
    /// Creates an empty bit sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty bit sequence with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Bits {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// Wraps whole bytes; the length is `bytes.len() * 8`.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let len = bytes.len() * 8;
        Bits { bytes, len }
    }

    /// Wraps `bytes` holding `len` bits; bits past `len` must be zero.
    pub(crate) fn from_parts(bytes: Vec<u8>, len: usize) -> Self {
        debug_assert!(len <= bytes.len() * 8 && bytes.len() == len.div_ceil(8));
        Bits { bytes, len }
    }

    /// Number of bits held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bits are held.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The backing bytes; a trailing partial byte is zero-padded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the sequence and returns the backing bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// A fresh cursor positioned at the first bit.
    pub fn cursor(&self) -> BitCursor<'_> {
        BitCursor::with_len(&self.bytes, self.len)
    }

    /// Appends one bit.
    pub fn push(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 0x80 >> (self.len % 8);
        }
        self.len += 1;
    }

    /// Appends the low `num_bits` bits of `value`, most significant first.
    pub fn push_uint(&mut self, value: u64, num_bits: usize) {
        for shift in (0..num_bits).rev() {
            self.push((value >> shift) & 1 == 1);
        }
    }

    /// Iterates over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.bytes[i / 8] & (0x80 >> (i % 8)) != 0)
    }
}

impl FromIterator<bool> for Bits {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = Bits::new();
        for bit in iter {
            bits.push(bit);
        }
        bits
    }
}
