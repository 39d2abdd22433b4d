//! Trait definitions for encodable types.

use super::error::EncodingResult;
use super::writer::BitWriter;
use crate::bit_reader::Bits;

/// Trait for types that can be encoded back to their SCTE-35 wire layout.
pub trait Encodable {
    /// Writes the structure to `writer`.
    fn encode(&self, writer: &mut BitWriter) -> EncodingResult<()>;

    /// The exact number of bits `encode` writes.
    fn encoded_bits(&self) -> usize;

    /// Convenience method to encode into a fresh bit sequence.
    fn encode_to_bits(&self) -> EncodingResult<Bits> {
        let mut writer = BitWriter::with_capacity(self.encoded_bits().div_ceil(8));
        self.encode(&mut writer)?;
        Ok(writer.into_bits())
    }
}
