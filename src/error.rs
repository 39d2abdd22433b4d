//! Error types for decoding SCTE-35 messages.
//!
//! Decoding fails fast: the first malformed field aborts the whole message
//! and surfaces as a single [`DecodeError`] naming the failing category.

use std::fmt;

use thiserror::Error;

/// A read asked for more bits than the current window holds.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("needed {needed} bits but only {available} remain")]
pub struct Underflow {
    /// Number of bits requested.
    pub needed: usize,
    /// Number of bits that were left.
    pub available: usize,
}

/// Failures of the scalar bit/text codecs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The field has the wrong number of bits for its format.
    #[error("expected {expected} bits, got {actual}")]
    WrongWidth {
        /// Width the format requires.
        expected: usize,
        /// Width supplied.
        actual: usize,
    },

    /// The bit count is not a multiple of the unit the format is built from.
    #[error("{bits} bits is not a multiple of {unit}")]
    Misaligned {
        /// Width supplied.
        bits: usize,
        /// Required unit (4 for hex digits, 8 for characters).
        unit: usize,
    },

    /// Decoded text breaks the character-class rules of its identifier.
    #[error("{value:?} is not a valid {format}")]
    CharacterClass {
        /// Identifier format name.
        format: &'static str,
        /// The offending text.
        value: String,
    },

    /// Identifier text could not be turned back into bits.
    #[error("{value:?} is not well-formed {format} text")]
    MalformedText {
        /// Identifier format name.
        format: &'static str,
        /// The offending text.
        value: String,
    },

    /// The check computation produced a value outside the alphabet.
    #[error("check value {0} is outside the 36-character alphabet")]
    CheckCharacter(u32),
}

/// Why a command or descriptor failed to decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Malformation {
    /// A sub-field needed more bits than were supplied.
    #[error(transparent)]
    Underflow(#[from] Underflow),

    /// A textual identifier failed to decode.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The declared length does not match the body actually supplied.
    #[error("declared length of {declared} bytes does not match a {actual_bits}-bit body")]
    LengthMismatch {
        /// Length field value in bytes.
        declared: usize,
        /// Bits actually supplied.
        actual_bits: usize,
    },

    /// A fixed-size descriptor declared a different length.
    #[error("expected a {expected}-byte body, found {actual} bytes")]
    WrongLength {
        /// Length the structure requires.
        expected: usize,
        /// Length declared.
        actual: usize,
    },

    /// The identifier field is not `CUEI`.
    #[error("identifier 0x{0:08X} is not CUEI")]
    BadIdentifier(u32),

    /// A structure expected a fixed number of bits to follow and found another.
    #[error("expected {expected} trailing bits, found {actual}")]
    TrailingBits {
        /// Bits required.
        expected: usize,
        /// Bits present.
        actual: usize,
    },

    /// The segmentation type id is not in the standard table.
    #[error("unknown segmentation type id 0x{0:02X}")]
    UnknownSegmentationType(u8),

    /// The UPID type is above 0x10.
    #[error("unsupported segmentation UPID type 0x{0:02X}")]
    UnsupportedUpidType(u8),

    /// A multiple-UPID structure is empty or too short to hold an entry.
    #[error("multiple UPID structure holds no entries ({0} bits)")]
    EmptyUpidList(usize),

    /// A non-empty descriptor loop is too short to hold a tag and length.
    #[error("descriptor loop of {0} bits is too short for a tag and length")]
    ShortDescriptorLoop(usize),
}

/// Splice command categories that can fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// `splice_schedule()`
    Schedule,
    /// `splice_insert()`
    Insert,
    /// `time_signal()`
    TimeSignal,
    /// `bandwidth_reservation()`
    BandwidthReservation,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommandKind::Schedule => "splice_schedule",
            CommandKind::Insert => "splice_insert",
            CommandKind::TimeSignal => "time_signal",
            CommandKind::BandwidthReservation => "bandwidth_reservation",
        })
    }
}

/// Splice descriptor categories that can fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    /// `avail_descriptor()`
    Avail,
    /// `DTMF_descriptor()`
    Dtmf,
    /// `segmentation_descriptor()`
    Segmentation,
    /// `time_descriptor()`
    Time,
    /// `audio_descriptor()`
    Audio,
    /// Loop framing failures and reserved tags.
    Unknown,
}

impl DescriptorKind {
    /// Maps a splice descriptor tag to its kind.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            0x00 => DescriptorKind::Avail,
            0x01 => DescriptorKind::Dtmf,
            0x02 => DescriptorKind::Segmentation,
            0x03 => DescriptorKind::Time,
            0x04 => DescriptorKind::Audio,
            _ => DescriptorKind::Unknown,
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DescriptorKind::Avail => "avail",
            DescriptorKind::Dtmf => "DTMF",
            DescriptorKind::Segmentation => "segmentation",
            DescriptorKind::Time => "time",
            DescriptorKind::Audio => "audio",
            DescriptorKind::Unknown => "unknown",
        })
    }
}

/// Text transports accepted in front of the binary decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// Standard base64 alphabet with padding.
    Base64,
    /// Hexadecimal digits, optionally prefixed with `0x`.
    Hex,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextEncoding::Base64 => "base64",
            TextEncoding::Hex => "hex",
        })
    }
}

/// Errors returned by [`decode`](crate::decode) and the text adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The text transport could not be converted into bytes.
    #[error("could not decode {encoding} text: {message}")]
    MalformedInputText {
        /// Transport that was attempted.
        encoding: TextEncoding,
        /// Underlying decoder message.
        message: String,
    },

    /// Fewer than 200 bits were supplied.
    #[error("message of {bits} bits is shorter than the 200-bit minimum")]
    TooShort {
        /// Bits supplied.
        bits: usize,
    },

    /// The first byte is not 0xFC.
    #[error("table id 0x{0:02X} is not 0xFC")]
    BadTableId(u8),

    /// `section_length` disagrees with the buffer or exceeds 4093 bytes.
    #[error("section length {section_length} does not describe a {total_bits}-bit message")]
    BadSectionLength {
        /// Declared section length in bytes.
        section_length: u16,
        /// Size of the whole message in bits.
        total_bits: usize,
    },

    /// `protocol_version` is not zero.
    #[error("unsupported protocol version {0}")]
    UnsupportedProtocolVersion(u8),

    /// The encryption algorithm code lies outside the 6-bit range.
    #[error("unknown encryption algorithm code {0}")]
    UnknownEncryptionAlgorithm(u8),

    /// The splice command body is malformed.
    #[error("malformed {kind} command: {reason}")]
    MalformedCommand {
        /// Which command failed.
        kind: CommandKind,
        /// What went wrong.
        #[source]
        reason: Malformation,
    },

    /// A splice descriptor body is malformed.
    #[error("malformed {kind} descriptor: {reason}")]
    MalformedDescriptor {
        /// Which descriptor failed.
        kind: DescriptorKind,
        /// What went wrong.
        #[source]
        reason: Malformation,
    },

    /// A section-level field needed more bits than were available.
    #[error(transparent)]
    Underflow(#[from] Underflow),
}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_failing_kind() {
        let err = DecodeError::MalformedDescriptor {
            kind: DescriptorKind::Segmentation,
            reason: Malformation::BadIdentifier(0x12345678),
        };
        assert_eq!(
            err.to_string(),
            "malformed segmentation descriptor: identifier 0x12345678 is not CUEI"
        );

        let err = DecodeError::MalformedCommand {
            kind: CommandKind::Insert,
            reason: Underflow {
                needed: 40,
                available: 8,
            }
            .into(),
        };
        assert_eq!(
            err.to_string(),
            "malformed splice_insert command: needed 40 bits but only 8 remain"
        );
    }

    #[test]
    fn test_descriptor_kind_from_tag() {
        assert_eq!(DescriptorKind::from_tag(0x00), DescriptorKind::Avail);
        assert_eq!(DescriptorKind::from_tag(0x02), DescriptorKind::Segmentation);
        assert_eq!(DescriptorKind::from_tag(0x04), DescriptorKind::Audio);
        assert_eq!(DescriptorKind::from_tag(0x05), DescriptorKind::Unknown);
        assert_eq!(DescriptorKind::from_tag(0xF0), DescriptorKind::Unknown);
    }
}
