//! UPID (Unique Program Identifier) types and decoding.
//!
//! A segmentation descriptor names its content through a UPID: a type code,
//! a byte length and a body whose layout depends on the type. The multiple
//! UPID type (`MID`) nests further UPIDs using the same framing.

use std::fmt;

use crate::bit_reader::{BitCursor, Bits};
use crate::codec::{
    AdiElement, bits_to_ad_id, bits_to_adi, bits_to_ascii, bits_to_eidr, bits_to_hex,
    bits_to_isan, bits_to_tid, bits_to_umid,
};
use crate::error::{CodecError, Malformation};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The `segmentation_upid_type` field.
///
/// Each type corresponds to a specific identifier format; codes above 0x10
/// are reserved and rejected when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SegmentationUpidType {
    /// No UPID is used (0x00)
    #[default]
    NotUsed,
    /// User-defined UPID, deprecated (0x01)
    UserDefined,
    /// ISCI, deprecated (0x02)
    ISCI,
    /// Ad Identifier (0x03)
    AdID,
    /// SMPTE UMID (0x04)
    UMID,
    /// ISAN, deprecated (0x05)
    ISAN,
    /// Versioned ISAN (0x06)
    VISAN,
    /// Tribune Media Systems program identifier (0x07)
    TID,
    /// AiringID, formerly Turner ID (0x08)
    TI,
    /// CableLabs metadata identifier (0x09)
    ADI,
    /// Entertainment Identifier Registry (0x0A)
    EIDR,
    /// ATSC content identifier (0x0B)
    ATSCContentIdentifier,
    /// Managed private UPID (0x0C)
    MPU,
    /// Multiple UPID structure (0x0D)
    MID,
    /// Advertising information (0x0E)
    ADSInformation,
    /// Uniform Resource Identifier (0x0F)
    URI,
    /// Universally unique identifier (0x10)
    UUID,
}

impl From<SegmentationUpidType> for u8 {
    fn from(s: SegmentationUpidType) -> Self {
        use SegmentationUpidType::*;
        match s {
            NotUsed => 0x00,
            UserDefined => 0x01,
            ISCI => 0x02,
            AdID => 0x03,
            UMID => 0x04,
            ISAN => 0x05,
            VISAN => 0x06,
            TID => 0x07,
            TI => 0x08,
            ADI => 0x09,
            EIDR => 0x0A,
            ATSCContentIdentifier => 0x0B,
            MPU => 0x0C,
            MID => 0x0D,
            ADSInformation => 0x0E,
            URI => 0x0F,
            UUID => 0x10,
        }
    }
}

impl TryFrom<u8> for SegmentationUpidType {
    type Error = Malformation;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use SegmentationUpidType::*;
        Ok(match value {
            0x00 => NotUsed,
            0x01 => UserDefined,
            0x02 => ISCI,
            0x03 => AdID,
            0x04 => UMID,
            0x05 => ISAN,
            0x06 => VISAN,
            0x07 => TID,
            0x08 => TI,
            0x09 => ADI,
            0x0A => EIDR,
            0x0B => ATSCContentIdentifier,
            0x0C => MPU,
            0x0D => MID,
            0x0E => ADSInformation,
            0x0F => URI,
            0x10 => UUID,
            other => return Err(Malformation::UnsupportedUpidType(other)),
        })
    }
}

impl SegmentationUpidType {
    /// Short display name of the UPID type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use scte35_decoder::SegmentationUpidType;
    ///
    /// assert_eq!(SegmentationUpidType::AdID.name(), "Ad-ID");
    /// assert_eq!(SegmentationUpidType::MID.name(), "MID()");
    /// ```
    pub fn name(&self) -> &'static str {
        use SegmentationUpidType::*;
        match self {
            NotUsed => "Not Used",
            UserDefined => "User Defined",
            ISCI => "ISCI",
            AdID => "Ad-ID",
            UMID => "UMID",
            ISAN => "ISAN",
            VISAN => "V-ISAN",
            TID => "TID",
            TI => "TI",
            ADI => "ADI",
            EIDR => "EIDR",
            ATSCContentIdentifier => "ATSC Content Identifier",
            MPU => "MPU()",
            MID => "MID()",
            ADSInformation => "ADS Information",
            URI => "URI",
            UUID => "UUID",
        }
    }

    /// Long description of the UPID type.
    pub fn description(&self) -> &'static str {
        use SegmentationUpidType::*;
        match self {
            NotUsed => "The segmentation_upid is not defined and is not present in the descriptor.",
            UserDefined => {
                "Deprecated: use type 0x0C; The segmentation_upid does not follow a standard naming scheme."
            }
            ISCI => {
                "Deprecated: use type 0x03, 8 characters; 4 alpha characters followed by 4 numbers."
            }
            AdID => {
                "Defined by the Advertising Digital Identification, LLC group. 12 characters; 4 alpha characters (company identification prefix) followed by 8 alphanumeric characters."
            }
            UMID => "See SMPTE 330.",
            ISAN => "Deprecated: use type 0x06, ISO 15706 binary encoding.",
            VISAN => "Formerly known as V-ISAN. ISO 15706-2 binary encoding (versioned ISAN).",
            TID => {
                "Tribune Media Systems Program identifier. 12 characters; 2 alpha characters followed by 10 numbers."
            }
            TI => {
                "AiringID (Formerly Turner ID), used to indicate a specific airing of a program that is unique within a network."
            }
            ADI => "CableLabs metadata identifier.",
            EIDR => "An EIDR represented in Compact Binary encoding.",
            ATSCContentIdentifier => "ATSC_content_identifier() structure as defined in ATSC A/57B.",
            MPU => "Managed Private UPID structure.",
            MID => "Multiple UPID types structure.",
            ADSInformation => {
                "Advertising information. The specific usage is out of scope of this standard."
            }
            URI => "Universal Resource Identifier (see RFC 3986).",
            UUID => "Universally unique identifier (see RFC 4122).",
        }
    }
}

impl fmt::Display for SegmentationUpidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `segmentation_upid()` structure: type, declared length and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentationUpid {
    /// The UPID type
    pub upid_type: SegmentationUpidType,
    /// Length of the payload in bytes
    pub length: u8,
    /// Decoded payload; absent when the length is zero or the type is `NotUsed`
    pub info: Option<SegmentationUpidInformation>,
}

impl SegmentationUpid {
    /// A UPID with no payload.
    pub fn not_used() -> Self {
        SegmentationUpid {
            upid_type: SegmentationUpidType::NotUsed,
            length: 0,
            info: None,
        }
    }
}

/// The decoded payload of a UPID, one variant per identifier format.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value"))]
pub enum SegmentationUpidInformation {
    /// Raw bytes of a user-defined UPID
    UserDefined(Vec<u8>),
    ISCI(String),
    AdID(String),
    UMID(String),
    ISAN(String),
    VISAN(String),
    TID(String),
    TI(String),
    ADI(AdiIdentifier),
    EIDR(String),
    ATSC(AtscContentIdentifier),
    MPU(String),
    /// Nested UPIDs, in message order
    MID(Vec<SegmentationUpid>),
    ADS(String),
    URI(String),
    UUID(String),
}

impl SegmentationUpidInformation {
    /// The UPID type this payload belongs to.
    pub fn upid_type(&self) -> SegmentationUpidType {
        use SegmentationUpidInformation as I;
        use SegmentationUpidType as T;
        match self {
            I::UserDefined(_) => T::UserDefined,
            I::ISCI(_) => T::ISCI,
            I::AdID(_) => T::AdID,
            I::UMID(_) => T::UMID,
            I::ISAN(_) => T::ISAN,
            I::VISAN(_) => T::VISAN,
            I::TID(_) => T::TID,
            I::TI(_) => T::TI,
            I::ADI(_) => T::ADI,
            I::EIDR(_) => T::EIDR,
            I::ATSC(_) => T::ATSCContentIdentifier,
            I::MPU(_) => T::MPU,
            I::MID(_) => T::MID,
            I::ADS(_) => T::ADSInformation,
            I::URI(_) => T::URI,
            I::UUID(_) => T::UUID,
        }
    }
}

impl fmt::Display for SegmentationUpidInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SegmentationUpidInformation::*;
        match self {
            UserDefined(bytes) => {
                f.write_str("0x")?;
                for byte in bytes {
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            }
            ISCI(s) | AdID(s) | UMID(s) | ISAN(s) | VISAN(s) | TID(s) | TI(s) | EIDR(s)
            | MPU(s) | ADS(s) | URI(s) | UUID(s) => f.write_str(s),
            ADI(adi) => f.write_str(&adi.text),
            ATSC(atsc) => write!(
                f,
                "tsid={} end_of_day={} unique_for={} content_id={}",
                atsc.tsid,
                atsc.end_of_day,
                atsc.unique_for,
                atsc.content_id_hex()
            ),
            MID(upids) => {
                let mut first = true;
                for upid in upids {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    match &upid.info {
                        Some(info) => write!(f, "{}: {}", upid.upid_type, info)?,
                        None => write!(f, "{}", upid.upid_type)?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// An ADI identifier, `ELEMENT:provider/asset`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdiIdentifier {
    /// The identifier exactly as carried in the message
    pub text: String,
    pub element: AdiElement,
    /// The part after the colon, trimmed
    pub id: String,
}

/// An `ATSC_content_identifier()` structure.
///
/// The content id is a house number of arbitrary bit length, so it is kept
/// as raw bits.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AtscContentIdentifier {
    /// Transport stream id
    pub tsid: u16,
    /// UTC hour at which the broadcast day ends (5 bits)
    pub end_of_day: u8,
    /// Days during which the content id is not reused (9 bits)
    pub unique_for: u16,
    pub content_id: Bits,
}

impl AtscContentIdentifier {
    /// Smallest accepted structure: the fixed fields plus one content-id bit.
    pub const MIN_BITS: usize = 33;
    /// Bodies must stay below 242 bytes.
    pub const MAX_BITS: usize = 242 * 8;

    /// The content id as hex text.
    ///
    /// Bits left over after the last whole nibble follow as a `+0b` binary
    /// suffix, e.g. `0xAB+0b101` for 11 bits. A content id shorter than a
    /// nibble renders as binary alone.
    pub fn content_id_hex(&self) -> String {
        let mut bits = self.content_id.cursor();
        let whole = bits.remaining() - bits.remaining() % 4;
        let mut text = match bits.take_slice(whole) {
            Ok(head) if whole > 0 => bits_to_hex(head).unwrap_or_default(),
            _ => String::new(),
        };
        if !bits.is_empty() {
            if !text.is_empty() {
                text.push('+');
            }
            text.push_str("0b");
            while let Ok(bit) = bits.take_flag() {
                text.push(if bit { '1' } else { '0' });
            }
        }
        text
    }
}

fn parse_atsc(mut bits: BitCursor<'_>) -> Result<AtscContentIdentifier, Malformation> {
    let width = bits.remaining();
    if !(AtscContentIdentifier::MIN_BITS..AtscContentIdentifier::MAX_BITS).contains(&width) {
        return Err(CodecError::WrongWidth {
            expected: AtscContentIdentifier::MIN_BITS,
            actual: width,
        }
        .into());
    }

    let tsid = bits.take_uint(16)? as u16;
    bits.skip(2)?;
    let end_of_day = bits.take_uint(5)? as u8;
    let unique_for = bits.take_uint(9)? as u16;
    let content_id = bits.take_rest().to_bits();

    Ok(AtscContentIdentifier {
        tsid,
        end_of_day,
        unique_for,
        content_id,
    })
}

fn parse_multiple_upids(mut bits: BitCursor<'_>) -> Result<Vec<SegmentationUpid>, Malformation> {
    if bits.remaining() < 16 {
        return Err(Malformation::EmptyUpidList(bits.remaining()));
    }

    let mut upids = Vec::new();
    while !bits.is_empty() {
        let upid_type = bits.take_uint(8)? as u8;
        let length = bits.take_uint(8)? as u8;
        let body = bits.take_slice(length as usize * 8)?;
        upids.push(parse_segmentation_upid(upid_type, length, body)?);
    }
    Ok(upids)
}

fn expect_width(bits: &BitCursor<'_>, expected: usize) -> Result<(), CodecError> {
    if bits.remaining() != expected {
        return Err(CodecError::WrongWidth {
            expected,
            actual: bits.remaining(),
        });
    }
    Ok(())
}

/// Decodes a UPID payload of `length` bytes held in `body`.
///
/// An empty body yields a UPID with no information. Types above 0x10 and
/// bodies that do not match their format are errors.
pub fn parse_segmentation_upid(
    upid_type: u8,
    length: u8,
    body: BitCursor<'_>,
) -> Result<SegmentationUpid, Malformation> {
    let upid_type = SegmentationUpidType::try_from(upid_type)?;
    if body.remaining() != length as usize * 8 {
        return Err(Malformation::LengthMismatch {
            declared: length as usize,
            actual_bits: body.remaining(),
        });
    }

    let info = if body.is_empty() {
        None
    } else {
        parse_upid_information(upid_type, body)?
    };

    Ok(SegmentationUpid {
        upid_type,
        length,
        info,
    })
}

fn parse_upid_information(
    upid_type: SegmentationUpidType,
    body: BitCursor<'_>,
) -> Result<Option<SegmentationUpidInformation>, Malformation> {
    use SegmentationUpidInformation as I;
    use SegmentationUpidType as T;

    let info = match upid_type {
        T::NotUsed => return Ok(None),
        T::UserDefined => I::UserDefined(body.to_bytes()),
        T::ISCI => {
            expect_width(&body, 64)?;
            I::ISCI(bits_to_ascii(body)?)
        }
        T::AdID => {
            expect_width(&body, 96)?;
            I::AdID(bits_to_ad_id(body)?)
        }
        T::UMID => I::UMID(bits_to_umid(body)?),
        T::ISAN => {
            expect_width(&body, 64)?;
            I::ISAN(bits_to_isan(body)?)
        }
        T::VISAN => {
            expect_width(&body, 96)?;
            I::VISAN(bits_to_isan(body)?)
        }
        T::TID => {
            expect_width(&body, 96)?;
            I::TID(bits_to_tid(body)?)
        }
        T::TI => {
            expect_width(&body, 64)?;
            I::TI(bits_to_hex(body)?)
        }
        T::ADI => {
            let text = bits_to_ascii(body)?;
            let (element, id) = bits_to_adi(body)?;
            I::ADI(AdiIdentifier { text, element, id })
        }
        T::EIDR => I::EIDR(bits_to_eidr(body)?),
        T::ATSCContentIdentifier => I::ATSC(parse_atsc(body)?),
        T::MPU => I::MPU(bits_to_ascii(body)?),
        T::MID => I::MID(parse_multiple_upids(body)?),
        T::ADSInformation => I::ADS(bits_to_ascii(body)?),
        T::URI => I::URI(bits_to_ascii(body)?),
        T::UUID => {
            expect_width(&body, 128)?;
            I::UUID(bits_to_hex(body)?)
        }
    };
    Ok(Some(info))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(upid_type: u8, body: &[u8]) -> Result<SegmentationUpid, Malformation> {
        parse_segmentation_upid(upid_type, body.len() as u8, BitCursor::new(body))
    }

    #[test]
    fn test_upid_type_conversion() {
        assert_eq!(u8::from(SegmentationUpidType::NotUsed), 0x00);
        assert_eq!(u8::from(SegmentationUpidType::AdID), 0x03);
        assert_eq!(u8::from(SegmentationUpidType::UUID), 0x10);
        for code in 0x00..=0x10 {
            let upid_type = SegmentationUpidType::try_from(code).unwrap();
            assert_eq!(u8::from(upid_type), code);
        }
    }

    #[test]
    fn test_upid_type_above_range_is_unsupported() {
        assert_eq!(
            SegmentationUpidType::try_from(0x11),
            Err(Malformation::UnsupportedUpidType(0x11))
        );
        assert_eq!(
            parse(0xFF, b"abc"),
            Err(Malformation::UnsupportedUpidType(0xFF))
        );
    }

    #[test]
    fn test_upid_type_names() {
        assert_eq!(SegmentationUpidType::VISAN.name(), "V-ISAN");
        assert_eq!(
            SegmentationUpidType::ATSCContentIdentifier.to_string(),
            "ATSC Content Identifier"
        );
        assert_eq!(
            SegmentationUpidType::UUID.description(),
            "Universally unique identifier (see RFC 4122)."
        );
    }

    #[test]
    fn test_empty_body_has_no_information() {
        let upid = parse(0x03, &[]).unwrap();
        assert_eq!(upid.upid_type, SegmentationUpidType::AdID);
        assert_eq!(upid.length, 0);
        assert_eq!(upid.info, None);
    }

    #[test]
    fn test_not_used_ignores_body() {
        let upid = parse(0x00, &[0x01, 0x02]).unwrap();
        assert_eq!(upid.info, None);
    }

    #[test]
    fn test_ad_id() {
        let upid = parse(0x03, b"ABCD0123456H").unwrap();
        assert_eq!(
            upid.info,
            Some(SegmentationUpidInformation::AdID("ABCD0123456H".to_string()))
        );
    }

    #[test]
    fn test_ad_id_wrong_width() {
        assert_eq!(
            parse(0x03, b"ABCD0123"),
            Err(Malformation::Codec(CodecError::WrongWidth {
                expected: 96,
                actual: 64
            }))
        );
    }

    #[test]
    fn test_isci() {
        let upid = parse(0x02, b"ABCD1234").unwrap();
        assert_eq!(
            upid.info,
            Some(SegmentationUpidInformation::ISCI("ABCD1234".to_string()))
        );
    }

    #[test]
    fn test_ti_and_uuid_as_hex() {
        let upid = parse(0x08, &[0x00, 0x00, 0x00, 0x00, 0x2E, 0x53, 0x84, 0x81]).unwrap();
        assert_eq!(
            upid.info,
            Some(SegmentationUpidInformation::TI("0x000000002E538481".to_string()))
        );

        let bytes: Vec<u8> = (0u8..16).collect();
        let upid = parse(0x10, &bytes).unwrap();
        assert_eq!(
            upid.info,
            Some(SegmentationUpidInformation::UUID(
                "0x000102030405060708090A0B0C0D0E0F".to_string()
            ))
        );
    }

    #[test]
    fn test_text_upids() {
        let upid = parse(0x0F, b"urn:uuid:1234").unwrap();
        assert_eq!(
            upid.info,
            Some(SegmentationUpidInformation::URI("urn:uuid:1234".to_string()))
        );
        let upid = parse(0x0E, b"LA309").unwrap();
        assert_eq!(
            upid.info,
            Some(SegmentationUpidInformation::ADS("LA309".to_string()))
        );
    }

    #[test]
    fn test_adi() {
        let upid = parse(0x09, b"SIGNAL: provider.com/asset").unwrap();
        let Some(SegmentationUpidInformation::ADI(adi)) = upid.info else {
            panic!("Expected ADI information");
        };
        assert_eq!(adi.text, "SIGNAL: provider.com/asset");
        assert_eq!(adi.element, AdiElement::Signal);
        assert_eq!(adi.id, "provider.com/asset");
    }

    #[test]
    fn test_user_defined_keeps_bytes() {
        let upid = parse(0x01, &[0xDE, 0xAD]).unwrap();
        assert_eq!(
            upid.info,
            Some(SegmentationUpidInformation::UserDefined(vec![0xDE, 0xAD]))
        );
    }

    #[test]
    fn test_atsc_content_identifier() {
        // tsid 0x1102, reserved 00, end_of_day 2, unique_for 70, content id 0xAB
        let body = [0x11, 0x02, 0x04, 0x46, 0xAB];
        let upid = parse(0x0B, &body).unwrap();
        let Some(SegmentationUpidInformation::ATSC(atsc)) = upid.info else {
            panic!("Expected ATSC information");
        };
        assert_eq!(atsc.tsid, 0x1102);
        assert_eq!(atsc.end_of_day, 2);
        assert_eq!(atsc.unique_for, 70);
        assert_eq!(atsc.content_id.len(), 8);
        assert_eq!(atsc.content_id_hex(), "0xAB");
    }

    #[test]
    fn test_atsc_content_id_with_partial_nibble() {
        let mut content_id = Bits::from_bytes(vec![0xAB]);
        content_id.push_uint(0b101, 3);
        let atsc = AtscContentIdentifier {
            tsid: 1,
            end_of_day: 0,
            unique_for: 0,
            content_id,
        };
        assert_eq!(atsc.content_id_hex(), "0xAB+0b101");
        assert_eq!(
            SegmentationUpidInformation::ATSC(atsc).to_string(),
            "tsid=1 end_of_day=0 unique_for=0 content_id=0xAB+0b101"
        );

        let short = AtscContentIdentifier {
            tsid: 1,
            end_of_day: 0,
            unique_for: 0,
            content_id: [true, false].into_iter().collect(),
        };
        assert_eq!(short.content_id_hex(), "0b10");
    }

    #[test]
    fn test_atsc_requires_content_id() {
        let body = [0x11, 0x02, 0x04, 0x46];
        assert!(matches!(
            parse(0x0B, &body),
            Err(Malformation::Codec(CodecError::WrongWidth { actual: 32, .. }))
        ));
    }

    #[test]
    fn test_multiple_upids() {
        let mut body = vec![0x0E, 0x05];
        body.extend_from_slice(b"LA309");
        body.extend_from_slice(&[0x08, 0x08, 0x00, 0x00, 0x00, 0x00, 0x2E, 0x53, 0x84, 0x81]);

        let upid = parse(0x0D, &body).unwrap();
        let Some(SegmentationUpidInformation::MID(upids)) = &upid.info else {
            panic!("Expected MID information");
        };
        assert_eq!(upids.len(), 2);
        assert_eq!(
            upids[0].info,
            Some(SegmentationUpidInformation::ADS("LA309".to_string()))
        );
        assert_eq!(
            upids[1].info,
            Some(SegmentationUpidInformation::TI("0x000000002E538481".to_string()))
        );
        assert_eq!(
            upid.info.unwrap().to_string(),
            "ADS Information: LA309, TI: 0x000000002E538481"
        );
    }

    #[test]
    fn test_multiple_upids_too_short() {
        assert_eq!(parse(0x0D, &[0x0E]), Err(Malformation::EmptyUpidList(8)));
    }

    #[test]
    fn test_multiple_upids_truncated_entry() {
        // declares 5 bytes but carries 2
        assert!(matches!(
            parse(0x0D, &[0x0E, 0x05, b'L', b'A']),
            Err(Malformation::Underflow(_))
        ));
    }
}
