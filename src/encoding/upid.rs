//! Encoding implementations for segmentation UPIDs.
//!
//! Textual identifiers are turned back into bits through the reverse scalar
//! codecs, so a decoded UPID re-encodes to the bytes it came from.

use crate::bit_reader::Bits;
use crate::codec::{ascii_to_bits, eidr_to_bits, hex_to_bits, isan_to_bits, umid_to_bits};
use crate::encoding::{BitWriter, Encodable, EncodingError, EncodingResult};
use crate::upid::{AtscContentIdentifier, SegmentationUpid, SegmentationUpidInformation};

impl Encodable for AtscContentIdentifier {
    fn encode(&self, writer: &mut BitWriter) -> EncodingResult<()> {
        writer.write_field("tsid", self.tsid as u64, 16)?;
        // reserved
        writer.write_bits(0, 2)?;
        writer.write_field("end_of_day", self.end_of_day as u64, 5)?;
        writer.write_field("unique_for", self.unique_for as u64, 9)?;
        writer.write_bits_from(&self.content_id)
    }

    fn encoded_bits(&self) -> usize {
        32 + self.content_id.len()
    }
}

impl Encodable for SegmentationUpid {
    /// Writes `segmentation_upid_type`, `segmentation_upid_length` and the
    /// payload. The payload must fill exactly `length` bytes.
    fn encode(&self, writer: &mut BitWriter) -> EncodingResult<()> {
        let body = match &self.info {
            Some(info) => {
                if info.upid_type() != self.upid_type {
                    return Err(EncodingError::InvalidFieldValue {
                        field: "segmentation_upid_type",
                        value: format!("{} carrying {} information", self.upid_type, info.upid_type()),
                    });
                }
                information_to_bits(info)?
            }
            None => Bits::new(),
        };

        if body.len() != self.length as usize * 8 {
            return Err(EncodingError::InvalidFieldValue {
                field: "segmentation_upid_length",
                value: format!("{} bytes declared for a {}-bit payload", self.length, body.len()),
            });
        }

        writer.write_bits(u8::from(self.upid_type) as u64, 8)?;
        writer.write_bits(self.length as u64, 8)?;
        writer.write_bits_from(&body)
    }

    fn encoded_bits(&self) -> usize {
        16 + self.length as usize * 8
    }
}

fn information_to_bits(info: &SegmentationUpidInformation) -> EncodingResult<Bits> {
    use SegmentationUpidInformation::*;

    let bits = match info {
        UserDefined(bytes) => Bits::from_bytes(bytes.clone()),
        ISCI(text) | AdID(text) | TID(text) | MPU(text) | ADS(text) | URI(text) => {
            ascii_to_bits(text)?
        }
        ADI(adi) => ascii_to_bits(&adi.text)?,
        UMID(text) => umid_to_bits(text)?,
        ISAN(text) | VISAN(text) => isan_to_bits(text)?,
        EIDR(text) => eidr_to_bits(text)?,
        TI(text) | UUID(text) => hex_to_bits(text)?,
        ATSC(atsc) => atsc.encode_to_bits()?,
        MID(upids) => {
            let mut writer = BitWriter::new();
            for upid in upids {
                upid.encode(&mut writer)?;
            }
            writer.into_bits()
        }
    };
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bit_reader::BitCursor;
    use crate::upid::{SegmentationUpidType, parse_segmentation_upid};

    fn round_trip(upid_type: u8, body: &[u8]) {
        let upid = parse_segmentation_upid(upid_type, body.len() as u8, BitCursor::new(body))
            .expect("payload should decode");
        let bits = upid.encode_to_bits().expect("payload should encode");

        let mut expected = vec![upid_type, body.len() as u8];
        expected.extend_from_slice(body);
        assert_eq!(bits.len(), upid.encoded_bits());
        assert_eq!(bits.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_text_identifiers_round_trip() {
        round_trip(0x03, b"ABCD0123456H");
        round_trip(0x07, b"MV0004146400");
        round_trip(0x02, b"ABCD1234");
        round_trip(0x0E, b"LA309");
        round_trip(0x0F, b"urn:uuid:f81d4fae");
        round_trip(0x09, b"SIGNAL: 1234/abcd");
    }

    #[test]
    fn test_structured_identifiers_round_trip() {
        // UMID
        round_trip(
            0x04,
            &[
                0x06, 0x0A, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x05, 0x01, 0x01, 0x0D, 0x20, 0x13, 0x00,
                0x00, 0x00, 0xD2, 0xC9, 0x03, 0x6C, 0x8F, 0x19, 0x53, 0x43, 0xAB, 0x70, 0x14, 0xD2,
                0xD7, 0x18, 0xBF, 0xDA,
            ],
        );
        // V-ISAN
        round_trip(
            0x06,
            &[
                0x15, 0x3C, 0x73, 0x65, 0xB3, 0x6F, 0x84, 0x4C, 0x87, 0x34, 0x94, 0x20,
            ],
        );
        // ISAN
        round_trip(0x05, &[0x00, 0x00, 0x00, 0x01, 0x2A, 0x3B, 0x4C, 0x5D]);
        // EIDR
        round_trip(
            0x0A,
            &[
                0x14, 0x78, 0xF8, 0x5A, 0xE1, 0x00, 0xB0, 0x68, 0x5B, 0x8F, 0xB1, 0xC8,
            ],
        );
        // TI
        round_trip(0x08, &[0x00, 0x00, 0x00, 0x00, 0x2E, 0x53, 0x84, 0x81]);
        // ATSC
        round_trip(0x0B, &[0x11, 0x02, 0x04, 0x46, 0xAB]);
        // user defined
        round_trip(0x01, &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_multiple_upids_round_trip() {
        round_trip(
            0x0D,
            &[
                0x0E, 0x05, b'L', b'A', b'3', b'0', b'9', 0x08, 0x08, 0x00, 0x00, 0x00, 0x00, 0x2E,
                0x53, 0x84, 0x81,
            ],
        );
    }

    #[test]
    fn test_not_used_encodes_header_only() {
        let bits = SegmentationUpid::not_used().encode_to_bits().unwrap();
        assert_eq!(bits.as_bytes(), &[0x00, 0x00]);
    }

    #[test]
    fn test_length_must_match_payload() {
        let upid = SegmentationUpid {
            upid_type: SegmentationUpidType::AdID,
            length: 10,
            info: Some(SegmentationUpidInformation::AdID("ABCD0123456H".to_string())),
        };
        assert!(matches!(
            upid.encode_to_bits(),
            Err(EncodingError::InvalidFieldValue {
                field: "segmentation_upid_length",
                ..
            })
        ));
    }

    #[test]
    fn test_type_must_match_information() {
        let upid = SegmentationUpid {
            upid_type: SegmentationUpidType::TID,
            length: 12,
            info: Some(SegmentationUpidInformation::AdID("ABCD0123456H".to_string())),
        };
        assert!(matches!(
            upid.encode_to_bits(),
            Err(EncodingError::InvalidFieldValue {
                field: "segmentation_upid_type",
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_text_is_a_codec_error() {
        let upid = SegmentationUpid {
            upid_type: SegmentationUpidType::EIDR,
            length: 12,
            info: Some(SegmentationUpidInformation::EIDR("not an eidr".to_string())),
        };
        assert!(matches!(
            upid.encode_to_bits(),
            Err(EncodingError::Codec(_))
        ));
    }

    #[test]
    fn test_atsc_rejects_oversized_fields() {
        let atsc = AtscContentIdentifier {
            tsid: 1,
            end_of_day: 40,
            unique_for: 0,
            content_id: Bits::from_bytes(vec![0xAB]),
        };
        assert!(matches!(
            atsc.encode_to_bits(),
            Err(EncodingError::ValueTooLarge {
                field: "end_of_day",
                ..
            })
        ));
    }
}
