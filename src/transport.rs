//! Text transports in front of the binary decoder.
//!
//! Cues usually travel as base64 (HLS tags, DASH events) or as hex dumps
//! with a `0x` prefix. Both adapters convert the text and hand the bytes to
//! [`decode`].

use data_encoding::{BASE64, HEXLOWER_PERMISSIVE};

use crate::error::{DecodeError, DecodeResult, TextEncoding};
use crate::parser::decode;
use crate::types::SpliceInfoSection;

/// Converts standard, padded base64 text into bytes.
pub fn base64_to_bytes(text: &str) -> DecodeResult<Vec<u8>> {
    BASE64
        .decode(text.trim().as_bytes())
        .map_err(|e| DecodeError::MalformedInputText {
            encoding: TextEncoding::Base64,
            message: e.to_string(),
        })
}

/// Converts hex text, with or without a `0x`/`0X` prefix, into bytes.
/// Digits may be upper or lower case.
pub fn hex_to_bytes(text: &str) -> DecodeResult<Vec<u8>> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    HEXLOWER_PERMISSIVE
        .decode(digits.as_bytes())
        .map_err(|e| DecodeError::MalformedInputText {
            encoding: TextEncoding::Hex,
            message: e.to_string(),
        })
}

/// Decodes a base64-encoded splice information section.
///
/// # Example
///
/// ```rust
/// use scte35_decoder::{decode_base64, SegmentationUpidInformation};
///
/// let section = decode_base64(
///     "/DA4AAAAAAAA///wBQb+AAAAAAAiAiBDVUVJAAAAA3//AAApPWwDDEFCQ0QwMTIzNDU2SBAAAGgCL9A=",
/// )
/// .unwrap();
/// let segmentation = section.splice_descriptors[0].as_segmentation().unwrap();
/// let info = segmentation.information.as_ref().unwrap();
/// assert_eq!(
///     info.segmentation_upid.info,
///     Some(SegmentationUpidInformation::AdID("ABCD0123456H".to_string()))
/// );
/// ```
pub fn decode_base64(text: &str) -> DecodeResult<SpliceInfoSection> {
    decode(&base64_to_bytes(text)?)
}

/// Decodes a hex-encoded splice information section.
pub fn decode_hex(text: &str) -> DecodeResult<SpliceInfoSection> {
    decode(&hex_to_bytes(text)?)
}
