//! # SCTE-35 Decoder
//!
//! A Rust library for decoding SCTE-35 (Society of Cable Telecommunications
//! Engineers) splice information sections: the digital program insertion
//! cues that mark ad breaks, program boundaries and other splice points in
//! MPEG transport streams.
//!
//! ## Features
//!
//! - Bit-exact decoding of the splice information section header
//! - Splice commands: null, schedule, insert, time signal, bandwidth
//!   reservation and private command
//! - Splice descriptors: avail, DTMF, segmentation, time and audio
//! - Segmentation UPIDs with their textual renderings (Ad-ID, UMID, ISAN,
//!   EIDR, TID, ADI, ATSC content identifiers, nested `MID` lists, ...)
//! - Round-trip encoding of UPIDs and splice times
//! - Optional CRC-32/MPEG-2 verification (`crc-validation` feature)
//! - Base64 and hex text adapters (`text` feature)
//! - Serde support for the whole result tree (`serde` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use scte35_decoder::{decode_base64, SpliceCommand};
//!
//! let section = decode_base64(
//!     "/DAvAAAAAAAAAP///wViAAWKf+//CXVCAv4AUmXAAzUAAAAKAAhDVUVJADgyMWLvc/g=",
//! )
//! .unwrap();
//!
//! if let SpliceCommand::Insert(insert) = &section.splice_command {
//!     assert_eq!(insert.splice_event_id, 1_644_168_586);
//! }
//! assert_eq!(section.crc_32, "0x62EF73F8");
//! ```
//!
//! ## Errors
//!
//! Decoding is all-or-nothing: the first malformed field aborts the message
//! with a [`DecodeError`] naming the failing category. No partial result is
//! ever returned.
//!
//! ## Logging
//!
//! The library logs through the [`log`] facade. Tolerated anomalies, such as
//! an empty descriptor body, are reported at `warn` level.

pub mod bit_reader;
pub mod check_digit;
pub mod codec;
pub mod crc;
pub mod descriptors;
pub mod encoding;
pub mod error;
pub mod fmt;
pub mod parser;
pub mod time;
#[cfg(feature = "text")]
pub mod transport;
pub mod types;
pub mod upid;


pub use bit_reader::{BitCursor, Bits};
pub use descriptors::{
    AudioComponent, AudioDescriptor, AvailDescriptor, CUEI_IDENTIFIER, DeviceRestrictions,
    DtmfDescriptor, PidComponent, Restrictions, SegmentationAdditionalInfo,
    SegmentationDescriptor, SegmentationTypeId, SpliceDescriptor, TimeDescriptor,
};
pub use error::{
    CodecError, CommandKind, DecodeError, DecodeResult, DescriptorKind, Malformation,
    TextEncoding, Underflow,
};
pub use parser::decode;
pub use time::{BreakDuration, SpliceTime};
#[cfg(feature = "text")]
pub use transport::{decode_base64, decode_hex};
pub use types::{
    EncryptionAlgorithm, InsertComponent, InsertEvent, InsertEventInformation, ScheduleComponent,
    ScheduleEvent, ScheduleEventInformation, ScheduleInfo, SpliceCommand, SpliceInfoSection,
    Tier,
};
pub use upid::{
    AdiIdentifier, AtscContentIdentifier, SegmentationUpid, SegmentationUpidInformation,
    SegmentationUpidType,
};
