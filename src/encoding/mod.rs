//! Binary encoding support for SCTE-35 structures.
//!
//! Covers the pieces that must survive a decode/encode round trip: splice
//! times, break durations and segmentation UPIDs, including nested `MID`
//! lists and ATSC content identifiers.

/// Error types for encoding operations.
pub mod error;

/// Bit-level writer for encoding binary data.
pub mod writer;

/// Trait definitions for encodable types.
pub mod traits;

mod time;
mod upid;

#[cfg(test)]
mod tests;

pub use error::{EncodingError, EncodingResult};
pub use traits::Encodable;
pub use writer::BitWriter;
