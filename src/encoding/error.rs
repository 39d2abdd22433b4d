//! Error types for encoding operations.

use thiserror::Error;

use crate::error::CodecError;

/// Result type for encoding operations.
pub type EncodingResult<T> = Result<T, EncodingError>;

/// Errors that can occur during encoding operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Invalid field value that cannot be encoded.
    #[error("invalid field value: {field} = {value}")]
    InvalidFieldValue {
        /// Name of the field with invalid value.
        field: &'static str,
        /// String representation of the invalid value.
        value: String,
    },

    /// Value exceeds the maximum allowed for its bit width.
    #[error("value too large for field {field}: {actual_value} > {max_value} (max)")]
    ValueTooLarge {
        /// Name of the field.
        field: &'static str,
        /// Maximum allowed value.
        max_value: u64,
        /// Actual value provided.
        actual_value: u64,
    },

    /// Identifier text could not be turned back into bits.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
