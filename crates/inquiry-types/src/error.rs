//! Error types for Class of Device text parsing.

use std::num::ParseIntError;

use thiserror::Error;

/// Errors that can occur when parsing a textual Class of Device value.
///
/// Decoding an integer never fails; only the hexadecimal text wrapper
/// can produce this error.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The input contained no hex digits.
    #[error("Empty device class value")]
    Empty,

    /// The input is not a valid base-16 number that fits in 32 bits.
    #[error("Invalid hexadecimal device class '{input}': {source}")]
    InvalidHex {
        /// The text that failed to parse.
        input: String,
        /// The underlying integer parse error.
        #[source]
        source: ParseIntError,
    },
}

/// Result type alias using inquiry-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
