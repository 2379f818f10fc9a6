use thiserror::Error;

use crate::archive::ArchiveMode;

/// Errors raised while encoding or decoding through a `BitArchive`
///
/// Any of these aborts the message being decoded. Callers must discard the
/// whole in-flight message rather than apply the part that was read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The underlying byte source ran dry in the middle of a value
    #[error("Unexpected end of stream while reading {context}")]
    UnexpectedEndOfStream { context: &'static str },

    /// A bit-width outside of 1..=32 was requested
    #[error("Bit width {bits} is out of range, must be between 1 and 32")]
    InvalidBitWidth { bits: u8 },

    /// A length prefix was negative
    #[error("Length prefix {length} is negative")]
    NegativeLength { length: i32 },

    /// A value is too long for its length prefix
    #[error("Length {length} does not fit in a {prefix} length prefix")]
    LengthOverflow { length: usize, prefix: &'static str },

    /// A value does not fit in the declared number of bits
    #[error("Value {value} does not fit in {bits} bits")]
    ValueOutOfRange { value: i64, bits: u8 },

    /// A string payload was not valid UTF-8
    #[error("String payload of {length} bytes is not valid UTF-8")]
    InvalidUtf8 { length: usize },

    /// Archive was used in the wrong direction for the current pass
    #[error("Archive is not open for {expected:?}")]
    WrongMode { expected: ArchiveMode },
}
