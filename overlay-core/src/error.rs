use alloc::string::String;
use owo_colors::OwoColorize;

/// Errors raised by buffer operations and by the get/set codecs of
/// [`NativeType`](crate::NativeType) implementations.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AccessError {
    /// A read or write reached past the end of a buffer or view.
    OutOfBounds {
        /// Offset the access started at, relative to the view.
        offset: usize,
        /// Number of bytes the access covered.
        len: usize,
        /// Length of the view the access was attempted on.
        buffer_len: usize,
    },

    /// A setter was handed a value kind its type cannot encode.
    ValueMismatch {
        /// What the type can encode.
        expected: &'static str,
        /// The kind of value it got instead.
        actual: &'static str,
    },

    /// A string could not be encoded as a C string.
    InvalidString {
        /// Why the encoding failed (e.g. an interior NUL byte).
        reason: String,
    },

    /// A pointer read back from a buffer did not lead to readable data.
    BadPointer {
        /// The address that was stored in the buffer.
        address: usize,
    },

    /// A composite setter was handed a record key that names no member.
    UnknownField {
        /// The key that matched nothing.
        name: String,
    },
}

impl core::fmt::Display for AccessError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AccessError::OutOfBounds {
                offset,
                len,
                buffer_len,
            } => {
                write!(
                    f,
                    "Out of bounds: {} bytes at offset {} in a {}-byte buffer",
                    len.yellow(),
                    offset.yellow(),
                    buffer_len.red()
                )
            }
            AccessError::ValueMismatch { expected, actual } => {
                write!(
                    f,
                    "Value mismatch: expected {}, got {}",
                    expected.green(),
                    actual.red()
                )
            }
            AccessError::InvalidString { reason } => {
                write!(f, "Cannot encode as a C string: {reason}")
            }
            AccessError::BadPointer { address } => {
                write!(
                    f,
                    "Cannot read through pointer {}",
                    format_args!("{address:#x}").red()
                )
            }
            AccessError::UnknownField { name } => {
                write!(f, "No member named {}", name.red())
            }
        }
    }
}

impl core::error::Error for AccessError {}
