//! Errors that occur when interpreting font data

use types::Tag;

/// An error that occurs when reading font data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// An offset or read crossed the end of a table.
    OutOfBounds,
    /// A version, format, or depth field had an unsupported value.
    // i64 is flexible enough to store any value we might encounter
    InvalidFormat(i64),
    /// An array's byte range was not a multiple of its record size.
    InvalidArrayLen,
    /// A required table was not provided by the host font.
    TableIsMissing(Tag),
    /// Structurally malformed data.
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "An offset was out of bounds"),
            ReadError::InvalidFormat(x) => write!(f, "Invalid format '{x}'"),
            ReadError::InvalidArrayLen => {
                write!(f, "Specified array length not a multiple of item size")
            }
            ReadError::TableIsMissing(tag) => write!(f, "the {tag} table is missing"),
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
        }
    }
}

impl std::error::Error for ReadError {}
