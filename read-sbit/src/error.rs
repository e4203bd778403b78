use types::GlyphId;

use crate::read::ReadError;

use std::fmt;

/// Errors that may occur when loading bitmap glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// The strike has no bitmap for the requested glyph.
    ///
    /// This is a missing-glyph signal, not file corruption: the index
    /// data was well formed but recorded no image for the glyph.
    GlyphNotFound(GlyphId),
    /// No strike matches the requested pixel size, or the size is
    /// outside the representable range.
    InvalidPixelSize { x_ppem: u16, y_ppem: u16 },
    /// Exceeded the recursion limit when loading a compound glyph.
    RecursionLimitExceeded(GlyphId),
    /// Error occurred when reading font data.
    Read(ReadError),
}

impl From<ReadError> for LoadError {
    fn from(e: ReadError) -> Self {
        Self::Read(e)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::GlyphNotFound(gid) => {
                write!(f, "No bitmap data was found for glyph {gid}")
            }
            Self::InvalidPixelSize { x_ppem, y_ppem } => {
                write!(f, "No strike matches the pixel size {x_ppem}x{y_ppem}")
            }
            Self::RecursionLimitExceeded(gid) => write!(
                f,
                "Recursion limit ({}) exceeded when loading compound component {gid}",
                crate::SBIT_COMPOSITE_RECURSION_LIMIT,
            ),
            Self::Read(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Result type for errors that may occur when loading bitmap glyphs.
pub type Result<T> = core::result::Result<T, LoadError>;
