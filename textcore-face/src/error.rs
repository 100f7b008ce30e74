//! Error types for the face crate.

use core::fmt;

use textcore_read::{types::GlyphId, ReadError};

/// Errors that may occur when loading glyphs or building fonts.
#[derive(Clone, Debug)]
pub enum FontError {
    /// The font has no glyph outline or bitmap source.
    NoSources,
    /// The requested glyph was not present in the font.
    GlyphNotFound(GlyphId),
    /// Exceeded the composite nesting limit while loading a glyph.
    RecursionLimitExceeded(GlyphId),
    /// The face index does not select a font in the file.
    InvalidFaceIndex(u32),
    /// Error occurred while reading font data.
    Read(ReadError),
}

impl From<ReadError> for FontError {
    fn from(e: ReadError) -> Self {
        Self::Read(e)
    }
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSources => write!(f, "No glyph sources are available for the given font"),
            Self::GlyphNotFound(gid) => write!(f, "Glyph {gid} was not found in the given font"),
            Self::RecursionLimitExceeded(gid) => write!(
                f,
                "Recursion limit ({}) exceeded in composite glyph {gid}",
                crate::outline::COMPOSITE_RECURSION_LIMIT
            ),
            Self::InvalidFaceIndex(index) => write!(f, "Face index {index} is out of range"),
            Self::Read(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FontError {}
