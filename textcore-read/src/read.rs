//! Traits for interpreting font data

use types::Tag;

use crate::font_data::FontData;

/// A type that can be read from raw table data.
///
/// This trait is implemented for all font tables that are self-describing: that
/// is, tables that do not require any external state in order to interpret their
/// underlying bytes. (Tables that require external state implement
/// [`FontReadWithArgs`] instead)
pub trait FontRead<'a>: Sized {
    /// Read an instance of `Self` from the provided data, performing validation.
    ///
    /// In the case of a table, this method is responsible for ensuring the input
    /// data is consistent: this means ensuring that any versioned fields are
    /// present as required by the version, and that any array lengths are not
    /// out-of-bounds.
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

/// A trait for a type that needs additional arguments to be read.
pub trait ReadArgs {
    type Args: Copy;
}

/// A trait for types that require external data in order to be constructed.
///
/// If a type requires multiple arguments, they are passed as a tuple.
pub trait FontReadWithArgs<'a>: Sized + ReadArgs {
    /// read an item, using the provided args.
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError>;
}

/// An error that occurs when reading font data
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReadError {
    OutOfBounds,
    // i64 is flexible enough to store any value we might encounter
    InvalidFormat(i64),
    InvalidSfnt(u32),
    MissingHead,
    InvalidCollectionIndex(u32),
    InvalidArrayLen,
    InvalidChecksum,
    InvalidDfont,
    TableIsMissing(Tag),
    UnsupportedTuples,
    ClassCountTooSmall(u32),
    VariationParse(&'static str),
    MalformedData(&'static str),
    Decompression,
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "An offset was out of bounds"),
            ReadError::InvalidFormat(x) => write!(f, "Invalid format '{x}'"),
            ReadError::InvalidSfnt(ver) => write!(f, "Invalid sfnt version 0x{ver:08X}"),
            ReadError::MissingHead => write!(f, "the font has no head or bhed table"),
            ReadError::InvalidCollectionIndex(ix) => {
                write!(f, "Invalid index {ix} for font collection")
            }
            ReadError::InvalidArrayLen => {
                write!(f, "Specified array length not a multiple of item size")
            }
            ReadError::InvalidChecksum => write!(f, "Invalid table checksum"),
            ReadError::InvalidDfont => write!(f, "Invalid dfont resource map"),
            ReadError::TableIsMissing(tag) => write!(f, "the {tag} table is missing"),
            ReadError::UnsupportedTuples => {
                write!(f, "kerning subtables with variation tuples are not supported")
            }
            ReadError::ClassCountTooSmall(n) => {
                write!(f, "state table has {n} classes, at least 4 are required")
            }
            ReadError::VariationParse(msg) => write!(f, "Invalid variation data: '{msg}'"),
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
            ReadError::Decompression => write!(f, "Failed to decompress table data"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReadError {}
