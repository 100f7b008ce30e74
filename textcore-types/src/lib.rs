//! Common [scalar data types][data types] used by the textcore crates.
//!
//! These are the primitives shared by the font parser, the bidi engine
//! and the face layer: tags, glyph identifiers, fixed point numbers and
//! the big-endian wrappers used for zero-copy record access.
//!
//! [data types]: https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types

#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

mod bbox;
mod fixed;
mod glyph_id;
mod name_id;
mod offset;
mod pen;
mod point;
mod raw;
mod tag;
mod uint24;
mod version;

#[cfg(all(test, feature = "serde"))]
mod serde_test;

pub use bbox::BoundingBox;
pub use fixed::{F26Dot6, F2Dot14, Fixed};
pub use glyph_id::GlyphId;
pub use name_id::NameId;
pub use offset::{Offset16, Offset32};
pub use pen::{Pen, PenCommand};
pub use point::Point;
pub use raw::{BigEndian, FixedSize, Scalar};
pub use tag::{InvalidTag, Tag};
pub use uint24::Uint24;
pub use version::{MajorMinor, Version16Dot16};

/// The header tag for a font collection file.
pub const TTC_HEADER_TAG: Tag = Tag::new(b"ttcf");

/// The header tag for a WOFF 1.0 file.
pub const WOFF_HEADER_TAG: Tag = Tag::new(b"wOFF");

/// The SFNT version for fonts containing TrueType outlines.
pub const TT_SFNT_VERSION: u32 = 0x00010000;
/// The SFNT version for fonts containing CFF outlines.
pub const CFF_SFNT_VERSION: u32 = 0x4F54544F;
/// The SFNT version for legacy Apple fonts containing TrueType outlines.
pub const TRUE_SFNT_VERSION: u32 = 0x74727565;
/// The SFNT version for legacy Apple fonts wrapping a PostScript Type 1 font.
pub const TYP1_SFNT_VERSION: u32 = 0x74797031;
/// The first four bytes of a Mac resource fork (dfont): the resource data
/// offset, which is always 256.
pub const DFONT_RESOURCE_DATA_OFFSET: u32 = 0x00000100;
