//! Glyphs, metrics and fontsets over parsed OpenType fonts.
//!
//! This crate sits above the table parsers of
//! [`textcore-read`](textcore_read) and provides the pieces a shaper needs
//! from a font: character mapping, global and glyph metrics (with
//! variations applied), TrueType outlines as path segments, embedded
//! bitmap strikes and glyph extents. The [`fontset`] module binds font
//! patterns produced by an external matcher to fonts at a size and
//! variable location.
//!
//! Most functionality is reached through the [`MetadataProvider`] trait,
//! which is implemented for every [`TableProvider`](raw::TableProvider).

#![forbid(unsafe_code)]

/// Expose our "raw" underlying parser crate.
pub extern crate textcore_read as raw;

pub mod bitmap;
pub mod charmap;
pub mod fontset;
pub mod metrics;
pub mod outline;
pub mod variation;

mod error;
mod provider;

pub use error::FontError;
pub use provider::MetadataProvider;

/// Type for a glyph identifier.
pub type GlyphId = textcore_read::types::GlyphId;

/// Type for a 4-byte tag used to identify font tables and other resources.
pub type Tag = textcore_read::types::Tag;

/// Type for a normalized variation coordinate.
pub type NormalizedCoord = textcore_read::types::F2Dot14;
