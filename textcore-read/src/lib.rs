//! Reading OpenType, TrueType and AAT font files.
//!
//! This crate provides memory safe, mostly zero-allocation parsing of font
//! files. Tables are exposed as thin views over the underlying bytes; all
//! offsets are range checked before they are followed and malformed data
//! yields a [`ReadError`] rather than a panic.
//!
//! Supported containers are single SFNT files (TrueType, CFF and the legacy
//! Apple `true` and `typ1` flavors), collections (`ttcf`), Mac resource
//! forks (dfont) and, with the `std` feature, WOFF 1.0.
//!
//! In addition to raw data access, this crate provides reference
//! implementations of the algorithms needed for the data to be useful:
//! mapping codepoints with the [`cmap`][tables::cmap] table, normalizing
//! variation coordinates, decoding `glyf` points and extracting kerning
//! from `kern`, `kerx` and `GPOS`.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use textcore_read::{FontRef, TableProvider};
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! // Single fonts only. for font collections (.ttc) use FontRef::from_index
//! let font = FontRef::new(&font_bytes).expect("failed to read font data");
//! let head = font.head().expect("missing 'head' table");
//! let maxp = font.maxp().expect("missing 'maxp' table");
//!
//! println!("{} units per em, {} glyphs", head.units_per_em(), maxp.num_glyphs());
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

mod dfont;
mod font_data;
mod read;
mod table_provider;
pub mod tables;
#[cfg(feature = "std")]
pub mod woff;

pub use dfont::DfontRef;
pub use font_data::{Cursor, FontData};
pub use read::{FontRead, FontReadWithArgs, ReadArgs, ReadError};
pub use table_provider::{TableProvider, TopLevelTable};
#[cfg(feature = "std")]
pub use woff::WoffFont;

/// Public re-export of the textcore-types crate.
pub extern crate textcore_types as types;

use types::{
    BigEndian, FixedSize, Tag, CFF_SFNT_VERSION, DFONT_RESOURCE_DATA_OFFSET, TRUE_SFNT_VERSION,
    TTC_HEADER_TAG, TT_SFNT_VERSION, TYP1_SFNT_VERSION, WOFF_HEADER_TAG,
};

const HEAD: Tag = Tag::new(b"head");
const BHED: Tag = Tag::new(b"bhed");

/// Reference to the content of a font file of any supported container
/// format.
#[derive(Clone)]
pub enum FileRef<'a> {
    /// A single font.
    Font(FontRef<'a>),
    /// A WOFF 1.0 wrapped font.
    #[cfg(feature = "std")]
    Woff(WoffFont<'a>),
    /// A collection of fonts.
    Collection(CollectionRef<'a>),
    /// A Mac resource fork holding one or more `sfnt` resources.
    Dfont(DfontRef<'a>),
}

impl<'a> FileRef<'a> {
    /// Sniffs the container signature and parses the file header.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let signature = FontData::new(data).read_at::<u32>(0)?;
        match signature {
            TT_SFNT_VERSION | CFF_SFNT_VERSION | TRUE_SFNT_VERSION | TYP1_SFNT_VERSION => {
                FontRef::new(data).map(Self::Font)
            }
            #[cfg(feature = "std")]
            sig if sig == WOFF_HEADER_TAG.to_u32() => WoffFont::new(data).map(Self::Woff),
            sig if sig == TTC_HEADER_TAG.to_u32() => CollectionRef::new(data).map(Self::Collection),
            DFONT_RESOURCE_DATA_OFFSET => DfontRef::new(data).map(Self::Dfont),
            other => Err(ReadError::InvalidSfnt(other)),
        }
    }

    /// The number of faces in the file.
    pub fn len(&self) -> u32 {
        match self {
            Self::Font(_) => 1,
            #[cfg(feature = "std")]
            Self::Woff(_) => 1,
            Self::Collection(collection) => collection.len(),
            Self::Dfont(dfont) => dfont.len(),
        }
    }

    /// Returns true if the file contains no faces.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The table directory at the start of an SFNT.
#[derive(Clone, Copy)]
pub struct TableDirectory<'a> {
    sfnt_version: u32,
    records: &'a [TableRecord],
}

/// A record in the table directory.
#[derive(Clone, Copy, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct TableRecord {
    /// Table identifier.
    pub tag: BigEndian<Tag>,
    /// Checksum for the table; not verified.
    pub checksum: BigEndian<u32>,
    /// Offset from the beginning of the font data.
    pub offset: BigEndian<u32>,
    /// Length of the table.
    pub length: BigEndian<u32>,
}

impl FixedSize for TableRecord {
    const RAW_BYTE_LEN: usize = 16;
}

impl TableRecord {
    pub fn tag(&self) -> Tag {
        self.tag.get()
    }

    pub fn offset(&self) -> u32 {
        self.offset.get()
    }

    pub fn length(&self) -> u32 {
        self.length.get()
    }
}

impl<'a> FontRead<'a> for TableDirectory<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let sfnt_version = cursor.read::<u32>()?;
        let num_tables = cursor.read::<u16>()?;
        // searchRange, entrySelector, rangeShift
        cursor.advance_by(6);
        let records = cursor.read_array(num_tables as usize)?;
        Ok(TableDirectory {
            sfnt_version,
            records,
        })
    }
}

impl<'a> TableDirectory<'a> {
    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    pub fn table_records(&self) -> &'a [TableRecord] {
        self.records
    }

    /// Returns the first record with the given tag.
    pub fn find(&self, tag: Tag) -> Option<&'a TableRecord> {
        self.records.iter().find(|rec| rec.tag() == tag)
    }
}

/// Reference to the content of a font collection file.
#[derive(Clone)]
pub struct CollectionRef<'a> {
    data: FontData<'a>,
    offsets: &'a [BigEndian<u32>],
}

impl<'a> CollectionRef<'a> {
    /// Creates a new reference to a font collection.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let mut cursor = data.cursor();
        let tag = cursor.read::<Tag>()?;
        if tag != TTC_HEADER_TAG {
            return Err(ReadError::InvalidSfnt(tag.to_u32()));
        }
        // major/minor version; the v2 DSIG fields follow the offsets
        cursor.advance::<u32>();
        let num_fonts = cursor.read::<u32>()?;
        let offsets = cursor.read_array(num_fonts as usize)?;
        Ok(Self { data, offsets })
    }

    /// Returns the number of fonts in the collection.
    pub fn len(&self) -> u32 {
        self.offsets.len() as u32
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Returns the font in the collection at the specified index.
    pub fn get(&self, index: u32) -> Result<FontRef<'a>, ReadError> {
        let offset = self
            .offsets
            .get(index as usize)
            .ok_or(ReadError::InvalidCollectionIndex(index))?
            .get() as usize;
        let table_dir_data = self.data.split_off(offset).ok_or(ReadError::OutOfBounds)?;
        FontRef::with_table_directory(self.data, TableDirectory::read(table_dir_data)?)
    }

    /// Returns an iterator over the fonts in the collection.
    pub fn iter(&self) -> impl Iterator<Item = Result<FontRef<'a>, ReadError>> + 'a + Clone {
        let copy = self.clone();
        (0..self.len()).map(move |ix| copy.get(ix))
    }
}

/// Reference to an in-memory font.
///
/// This is a simple implementation of the [`TableProvider`] trait backed
/// by a borrowed slice containing font data.
#[derive(Clone, Copy)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    table_directory: TableDirectory<'a>,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to an in-memory font backed by the given data.
    ///
    /// The data must be a single font (not a font collection) and must begin
    /// with a table directory. The font must contain a `head` table, or a
    /// `bhed` table for bitmap-only Apple fonts.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        Self::with_table_directory(data, TableDirectory::read(data)?)
    }

    /// Creates a new reference to the font at `index` in a single font,
    /// collection or dfont file.
    ///
    /// For single font files the index must be 0.
    pub fn from_index(data: &'a [u8], index: u32) -> Result<Self, ReadError> {
        match FileRef::new(data)? {
            FileRef::Font(font) if index == 0 => Ok(font),
            FileRef::Collection(collection) => collection.get(index),
            FileRef::Dfont(dfont) => dfont.get(index),
            _ => Err(ReadError::InvalidCollectionIndex(index)),
        }
    }

    /// Returns the underlying font data.
    ///
    /// This is the base from which tables are loaded, meaning that for
    /// collection files, this will be the entire file.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// Returns the associated table directory.
    pub fn table_directory(&self) -> &TableDirectory<'a> {
        &self.table_directory
    }

    /// Returns the data for the table with the specified tag, if present.
    ///
    /// When a tag occurs more than once the first record wins.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        let record = self.table_directory.find(tag)?;
        self.data
            .slice_len(record.offset() as usize, record.length() as usize)
    }

    fn with_table_directory(
        data: FontData<'a>,
        table_directory: TableDirectory<'a>,
    ) -> Result<Self, ReadError> {
        let version = table_directory.sfnt_version();
        if ![
            TT_SFNT_VERSION,
            CFF_SFNT_VERSION,
            TRUE_SFNT_VERSION,
            TYP1_SFNT_VERSION,
        ]
        .contains(&version)
        {
            return Err(ReadError::InvalidSfnt(version));
        }
        if table_directory.find(HEAD).is_none() && table_directory.find(BHED).is_none() {
            return Err(ReadError::MissingHead);
        }
        Ok(FontRef {
            data,
            table_directory,
        })
    }
}

impl<'a> TableProvider<'a> for FontRef<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_data(tag)
    }
}

#[cfg(test)]
mod tests {
    use textcore_test_data::{
        be_buffer,
        font_builder::{build_collection, FontBuilder},
    };
    use types::{Tag, TT_SFNT_VERSION};

    use crate::{FileRef, FontRef, ReadError, TableProvider};

    fn minimal_font(units_per_em: u16) -> FontBuilder {
        let mut builder = FontBuilder::default();
        builder
            .add_table(Tag::new(b"head"), textcore_test_data::head(units_per_em, 0))
            .add_table(Tag::new(b"maxp"), textcore_test_data::maxp(4));
        builder
    }

    #[test]
    fn file_ref_single_font() {
        let data = minimal_font(1000).build();
        let file = FileRef::new(&data).unwrap();
        assert!(matches!(file, FileRef::Font(_)));
        assert_eq!(file.len(), 1);
    }

    #[test]
    fn file_ref_collection() {
        let data = build_collection(&[minimal_font(1000), minimal_font(2048)]);
        let Ok(FileRef::Collection(collection)) = FileRef::new(&data) else {
            panic!("Expected a collection");
        };
        assert_eq!(collection.len(), 2);
        let upems: Vec<_> = collection
            .iter()
            .map(|font| font.unwrap().head().unwrap().units_per_em())
            .collect();
        assert_eq!(upems, [1000, 2048]);
        assert!(matches!(
            collection.get(2),
            Err(ReadError::InvalidCollectionIndex(2))
        ));
        assert_eq!(
            FontRef::from_index(&data, 1).unwrap().head().unwrap().units_per_em(),
            2048
        );
    }

    #[test]
    fn unsupported_signature() {
        assert!(matches!(
            FileRef::new(b"NOT_A_FONT"),
            Err(ReadError::InvalidSfnt(0x4E4F545F))
        ));
        assert!(FileRef::new(b"ab").is_err());
    }

    #[test]
    fn missing_head() {
        let mut builder = FontBuilder::default();
        builder.add_table(Tag::new(b"maxp"), textcore_test_data::maxp(4));
        let data = builder.build();
        assert!(matches!(FontRef::new(&data), Err(ReadError::MissingHead)));

        let mut builder = FontBuilder::default();
        builder.add_table(Tag::new(b"bhed"), textcore_test_data::head(1000, 0));
        let data = builder.build();
        assert!(FontRef::new(&data).is_ok());
    }

    #[test]
    fn duplicate_tables_first_wins() {
        let head = textcore_test_data::head(1000, 0);
        let font_data = be_buffer! {
            TT_SFNT_VERSION,
            3u16,    // num tables
            32u16,   // search range
            1u16,    // entry selector
            16u16,   // range shift

            (Tag::new(b"head")),
            0u32,    // checksum
            60u32,   // offset
            (head.len() as u32),

            (Tag::new(b"post")),
            0u32,
            116u32,
            4u32,

            (Tag::new(b"post")),
            0u32,
            120u32,
            4u32
        };
        let mut full_font = font_data.to_vec();
        full_font.extend_from_slice(&head);
        full_font.extend_from_slice(&[1, 1, 1, 1, 2, 2, 2, 2]);
        assert_eq!(head.len(), 54);
        // pad head to 56 bytes
        full_font.splice(60 + 54..60 + 54, [0, 0]);
        let font = FontRef::new(&full_font).unwrap();
        assert_eq!(
            font.table_data(Tag::new(b"post")).unwrap().as_bytes(),
            &[1, 1, 1, 1]
        );
        assert!(font.table_data(Tag::new(b"glyf")).is_none());
        assert!(matches!(
            font.post(),
            Err(ReadError::OutOfBounds) | Err(ReadError::InvalidFormat(_))
        ));
    }
}
