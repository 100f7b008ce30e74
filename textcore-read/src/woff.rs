//! WOFF 1.0 containers.
//!
//! See <https://www.w3.org/TR/WOFF/>

use std::io::Read;
use std::sync::OnceLock;

use types::{BigEndian, FixedSize, Tag, WOFF_HEADER_TAG};

use crate::{FontData, ReadError, TableProvider, BHED, HEAD};

const HEADER_LEN: usize = 44;

/// An entry in the WOFF table directory.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct WoffTableEntry {
    pub tag: BigEndian<Tag>,
    /// Offset of the (possibly compressed) data from the start of the file.
    pub offset: BigEndian<u32>,
    pub comp_length: BigEndian<u32>,
    pub orig_length: BigEndian<u32>,
    pub orig_checksum: BigEndian<u32>,
}

impl FixedSize for WoffTableEntry {
    const RAW_BYTE_LEN: usize = 20;
}

impl WoffTableEntry {
    pub fn tag(&self) -> Tag {
        self.tag.get()
    }

    pub fn offset(&self) -> u32 {
        self.offset.get()
    }

    pub fn comp_length(&self) -> u32 {
        self.comp_length.get()
    }

    pub fn orig_length(&self) -> u32 {
        self.orig_length.get()
    }

    pub fn orig_checksum(&self) -> u32 {
        self.orig_checksum.get()
    }

    /// True if the table is stored zlib compressed.
    pub fn is_compressed(&self) -> bool {
        self.comp_length() < self.orig_length()
    }
}

/// A font wrapped in a WOFF 1.0 container.
///
/// Compressed tables are inflated the first time they are requested and
/// kept for the lifetime of the font. Tables are served through the
/// [`TableProvider`] implementation on `&WoffFont`.
#[derive(Clone)]
pub struct WoffFont<'a> {
    data: FontData<'a>,
    flavor: u32,
    entries: &'a [WoffTableEntry],
    decompressed: Vec<OnceLock<Option<Vec<u8>>>>,
}

impl<'a> WoffFont<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let mut cursor = data.cursor();
        let signature = cursor.read::<Tag>()?;
        if signature != WOFF_HEADER_TAG {
            return Err(ReadError::InvalidSfnt(signature.to_u32()));
        }
        let flavor = cursor.read::<u32>()?;
        // length
        cursor.advance::<u32>();
        let num_tables = cursor.read::<u16>()?;
        let entries: &[WoffTableEntry] = data
            .split_off(HEADER_LEN)
            .ok_or(ReadError::OutOfBounds)?
            .read_array_len(0, num_tables as usize)?;
        if !entries
            .iter()
            .any(|entry| entry.tag() == HEAD || entry.tag() == BHED)
        {
            return Err(ReadError::MissingHead);
        }
        Ok(Self {
            data,
            flavor,
            entries,
            decompressed: entries.iter().map(|_| OnceLock::new()).collect(),
        })
    }

    /// The sfnt version of the wrapped font.
    pub fn flavor(&self) -> u32 {
        self.flavor
    }

    pub fn table_entries(&self) -> &'a [WoffTableEntry] {
        self.entries
    }

    /// Returns the uncompressed data for the table with the given tag.
    ///
    /// When a tag occurs more than once the first entry wins. Returns `None`
    /// if the table is missing, out of bounds or fails to decompress.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'_>> {
        let ix = self.entries.iter().position(|entry| entry.tag() == tag)?;
        self.entry_data(ix)
    }

    fn entry_data(&self, ix: usize) -> Option<FontData<'_>> {
        let entry = self.entries.get(ix)?;
        let stored = self
            .data
            .slice_len(entry.offset() as usize, entry.comp_length() as usize)?;
        if !entry.is_compressed() {
            return Some(stored);
        }
        self.decompressed
            .get(ix)?
            .get_or_init(|| match inflate(stored.as_bytes(), entry.orig_length()) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    log::warn!("failed to decompress WOFF table {}: {e}", entry.tag());
                    None
                }
            })
            .as_deref()
            .map(FontData::new)
    }

    /// Serializes the wrapped font as an uncompressed SFNT.
    ///
    /// Tables that cannot be decompressed are dropped.
    pub fn to_sfnt(&self) -> Vec<u8> {
        let tables = (0..self.entries.len())
            .filter_map(|ix| {
                let entry = &self.entries[ix];
                Some((entry, self.entry_data(ix)?.as_bytes()))
            })
            .collect::<Vec<_>>();
        let num_tables = tables.len() as u32;
        let entry_selector = num_tables.max(1).ilog2();
        let search_range = (1u32 << entry_selector) * 16;
        let range_shift = (num_tables * 16).saturating_sub(search_range);

        let mut out = Vec::new();
        out.extend(self.flavor.to_be_bytes());
        for field in [num_tables, search_range, entry_selector, range_shift] {
            out.extend((field as u16).to_be_bytes());
        }
        let mut offset = 12 + 16 * tables.len();
        for (entry, bytes) in &tables {
            out.extend(entry.tag().to_be_bytes());
            out.extend(entry.orig_checksum().to_be_bytes());
            out.extend((offset as u32).to_be_bytes());
            out.extend((bytes.len() as u32).to_be_bytes());
            offset += bytes.len().next_multiple_of(4);
        }
        for (_, bytes) in &tables {
            out.extend_from_slice(bytes);
            out.resize(out.len().next_multiple_of(4), 0);
        }
        out
    }
}

impl<'b> TableProvider<'b> for &'b WoffFont<'_> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'b>> {
        let font: &'b WoffFont = *self;
        font.table_data(tag)
    }
}

/// Upper bound on the initial buffer, as a multiple of the compressed size.
const INFLATE_RESERVE_RATIO: usize = 8;

fn inflate(compressed: &[u8], orig_length: u32) -> Result<Vec<u8>, ReadError> {
    // orig_length is untrusted, only the stream decides how much we allocate
    let reserve = (orig_length as usize)
        .min(compressed.len().saturating_mul(INFLATE_RESERVE_RATIO));
    let mut bytes = Vec::with_capacity(reserve);
    flate2::read::ZlibDecoder::new(compressed)
        .take(orig_length as u64)
        .read_to_end(&mut bytes)
        .map_err(|_| ReadError::Decompression)?;
    if bytes.len() != orig_length as usize {
        return Err(ReadError::Decompression);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use textcore_test_data::font_builder::FontBuilder;
    use types::TT_SFNT_VERSION;

    use super::*;
    use crate::{FileRef, FontRef};

    const NAME_LIKE: &[u8] = b"abababababababababababababababababababab";

    fn source_font() -> Vec<u8> {
        let mut builder = FontBuilder::default();
        builder
            .add_table(Tag::new(b"head"), textcore_test_data::head(1000, 0))
            .add_table(Tag::new(b"maxp"), textcore_test_data::maxp(4))
            .add_table(Tag::new(b"zzzz"), NAME_LIKE.to_vec());
        builder.build()
    }

    // wraps every table of the font, compressing the ones that shrink
    fn wrap(font: &FontRef) -> Vec<u8> {
        let records = font.table_directory().table_records();
        let mut bodies = Vec::new();
        let mut offset = HEADER_LEN + 20 * records.len();
        let mut directory = Vec::new();
        for record in records {
            let orig = font.table_data(record.tag()).unwrap().as_bytes();
            let mut encoder =
                flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::best());
            encoder.write_all(orig).unwrap();
            let compressed = encoder.finish().unwrap();
            let stored = if compressed.len() < orig.len() {
                compressed
            } else {
                orig.to_vec()
            };
            directory.extend(record.tag().to_be_bytes());
            directory.extend((offset as u32).to_be_bytes());
            directory.extend((stored.len() as u32).to_be_bytes());
            directory.extend((orig.len() as u32).to_be_bytes());
            directory.extend(record.checksum.get().to_be_bytes());
            offset += stored.len();
            bodies.extend(stored);
        }
        let mut out = Vec::new();
        out.extend(WOFF_HEADER_TAG.to_be_bytes());
        out.extend(TT_SFNT_VERSION.to_be_bytes());
        out.extend((offset as u32).to_be_bytes());
        out.extend((records.len() as u16).to_be_bytes());
        out.extend([0u8; 2]);
        out.extend([0u8; 24]);
        out.extend([0u8; 4]);
        assert_eq!(out.len(), HEADER_LEN);
        out.extend(directory);
        out.extend(bodies);
        out
    }

    #[test]
    fn compressed_table_matches_source() {
        let sfnt = source_font();
        let font = FontRef::new(&sfnt).unwrap();
        let woff_data = wrap(&font);
        let Ok(FileRef::Woff(woff)) = FileRef::new(&woff_data) else {
            panic!("expected a WOFF file");
        };
        let zzzz = Tag::new(b"zzzz");
        let entry = woff
            .table_entries()
            .iter()
            .find(|entry| entry.tag() == zzzz)
            .unwrap();
        assert!(entry.is_compressed());
        assert_eq!(entry.orig_length() as usize, NAME_LIKE.len());
        assert_eq!(woff.table_data(zzzz).unwrap().as_bytes(), NAME_LIKE);
        // second access hits the cache
        assert_eq!(woff.table_data(zzzz).unwrap().as_bytes(), NAME_LIKE);
        assert_eq!((&woff).head().unwrap().units_per_em(), 1000);
        assert_eq!((&woff).maxp().unwrap().num_glyphs(), 4);
    }

    #[test]
    fn round_trip_to_sfnt() {
        let sfnt = source_font();
        let font = FontRef::new(&sfnt).unwrap();
        let woff = WoffFont::new(&wrap(&font)).unwrap().to_sfnt();
        let unwrapped = FontRef::new(&woff).unwrap();
        for record in font.table_directory().table_records() {
            assert_eq!(
                unwrapped.table_data(record.tag()).unwrap().as_bytes(),
                font.table_data(record.tag()).unwrap().as_bytes()
            );
        }
    }

    #[test]
    fn corrupt_stream_is_missing() {
        let sfnt = source_font();
        let font = FontRef::new(&sfnt).unwrap();
        let mut woff_data = wrap(&font);
        let woff = WoffFont::new(&woff_data).unwrap();
        let entry = *woff
            .table_entries()
            .iter()
            .find(|entry| entry.is_compressed())
            .unwrap();
        let tag = entry.tag();
        let start = entry.offset() as usize;
        woff_data[start..start + 2].copy_from_slice(&[0xFF, 0xFF]);
        let woff = WoffFont::new(&woff_data).unwrap();
        assert!(woff.table_data(tag).is_none());
    }

    #[test]
    fn oversized_original_length() {
        let sfnt = source_font();
        let font = FontRef::new(&sfnt).unwrap();
        let mut woff_data = wrap(&font);
        let woff = WoffFont::new(&woff_data).unwrap();
        let ix = woff
            .table_entries()
            .iter()
            .position(|entry| entry.is_compressed())
            .unwrap();
        let tag = woff.table_entries()[ix].tag();
        let orig_length = HEADER_LEN + 20 * ix + 12;
        woff_data[orig_length..orig_length + 4].copy_from_slice(&0xFFFF_FFF0u32.to_be_bytes());
        let woff = WoffFont::new(&woff_data).unwrap();
        assert_eq!(woff.table_entries()[ix].orig_length(), 0xFFFF_FFF0);
        // the stream is shorter than announced
        assert!(woff.table_data(tag).is_none());
        assert!(inflate(&[], u32::MAX).is_err());
    }

    #[test]
    fn missing_head() {
        let mut data = Vec::new();
        data.extend(WOFF_HEADER_TAG.to_be_bytes());
        data.extend(TT_SFNT_VERSION.to_be_bytes());
        data.extend([0u8; 36]);
        assert!(matches!(WoffFont::new(&data), Err(ReadError::MissingHead)));
    }
}
