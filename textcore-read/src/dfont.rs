//! Mac resource fork (dfont) containers.
//!
//! A dfont is a resource fork stored in the data fork. Each `sfnt` resource
//! holds a complete SFNT whose table offsets are relative to the start of
//! the resource.
//!
//! See <https://github.com/kreativekorp/ksfl/wiki/Macintosh-Resource-File-Format>

use types::Tag;

use crate::{FontData, FontRef, ReadError};

const SFNT: Tag = Tag::new(b"sfnt");
// offset of the type list offset field, from the start of the resource map
const TYPE_LIST_OFFSET_FIELD: usize = 24;
const TYPE_RECORD_LEN: usize = 8;
const REFERENCE_RECORD_LEN: usize = 12;

/// Reference to the `sfnt` resources of a dfont file.
#[derive(Clone)]
pub struct DfontRef<'a> {
    data: FontData<'a>,
    resource_data_offset: usize,
    references: FontData<'a>,
    count: u32,
}

impl<'a> DfontRef<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let mut cursor = data.cursor();
        let resource_data_offset = cursor.read::<u32>()? as usize;
        let resource_map_offset = cursor.read::<u32>()? as usize;
        let resource_map = data
            .split_off(resource_map_offset)
            .ok_or(ReadError::InvalidDfont)?;
        let type_list_offset = resource_map
            .read_at::<u16>(TYPE_LIST_OFFSET_FIELD)
            .map_err(|_| ReadError::InvalidDfont)? as usize;
        let type_list = resource_map
            .split_off(type_list_offset)
            .ok_or(ReadError::InvalidDfont)?;
        let mut cursor = type_list.cursor();
        // stored as count - 1
        let num_types = cursor.read::<u16>().map_err(|_| ReadError::InvalidDfont)? as usize + 1;
        for i in 0..num_types {
            let record = 2 + i * TYPE_RECORD_LEN;
            let tag = type_list
                .read_at::<Tag>(record)
                .map_err(|_| ReadError::InvalidDfont)?;
            if tag != SFNT {
                continue;
            }
            let count = type_list
                .read_at::<u16>(record + 4)
                .map_err(|_| ReadError::InvalidDfont)? as u32
                + 1;
            let ref_list_offset = type_list
                .read_at::<u16>(record + 6)
                .map_err(|_| ReadError::InvalidDfont)? as usize;
            let references = type_list
                .slice_len(ref_list_offset, count as usize * REFERENCE_RECORD_LEN)
                .ok_or(ReadError::InvalidDfont)?;
            return Ok(DfontRef {
                data,
                resource_data_offset,
                references,
                count,
            });
        }
        Err(ReadError::InvalidDfont)
    }

    /// The number of `sfnt` resources.
    pub fn len(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the data of the `sfnt` resource at `index`.
    pub fn resource_data(&self, index: u32) -> Result<FontData<'a>, ReadError> {
        if index >= self.count {
            return Err(ReadError::InvalidCollectionIndex(index));
        }
        let record = index as usize * REFERENCE_RECORD_LEN;
        // one byte of attributes followed by a 24-bit data offset
        let attrs_and_offset = self.references.read_at::<u32>(record + 4)?;
        let start = self
            .resource_data_offset
            .checked_add((attrs_and_offset & 0xFF_FFFF) as usize)
            .ok_or(ReadError::InvalidDfont)?;
        let len = self
            .data
            .read_at::<u32>(start)
            .map_err(|_| ReadError::InvalidDfont)? as usize;
        self.data
            .slice_len(start + 4, len)
            .ok_or(ReadError::InvalidDfont)
    }

    /// Returns the font at `index`.
    pub fn get(&self, index: u32) -> Result<FontRef<'a>, ReadError> {
        FontRef::new(self.resource_data(index)?.as_bytes())
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<FontRef<'a>, ReadError>> + 'a + Clone {
        let copy = self.clone();
        (0..self.len()).map(move |ix| copy.get(ix))
    }
}

#[cfg(test)]
mod tests {
    use textcore_test_data::font_builder::FontBuilder;
    use types::Tag;

    use super::*;
    use crate::{FileRef, TableProvider};

    fn build_dfont(sfnt: &[u8]) -> Vec<u8> {
        let map_offset = 256 + 4 + sfnt.len();
        let mut out = Vec::new();
        out.extend(256u32.to_be_bytes());
        out.extend((map_offset as u32).to_be_bytes());
        out.extend(((sfnt.len() + 4) as u32).to_be_bytes());
        out.extend(50u32.to_be_bytes());
        out.resize(256, 0);
        // resource data: length prefixed sfnt
        out.extend((sfnt.len() as u32).to_be_bytes());
        out.extend_from_slice(sfnt);
        // resource map: 16 byte header copy, handle, file ref, attributes
        out.extend([0u8; 24]);
        out.extend(28u16.to_be_bytes()); // type list offset
        out.extend(0u16.to_be_bytes()); // name list offset
        // type list
        out.extend(1u16.to_be_bytes()); // two types
        out.extend(b"FOND");
        out.extend(0u16.to_be_bytes());
        out.extend(18u16.to_be_bytes());
        out.extend(b"sfnt");
        out.extend(0u16.to_be_bytes()); // one resource
        out.extend(18u16.to_be_bytes()); // reference list offset
        // reference list
        out.extend(128u16.to_be_bytes()); // id
        out.extend(0xFFFFu16.to_be_bytes()); // no name
        out.extend(0u32.to_be_bytes()); // attributes + data offset
        out.extend(0u32.to_be_bytes()); // handle
        out
    }

    #[test]
    fn single_sfnt_resource() {
        let mut builder = FontBuilder::default();
        builder
            .add_table(Tag::new(b"head"), textcore_test_data::head(2048, 1))
            .add_table(Tag::new(b"maxp"), textcore_test_data::maxp(7));
        let dfont = build_dfont(&builder.build());
        let Ok(FileRef::Dfont(file)) = FileRef::new(&dfont) else {
            panic!("expected a dfont");
        };
        assert_eq!(file.len(), 1);
        let font = file.get(0).unwrap();
        assert_eq!(font.head().unwrap().units_per_em(), 2048);
        assert_eq!(font.maxp().unwrap().num_glyphs(), 7);
        assert!(matches!(
            file.get(1),
            Err(ReadError::InvalidCollectionIndex(1))
        ));
    }

    #[test]
    fn no_sfnt_resources() {
        let mut dfont = build_dfont(&[]);
        let len = dfont.len();
        // rename the sfnt type
        dfont[len - 12 - 8..len - 12 - 4].copy_from_slice(b"NFNT");
        assert!(matches!(DfontRef::new(&dfont), Err(ReadError::InvalidDfont)));
    }
}
