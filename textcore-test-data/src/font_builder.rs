//! Assembling table data into font files.

use std::collections::BTreeMap;

use textcore_types::{Tag, TT_SFNT_VERSION};

use crate::bebuffer::BeBuffer;

/// Builds an SFNT file from raw table data.
///
/// Tables are written in tag order, each padded to four bytes.
#[derive(Debug, Clone)]
pub struct FontBuilder {
    sfnt_version: u32,
    tables: BTreeMap<Tag, Vec<u8>>,
}

impl Default for FontBuilder {
    fn default() -> Self {
        Self::new(TT_SFNT_VERSION)
    }
}

impl FontBuilder {
    pub fn new(sfnt_version: u32) -> Self {
        FontBuilder {
            sfnt_version,
            tables: BTreeMap::new(),
        }
    }

    pub fn add_table(&mut self, tag: Tag, data: impl Into<Vec<u8>>) -> &mut Self {
        self.tables.insert(tag, data.into());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_at(0)
    }

    /// Build with table offsets relative to a header placed at `base` in
    /// some enclosing file.
    pub fn build_at(&self, base: u32) -> Vec<u8> {
        let num_tables = self.tables.len() as u16;
        let (search_range, entry_selector, range_shift) = search_params(num_tables, 16);
        let mut header = BeBuffer::new()
            .push(self.sfnt_version)
            .push(num_tables)
            .push(search_range)
            .push(entry_selector)
            .push(range_shift);
        let mut offset = 12 + 16 * self.tables.len() as u32;
        let mut body = Vec::new();
        for (tag, data) in &self.tables {
            header = header
                .push(*tag)
                .push(checksum(data))
                .push(base + offset)
                .push(data.len() as u32);
            body.extend_from_slice(data);
            while body.len() % 4 != 0 {
                body.push(0);
            }
            offset = 12 + 16 * self.tables.len() as u32 + body.len() as u32;
        }
        let mut out = header.into_vec();
        out.extend(body);
        out
    }
}

/// Builds a font collection from complete SFNT builders.
pub fn build_collection(fonts: &[FontBuilder]) -> Vec<u8> {
    let header_len = 12 + 4 * fonts.len() as u32;
    let mut header = BeBuffer::new()
        .push(Tag::new(b"ttcf"))
        .push(0x00010000u32)
        .push(fonts.len() as u32);
    let mut body = Vec::new();
    for font in fonts {
        let base = header_len + body.len() as u32;
        header = header.push(base);
        body.extend(font.build_at(base));
    }
    let mut out = header.into_vec();
    out.extend(body);
    out
}

/// A table entry for [`build_woff`]: the tag, the stored (possibly
/// compressed) bytes and the original length.
pub struct WoffEntry {
    pub tag: Tag,
    pub data: Vec<u8>,
    pub orig_length: u32,
}

/// Builds a WOFF 1.0 file from already compressed entries.
pub fn build_woff(flavor: u32, entries: &[WoffEntry]) -> Vec<u8> {
    let header_len = 44 + 20 * entries.len() as u32;
    let mut offset = header_len;
    let mut directory = BeBuffer::new();
    let mut body = Vec::new();
    let mut total_sfnt = 12 + 16 * entries.len() as u32;
    for entry in entries {
        directory = directory
            .push(entry.tag)
            .push(offset)
            .push(entry.data.len() as u32)
            .push(entry.orig_length)
            .push(0u32);
        body.extend_from_slice(&entry.data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = header_len + body.len() as u32;
        total_sfnt += (entry.orig_length + 3) & !3;
    }
    let header = BeBuffer::new()
        .push(Tag::new(b"wOFF"))
        .push(flavor)
        .push(header_len + body.len() as u32)
        .push(entries.len() as u16)
        .push(0u16)
        .push(total_sfnt)
        .extend([1u16, 0])
        .extend([0u32; 5]);
    let mut out = header.into_vec();
    out.extend(directory.into_vec());
    out.extend(body);
    out
}

/// Computes `(searchRange, entrySelector, rangeShift)` for a binary search
/// header over `count` records of `record_size` bytes.
pub fn search_params(count: u16, record_size: u16) -> (u16, u16, u16) {
    if count == 0 {
        return (0, 0, 0);
    }
    let entry_selector = 15 - count.leading_zeros() as u16;
    let search_range = (1u16 << entry_selector) * record_size;
    let range_shift = count * record_size - search_range;
    (search_range, entry_selector, range_shift)
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4)
        .map(|chunk| {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_be_bytes(word)
        })
        .fold(0u32, u32::wrapping_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_search_params() {
        assert_eq!(search_params(1, 16), (16, 0, 0));
        assert_eq!(search_params(3, 6), (12, 1, 6));
        assert_eq!(search_params(8, 16), (128, 3, 0));
    }

    #[test]
    fn table_layout() {
        let mut builder = FontBuilder::default();
        builder
            .add_table(Tag::new(b"zzzz"), vec![1, 2, 3])
            .add_table(Tag::new(b"aaaa"), vec![9; 4]);
        let data = builder.build();
        // header + two records + two padded tables
        assert_eq!(data.len(), 12 + 32 + 4 + 4);
        assert_eq!(&data[12..16], b"aaaa");
        assert_eq!(&data[28..32], b"zzzz");
        assert_eq!(&data[44..48], &[9, 9, 9, 9]);
        assert_eq!(&data[48..51], &[1, 2, 3]);
    }
}
