//! The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap) table

use std::ops::Range;

use types::{BigEndian, FixedSize, GlyphId, Tag, Uint24};

use super::name::MAC_ROMAN_DECODE;
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'cmap'
pub const TAG: Tag = Tag::new(b"cmap");

/// Upper bound on segments and groups accepted in a single subtable.
const MAX_SEGMENTS: usize = 30000;

/// Platform identifiers used in encoding records.
pub mod platform {
    pub const UNICODE: u16 = 0;
    pub const MACINTOSH: u16 = 1;
    pub const WINDOWS: u16 = 3;
}

/// The character to glyph index mapping table.
#[derive(Clone, Copy)]
pub struct Cmap<'a> {
    data: FontData<'a>,
    records: &'a [EncodingRecord],
}

/// An encoding record, pointing at a subtable.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct EncodingRecord {
    pub platform_id: BigEndian<u16>,
    pub encoding_id: BigEndian<u16>,
    /// Offset from the beginning of the cmap table.
    pub subtable_offset: BigEndian<u32>,
}

impl FixedSize for EncodingRecord {
    const RAW_BYTE_LEN: usize = 8;
}

impl EncodingRecord {
    pub fn platform_id(&self) -> u16 {
        self.platform_id.get()
    }

    pub fn encoding_id(&self) -> u16 {
        self.encoding_id.get()
    }

    /// The subtable for this encoding record.
    pub fn subtable<'a>(&self, data: FontData<'a>) -> Result<CmapSubtable<'a>, ReadError> {
        data.read_table_at(self.subtable_offset.get() as usize)
    }

    /// How many bits of code point space this encoding covers, as a
    /// preference score. Zero means the encoding is not usable for Unicode
    /// lookups.
    pub fn width_score(&self) -> u8 {
        match (self.platform_id(), self.encoding_id()) {
            (platform::UNICODE, 4 | 6) | (platform::WINDOWS, 10) => 4,
            (platform::UNICODE, 0..=3) | (platform::WINDOWS, 0 | 1) => 2,
            (platform::MACINTOSH, 0) => 1,
            _ => 0,
        }
    }

    /// Returns `true` for the Windows symbol encoding.
    pub fn is_symbol(&self) -> bool {
        self.platform_id() == platform::WINDOWS && self.encoding_id() == 0
    }
}

impl TopLevelTable for Cmap<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Cmap<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _version = cursor.read::<u16>()?;
        let num_tables = cursor.read::<u16>()?;
        let records = cursor.read_array(num_tables as usize)?;
        Ok(Cmap { data, records })
    }
}

/// Result of mapping a codepoint with a variation selector.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MapVariant {
    /// The variation selector should be ignored and the default mapping
    /// of the character should be used.
    UseDefault,
    /// The variant glyph mapped by a codepoint and associated variation
    /// selector.
    Variant(GlyphId),
}

impl<'a> Cmap<'a> {
    pub fn encoding_records(&self) -> &'a [EncodingRecord] {
        self.records
    }

    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    /// Returns the widest supported subtable and its encoding record.
    ///
    /// When several subtables share the same width the earliest wins.
    /// Subtables that fail to parse, or that are variation sequences, are
    /// skipped.
    pub fn best_subtable(&self) -> Option<(EncodingRecord, CmapSubtable<'a>)> {
        let mut best: Option<(u8, EncodingRecord, CmapSubtable<'a>)> = None;
        for record in self.records {
            let score = record.width_score();
            if score == 0 || best.as_ref().is_some_and(|(best, ..)| score <= *best) {
                continue;
            }
            match record.subtable(self.data) {
                Ok(CmapSubtable::Format14(_)) => continue,
                Ok(subtable) => best = Some((score, *record, subtable)),
                Err(e) => log::debug!(
                    "skipping cmap subtable ({}, {}): {e}",
                    record.platform_id(),
                    record.encoding_id()
                ),
            }
        }
        best.map(|(_, record, subtable)| (record, subtable))
    }

    /// The first Unicode variation sequences subtable, if any.
    pub fn variation_subtable(&self) -> Option<Cmap14<'a>> {
        self.records
            .iter()
            .filter(|record| record.platform_id() == platform::UNICODE)
            .find_map(|record| match record.subtable(self.data) {
                Ok(CmapSubtable::Format14(cmap14)) => Some(cmap14),
                _ => None,
            })
    }

    /// Map a codepoint to a nominal glyph identifier, using the widest
    /// supported subtable.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let (_, subtable) = self.best_subtable()?;
        subtable.map_codepoint(codepoint)
    }

    /// Maps a codepoint and variation selector to a variant glyph.
    pub fn map_variant(
        &self,
        codepoint: impl Into<u32>,
        selector: impl Into<u32>,
    ) -> Option<MapVariant> {
        self.variation_subtable()?.map_variant(codepoint, selector)
    }
}

/// A decoded cmap subtable.
#[derive(Clone)]
pub enum CmapSubtable<'a> {
    Format0(Cmap0<'a>),
    Format4(Cmap4<'a>),
    Format6(Cmap6<'a>),
    Format12(Cmap12<'a>),
    Format14(Cmap14<'a>),
}

impl<'a> FontRead<'a> for CmapSubtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            0 => Cmap0::read(data).map(Self::Format0),
            4 => Cmap4::read(data).map(Self::Format4),
            6 => Cmap6::read(data).map(Self::Format6),
            12 => Cmap12::read(data).map(Self::Format12),
            14 => Cmap14::read(data).map(Self::Format14),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl<'a> CmapSubtable<'a> {
    pub fn format(&self) -> u16 {
        match self {
            Self::Format0(_) => 0,
            Self::Format4(_) => 4,
            Self::Format6(_) => 6,
            Self::Format12(_) => 12,
            Self::Format14(_) => 14,
        }
    }

    /// Maps a codepoint to a nominal glyph identifier.
    ///
    /// Variation sequence subtables never map single codepoints.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        match self {
            Self::Format0(sub) => sub.map_codepoint(codepoint),
            Self::Format4(sub) => sub.map_codepoint(codepoint),
            Self::Format6(sub) => sub.map_codepoint(codepoint),
            Self::Format12(sub) => sub.map_codepoint(codepoint),
            Self::Format14(_) => None,
        }
    }

    /// Returns an iterator over all (codepoint, glyph identifier) pairs,
    /// in increasing codepoint order.
    pub fn iter(&self) -> CmapIter<'a> {
        match self {
            Self::Format0(sub) => CmapIter::Format0(sub.iter()),
            Self::Format4(sub) => CmapIter::Format4(sub.iter()),
            Self::Format6(sub) => CmapIter::Format6(sub.iter()),
            Self::Format12(sub) => CmapIter::Format12(sub.iter()),
            Self::Format14(_) => CmapIter::Empty,
        }
    }
}

/// Iterator over the mappings of any subtable.
#[derive(Clone)]
pub enum CmapIter<'a> {
    Empty,
    Format0(Cmap0Iter<'a>),
    Format4(Cmap4Iter<'a>),
    Format6(Cmap6Iter<'a>),
    Format12(Cmap12Iter<'a>),
}

impl Iterator for CmapIter<'_> {
    type Item = (u32, GlyphId);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Empty => None,
            Self::Format0(iter) => iter.next(),
            Self::Format4(iter) => iter.next(),
            Self::Format6(iter) => iter.next(),
            Self::Format12(iter) => iter.next(),
        }
    }
}

/// Format 0: byte encoding table, interpreted as Mac Roman.
#[derive(Clone)]
pub struct Cmap0<'a> {
    glyph_id_array: &'a [u8],
}

impl<'a> FontRead<'a> for Cmap0<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let glyph_id_array = data.read_array(6..6 + 256)?;
        Ok(Cmap0 { glyph_id_array })
    }
}

fn mac_roman_to_char(byte: u8) -> u32 {
    if byte < 128 {
        byte as u32
    } else {
        MAC_ROMAN_DECODE[(byte - 128) as usize] as u32
    }
}

impl<'a> Cmap0<'a> {
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        let byte = if codepoint < 128 {
            codepoint as usize
        } else {
            MAC_ROMAN_DECODE
                .iter()
                .position(|c| *c as u32 == codepoint)?
                + 128
        };
        self.glyph_id_array
            .get(byte)
            .map(|gid| GlyphId::new(*gid as u16))
    }

    pub fn iter(&self) -> Cmap0Iter<'a> {
        // bytes ordered by the codepoint they decode to
        let mut order = [0u8; 256];
        for (i, byte) in order.iter_mut().enumerate() {
            *byte = i as u8;
        }
        order.sort_unstable_by_key(|byte| mac_roman_to_char(*byte));
        Cmap0Iter {
            glyph_id_array: self.glyph_id_array,
            order,
            pos: 0,
        }
    }
}

/// Iterator over a format 0 subtable.
#[derive(Clone)]
pub struct Cmap0Iter<'a> {
    glyph_id_array: &'a [u8],
    order: [u8; 256],
    pos: usize,
}

impl Iterator for Cmap0Iter<'_> {
    type Item = (u32, GlyphId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let byte = *self.order.get(self.pos)?;
            self.pos += 1;
            let gid = *self.glyph_id_array.get(byte as usize)?;
            if gid != 0 {
                return Some((mac_roman_to_char(byte), GlyphId::new(gid as u16)));
            }
        }
    }
}

/// Format 4: segment mapping to delta values.
#[derive(Clone)]
pub struct Cmap4<'a> {
    end_code: &'a [BigEndian<u16>],
    start_code: &'a [BigEndian<u16>],
    id_delta: &'a [BigEndian<i16>],
    id_range_offsets: &'a [BigEndian<u16>],
    glyph_id_array: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for Cmap4<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format = cursor.read::<u16>()?;
        let length = cursor.read::<u16>()? as usize;
        let _language = cursor.read::<u16>()?;
        let seg_count_x2 = cursor.read::<u16>()? as usize;
        if seg_count_x2 % 2 != 0 {
            return Err(ReadError::MalformedData("odd segCountX2"));
        }
        let seg_count = seg_count_x2 / 2;
        if seg_count > MAX_SEGMENTS {
            return Err(ReadError::MalformedData("too many cmap segments"));
        }
        // searchRange, entrySelector, rangeShift
        cursor.advance_by(6);
        let end_code = cursor.read_array(seg_count)?;
        let _reserved_pad = cursor.read::<u16>()?;
        let start_code = cursor.read_array(seg_count)?;
        let id_delta = cursor.read_array(seg_count)?;
        let id_range_offsets = cursor.read_array(seg_count)?;
        // some fonts have a bogus length; use it only when it is sane
        let end = if length >= cursor.position()? && length <= data.len() {
            length
        } else {
            data.len()
        };
        let start = cursor.position()?;
        let glyph_id_array = data.read_array(start..start + (end - start) / 2 * 2)?;
        Ok(Cmap4 {
            end_code,
            start_code,
            id_delta,
            id_range_offsets,
            glyph_id_array,
        })
    }
}

impl<'a> Cmap4<'a> {
    pub fn seg_count(&self) -> usize {
        self.end_code.len()
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        if codepoint > 0xFFFF {
            return None;
        }
        let codepoint = codepoint as u16;
        let mut lo = 0;
        let mut hi = self.seg_count();
        while lo < hi {
            let i = (lo + hi) / 2;
            let start_code = self.start_code.get(i)?.get();
            if codepoint < start_code {
                hi = i;
            } else if codepoint > self.end_code.get(i)?.get() {
                lo = i + 1;
            } else {
                return self.lookup_glyph_id(codepoint, i, start_code);
            }
        }
        None
    }

    /// Returns an iterator over all (codepoint, glyph identifier) pairs
    /// in the subtable.
    pub fn iter(&self) -> Cmap4Iter<'a> {
        Cmap4Iter::new(self.clone())
    }

    /// Does the final phase of glyph id lookup.
    ///
    /// Shared between Self::map_codepoint and Cmap4Iter.
    fn lookup_glyph_id(&self, codepoint: u16, index: usize, start_code: u16) -> Option<GlyphId> {
        let delta = self.id_delta.get(index)?.get() as i32;
        let range_offset = self.id_range_offsets.get(index)?.get() as usize;
        if range_offset == 0 {
            return Some(GlyphId::new((codepoint as i32 + delta) as u16));
        }
        // the offset is relative to the id_range_offset entry itself
        let offset = (range_offset / 2 + (codepoint - start_code) as usize)
            .checked_sub(self.id_range_offsets.len() - index)?;
        let gid = self.glyph_id_array.get(offset)?.get();
        (gid != 0).then_some(GlyphId::new((gid as i32 + delta) as u16))
    }

    /// Returns the [start_code, end_code] range at the given index.
    fn code_range(&self, index: usize) -> Option<Range<u32>> {
        let start = self.start_code.get(index)?.get() as u32;
        let end = self.end_code.get(index)?.get() as u32;
        // inclusive in the table
        Some(start..end + 1)
    }
}

/// Iterator over all (codepoint, glyph identifier) pairs in
/// the subtable.
#[derive(Clone)]
pub struct Cmap4Iter<'a> {
    subtable: Cmap4<'a>,
    cur_range: Range<u32>,
    cur_start_code: u16,
    cur_range_ix: usize,
}

impl<'a> Cmap4Iter<'a> {
    fn new(subtable: Cmap4<'a>) -> Self {
        let cur_range = subtable.code_range(0).unwrap_or_default();
        let cur_start_code = cur_range.start as u16;
        Self {
            subtable,
            cur_range,
            cur_start_code,
            cur_range_ix: 0,
        }
    }
}

impl Iterator for Cmap4Iter<'_> {
    type Item = (u32, GlyphId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(codepoint) = self.cur_range.next() {
                let glyph_id = self.subtable.lookup_glyph_id(
                    codepoint as u16,
                    self.cur_range_ix,
                    self.cur_start_code,
                );
                // skip explicit mappings to .notdef
                match glyph_id {
                    Some(gid) if gid != GlyphId::NOTDEF => return Some((codepoint, gid)),
                    _ => continue,
                }
            } else {
                self.cur_range_ix += 1;
                self.cur_range = self.subtable.code_range(self.cur_range_ix)?;
                self.cur_start_code = self.cur_range.start as u16;
            }
        }
    }
}

/// Format 6: trimmed table mapping.
#[derive(Clone)]
pub struct Cmap6<'a> {
    first_code: u16,
    glyph_id_array: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for Cmap6<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let first_code = data.read_at::<u16>(6)?;
        let entry_count = data.read_at::<u16>(8)?;
        let glyph_id_array = data.read_array_len(10, entry_count as usize)?;
        Ok(Cmap6 {
            first_code,
            glyph_id_array,
        })
    }
}

impl<'a> Cmap6<'a> {
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let ix = codepoint.into().checked_sub(self.first_code as u32)?;
        self.glyph_id_array
            .get(ix as usize)
            .map(|gid| GlyphId::new(gid.get()))
    }

    pub fn iter(&self) -> Cmap6Iter<'a> {
        Cmap6Iter {
            first_code: self.first_code as u32,
            inner: self.glyph_id_array.iter().enumerate(),
        }
    }
}

/// Iterator over a format 6 subtable.
#[derive(Clone)]
pub struct Cmap6Iter<'a> {
    first_code: u32,
    inner: std::iter::Enumerate<std::slice::Iter<'a, BigEndian<u16>>>,
}

impl Iterator for Cmap6Iter<'_> {
    type Item = (u32, GlyphId);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|(i, gid)| {
            let gid = gid.get();
            (gid != 0).then(|| (self.first_code + i as u32, GlyphId::new(gid)))
        })
    }
}

/// A sequential map group in a format 12 subtable.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct SequentialMapGroup {
    pub start_char_code: BigEndian<u32>,
    /// Inclusive.
    pub end_char_code: BigEndian<u32>,
    pub start_glyph_id: BigEndian<u32>,
}

impl FixedSize for SequentialMapGroup {
    const RAW_BYTE_LEN: usize = 12;
}

/// Format 12: segmented coverage.
#[derive(Clone)]
pub struct Cmap12<'a> {
    groups: &'a [SequentialMapGroup],
}

impl<'a> FontRead<'a> for Cmap12<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let num_groups = data.read_at::<u32>(12)? as usize;
        if num_groups > MAX_SEGMENTS {
            return Err(ReadError::MalformedData("too many cmap groups"));
        }
        let groups = data.read_array_len(16, num_groups)?;
        Ok(Cmap12 { groups })
    }
}

impl<'a> Cmap12<'a> {
    pub fn groups(&self) -> &'a [SequentialMapGroup] {
        self.groups
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        let mut lo = 0;
        let mut hi = self.groups.len();
        while lo < hi {
            let i = (lo + hi) / 2;
            let group = self.groups.get(i)?;
            if codepoint < group.start_char_code.get() {
                hi = i;
            } else if codepoint > group.end_char_code.get() {
                lo = i + 1;
            } else {
                return Some(lookup_group_glyph(
                    codepoint,
                    group.start_char_code.get(),
                    group.start_glyph_id.get(),
                ));
            }
        }
        None
    }

    /// Returns an iterator over all (codepoint, glyph identifier) pairs
    /// in the subtable.
    pub fn iter(&self) -> Cmap12Iter<'a> {
        Cmap12Iter::new(self.clone())
    }

    /// Returns the codepoint range and start glyph id for the group
    /// at the given index.
    fn group(&self, index: usize) -> Option<(Range<u32>, u32)> {
        let group = self.groups.get(index)?;
        let start = group.start_char_code.get();
        let end = group.end_char_code.get().max(start).saturating_add(1);
        Some((start..end, group.start_glyph_id.get()))
    }
}

fn lookup_group_glyph(codepoint: u32, start_char_code: u32, start_glyph_id: u32) -> GlyphId {
    GlyphId::new(start_glyph_id.wrapping_add(codepoint.wrapping_sub(start_char_code)) as u16)
}

/// Iterator over all (codepoint, glyph identifier) pairs in
/// the subtable.
///
/// The iterator state is the current group and the offset inside it.
#[derive(Clone)]
pub struct Cmap12Iter<'a> {
    subtable: Cmap12<'a>,
    cur_range: Range<u32>,
    cur_start_code: u32,
    cur_start_glyph_id: u32,
    cur_range_ix: usize,
    // groups that overlap the previous one are clipped so output stays sorted
    last_codepoint: Option<u32>,
}

impl<'a> Cmap12Iter<'a> {
    fn new(subtable: Cmap12<'a>) -> Self {
        let (cur_range, cur_start_glyph_id) = subtable.group(0).unwrap_or_default();
        let cur_start_code = cur_range.start;
        Self {
            subtable,
            cur_range,
            cur_start_code,
            cur_start_glyph_id,
            cur_range_ix: 0,
            last_codepoint: None,
        }
    }
}

impl Iterator for Cmap12Iter<'_> {
    type Item = (u32, GlyphId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(codepoint) = self.cur_range.next() {
                if self.last_codepoint.is_some_and(|last| codepoint <= last) {
                    continue;
                }
                let glyph_id =
                    lookup_group_glyph(codepoint, self.cur_start_code, self.cur_start_glyph_id);
                if glyph_id == GlyphId::NOTDEF {
                    continue;
                }
                self.last_codepoint = Some(codepoint);
                return Some((codepoint, glyph_id));
            } else {
                self.cur_range_ix += 1;
                (self.cur_range, self.cur_start_glyph_id) =
                    self.subtable.group(self.cur_range_ix)?;
                self.cur_start_code = self.cur_range.start;
            }
        }
    }
}

/// A variation selector record in a format 14 subtable.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct VariationSelector {
    pub var_selector: BigEndian<Uint24>,
    pub default_uvs_offset: BigEndian<u32>,
    pub non_default_uvs_offset: BigEndian<u32>,
}

impl FixedSize for VariationSelector {
    const RAW_BYTE_LEN: usize = 11;
}

/// A range of codepoints using their default glyph with a selector.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct UnicodeRange {
    pub start_unicode_value: BigEndian<Uint24>,
    pub additional_count: u8,
}

impl FixedSize for UnicodeRange {
    const RAW_BYTE_LEN: usize = 4;
}

/// A codepoint mapped to a variant glyph.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct UvsMapping {
    pub unicode_value: BigEndian<Uint24>,
    pub glyph_id: BigEndian<u16>,
}

impl FixedSize for UvsMapping {
    const RAW_BYTE_LEN: usize = 5;
}

/// Format 14: Unicode variation sequences.
#[derive(Clone)]
pub struct Cmap14<'a> {
    data: FontData<'a>,
    selectors: &'a [VariationSelector],
}

impl<'a> FontRead<'a> for Cmap14<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count = data.read_at::<u32>(6)?;
        let selectors = data.read_array_len(10, count as usize)?;
        Ok(Cmap14 { data, selectors })
    }
}

impl<'a> Cmap14<'a> {
    pub fn var_selector(&self) -> &'a [VariationSelector] {
        self.selectors
    }

    fn default_uvs(&self, record: &VariationSelector) -> &'a [UnicodeRange] {
        self.offset_array(record.default_uvs_offset.get())
    }

    fn non_default_uvs(&self, record: &VariationSelector) -> &'a [UvsMapping] {
        self.offset_array(record.non_default_uvs_offset.get())
    }

    /// Reads a u32 counted array at offset, treating 0 as absent.
    fn offset_array<T: bytemuck::AnyBitPattern + FixedSize>(&self, offset: u32) -> &'a [T] {
        if offset == 0 {
            return &[];
        }
        let offset = offset as usize;
        self.data
            .read_at::<u32>(offset)
            .and_then(|count| self.data.read_array_len(offset + 4, count as usize))
            .unwrap_or_default()
    }

    /// Maps a codepoint and variation selector to a nominal glyph identifier.
    ///
    /// Returns `None` when the sequence is not covered by this subtable.
    pub fn map_variant(
        &self,
        codepoint: impl Into<u32>,
        selector: impl Into<u32>,
    ) -> Option<MapVariant> {
        use core::cmp::Ordering;
        let codepoint = codepoint.into();
        let selector = selector.into();
        let record = self
            .selectors
            .binary_search_by(|rec| rec.var_selector.get().to_u32().cmp(&selector))
            .ok()
            .and_then(|idx| self.selectors.get(idx))?;
        let found_default = self
            .default_uvs(record)
            .binary_search_by(|range| {
                let start = range.start_unicode_value.get().to_u32();
                if codepoint < start {
                    Ordering::Greater
                } else if codepoint > start + range.additional_count as u32 {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
            .is_ok();
        if found_default {
            return Some(MapVariant::UseDefault);
        }
        let mapping = self.non_default_uvs(record);
        let ix = mapping
            .binary_search_by(|map| map.unicode_value.get().to_u32().cmp(&codepoint))
            .ok()?;
        Some(MapVariant::Variant(GlyphId::new(mapping.get(ix)?.glyph_id.get())))
    }

    /// Returns an iterator over all (codepoint, selector, mapping variant)
    /// triples in the subtable.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, MapVariant)> + 'a {
        let this = self.clone();
        self.selectors.iter().flat_map(move |record| {
            let selector = record.var_selector.get().to_u32();
            let defaults = this.default_uvs(record).iter().flat_map(move |range| {
                let start = range.start_unicode_value.get().to_u32();
                (start..=start + range.additional_count as u32)
                    .map(move |cp| (cp, selector, MapVariant::UseDefault))
            });
            let variants = this.non_default_uvs(record).iter().map(move |map| {
                (
                    map.unicode_value.get().to_u32(),
                    selector,
                    MapVariant::Variant(GlyphId::new(map.glyph_id.get())),
                )
            });
            defaults.chain(variants)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::cmap as test_data;

    fn cmap(data: &[u8]) -> Cmap {
        Cmap::read(FontData::new(data)).unwrap()
    }

    #[test]
    fn format4_delta_and_indexed() {
        let data = test_data::format4_latin();
        let Ok(CmapSubtable::Format4(sub)) = CmapSubtable::read(FontData::new(&data)) else {
            panic!("expected format 4");
        };
        assert_eq!(sub.map_codepoint('A'), Some(GlyphId::new(10065)));
        assert_eq!(sub.map_codepoint('Z'), Some(GlyphId::new(10090)));
        assert_eq!(sub.map_codepoint('a'), Some(GlyphId::new(1)));
        assert_eq!(sub.map_codepoint('z'), Some(GlyphId::new(26)));
        assert_eq!(sub.map_codepoint('0'), None);
        assert_eq!(sub.map_codepoint(0x1F600u32), None);
        let pairs: Vec<_> = sub.iter().collect();
        assert_eq!(pairs.len(), 52);
        assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(pairs[26], ('a' as u32, GlyphId::new(1)));
    }

    #[test]
    fn format4_odd_seg_count() {
        let mut data = test_data::format4_latin();
        data[7] |= 1;
        assert!(CmapSubtable::read(FontData::new(&data)).is_err());
    }

    #[test]
    fn best_subtable_prefers_widest() {
        let data = test_data::multi_subtable();
        let cmap = cmap(&data);
        let (record, subtable) = cmap.best_subtable().unwrap();
        assert_eq!((record.platform_id(), record.encoding_id()), (3, 10));
        assert_eq!(subtable.format(), 12);
        assert_eq!(cmap.map_codepoint(0x1F600u32), Some(GlyphId::new(7)));
        assert_eq!(cmap.map_codepoint('B'), Some(GlyphId::new(2)));
        let pairs: Vec<_> = subtable.iter().collect();
        assert_eq!(
            pairs,
            [
                ('A' as u32, GlyphId::new(1)),
                ('B' as u32, GlyphId::new(2)),
                ('C' as u32, GlyphId::new(3)),
                (0x1F600, GlyphId::new(7)),
            ]
        );
    }

    #[test]
    fn format0_mac_roman() {
        let data = test_data::multi_subtable();
        let cmap = cmap(&data);
        let record = cmap.encoding_records()[0];
        assert_eq!(record.width_score(), 1);
        let CmapSubtable::Format0(sub) = record.subtable(cmap.offset_data()).unwrap() else {
            panic!("expected format 0");
        };
        assert_eq!(sub.map_codepoint('A'), Some(GlyphId::new(1)));
        // 0x8E is é in Mac Roman
        assert_eq!(sub.map_codepoint('é'), Some(GlyphId::new(9)));
        let pairs: Vec<_> = sub.iter().collect();
        assert_eq!(pairs, [('A' as u32, GlyphId::new(1)), ('é' as u32, GlyphId::new(9))]);
    }

    #[test]
    fn format6_trimmed() {
        let data = textcore_test_data::be_buffer! {
            6u16, 16u16, 0u16, 0x30u16, 3u16, [4u16, 0, 6]
        };
        let Ok(CmapSubtable::Format6(sub)) = CmapSubtable::read(FontData::new(&data)) else {
            panic!("expected format 6");
        };
        assert_eq!(sub.map_codepoint('0'), Some(GlyphId::new(4)));
        assert_eq!(sub.map_codepoint('/'), None);
        assert_eq!(sub.map_codepoint('3'), None);
        let pairs: Vec<_> = sub.iter().collect();
        assert_eq!(pairs, [(0x30, GlyphId::new(4)), (0x32, GlyphId::new(6))]);
    }

    #[test]
    fn format14_variants() {
        let data = test_data::multi_subtable();
        let cmap = cmap(&data);
        assert_eq!(cmap.map_variant('A', 0xFE00u32), Some(MapVariant::UseDefault));
        assert_eq!(
            cmap.map_variant('B', 0xFE00u32),
            Some(MapVariant::Variant(GlyphId::new(5)))
        );
        assert_eq!(cmap.map_variant('C', 0xFE00u32), None);
        assert_eq!(cmap.map_variant('A', 0xFE01u32), None);
        let sub = cmap.variation_subtable().unwrap();
        let all: Vec<_> = sub.iter().collect();
        assert_eq!(
            all,
            [
                ('A' as u32, 0xFE00, MapVariant::UseDefault),
                ('B' as u32, 0xFE00, MapVariant::Variant(GlyphId::new(5))),
            ]
        );
    }
}
