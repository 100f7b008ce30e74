//! OpenType Layout common table formats
//!
//! The script, feature and lookup lists shared by `GSUB` and `GPOS`, along
//! with coverage and class definition tables.

use types::{BigEndian, F2Dot14, FixedSize, GlyphId, MajorMinor, Offset16, Offset32, Tag};

use crate::{FontData, FontRead, ReadError};

/// A tag and an offset, as used by the script, language system and feature
/// lists.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct TagRecord {
    pub tag: BigEndian<Tag>,
    pub offset: BigEndian<Offset16>,
}

impl FixedSize for TagRecord {
    const RAW_BYTE_LEN: usize = 6;
}

impl TagRecord {
    pub fn tag(&self) -> Tag {
        self.tag.get()
    }

    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Result<T, ReadError> {
        data.read_table_at(self.offset.get().to_usize())
    }
}

fn find_tag(records: &[TagRecord], tag: Tag) -> Option<&TagRecord> {
    records
        .binary_search_by(|record| record.tag().cmp(&tag))
        .ok()
        .and_then(|ix| records.get(ix))
}

/// The header shared by `GSUB` and `GPOS`, versions 1.0 and 1.1.
#[derive(Clone, Copy)]
pub struct LayoutTable<'a> {
    data: FontData<'a>,
    version: MajorMinor,
}

impl<'a> FontRead<'a> for LayoutTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version = data.read_at::<MajorMinor>(0)?;
        if version.major != 1 {
            return Err(ReadError::InvalidFormat(version.major.into()));
        }
        let header_len = match version.minor {
            0 => 10,
            1 => 14,
            other => return Err(ReadError::InvalidFormat(other.into())),
        };
        if data.len() < header_len {
            return Err(ReadError::OutOfBounds);
        }
        Ok(LayoutTable { data, version })
    }
}

impl<'a> LayoutTable<'a> {
    pub fn version(&self) -> MajorMinor {
        self.version
    }

    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    fn list_at<T: FontRead<'a>>(&self, pos: usize) -> Result<T, ReadError> {
        let offset = self.data.read_at::<Offset16>(pos)?;
        self.data.read_table_at(offset.to_usize())
    }

    pub fn script_list(&self) -> Result<ScriptList<'a>, ReadError> {
        self.list_at(4)
    }

    pub fn feature_list(&self) -> Result<FeatureList<'a>, ReadError> {
        self.list_at(6)
    }

    pub fn lookup_list(&self) -> Result<LookupList<'a>, ReadError> {
        self.list_at(8)
    }

    /// The feature variations, present in version 1.1 tables only.
    pub fn feature_variations(&self) -> Option<Result<FeatureVariations<'a>, ReadError>> {
        if self.version.minor < 1 {
            return None;
        }
        let offset = self.data.read_at::<Offset32>(10).ok()?;
        (!offset.is_null()).then(|| self.data.read_table_at(offset.to_usize()))
    }
}

/// The list of scripts, sorted by tag.
#[derive(Clone, Copy)]
pub struct ScriptList<'a> {
    data: FontData<'a>,
    records: &'a [TagRecord],
}

impl<'a> FontRead<'a> for ScriptList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count = data.read_at::<u16>(0)?;
        let records = data.read_array_len(2, count as usize)?;
        Ok(ScriptList { data, records })
    }
}

impl<'a> ScriptList<'a> {
    pub fn script_records(&self) -> &'a [TagRecord] {
        self.records
    }

    pub fn script(&self, index: u16) -> Result<Script<'a>, ReadError> {
        self.records
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .resolve(self.data)
    }

    /// Returns the index of the script with the given tag.
    pub fn index_for_tag(&self, tag: Tag) -> Option<u16> {
        self.records
            .binary_search_by(|record| record.tag().cmp(&tag))
            .ok()
            .map(|ix| ix as u16)
    }

    pub fn get(&self, tag: Tag) -> Option<Result<Script<'a>, ReadError>> {
        find_tag(self.records, tag).map(|record| record.resolve(self.data))
    }
}

/// A script table: an optional default language system and a list of
/// language specific ones.
#[derive(Clone, Copy)]
pub struct Script<'a> {
    data: FontData<'a>,
    records: &'a [TagRecord],
}

impl<'a> FontRead<'a> for Script<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count = data.read_at::<u16>(2)?;
        let records = data.read_array_len(4, count as usize)?;
        Ok(Script { data, records })
    }
}

impl<'a> Script<'a> {
    pub fn default_lang_sys(&self) -> Option<Result<LangSys<'a>, ReadError>> {
        let offset = self.data.read_at::<Offset16>(0).ok()?;
        (!offset.is_null()).then(|| self.data.read_table_at(offset.to_usize()))
    }

    pub fn lang_sys_records(&self) -> &'a [TagRecord] {
        self.records
    }

    /// Returns the language system for the given tag.
    pub fn lang_sys(&self, tag: Tag) -> Option<Result<LangSys<'a>, ReadError>> {
        find_tag(self.records, tag).map(|record| record.resolve(self.data))
    }
}

/// A language system: the features enabled for a script and language.
#[derive(Clone, Copy)]
pub struct LangSys<'a> {
    required_feature_index: u16,
    feature_indices: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for LangSys<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let required_feature_index = data.read_at::<u16>(2)?;
        let count = data.read_at::<u16>(4)?;
        let feature_indices = data.read_array_len(6, count as usize)?;
        Ok(LangSys {
            required_feature_index,
            feature_indices,
        })
    }
}

impl<'a> LangSys<'a> {
    /// The index of a feature required for this language system, if any.
    pub fn required_feature_index(&self) -> Option<u16> {
        (self.required_feature_index != 0xFFFF).then_some(self.required_feature_index)
    }

    pub fn feature_indices(&self) -> &'a [BigEndian<u16>] {
        self.feature_indices
    }
}

/// The list of features.
#[derive(Clone, Copy)]
pub struct FeatureList<'a> {
    data: FontData<'a>,
    records: &'a [TagRecord],
}

impl<'a> FontRead<'a> for FeatureList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count = data.read_at::<u16>(0)?;
        let records = data.read_array_len(2, count as usize)?;
        Ok(FeatureList { data, records })
    }
}

impl<'a> FeatureList<'a> {
    pub fn feature_records(&self) -> &'a [TagRecord] {
        self.records
    }

    /// Returns the tag and feature table at `index`.
    pub fn get(&self, index: u16) -> Result<(Tag, Feature<'a>), ReadError> {
        let record = self
            .records
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Ok((record.tag(), record.resolve(self.data)?))
    }
}

/// A feature: the lookups it enables.
#[derive(Clone, Copy)]
pub struct Feature<'a> {
    lookup_list_indices: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for Feature<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        // feature params are not interpreted
        let count = data.read_at::<u16>(2)?;
        let lookup_list_indices = data.read_array_len(4, count as usize)?;
        Ok(Feature {
            lookup_list_indices,
        })
    }
}

impl<'a> Feature<'a> {
    pub fn lookup_list_indices(&self) -> &'a [BigEndian<u16>] {
        self.lookup_list_indices
    }
}

/// The list of lookups.
#[derive(Clone, Copy)]
pub struct LookupList<'a> {
    data: FontData<'a>,
    offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for LookupList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count = data.read_at::<u16>(0)?;
        let offsets = data.read_array_len(2, count as usize)?;
        Ok(LookupList { data, offsets })
    }
}

impl<'a> LookupList<'a> {
    pub fn lookup_count(&self) -> u16 {
        self.offsets.len() as u16
    }

    pub fn get(&self, index: u16) -> Result<Lookup<'a>, ReadError> {
        let offset = self
            .offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        self.data.read_table_at(offset.to_usize())
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<Lookup<'a>, ReadError>> + 'a + Clone {
        let this = *self;
        (0..self.lookup_count()).map(move |ix| this.get(ix))
    }
}

/// Lookup qualifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LookupFlag(u16);

impl LookupFlag {
    pub const RIGHT_TO_LEFT: u16 = 0x0001;
    pub const IGNORE_BASE_GLYPHS: u16 = 0x0002;
    pub const IGNORE_LIGATURES: u16 = 0x0004;
    pub const IGNORE_MARKS: u16 = 0x0008;
    pub const USE_MARK_FILTERING_SET: u16 = 0x0010;
    pub const MARK_ATTACHMENT_TYPE_MASK: u16 = 0xFF00;

    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub fn to_bits(self) -> u16 {
        self.0
    }

    pub fn right_to_left(self) -> bool {
        self.0 & Self::RIGHT_TO_LEFT != 0
    }

    pub fn ignore_marks(self) -> bool {
        self.0 & Self::IGNORE_MARKS != 0
    }

    pub fn use_mark_filtering_set(self) -> bool {
        self.0 & Self::USE_MARK_FILTERING_SET != 0
    }

    /// The mark attachment class to filter on, or `None` for all marks.
    pub fn mark_attachment_class(self) -> Option<u16> {
        let class = (self.0 & Self::MARK_ATTACHMENT_TYPE_MASK) >> 8;
        (class != 0).then_some(class)
    }
}

/// A lookup: a type, flags and a list of subtables.
///
/// Subtables are kept as raw data and decoded on demand by the `GSUB` and
/// `GPOS` modules.
#[derive(Clone, Copy)]
pub struct Lookup<'a> {
    data: FontData<'a>,
    lookup_type: u16,
    lookup_flag: LookupFlag,
    subtable_offsets: &'a [BigEndian<Offset16>],
    mark_filtering_set: Option<u16>,
}

impl<'a> FontRead<'a> for Lookup<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let lookup_type = cursor.read::<u16>()?;
        let lookup_flag = LookupFlag(cursor.read::<u16>()?);
        let count = cursor.read::<u16>()?;
        let subtable_offsets = cursor.read_array(count as usize)?;
        let mark_filtering_set = if lookup_flag.use_mark_filtering_set() {
            Some(cursor.read::<u16>()?)
        } else {
            None
        };
        Ok(Lookup {
            data,
            lookup_type,
            lookup_flag,
            subtable_offsets,
            mark_filtering_set,
        })
    }
}

impl<'a> Lookup<'a> {
    pub fn lookup_type(&self) -> u16 {
        self.lookup_type
    }

    pub fn lookup_flag(&self) -> LookupFlag {
        self.lookup_flag
    }

    pub fn mark_filtering_set(&self) -> Option<u16> {
        self.mark_filtering_set
    }

    pub fn subtable_count(&self) -> u16 {
        self.subtable_offsets.len() as u16
    }

    /// Returns the raw data of the subtable at `index`.
    pub fn subtable_data(&self, index: u16) -> Result<FontData<'a>, ReadError> {
        let offset = self
            .subtable_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        self.data
            .split_off(offset.to_usize())
            .ok_or(ReadError::OutOfBounds)
    }

    /// Returns the effective type and data of each subtable, following
    /// extension subtables when the lookup has the given extension type.
    pub fn resolved_subtables(
        &self,
        extension_type: u16,
    ) -> impl Iterator<Item = Result<(u16, FontData<'a>), ReadError>> + 'a + Clone {
        let this = *self;
        (0..self.subtable_count()).map(move |ix| {
            let data = this.subtable_data(ix)?;
            if this.lookup_type != extension_type {
                return Ok((this.lookup_type, data));
            }
            let format = data.read_at::<u16>(0)?;
            if format != 1 {
                return Err(ReadError::InvalidFormat(format.into()));
            }
            let lookup_type = data.read_at::<u16>(2)?;
            if lookup_type == extension_type {
                return Err(ReadError::MalformedData("nested extension subtable"));
            }
            let offset = data.read_at::<Offset32>(4)?;
            let data = data
                .split_off(offset.to_usize())
                .ok_or(ReadError::OutOfBounds)?;
            Ok((lookup_type, data))
        })
    }
}

/// A [Coverage table](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-table).
#[derive(Clone, Copy)]
pub enum CoverageTable<'a> {
    Format1(&'a [BigEndian<GlyphId>]),
    Format2(&'a [RangeRecord]),
}

/// A run of consecutive glyphs with consecutive coverage indices.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct RangeRecord {
    pub start_glyph_id: BigEndian<GlyphId>,
    pub end_glyph_id: BigEndian<GlyphId>,
    /// Coverage index (or class) of the first glyph in the range.
    pub start_value: BigEndian<u16>,
}

impl FixedSize for RangeRecord {
    const RAW_BYTE_LEN: usize = 6;
}

impl RangeRecord {
    pub fn start_glyph_id(&self) -> GlyphId {
        self.start_glyph_id.get()
    }

    pub fn end_glyph_id(&self) -> GlyphId {
        self.end_glyph_id.get()
    }

    pub fn start_value(&self) -> u16 {
        self.start_value.get()
    }

    fn iter(&self) -> impl Iterator<Item = GlyphId> {
        (self.start_glyph_id().to_u16()..=self.end_glyph_id().to_u16()).map(GlyphId::new)
    }
}

/// Binary search for the range holding `gid`.
fn find_range(records: &[RangeRecord], gid: GlyphId) -> Option<&RangeRecord> {
    use std::cmp::Ordering;
    records
        .binary_search_by(|record| {
            if record.end_glyph_id() < gid {
                Ordering::Less
            } else if record.start_glyph_id() > gid {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
        .ok()
        .and_then(|ix| records.get(ix))
}

impl<'a> FontRead<'a> for CoverageTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format = data.read_at::<u16>(0)?;
        let count = data.read_at::<u16>(2)? as usize;
        match format {
            1 => data.read_array_len(4, count).map(Self::Format1),
            2 => data.read_array_len(4, count).map(Self::Format2),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl<'a> CoverageTable<'a> {
    /// Returns the coverage index of the glyph, or `None` if it is not
    /// covered.
    pub fn get(&self, gid: GlyphId) -> Option<u16> {
        match self {
            Self::Format1(glyphs) => glyphs
                .binary_search_by(|probe| probe.get().cmp(&gid))
                .ok()
                .map(|ix| ix as u16),
            Self::Format2(ranges) => find_range(ranges, gid).map(|range| {
                range
                    .start_value()
                    .wrapping_add(gid.to_u16() - range.start_glyph_id().to_u16())
            }),
        }
    }

    /// Returns an iterator over every covered glyph, in coverage order.
    pub fn iter(&self) -> impl Iterator<Item = GlyphId> + 'a {
        // all one expression so that we have a single return type
        let (iter1, iter2) = match *self {
            Self::Format1(glyphs) => (Some(glyphs.iter().map(|g| g.get())), None),
            Self::Format2(ranges) => (None, Some(ranges.iter().flat_map(RangeRecord::iter))),
        };
        iter1
            .into_iter()
            .flatten()
            .chain(iter2.into_iter().flatten())
    }

    /// The number of covered glyphs.
    pub fn population(&self) -> usize {
        match self {
            Self::Format1(glyphs) => glyphs.len(),
            Self::Format2(ranges) => ranges
                .iter()
                .map(|range| {
                    (range.end_glyph_id().to_u16() as usize + 1)
                        .saturating_sub(range.start_glyph_id().to_u16() as usize)
                })
                .sum(),
        }
    }
}

/// A [Class Definition table](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table).
#[derive(Clone, Copy)]
pub enum ClassDef<'a> {
    Format1 {
        start_glyph_id: GlyphId,
        class_values: &'a [BigEndian<u16>],
    },
    Format2(&'a [RangeRecord]),
}

impl<'a> FontRead<'a> for ClassDef<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format = data.read_at::<u16>(0)?;
        match format {
            1 => {
                let start_glyph_id = data.read_at::<GlyphId>(2)?;
                let count = data.read_at::<u16>(4)?;
                let class_values = data.read_array_len(6, count as usize)?;
                Ok(Self::Format1 {
                    start_glyph_id,
                    class_values,
                })
            }
            2 => {
                let count = data.read_at::<u16>(2)?;
                data.read_array_len(4, count as usize).map(Self::Format2)
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl ClassDef<'_> {
    /// Returns the class of the glyph, or `None` if the table does not
    /// list it.
    pub fn class_id(&self, gid: GlyphId) -> Option<u16> {
        match self {
            Self::Format1 {
                start_glyph_id,
                class_values,
            } => {
                let ix = gid.to_u16().checked_sub(start_glyph_id.to_u16())?;
                class_values.get(ix as usize).map(|class| class.get())
            }
            Self::Format2(ranges) => find_range(ranges, gid).map(|range| range.start_value()),
        }
    }

    /// Returns the class of the glyph; glyphs not listed are in class 0.
    pub fn get(&self, gid: GlyphId) -> u16 {
        self.class_id(gid).unwrap_or_default()
    }

    /// The number of glyphs listed.
    pub fn glyph_count(&self) -> usize {
        match self {
            Self::Format1 { class_values, .. } => class_values.len(),
            Self::Format2(ranges) => CoverageTable::Format2(ranges).population(),
        }
    }

    /// The largest class plus one: the length of an array indexed by class.
    pub fn extent(&self) -> usize {
        let max = match self {
            Self::Format1 { class_values, .. } => {
                class_values.iter().map(|class| class.get()).max()
            }
            Self::Format2(ranges) => ranges.iter().map(|range| range.start_value()).max(),
        };
        max.unwrap_or_default() as usize + 1
    }
}

/// The feature variations table of a version 1.1 layout table.
#[derive(Clone, Copy)]
pub struct FeatureVariations<'a> {
    data: FontData<'a>,
    records: &'a [FeatureVariationRecord],
}

/// A condition set and the feature substitutions applied when it matches.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct FeatureVariationRecord {
    pub condition_set_offset: BigEndian<Offset32>,
    pub feature_table_substitution_offset: BigEndian<Offset32>,
}

impl FixedSize for FeatureVariationRecord {
    const RAW_BYTE_LEN: usize = 8;
}

impl<'a> FontRead<'a> for FeatureVariations<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count = data.read_at::<u32>(4)?;
        let records = data.read_array_len(8, count as usize)?;
        Ok(FeatureVariations { data, records })
    }
}

impl<'a> FeatureVariations<'a> {
    pub fn records(&self) -> &'a [FeatureVariationRecord] {
        self.records
    }

    pub fn condition_set(&self, index: u32) -> Result<ConditionSet<'a>, ReadError> {
        let record = self
            .records
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?;
        self.data
            .read_table_at(record.condition_set_offset.get().to_usize())
    }

    pub fn substitution(&self, index: u32) -> Result<FeatureTableSubstitution<'a>, ReadError> {
        let record = self
            .records
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?;
        self.data
            .read_table_at(record.feature_table_substitution_offset.get().to_usize())
    }

    /// Returns the index of the first record whose conditions are all met
    /// by the normalized coordinates.
    pub fn find_index(&self, coords: &[F2Dot14]) -> Option<u32> {
        (0..self.records.len() as u32).find(|ix| {
            self.condition_set(*ix)
                .map(|set| set.matches(coords))
                .unwrap_or_default()
        })
    }
}

/// A set of conditions, all of which must hold.
#[derive(Clone, Copy)]
pub struct ConditionSet<'a> {
    data: FontData<'a>,
    offsets: &'a [BigEndian<Offset32>],
}

impl<'a> FontRead<'a> for ConditionSet<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count = data.read_at::<u16>(0)?;
        let offsets = data.read_array_len(2, count as usize)?;
        Ok(ConditionSet { data, offsets })
    }
}

impl ConditionSet<'_> {
    /// Returns true if every axis range condition holds. Conditions of an
    /// unknown format never hold.
    pub fn matches(&self, coords: &[F2Dot14]) -> bool {
        self.offsets.iter().all(|offset| {
            let data = match self.data.split_off(offset.get().to_usize()) {
                Some(data) => data,
                None => return false,
            };
            let mut cursor = data.cursor();
            let (Ok(1), Ok(axis), Ok(min), Ok(max)) = (
                cursor.read::<u16>(),
                cursor.read::<u16>(),
                cursor.read::<F2Dot14>(),
                cursor.read::<F2Dot14>(),
            ) else {
                return false;
            };
            let coord = coords.get(axis as usize).copied().unwrap_or_default();
            min <= coord && coord <= max
        })
    }
}

/// Alternate feature tables for a matched condition set.
#[derive(Clone, Copy)]
pub struct FeatureTableSubstitution<'a> {
    data: FontData<'a>,
    records: &'a [FeatureSubstitutionRecord],
}

#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct FeatureSubstitutionRecord {
    pub feature_index: BigEndian<u16>,
    pub alternate_feature_offset: BigEndian<Offset32>,
}

impl FixedSize for FeatureSubstitutionRecord {
    const RAW_BYTE_LEN: usize = 6;
}

impl<'a> FontRead<'a> for FeatureTableSubstitution<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count = data.read_at::<u16>(4)?;
        let records = data.read_array_len(6, count as usize)?;
        Ok(FeatureTableSubstitution { data, records })
    }
}

impl<'a> FeatureTableSubstitution<'a> {
    pub fn records(&self) -> &'a [FeatureSubstitutionRecord] {
        self.records
    }

    /// Returns the replacement for the feature at `feature_index`, if any.
    pub fn alternate_feature(&self, feature_index: u16) -> Option<Result<Feature<'a>, ReadError>> {
        let record = self
            .records
            .iter()
            .find(|record| record.feature_index.get() == feature_index)?;
        Some(
            self.data
                .read_table_at(record.alternate_feature_offset.get().to_usize()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::layout as test_data;

    #[test]
    fn coverage_format1() {
        let coverage = CoverageTable::read(test_data::COVERAGE_FORMAT1.into()).unwrap();
        assert_eq!(coverage.get(GlyphId::new(0x38)), Some(0));
        assert_eq!(coverage.get(GlyphId::new(0x94)), Some(4));
        assert_eq!(coverage.get(GlyphId::new(0x39)), None);
        assert_eq!(coverage.population(), 5);
    }

    #[test]
    fn coverage_format2() {
        let coverage = CoverageTable::read(test_data::COVERAGE_FORMAT2.into()).unwrap();
        assert_eq!(coverage.get(GlyphId::new(0x4E)), Some(0));
        assert_eq!(coverage.get(GlyphId::new(0x57)), Some(9));
        assert_eq!(coverage.get(GlyphId::new(0x8A)), Some(10));
        assert_eq!(coverage.get(GlyphId::new(0xA0)), None);
        let glyphs = coverage.iter().map(|gid| gid.to_u16()).collect::<Vec<_>>();
        assert_eq!(glyphs.len(), coverage.population());
        assert_eq!(glyphs.first(), Some(&0x4E));
        assert_eq!(glyphs.last(), Some(&0x8C));
    }

    #[test]
    fn class_def_format1() {
        let class_def = ClassDef::read(test_data::CLASS_DEF_FORMAT1.into()).unwrap();
        assert_eq!(class_def.get(GlyphId::new(0x32)), 0);
        assert_eq!(class_def.get(GlyphId::new(0x33)), 1);
        assert_eq!(class_def.class_id(GlyphId::new(0x30)), None);
        assert_eq!(class_def.get(GlyphId::new(0x30)), 0);
        assert_eq!(class_def.extent(), 3);
        assert_eq!(class_def.glyph_count(), 26);
    }

    #[test]
    fn class_def_format2() {
        let class_def = ClassDef::read(test_data::CLASS_DEF_FORMAT2.into()).unwrap();
        assert_eq!(class_def.get(GlyphId::new(0x30)), 1);
        assert_eq!(class_def.get(GlyphId::new(0x43)), 2);
        assert_eq!(class_def.get(GlyphId::new(0x45)), 0);
        assert_eq!(class_def.get(GlyphId::new(0xE9)), 1);
        assert_eq!(class_def.extent(), 3);
    }

    #[test]
    fn script_and_feature_lists() {
        let table = LayoutTable::read(test_data::LAYOUT_V1_1.into()).unwrap();
        assert_eq!(table.version(), MajorMinor::VERSION_1_1);
        let scripts = table.script_list().unwrap();
        assert_eq!(scripts.index_for_tag(Tag::new(b"latn")), Some(1));
        let latn = scripts.get(Tag::new(b"latn")).unwrap().unwrap();
        let default = latn.default_lang_sys().unwrap().unwrap();
        assert_eq!(default.required_feature_index(), None);
        assert_eq!(default.feature_indices().len(), 1);
        assert!(latn.lang_sys(Tag::new(b"TRK ")).is_none());
        assert!(scripts.get(Tag::new(b"grek")).is_none());

        let features = table.feature_list().unwrap();
        let (tag, kern) = features.get(0).unwrap();
        assert_eq!(tag, Tag::new(b"kern"));
        assert_eq!(kern.lookup_list_indices()[0].get(), 0);

        let lookups = table.lookup_list().unwrap();
        assert_eq!(lookups.lookup_count(), 1);
        let lookup = lookups.get(0).unwrap();
        assert_eq!(lookup.lookup_type(), 2);
        assert_eq!(lookup.subtable_count(), 1);
    }

    #[test]
    fn feature_variations() {
        let table = LayoutTable::read(test_data::LAYOUT_V1_1.into()).unwrap();
        let variations = table.feature_variations().unwrap().unwrap();
        assert_eq!(variations.records().len(), 1);
        // wght >= 0.5
        assert_eq!(variations.find_index(&[F2Dot14::from_f32(0.75)]), Some(0));
        assert_eq!(variations.find_index(&[F2Dot14::from_f32(0.25)]), None);
        assert_eq!(variations.find_index(&[]), None);
        let substitution = variations.substitution(0).unwrap();
        let alternate = substitution.alternate_feature(0).unwrap().unwrap();
        assert!(alternate.lookup_list_indices().is_empty());
        assert!(substitution.alternate_feature(1).is_none());
    }
}
