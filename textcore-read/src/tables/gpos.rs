//! The [GPOS](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos) table
//!
//! Only pair adjustment subtables are decoded, for the purpose of
//! extracting horizontal kerning.

use types::{BigEndian, GlyphId, Offset16, Tag};

use super::layout::{ClassDef, CoverageTable, LayoutTable, LookupList};
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'GPOS'
pub const TAG: Tag = Tag::new(b"GPOS");

/// The lookup type of pair adjustment subtables.
pub const PAIR_LOOKUP_TYPE: u16 = 2;
/// The lookup type of extension positioning subtables.
pub const EXTENSION_LOOKUP_TYPE: u16 = 9;

/// The glyph positioning table.
#[derive(Clone, Copy)]
pub struct Gpos<'a> {
    layout: LayoutTable<'a>,
}

impl TopLevelTable for Gpos<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Gpos<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        LayoutTable::read(data).map(|layout| Gpos { layout })
    }
}

impl<'a> Gpos<'a> {
    /// The script, feature and lookup lists.
    pub fn layout(&self) -> &LayoutTable<'a> {
        &self.layout
    }

    /// Returns the horizontal kerning described by the pair adjustment
    /// lookups, regardless of script and language.
    pub fn kerning(&self) -> Result<GposKerning<'a>, ReadError> {
        self.layout
            .lookup_list()
            .map(|lookups| GposKerning { lookups })
    }
}

/// The union of the pair adjustment subtables of every lookup; the first
/// subtable holding a pair wins.
#[derive(Clone, Copy)]
pub struct GposKerning<'a> {
    lookups: LookupList<'a>,
}

impl<'a> GposKerning<'a> {
    /// Returns every pair adjustment subtable usable for kerning.
    ///
    /// Subtables with value formats other than a single x advance for the
    /// first glyph are skipped, as are subtables that fail to parse.
    pub fn subtables(&self) -> impl Iterator<Item = PairPos<'a>> + 'a {
        self.lookups
            .iter()
            .filter_map(Result::ok)
            .flat_map(|lookup| lookup.resolved_subtables(EXTENSION_LOOKUP_TYPE))
            .filter_map(|subtable| match subtable {
                Ok((PAIR_LOOKUP_TYPE, data)) => match PairPos::read(data) {
                    Ok(pair_pos) if pair_pos.is_kerning() => Some(pair_pos),
                    Ok(_) => {
                        log::debug!("skipping GPOS pair subtable with unsupported value formats");
                        None
                    }
                    Err(e) => {
                        log::debug!("skipping malformed GPOS pair subtable: {e}");
                        None
                    }
                },
                _ => None,
            })
    }

    /// Returns the kerning adjustment for the pair, if any subtable holds it.
    pub fn kern(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        self.subtables()
            .find_map(|pair_pos| pair_pos.x_advance(left, right))
    }

    /// Returns true if no subtable can provide kerning.
    pub fn is_empty(&self) -> bool {
        self.subtables().next().is_none()
    }
}

/// The fields present in a value record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValueFormat(u16);

impl ValueFormat {
    pub const X_PLACEMENT: u16 = 0x0001;
    pub const Y_PLACEMENT: u16 = 0x0002;
    pub const X_ADVANCE: u16 = 0x0004;
    pub const Y_ADVANCE: u16 = 0x0008;

    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub fn to_bits(self) -> u16 {
        self.0
    }

    /// The size in bytes of a value record with this format.
    pub fn record_byte_len(self) -> usize {
        self.0.count_ones() as usize * 2
    }
}

/// A pair adjustment subtable.
#[derive(Clone, Copy)]
pub enum PairPos<'a> {
    /// Adjustments for glyph pairs.
    Format1(PairPosFormat1<'a>),
    /// Class pair adjustments.
    Format2(PairPosFormat2<'a>),
}

impl<'a> FontRead<'a> for PairPos<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        match data.read_at::<u16>(0)? {
            1 => PairPosFormat1::read(data).map(Self::Format1),
            2 => PairPosFormat2::read(data).map(Self::Format2),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl<'a> PairPos<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        match self {
            Self::Format1(table) => &table.coverage,
            Self::Format2(table) => &table.coverage,
        }
    }

    pub fn value_formats(&self) -> (ValueFormat, ValueFormat) {
        match self {
            Self::Format1(table) => (table.value_format1, table.value_format2),
            Self::Format2(table) => (table.value_format1, table.value_format2),
        }
    }

    /// Returns true if the subtable only adjusts the advance of the first
    /// glyph.
    pub fn is_kerning(&self) -> bool {
        let (first, second) = self.value_formats();
        first.to_bits() == ValueFormat::X_ADVANCE && second.to_bits() == 0
    }

    /// Returns the x advance adjustment of the first glyph of the pair.
    pub fn x_advance(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        if !self.is_kerning() {
            return None;
        }
        match self {
            Self::Format1(table) => table.first_value(left, right),
            Self::Format2(table) => table.first_value(left, right),
        }
    }
}

fn read_value_formats(data: FontData) -> Result<(ValueFormat, ValueFormat), ReadError> {
    Ok((
        ValueFormat(data.read_at::<u16>(4)?),
        ValueFormat(data.read_at::<u16>(6)?),
    ))
}

/// Pair adjustment by individual glyph pairs, grouped in one pair set per
/// covered first glyph.
#[derive(Clone, Copy)]
pub struct PairPosFormat1<'a> {
    data: FontData<'a>,
    coverage: CoverageTable<'a>,
    value_format1: ValueFormat,
    value_format2: ValueFormat,
    pair_set_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for PairPosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let coverage = data.read_table_at(data.read_at::<Offset16>(2)?.to_usize())?;
        let (value_format1, value_format2) = read_value_formats(data)?;
        let count = data.read_at::<u16>(8)?;
        let pair_set_offsets = data.read_array_len(10, count as usize)?;
        Ok(PairPosFormat1 {
            data,
            coverage,
            value_format1,
            value_format2,
            pair_set_offsets,
        })
    }
}

impl<'a> PairPosFormat1<'a> {
    fn record_byte_len(&self) -> usize {
        2 + self.value_format1.record_byte_len() + self.value_format2.record_byte_len()
    }

    /// Returns the pairs starting with the glyph, sorted by second glyph.
    pub fn pair_set(&self, left: GlyphId) -> Option<Result<PairSet<'a>, ReadError>> {
        let index = self.coverage.get(left)?;
        // the coverage may index past the pair sets in broken fonts
        let offset = self.pair_set_offsets.get(index as usize)?.get().to_usize();
        let record_len = self.record_byte_len();
        Some(self.data.read_at::<u16>(offset).and_then(|count| {
            let start = offset + 2;
            self.data
                .slice(start..start + count as usize * record_len)
                .map(|records| PairSet {
                    records,
                    record_len,
                })
                .ok_or(ReadError::OutOfBounds)
        }))
    }

    fn first_value(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        self.pair_set(left)?.ok()?.first_value(right)
    }
}

/// The pair value records for one first glyph.
#[derive(Clone, Copy)]
pub struct PairSet<'a> {
    records: FontData<'a>,
    record_len: usize,
}

impl PairSet<'_> {
    pub fn len(&self) -> usize {
        self.records.len() / self.record_len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the second glyph of the record at `index`.
    pub fn second_glyph(&self, index: usize) -> Option<GlyphId> {
        self.records.read_at(index * self.record_len).ok()
    }

    /// Returns the first field of the first value record for the pair.
    pub fn first_value(&self, right: GlyphId) -> Option<i16> {
        let (mut lo, mut hi) = (0, self.len());
        while lo < hi {
            let mid = (lo + hi) / 2;
            let second = self.second_glyph(mid)?;
            match second.cmp(&right) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => {
                    return self.records.read_at(mid * self.record_len + 2).ok()
                }
            }
        }
        None
    }
}

/// Pair adjustment by glyph classes: a `class1Count` by `class2Count`
/// matrix of value records.
#[derive(Clone, Copy)]
pub struct PairPosFormat2<'a> {
    coverage: CoverageTable<'a>,
    value_format1: ValueFormat,
    value_format2: ValueFormat,
    class_def1: ClassDef<'a>,
    class_def2: ClassDef<'a>,
    class1_count: u16,
    class2_count: u16,
    records: FontData<'a>,
}

impl<'a> FontRead<'a> for PairPosFormat2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let coverage = data.read_table_at(data.read_at::<Offset16>(2)?.to_usize())?;
        let (value_format1, value_format2) = read_value_formats(data)?;
        let class_def1 = data.read_table_at(data.read_at::<Offset16>(8)?.to_usize())?;
        let class_def2 = data.read_table_at(data.read_at::<Offset16>(10)?.to_usize())?;
        let class1_count = data.read_at::<u16>(12)?;
        let class2_count = data.read_at::<u16>(14)?;
        let record_len = value_format1.record_byte_len() + value_format2.record_byte_len();
        let len = class1_count as usize * class2_count as usize * record_len;
        let records = data.slice(16..16 + len).ok_or(ReadError::OutOfBounds)?;
        Ok(PairPosFormat2 {
            coverage,
            value_format1,
            value_format2,
            class_def1,
            class_def2,
            class1_count,
            class2_count,
            records,
        })
    }
}

impl<'a> PairPosFormat2<'a> {
    pub fn class_def1(&self) -> &ClassDef<'a> {
        &self.class_def1
    }

    pub fn class_def2(&self) -> &ClassDef<'a> {
        &self.class_def2
    }

    pub fn class1_count(&self) -> u16 {
        self.class1_count
    }

    pub fn class2_count(&self) -> u16 {
        self.class2_count
    }

    fn first_value(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        // check coverage to avoid selecting the default class 0
        self.coverage.get(left)?;
        let class1 = self.class_def1.get(left);
        let class2 = self.class_def2.get(right);
        if class1 >= self.class1_count || class2 >= self.class2_count {
            return None;
        }
        let record_len =
            self.value_format1.record_byte_len() + self.value_format2.record_byte_len();
        let index = class1 as usize * self.class2_count as usize + class2 as usize;
        self.records.read_at(index * record_len).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::{bebuffer::BeBuffer, layout as test_data};

    #[test]
    fn pair_kerning_from_layout() {
        let gpos = Gpos::read(test_data::LAYOUT_V1_1.into()).unwrap();
        let kerning = gpos.kerning().unwrap();
        assert!(!kerning.is_empty());
        assert_eq!(kerning.kern(GlyphId::new(5), GlyphId::new(7)), Some(-50));
        assert_eq!(kerning.kern(GlyphId::new(5), GlyphId::new(8)), None);
        assert_eq!(kerning.kern(GlyphId::new(7), GlyphId::new(5)), None);
    }

    fn class_pair_buf(value_format1: u16) -> BeBuffer {
        BeBuffer::new()
            .extend([2u16, 28, value_format1, 0, 38, 46, 2, 3])
            // records: class1 0 then class1 1
            .extend([0i16, 0, 0, 0, -80, 25])
            // coverage @28
            .extend([2u16, 1, 10, 12, 0])
            // class def 1 @38: 11 is class 1
            .extend([1u16, 11, 1, 1])
            // class def 2 @46: 20 is class 1, 21..=22 class 2
            .extend([2u16, 2, 20, 20, 1, 21, 22, 2])
    }

    #[test]
    fn class_pair_kerning() {
        let buf = class_pair_buf(ValueFormat::X_ADVANCE);
        let pair_pos = PairPos::read(buf.data().into()).unwrap();
        assert!(pair_pos.is_kerning());
        let kern = |left, right| pair_pos.x_advance(GlyphId::new(left), GlyphId::new(right));
        assert_eq!(kern(11, 20), Some(-80));
        assert_eq!(kern(11, 22), Some(25));
        assert_eq!(kern(10, 21), Some(0));
        // not covered
        assert_eq!(kern(13, 21), None);
    }

    #[test]
    fn unsupported_value_format() {
        let buf = class_pair_buf(ValueFormat::X_PLACEMENT);
        let pair_pos = PairPos::read(buf.data().into()).unwrap();
        assert!(!pair_pos.is_kerning());
        assert_eq!(pair_pos.x_advance(GlyphId::new(11), GlyphId::new(20)), None);
    }
}
