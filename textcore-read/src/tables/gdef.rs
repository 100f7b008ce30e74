//! The [GDEF](https://docs.microsoft.com/en-us/typography/opentype/spec/gdef) table

use types::{BigEndian, GlyphId, MajorMinor, Offset16, Offset32, Tag};

use super::{
    layout::{ClassDef, CoverageTable},
    variations::ItemVariationStore,
};
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'GDEF'
pub const TAG: Tag = Tag::new(b"GDEF");

/// Values of the glyph class definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphClassDef {
    Unclassified,
    Base,
    Ligature,
    Mark,
    Component,
}

impl GlyphClassDef {
    fn new(class: u16) -> Self {
        match class {
            1 => Self::Base,
            2 => Self::Ligature,
            3 => Self::Mark,
            4 => Self::Component,
            _ => Self::Unclassified,
        }
    }
}

/// Glyph properties as a bit set: the glyph class in the low byte, and for
/// marks the mark attachment class in the high byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphProps(u16);

impl GlyphProps {
    pub const BASE_GLYPH: u16 = 1 << 1;
    pub const LIGATURE: u16 = 1 << 2;
    pub const MARK: u16 = 1 << 3;

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn is_mark(self) -> bool {
        self.0 & Self::MARK != 0
    }

    /// The mark attachment class, for marks.
    pub fn mark_attachment_class(self) -> u16 {
        self.0 >> 8
    }
}

/// The glyph definition table.
#[derive(Clone, Copy)]
pub struct Gdef<'a> {
    data: FontData<'a>,
    version: MajorMinor,
}

impl TopLevelTable for Gdef<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Gdef<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version = data.read_at::<MajorMinor>(0)?;
        let header_len = match (version.major, version.minor) {
            (1, 0) => 12,
            (1, 2) => 14,
            (1, 3) => 18,
            (major, _) if major != 1 => return Err(ReadError::InvalidFormat(major.into())),
            (_, minor) => return Err(ReadError::InvalidFormat(minor.into())),
        };
        if data.len() < header_len {
            return Err(ReadError::OutOfBounds);
        }
        Ok(Gdef { data, version })
    }
}

impl<'a> Gdef<'a> {
    pub fn version(&self) -> MajorMinor {
        self.version
    }

    fn subtable<T: FontRead<'a>>(&self, pos: usize) -> Option<Result<T, ReadError>> {
        let offset = self.data.read_at::<Offset16>(pos).ok()?;
        (!offset.is_null()).then(|| self.data.read_table_at(offset.to_usize()))
    }

    pub fn glyph_class_def(&self) -> Option<Result<ClassDef<'a>, ReadError>> {
        self.subtable(4)
    }

    pub fn mark_attach_class_def(&self) -> Option<Result<ClassDef<'a>, ReadError>> {
        self.subtable(10)
    }

    /// The mark glyph sets, present from version 1.2.
    pub fn mark_glyph_sets_def(&self) -> Option<Result<MarkGlyphSets<'a>, ReadError>> {
        if self.version.minor < 2 {
            return None;
        }
        self.subtable(12)
    }

    /// The item variation store, present from version 1.3.
    pub fn item_var_store(&self) -> Option<Result<ItemVariationStore<'a>, ReadError>> {
        if self.version.minor < 3 {
            return None;
        }
        let offset = self.data.read_at::<Offset32>(14).ok()?;
        (!offset.is_null()).then(|| self.data.read_table_at(offset.to_usize()))
    }

    /// Returns the class of the glyph.
    pub fn glyph_class(&self, gid: GlyphId) -> GlyphClassDef {
        match self.glyph_class_def() {
            Some(Ok(class_def)) => GlyphClassDef::new(class_def.get(gid)),
            _ => GlyphClassDef::Unclassified,
        }
    }

    /// Returns the glyph properties used to filter glyphs during lookups.
    pub fn glyph_props(&self, gid: GlyphId) -> GlyphProps {
        match self.glyph_class(gid) {
            GlyphClassDef::Base => GlyphProps(GlyphProps::BASE_GLYPH),
            GlyphClassDef::Ligature => GlyphProps(GlyphProps::LIGATURE),
            GlyphClassDef::Mark => {
                let class = match self.mark_attach_class_def() {
                    Some(Ok(class_def)) => class_def.get(gid),
                    _ => 0,
                };
                GlyphProps(GlyphProps::MARK | class << 8)
            }
            _ => GlyphProps::default(),
        }
    }
}

/// Sets of marks used by lookups with a mark filtering set.
#[derive(Clone, Copy)]
pub struct MarkGlyphSets<'a> {
    data: FontData<'a>,
    offsets: &'a [BigEndian<Offset32>],
}

impl<'a> FontRead<'a> for MarkGlyphSets<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format = data.read_at::<u16>(0)?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        let count = data.read_at::<u16>(2)?;
        let offsets = data.read_array_len(4, count as usize)?;
        Ok(MarkGlyphSets { data, offsets })
    }
}

impl<'a> MarkGlyphSets<'a> {
    pub fn count(&self) -> u16 {
        self.offsets.len() as u16
    }

    pub fn coverage(&self, set_index: u16) -> Result<CoverageTable<'a>, ReadError> {
        let offset = self
            .offsets
            .get(set_index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        self.data.read_table_at(offset.to_usize())
    }

    /// Returns true if the glyph belongs to the given set.
    pub fn contains(&self, set_index: u16, gid: GlyphId) -> bool {
        self.coverage(set_index)
            .map(|coverage| coverage.get(gid).is_some())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    fn gdef_buf() -> BeBuffer {
        BeBuffer::new()
            .extend([1u16, 2]) // version 1.2
            .push(14u16) // glyph class def
            .extend([0u16, 0]) // attach list, lig caret list
            .push(36u16) // mark attach class def
            .push(52u16) // mark glyph sets
            // glyph class def @14: 1..=3 base, 4 ligature, 5..=6 mark
            .extend([2u16, 3])
            .extend([1u16, 3, 1])
            .extend([4u16, 4, 2])
            .extend([5u16, 6, 3])
            // mark attach class def @36: 6 is class 2
            .extend([2u16, 2])
            .extend([5u16, 5, 1])
            .extend([6u16, 6, 2])
            // mark glyph sets @52
            .extend([1u16, 1])
            .push(8u32)
            .extend([1u16, 1, 6])
    }

    #[test]
    fn glyph_classes() {
        let buf = gdef_buf();
        let gdef = Gdef::read(buf.data().into()).unwrap();
        assert_eq!(gdef.glyph_class(GlyphId::new(2)), GlyphClassDef::Base);
        assert_eq!(gdef.glyph_class(GlyphId::new(4)), GlyphClassDef::Ligature);
        assert_eq!(gdef.glyph_class(GlyphId::new(9)), GlyphClassDef::Unclassified);
        assert_eq!(
            gdef.glyph_props(GlyphId::new(1)).bits(),
            GlyphProps::BASE_GLYPH
        );
        let mark = gdef.glyph_props(GlyphId::new(6));
        assert!(mark.is_mark());
        assert_eq!(mark.mark_attachment_class(), 2);
        assert!(gdef.item_var_store().is_none());
    }

    #[test]
    fn mark_glyph_sets() {
        let buf = gdef_buf();
        let gdef = Gdef::read(buf.data().into()).unwrap();
        let sets = gdef.mark_glyph_sets_def().unwrap().unwrap();
        assert_eq!(sets.count(), 1);
        assert!(sets.contains(0, GlyphId::new(6)));
        assert!(!sets.contains(0, GlyphId::new(5)));
        assert!(!sets.contains(1, GlyphId::new(6)));
    }

    #[test]
    fn unsupported_version() {
        let buf = BeBuffer::new().extend([2u16, 0, 0, 0, 0, 0]);
        assert!(matches!(
            Gdef::read(buf.data().into()),
            Err(ReadError::InvalidFormat(2))
        ));
    }
}
