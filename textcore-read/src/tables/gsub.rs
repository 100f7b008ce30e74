//! The [GSUB](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub) table

use types::{BigEndian, GlyphId, Offset16, Tag};

use super::layout::{CoverageTable, LayoutTable, Lookup};
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'GSUB'
pub const TAG: Tag = Tag::new(b"GSUB");

/// The lookup type of extension substitution subtables.
pub const EXTENSION_LOOKUP_TYPE: u16 = 7;

/// The glyph substitution table.
#[derive(Clone, Copy)]
pub struct Gsub<'a> {
    layout: LayoutTable<'a>,
}

impl TopLevelTable for Gsub<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Gsub<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        LayoutTable::read(data).map(|layout| Gsub { layout })
    }
}

impl<'a> Gsub<'a> {
    /// The script, feature and lookup lists.
    pub fn layout(&self) -> &LayoutTable<'a> {
        &self.layout
    }

    /// Returns the decoded subtables of the lookup at `index`.
    ///
    /// Subtables of a type that is not decoded are skipped.
    pub fn lookup_subtables(
        &self,
        index: u16,
    ) -> Result<impl Iterator<Item = Result<SubstitutionSubtable<'a>, ReadError>> + 'a, ReadError>
    {
        let lookup = self.layout.lookup_list()?.get(index)?;
        Ok(SubstitutionSubtable::decode_lookup(&lookup))
    }
}

/// The substitution subtables that are decoded.
#[derive(Clone, Copy)]
pub enum SubstitutionSubtable<'a> {
    Single(SingleSubst<'a>),
    Multiple(SequenceSubst<'a>),
    Alternate(SequenceSubst<'a>),
    Ligature(LigatureSubst<'a>),
}

impl<'a> SubstitutionSubtable<'a> {
    /// Decodes every subtable of the lookup, resolving extensions.
    pub fn decode_lookup(
        lookup: &Lookup<'a>,
    ) -> impl Iterator<Item = Result<SubstitutionSubtable<'a>, ReadError>> + 'a {
        lookup
            .resolved_subtables(EXTENSION_LOOKUP_TYPE)
            .filter_map(|subtable| match subtable {
                Ok((lookup_type, data)) => Self::read_typed(lookup_type, data),
                Err(e) => Some(Err(e)),
            })
    }

    fn read_typed(lookup_type: u16, data: FontData<'a>) -> Option<Result<Self, ReadError>> {
        let subtable = match lookup_type {
            1 => SingleSubst::read(data).map(Self::Single),
            2 => SequenceSubst::read(data).map(Self::Multiple),
            3 => SequenceSubst::read(data).map(Self::Alternate),
            4 => LigatureSubst::read(data).map(Self::Ligature),
            other => {
                log::debug!("skipping GSUB subtable of type {other}");
                return None;
            }
        };
        Some(subtable)
    }
}

fn read_coverage<'a>(data: FontData<'a>) -> Result<CoverageTable<'a>, ReadError> {
    let offset = data.read_at::<Offset16>(2)?;
    data.read_table_at(offset.to_usize())
}

/// Single substitution, formats 1 and 2.
#[derive(Clone, Copy)]
pub enum SingleSubst<'a> {
    Format1 {
        coverage: CoverageTable<'a>,
        delta_glyph_id: i16,
    },
    Format2 {
        coverage: CoverageTable<'a>,
        substitutes: &'a [BigEndian<GlyphId>],
    },
}

impl<'a> FontRead<'a> for SingleSubst<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format = data.read_at::<u16>(0)?;
        let coverage = read_coverage(data)?;
        match format {
            1 => Ok(Self::Format1 {
                coverage,
                delta_glyph_id: data.read_at(4)?,
            }),
            2 => {
                let count = data.read_at::<u16>(4)?;
                Ok(Self::Format2 {
                    coverage,
                    substitutes: data.read_array_len(6, count as usize)?,
                })
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl SingleSubst<'_> {
    pub fn coverage(&self) -> &CoverageTable<'_> {
        match self {
            Self::Format1 { coverage, .. } | Self::Format2 { coverage, .. } => coverage,
        }
    }

    /// Returns the substitute for the glyph, if it is covered.
    pub fn apply(&self, gid: GlyphId) -> Option<GlyphId> {
        let index = self.coverage().get(gid)?;
        match self {
            // addition is modulo 65536
            Self::Format1 { delta_glyph_id, .. } => Some(GlyphId::new(
                gid.to_u16().wrapping_add(*delta_glyph_id as u16),
            )),
            Self::Format2 { substitutes, .. } => {
                substitutes.get(index as usize).map(|gid| gid.get())
            }
        }
    }
}

/// Multiple and alternate substitution: both map a covered glyph to an
/// array of glyphs, either a replacement sequence or a set of alternates.
#[derive(Clone, Copy)]
pub struct SequenceSubst<'a> {
    data: FontData<'a>,
    coverage: CoverageTable<'a>,
    offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for SequenceSubst<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format = data.read_at::<u16>(0)?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        let coverage = read_coverage(data)?;
        let count = data.read_at::<u16>(4)?;
        let offsets = data.read_array_len(6, count as usize)?;
        Ok(SequenceSubst {
            data,
            coverage,
            offsets,
        })
    }
}

impl<'a> SequenceSubst<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    /// Returns the glyph array for the glyph, if it is covered.
    pub fn glyphs(&self, gid: GlyphId) -> Option<Result<&'a [BigEndian<GlyphId>], ReadError>> {
        let index = self.coverage.get(gid)?;
        let offset = self.offsets.get(index as usize)?.get();
        Some(self.data.read_at::<u16>(offset.to_usize()).and_then(|count| {
            self.data
                .read_array_len(offset.to_usize() + 2, count as usize)
        }))
    }
}

/// Ligature substitution.
#[derive(Clone, Copy)]
pub struct LigatureSubst<'a> {
    data: FontData<'a>,
    coverage: CoverageTable<'a>,
    set_offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for LigatureSubst<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format = data.read_at::<u16>(0)?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        let coverage = read_coverage(data)?;
        let count = data.read_at::<u16>(4)?;
        let set_offsets = data.read_array_len(6, count as usize)?;
        Ok(LigatureSubst {
            data,
            coverage,
            set_offsets,
        })
    }
}

impl<'a> LigatureSubst<'a> {
    pub fn coverage(&self) -> &CoverageTable<'a> {
        &self.coverage
    }

    /// Returns the ligatures starting with the glyph, in preference order.
    pub fn ligature_set(&self, first: GlyphId) -> Option<Result<LigatureSet<'a>, ReadError>> {
        let index = self.coverage.get(first)?;
        let offset = self.set_offsets.get(index as usize)?.get();
        Some(self.data.read_table_at(offset.to_usize()))
    }

    /// Finds the first ligature matching the start of `glyphs`.
    ///
    /// Returns the ligature glyph and the number of glyphs it replaces.
    pub fn apply(&self, glyphs: &[GlyphId]) -> Option<(GlyphId, usize)> {
        let (first, rest) = glyphs.split_first()?;
        let set = self.ligature_set(*first)?.ok()?;
        set.iter().filter_map(Result::ok).find_map(|ligature| {
            let components = ligature.components();
            let matches = components.len() <= rest.len()
                && components
                    .iter()
                    .zip(rest)
                    .all(|(component, gid)| component.get() == *gid);
            matches.then_some((ligature.glyph(), components.len() + 1))
        })
    }
}

/// The ligatures sharing a first component.
#[derive(Clone, Copy)]
pub struct LigatureSet<'a> {
    data: FontData<'a>,
    offsets: &'a [BigEndian<Offset16>],
}

impl<'a> FontRead<'a> for LigatureSet<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count = data.read_at::<u16>(0)?;
        let offsets = data.read_array_len(2, count as usize)?;
        Ok(LigatureSet { data, offsets })
    }
}

impl<'a> LigatureSet<'a> {
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<Ligature<'a>, ReadError>> + 'a {
        let data = self.data;
        self.offsets
            .iter()
            .map(move |offset| data.read_table_at(offset.get().to_usize()))
    }
}

/// A ligature glyph and its components after the first.
#[derive(Clone, Copy)]
pub struct Ligature<'a> {
    glyph: GlyphId,
    components: &'a [BigEndian<GlyphId>],
}

impl<'a> FontRead<'a> for Ligature<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let glyph = data.read_at::<GlyphId>(0)?;
        let count = data.read_at::<u16>(2)?;
        // the count includes the first component, which is not stored
        let components = data.read_array_len(4, count.saturating_sub(1) as usize)?;
        Ok(Ligature { glyph, components })
    }
}

impl<'a> Ligature<'a> {
    pub fn glyph(&self) -> GlyphId {
        self.glyph
    }

    pub fn components(&self) -> &'a [BigEndian<GlyphId>] {
        self.components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    fn gids(glyphs: &[BigEndian<GlyphId>]) -> Vec<u16> {
        glyphs.iter().map(|gid| gid.get().to_u16()).collect()
    }

    #[test]
    fn single_formats() {
        let buf = BeBuffer::new()
            .extend([1u16, 6])
            .push(-3i16)
            .extend([1u16, 2, 10, 11]);
        let subst = SingleSubst::read(buf.data().into()).unwrap();
        assert_eq!(subst.apply(GlyphId::new(11)), Some(GlyphId::new(8)));
        assert_eq!(subst.apply(GlyphId::new(12)), None);

        let buf = BeBuffer::new()
            .extend([2u16, 10, 2, 40, 41])
            .extend([1u16, 2, 10, 11]);
        let subst = SingleSubst::read(buf.data().into()).unwrap();
        assert_eq!(subst.apply(GlyphId::new(10)), Some(GlyphId::new(40)));
        assert_eq!(subst.apply(GlyphId::new(11)), Some(GlyphId::new(41)));
    }

    #[test]
    fn multiple_and_alternate() {
        let buf = BeBuffer::new()
            .extend([1u16, 8, 1, 14])
            // coverage @8
            .extend([1u16, 1, 20])
            // sequence @14
            .extend([3u16, 21, 22, 23]);
        let subst = SequenceSubst::read(buf.data().into()).unwrap();
        let sequence = subst.glyphs(GlyphId::new(20)).unwrap().unwrap();
        assert_eq!(gids(sequence), [21, 22, 23]);
        assert!(subst.glyphs(GlyphId::new(21)).is_none());
    }

    fn ligature_buf() -> BeBuffer {
        BeBuffer::new()
            .extend([1u16, 8, 1, 14])
            // coverage @8: f
            .extend([1u16, 1, 70])
            // ligature set @14: ffi, ff
            .extend([2u16, 6, 14])
            // ffi @20
            .extend([200u16, 3, 70, 73])
            // ff @28
            .extend([201u16, 2, 70])
    }

    #[test]
    fn ligatures() {
        let buf = ligature_buf();
        let subst = LigatureSubst::read(buf.data().into()).unwrap();
        let set = subst.ligature_set(GlyphId::new(70)).unwrap().unwrap();
        assert_eq!(set.len(), 2);
        let glyphs = [70, 70, 73].map(GlyphId::new);
        assert_eq!(subst.apply(&glyphs), Some((GlyphId::new(200), 3)));
        assert_eq!(subst.apply(&glyphs[..2]), Some((GlyphId::new(201), 2)));
        assert_eq!(subst.apply(&glyphs[2..]), None);
        assert_eq!(subst.apply(&[]), None);
    }

    #[test]
    fn lookup_with_extension() {
        let buf = BeBuffer::new()
            .extend([1u16, 0]) // version 1.0
            .extend([10u16, 12, 14]) // script, feature, lookup lists
            .extend([0u16, 0]) // empty script and feature lists
            // lookup list @14
            .extend([1u16, 4])
            // lookup @18: extension with one subtable
            .extend([7u16, 0, 1, 8])
            // extension @26 pointing at a single substitution
            .extend([1u16, 1])
            .push(8u32)
            // single subst @34
            .extend([1u16, 6, 1])
            .extend([1u16, 1, 5]);
        let gsub = Gsub::read(buf.data().into()).unwrap();
        let subtables = gsub.lookup_subtables(0).unwrap().collect::<Vec<_>>();
        assert_eq!(subtables.len(), 1);
        let Ok(SubstitutionSubtable::Single(single)) = &subtables[0] else {
            panic!("expected a single substitution");
        };
        assert_eq!(single.apply(GlyphId::new(5)), Some(GlyphId::new(6)));
    }
}
