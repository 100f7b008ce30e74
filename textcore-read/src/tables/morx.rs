//! The [morx (Extended Glyph Metamorphosis)](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6morx.html) table.

use types::{BigEndian, FixedSize, GlyphId, Offset32, Tag};

use super::aat::{read_array_to_end, ExtendedStateTable, Lookup, NoPayload};
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'morx'
pub const TAG: Tag = Tag::new(b"morx");

/// The extended glyph metamorphosis table: a list of chains, each holding
/// feature flags and subtables.
#[derive(Clone, Copy)]
pub struct Morx<'a> {
    version: u16,
    n_chains: u32,
    chain_data: FontData<'a>,
}

impl TopLevelTable for Morx<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Morx<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version = data.read_at::<u16>(0)?;
        if !(2..=3).contains(&version) {
            return Err(ReadError::InvalidFormat(version.into()));
        }
        let n_chains = data.read_at::<u32>(4)?;
        let chain_data = data.split_off(8).ok_or(ReadError::OutOfBounds)?;
        let this = Morx {
            version,
            n_chains,
            chain_data,
        };
        for chain in this.chains() {
            chain?;
        }
        Ok(this)
    }
}

impl<'a> Morx<'a> {
    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn n_chains(&self) -> u32 {
        self.n_chains
    }

    /// Returns an iterator over the chains.
    pub fn chains(&self) -> impl Iterator<Item = Result<Chain<'a>, ReadError>> + 'a {
        let mut data = self.chain_data;
        (0..self.n_chains).map(move |_| {
            let len = data.read_at::<u32>(4)? as usize;
            let chain_data = data.slice(..len).ok_or(ReadError::OutOfBounds)?;
            data = data.split_off(len).unwrap_or_default();
            Chain::read(chain_data)
        })
    }
}

/// A feature entry, mapping a feature type and setting to flags.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct Feature {
    pub feature_type: BigEndian<u16>,
    pub feature_settings: BigEndian<u16>,
    pub enable_flags: BigEndian<u32>,
    pub disable_flags: BigEndian<u32>,
}

impl FixedSize for Feature {
    const RAW_BYTE_LEN: usize = 12;
}

impl Feature {
    pub fn feature_type(&self) -> u16 {
        self.feature_type.get()
    }

    pub fn feature_settings(&self) -> u16 {
        self.feature_settings.get()
    }

    pub fn enable_flags(&self) -> u32 {
        self.enable_flags.get()
    }

    pub fn disable_flags(&self) -> u32 {
        self.disable_flags.get()
    }
}

/// A chain of subtables sharing a set of feature flags.
#[derive(Clone, Copy)]
pub struct Chain<'a> {
    default_flags: u32,
    n_subtables: u32,
    features: &'a [Feature],
    subtable_data: FontData<'a>,
}

impl<'a> FontRead<'a> for Chain<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let default_flags = cursor.read::<u32>()?;
        // chainLength
        cursor.advance::<u32>();
        let n_features = cursor.read::<u32>()?;
        let n_subtables = cursor.read::<u32>()?;
        let features = cursor.read_array(n_features as usize)?;
        let subtable_data = cursor.remaining().unwrap_or_default();
        let this = Chain {
            default_flags,
            n_subtables,
            features,
            subtable_data,
        };
        for subtable in this.subtables() {
            subtable?;
        }
        Ok(this)
    }
}

impl<'a> Chain<'a> {
    pub fn default_flags(&self) -> u32 {
        self.default_flags
    }

    pub fn features(&self) -> &'a [Feature] {
        self.features
    }

    /// Returns an iterator over the subtables, in processing order.
    pub fn subtables(&self) -> impl Iterator<Item = Result<Subtable<'a>, ReadError>> + 'a {
        let mut data = self.subtable_data;
        (0..self.n_subtables).map(move |_| {
            let len = data.read_at::<u32>(0)? as usize;
            if len < Subtable::HEADER_LEN {
                return Err(ReadError::MalformedData("morx subtable too short"));
            }
            let subtable_data = data.slice(..len).ok_or(ReadError::OutOfBounds)?;
            data = data.split_off(len).unwrap_or_default();
            Subtable::read(subtable_data)
        })
    }
}

/// A subtable header and its data.
#[derive(Clone, Copy)]
pub struct Subtable<'a> {
    coverage: u32,
    sub_feature_flags: u32,
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Subtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let coverage = data.read_at::<u32>(4)?;
        let sub_feature_flags = data.read_at::<u32>(8)?;
        let data = data
            .split_off(Self::HEADER_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Subtable {
            coverage,
            sub_feature_flags,
            data,
        })
    }
}

impl<'a> Subtable<'a> {
    pub const HEADER_LEN: usize = 12;

    pub fn coverage(&self) -> u32 {
        self.coverage
    }

    /// The flags selecting whether the subtable is applied.
    pub fn sub_feature_flags(&self) -> u32 {
        self.sub_feature_flags
    }

    /// If true, this subtable will process glyphs in logical order (or reverse
    /// logical order, depending on the value of bit 0x80000000).
    pub fn is_logical(&self) -> bool {
        self.coverage & 0x10000000 != 0
    }

    /// If true, this subtable will be applied to both horizontal and vertical
    /// text (i.e. the state of bit 0x80000000 is ignored).
    pub fn is_all_directions(&self) -> bool {
        self.coverage & 0x20000000 != 0
    }

    /// If true, this subtable will process glyphs in descending order.
    pub fn is_backwards(&self) -> bool {
        self.coverage & 0x40000000 != 0
    }

    /// If true, this subtable will only be applied to vertical text.
    pub fn is_vertical(&self) -> bool {
        self.coverage & 0x80000000 != 0
    }

    /// Returns the decoded subtable data.
    pub fn kind(&self) -> Result<SubtableKind<'a>, ReadError> {
        let data = self.data;
        // format is the low byte of the coverage
        match self.coverage & 0xFF {
            0 => ExtendedStateTable::read(data).map(SubtableKind::Rearrangement),
            1 => ContextualSubtable::read(data).map(SubtableKind::Contextual),
            2 => LigatureSubtable::read(data).map(SubtableKind::Ligature),
            // 3 is reserved
            4 => Lookup::read(data).map(SubtableKind::NonContextual),
            5 => InsertionSubtable::read(data).map(SubtableKind::Insertion),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

/// The various `morx` subtable formats.
#[derive(Clone, Copy)]
pub enum SubtableKind<'a> {
    Rearrangement(ExtendedStateTable<'a, NoPayload>),
    Contextual(ContextualSubtable<'a>),
    Ligature(LigatureSubtable<'a>),
    NonContextual(Lookup<'a>),
    Insertion(InsertionSubtable<'a>),
}

/// Flags of rearrangement entries.
pub mod rearrangement_flags {
    pub const MARK_FIRST: u16 = 0x8000;
    pub const DONT_ADVANCE: u16 = 0x4000;
    pub const MARK_LAST: u16 = 0x2000;
    pub const VERB: u16 = 0x000F;
}

/// Payload of contextual substitution entries.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct ContextualEntryData {
    pub mark_index: BigEndian<u16>,
    pub current_index: BigEndian<u16>,
}

impl FixedSize for ContextualEntryData {
    const RAW_BYTE_LEN: usize = 4;
}

impl ContextualEntryData {
    /// The lookup applied to the marked glyph, if any.
    pub fn mark_index(&self) -> Option<u16> {
        Some(self.mark_index.get()).filter(|ix| *ix != 0xFFFF)
    }

    /// The lookup applied to the current glyph, if any.
    pub fn current_index(&self) -> Option<u16> {
        Some(self.current_index.get()).filter(|ix| *ix != 0xFFFF)
    }
}

/// Contextual glyph substitution subtable.
#[derive(Clone, Copy)]
pub struct ContextualSubtable<'a> {
    pub state_table: ExtendedStateTable<'a, ContextualEntryData>,
    substitution_data: FontData<'a>,
    substitution_offsets: &'a [BigEndian<Offset32>],
}

impl<'a> FontRead<'a> for ContextualSubtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let state_table = ExtendedStateTable::read(data)?;
        let offset = data.read_at::<u32>(ExtendedStateTable::<()>::HEADER_LEN)? as usize;
        let substitution_data = data.split_off(offset).ok_or(ReadError::OutOfBounds)?;
        // the number of lookups is not stored; the offsets run up to the
        // first lookup
        let mut substitution_offsets: &[BigEndian<Offset32>] =
            read_array_to_end(&substitution_data, 0)?;
        if let Some(first) = substitution_offsets.first() {
            let count =
                (first.get().to_usize() / Offset32::RAW_BYTE_LEN).min(substitution_offsets.len());
            substitution_offsets = &substitution_offsets[..count];
        }
        Ok(Self {
            state_table,
            substitution_data,
            substitution_offsets,
        })
    }
}

impl<'a> ContextualSubtable<'a> {
    /// Returns the substitution lookup at `index`.
    pub fn lookup(&self, index: u16) -> Result<Lookup<'a>, ReadError> {
        let offset = self
            .substitution_offsets
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get();
        self.substitution_data.read_table_at(offset.to_usize())
    }
}

/// Flags of ligature entries.
pub mod ligature_flags {
    pub const SET_COMPONENT: u16 = 0x8000;
    pub const DONT_ADVANCE: u16 = 0x4000;
    pub const PERFORM_ACTION: u16 = 0x2000;
}

/// A ligature action, popping one glyph off the component stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LigatureAction(pub u32);

impl LigatureAction {
    /// This is the last action of the list.
    pub fn is_last(self) -> bool {
        self.0 & 0x80000000 != 0
    }

    /// Store the ligature at the current cumulated index.
    pub fn is_store(self) -> bool {
        self.0 & 0x40000000 != 0
    }

    /// The sign extended 30-bit offset added to the glyph id to compute
    /// the component index.
    pub fn offset(self) -> i32 {
        ((self.0 << 2) as i32) >> 2
    }
}

/// Ligature glyph substitution subtable.
#[derive(Clone, Copy)]
pub struct LigatureSubtable<'a> {
    pub state_table: ExtendedStateTable<'a, BigEndian<u16>>,
    /// The ligature actions, indexed by the entry payload.
    pub ligature_actions: &'a [BigEndian<u32>],
    /// Component indices summed to find the ligature glyph.
    pub components: &'a [BigEndian<u16>],
    /// Output ligature glyphs.
    pub ligatures: &'a [BigEndian<GlyphId>],
}

impl<'a> FontRead<'a> for LigatureSubtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let state_table = ExtendedStateTable::read(data)?;
        let mut cursor = data.cursor();
        cursor.advance_by(ExtendedStateTable::<()>::HEADER_LEN);
        // none of these arrays have associated sizes, so we read until the
        // end of the data
        let lig_action_offset = cursor.read::<u32>()? as usize;
        let component_offset = cursor.read::<u32>()? as usize;
        let ligature_offset = cursor.read::<u32>()? as usize;
        Ok(Self {
            state_table,
            ligature_actions: read_array_to_end(&data, lig_action_offset)?,
            components: read_array_to_end(&data, component_offset)?,
            ligatures: read_array_to_end(&data, ligature_offset)?,
        })
    }
}

impl LigatureSubtable<'_> {
    /// Returns the ligature actions starting at `index`, up to and
    /// including the last one.
    pub fn actions(&self, index: u16) -> impl Iterator<Item = LigatureAction> + '_ {
        let mut done = false;
        self.ligature_actions
            .iter()
            .skip(index as usize)
            .map(|action| LigatureAction(action.get()))
            .take_while(move |action| {
                let take = !done;
                done = action.is_last();
                take
            })
    }
}

/// Payload of insertion entries.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct InsertionEntryData {
    pub current_insert_index: BigEndian<u16>,
    pub marked_insert_index: BigEndian<u16>,
}

impl FixedSize for InsertionEntryData {
    const RAW_BYTE_LEN: usize = 4;
}

/// Flags of insertion entries.
pub mod insertion_flags {
    pub const SET_MARK: u16 = 0x8000;
    pub const DONT_ADVANCE: u16 = 0x4000;
    pub const CURRENT_IS_KASHIDA_LIKE: u16 = 0x2000;
    pub const MARKED_IS_KASHIDA_LIKE: u16 = 0x1000;
    pub const CURRENT_INSERT_BEFORE: u16 = 0x0800;
    pub const MARKED_INSERT_BEFORE: u16 = 0x0400;
    pub const CURRENT_INSERT_COUNT: u16 = 0x03E0;
    pub const MARKED_INSERT_COUNT: u16 = 0x001F;
}

/// Insertion glyph substitution subtable.
#[derive(Clone, Copy)]
pub struct InsertionSubtable<'a> {
    pub state_table: ExtendedStateTable<'a, InsertionEntryData>,
    /// Insertion glyph table. The index and count of glyphs to insert is
    /// determined by the state machine.
    pub glyphs: &'a [BigEndian<GlyphId>],
}

impl<'a> FontRead<'a> for InsertionSubtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let state_table = ExtendedStateTable::read(data)?;
        let glyphs_offset = data.read_at::<u32>(ExtendedStateTable::<()>::HEADER_LEN)? as usize;
        let glyphs = read_array_to_end(&data, glyphs_offset)?;
        Ok(Self {
            state_table,
            glyphs,
        })
    }
}

impl<'a> InsertionSubtable<'a> {
    /// Returns the glyphs inserted at the current glyph by the entry with
    /// the given flags and payload.
    pub fn current_insertion(
        &self,
        flags: u16,
        data: &InsertionEntryData,
    ) -> Option<&'a [BigEndian<GlyphId>]> {
        let count = (flags & insertion_flags::CURRENT_INSERT_COUNT) >> 5;
        self.insertion(data.current_insert_index.get(), count)
    }

    /// Returns the glyphs inserted at the marked glyph.
    pub fn marked_insertion(
        &self,
        flags: u16,
        data: &InsertionEntryData,
    ) -> Option<&'a [BigEndian<GlyphId>]> {
        let count = flags & insertion_flags::MARKED_INSERT_COUNT;
        self.insertion(data.marked_insert_index.get(), count)
    }

    fn insertion(&self, index: u16, count: u16) -> Option<&'a [BigEndian<GlyphId>]> {
        if index == 0xFFFF || count == 0 {
            return None;
        }
        let start = index as usize;
        self.glyphs.get(start..start + count as usize)
    }
}
