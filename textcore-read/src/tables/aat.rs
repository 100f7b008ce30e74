//! Apple Advanced Typography common tables.
//!
//! See <https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6Tables.html>

use types::{BigEndian, FixedSize, GlyphId, Scalar};

use crate::{FontData, FontRead, FontReadWithArgs, ReadArgs, ReadError};

/// Predefined classes.
///
/// See <https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6Tables.html>
pub mod class {
    pub const END_OF_TEXT: u16 = 0;
    pub const OUT_OF_BOUNDS: u16 = 1;
    pub const DELETED_GLYPH: u16 = 2;
    pub const END_OF_LINE: u16 = 3;
}

/// Lookup segment for formats 2 and 4.
///
/// For format 4 the value is an offset from the start of the lookup to an
/// array of values, one per glyph of the segment.
#[derive(Copy, Clone, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct LookupSegment {
    /// Last glyph index in this segment.
    pub last_glyph: BigEndian<u16>,
    /// First glyph index in this segment.
    pub first_glyph: BigEndian<u16>,
    /// The lookup value.
    pub value: BigEndian<u16>,
}

impl FixedSize for LookupSegment {
    const RAW_BYTE_LEN: usize = 6;
}

impl LookupSegment {
    fn contains(&self, glyph: u16) -> bool {
        (self.first_glyph.get()..=self.last_glyph.get()).contains(&glyph)
    }
}

/// Lookup single record for format 6.
#[derive(Copy, Clone, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct LookupSingle {
    /// The glyph index.
    pub glyph: BigEndian<u16>,
    /// The lookup value.
    pub value: BigEndian<u16>,
}

impl FixedSize for LookupSingle {
    const RAW_BYTE_LEN: usize = 4;
}

/// An AAT lookup table, mapping glyphs to 16-bit values.
///
/// Lookups serve as class tables for the extended state machines and as
/// glyph to glyph or glyph to offset maps.
#[derive(Clone, Copy)]
pub enum Lookup<'a> {
    /// Simple array indexed by glyph.
    Format0(&'a [BigEndian<u16>]),
    /// Segments mapping a glyph range to a single value.
    Format2(&'a [LookupSegment]),
    /// Segments mapping a glyph range to an array of values.
    Format4 {
        data: FontData<'a>,
        segments: &'a [LookupSegment],
    },
    /// Sorted glyph and value pairs.
    Format6(&'a [LookupSingle]),
    /// Trimmed array of values.
    Format8 {
        first_glyph: u16,
        values: &'a [BigEndian<u16>],
    },
    /// Trimmed array of values of a given byte size.
    Format10 {
        unit_size: u16,
        first_glyph: u16,
        glyph_count: u16,
        values: FontData<'a>,
    },
}

/// Reads the binary search header shared by formats 2, 4 and 6.
fn read_bin_search<'a, T: bytemuck::AnyBitPattern + FixedSize>(
    data: FontData<'a>,
) -> Result<&'a [T], ReadError> {
    let unit_size = data.read_at::<u16>(2)?;
    if unit_size as usize != T::RAW_BYTE_LEN {
        return Err(ReadError::MalformedData("unexpected AAT lookup unit size"));
    }
    let n_units = data.read_at::<u16>(4)?;
    data.read_array_len(12, n_units as usize)
}

impl<'a> Lookup<'a> {
    fn read_impl(data: FontData<'a>, num_glyphs: Option<u16>) -> Result<Self, ReadError> {
        let format = data.read_at::<u16>(0)?;
        match format {
            0 => {
                let available = data.len().saturating_sub(2) / 2;
                let len = match num_glyphs {
                    Some(n) if (n as usize) <= available => n as usize,
                    Some(_) => return Err(ReadError::OutOfBounds),
                    None => available,
                };
                data.read_array_len(2, len).map(Self::Format0)
            }
            2 => read_bin_search(data).map(Self::Format2),
            4 => {
                let segments = read_bin_search(data)?;
                Ok(Self::Format4 { data, segments })
            }
            6 => read_bin_search(data).map(Self::Format6),
            8 => {
                let first_glyph = data.read_at::<u16>(2)?;
                let count = data.read_at::<u16>(4)?;
                let values = data.read_array_len(6, count as usize)?;
                Ok(Self::Format8 {
                    first_glyph,
                    values,
                })
            }
            10 => {
                let unit_size = data.read_at::<u16>(2)?;
                if !matches!(unit_size, 1 | 2 | 4) {
                    return Err(ReadError::MalformedData(
                        "invalid unit size in format 10 AAT lookup",
                    ));
                }
                let first_glyph = data.read_at::<u16>(4)?;
                let glyph_count = data.read_at::<u16>(6)?;
                let values = data
                    .slice_len(8, glyph_count as usize * unit_size as usize)
                    .ok_or(ReadError::OutOfBounds)?;
                Ok(Self::Format10 {
                    unit_size,
                    first_glyph,
                    glyph_count,
                    values,
                })
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }

    /// Returns the value associated with the glyph, or `None` if the lookup
    /// does not map it.
    pub fn value(&self, glyph: u16) -> Option<u16> {
        match self {
            Self::Format0(values) => values.get(glyph as usize).map(|v| v.get()),
            Self::Format2(segments) => {
                find_segment(segments, glyph).map(|segment| segment.value.get())
            }
            Self::Format4 { data, segments } => {
                let segment = find_segment(segments, glyph)?;
                let ix = glyph - segment.first_glyph.get();
                data.read_at(segment.value.get() as usize + ix as usize * 2)
                    .ok()
            }
            Self::Format6(entries) => entries
                .binary_search_by_key(&glyph, |entry| entry.glyph.get())
                .ok()
                .map(|ix| entries[ix].value.get()),
            Self::Format8 {
                first_glyph,
                values,
            } => glyph
                .checked_sub(*first_glyph)
                .and_then(|ix| values.get(ix as usize))
                .map(|v| v.get()),
            Self::Format10 {
                unit_size,
                first_glyph,
                glyph_count,
                values,
            } => {
                let ix = glyph.checked_sub(*first_glyph)?;
                if ix >= *glyph_count {
                    return None;
                }
                let offset = ix as usize * *unit_size as usize;
                // wider values are truncated
                match unit_size {
                    1 => values.read_at::<u8>(offset).ok().map(u16::from),
                    2 => values.read_at::<u16>(offset).ok(),
                    _ => values.read_at::<u32>(offset).ok().map(|v| v as u16),
                }
            }
        }
    }

    /// Returns the number of glyphs mapped by the lookup.
    pub fn glyph_count(&self) -> usize {
        match self {
            Self::Format0(values) => values.len(),
            Self::Format2(segments) | Self::Format4 { segments, .. } => segments
                .iter()
                .filter(|segment| segment.first_glyph.get() != 0xFFFF)
                .map(|segment| {
                    (segment.last_glyph.get() as usize + 1)
                        .saturating_sub(segment.first_glyph.get() as usize)
                })
                .sum(),
            Self::Format6(entries) => entries
                .iter()
                .filter(|entry| entry.glyph.get() != 0xFFFF)
                .count(),
            Self::Format8 { values, .. } => values.len(),
            Self::Format10 { glyph_count, .. } => *glyph_count as usize,
        }
    }

    /// The largest value plus one: the number of classes when the lookup is
    /// a class table.
    pub fn extent(&self) -> usize {
        let max = match self {
            Self::Format0(values) | Self::Format8 { values, .. } => {
                values.iter().map(|v| v.get()).max()
            }
            Self::Format2(segments) => segments
                .iter()
                .filter(|segment| segment.first_glyph.get() != 0xFFFF)
                .map(|segment| segment.value.get())
                .max(),
            Self::Format4 { segments, .. } => segments
                .iter()
                .filter(|segment| segment.first_glyph.get() != 0xFFFF)
                .flat_map(|segment| {
                    (segment.first_glyph.get()..=segment.last_glyph.get())
                        .filter_map(|glyph| self.value(glyph))
                })
                .max(),
            Self::Format6(entries) => entries
                .iter()
                .filter(|entry| entry.glyph.get() != 0xFFFF)
                .map(|entry| entry.value.get())
                .max(),
            Self::Format10 {
                first_glyph,
                glyph_count,
                ..
            } => (0..*glyph_count)
                .filter_map(|ix| self.value(first_glyph.wrapping_add(ix)))
                .max(),
        };
        max.unwrap_or_default() as usize + 1
    }
}

fn find_segment(segments: &[LookupSegment], glyph: u16) -> Option<&LookupSegment> {
    let ix = match segments.binary_search_by(|segment| segment.first_glyph.get().cmp(&glyph)) {
        Ok(ix) => ix,
        Err(ix) => ix.checked_sub(1)?,
    };
    segments.get(ix).filter(|segment| segment.contains(glyph))
}

impl<'a> FontRead<'a> for Lookup<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Self::read_impl(data, None)
    }
}

impl ReadArgs for Lookup<'_> {
    type Args = u16;
}

impl<'a> FontReadWithArgs<'a> for Lookup<'a> {
    /// Reads a lookup whose format 0 array has exactly `num_glyphs` entries.
    fn read_with_args(data: FontData<'a>, num_glyphs: &u16) -> Result<Self, ReadError> {
        Self::read_impl(data, Some(*num_glyphs))
    }
}

/// Empty payload for a state table entry.
#[derive(Copy, Clone, Debug, Default, bytemuck::AnyBitPattern)]
pub struct NoPayload(());

impl FixedSize for NoPayload {
    const RAW_BYTE_LEN: usize = 0;
}

/// Entry in an (extended) state table.
#[derive(Copy, Clone, Debug)]
pub struct StateEntry<T = NoPayload> {
    /// Index of the next state.
    pub new_state: u16,
    /// Flag values are table specific.
    pub flags: u16,
    /// Payload is table specific.
    pub payload: T,
}

impl<T: bytemuck::AnyBitPattern> StateEntry<T> {
    /// The entry used when a state is out of range.
    pub fn zeroed() -> Self {
        Self {
            new_state: 0,
            flags: 0,
            payload: T::zeroed(),
        }
    }
}

impl<T: FixedSize> FixedSize for StateEntry<T> {
    const RAW_BYTE_LEN: usize = u16::RAW_BYTE_LEN + u16::RAW_BYTE_LEN + T::RAW_BYTE_LEN;
}

impl<'a, T: bytemuck::AnyBitPattern + FixedSize> FontRead<'a> for StateEntry<T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let new_state = data.read_at(0)?;
        let flags = data.read_at(2)?;
        let payload = if T::RAW_BYTE_LEN == 0 {
            T::zeroed()
        } else {
            *data.read_ref_at(4)?
        };
        Ok(Self {
            new_state,
            flags,
            payload,
        })
    }
}

fn check_class_count(n_classes: u32) -> Result<(), ReadError> {
    if n_classes < 4 {
        return Err(ReadError::ClassCountTooSmall(n_classes));
    }
    Ok(())
}

/// A legacy state table, with 16-bit header fields and one byte per state
/// array cell, as used by `kern` format 1.
#[derive(Clone, Copy)]
pub struct StateTable<'a> {
    data: FontData<'a>,
    n_classes: usize,
    state_array_offset: u16,
    class_first_glyph: u16,
    class_array: &'a [u8],
    state_array: &'a [u8],
    entry_table: FontData<'a>,
}

impl<'a> StateTable<'a> {
    pub const HEADER_LEN: usize = u16::RAW_BYTE_LEN * 4;

    /// The data starting at the state table header, for reading values
    /// referenced by entries.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Returns the class of the glyph.
    pub fn class(&self, glyph_id: GlyphId) -> u16 {
        let glyph_id = glyph_id.to_u16();
        if glyph_id == 0xFFFF {
            return class::DELETED_GLYPH;
        }
        glyph_id
            .checked_sub(self.class_first_glyph)
            .and_then(|ix| self.class_array.get(ix as usize))
            .map(|class| *class as u16)
            .unwrap_or(class::OUT_OF_BOUNDS)
    }

    /// Returns the entry for the given state and class.
    pub fn entry(&self, state: u16, class: u16) -> StateEntry {
        let mut class = class as usize;
        if class >= self.n_classes {
            class = class::OUT_OF_BOUNDS as usize;
        }
        let Some(entry_ix) = self.state_array.get(state as usize * self.n_classes + class) else {
            return StateEntry::zeroed();
        };
        let Ok(mut entry) = self
            .entry_table
            .split_off(*entry_ix as usize * 4)
            .ok_or(ReadError::OutOfBounds)
            .and_then(StateEntry::<NoPayload>::read)
        else {
            return StateEntry::zeroed();
        };
        // newState is a byte offset to a row of the state array
        entry.new_state = entry
            .new_state
            .checked_sub(self.state_array_offset)
            .map(|delta| delta / self.n_classes as u16)
            .unwrap_or_default();
        entry
    }
}

impl<'a> FontRead<'a> for StateTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let n_classes = data.read_at::<u16>(0)?;
        check_class_count(n_classes.into())?;
        let class_offset = data.read_at::<u16>(2)? as usize;
        let state_array_offset = data.read_at::<u16>(4)?;
        let entry_offset = data.read_at::<u16>(6)? as usize;
        let class_first_glyph = data.read_at::<u16>(class_offset)?;
        let class_count = data.read_at::<u16>(class_offset + 2)?;
        let class_array = data
            .slice_len(class_offset + 4, class_count as usize)
            .ok_or(ReadError::OutOfBounds)?
            .as_bytes();
        // the state array has no explicit length: it runs up to the entry
        // table, or to the end of the data when the entries come first
        let state_start = state_array_offset as usize;
        let state_end = if entry_offset > state_start {
            entry_offset
        } else {
            data.len()
        };
        let state_len = (state_end.saturating_sub(state_start) / n_classes as usize)
            * n_classes as usize;
        let state_array = data
            .slice_len(state_start, state_len)
            .ok_or(ReadError::OutOfBounds)?
            .as_bytes();
        let n_entries = state_array.iter().max().map(|ix| *ix as usize + 1);
        let entry_table = data
            .slice_len(entry_offset, n_entries.unwrap_or_default() * 4)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Self {
            data,
            n_classes: n_classes as usize,
            state_array_offset,
            class_first_glyph,
            class_array,
            state_array,
            entry_table,
        })
    }
}

/// An extended state table with 32-bit header fields and a lookup as class
/// table, as used by `morx` and `kerx`.
#[derive(Clone, Copy)]
pub struct ExtendedStateTable<'a, T = NoPayload> {
    data: FontData<'a>,
    n_classes: usize,
    class_table: Lookup<'a>,
    state_array: &'a [BigEndian<u16>],
    entry_table: FontData<'a>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> ExtendedStateTable<'_, T> {
    pub const HEADER_LEN: usize = u32::RAW_BYTE_LEN * 4;
}

impl<'a, T> ExtendedStateTable<'a, T>
where
    T: FixedSize + bytemuck::AnyBitPattern,
{
    /// The data starting at the state table header.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn class_table(&self) -> &Lookup<'a> {
        &self.class_table
    }

    /// The number of entries referenced by the state array.
    pub fn n_entries(&self) -> usize {
        self.entry_table.len() / StateEntry::<T>::RAW_BYTE_LEN.max(1)
    }

    /// Returns the class of the glyph.
    pub fn class(&self, glyph_id: GlyphId) -> u16 {
        let glyph_id = glyph_id.to_u16();
        if glyph_id == 0xFFFF {
            return class::DELETED_GLYPH;
        }
        self.class_table
            .value(glyph_id)
            .unwrap_or(class::OUT_OF_BOUNDS)
    }

    /// Returns the entry for the given state and class.
    pub fn entry(&self, state: u16, class: u16) -> StateEntry<T> {
        let mut class = class as usize;
        if class >= self.n_classes {
            class = class::OUT_OF_BOUNDS as usize;
        }
        self.state_array
            .get(state as usize * self.n_classes + class)
            .and_then(|entry_ix| self.entry_at(entry_ix.get() as usize).ok())
            .unwrap_or_else(StateEntry::zeroed)
    }

    /// Returns the entry at the given index of the entry table.
    pub fn entry_at(&self, index: usize) -> Result<StateEntry<T>, ReadError> {
        let offset = index * StateEntry::<T>::RAW_BYTE_LEN;
        self.entry_table
            .split_off(offset)
            .ok_or(ReadError::OutOfBounds)
            .and_then(StateEntry::read)
    }

    /// Returns an iterator over the entries of the table.
    pub fn entries(&self) -> impl Iterator<Item = StateEntry<T>> + 'a {
        let this = *self;
        (0..self.n_entries()).filter_map(move |ix| this.entry_at(ix).ok())
    }
}

impl<'a, T> ExtendedStateTable<'a, T>
where
    T: FixedSize + bytemuck::AnyBitPattern,
{
    fn read_impl(data: FontData<'a>, num_glyphs: Option<u16>) -> Result<Self, ReadError> {
        let n_classes = data.read_at::<u32>(0)?;
        check_class_count(n_classes)?;
        let class_offset = data.read_at::<u32>(4)? as usize;
        let state_offset = data.read_at::<u32>(8)? as usize;
        let entry_offset = data.read_at::<u32>(12)? as usize;
        let class_data = data
            .slice(class_offset..state_offset.max(class_offset))
            .filter(|class_data| !class_data.is_empty())
            .or_else(|| data.split_off(class_offset))
            .ok_or(ReadError::OutOfBounds)?;
        let class_table = match num_glyphs {
            Some(num_glyphs) => Lookup::read_with_args(class_data, &num_glyphs)?,
            None => Lookup::read(class_data)?,
        };
        if state_offset > entry_offset {
            return Err(ReadError::MalformedData(
                "AAT state array follows the entry table",
            ));
        }
        let row_len = n_classes as usize * 2;
        let state_len = (entry_offset - state_offset) / row_len * row_len;
        let state_array: &[BigEndian<u16>] =
            data.read_array(state_offset..state_offset + state_len)?;
        let n_entries = state_array
            .iter()
            .map(|ix| ix.get() as usize + 1)
            .max()
            .unwrap_or_default();
        // every entry referenced by the states must be present
        let entry_table = data
            .slice_len(entry_offset, n_entries * StateEntry::<T>::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Self {
            data,
            n_classes: n_classes as usize,
            class_table,
            state_array,
            entry_table,
            _marker: std::marker::PhantomData,
        })
    }
}

impl<'a, T> FontRead<'a> for ExtendedStateTable<'a, T>
where
    T: FixedSize + bytemuck::AnyBitPattern,
{
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Self::read_impl(data, None)
    }
}

impl<T> ReadArgs for ExtendedStateTable<'_, T> {
    type Args = u16;
}

impl<'a, T> FontReadWithArgs<'a> for ExtendedStateTable<'a, T>
where
    T: FixedSize + bytemuck::AnyBitPattern,
{
    fn read_with_args(data: FontData<'a>, num_glyphs: &u16) -> Result<Self, ReadError> {
        Self::read_impl(data, Some(*num_glyphs))
    }
}

/// Reads an array of T from the given FontData, truncating the byte length
/// to a multiple of the size of T.
///
/// Several `morx` and `kerx` arrays have no associated lengths so they
/// are read to the end of the available data.
pub(crate) fn read_array_to_end<'a, T: bytemuck::AnyBitPattern + FixedSize>(
    data: &FontData<'a>,
    offset: usize,
) -> Result<&'a [T], ReadError> {
    let len = data
        .len()
        .checked_sub(offset)
        .ok_or(ReadError::OutOfBounds)?;
    let end = offset + len / T::RAW_BYTE_LEN * T::RAW_BYTE_LEN;
    data.read_array(offset..end)
}

/// Reads a big-endian scalar referenced from a state table entry.
pub(crate) fn read_value<T: Scalar>(data: FontData, offset: usize) -> Option<T> {
    data.read_at(offset).ok()
}

/// Entry flag shared by every state machine: stay on the current glyph.
pub const DONT_ADVANCE: u16 = 0x4000;

/// Bound on consecutive transitions without advancing.
const MAX_STALLED_TRANSITIONS: usize = 64;

/// Runs a state machine over `len` glyphs.
///
/// `class_of` maps a glyph index to its class and `entry_for` selects the
/// entry for a state and class. `transition` is called with each entry
/// and the glyph index it applies to, or `None` for the final end of text
/// transition. When `backwards` is set, glyphs are visited from last to
/// first.
pub(crate) fn drive<T>(
    len: usize,
    backwards: bool,
    class_of: impl Fn(usize) -> u16,
    entry_for: impl Fn(u16, u16) -> StateEntry<T>,
    mut transition: impl FnMut(&StateEntry<T>, Option<usize>),
) {
    let mut state = 0;
    let mut pos = 0;
    let mut stalled = 0;
    loop {
        let index = (pos < len).then(|| if backwards { len - 1 - pos } else { pos });
        let class = index.map(&class_of).unwrap_or(class::END_OF_TEXT);
        let entry = entry_for(state, class);
        transition(&entry, index);
        state = entry.new_state;
        if index.is_none() {
            break;
        }
        if entry.flags & DONT_ADVANCE == 0 || stalled >= MAX_STALLED_TRANSITIONS {
            pos += 1;
            stalled = 0;
        } else {
            stalled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use textcore_test_data::bebuffer::BeBuffer;

    use super::*;

    fn lookup(words: &[u16]) -> BeBuffer {
        BeBuffer::new().extend(words.iter().copied())
    }

    #[test]
    fn lookup_format_0() {
        let buf = lookup(&[0, 3, 1, 4, 1, 5]);
        let table = Lookup::read(buf.data().into()).unwrap();
        assert_eq!(table.value(2), Some(4));
        assert_eq!(table.value(5), None);
        assert_eq!(table.extent(), 6);
        assert_eq!(table.glyph_count(), 5);
        // bounded by the glyph count
        let table = Lookup::read_with_args(buf.data().into(), &3).unwrap();
        assert_eq!(table.glyph_count(), 3);
        assert_eq!(table.value(3), None);
        assert!(Lookup::read_with_args(buf.data().into(), &6).is_err());
    }

    #[test]
    fn lookup_format_2() {
        #[rustfmt::skip]
        let buf = lookup(&[
            2, 6, 3, 12, 1, 6,
            22, 20, 4, // 20..=22 is class 4
            24, 23, 5,
            28, 25, 6,
        ]);
        let table = Lookup::read(buf.data().into()).unwrap();
        for (range, value) in [(20..=22, 4), (23..=24, 5), (25..=28, 6)] {
            for gid in range {
                assert_eq!(table.value(gid), Some(value));
            }
        }
        for missing in [0, 19, 29, 0xFFFF] {
            assert_eq!(table.value(missing), None);
        }
        assert_eq!(table.extent(), 7);
        assert_eq!(table.glyph_count(), 9);
    }

    #[test]
    fn lookup_format_4() {
        #[rustfmt::skip]
        let buf = lookup(&[
            4, 6, 2, 12, 1, 0,
            12, 10, 24, // 10..=12 at offset 24
            31, 30, 30, // 30..=31 at offset 30
            7, 8, 9,
            100, 101,
        ]);
        let table = Lookup::read(buf.data().into()).unwrap();
        assert_eq!(table.value(11), Some(8));
        assert_eq!(table.value(31), Some(101));
        assert_eq!(table.value(13), None);
        assert_eq!(table.extent(), 102);
    }

    #[test]
    fn lookup_format_6() {
        #[rustfmt::skip]
        let buf = lookup(&[
            6, 4, 4, 16, 2, 0,
            50, 600,
            51, 601,
            201, 602,
            0xFFFF, 0xFFFF,
        ]);
        let table = Lookup::read(buf.data().into()).unwrap();
        assert_eq!(table.value(51), Some(601));
        assert_eq!(table.value(201), Some(602));
        assert_eq!(table.value(52), None);
        assert_eq!(table.glyph_count(), 3);
        assert_eq!(table.extent(), 603);
    }

    #[test]
    fn lookup_formats_8_and_10() {
        let buf = lookup(&[8, 201, 4, 3, 8, 2, 9]);
        let table = Lookup::read(buf.data().into()).unwrap();
        assert_eq!(table.value(201), Some(3));
        assert_eq!(table.value(204), Some(9));
        assert_eq!(table.value(205), None);
        assert_eq!(table.value(200), None);

        let buf = BeBuffer::new()
            .extend([10u16, 4, 201, 3])
            .extend([3u32, 0x10005, 60]);
        let table = Lookup::read(buf.data().into()).unwrap();
        assert_eq!(table.value(201), Some(3));
        // truncated to 16 bits
        assert_eq!(table.value(202), Some(5));
        assert_eq!(table.value(204), None);

        let buf = BeBuffer::new().extend([10u16, 3, 0, 0]);
        assert!(Lookup::read(buf.data().into()).is_err());
    }

    #[derive(Copy, Clone, Debug, bytemuck::AnyBitPattern)]
    #[repr(C, packed)]
    struct IndexPair {
        mark_index: BigEndian<u16>,
        current_index: BigEndian<u16>,
    }

    impl FixedSize for IndexPair {
        const RAW_BYTE_LEN: usize = 4;
    }

    fn extended_state_table_buf(n_classes: u32) -> BeBuffer {
        BeBuffer::new()
            .extend([n_classes, 16, 40, 64])
            // class table @16: 50 and 51 are class 4, 80 is class 5
            .extend([6u16, 4, 3, 12, 1, 0, 50, 4, 51, 4, 80, 5])
            // state array @40
            .extend([0u16, 1, 0, 0, 0, 1])
            .extend([0u16, 0, 0, 0, 2, 1])
            // entries @64
            .extend([0u16, 0, 0xFFFF, 0xFFFF])
            .extend([1u16, 0, 0xFFFF, 0xFFFF])
            .extend([0u16, 0x8000, 0xFFFF, 0])
    }

    #[test]
    fn extended_state_table() {
        let buf = extended_state_table_buf(6);
        let table = ExtendedStateTable::<IndexPair>::read(buf.data().into()).unwrap();
        assert_eq!(table.n_entries(), 3);
        assert_eq!(table.class(GlyphId::new(50)), 4);
        assert_eq!(table.class(GlyphId::new(80)), 5);
        assert_eq!(table.class(GlyphId::new(81)), class::OUT_OF_BOUNDS);
        assert_eq!(table.class(GlyphId::DELETED), class::DELETED_GLYPH);

        let entry = table.entry(0, 5);
        assert_eq!(entry.new_state, 1);
        let entry = table.entry(1, 4);
        assert_eq!(entry.new_state, 0);
        assert_eq!(entry.flags, 0x8000);
        assert_eq!(entry.payload.mark_index.get(), 0xFFFF);
        assert_eq!(entry.payload.current_index.get(), 0);
        // classes past the end map to out of bounds
        assert_eq!(table.entry(0, 9).new_state, 1);
        // states past the end yield the zero entry
        let entry = table.entry(7, 4);
        assert_eq!((entry.new_state, entry.flags), (0, 0));
        assert_eq!(entry.payload.current_index.get(), 0);
    }

    #[test]
    fn too_few_classes() {
        let buf = extended_state_table_buf(3);
        assert!(matches!(
            ExtendedStateTable::<IndexPair>::read(buf.data().into()),
            Err(ReadError::ClassCountTooSmall(3))
        ));
    }

    #[test]
    fn missing_entries() {
        let mut bytes = extended_state_table_buf(6).into_vec();
        bytes.truncate(bytes.len() - 2);
        assert!(ExtendedStateTable::<IndexPair>::read(FontData::new(&bytes)).is_err());
    }

    // Adapted from the example at
    // <https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6kern.html>
    #[test]
    fn legacy_state_table() {
        let buf = BeBuffer::new()
            .extend([7u16, 10, 18, 40, 64])
            // class table: first glyph 3, four glyphs
            .extend([3u16, 4])
            .extend([1u8, 2, 3, 4])
            // state array @18
            .extend([2u8, 0, 0, 2, 1, 0, 0])
            .extend([2u8, 0, 0, 2, 1, 0, 0])
            .extend([2u8, 3, 3, 2, 3, 4, 5])
            .push(0u8)
            // entries @40: the new state is a byte offset into the states
            .extend([18u16, 0x8112, 32, 0x8112, 18, 0, 32, 0x8114, 18, 0x8116, 18, 0]);
        let table = StateTable::read(buf.data().into()).unwrap();
        for ix in 0..4 {
            assert_eq!(table.class(GlyphId::new(ix + 3)), ix + 1);
        }
        assert_eq!(table.class(GlyphId::new(20)), class::OUT_OF_BOUNDS);
        let cases = [
            ((0, 4), (2, 0x8112)),
            ((2, 1), (2, 0x8114)),
            ((1, 3), (0, 0x0000)),
            ((2, 5), (0, 0x8116)),
        ];
        for ((state, class), (new_state, flags)) in cases {
            let entry = table.entry(state, class);
            assert_eq!((entry.new_state, entry.flags), (new_state, flags));
        }
        assert_eq!(table.entry(9, 0).flags, 0);
    }

    #[test]
    fn drive_visits_every_glyph() {
        let buf = extended_state_table_buf(6);
        let table = ExtendedStateTable::<IndexPair>::read(buf.data().into()).unwrap();
        let glyphs = [50u16, 80, 51];
        let mut visited = Vec::new();
        drive(
            glyphs.len(),
            true,
            |ix| table.class(GlyphId::new(glyphs[ix])),
            |state, class| table.entry(state, class),
            |entry, index| visited.push((index, entry.new_state)),
        );
        // 51 (class 4) keeps state 0, 80 (class 5) moves to state 1 and
        // 50 (class 4) goes back to state 0 through entry 2
        assert_eq!(
            visited,
            [(Some(2), 0), (Some(1), 1), (Some(0), 0), (None, 0)]
        );
    }
}
