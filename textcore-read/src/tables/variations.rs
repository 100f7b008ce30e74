//! OpenType font variations common tables.

use types::{BigEndian, F2Dot14, FixedSize, Fixed, GlyphId, Offset32, Uint24};

use crate::{FontData, FontRead, ReadError};

/// Outer and inner indices for reading from an [ItemVariationStore].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeltaSetIndex {
    /// Outer delta set index.
    pub outer: u16,
    /// Inner delta set index.
    pub inner: u16,
}

/// The [DeltaSetIndexMap](https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#associating-target-items-to-variation-data)
/// table.
#[derive(Clone, Copy)]
pub struct DeltaSetIndexMap<'a> {
    entry_format: u8,
    map_count: u32,
    map_data: FontData<'a>,
}

impl<'a> FontRead<'a> for DeltaSetIndexMap<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format = data.read_at::<u8>(0)?;
        let entry_format = data.read_at::<u8>(1)?;
        let (map_count, start) = match format {
            0 => (data.read_at::<u16>(2)? as u32, 4),
            1 => (data.read_at::<u32>(2)?, 6),
            other => return Err(ReadError::InvalidFormat(other.into())),
        };
        let map_len = entry_size(entry_format) as usize * map_count as usize;
        let map_data = data
            .slice_len(start, map_len)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(DeltaSetIndexMap {
            entry_format,
            map_count,
            map_data,
        })
    }
}

fn entry_size(entry_format: u8) -> u8 {
    ((entry_format & 0x30) >> 4) + 1
}

impl DeltaSetIndexMap<'_> {
    /// The number of entries in the map.
    pub fn map_count(&self) -> u32 {
        self.map_count
    }

    /// Returns the delta set index for the specified value.
    ///
    /// Indices past the end of the map use the last entry.
    pub fn get(&self, index: u32) -> Result<DeltaSetIndex, ReadError> {
        let entry_size = entry_size(self.entry_format);
        let index = index.min(self.map_count.saturating_sub(1));
        let offset = index as usize * entry_size as usize;
        let entry = match entry_size {
            1 => self.map_data.read_at::<u8>(offset)? as u32,
            2 => self.map_data.read_at::<u16>(offset)? as u32,
            3 => self.map_data.read_at::<Uint24>(offset)?.to_u32(),
            _ => self.map_data.read_at::<u32>(offset)?,
        };
        let bit_count = (self.entry_format & 0x0F) + 1;
        Ok(DeltaSetIndex {
            outer: (entry >> bit_count) as u16,
            inner: (entry & ((1 << bit_count) - 1)) as u16,
        })
    }
}

/// The [ItemVariationStore](https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#item-variation-store)
/// table.
#[derive(Clone, Copy)]
pub struct ItemVariationStore<'a> {
    data: FontData<'a>,
    data_offsets: &'a [BigEndian<Offset32>],
}

impl<'a> FontRead<'a> for ItemVariationStore<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format = data.read_at::<u16>(0)?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        let count = data.read_at::<u16>(6)?;
        let data_offsets = data.read_array_len(8, count as usize)?;
        Ok(ItemVariationStore { data, data_offsets })
    }
}

impl<'a> ItemVariationStore<'a> {
    pub fn variation_region_list(&self) -> Result<VariationRegionList<'a>, ReadError> {
        let offset = self.data.read_at::<Offset32>(2)?;
        self.data.read_table_at(offset.to_usize())
    }

    /// The number of [`ItemVariationData`] subtables.
    pub fn item_variation_data_count(&self) -> u16 {
        self.data_offsets.len() as u16
    }

    pub fn item_variation_data(&self, outer: u16) -> Option<Result<ItemVariationData<'a>, ReadError>> {
        let offset = self.data_offsets.get(outer as usize)?.get();
        Some(self.data.read_table_at(offset.to_usize()))
    }

    /// Computes the delta value for the specified index and set of normalized
    /// variation coordinates.
    pub fn compute_delta(
        &self,
        index: DeltaSetIndex,
        coords: &[F2Dot14],
    ) -> Result<i32, ReadError> {
        let data = match self.item_variation_data(index.outer) {
            Some(data) => data?,
            None => return Ok(0),
        };
        let regions = self.variation_region_list()?;
        let region_indices = data.region_indexes();
        // deltas are accumulated with 64-bit precision
        let mut accum = 0i64;
        for (i, region_delta) in data.delta_set(index.inner).enumerate() {
            let region_index = region_indices
                .get(i)
                .ok_or(ReadError::MalformedData(
                    "invalid delta sets in ItemVariationStore",
                ))?
                .get();
            let region = regions.region(region_index)?;
            let scalar = region.compute_scalar(coords);
            accum += region_delta as i64 * scalar.to_bits() as i64;
        }
        Ok(((accum + 0x8000) >> 16) as i32)
    }
}

/// Start, peak and end coordinates for one axis of a region.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct RegionAxisCoordinates {
    pub start_coord: BigEndian<F2Dot14>,
    pub peak_coord: BigEndian<F2Dot14>,
    pub end_coord: BigEndian<F2Dot14>,
}

impl FixedSize for RegionAxisCoordinates {
    const RAW_BYTE_LEN: usize = 6;
}

/// The list of regions referenced by an [`ItemVariationStore`].
#[derive(Clone, Copy)]
pub struct VariationRegionList<'a> {
    axis_count: u16,
    region_count: u16,
    coords: &'a [RegionAxisCoordinates],
}

impl<'a> FontRead<'a> for VariationRegionList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let axis_count = data.read_at::<u16>(0)?;
        let region_count = data.read_at::<u16>(2)?;
        let coords =
            data.read_array_len(4, axis_count as usize * region_count as usize)?;
        Ok(VariationRegionList {
            axis_count,
            region_count,
            coords,
        })
    }
}

impl<'a> VariationRegionList<'a> {
    pub fn axis_count(&self) -> u16 {
        self.axis_count
    }

    pub fn region_count(&self) -> u16 {
        self.region_count
    }

    pub fn region(&self, index: u16) -> Result<VariationRegion<'a>, ReadError> {
        if index >= self.region_count {
            return Err(ReadError::OutOfBounds);
        }
        let start = index as usize * self.axis_count as usize;
        self.coords
            .get(start..start + self.axis_count as usize)
            .map(|region_axes| VariationRegion { region_axes })
            .ok_or(ReadError::OutOfBounds)
    }
}

/// A region in the design space, one [`RegionAxisCoordinates`] per axis.
#[derive(Clone, Copy)]
pub struct VariationRegion<'a> {
    region_axes: &'a [RegionAxisCoordinates],
}

impl<'a> VariationRegion<'a> {
    pub fn region_axes(&self) -> &'a [RegionAxisCoordinates] {
        self.region_axes
    }

    /// Computes a scalar value for this region and the specified
    /// normalized variation coordinates.
    pub fn compute_scalar(&self, coords: &[F2Dot14]) -> Fixed {
        const ZERO: Fixed = Fixed::ZERO;
        let mut scalar = Fixed::ONE;
        for (i, axis_coords) in self.region_axes.iter().enumerate() {
            let coord = coords.get(i).map(|coord| coord.to_fixed()).unwrap_or(ZERO);
            let start = axis_coords.start_coord.get().to_fixed();
            let end = axis_coords.end_coord.get().to_fixed();
            let peak = axis_coords.peak_coord.get().to_fixed();
            if start > peak || peak > end || peak == ZERO || start < ZERO && end > ZERO {
                continue;
            } else if coord < start || coord > end {
                return ZERO;
            } else if coord == peak {
                continue;
            } else if coord < peak {
                scalar = scalar.mul_div(coord - start, peak - start);
            } else {
                scalar = scalar.mul_div(end - coord, end - peak);
            }
        }
        scalar
    }
}

/// A subtable of delta sets and the regions they apply to.
#[derive(Clone, Copy)]
pub struct ItemVariationData<'a> {
    item_count: u16,
    word_delta_count: u16,
    region_indexes: &'a [BigEndian<u16>],
    delta_sets: FontData<'a>,
}

impl<'a> FontRead<'a> for ItemVariationData<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let item_count = cursor.read::<u16>()?;
        let word_delta_count = cursor.read::<u16>()?;
        let region_index_count = cursor.read::<u16>()?;
        let region_indexes = cursor.read_array(region_index_count as usize)?;
        let delta_sets = cursor.remaining().unwrap_or_default();
        let this = ItemVariationData {
            item_count,
            word_delta_count,
            region_indexes,
            delta_sets,
        };
        if delta_sets.len() < this.row_size() * item_count as usize {
            return Err(ReadError::OutOfBounds);
        }
        Ok(this)
    }
}

impl<'a> ItemVariationData<'a> {
    pub fn item_count(&self) -> u16 {
        self.item_count
    }

    pub fn region_indexes(&self) -> &'a [BigEndian<u16>] {
        self.region_indexes
    }

    fn long_words(&self) -> bool {
        self.word_delta_count & 0x8000 != 0
    }

    fn row_size(&self) -> usize {
        let (word_size, small_size) = if self.long_words() { (4, 2) } else { (2, 1) };
        let word_count = (self.word_delta_count & 0x7FFF) as usize;
        let region_count = self.region_indexes.len();
        word_count * word_size + region_count.saturating_sub(word_count) * small_size
    }

    /// Returns an iterator over the per-region delta values for the specified
    /// inner index.
    pub fn delta_set(&self, inner_index: u16) -> impl Iterator<Item = i32> + 'a + Clone {
        let offset = self.row_size() * inner_index as usize;
        let len = if inner_index < self.item_count {
            self.region_indexes.len() as u16
        } else {
            0
        };
        ItemDeltas {
            data: self.delta_sets.split_off(offset).unwrap_or_default(),
            pos: 0,
            word_delta_count: self.word_delta_count & 0x7FFF,
            long_words: self.long_words(),
            len,
            ix: 0,
        }
    }
}

#[derive(Clone)]
struct ItemDeltas<'a> {
    data: FontData<'a>,
    pos: usize,
    word_delta_count: u16,
    long_words: bool,
    len: u16,
    ix: u16,
}

impl Iterator for ItemDeltas<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ix >= self.len {
            return None;
        }
        let ix = self.ix;
        self.ix += 1;
        let (value, size) = match (ix >= self.word_delta_count, self.long_words) {
            (true, true) | (false, false) => (self.data.read_at::<i16>(self.pos).ok()? as i32, 2),
            (true, false) => (self.data.read_at::<i8>(self.pos).ok()? as i32, 1),
            (false, true) => (self.data.read_at::<i32>(self.pos).ok()?, 4),
        };
        self.pos += size;
        Some(value)
    }
}

/// Computes an advance or side bearing delta for a glyph.
///
/// Without a mapping, the glyph id is used as the inner index of the first
/// subtable.
pub(crate) fn advance_delta(
    dsim: Option<Result<DeltaSetIndexMap, ReadError>>,
    ivs: Result<ItemVariationStore, ReadError>,
    glyph_id: GlyphId,
    coords: &[F2Dot14],
) -> Result<Fixed, ReadError> {
    let gid = glyph_id.to_u16();
    let ix = match dsim {
        Some(Ok(dsim)) => dsim.get(gid as u32)?,
        _ => DeltaSetIndex {
            outer: 0,
            inner: gid,
        },
    };
    Ok(Fixed::from_i32(ivs?.compute_delta(ix, coords)?))
}

/// Computes a side bearing delta, which requires an explicit mapping.
pub(crate) fn item_delta(
    dsim: Option<Result<DeltaSetIndexMap, ReadError>>,
    ivs: Result<ItemVariationStore, ReadError>,
    glyph_id: GlyphId,
    coords: &[F2Dot14],
) -> Result<Fixed, ReadError> {
    let gid = glyph_id.to_u16();
    let ix = match dsim {
        Some(dsim) => dsim?.get(gid as u32)?,
        None => return Err(ReadError::MalformedData("missing delta set index map")),
    };
    Ok(Fixed::from_i32(ivs?.compute_delta(ix, coords)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    /// One axis, two regions: [0, 1, 1] and [-1, -1, 0].
    fn ivs_buf() -> BeBuffer {
        BeBuffer::new()
            // header
            .push(1u16)
            .push(12u32) // region list offset
            .push(1u16)
            .push(28u32) // data offset
            // region list @12
            .extend([1u16, 2])
            .extend([F2Dot14::ZERO, F2Dot14::ONE, F2Dot14::ONE])
            .extend([-F2Dot14::ONE, -F2Dot14::ONE, F2Dot14::ZERO])
            // item variation data @28
            .extend([2u16, 1, 2]) // two items, one word delta, two regions
            .extend([0u16, 1])
            .extend([100i16])
            .push(-20i8)
            .extend([-300i16])
            .push(5i8)
    }

    #[test]
    fn item_deltas() {
        let buf = ivs_buf();
        let ivs = ItemVariationStore::read(buf.data().into()).unwrap();
        let ix = |inner| DeltaSetIndex { outer: 0, inner };
        assert_eq!(ivs.compute_delta(ix(0), &[F2Dot14::ONE]).unwrap(), 100);
        assert_eq!(ivs.compute_delta(ix(0), &[-F2Dot14::ONE]).unwrap(), -20);
        assert_eq!(
            ivs.compute_delta(ix(1), &[F2Dot14::from_f32(0.5)]).unwrap(),
            -150
        );
        assert_eq!(ivs.compute_delta(ix(1), &[]).unwrap(), 0);
        // missing outer index contributes nothing
        let missing = DeltaSetIndex { outer: 3, inner: 0 };
        assert_eq!(ivs.compute_delta(missing, &[F2Dot14::ONE]).unwrap(), 0);
    }

    #[test]
    fn scalar_outside_region() {
        let buf = ivs_buf();
        let ivs = ItemVariationStore::read(buf.data().into()).unwrap();
        let regions = ivs.variation_region_list().unwrap();
        let region = regions.region(0).unwrap();
        assert_eq!(region.compute_scalar(&[-F2Dot14::ONE]), Fixed::ZERO);
        assert_eq!(
            region.compute_scalar(&[F2Dot14::from_f32(0.25)]),
            Fixed::from_f64(0.25)
        );
        assert!(regions.region(2).is_err());
    }

    #[test]
    fn delta_set_index_map() {
        // entry format 0x11: 2 byte entries, 2 inner bits
        let buf = BeBuffer::new()
            .extend([0u8, 0x11])
            .push(3u16)
            .extend([0x0001u16, 0x0006, 0x000B]);
        let map = DeltaSetIndexMap::read(buf.data().into()).unwrap();
        assert_eq!(map.get(0).unwrap(), DeltaSetIndex { outer: 0, inner: 1 });
        assert_eq!(map.get(1).unwrap(), DeltaSetIndex { outer: 1, inner: 2 });
        // clamped to the last entry
        assert_eq!(map.get(50).unwrap(), DeltaSetIndex { outer: 2, inner: 3 });
    }

    #[test]
    fn truncated_map() {
        let buf = BeBuffer::new().extend([1u8, 0x00]).push(4u32).extend([1u8, 2]);
        assert!(DeltaSetIndexMap::read(buf.data().into()).is_err());
    }
}
