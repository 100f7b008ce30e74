//! The [MVAR (Metrics Variation)](https://docs.microsoft.com/en-us/typography/opentype/spec/mvar) table

use types::{BigEndian, F2Dot14, Fixed, FixedSize, Offset16, Tag};

use super::variations::{DeltaSetIndex, ItemVariationStore};
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'MVAR'
pub const TAG: Tag = Tag::new(b"MVAR");

/// Four-byte tags used to represent particular metric or other values.
pub mod tags {
    use types::Tag;

    /// Horizontal ascender.
    pub const HASC: Tag = Tag::new(b"hasc");
    /// Horizontal descender.
    pub const HDSC: Tag = Tag::new(b"hdsc");
    /// Horizontal line gap.
    pub const HLGP: Tag = Tag::new(b"hlgp");

    /// Horizontal clipping ascent.
    pub const HCLA: Tag = Tag::new(b"hcla");
    /// Horizontal clipping descent.
    pub const HCLD: Tag = Tag::new(b"hcld");

    /// Vertical ascender.
    pub const VASC: Tag = Tag::new(b"vasc");
    /// Vertical descender.
    pub const VDSC: Tag = Tag::new(b"vdsc");
    /// Vertical line gap.
    pub const VLGP: Tag = Tag::new(b"vlgp");

    /// X-height.
    pub const XHGT: Tag = Tag::new(b"xhgt");
    /// Cap height.
    pub const CPHT: Tag = Tag::new(b"cpht");

    /// Strikeout size.
    pub const STRS: Tag = Tag::new(b"strs");
    /// Strikeout offset.
    pub const STRO: Tag = Tag::new(b"stro");

    /// Underline size.
    pub const UNDS: Tag = Tag::new(b"unds");
    /// Underline offset.
    pub const UNDO: Tag = Tag::new(b"undo");
}

/// A metric tag and the delta set holding its variation.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct ValueRecord {
    pub value_tag: BigEndian<Tag>,
    pub delta_set_outer_index: BigEndian<u16>,
    pub delta_set_inner_index: BigEndian<u16>,
}

impl FixedSize for ValueRecord {
    const RAW_BYTE_LEN: usize = 8;
}

impl ValueRecord {
    pub fn value_tag(&self) -> Tag {
        self.value_tag.get()
    }

    pub fn delta_set_index(&self) -> DeltaSetIndex {
        DeltaSetIndex {
            outer: self.delta_set_outer_index.get(),
            inner: self.delta_set_inner_index.get(),
        }
    }
}

/// The metrics variations table.
#[derive(Clone, Copy)]
pub struct Mvar<'a> {
    data: FontData<'a>,
    record_size: usize,
    record_count: u16,
}

impl TopLevelTable for Mvar<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Mvar<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let record_size = data.read_at::<u16>(6)? as usize;
        let record_count = data.read_at::<u16>(8)?;
        data.read_at::<Offset16>(10)?;
        if record_size < ValueRecord::RAW_BYTE_LEN {
            return Err(ReadError::VariationParse("MVAR record size too small"));
        }
        if data.len() < 12 + record_size * record_count as usize {
            return Err(ReadError::OutOfBounds);
        }
        Ok(Mvar {
            data,
            record_size,
            record_count,
        })
    }
}

impl<'a> Mvar<'a> {
    pub fn record_count(&self) -> u16 {
        self.record_count
    }

    /// Returns the value record at `index`.
    pub fn value_record(&self, index: u16) -> Option<&'a ValueRecord> {
        if index >= self.record_count {
            return None;
        }
        self.data
            .read_ref_at(12 + index as usize * self.record_size)
            .ok()
    }

    /// Returns the item variation store, or `None` if the offset is null.
    pub fn item_variation_store(&self) -> Option<Result<ItemVariationStore<'a>, ReadError>> {
        let offset = self.data.read_at::<Offset16>(10).ok()?;
        (!offset.is_null()).then(|| self.data.read_table_at(offset.to_usize()))
    }

    /// Returns the metric delta for the specified tag and normalized
    /// variation coordinates. Possible tags are found in the [tags]
    /// module.
    ///
    /// Metrics without a record, and tables without a variation store,
    /// have a delta of zero.
    pub fn metric_delta(&self, tag: Tag, coords: &[F2Dot14]) -> Result<Fixed, ReadError> {
        use std::cmp::Ordering;
        let mut lo = 0;
        let mut hi = self.record_count;
        while lo < hi {
            let i = (lo + hi) / 2;
            let record = self.value_record(i).ok_or(ReadError::OutOfBounds)?;
            match tag.cmp(&record.value_tag()) {
                Ordering::Less => hi = i,
                Ordering::Greater => lo = i + 1,
                Ordering::Equal => {
                    let Some(ivs) = self.item_variation_store() else {
                        return Ok(Fixed::ZERO);
                    };
                    let delta = ivs?.compute_delta(record.delta_set_index(), coords)?;
                    return Ok(Fixed::from_i32(delta));
                }
            }
        }
        Ok(Fixed::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    fn mvar_buf(record_size: u16) -> BeBuffer {
        let pad = record_size as usize - 8;
        BeBuffer::new()
            .push(0x00010000u32)
            .push(0u16)
            .push(record_size)
            .push(2u16)
            .push(12 + 2 * record_size)
            .push(tags::HASC)
            .extend([0u16, 0])
            .extend(std::iter::repeat(0u8).take(pad))
            .push(tags::XHGT)
            .extend([0u16, 1])
            .extend(std::iter::repeat(0u8).take(pad))
            // item variation store
            .push(1u16)
            .push(12u32)
            .push(1u16)
            .push(22u32)
            .extend([1u16, 1])
            .extend([F2Dot14::ZERO, F2Dot14::ONE, F2Dot14::ONE])
            .extend([2u16, 0, 1])
            .push(0u16)
            .extend([50i8, -8])
    }

    #[test]
    fn metric_deltas() {
        let buf = mvar_buf(8);
        let mvar = Mvar::read(buf.data().into()).unwrap();
        let coords = [F2Dot14::ONE];
        assert_eq!(
            mvar.metric_delta(tags::HASC, &coords).unwrap(),
            Fixed::from_i32(50)
        );
        assert_eq!(
            mvar.metric_delta(tags::XHGT, &coords).unwrap(),
            Fixed::from_i32(-8)
        );
        assert_eq!(mvar.metric_delta(tags::UNDO, &coords).unwrap(), Fixed::ZERO);
    }

    #[test]
    fn oversized_records() {
        let buf = mvar_buf(10);
        let mvar = Mvar::read(buf.data().into()).unwrap();
        assert_eq!(
            mvar.metric_delta(tags::XHGT, &[F2Dot14::ONE]).unwrap(),
            Fixed::from_i32(-8)
        );
    }

    #[test]
    fn undersized_records() {
        let mut bytes = mvar_buf(8).into_vec();
        bytes[7] = 6;
        assert!(matches!(
            Mvar::read(FontData::new(&bytes)),
            Err(ReadError::VariationParse(_))
        ));
    }
}
