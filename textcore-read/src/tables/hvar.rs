//! The [HVAR](https://docs.microsoft.com/en-us/typography/opentype/spec/hvar)
//! and [VVAR](https://docs.microsoft.com/en-us/typography/opentype/spec/vvar)
//! metrics variation tables.

use types::{F2Dot14, Fixed, GlyphId, Offset32, Tag};

use super::variations::{self, DeltaSetIndexMap, ItemVariationStore};
use crate::{FontData, FontRead, ReadError};

/// 'HVAR'
pub const HVAR_TAG: Tag = Tag::new(b"HVAR");
/// 'VVAR'
pub const VVAR_TAG: Tag = Tag::new(b"VVAR");

/// Horizontal or vertical metrics variations.
///
/// The layouts differ only in that `VVAR` may carry a fifth mapping for
/// vertical origins, which is not exposed here.
#[derive(Clone, Copy)]
pub struct Hvar<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Hvar<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.len() < 20 {
            return Err(ReadError::OutOfBounds);
        }
        let this = Hvar { data };
        this.item_variation_store()?;
        Ok(this)
    }
}

impl<'a> Hvar<'a> {
    pub fn item_variation_store(&self) -> Result<ItemVariationStore<'a>, ReadError> {
        let offset = self.data.read_at::<Offset32>(4)?;
        self.data.read_table_at(offset.to_usize())
    }

    fn mapping(&self, field: usize) -> Option<Result<DeltaSetIndexMap<'a>, ReadError>> {
        let offset = self.data.read_at::<Offset32>(field).ok()?;
        (!offset.is_null()).then(|| self.data.read_table_at(offset.to_usize()))
    }

    /// The advance mapping, or `None` when glyph ids map implicitly.
    pub fn advance_mapping(&self) -> Option<Result<DeltaSetIndexMap<'a>, ReadError>> {
        self.mapping(8)
    }

    /// The left (or top) side bearing mapping.
    pub fn lsb_mapping(&self) -> Option<Result<DeltaSetIndexMap<'a>, ReadError>> {
        self.mapping(12)
    }

    /// The right (or bottom) side bearing mapping.
    pub fn rsb_mapping(&self) -> Option<Result<DeltaSetIndexMap<'a>, ReadError>> {
        self.mapping(16)
    }

    /// Returns the advance delta for the specified glyph identifier and
    /// normalized variation coordinates.
    pub fn advance_delta(&self, glyph_id: GlyphId, coords: &[F2Dot14]) -> Result<Fixed, ReadError> {
        variations::advance_delta(
            self.advance_mapping(),
            self.item_variation_store(),
            glyph_id,
            coords,
        )
    }

    /// Returns the left side bearing delta for the specified glyph identifier and
    /// normalized variation coordinates.
    pub fn lsb_delta(&self, glyph_id: GlyphId, coords: &[F2Dot14]) -> Result<Fixed, ReadError> {
        variations::item_delta(
            self.lsb_mapping(),
            self.item_variation_store(),
            glyph_id,
            coords,
        )
    }

    /// Returns the right side bearing delta for the specified glyph identifier and
    /// normalized variation coordinates.
    pub fn rsb_delta(&self, glyph_id: GlyphId, coords: &[F2Dot14]) -> Result<Fixed, ReadError> {
        variations::item_delta(
            self.rsb_mapping(),
            self.item_variation_store(),
            glyph_id,
            coords,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    /// One axis with a single region peaking at 1.0 and three glyphs.
    fn hvar_buf(with_lsb_map: bool) -> BeBuffer {
        BeBuffer::new()
            .push(0x00010000u32)
            .push(20u32) // item variation store
            .push(0u32) // implicit advance mapping
            .push(if with_lsb_map { 60u32 } else { 0 })
            .push(0u32)
            // item variation store @20
            .push(1u16)
            .push(12u32)
            .push(1u16)
            .push(22u32)
            // region list @32
            .extend([1u16, 1])
            .extend([F2Dot14::ZERO, F2Dot14::ONE, F2Dot14::ONE])
            // item variation data @42
            .extend([3u16, 0, 1])
            .push(0u16)
            .extend([10i8, -20, 30])
            .extend([0u8; 7]) // pad to @60
            // lsb map @60: every glyph uses item 2
            .extend([0u8, 0x03])
            .push(1u16)
            .push(2u8)
    }

    #[test]
    fn advance_deltas() {
        let buf = hvar_buf(false);
        let hvar = Hvar::read(buf.data().into()).unwrap();
        let coords = [F2Dot14::ONE];
        assert_eq!(
            hvar.advance_delta(GlyphId::new(1), &coords).unwrap(),
            Fixed::from_i32(-20)
        );
        assert_eq!(
            hvar.advance_delta(GlyphId::new(2), &[F2Dot14::from_f32(0.5)]).unwrap(),
            Fixed::from_i32(15)
        );
        assert_eq!(hvar.advance_delta(GlyphId::new(0), &[]).unwrap(), Fixed::ZERO);
        // no side bearing mapping
        assert!(hvar.lsb_delta(GlyphId::new(0), &coords).is_err());
    }

    #[test]
    fn side_bearing_mapping() {
        let buf = hvar_buf(true);
        let hvar = Hvar::read(buf.data().into()).unwrap();
        assert_eq!(
            hvar.lsb_delta(GlyphId::new(7), &[F2Dot14::ONE]).unwrap(),
            Fixed::from_i32(30)
        );
    }
}
