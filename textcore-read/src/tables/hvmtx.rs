//! The [hmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx)
//! and [vmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/vmtx)
//! tables, which share a layout.

use types::{BigEndian, FixedSize, GlyphId, Tag};

use crate::{FontData, FontReadWithArgs, ReadArgs, ReadError};

/// 'hmtx'
pub const HMTX_TAG: Tag = Tag::new(b"hmtx");
/// 'vmtx'
pub const VMTX_TAG: Tag = Tag::new(b"vmtx");

/// An advance and leading side bearing pair.
#[derive(Clone, Copy, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct LongMetric {
    /// Advance width or height, in font units.
    pub advance: BigEndian<u16>,
    /// Left or top side bearing, in font units.
    pub side_bearing: BigEndian<i16>,
}

impl FixedSize for LongMetric {
    const RAW_BYTE_LEN: usize = 4;
}

/// Horizontal or vertical metrics.
///
/// Glyphs after the last long metric share its advance and store only a
/// side bearing.
#[derive(Clone, Copy)]
pub struct HVmtx<'a> {
    long_metrics: &'a [LongMetric],
    bearings: &'a [BigEndian<i16>],
    num_glyphs: u16,
}

impl ReadArgs for HVmtx<'_> {
    /// `(number_of_long_metrics, num_glyphs)`
    type Args = (u16, u16);
}

impl<'a> FontReadWithArgs<'a> for HVmtx<'a> {
    fn read_with_args(data: FontData<'a>, args: &(u16, u16)) -> Result<Self, ReadError> {
        let (number_of_long_metrics, num_glyphs) = *args;
        if number_of_long_metrics == 0 {
            return Err(ReadError::MalformedData("no long metrics"));
        }
        let mut cursor = data.cursor();
        let long_metrics = cursor.read_array::<LongMetric>(number_of_long_metrics as usize)?;
        // trailing bearings are optional in practice; take what is present
        let n_bearings = num_glyphs.saturating_sub(number_of_long_metrics) as usize;
        let available = cursor.remaining_bytes() / 2;
        let bearings = cursor.read_array(n_bearings.min(available))?;
        Ok(HVmtx {
            long_metrics,
            bearings,
            num_glyphs,
        })
    }
}

impl<'a> HVmtx<'a> {
    pub fn long_metrics(&self) -> &'a [LongMetric] {
        self.long_metrics
    }

    pub fn bearings(&self) -> &'a [BigEndian<i16>] {
        self.bearings
    }

    /// Returns the advance for the given glyph, or `None` if the glyph id is
    /// beyond the number of glyphs in the font.
    pub fn advance(&self, glyph_id: GlyphId) -> Option<u16> {
        let ix = glyph_id.to_u16() as usize;
        if let Some(metric) = self.long_metrics.get(ix) {
            return Some(metric.advance.get());
        }
        if ix < self.num_glyphs as usize {
            return self.long_metrics.last().map(|metric| metric.advance.get());
        }
        None
    }

    /// Returns the side bearing for the given glyph.
    pub fn side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        let ix = glyph_id.to_u16() as usize;
        if let Some(metric) = self.long_metrics.get(ix) {
            return Some(metric.side_bearing.get());
        }
        self.bearings
            .get(ix - self.long_metrics.len())
            .map(|sb| sb.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    #[test]
    fn padded_advances() {
        let buf = BeBuffer::new()
            .extend([500u16, 10, 600, 20]) // long metrics
            .extend([30i16, 40]); // bearings
        let hmtx = HVmtx::read_with_args(buf.data().into(), &(2, 4)).unwrap();
        assert_eq!(hmtx.advance(GlyphId::new(0)), Some(500));
        assert_eq!(hmtx.advance(GlyphId::new(1)), Some(600));
        // replicated from the last long metric
        assert_eq!(hmtx.advance(GlyphId::new(3)), Some(600));
        assert_eq!(hmtx.advance(GlyphId::new(4)), None);
        assert_eq!(hmtx.side_bearing(GlyphId::new(1)), Some(20));
        assert_eq!(hmtx.side_bearing(GlyphId::new(3)), Some(40));
        assert_eq!(hmtx.side_bearing(GlyphId::new(4)), None);
    }

    #[test]
    fn zero_long_metrics() {
        assert!(HVmtx::read_with_args(FontData::new(&[0; 8]), &(0, 2)).is_err());
    }
}
