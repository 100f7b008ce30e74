//! The [anchor point](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6ankr.html) table.

use types::{BigEndian, FixedSize, GlyphId, Tag};

use super::aat::Lookup;
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'ankr'
pub const TAG: Tag = Tag::new(b"ankr");

/// The anchor point table: per glyph lists of anchor points referenced by
/// `kerx` format 4 attachments.
#[derive(Clone, Copy)]
pub struct Ankr<'a> {
    lookup: Lookup<'a>,
    glyph_data: FontData<'a>,
}

impl TopLevelTable for Ankr<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Ankr<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version = data.read_at::<u16>(0)?;
        if version != 0 {
            return Err(ReadError::InvalidFormat(version.into()));
        }
        let lookup_offset = data.read_at::<u32>(4)? as usize;
        let glyph_data_offset = data.read_at::<u32>(8)? as usize;
        if lookup_offset > glyph_data_offset {
            return Err(ReadError::MalformedData(
                "ankr glyph data precedes the lookup table",
            ));
        }
        let lookup = data
            .slice(lookup_offset..glyph_data_offset)
            .ok_or(ReadError::OutOfBounds)
            .and_then(Lookup::read)?;
        let glyph_data = data
            .split_off(glyph_data_offset)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Ankr { lookup, glyph_data })
    }
}

impl<'a> Ankr<'a> {
    /// Returns the anchor points of the glyph.
    pub fn anchor_points(&self, glyph_id: GlyphId) -> Result<&'a [AnchorPoint], ReadError> {
        let offset = self
            .lookup
            .value(glyph_id.to_u16())
            .ok_or(ReadError::OutOfBounds)? as usize;
        let count = self.glyph_data.read_at::<u32>(offset)?;
        self.glyph_data
            .read_array_len(offset + u32::RAW_BYTE_LEN, count as usize)
    }

    /// Returns the anchor point at `index` for the glyph, if it exists.
    pub fn anchor(&self, glyph_id: GlyphId, index: u16) -> Option<AnchorPoint> {
        self.anchor_points(glyph_id)
            .ok()?
            .get(index as usize)
            .copied()
    }
}

/// An anchor point, in font units.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct AnchorPoint {
    pub x: BigEndian<i16>,
    pub y: BigEndian<i16>,
}

impl FixedSize for AnchorPoint {
    const RAW_BYTE_LEN: usize = 4;
}

impl AnchorPoint {
    pub fn x(&self) -> i16 {
        self.x.get()
    }

    pub fn y(&self) -> i16 {
        self.y.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    #[test]
    fn anchor_points() {
        // lookup table (glyph_id -> offset)
        #[rustfmt::skip]
        let lookup = [
            0_u16, // format
            0, 8, 24, 32 // offsets to anchor points
        ];
        let lookup_size = lookup.len() as u32 * 2;
        let mut buf = BeBuffer::new()
            .extend([0u32, 12, 12 + lookup_size])
            .extend(lookup);
        #[rustfmt::skip]
        let expected: [&[(i16, i16)]; 4] = [
            &[(-20, 20)],
            &[(42, -10), (-200, 300), (i16::MIN, i16::MAX)],
            &[(0, 4)],
            &[(0, 0), (64, -64)],
        ];
        for entry in &expected {
            buf = buf
                .push(entry.len() as u32)
                .extend(entry.iter().flat_map(|point| [point.0, point.1]));
        }
        let ankr = Ankr::read(buf.data().into()).unwrap();
        let points = (0..4)
            .map(|gid| {
                ankr.anchor_points(GlyphId::new(gid))
                    .unwrap()
                    .iter()
                    .map(|point| (point.x(), point.y()))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        assert!(expected.iter().eq(points.iter()));
        let anchor = ankr.anchor(GlyphId::new(1), 1).unwrap();
        assert_eq!((anchor.x(), anchor.y()), (-200, 300));
        assert!(ankr.anchor(GlyphId::new(1), 3).is_none());
        assert!(ankr.anchor(GlyphId::new(4), 0).is_none());
    }

    #[test]
    fn bad_offsets() {
        let buf = BeBuffer::new().extend([0u32, 20, 12]).extend([0u16, 0]);
        assert!(Ankr::read(buf.data().into()).is_err());
    }
}
