//! The [sbix (Standard Bitmap Graphics)](https://docs.microsoft.com/en-us/typography/opentype/spec/sbix) table

use types::{BigEndian, GlyphId, Tag};

use crate::{FontData, FontRead, FontReadWithArgs, ReadArgs, ReadError, TopLevelTable};

/// 'sbix'
pub const TAG: Tag = Tag::new(b"sbix");

/// Graphic type of glyphs that reuse the image of another glyph.
pub const DUPE: Tag = Tag::new(b"dupe");

/// Bitmap strikes, typically PNG images, indexed by glyph.
#[derive(Clone, Copy)]
pub struct Sbix<'a> {
    data: FontData<'a>,
    version: u16,
    flags: u16,
    strike_offsets: &'a [BigEndian<u32>],
    num_glyphs: u16,
}

impl TopLevelTable for Sbix<'_> {
    const TAG: Tag = TAG;
}

impl ReadArgs for Sbix<'_> {
    type Args = u16;
}

impl<'a> FontReadWithArgs<'a> for Sbix<'a> {
    fn read_with_args(data: FontData<'a>, args: &u16) -> Result<Self, ReadError> {
        let num_strikes = data.read_at::<u32>(4)?;
        Ok(Self {
            data,
            version: data.read_at(0)?,
            flags: data.read_at(2)?,
            strike_offsets: data.read_array_len(8, num_strikes as usize)?,
            num_glyphs: *args,
        })
    }
}

impl<'a> Sbix<'a> {
    /// Reads the table for a font with `num_glyphs` glyphs.
    pub fn read(data: FontData<'a>, num_glyphs: u16) -> Result<Self, ReadError> {
        Self::read_with_args(data, &num_glyphs)
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// True if the outlines should be drawn on top of the bitmaps.
    pub fn draws_outlines(&self) -> bool {
        self.flags & 0x0002 != 0
    }

    pub fn num_strikes(&self) -> usize {
        self.strike_offsets.len()
    }

    /// Returns the strike at the given index.
    pub fn strike(&self, index: usize) -> Result<Strike<'a>, ReadError> {
        let offset = self
            .strike_offsets
            .get(index)
            .ok_or(ReadError::OutOfBounds)?
            .get() as usize;
        let data = self.data.split_off(offset).ok_or(ReadError::OutOfBounds)?;
        Strike::read(data, self.num_glyphs)
    }

    /// Returns an iterator over the strikes.
    pub fn strikes(&self) -> impl Iterator<Item = Result<Strike<'a>, ReadError>> + 'a {
        let this = *self;
        (0..self.num_strikes()).map(move |ix| this.strike(ix))
    }
}

/// Images of the glyphs at one size.
#[derive(Clone, Copy)]
pub struct Strike<'a> {
    data: FontData<'a>,
    ppem: u16,
    ppi: u16,
    glyph_data_offsets: &'a [BigEndian<u32>],
}

impl<'a> Strike<'a> {
    fn read(data: FontData<'a>, num_glyphs: u16) -> Result<Self, ReadError> {
        Ok(Self {
            data,
            ppem: data.read_at(0)?,
            ppi: data.read_at(2)?,
            glyph_data_offsets: data.read_array_len(4, num_glyphs as usize + 1)?,
        })
    }

    pub fn ppem(&self) -> u16 {
        self.ppem
    }

    /// The design resolution, in pixels per inch.
    pub fn ppi(&self) -> u16 {
        self.ppi
    }

    /// Offsets from the start of the strike, one more than the glyphs.
    pub fn glyph_data_offsets(&self) -> &'a [BigEndian<u32>] {
        self.glyph_data_offsets
    }

    /// Returns the image of the glyph, or `None` if it has none.
    pub fn glyph_data(&self, glyph_id: GlyphId) -> Result<Option<GlyphData<'a>>, ReadError> {
        let offsets = self.glyph_data_offsets;
        let start_ix = glyph_id.to_u16() as usize;
        let start = offsets.get(start_ix).ok_or(ReadError::OutOfBounds)?.get() as usize;
        let end = offsets
            .get(start_ix + 1)
            .ok_or(ReadError::OutOfBounds)?
            .get() as usize;
        if start == end {
            // Empty glyphs are okay
            return Ok(None);
        }
        let data = self
            .data
            .slice(start..end)
            .ok_or(ReadError::OutOfBounds)?;
        GlyphData::read(data).map(Some)
    }
}

/// The image of a glyph and its position.
#[derive(Clone, Copy, Debug)]
pub struct GlyphData<'a> {
    origin_offset_x: i16,
    origin_offset_y: i16,
    graphic_type: Tag,
    data: &'a [u8],
}

impl<'a> FontRead<'a> for GlyphData<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let graphic_type = data.read_at::<Tag>(4)?;
        if graphic_type.to_u32() == 0 {
            return Err(ReadError::MalformedData("sbix glyph without graphic type"));
        }
        Ok(Self {
            origin_offset_x: data.read_at(0)?,
            origin_offset_y: data.read_at(2)?,
            graphic_type,
            data: data.split_off(8).unwrap_or_default().as_bytes(),
        })
    }
}

impl<'a> GlyphData<'a> {
    /// Horizontal offset of the image from the glyph origin, in pixels.
    pub fn origin_offset_x(&self) -> i16 {
        self.origin_offset_x
    }

    /// Vertical offset of the image from the glyph origin, in pixels.
    pub fn origin_offset_y(&self) -> i16 {
        self.origin_offset_y
    }

    /// The format of the image, such as `png ` or `jpg `.
    pub fn graphic_type(&self) -> Tag {
        self.graphic_type
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// For `dupe` graphics, the glyph whose image is reused.
    pub fn dupe_glyph(&self) -> Option<GlyphId> {
        (self.graphic_type == DUPE)
            .then(|| FontData::new(self.data).read_at::<GlyphId>(0).ok())
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    // two strikes of three glyphs; glyph 0 is empty, glyph 2 duplicates 1
    fn sbix_data() -> Vec<u8> {
        let png = b"\x89PNG";
        let glyph_1 = BeBuffer::new()
            .extend([-2i16, 3])
            .push(Tag::new(b"png "))
            .extend_bytes(png);
        let glyph_2 = BeBuffer::new()
            .extend([0i16, 0])
            .push(DUPE)
            .push(1u16);
        let strike = |ppem: u16| {
            let header_len = 4 + 4 * 4;
            let g1_end = header_len + glyph_1.len() as u32;
            let g2_end = g1_end + glyph_2.len() as u32;
            BeBuffer::new()
                .extend([ppem, 72])
                .extend([header_len, header_len, g1_end, g2_end])
                .extend_bytes(glyph_1.data())
                .extend_bytes(glyph_2.data())
                .into_vec()
        };
        let strike_a = strike(32);
        let strike_b = strike(64);
        BeBuffer::new()
            .extend([1u16, 0x0003])
            .push(2u32)
            .extend([16u32, 16 + strike_a.len() as u32])
            .extend_bytes(&strike_a)
            .extend_bytes(&strike_b)
            .into_vec()
    }

    #[test]
    fn strikes_and_glyphs() {
        let data = sbix_data();
        let sbix = Sbix::read(FontData::new(&data), 3).unwrap();
        assert_eq!(sbix.version(), 1);
        assert!(sbix.draws_outlines());
        let ppems = sbix
            .strikes()
            .map(|strike| strike.unwrap().ppem())
            .collect::<Vec<_>>();
        assert_eq!(ppems, [32, 64]);
        let strike = sbix.strike(1).unwrap();
        assert_eq!(strike.ppi(), 72);
        assert!(strike.glyph_data(GlyphId::new(0)).unwrap().is_none());
        let glyph = strike.glyph_data(GlyphId::new(1)).unwrap().unwrap();
        assert_eq!(glyph.graphic_type(), Tag::new(b"png "));
        assert_eq!((glyph.origin_offset_x(), glyph.origin_offset_y()), (-2, 3));
        assert_eq!(glyph.data(), b"\x89PNG");
        assert_eq!(glyph.dupe_glyph(), None);
        let dupe = strike.glyph_data(GlyphId::new(2)).unwrap().unwrap();
        assert_eq!(dupe.dupe_glyph(), Some(GlyphId::new(1)));
        assert!(strike.glyph_data(GlyphId::new(3)).is_err());
        assert!(sbix.strike(2).is_err());
    }

    #[test]
    fn zero_graphic_type() {
        let data = BeBuffer::new().extend([0i16, 0]).push(0u32);
        assert!(GlyphData::read(data.data().into()).is_err());
    }
}
