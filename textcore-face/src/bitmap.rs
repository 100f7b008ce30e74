//! Embedded bitmap strikes.
//!
//! A font carries at most one set of strikes that is used, chosen in
//! order from color (`CBLC`/`CBDT`), grayscale (`EBLC`/`EBDT`), Apple
//! (`bloc`/`bdat`) and `sbix` tables.

use textcore_read::{
    tables::{
        bitmap::{BitmapDataFormat, BitmapDataTable, BitmapLocationTable},
        sbix::Sbix,
    },
    types::{GlyphId, Tag},
    ReadError, TableProvider,
};

use crate::metrics::GlyphExtents;

const PNG: Tag = Tag::new(b"png ");

/// The tables providing the strikes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BitmapFormat {
    /// `CBLC` and `CBDT`.
    Cbdt,
    /// `EBLC` and `EBDT`.
    Ebdt,
    /// `bloc` and `bdat`.
    Bdat,
    Sbix,
}

/// Chooses the strike best suited for a size in pixels per em.
///
/// The request is the larger of `x_ppem` and `y_ppem`, with zero meaning
/// the largest available strike. The smallest strike at least as large as
/// the request wins; when there is none, the largest strike.
///
/// Returns `None` when there are no strikes.
pub fn choose_strike(ppems: impl IntoIterator<Item = u16>, x_ppem: u16, y_ppem: u16) -> Option<usize> {
    let request = match x_ppem.max(y_ppem) {
        0 => u16::MAX,
        request => request,
    };
    let mut ppems = ppems.into_iter().enumerate();
    let (mut best_ix, mut best) = ppems.next()?;
    for (ix, ppem) in ppems {
        if (request <= ppem && ppem < best) || (request > best && ppem > best) {
            best_ix = ix;
            best = ppem;
        }
    }
    Some(best_ix)
}

#[derive(Clone)]
enum Source<'a> {
    Tables {
        format: BitmapFormat,
        location: BitmapLocationTable<'a>,
        data: BitmapDataTable<'a>,
    },
    Sbix(Sbix<'a>),
}

/// The bitmap strikes of a font.
#[derive(Clone, Default)]
pub struct BitmapStrikes<'a> {
    source: Option<Source<'a>>,
}

impl<'a> BitmapStrikes<'a> {
    pub fn new(font: &impl TableProvider<'a>) -> Self {
        [
            BitmapFormat::Cbdt,
            BitmapFormat::Ebdt,
            BitmapFormat::Bdat,
            BitmapFormat::Sbix,
        ]
        .into_iter()
        .map(|format| Self::with_format(font, format))
        .find(|strikes| strikes.source.is_some())
        .unwrap_or_default()
    }

    /// Loads the strikes of the given tables only.
    pub fn with_format(font: &impl TableProvider<'a>, format: BitmapFormat) -> Self {
        let tables = |location: Result<_, ReadError>, data: Result<_, ReadError>| {
            Some(Source::Tables {
                format,
                location: location.ok()?,
                data: data.ok()?,
            })
        };
        let source = match format {
            BitmapFormat::Cbdt => tables(font.cblc(), font.cbdt()),
            BitmapFormat::Ebdt => tables(font.eblc(), font.ebdt()),
            BitmapFormat::Bdat => tables(font.bloc(), font.bdat()),
            BitmapFormat::Sbix => font.sbix().ok().map(Source::Sbix),
        };
        Self { source }
    }

    /// The tables providing the strikes, or `None` for a font without
    /// bitmaps.
    pub fn format(&self) -> Option<BitmapFormat> {
        match self.source.as_ref()? {
            Source::Tables { format, .. } => Some(*format),
            Source::Sbix(_) => Some(BitmapFormat::Sbix),
        }
    }

    /// Returns the number of strikes.
    pub fn len(&self) -> usize {
        match &self.source {
            Some(Source::Tables { location, .. }) => location.sizes().len(),
            Some(Source::Sbix(sbix)) => sbix.num_strikes(),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the horizontal and vertical pixels per em of a strike.
    pub fn ppem(&self, index: usize) -> Option<(u16, u16)> {
        match self.source.as_ref()? {
            Source::Tables { location, .. } => {
                let size = location.sizes().get(index)?;
                Some((size.ppem_x() as u16, size.ppem_y() as u16))
            }
            Source::Sbix(sbix) => {
                let ppem = sbix.strike(index).ok()?.ppem();
                Some((ppem, ppem))
            }
        }
    }

    /// Chooses a strike for the given size with [`choose_strike`].
    pub fn choose(&self, x_ppem: u16, y_ppem: u16) -> Option<usize> {
        let ppems = (0..self.len()).map(|ix| {
            self.ppem(ix)
                .map(|(x, y)| x.max(y))
                .unwrap_or_default()
        });
        choose_strike(ppems, x_ppem, y_ppem)
    }

    /// Returns the image of a glyph in a strike, or `None` when the strike
    /// has no image for it.
    pub fn glyph(&self, strike: usize, glyph_id: GlyphId) -> Option<BitmapGlyph<'a>> {
        let (x_ppem, y_ppem) = self.ppem(strike)?;
        match self.source.as_ref()? {
            Source::Tables { location, data, .. } => {
                let size = location.sizes().get(strike)?;
                // glyphs outside of the strike are not an error
                let loc = size.location(location.offset_data(), glyph_id).ok()?;
                if loc.is_empty() {
                    return None;
                }
                let image = data
                    .data(&loc)
                    .map_err(|e| log::debug!("bad bitmap for glyph {glyph_id}: {e}"))
                    .ok()?;
                let (width, height) = image.metrics.size();
                let (bearing_x, bearing_y) = image.metrics.hori_bearings();
                let data = match image.format {
                    BitmapDataFormat::Png => BitmapImage::Png(image.data),
                    format => BitmapImage::Mask {
                        data: image.data,
                        bit_depth: loc.bit_depth,
                        byte_aligned: format == BitmapDataFormat::ByteAligned,
                    },
                };
                Some(BitmapGlyph {
                    x_ppem,
                    y_ppem,
                    bearing_x: bearing_x as i32,
                    bearing_y: bearing_y as i32,
                    width: width as u32,
                    height: height as u32,
                    data,
                })
            }
            Source::Sbix(sbix) => {
                let strike = sbix.strike(strike).ok()?;
                let mut glyph = strike.glyph_data(glyph_id).ok()??;
                if let Some(dupe) = glyph.dupe_glyph() {
                    glyph = strike.glyph_data(dupe).ok()??;
                }
                let graphic_type = glyph.graphic_type();
                let (width, height, data) = if graphic_type == PNG {
                    let (width, height) = png_size(glyph.data()).unwrap_or_default();
                    (width, height, BitmapImage::Png(glyph.data()))
                } else {
                    let data = BitmapImage::Other {
                        graphic_type,
                        data: glyph.data(),
                    };
                    (0, 0, data)
                };
                Some(BitmapGlyph {
                    x_ppem,
                    y_ppem,
                    bearing_x: glyph.origin_offset_x() as i32,
                    bearing_y: glyph.origin_offset_y() as i32 + height as i32,
                    width,
                    height,
                    data,
                })
            }
        }
    }

    /// Returns the image of a glyph in the strike chosen for the given
    /// size.
    pub fn glyph_for_size(
        &self,
        glyph_id: GlyphId,
        x_ppem: u16,
        y_ppem: u16,
    ) -> Option<BitmapGlyph<'a>> {
        self.glyph(self.choose(x_ppem, y_ppem)?, glyph_id)
    }
}

// Width and height from the header chunk of a PNG image.
fn png_size(data: &[u8]) -> Option<(u32, u32)> {
    let be_u32 = |offset: usize| {
        let bytes = data.get(offset..offset + 4)?;
        Some(u32::from_be_bytes(bytes.try_into().ok()?))
    };
    Some((be_u32(16)?, be_u32(20)?))
}

/// Pixel data of a bitmap glyph.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BitmapImage<'a> {
    /// A complete PNG file.
    Png(&'a [u8]),
    /// Rows of pixels with the given bit depth, starting on a byte
    /// boundary when `byte_aligned`.
    Mask {
        data: &'a [u8],
        bit_depth: u8,
        byte_aligned: bool,
    },
    /// Any other `sbix` graphic, such as JPEG or TIFF.
    Other { graphic_type: Tag, data: &'a [u8] },
}

/// A glyph image in a bitmap strike.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BitmapGlyph<'a> {
    pub x_ppem: u16,
    pub y_ppem: u16,
    /// Offset in pixels from the origin to the left edge of the image.
    pub bearing_x: i32,
    /// Offset in pixels from the baseline to the top edge of the image.
    pub bearing_y: i32,
    pub width: u32,
    pub height: u32,
    pub data: BitmapImage<'a>,
}

impl BitmapGlyph<'_> {
    /// The extents of the image in font units.
    pub fn extents(&self, units_per_em: u16) -> GlyphExtents {
        let extents = GlyphExtents {
            x_bearing: self.bearing_x as f32,
            y_bearing: self.bearing_y as f32,
            width: self.width as f32,
            height: -(self.height as f32),
        };
        let scale = |ppem: u16| {
            if ppem == 0 {
                1.0
            } else {
                units_per_em as f32 / ppem as f32
            }
        };
        extents.scale(scale(self.x_ppem), scale(self.y_ppem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use textcore_read::FontRef;
    use textcore_test_data::{bitmap, font_builder::FontBuilder, glyf::outline_tables};

    #[test]
    fn strike_selection() {
        let ppems = [20, 30, 40];
        assert_eq!(choose_strike(ppems, 24, 0), Some(1));
        assert_eq!(choose_strike(ppems, 0, 0), Some(2));
        assert_eq!(choose_strike(ppems, 30, 30), Some(1));
        assert_eq!(choose_strike(ppems, 12, 16), Some(0));
        assert_eq!(choose_strike(ppems, 100, 0), Some(2));
        assert_eq!(choose_strike([40, 20, 30], 24, 24), Some(2));
        assert_eq!(choose_strike([0u16; 0], 24, 24), None);
    }

    fn font_with(tables: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
        let mut builder = outline_tables();
        for (tag, data) in tables {
            builder.add_table(Tag::new(tag), data.clone());
        }
        builder.build()
    }

    #[test]
    fn color_strikes() {
        let (cblc, cbdt) = bitmap::color_strikes(&[20, 30, 40]);
        let data = font_with(&[(b"CBLC", cblc), (b"CBDT", cbdt)]);
        let font = FontRef::new(&data).unwrap();
        let strikes = BitmapStrikes::new(&font);
        assert_eq!(strikes.format(), Some(BitmapFormat::Cbdt));
        assert_eq!(strikes.len(), 3);
        assert_eq!(strikes.choose(24, 24), Some(1));
        let glyph = strikes.glyph_for_size(GlyphId::new(1), 24, 24).unwrap();
        let png = bitmap::fake_png(30);
        assert_eq!(
            glyph,
            BitmapGlyph {
                x_ppem: 30,
                y_ppem: 30,
                bearing_x: 0,
                bearing_y: 24,
                width: 30,
                height: 30,
                data: BitmapImage::Png(&png),
            }
        );
        assert_eq!(
            glyph.extents(60),
            GlyphExtents {
                x_bearing: 0.0,
                y_bearing: 48.0,
                width: 60.0,
                height: -60.0
            }
        );
        // no image
        assert_eq!(strikes.glyph(1, GlyphId::new(2)), None);
        // outside of the strike
        assert_eq!(strikes.glyph(1, GlyphId::new(5)), None);
    }

    #[test]
    fn gray_strike() {
        let (eblc, ebdt) = bitmap::gray_strike();
        let data = font_with(&[(b"EBLC", eblc), (b"EBDT", ebdt)]);
        let font = FontRef::new(&data).unwrap();
        let strikes = BitmapStrikes::new(&font);
        assert_eq!(strikes.format(), Some(BitmapFormat::Ebdt));
        assert_eq!(strikes.ppem(0), Some((12, 12)));
        let glyph = strikes.glyph(0, GlyphId::new(5)).unwrap();
        assert_eq!((glyph.width, glyph.height), (3, 3));
        assert_eq!((glyph.bearing_x, glyph.bearing_y), (0, 3));
        assert!(matches!(
            glyph.data,
            BitmapImage::Mask {
                bit_depth: 1,
                byte_aligned: false,
                ..
            }
        ));
    }

    #[test]
    fn color_before_gray() {
        let (cblc, cbdt) = bitmap::color_strikes(&[20]);
        let (eblc, ebdt) = bitmap::gray_strike();
        let data = font_with(&[(b"CBLC", cblc), (b"CBDT", cbdt), (b"EBLC", eblc), (b"EBDT", ebdt)]);
        let font = FontRef::new(&data).unwrap();
        assert_eq!(BitmapStrikes::new(&font).format(), Some(BitmapFormat::Cbdt));
        // a location table alone is not enough
        let (eblc, _) = bitmap::gray_strike();
        let data = font_with(&[(b"EBLC", eblc)]);
        let font = FontRef::new(&data).unwrap();
        let strikes = BitmapStrikes::new(&font);
        assert_eq!(strikes.format(), None);
        assert!(strikes.is_empty());
        assert_eq!(strikes.glyph_for_size(GlyphId::new(1), 12, 12), None);
    }

    #[test]
    fn sbix_strikes() {
        let data = font_with(&[(b"sbix", bitmap::sbix(8, &[32, 64]))]);
        let font = FontRef::new(&data).unwrap();
        let strikes = BitmapStrikes::new(&font);
        assert_eq!(strikes.format(), Some(BitmapFormat::Sbix));
        assert_eq!(strikes.choose(40, 0), Some(1));
        let glyph = strikes.glyph(1, GlyphId::new(1)).unwrap();
        assert_eq!((glyph.width, glyph.height), (64, 64));
        assert_eq!((glyph.bearing_x, glyph.bearing_y), (-2, 67));
        assert_eq!(
            glyph.extents(2048),
            GlyphExtents {
                x_bearing: -64.0,
                y_bearing: 2144.0,
                width: 2048.0,
                height: -2048.0
            }
        );
        // duplicates resolve to the original image
        assert_eq!(strikes.glyph(1, GlyphId::new(2)), Some(glyph));
        assert_eq!(strikes.glyph(1, GlyphId::new(0)), None);
    }

    #[test]
    fn no_strikes() {
        let data = FontBuilder::default()
            .add_table(Tag::new(b"head"), textcore_test_data::head(1000, 0))
            .build();
        let font = FontRef::new(&data).unwrap();
        let strikes = BitmapStrikes::new(&font);
        assert_eq!(strikes.format(), None);
        assert_eq!(strikes.choose(12, 12), None);
    }

    #[test]
    fn png_header_size() {
        assert_eq!(png_size(&bitmap::png_header(17, 9)), Some((17, 9)));
        assert_eq!(png_size(&bitmap::fake_png(12)), None);
    }
}
