use textcore_read::{
    types::{F2Dot14, GlyphId},
    TableProvider,
};

use super::{
    bitmap::{BitmapFormat, BitmapStrikes},
    charmap::Charmap,
    metrics::{effective_coords, units_per_em, GlyphExtents, GlyphMetrics, Metrics},
    outline::Outlines,
    variation::{AxisCollection, NamedInstanceCollection},
    FontError,
};

/// Interface for types that can provide font metadata.
pub trait MetadataProvider<'a>: TableProvider<'a> + Sized {
    /// Returns the collection of variation axes.
    fn axes(&self) -> AxisCollection<'a> {
        AxisCollection::new(self)
    }

    /// Returns the collection of named variation instances.
    fn named_instances(&self) -> NamedInstanceCollection<'a> {
        NamedInstanceCollection::new(self)
    }

    /// Returns the global font metrics for the specified location in
    /// normalized variation space.
    fn metrics(&self, coords: &[F2Dot14]) -> Metrics {
        Metrics::new(self, coords)
    }

    /// Returns the glyph specific metrics for the specified location in
    /// normalized variation space.
    fn glyph_metrics(&self, coords: &'a [F2Dot14]) -> GlyphMetrics<'a> {
        GlyphMetrics::new(self, coords)
    }

    /// Returns the character to nominal glyph identifier mapping.
    fn charmap(&self) -> Charmap<'a> {
        Charmap::new(self)
    }

    /// Returns the loader for TrueType outlines.
    fn outlines(&self) -> Result<Outlines<'a>, FontError> {
        Outlines::new(self)
    }

    /// Returns the embedded bitmap strikes.
    fn bitmap_strikes(&self) -> BitmapStrikes<'a> {
        BitmapStrikes::new(self)
    }

    /// Returns the ink extents of a glyph in font units.
    ///
    /// The extents come from the largest `sbix` strike, then the `glyf`
    /// table, then the largest strike of the other bitmap tables. Outline
    /// extents are computed from the loaded points at a variable location
    /// and read from the glyph header otherwise.
    fn glyph_extents(&self, coords: &[F2Dot14], glyph_id: GlyphId) -> Option<GlyphExtents> {
        let upem = units_per_em(self);
        let sbix = BitmapStrikes::with_format(self, BitmapFormat::Sbix);
        if let Some(glyph) = sbix.glyph_for_size(glyph_id, 0, 0) {
            return Some(glyph.extents(upem));
        }
        if let Ok(outlines) = Outlines::new(self) {
            let extents = if effective_coords(self, coords).is_empty() {
                outlines.header_extents(glyph_id)
            } else {
                outlines.points(glyph_id).map(|points| points.extents())
            };
            match extents {
                Ok(extents) => return Some(extents),
                Err(e) => log::debug!("no outline extents for glyph {glyph_id}: {e}"),
            }
        }
        BitmapStrikes::new(self)
            .glyph_for_size(glyph_id, 0, 0)
            .map(|glyph| glyph.extents(upem))
    }
}

/// Blanket implementation of `MetadataProvider` for any type that implements
/// `TableProvider`.
impl<'a, T> MetadataProvider<'a> for T where T: TableProvider<'a> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use textcore_read::{types::Tag, FontRef};
    use textcore_test_data::{
        bitmap,
        glyf::{gids, outline_font, outline_tables},
    };

    #[test]
    fn outline_extents() {
        let data = outline_font();
        let font = FontRef::new(&data).unwrap();
        assert_eq!(
            font.glyph_extents(&[], GlyphId::new(gids::ONE)),
            Some(GlyphExtents {
                x_bearing: 205.0,
                y_bearing: 1638.0,
                width: 409.0,
                height: -1638.0,
            })
        );
        assert_eq!(font.glyph_extents(&[], GlyphId::new(100)), None);
    }

    #[test]
    fn sbix_before_outlines() {
        let mut builder = outline_tables();
        builder.add_table(Tag::new(b"sbix"), bitmap::sbix(8, &[32, 64]));
        let data = builder.build();
        let font = FontRef::new(&data).unwrap();
        // largest strike, scaled to 2048 units per em
        assert_eq!(
            font.glyph_extents(&[], GlyphId::new(1)),
            Some(GlyphExtents {
                x_bearing: -64.0,
                y_bearing: 2144.0,
                width: 2048.0,
                height: -2048.0,
            })
        );
        // no image in the strike, the outline wins
        assert_eq!(
            font.glyph_extents(&[], GlyphId::new(gids::FIVE)).map(|e| e.width),
            Some(400.0)
        );
    }

    #[test]
    fn bitmap_only() {
        let (cblc, cbdt) = bitmap::color_strikes(&[20, 40]);
        let data = textcore_test_data::font_builder::FontBuilder::default()
            .add_table(Tag::new(b"head"), textcore_test_data::head(1000, 0))
            .add_table(Tag::new(b"CBLC"), cblc)
            .add_table(Tag::new(b"CBDT"), cbdt)
            .build();
        let font = FontRef::new(&data).unwrap();
        assert_eq!(font.bitmap_strikes().len(), 2);
        assert_eq!(
            font.glyph_extents(&[], GlyphId::new(1)),
            Some(GlyphExtents {
                x_bearing: 0.0,
                y_bearing: 800.0,
                width: 1000.0,
                height: -1000.0,
            })
        );
    }
}
