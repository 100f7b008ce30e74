//! Global font and glyph specific metrics.
//!
//! All values are in font units. For variable fonts, the normalized
//! coordinates select the position in design space: global metrics apply
//! the deltas of the `MVAR` table and glyph metrics those of `HVAR` and
//! `VVAR`. Coordinates are ignored unless there is one per axis.

use textcore_read::{
    tables::{hvar::Hvar, hvmtx::HVmtx, os2::SelectionFlags},
    types::{F2Dot14, GlyphId},
    TableProvider,
};

/// Units per em used when the `head` table is missing or holds a value
/// outside `16..=16384`.
pub const DEFAULT_UNITS_PER_EM: u16 = 1000;

/// Returns the units per em of the font, with out of range values replaced
/// by [`DEFAULT_UNITS_PER_EM`].
pub fn units_per_em<'a>(font: &impl TableProvider<'a>) -> u16 {
    match font.head().map(|head| head.units_per_em()) {
        Ok(upem @ 16..=16384) => upem,
        _ => DEFAULT_UNITS_PER_EM,
    }
}

// Advance without variations: one em without a metrics table, zero for
// glyphs beyond the glyph count.
pub(crate) fn base_advance(mtx: Option<&HVmtx>, glyph_id: GlyphId, units_per_em: u16) -> u16 {
    match mtx {
        Some(mtx) => mtx.advance(glyph_id).unwrap_or(0),
        None => units_per_em,
    }
}

fn axis_count<'a>(font: &impl TableProvider<'a>) -> usize {
    font.fvar()
        .map(|fvar| fvar.axis_count() as usize)
        .unwrap_or_default()
}

// Coordinates only apply to variable fonts, with one per axis.
pub(crate) fn effective_coords<'a, 'c>(
    font: &impl TableProvider<'a>,
    coords: &'c [F2Dot14],
) -> &'c [F2Dot14] {
    if !coords.is_empty() && coords.len() == axis_count(font) {
        coords
    } else {
        &[]
    }
}

/// Metrics for a text decoration.
///
/// This represents the suggested offset and thickness of an underline
/// or strikeout text decoration.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct Decoration {
    /// Offset to the top of the decoration from the baseline.
    pub offset: f32,
    /// Thickness of the decoration.
    pub thickness: f32,
}

/// Metrics that apply to all glyphs in a font.
///
/// Line metrics come from the `OS/2` typographic values when the
/// `USE_TYPO_METRICS` flag is set and from `hhea` otherwise. The ascent is
/// always positive and the descent always negative. The underline comes
/// from `post` and the strikeout from `OS/2`.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct Metrics {
    /// Number of font design units per em unit.
    pub units_per_em: u16,
    /// Number of glyphs in the font.
    pub glyph_count: u16,
    /// Distance from the baseline to the top of the alignment box.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the alignment box.
    pub descent: f32,
    /// Recommended additional spacing between lines.
    pub leading: f32,
    /// Average width of all non-zero width characters in the font.
    pub average_width: Option<f32>,
    /// Distance from the baseline to the top of the lowercase "x".
    pub x_height: Option<f32>,
    /// Distance from the baseline to the top of a typical capital.
    pub cap_height: Option<f32>,
    /// Metrics for an underline decoration.
    pub underline: Option<Decoration>,
    /// Metrics for a strikeout decoration.
    pub strikeout: Option<Decoration>,
}

impl Metrics {
    /// Creates new metrics for the given font and location in normalized
    /// variation space.
    pub fn new<'a>(font: &impl TableProvider<'a>, coords: &[F2Dot14]) -> Self {
        let mut metrics = Metrics {
            units_per_em: units_per_em(font),
            glyph_count: font.maxp().map(|maxp| maxp.num_glyphs()).unwrap_or_default(),
            ..Default::default()
        };
        let coords = effective_coords(font, coords);
        if let Ok(post) = font.post() {
            metrics.underline = Some(Decoration {
                offset: post.underline_position() as f32,
                thickness: post.underline_thickness() as f32,
            });
        }
        let os2 = font.os2().ok();
        let mut used_typo_metrics = false;
        if let Some(os2) = &os2 {
            if os2
                .fs_selection()
                .contains(SelectionFlags::USE_TYPO_METRICS)
            {
                if let (Some(ascent), Some(descent), Some(leading)) = (
                    os2.s_typo_ascender(),
                    os2.s_typo_descender(),
                    os2.s_typo_line_gap(),
                ) {
                    metrics.ascent = ascent as f32;
                    metrics.descent = descent as f32;
                    metrics.leading = leading as f32;
                    used_typo_metrics = true;
                }
            }
            metrics.average_width = Some(os2.x_avg_char_width() as f32);
            metrics.x_height = os2.sx_height().map(|v| v as f32);
            metrics.cap_height = os2.s_cap_height().map(|v| v as f32);
            metrics.strikeout = Some(Decoration {
                offset: os2.y_strikeout_position() as f32,
                thickness: os2.y_strikeout_size() as f32,
            });
        }
        if !used_typo_metrics {
            if let Ok(hhea) = font.hhea() {
                metrics.ascent = hhea.ascender() as f32;
                metrics.descent = hhea.descender() as f32;
                metrics.leading = hhea.line_gap() as f32;
            }
        }
        if let (Ok(mvar), true) = (font.mvar(), !coords.is_empty()) {
            use textcore_read::tables::mvar::tags::*;
            let metric_delta =
                |tag| mvar.metric_delta(tag, coords).unwrap_or_default().to_f32();
            metrics.ascent += metric_delta(HASC);
            metrics.descent += metric_delta(HDSC);
            metrics.leading += metric_delta(HLGP);
            if let Some(x_height) = &mut metrics.x_height {
                *x_height += metric_delta(XHGT);
            }
            if let Some(cap_height) = &mut metrics.cap_height {
                *cap_height += metric_delta(CPHT);
            }
            if let Some(underline) = &mut metrics.underline {
                underline.offset += metric_delta(UNDO);
                underline.thickness += metric_delta(UNDS);
            }
            if let Some(strikeout) = &mut metrics.strikeout {
                strikeout.offset += metric_delta(STRO);
                strikeout.thickness += metric_delta(STRS);
            }
        }
        metrics.ascent = metrics.ascent.abs();
        metrics.descent = -metrics.descent.abs();
        metrics
    }
}

/// Glyph specific metrics.
#[derive(Clone)]
pub struct GlyphMetrics<'a> {
    glyph_count: u16,
    units_per_em: u16,
    hmtx: Option<HVmtx<'a>>,
    vmtx: Option<HVmtx<'a>>,
    hvar: Option<Hvar<'a>>,
    vvar: Option<Hvar<'a>>,
    coords: &'a [F2Dot14],
}

impl<'a> GlyphMetrics<'a> {
    /// Creates new glyph metrics from the given font and location in
    /// normalized variation space.
    pub fn new(font: &impl TableProvider<'a>, coords: &'a [F2Dot14]) -> Self {
        let coords = effective_coords(font, coords);
        let (hvar, vvar) = if coords.is_empty() {
            (None, None)
        } else {
            (font.hvar().ok(), font.vvar().ok())
        };
        Self {
            glyph_count: font.maxp().map(|maxp| maxp.num_glyphs()).unwrap_or_default(),
            units_per_em: units_per_em(font),
            hmtx: font.hmtx().ok(),
            vmtx: font.vmtx().ok(),
            hvar,
            vvar,
            coords,
        }
    }

    /// Returns the number of available glyphs in the font.
    pub fn glyph_count(&self) -> u16 {
        self.glyph_count
    }

    /// Returns the advance width for the specified glyph.
    ///
    /// Fonts without `hmtx` advance by one em; glyphs beyond the glyph
    /// count have no advance.
    pub fn advance_width(&self, glyph_id: GlyphId) -> f32 {
        let advance = base_advance(self.hmtx.as_ref(), glyph_id, self.units_per_em) as f32;
        advance + self.delta(self.hvar.as_ref(), glyph_id)
    }

    /// Returns the advance height for the specified glyph.
    pub fn advance_height(&self, glyph_id: GlyphId) -> f32 {
        let advance = base_advance(self.vmtx.as_ref(), glyph_id, self.units_per_em) as f32;
        advance + self.delta(self.vvar.as_ref(), glyph_id)
    }

    /// Returns the left side bearing for the specified glyph.
    pub fn left_side_bearing(&self, glyph_id: GlyphId) -> Option<f32> {
        self.hmtx
            .as_ref()?
            .side_bearing(glyph_id)
            .map(|lsb| lsb as f32)
    }

    /// Returns the top side bearing for the specified glyph.
    pub fn top_side_bearing(&self, glyph_id: GlyphId) -> Option<f32> {
        self.vmtx
            .as_ref()?
            .side_bearing(glyph_id)
            .map(|tsb| tsb as f32)
    }

    fn delta(&self, var: Option<&Hvar>, glyph_id: GlyphId) -> f32 {
        let Some(var) = var else {
            return 0.0;
        };
        match var.advance_delta(glyph_id, self.coords) {
            Ok(delta) => delta.to_f32(),
            Err(e) => {
                log::debug!("no advance delta for glyph {glyph_id}: {e}");
                0.0
            }
        }
    }
}

/// Ink extents of a glyph.
///
/// The bearings locate the top left corner relative to the glyph origin;
/// `height` is negative in the Y-up coordinate system of fonts.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct GlyphExtents {
    pub x_bearing: f32,
    pub y_bearing: f32,
    pub width: f32,
    pub height: f32,
}

impl GlyphExtents {
    /// Multiplies horizontal values by `x` and vertical values by `y`.
    pub fn scale(&self, x: f32, y: f32) -> Self {
        Self {
            x_bearing: self.x_bearing * x,
            y_bearing: self.y_bearing * y,
            width: self.width * x,
            height: self.height * y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use textcore_read::{
        tables::mvar::tags::{HASC, HDSC},
        types::Tag,
        FontRef,
    };
    use textcore_test_data::{
        glyf::{gids, outline_tables, ADVANCES},
        post, variations,
    };

    #[test]
    fn hhea_line_metrics() {
        let data = outline_font_with(&[]);
        let font = FontRef::new(&data).unwrap();
        let metrics = Metrics::new(&font, &[]);
        assert_eq!(metrics.units_per_em, 2048);
        assert_eq!(metrics.glyph_count, 8);
        assert_eq!((metrics.ascent, metrics.descent, metrics.leading), (1900.0, -500.0, 0.0));
        assert_eq!(
            metrics.underline,
            Some(Decoration {
                offset: -75.0,
                thickness: 50.0
            })
        );
        assert_eq!(metrics.strikeout, None);
    }

    #[test]
    fn typo_line_metrics() {
        let os2 = textcore_test_data::os2(true, (800, -200, 90), (1000, 300), (50, 250));
        let data = outline_font_with(&[(Tag::new(b"OS/2"), os2)]);
        let font = FontRef::new(&data).unwrap();
        let metrics = Metrics::new(&font, &[]);
        assert_eq!((metrics.ascent, metrics.descent, metrics.leading), (800.0, -200.0, 90.0));
        assert_eq!(
            metrics.strikeout,
            Some(Decoration {
                offset: 250.0,
                thickness: 50.0
            })
        );
        assert_eq!(metrics.average_width, Some(500.0));
        // without the flag, hhea wins
        let os2 = textcore_test_data::os2(false, (800, -200, 90), (1000, 300), (50, 250));
        let data = outline_font_with(&[(Tag::new(b"OS/2"), os2)]);
        let font = FontRef::new(&data).unwrap();
        assert_eq!(Metrics::new(&font, &[]).ascent, 1900.0);
    }

    #[test]
    fn descent_is_negative() {
        let os2 = textcore_test_data::os2(true, (-800, 200, 0), (1000, 300), (50, 250));
        let data = outline_font_with(&[(Tag::new(b"OS/2"), os2)]);
        let font = FontRef::new(&data).unwrap();
        let metrics = Metrics::new(&font, &[]);
        assert_eq!((metrics.ascent, metrics.descent), (800.0, -200.0));
    }

    #[test]
    fn units_per_em_fallback() {
        for (upem, expected) in [(8, 1000), (16, 16), (16384, 16384), (20000, 1000)] {
            let mut builder = outline_tables();
            builder.add_table(Tag::new(b"head"), textcore_test_data::head(upem, 1));
            let data = builder.build();
            let font = FontRef::new(&data).unwrap();
            assert_eq!(units_per_em(&font), expected);
        }
    }

    #[test]
    fn advances() {
        let data = outline_font_with(&[]);
        let font = FontRef::new(&data).unwrap();
        let glyph_metrics = GlyphMetrics::new(&font, &[]);
        for (gid, advance) in ADVANCES.iter().enumerate() {
            assert_eq!(
                glyph_metrics.advance_width(GlyphId::new(gid as u16)),
                *advance as f32
            );
        }
        assert_eq!(glyph_metrics.advance_width(GlyphId::new(100)), 0.0);
        assert_eq!(
            glyph_metrics.left_side_bearing(GlyphId::new(gids::ONE)),
            Some(205.0)
        );
        // no vmtx
        assert_eq!(glyph_metrics.advance_height(GlyphId::new(gids::ONE)), 2048.0);
        assert_eq!(glyph_metrics.top_side_bearing(GlyphId::new(gids::ONE)), None);
    }

    #[test]
    fn missing_hmtx_advances_one_em() {
        let data = textcore_test_data::font_builder::FontBuilder::default()
            .add_table(Tag::new(b"head"), textcore_test_data::head(1000, 0))
            .add_table(Tag::new(b"maxp"), textcore_test_data::maxp(3))
            .build();
        let font = FontRef::new(&data).unwrap();
        let glyph_metrics = GlyphMetrics::new(&font, &[]);
        assert_eq!(glyph_metrics.advance_width(GlyphId::new(1)), 1000.0);
    }

    fn variable_font() -> Vec<u8> {
        let fvar = variations::fvar(&[(Tag::new(b"wght"), 100.0, 400.0, 900.0)], &[]);
        outline_font_with(&[
            (Tag::new(b"fvar"), fvar),
            (Tag::new(b"HVAR"), variations::hvar(&[0, 10, -20, 30, 0, 0, 0, 0])),
            (Tag::new(b"MVAR"), variations::mvar(&[(HASC, 50), (HDSC, -20)])),
        ])
    }

    #[test]
    fn variable_metrics() {
        let data = variable_font();
        let font = FontRef::new(&data).unwrap();
        let coords = [F2Dot14::ONE];
        let metrics = Metrics::new(&font, &coords);
        assert_eq!((metrics.ascent, metrics.descent), (1950.0, -520.0));
        let glyph_metrics = GlyphMetrics::new(&font, &coords);
        assert_eq!(glyph_metrics.advance_width(GlyphId::new(1)), 1239.0);
        assert_eq!(glyph_metrics.advance_width(GlyphId::new(2)), 799.0);
        // half way to the peak
        let half = [F2Dot14::from_f32(0.5)];
        assert_eq!(
            GlyphMetrics::new(&font, &half).advance_width(GlyphId::new(3)),
            515.0
        );
        // at the default location
        assert_eq!(Metrics::new(&font, &[]).ascent, 1900.0);
        assert_eq!(
            GlyphMetrics::new(&font, &[]).advance_width(GlyphId::new(1)),
            1229.0
        );
    }

    #[test]
    fn coords_must_match_axes() {
        let data = variable_font();
        let font = FontRef::new(&data).unwrap();
        let coords = [F2Dot14::ONE, F2Dot14::ONE];
        assert_eq!(Metrics::new(&font, &coords).ascent, 1900.0);
        assert_eq!(
            GlyphMetrics::new(&font, &coords).advance_width(GlyphId::new(1)),
            1229.0
        );
    }

    #[test]
    fn scaled_extents() {
        let extents = GlyphExtents {
            x_bearing: 10.0,
            y_bearing: 20.0,
            width: 30.0,
            height: -40.0,
        };
        assert_eq!(
            extents.scale(2.0, 0.5),
            GlyphExtents {
                x_bearing: 20.0,
                y_bearing: 10.0,
                width: 60.0,
                height: -20.0
            }
        );
    }

    fn outline_font_with(tables: &[(Tag, Vec<u8>)]) -> Vec<u8> {
        let mut builder = outline_tables();
        builder.add_table(Tag::new(b"post"), post::SIMPLE);
        for (tag, data) in tables {
            builder.add_table(*tag, data.clone());
        }
        builder.build()
    }
}
