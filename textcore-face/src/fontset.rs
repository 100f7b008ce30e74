//! Binding matched font patterns to fonts ready for shaping.
//!
//! A [`PatternSource`] yields the patterns produced by an external font
//! matcher in rank order. A [`Fontset`] turns them into [`Font`]s lazily,
//! one at a time, as a caller walks the set looking for a suitable font.
//!
//! Font values are in pixels at the pattern's pixel size, with the y axis
//! pointing down as in layout: ascents are positive and ink rectangles
//! start above the baseline at negative y.

use std::{
    collections::HashMap,
    sync::{Arc, OnceLock, RwLock},
};

use textcore_read::{
    types::{F26Dot6, F2Dot14, GlyphId},
    FontRef, ReadError,
};

use crate::{
    metrics::units_per_em,
    variation::parse_variations,
    FontError, MetadataProvider,
};

/// Set on glyph values for characters the font cannot map; the low bits
/// hold the character.
pub const UNKNOWN_FLAG: u32 = 0x1000_0000;

/// Glyph value of an empty glyph, which has no ink and no width.
pub const GLYPH_EMPTY: u32 = 0x0FFF_FFFF;

/// Returns the glyph value used for a character without a glyph.
pub fn unknown_glyph(ch: char) -> u32 {
    UNKNOWN_FLAG | ch as u32
}

const NBSP: char = '\u{A0}';

/// Affine transformation applied to a font.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Matrix {
    pub xx: f32,
    pub xy: f32,
    pub yx: f32,
    pub yy: f32,
    pub x0: f32,
    pub y0: f32,
}

impl Matrix {
    pub const IDENTITY: Self = Self {
        xx: 1.0,
        xy: 0.0,
        yx: 0.0,
        yy: 1.0,
        x0: 0.0,
        y0: 0.0,
    };
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A fully resolved font pattern, as produced by a font matcher.
#[derive(Clone, Debug, Default)]
pub struct FontPattern {
    /// Contents of the font file.
    pub data: Arc<Vec<u8>>,
    /// Face index in the low 16 bits; named instance plus one in the high
    /// 16 bits, with zero meaning no instance.
    pub index: u32,
    /// Size in pixels per em. Zero or less means font units.
    pub pixel_size: f32,
    pub matrix: Option<Matrix>,
    /// Comma separated variation settings, such as `"wght=700"`.
    pub variations: Option<String>,
    /// Characters covered by the font, when known to the matcher.
    pub charset: Option<Vec<u32>>,
    pub hinting: Option<bool>,
    pub antialias: Option<bool>,
}

/// Properties shared by all fonts of a fontset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontsetKey {
    /// Language tag such as `"de-AT"`, or empty for the default.
    pub language: String,
    /// Comma separated variation settings applied after those of each
    /// pattern.
    pub variations: String,
}

/// Source of the font patterns of a fontset, in rank order.
pub trait PatternSource {
    /// Returns the pattern at the given rank, or `None` past the last one.
    fn pattern(&self, index: usize) -> Option<FontPattern>;
}

impl PatternSource for [FontPattern] {
    fn pattern(&self, index: usize) -> Option<FontPattern> {
        self.get(index).cloned()
    }
}

impl PatternSource for Vec<FontPattern> {
    fn pattern(&self, index: usize) -> Option<FontPattern> {
        self.as_slice().pattern(index)
    }
}

impl<S: PatternSource + ?Sized> PatternSource for &S {
    fn pattern(&self, index: usize) -> Option<FontPattern> {
        (**self).pattern(index)
    }
}

/// An ordered set of fonts, loaded on demand.
pub struct Fontset<S> {
    key: FontsetKey,
    source: S,
    fonts: Vec<Arc<Font>>,
    next_pattern: usize,
}

impl<S: PatternSource> Fontset<S> {
    pub fn new(source: S, key: FontsetKey) -> Self {
        Self {
            key,
            source,
            fonts: Vec::new(),
            next_pattern: 0,
        }
    }

    pub fn key(&self) -> &FontsetKey {
        &self.key
    }

    pub fn language(&self) -> &str {
        &self.key.language
    }

    /// Number of fonts loaded so far.
    pub fn loaded_len(&self) -> usize {
        self.fonts.len()
    }

    /// Calls `f` on each font in order until it returns `true` or the fonts
    /// are exhausted. Fonts are only loaded when reached.
    pub fn foreach(&mut self, mut f: impl FnMut(&Arc<Font>) -> bool) {
        let mut index = 0;
        while let Some(font) = self.font_at(index) {
            if f(font) {
                return;
            }
            index += 1;
        }
    }

    /// Returns the first font covering the character.
    pub fn font_for_char(&mut self, ch: char) -> Option<Arc<Font>> {
        let mut found = None;
        self.foreach(|font| {
            if font.coverage().contains(ch) {
                found = Some(font.clone());
                true
            } else {
                false
            }
        });
        found
    }

    fn font_at(&mut self, index: usize) -> Option<&Arc<Font>> {
        while index >= self.fonts.len() {
            let font = self.load_next()?;
            self.fonts.push(font);
        }
        self.fonts.get(index)
    }

    // Patterns that fail to load are skipped.
    fn load_next(&mut self) -> Option<Arc<Font>> {
        loop {
            let pattern = self.source.pattern(self.next_pattern)?;
            self.next_pattern += 1;
            match Font::new(pattern, &self.key) {
                Ok(font) => return Some(Arc::new(font)),
                Err(e) => log::warn!("skipping font pattern {}: {e}", self.next_pattern - 1),
            }
        }
    }
}

/// A rectangle in pixels, y down.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Metrics of a font for laying out text in a language.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the logical extents.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the logical extents.
    pub descent: f32,
    /// Distance between consecutive baselines.
    pub height: f32,
    /// Average advance of the characters of the language sample.
    pub approximate_char_width: f32,
    /// Largest advance of the digits.
    pub approximate_digit_width: f32,
    /// Distance above the baseline of the top of the underline.
    pub underline_position: f32,
    pub underline_thickness: f32,
    /// Distance above the baseline of the top of the strikethrough.
    pub strikethrough_position: f32,
    pub strikethrough_thickness: f32,
}

/// The characters covered by a font.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Coverage {
    chars: Vec<u32>,
}

impl Coverage {
    pub fn from_chars(chars: impl IntoIterator<Item = u32>) -> Self {
        let mut chars = chars.into_iter().collect::<Vec<_>>();
        chars.sort_unstable();
        chars.dedup();
        Self { chars }
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.binary_search(&(ch as u32)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// A font face at a size and variable location, ready for shaping.
///
/// Glyph extents and metrics are cached; a font can be shared across
/// threads.
pub struct Font {
    pattern: FontPattern,
    size: F26Dot6,
    matrix: Matrix,
    units_per_em: u16,
    coords: Vec<F2Dot14>,
    glyph_info: RwLock<HashMap<u32, (Rectangle, Rectangle)>>,
    metrics_by_lang: RwLock<Vec<(&'static str, FontMetrics)>>,
    coverage: OnceLock<Coverage>,
}

impl Font {
    /// Loads the face selected by the pattern and resolves its variable
    /// location from the pattern and fontset key.
    pub fn new(pattern: FontPattern, key: &FontsetKey) -> Result<Self, FontError> {
        let font = face(&pattern)?;
        let units_per_em = units_per_em(&font);
        let coords = variation_coords(&font, &pattern, key);
        let size = if pattern.pixel_size > 0.0 {
            F26Dot6::from_f64(pattern.pixel_size as f64)
        } else {
            F26Dot6::ZERO
        };
        Ok(Self {
            size,
            matrix: pattern.matrix.unwrap_or_default(),
            units_per_em,
            coords,
            glyph_info: Default::default(),
            metrics_by_lang: Default::default(),
            coverage: OnceLock::new(),
            pattern,
        })
    }

    pub fn pattern(&self) -> &FontPattern {
        &self.pattern
    }

    /// Size in pixels per em, zero for font units.
    pub fn size(&self) -> F26Dot6 {
        self.size
    }

    pub fn matrix(&self) -> Matrix {
        self.matrix
    }

    pub fn is_hinted(&self) -> bool {
        self.pattern.hinting.unwrap_or(true)
    }

    pub fn is_antialiased(&self) -> bool {
        self.pattern.antialias.unwrap_or(true)
    }

    pub fn is_transformed(&self) -> bool {
        self.pattern
            .matrix
            .is_some_and(|matrix| matrix != Matrix::IDENTITY)
    }

    /// Normalized variation coordinates of the font, empty for static
    /// fonts.
    pub fn variation_coords(&self) -> &[F2Dot14] {
        &self.coords
    }

    /// Returns the face of the font.
    pub fn face(&self) -> Result<FontRef<'_>, FontError> {
        face(&self.pattern)
    }

    /// Returns the glyph for a character, or [`unknown_glyph`] when the
    /// font has none. No-break space maps like a space.
    pub fn get_glyph(&self, ch: char) -> u32 {
        let ch = if ch == NBSP { ' ' } else { ch };
        self.face()
            .ok()
            .and_then(|face| face.charmap().map(ch))
            .map(|gid| gid.to_u16() as u32)
            .unwrap_or_else(|| unknown_glyph(ch))
    }

    /// Returns the ink and logical rectangles of a glyph.
    ///
    /// Unknown glyphs get a box derived from the font metrics; the empty
    /// glyph has the height of a space and no ink or width.
    pub fn glyph_extents(&self, glyph: u32) -> (Rectangle, Rectangle) {
        let (glyph, empty) = if glyph == GLYPH_EMPTY {
            (self.get_glyph(' '), true)
        } else {
            (glyph, false)
        };
        if glyph & UNKNOWN_FLAG != 0 {
            let metrics = self.metrics("");
            let ink = Rectangle {
                x: 1.0,
                y: -(metrics.ascent - 1.0),
                width: metrics.approximate_char_width - 2.0,
                height: metrics.ascent + metrics.descent - 2.0,
            };
            let logical = Rectangle {
                x: 0.0,
                y: -metrics.ascent,
                width: metrics.approximate_char_width,
                height: metrics.ascent + metrics.descent,
            };
            return (ink, logical);
        }
        let Ok(glyph_id) = u16::try_from(glyph) else {
            log::debug!("glyph {glyph:#x} is out of range");
            return Default::default();
        };
        let cached = self
            .glyph_info
            .read()
            .ok()
            .and_then(|info| info.get(&glyph).copied());
        let (mut ink, mut logical) = match cached {
            Some(extents) => extents,
            None => {
                let extents = self.raw_extents(GlyphId::new(glyph_id));
                if let Ok(mut info) = self.glyph_info.write() {
                    info.insert(glyph, extents);
                }
                extents
            }
        };
        if empty {
            ink = Rectangle::default();
            logical.x = 0.0;
            logical.width = 0.0;
        }
        (ink, logical)
    }

    /// Returns the metrics of the font for a language, identified by its
    /// sample string.
    pub fn metrics(&self, language: &str) -> FontMetrics {
        let sample = sample_string(language);
        if let Some(metrics) = self.metrics_by_lang.read().ok().and_then(|cache| {
            cache
                .iter()
                .find(|(cached, _)| *cached == sample)
                .map(|(_, metrics)| *metrics)
        }) {
            return metrics;
        }
        let metrics = self.compute_metrics(sample);
        if let Ok(mut cache) = self.metrics_by_lang.write() {
            if !cache.iter().any(|(cached, _)| *cached == sample) {
                cache.push((sample, metrics));
            }
        }
        metrics
    }

    /// Returns the characters covered by the font, from the pattern when
    /// the matcher provided them and from the character map otherwise.
    pub fn coverage(&self) -> &Coverage {
        self.coverage.get_or_init(|| match &self.pattern.charset {
            Some(charset) => Coverage::from_chars(charset.iter().copied()),
            None => match self.face() {
                Ok(face) => Coverage::from_chars(face.charmap().mappings().map(|(ch, _)| ch)),
                Err(_) => Coverage::default(),
            },
        })
    }

    // Scale from font units to pixels.
    fn scale(&self) -> f32 {
        match self.size.to_f32() {
            size if size > 0.0 => size / self.units_per_em as f32,
            _ => 1.0,
        }
    }

    // Extents in user space, ignoring the matrix.
    fn raw_extents(&self, glyph_id: GlyphId) -> (Rectangle, Rectangle) {
        let face = match self.face() {
            Ok(face) => face,
            Err(e) => {
                log::debug!("no extents for glyph {glyph_id}: {e}");
                return Default::default();
            }
        };
        let scale = self.scale();
        let extents = face
            .glyph_extents(&self.coords, glyph_id)
            .unwrap_or_default();
        let ink = Rectangle {
            x: extents.x_bearing * scale,
            y: -extents.y_bearing * scale,
            width: extents.width * scale,
            height: -extents.height * scale,
        };
        let advance = face.glyph_metrics(&self.coords).advance_width(glyph_id);
        let metrics = face.metrics(&self.coords);
        let logical = Rectangle {
            x: 0.0,
            y: -metrics.ascent * scale,
            width: advance * scale,
            height: (metrics.ascent - metrics.descent) * scale,
        };
        (ink, logical)
    }

    fn face_metrics(&self) -> FontMetrics {
        let Ok(face) = self.face() else {
            return FontMetrics::default();
        };
        let scale = self.scale();
        let font_metrics = face.metrics(&self.coords);
        let ascender = font_metrics.ascent * scale;
        let descender = font_metrics.descent * scale;
        let line_gap = font_metrics.leading * scale;
        let yy = self.pattern.matrix.map(|matrix| matrix.yy).unwrap_or(1.0);
        let mut metrics = FontMetrics {
            ascent: ascender * yy,
            descent: -descender * yy,
            height: (ascender - descender + line_gap) * yy,
            underline_thickness: 1.0,
            underline_position: -1.0,
            strikethrough_thickness: 1.0,
            ..Default::default()
        };
        metrics.strikethrough_position = metrics.ascent / 2.0;
        if let Some(underline) = font_metrics.underline {
            metrics.underline_position = underline.offset * scale;
            metrics.underline_thickness = underline.thickness * scale;
        }
        if let Some(strikeout) = font_metrics.strikeout {
            metrics.strikethrough_position = strikeout.offset * scale;
            metrics.strikethrough_thickness = strikeout.thickness * scale;
        }
        metrics
    }

    fn compute_metrics(&self, sample: &str) -> FontMetrics {
        let mut metrics = self.face_metrics();
        let Ok(face) = self.face() else {
            return metrics;
        };
        let scale = self.scale();
        let charmap = face.charmap();
        let glyph_metrics = face.glyph_metrics(&self.coords);
        let advance = |ch: char| {
            let glyph_id = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
            glyph_metrics.advance_width(glyph_id) * scale
        };
        let count = sample.chars().count();
        if count != 0 {
            metrics.approximate_char_width =
                sample.chars().map(&advance).sum::<f32>() / count as f32;
        }
        metrics.approximate_digit_width = ('0'..='9').map(&advance).fold(0.0, f32::max);
        metrics
    }
}

fn face(pattern: &FontPattern) -> Result<FontRef<'_>, FontError> {
    FontRef::from_index(&pattern.data, pattern.index & 0xFFFF).map_err(|e| match e {
        ReadError::InvalidCollectionIndex(_) => FontError::InvalidFaceIndex(pattern.index),
        e => e.into(),
    })
}

// Starts from the default location, moves to the named instance selected by
// the high bits of the face index, then applies the variations of the
// pattern followed by those of the key.
fn variation_coords(font: &FontRef, pattern: &FontPattern, key: &FontsetKey) -> Vec<F2Dot14> {
    let axes = font.axes();
    if axes.is_empty() {
        return Vec::new();
    }
    let mut coords = axes.default_coords();
    let instance = pattern.index >> 16;
    if instance != 0 {
        match font.named_instances().get(instance as usize - 1) {
            Some(instance) => {
                for (coord, value) in coords.iter_mut().zip(instance.user_coords()) {
                    *coord = value;
                }
            }
            None => log::debug!("no named instance {}", instance - 1),
        }
    }
    let variations = [pattern.variations.as_deref(), Some(key.variations.as_str())];
    for variations in variations.into_iter().flatten() {
        axes.apply_settings(parse_variations(variations), &mut coords);
    }
    axes.normalize(&coords)
}

const DEFAULT_SAMPLE: &str = "The quick brown fox jumps over the lazy dog.";

// Sorted by language tag.
const SAMPLES: &[(&str, &str)] = &[
    ("ar", "نص حكيم له سر قاطع وذو شأن عظيم مكتوب على ثوب أخضر ومغلف بجلد أزرق."),
    ("de", "Zwölf Boxkämpfer jagen Viktor quer über den großen Sylter Deich."),
    ("el", "Θέλει αρετή και τόλμη η ελευθερία. (Ανδρέας Κάλβος)"),
    ("en", DEFAULT_SAMPLE),
    ("es", "Jovencillo emponzoñado de whisky: ¡qué figurota exhibe!"),
    ("fr", "Voix ambiguë d'un cœur qui, au zéphyr, préfère les jattes de kiwis."),
    ("he", "דג סקרן שט לו בים זך אך לפתע פגש חבורה נחמדה שצצה כך."),
    ("ja", "いろはにほへと ちりぬるを 色は匂へど 散りぬるを"),
    ("ko", "다람쥐 헌 쳇바퀴에 타고파"),
    ("ru", "В чащах юга жил бы цитрус? Да, но фальшивый экземпляр!"),
    ("zh-cn", "我能吞下玻璃而不伤身体。"),
    ("zh-tw", "我能吞下玻璃而不傷身體。"),
];

/// Returns a string representative of the characters of a language.
///
/// Tags match a sample for the same tag or one of its prefixes ending at
/// a `-`, so `"de-AT"` uses the German sample. Case and `_` separators are
/// ignored.
pub fn sample_string(language: &str) -> &'static str {
    let language = language.to_ascii_lowercase().replace('_', "-");
    SAMPLES
        .iter()
        .filter(|(tag, _)| {
            language
                .strip_prefix(tag)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
        })
        .max_by_key(|(tag, _)| tag.len())
        .map(|(_, sample)| *sample)
        .unwrap_or(DEFAULT_SAMPLE)
}
