//! Mapping of characters to nominal glyph identifiers.
//!
//! The mapping comes from the widest supported subtable of the `cmap`
//! table: Unicode full repertoire subtables are preferred over the Basic
//! Multilingual Plane, which is preferred over Macintosh Roman. Unicode
//! variation sequences are mapped by the format 14 subtable.

use textcore_read::{
    tables::cmap::{Cmap14, CmapIter, CmapSubtable},
    types::GlyphId,
    TableProvider,
};

pub use textcore_read::tables::cmap::MapVariant;

/// Mapping of characters to nominal glyph identifiers.
#[derive(Clone, Default)]
pub struct Charmap<'a> {
    subtable: Option<CmapSubtable<'a>>,
    is_symbol: bool,
    variant_subtable: Option<Cmap14<'a>>,
}

impl<'a> Charmap<'a> {
    /// Creates a new character map from the given font.
    pub fn new(font: &impl TableProvider<'a>) -> Self {
        let cmap = match font.cmap() {
            Ok(cmap) => cmap,
            Err(e) => {
                log::debug!("no character map: {e}");
                return Default::default();
            }
        };
        let (subtable, is_symbol) = match cmap.best_subtable() {
            Some((record, subtable)) => (Some(subtable), record.is_symbol()),
            None => (None, false),
        };
        Self {
            subtable,
            is_symbol,
            variant_subtable: cmap.variation_subtable(),
        }
    }

    /// Returns true if a suitable character mapping is available.
    pub fn has_map(&self) -> bool {
        self.subtable.is_some()
    }

    /// Returns true if a symbol mapping was selected.
    pub fn is_symbol(&self) -> bool {
        self.is_symbol
    }

    /// Returns true if a Unicode variation sequence mapping is available.
    pub fn has_variant_map(&self) -> bool {
        self.variant_subtable.is_some()
    }

    /// Maps a character to a nominal glyph identifier.
    ///
    /// Returns `None` if a mapping does not exist. Symbol fonts map
    /// `U+0000..=U+00FF` through `U+F000..=U+F0FF` as well.
    pub fn map(&self, ch: impl Into<u32>) -> Option<GlyphId> {
        let subtable = self.subtable.as_ref()?;
        let codepoint = ch.into();
        let map = |codepoint: u32| {
            subtable
                .map_codepoint(codepoint)
                .filter(|gid| *gid != GlyphId::NOTDEF)
        };
        map(codepoint).or_else(|| {
            if self.is_symbol && codepoint <= 0x00FF {
                map(codepoint + 0xF000)
            } else {
                None
            }
        })
    }

    /// Returns an iterator over all mappings of codepoint to nominal glyph
    /// identifiers, in increasing codepoint order.
    pub fn mappings(&self) -> Mappings<'a> {
        Mappings(
            self.subtable
                .as_ref()
                .map(|subtable| subtable.iter())
                .unwrap_or(CmapIter::Empty),
        )
    }

    /// Maps a character and variation selector to a nominal glyph identifier.
    ///
    /// Returns `None` if a mapping does not exist.
    pub fn map_variant(&self, ch: impl Into<u32>, selector: impl Into<u32>) -> Option<MapVariant> {
        self.variant_subtable.as_ref()?.map_variant(ch, selector)
    }

    /// Returns an iterator over all mappings of character and variation
    /// selector to nominal glyph identifier.
    pub fn variant_mappings(&self) -> impl Iterator<Item = (u32, u32, MapVariant)> + 'a {
        self.variant_subtable
            .clone()
            .into_iter()
            .flat_map(|cmap14| cmap14.iter())
    }
}

/// Iterator over all mappings of character to nominal glyph identifier.
#[derive(Clone)]
pub struct Mappings<'a>(CmapIter<'a>);

impl Iterator for Mappings<'_> {
    type Item = (u32, GlyphId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (codepoint, gid) = self.0.next()?;
            if gid != GlyphId::NOTDEF {
                return Some((codepoint, gid));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use textcore_read::{types::Tag, FontRef};
    use textcore_test_data::{cmap, font_builder::FontBuilder};

    fn font_with_cmap(cmap: Vec<u8>) -> Vec<u8> {
        FontBuilder::default()
            .add_table(Tag::new(b"head"), textcore_test_data::head(1000, 0))
            .add_table(Tag::new(b"cmap"), cmap)
            .build()
    }

    #[test]
    fn bmp_mapping() {
        let data = font_with_cmap(cmap::table(&[(3, 1, cmap::format4_latin())]));
        let font = FontRef::new(&data).unwrap();
        let charmap = Charmap::new(&font);
        assert!(charmap.has_map());
        assert!(!charmap.is_symbol());
        assert!(!charmap.has_variant_map());
        assert_eq!(charmap.map('M'), Some(GlyphId::new('M' as u16 + 10000)));
        assert_eq!(charmap.map('m'), Some(GlyphId::new(13)));
        assert_eq!(charmap.map('!'), None);
        let mappings = charmap.mappings().collect::<Vec<_>>();
        assert_eq!(mappings.len(), 52);
        assert_eq!(mappings[0], (0x41, GlyphId::new(10065)));
        assert!(mappings.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn widest_subtable_wins() {
        let data = font_with_cmap(cmap::multi_subtable());
        let font = FontRef::new(&data).unwrap();
        let charmap = Charmap::new(&font);
        // the format 12 subtable
        assert_eq!(charmap.map('A'), Some(GlyphId::new(1)));
        assert_eq!(charmap.map('\u{1F600}'), Some(GlyphId::new(7)));
        assert_eq!(charmap.map('a'), None);
        assert_eq!(
            charmap.mappings().map(|(cp, _)| cp).collect::<Vec<_>>(),
            [0x41, 0x42, 0x43, 0x1F600]
        );
    }

    #[test]
    fn variation_sequences() {
        let data = font_with_cmap(cmap::multi_subtable());
        let font = FontRef::new(&data).unwrap();
        let charmap = Charmap::new(&font);
        assert!(charmap.has_variant_map());
        assert_eq!(charmap.map_variant('A', 0xFE00u32), Some(MapVariant::UseDefault));
        assert_eq!(
            charmap.map_variant('B', 0xFE00u32),
            Some(MapVariant::Variant(GlyphId::new(5)))
        );
        assert_eq!(charmap.map_variant('C', 0xFE00u32), None);
        assert_eq!(charmap.variant_mappings().count(), 2);
    }

    #[test]
    fn symbol_subtable() {
        let data = font_with_cmap(cmap::table(&[(3, 0, cmap::format4_latin())]));
        let font = FontRef::new(&data).unwrap();
        let charmap = Charmap::new(&font);
        assert!(charmap.is_symbol());
        assert_eq!(charmap.map('a'), Some(GlyphId::new(1)));
    }

    #[test]
    fn no_cmap() {
        let data = FontBuilder::default()
            .add_table(Tag::new(b"head"), textcore_test_data::head(1000, 0))
            .build();
        let font = FontRef::new(&data).unwrap();
        let charmap = Charmap::new(&font);
        assert!(!charmap.has_map());
        assert_eq!(charmap.map('A'), None);
        assert_eq!(charmap.mappings().count(), 0);
    }
}
