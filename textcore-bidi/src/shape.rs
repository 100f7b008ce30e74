//! Shaping that depends on the resolved levels.

use icu_properties::{props::BidiMirroringGlyph, CodePointMapData};

use crate::{arabic::shape_arabic, char_type::level_rtl, JoiningType, Level, Options};

/// Returns the mirrored counterpart of a character, if it has one.
pub fn mirror_char(ch: char) -> Option<char> {
    CodePointMapData::<BidiMirroringGlyph>::new()
        .get(ch)
        .mirroring_glyph
}

/// Replaces the characters at odd levels by their mirrored counterparts
/// (rule L4).
pub fn shape_mirroring(levels: &[Level], text: &mut [char]) {
    for (level, ch) in levels.iter().zip(text.iter_mut()) {
        if level_rtl(*level) != 0 {
            if let Some(mirror) = mirror_char(*ch) {
                *ch = mirror;
            }
        }
    }
}

/// Performs the shaping that depends on the embedding levels.
///
/// Arabic shaping is skipped when `props` is empty; mirroring is done with
/// [`Options::SHAPE_MIRRORING`].
pub fn shape(flags: Options, levels: &[Level], props: &mut [JoiningType], text: &mut [char]) {
    if !props.is_empty() {
        shape_arabic(flags, levels, props, text);
    }
    if flags.contains(Options::SHAPE_MIRRORING) {
        shape_mirroring(levels, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirroring_is_involutive() {
        for ch in ['(', ')', '[', '<', '\u{00AB}', '\u{2264}', '\u{2208}'] {
            let mirror = mirror_char(ch).unwrap();
            assert_ne!(mirror, ch);
            assert_eq!(mirror_char(mirror), Some(ch));
        }
        assert_eq!(mirror_char('a'), None);
    }

    #[test]
    fn only_odd_levels_mirror() {
        let mut text = ['(', '(', ')'];
        shape_mirroring(&[0, 1, 2], &mut text);
        assert_eq!(text, ['(', ')', ')']);
    }

    #[test]
    fn shape_without_props() {
        let mut text = ['\u{0628}', '['];
        shape(Options::DEFAULT, &[1, 1], &mut [], &mut text);
        assert_eq!(text, ['\u{0628}', ']']);
        let mut text = ['['];
        shape(Options::DEFAULT - Options::SHAPE_MIRRORING, &[1], &mut [], &mut text);
        assert_eq!(text, ['[']);
    }
}
