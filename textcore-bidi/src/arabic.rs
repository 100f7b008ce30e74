//! Arabic presentation forms and mandatory ligatures.

use crate::{
    arabic_tables::{ARABIC_SHAPING, FIRST_ARABIC_SHAPE, LAST_ARABIC_SHAPE, MANDATORY_LIGATURES},
    char_type::level_rtl,
    JoiningType, Level, Options,
};

/// Placed in the slot of a character removed by a ligature.
pub(crate) const CHAR_FILL: char = '\u{FEFF}';

/// Returns the presentation form of `ch` for a join shape, or `ch` itself
/// if it has none.
pub(crate) fn presentation_form(ch: char, shape: usize) -> char {
    let cp = ch as u32;
    if !(FIRST_ARABIC_SHAPE..=LAST_ARABIC_SHAPE).contains(&cp) {
        return ch;
    }
    ARABIC_SHAPING
        .get((cp - FIRST_ARABIC_SHAPE) as usize)
        .and_then(|forms| forms.get(shape))
        .and_then(|form| char::from_u32(*form as u32))
        .unwrap_or(ch)
}

fn mandatory_ligature(first: char, second: char) -> Option<char> {
    let key = [first as u32, second as u32];
    MANDATORY_LIGATURES
        .binary_search_by(|(pair, _)| [pair[0] as u32, pair[1] as u32].cmp(&key))
        .ok()
        .and_then(|ix| char::from_u32(MANDATORY_LIGATURES[ix].1 as u32))
}

/// Arabic shaping according to `flags`.
///
/// With [`Options::SHAPE_ARAB_PRES`] every character that may shape is
/// replaced by the presentation form selected by its joins. With
/// [`Options::SHAPE_ARAB_LIGA`] pairs of presentation forms at the same odd
/// level that form a mandatory ligature are replaced by the ligature in the
/// second slot and U+FEFF in the first, which is flagged as ligatured.
pub fn shape_arabic(flags: Options, levels: &[Level], props: &mut [JoiningType], text: &mut [char]) {
    if flags.contains(Options::SHAPE_ARAB_PRES) {
        for (prop, ch) in props.iter().zip(text.iter_mut()) {
            if prop.is_arab_shapes() {
                *ch = presentation_form(*ch, prop.join_shape());
            }
        }
    }
    if flags.contains(Options::SHAPE_ARAB_LIGA) {
        let len = levels.len().min(text.len()).min(props.len());
        for i in 0..len.saturating_sub(1) {
            if level_rtl(levels[i]) == 0 || levels[i] != levels[i + 1] {
                continue;
            }
            if let Some(ligature) = mandatory_ligature(text[i], text[i + 1]) {
                text[i] = CHAR_FILL;
                props[i].mark_ligatured();
                text[i + 1] = ligature;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{get_bidi_types, get_joining_types, join_arabic};

    fn shaped(text: &[char], level: Level, flags: Options) -> (Vec<char>, Vec<JoiningType>) {
        let types = get_bidi_types(text);
        let levels = vec![level; text.len()];
        let mut props = get_joining_types(text, &types);
        join_arabic(&types, &levels, &mut props);
        let mut text = text.to_vec();
        shape_arabic(flags, &levels, &mut props, &mut text);
        (text, props)
    }

    #[test]
    fn lam_alef_ligature() {
        let (text, props) = shaped(
            &['\u{0644}', '\u{0627}'],
            1,
            Options::SHAPE_ARAB_PRES | Options::SHAPE_ARAB_LIGA,
        );
        assert_eq!(text, ['\u{FEFF}', '\u{FEFB}']);
        assert!(props[0].is_ligatured());
        assert!(!props[1].is_ligatured());
    }

    #[test]
    fn no_ligature_at_even_levels() {
        let (text, _) = shaped(
            &['\u{0644}', '\u{0627}'],
            2,
            Options::SHAPE_ARAB_PRES | Options::SHAPE_ARAB_LIGA,
        );
        // in left to right text the pair neither joins nor ligates
        assert_eq!(text, ['\u{FEDD}', '\u{FE8D}']);
    }

    #[test]
    fn presentation_forms() {
        let (text, _) = shaped(&['\u{0628}'; 3], 1, Options::SHAPE_ARAB_PRES);
        assert_eq!(text, ['\u{FE91}', '\u{FE92}', '\u{FE90}']);
        let (text, _) = shaped(&['\u{0628}'], 1, Options::SHAPE_ARAB_PRES);
        assert_eq!(text, ['\u{FE8F}']);
        // no presentation forms requested
        let (text, _) = shaped(&['\u{0628}'; 2], 1, Options::SHAPE_ARAB_LIGA);
        assert_eq!(text, ['\u{0628}'; 2]);
    }

    #[test]
    fn forms_are_a_function_of_shape() {
        for shape in 0..4 {
            assert_eq!(presentation_form('a', shape), 'a');
            assert_eq!(presentation_form('\u{0644}', shape), presentation_form('\u{0644}', shape));
        }
        // hamza only has an isolated form
        assert_eq!(presentation_form('\u{0621}', 0), '\u{FE80}');
        assert_eq!(presentation_form('\u{0621}', 2), '\u{0621}');
    }

    #[test]
    fn ligature_table_is_sorted() {
        assert!(MANDATORY_LIGATURES.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(mandatory_ligature('\u{FEE0}', '\u{FE8E}'), Some('\u{FEFC}'));
        assert_eq!(mandatory_ligature('\u{FEE0}', '\u{FE8D}'), None);
    }
}
