//! Arabic cursive joining.

use icu_properties::{
    props::{GeneralCategory, JoiningType as UnicodeJoiningType},
    CodePointMapData,
};

use crate::{
    char_type::{level_rtl, LEVEL_SENTINEL},
    CharType, Level,
};

/// The joining properties of a character.
///
/// Starts as the Unicode joining type and is refined by [`join_arabic`] to
/// the joins actually made with the neighbors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct JoiningType(u8);

impl JoiningType {
    /// May join to the right.
    pub const JOINS_RIGHT: u8 = 1;
    /// May join to the left.
    pub const JOINS_LEFT: u8 = 1 << 1;
    /// May take Arabic presentation forms.
    pub const ARAB_SHAPES: u8 = 1 << 2;
    pub const TRANSPARENT: u8 = 1 << 3;
    pub const IGNORED: u8 = 1 << 4;
    /// Set on the first character of a mandatory ligature.
    pub const LIGATURED: u8 = 1 << 5;

    /// Non joining, e.g. full stop.
    pub const U: Self = Self(0);
    /// Right joining, e.g. dal.
    pub const R: Self = Self(Self::JOINS_RIGHT | Self::ARAB_SHAPES);
    /// Dual joining, e.g. ain.
    pub const D: Self = Self(Self::JOINS_RIGHT | Self::JOINS_LEFT | Self::ARAB_SHAPES);
    /// Join causing, e.g. tatweel and ZWJ.
    pub const C: Self = Self(Self::JOINS_RIGHT | Self::JOINS_LEFT);
    /// Left joining.
    pub const L: Self = Self(Self::JOINS_LEFT | Self::ARAB_SHAPES);
    /// Transparent, e.g. fatha.
    pub const T: Self = Self(Self::TRANSPARENT | Self::ARAB_SHAPES);
    /// Ignored, e.g. the explicit formatting codes.
    pub const G: Self = Self(Self::IGNORED);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    fn has(self, mask: u8) -> bool {
        self.0 & mask != 0
    }

    fn set(&mut self, mask: u8) {
        self.0 |= mask;
    }

    fn clear(&mut self, mask: u8) {
        self.0 &= !mask;
    }

    pub fn is_ignored(self) -> bool {
        self.0 & (Self::TRANSPARENT | Self::IGNORED) == Self::IGNORED
    }

    /// T and G are skipped when looking for the joining neighbors.
    pub fn is_join_skipped(self) -> bool {
        self.has(Self::TRANSPARENT | Self::IGNORED)
    }

    /// R, D, L and T.
    pub fn is_arab_shapes(self) -> bool {
        self.has(Self::ARAB_SHAPES)
    }

    pub fn is_ligatured(self) -> bool {
        self.has(Self::LIGATURED)
    }

    pub(crate) fn mark_ligatured(&mut self) {
        self.set(Self::LIGATURED);
    }

    /// The presentation form selected by the joins: 0 isolated, 1 final,
    /// 2 initial, 3 medial.
    pub fn join_shape(self) -> usize {
        (self.0 & (Self::JOINS_RIGHT | Self::JOINS_LEFT)) as usize
    }
}

const ZWNJ: char = '\u{200C}';

/// Returns the joining type of a character.
///
/// Characters without a joining type are transparent when they are marks
/// or format characters, ignored when they are explicit formatting codes or
/// boundary neutrals, and non joining otherwise. ZWNJ is non joining.
pub fn joining_type(ch: char, bidi_type: CharType) -> JoiningType {
    match CodePointMapData::<UnicodeJoiningType>::new().get(ch) {
        UnicodeJoiningType::RightJoining => return JoiningType::R,
        UnicodeJoiningType::DualJoining => return JoiningType::D,
        UnicodeJoiningType::JoinCausing => return JoiningType::C,
        UnicodeJoiningType::LeftJoining => return JoiningType::L,
        UnicodeJoiningType::Transparent => return JoiningType::T,
        _ => (),
    }
    if ch == ZWNJ {
        return JoiningType::U;
    }
    match CodePointMapData::<GeneralCategory>::new().get(ch) {
        GeneralCategory::NonspacingMark | GeneralCategory::EnclosingMark | GeneralCategory::Format => {
            return JoiningType::T
        }
        _ => (),
    }
    match bidi_type {
        CharType::BN
        | CharType::LRE
        | CharType::RLE
        | CharType::LRO
        | CharType::RLO
        | CharType::PDF
        | CharType::LRI
        | CharType::RLI
        | CharType::FSI
        | CharType::PDI => JoiningType::G,
        _ => JoiningType::U,
    }
}

/// Returns the joining types of a string.
pub fn get_joining_types(text: &[char], types: &[CharType]) -> Vec<JoiningType> {
    text.iter()
        .zip(types)
        .map(|(ch, ty)| joining_type(*ch, *ty))
        .collect()
}

/// The Arabic cursive joining algorithm, rules R1 to R7.
///
/// Clears the join bits of `props` that are not matched by a neighbor.
/// Characters only join within the same level; explicit codes and boundary
/// neutrals take the level of their surroundings. Skipped characters
/// between two joined ones receive both join bits so marks can later be
/// placed on a tatweel.
pub fn join_arabic(types: &[CharType], levels: &[Level], props: &mut [JoiningType]) {
    let mut saved = 0;
    let mut saved_level = LEVEL_SENTINEL;
    let mut saved_shapes = false;
    let mut saved_joins_following_mask = 0u8;
    let mut joins = false;

    for i in 0..props.len() {
        if props[i].is_ignored() {
            continue;
        }
        let mut disjoin = false;
        let shapes = props[i].is_arab_shapes();
        let level = match (types.get(i), levels.get(i)) {
            (Some(ty), Some(level)) if !ty.is_explicit_or_bn() => *level,
            _ => LEVEL_SENTINEL,
        };
        let level_match =
            saved_level == level || saved_level == LEVEL_SENTINEL || level == LEVEL_SENTINEL;
        if joins && !level_match {
            disjoin = true;
            joins = false;
        }

        if !props[i].is_join_skipped() {
            let joins_preceding_mask = if level_rtl(level) != 0 {
                JoiningType::JOINS_RIGHT
            } else {
                JoiningType::JOINS_LEFT
            };
            if !joins {
                if shapes {
                    props[i].clear(joins_preceding_mask);
                }
            } else if !props[i].has(joins_preceding_mask) {
                disjoin = true;
            } else {
                for prop in &mut props[saved + 1..i] {
                    prop.set(joins_preceding_mask | saved_joins_following_mask);
                }
            }
        }

        if disjoin && saved_shapes {
            props[saved].clear(saved_joins_following_mask);
        }

        if !props[i].is_join_skipped() {
            saved = i;
            saved_level = level;
            saved_shapes = shapes;
            saved_joins_following_mask = if level_rtl(level) != 0 {
                JoiningType::JOINS_LEFT
            } else {
                JoiningType::JOINS_RIGHT
            };
            joins = props[i].has(saved_joins_following_mask);
        }
    }
    if joins && saved_shapes {
        props[saved].clear(saved_joins_following_mask);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::get_bidi_types;

    fn joined(text: &[char], level: Level) -> Vec<usize> {
        let types = get_bidi_types(text);
        let levels = vec![level; text.len()];
        let mut props = get_joining_types(text, &types);
        join_arabic(&types, &levels, &mut props);
        props.iter().map(|p| p.join_shape()).collect()
    }

    #[test]
    fn unicode_joining_types() {
        let text = [
            '\u{0627}', '\u{0628}', '\u{0640}', '\u{064E}', '.', '\u{0001}', '\u{0301}', '\u{200C}',
            '\u{202B}',
        ];
        let types = get_bidi_types(&text);
        assert_eq!(
            get_joining_types(&text, &types),
            [
                JoiningType::R,
                JoiningType::D,
                JoiningType::C,
                JoiningType::T,
                JoiningType::U,
                JoiningType::G,
                JoiningType::T,
                JoiningType::U,
                JoiningType::T
            ]
        );
    }

    #[test]
    fn lam_alef_joins() {
        // lam takes its initial form, alef its final form
        assert_eq!(joined(&['\u{0644}', '\u{0627}'], 1), [2, 1]);
    }

    #[test]
    fn three_dual_joining_letters() {
        // beh beh beh: initial, medial, final
        assert_eq!(joined(&['\u{0628}'; 3], 1), [2, 3, 1]);
        // a lone letter stays isolated
        assert_eq!(joined(&['\u{0628}'], 1), [0]);
    }

    #[test]
    fn right_joining_breaks_the_chain() {
        // alef never joins the following letter
        assert_eq!(joined(&['\u{0628}', '\u{0627}', '\u{0628}'], 1), [2, 1, 0]);
    }

    #[test]
    fn marks_are_transparent() {
        let text = ['\u{0628}', '\u{064E}', '\u{0628}'];
        let types = get_bidi_types(&text);
        let mut props = get_joining_types(&text, &types);
        join_arabic(&types, &[1, 1, 1], &mut props);
        assert_eq!(props[0].join_shape(), 2);
        assert_eq!(props[2].join_shape(), 1);
        // the mark gets both join bits
        assert_eq!(props[1].join_shape(), 3);
    }

    #[test]
    fn level_change_disjoins() {
        let text = ['\u{0628}', '\u{0628}'];
        let types = get_bidi_types(&text);
        let mut props = get_joining_types(&text, &types);
        join_arabic(&types, &[1, 3], &mut props);
        assert_eq!(props.iter().map(|p| p.join_shape()).collect::<Vec<_>>(), [0, 0]);
    }
}
