//! The Unicode Bidirectional Algorithm and Arabic shaping.
//!
//! This crate resolves the embedding levels of a paragraph following
//! [UAX #9](https://www.unicode.org/reports/tr9/), reorders lines for
//! display and performs the shaping steps that depend on the resolved
//! levels: Arabic cursive joining, presentation form substitution,
//! mandatory ligatures and mirroring.
//!
//! Character properties come from the `icu_properties` compiled data.
//!
//! # Example
//!
//! ```
//! use textcore_bidi::{logical_to_visual, CharType, Options};
//!
//! let text: Vec<char> = "abc \u{05D0}\u{05D1}\u{05D2}".chars().collect();
//! let mut base_dir = CharType::ON;
//! let (visual, _) = logical_to_visual(Options::DEFAULT, &text, &mut base_dir);
//! assert_eq!(base_dir, CharType::LTR);
//! assert_eq!(visual.visual_to_logical, [0, 1, 2, 3, 6, 5, 4]);
//! ```

#![forbid(unsafe_code)]

mod arabic;
mod arabic_tables;
mod bracket;
mod char_type;
mod joining;
mod paragraph;
mod reorder;
mod run;
mod shape;

pub use arabic::shape_arabic;
pub use bracket::{bracket, get_bracket_types, BracketType};
pub use char_type::{bidi_type, get_bidi_types, masks, CharType, Level, ParType, MAX_EXPLICIT_LEVEL};
pub use joining::{get_joining_types, join_arabic, joining_type, JoiningType};
pub use paragraph::get_par_embedding_levels;
pub use reorder::{remove_bidi_marks, reorder_line};
pub use shape::{mirror_char, shape, shape_mirroring};

const CHAR_LRM: char = '\u{200E}';
const CHAR_RLM: char = '\u{200F}';

/// Flags controlling reordering and shaping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Options(u32);

impl Options {
    /// Replace mirrored characters at odd levels (rule L4).
    pub const SHAPE_MIRRORING: Self = Self(1);
    /// Keep non spacing marks after their base character in right to left
    /// runs (rule L3).
    pub const REORDER_NSM: Self = Self(1 << 1);
    /// Substitute Arabic presentation forms.
    pub const SHAPE_ARAB_PRES: Self = Self(1 << 8);
    /// Form the mandatory Arabic ligatures.
    pub const SHAPE_ARAB_LIGA: Self = Self(1 << 9);
    /// Shaping for grid terminals without mark rendering. Reserved, it has
    /// no effect.
    pub const SHAPE_ARAB_CONSOLE: Self = Self(1 << 10);
    /// Remove the bidi marks from the visual output.
    pub const REMOVE_SPECIALS: Self = Self(1 << 18);

    /// Everything except console shaping.
    pub const DEFAULT: Self = Self(
        Self::SHAPE_MIRRORING.0
            | Self::REORDER_NSM.0
            | Self::REMOVE_SPECIALS.0
            | Self::SHAPE_ARAB_PRES.0
            | Self::SHAPE_ARAB_LIGA.0,
    );

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & (Self::DEFAULT.0 | Self::SHAPE_ARAB_CONSOLE.0))
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::ops::BitOr for Options {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Options {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::Sub for Options {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 & !rhs.0)
    }
}

/// The visual form of a line.
///
/// With [`Options::REMOVE_SPECIALS`] the bidi marks are dropped from
/// `text`, so it can be shorter than the input; positions still refer to
/// the input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Visual {
    /// The shaped and reordered text.
    pub text: Vec<char>,
    /// For each visual position, the logical position it comes from.
    pub visual_to_logical: Vec<usize>,
    /// The resolved level of each logical position.
    pub embedding_levels: Vec<Level>,
}

impl Visual {
    /// Inverts [`visual_to_logical`](Self::visual_to_logical).
    ///
    /// Logical positions whose character was removed map to `None`.
    pub fn logical_to_visual(&self) -> Vec<Option<usize>> {
        let len = self.embedding_levels.len().max(self.visual_to_logical.len());
        let mut out = vec![None; len];
        for (visual, logical) in self.visual_to_logical.iter().enumerate() {
            if let Some(slot) = out.get_mut(*logical) {
                *slot = Some(visual);
            }
        }
        out
    }
}

/// Converts a single line paragraph from logical to visual order.
///
/// This runs the full pipeline: bidi and bracket types, embedding levels,
/// Arabic joining, shaping and line reordering. Multi paragraph text must be
/// split first, carrying the resolved `base_dir` from one paragraph to the
/// next.
///
/// With [`Options::REMOVE_SPECIALS`], explicit formatting codes, isolate
/// controls, boundary neutrals and the LRM and RLM marks are removed from
/// the visual text after reordering.
///
/// Returns the visual line and the highest level plus one.
pub fn logical_to_visual(flags: Options, text: &[char], base_dir: &mut ParType) -> (Visual, Level) {
    let types = get_bidi_types(text);
    let brackets = get_bracket_types(text, &types);
    let (mut levels, max_level) = get_par_embedding_levels(&types, &brackets, base_dir);

    let mut visual_to_logical: Vec<usize> = (0..text.len()).collect();
    let mut visual = text.to_vec();

    let mut joining = get_joining_types(text, &types);
    join_arabic(&types, &levels, &mut joining);
    shape(flags, &levels, &mut joining, &mut visual);

    reorder_line(
        flags,
        &types,
        text.len(),
        0,
        *base_dir,
        &mut levels,
        Some(&mut visual),
        Some(&mut visual_to_logical),
    );
    if flags.contains(Options::REMOVE_SPECIALS) {
        remove_bidi_marks(&mut visual, None, Some(&mut visual_to_logical), None);
    }
    (
        Visual {
            text: visual,
            visual_to_logical,
            embedding_levels: levels,
        },
        max_level,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn mixed_line() {
        let mut base_dir = CharType::ON;
        let (visual, max_level) =
            logical_to_visual(Options::DEFAULT, &chars("ab \u{05D0}\u{05D1}"), &mut base_dir);
        assert_eq!(base_dir, CharType::LTR);
        assert_eq!(visual.text, chars("ab \u{05D1}\u{05D0}"));
        assert_eq!(visual.visual_to_logical, [0, 1, 2, 4, 3]);
        assert_eq!(
            visual.logical_to_visual(),
            [Some(0), Some(1), Some(2), Some(4), Some(3)]
        );
        assert_eq!(visual.embedding_levels, [0, 0, 0, 1, 1]);
        assert_eq!(max_level, 2);
    }

    #[test]
    fn rtl_line_mirrors_brackets() {
        let mut base_dir = CharType::RTL;
        let (visual, _) = logical_to_visual(Options::DEFAULT, &chars("(\u{05D0})"), &mut base_dir);
        // reversed, then mirrored back into reading order
        assert_eq!(visual.text, chars("(\u{05D0})"));
        assert_eq!(visual.visual_to_logical, [2, 1, 0]);
        let (visual, _) = logical_to_visual(
            Options::DEFAULT - Options::SHAPE_MIRRORING,
            &chars("(\u{05D0})"),
            &mut base_dir,
        );
        assert_eq!(visual.text, chars(")\u{05D0}("));
    }

    #[test]
    fn arabic_lam_alef() {
        let mut base_dir = CharType::ON;
        let (visual, _) =
            logical_to_visual(Options::DEFAULT, &['\u{0644}', '\u{0627}'], &mut base_dir);
        assert_eq!(base_dir, CharType::RTL);
        // the fill character left in place of the lam is a boundary
        // neutral and is removed with the marks
        assert_eq!(visual.text, ['\u{FEFB}']);
        assert_eq!(visual.visual_to_logical, [1]);
        assert_eq!(visual.embedding_levels, [1, 1]);
        let (visual, _) = logical_to_visual(
            Options::DEFAULT - Options::REMOVE_SPECIALS,
            &['\u{0644}', '\u{0627}'],
            &mut base_dir,
        );
        assert_eq!(visual.text, ['\u{FEFB}', '\u{FEFF}']);
        assert_eq!(visual.visual_to_logical, [1, 0]);
    }

    #[test]
    fn marks_are_removed() {
        let text = chars("ab\u{200E}\u{05D0}\u{05D1}");
        let mut base_dir = CharType::ON;
        let (visual, _) = logical_to_visual(Options::DEFAULT, &text, &mut base_dir);
        assert_eq!(visual.text, chars("ab\u{05D1}\u{05D0}"));
        assert_eq!(visual.visual_to_logical, [0, 1, 4, 3]);
        assert_eq!(visual.embedding_levels, [0, 0, 0, 1, 1]);
        assert_eq!(
            visual.logical_to_visual(),
            [Some(0), Some(1), None, Some(3), Some(2)]
        );
        // kept without the flag
        let (visual, _) = logical_to_visual(
            Options::DEFAULT - Options::REMOVE_SPECIALS,
            &text,
            &mut base_dir,
        );
        assert_eq!(visual.text, chars("ab\u{200E}\u{05D1}\u{05D0}"));
        assert_eq!(visual.visual_to_logical, [0, 1, 2, 4, 3]);
    }

    #[test]
    fn leading_byte_order_mark() {
        let mut base_dir = CharType::LTR;
        let (visual, max_level) =
            logical_to_visual(Options::DEFAULT, &chars("\u{FEFF}ab"), &mut base_dir);
        assert_eq!(visual.text, chars("ab"));
        assert_eq!(visual.visual_to_logical, [1, 2]);
        assert_eq!(visual.embedding_levels, [0, 0, 0]);
        assert_eq!(max_level, 1);
    }

    #[test]
    fn empty_line() {
        let mut base_dir = CharType::ON;
        let (visual, max_level) = logical_to_visual(Options::DEFAULT, &[], &mut base_dir);
        assert_eq!(visual, Visual::default());
        assert_eq!(max_level, 1);
        assert_eq!(base_dir, CharType::ON);
    }

    #[test]
    fn options() {
        assert!(Options::DEFAULT.contains(Options::SHAPE_ARAB_LIGA));
        assert!(!Options::DEFAULT.contains(Options::SHAPE_ARAB_CONSOLE));
        let flags = Options::REORDER_NSM | Options::SHAPE_MIRRORING;
        assert_eq!(flags.bits(), 3);
        assert_eq!(Options::from_bits_truncate(u32::MAX), Options::DEFAULT | Options::SHAPE_ARAB_CONSOLE);
    }
}
