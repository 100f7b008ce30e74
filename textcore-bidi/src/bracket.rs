//! Paired bracket properties.

use icu_properties::{
    props::{BidiMirroringGlyph, BidiPairedBracketType},
    CodePointMapData,
};

use crate::CharType;

/// Identifies a bracket pair, with the high bit set for opening brackets.
///
/// Both brackets of a pair share the same id, the code point of the
/// opening bracket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct BracketType(u32);

impl BracketType {
    pub const NONE: Self = Self(0);
    const OPEN_MASK: u32 = 1 << 31;

    pub fn is_open(self) -> bool {
        self.0 & Self::OPEN_MASK != 0
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// The code point of the opening bracket of the pair.
    pub fn id(self) -> u32 {
        self.0 & !Self::OPEN_MASK
    }
}

// canonical equivalents of the angle brackets are matched with each other
fn canonical_bracket(ch: char) -> char {
    match ch {
        '\u{2329}' => '\u{3008}',
        '\u{232A}' => '\u{3009}',
        _ => ch,
    }
}

/// Returns the bracket type of a character, or [`BracketType::NONE`] if it
/// is not a paired bracket.
pub fn bracket(ch: char) -> BracketType {
    let props = CodePointMapData::<BidiMirroringGlyph>::new().get(ch);
    match props.paired_bracket_type {
        BidiPairedBracketType::Open => {
            BracketType(canonical_bracket(ch) as u32 | BracketType::OPEN_MASK)
        }
        BidiPairedBracketType::Close => match props.mirroring_glyph {
            Some(open) => BracketType(canonical_bracket(open) as u32),
            None => BracketType::NONE,
        },
        _ => BracketType::NONE,
    }
}

/// Returns the bracket types of a string.
///
/// Only characters of type `ON` can be brackets, other characters get
/// [`BracketType::NONE`].
pub fn get_bracket_types(text: &[char], types: &[CharType]) -> Vec<BracketType> {
    text.iter()
        .zip(types)
        .map(|(ch, ty)| {
            if *ty == CharType::ON {
                bracket(*ch)
            } else {
                BracketType::NONE
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::get_bidi_types;

    #[test]
    fn pairs_share_ids() {
        for (open, close) in [('(', ')'), ('[', ']'), ('{', '}'), ('\u{2329}', '\u{3009}')] {
            let open = bracket(open);
            let close = bracket(close);
            assert!(open.is_open());
            assert!(!close.is_open() && !close.is_none());
            assert_eq!(open.id(), close.id());
        }
        assert_eq!(bracket('(').id(), '(' as u32);
        assert!(bracket('a').is_none());
        assert!(bracket('<').is_none());
    }

    #[test]
    fn only_neutrals_are_brackets() {
        let text = ['a', '(', 'b', ')'];
        let mut types = get_bidi_types(&text);
        let brackets = get_bracket_types(&text, &types);
        assert!(brackets[1].is_open() && !brackets[3].is_none());
        types[3] = CharType::RTL;
        let brackets = get_bracket_types(&text, &types);
        assert!(brackets[3].is_none());
    }
}
