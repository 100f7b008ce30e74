//! Bidirectional character types.

use icu_properties::{props::BidiClass, CodePointMapData};

/// An embedding level.
///
/// Even levels are left to right, odd levels right to left.
pub type Level = i8;

/// The maximum embedding level assigned by explicit formatting characters.
pub const MAX_EXPLICIT_LEVEL: Level = 125;

/// The maximum number of distinct resolved levels, 0 to 126.
pub(crate) const MAX_RESOLVED_LEVELS: usize = 127;

/// Level of list sentinels and of runs removed by rule X9.
pub(crate) const LEVEL_SENTINEL: Level = -1;

/// Returns 1 for right to left levels, 0 otherwise.
pub(crate) fn level_rtl(level: Level) -> Level {
    level & 1
}

/// Returns the base level of a direction: 1 for right to left types.
pub(crate) fn dir_to_level(dir: CharType) -> Level {
    dir.is_rtl() as Level
}

/// Returns `RTL` for odd levels and `LTR` for even levels.
pub(crate) fn level_to_dir(level: Level) -> CharType {
    if level_rtl(level) != 0 {
        CharType::RTL
    } else {
        CharType::LTR
    }
}

/// The property bits that character types are built from.
pub mod masks {
    pub const RTL: u32 = 0x0000_0001;
    pub const ARABIC: u32 = 0x0000_0002;

    // each type is exactly one of these
    pub const STRONG: u32 = 0x0000_0010;
    pub const WEAK: u32 = 0x0000_0020;
    pub const NEUTRAL: u32 = 0x0000_0040;
    pub const SENTINEL: u32 = 0x0000_0080;

    pub const LETTER: u32 = 0x0000_0100;
    pub const NUMBER: u32 = 0x0000_0200;
    pub const NUMSEPTER: u32 = 0x0000_0400;
    pub const SPACE: u32 = 0x0000_0800;
    pub const EXPLICIT: u32 = 0x0000_1000;
    // only with SPACE
    pub const SEPARATOR: u32 = 0x0000_2000;
    // only with EXPLICIT
    pub const OVERRIDE: u32 = 0x0000_4000;
    pub const ISOLATE: u32 = 0x0000_8000;

    pub const ES: u32 = 0x0001_0000;
    pub const ET: u32 = 0x0002_0000;
    pub const CS: u32 = 0x0004_0000;
    pub const NSM: u32 = 0x0008_0000;
    pub const BN: u32 = 0x0010_0000;
    pub const BS: u32 = 0x0020_0000;
    pub const SS: u32 = 0x0040_0000;
    pub const WS: u32 = 0x0080_0000;

    /// Never set by this crate.
    pub const PRIVATE: u32 = 0x0100_0000;
    pub const FIRST: u32 = 0x0200_0000;
}

/// The bidirectional type of a character, as a set of property bits.
///
/// Types are compared by equality with the named constants; the predicates
/// test property bits shared by several types.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CharType(u32);

/// The direction of a paragraph.
///
/// Strong values (`LTR`, `RTL`) force the direction; weak and neutral values
/// request detection from the first strong character, falling back to the
/// given direction.
pub type ParType = CharType;

impl CharType {
    pub const LTR: Self = Self(masks::STRONG | masks::LETTER);
    pub const RTL: Self = Self(masks::STRONG | masks::LETTER | masks::RTL);
    pub const AL: Self = Self(masks::STRONG | masks::LETTER | masks::RTL | masks::ARABIC);
    pub const EN: Self = Self(masks::WEAK | masks::NUMBER);
    pub const AN: Self = Self(masks::WEAK | masks::NUMBER | masks::ARABIC);
    pub const ES: Self = Self(masks::WEAK | masks::NUMSEPTER | masks::ES);
    pub const ET: Self = Self(masks::WEAK | masks::NUMSEPTER | masks::ET);
    pub const CS: Self = Self(masks::WEAK | masks::NUMSEPTER | masks::CS);
    pub const NSM: Self = Self(masks::WEAK | masks::NSM);
    pub const BN: Self = Self(masks::WEAK | masks::SPACE | masks::BN);
    pub const ON: Self = Self(masks::NEUTRAL);
    pub const WS: Self = Self(masks::NEUTRAL | masks::SPACE | masks::WS);
    pub const BS: Self = Self(masks::NEUTRAL | masks::SPACE | masks::SEPARATOR | masks::BS);
    pub const SS: Self = Self(masks::NEUTRAL | masks::SPACE | masks::SEPARATOR | masks::SS);
    pub const LRE: Self = Self(masks::STRONG | masks::EXPLICIT);
    pub const RLE: Self = Self(masks::STRONG | masks::EXPLICIT | masks::RTL);
    pub const LRO: Self = Self(masks::STRONG | masks::EXPLICIT | masks::OVERRIDE);
    pub const RLO: Self = Self(masks::STRONG | masks::EXPLICIT | masks::OVERRIDE | masks::RTL);
    pub const PDF: Self = Self(masks::WEAK | masks::EXPLICIT);
    pub const LRI: Self = Self(masks::NEUTRAL | masks::ISOLATE);
    pub const RLI: Self = Self(masks::NEUTRAL | masks::ISOLATE | masks::RTL);
    pub const FSI: Self = Self(masks::NEUTRAL | masks::ISOLATE | masks::FIRST);
    pub const PDI: Self = Self(masks::NEUTRAL | masks::WEAK | masks::ISOLATE);
    /// Weak left to right, for paragraph directions.
    pub const WLTR: Self = Self(masks::WEAK);
    /// Weak right to left, for paragraph directions.
    pub const WRTL: Self = Self(masks::WEAK | masks::RTL);

    pub(crate) const SENTINEL: Self = Self(masks::SENTINEL);

    /// Returns the raw property bits.
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    const fn has(self, mask: u32) -> bool {
        self.0 & mask != 0
    }

    pub fn is_strong(self) -> bool {
        self.has(masks::STRONG)
    }

    pub fn is_weak(self) -> bool {
        self.has(masks::WEAK)
    }

    /// RTL, AL, RLE, RLO, RLI and WRTL.
    pub fn is_rtl(self) -> bool {
        self.has(masks::RTL)
    }

    /// AL and AN.
    pub fn is_arabic(self) -> bool {
        self.has(masks::ARABIC)
    }

    /// L, R and AL.
    pub fn is_letter(self) -> bool {
        self.has(masks::LETTER)
    }

    /// EN and AN.
    pub fn is_number(self) -> bool {
        self.has(masks::NUMBER)
    }

    /// LRI, RLI, FSI and PDI.
    pub fn is_isolate(self) -> bool {
        self.has(masks::ISOLATE)
    }

    pub(crate) fn is_neutral(self) -> bool {
        self.has(masks::NEUTRAL)
    }

    pub(crate) fn is_sentinel(self) -> bool {
        self.has(masks::SENTINEL)
    }

    /// ES, ET and CS.
    pub(crate) fn is_number_separator_or_terminator(self) -> bool {
        self.has(masks::NUMSEPTER)
    }

    /// BS and SS.
    pub(crate) fn is_separator(self) -> bool {
        self.has(masks::SEPARATOR)
    }

    pub(crate) fn is_override(self) -> bool {
        self.has(masks::OVERRIDE)
    }

    pub(crate) fn is_es_or_cs(self) -> bool {
        self.has(masks::ES | masks::CS)
    }

    pub(crate) fn is_explicit_or_bn(self) -> bool {
        self.has(masks::EXPLICIT | masks::BN)
    }

    pub(crate) fn is_explicit_or_bn_or_nsm(self) -> bool {
        self.has(masks::EXPLICIT | masks::BN | masks::NSM)
    }

    pub(crate) fn is_explicit_or_bn_or_ws(self) -> bool {
        self.has(masks::EXPLICIT | masks::BN | masks::WS)
    }

    pub(crate) fn is_explicit_or_separator_or_bn_or_ws(self) -> bool {
        self.has(masks::EXPLICIT | masks::SEPARATOR | masks::BN | masks::WS)
    }

    /// EN and AN are treated as R when resolving neutrals.
    pub(crate) fn number_to_rtl(self) -> Self {
        if self.is_number() {
            Self::RTL
        } else {
            self
        }
    }

    /// The override status of an explicit code: LRO to LTR, RLO to RTL,
    /// anything else to ON.
    pub(crate) fn explicit_to_override_dir(self) -> Self {
        if self.is_override() {
            level_to_dir(dir_to_level(self))
        } else {
            Self::ON
        }
    }

    fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::LTR => "LTR",
            Self::RTL => "RTL",
            Self::AL => "AL",
            Self::EN => "EN",
            Self::AN => "AN",
            Self::ES => "ES",
            Self::ET => "ET",
            Self::CS => "CS",
            Self::NSM => "NSM",
            Self::BN => "BN",
            Self::ON => "ON",
            Self::WS => "WS",
            Self::BS => "BS",
            Self::SS => "SS",
            Self::LRE => "LRE",
            Self::RLE => "RLE",
            Self::LRO => "LRO",
            Self::RLO => "RLO",
            Self::PDF => "PDF",
            Self::LRI => "LRI",
            Self::RLI => "RLI",
            Self::FSI => "FSI",
            Self::PDI => "PDI",
            Self::WLTR => "WLTR",
            Self::WRTL => "WRTL",
            Self::SENTINEL => "SENTINEL",
            _ => return None,
        })
    }
}

impl std::fmt::Debug for CharType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "CharType(0x{:08X})", self.0),
        }
    }
}

impl std::fmt::Display for CharType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl From<BidiClass> for CharType {
    fn from(class: BidiClass) -> Self {
        match class {
            BidiClass::LeftToRight => Self::LTR,
            BidiClass::RightToLeft => Self::RTL,
            BidiClass::EuropeanNumber => Self::EN,
            BidiClass::EuropeanSeparator => Self::ES,
            BidiClass::EuropeanTerminator => Self::ET,
            BidiClass::ArabicNumber => Self::AN,
            BidiClass::CommonSeparator => Self::CS,
            BidiClass::ParagraphSeparator => Self::BS,
            BidiClass::SegmentSeparator => Self::SS,
            BidiClass::WhiteSpace => Self::WS,
            BidiClass::OtherNeutral => Self::ON,
            BidiClass::BoundaryNeutral => Self::BN,
            BidiClass::NonspacingMark => Self::NSM,
            BidiClass::ArabicLetter => Self::AL,
            BidiClass::LeftToRightOverride => Self::LRO,
            BidiClass::RightToLeftOverride => Self::RLO,
            BidiClass::LeftToRightEmbedding => Self::LRE,
            BidiClass::RightToLeftEmbedding => Self::RLE,
            BidiClass::PopDirectionalFormat => Self::PDF,
            BidiClass::LeftToRightIsolate => Self::LRI,
            BidiClass::RightToLeftIsolate => Self::RLI,
            BidiClass::FirstStrongIsolate => Self::FSI,
            BidiClass::PopDirectionalIsolate => Self::PDI,
            _ => Self::LTR,
        }
    }
}

/// Returns the bidirectional type of a character.
pub fn bidi_type(ch: char) -> CharType {
    CodePointMapData::<BidiClass>::new().get(ch).into()
}

/// Returns the bidirectional types of a string.
pub fn get_bidi_types(text: &[char]) -> Vec<CharType> {
    text.iter().copied().map(bidi_type).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_are_distinct() {
        let all = [
            CharType::LTR,
            CharType::RTL,
            CharType::AL,
            CharType::EN,
            CharType::AN,
            CharType::ES,
            CharType::ET,
            CharType::CS,
            CharType::NSM,
            CharType::BN,
            CharType::ON,
            CharType::WS,
            CharType::BS,
            CharType::SS,
            CharType::LRE,
            CharType::RLE,
            CharType::LRO,
            CharType::RLO,
            CharType::PDF,
            CharType::LRI,
            CharType::RLI,
            CharType::FSI,
            CharType::PDI,
            CharType::WLTR,
            CharType::WRTL,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(format!("{:?}", CharType::PDI), "PDI");
        assert_eq!(format!("{}", CharType::WRTL), "WRTL");
    }

    #[test]
    fn predicates() {
        assert!(CharType::AL.is_rtl() && CharType::AL.is_arabic() && CharType::AL.is_letter());
        assert!(CharType::AN.is_number() && CharType::AN.is_arabic());
        assert!(!CharType::EN.is_rtl());
        assert!(CharType::RLE.is_strong() && CharType::RLE.is_explicit_or_bn());
        assert!(CharType::BN.is_explicit_or_bn());
        assert!(CharType::PDI.is_isolate() && CharType::PDI.is_weak());
        assert!(CharType::SS.is_separator() && CharType::BS.is_separator());
        assert!(!CharType::WS.is_separator());
        assert_eq!(CharType::RLO.explicit_to_override_dir(), CharType::RTL);
        assert_eq!(CharType::LRO.explicit_to_override_dir(), CharType::LTR);
        assert_eq!(CharType::RLE.explicit_to_override_dir(), CharType::ON);
        assert_eq!(CharType::EN.number_to_rtl(), CharType::RTL);
    }

    #[test]
    fn unicode_types() {
        let text = ['a', '\u{05D0}', '\u{0627}', '1', '\u{0661}', ' ', '\u{202B}', '\u{2069}'];
        assert_eq!(
            get_bidi_types(&text),
            [
                CharType::LTR,
                CharType::RTL,
                CharType::AL,
                CharType::EN,
                CharType::AN,
                CharType::WS,
                CharType::RLE,
                CharType::PDI
            ]
        );
    }

    #[test]
    fn level_directions() {
        assert_eq!(level_to_dir(0), CharType::LTR);
        assert_eq!(level_to_dir(3), CharType::RTL);
        assert_eq!(dir_to_level(CharType::WRTL), 1);
        assert_eq!(dir_to_level(CharType::ON), 0);
    }
}
