//! the [post (PostScript)](https://docs.microsoft.com/en-us/typography/opentype/spec/post#header) table

use types::{Fixed, GlyphId, Tag, Version16Dot16};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'post'
pub const TAG: Tag = Tag::new(b"post");

const HEADER_LEN: usize = 32;

/// The PostScript table.
#[derive(Clone, Copy)]
pub struct Post<'a> {
    data: FontData<'a>,
}

impl TopLevelTable for Post<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Post<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.len() < HEADER_LEN {
            return Err(ReadError::OutOfBounds);
        }
        let post = Post { data };
        if post.version() == Version16Dot16::VERSION_2_0 {
            let num_glyphs = data.read_at::<u16>(HEADER_LEN)?;
            data.read_array_len::<types::BigEndian<u16>>(HEADER_LEN + 2, num_glyphs as usize)?;
        }
        Ok(post)
    }
}

impl<'a> Post<'a> {
    pub fn version(&self) -> Version16Dot16 {
        self.data.read_at(0).unwrap_or(Version16Dot16::VERSION_3_0)
    }

    /// Italic angle in counter-clockwise degrees from the vertical.
    pub fn italic_angle(&self) -> Fixed {
        self.data.read_at(4).unwrap_or_default()
    }

    /// Suggested y-coordinate of the top of the underline.
    pub fn underline_position(&self) -> i16 {
        self.data.read_at(8).unwrap_or_default()
    }

    /// Suggested values for the underline thickness.
    pub fn underline_thickness(&self) -> i16 {
        self.data.read_at(10).unwrap_or_default()
    }

    /// Non-zero if the font is monospaced.
    pub fn is_fixed_pitch(&self) -> u32 {
        self.data.read_at(12).unwrap_or_default()
    }

    fn glyph_name_index(&self) -> Option<&'a [types::BigEndian<u16>]> {
        let num_glyphs = self.data.read_at::<u16>(HEADER_LEN).ok()?;
        self.data
            .read_array_len(HEADER_LEN + 2, num_glyphs as usize)
            .ok()
    }

    /// The Pascal strings following the name index of a version 2.0 table.
    pub fn string_data(&self) -> impl Iterator<Item = Result<PString<'a>, ReadError>> + 'a {
        let start = self
            .glyph_name_index()
            .map(|index| HEADER_LEN + 2 + index.len() * 2)
            .unwrap_or(self.data.len());
        let mut data = self.data.split_off(start).unwrap_or_default();
        std::iter::from_fn(move || {
            if data.is_empty() {
                return None;
            }
            let item = PString::read(data);
            let len = data.read_at::<u8>(0).map(|len| len as usize + 1).unwrap_or(1);
            data = data.split_off(len).unwrap_or_default();
            Some(item)
        })
    }

    /// The number of glyph names covered by this table
    pub fn num_names(&self) -> usize {
        match self.version() {
            Version16Dot16::VERSION_1_0 => DEFAULT_GLYPH_NAMES.len(),
            Version16Dot16::VERSION_2_0 => self.glyph_name_index().map(|x| x.len()).unwrap_or(0),
            _ => 0,
        }
    }

    pub fn glyph_name(&self, glyph_id: GlyphId) -> Option<&'a str> {
        let glyph_id = glyph_id.to_u16() as usize;
        match self.version() {
            Version16Dot16::VERSION_1_0 => DEFAULT_GLYPH_NAMES.get(glyph_id).copied(),
            Version16Dot16::VERSION_2_0 => {
                let idx = self.glyph_name_index()?.get(glyph_id)?.get() as usize;
                if idx < DEFAULT_GLYPH_NAMES.len() {
                    return DEFAULT_GLYPH_NAMES.get(idx).copied();
                }
                let idx = idx - DEFAULT_GLYPH_NAMES.len();
                match self.string_data().nth(idx) {
                    Some(Ok(s)) => Some(s.0),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// A string in the post table.
///
/// This is basically just a newtype that knows how to parse from a Pascal-style
/// string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PString<'a>(&'a str);

impl<'a> PString<'a> {
    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

impl std::ops::Deref for PString<'_> {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl PartialEq<&str> for PString<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<'a> FontRead<'a> for PString<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let len: u8 = data.read_at(0)?;
        let pstring = data
            .as_bytes()
            .get(1..len as usize + 1)
            .ok_or(ReadError::OutOfBounds)?;
        if !pstring.is_ascii() {
            return Err(ReadError::MalformedData("Must be valid ascii"));
        }
        std::str::from_utf8(pstring)
            .map(PString)
            .map_err(|_| ReadError::MalformedData("Must be valid ascii"))
    }
}

/// The 258 glyph names defined for Macintosh TrueType fonts
#[rustfmt::skip]
pub static DEFAULT_GLYPH_NAMES: [&str; 258] = [
    ".notdef", ".null", "nonmarkingreturn", "space", "exclam", "quotedbl", "numbersign", "dollar",
    "percent", "ampersand", "quotesingle", "parenleft", "parenright", "asterisk", "plus", "comma",
    "hyphen", "period", "slash", "zero", "one", "two", "three", "four", "five", "six", "seven",
    "eight", "nine", "colon", "semicolon", "less", "equal", "greater", "question", "at", "A", "B",
    "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U",
    "V", "W", "X", "Y", "Z", "bracketleft", "backslash", "bracketright", "asciicircum",
    "underscore", "grave", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n",
    "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "braceleft", "bar", "braceright",
    "asciitilde", "Adieresis", "Aring", "Ccedilla", "Eacute", "Ntilde", "Odieresis", "Udieresis",
    "aacute", "agrave", "acircumflex", "adieresis", "atilde", "aring", "ccedilla", "eacute",
    "egrave", "ecircumflex", "edieresis", "iacute", "igrave", "icircumflex", "idieresis", "ntilde",
    "oacute", "ograve", "ocircumflex", "odieresis", "otilde", "uacute", "ugrave", "ucircumflex",
    "udieresis", "dagger", "degree", "cent", "sterling", "section", "bullet", "paragraph",
    "germandbls", "registered", "copyright", "trademark", "acute", "dieresis", "notequal", "AE",
    "Oslash", "infinity", "plusminus", "lessequal", "greaterequal", "yen", "mu", "partialdiff",
    "summation", "product", "pi", "integral", "ordfeminine", "ordmasculine", "Omega", "ae",
    "oslash", "questiondown", "exclamdown", "logicalnot", "radical", "florin", "approxequal",
    "Delta", "guillemotleft", "guillemotright", "ellipsis", "nonbreakingspace", "Agrave", "Atilde",
    "Otilde", "OE", "oe", "endash", "emdash", "quotedblleft", "quotedblright", "quoteleft",
    "quoteright", "divide", "lozenge", "ydieresis", "Ydieresis", "fraction", "currency",
    "guilsinglleft", "guilsinglright", "fi", "fl", "daggerdbl", "periodcentered", "quotesinglbase",
    "quotedblbase", "perthousand", "Acircumflex", "Ecircumflex", "Aacute", "Edieresis", "Egrave",
    "Iacute", "Icircumflex", "Idieresis", "Igrave", "Oacute", "Ocircumflex", "apple", "Ograve",
    "Uacute", "Ucircumflex", "Ugrave", "dotlessi", "circumflex", "tilde", "macron", "breve",
    "dotaccent", "ring", "cedilla", "hungarumlaut", "ogonek", "caron", "Lslash", "lslash",
    "Scaron", "scaron", "Zcaron", "zcaron", "brokenbar", "Eth", "eth", "Yacute", "yacute", "Thorn",
    "thorn", "minus", "multiply", "onesuperior", "twosuperior", "threesuperior", "onehalf",
    "onequarter", "threequarters", "franc", "Gbreve", "gbreve", "Idotaccent", "Scedilla",
    "scedilla", "Cacute", "cacute", "Ccaron", "ccaron", "dcroat",
];

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::post as test_data;

    #[test]
    fn version_2_names() {
        let table = Post::read(test_data::SIMPLE.into()).unwrap();
        assert_eq!(table.version(), Version16Dot16::VERSION_2_0);
        assert_eq!(table.underline_position(), -75);
        assert_eq!(table.underline_thickness(), 50);
        assert_eq!(table.num_names(), 10);
        assert_eq!(table.glyph_name(GlyphId::new(1)), Some(".notdef"));
        assert_eq!(table.glyph_name(GlyphId::new(2)), Some("space"));
        assert_eq!(table.glyph_name(GlyphId::new(7)), Some("hello"));
        assert_eq!(table.glyph_name(GlyphId::new(8)), Some("hi"));
        assert_eq!(table.glyph_name(GlyphId::new(9)), Some("hola"));
        assert_eq!(table.glyph_name(GlyphId::new(10)), None);
    }

    #[test]
    fn version_1_and_3() {
        let mut data = test_data::SIMPLE[..32].to_vec();
        data[1] = 1;
        let table = Post::read(FontData::new(&data)).unwrap();
        assert_eq!(table.glyph_name(GlyphId::new(3)), Some("space"));
        assert_eq!(table.num_names(), 258);

        data[1] = 3;
        let table = Post::read(FontData::new(&data)).unwrap();
        assert_eq!(table.glyph_name(GlyphId::new(3)), None);
        assert_eq!(table.num_names(), 0);
    }

    #[test]
    fn truncated() {
        assert!(matches!(
            Post::read(FontData::new(&[1, 1, 1, 1])),
            Err(ReadError::OutOfBounds)
        ));
    }
}
