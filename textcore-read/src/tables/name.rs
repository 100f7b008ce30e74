//! The [name (Naming)](https://docs.microsoft.com/en-us/typography/opentype/spec/name) table

use types::{BigEndian, FixedSize, NameId, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'name'
pub const TAG: Tag = Tag::new(b"name");

/// The naming table.
#[derive(Clone, Copy)]
pub struct Name<'a> {
    data: FontData<'a>,
    records: &'a [NameRecord],
}

/// A single name record.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct NameRecord {
    pub platform_id: BigEndian<u16>,
    pub encoding_id: BigEndian<u16>,
    pub language_id: BigEndian<u16>,
    pub name_id: BigEndian<NameId>,
    pub length: BigEndian<u16>,
    /// Offset from the start of the string storage.
    pub string_offset: BigEndian<u16>,
}

impl FixedSize for NameRecord {
    const RAW_BYTE_LEN: usize = 12;
}

impl TopLevelTable for Name<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Name<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _version = cursor.read::<u16>()?;
        let count = cursor.read::<u16>()?;
        let _storage_offset = cursor.read::<u16>()?;
        let records = cursor.read_array(count as usize)?;
        Ok(Name { data, records })
    }
}

impl<'a> Name<'a> {
    pub fn version(&self) -> u16 {
        self.data.read_at(0).unwrap_or_default()
    }

    pub fn name_record(&self) -> &'a [NameRecord] {
        self.records
    }

    /// The FontData containing the encoded name strings.
    pub fn string_data(&self) -> FontData<'a> {
        let off = self.data.read_at::<u16>(4).unwrap_or_default();
        self.data.split_off(off as usize).unwrap_or_default()
    }

    /// Returns the preferred decodable string for `name_id`.
    ///
    /// Windows Unicode records win over Unicode platform records, which win
    /// over Macintosh Roman records. Within a platform the first record
    /// wins, preferring US English when several languages are present.
    pub fn get(&self, name_id: NameId) -> Option<NameString<'a>> {
        let string_data = self.string_data();
        self.records
            .iter()
            .filter(|rec| rec.name_id() == name_id)
            .filter(|rec| rec.encoding() != Encoding::Unknown)
            .min_by_key(|rec| rec.priority())
            .and_then(|rec| rec.string(string_data).ok())
    }

    /// Returns `true` if a record with `name_id` is present.
    pub fn contains(&self, name_id: NameId) -> bool {
        self.records.iter().any(|rec| rec.name_id() == name_id)
    }
}

impl NameRecord {
    pub fn platform_id(&self) -> u16 {
        self.platform_id.get()
    }

    pub fn encoding_id(&self) -> u16 {
        self.encoding_id.get()
    }

    pub fn language_id(&self) -> u16 {
        self.language_id.get()
    }

    pub fn name_id(&self) -> NameId {
        self.name_id.get()
    }

    pub fn encoding(&self) -> Encoding {
        Encoding::new(self.platform_id(), self.encoding_id())
    }

    fn priority(&self) -> (u8, u8) {
        let platform = match self.platform_id() {
            3 => 0,
            0 => 1,
            _ => 2,
        };
        // en-US on Windows, English on Macintosh
        let english = match (self.platform_id(), self.language_id()) {
            (3, 0x409) | (1, 0) | (0, _) => 0,
            _ => 1,
        };
        (platform, english)
    }

    /// Return a type that can decode the string data for this name entry.
    pub fn string<'a>(&self, data: FontData<'a>) -> Result<NameString<'a>, ReadError> {
        let data = data
            .slice_len(self.string_offset.get() as usize, self.length.get() as usize)
            .ok_or(ReadError::OutOfBounds)?
            .as_bytes();
        Ok(NameString {
            data,
            encoding: self.encoding(),
        })
    }

    // reference from fonttools:
    // https://github.com/fonttools/fonttools/blob/c2119229cfb02cdb7c5a63374ef29d3d514259e8/Lib/fontTools/ttLib/tables/_n_a_m_e.py#L509
    pub fn is_unicode(&self) -> bool {
        self.platform_id() == 0
            || (self.platform_id() == 3 && [0, 1, 10].contains(&self.encoding_id()))
    }
}

/// Entry for a name in the naming table.
///
/// This provides an iterator over characters.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct NameString<'a> {
    data: &'a [u8],
    encoding: Encoding,
}

impl<'a> NameString<'a> {
    /// An iterator over the `char`s in this name.
    pub fn chars(&self) -> CharIter<'a> {
        CharIter {
            data: self.data,
            encoding: self.encoding,
            pos: 0,
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl<'a> IntoIterator for NameString<'a> {
    type Item = char;
    type IntoIter = CharIter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.chars()
    }
}

impl std::fmt::Display for NameString<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for c in self.chars() {
            c.fmt(f)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for NameString<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}

/// An iterator over the chars of a name record.
#[derive(Clone)]
pub struct CharIter<'a> {
    data: &'a [u8],
    encoding: Encoding,
    pos: usize,
}

impl CharIter<'_> {
    fn bump_u16(&mut self) -> Option<u16> {
        let bytes = self.data.get(self.pos..self.pos + 2)?;
        self.pos += 2;
        Some(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn bump_u8(&mut self) -> Option<u8> {
        let result = self.data.get(self.pos)?;
        self.pos += 1;
        Some(*result)
    }
}

impl Iterator for CharIter<'_> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        let rep = core::char::REPLACEMENT_CHARACTER;
        let raw_c = match self.encoding {
            Encoding::Utf16Be => {
                let c1 = self.bump_u16()? as u32;
                if (0xD800..0xDC00).contains(&c1) {
                    let Some(c2) = self.bump_u16() else {
                        return Some(rep);
                    };
                    ((c1 & 0x3FF) << 10) + (c2 as u32 & 0x3FF) + 0x10000
                } else {
                    c1
                }
            }
            Encoding::MacRoman => {
                let c = self.bump_u8()?;
                MacRomanMapping.decode(c) as u32
            }
            Encoding::Unknown => return None,
        };
        Some(std::char::from_u32(raw_c).unwrap_or(rep))
    }
}

/// The encoding used by the name table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Encoding {
    Utf16Be,
    MacRoman,
    Unknown,
}

impl Encoding {
    /// Determine the coding from the platform and encoding id.
    pub fn new(platform_id: u16, encoding_id: u16) -> Encoding {
        match (platform_id, encoding_id) {
            (0, _) => Encoding::Utf16Be,
            (1, 0) => Encoding::MacRoman,
            (3, 0 | 1 | 10) => Encoding::Utf16Be,
            _ => Encoding::Unknown,
        }
    }
}

/// A helper for decoding Mac OS Roman encoded strings.
pub struct MacRomanMapping;

impl MacRomanMapping {
    const START_REMAP: u8 = 128;

    /// Convert from a mac-roman encoded byte to a `char`
    pub fn decode(self, raw: u8) -> char {
        if raw < Self::START_REMAP {
            return raw as char;
        }
        let idx = (raw - Self::START_REMAP) as usize;
        char::from_u32(MAC_ROMAN_DECODE[idx] as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

/// a lookup table for the Mac Roman encoding. this matches the values 128..=255
/// to specific unicode values.
#[rustfmt::skip]
pub(crate) static MAC_ROMAN_DECODE: [u16; 128] = [
    196, 197, 199, 201, 209, 214, 220, 225, 224, 226, 228, 227, 229, 231, 233,
    232, 234, 235, 237, 236, 238, 239, 241, 243, 242, 244, 246, 245, 250, 249,
    251, 252, 8224, 176, 162, 163, 167, 8226, 182, 223, 174, 169, 8482, 180,
    168, 8800, 198, 216, 8734, 177, 8804, 8805, 165, 181, 8706, 8721, 8719,
    960, 8747, 170, 186, 937, 230, 248, 191, 161, 172, 8730, 402, 8776, 8710,
    171, 187, 8230, 160, 192, 195, 213, 338, 339, 8211, 8212, 8220, 8221, 8216,
    8217, 247, 9674, 255, 376, 8260, 8364, 8249, 8250, 64257, 64258, 8225, 183,
    8218, 8222, 8240, 194, 202, 193, 203, 200, 205, 206, 207, 204, 211, 212,
    63743, 210, 218, 219, 217, 305, 710, 732, 175, 728, 729, 730, 184, 733,
    731, 711,
];
