//! The [OS/2](https://docs.microsoft.com/en-us/typography/opentype/spec/os2) table

use types::Tag;

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'OS/2'
pub const TAG: Tag = Tag::new(b"OS/2");

/// OS/2 [selection flags](https://learn.microsoft.com/en-us/typography/opentype/spec/os2#fsselection)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SelectionFlags(u16);

impl SelectionFlags {
    pub const ITALIC: Self = Self(1);
    pub const UNDERSCORE: Self = Self(1 << 1);
    pub const NEGATIVE: Self = Self(1 << 2);
    pub const OUTLINED: Self = Self(1 << 3);
    pub const STRIKEOUT: Self = Self(1 << 4);
    pub const BOLD: Self = Self(1 << 5);
    pub const REGULAR: Self = Self(1 << 6);
    /// Use the typo metrics for line spacing.
    pub const USE_TYPO_METRICS: Self = Self(1 << 7);
    pub const WWS: Self = Self(1 << 8);
    pub const OBLIQUE: Self = Self(1 << 9);

    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & 0x3FF)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Length of the version 0 table.
const V0_LEN: usize = 78;
/// Length of the Apple variant of version 0, which stops after the
/// Unicode ranges and vendor id.
const APPLE_V0_LEN: usize = 68;

/// The OS/2 and Windows metrics table.
///
/// Tables shorter than their version requires are accepted; fields that
/// fall outside the data are reported as `None`.
#[derive(Clone, Copy)]
pub struct Os2<'a> {
    data: FontData<'a>,
}

impl TopLevelTable for Os2<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Os2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        // the version must at least be present
        data.read_at::<u16>(0)?;
        Ok(Os2 { data })
    }
}

impl Os2<'_> {
    fn field<T: types::Scalar + Default>(&self, offset: usize) -> T {
        self.data.read_at(offset).unwrap_or_default()
    }

    fn versioned<T: types::Scalar>(&self, min_version: u16, offset: usize) -> Option<T> {
        if self.version() < min_version {
            return None;
        }
        self.data.read_at(offset).ok()
    }

    pub fn version(&self) -> u16 {
        self.field(0)
    }

    pub fn x_avg_char_width(&self) -> i16 {
        self.field(2)
    }

    pub fn us_weight_class(&self) -> u16 {
        self.field(4)
    }

    pub fn us_width_class(&self) -> u16 {
        self.field(6)
    }

    pub fn fs_type(&self) -> u16 {
        self.field(8)
    }

    pub fn y_subscript_x_size(&self) -> i16 {
        self.field(10)
    }

    pub fn y_subscript_y_size(&self) -> i16 {
        self.field(12)
    }

    pub fn y_subscript_x_offset(&self) -> i16 {
        self.field(14)
    }

    pub fn y_subscript_y_offset(&self) -> i16 {
        self.field(16)
    }

    pub fn y_superscript_x_size(&self) -> i16 {
        self.field(18)
    }

    pub fn y_superscript_y_size(&self) -> i16 {
        self.field(20)
    }

    pub fn y_superscript_x_offset(&self) -> i16 {
        self.field(22)
    }

    pub fn y_superscript_y_offset(&self) -> i16 {
        self.field(24)
    }

    /// Thickness of the strikeout stroke in font design units.
    pub fn y_strikeout_size(&self) -> i16 {
        self.field(26)
    }

    /// Position of the top of the strikeout stroke relative to the
    /// baseline.
    pub fn y_strikeout_position(&self) -> i16 {
        self.field(28)
    }

    pub fn s_family_class(&self) -> i16 {
        self.field(30)
    }

    /// The 10 byte PANOSE classification, if present.
    pub fn panose_10(&self) -> Option<&[u8]> {
        self.data.as_bytes().get(32..42)
    }

    /// Unicode character range bits, if present.
    pub fn ul_unicode_range(&self) -> Option<[u32; 4]> {
        if self.data.len() < 58 {
            return None;
        }
        Some([
            self.field(42),
            self.field(46),
            self.field(50),
            self.field(54),
        ])
    }

    pub fn ach_vend_id(&self) -> Option<Tag> {
        self.data.read_at(58).ok()
    }

    pub fn fs_selection(&self) -> SelectionFlags {
        SelectionFlags::from_bits_truncate(self.field(62))
    }

    pub fn us_first_char_index(&self) -> u16 {
        self.field(64)
    }

    pub fn us_last_char_index(&self) -> u16 {
        self.field(66)
    }

    /// The typographic ascender, absent in truncated Apple tables.
    pub fn s_typo_ascender(&self) -> Option<i16> {
        self.full_v0().then(|| self.field(68))
    }

    pub fn s_typo_descender(&self) -> Option<i16> {
        self.full_v0().then(|| self.field(70))
    }

    pub fn s_typo_line_gap(&self) -> Option<i16> {
        self.full_v0().then(|| self.field(72))
    }

    pub fn us_win_ascent(&self) -> Option<u16> {
        self.full_v0().then(|| self.field(74))
    }

    pub fn us_win_descent(&self) -> Option<u16> {
        self.full_v0().then(|| self.field(76))
    }

    fn full_v0(&self) -> bool {
        self.data.len() >= V0_LEN
    }

    /// Returns `true` if this is the truncated version 0 table written by
    /// some Apple tools.
    pub fn is_apple_short_v0(&self) -> bool {
        self.version() == 0 && self.data.len() < V0_LEN && self.data.len() >= APPLE_V0_LEN
    }

    pub fn ul_code_page_range_1(&self) -> Option<u32> {
        self.versioned(1, 78)
    }

    pub fn ul_code_page_range_2(&self) -> Option<u32> {
        self.versioned(1, 82)
    }

    pub fn sx_height(&self) -> Option<i16> {
        self.versioned(2, 86)
    }

    pub fn s_cap_height(&self) -> Option<i16> {
        self.versioned(2, 88)
    }

    pub fn us_default_char(&self) -> Option<u16> {
        self.versioned(2, 90)
    }

    pub fn us_break_char(&self) -> Option<u16> {
        self.versioned(2, 92)
    }

    pub fn us_max_context(&self) -> Option<u16> {
        self.versioned(2, 94)
    }

    pub fn us_lower_optical_point_size(&self) -> Option<u16> {
        self.versioned(5, 96)
    }

    pub fn us_upper_optical_point_size(&self) -> Option<u16> {
        self.versioned(5, 98)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    fn os2_v0() -> BeBuffer {
        BeBuffer::new()
            .push(0u16) // version
            .extend([500i16])
            .extend([400u16, 5, 0])
            .extend([0i16; 8])
            .extend([50i16, 300, 0]) // strikeout size/position, family class
            .extend([0u8; 10])
            .extend([1u32, 0, 0, 0])
            .push(Tag::new(b"TEST"))
            .push(0x80u16) // fsSelection
            .extend([32u16, 0xFFFF])
            .extend([800i16, -200, 100])
            .extend([1000u16, 300])
    }

    #[test]
    fn version_0() {
        let buf = os2_v0();
        let os2 = Os2::read(buf.data().into()).unwrap();
        assert_eq!(os2.us_weight_class(), 400);
        assert_eq!(os2.y_strikeout_position(), 300);
        assert_eq!(os2.ach_vend_id(), Some(Tag::new(b"TEST")));
        assert!(os2.fs_selection().contains(SelectionFlags::USE_TYPO_METRICS));
        assert_eq!(os2.s_typo_descender(), Some(-200));
        assert_eq!(os2.us_win_descent(), Some(300));
        assert_eq!(os2.ul_code_page_range_1(), None);
        assert_eq!(os2.sx_height(), None);
    }

    #[test]
    fn truncated_versioned_fields() {
        // claims version 2 but stops after the code page ranges
        let mut bytes = os2_v0().extend([0xAAu32, 0]).into_vec();
        bytes[1] = 2;
        let os2 = Os2::read(FontData::new(&bytes)).unwrap();
        assert_eq!(os2.ul_code_page_range_1(), Some(0xAA));
        assert_eq!(os2.sx_height(), None);

        let mut short = bytes[..APPLE_V0_LEN].to_vec();
        short[1] = 0;
        let os2 = Os2::read(FontData::new(&short)).unwrap();
        assert!(os2.is_apple_short_v0());
        assert_eq!(os2.s_typo_ascender(), None);
        assert_eq!(os2.us_last_char_index(), 0xFFFF);
    }
}
