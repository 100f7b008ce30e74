//! The [hhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea)
//! and [vhea](https://docs.microsoft.com/en-us/typography/opentype/spec/vhea)
//! tables, which share a layout.

use types::Tag;

use crate::{FontData, FontRead, ReadError};

/// 'hhea'
pub const HHEA_TAG: Tag = Tag::new(b"hhea");
/// 'vhea'
pub const VHEA_TAG: Tag = Tag::new(b"vhea");

const HVHEA_LEN: usize = 36;

/// A horizontal or vertical header table.
///
/// In `vhea`, "ascender" and "descender" are the vertical typo line
/// values and side bearings are top/bottom.
#[derive(Clone, Copy)]
pub struct HVhea<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for HVhea<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.len() < HVHEA_LEN {
            return Err(ReadError::OutOfBounds);
        }
        Ok(HVhea { data })
    }
}

impl HVhea<'_> {
    fn i16_at(&self, offset: usize) -> i16 {
        self.data.read_at(offset).unwrap_or_default()
    }

    pub fn ascender(&self) -> i16 {
        self.i16_at(4)
    }

    pub fn descender(&self) -> i16 {
        self.i16_at(6)
    }

    pub fn line_gap(&self) -> i16 {
        self.i16_at(8)
    }

    pub fn advance_max(&self) -> u16 {
        self.data.read_at(10).unwrap_or_default()
    }

    pub fn min_leading_bearing(&self) -> i16 {
        self.i16_at(12)
    }

    pub fn min_trailing_bearing(&self) -> i16 {
        self.i16_at(14)
    }

    pub fn max_extent(&self) -> i16 {
        self.i16_at(16)
    }

    pub fn caret_slope_rise(&self) -> i16 {
        self.i16_at(18)
    }

    pub fn caret_slope_run(&self) -> i16 {
        self.i16_at(20)
    }

    pub fn caret_offset(&self) -> i16 {
        self.i16_at(22)
    }

    /// Number of long metrics in the matching `hmtx` or `vmtx` table.
    pub fn number_of_long_metrics(&self) -> u16 {
        self.data.read_at(34).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    #[test]
    fn fields() {
        let buf = BeBuffer::new()
            .push(0x00010000u32)
            .extend([800i16, -200, 90])
            .push(1200u16)
            .extend([-40i16, -30, 1100, 1, 0, 0])
            .extend([0i16; 5])
            .push(7u16);
        let hhea = HVhea::read(buf.data().into()).unwrap();
        assert_eq!(hhea.ascender(), 800);
        assert_eq!(hhea.descender(), -200);
        assert_eq!(hhea.line_gap(), 90);
        assert_eq!(hhea.advance_max(), 1200);
        assert_eq!(hhea.caret_slope_rise(), 1);
        assert_eq!(hhea.number_of_long_metrics(), 7);
    }
}
