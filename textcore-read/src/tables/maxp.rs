//! The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table

use types::{Tag, Version16Dot16};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'maxp'
pub const TAG: Tag = Tag::new(b"maxp");

/// The maximum profile table.
///
/// Version 0.5 holds only the glyph count; version 1.0 adds the TrueType
/// limits, which are returned as `None` when absent.
#[derive(Clone, Copy)]
pub struct Maxp<'a> {
    data: FontData<'a>,
}

impl TopLevelTable for Maxp<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Maxp<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.len() < 6 {
            return Err(ReadError::OutOfBounds);
        }
        Ok(Maxp { data })
    }
}

impl Maxp<'_> {
    pub fn version(&self) -> Version16Dot16 {
        self.data
            .read_at(0)
            .unwrap_or(Version16Dot16::VERSION_0_5)
    }

    /// The number of glyphs in the font.
    pub fn num_glyphs(&self) -> u16 {
        self.data.read_at(4).unwrap_or_default()
    }

    fn v1_field(&self, offset: usize) -> Option<u16> {
        if self.version() < Version16Dot16::VERSION_1_0 {
            return None;
        }
        self.data.read_at(offset).ok()
    }

    /// Maximum points in a non-composite glyph.
    pub fn max_points(&self) -> Option<u16> {
        self.v1_field(6)
    }

    /// Maximum contours in a non-composite glyph.
    pub fn max_contours(&self) -> Option<u16> {
        self.v1_field(8)
    }

    /// Maximum points in a composite glyph.
    pub fn max_composite_points(&self) -> Option<u16> {
        self.v1_field(10)
    }

    /// Maximum number of components referenced at the top level of any
    /// composite glyph.
    pub fn max_component_elements(&self) -> Option<u16> {
        self.v1_field(28)
    }

    /// Maximum levels of recursion.
    pub fn max_component_depth(&self) -> Option<u16> {
        self.v1_field(30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    #[test]
    fn versions() {
        let short = BeBuffer::new().push(0x00005000u32).push(12u16);
        let maxp = Maxp::read(short.data().into()).unwrap();
        assert_eq!(maxp.num_glyphs(), 12);
        assert_eq!(maxp.max_points(), None);

        let long = BeBuffer::new()
            .push(0x00010000u32)
            .extend([12u16, 40, 3, 80])
            // max composite contours to max size of instructions
            .extend([0u16; 8])
            .extend([2u16, 1]);
        let maxp = Maxp::read(long.data().into()).unwrap();
        assert_eq!(maxp.max_points(), Some(40));
        assert_eq!(maxp.max_composite_points(), Some(80));
        assert_eq!(maxp.max_component_elements(), Some(2));
        assert_eq!(maxp.max_component_depth(), Some(1));
        assert!(Maxp::read(FontData::new(&[0, 0, 0x50, 0])).is_err());
    }
}
