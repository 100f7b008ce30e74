//! The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table
//!
//! Apple bitmap-only fonts store the same structure under the `bhed` tag.

use types::{BoundingBox, Fixed, MajorMinor, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'head'
pub const TAG: Tag = Tag::new(b"head");
/// 'bhed'
pub const BHED_TAG: Tag = Tag::new(b"bhed");

const HEAD_LEN: usize = 54;

/// The font header table.
#[derive(Clone, Copy)]
pub struct Head<'a> {
    data: FontData<'a>,
}

impl TopLevelTable for Head<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Head<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.len() < HEAD_LEN {
            return Err(ReadError::OutOfBounds);
        }
        Ok(Head { data })
    }
}

impl<'a> Head<'a> {
    pub fn version(&self) -> MajorMinor {
        self.data.read_at(0).unwrap_or(MajorMinor::VERSION_1_0)
    }

    pub fn font_revision(&self) -> Fixed {
        self.data.read_at(4).unwrap_or_default()
    }

    pub fn flags(&self) -> u16 {
        self.data.read_at(16).unwrap_or_default()
    }

    /// Set to a value from 16 to 16384.
    pub fn units_per_em(&self) -> u16 {
        self.data.read_at(18).unwrap_or_default()
    }

    /// Seconds since 1904-01-01 00:00 UTC.
    pub fn created(&self) -> i64 {
        self.data.read_at(20).unwrap_or_default()
    }

    pub fn modified(&self) -> i64 {
        self.data.read_at(28).unwrap_or_default()
    }

    /// The bounding box of all glyphs.
    pub fn bbox(&self) -> BoundingBox<i16> {
        BoundingBox {
            x_min: self.data.read_at(36).unwrap_or_default(),
            y_min: self.data.read_at(38).unwrap_or_default(),
            x_max: self.data.read_at(40).unwrap_or_default(),
            y_max: self.data.read_at(42).unwrap_or_default(),
        }
    }

    pub fn mac_style(&self) -> u16 {
        self.data.read_at(44).unwrap_or_default()
    }

    /// Smallest readable size in pixels.
    pub fn lowest_rec_ppem(&self) -> u16 {
        self.data.read_at(46).unwrap_or_default()
    }

    /// 0 for short offsets (Offset16), 1 for long (Offset32).
    pub fn index_to_loc_format(&self) -> i16 {
        self.data.read_at(50).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    #[test]
    fn smoke_test() {
        let buf = BeBuffer::new()
            .extend([1u16, 0u16])
            .push(Fixed::from_f64(2.8))
            .extend([42u32, 0x5f0f3cf5])
            .extend([16u16, 4096]) // flags, upm
            .extend([-500i64, 101])
            .extend([-100i16, -50, 400, 711])
            .extend([0u16, 12]) // mac_style / ppem
            .extend([2i16, 1, 0]);

        let head = Head::read(buf.data().into()).unwrap();
        assert_eq!(head.version(), MajorMinor::VERSION_1_0);
        assert_eq!(head.font_revision(), Fixed::from_f64(2.8));
        assert_eq!(head.units_per_em(), 4096);
        assert_eq!(head.created(), -500);
        assert_eq!(head.bbox().y_min, -50);
        assert_eq!(head.index_to_loc_format(), 1);
        assert!(Head::read(buf.data()[..40].into()).is_err());
    }
}
