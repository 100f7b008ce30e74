//! The [Axis Variations](https://docs.microsoft.com/en-us/typography/opentype/spec/avar) table

use types::{BigEndian, F2Dot14, Fixed, FixedSize, MajorMinor, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'avar'
pub const TAG: Tag = Tag::new(b"avar");

/// The axis variations table: one segment map per `fvar` axis.
#[derive(Clone, Copy)]
pub struct Avar<'a> {
    version: MajorMinor,
    axis_count: u16,
    segment_data: FontData<'a>,
}

impl TopLevelTable for Avar<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Avar<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version = data.read_at::<MajorMinor>(0)?;
        let axis_count = data.read_at::<u16>(6)?;
        let segment_data = data.split_off(8).ok_or(ReadError::OutOfBounds)?;
        let this = Avar {
            version,
            axis_count,
            segment_data,
        };
        // every map must be present
        for segment_map in this.axis_segment_maps() {
            segment_map?;
        }
        Ok(this)
    }
}

impl<'a> Avar<'a> {
    pub fn version(&self) -> MajorMinor {
        self.version
    }

    pub fn axis_count(&self) -> u16 {
        self.axis_count
    }

    /// Returns an iterator over the segment maps, in `fvar` axis order.
    pub fn axis_segment_maps(
        &self,
    ) -> impl Iterator<Item = Result<SegmentMaps<'a>, ReadError>> + 'a + Clone {
        let mut cursor = self.segment_data.cursor();
        (0..self.axis_count).map(move |_| {
            let count = cursor.read::<u16>()?;
            let axis_value_maps = cursor.read_array(count as usize)?;
            Ok(SegmentMaps { axis_value_maps })
        })
    }

    /// Returns the segment map for the axis at `index`.
    pub fn segment_map(&self, index: u16) -> Option<SegmentMaps<'a>> {
        self.axis_segment_maps().nth(index as usize)?.ok()
    }
}

/// A single `(from, to)` pair of a segment map.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct AxisValueMap {
    /// A normalized coordinate value obtained using default normalization.
    pub from_coordinate: BigEndian<F2Dot14>,
    /// The modified, normalized coordinate value.
    pub to_coordinate: BigEndian<F2Dot14>,
}

impl FixedSize for AxisValueMap {
    const RAW_BYTE_LEN: usize = 4;
}

impl AxisValueMap {
    fn from_fixed(&self) -> Fixed {
        self.from_coordinate.get().to_fixed()
    }

    fn to_fixed(&self) -> Fixed {
        self.to_coordinate.get().to_fixed()
    }
}

/// The piecewise linear mapping for one axis.
#[derive(Clone, Copy)]
pub struct SegmentMaps<'a> {
    axis_value_maps: &'a [AxisValueMap],
}

impl<'a> SegmentMaps<'a> {
    pub fn axis_value_maps(&self) -> &'a [AxisValueMap] {
        self.axis_value_maps
    }

    /// Applies the piecewise linear mapping to the specified coordinate.
    ///
    /// Coordinates before the first or after the last map are shifted by
    /// the delta of that map.
    pub fn apply(&self, coord: Fixed) -> Fixed {
        let maps = self.axis_value_maps;
        let (Some(first), Some(last)) = (maps.first(), maps.last()) else {
            return coord;
        };
        if let Some(exact) = maps.iter().find(|map| map.from_fixed() == coord) {
            return exact.to_fixed();
        }
        let Some(k) = maps.iter().position(|map| coord < map.from_fixed()) else {
            return coord - last.from_fixed() + last.to_fixed();
        };
        if k == 0 {
            return coord - first.from_fixed() + first.to_fixed();
        }
        let before = &maps[k - 1];
        let after = &maps[k];
        let denom = after.from_fixed() - before.from_fixed();
        let range = after.to_fixed() - before.to_fixed();
        before.to_fixed() + range.mul_div(coord - before.from_fixed(), denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    fn value_map(from: f32, to: f32) -> [F2Dot14; 2] {
        [F2Dot14::from_f32(from), F2Dot14::from_f32(to)]
    }

    fn avar_buf() -> BeBuffer {
        BeBuffer::new()
            .push(MajorMinor::VERSION_1_0)
            .push(0u16) // reserved
            .push(2u16) // axis count
            .push(5u16)
            .extend(value_map(-1.0, -1.0))
            .extend(value_map(-0.5, -0.75))
            .extend(value_map(0.0, 0.0))
            .extend(value_map(0.5, 0.25))
            .extend(value_map(1.0, 1.0))
            .push(0u16)
    }

    #[test]
    fn segment_maps() {
        let buf = avar_buf();
        let avar = Avar::read(buf.data().into()).unwrap();
        assert_eq!(avar.axis_count(), 2);
        assert_eq!(avar.segment_map(0).unwrap().axis_value_maps().len(), 5);
        assert!(avar.segment_map(1).unwrap().axis_value_maps().is_empty());
        assert!(avar.segment_map(2).is_none());
    }

    #[test]
    fn piecewise_linear() {
        let buf = avar_buf();
        let avar = Avar::read(buf.data().into()).unwrap();
        let map = avar.segment_map(0).unwrap();
        let coords = [-1.0, -0.75, -0.5, 0.0, 0.25, 0.5, 0.75, 1.0];
        let expected = [-1.0, -0.875, -0.75, 0.0, 0.125, 0.25, 0.625, 1.0];
        for (coord, expected) in coords.into_iter().zip(expected) {
            assert_eq!(map.apply(Fixed::from_f64(coord)).to_f64(), expected);
        }
        // an empty map is the identity
        let identity = avar.segment_map(1).unwrap();
        assert_eq!(identity.apply(Fixed::from_f64(0.3)), Fixed::from_f64(0.3));
    }

    #[test]
    fn truncated() {
        let mut bytes = avar_buf().into_vec();
        bytes.truncate(bytes.len() - 6);
        assert!(Avar::read(FontData::new(&bytes)).is_err());
    }
}
