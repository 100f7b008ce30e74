//! The [Font Variations](https://docs.microsoft.com/en-us/typography/opentype/spec/fvar) table

use types::{BigEndian, F2Dot14, Fixed, FixedSize, NameId, Tag};

use super::{avar::Avar, name::Name};
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'fvar'
pub const TAG: Tag = Tag::new(b"fvar");

const AXIS_RECORD_MIN_SIZE: usize = 20;

/// The font variations table.
#[derive(Clone, Copy)]
pub struct Fvar<'a> {
    data: FontData<'a>,
    axis_count: u16,
    axis_size: usize,
    axes_offset: usize,
    instance_count: u16,
    instance_size: usize,
    has_post_script_name_id: bool,
}

impl TopLevelTable for Fvar<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Fvar<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let axes_offset = data.read_at::<u16>(4)? as usize;
        let axis_count = data.read_at::<u16>(8)?;
        let axis_size = data.read_at::<u16>(10)? as usize;
        let instance_count = data.read_at::<u16>(12)?;
        let instance_size = data.read_at::<u16>(14)? as usize;
        if axis_size < AXIS_RECORD_MIN_SIZE {
            return Err(ReadError::VariationParse("axis record size too small"));
        }
        let coords_len = 4 + axis_count as usize * Fixed::RAW_BYTE_LEN;
        if instance_size < coords_len {
            return Err(ReadError::VariationParse("instance record size too small"));
        }
        // records are addressed with the declared sizes, not the minimums
        let instances_offset = axes_offset + axis_size * axis_count as usize;
        let end = instances_offset + instance_size * instance_count as usize;
        if data.len() < end {
            return Err(ReadError::OutOfBounds);
        }
        Ok(Fvar {
            data,
            axis_count,
            axis_size,
            axes_offset,
            instance_count,
            instance_size,
            has_post_script_name_id: instance_size >= coords_len + 2,
        })
    }
}

impl<'a> Fvar<'a> {
    pub fn axis_count(&self) -> u16 {
        self.axis_count
    }

    pub fn instance_count(&self) -> u16 {
        self.instance_count
    }

    /// Returns the variation axis record at the given index.
    pub fn axis(&self, index: u16) -> Option<&'a VariationAxisRecord> {
        if index >= self.axis_count {
            return None;
        }
        self.data
            .read_ref_at(self.axes_offset + index as usize * self.axis_size)
            .ok()
    }

    /// Returns an iterator over the variation axis records.
    pub fn axes(&self) -> impl Iterator<Item = &'a VariationAxisRecord> + 'a + Clone {
        let this = *self;
        (0..self.axis_count).filter_map(move |ix| this.axis(ix))
    }

    /// Returns the named instance at the given index.
    pub fn instance(&self, index: u16) -> Result<InstanceRecord<'a>, ReadError> {
        if index >= self.instance_count {
            return Err(ReadError::OutOfBounds);
        }
        let offset = self.axes_offset
            + self.axis_size * self.axis_count as usize
            + self.instance_size * index as usize;
        let mut cursor = self
            .data
            .split_off(offset)
            .ok_or(ReadError::OutOfBounds)?
            .cursor();
        let subfamily_name_id = cursor.read()?;
        let flags = cursor.read()?;
        let coordinates = cursor.read_array(self.axis_count as usize)?;
        let post_script_name_id = if self.has_post_script_name_id {
            Some(cursor.read()?)
        } else {
            None
        };
        Ok(InstanceRecord {
            subfamily_name_id,
            flags,
            coordinates: InstanceCoords::Explicit(coordinates),
            post_script_name_id,
        })
    }

    /// Returns an iterator over the named instances declared in the table.
    pub fn instances(
        &self,
    ) -> impl Iterator<Item = Result<InstanceRecord<'a>, ReadError>> + 'a + Clone {
        let this = *self;
        (0..self.instance_count).map(move |ix| this.instance(ix))
    }

    /// Returns the named instances, followed by a synthesized default
    /// instance if none of the declared instances describes it.
    ///
    /// The synthesized instance uses the typographic subfamily name when
    /// the `name` table provides one and the regular subfamily name
    /// otherwise.
    pub fn instances_with_default(
        &self,
        name: Option<&Name>,
    ) -> impl Iterator<Item = Result<InstanceRecord<'a>, ReadError>> + 'a + Clone {
        let has_default = self
            .instances()
            .any(|instance| instance.is_ok_and(|instance| self.is_default_instance(&instance)));
        let default = (!has_default).then(|| {
            let subfamily_name_id = match name {
                Some(name) if name.contains(NameId::TYPOGRAPHIC_SUBFAMILY_NAME) => {
                    NameId::TYPOGRAPHIC_SUBFAMILY_NAME
                }
                _ => NameId::SUBFAMILY_NAME,
            };
            Ok(InstanceRecord {
                subfamily_name_id,
                flags: 0,
                coordinates: InstanceCoords::Defaults(*self),
                post_script_name_id: Some(NameId::POSTSCRIPT_NAME),
            })
        });
        self.instances().chain(default)
    }

    fn is_default_instance(&self, instance: &InstanceRecord) -> bool {
        let subfamily = instance.subfamily_name_id;
        if subfamily != NameId::SUBFAMILY_NAME && subfamily != NameId::TYPOGRAPHIC_SUBFAMILY_NAME {
            return false;
        }
        if instance.post_script_name_id != Some(NameId::POSTSCRIPT_NAME) {
            return false;
        }
        instance
            .coordinates
            .iter()
            .zip(self.axes())
            .all(|(coord, axis)| coord == axis.default_value())
    }

    /// Converts user space coordinates into normalized coordinates.
    ///
    /// `user_coords` holds one value per axis, in axis order; missing
    /// values use the axis default. Each value is clamped to the axis range,
    /// mapped to `[-1, 1]` around the default and then remapped through the
    /// `avar` segment maps when present.
    pub fn normalize_coords(
        &self,
        avar: Option<&Avar>,
        user_coords: &[Fixed],
        normalized: &mut [F2Dot14],
    ) {
        for (ix, (axis, out)) in self.axes().zip(normalized.iter_mut()).enumerate() {
            let user = user_coords
                .get(ix)
                .copied()
                .unwrap_or_else(|| axis.default_value());
            let mut coord = axis.normalize(user);
            if let Some(segment_map) = avar.and_then(|avar| avar.segment_map(ix as u16)) {
                coord = segment_map.apply(coord);
            }
            *out = coord.to_f2dot14();
        }
    }
}

/// A variation axis.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct VariationAxisRecord {
    /// Tag identifying the design variation for the axis.
    pub axis_tag: BigEndian<Tag>,
    /// The minimum coordinate value for the axis.
    pub min_value: BigEndian<Fixed>,
    /// The default coordinate value for the axis.
    pub default_value: BigEndian<Fixed>,
    /// The maximum coordinate value for the axis.
    pub max_value: BigEndian<Fixed>,
    /// Axis qualifiers; bit 0 hides the axis from user interfaces.
    pub flags: BigEndian<u16>,
    /// The name ID for entries in the 'name' table that provide a display
    /// name for this axis.
    pub axis_name_id: BigEndian<NameId>,
}

impl FixedSize for VariationAxisRecord {
    const RAW_BYTE_LEN: usize = AXIS_RECORD_MIN_SIZE;
}

impl VariationAxisRecord {
    pub fn axis_tag(&self) -> Tag {
        self.axis_tag.get()
    }

    pub fn min_value(&self) -> Fixed {
        self.min_value.get()
    }

    pub fn default_value(&self) -> Fixed {
        self.default_value.get()
    }

    pub fn max_value(&self) -> Fixed {
        self.max_value.get()
    }

    pub fn flags(&self) -> u16 {
        self.flags.get()
    }

    pub fn axis_name_id(&self) -> NameId {
        self.axis_name_id.get()
    }

    /// Returns true if the axis should be hidden from users.
    pub fn is_hidden(&self) -> bool {
        self.flags() & 1 != 0
    }

    /// Returns a normalized coordinate for the given value.
    pub fn normalize(&self, mut value: Fixed) -> Fixed {
        use core::cmp::Ordering::*;
        let min_value = self.min_value();
        let default_value = self.default_value();
        // max below min would make clamp panic
        let max_value = self.max_value().max(min_value);
        value = value.clamp(min_value, max_value);
        value = match value.cmp(&default_value) {
            Less => {
                -((default_value.saturating_sub(value)) / (default_value.saturating_sub(min_value)))
            }
            Greater => {
                (value.saturating_sub(default_value)) / (max_value.saturating_sub(default_value))
            }
            Equal => Fixed::ZERO,
        };
        value.clamp(-Fixed::ONE, Fixed::ONE)
    }
}

/// A named instance: a subfamily name and a position in the design space.
#[derive(Clone, Copy)]
pub struct InstanceRecord<'a> {
    /// The name ID for entries in the 'name' table that provide subfamily
    /// names for this instance.
    pub subfamily_name_id: NameId,
    /// Reserved for future use.
    pub flags: u16,
    /// The coordinates array for this instance.
    pub coordinates: InstanceCoords<'a>,
    /// Optional. The name ID for entries in the 'name' table that provide
    /// PostScript names for this instance.
    pub post_script_name_id: Option<NameId>,
}

/// User space coordinates of a named instance.
#[derive(Clone, Copy)]
pub enum InstanceCoords<'a> {
    /// Coordinates stored in the instance record.
    Explicit(&'a [BigEndian<Fixed>]),
    /// The default value of each axis.
    Defaults(Fvar<'a>),
}

impl<'a> InstanceCoords<'a> {
    pub fn len(&self) -> usize {
        match self {
            Self::Explicit(coords) => coords.len(),
            Self::Defaults(fvar) => fvar.axis_count() as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Fixed> {
        match self {
            Self::Explicit(coords) => coords.get(index).map(|coord| coord.get()),
            Self::Defaults(fvar) => fvar
                .axis(index.try_into().ok()?)
                .map(|axis| axis.default_value()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Fixed> + 'a + Clone {
        let this = *self;
        (0..self.len()).filter_map(move |ix| this.get(ix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    fn axis(buf: BeBuffer, tag: &[u8; 4], min: f64, default: f64, max: f64) -> BeBuffer {
        buf.push(Tag::new(tag))
            .extend([min, default, max].map(Fixed::from_f64))
            .push(0u16)
            .push(256u16)
    }

    /// wght 100..900 (default 400) and wdth 75..100 (default 100), with
    /// a 6 byte post script suffix on each instance.
    fn two_axes(instances: &[(u16, [f64; 2], u16)]) -> BeBuffer {
        let mut buf = BeBuffer::new()
            .extend([1u16, 0, 16, 2, 2, 20])
            .push(instances.len() as u16)
            .push(14u16);
        buf = axis(buf, b"wght", 100.0, 400.0, 900.0);
        buf = axis(buf, b"wdth", 75.0, 100.0, 100.0);
        for (subfamily, coords, ps) in instances {
            buf = buf
                .push(*subfamily)
                .push(0u16)
                .extend(coords.map(Fixed::from_f64))
                .push(*ps);
        }
        buf
    }

    #[test]
    fn axes_and_instances() {
        let buf = two_axes(&[(258, [700.0, 100.0], 300)]);
        let fvar = Fvar::read(buf.data().into()).unwrap();
        assert_eq!(fvar.axis_count(), 2);
        let wdth = fvar.axis(1).unwrap();
        assert_eq!(wdth.axis_tag(), Tag::new(b"wdth"));
        assert_eq!(wdth.min_value(), Fixed::from_f64(75.0));
        assert_eq!(wdth.axis_name_id(), NameId::new(256));
        let instance = fvar.instance(0).unwrap();
        assert_eq!(instance.subfamily_name_id, NameId::new(258));
        assert_eq!(instance.coordinates.get(0), Some(Fixed::from_f64(700.0)));
        assert_eq!(instance.post_script_name_id, Some(NameId::new(300)));
    }

    #[test]
    fn synthesized_default_instance() {
        let buf = two_axes(&[(258, [700.0, 100.0], 300)]);
        let fvar = Fvar::read(buf.data().into()).unwrap();
        let instances = fvar
            .instances_with_default(None)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(instances.len(), 2);
        let default = instances[1];
        assert_eq!(default.subfamily_name_id, NameId::SUBFAMILY_NAME);
        assert_eq!(default.post_script_name_id, Some(NameId::POSTSCRIPT_NAME));
        assert_eq!(
            default.coordinates.iter().collect::<Vec<_>>(),
            [Fixed::from_f64(400.0), Fixed::from_f64(100.0)]
        );
    }

    #[test]
    fn explicit_default_instance() {
        let buf = two_axes(&[(2, [400.0, 100.0], 6), (258, [700.0, 100.0], 300)]);
        let fvar = Fvar::read(buf.data().into()).unwrap();
        assert_eq!(fvar.instances_with_default(None).count(), 2);
    }

    #[test]
    fn bad_record_sizes() {
        let mut bytes = two_axes(&[]).into_vec();
        // axis size of 16
        bytes[11] = 16;
        assert_eq!(
            Fvar::read(FontData::new(&bytes)).err(),
            Some(ReadError::VariationParse("axis record size too small"))
        );
        let mut bytes = two_axes(&[]).into_vec();
        // instance size of 10 cannot hold two coordinates
        bytes[15] = 10;
        assert!(matches!(
            Fvar::read(FontData::new(&bytes)),
            Err(ReadError::VariationParse(_))
        ));
    }

    #[test]
    fn normalize() {
        let buf = two_axes(&[]);
        let fvar = Fvar::read(buf.data().into()).unwrap();
        let axis = fvar.axis(0).unwrap();
        let values = [50.0, 100.0, 250.0, 400.0, 650.0, 900.0, 1000.0];
        let expected = [-1.0, -1.0, -0.5, 0.0, 0.5, 1.0, 1.0];
        for (value, expected) in values.into_iter().zip(expected) {
            assert_eq!(
                axis.normalize(Fixed::from_f64(value)),
                Fixed::from_f64(expected)
            );
        }
        let mut coords = [F2Dot14::ZERO; 2];
        fvar.normalize_coords(None, &[Fixed::from_f64(650.0)], &mut coords);
        assert_eq!(coords, [F2Dot14::from_f32(0.5), F2Dot14::ZERO]);
    }
}
