//! The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table

use types::{BigEndian, BoundingBox, F2Dot14, FixedSize, GlyphId, Tag};

use crate::{Cursor, FontData, FontRead, ReadError, TopLevelTable};

/// 'glyf'
pub const TAG: Tag = Tag::new(b"glyf");

/// The glyph data table; glyphs are located through the
/// [`loca`](super::loca) table.
#[derive(Clone, Copy)]
pub struct Glyf<'a> {
    data: FontData<'a>,
}

impl TopLevelTable for Glyf<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Glyf<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Glyf { data })
    }
}

impl<'a> Glyf<'a> {
    /// The data that `loca` offsets are relative to.
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }
}

/// The header shared by simple and composite glyphs.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct GlyphHeader {
    pub number_of_contours: BigEndian<i16>,
    pub x_min: BigEndian<i16>,
    pub y_min: BigEndian<i16>,
    pub x_max: BigEndian<i16>,
    pub y_max: BigEndian<i16>,
}

impl FixedSize for GlyphHeader {
    const RAW_BYTE_LEN: usize = 10;
}

impl GlyphHeader {
    /// Negative for composite glyphs.
    pub fn number_of_contours(&self) -> i16 {
        self.number_of_contours.get()
    }

    pub fn bbox(&self) -> BoundingBox<i16> {
        BoundingBox {
            x_min: self.x_min.get(),
            y_min: self.y_min.get(),
            x_max: self.x_max.get(),
            y_max: self.y_max.get(),
        }
    }
}

/// A glyph with an outline.
#[derive(Clone, Copy)]
pub enum Glyph<'a> {
    Simple(SimpleGlyph<'a>),
    Composite(CompositeGlyph<'a>),
}

impl<'a> FontRead<'a> for Glyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let header: &GlyphHeader = data.read_ref_at(0)?;
        if header.number_of_contours() >= 0 {
            SimpleGlyph::read(data).map(Glyph::Simple)
        } else {
            CompositeGlyph::read(data).map(Glyph::Composite)
        }
    }
}

impl<'a> Glyph<'a> {
    pub fn header(&self) -> &'a GlyphHeader {
        match self {
            Self::Simple(glyph) => glyph.header,
            Self::Composite(glyph) => glyph.header,
        }
    }

    pub fn number_of_contours(&self) -> i16 {
        self.header().number_of_contours()
    }

    /// The bounding box declared in the glyph header.
    pub fn bbox(&self) -> BoundingBox<i16> {
        self.header().bbox()
    }
}

/// Flags of the points of a simple glyph.
pub mod simple_flags {
    pub const ON_CURVE_POINT: u8 = 0x01;
    pub const X_SHORT_VECTOR: u8 = 0x02;
    pub const Y_SHORT_VECTOR: u8 = 0x04;
    pub const REPEAT_FLAG: u8 = 0x08;
    /// With a short vector: the sign of the value, else the coordinate is
    /// the same as the previous one.
    pub const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR: u8 = 0x10;
    pub const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR: u8 = 0x20;
    pub const OVERLAP_SIMPLE: u8 = 0x40;
}

/// A glyph made of contours of quadratic curves.
#[derive(Clone, Copy)]
pub struct SimpleGlyph<'a> {
    header: &'a GlyphHeader,
    end_pts_of_contours: &'a [BigEndian<u16>],
    instructions: &'a [u8],
    flags: &'a [u8],
    x_coords: &'a [u8],
    y_coords: &'a [u8],
}

impl<'a> FontRead<'a> for SimpleGlyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let header: &GlyphHeader = data.read_ref_at(0)?;
        cursor.advance_by(GlyphHeader::RAW_BYTE_LEN);
        let n_contours = header.number_of_contours().max(0) as usize;
        let end_pts_of_contours: &[BigEndian<u16>] = cursor.read_array(n_contours)?;
        let instruction_len = cursor.read::<u16>()?;
        let instructions = cursor.read_bytes(instruction_len as usize)?;
        let num_points = end_pts_of_contours
            .last()
            .map(|last| last.get() as usize + 1)
            .unwrap_or(0);
        let glyph_data = cursor.remaining().unwrap_or_default().as_bytes();
        let lengths = resolve_coords_len(glyph_data, num_points)?;
        let (flags, rest) = glyph_data.split_at(lengths.flags);
        let x_coords = rest.get(..lengths.x_coords).ok_or(ReadError::OutOfBounds)?;
        let y_coords = rest
            .get(lengths.x_coords..lengths.x_coords + lengths.y_coords)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(SimpleGlyph {
            header,
            end_pts_of_contours,
            instructions,
            flags,
            x_coords,
            y_coords,
        })
    }
}

impl<'a> SimpleGlyph<'a> {
    pub fn header(&self) -> &'a GlyphHeader {
        self.header
    }

    /// Index of the last point of each contour.
    pub fn end_pts_of_contours(&self) -> &'a [BigEndian<u16>] {
        self.end_pts_of_contours
    }

    pub fn instructions(&self) -> &'a [u8] {
        self.instructions
    }

    pub fn num_points(&self) -> usize {
        self.end_pts_of_contours
            .last()
            .map(|last| last.get() as usize + 1)
            .unwrap_or(0)
    }

    /// Returns true if the first point carries the overlap flag.
    pub fn has_overlapping_contours(&self) -> bool {
        self.flags
            .first()
            .is_some_and(|flag| flag & simple_flags::OVERLAP_SIMPLE != 0)
    }

    /// Returns an iterator over the points of the glyph, in font units.
    pub fn points(&self) -> impl Iterator<Item = CurvePoint> + 'a + Clone {
        PointIter {
            remaining: self.num_points(),
            flags: FontData::new(self.flags).cursor(),
            x_coords: FontData::new(self.x_coords).cursor(),
            y_coords: FontData::new(self.y_coords).cursor(),
            flag_repeats: 0,
            cur_flags: 0,
            cur_x: 0,
            cur_y: 0,
        }
    }
}

/// A point of a simple glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CurvePoint {
    pub x: i16,
    pub y: i16,
    pub on_curve: bool,
}

impl CurvePoint {
    pub fn on_curve(x: i16, y: i16) -> Self {
        Self {
            x,
            y,
            on_curve: true,
        }
    }

    pub fn off_curve(x: i16, y: i16) -> Self {
        Self {
            x,
            y,
            on_curve: false,
        }
    }
}

#[derive(Clone)]
struct PointIter<'a> {
    remaining: usize,
    flags: Cursor<'a>,
    x_coords: Cursor<'a>,
    y_coords: Cursor<'a>,
    flag_repeats: u8,
    cur_flags: u8,
    cur_x: i16,
    cur_y: i16,
}

impl Iterator for PointIter<'_> {
    type Item = CurvePoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.advance_flags()?;
        self.cur_x = self.cur_x.wrapping_add(read_delta(
            &mut self.x_coords,
            self.cur_flags,
            simple_flags::X_SHORT_VECTOR,
            simple_flags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
        ));
        self.cur_y = self.cur_y.wrapping_add(read_delta(
            &mut self.y_coords,
            self.cur_flags,
            simple_flags::Y_SHORT_VECTOR,
            simple_flags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
        ));
        Some(CurvePoint {
            x: self.cur_x,
            y: self.cur_y,
            on_curve: self.cur_flags & simple_flags::ON_CURVE_POINT != 0,
        })
    }
}

impl PointIter<'_> {
    fn advance_flags(&mut self) -> Option<()> {
        if self.flag_repeats == 0 {
            self.cur_flags = self.flags.read().ok()?;
            if self.cur_flags & simple_flags::REPEAT_FLAG != 0 {
                // the flag is used once more than its repeat count
                self.flag_repeats = self.flags.read::<u8>().ok()?;
                return Some(());
            }
        } else {
            self.flag_repeats -= 1;
        }
        Some(())
    }
}

fn read_delta(cursor: &mut Cursor, flags: u8, short: u8, same_or_positive: u8) -> i16 {
    match (flags & short != 0, flags & same_or_positive != 0) {
        (true, false) => -(cursor.read::<u8>().unwrap_or(0) as i16),
        (true, true) => cursor.read::<u8>().unwrap_or(0) as i16,
        (false, false) => cursor.read::<i16>().unwrap_or(0),
        (false, true) => 0,
    }
}

struct FieldLengths {
    flags: usize,
    x_coords: usize,
    y_coords: usize,
}

/// Walks the flags to find where the x and y coordinate arrays start.
fn resolve_coords_len(data: &[u8], num_points: usize) -> Result<FieldLengths, ReadError> {
    let mut cursor = FontData::new(data).cursor();
    let mut flags_left = num_points;
    let mut x_coords = 0;
    let mut y_coords = 0;
    let coord_len = |flags: u8, short: u8, same_or_positive: u8| {
        match (flags & short != 0, flags & same_or_positive != 0) {
            (true, _) => 1,
            (false, false) => 2,
            (false, true) => 0,
        }
    };
    while flags_left > 0 {
        let flags = cursor.read::<u8>()?;
        let repeats = if flags & simple_flags::REPEAT_FLAG != 0 {
            cursor.read::<u8>()? as usize + 1
        } else {
            1
        };
        if repeats > flags_left {
            return Err(ReadError::MalformedData("repeat count too large in glyf"));
        }
        x_coords += repeats
            * coord_len(
                flags,
                simple_flags::X_SHORT_VECTOR,
                simple_flags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
            );
        y_coords += repeats
            * coord_len(
                flags,
                simple_flags::Y_SHORT_VECTOR,
                simple_flags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
            );
        flags_left -= repeats;
    }
    Ok(FieldLengths {
        flags: cursor.position()?,
        x_coords,
        y_coords,
    })
}

/// Flags of the components of a composite glyph.
pub mod composite_flags {
    pub const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
    pub const ARGS_ARE_XY_VALUES: u16 = 0x0002;
    pub const ROUND_XY_TO_GRID: u16 = 0x0004;
    pub const WE_HAVE_A_SCALE: u16 = 0x0008;
    pub const MORE_COMPONENTS: u16 = 0x0020;
    pub const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
    pub const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
    pub const WE_HAVE_INSTRUCTIONS: u16 = 0x0100;
    pub const USE_MY_METRICS: u16 = 0x0200;
    pub const OVERLAP_COMPOUND: u16 = 0x0400;
    pub const SCALED_COMPONENT_OFFSET: u16 = 0x0800;
    pub const UNSCALED_COMPONENT_OFFSET: u16 = 0x1000;
}

/// A glyph assembled from transformed references to other glyphs.
#[derive(Clone, Copy)]
pub struct CompositeGlyph<'a> {
    header: &'a GlyphHeader,
    component_data: FontData<'a>,
}

impl<'a> FontRead<'a> for CompositeGlyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let header: &GlyphHeader = data.read_ref_at(0)?;
        let component_data = data
            .split_off(GlyphHeader::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        let mut cursor = component_data.cursor();
        while read_component(&mut cursor)?.flags & composite_flags::MORE_COMPONENTS != 0 {}
        Ok(CompositeGlyph {
            header,
            component_data,
        })
    }
}

impl<'a> CompositeGlyph<'a> {
    pub fn header(&self) -> &'a GlyphHeader {
        self.header
    }

    /// Returns an iterator over the components of the glyph.
    pub fn components(&self) -> impl Iterator<Item = Component> + 'a + Clone {
        ComponentIter {
            done: false,
            cursor: self.component_data.cursor(),
        }
    }

    /// The instructions following the last component, if any.
    pub fn instructions(&self) -> Option<&'a [u8]> {
        let mut cursor = self.component_data.cursor();
        loop {
            let component = read_component(&mut cursor).ok()?;
            if component.flags & composite_flags::MORE_COMPONENTS == 0 {
                if component.flags & composite_flags::WE_HAVE_INSTRUCTIONS == 0 {
                    return None;
                }
                let len = cursor.read::<u16>().ok()?;
                return cursor.read_bytes(len as usize).ok();
            }
        }
    }
}

/// A 2x2 transform applied to the points of a component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub xx: F2Dot14,
    pub yx: F2Dot14,
    pub xy: F2Dot14,
    pub yy: F2Dot14,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            xx: F2Dot14::from_f32(1.0),
            yx: F2Dot14::from_f32(0.0),
            xy: F2Dot14::from_f32(0.0),
            yy: F2Dot14::from_f32(1.0),
        }
    }
}

impl Transform {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the transform to a point.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.xx.to_f32() + y * self.xy.to_f32(),
            x * self.yx.to_f32() + y * self.yy.to_f32(),
        )
    }
}

/// How a component is placed in its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Translated by an offset.
    Offset { x: i16, y: i16 },
    /// Moved so that point `component` of the component lands on point
    /// `base` of the glyph assembled so far.
    Point { base: u16, component: u16 },
}

/// A reference to a glyph inside a composite glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Component {
    pub flags: u16,
    pub glyph: GlyphId,
    pub anchor: Anchor,
    pub transform: Transform,
}

impl Component {
    /// True if the parent uses the metrics of this component.
    pub fn use_my_metrics(&self) -> bool {
        self.flags & composite_flags::USE_MY_METRICS != 0
    }

    /// True if the offset is transformed along with the points.
    pub fn is_scaled_offset(&self) -> bool {
        self.flags
            & (composite_flags::SCALED_COMPONENT_OFFSET | composite_flags::UNSCALED_COMPONENT_OFFSET)
            == composite_flags::SCALED_COMPONENT_OFFSET
    }
}

#[derive(Clone)]
struct ComponentIter<'a> {
    done: bool,
    cursor: Cursor<'a>,
}

impl Iterator for ComponentIter<'_> {
    type Item = Component;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let component = read_component(&mut self.cursor).ok()?;
        self.done = component.flags & composite_flags::MORE_COMPONENTS == 0;
        Some(component)
    }
}

fn read_component(cursor: &mut Cursor) -> Result<Component, ReadError> {
    let flags = cursor.read::<u16>()?;
    let glyph = cursor.read::<GlyphId>()?;
    let args_are_words = flags & composite_flags::ARG_1_AND_2_ARE_WORDS != 0;
    let args_are_xy_values = flags & composite_flags::ARGS_ARE_XY_VALUES != 0;
    let anchor = match (args_are_xy_values, args_are_words) {
        (true, true) => Anchor::Offset {
            x: cursor.read()?,
            y: cursor.read()?,
        },
        (true, false) => Anchor::Offset {
            x: cursor.read::<i8>()? as _,
            y: cursor.read::<i8>()? as _,
        },
        (false, true) => Anchor::Point {
            base: cursor.read()?,
            component: cursor.read()?,
        },
        (false, false) => Anchor::Point {
            base: cursor.read::<u8>()? as _,
            component: cursor.read::<u8>()? as _,
        },
    };
    let mut transform = Transform::default();
    if flags & composite_flags::WE_HAVE_A_SCALE != 0 {
        transform.xx = cursor.read()?;
        transform.yy = transform.xx;
    } else if flags & composite_flags::WE_HAVE_AN_X_AND_Y_SCALE != 0 {
        transform.xx = cursor.read()?;
        transform.yy = cursor.read()?;
    } else if flags & composite_flags::WE_HAVE_A_TWO_BY_TWO != 0 {
        transform.xx = cursor.read()?;
        transform.yx = cursor.read()?;
        transform.xy = cursor.read()?;
        transform.yy = cursor.read()?;
    }
    Ok(Component {
        flags,
        glyph,
        anchor,
        transform,
    })
}
