//! Glyph outlines and a small TrueType font built from them.

use textcore_types::{F2Dot14, Tag};

use crate::{bebuffer::BeBuffer, font_builder::FontBuilder};

const ON_CURVE: u8 = 0x01;
const X_SHORT: u8 = 0x02;
const Y_SHORT: u8 = 0x04;
const REPEAT: u8 = 0x08;
const X_SAME_OR_POSITIVE: u8 = 0x10;
const Y_SAME_OR_POSITIVE: u8 = 0x20;

/// Encodes a simple glyph from contours of `(x, y, on_curve)` points.
///
/// The bounding box is computed from the points, equal consecutive flags
/// are merged with the repeat flag and no padding is added.
pub fn simple(contours: &[&[(i16, i16, bool)]]) -> Vec<u8> {
    let points = contours.iter().flat_map(|c| c.iter()).collect::<Vec<_>>();
    let x_min = points.iter().map(|p| p.0).min().unwrap_or(0);
    let y_min = points.iter().map(|p| p.1).min().unwrap_or(0);
    let x_max = points.iter().map(|p| p.0).max().unwrap_or(0);
    let y_max = points.iter().map(|p| p.1).max().unwrap_or(0);
    let mut buf = BeBuffer::new()
        .push(contours.len() as i16)
        .extend([x_min, y_min, x_max, y_max]);
    let mut end = 0u16;
    for contour in contours {
        end += contour.len() as u16;
        buf = buf.push(end - 1);
    }
    // no instructions
    buf = buf.push(0u16);

    let mut flags = Vec::new();
    let mut x_coords = BeBuffer::new();
    let mut y_coords = BeBuffer::new();
    let (mut last_x, mut last_y) = (0i16, 0i16);
    for &&(x, y, on_curve) in &points {
        let mut flag = if on_curve { ON_CURVE } else { 0 };
        let (dx, dy) = (x - last_x, y - last_y);
        (last_x, last_y) = (x, y);
        x_coords = encode_delta(x_coords, dx, &mut flag, X_SHORT, X_SAME_OR_POSITIVE);
        y_coords = encode_delta(y_coords, dy, &mut flag, Y_SHORT, Y_SAME_OR_POSITIVE);
        flags.push(flag);
    }
    let mut packed_flags = Vec::new();
    let mut ix = 0;
    while ix < flags.len() {
        let flag = flags[ix];
        let repeats = flags[ix + 1..]
            .iter()
            .take_while(|f| **f == flag)
            .take(255)
            .count();
        if repeats > 0 {
            packed_flags.extend([flag | REPEAT, repeats as u8]);
        } else {
            packed_flags.push(flag);
        }
        ix += repeats + 1;
    }
    buf.extend_bytes(&packed_flags)
        .extend_bytes(x_coords.data())
        .extend_bytes(y_coords.data())
        .into_vec()
}

fn encode_delta(buf: BeBuffer, delta: i16, flag: &mut u8, short: u8, same_or_pos: u8) -> BeBuffer {
    if delta == 0 {
        *flag |= same_or_pos;
        buf
    } else if delta.unsigned_abs() <= 255 {
        *flag |= short;
        if delta > 0 {
            *flag |= same_or_pos;
        }
        buf.push(delta.unsigned_abs() as u8)
    } else {
        buf.push(delta)
    }
}

/// An on-curve rectangle, starting at the bottom left corner and going
/// clockwise.
pub fn rectangle(x0: i16, y0: i16, x1: i16, y1: i16) -> Vec<u8> {
    simple(&[&[
        (x0, y0, true),
        (x0, y1, true),
        (x1, y1, true),
        (x1, y0, true),
    ]])
}

/// A digit zero: two contours of quadratic curves.
#[rustfmt::skip]
pub fn zero() -> Vec<u8> {
    simple(&[
        &[
            (614, 1434, true), (369, 1434, false), (369, 614, true),
            (369, 471, false), (435, 338, true), (502, 205, false),
            (614, 205, true), (860, 205, false), (860, 1024, true),
            (860, 1167, false), (793, 1300, true), (727, 1434, false),
        ],
        &[
            (614, 1638, true), (1024, 1638, false), (1024, 819, true),
            (1024, 0, false), (614, 0, true), (205, 0, false),
            (205, 819, true), (205, 1638, false),
        ],
    ])
}

/// A component of a composite glyph.
#[derive(Clone, Copy, Debug)]
pub struct ComponentSpec {
    pub glyph: u16,
    pub flags: u16,
    pub arg1: i32,
    pub arg2: i32,
    pub transform: Option<[f32; 4]>,
}

impl ComponentSpec {
    const ARGS_ARE_XY_VALUES: u16 = 0x0002;
    const USE_MY_METRICS: u16 = 0x0200;
    const SCALED_COMPONENT_OFFSET: u16 = 0x0800;

    /// A component translated by `(dx, dy)`.
    pub fn offset(glyph: u16, dx: i16, dy: i16) -> Self {
        Self {
            glyph,
            flags: Self::ARGS_ARE_XY_VALUES,
            arg1: dx as i32,
            arg2: dy as i32,
            transform: None,
        }
    }

    /// A component whose point `component` is aligned on point `base` of
    /// the parent.
    pub fn anchored(glyph: u16, base: u16, component: u16) -> Self {
        Self {
            glyph,
            flags: 0,
            arg1: base as i32,
            arg2: component as i32,
            transform: None,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.transform = Some([scale, 0.0, 0.0, scale]);
        self
    }

    /// `[xx, yx, xy, yy]`
    pub fn with_two_by_two(mut self, matrix: [f32; 4]) -> Self {
        self.transform = Some(matrix);
        self
    }

    pub fn use_my_metrics(mut self) -> Self {
        self.flags |= Self::USE_MY_METRICS;
        self
    }

    pub fn scaled_offset(mut self) -> Self {
        self.flags |= Self::SCALED_COMPONENT_OFFSET;
        self
    }
}

/// Encodes a composite glyph with an empty bounding box.
pub fn composite(components: &[ComponentSpec]) -> Vec<u8> {
    composite_with_bbox(components, [0, 0, 0, 0])
}

/// Encodes a composite glyph with the given `[xMin, yMin, xMax, yMax]`.
pub fn composite_with_bbox(components: &[ComponentSpec], bbox: [i16; 4]) -> Vec<u8> {
    const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
    const WE_HAVE_A_SCALE: u16 = 0x0008;
    const MORE_COMPONENTS: u16 = 0x0020;
    const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
    let mut buf = BeBuffer::new().push(-1i16).extend(bbox);
    for (ix, component) in components.iter().enumerate() {
        let mut flags = component.flags;
        if ix + 1 < components.len() {
            flags |= MORE_COMPONENTS;
        }
        let is_xy = flags & ComponentSpec::ARGS_ARE_XY_VALUES != 0;
        let fits_byte = |arg: i32| {
            if is_xy {
                i8::try_from(arg).is_ok()
            } else {
                u8::try_from(arg).is_ok()
            }
        };
        let words = !(fits_byte(component.arg1) && fits_byte(component.arg2));
        if words {
            flags |= ARG_1_AND_2_ARE_WORDS;
        }
        match component.transform {
            Some(matrix) if is_uniform_scale(matrix) => flags |= WE_HAVE_A_SCALE,
            Some(_) => flags |= WE_HAVE_A_TWO_BY_TWO,
            None => {}
        }
        buf = buf.push(flags).push(component.glyph);
        buf = match (words, is_xy) {
            (true, true) => buf.extend([component.arg1 as i16, component.arg2 as i16]),
            (true, false) => buf.extend([component.arg1 as u16, component.arg2 as u16]),
            (false, true) => buf.extend([component.arg1 as i8, component.arg2 as i8]),
            (false, false) => buf.extend([component.arg1 as u8, component.arg2 as u8]),
        };
        buf = match component.transform {
            Some(matrix) if is_uniform_scale(matrix) => buf.push(F2Dot14::from_f32(matrix[0])),
            Some(matrix) => buf.extend(matrix.map(F2Dot14::from_f32)),
            None => buf,
        };
    }
    buf.into_vec()
}

fn is_uniform_scale([xx, yx, xy, yy]: [f32; 4]) -> bool {
    xx == yy && yx == 0.0 && xy == 0.0
}

/// Glyph ids of [`outline_font`].
pub mod gids {
    pub const NOTDEF: u16 = 0;
    pub const ZERO: u16 = 1;
    pub const ONE: u16 = 2;
    pub const FIVE: u16 = 3;
    /// `FIVE` plus `ONE` translated by (111, 234).
    pub const SIX: u16 = 4;
    /// `FIVE` plus `ONE` scaled by 0.5 and translated by (56, 117).
    pub const SEVEN: u16 = 5;
    /// `FIVE` plus `ONE` with its first point aligned on the third point
    /// of `FIVE`.
    pub const EIGHT: u16 = 6;
    /// `SIX` nested in another composite, using its metrics.
    pub const NINE: u16 = 7;
}

/// Advance widths of the glyphs of [`outline_font`].
pub const ADVANCES: [u16; 8] = [680, 1229, 819, 500, 600, 700, 800, 900];

/// A TrueType font with `head`, `maxp`, `hhea`, `hmtx`, `loca` and `glyf`
/// tables holding the glyphs listed in [`gids`].
///
/// Left side bearings are equal to the glyph minimum x so that outlines
/// are not shifted.
pub fn outline_font() -> Vec<u8> {
    outline_tables().build()
}

/// The tables of [`outline_font`], ready for more to be added.
pub fn outline_tables() -> FontBuilder {
    let five = rectangle(0, 0, 400, 100);
    let one = rectangle(205, 0, 614, 1638);
    let composite_bbox = [0, 0, 725, 1872];
    let glyphs = [
        Vec::new(),
        zero(),
        one,
        five,
        composite_with_bbox(
            &[
                ComponentSpec::offset(gids::FIVE, 0, 0),
                ComponentSpec::offset(gids::ONE, 111, 234),
            ],
            composite_bbox,
        ),
        composite_with_bbox(
            &[
                ComponentSpec::offset(gids::FIVE, 0, 0),
                ComponentSpec::offset(gids::ONE, 56, 117).with_scale(0.5),
            ],
            [0, 0, 400, 936],
        ),
        composite_with_bbox(
            &[
                ComponentSpec::offset(gids::FIVE, 0, 0),
                ComponentSpec::anchored(gids::ONE, 2, 0),
            ],
            [0, 0, 809, 1738],
        ),
        composite_with_bbox(
            &[ComponentSpec::offset(gids::SIX, 10, 0).use_my_metrics()],
            [10, 0, 735, 1872],
        ),
    ];
    let lsbs = [0i16, 205, 205, 0, 0, 0, 0, 10];

    let mut glyf = Vec::new();
    let mut loca = BeBuffer::new().push(0u32);
    for glyph in &glyphs {
        glyf.extend_from_slice(glyph);
        while glyf.len() % 4 != 0 {
            glyf.push(0);
        }
        loca = loca.push(glyf.len() as u32);
    }
    let long_metrics = ADVANCES.into_iter().zip(lsbs).collect::<Vec<_>>();

    let mut builder = FontBuilder::default();
    builder
        .add_table(Tag::new(b"head"), crate::head(2048, 1))
        .add_table(Tag::new(b"maxp"), crate::maxp(glyphs.len() as u16))
        .add_table(
            Tag::new(b"hhea"),
            crate::hhea(1900, -500, 0, glyphs.len() as u16),
        )
        .add_table(Tag::new(b"hmtx"), crate::hmtx(&long_metrics, &[]))
        .add_table(Tag::new(b"loca"), loca.into_vec())
        .add_table(Tag::new(b"glyf"), glyf);
    builder
}
