//! Loading TrueType glyph outlines as points and segments.
//!
//! Glyphs are loaded in font units. Composite glyphs are flattened by
//! loading each component, applying its transform and placement, and
//! appending its points to those of the parent.
//!
//! Every loaded glyph also produces four phantom points which carry the
//! horizontal and vertical metrics through composite assembly:
//!
//! * left: `x = x_min - lsb`
//! * right: `x = left.x + advance`
//! * top: `y = y_max + tsb`
//! * bottom: `y = top.y - vertical advance`
//!
//! The loaded outline is shifted so that the left phantom point sits at
//! the origin.

use smallvec::SmallVec;
use textcore_read::{
    tables::{
        glyf::{Anchor, Glyf, Glyph},
        hvmtx::HVmtx,
        loca::Loca,
    },
    types::{BoundingBox, GlyphId, Pen, Point},
    TableProvider,
};

use crate::{
    metrics::{base_advance, GlyphExtents},
    FontError,
};

/// Maximum nesting depth of composite glyphs.
pub const COMPOSITE_RECURSION_LIMIT: usize = 20;

// Inline capacity covers most simple glyphs.
type PointBuffer = SmallVec<[ContourPoint; 32]>;

const PHANTOM_LEFT: usize = 0;
const PHANTOM_RIGHT: usize = 1;
const PHANTOM_TOP: usize = 2;
const PHANTOM_BOTTOM: usize = 3;

/// A point of a glyph outline, in font units.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct ContourPoint {
    pub x: f32,
    pub y: f32,
    /// True if the point lies on the curve; false for a quadratic
    /// control point.
    pub on_curve: bool,
    /// True for the last point of each contour.
    pub end_of_contour: bool,
}

impl ContourPoint {
    fn point(&self) -> Point<f32> {
        Point::new(self.x, self.y)
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }
}

/// The kind of a path segment.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SegmentOp {
    /// Starts a new contour at `args[0]`.
    Move,
    /// Straight line to `args[0]`.
    Line,
    /// Quadratic curve through control point `args[0]` to `args[1]`.
    Quad,
    /// Cubic curve through `args[0]` and `args[1]` to `args[2]`.
    Cube,
}

/// A path segment; only the first arguments used by `op` are meaningful.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Segment {
    pub op: SegmentOp,
    pub args: [Point<f32>; 3],
}

impl Segment {
    pub fn move_to(to: Point<f32>) -> Self {
        Self {
            op: SegmentOp::Move,
            args: [to, Point::default(), Point::default()],
        }
    }

    pub fn line_to(to: Point<f32>) -> Self {
        Self {
            op: SegmentOp::Line,
            args: [to, Point::default(), Point::default()],
        }
    }

    pub fn quad_to(control: Point<f32>, to: Point<f32>) -> Self {
        Self {
            op: SegmentOp::Quad,
            args: [control, to, Point::default()],
        }
    }

    pub fn cube_to(control0: Point<f32>, control1: Point<f32>, to: Point<f32>) -> Self {
        Self {
            op: SegmentOp::Cube,
            args: [control0, control1, to],
        }
    }

    /// The final point of the segment.
    pub fn end_point(&self) -> Point<f32> {
        match self.op {
            SegmentOp::Move | SegmentOp::Line => self.args[0],
            SegmentOp::Quad => self.args[1],
            SegmentOp::Cube => self.args[2],
        }
    }
}

/// Converts the points of a TrueType outline into path segments.
///
/// Each contour starts with a `Move` to its first on-curve point. When a
/// contour starts with an off-curve point, the start is the next on-curve
/// point, or the midpoint of the first two points when both are off-curve.
/// Two consecutive off-curve points imply an on-curve point halfway
/// between them. Contours are closed explicitly back to their start.
pub fn build_segments(points: &[ContourPoint]) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(points.len() + 1);
    let mut first_on: Option<Point<f32>> = None;
    let mut first_off: Option<Point<f32>> = None;
    let mut last_off: Option<Point<f32>> = None;
    for point in points {
        let p = point.point();
        match (first_on, last_off) {
            (None, _) => {
                if point.on_curve {
                    first_on = Some(p);
                    segments.push(Segment::move_to(p));
                } else if let Some(off) = first_off {
                    let mid = off.midpoint(p);
                    first_on = Some(mid);
                    last_off = Some(p);
                    segments.push(Segment::move_to(mid));
                } else {
                    first_off = Some(p);
                }
            }
            (Some(_), None) => {
                if point.on_curve {
                    segments.push(Segment::line_to(p));
                } else {
                    last_off = Some(p);
                }
            }
            (Some(_), Some(off)) => {
                if point.on_curve {
                    segments.push(Segment::quad_to(off, p));
                    last_off = None;
                } else {
                    segments.push(Segment::quad_to(off, off.midpoint(p)));
                    last_off = Some(p);
                }
            }
        }
        if point.end_of_contour {
            let start = match (first_on, first_off) {
                (Some(start), _) => start,
                // a lone off-curve point starts and ends its own contour
                (None, Some(first)) => {
                    segments.push(Segment::move_to(first));
                    first
                }
                (None, None) => continue,
            };
            match (first_off, last_off) {
                (None, None) => segments.push(Segment::line_to(start)),
                (None, Some(last)) => segments.push(Segment::quad_to(last, start)),
                (Some(first), None) => segments.push(Segment::quad_to(first, start)),
                (Some(first), Some(last)) => {
                    segments.push(Segment::quad_to(last, last.midpoint(first)));
                    segments.push(Segment::quad_to(first, start));
                }
            }
            first_on = None;
            first_off = None;
            last_off = None;
        }
    }
    segments
}

/// Sends segments to a pen, closing each contour before the next one
/// starts and after the last.
pub fn draw_segments(segments: &[Segment], pen: &mut impl Pen) {
    let mut open = false;
    for segment in segments {
        let [a, b, c] = segment.args;
        match segment.op {
            SegmentOp::Move => {
                if open {
                    pen.close();
                }
                pen.move_to(a.x, a.y);
                open = true;
            }
            SegmentOp::Line => pen.line_to(a.x, a.y),
            SegmentOp::Quad => pen.quad_to(a.x, a.y, b.x, b.y),
            SegmentOp::Cube => pen.curve_to(a.x, a.y, b.x, b.y, c.x, c.y),
        }
    }
    if open {
        pen.close();
    }
}

/// The points of a fully loaded glyph.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct GlyphPoints {
    /// Outline points, composites flattened.
    pub points: Vec<ContourPoint>,
    /// Left, right, top and bottom phantom points.
    pub phantoms: [Point<f32>; 4],
}

impl GlyphPoints {
    /// Horizontal advance carried by the phantom points.
    pub fn advance(&self) -> f32 {
        self.phantoms[PHANTOM_RIGHT].x - self.phantoms[PHANTOM_LEFT].x
    }

    /// Vertical advance carried by the phantom points.
    pub fn vertical_advance(&self) -> f32 {
        self.phantoms[PHANTOM_TOP].y - self.phantoms[PHANTOM_BOTTOM].y
    }

    /// Bounds of the outline points, or `None` for an empty glyph.
    pub fn bounds(&self) -> Option<BoundingBox<f32>> {
        let first = self.points.first()?;
        let init = BoundingBox {
            x_min: first.x,
            y_min: first.y,
            x_max: first.x,
            y_max: first.y,
        };
        Some(self.points.iter().fold(init, |bounds, p| BoundingBox {
            x_min: bounds.x_min.min(p.x),
            y_min: bounds.y_min.min(p.y),
            x_max: bounds.x_max.max(p.x),
            y_max: bounds.y_max.max(p.y),
        }))
    }

    /// Ink extents of the outline points.
    pub fn extents(&self) -> GlyphExtents {
        self.bounds()
            .map(|bounds| GlyphExtents {
                x_bearing: bounds.x_min,
                y_bearing: bounds.y_max,
                width: bounds.x_max - bounds.x_min,
                height: bounds.y_min - bounds.y_max,
            })
            .unwrap_or_default()
    }

    pub fn segments(&self) -> Vec<Segment> {
        build_segments(&self.points)
    }
}

/// Loader for the glyphs of the `glyf` table.
#[derive(Clone)]
pub struct Outlines<'a> {
    loca: Loca<'a>,
    glyf: Glyf<'a>,
    hmtx: Option<HVmtx<'a>>,
    vmtx: Option<HVmtx<'a>>,
    units_per_em: u16,
    glyph_count: u16,
}

impl<'a> Outlines<'a> {
    /// Creates a loader for the given font.
    ///
    /// Fails with [`FontError::NoSources`] when the font has no `glyf`
    /// table.
    pub fn new(font: &impl TableProvider<'a>) -> Result<Self, FontError> {
        let (Ok(loca), Ok(glyf)) = (font.loca(None), font.glyf()) else {
            return Err(FontError::NoSources);
        };
        Ok(Self {
            loca,
            glyf,
            hmtx: font.hmtx().ok(),
            vmtx: font.vmtx().ok(),
            units_per_em: font.head()?.units_per_em(),
            glyph_count: font.maxp()?.num_glyphs(),
        })
    }

    /// Returns the number of glyphs in the font.
    pub fn glyph_count(&self) -> u16 {
        self.glyph_count
    }

    /// Loads the points of a glyph, including the phantom points.
    pub fn points(&self, glyph_id: GlyphId) -> Result<GlyphPoints, FontError> {
        if glyph_id.to_u16() >= self.glyph_count {
            return Err(FontError::GlyphNotFound(glyph_id));
        }
        let mut points = PointBuffer::new();
        let mut phantoms = self.load(glyph_id, 0, &mut points)?;
        let dx = -phantoms[PHANTOM_LEFT].x;
        if dx != 0.0 {
            points.iter_mut().for_each(|p| p.translate(dx, 0.0));
            phantoms.iter_mut().for_each(|p| p.x += dx);
        }
        Ok(GlyphPoints {
            points: points.into_vec(),
            phantoms,
        })
    }

    /// Loads a glyph as path segments.
    pub fn segments(&self, glyph_id: GlyphId) -> Result<Vec<Segment>, FontError> {
        Ok(self.points(glyph_id)?.segments())
    }

    /// Loads a glyph and sends its outline to `pen`.
    pub fn draw(&self, glyph_id: GlyphId, pen: &mut impl Pen) -> Result<(), FontError> {
        draw_segments(&self.segments(glyph_id)?, pen);
        Ok(())
    }

    /// Returns the ink extents of a glyph from the bounding box in its
    /// header, with the left side bearing from `hmtx` when available.
    ///
    /// Empty glyphs have empty extents.
    pub fn header_extents(&self, glyph_id: GlyphId) -> Result<GlyphExtents, FontError> {
        if glyph_id.to_u16() >= self.glyph_count {
            return Err(FontError::GlyphNotFound(glyph_id));
        }
        let Some(glyph) = self.loca.get_glyf(glyph_id, &self.glyf)? else {
            return Ok(GlyphExtents::default());
        };
        let bbox = glyph.bbox();
        let lsb = self
            .hmtx
            .as_ref()
            .and_then(|hmtx| hmtx.side_bearing(glyph_id))
            .unwrap_or(bbox.x_min);
        Ok(GlyphExtents {
            x_bearing: lsb as f32,
            y_bearing: bbox.y_max as f32,
            width: (bbox.x_max as f32 - bbox.x_min as f32),
            height: (bbox.y_min as f32 - bbox.y_max as f32),
        })
    }

    fn phantoms(&self, glyph_id: GlyphId, glyph: Option<&Glyph>) -> [Point<f32>; 4] {
        let (x_min, y_max) = glyph
            .map(|glyph| {
                let bbox = glyph.bbox();
                (bbox.x_min, bbox.y_max)
            })
            .unwrap_or_default();
        let bearing = |mtx: &Option<HVmtx>| {
            mtx.as_ref()
                .and_then(|mtx| mtx.side_bearing(glyph_id))
                .unwrap_or_default() as f32
        };
        let h_advance = base_advance(self.hmtx.as_ref(), glyph_id, self.units_per_em) as f32;
        let v_advance = base_advance(self.vmtx.as_ref(), glyph_id, self.units_per_em) as f32;
        let left = x_min as f32 - bearing(&self.hmtx);
        let top = y_max as f32 + bearing(&self.vmtx);
        [
            Point::new(left, 0.0),
            Point::new(left + h_advance, 0.0),
            Point::new(0.0, top),
            Point::new(0.0, top - v_advance),
        ]
    }

    // Appends the points of the glyph to `out` and returns its phantom
    // points. Parent points are the ones in `out` when called.
    fn load(
        &self,
        glyph_id: GlyphId,
        depth: usize,
        out: &mut PointBuffer,
    ) -> Result<[Point<f32>; 4], FontError> {
        if depth > COMPOSITE_RECURSION_LIMIT {
            return Err(FontError::RecursionLimitExceeded(glyph_id));
        }
        let glyph = self.loca.get_glyf(glyph_id, &self.glyf)?;
        let mut phantoms = self.phantoms(glyph_id, glyph.as_ref());
        match glyph {
            None => {}
            Some(Glyph::Simple(simple)) => {
                let mut ends = simple
                    .end_pts_of_contours()
                    .iter()
                    .map(|end| end.get() as usize)
                    .peekable();
                for (ix, point) in simple.points().enumerate() {
                    let end_of_contour = ends.peek() == Some(&ix);
                    if end_of_contour {
                        ends.next();
                    }
                    out.push(ContourPoint {
                        x: point.x as f32,
                        y: point.y as f32,
                        on_curve: point.on_curve,
                        end_of_contour,
                    });
                }
            }
            Some(Glyph::Composite(composite)) => {
                let base = out.len();
                for component in composite.components() {
                    let mut child = PointBuffer::new();
                    let child_phantoms = self.load(component.glyph, depth + 1, &mut child)?;
                    if component.use_my_metrics() {
                        phantoms = child_phantoms;
                    }
                    let transform = component.transform;
                    match component.anchor {
                        Anchor::Offset { x, y } => {
                            let (dx, dy) = (x as f32, y as f32);
                            let scaled = component.is_scaled_offset();
                            for p in child.iter_mut() {
                                if scaled {
                                    (p.x, p.y) = transform.apply(p.x + dx, p.y + dy);
                                } else {
                                    (p.x, p.y) = transform.apply(p.x, p.y);
                                    p.translate(dx, dy);
                                }
                            }
                        }
                        Anchor::Point {
                            base: base_point,
                            component: child_point,
                        } => {
                            for p in child.iter_mut() {
                                (p.x, p.y) = transform.apply(p.x, p.y);
                            }
                            match (
                                out.get(base + base_point as usize),
                                child.get(child_point as usize),
                            ) {
                                (Some(parent), Some(anchor)) => {
                                    let (dx, dy) = (parent.x - anchor.x, parent.y - anchor.y);
                                    child.iter_mut().for_each(|p| p.translate(dx, dy));
                                }
                                _ => log::debug!(
                                    "glyph {glyph_id}: anchor points {base_point}/{child_point} out of range"
                                ),
                            }
                        }
                    }
                    out.extend(child);
                }
            }
        }
        Ok(phantoms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use textcore_read::{types::PenCommand, FontRef};
    use textcore_test_data::glyf::{gids, outline_font, ADVANCES};

    fn p(x: f32, y: f32) -> Point<f32> {
        Point::new(x, y)
    }

    fn on(x: f32, y: f32) -> ContourPoint {
        ContourPoint {
            x,
            y,
            on_curve: true,
            end_of_contour: false,
        }
    }

    fn off(x: f32, y: f32) -> ContourPoint {
        ContourPoint {
            on_curve: false,
            ..on(x, y)
        }
    }

    fn end(point: ContourPoint) -> ContourPoint {
        ContourPoint {
            end_of_contour: true,
            ..point
        }
    }

    fn xy(points: &GlyphPoints) -> Vec<(f32, f32)> {
        points.points.iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn zero_segments() {
        let data = outline_font();
        let font = FontRef::new(&data).unwrap();
        let outlines = Outlines::new(&font).unwrap();
        let segments = outlines.segments(GlyphId::new(gids::ZERO)).unwrap();
        let expected = vec![
            Segment::move_to(p(614.0, 1434.0)),
            Segment::quad_to(p(369.0, 1434.0), p(369.0, 614.0)),
            Segment::quad_to(p(369.0, 471.0), p(435.0, 338.0)),
            Segment::quad_to(p(502.0, 205.0), p(614.0, 205.0)),
            Segment::quad_to(p(860.0, 205.0), p(860.0, 1024.0)),
            Segment::quad_to(p(860.0, 1167.0), p(793.0, 1300.0)),
            Segment::quad_to(p(727.0, 1434.0), p(614.0, 1434.0)),
            Segment::move_to(p(614.0, 1638.0)),
            Segment::quad_to(p(1024.0, 1638.0), p(1024.0, 819.0)),
            Segment::quad_to(p(1024.0, 0.0), p(614.0, 0.0)),
            Segment::quad_to(p(205.0, 0.0), p(205.0, 819.0)),
            Segment::quad_to(p(205.0, 1638.0), p(614.0, 1638.0)),
        ];
        assert_eq!(segments, expected);
    }

    #[test]
    fn rectangle_closes_with_line() {
        let data = outline_font();
        let font = FontRef::new(&data).unwrap();
        let outlines = Outlines::new(&font).unwrap();
        let segments = outlines.segments(GlyphId::new(gids::FIVE)).unwrap();
        let ops = segments.iter().map(|s| s.op).collect::<Vec<_>>();
        assert_eq!(
            ops,
            [
                SegmentOp::Move,
                SegmentOp::Line,
                SegmentOp::Line,
                SegmentOp::Line,
                SegmentOp::Line
            ]
        );
        assert_eq!(segments[4].end_point(), p(0.0, 0.0));
    }

    #[test]
    fn off_curve_start() {
        // both ends off-curve: the start is the midpoint of the first two
        let points = [
            off(0.0, 0.0),
            off(100.0, 0.0),
            on(100.0, 100.0),
            end(off(0.0, 100.0)),
        ];
        assert_eq!(
            build_segments(&points),
            [
                Segment::move_to(p(50.0, 0.0)),
                Segment::quad_to(p(100.0, 0.0), p(100.0, 100.0)),
                Segment::quad_to(p(0.0, 100.0), p(0.0, 50.0)),
                Segment::quad_to(p(0.0, 0.0), p(50.0, 0.0)),
            ]
        );
        // only the first point off-curve
        let points = [off(0.0, 0.0), on(100.0, 0.0), end(on(100.0, 100.0))];
        assert_eq!(
            build_segments(&points),
            [
                Segment::move_to(p(100.0, 0.0)),
                Segment::line_to(p(100.0, 100.0)),
                Segment::quad_to(p(0.0, 0.0), p(100.0, 0.0)),
            ]
        );
    }

    #[test]
    fn off_curve_only_contours() {
        let points = [end(off(10.0, 20.0)), on(0.0, 0.0), end(on(5.0, 0.0))];
        assert_eq!(
            build_segments(&points),
            [
                Segment::move_to(p(10.0, 20.0)),
                Segment::quad_to(p(10.0, 20.0), p(10.0, 20.0)),
                Segment::move_to(p(0.0, 0.0)),
                Segment::line_to(p(5.0, 0.0)),
                Segment::line_to(p(0.0, 0.0)),
            ]
        );
        let points = [off(0.0, 0.0), off(100.0, 0.0), end(off(100.0, 100.0))];
        let segments = build_segments(&points);
        assert_eq!(segments[0], Segment::move_to(p(50.0, 0.0)));
        assert_eq!(segments.last().map(|s| s.end_point()), Some(p(50.0, 0.0)));
        assert!(segments
            .iter()
            .skip(1)
            .all(|s| s.op != SegmentOp::Move));
    }

    #[test]
    fn draw_closes_contours() {
        let points = [on(0.0, 0.0), end(on(10.0, 0.0)), on(5.0, 5.0), end(on(6.0, 6.0))];
        let mut commands = Vec::<PenCommand>::new();
        draw_segments(&build_segments(&points), &mut commands);
        assert_eq!(
            commands,
            [
                PenCommand::MoveTo { x: 0.0, y: 0.0 },
                PenCommand::LineTo { x: 10.0, y: 0.0 },
                PenCommand::LineTo { x: 0.0, y: 0.0 },
                PenCommand::Close,
                PenCommand::MoveTo { x: 5.0, y: 5.0 },
                PenCommand::LineTo { x: 6.0, y: 6.0 },
                PenCommand::LineTo { x: 5.0, y: 5.0 },
                PenCommand::Close,
            ]
        );
    }

    #[test]
    fn phantom_points() {
        let data = outline_font();
        let font = FontRef::new(&data).unwrap();
        let outlines = Outlines::new(&font).unwrap();
        let one = outlines.points(GlyphId::new(gids::ONE)).unwrap();
        assert_eq!(one.phantoms[PHANTOM_LEFT], p(0.0, 0.0));
        assert_eq!(one.advance(), ADVANCES[gids::ONE as usize] as f32);
        // no vmtx: zero top bearing, vertical advance of one em
        assert_eq!(one.phantoms[PHANTOM_TOP], p(0.0, 1638.0));
        assert_eq!(one.vertical_advance(), 2048.0);
        assert!(one.points.iter().all(|p| p.on_curve));
        assert!(one.points[3].end_of_contour);
        let empty = outlines.points(GlyphId::NOTDEF).unwrap();
        assert!(empty.points.is_empty());
        assert_eq!(empty.bounds(), None);
        assert_eq!(empty.advance(), ADVANCES[0] as f32);
    }

    #[test]
    fn composite_with_offset() {
        let data = outline_font();
        let font = FontRef::new(&data).unwrap();
        let outlines = Outlines::new(&font).unwrap();
        let six = outlines.points(GlyphId::new(gids::SIX)).unwrap();
        assert_eq!(
            xy(&six),
            [
                (0.0, 0.0),
                (0.0, 100.0),
                (400.0, 100.0),
                (400.0, 0.0),
                (316.0, 234.0),
                (316.0, 1872.0),
                (725.0, 1872.0),
                (725.0, 234.0),
            ]
        );
        assert_eq!(
            six.bounds(),
            Some(BoundingBox {
                x_min: 0.0,
                y_min: 0.0,
                x_max: 725.0,
                y_max: 1872.0
            })
        );
        assert_eq!(six.advance(), ADVANCES[gids::SIX as usize] as f32);
    }

    #[test]
    fn composite_with_scale() {
        let data = outline_font();
        let font = FontRef::new(&data).unwrap();
        let outlines = Outlines::new(&font).unwrap();
        let seven = outlines.points(GlyphId::new(gids::SEVEN)).unwrap();
        // scaled first, then translated
        assert_eq!(
            &xy(&seven)[4..],
            [(158.5, 117.0), (158.5, 936.0), (363.0, 936.0), (363.0, 117.0)]
        );
    }

    #[test]
    fn composite_with_anchor() {
        let data = outline_font();
        let font = FontRef::new(&data).unwrap();
        let outlines = Outlines::new(&font).unwrap();
        let eight = outlines.points(GlyphId::new(gids::EIGHT)).unwrap();
        // point 0 of the second component lands on point 2 of the first
        assert_eq!(
            &xy(&eight)[4..],
            [(400.0, 100.0), (400.0, 1738.0), (809.0, 1738.0), (809.0, 100.0)]
        );
    }

    #[test]
    fn nested_composite_uses_component_metrics() {
        let data = outline_font();
        let font = FontRef::new(&data).unwrap();
        let outlines = Outlines::new(&font).unwrap();
        let nine = outlines.points(GlyphId::new(gids::NINE)).unwrap();
        assert_eq!(nine.points.len(), 8);
        assert_eq!(xy(&nine)[0], (10.0, 0.0));
        assert_eq!(xy(&nine)[7], (735.0, 234.0));
        // the advance of SIX rather than its own
        assert_eq!(nine.advance(), ADVANCES[gids::SIX as usize] as f32);
        assert_eq!(nine.phantoms[PHANTOM_LEFT], p(0.0, 0.0));
    }

    #[test]
    fn extents() {
        let data = outline_font();
        let font = FontRef::new(&data).unwrap();
        let outlines = Outlines::new(&font).unwrap();
        let expected = GlyphExtents {
            x_bearing: 205.0,
            y_bearing: 1638.0,
            width: 409.0,
            height: -1638.0,
        };
        let one = GlyphId::new(gids::ONE);
        assert_eq!(outlines.header_extents(one).unwrap(), expected);
        assert_eq!(outlines.points(one).unwrap().extents(), expected);
        assert_eq!(
            outlines.header_extents(GlyphId::NOTDEF).unwrap(),
            GlyphExtents::default()
        );
        assert!(outlines.header_extents(GlyphId::new(100)).is_err());
    }

    #[test]
    fn missing_glyph() {
        let data = outline_font();
        let font = FontRef::new(&data).unwrap();
        let outlines = Outlines::new(&font).unwrap();
        assert!(matches!(
            outlines.points(GlyphId::new(100)),
            Err(FontError::GlyphNotFound(_))
        ));
    }

    #[test]
    fn no_glyf_table() {
        let data = textcore_test_data::font_builder::FontBuilder::default()
            .add_table(
                textcore_read::types::Tag::new(b"head"),
                textcore_test_data::head(1000, 0),
            )
            .build();
        let font = FontRef::new(&data).unwrap();
        assert!(matches!(Outlines::new(&font), Err(FontError::NoSources)));
    }
}
