//! The [Extended Kerning (kerx)](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6kerx.html) table.

use types::{BigEndian, FixedSize, GlyphId, Tag};

use super::aat::{self, read_array_to_end, read_value, ExtendedStateTable, Lookup};
use super::ankr::Ankr;
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'kerx'
pub const TAG: Tag = Tag::new(b"kerx");

/// length, coverage, tuple_count: all u32
const SUBTABLE_HEADER_SIZE: usize = u32::RAW_BYTE_LEN * 3;

/// The extended kerning table.
#[derive(Clone, Copy)]
pub struct Kerx<'a> {
    version: u16,
    n_tables: u32,
    subtable_data: FontData<'a>,
}

impl TopLevelTable for Kerx<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Kerx<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version = data.read_at::<u16>(0)?;
        if !(2..=4).contains(&version) {
            return Err(ReadError::InvalidFormat(version.into()));
        }
        let n_tables = data.read_at::<u32>(4)?;
        let subtable_data = data.split_off(8).ok_or(ReadError::OutOfBounds)?;
        let this = Kerx {
            version,
            n_tables,
            subtable_data,
        };
        for subtable in this.subtables() {
            subtable?;
        }
        Ok(this)
    }
}

impl<'a> Kerx<'a> {
    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn n_tables(&self) -> u32 {
        self.n_tables
    }

    /// Returns an iterator over the subtables.
    pub fn subtables(&self) -> impl Iterator<Item = Result<Subtable<'a>, ReadError>> + 'a {
        let mut data = self.subtable_data;
        (0..self.n_tables).map(move |_| {
            let len = data.read_at::<u32>(0)? as usize;
            if len < SUBTABLE_HEADER_SIZE {
                return Err(ReadError::MalformedData("kerx subtable too short"));
            }
            let subtable = data.slice(..len).ok_or(ReadError::OutOfBounds)?;
            data = data.split_off(len).unwrap_or_default();
            Subtable::read(subtable)
        })
    }

    /// Returns the horizontal kerning of the pair from the first pair
    /// subtable (formats 0, 2 and 6) that holds it.
    pub fn kern(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        self.subtables()
            .filter_map(Result::ok)
            .filter(|subtable| subtable.is_horizontal() && !subtable.is_cross_stream())
            .filter_map(|subtable| subtable.kind().ok())
            .find_map(|kind| kind.kerning(left, right))
    }

    /// Applies every subtable matching the text direction to the glyphs.
    ///
    /// Subtables that fail to parse are skipped.
    pub fn apply(
        &self,
        glyphs: &[GlyphId],
        adjustments: &mut [GlyphAdjustment],
        vertical: bool,
        points: &impl AttachmentPoints,
    ) {
        for subtable in self.subtables() {
            let subtable = match subtable {
                Ok(subtable) if subtable.is_vertical() == vertical => subtable,
                Ok(_) => continue,
                Err(e) => {
                    log::debug!("skipping malformed kerx subtable: {e}");
                    continue;
                }
            };
            match subtable.kind() {
                Ok(kind) => kind.apply(&subtable, glyphs, adjustments, points),
                Err(e) => log::debug!("skipping kerx subtable: {e}"),
            }
        }
    }
}

/// A subtable header and its data.
#[derive(Clone, Copy)]
pub struct Subtable<'a> {
    coverage: u32,
    tuple_count: u32,
    /// The whole subtable, header included.
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Subtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let coverage = data.read_at::<u32>(4)?;
        let tuple_count = data.read_at::<u32>(8)?;
        if tuple_count != 0 {
            return Err(ReadError::UnsupportedTuples);
        }
        Ok(Subtable {
            coverage,
            tuple_count,
            data,
        })
    }
}

impl<'a> Subtable<'a> {
    pub fn coverage(&self) -> u32 {
        self.coverage
    }

    pub fn tuple_count(&self) -> u32 {
        self.tuple_count
    }

    /// True if the table has vertical kerning values.
    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.coverage & 0x80000000 != 0
    }

    /// True if the table has horizontal kerning values.
    #[inline]
    pub fn is_horizontal(&self) -> bool {
        !self.is_vertical()
    }

    /// True if the table has cross-stream kerning values.
    ///
    /// If text is normally written horizontally, adjustments will be
    /// vertical. If adjustment values are positive, the text will be
    /// moved up. If they are negative, the text will be moved down.
    #[inline]
    pub fn is_cross_stream(&self) -> bool {
        self.coverage & 0x40000000 != 0
    }

    /// True if the table has variation kerning values.
    #[inline]
    pub fn is_variable(&self) -> bool {
        self.coverage & 0x20000000 != 0
    }

    /// If set, state table based subtables (formats 1 and 4) process the
    /// glyphs from last to first.
    #[inline]
    pub fn is_backwards(&self) -> bool {
        self.coverage & 0x10000000 != 0
    }

    /// Returns the decoded subtable data.
    pub fn kind(&self) -> Result<SubtableKind<'a>, ReadError> {
        let body = self
            .data
            .split_off(SUBTABLE_HEADER_SIZE)
            .ok_or(ReadError::OutOfBounds)?;
        // format is the low byte of the coverage
        match self.coverage & 0xFF {
            0 => Subtable0::read(body).map(SubtableKind::Format0),
            1 => Subtable1::read(body).map(SubtableKind::Format1),
            2 => Subtable2::read(self.data).map(SubtableKind::Format2),
            4 => Subtable4::read(body).map(SubtableKind::Format4),
            6 => Subtable6::read(self.data).map(SubtableKind::Format6),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

/// The various `kerx` subtable formats.
#[derive(Clone, Copy)]
pub enum SubtableKind<'a> {
    Format0(Subtable0<'a>),
    Format1(Subtable1<'a>),
    Format2(Subtable2<'a>),
    Format4(Subtable4<'a>),
    Format6(Subtable6<'a>),
}

impl SubtableKind<'_> {
    /// Returns the kerning of the pair, for the pair based formats.
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        match self {
            Self::Format0(table) => table.kerning(left, right),
            Self::Format2(table) => table.kerning(left, right),
            Self::Format6(table) => table.kerning(left, right),
            Self::Format1(_) | Self::Format4(_) => None,
        }
    }

    fn apply(
        &self,
        subtable: &Subtable,
        glyphs: &[GlyphId],
        adjustments: &mut [GlyphAdjustment],
        points: &impl AttachmentPoints,
    ) {
        let vertical = subtable.is_vertical();
        let cross_stream = subtable.is_cross_stream();
        match self {
            Self::Format1(table) => {
                table.apply(glyphs, adjustments, subtable.is_backwards(), vertical, cross_stream)
            }
            Self::Format4(table) => {
                table.apply(glyphs, adjustments, subtable.is_backwards(), points)
            }
            _ => apply_pairs(
                |left, right| self.kerning(left, right),
                glyphs,
                adjustments,
                vertical,
                cross_stream,
            ),
        }
    }
}

/// Positioning adjustments of a glyph, in font units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphAdjustment {
    pub x_advance: i32,
    pub y_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    /// The glyph that the offsets are relative to, for attached glyphs.
    pub attached_to: Option<usize>,
}

impl GlyphAdjustment {
    /// Adds a kerning value along the text direction, or across it for
    /// cross-stream kerning.
    pub fn kern(&mut self, value: i16, vertical: bool, cross_stream: bool) {
        let value = value as i32;
        // the minimum value resets the cross-stream offset
        let reset = value == i16::MIN as i32;
        match (vertical, cross_stream) {
            (false, false) => self.x_advance += value,
            (true, false) => self.y_advance += value,
            (false, true) if reset => self.y_offset = 0,
            (false, true) => self.y_offset += value,
            (true, true) if reset => self.x_offset = 0,
            (true, true) => self.x_offset += value,
        }
    }
}

/// Applies pair kerning to each adjacent pair of glyphs.
pub(crate) fn apply_pairs(
    kerning: impl Fn(GlyphId, GlyphId) -> Option<i16>,
    glyphs: &[GlyphId],
    adjustments: &mut [GlyphAdjustment],
    vertical: bool,
    cross_stream: bool,
) {
    for (ix, pair) in glyphs.windows(2).enumerate() {
        let Some(value) = kerning(pair[0], pair[1]).filter(|value| *value != 0) else {
            continue;
        };
        // cross-stream kerning moves the second glyph
        let target = if cross_stream { ix + 1 } else { ix };
        if let Some(adjustment) = adjustments.get_mut(target) {
            adjustment.kern(value, vertical, cross_stream);
        }
    }
}

/// Resolves the points referenced by `kerx` format 4 attachments.
pub trait AttachmentPoints {
    /// Returns the anchor point at `index` for the glyph.
    fn anchor_point(&self, glyph_id: GlyphId, index: u16) -> Option<(i32, i32)>;

    /// Returns the outline point at `index` for the glyph.
    fn control_point(&self, glyph_id: GlyphId, index: u16) -> Option<(i32, i32)>;
}

impl AttachmentPoints for () {
    fn anchor_point(&self, _glyph_id: GlyphId, _index: u16) -> Option<(i32, i32)> {
        None
    }

    fn control_point(&self, _glyph_id: GlyphId, _index: u16) -> Option<(i32, i32)> {
        None
    }
}

impl AttachmentPoints for Ankr<'_> {
    fn anchor_point(&self, glyph_id: GlyphId, index: u16) -> Option<(i32, i32)> {
        self.anchor(glyph_id, index)
            .map(|point| (point.x() as i32, point.y() as i32))
    }

    fn control_point(&self, _glyph_id: GlyphId, _index: u16) -> Option<(i32, i32)> {
        None
    }
}

/// A kerning pair.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct KerningPair {
    pub left: BigEndian<GlyphId>,
    pub right: BigEndian<GlyphId>,
    pub value: BigEndian<i16>,
}

impl FixedSize for KerningPair {
    const RAW_BYTE_LEN: usize = 6;
}

impl KerningPair {
    pub fn left(&self) -> GlyphId {
        self.left.get()
    }

    pub fn right(&self) -> GlyphId {
        self.right.get()
    }

    pub fn value(&self) -> i16 {
        self.value.get()
    }
}

/// Binary searches pairs sorted by left then right glyph.
pub(crate) fn find_pair(pairs: &[KerningPair], left: GlyphId, right: GlyphId) -> Option<i16> {
    fn make_key(left: GlyphId, right: GlyphId) -> u32 {
        (left.to_u32() << 16) | right.to_u32()
    }
    let key = make_key(left, right);
    pairs
        .binary_search_by_key(&key, |pair| make_key(pair.left(), pair.right()))
        .ok()
        .map(|ix| pairs[ix].value())
}

/// The type 0 `kerx` subtable: sorted kerning pairs.
#[derive(Clone, Copy)]
pub struct Subtable0<'a> {
    pub pairs: &'a [KerningPair],
}

impl<'a> FontRead<'a> for Subtable0<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        // nPairs then searchRange, entrySelector and rangeShift
        let n_pairs = data.read_at::<u32>(0)?;
        let pairs = data.read_array_len(u32::RAW_BYTE_LEN * 4, n_pairs as usize)?;
        Ok(Self { pairs })
    }
}

impl Subtable0<'_> {
    /// Returns the kerning adjustment for the given pair.
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        find_pair(self.pairs, left, right)
    }
}

/// Entry flags of the format 1 state machine.
pub mod format1_flags {
    /// Push this glyph on the kerning stack.
    pub const PUSH: u16 = 0x8000;
    /// Don't advance to the next glyph before going to the new state.
    pub const DONT_ADVANCE: u16 = 0x4000;
    /// Clear the kerning stack.
    pub const RESET: u16 = 0x2000;
}

/// The stack of glyphs waiting for a kerning action.
#[derive(Default)]
pub(crate) struct KernStack {
    indices: [usize; 8],
    depth: usize,
}

impl KernStack {
    pub(crate) fn reset(&mut self) {
        self.depth = 0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.depth == 0
    }

    /// Pushes a glyph index; the stack is cleared when it overflows.
    pub(crate) fn push(&mut self, index: usize) {
        if self.depth < self.indices.len() {
            self.indices[self.depth] = index;
            self.depth += 1;
        } else {
            self.depth = 0;
        }
    }

    /// Pops glyphs and applies the values to them, until the stack is
    /// empty or an odd value marks the end of the list.
    pub(crate) fn apply_values(
        &mut self,
        values: impl Iterator<Item = i16>,
        adjustments: &mut [GlyphAdjustment],
        vertical: bool,
        cross_stream: bool,
    ) {
        for value in values {
            if self.depth == 0 {
                break;
            }
            self.depth -= 1;
            let index = self.indices[self.depth];
            let last = value & 1 != 0;
            if let Some(adjustment) = adjustments.get_mut(index) {
                adjustment.kern(value & !1, vertical, cross_stream);
            }
            if last {
                break;
            }
        }
    }
}

/// The type 1 `kerx` subtable.
#[derive(Clone, Copy)]
pub struct Subtable1<'a> {
    pub state_table: ExtendedStateTable<'a, BigEndian<u16>>,
    /// Contains the set of kerning values, one for each state.
    pub values: &'a [BigEndian<i16>],
}

impl<'a> FontRead<'a> for Subtable1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let state_table = ExtendedStateTable::read(data)?;
        let values_offset = data.read_at::<u32>(ExtendedStateTable::<()>::HEADER_LEN)? as usize;
        let values = read_array_to_end(&data, values_offset)?;
        Ok(Self {
            state_table,
            values,
        })
    }
}

impl Subtable1<'_> {
    /// Runs the state machine over the glyphs.
    pub fn apply(
        &self,
        glyphs: &[GlyphId],
        adjustments: &mut [GlyphAdjustment],
        backwards: bool,
        vertical: bool,
        cross_stream: bool,
    ) {
        let table = &self.state_table;
        let mut stack = KernStack::default();
        aat::drive(
            glyphs.len(),
            backwards,
            |ix| table.class(glyphs[ix]),
            |state, class| table.entry(state, class),
            |entry, index| {
                if entry.flags & format1_flags::RESET != 0 {
                    stack.reset();
                }
                if let (true, Some(index)) = (entry.flags & format1_flags::PUSH != 0, index) {
                    stack.push(index);
                }
                let value_index = entry.payload.get();
                if value_index != 0xFFFF && !stack.is_empty() {
                    let values = self
                        .values
                        .iter()
                        .skip(value_index as usize)
                        .map(|value| value.get());
                    stack.apply_values(values, adjustments, vertical, cross_stream);
                }
            },
        );
    }
}

/// The type 2 `kerx` subtable: a class matrix.
#[derive(Clone, Copy)]
pub struct Subtable2<'a> {
    data: FontData<'a>,
    /// Left-hand offset table.
    pub left_offset_table: Lookup<'a>,
    /// Right-hand offset table.
    pub right_offset_table: Lookup<'a>,
    /// Offset to kerning data array.
    pub array_offset: usize,
}

impl<'a> FontRead<'a> for Subtable2<'a> {
    /// Reads from the start of the subtable, as the offsets include the
    /// subtable header.
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance_by(SUBTABLE_HEADER_SIZE);
        // Skip rowWidth field
        cursor.advance::<u32>();
        let left_offset = cursor.read::<u32>()? as usize;
        let right_offset = cursor.read::<u32>()? as usize;
        let array_offset = cursor.read::<u32>()? as usize;
        let left_offset_table = data.read_table_at(left_offset)?;
        let right_offset_table = data.read_table_at(right_offset)?;
        Ok(Self {
            data,
            left_offset_table,
            right_offset_table,
            array_offset,
        })
    }
}

impl Subtable2<'_> {
    /// Returns the kerning adjustment for the given pair.
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        // left values are premultiplied by the row width, right values by
        // the value size
        let left_class = self.left_offset_table.value(left.to_u16()).unwrap_or(0) as usize;
        let right_class = self.right_offset_table.value(right.to_u16()).unwrap_or(0) as usize;
        read_value(self.data, self.array_offset + left_class + right_class)
    }
}

/// Action types of format 4 subtables.
pub mod action_type {
    pub const CONTROL_POINTS: u32 = 0;
    pub const ANCHOR_POINTS: u32 = 1;
    pub const COORDINATES: u32 = 2;
}

/// Entry flag of format 4 subtables: remember the glyph as the mark.
pub const MARK: u16 = 0x8000;

/// An attachment action of a format 4 subtable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorAction {
    /// Indices of outline points of the marked and current glyphs.
    ControlPoints { mark: u16, current: u16 },
    /// Indices into the `ankr` anchors of the marked and current glyphs.
    AnchorPoints { mark: u16, current: u16 },
    /// Explicit coordinates for the marked and current glyphs.
    Coordinates {
        mark: (i16, i16),
        current: (i16, i16),
    },
}

/// The type 4 `kerx` subtable: attachment through a state machine.
#[derive(Clone, Copy)]
pub struct Subtable4<'a> {
    pub state_table: ExtendedStateTable<'a, BigEndian<u16>>,
    /// Flags for control point positioning.
    pub flags: u32,
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Subtable4<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let state_table = ExtendedStateTable::read(data)?;
        let flags = data.read_at::<u32>(ExtendedStateTable::<()>::HEADER_LEN)?;
        let this = Self {
            state_table,
            flags,
            data,
        };
        let action_type = this.action_type();
        if action_type > action_type::COORDINATES {
            return Err(ReadError::InvalidFormat(action_type.into()));
        }
        Ok(this)
    }
}

impl Subtable4<'_> {
    /// The two bit action type.
    pub fn action_type(&self) -> u32 {
        (self.flags >> 30) & 3
    }

    /// Offset in bytes from the start of the state table to the control
    /// data.
    pub fn control_offset(&self) -> usize {
        (self.flags & 0x00FFFFFF) as usize
    }

    /// Returns the action at `index` in the control data.
    pub fn action(&self, index: u16) -> Option<AnchorAction> {
        let base = self.control_offset();
        let read = |ix: usize| read_value::<u16>(self.data, ix);
        match self.action_type() {
            action_type::CONTROL_POINTS | action_type::ANCHOR_POINTS => {
                let offset = base + index as usize * 4;
                let (mark, current) = (read(offset)?, read(offset + 2)?);
                Some(if self.action_type() == action_type::CONTROL_POINTS {
                    AnchorAction::ControlPoints { mark, current }
                } else {
                    AnchorAction::AnchorPoints { mark, current }
                })
            }
            _ => {
                let offset = base + index as usize * 8;
                let read = |ix: usize| read_value::<i16>(self.data, offset + ix * 2);
                Some(AnchorAction::Coordinates {
                    mark: (read(0)?, read(1)?),
                    current: (read(2)?, read(3)?),
                })
            }
        }
    }

    /// Runs the state machine, attaching glyphs to the last marked glyph.
    pub fn apply(
        &self,
        glyphs: &[GlyphId],
        adjustments: &mut [GlyphAdjustment],
        backwards: bool,
        points: &impl AttachmentPoints,
    ) {
        let table = &self.state_table;
        let mut mark = None;
        aat::drive(
            glyphs.len(),
            backwards,
            |ix| table.class(glyphs[ix]),
            |state, class| table.entry(state, class),
            |entry, index| {
                let action_index = entry.payload.get();
                if let (Some(mark), Some(current)) = (mark, index) {
                    if action_index != 0xFFFF {
                        let offset = self
                            .action(action_index)
                            .and_then(|action| resolve_action(action, glyphs, mark, current, points));
                        if let (Some((dx, dy)), Some(adjustment)) =
                            (offset, adjustments.get_mut(current))
                        {
                            adjustment.x_offset = dx;
                            adjustment.y_offset = dy;
                            adjustment.attached_to = Some(mark);
                        }
                    }
                }
                if entry.flags & MARK != 0 {
                    if let Some(index) = index {
                        mark = Some(index);
                    }
                }
            },
        );
    }
}

/// Returns the offset moving the current point onto the mark point.
fn resolve_action(
    action: AnchorAction,
    glyphs: &[GlyphId],
    mark: usize,
    current: usize,
    points: &impl AttachmentPoints,
) -> Option<(i32, i32)> {
    let (mark_glyph, current_glyph) = (*glyphs.get(mark)?, *glyphs.get(current)?);
    let (mark_point, current_point) = match action {
        AnchorAction::ControlPoints { mark, current } => (
            points.control_point(mark_glyph, mark)?,
            points.control_point(current_glyph, current)?,
        ),
        AnchorAction::AnchorPoints { mark, current } => (
            points.anchor_point(mark_glyph, mark)?,
            points.anchor_point(current_glyph, current)?,
        ),
        AnchorAction::Coordinates { mark, current } => (
            (mark.0 as i32, mark.1 as i32),
            (current.0 as i32, current.1 as i32),
        ),
    };
    Some((mark_point.0 - current_point.0, mark_point.1 - current_point.1))
}

/// The type 6 `kerx` subtable: a row by column matrix.
#[derive(Clone, Copy)]
pub struct Subtable6<'a> {
    pub row_count: u16,
    pub column_count: u16,
    /// Maps glyphs to row offsets, premultiplied by the column count.
    pub row_table: Lookup<'a>,
    /// Maps glyphs to column indices.
    pub column_table: Lookup<'a>,
    pub values: &'a [BigEndian<i16>],
}

impl<'a> FontRead<'a> for Subtable6<'a> {
    /// Reads from the start of the subtable, as the offsets include the
    /// subtable header.
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance_by(SUBTABLE_HEADER_SIZE);
        let flags = cursor.read::<u32>()?;
        if flags & 1 != 0 {
            return Err(ReadError::MalformedData(
                "kerx format 6 with 32-bit values is not supported",
            ));
        }
        let row_count = cursor.read::<u16>()?;
        let column_count = cursor.read::<u16>()?;
        let row_offset = cursor.read::<u32>()? as usize;
        let column_offset = cursor.read::<u32>()? as usize;
        let array_offset = cursor.read::<u32>()? as usize;
        let row_table = data.read_table_at(row_offset)?;
        let column_table = data.read_table_at(column_offset)?;
        let values =
            data.read_array_len(array_offset, row_count as usize * column_count as usize)?;
        Ok(Self {
            row_count,
            column_count,
            row_table,
            column_table,
            values,
        })
    }
}

impl Subtable6<'_> {
    /// Returns the kerning adjustment for the given pair.
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        let row = self.row_table.value(left.to_u16()).unwrap_or(0) as usize;
        let column = self.column_table.value(right.to_u16()).unwrap_or(0) as usize;
        self.values.get(row + column).map(|value| value.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::kern as test_data;

    fn kind(coverage: u32, body: &[u8]) -> SubtableKind<'static> {
        let data: &'static [u8] = test_data::kerx(&[(coverage, body)]).leak();
        let kerx = Kerx::read(FontData::new(data)).unwrap();
        kerx.subtables().next().unwrap().unwrap().kind().unwrap()
    }

    fn gids(glyphs: &[u16]) -> Vec<GlyphId> {
        glyphs.iter().copied().map(GlyphId::new).collect()
    }

    #[test]
    fn format0_pairs() {
        let table = kind(0, &test_data::kerx_format0());
        let kern = |l, r| table.kerning(GlyphId::new(l), GlyphId::new(r));
        assert_eq!(kern(4, 5), Some(-40));
        assert_eq!(kern(4, 9), Some(20));
        assert_eq!(kern(7, 5), Some(-15));
        assert_eq!(kern(5, 4), None);
    }

    #[test]
    fn format2_class_matrix() {
        let table = kind(2, &test_data::kerx_format2());
        let kern = |l, r| table.kerning(GlyphId::new(l), GlyphId::new(r));
        assert_eq!(kern(11, 21), Some(-60));
        assert_eq!(kern(10, 21), Some(-10));
        assert_eq!(kern(11, 20), Some(30));
        // unmapped glyphs fall in the first row
        assert_eq!(kern(12, 20), Some(0));
    }

    #[test]
    fn format6_matrix() {
        let table = kind(6, &test_data::kerx_format6());
        let kern = |l, r| table.kerning(GlyphId::new(l), GlyphId::new(r));
        assert_eq!(kern(283, 659), Some(-270));
        assert_eq!(kern(659, 3), Some(0));
        let SubtableKind::Format6(table) = table else {
            panic!("expected format 6");
        };
        assert_eq!((table.row_count, table.column_count), (2, 2));
    }

    #[test]
    fn format6_u32_values() {
        let mut body = test_data::kerx_format6();
        body[3] = 1;
        let data = test_data::kerx(&[(6, &body)]);
        let kerx = Kerx::read(FontData::new(&data)).unwrap();
        let subtable = kerx.subtables().next().unwrap().unwrap();
        assert!(subtable.kind().is_err());
    }

    #[test]
    fn tuples_are_unsupported() {
        let mut data = test_data::kerx(&[(0, &test_data::kerx_format0())]);
        // tupleCount of the first subtable
        data[19] = 1;
        assert!(matches!(
            Kerx::read(FontData::new(&data)),
            Err(ReadError::UnsupportedTuples)
        ));
    }

    #[test]
    fn coverage_flags() {
        let data = test_data::kerx(&[(0xD000_0000, &test_data::kerx_format0())]);
        let kerx = Kerx::read(FontData::new(&data)).unwrap();
        let subtable = kerx.subtables().next().unwrap().unwrap();
        assert!(subtable.is_vertical());
        assert!(subtable.is_cross_stream());
        assert!(subtable.is_backwards());
        assert!(!subtable.is_variable());
        // only horizontal, in-stream subtables provide simple kerning
        assert_eq!(kerx.kern(GlyphId::new(4), GlyphId::new(5)), None);
    }

    #[test]
    fn apply_pair_subtables() {
        let format0 = test_data::kerx_format0();
        let format6 = test_data::kerx_format6();
        let data = test_data::kerx(&[(0, &format0), (0x4000_0006, &format6)]);
        let kerx = Kerx::read(FontData::new(&data)).unwrap();
        assert_eq!(kerx.kern(GlyphId::new(4), GlyphId::new(5)), Some(-40));
        let glyphs = gids(&[4, 5, 283, 659]);
        let mut adjustments = vec![GlyphAdjustment::default(); glyphs.len()];
        kerx.apply(&glyphs, &mut adjustments, false, &());
        assert_eq!(adjustments[0].x_advance, -40);
        // cross-stream kerning moves the second glyph of the pair
        assert_eq!(adjustments[3].y_offset, -270);
        assert_eq!(adjustments[2], GlyphAdjustment::default());
        // nothing applies to vertical text
        let mut adjustments = vec![GlyphAdjustment::default(); glyphs.len()];
        kerx.apply(&glyphs, &mut adjustments, true, &());
        assert!(adjustments.iter().all(|adj| *adj == GlyphAdjustment::default()));
    }

    #[test]
    fn format1_state_machine() {
        let data = test_data::kerx(&[(1, &test_data::kerx_format1())]);
        let kerx = Kerx::read(FontData::new(&data)).unwrap();
        let glyphs = gids(&[3, 3, 4, 9]);
        let mut adjustments = vec![GlyphAdjustment::default(); glyphs.len()];
        kerx.apply(&glyphs, &mut adjustments, false, &());
        let advances = adjustments.iter().map(|adj| adj.x_advance).collect::<Vec<_>>();
        assert_eq!(advances, [0, -50, 0, 0]);
    }

    #[test]
    fn format4_anchor_attachment() {
        let ankr_data = test_data::ankr();
        let ankr = Ankr::read(FontData::new(&ankr_data)).unwrap();
        let data = test_data::kerx(&[(4, &test_data::kerx_format4())]);
        let kerx = Kerx::read(FontData::new(&data)).unwrap();
        let subtable = kerx.subtables().next().unwrap().unwrap();
        let SubtableKind::Format4(table) = subtable.kind().unwrap() else {
            panic!("expected format 4");
        };
        assert_eq!(table.action_type(), action_type::ANCHOR_POINTS);
        assert_eq!(
            table.action(0),
            Some(AnchorAction::AnchorPoints {
                mark: 0,
                current: 1
            })
        );
        let glyphs = gids(&[3, 4]);
        let mut adjustments = vec![GlyphAdjustment::default(); glyphs.len()];
        kerx.apply(&glyphs, &mut adjustments, false, &ankr);
        assert_eq!(adjustments[0], GlyphAdjustment::default());
        assert_eq!(
            adjustments[1],
            GlyphAdjustment {
                x_offset: 90,
                y_offset: 55,
                attached_to: Some(0),
                ..Default::default()
            }
        );
        // without anchors, nothing is attached
        let mut adjustments = vec![GlyphAdjustment::default(); glyphs.len()];
        kerx.apply(&glyphs, &mut adjustments, false, &());
        assert_eq!(adjustments[1], GlyphAdjustment::default());
    }
}
