//! The [kern](https://learn.microsoft.com/en-us/typography/opentype/spec/kern) table.
//!
//! Both the OpenType version 0 and the Apple version 1 layouts are
//! supported.

use types::{BigEndian, FixedSize, GlyphId, Tag};

use super::aat::{self, read_value, StateTable};
use super::kerx::{apply_pairs, find_pair, GlyphAdjustment, KernStack, KerningPair};
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'kern'
pub const TAG: Tag = Tag::new(b"kern");

/// The two flavors of the table header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KernVersion {
    /// 16-bit header and subtable headers.
    OpenType,
    /// 32-bit header, with tuple indices in the subtable headers.
    Apple,
}

/// The kerning table.
#[derive(Clone, Copy)]
pub struct Kern<'a> {
    version: KernVersion,
    n_tables: u32,
    subtable_data: FontData<'a>,
}

impl TopLevelTable for Kern<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Kern<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let (version, n_tables, header_len) = match data.read_at::<u16>(0)? {
            0 => (KernVersion::OpenType, data.read_at::<u16>(2)? as u32, 4),
            1 if data.read_at::<u16>(2)? == 0 => (KernVersion::Apple, data.read_at::<u32>(4)?, 8),
            other => return Err(ReadError::InvalidFormat(other.into())),
        };
        let subtable_data = data.split_off(header_len).ok_or(ReadError::OutOfBounds)?;
        let this = Kern {
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

impl<'a> Kern<'a> {
    pub fn version(&self) -> KernVersion {
        self.version
    }

    pub fn n_tables(&self) -> u32 {
        self.n_tables
    }

    /// Returns an iterator over the subtables.
    pub fn subtables(&self) -> impl Iterator<Item = Result<Subtable<'a>, ReadError>> + 'a {
        let mut data = self.subtable_data;
        let version = self.version;
        (0..self.n_tables).map(move |_| {
            let len = match version {
                KernVersion::OpenType => data.read_at::<u16>(2)? as usize,
                KernVersion::Apple => data.read_at::<u32>(0)? as usize,
            };
            let subtable = data.slice(..len).ok_or(ReadError::OutOfBounds)?;
            data = data.split_off(len).unwrap_or_default();
            Subtable::read(subtable, version)
        })
    }

    /// Returns the horizontal kerning of the pair from the first pair
    /// subtable (formats 0 and 2) that holds it.
    pub fn kern(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        self.subtables()
            .filter_map(Result::ok)
            .filter(|subtable| {
                subtable.is_horizontal() && !subtable.is_cross_stream() && !subtable.is_variable()
            })
            .filter_map(|subtable| subtable.kind().ok())
            .find_map(|kind| kind.kerning(left, right))
    }

    /// Applies every subtable matching the text direction to the glyphs.
    ///
    /// Subtables that fail to parse are skipped.
    pub fn apply(&self, glyphs: &[GlyphId], adjustments: &mut [GlyphAdjustment], vertical: bool) {
        for subtable in self.subtables() {
            let subtable = match subtable {
                Ok(subtable) if subtable.is_vertical() == vertical => subtable,
                Ok(_) => continue,
                Err(e) => {
                    log::debug!("skipping malformed kern subtable: {e}");
                    continue;
                }
            };
            let cross_stream = subtable.is_cross_stream();
            match subtable.kind() {
                Ok(SubtableKind::Format1(table)) => {
                    table.apply(glyphs, adjustments, vertical, cross_stream)
                }
                Ok(kind) => apply_pairs(
                    |left, right| kind.kerning(left, right),
                    glyphs,
                    adjustments,
                    vertical,
                    cross_stream,
                ),
                Err(e) => log::debug!("skipping kern subtable: {e}"),
            }
        }
    }
}

/// A subtable header and its data.
#[derive(Clone, Copy)]
pub struct Subtable<'a> {
    version: KernVersion,
    coverage: u16,
    /// The whole subtable, header included.
    data: FontData<'a>,
}

impl<'a> Subtable<'a> {
    fn read(data: FontData<'a>, version: KernVersion) -> Result<Self, ReadError> {
        // the coverage follows the version and length in both layouts
        let coverage = data.read_at::<u16>(4)?;
        if data.len() < Self::header_len(version) {
            return Err(ReadError::OutOfBounds);
        }
        Ok(Subtable {
            version,
            coverage,
            data,
        })
    }

    fn header_len(version: KernVersion) -> usize {
        match version {
            KernVersion::OpenType => 6,
            KernVersion::Apple => 8,
        }
    }

    /// The raw coverage field.
    pub fn coverage(&self) -> u16 {
        self.coverage
    }

    pub fn format(&self) -> u8 {
        match self.version {
            KernVersion::OpenType => (self.coverage >> 8) as u8,
            KernVersion::Apple => (self.coverage & 0xFF) as u8,
        }
    }

    /// True if the table has horizontal kerning values.
    pub fn is_horizontal(&self) -> bool {
        match self.version {
            KernVersion::OpenType => self.coverage & 0x0001 != 0,
            KernVersion::Apple => self.coverage & 0x8000 == 0,
        }
    }

    /// True if the table has vertical kerning values.
    pub fn is_vertical(&self) -> bool {
        !self.is_horizontal()
    }

    /// True if the table has cross-stream kerning values.
    pub fn is_cross_stream(&self) -> bool {
        match self.version {
            KernVersion::OpenType => self.coverage & 0x0004 != 0,
            KernVersion::Apple => self.coverage & 0x4000 != 0,
        }
    }

    /// True if the table has variation kerning values.
    pub fn is_variable(&self) -> bool {
        match self.version {
            KernVersion::OpenType => false,
            KernVersion::Apple => self.coverage & 0x2000 != 0,
        }
    }

    /// Returns the decoded subtable data.
    pub fn kind(&self) -> Result<SubtableKind<'a>, ReadError> {
        let body = self
            .data
            .split_off(Self::header_len(self.version))
            .ok_or(ReadError::OutOfBounds)?;
        match self.format() {
            0 => Subtable0::read(body).map(SubtableKind::Format0),
            1 => StateTable::read(body)
                .map(|state_table| SubtableKind::Format1(Subtable1 { state_table })),
            2 => Subtable2::read(self.data, Self::header_len(self.version))
                .map(SubtableKind::Format2),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

/// The `kern` subtable formats.
#[derive(Clone, Copy)]
pub enum SubtableKind<'a> {
    Format0(Subtable0<'a>),
    Format1(Subtable1<'a>),
    Format2(Subtable2<'a>),
}

impl SubtableKind<'_> {
    /// Returns the kerning of the pair, for the pair based formats.
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        match self {
            Self::Format0(table) => table.kerning(left, right),
            Self::Format2(table) => table.kerning(left, right),
            Self::Format1(_) => None,
        }
    }
}

/// The format 0 `kern` subtable: sorted kerning pairs.
#[derive(Clone, Copy)]
pub struct Subtable0<'a> {
    pub pairs: &'a [KerningPair],
}

impl<'a> FontRead<'a> for Subtable0<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        // nPairs then searchRange, entrySelector and rangeShift
        let n_pairs = data.read_at::<u16>(0)?;
        let pairs = data.read_array_len(u16::RAW_BYTE_LEN * 4, n_pairs as usize)?;
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
    /// Byte offset from the start of the state table to the values.
    pub const VALUE_OFFSET: u16 = 0x3FFF;
}

/// The format 1 `kern` subtable: kerning through a state machine.
#[derive(Clone, Copy)]
pub struct Subtable1<'a> {
    pub state_table: StateTable<'a>,
}

impl Subtable1<'_> {
    /// Runs the state machine over the glyphs.
    pub fn apply(
        &self,
        glyphs: &[GlyphId],
        adjustments: &mut [GlyphAdjustment],
        vertical: bool,
        cross_stream: bool,
    ) {
        let table = &self.state_table;
        let mut stack = KernStack::default();
        aat::drive(
            glyphs.len(),
            false,
            |ix| table.class(glyphs[ix]),
            |state, class| table.entry(state, class),
            |entry, index| {
                if let (true, Some(index)) = (entry.flags & format1_flags::PUSH != 0, index) {
                    stack.push(index);
                }
                let offset = (entry.flags & format1_flags::VALUE_OFFSET) as usize;
                if offset != 0 && !stack.is_empty() {
                    let data = table.data();
                    let values = (0..).map_while(|ix| read_value::<i16>(data, offset + ix * 2));
                    stack.apply_values(values, adjustments, vertical, cross_stream);
                }
            },
        );
    }
}

/// A class table of format 2 subtables.
#[derive(Clone, Copy)]
pub struct ClassTable<'a> {
    first_glyph: u16,
    values: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for ClassTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let first_glyph = data.read_at::<u16>(0)?;
        let n_glyphs = data.read_at::<u16>(2)?;
        let values = data.read_array_len(4, n_glyphs as usize)?;
        Ok(Self {
            first_glyph,
            values,
        })
    }
}

impl ClassTable<'_> {
    /// Returns the value of the glyph, or 0 if it is not covered.
    pub fn value(&self, glyph_id: GlyphId) -> u16 {
        glyph_id
            .to_u16()
            .checked_sub(self.first_glyph)
            .and_then(|ix| self.values.get(ix as usize))
            .map(|value| value.get())
            .unwrap_or_default()
    }
}

/// The format 2 `kern` subtable: a class matrix.
#[derive(Clone, Copy)]
pub struct Subtable2<'a> {
    data: FontData<'a>,
    /// Maps glyphs to offsets from the start of the subtable to a row.
    pub left_class_table: ClassTable<'a>,
    /// Maps glyphs to offsets within a row.
    pub right_class_table: ClassTable<'a>,
}

impl<'a> Subtable2<'a> {
    /// Reads from the start of the subtable, as the offsets include the
    /// subtable header.
    fn read(data: FontData<'a>, header_len: usize) -> Result<Self, ReadError> {
        // rowWidth is implied by the premultiplied classes
        let left_offset = data.read_at::<u16>(header_len + 2)? as usize;
        let right_offset = data.read_at::<u16>(header_len + 4)? as usize;
        Ok(Self {
            data,
            left_class_table: data.read_table_at(left_offset)?,
            right_class_table: data.read_table_at(right_offset)?,
        })
    }

    /// Returns the kerning adjustment for the given pair.
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        // rows include the array offset so an unmapped left glyph has no
        // kerning
        let row = self.left_class_table.value(left) as usize;
        if row == 0 {
            return None;
        }
        let column = self.right_class_table.value(right) as usize;
        read_value(self.data, row + column)
    }
}
