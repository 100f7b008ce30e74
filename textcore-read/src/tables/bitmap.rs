//! Embedded bitmap tables.
//!
//! The location tables ([CBLC], [EBLC] and Apple `bloc`) share a layout, as
//! do the data tables ([CBDT], [EBDT] and Apple `bdat`).
//!
//! [CBLC]: https://learn.microsoft.com/en-us/typography/opentype/spec/cblc
//! [EBLC]: https://learn.microsoft.com/en-us/typography/opentype/spec/eblc
//! [CBDT]: https://learn.microsoft.com/en-us/typography/opentype/spec/cbdt
//! [EBDT]: https://learn.microsoft.com/en-us/typography/opentype/spec/ebdt

use types::{BigEndian, FixedSize, GlyphId, Tag};

use crate::{Cursor, FontData, FontRead, ReadError};

/// 'CBLC'
pub const CBLC_TAG: Tag = Tag::new(b"CBLC");
/// 'CBDT'
pub const CBDT_TAG: Tag = Tag::new(b"CBDT");
/// 'EBLC'
pub const EBLC_TAG: Tag = Tag::new(b"EBLC");
/// 'EBDT'
pub const EBDT_TAG: Tag = Tag::new(b"EBDT");
/// 'bloc'
pub const BLOC_TAG: Tag = Tag::new(b"bloc");
/// 'bdat'
pub const BDAT_TAG: Tag = Tag::new(b"bdat");

/// A bitmap location table: the strikes of the font and where their glyphs
/// are in the data table.
#[derive(Clone, Copy)]
pub struct BitmapLocationTable<'a> {
    data: FontData<'a>,
    major_version: u16,
    sizes: &'a [BitmapSize],
}

impl<'a> FontRead<'a> for BitmapLocationTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let major_version = data.read_at::<u16>(0)?;
        let num_sizes = data.read_at::<u32>(4)?;
        let sizes = data.read_array_len(8, num_sizes as usize)?;
        Ok(Self {
            data,
            major_version,
            sizes,
        })
    }
}

impl<'a> BitmapLocationTable<'a> {
    /// 2 for `EBLC` and `bloc`, 3 for `CBLC`.
    pub fn major_version(&self) -> u16 {
        self.major_version
    }

    /// The data that the offsets of the strikes are relative to.
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    /// The strikes of the font.
    pub fn sizes(&self) -> &'a [BitmapSize] {
        self.sizes
    }
}

/// A strike: bitmaps of a range of glyphs at one size.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct BitmapSize {
    pub index_subtable_array_offset: BigEndian<u32>,
    pub index_tables_size: BigEndian<u32>,
    pub number_of_index_subtables: BigEndian<u32>,
    pub color_ref: BigEndian<u32>,
    pub hori: SbitLineMetrics,
    pub vert: SbitLineMetrics,
    pub start_glyph_index: BigEndian<GlyphId>,
    pub end_glyph_index: BigEndian<GlyphId>,
    pub ppem_x: u8,
    pub ppem_y: u8,
    pub bit_depth: u8,
    pub flags: i8,
}

impl FixedSize for BitmapSize {
    const RAW_BYTE_LEN: usize = 48;
}

impl BitmapSize {
    /// Offset from the start of the location table to the index subtable
    /// array.
    pub fn index_subtable_array_offset(&self) -> u32 {
        self.index_subtable_array_offset.get()
    }

    pub fn number_of_index_subtables(&self) -> u32 {
        self.number_of_index_subtables.get()
    }

    /// Line metrics for horizontal text.
    pub fn hori(&self) -> SbitLineMetrics {
        self.hori
    }

    /// Line metrics for vertical text.
    pub fn vert(&self) -> SbitLineMetrics {
        self.vert
    }

    pub fn start_glyph_index(&self) -> GlyphId {
        self.start_glyph_index.get()
    }

    pub fn end_glyph_index(&self) -> GlyphId {
        self.end_glyph_index.get()
    }

    pub fn ppem_x(&self) -> u8 {
        self.ppem_x
    }

    pub fn ppem_y(&self) -> u8 {
        self.ppem_y
    }

    /// The larger of the horizontal and vertical pixels per em.
    pub fn ppem(&self) -> u16 {
        self.ppem_x.max(self.ppem_y) as u16
    }

    pub fn bit_depth(&self) -> u8 {
        self.bit_depth
    }

    /// Returns the index subtable at the given index, with the glyph
    /// range it covers.
    ///
    /// The `offset_data` parameter comes from the [`BitmapLocationTable`].
    pub fn subtable<'a>(
        &self,
        offset_data: FontData<'a>,
        index: u32,
    ) -> Result<BitmapSizeSubtable<'a>, ReadError> {
        if index >= self.number_of_index_subtables() {
            return Err(ReadError::OutOfBounds);
        }
        let base_offset = self.index_subtable_array_offset() as usize;
        let header: &IndexSubtableRecord =
            offset_data.read_ref_at(base_offset + index as usize * IndexSubtableRecord::RAW_BYTE_LEN)?;
        let subtable_offset = base_offset + header.additional_offset_to_index_subtable() as usize;
        let first_glyph = header.first_glyph_index();
        let last_glyph = header.last_glyph_index();
        if last_glyph < first_glyph {
            return Err(ReadError::MalformedData("inverted bitmap glyph range"));
        }
        let num_glyphs = (last_glyph.to_u16() - first_glyph.to_u16()) as usize + 1;
        let subtable_data = offset_data
            .split_off(subtable_offset)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(BitmapSizeSubtable {
            first_glyph,
            last_glyph,
            kind: IndexSubtable::read(subtable_data, num_glyphs)?,
        })
    }

    /// Returns the bitmap location information for the given glyph.
    ///
    /// The resulting [`BitmapLocation`] is used by
    /// [`BitmapDataTable::data`] to extract the bitmap.
    pub fn location(
        &self,
        offset_data: FontData,
        glyph_id: GlyphId,
    ) -> Result<BitmapLocation, ReadError> {
        if !(self.start_glyph_index()..=self.end_glyph_index()).contains(&glyph_id) {
            return Err(ReadError::OutOfBounds);
        }
        for ix in 0..self.number_of_index_subtables() {
            let subtable = self.subtable(offset_data, ix)?;
            if !(subtable.first_glyph..=subtable.last_glyph).contains(&glyph_id) {
                continue;
            }
            // glyph index relative to the first glyph in the subtable
            let glyph_ix = (glyph_id.to_u16() - subtable.first_glyph.to_u16()) as usize;
            let header = subtable.kind.header();
            let mut location = BitmapLocation {
                format: header.image_format,
                bit_depth: self.bit_depth,
                ..Default::default()
            };
            let image_data_offset = header.image_data_offset as usize;
            let (start, end) = match &subtable.kind {
                IndexSubtable::Format1(st) => {
                    let offset = |ix: usize| st.sbit_offsets.get(ix).map(|o| o.get() as usize);
                    (offset(glyph_ix), offset(glyph_ix + 1))
                }
                IndexSubtable::Format2(st) => {
                    location.metrics = Some(st.big_metrics);
                    let size = st.image_size as usize;
                    (Some(glyph_ix * size), Some((glyph_ix + 1) * size))
                }
                IndexSubtable::Format3(st) => {
                    let offset = |ix: usize| st.sbit_offsets.get(ix).map(|o| o.get() as usize);
                    (offset(glyph_ix), offset(glyph_ix + 1))
                }
                IndexSubtable::Format4(st) => {
                    // the trailing entry only ends the last image
                    let glyphs = st.glyph_array.split_last().map_or(&[][..], |(_, rest)| rest);
                    let ix = glyphs
                        .binary_search_by(|pair| pair.glyph_id().cmp(&glyph_id))
                        .map_err(|_| ReadError::OutOfBounds)?;
                    let offset = |ix: usize| {
                        st.glyph_array
                            .get(ix)
                            .map(|pair| pair.sbit_offset() as usize)
                    };
                    (offset(ix), offset(ix + 1))
                }
                IndexSubtable::Format5(st) => {
                    location.metrics = Some(st.big_metrics);
                    let ix = st
                        .glyph_array
                        .binary_search_by(|gid| gid.get().cmp(&glyph_id))
                        .map_err(|_| ReadError::OutOfBounds)?;
                    let size = st.image_size as usize;
                    (Some(ix * size), Some((ix + 1) * size))
                }
            };
            let (start, end) = start.zip(end).ok_or(ReadError::OutOfBounds)?;
            if end < start {
                return Err(ReadError::OutOfBounds);
            }
            location.data_offset = image_data_offset + start;
            location.data_size = end - start;
            return Ok(location);
        }
        Err(ReadError::OutOfBounds)
    }
}

/// Line metrics of a strike, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct SbitLineMetrics {
    pub ascender: i8,
    pub descender: i8,
    pub width_max: u8,
    pub caret_slope_numerator: i8,
    pub caret_slope_denominator: u8,
    pub caret_offset: i8,
    pub min_origin_sb: i8,
    pub min_advance_sb: i8,
    pub max_before_bl: i8,
    pub min_after_bl: i8,
    pub pad1: i8,
    pub pad2: i8,
}

impl FixedSize for SbitLineMetrics {
    const RAW_BYTE_LEN: usize = 12;
}

#[derive(Clone, Copy, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
struct IndexSubtableRecord {
    first_glyph_index: BigEndian<GlyphId>,
    last_glyph_index: BigEndian<GlyphId>,
    additional_offset_to_index_subtable: BigEndian<u32>,
}

impl FixedSize for IndexSubtableRecord {
    const RAW_BYTE_LEN: usize = 8;
}

impl IndexSubtableRecord {
    fn first_glyph_index(&self) -> GlyphId {
        self.first_glyph_index.get()
    }

    fn last_glyph_index(&self) -> GlyphId {
        self.last_glyph_index.get()
    }

    fn additional_offset_to_index_subtable(&self) -> u32 {
        self.additional_offset_to_index_subtable.get()
    }
}

/// An index subtable with the inclusive range of glyphs it covers.
#[derive(Clone, Copy)]
pub struct BitmapSizeSubtable<'a> {
    pub first_glyph: GlyphId,
    pub last_glyph: GlyphId,
    pub kind: IndexSubtable<'a>,
}

/// The header shared by all index subtable formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexSubtableHeader {
    pub index_format: u16,
    pub image_format: u16,
    /// Offset from the start of the data table to the images.
    pub image_data_offset: u32,
}

/// The index subtable formats.
#[derive(Clone, Copy)]
pub enum IndexSubtable<'a> {
    /// Variable size images, 32-bit offsets.
    Format1(IndexSubtable1<'a>),
    /// Constant size images.
    Format2(IndexSubtable2),
    /// Variable size images, 16-bit offsets.
    Format3(IndexSubtable3<'a>),
    /// Sparse glyphs with variable size images.
    Format4(IndexSubtable4<'a>),
    /// Sparse glyphs with constant size images.
    Format5(IndexSubtable5<'a>),
}

impl<'a> IndexSubtable<'a> {
    fn read(data: FontData<'a>, num_glyphs: usize) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let header = IndexSubtableHeader {
            index_format: cursor.read()?,
            image_format: cursor.read()?,
            image_data_offset: cursor.read()?,
        };
        match header.index_format {
            1 => Ok(Self::Format1(IndexSubtable1 {
                header,
                sbit_offsets: cursor.read_array(num_glyphs + 1)?,
            })),
            2 => Ok(Self::Format2(IndexSubtable2 {
                header,
                image_size: cursor.read()?,
                big_metrics: read_big_metrics(&mut cursor)?,
            })),
            3 => Ok(Self::Format3(IndexSubtable3 {
                header,
                sbit_offsets: cursor.read_array(num_glyphs + 1)?,
            })),
            4 => {
                let num_glyphs = cursor.read::<u32>()? as usize;
                Ok(Self::Format4(IndexSubtable4 {
                    header,
                    glyph_array: cursor.read_array(num_glyphs + 1)?,
                }))
            }
            5 => {
                let image_size = cursor.read()?;
                let big_metrics = read_big_metrics(&mut cursor)?;
                let num_glyphs = cursor.read::<u32>()? as usize;
                Ok(Self::Format5(IndexSubtable5 {
                    header,
                    image_size,
                    big_metrics,
                    glyph_array: cursor.read_array(num_glyphs)?,
                }))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }

    pub fn header(&self) -> IndexSubtableHeader {
        match self {
            Self::Format1(st) => st.header,
            Self::Format2(st) => st.header,
            Self::Format3(st) => st.header,
            Self::Format4(st) => st.header,
            Self::Format5(st) => st.header,
        }
    }
}

#[derive(Clone, Copy)]
pub struct IndexSubtable1<'a> {
    pub header: IndexSubtableHeader,
    /// Offsets from the image data offset, one more than the glyphs.
    pub sbit_offsets: &'a [BigEndian<u32>],
}

#[derive(Clone, Copy)]
pub struct IndexSubtable2 {
    pub header: IndexSubtableHeader,
    pub image_size: u32,
    pub big_metrics: BigGlyphMetrics,
}

#[derive(Clone, Copy)]
pub struct IndexSubtable3<'a> {
    pub header: IndexSubtableHeader,
    pub sbit_offsets: &'a [BigEndian<u16>],
}

#[derive(Clone, Copy)]
pub struct IndexSubtable4<'a> {
    pub header: IndexSubtableHeader,
    /// Sorted by glyph, with a trailing entry to compute the last size.
    pub glyph_array: &'a [GlyphIdOffsetPair],
}

#[derive(Clone, Copy)]
pub struct IndexSubtable5<'a> {
    pub header: IndexSubtableHeader,
    pub image_size: u32,
    pub big_metrics: BigGlyphMetrics,
    pub glyph_array: &'a [BigEndian<GlyphId>],
}

/// A glyph and the offset of its image in a format 4 index subtable.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct GlyphIdOffsetPair {
    pub glyph_id: BigEndian<GlyphId>,
    pub sbit_offset: BigEndian<u16>,
}

impl FixedSize for GlyphIdOffsetPair {
    const RAW_BYTE_LEN: usize = 4;
}

impl GlyphIdOffsetPair {
    pub fn glyph_id(&self) -> GlyphId {
        self.glyph_id.get()
    }

    pub fn sbit_offset(&self) -> u16 {
        self.sbit_offset.get()
    }
}

/// Metrics for horizontal and vertical layout, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct BigGlyphMetrics {
    pub height: u8,
    pub width: u8,
    pub hori_bearing_x: i8,
    pub hori_bearing_y: i8,
    pub hori_advance: u8,
    pub vert_bearing_x: i8,
    pub vert_bearing_y: i8,
    pub vert_advance: u8,
}

impl FixedSize for BigGlyphMetrics {
    const RAW_BYTE_LEN: usize = 8;
}

/// Metrics for a single direction, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct SmallGlyphMetrics {
    pub height: u8,
    pub width: u8,
    pub bearing_x: i8,
    pub bearing_y: i8,
    pub advance: u8,
}

impl FixedSize for SmallGlyphMetrics {
    const RAW_BYTE_LEN: usize = 5;
}

/// Where the image of a glyph is in the data table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitmapLocation {
    /// Format of the image data.
    pub format: u16,
    /// Offset in bytes from the start of the data table.
    pub data_offset: usize,
    /// Size of the image data in bytes.
    pub data_size: usize,
    /// Bit depth of the strike.
    pub bit_depth: u8,
    /// Metrics shared by the glyphs of the index subtable, if any.
    pub metrics: Option<BigGlyphMetrics>,
}

impl BitmapLocation {
    /// Returns true if the glyph has no image, such as a space.
    pub fn is_empty(&self) -> bool {
        self.data_size == 0
    }
}

/// A bitmap data table.
#[derive(Clone, Copy)]
pub struct BitmapDataTable<'a> {
    data: FontData<'a>,
    major_version: u16,
}

impl<'a> FontRead<'a> for BitmapDataTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let major_version = data.read_at::<u16>(0)?;
        Ok(Self {
            data,
            major_version,
        })
    }
}

impl<'a> BitmapDataTable<'a> {
    /// 2 for `EBDT` and `bdat`, 3 for `CBDT`.
    pub fn major_version(&self) -> u16 {
        self.major_version
    }

    /// True for color tables, which may hold PNG images.
    pub fn is_color(&self) -> bool {
        self.major_version == 3
    }

    /// Returns the image at the given location.
    pub fn data(&self, location: &BitmapLocation) -> Result<BitmapData<'a>, ReadError> {
        bitmap_data(self.data, location, self.is_color())
    }
}

/// How the pixels of an image are stored.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BitmapDataFormat {
    /// Rows are packed without padding.
    BitAligned,
    /// Each row starts on a byte boundary.
    ByteAligned,
    Png,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitmapMetrics {
    Small(SmallGlyphMetrics),
    Big(BigGlyphMetrics),
}

impl BitmapMetrics {
    /// Returns `(width, height)` in pixels.
    pub fn size(&self) -> (u8, u8) {
        match self {
            Self::Small(metrics) => (metrics.width, metrics.height),
            Self::Big(metrics) => (metrics.width, metrics.height),
        }
    }

    /// Returns the horizontal bearings `(x, y)` in pixels.
    pub fn hori_bearings(&self) -> (i8, i8) {
        match self {
            Self::Small(metrics) => (metrics.bearing_x, metrics.bearing_y),
            Self::Big(metrics) => (metrics.hori_bearing_x, metrics.hori_bearing_y),
        }
    }
}

/// A decoded glyph image.
#[derive(Clone, Copy, Debug)]
pub struct BitmapData<'a> {
    pub metrics: BitmapMetrics,
    pub format: BitmapDataFormat,
    pub data: &'a [u8],
}

fn bitmap_data<'a>(
    offset_data: FontData<'a>,
    location: &BitmapLocation,
    is_color: bool,
) -> Result<BitmapData<'a>, ReadError> {
    let mut image_data = offset_data
        .slice_len(location.data_offset, location.data_size)
        .ok_or(ReadError::OutOfBounds)?
        .cursor();
    let bit_depth = location.bit_depth as usize;
    let byte_aligned_len = |width: u8, height: u8| (width as usize * bit_depth).div_ceil(8) * height as usize;
    let bit_aligned_len = |width: u8, height: u8| (width as usize * bit_depth * height as usize).div_ceil(8);
    let location_metrics = || {
        location
            .metrics
            .ok_or(ReadError::MalformedData("expected metrics from location table"))
    };
    let (metrics, format, len) = match location.format {
        1 => {
            let metrics = read_small_metrics(&mut image_data)?;
            let len = byte_aligned_len(metrics.width, metrics.height);
            (BitmapMetrics::Small(metrics), BitmapDataFormat::ByteAligned, len)
        }
        2 => {
            let metrics = read_small_metrics(&mut image_data)?;
            let len = bit_aligned_len(metrics.width, metrics.height);
            (BitmapMetrics::Small(metrics), BitmapDataFormat::BitAligned, len)
        }
        5 => {
            let metrics = location_metrics()?;
            let len = bit_aligned_len(metrics.width, metrics.height);
            (BitmapMetrics::Big(metrics), BitmapDataFormat::BitAligned, len)
        }
        6 => {
            let metrics = read_big_metrics(&mut image_data)?;
            let len = byte_aligned_len(metrics.width, metrics.height);
            (BitmapMetrics::Big(metrics), BitmapDataFormat::ByteAligned, len)
        }
        7 => {
            let metrics = read_big_metrics(&mut image_data)?;
            let len = bit_aligned_len(metrics.width, metrics.height);
            (BitmapMetrics::Big(metrics), BitmapDataFormat::BitAligned, len)
        }
        17 if is_color => {
            let metrics = read_small_metrics(&mut image_data)?;
            let len = image_data.read::<u32>()? as usize;
            (BitmapMetrics::Small(metrics), BitmapDataFormat::Png, len)
        }
        18 if is_color => {
            let metrics = read_big_metrics(&mut image_data)?;
            let len = image_data.read::<u32>()? as usize;
            (BitmapMetrics::Big(metrics), BitmapDataFormat::Png, len)
        }
        19 if is_color => {
            let metrics = location_metrics()?;
            let len = image_data.read::<u32>()? as usize;
            (BitmapMetrics::Big(metrics), BitmapDataFormat::Png, len)
        }
        // 3 is obsolete, 4 is compressed and 8/9 are composites
        other => return Err(ReadError::InvalidFormat(other.into())),
    };
    Ok(BitmapData {
        metrics,
        format,
        data: image_data.read_bytes(len)?,
    })
}

fn read_small_metrics(cursor: &mut Cursor) -> Result<SmallGlyphMetrics, ReadError> {
    Ok(cursor.read_array::<SmallGlyphMetrics>(1)?[0])
}

fn read_big_metrics(cursor: &mut Cursor) -> Result<BigGlyphMetrics, ReadError> {
    Ok(cursor.read_array::<BigGlyphMetrics>(1)?[0])
}
