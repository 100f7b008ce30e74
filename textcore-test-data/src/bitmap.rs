//! Embedded bitmap location and data tables.

use textcore_types::Tag;

use crate::bebuffer::BeBuffer;

/// How the glyphs of an index subtable are located.
#[derive(Clone, Debug)]
pub enum IndexSpec {
    Format1,
    /// Constant image size; metrics as `[height, width, horiBearingX,
    /// horiBearingY, horiAdvance, vertBearingX, vertBearingY, vertAdvance]`.
    Format2 { metrics: [u8; 8] },
    Format3,
    /// Sparse glyphs, one image each.
    Format4 { glyphs: Vec<u16> },
    /// Sparse glyphs with a constant image size.
    Format5 { metrics: [u8; 8], glyphs: Vec<u16> },
}

/// An index subtable and the images of its glyphs.
#[derive(Clone, Debug)]
pub struct SubtableSpec {
    pub first_glyph: u16,
    pub last_glyph: u16,
    pub image_format: u16,
    pub index: IndexSpec,
    /// One image per glyph, or per listed glyph for sparse formats.
    pub images: Vec<Vec<u8>>,
}

/// A strike with its index subtables.
#[derive(Clone, Debug)]
pub struct StrikeSpec {
    pub ppem: u8,
    pub bit_depth: u8,
    pub ascender: i8,
    pub descender: i8,
    pub subtables: Vec<SubtableSpec>,
}

/// Builds a location table and its data table.
///
/// A `major_version` of 3 gives `CBLC`/`CBDT`, 2 gives `EBLC`/`EBDT`.
pub fn build(major_version: u16, strikes: &[StrikeSpec]) -> (Vec<u8>, Vec<u8>) {
    let mut image_data = BeBuffer::new().push(major_version).push(0u16).into_vec();
    let mut blocks = Vec::new();
    for strike in strikes {
        let mut array = BeBuffer::new();
        let mut bodies = Vec::new();
        let array_len = 8 * strike.subtables.len();
        for subtable in &strike.subtables {
            let image_data_offset = image_data.len() as u32;
            for image in &subtable.images {
                image_data.extend_from_slice(image);
            }
            array = array
                .push(subtable.first_glyph)
                .push(subtable.last_glyph)
                .push((array_len + bodies.len()) as u32);
            bodies.extend(encode_subtable(subtable, image_data_offset));
        }
        blocks.push(array.extend_bytes(&bodies).into_vec());
    }

    let mut location = BeBuffer::new()
        .push(major_version)
        .push(0u16)
        .push(strikes.len() as u32);
    let mut block_offset = 8 + 48 * strikes.len();
    for (strike, block) in strikes.iter().zip(&blocks) {
        let start = strike.subtables.iter().map(|s| s.first_glyph).min();
        let end = strike.subtables.iter().map(|s| s.last_glyph).max();
        let line_metrics = [
            strike.ascender as u8,
            strike.descender as u8,
            strike.ppem,
            1,
            0,
            0,
            0,
            0,
            strike.ascender as u8,
            strike.descender as u8,
            0,
            0,
        ];
        location = location
            .push(block_offset as u32)
            .push(block.len() as u32)
            .push(strike.subtables.len() as u32)
            .push(0u32)
            .extend_bytes(&line_metrics)
            .extend_bytes(&line_metrics)
            .push(start.unwrap_or(0))
            .push(end.unwrap_or(0))
            .extend_bytes(&[strike.ppem, strike.ppem, strike.bit_depth, 1]);
        block_offset += block.len();
    }
    for block in &blocks {
        location = location.extend_bytes(block);
    }
    (location.into_vec(), image_data)
}

fn encode_subtable(subtable: &SubtableSpec, image_data_offset: u32) -> Vec<u8> {
    let index_format: u16 = match subtable.index {
        IndexSpec::Format1 => 1,
        IndexSpec::Format2 { .. } => 2,
        IndexSpec::Format3 => 3,
        IndexSpec::Format4 { .. } => 4,
        IndexSpec::Format5 { .. } => 5,
    };
    let buf = BeBuffer::new()
        .push(index_format)
        .push(subtable.image_format)
        .push(image_data_offset);
    let offsets = std::iter::once(0)
        .chain(subtable.images.iter().scan(0usize, |end, image| {
            *end += image.len();
            Some(*end)
        }))
        .collect::<Vec<_>>();
    let image_size = subtable.images.first().map(|i| i.len()).unwrap_or(0) as u32;
    let buf = match &subtable.index {
        IndexSpec::Format1 => buf.extend(offsets.iter().map(|o| *o as u32)),
        IndexSpec::Format2 { metrics } => buf.push(image_size).extend_bytes(metrics),
        IndexSpec::Format3 => buf.extend(offsets.iter().map(|o| *o as u16)).align_to(4),
        IndexSpec::Format4 { glyphs } => {
            let mut buf = buf.push(glyphs.len() as u32);
            for (glyph, offset) in glyphs.iter().chain([&0]).zip(&offsets) {
                buf = buf.push(*glyph).push(*offset as u16);
            }
            buf
        }
        IndexSpec::Format5 { metrics, glyphs } => buf
            .push(image_size)
            .extend_bytes(metrics)
            .push(glyphs.len() as u32)
            .extend(glyphs.iter().copied())
            .align_to(4),
    };
    buf.into_vec()
}

/// Stand-in PNG content for a glyph at the given size.
pub fn fake_png(ppem: u8) -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', ppem]
}

/// `CBLC`/`CBDT` tables with one strike per size, each covering glyphs
/// 1 and 2.
///
/// Glyph 1 is a format 17 PNG image as wide and tall as the strike; glyph
/// 2 has no image.
pub fn color_strikes(ppems: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let strikes = ppems
        .iter()
        .map(|&ppem| {
            let ascender = (ppem as u16 * 4 / 5) as i8;
            let png = fake_png(ppem);
            let image = BeBuffer::new()
                .extend_bytes(&[ppem, ppem, 0, ascender as u8, ppem])
                .push(png.len() as u32)
                .extend_bytes(&png)
                .into_vec();
            StrikeSpec {
                ppem,
                bit_depth: 32,
                ascender,
                descender: ascender - ppem as i8,
                subtables: vec![SubtableSpec {
                    first_glyph: 1,
                    last_glyph: 2,
                    image_format: 17,
                    index: IndexSpec::Format1,
                    images: vec![image, Vec::new()],
                }],
            }
        })
        .collect::<Vec<_>>();
    build(3, &strikes)
}

/// Metrics shared by the glyphs of the constant size subtables of
/// [`gray_strike`]: 8 by 2 pixels.
pub const SHARED_METRICS: [u8; 8] = [2, 8, 0, 2, 9, 0, 0, 2];

/// `EBLC`/`EBDT` tables with a single one bit strike using every index
/// subtable format:
///
/// | glyphs | index | image |
/// |---|---|---|
/// | 1, 2 | 1 | 1 |
/// | 3, 4 | 2 | 5 |
/// | 5, 6 | 3 | 2 (glyph 6 empty) |
/// | 7, 9 of 7..=10 | 4 | 6 |
/// | 11, 12 of 11..=13 | 5 | 5 |
#[rustfmt::skip]
pub fn gray_strike() -> (Vec<u8>, Vec<u8>) {
    let big = |height: u8, width: u8, data: &[u8]| {
        let mut image = vec![height, width, 0, height, width, 0, 0, height];
        image.extend_from_slice(data);
        image
    };
    let subtables = vec![
        SubtableSpec {
            first_glyph: 1,
            last_glyph: 2,
            image_format: 1,
            index: IndexSpec::Format1,
            images: vec![
                // small metrics: height, width, bearingX, bearingY, advance
                vec![2, 9, 0, 2, 10, 0xFF, 0x80, 0xAA, 0x00],
                vec![1, 8, 0, 1, 9, 0x01],
            ],
        },
        SubtableSpec {
            first_glyph: 3,
            last_glyph: 4,
            image_format: 5,
            index: IndexSpec::Format2 { metrics: SHARED_METRICS },
            images: vec![vec![0x33, 0x44], vec![0x55, 0x66]],
        },
        SubtableSpec {
            first_glyph: 5,
            last_glyph: 6,
            image_format: 2,
            index: IndexSpec::Format3,
            images: vec![vec![3, 3, 0, 3, 4, 0b1010_1010, 0b1000_0000], Vec::new()],
        },
        SubtableSpec {
            first_glyph: 7,
            last_glyph: 10,
            image_format: 6,
            index: IndexSpec::Format4 { glyphs: vec![7, 9] },
            images: vec![big(1, 8, &[0x0F]), big(1, 8, &[0x5A])],
        },
        SubtableSpec {
            first_glyph: 11,
            last_glyph: 13,
            image_format: 5,
            index: IndexSpec::Format5 { metrics: SHARED_METRICS, glyphs: vec![11, 12] },
            images: vec![vec![0x11, 0x22], vec![0x77, 0x88]],
        },
    ];
    build(2, &[StrikeSpec { ppem: 12, bit_depth: 1, ascender: 10, descender: -2, subtables }])
}

/// The signature and header chunk of a PNG image of the given size.
pub fn png_header(width: u32, height: u32) -> Vec<u8> {
    BeBuffer::new()
        .extend_bytes(b"\x89PNG\r\n\x1a\n")
        .push(13u32)
        .extend_bytes(b"IHDR")
        .extend([width, height])
        .extend_bytes(&[8, 6, 0, 0, 0])
        .into_vec()
}

/// An `sbix` table with one strike per size, for a font of `num_glyphs`
/// glyphs.
///
/// Glyph 1 is a PNG image as large as the strike with origin `(-2, 3)`,
/// glyph 2 duplicates glyph 1 and the others are empty.
pub fn sbix(num_glyphs: u16, ppems: &[u16]) -> Vec<u8> {
    let strike = |ppem: u16| {
        let glyph_1 = BeBuffer::new()
            .extend([-2i16, 3])
            .push(Tag::new(b"png "))
            .extend_bytes(&png_header(ppem as u32, ppem as u32));
        let glyph_2 = BeBuffer::new()
            .extend([0i16, 0])
            .push(Tag::new(b"dupe"))
            .push(1u16);
        let header_len = 4 + 4 * (num_glyphs as u32 + 1);
        let g1_end = header_len + glyph_1.len() as u32;
        let g2_end = g1_end + glyph_2.len() as u32;
        let mut offsets = vec![header_len, header_len, g1_end];
        offsets.resize(num_glyphs as usize + 1, g2_end);
        BeBuffer::new()
            .extend([ppem, 72])
            .extend(offsets)
            .extend_bytes(glyph_1.data())
            .extend_bytes(glyph_2.data())
            .into_vec()
    };
    let strikes = ppems.iter().map(|ppem| strike(*ppem)).collect::<Vec<_>>();
    let mut buf = BeBuffer::new()
        .extend([1u16, 0x0001])
        .push(strikes.len() as u32);
    let mut offset = 8 + 4 * strikes.len() as u32;
    for strike in &strikes {
        buf = buf.push(offset);
        offset += strike.len() as u32;
    }
    for strike in &strikes {
        buf = buf.extend_bytes(strike);
    }
    buf.into_vec()
}
