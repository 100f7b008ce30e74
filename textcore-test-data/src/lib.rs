//! Test data shared by the textcore crates.
//!
//! Fixtures are either static byte arrays annotated field by field, or
//! small builders on top of [`bebuffer::BeBuffer`] for data that has to be
//! parameterized.

pub mod bebuffer;
pub mod bitmap;
pub mod cmap;
pub mod font_builder;
pub mod glyf;
pub mod kern;
pub mod layout;
pub mod morx;
pub mod variations;

use bebuffer::BeBuffer;

/// A version 1.0 `head` table with the given units per em and loca format.
pub fn head(units_per_em: u16, index_to_loc_format: i16) -> Vec<u8> {
    BeBuffer::new()
        .extend([1u16, 0]) // version
        .push(0x00010000u32) // fontRevision
        .push(0u32) // checksumAdjustment
        .push(0x5F0F3CF5u32) // magicNumber
        .push(0u16) // flags
        .push(units_per_em)
        .extend([0i64, 0]) // created, modified
        .extend([0i16, -200, 1000, 800]) // bbox
        .extend([0u16, 8]) // macStyle, lowestRecPPEM
        .extend([2i16, index_to_loc_format, 0])
        .into_vec()
}

/// A version 0.5 `maxp` table.
pub fn maxp(num_glyphs: u16) -> Vec<u8> {
    BeBuffer::new()
        .push(0x00005000u32)
        .push(num_glyphs)
        .into_vec()
}

/// An `hhea` table with the given vertical metrics.
pub fn hhea(ascender: i16, descender: i16, line_gap: i16, number_of_long_metrics: u16) -> Vec<u8> {
    BeBuffer::new()
        .push(0x00010000u32)
        .extend([ascender, descender, line_gap])
        .push(1000u16) // advanceWidthMax
        .extend([0i16; 11])
        .push(number_of_long_metrics)
        .into_vec()
}

/// An `hmtx` table from `(advance, lsb)` pairs followed by bare lsbs.
pub fn hmtx(long_metrics: &[(u16, i16)], bearings: &[i16]) -> Vec<u8> {
    let mut buf = BeBuffer::new();
    for (advance, lsb) in long_metrics {
        buf = buf.push(*advance).push(*lsb);
    }
    buf.extend(bearings.iter().copied()).into_vec()
}

pub mod post {

    #[rustfmt::skip]
    pub static SIMPLE: &[u8] = &[
        0x00, 0x02, 0x00, 0x00, // version 2.0
        0x00, 0x00, 0x00, 0x00, // italic angle
        0xFF, 0xb5,             // underlinePosition -75
        0x00, 0x32,             // underlineThickness 50
        0x00, 0x00, 0x00, 0x00, // fixedpitch
        0x00, 0x00, 0x00, 0x00, // min/max mem:
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x0A,             // numGlyphs 10
                                // glyph name index:
        0x00, 0x00,             // glyph 0 -> name 0
        0x00, 0x00,             // glyph 1 -> name 0
        0x00, 0x03,             // glyph 2 -> name 3 ('space')
        0x00, 0x04,             // glyph 3 -> name 4 ('exclam')
        0x00, 0x06,
        0x00, 0x07,
        0x00, 0x08,
        0x01, 0x02,             // glyph 7 -> name 258, first custom
        0x01, 0x03,             // glyph 8 -> name 259
        0x01, 0x04,             // glyph 9 -> name 260
        0x05, 0x68, 0x65, 0x6c, 0x6c, 0x6f, // 5, h e l l o
        0x02, 0x68, 0x69,                   // 2, h i
        0x04, 0x68, 0x6f, 0x6c, 0x61,       // 4, h o l a
    ];
}

/// An `OS/2` version 4 table.
///
/// Only the fields the metrics code reads are meaningful.
pub fn os2(
    use_typo_metrics: bool,
    typo: (i16, i16, i16),
    win: (u16, u16),
    strikeout: (i16, i16),
) -> Vec<u8> {
    let fs_selection: u16 = if use_typo_metrics { 0x80 } else { 0x40 };
    BeBuffer::new()
        .push(4u16) // version
        .push(500i16) // xAvgCharWidth
        .extend([400u16, 5, 0]) // weight, width, fsType
        .extend([0i16; 8]) // sub/superscript
        .extend([strikeout.0, strikeout.1])
        .push(0i16) // sFamilyClass
        .extend([0u8; 10]) // panose
        .extend([0u32; 4]) // unicode ranges
        .extend_bytes(b"NONE")
        .push(fs_selection)
        .extend([0x20u16, 0xFFFF])
        .extend([typo.0, typo.1, typo.2])
        .extend([win.0, win.1])
        .extend([1u32, 0]) // code page ranges
        .extend([500i16, 700]) // xHeight, capHeight
        .extend([0u16, 0x20, 2])
        .into_vec()
}
