//! cmap subtables and tables

use crate::bebuffer::BeBuffer;

/// A format 4 subtable mapping `A..=Z` by delta (+10000) and `a..=z`
/// through the glyph id array to glyphs 1 to 26.
pub fn format4_latin() -> Vec<u8> {
    let seg_count = 3u16;
    let glyph_ids: Vec<u16> = (1..=26).collect();
    let length = 14 + seg_count * 8 + 2 + 26 * 2;
    BeBuffer::new()
        .extend([4u16, length, 0]) // format, length, language
        .extend([seg_count * 2, 4, 1, 2]) // segCountX2, search params
        .extend([0x5Au16, 0x7A, 0xFFFF]) // endCode
        .push(0u16) // reservedPad
        .extend([0x41u16, 0x61, 0xFFFF]) // startCode
        .extend([10000i16, 0, 1]) // idDelta
        .extend([0u16, 4, 0]) // idRangeOffsets
        .extend(glyph_ids)
        .into_vec()
}

/// A format 0 subtable mapping `A` to 1 and Mac Roman 0x8E (é) to 9.
pub fn format0() -> Vec<u8> {
    let mut glyphs = [0u8; 256];
    glyphs[0x41] = 1;
    glyphs[0x8E] = 9;
    BeBuffer::new()
        .extend([0u16, 262, 0])
        .extend_bytes(&glyphs)
        .into_vec()
}

/// A format 12 subtable mapping `A..=C` to 1..=3 and U+1F600 to 7.
#[rustfmt::skip]
pub fn format12() -> Vec<u8> {
    BeBuffer::new()
        .extend([12u16, 0])     // format, reserved
        .extend([40u32, 0, 2])  // length, language, numGroups
        .extend([0x41u32, 0x43, 1])
        .extend([0x1F600u32, 0x1F600, 7])
        .into_vec()
}

/// A format 14 subtable: `A` + U+FE00 uses the default glyph, `B` + U+FE00
/// maps to glyph 5.
#[rustfmt::skip]
pub fn format14() -> Vec<u8> {
    BeBuffer::new()
        .push(14u16)
        .extend([38u32, 1])             // length, numVarSelectorRecords
        .extend_bytes(&[0x00, 0xFE, 0x00]) // varSelector
        .extend([21u32, 29])            // defaultUVSOffset, nonDefaultUVSOffset
        .push(1u32)                     // numUnicodeValueRanges
        .extend_bytes(&[0x00, 0x00, 0x41, 0x00])
        .push(1u32)                     // numUVSMappings
        .extend_bytes(&[0x00, 0x00, 0x42])
        .push(5u16)
        .into_vec()
}

/// A cmap table with Mac Roman (1, 0), Windows BMP (3, 1), Windows full
/// (3, 10) and Unicode variation sequence (0, 5) subtables, in that order.
pub fn multi_subtable() -> Vec<u8> {
    table(&[
        (1, 0, format0()),
        (3, 1, format4_latin()),
        (3, 10, format12()),
        (0, 5, format14()),
    ])
}

/// A cmap table from `(platform, encoding, subtable)` records, with the
/// subtables laid out in record order.
pub fn table(subtables: &[(u16, u16, Vec<u8>)]) -> Vec<u8> {
    let mut buf = BeBuffer::new().extend([0u16, subtables.len() as u16]);
    let mut offset = 4 + 8 * subtables.len() as u32;
    for (platform, encoding, data) in subtables {
        buf = buf.extend([*platform, *encoding]).push(offset);
        offset += data.len() as u32;
    }
    for (_, _, data) in subtables {
        buf = buf.extend_bytes(data);
    }
    buf.into_vec()
}
