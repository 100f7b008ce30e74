//! `kern` and `kerx` tables.
//!
//! Subtable bodies are built without their headers and wrapped by
//! [`kern_ot`], [`kern_apple`] or [`kerx`]. Offsets stored in format 2 and 6
//! bodies are relative to the start of the subtable, header included.

use crate::bebuffer::BeBuffer;

/// An OpenType version 0 `kern` table. Each subtable is given as
/// `(coverage, body)`.
pub fn kern_ot(subtables: &[(u16, &[u8])]) -> Vec<u8> {
    let mut buf = BeBuffer::new().extend([0u16, subtables.len() as u16]);
    for (coverage, body) in subtables {
        buf = buf
            .push(0u16) // version
            .push(6 + body.len() as u16)
            .push(*coverage)
            .extend_bytes(body);
    }
    buf.into_vec()
}

/// An Apple version 1 `kern` table. Each subtable is given as
/// `(coverage, body)`.
pub fn kern_apple(subtables: &[(u16, &[u8])]) -> Vec<u8> {
    let mut buf = BeBuffer::new()
        .push(0x00010000u32)
        .push(subtables.len() as u32);
    for (coverage, body) in subtables {
        buf = buf
            .push(8 + body.len() as u32)
            .push(*coverage)
            .push(0u16) // tupleIndex
            .extend_bytes(body);
    }
    buf.into_vec()
}

/// A version 2 `kerx` table. Each subtable is given as `(coverage, body)`.
pub fn kerx(subtables: &[(u32, &[u8])]) -> Vec<u8> {
    let mut buf = BeBuffer::new()
        .extend([2u16, 0])
        .push(subtables.len() as u32);
    for (coverage, body) in subtables {
        buf = buf
            .push(12 + body.len() as u32)
            .push(*coverage)
            .push(0u32) // tupleCount
            .extend_bytes(body);
    }
    buf.into_vec()
}

const PAIRS: [(u16, u16, i16); 3] = [(4, 5, -40), (4, 9, 20), (7, 5, -15)];

/// `kern` format 0: pairs (4, 5) = -40, (4, 9) = 20 and (7, 5) = -15.
pub fn kern_format0() -> Vec<u8> {
    let mut buf = BeBuffer::new().extend([3u16, 12, 1, 6]);
    for (left, right, value) in PAIRS {
        buf = buf.extend([left, right]).push(value);
    }
    buf.into_vec()
}

/// `kern` format 2 for an OpenType subtable: glyphs 10 and 11 are the
/// rows, glyphs 20 and 21 the columns of the matrix `[[0, -10], [30, -60]]`.
pub fn kern_format2() -> Vec<u8> {
    BeBuffer::new()
        // rowWidth, left, right and array offsets
        .extend([4u16, 14, 22, 30])
        // left class table @14: row offsets from the subtable start
        .extend([10u16, 2, 30, 34])
        // right class table @22
        .extend([20u16, 2, 0, 2])
        // array @30
        .extend([0i16, -10, 30, -60])
        .into_vec()
}

/// `kern` format 1: in a run of glyph 3 followed by glyph 4, the last
/// glyph 3 is kerned by -50.
pub fn kern_format1() -> Vec<u8> {
    BeBuffer::new()
        // nClasses, classTable, stateArray, entryTable, valueTable
        .extend([6u16, 10, 16, 28, 40])
        // class table @10: glyph 3 is class 4, glyph 4 class 5
        .extend([3u16, 2])
        .extend([4u8, 5])
        // states @16
        .extend([0u8, 0, 0, 0, 1, 0])
        .extend([0u8, 0, 0, 0, 1, 2])
        // entries @28: state byte offset, flags with the value offset
        .extend([16u16, 0])
        .extend([22u16, 0x8000])
        .extend([16u16, 0x8000 | 40])
        // values @40: the odd value ends the list
        .extend([0i16, -49])
        .into_vec()
}

/// `kerx` format 0, with the pairs of [`kern_format0`].
pub fn kerx_format0() -> Vec<u8> {
    let mut buf = BeBuffer::new().extend([3u32, 12, 1, 6]);
    for (left, right, value) in PAIRS {
        buf = buf.extend([left, right]).push(value);
    }
    buf.into_vec()
}

/// `kerx` format 1: in a run of glyph 3 followed by glyph 4, the last
/// glyph 3 is kerned by -50.
pub fn kerx_format1() -> Vec<u8> {
    BeBuffer::new()
        .extend([6u32, 20, 32, 56, 74])
        // class table @20
        .extend([8u16, 3, 2, 4, 5])
        .push(0u16)
        // states @32
        .extend([0u16, 0, 0, 0, 1, 0])
        .extend([0u16, 0, 0, 0, 1, 2])
        // entries @56: new state, flags, value index
        .extend([0u16, 0, 0xFFFF])
        .extend([1u16, 0x8000, 0xFFFF])
        .extend([0u16, 0x8000, 0])
        // values @74
        .extend([0i16, -49])
        .into_vec()
}

/// `kerx` format 2 with the matrix of [`kern_format2`].
pub fn kerx_format2() -> Vec<u8> {
    BeBuffer::new()
        .extend([4u32, 28, 38, 48])
        // left class table @28: row offsets from the array
        .extend([8u16, 10, 2, 0, 4])
        // right class table @38
        .extend([8u16, 20, 2, 0, 2])
        // array @48
        .extend([0i16, -10, 30, -60])
        .into_vec()
}

/// `kerx` format 4 with anchor point actions: glyph 3 marks, and a
/// following glyph 4 attaches its anchor 1 to the anchor 0 of the mark.
pub fn kerx_format4() -> Vec<u8> {
    BeBuffer::new()
        .extend([6u32, 20, 32, 56])
        // action type 1, control data @74
        .push((1u32 << 30) | 74)
        // class table @20
        .extend([8u16, 3, 2, 4, 5])
        .push(0u16)
        // states @32
        .extend([0u16, 0, 0, 0, 1, 0])
        .extend([0u16, 0, 0, 0, 1, 2])
        // entries @56: new state, flags, action index
        .extend([0u16, 0, 0xFFFF])
        .extend([1u16, 0x8000, 0xFFFF])
        .extend([1u16, 0, 0])
        // actions @74: mark anchor, current anchor
        .extend([0u16, 1])
        .into_vec()
}

/// `kerx` format 6: (283, 659) = -270, everything else 0.
pub fn kerx_format6() -> Vec<u8> {
    BeBuffer::new()
        .push(0u32) // flags
        .extend([2u16, 2]) // rowCount, columnCount
        .extend([32u32, 48, 64])
        // row table @32: values are premultiplied by the column count
        .extend([6u16, 4, 1, 4, 0, 0, 283, 2])
        // column table @48
        .extend([6u16, 4, 1, 4, 0, 0, 659, 1])
        // array @64
        .extend([0i16, 0, 0, -270])
        .into_vec()
}

/// An `ankr` table where glyph 3 has the anchor (100, 50) and glyph 4 the
/// anchors (0, 0) and (10, -5).
pub fn ankr() -> Vec<u8> {
    BeBuffer::new()
        .extend([0u32, 12, 24])
        // lookup @12
        .extend([0u16, 0, 0, 0, 0, 8])
        // glyph data @24
        .push(1u32)
        .extend([100i16, 50])
        .push(2u32)
        .extend([0i16, 0, 10, -5])
        .into_vec()
}
