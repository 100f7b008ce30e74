//! `morx` tables with a single chain holding a single subtable.
//!
//! The subtables are small hand assembled state machines covering each of
//! the subtable kinds.

use crate::bebuffer::BeBuffer;

/// Wraps subtable data in a version 2 `morx` table with one chain and one
/// feature (type 4, setting 0).
pub fn morx(subtable_type: u8, subtable: &[u8]) -> Vec<u8> {
    let subtable_len = 12 + subtable.len() as u32;
    BeBuffer::new()
        .extend([2u16, 0]) // version, unused
        .push(1u32) // nChains
        // chain
        .push(1u32) // defaultFlags
        .push(16 + 12 + subtable_len) // chainLength
        .extend([1u32, 1]) // nFeatureEntries, nSubtables
        .extend([4u16, 0])
        .extend([1u32, 0xFFFFFFFF])
        // subtable
        .push(subtable_len)
        .push(0x20000000u32 | subtable_type as u32) // coverage
        .push(1u32) // subFeatureFlags
        .extend_bytes(subtable)
        .into_vec()
}

/// Glyph 3 marks the first glyph of the rearrangement.
pub fn rearrangement() -> Vec<u8> {
    BeBuffer::new()
        .extend([5u32, 16, 24, 44])
        // class table @16: glyph 3 is class 4
        .extend([8u16, 3, 1, 4])
        // states @24
        .extend([0u16, 0, 0, 0, 1])
        .extend([0u16, 0, 0, 0, 1])
        // entries @44
        .extend([0u16, 0])
        .extend([1u16, 0x8000])
        .into_vec()
}

/// Glyphs 2 to 4 are substituted through the lookup at index 0, which maps
/// glyphs 2 to 6 to 7 to 11.
pub fn contextual() -> Vec<u8> {
    BeBuffer::new()
        .extend([5u32, 20, 32, 52, 68])
        // class table @20
        .extend([8u16, 2, 3, 4, 4, 4])
        // states @32
        .extend([0u16, 0, 0, 0, 1])
        .extend([0u16, 0, 0, 0, 1])
        // entries @52: new state, flags, mark index, current index
        .extend([0u16, 0, 0xFFFF, 0xFFFF])
        .extend([0u16, 0, 0xFFFF, 0])
        // substitution table @68
        .push(4u32)
        .extend([8u16, 2, 5, 7, 8, 9, 10, 11])
        .into_vec()
}

/// Glyph 3 followed by glyph 4 forms a ligature.
pub fn ligature() -> Vec<u8> {
    BeBuffer::new()
        .extend([6u32, 28, 40, 76])
        .extend([96u32, 104, 112])
        // class table @28
        .extend([8u16, 3, 2, 4, 5])
        .push(0u16)
        // states @40
        .extend([0u16, 0, 0, 0, 1, 0])
        .extend([0u16, 0, 0, 0, 1, 2])
        .extend([0u16, 0, 0, 0, 0, 0])
        // entries @76: new state, flags, ligature action index
        .extend([0u16, 0, 0])
        .extend([1u16, 0x8000, 0])
        .extend([0u16, 0xA000, 0])
        .push(0u16)
        // ligature actions @96
        .extend([0x3FFFFFFEu32, 0xBFFFFFFE])
        // components @104
        .extend([0u16, 1, 0, 0])
        // ligatures @112
        .extend([5u16, 6])
        .into_vec()
}

/// Glyph 2 becomes 5 and glyph 4 becomes 7.
pub fn noncontextual() -> Vec<u8> {
    BeBuffer::new()
        .extend([6u16, 4, 2, 8, 1, 0])
        .extend([2u16, 5, 4, 7])
        .into_vec()
}

/// Glyphs 3 and 2 are inserted after glyph 3.
pub fn insertion() -> Vec<u8> {
    BeBuffer::new()
        .extend([5u32, 20, 28, 48, 64])
        // class table @20
        .extend([8u16, 3, 1, 4])
        // states @28
        .extend([0u16, 0, 0, 0, 1])
        .extend([0u16, 0, 0, 0, 1])
        // entries @48: new state, flags, current insert index, marked insert index
        .extend([0u16, 0, 0xFFFF, 0xFFFF])
        .extend([0u16, 0x0040, 0, 0xFFFF])
        // insertion glyphs @64
        .extend([3u16, 2])
        .into_vec()
}
