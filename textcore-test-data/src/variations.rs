//! Variation tables with a single region peaking at the maximum of the
//! first axis.

use textcore_types::{F2Dot14, Fixed, Tag};

use crate::bebuffer::BeBuffer;

/// An axis of an `fvar` table: tag, minimum, default and maximum.
pub type AxisSpec = (Tag, f64, f64, f64);

/// An instance of an `fvar` table: subfamily name id, user coordinates
/// and PostScript name id.
pub type InstanceSpec<'a> = (u16, &'a [f64], u16);

/// An `fvar` table; every instance carries a PostScript name id.
pub fn fvar(axes: &[AxisSpec], instances: &[InstanceSpec]) -> Vec<u8> {
    let axis_count = axes.len() as u16;
    let mut buf = BeBuffer::new()
        .extend([1u16, 0]) // version
        .extend([16u16, 2, axis_count, 20])
        .push(instances.len() as u16)
        .push(6 + 4 * axis_count); // instanceSize
    for (tag, min, default, max) in axes {
        buf = buf
            .push(*tag)
            .extend([*min, *default, *max].map(Fixed::from_f64))
            .push(0u16) // flags
            .push(256u16); // axisNameID
    }
    for (subfamily, coords, post_script_name) in instances {
        buf = buf
            .push(*subfamily)
            .push(0u16)
            .extend(coords.iter().map(|coord| Fixed::from_f64(*coord)))
            .push(*post_script_name);
    }
    buf.into_vec()
}

// An item variation store with one region and one set of byte deltas.
fn item_variation_store(buf: BeBuffer, deltas: impl IntoIterator<Item = i8>) -> BeBuffer {
    let deltas = deltas.into_iter().collect::<Vec<_>>();
    buf.push(1u16) // format
        .push(12u32) // region list offset
        .push(1u16)
        .push(22u32) // item variation data offset
        // region list @12
        .extend([1u16, 1])
        .extend([F2Dot14::ZERO, F2Dot14::ONE, F2Dot14::ONE])
        // item variation data @22
        .extend([deltas.len() as u16, 0, 1])
        .push(0u16)
        .extend(deltas)
}

/// An `HVAR` table with an implicit advance mapping: glyph `n` gets
/// `advance_deltas[n]` at the peak.
pub fn hvar(advance_deltas: &[i8]) -> Vec<u8> {
    let buf = BeBuffer::new()
        .push(0x00010000u32)
        .push(20u32) // item variation store
        .extend([0u32, 0, 0]); // advance, lsb and rsb mappings
    item_variation_store(buf, advance_deltas.iter().copied()).into_vec()
}

/// An `MVAR` table from `(tag, delta)` pairs, which must be sorted by tag.
pub fn mvar(deltas: &[(Tag, i8)]) -> Vec<u8> {
    let count = deltas.len() as u16;
    let mut buf = BeBuffer::new()
        .push(0x00010000u32)
        .push(0u16) // reserved
        .push(8u16) // valueRecordSize
        .push(count)
        .push(12 + 8 * count); // item variation store
    for (ix, (tag, _)) in deltas.iter().enumerate() {
        buf = buf.push(*tag).extend([0u16, ix as u16]);
    }
    item_variation_store(buf, deltas.iter().map(|(_, delta)| *delta)).into_vec()
}
