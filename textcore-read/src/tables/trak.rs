//! The [tracking (trak)](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6trak.html) table.

use types::{BigEndian, Fixed, FixedSize, MajorMinor, NameId, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'trak'
pub const TAG: Tag = Tag::new(b"trak");

/// The tracking table, with optional horizontal and vertical data.
#[derive(Clone, Copy)]
pub struct Trak<'a> {
    data: FontData<'a>,
    version: MajorMinor,
    horiz_offset: u16,
    vert_offset: u16,
}

impl TopLevelTable for Trak<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Trak<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version = data.read_at::<MajorMinor>(0)?;
        let format = data.read_at::<u16>(4)?;
        if format != 0 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        Ok(Trak {
            data,
            version,
            horiz_offset: data.read_at(6)?,
            vert_offset: data.read_at(8)?,
        })
    }
}

impl<'a> Trak<'a> {
    pub fn version(&self) -> MajorMinor {
        self.version
    }

    /// The data offsets of the tracks and sizes are relative to.
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    /// Tracking data for horizontal text.
    pub fn horiz(&self) -> Option<Result<TrackData<'a>, ReadError>> {
        self.track_data(self.horiz_offset)
    }

    /// Tracking data for vertical text.
    pub fn vert(&self) -> Option<Result<TrackData<'a>, ReadError>> {
        self.track_data(self.vert_offset)
    }

    fn track_data(&self, offset: u16) -> Option<Result<TrackData<'a>, ReadError>> {
        (offset != 0).then(|| self.data.read_table_at(offset as usize))
    }
}

/// The tracks available for one direction, and the sizes they are
/// defined at.
#[derive(Clone, Copy)]
pub struct TrackData<'a> {
    n_sizes: u16,
    size_table_offset: u32,
    track_table: &'a [TrackTableEntry],
}

impl<'a> FontRead<'a> for TrackData<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let n_tracks = data.read_at::<u16>(0)?;
        let n_sizes = data.read_at::<u16>(2)?;
        let size_table_offset = data.read_at::<u32>(4)?;
        let track_table = data.read_array_len(8, n_tracks as usize)?;
        Ok(TrackData {
            n_sizes,
            size_table_offset,
            track_table,
        })
    }
}

impl<'a> TrackData<'a> {
    pub fn n_sizes(&self) -> u16 {
        self.n_sizes
    }

    /// The tracks, sorted by track value.
    pub fn track_table(&self) -> &'a [TrackTableEntry] {
        self.track_table
    }

    /// Returns the size table for this set of tracking data.
    ///
    /// The `offset_data` parameter comes from the [`Trak`] table.
    pub fn size_table(
        &self,
        offset_data: FontData<'a>,
    ) -> Result<&'a [BigEndian<Fixed>], ReadError> {
        offset_data.read_array_len(self.size_table_offset as usize, self.n_sizes as usize)
    }

    /// Returns the entry for the given track value; 0 is the normal track.
    pub fn track(&self, track: Fixed) -> Option<&'a TrackTableEntry> {
        self.track_table
            .iter()
            .find(|entry| entry.track() == track)
    }

    /// Returns the tracking for the track at the given point size,
    /// interpolating linearly between the two nearest sizes of the size
    /// table, and extrapolating outside of it.
    pub fn tracking(
        &self,
        offset_data: FontData<'a>,
        track: Fixed,
        point_size: f32,
    ) -> Result<f32, ReadError> {
        let Some(entry) = self.track(track) else {
            return Ok(0.0);
        };
        let sizes = self.size_table(offset_data)?;
        let values = entry.per_size_values(offset_data, self.n_sizes)?;
        let value = |ix: usize| values[ix].get() as f32;
        match sizes.len() {
            0 => return Ok(0.0),
            1 => return Ok(value(0)),
            _ => {}
        }
        // index of the first size at least as large as the requested one,
        // clamped so that it has a predecessor
        let upper = sizes
            .iter()
            .position(|size| size.get().to_f64() as f32 >= point_size)
            .unwrap_or(sizes.len() - 1)
            .max(1);
        let lower = upper - 1;
        let s0 = sizes[lower].get().to_f64() as f32;
        let s1 = sizes[upper].get().to_f64() as f32;
        if s0 == s1 {
            return Ok(value(lower));
        }
        let t = (point_size - s0) / (s1 - s0);
        Ok(t * value(upper) + (1.0 - t) * value(lower))
    }
}

/// A track: its value, name and per size tracking values.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct TrackTableEntry {
    pub track: BigEndian<Fixed>,
    pub name_index: BigEndian<NameId>,
    pub offset: BigEndian<u16>,
}

impl FixedSize for TrackTableEntry {
    const RAW_BYTE_LEN: usize = 8;
}

impl TrackTableEntry {
    pub fn track(&self) -> Fixed {
        self.track.get()
    }

    pub fn name_index(&self) -> NameId {
        self.name_index.get()
    }

    /// Offset from the start of the `trak` table to the values.
    pub fn offset(&self) -> u16 {
        self.offset.get()
    }

    /// Returns the list of per-size tracking values for this entry.
    ///
    /// The `offset_data` parameter comes from the [`Trak`] table and `n_sizes`
    /// parameter comes from the parent [`TrackData`] table.
    pub fn per_size_values<'a>(
        &self,
        offset_data: FontData<'a>,
        n_sizes: u16,
    ) -> Result<&'a [BigEndian<i16>], ReadError> {
        offset_data.read_array_len(self.offset() as usize, n_sizes as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    #[test]
    fn parse_header() {
        let table_data = example_track_table();
        let trak = Trak::read(FontData::new(&table_data)).unwrap();
        assert_eq!(trak.version(), MajorMinor::VERSION_1_0);
        let _ = trak.horiz().unwrap().unwrap();
        assert!(trak.vert().is_none());
    }

    #[test]
    fn parse_tracks() {
        let table_data = example_track_table();
        let trak = Trak::read(FontData::new(&table_data)).unwrap();
        let horiz = trak.horiz().unwrap().unwrap();
        let track_table = horiz.track_table();
        let expected_tracks = [
            (Fixed::from_i32(-1), NameId::new(256), 52),
            (Fixed::from_i32(0), NameId::new(258), 60),
            (Fixed::from_i32(1), NameId::new(257), 56),
        ];
        let tracks = track_table
            .iter()
            .map(|track| (track.track(), track.name_index(), track.offset()))
            .collect::<Vec<_>>();
        assert_eq!(tracks, expected_tracks);
        let expected_values = [[-15i16, -7], [0, 0], [50, 20]];
        for (track, expected) in track_table.iter().zip(expected_values) {
            let values = track
                .per_size_values(trak.offset_data(), horiz.n_sizes())
                .unwrap()
                .iter()
                .map(|v| v.get())
                .collect::<Vec<_>>();
            assert_eq!(values, expected);
        }
    }

    #[test]
    fn parse_sizes() {
        let table_data = example_track_table();
        let trak = Trak::read(FontData::new(&table_data)).unwrap();
        let horiz = trak.horiz().unwrap().unwrap();
        let size_table = horiz
            .size_table(trak.offset_data())
            .unwrap()
            .iter()
            .map(|v| v.get())
            .collect::<Vec<_>>();
        assert_eq!(size_table, [Fixed::from_i32(12), Fixed::from_i32(24)]);
    }

    #[test]
    fn interpolated_tracking() {
        let table_data = example_track_table();
        let trak = Trak::read(FontData::new(&table_data)).unwrap();
        let horiz = trak.horiz().unwrap().unwrap();
        let tracking = |track: i32, size: f32| {
            horiz
                .tracking(trak.offset_data(), Fixed::from_i32(track), size)
                .unwrap()
        };
        assert_eq!(tracking(-1, 12.0), -15.0);
        assert_eq!(tracking(-1, 24.0), -7.0);
        assert_eq!(tracking(-1, 18.0), -11.0);
        assert_eq!(tracking(1, 18.0), 35.0);
        // extrapolated past the last size
        assert_eq!(tracking(1, 36.0), -10.0);
        assert_eq!(tracking(0, 18.0), 0.0);
        // unknown tracks do nothing
        assert_eq!(tracking(2, 18.0), 0.0);
    }

    #[test]
    fn bad_offset() {
        let mut table_data = example_track_table();
        // modify offset of first track table entry to be OOB
        table_data[26] = 255;
        let trak = Trak::read(FontData::new(&table_data)).unwrap();
        let horiz = trak.horiz().unwrap().unwrap();
        let track_table = horiz.track_table();
        assert!(matches!(
            track_table[0].per_size_values(trak.offset_data(), horiz.n_sizes()),
            Err(ReadError::OutOfBounds)
        ));
    }

    /// From <https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6trak.html>
    fn example_track_table() -> Vec<u8> {
        BeBuffer::new()
            .push(MajorMinor::VERSION_1_0)
            .extend([0u16, 12, 0, 0])
            // TrackData
            .extend([3u16, 2])
            .push(44u32)
            // Three sorted TrackTableEntry records
            .push(0xFFFF0000u32)
            .extend([256u16, 52])
            .push(0x00000000u32)
            .extend([258u16, 60])
            .push(0x00010000u32)
            .extend([257u16, 56])
            // Size subtable
            .push(0x000C0000u32)
            .push(0x00180000u32)
            // Per-size tracking data values
            .extend([-15i16, -7, 50, 20, 0, 0])
            .into_vec()
    }
}
