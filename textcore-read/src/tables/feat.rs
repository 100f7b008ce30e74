//! The [feature name](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6feat.html) table.

use types::{BigEndian, FixedSize, NameId, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// 'feat'
pub const TAG: Tag = Tag::new(b"feat");

/// The feature name table: the AAT features of the font, with their
/// settings and names.
#[derive(Clone, Copy)]
pub struct Feat<'a> {
    data: FontData<'a>,
    names: &'a [FeatureName],
}

impl TopLevelTable for Feat<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Feat<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count = data.read_at::<u16>(4)?;
        let names: &[FeatureName] = data.read_array_len(12, count as usize)?;
        let this = Feat { data, names };
        for name in names {
            this.settings(name)?;
        }
        Ok(this)
    }
}

impl<'a> Feat<'a> {
    /// The feature names, sorted by feature type.
    pub fn names(&self) -> &'a [FeatureName] {
        self.names
    }

    /// Returns the name for the given feature code.
    pub fn find(&self, feature: u16) -> Option<FeatureName> {
        let ix = self
            .names
            .binary_search_by(|name| name.feature().cmp(&feature))
            .ok()?;
        self.names.get(ix).copied()
    }

    /// Returns the settings of the feature.
    pub fn settings(&self, name: &FeatureName) -> Result<&'a [SettingName], ReadError> {
        self.data
            .read_array_len(name.setting_table_offset() as usize, name.n_settings() as usize)
    }
}

/// A feature type with its setting table.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct FeatureName {
    pub feature: BigEndian<u16>,
    pub n_settings: BigEndian<u16>,
    pub setting_table_offset: BigEndian<u32>,
    pub feature_flags: BigEndian<u16>,
    pub name_index: BigEndian<NameId>,
}

impl FixedSize for FeatureName {
    const RAW_BYTE_LEN: usize = 12;
}

impl FeatureName {
    pub fn feature(&self) -> u16 {
        self.feature.get()
    }

    pub fn n_settings(&self) -> u16 {
        self.n_settings.get()
    }

    /// Offset from the start of the table to the settings.
    pub fn setting_table_offset(&self) -> u32 {
        self.setting_table_offset.get()
    }

    pub fn feature_flags(&self) -> u16 {
        self.feature_flags.get()
    }

    pub fn name_index(&self) -> NameId {
        self.name_index.get()
    }

    /// Returns true if the feature settings are mutually exclusive.
    pub fn is_exclusive(&self) -> bool {
        self.feature_flags() & 0x8000 != 0
    }

    /// Returns the index of the default setting for the feature.
    pub fn default_setting_index(&self) -> u16 {
        // If bit 14 is set, the default setting index is in the low byte
        if self.feature_flags() & 0x4000 != 0 {
            self.feature_flags() & 0xFF
        } else {
            0
        }
    }
}

/// A feature setting and its name.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct SettingName {
    pub setting: BigEndian<u16>,
    pub name_index: BigEndian<NameId>,
}

impl FixedSize for SettingName {
    const RAW_BYTE_LEN: usize = 4;
}

impl SettingName {
    pub fn setting(&self) -> u16 {
        self.setting.get()
    }

    pub fn name_index(&self) -> NameId {
        self.name_index.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcore_test_data::bebuffer::BeBuffer;

    #[test]
    fn feat_example() {
        let buf = build_feat_example();
        let feat = Feat::read(buf.data().into()).unwrap();
        let names = feat.names();
        #[rustfmt::skip]
        let expected_name_fields = [
            // (feature, n_settings, flags, name, exclusive, default_index)
            (0, 1, 0, NameId::new(260), false, 0),
            (1, 1, 0, NameId::new(256), false, 0),
            (3, 3, 0x8000, NameId::new(262), true, 0),
            (6, 2, 0xC001, NameId::new(258), true, 1),
        ];
        let name_fields = names
            .iter()
            .map(|name| {
                (
                    name.feature(),
                    name.n_settings(),
                    name.feature_flags(),
                    name.name_index(),
                    name.is_exclusive(),
                    name.default_setting_index(),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(name_fields, expected_name_fields);
        #[rustfmt::skip]
        let expected_setting_names: [&[(u16, NameId)]; 4] = [
            &[(0, NameId::new(261))],
            &[(2, NameId::new(257))],
            &[(0, NameId::new(268)), (3, NameId::new(264)), (4, NameId::new(265))],
            &[(0, NameId::new(259)), (1, NameId::new(260))],
        ];
        let setting_names = names
            .iter()
            .map(|name| {
                feat.settings(name)
                    .unwrap()
                    .iter()
                    .map(|setting| (setting.setting(), setting.name_index()))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        assert!(expected_setting_names.iter().eq(setting_names.iter()));
    }

    #[test]
    fn feat_find() {
        let buf = build_feat_example();
        let feat = Feat::read(buf.data().into()).unwrap();
        let valid_features = [0, 1, 3, 6];
        for i in 0..10 {
            let name = feat.find(i);
            if valid_features.contains(&i) {
                assert_eq!(name.unwrap().feature(), i);
            } else {
                assert!(name.is_none());
            }
        }
    }

    #[test]
    fn truncated_settings() {
        let mut bytes = build_feat_example().into_vec();
        bytes.truncate(bytes.len() - 2);
        assert!(Feat::read(FontData::new(&bytes)).is_err());
    }

    // Example taken from bottom of <https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6feat.html>
    fn build_feat_example() -> BeBuffer {
        BeBuffer::new()
            .push(0x00010000u32)
            .extend([4u16, 0, 0, 0])
            // feature name array
            .extend([0u16, 1])
            .push(60u32)
            .extend([0u16, 260])
            .extend([1u16, 1])
            .push(64u32)
            .extend([0u16, 256])
            .extend([3u16, 3])
            .push(68u32)
            .extend([0x8000u16, 262])
            .extend([6u16, 2])
            .push(80u32)
            .extend([0xC001u16, 258])
            // setting name array
            .extend([0u16, 261, 2, 257, 0, 268, 3, 264, 4, 265, 0, 259, 1, 260])
    }
}
