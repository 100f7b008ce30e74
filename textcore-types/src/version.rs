/// Packed 32-bit value with major and minor version numbers.
///
/// Used by `post`, `maxp`, `vhea` and the AAT tables. The minor version is
/// stored in the high nibble of the low word, so version 2.5 is
/// `0x00025000`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
#[repr(transparent)]
pub struct Version16Dot16(u32);

/// A major, minor version pair, as stored in most OpenType headers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MajorMinor {
    /// The major version number
    pub major: u16,
    /// The minor version number
    pub minor: u16,
}

impl Version16Dot16 {
    /// Version 0.5
    pub const VERSION_0_5: Version16Dot16 = Version16Dot16(0x00005000);
    /// Version 1.0
    pub const VERSION_1_0: Version16Dot16 = Version16Dot16(0x00010000);
    /// Version 2.0
    pub const VERSION_2_0: Version16Dot16 = Version16Dot16(0x00020000);
    /// Version 2.5
    pub const VERSION_2_5: Version16Dot16 = Version16Dot16(0x00025000);
    /// Version 3.0
    pub const VERSION_3_0: Version16Dot16 = Version16Dot16(0x00030000);

    /// Create a version from its packed representation.
    pub const fn from_bits(bits: u32) -> Self {
        Version16Dot16(bits)
    }

    /// Return the separate major and minor version numbers.
    pub const fn to_major_minor(self) -> (u16, u16) {
        let major = (self.0 >> 16) as u16;
        let minor = ((self.0 & 0xFFFF) >> 12) as u16;
        (major, minor)
    }
}

impl MajorMinor {
    /// Version 1.0
    pub const VERSION_1_0: MajorMinor = MajorMinor::new(1, 0);
    /// Version 1.1
    pub const VERSION_1_1: MajorMinor = MajorMinor::new(1, 1);

    /// Create a new version with major and minor parts.
    #[inline]
    pub const fn new(major: u16, minor: u16) -> Self {
        MajorMinor { major, minor }
    }
}

impl crate::raw::Scalar for MajorMinor {
    type Raw = [u8; 4];

    fn from_raw(raw: Self::Raw) -> Self {
        let major = u16::from_be_bytes([raw[0], raw[1]]);
        let minor = u16::from_be_bytes([raw[2], raw[3]]);
        Self { major, minor }
    }

    fn to_raw(self) -> Self::Raw {
        let [a, b] = self.major.to_be_bytes();
        let [c, d] = self.minor.to_be_bytes();
        [a, b, c, d]
    }
}

crate::newtype_scalar!(Version16Dot16, [u8; 4]);

impl std::fmt::Debug for Version16Dot16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Version16Dot16({:#010x})", self.0)
    }
}

impl std::fmt::Display for Version16Dot16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (major, minor) = self.to_major_minor();
        write!(f, "{major}.{minor}")
    }
}

impl std::fmt::Display for MajorMinor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_versions() {
        assert_eq!(Version16Dot16::VERSION_2_5.to_major_minor(), (2, 5));
        assert_eq!(Version16Dot16::from_bits(0x00010000), Version16Dot16::VERSION_1_0);
        assert!(MajorMinor::VERSION_1_1 > MajorMinor::VERSION_1_0);
    }
}
