//! Offsets to tables

/// Offsets that may be null.
pub trait Offset: Sized + Copy {
    /// Returns this offset as a `usize`, or `None` if it is `0`.
    fn non_null(self) -> Option<usize>;
}

macro_rules! impl_offset {
    ($name:ident, $bits:literal, $rawty:ty) => {
        #[doc = concat!("A ", stringify!($bits), "-bit offset to a table.")]
        ///
        /// A zero offset is treated as null.
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
        #[repr(transparent)]
        pub struct $name($rawty);

        impl $name {
            /// Create a new offset.
            #[inline]
            pub const fn new(raw: $rawty) -> Self {
                Self(raw)
            }

            /// A null offset.
            #[inline]
            pub const fn null() -> Self {
                Self(0)
            }

            /// Return `true` if this offset is null.
            #[inline]
            pub const fn is_null(self) -> bool {
                self.0 == 0
            }

            /// Returns the raw value as a `u32`.
            #[inline]
            pub const fn to_u32(self) -> u32 {
                self.0 as u32
            }

            /// Returns the raw value as a `usize`.
            #[inline]
            pub const fn to_usize(self) -> usize {
                self.0 as usize
            }
        }

        crate::newtype_scalar!($name, [u8; $bits / 8]);

        impl Offset for $name {
            #[inline]
            fn non_null(self) -> Option<usize> {
                match self.0 {
                    0 => None,
                    other => Some(other as usize),
                }
            }
        }
    };
}

impl_offset!(Offset16, 16, u16);
impl_offset!(Offset32, 32, u32);
