//! Fixed point numerical types.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

// shared between Fixed, F26Dot6 and F2Dot14
macro_rules! fixed_impl {
    ($name:ident, $bits:literal, $fract_bits:literal, $ty:ty, $wide:ty) => {
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
        #[repr(transparent)]
        #[doc = concat!(stringify!($bits), "-bit signed fixed point number with ", stringify!($fract_bits), " bits of fraction." )]
        pub struct $name($ty);

        impl $name {
            /// Minimum value.
            pub const MIN: Self = Self(<$ty>::MIN);

            /// Maximum value.
            pub const MAX: Self = Self(<$ty>::MAX);

            /// This type's smallest representable value
            pub const EPSILON: Self = Self(1);

            /// Representation of 0.0.
            pub const ZERO: Self = Self(0);

            /// Representation of 1.0.
            pub const ONE: Self = Self(1 << $fract_bits);

            const INT_MASK: $ty = !0 << $fract_bits;
            const ROUND: $ty = 1 << ($fract_bits - 1);
            const FRACT_BITS: usize = $fract_bits;

            /// Creates a new fixed point value from the underlying bit representation.
            #[inline(always)]
            pub const fn from_bits(bits: $ty) -> Self {
                Self(bits)
            }

            /// Returns the underlying bit representation of the value.
            #[inline(always)]
            pub const fn to_bits(self) -> $ty {
                self.0
            }

            /// Returns the nearest integer value, rounding half up.
            #[inline(always)]
            pub const fn round(self) -> Self {
                Self(self.0.wrapping_add(Self::ROUND) & Self::INT_MASK)
            }

            /// Returns the absolute value of the number.
            #[inline(always)]
            pub const fn abs(self) -> Self {
                Self(self.0.abs())
            }

            /// Returns the largest integer less than or equal to the number.
            #[inline(always)]
            pub const fn floor(self) -> Self {
                Self(self.0 & Self::INT_MASK)
            }

            /// Returns the smallest integer greater than or equal to the number.
            #[inline(always)]
            pub const fn ceil(self) -> Self {
                Self(self.0.wrapping_add(!Self::INT_MASK) & Self::INT_MASK)
            }

            /// Returns the fractional part of the number.
            #[inline(always)]
            pub const fn fract(self) -> Self {
                Self(self.0 - self.floor().0)
            }

            /// Saturating addition.
            #[inline(always)]
            pub const fn saturating_add(self, other: Self) -> Self {
                Self(self.0.saturating_add(other.0))
            }

            /// Saturating subtraction.
            #[inline(always)]
            pub const fn saturating_sub(self, other: Self) -> Self {
                Self(self.0.saturating_sub(other.0))
            }

            /// Wrapping addition.
            #[inline(always)]
            pub const fn wrapping_add(self, other: Self) -> Self {
                Self(self.0.wrapping_add(other.0))
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline(always)]
            fn add(self, other: Self) -> Self {
                Self(self.0.wrapping_add(other.0))
            }
        }

        impl AddAssign for $name {
            #[inline(always)]
            fn add_assign(&mut self, other: Self) {
                *self = *self + other;
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline(always)]
            fn sub(self, other: Self) -> Self {
                Self(self.0.wrapping_sub(other.0))
            }
        }

        impl SubAssign for $name {
            #[inline(always)]
            fn sub_assign(&mut self, other: Self) {
                *self = *self - other;
            }
        }

        impl Neg for $name {
            type Output = Self;
            #[inline(always)]
            fn neg(self) -> Self {
                Self(self.0.wrapping_neg())
            }
        }

        impl Mul for $name {
            type Output = Self;
            /// Rounding multiplication; ties are rounded away from zero.
            #[inline(always)]
            fn mul(self, other: Self) -> Self {
                let ab = self.0 as $wide * other.0 as $wide;
                let rounded = ab + ((1 as $wide) << ($fract_bits - 1)) - (ab < 0) as $wide;
                Self((rounded >> $fract_bits) as $ty)
            }
        }

        impl Div for $name {
            type Output = Self;
            /// Rounding division; division by zero saturates.
            #[inline(always)]
            fn div(self, other: Self) -> Self {
                if other.0 == 0 {
                    return if self.0 < 0 { Self::MIN } else { Self::MAX };
                }
                let negative = (self.0 < 0) != (other.0 < 0);
                let a = (self.0 as $wide).abs();
                let b = (other.0 as $wide).abs();
                let q = ((a << $fract_bits) + (b >> 1)) / b;
                let q = q.min(<$ty>::MAX as $wide) as $ty;
                Self(if negative { -q } else { q })
            }
        }
    };
}

/// Float conversion methods.
///
/// We convert to different float types in order to ensure we can roundtrip
/// without floating point error.
macro_rules! float_conv {
    ($name:ident, $to:ident, $from:ident, $ty:ty) => {
        impl $name {
            #[doc = concat!("Creates a fixed point value from a ", stringify!($ty), ".")]
            ///
            /// This operation is lossy; the float will be rounded to the nearest
            /// representable value.
            #[inline(always)]
            pub fn $from(x: $ty) -> Self {
                let scaled = x * Self::ONE.0 as $ty;
                #[cfg(any(feature = "std", test))]
                return Self(scaled.round() as _);
                // round away from zero without libm
                #[cfg(all(not(feature = "std"), not(test)))]
                Self((scaled + 0.5 * (1.0 - 2.0 * x.is_sign_negative() as u8 as $ty)) as _)
            }

            #[doc = concat!("Returns the value as an ", stringify!($ty), ".")]
            ///
            /// This operation is lossless: all representable values can be
            /// round-tripped.
            #[inline(always)]
            pub fn $to(self) -> $ty {
                let int = ((self.0 & Self::INT_MASK) >> Self::FRACT_BITS) as $ty;
                let fract = (self.0 & !Self::INT_MASK) as $ty / Self::ONE.0 as $ty;
                int + fract
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                self.$to().fmt(f)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                self.$to().fmt(f)
            }
        }
    };
}

fixed_impl!(F2Dot14, 16, 14, i16, i32);
fixed_impl!(Fixed, 32, 16, i32, i64);
fixed_impl!(F26Dot6, 32, 6, i32, i64);
float_conv!(F2Dot14, to_f32, from_f32, f32);
float_conv!(Fixed, to_f64, from_f64, f64);
float_conv!(F26Dot6, to_f64, from_f64, f64);
crate::newtype_scalar!(F2Dot14, [u8; 2]);
crate::newtype_scalar!(Fixed, [u8; 4]);

impl Fixed {
    /// Creates a 16.16 value from an integer.
    #[inline(always)]
    pub const fn from_i32(i: i32) -> Self {
        Self(i << 16)
    }

    /// Returns the value rounded to the nearest integer.
    #[inline(always)]
    pub const fn to_i32(self) -> i32 {
        self.0.wrapping_add(0x8000) >> 16
    }

    /// Returns the value as an `f32`.
    #[inline(always)]
    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }

    /// Converts a 16.16 value to 2.14, rounding to the nearest value.
    #[inline(always)]
    pub const fn to_f2dot14(self) -> F2Dot14 {
        F2Dot14((self.0.wrapping_add(2) >> 2) as i16)
    }

    /// Converts a 16.16 value to 26.6, rounding to the nearest value.
    #[inline(always)]
    pub const fn to_f26dot6(self) -> F26Dot6 {
        F26Dot6(self.0.wrapping_add(0x200) >> 10)
    }

    /// Computes `self * a / b` with a 64-bit intermediate, rounding to the
    /// nearest value. Division by zero saturates.
    pub fn mul_div(self, a: Self, b: Self) -> Self {
        let negative = ((self.0 < 0) != (a.0 < 0)) != (b.0 < 0);
        if b.0 == 0 {
            return if negative { Self::MIN } else { Self::MAX };
        }
        let num = (self.0 as i64 * a.0 as i64).abs();
        let den = (b.0 as i64).abs();
        let q = ((num + den / 2) / den).min(i32::MAX as i64) as i32;
        Self(if negative { -q } else { q })
    }
}

impl F2Dot14 {
    /// Converts a 2.14 value to 16.16 without loss.
    #[inline(always)]
    pub const fn to_fixed(self) -> Fixed {
        Fixed(self.0 as i32 * 4)
    }
}

impl F26Dot6 {
    /// Creates a 26.6 value from an integer.
    #[inline(always)]
    pub const fn from_i32(i: i32) -> Self {
        Self(i << 6)
    }

    /// Returns the value rounded to the nearest integer.
    #[inline(always)]
    pub const fn to_i32(self) -> i32 {
        self.0.wrapping_add(32) >> 6
    }

    /// Returns the value as an `f32`.
    #[inline(always)]
    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }

    /// Converts a 26.6 value to 16.16 without loss.
    #[inline(always)]
    pub const fn to_fixed(self) -> Fixed {
        Fixed(self.0.wrapping_shl(10))
    }
}

#[cfg(test)]
mod tests {
    #![allow(overflowing_literals)]
    use super::*;

    #[test]
    fn fixed_scaled_mul_div() {
        let a = Fixed::from_f64(0.5);
        assert_eq!(
            a.mul_div(Fixed::from_i32(3), Fixed::from_i32(4)),
            Fixed::from_f64(0.375)
        );
        assert_eq!(
            (-a).mul_div(Fixed::from_i32(1), Fixed::from_i32(2)),
            Fixed::from_f64(-0.25)
        );
        assert_eq!(a.mul_div(a, Fixed::ZERO), Fixed::MAX);
    }

    #[test]
    fn mul_div_signs() {
        let a = Fixed::from_f64(0.5);
        let three = Fixed::from_i32(3);
        let four = Fixed::from_i32(4);
        assert_eq!(a.mul_div(-three, four), Fixed::from_f64(-0.375));
        assert_eq!(a.mul_div(three, -four), Fixed::from_f64(-0.375));
        assert_eq!((-a).mul_div(-three, four), Fixed::from_f64(0.375));
        assert_eq!((-a).mul_div(-three, -four), Fixed::from_f64(-0.375));
        assert_eq!((-a).mul_div(a, Fixed::ZERO), Fixed::MIN);
        assert_eq!((-a).mul_div(-a, Fixed::ZERO), Fixed::MAX);
    }

    #[test]
    fn f2dot14_floats() {
        // Examples from https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types
        assert_eq!(F2Dot14(0x7fff), F2Dot14::from_f32(1.999939));
        assert_eq!(F2Dot14(0x7000), F2Dot14::from_f32(1.75));
        assert_eq!(F2Dot14(0x0001), F2Dot14::from_f32(0.0000610356));
        assert_eq!(F2Dot14(0x0000), F2Dot14::from_f32(0.0));
        assert_eq!(F2Dot14(0xffff), F2Dot14::from_f32(-0.000061));
        assert_eq!(F2Dot14(0x8000), F2Dot14::from_f32(-2.0));
    }

    #[test]
    fn roundtrip_f2dot14() {
        for i in i16::MIN..=i16::MAX {
            let val = F2Dot14(i);
            assert_eq!(val, F2Dot14::from_f32(val.to_f32()));
        }
    }

    #[test]
    fn fixed_rounding() {
        assert_eq!(Fixed(0x0001_7FFF).round(), Fixed(0x0001_0000));
        assert_eq!(Fixed(0x0001_8000).round(), Fixed(0x0002_0000));
        assert_eq!(Fixed(0x0001_0001).ceil(), Fixed(0x0002_0000));
        assert_eq!(Fixed::from_f64(-1.5).floor(), Fixed::from_i32(-2));
    }

    #[test]
    fn fixed_mul_div() {
        let half = Fixed::from_f64(0.5);
        assert_eq!(Fixed::from_i32(3) * half, Fixed::from_f64(1.5));
        assert_eq!(Fixed::from_i32(3) / Fixed::from_i32(2), Fixed::from_f64(1.5));
        assert_eq!(Fixed::from_i32(-3) / Fixed::from_i32(2), Fixed::from_f64(-1.5));
        assert_eq!(Fixed::ONE / Fixed::ZERO, Fixed::MAX);
    }

    #[test]
    fn conversions() {
        assert_eq!(F2Dot14::from_f32(-0.5).to_fixed(), Fixed::from_f64(-0.5));
        assert_eq!(Fixed::from_f64(0.25).to_f2dot14(), F2Dot14::from_f32(0.25));
        assert_eq!(F26Dot6::from_i32(12).to_bits(), 768);
        assert_eq!(F26Dot6::from_bits(96).to_i32(), 2);
        assert_eq!(F26Dot6::from_i32(7).to_fixed(), Fixed::from_i32(7));
        assert_eq!(Fixed::from_i32(7).to_f26dot6(), F26Dot6::from_i32(7));
    }
}
