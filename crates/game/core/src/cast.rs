//! Saturating conversions between primitive arithmetic types.
//!
//! Data files and condition stores hand values around in whatever width was
//! convenient for them (`i64` stores, `f64` tokens, `u32` weights). Plain `as`
//! casts wrap integers on overflow, so every transfer between representations
//! goes through [`arithmetic_cast`] instead, which is total:
//!
//! - **To unsigned**: negatives become 0, values above the maximum become the maximum, NaN becomes 0
//! - **To signed**: values clamp to `[MIN, MAX]`, NaN becomes 0
//! - **To bool**: floats are `false` within `sqrt(2 * EPSILON)` of zero (and for NaN),
//!   integers are `false` only for exactly 0
//! - **To float**: ordinary conversion, overflow becomes infinity
//!
//! The conversion for each (source, destination) pair is a separate
//! [`CastFrom`] impl, so the choice is made at compile time.

use core::fmt;

/// Broad category of a primitive arithmetic type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum NumericKind {
    Bool,
    Unsigned,
    Signed,
    Float,
}

/// Saturating conversion from `From` into `Self`.
///
/// Implemented for every pair of primitive arithmetic types. Prefer
/// [`arithmetic_cast`] or [`Arithmetic::cast`] in generic code.
pub trait CastFrom<From>: Sized {
    fn cast_from(from: From) -> Self;
}

/// A primitive arithmetic type that can be converted to and from every other one.
pub trait Arithmetic:
    Copy
    + PartialOrd
    + Default
    + fmt::Debug
    + fmt::Display
    + 'static
    + CastFrom<i8>
    + CastFrom<i16>
    + CastFrom<i32>
    + CastFrom<i64>
    + CastFrom<i128>
    + CastFrom<isize>
    + CastFrom<u8>
    + CastFrom<u16>
    + CastFrom<u32>
    + CastFrom<u64>
    + CastFrom<u128>
    + CastFrom<usize>
    + CastFrom<f32>
    + CastFrom<f64>
    + CastFrom<bool>
{
    const KIND: NumericKind;
    /// Storage width used to rank types of the same kind.
    const BITS: u32;
    const ZERO: Self;
    const ONE: Self;

    /// Converts `self` into any other arithmetic type.
    fn cast<To: Arithmetic>(self) -> To;

    /// False for zero, and for floats within about half their precision of zero.
    fn not_near_zero(self) -> bool;

    /// Whether `self + 1 > self` holds without overflowing.
    ///
    /// False for integer maxima, infinities, NaN, and floats too large to
    /// register an increment of one.
    fn increment_exceeds(self) -> bool;
}

/// Converts `from` into `To`, saturating instead of wrapping.
#[inline]
pub fn arithmetic_cast<To: Arithmetic, From: Arithmetic>(from: From) -> To {
    from.cast()
}

/// Boolean interpretation shared by conditions and `bool` casts.
///
/// Inf and -Inf are not near zero, but NaN is: it is not a number, so it
/// cannot be near one, and a NaN condition reads as false.
#[inline]
pub fn not_near_zero<T: Arithmetic>(value: T) -> bool {
    value.not_near_zero()
}

/// Returns true if `A` can represent larger positive values than `B`.
///
/// Floats outrank integers and larger floats outrank smaller ones. Among
/// integers, more bits win, and at equal width unsigned beats signed. Every
/// type outranks `bool`, and `bool` outranks nothing.
pub const fn higher_max_value<A: Arithmetic, B: Arithmetic>() -> bool {
    match (A::KIND, B::KIND) {
        (NumericKind::Bool, _) => false,
        (_, NumericKind::Bool) => true,
        (NumericKind::Float, NumericKind::Float) => A::BITS > B::BITS,
        (NumericKind::Float, _) => true,
        (_, NumericKind::Float) => false,
        _ => {
            A::BITS > B::BITS
                || (A::BITS == B::BITS
                    && matches!(A::KIND, NumericKind::Unsigned)
                    && matches!(B::KIND, NumericKind::Signed))
        }
    }
}

// ============================================================================
// CastFrom implementations
// ============================================================================

/// Integer to integer: exact when it fits, otherwise the bound on the side
/// the value overflowed.
macro_rules! integer_from_integers {
    ($to:ty => $($from:ty),+) => {$(
        impl CastFrom<$from> for $to {
            #[inline]
            #[allow(unused_comparisons, unreachable_patterns)]
            fn cast_from(from: $from) -> Self {
                match <$to>::try_from(from) {
                    Ok(value) => value,
                    Err(_) if from < 0 => <$to>::MIN,
                    Err(_) => {
                        debug_assert!(higher_max_value::<$from, $to>());
                        <$to>::MAX
                    }
                }
            }
        }
    )+};
}

/// Plain `as` conversions. Float-to-integer `as` already saturates and maps
/// NaN to 0; integer-to-float and float-to-float round or overflow to infinity.
macro_rules! as_casts {
    ($to:ty => $($from:ty),+) => {$(
        impl CastFrom<$from> for $to {
            #[inline]
            fn cast_from(from: $from) -> Self {
                from as $to
            }
        }
    )+};
}

macro_rules! integer_casts {
    ($($to:ty),+) => {$(
        integer_from_integers!($to => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
        as_casts!($to => f32, f64);

        impl CastFrom<bool> for $to {
            #[inline]
            fn cast_from(from: bool) -> Self {
                <$to>::from(from)
            }
        }
    )+};
}

macro_rules! float_casts {
    ($($to:ty),+) => {$(
        as_casts!($to => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

        impl CastFrom<bool> for $to {
            #[inline]
            fn cast_from(from: bool) -> Self {
                u8::from(from) as $to
            }
        }
    )+};
}

macro_rules! bool_from {
    ($($from:ty),+) => {$(
        impl CastFrom<$from> for bool {
            #[inline]
            fn cast_from(from: $from) -> Self {
                from.not_near_zero()
            }
        }
    )+};
}

integer_casts!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
float_casts!(f32, f64);
bool_from!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl CastFrom<bool> for bool {
    #[inline]
    fn cast_from(from: bool) -> Self {
        from
    }
}

// ============================================================================
// Arithmetic implementations
// ============================================================================

macro_rules! arithmetic_integers {
    ($kind:ident: $($t:ty),+) => {$(
        impl Arithmetic for $t {
            const KIND: NumericKind = NumericKind::$kind;
            const BITS: u32 = <$t>::BITS;
            const ZERO: Self = 0;
            const ONE: Self = 1;

            #[inline]
            fn cast<To: Arithmetic>(self) -> To {
                <To as CastFrom<$t>>::cast_from(self)
            }

            #[inline]
            fn not_near_zero(self) -> bool {
                self != 0
            }

            #[inline]
            fn increment_exceeds(self) -> bool {
                self.checked_add(1).is_some()
            }
        }
    )+};
}

macro_rules! arithmetic_floats {
    ($($t:ty),+) => {$(
        impl Arithmetic for $t {
            const KIND: NumericKind = NumericKind::Float;
            const BITS: u32 = (core::mem::size_of::<$t>() * 8) as u32;
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;

            #[inline]
            fn cast<To: Arithmetic>(self) -> To {
                <To as CastFrom<$t>>::cast_from(self)
            }

            #[inline]
            fn not_near_zero(self) -> bool {
                // About half the precision of the type.
                let epsilon = (<$t>::EPSILON * 2.0).sqrt();
                self > epsilon || self < -epsilon
            }

            #[inline]
            fn increment_exceeds(self) -> bool {
                self + 1.0 > self
            }
        }
    )+};
}

arithmetic_integers!(Signed: i8, i16, i32, i64, i128, isize);
arithmetic_integers!(Unsigned: u8, u16, u32, u64, u128, usize);
arithmetic_floats!(f32, f64);

impl Arithmetic for bool {
    const KIND: NumericKind = NumericKind::Bool;
    const BITS: u32 = 1;
    const ZERO: Self = false;
    const ONE: Self = true;

    #[inline]
    fn cast<To: Arithmetic>(self) -> To {
        <To as CastFrom<bool>>::cast_from(self)
    }

    #[inline]
    fn not_near_zero(self) -> bool {
        self
    }

    #[inline]
    fn increment_exceeds(self) -> bool {
        // bool promotes to an integer before the increment.
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epsilon() -> f64 {
        (f64::EPSILON * 2.0).sqrt()
    }

    #[test]
    fn to_f64_passes_values_through() {
        assert!(arithmetic_cast::<f64, f64>(f64::NAN).is_nan());
        assert_eq!(arithmetic_cast::<f64, f64>(f64::INFINITY), f64::INFINITY);
        assert_eq!(arithmetic_cast::<f64, f64>(f64::NEG_INFINITY), f64::NEG_INFINITY);
        assert_eq!(arithmetic_cast::<f64, f64>(1.31313e19), 1.31313e19);

        // -2^52 + 1 is exactly representable.
        let exact: i64 = -4_503_599_627_370_495;
        assert_eq!(arithmetic_cast::<f64, i64>(exact) as i64, exact);
        assert!(arithmetic_cast::<f64, i64>(i64::MAX) > 2f64.powi(62));
        assert!(arithmetic_cast::<f64, i64>(i64::MIN) < -(2f64.powi(62)));
        assert_eq!(arithmetic_cast::<f64, bool>(true), 1.0);
    }

    #[test]
    fn to_bool_from_integers_is_truthiness() {
        assert!(arithmetic_cast::<bool, bool>(true));
        assert!(!arithmetic_cast::<bool, bool>(false));
        assert!(!arithmetic_cast::<bool, i64>(0));
        assert!(arithmetic_cast::<bool, i64>(1));
        assert!(arithmetic_cast::<bool, i64>(i64::MAX));
        assert!(arithmetic_cast::<bool, i64>(i64::MIN));
        assert!(arithmetic_cast::<bool, u8>(255));
    }

    #[test]
    fn to_bool_from_floats_uses_epsilon() {
        assert!(!arithmetic_cast::<bool, f64>(f64::NAN));
        assert!(arithmetic_cast::<bool, f64>(f64::INFINITY));
        assert!(arithmetic_cast::<bool, f64>(f64::NEG_INFINITY));
        assert!(!arithmetic_cast::<bool, f64>(0.0));
        assert!(arithmetic_cast::<bool, f64>(f64::MIN));
        assert!(arithmetic_cast::<bool, f64>(f64::MAX));
        assert!(!arithmetic_cast::<bool, f64>(f64::MIN_POSITIVE));
        assert!(!arithmetic_cast::<bool, f64>(f64::EPSILON));
        assert!(!arithmetic_cast::<bool, f64>(-f64::EPSILON));
        assert!(arithmetic_cast::<bool, f64>(0.01));
        assert!(arithmetic_cast::<bool, f64>(-0.01));

        assert!(!arithmetic_cast::<bool, f64>(epsilon()));
        assert!(!arithmetic_cast::<bool, f64>(-epsilon()));
        assert!(arithmetic_cast::<bool, f64>(epsilon() * 1.5));
        assert!(arithmetic_cast::<bool, f64>(-epsilon() * 1.5));
    }

    #[test]
    fn to_i32_saturates() {
        assert_eq!(arithmetic_cast::<i32, i32>(i32::MAX), i32::MAX);
        assert_eq!(arithmetic_cast::<i32, i32>(i32::MIN), i32::MIN);

        assert_eq!(arithmetic_cast::<i32, f64>(f64::NAN), 0);
        assert_eq!(arithmetic_cast::<i32, f64>(f64::NEG_INFINITY), i32::MIN);
        assert_eq!(arithmetic_cast::<i32, f64>(f64::INFINITY), i32::MAX);
        assert_eq!(arithmetic_cast::<i32, f64>(-9e20), i32::MIN);
        assert_eq!(arithmetic_cast::<i32, f64>(9e20), i32::MAX);
        assert_eq!(arithmetic_cast::<i32, f64>(f64::from(i32::MAX)), i32::MAX);
        assert_eq!(arithmetic_cast::<i32, f64>(-1.0), -1);
        assert_eq!(arithmetic_cast::<i32, f64>(f64::from(i32::MIN)), i32::MIN);

        assert_eq!(arithmetic_cast::<i32, i64>(-1), -1);
        assert_eq!(arithmetic_cast::<i32, i64>(i64::from(i32::MIN)), i32::MIN);
        assert_eq!(arithmetic_cast::<i32, i64>(i64::from(i32::MAX)), i32::MAX);
        assert_eq!(arithmetic_cast::<i32, i64>(i64::MIN), i32::MIN);
        assert_eq!(arithmetic_cast::<i32, i64>(i64::MAX), i32::MAX);

        assert_eq!(arithmetic_cast::<i32, u32>(i32::MAX as u32), i32::MAX);
        assert_eq!(arithmetic_cast::<i32, u32>(u32::MAX), i32::MAX);
        assert_eq!(arithmetic_cast::<i32, u16>(u16::MAX), i32::from(u16::MAX));
        assert_eq!(arithmetic_cast::<i32, bool>(true), 1);
    }

    #[test]
    fn to_u32_saturates() {
        assert_eq!(arithmetic_cast::<u32, u32>(u32::MAX), u32::MAX);

        assert_eq!(arithmetic_cast::<u32, f64>(f64::NAN), 0);
        assert_eq!(arithmetic_cast::<u32, f64>(f64::NEG_INFINITY), 0);
        assert_eq!(arithmetic_cast::<u32, f64>(f64::INFINITY), u32::MAX);
        assert_eq!(arithmetic_cast::<u32, f64>(-9e20), 0);
        assert_eq!(arithmetic_cast::<u32, f64>(9e20), u32::MAX);
        assert_eq!(arithmetic_cast::<u32, f64>(f64::from(u32::MAX)), u32::MAX);

        assert_eq!(arithmetic_cast::<u32, i64>(-1), 0);
        assert_eq!(arithmetic_cast::<u32, i64>(i64::MIN), 0);
        assert_eq!(arithmetic_cast::<u32, i64>(i64::from(u32::MAX)), u32::MAX);
        assert_eq!(arithmetic_cast::<u32, i64>(i64::MAX), u32::MAX);

        assert_eq!(arithmetic_cast::<u32, i16>(-1), 0);
        assert_eq!(arithmetic_cast::<u32, i16>(i16::MAX), 32_767);
        assert_eq!(arithmetic_cast::<u32, u64>(u64::MAX), u32::MAX);
        assert_eq!(arithmetic_cast::<u32, u8>(200), 200);
    }

    #[test]
    fn wide_and_platform_types_saturate() {
        assert_eq!(arithmetic_cast::<u64, i128>(-5), 0);
        assert_eq!(arithmetic_cast::<i128, u128>(u128::MAX), i128::MAX);
        assert_eq!(arithmetic_cast::<u128, f64>(f64::INFINITY), u128::MAX);
        assert_eq!(arithmetic_cast::<usize, isize>(-1), 0);
        assert_eq!(arithmetic_cast::<i8, usize>(usize::MAX), i8::MAX);
        assert_eq!(arithmetic_cast::<u8, f32>(255.9), 255);
        assert!(arithmetic_cast::<f32, f64>(f64::MAX).is_infinite());
    }

    #[test]
    fn higher_max_value_ranks_types() {
        assert!(higher_max_value::<f64, f32>());
        assert!(!higher_max_value::<f32, f64>());
        assert!(higher_max_value::<f32, u128>());
        assert!(!higher_max_value::<u128, f32>());
        assert!(higher_max_value::<i64, i32>());
        assert!(higher_max_value::<u32, i32>());
        assert!(!higher_max_value::<i32, u32>());
        assert!(!higher_max_value::<i32, i32>());
        assert!(higher_max_value::<u8, bool>());
        assert!(!higher_max_value::<bool, u8>());
        assert!(!higher_max_value::<bool, bool>());
    }

    #[test]
    fn increment_exceeds_rejects_saturated_values() {
        assert!(1u32.increment_exceeds());
        assert!(!u32::MAX.increment_exceeds());
        assert!(!i64::MAX.increment_exceeds());
        assert!(1.0f64.increment_exceeds());
        assert!(!f64::INFINITY.increment_exceeds());
        assert!(!f64::NAN.increment_exceeds());
        assert!(!1e300f64.increment_exceeds());
    }

    #[test]
    fn generic_cast_matches_free_function() {
        fn through<A: Arithmetic, B: Arithmetic>(a: A) -> B {
            a.cast()
        }
        assert_eq!(through::<i64, u8>(-7), 0);
        assert_eq!(through::<f64, i16>(1e9), i16::MAX);
        assert_eq!(NumericKind::Unsigned.to_string(), "unsigned");
        assert_eq!(<u16 as Arithmetic>::KIND, NumericKind::Unsigned);
    }
}
