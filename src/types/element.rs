//! Typed element access over raw little-endian buffer bytes
//!
//! Every buffer stores elements little-endian regardless of host order, so
//! reads go through explicit byte conversions rather than pointer casts.

use super::DType;
use half::f16;
use num_complex::Complex;

/// A scalar type that can live in a primitive-array buffer
pub trait Element: Copy + 'static {
    const DTYPE: DType;
    const SIZE: usize;

    /// Read one element from the start of `bytes`
    fn read_le(bytes: &[u8]) -> Self;
    /// Write one element to the start of `out`
    fn write_le(self, out: &mut [u8]);
    /// Truthiness used by count-nonzero / any / all reducers
    fn is_nonzero(self) -> bool;
}

macro_rules! impl_element {
    ($($t:ty => $dtype:ident),+ $(,)?) => {$(
        impl Element for $t {
            const DTYPE: DType = DType::$dtype;
            const SIZE: usize = std::mem::size_of::<$t>();

            fn read_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$t>()];
                buf.copy_from_slice(&bytes[..std::mem::size_of::<$t>()]);
                <$t>::from_le_bytes(buf)
            }

            fn write_le(self, out: &mut [u8]) {
                out[..std::mem::size_of::<$t>()].copy_from_slice(&self.to_le_bytes());
            }

            fn is_nonzero(self) -> bool {
                self != Default::default()
            }
        }
    )+};
}

impl_element! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl Element for bool {
    const DTYPE: DType = DType::Bool;
    const SIZE: usize = 1;

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    fn write_le(self, out: &mut [u8]) {
        out[0] = self as u8;
    }

    fn is_nonzero(self) -> bool {
        self
    }
}

impl Element for f16 {
    const DTYPE: DType = DType::F16;
    const SIZE: usize = 2;

    fn read_le(bytes: &[u8]) -> Self {
        f16::from_le_bytes([bytes[0], bytes[1]])
    }

    fn write_le(self, out: &mut [u8]) {
        out[..2].copy_from_slice(&self.to_le_bytes());
    }

    fn is_nonzero(self) -> bool {
        self != f16::ZERO
    }
}

impl Element for Complex<f32> {
    const DTYPE: DType = DType::Complex64;
    const SIZE: usize = 8;

    fn read_le(bytes: &[u8]) -> Self {
        Complex::new(f32::read_le(&bytes[..4]), f32::read_le(&bytes[4..8]))
    }

    fn write_le(self, out: &mut [u8]) {
        self.re.write_le(&mut out[..4]);
        self.im.write_le(&mut out[4..8]);
    }

    fn is_nonzero(self) -> bool {
        self.re != 0.0 || self.im != 0.0
    }
}

impl Element for Complex<f64> {
    const DTYPE: DType = DType::Complex128;
    const SIZE: usize = 16;

    fn read_le(bytes: &[u8]) -> Self {
        Complex::new(f64::read_le(&bytes[..8]), f64::read_le(&bytes[8..16]))
    }

    fn write_le(self, out: &mut [u8]) {
        self.re.write_le(&mut out[..8]);
        self.im.write_le(&mut out[8..16]);
    }

    fn is_nonzero(self) -> bool {
        self.re != 0.0 || self.im != 0.0
    }
}

// =============================================================================
// Widening conversions
// =============================================================================

/// Value-preserving widening cast from `Self` into `D`
///
/// Only the pairs reachable through the merge promotion lattice are
/// implemented; dispatch over unreachable pairs fails before reaching this
/// trait.
pub(crate) trait CastTo<D> {
    fn cast(self) -> D;
}

impl<T: Copy> CastTo<T> for T {
    fn cast(self) -> T {
        self
    }
}

macro_rules! cast_as {
    ($($s:ty => [$($d:ty),+ $(,)?]),+ $(,)?) => {$($(
        impl CastTo<$d> for $s {
            fn cast(self) -> $d {
                self as $d
            }
        }
    )+)+};
}

cast_as! {
    i8 => [i16, i32, i64, f32, f64],
    u8 => [i16, u16, i32, u32, i64, u64, f32, f64],
    i16 => [i32, i64, f32, f64],
    u16 => [i32, u32, i64, u64, f32, f64],
    i32 => [i64, f64],
    u32 => [i64, u64, f64],
    i64 => [f64],
    u64 => [f64],
    f32 => [f64],
}

macro_rules! cast_bool {
    ($($d:ty),+ $(,)?) => {$(
        impl CastTo<$d> for bool {
            fn cast(self) -> $d {
                if self { 1 as $d } else { 0 as $d }
            }
        }
    )+};
}

cast_bool!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl CastTo<f16> for bool {
    fn cast(self) -> f16 {
        if self { f16::ONE } else { f16::ZERO }
    }
}

macro_rules! cast_to_f16 {
    ($($s:ty),+ $(,)?) => {$(
        impl CastTo<f16> for $s {
            fn cast(self) -> f16 {
                f16::from_f32(self as f32)
            }
        }
    )+};
}

cast_to_f16!(i8, u8);

impl CastTo<f32> for f16 {
    fn cast(self) -> f32 {
        self.to_f32()
    }
}

impl CastTo<f64> for f16 {
    fn cast(self) -> f64 {
        self.to_f64()
    }
}

macro_rules! cast_to_complex {
    ($($s:ty),+ $(,)?) => {$(
        impl CastTo<Complex<f32>> for $s {
            fn cast(self) -> Complex<f32> {
                Complex::new(CastTo::<f32>::cast(self), 0.0)
            }
        }
        impl CastTo<Complex<f64>> for $s {
            fn cast(self) -> Complex<f64> {
                Complex::new(CastTo::<f64>::cast(self), 0.0)
            }
        }
    )+};
}

cast_to_complex!(bool, i8, u8, i16, u16, f16, f32);

macro_rules! cast_to_complex128 {
    ($($s:ty),+ $(,)?) => {$(
        impl CastTo<Complex<f64>> for $s {
            fn cast(self) -> Complex<f64> {
                Complex::new(CastTo::<f64>::cast(self), 0.0)
            }
        }
    )+};
}

cast_to_complex128!(i32, u32, i64, u64, f64);

impl CastTo<Complex<f64>> for Complex<f32> {
    fn cast(self) -> Complex<f64> {
        Complex::new(self.re as f64, self.im as f64)
    }
}
