//! Type-promoting concatenation
//!
//! Merging two views produces one freshly packed view whose element kind is
//! the promotion of both inputs, following NumPy's rules: widths widen,
//! unsigned meets signed at the next wider signed type (or `float64` at 64
//! bits), floats absorb integers, complex absorbs everything. Identities do
//! not survive a merge.

use crate::error::{Error, Result};
use crate::types::{Buffer, CastTo, DType, Element};
use crate::view::{PrimitiveView, contiguous_strides};
use half::f16;
use num_complex::Complex;

/// Promotion of two element kinds, or an error when no common kind exists
pub fn promoted(a: DType, b: DType) -> Result<DType> {
    use DType::*;
    let either = |d: DType| a == d || b == d;
    let cross = |d: DType, f: fn(DType) -> bool| (a == d && f(b)) || (b == d && f(a));
    let complex = |d: DType| d.is_complex();
    let signed = |d: DType| d.is_signed();
    let int32_64 = |d: DType| matches!(d, U64 | I64 | U32 | I32);
    let int16 = |d: DType| matches!(d, U16 | I16);

    if either(Complex128) {
        Ok(Complex128)
    } else if cross(F64, complex)
        || cross(U64, complex)
        || cross(I64, complex)
        || cross(U32, complex)
        || cross(I32, complex)
    {
        Ok(Complex128)
    } else if either(Complex64) {
        Ok(Complex64)
    } else if either(F64) {
        Ok(F64)
    } else if cross(F32, int32_64) {
        Ok(F64)
    } else if either(F32) {
        Ok(F32)
    } else if cross(F16, int32_64) {
        Ok(F64)
    } else if cross(F16, int16) {
        Ok(F32)
    } else if either(F16) {
        Ok(F16)
    } else if cross(U64, signed) {
        Ok(F64)
    } else if either(U64) {
        Ok(U64)
    } else if either(I64) {
        Ok(I64)
    } else if cross(U32, signed) {
        Ok(I64)
    } else if either(U32) {
        Ok(U32)
    } else if either(I32) {
        Ok(I32)
    } else if cross(U16, signed) {
        Ok(I32)
    } else if either(U16) {
        Ok(U16)
    } else if either(I16) {
        Ok(I16)
    } else if cross(U8, signed) {
        Ok(I16)
    } else if either(U8) {
        Ok(U8)
    } else if either(I8) {
        Ok(I8)
    } else if a == Bool && b == Bool {
        Ok(Bool)
    } else {
        Err(Error::UnsupportedMerge { left: a, right: b })
    }
}

/// Widen one source view into the destination buffer starting at element
/// slot `offset`
fn fill<S, D>(src: &PrimitiveView, dst: &mut [u8], offset: usize) -> Result<()>
where
    S: Element + CastTo<D>,
    D: Element,
{
    let values = src.to_vec::<S>()?;
    for (i, value) in values.into_iter().enumerate() {
        CastTo::<D>::cast(value).write_le(&mut dst[(offset + i) * D::SIZE..]);
    }
    Ok(())
}

/// Dispatch a widening fill on the (source kind, destination kind) pair
fn fill_as(src: &PrimitiveView, dtype: DType, dst: &mut [u8], offset: usize) -> Result<()> {
    use DType::*;
    macro_rules! arm {
        ($d:ty { $($sd:ident => $st:ty),+ $(,)? }) => {
            match src.dtype() {
                $($sd => fill::<$st, $d>(src, dst, offset),)+
                other => Err(Error::UnsupportedMerge {
                    left: other,
                    right: dtype,
                }),
            }
        };
    }
    match dtype {
        Bool => arm!(bool { Bool => bool }),
        I8 => arm!(i8 { I8 => i8, Bool => bool }),
        U8 => arm!(u8 { U8 => u8, Bool => bool }),
        I16 => arm!(i16 { I16 => i16, I8 => i8, U8 => u8, Bool => bool }),
        U16 => arm!(u16 { U16 => u16, U8 => u8, Bool => bool }),
        I32 => arm!(i32 {
            I32 => i32, I16 => i16, I8 => i8, U16 => u16, U8 => u8, Bool => bool,
        }),
        U32 => arm!(u32 { U32 => u32, U16 => u16, U8 => u8, Bool => bool }),
        I64 => arm!(i64 {
            I64 => i64, I32 => i32, I16 => i16, I8 => i8,
            U32 => u32, U16 => u16, U8 => u8, Bool => bool,
        }),
        U64 => arm!(u64 {
            U64 => u64, U32 => u32, U16 => u16, U8 => u8, Bool => bool,
        }),
        F16 => arm!(f16 { F16 => f16, I8 => i8, U8 => u8, Bool => bool }),
        F32 => arm!(f32 {
            F32 => f32, F16 => f16, I16 => i16, U16 => u16,
            I8 => i8, U8 => u8, Bool => bool,
        }),
        F64 => arm!(f64 {
            F64 => f64, F32 => f32, F16 => f16,
            I64 => i64, U64 => u64, I32 => i32, U32 => u32,
            I16 => i16, U16 => u16, I8 => i8, U8 => u8, Bool => bool,
        }),
        Complex64 => arm!(Complex<f32> {
            Complex64 => Complex<f32>, F32 => f32, F16 => f16,
            I16 => i16, U16 => u16, I8 => i8, U8 => u8, Bool => bool,
        }),
        Complex128 => arm!(Complex<f64> {
            Complex128 => Complex<f64>, Complex64 => Complex<f32>,
            F64 => f64, F32 => f32, F16 => f16,
            I64 => i64, U64 => u64, I32 => i32, U32 => u32,
            I16 => i16, U16 => u16, I8 => i8, U8 => u8, Bool => bool,
        }),
    }
}

impl PrimitiveView {
    /// Whether `merge` would succeed on this pair
    ///
    /// With `mergebool` unset, booleans only merge with booleans even when a
    /// numeric promotion exists.
    pub fn mergeable(&self, other: &PrimitiveView, mergebool: bool) -> bool {
        if self.is_scalar() || other.is_scalar() {
            return false;
        }
        if self.parameters() != other.parameters() {
            return false;
        }
        if self.ndim() != other.ndim() {
            return false;
        }
        if !mergebool
            && self.dtype() != other.dtype()
            && (self.dtype() == DType::Bool || other.dtype() == DType::Bool)
        {
            return false;
        }
        if self.shape()[1..] != other.shape()[1..] {
            return false;
        }
        promoted(self.dtype(), other.dtype()).is_ok()
    }

    /// Concatenate `other` after `self`, promoting to a common element kind
    ///
    /// The result is packed with canonical strides and byte offset zero.
    pub fn merge(&self, other: &PrimitiveView) -> Result<PrimitiveView> {
        if self.is_scalar() || other.is_scalar() {
            return Err(Error::ScalarLength);
        }
        if self.parameters() != other.parameters() {
            return Err(Error::UnsupportedMerge {
                left: self.dtype(),
                right: other.dtype(),
            });
        }

        let bytelike = |v: &PrimitiveView| {
            v.parameter_equals("__array__", "byte") || v.parameter_equals("__array__", "char")
        };
        if bytelike(self)
            && bytelike(other)
            && self.ndim() == 1
            && other.ndim() == 1
            && self.element_size() == 1
            && other.element_size() == 1
        {
            return self.merge_bytes(other);
        }

        if self.ndim() != other.ndim() || self.shape()[1..] != other.shape()[1..] {
            return Err(Error::ShapeMismatch {
                left: self.shape().to_vec(),
                right: other.shape().to_vec(),
            });
        }
        let dtype = promoted(self.dtype(), other.dtype())?;
        let itemsize = dtype.element_size();

        let mut shape = vec![self.shape()[0] + other.shape()[0]];
        shape.extend_from_slice(&self.shape()[1..]);
        let strides = contiguous_strides(&shape, itemsize);

        let self_flat = self.flat_len();
        let other_flat = other.flat_len();
        let mut bytes = vec![0u8; (self_flat + other_flat) * itemsize];
        fill_as(self, dtype, &mut bytes, 0)?;
        fill_as(other, dtype, &mut bytes, self_flat)?;

        Ok(PrimitiveView::new(Buffer::from_bytes(bytes), dtype, shape, strides, 0)?
            .with_parameters(self.parameters().clone()))
    }

    /// Straight byte concatenation for string-like content
    ///
    /// Both sides must be 1-D with one-byte elements; no promotion happens.
    pub fn merge_bytes(&self, other: &PrimitiveView) -> Result<PrimitiveView> {
        let a = self.to_contiguous()?;
        let b = other.to_contiguous()?;
        let len_a = a.len()?;
        let len_b = b.len()?;
        let mut bytes = Vec::with_capacity(len_a + len_b);
        bytes.extend_from_slice(&a.buffer().bytes()[a.byte_offset() as usize..][..len_a]);
        bytes.extend_from_slice(&b.buffer().bytes()[b.byte_offset() as usize..][..len_b]);
        Ok(PrimitiveView::new(
            Buffer::from_bytes(bytes),
            self.dtype(),
            vec![len_a + len_b],
            vec![1],
            0,
        )?
        .with_parameters(self.parameters().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_same_kind() {
        for &d in &[
            DType::Bool,
            DType::I8,
            DType::U32,
            DType::F16,
            DType::Complex128,
        ] {
            assert_eq!(promoted(d, d).unwrap(), d);
        }
    }

    #[test]
    fn promotion_unsigned_meets_signed() {
        assert_eq!(promoted(DType::U8, DType::I8).unwrap(), DType::I16);
        assert_eq!(promoted(DType::U16, DType::I8).unwrap(), DType::I32);
        assert_eq!(promoted(DType::U32, DType::I64).unwrap(), DType::I64);
        assert_eq!(promoted(DType::U64, DType::I8).unwrap(), DType::F64);
    }

    #[test]
    fn promotion_floats_absorb_integers() {
        assert_eq!(promoted(DType::I8, DType::F32).unwrap(), DType::F32);
        assert_eq!(promoted(DType::I32, DType::F32).unwrap(), DType::F64);
        assert_eq!(promoted(DType::F16, DType::I16).unwrap(), DType::F32);
        assert_eq!(promoted(DType::F16, DType::I64).unwrap(), DType::F64);
        assert_eq!(promoted(DType::F16, DType::U8).unwrap(), DType::F16);
    }

    #[test]
    fn promotion_complex_absorbs() {
        assert_eq!(
            promoted(DType::Complex64, DType::F32).unwrap(),
            DType::Complex64
        );
        assert_eq!(
            promoted(DType::Complex64, DType::F64).unwrap(),
            DType::Complex128
        );
        assert_eq!(
            promoted(DType::Complex64, DType::I64).unwrap(),
            DType::Complex128
        );
    }

    #[test]
    fn promotion_bool_pairs() {
        assert_eq!(promoted(DType::Bool, DType::Bool).unwrap(), DType::Bool);
        assert_eq!(promoted(DType::Bool, DType::I32).unwrap(), DType::I32);
    }
}
