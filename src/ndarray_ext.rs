//! ndarray integration for jagbuf views
//!
//! This module provides conversions between [`PrimitiveView`] and ndarray's
//! dynamic-dimension arrays. Conversions always copy: the view's buffer
//! stores little-endian bytes with no alignment guarantee, so elements are
//! decoded rather than reinterpreted.
//!
//! Enable with the `ndarray` feature flag.

use crate::types::Element;
use crate::view::PrimitiveView;
use ndarray::{ArrayD, IxDyn};

/// Error type for ndarray conversions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NdarrayError {
    /// DType mismatch between expected and actual
    DTypeMismatch {
        expected: crate::types::DType,
        actual: crate::types::DType,
    },
    /// Shape doesn't match data length
    ShapeMismatch { shape: Vec<usize>, data_len: usize },
    /// Array is not in standard (contiguous row-major) layout
    NotContiguous,
}

impl std::fmt::Display for NdarrayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NdarrayError::DTypeMismatch { expected, actual } => {
                write!(
                    f,
                    "DType mismatch: expected {:?}, got {:?}",
                    expected, actual
                )
            }
            NdarrayError::ShapeMismatch { shape, data_len } => {
                write!(
                    f,
                    "Shape {:?} doesn't match data length {}",
                    shape, data_len
                )
            }
            NdarrayError::NotContiguous => {
                write!(
                    f,
                    "Array is not contiguous; call .as_standard_layout().into_owned() first"
                )
            }
        }
    }
}

impl std::error::Error for NdarrayError {}

// =============================================================================
// From ndarray to jagbuf
// =============================================================================

impl PrimitiveView {
    /// Create a view from an ndarray ArrayD
    ///
    /// Takes a contiguous array and encodes its elements little-endian.
    /// Returns an error if not contiguous; use
    /// `.as_standard_layout().into_owned()` first for non-contiguous arrays.
    pub fn from_ndarray<T: Element>(arr: ArrayD<T>) -> Result<Self, NdarrayError> {
        if !arr.is_standard_layout() {
            return Err(NdarrayError::NotContiguous);
        }

        let shape: Vec<usize> = arr.shape().to_vec();
        let (values, offset) = arr.into_raw_vec_and_offset();
        if offset != Some(0) && !values.is_empty() {
            return Err(NdarrayError::NotContiguous);
        }

        let data_len = values.len();
        PrimitiveView::from_shape_vec(shape.clone(), values)
            .map_err(|_| NdarrayError::ShapeMismatch { shape, data_len })
    }
}

// =============================================================================
// From jagbuf to ndarray (owned)
// =============================================================================

impl PrimitiveView {
    /// Convert to an ndarray ArrayD
    ///
    /// Works on any layout; strided views are packed on the way out.
    pub fn to_ndarray<T: Element>(&self) -> Result<ArrayD<T>, NdarrayError> {
        if T::DTYPE != self.dtype() {
            return Err(NdarrayError::DTypeMismatch {
                expected: T::DTYPE,
                actual: self.dtype(),
            });
        }

        let shape = self.shape().to_vec();
        let elements = self.to_vec::<T>().map_err(|_| NdarrayError::ShapeMismatch {
            shape: shape.clone(),
            data_len: self.buffer().len(),
        })?;

        ArrayD::from_shape_vec(IxDyn(&shape), elements).map_err(|_| {
            NdarrayError::ShapeMismatch {
                shape,
                data_len: self.buffer().len(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DType;
    use ndarray::array;

    #[test]
    fn roundtrip_1d_f32() {
        let arr = array![1.0f32, 2.0, 3.0, 4.0].into_dyn();
        let expected = arr.clone();
        let view = PrimitiveView::from_ndarray(arr).unwrap();

        assert_eq!(view.dtype(), DType::F32);
        assert_eq!(view.shape(), &[4]);

        let back: ArrayD<f32> = view.to_ndarray().unwrap();
        assert_eq!(expected, back);
    }

    #[test]
    fn roundtrip_2d_i32() {
        let arr = array![[1i32, 2, 3], [4, 5, 6]].into_dyn();
        let expected = arr.clone();
        let view = PrimitiveView::from_ndarray(arr).unwrap();

        assert_eq!(view.dtype(), DType::I32);
        assert_eq!(view.shape(), &[2, 3]);
        assert_eq!(view.strides(), &[12, 4]);

        let back: ArrayD<i32> = view.to_ndarray().unwrap();
        assert_eq!(expected, back);
    }

    #[test]
    fn dtype_mismatch_error() {
        let arr = array![1.0f32, 2.0, 3.0].into_dyn();
        let view = PrimitiveView::from_ndarray(arr).unwrap();

        let result: Result<ArrayD<f64>, _> = view.to_ndarray();
        assert!(matches!(result, Err(NdarrayError::DTypeMismatch { .. })));
    }

    #[test]
    fn strided_view_exports_packed() {
        use crate::slice::{Slice, SliceItem};

        let arr = array![[1i64, 2, 3], [4, 5, 6]].into_dyn();
        let view = PrimitiveView::from_ndarray(arr).unwrap();
        let sliced = view
            .getitem(&Slice::new(vec![
                SliceItem::full_range(),
                SliceItem::range(None, None, 2),
            ]).unwrap())
            .unwrap();

        let back: ArrayD<i64> = sliced.to_ndarray().unwrap();
        assert_eq!(back, array![[1i64, 3], [4, 6]].into_dyn());
    }
}
