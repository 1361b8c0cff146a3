//! Integration tests for ndarray support
//!
//! These tests demonstrate moving numeric data between ndarray and jagbuf
//! views, and running view operations on ndarray-sourced buffers.

#![cfg(feature = "ndarray")]

use jagbuf::{DType, NdarrayError, PrimitiveView, Reducer, Slice, SliceItem};
use ndarray::{ArrayD, IxDyn, array, s};

// =============================================================================
// Basic roundtrips
// =============================================================================

#[test]
fn roundtrip_ndarray_1d() {
    let arr = array![1.0f32, 2.0, 3.0, 4.0, 5.0].into_dyn();
    let expected = arr.clone();

    let view = PrimitiveView::from_ndarray(arr).unwrap();
    assert_eq!(view.dtype(), DType::F32);

    let back: ArrayD<f32> = view.to_ndarray().unwrap();
    assert_eq!(expected, back);
}

#[test]
fn roundtrip_ndarray_3d_tensor() {
    let tensor = ArrayD::<i32>::from_shape_fn(IxDyn(&[2, 3, 4]), |idx| {
        (idx[0] * 12 + idx[1] * 4 + idx[2]) as i32
    });
    let expected = tensor.clone();

    let view = PrimitiveView::from_ndarray(tensor).unwrap();
    assert_eq!(view.shape(), &[2, 3, 4]);
    assert_eq!(view.strides(), &[48, 16, 4]);

    let back: ArrayD<i32> = view.to_ndarray().unwrap();
    assert_eq!(expected, back);
}

#[test]
fn mixed_dtype_roundtrips() {
    let u8_data = array![255u8, 128, 64, 0].into_dyn();
    let f64_data = array![std::f64::consts::PI, std::f64::consts::E].into_dyn();

    let expected_u8 = u8_data.clone();
    let expected_f64 = f64_data.clone();

    let u8_back: ArrayD<u8> = PrimitiveView::from_ndarray(u8_data)
        .unwrap()
        .to_ndarray()
        .unwrap();
    let f64_back: ArrayD<f64> = PrimitiveView::from_ndarray(f64_data)
        .unwrap()
        .to_ndarray()
        .unwrap();

    assert_eq!(expected_u8, u8_back);
    assert_eq!(expected_f64, f64_back);
}

// =============================================================================
// Layout requirements
// =============================================================================

#[test]
fn non_contiguous_input_is_rejected() {
    let arr = ArrayD::<i64>::from_shape_fn(IxDyn(&[4, 4]), |idx| (idx[0] * 4 + idx[1]) as i64);
    let reversed = arr.slice(s![..;-1, ..]).to_owned().into_dyn();

    // to_owned of a reversed slice is standard layout again, so reverse the
    // axis on the owned array to get a genuinely non-standard layout
    let mut flipped = arr;
    flipped.invert_axis(ndarray::Axis(0));
    assert!(!flipped.is_standard_layout());

    let err = PrimitiveView::from_ndarray(flipped).unwrap_err();
    assert_eq!(err, NdarrayError::NotContiguous);

    // the owned copy goes through fine
    assert!(PrimitiveView::from_ndarray(reversed).is_ok());
}

#[test]
fn dtype_mismatch_on_export() {
    let arr = array![1.0f32, 2.0].into_dyn();
    let view = PrimitiveView::from_ndarray(arr).unwrap();
    let result: Result<ArrayD<f64>, _> = view.to_ndarray();
    assert_eq!(
        result,
        Err(NdarrayError::DTypeMismatch {
            expected: DType::F64,
            actual: DType::F32,
        })
    );
}

// =============================================================================
// View operations on ndarray-sourced buffers
// =============================================================================

#[test]
fn slice_then_export() {
    let matrix = ArrayD::<f64>::from_shape_fn(IxDyn(&[4, 3]), |idx| (idx[0] * 3 + idx[1]) as f64);
    let view = PrimitiveView::from_ndarray(matrix).unwrap();

    let rows = view
        .getitem(&Slice::of(SliceItem::range(Some(1), Some(3), 1)).unwrap())
        .unwrap();
    assert!(rows.buffer().ptr_eq(view.buffer()));

    let back: ArrayD<f64> = rows.to_ndarray().unwrap();
    assert_eq!(
        back,
        array![[3.0f64, 4.0, 5.0], [6.0, 7.0, 8.0]].into_dyn()
    );
}

#[test]
fn gather_then_export() {
    let arr = array![10i64, 20, 30, 40].into_dyn();
    let view = PrimitiveView::from_ndarray(arr).unwrap();

    let picked = view
        .getitem(&Slice::of(SliceItem::array(vec![3, 1])).unwrap())
        .unwrap();
    let back: ArrayD<i64> = picked.to_ndarray().unwrap();
    assert_eq!(back, array![40i64, 20].into_dyn());
}

#[test]
fn merge_ndarray_sources_promotes() {
    let a = PrimitiveView::from_ndarray(array![1i16, 2].into_dyn()).unwrap();
    let b = PrimitiveView::from_ndarray(array![0.5f32, 1.5].into_dyn()).unwrap();

    let merged = a.merge(&b).unwrap();
    assert_eq!(merged.dtype(), DType::F32);

    let back: ArrayD<f32> = merged.to_ndarray().unwrap();
    assert_eq!(back, array![1.0f32, 2.0, 0.5, 1.5].into_dyn());
}

#[test]
fn reduce_ndarray_source() {
    let arr = array![1.0f64, 2.0, 3.0, 4.0].into_dyn();
    let view = PrimitiveView::from_ndarray(arr).unwrap();

    let node = view
        .reduce(Reducer::Sum, &[0, 0, 1, 1], 2, false, false)
        .unwrap();
    let back: ArrayD<f64> = node.as_primitive().unwrap().to_ndarray().unwrap();
    assert_eq!(back, array![3.0f64, 7.0].into_dyn());
}
