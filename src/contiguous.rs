//! Contiguity checks and packing
//!
//! A view is contiguous when its strides describe a packed row-major layout
//! starting at its byte offset. Packing a non-contiguous view gathers rows
//! level by level, merging the two outermost dimensions at each step, so
//! arbitrary stride patterns (reversed, skipping, overlapping) all resolve
//! to one freshly packed buffer.

use crate::types::Buffer;
use crate::view::{PrimitiveView, flatten_shape, flatten_strides};
use crate::error::Result;

impl PrimitiveView {
    /// Whether the strides describe a packed row-major layout
    pub fn is_contiguous(&self) -> bool {
        let mut x = self.element_size() as isize;
        for i in (0..self.ndim()).rev() {
            if self.strides()[i] != x {
                return false;
            }
            x *= self.shape()[i] as isize;
        }
        true
    }

    /// Return a packed equivalent of this view
    ///
    /// Already-contiguous views come back sharing the same buffer; nothing
    /// is copied. Otherwise the elements are gathered into a new buffer with
    /// canonical strides and byte offset zero. Identities pass through
    /// unchanged since row order is preserved.
    pub fn to_contiguous(&self) -> Result<PrimitiveView> {
        if self.is_contiguous() {
            return Ok(self.clone());
        }
        let bytepos: Vec<isize> = (0..self.shape()[0] as isize)
            .map(|i| i * self.strides()[0])
            .collect();
        self.contiguous_next(&bytepos)
    }

    /// One level of the packing recursion: `bytepos` holds the byte position
    /// of each outermost row relative to the view's byte offset
    fn contiguous_next(&self, bytepos: &[isize]) -> Result<PrimitiveView> {
        let bytes = self.buffer().bytes();
        if self.is_contiguous() {
            // Rows below this level are already packed; copy them whole.
            let row = self.strides()[0] as usize;
            let mut out = vec![0u8; bytepos.len() * row];
            for (i, &pos) in bytepos.iter().enumerate() {
                let src = (self.byte_offset() + pos) as usize;
                out[i * row..(i + 1) * row].copy_from_slice(&bytes[src..src + row]);
            }
            Ok(self.rebuild(
                Buffer::from_bytes(out),
                self.shape().to_vec(),
                self.strides().to_vec(),
                0,
                self.identities().cloned(),
            ))
        } else if self.ndim() == 1 {
            let size = self.element_size();
            let mut out = vec![0u8; bytepos.len() * size];
            for (i, &pos) in bytepos.iter().enumerate() {
                let src = (self.byte_offset() + pos) as usize;
                out[i * size..(i + 1) * size].copy_from_slice(&bytes[src..src + size]);
            }
            Ok(self.rebuild(
                Buffer::from_bytes(out),
                self.shape().to_vec(),
                vec![size as isize],
                0,
                self.identities().cloned(),
            ))
        } else {
            let skip = self.shape()[1];
            let substride = self.strides()[1];
            let mut nextbytepos = Vec::with_capacity(bytepos.len() * skip);
            for &pos in bytepos {
                for j in 0..skip as isize {
                    nextbytepos.push(pos + j * substride);
                }
            }
            let next = self.rebuild(
                self.buffer().clone(),
                flatten_shape(self.shape()),
                flatten_strides(self.strides()),
                self.byte_offset(),
                None,
            );
            let out = next.contiguous_next(&nextbytepos)?;
            let mut outstrides = vec![skip as isize * out.strides()[0]];
            outstrides.extend_from_slice(out.strides());
            Ok(self.rebuild(
                out.buffer().clone(),
                self.shape().to_vec(),
                outstrides,
                0,
                self.identities().cloned(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{Buffer, DType, Identities};
    use crate::view::PrimitiveView;

    #[test]
    fn contiguous_view_is_not_copied() {
        let view = PrimitiveView::from_shape_vec(vec![2, 3], vec![1i32, 2, 3, 4, 5, 6]).unwrap();
        assert!(view.is_contiguous());
        let packed = view.to_contiguous().unwrap();
        assert!(view.buffer().ptr_eq(packed.buffer()));
    }

    #[test]
    fn reversed_view_packs() {
        // A length-4 i16 view walked backwards from its last element
        let base = PrimitiveView::from_vec(vec![10i16, 20, 30, 40]);
        let reversed = PrimitiveView::new(
            base.buffer().clone(),
            DType::I16,
            vec![4],
            vec![-2],
            6,
        )
        .unwrap();
        assert!(!reversed.is_contiguous());
        let packed = reversed.to_contiguous().unwrap();
        assert!(packed.is_contiguous());
        assert_eq!(packed.byte_offset(), 0);
        assert_eq!(packed.to_vec::<i16>().unwrap(), vec![40, 30, 20, 10]);
    }

    #[test]
    fn strided_2d_view_packs() {
        // Every other column of a 3x4 matrix
        let base = PrimitiveView::from_shape_vec(
            vec![3, 4],
            (0..12i32).collect::<Vec<_>>(),
        )
        .unwrap();
        let skipped = PrimitiveView::new(
            base.buffer().clone(),
            DType::I32,
            vec![3, 2],
            vec![16, 8],
            0,
        )
        .unwrap();
        let packed = skipped.to_contiguous().unwrap();
        assert_eq!(packed.shape(), &[3, 2]);
        assert_eq!(packed.strides(), &[8, 4]);
        assert_eq!(packed.to_vec::<i32>().unwrap(), vec![0, 2, 4, 6, 8, 10]);
    }

    #[test]
    fn identities_survive_packing() {
        let base = PrimitiveView::from_vec(vec![1.0f64, 2.0, 3.0]);
        let reversed = PrimitiveView::new(
            base.buffer().clone(),
            DType::F64,
            vec![3],
            vec![-8],
            16,
        )
        .unwrap()
        .with_identities(Identities::from_vec(vec![7, 8, 9]))
        .unwrap();
        let packed = reversed.to_contiguous().unwrap();
        assert_eq!(packed.identities().unwrap().as_slice(), &[7, 8, 9]);
    }

    #[test]
    fn empty_dimension_packs_to_empty() {
        let view = PrimitiveView::new(
            Buffer::from_bytes(vec![]),
            DType::U8,
            vec![0],
            vec![5],
            0,
        )
        .unwrap();
        let packed = view.to_contiguous().unwrap();
        assert_eq!(packed.shape(), &[0]);
        assert!(packed.buffer().is_empty());
    }
}
