//! The primitive array view: shape/stride/offset metadata over a shared buffer

use crate::error::{Error, Result};
use crate::slice::SliceItem;
use crate::types::{Backend, Buffer, DType, Element, Form, Identities, Parameters};

/// A strided, multidimensional window into one typed buffer
///
/// All metadata is immutable once constructed; every "mutation" produces a
/// new view over the same or a freshly allocated buffer. An empty `shape`
/// denotes a scalar, which has no logical length.
#[derive(Debug, Clone)]
pub struct PrimitiveView {
    buffer: Buffer,
    dtype: DType,
    shape: Vec<usize>,
    strides: Vec<isize>,
    byte_offset: isize,
    identities: Option<Identities>,
    parameters: Parameters,
}

impl PrimitiveView {
    /// Construct a view over an existing buffer
    pub fn new(
        buffer: Buffer,
        dtype: DType,
        shape: Vec<usize>,
        strides: Vec<isize>,
        byte_offset: isize,
    ) -> Result<Self> {
        if shape.len() != strides.len() {
            return Err(Error::ShapeStrideMismatch {
                shape_len: shape.len(),
                strides_len: strides.len(),
            });
        }
        Ok(PrimitiveView {
            buffer,
            dtype,
            shape,
            strides,
            byte_offset,
            identities: None,
            parameters: Parameters::new(),
        })
    }

    /// 1-D contiguous view owning freshly written bytes
    pub fn from_vec<T: Element>(values: Vec<T>) -> Self {
        let mut bytes = vec![0u8; values.len() * T::SIZE];
        for (i, value) in values.iter().enumerate() {
            value.write_le(&mut bytes[i * T::SIZE..]);
        }
        PrimitiveView {
            buffer: Buffer::from_bytes(bytes),
            dtype: T::DTYPE,
            shape: vec![values.len()],
            strides: vec![T::SIZE as isize],
            byte_offset: 0,
            identities: None,
            parameters: Parameters::new(),
        }
    }

    /// N-D contiguous (row-major) view from a flat value vector
    pub fn from_shape_vec<T: Element>(shape: Vec<usize>, values: Vec<T>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(Error::ShapeMismatch {
                left: shape,
                right: vec![values.len()],
            });
        }
        let mut out = PrimitiveView::from_vec(values);
        out.strides = contiguous_strides(&shape, T::SIZE);
        out.shape = shape;
        Ok(out)
    }

    /// Zero-dimensional (scalar) view
    pub fn scalar<T: Element>(value: T) -> Self {
        let mut bytes = vec![0u8; T::SIZE];
        value.write_le(&mut bytes);
        PrimitiveView {
            buffer: Buffer::from_bytes(bytes),
            dtype: T::DTYPE,
            shape: vec![],
            strides: vec![],
            byte_offset: 0,
            identities: None,
            parameters: Parameters::new(),
        }
    }

    /// Attach an identity table; its length must equal the logical length
    pub fn with_identities(mut self, identities: Identities) -> Result<Self> {
        let length = self.len()?;
        if identities.len() != length {
            return Err(Error::IdentitiesLengthMismatch {
                identities_len: identities.len(),
                length,
            });
        }
        self.identities = Some(identities);
        Ok(self)
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters.insert(key.to_string(), value.to_string());
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    pub fn byte_offset(&self) -> isize {
        self.byte_offset
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Logical length (dimension 0); scalars have none
    pub fn len(&self) -> Result<usize> {
        if self.is_scalar() {
            Err(Error::ScalarLength)
        } else {
            Ok(self.shape[0])
        }
    }

    /// Total number of elements across all dimensions (1 for scalars)
    pub fn flat_len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn element_size(&self) -> usize {
        self.dtype.element_size()
    }

    /// Bytes spanned by one logical row
    pub fn byte_len(&self) -> usize {
        self.flat_len() * self.element_size()
    }

    pub fn backend(&self) -> Backend {
        self.buffer.backend()
    }

    pub fn identities(&self) -> Option<&Identities> {
        self.identities.as_ref()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn parameter_equals(&self, key: &str, value: &str) -> bool {
        self.parameters.get(key).is_some_and(|v| v == value)
    }

    /// Raw byte at `at` bytes past the view's byte offset
    pub fn byte_at(&self, at: isize) -> u8 {
        self.buffer.bytes()[(self.byte_offset + at) as usize]
    }

    /// Typed element at `at` bytes past the view's byte offset
    pub fn element_at<T: Element>(&self, at: isize) -> Result<T> {
        if T::DTYPE != self.dtype {
            return Err(Error::UnsupportedElementKind { dtype: self.dtype });
        }
        let pos = (self.byte_offset + at) as usize;
        Ok(T::read_le(&self.buffer.bytes()[pos..]))
    }

    /// Reinterpret a 1-D integer view as an advanced slice item
    ///
    /// This is how one array indexes another. Fixed-size views of higher
    /// rank cannot address a dimension this way and are rejected.
    pub fn as_slice_item(&self) -> Result<SliceItem> {
        if self.ndim() != 1 {
            return Err(Error::MixedSliceKind);
        }
        let index: Vec<i64> = match self.dtype {
            DType::I8 => self.to_vec::<i8>()?.into_iter().map(i64::from).collect(),
            DType::U8 => self.to_vec::<u8>()?.into_iter().map(i64::from).collect(),
            DType::I16 => self.to_vec::<i16>()?.into_iter().map(i64::from).collect(),
            DType::U16 => self.to_vec::<u16>()?.into_iter().map(i64::from).collect(),
            DType::I32 => self.to_vec::<i32>()?.into_iter().map(i64::from).collect(),
            DType::U32 => self.to_vec::<u32>()?.into_iter().map(i64::from).collect(),
            DType::I64 => self.to_vec::<i64>()?,
            DType::U64 => self.to_vec::<u64>()?.into_iter().map(|v| v as i64).collect(),
            dtype => return Err(Error::UnsupportedElementKind { dtype }),
        };
        Ok(SliceItem::array(index))
    }

    /// Schema-form export: element kind, inner fixed shape, parameters
    pub fn form(&self) -> Form {
        let inner_shape = if self.is_scalar() {
            vec![]
        } else {
            self.shape[1..].to_vec()
        };
        Form::new(self.dtype, inner_shape, self.parameters.clone())
    }

    // =========================================================================
    // Backend copy
    // =========================================================================

    /// Duplicate the underlying buffer onto another backend
    ///
    /// The transfer is blocking and atomic: it either returns a new view
    /// bound to the destination backend or fails leaving the source
    /// untouched. CUDA kernels are not linked into this build.
    pub fn copy_to(&self, backend: Backend) -> Result<PrimitiveView> {
        if self.backend() != Backend::Cpu || backend != Backend::Cpu {
            return Err(Error::BackendCopy {
                from: self.backend(),
                to: backend,
            });
        }
        let bytes = self.buffer.bytes().to_vec();
        Ok(PrimitiveView {
            buffer: Buffer::with_backend(bytes, backend),
            dtype: self.dtype,
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            byte_offset: self.byte_offset,
            identities: self.identities.clone(),
            parameters: self.parameters.clone(),
        })
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Materialize the view's elements as a typed vector (row-major order)
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        if T::DTYPE != self.dtype {
            return Err(Error::UnsupportedElementKind { dtype: self.dtype });
        }
        let packed = self.to_contiguous()?;
        let bytes = packed.buffer.bytes();
        let start = packed.byte_offset as usize;
        let mut out = Vec::with_capacity(packed.flat_len());
        for i in 0..packed.flat_len() {
            out.push(T::read_le(&bytes[start + i * T::SIZE..]));
        }
        Ok(out)
    }

    pub(crate) fn rebuild(
        &self,
        buffer: Buffer,
        shape: Vec<usize>,
        strides: Vec<isize>,
        byte_offset: isize,
        identities: Option<Identities>,
    ) -> PrimitiveView {
        PrimitiveView {
            buffer,
            dtype: self.dtype,
            shape,
            strides,
            byte_offset,
            identities,
            parameters: self.parameters.clone(),
        }
    }
}

/// Canonical row-major strides for a packed layout
pub(crate) fn contiguous_strides(shape: &[usize], element_size: usize) -> Vec<isize> {
    let mut strides = vec![element_size as isize; shape.len()];
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1] as isize;
    }
    strides
}

/// Merge dimensions 0 and 1 into one (the get-item recursion step)
pub(crate) fn flatten_shape(shape: &[usize]) -> Vec<usize> {
    if shape.len() == 1 {
        vec![]
    } else {
        let mut out = vec![shape[0] * shape[1]];
        out.extend_from_slice(&shape[2..]);
        out
    }
}

/// Drop the outermost stride (paired with [`flatten_shape`])
pub(crate) fn flatten_strides(strides: &[isize]) -> Vec<isize> {
    if strides.len() == 1 {
        vec![]
    } else {
        strides[1..].to_vec()
    }
}
