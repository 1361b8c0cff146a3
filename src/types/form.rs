//! Schema-form export used by the external type/introspection system

use super::DType;
use std::collections::BTreeMap;
use std::fmt;

/// Key-value annotations attached to a view (e.g. `"__array__": "byte"`)
pub type Parameters = BTreeMap<String, String>;

/// Abstract description of a primitive array: element kind, fixed inner
/// shape, and parameters. Everything a serializer or schema system needs,
/// with no reference to the underlying buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    dtype: DType,
    inner_shape: Vec<usize>,
    parameters: Parameters,
}

impl Form {
    pub fn new(dtype: DType, inner_shape: Vec<usize>, parameters: Parameters) -> Self {
        Form {
            dtype,
            inner_shape,
            parameters,
        }
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn element_size(&self) -> usize {
        self.dtype.element_size()
    }

    /// Fixed dimensions inside each logical row
    pub fn inner_shape(&self) -> &[usize] {
        &self.inner_shape
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Nesting depth counting the row dimension
    pub fn depth(&self) -> usize {
        self.inner_shape.len() + 1
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner_shape.is_empty() {
            write!(f, "{}", self.dtype.name())
        } else {
            write!(f, "{}{:?}", self.dtype.name(), self.inner_shape)
        }
    }
}
