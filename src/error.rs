//! Error types for jagbuf

use crate::types::{Backend, DType};
use std::error::Error as StdError;
use std::fmt;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Jagbuf-specific error type
///
/// Every operation fails fast at the first violated precondition; nothing is
/// silently coerced. Variants carry the offending values so a failure can be
/// reproduced from a bug report.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Shape and strides have different lengths
    ShapeStrideMismatch { shape_len: usize, strides_len: usize },
    /// Identity table length disagrees with the view's logical length
    IdentitiesLengthMismatch { identities_len: usize, length: usize },
    /// Get-item on a scalar (empty-shape) view
    ScalarIndex,
    /// Logical length requested from a scalar view
    ScalarLength,
    /// Index outside the addressed dimension (after negative wraparound)
    IndexOutOfRange { index: i64, length: usize },
    /// Slice item addresses a dimension beyond the view's rank
    TooManyDimensions,
    /// Range slice with a zero step
    ZeroStep,
    /// Fixed-size and variable-size slice items combined in one request
    MixedSliceKind,
    /// Advanced index arrays of different lengths in the same slice
    AdvancedIndexMismatch { expected: usize, actual: usize },
    /// Slice by field name on an array with no named fields
    NoFields { name: String },
    /// Missing/jagged slice items need the variable-length node hierarchy
    DeferredSlice,
    /// Trailing dimensions disagree between merge operands
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },
    /// Element-kind pair with no defined widening conversion
    UnsupportedMerge { left: DType, right: DType },
    /// Element kind with no reduction/sort kernels
    UnsupportedReduction { dtype: DType },
    /// Element kind not usable for the requested operation
    UnsupportedElementKind { dtype: DType },
    /// Buffer transfer between backends failed or is not linked in
    BackendCopy { from: Backend, to: Backend },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShapeStrideMismatch {
                shape_len,
                strides_len,
            } => write!(
                f,
                "shape has {} dimensions but strides has {}",
                shape_len, strides_len
            ),
            Error::IdentitiesLengthMismatch {
                identities_len,
                length,
            } => write!(
                f,
                "identity table length {} does not match logical length {}",
                identities_len, length
            ),
            Error::ScalarIndex => write!(f, "cannot get-item on a scalar"),
            Error::ScalarLength => write!(f, "scalar views have no logical length"),
            Error::IndexOutOfRange { index, length } => {
                write!(
                    f,
                    "index {} out of range for dimension of length {}",
                    index, length
                )
            }
            Error::TooManyDimensions => write!(f, "too many dimensions in slice"),
            Error::ZeroStep => write!(f, "slice step cannot be zero"),
            Error::MixedSliceKind => write!(
                f,
                "slice items can have all fixed-size dimensions or all var-sized \
                 dimensions, but not both in the same slice"
            ),
            Error::AdvancedIndexMismatch { expected, actual } => write!(
                f,
                "advanced index arrays must have matching lengths: expected {}, got {}",
                expected, actual
            ),
            Error::NoFields { name } => {
                write!(
                    f,
                    "cannot slice by field '{}': primitive arrays have no fields",
                    name
                )
            }
            Error::DeferredSlice => write!(
                f,
                "missing/jagged slice items require the variable-length node hierarchy"
            ),
            Error::ShapeMismatch { left, right } => {
                write!(
                    f,
                    "cannot merge arrays with different shapes: {:?} vs {:?}",
                    left, right
                )
            }
            Error::UnsupportedMerge { left, right } => {
                write!(f, "cannot merge element kind {:?} with {:?}", left, right)
            }
            Error::UnsupportedReduction { dtype } => {
                write!(f, "no reduction/sort kernels for element kind {:?}", dtype)
            }
            Error::UnsupportedElementKind { dtype } => {
                write!(f, "element kind {:?} not supported here", dtype)
            }
            Error::BackendCopy { from, to } => {
                write!(f, "cannot copy buffer from {:?} to {:?}", from, to)
            }
        }
    }
}

impl StdError for Error {}
