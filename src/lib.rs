//! jagbuf - Strided primitive-array node for columnar jagged data
//!
//! The primitive array wraps one typed little-endian buffer together with
//! shape/stride/byte-offset metadata and implements NumPy-compatible
//! slicing, contiguity normalization, type-promoting concatenation, and
//! grouped reduction/sort dispatch over that buffer. It is the flat leaf of
//! a larger family of nested, variable-length array nodes.
//!
//! # Features
//!
//! - Zero-copy basic slicing (picks, ranges, ellipsis, new axes) by pure
//!   stride rewriting
//! - Advanced indexing (integer arrays, boolean masks) by index-carry gather
//! - Cross-kind merge following NumPy's promotion rules
//! - Segmented reduce/sort/argsort over caller-supplied group boundaries
//! - Optional per-row identity (provenance) tables, regathered consistently
//!   by every view-producing operation
//!
//! # Example
//!
//! ```rust
//! use jagbuf::{PrimitiveView, Slice, SliceItem};
//!
//! let view = PrimitiveView::from_shape_vec(vec![2, 3], vec![1i32, 2, 3, 4, 5, 6]).unwrap();
//!
//! // picking a row is a zero-copy stride rewrite
//! let row = view.getitem(&Slice::of(SliceItem::At(1)).unwrap()).unwrap();
//! assert!(row.buffer().ptr_eq(view.buffer()));
//! assert_eq!(row.to_vec::<i32>().unwrap(), vec![4, 5, 6]);
//!
//! // an index array triggers a gather into a fresh buffer
//! let picked = view
//!     .getitem(&Slice::of(SliceItem::array(vec![1, 0, 1])).unwrap())
//!     .unwrap();
//! assert_eq!(picked.shape(), &[3, 3]);
//! ```

pub mod error;
pub mod merge;
pub mod nodes;
pub mod reduce;
pub mod slice;
pub mod types;
pub mod view;

mod contiguous;
mod getitem;
mod sort;

#[cfg(feature = "ndarray")]
pub mod ndarray_ext;

// Re-export common types at crate root
pub use error::{Error, Result};
pub use merge::promoted;
pub use nodes::{Node, OptionNode, RegularNode};
pub use reduce::Reducer;
pub use slice::{Slice, SliceItem};
pub use types::{Backend, Buffer, DType, Element, Form, Identities, Parameters};
pub use view::PrimitiveView;

#[cfg(feature = "ndarray")]
pub use ndarray_ext::NdarrayError;
