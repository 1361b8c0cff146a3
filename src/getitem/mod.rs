//! Get-item: slice interpretation over strided views
//!
//! Two interpreters share one entry point. When no slice item is advanced
//! and no identities are attached, the request is answered purely by
//! rewriting shape, strides, and byte offset over the same buffer. As soon
//! as an index array participates (or identities must be regathered), the
//! view is packed and the request runs as an index-carry gather into a new
//! buffer.
//!
//! Both interpreters work on a view with a synthetic length-1 leading
//! dimension, which collects the output geometry as the recursion unwinds;
//! the entry point strips it from the result.

mod bystrides;
mod carry;

use crate::error::{Error, Result};
use crate::slice::Slice;
use crate::view::PrimitiveView;

impl PrimitiveView {
    /// Apply a slice request to this view
    ///
    /// Scalars cannot be sliced. Field selections are rejected outright
    /// (primitive arrays have no fields), and option-type or jagged items
    /// are deferred to the variable-length node hierarchy.
    pub fn getitem(&self, slice: &Slice) -> Result<PrimitiveView> {
        if self.is_scalar() {
            return Err(Error::ScalarIndex);
        }
        if let Some(name) = slice.field_name() {
            return Err(Error::NoFields {
                name: name.to_string(),
            });
        }
        if slice.has_missing_or_jagged() {
            return Err(Error::DeferredSlice);
        }
        if slice.is_empty() {
            return Ok(self.clone());
        }

        if !slice.is_advanced() && self.identities().is_none() {
            let next = leading_dim(self);
            let out = bystrides::getitem_bystrides(&next, slice.items(), 1)?;
            Ok(strip_leading_dim(&out))
        } else {
            let safe = self.to_contiguous()?;
            let next = leading_dim(&safe);
            let out = carry::getitem_next(
                &next,
                slice.items(),
                &[0],
                &[],
                1,
                next.strides()[0],
                true,
            )?;
            Ok(strip_leading_dim(&out))
        }
    }
}

/// Prepend the synthetic length-1 dimension whose stride spans the whole
/// array
fn leading_dim(view: &PrimitiveView) -> PrimitiveView {
    let mut shape = vec![1];
    shape.extend_from_slice(view.shape());
    let mut strides = vec![view.shape()[0] as isize * view.strides()[0]];
    strides.extend_from_slice(view.strides());
    view.rebuild(
        view.buffer().clone(),
        shape,
        strides,
        view.byte_offset(),
        view.identities().cloned(),
    )
}

fn strip_leading_dim(out: &PrimitiveView) -> PrimitiveView {
    out.rebuild(
        out.buffer().clone(),
        out.shape()[1..].to_vec(),
        out.strides()[1..].to_vec(),
        out.byte_offset(),
        out.identities().cloned(),
    )
}
