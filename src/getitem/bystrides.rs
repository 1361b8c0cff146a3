//! Zero-copy slice interpretation by stride rewriting
//!
//! Every step consumes one slice item, merges the two outermost dimensions
//! of the working view, and rebuilds the output geometry around the
//! recursion's result. The buffer is never touched.

use crate::error::{Error, Result};
use crate::slice::{SliceItem, regularize_range};
use crate::view::{PrimitiveView, flatten_shape, flatten_strides};

pub(super) fn getitem_bystrides(
    view: &PrimitiveView,
    items: &[SliceItem],
    length: usize,
) -> Result<PrimitiveView> {
    let Some((head, tail)) = items.split_first() else {
        return Ok(view.clone());
    };
    match head {
        SliceItem::At(at) => bystrides_at(view, *at, tail, length),
        SliceItem::Range { start, stop, step } => {
            bystrides_range(view, *start, *stop, *step, tail, length)
        }
        SliceItem::Ellipsis => bystrides_ellipsis(view, tail, length),
        SliceItem::NewAxis => bystrides_newaxis(view, tail, length),
        // advanced and deferred items never reach this interpreter
        _ => Err(Error::MixedSliceKind),
    }
}

fn bystrides_at(
    view: &PrimitiveView,
    at: i64,
    tail: &[SliceItem],
    length: usize,
) -> Result<PrimitiveView> {
    if view.ndim() < 2 {
        return Err(Error::TooManyDimensions);
    }
    let dim = view.shape()[1];
    let mut regular = at;
    if regular < 0 {
        regular += dim as i64;
    }
    if regular < 0 || regular >= dim as i64 {
        return Err(Error::IndexOutOfRange {
            index: at,
            length: dim,
        });
    }

    let next = view.rebuild(
        view.buffer().clone(),
        flatten_shape(view.shape()),
        flatten_strides(view.strides()),
        view.byte_offset() + regular as isize * view.strides()[1],
        view.identities().cloned(),
    );
    let out = getitem_bystrides(&next, tail, length)?;

    let mut outshape = vec![length];
    outshape.extend_from_slice(&out.shape()[1..]);
    Ok(out.rebuild(
        out.buffer().clone(),
        outshape,
        out.strides().to_vec(),
        out.byte_offset(),
        out.identities().cloned(),
    ))
}

fn bystrides_range(
    view: &PrimitiveView,
    start: Option<i64>,
    stop: Option<i64>,
    step: i64,
    tail: &[SliceItem],
    length: usize,
) -> Result<PrimitiveView> {
    if view.ndim() < 2 {
        return Err(Error::TooManyDimensions);
    }
    let dim = view.shape()[1];
    let (start, lenhead) = regularize_range(start, stop, step, dim);

    let next = view.rebuild(
        view.buffer().clone(),
        flatten_shape(view.shape()),
        flatten_strides(view.strides()),
        view.byte_offset() + start as isize * view.strides()[1],
        view.identities().cloned(),
    );
    let out = getitem_bystrides(&next, tail, length * lenhead)?;

    let mut outshape = vec![length, lenhead];
    outshape.extend_from_slice(&out.shape()[1..]);
    let mut outstrides = vec![view.strides()[0], view.strides()[1] * step as isize];
    outstrides.extend_from_slice(&out.strides()[1..]);
    Ok(out.rebuild(
        out.buffer().clone(),
        outshape,
        outstrides,
        out.byte_offset(),
        out.identities().cloned(),
    ))
}

fn bystrides_ellipsis(
    view: &PrimitiveView,
    tail: &[SliceItem],
    length: usize,
) -> Result<PrimitiveView> {
    let mindepth = view.ndim();
    let tail_dims = tail.iter().filter(|item| item.consumes_dimension()).count();
    if tail.is_empty() || mindepth - 1 == tail_dims {
        // nothing left for the ellipsis to expand into
        getitem_bystrides(view, tail, length)
    } else {
        let mut items = vec![SliceItem::full_range(), SliceItem::Ellipsis];
        items.extend_from_slice(tail);
        getitem_bystrides(view, &items, length)
    }
}

fn bystrides_newaxis(
    view: &PrimitiveView,
    tail: &[SliceItem],
    length: usize,
) -> Result<PrimitiveView> {
    let out = getitem_bystrides(view, tail, length)?;

    let mut outshape = vec![length, 1];
    outshape.extend_from_slice(&out.shape()[1..]);
    let mut outstrides = vec![out.strides()[0]];
    outstrides.extend_from_slice(out.strides());
    Ok(out.rebuild(
        out.buffer().clone(),
        outshape,
        outstrides,
        out.byte_offset(),
        out.identities().cloned(),
    ))
}
