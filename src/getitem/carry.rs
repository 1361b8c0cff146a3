//! Advanced slice interpretation by index-carry gather
//!
//! The working view is always contiguous here. `carry` holds, for each
//! output row at the current depth, the index of the source row it draws
//! from; each step multiplies those indices into the next-deeper dimension.
//! `advanced` tracks which output row each index-array item belongs to, so
//! that multiple index arrays select element-wise instead of forming an
//! outer product. When the items run out, one gather of `stride`-byte rows
//! materializes the result.

use crate::error::{Error, Result};
use crate::slice::{SliceItem, regularize_range};
use crate::types::{Buffer, Identities};
use crate::view::{PrimitiveView, flatten_shape, flatten_strides};

pub(super) fn getitem_next(
    view: &PrimitiveView,
    items: &[SliceItem],
    carry: &[i64],
    advanced: &[i64],
    length: usize,
    stride: isize,
    first: bool,
) -> Result<PrimitiveView> {
    let Some((head, tail)) = items.split_first() else {
        return gather(view, carry, stride);
    };
    match head {
        SliceItem::At(at) => next_at(view, *at, tail, carry, advanced, length, first),
        SliceItem::Range { start, stop, step } => {
            next_range(view, *start, *stop, *step, tail, carry, advanced, length, first)
        }
        SliceItem::Ellipsis => next_ellipsis(view, tail, carry, advanced, length, stride),
        SliceItem::NewAxis => next_newaxis(view, tail, carry, advanced, length, stride),
        SliceItem::Array { index, shape } => {
            next_array(view, index, shape, tail, carry, advanced, length, first)
        }
        SliceItem::Field(name) => Err(Error::NoFields {
            name: name.clone(),
        }),
        SliceItem::Fields(names) => Err(Error::NoFields {
            name: names.first().cloned().unwrap_or_default(),
        }),
        SliceItem::Missing | SliceItem::Jagged => Err(Error::DeferredSlice),
    }
}

/// Terminal gather: one `stride`-byte row per carry entry, packed into a
/// fresh buffer with identities regathered through the same carry
fn gather(view: &PrimitiveView, carry: &[i64], stride: isize) -> Result<PrimitiveView> {
    let width = stride as usize;
    let bytes = view.buffer().bytes();
    let mut out = vec![0u8; carry.len() * width];
    for (i, &row) in carry.iter().enumerate() {
        let src = (view.byte_offset() + row as isize * stride) as usize;
        out[i * width..(i + 1) * width].copy_from_slice(&bytes[src..src + width]);
    }

    let identities = match view.identities() {
        Some(ids) => Some(ids.carried(carry)?),
        None => None,
    };

    let mut shape = vec![carry.len()];
    shape.extend_from_slice(&view.shape()[1..]);
    let mut strides = vec![stride];
    strides.extend_from_slice(&view.strides()[1..]);
    Ok(view.rebuild(Buffer::from_bytes(out), shape, strides, 0, identities))
}

/// Merge the two outermost dimensions; identities ride along only on the
/// first step, where carry indices still address original rows
fn flattened(view: &PrimitiveView, first: bool) -> PrimitiveView {
    let identities: Option<Identities> = if first {
        view.identities().cloned()
    } else {
        None
    };
    view.rebuild(
        view.buffer().clone(),
        flatten_shape(view.shape()),
        flatten_strides(view.strides()),
        view.byte_offset(),
        identities,
    )
}

fn next_at(
    view: &PrimitiveView,
    at: i64,
    tail: &[SliceItem],
    carry: &[i64],
    advanced: &[i64],
    length: usize,
    first: bool,
) -> Result<PrimitiveView> {
    if view.ndim() < 2 {
        return Err(Error::TooManyDimensions);
    }
    let skip = view.shape()[1];
    let mut regular = at;
    if regular < 0 {
        regular += skip as i64;
    }
    if regular < 0 || regular >= skip as i64 {
        return Err(Error::IndexOutOfRange {
            index: at,
            length: skip,
        });
    }

    let next = flattened(view, first);
    let nextcarry: Vec<i64> = carry.iter().map(|&c| c * skip as i64 + regular).collect();
    let out = getitem_next(
        &next,
        tail,
        &nextcarry,
        advanced,
        length,
        next.strides()[0],
        false,
    )?;

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

#[allow(clippy::too_many_arguments)]
fn next_range(
    view: &PrimitiveView,
    start: Option<i64>,
    stop: Option<i64>,
    step: i64,
    tail: &[SliceItem],
    carry: &[i64],
    advanced: &[i64],
    length: usize,
    first: bool,
) -> Result<PrimitiveView> {
    if view.ndim() < 2 {
        return Err(Error::TooManyDimensions);
    }
    let skip = view.shape()[1];
    let (start, lenhead) = regularize_range(start, stop, step, skip);
    let next = flattened(view, first);

    let out = if advanced.is_empty() {
        let mut nextcarry = Vec::with_capacity(carry.len() * lenhead);
        for &c in carry {
            for j in 0..lenhead {
                nextcarry.push(c * skip as i64 + start + j as i64 * step);
            }
        }
        getitem_next(
            &next,
            tail,
            &nextcarry,
            advanced,
            length * lenhead,
            next.strides()[0],
            false,
        )?
    } else {
        // each sub-row inherits the advanced slot of its parent row
        let mut nextcarry = Vec::with_capacity(carry.len() * lenhead);
        let mut nextadvanced = Vec::with_capacity(carry.len() * lenhead);
        for (i, &c) in carry.iter().enumerate() {
            for j in 0..lenhead {
                nextcarry.push(c * skip as i64 + start + j as i64 * step);
                nextadvanced.push(advanced[i]);
            }
        }
        getitem_next(
            &next,
            tail,
            &nextcarry,
            &nextadvanced,
            length * lenhead,
            next.strides()[0],
            false,
        )?
    };

    let mut outshape = vec![length, lenhead];
    outshape.extend_from_slice(&out.shape()[1..]);
    let mut outstrides = vec![lenhead as isize * out.strides()[0]];
    outstrides.extend_from_slice(out.strides());
    Ok(out.rebuild(
        out.buffer().clone(),
        outshape,
        outstrides,
        out.byte_offset(),
        out.identities().cloned(),
    ))
}

fn next_ellipsis(
    view: &PrimitiveView,
    tail: &[SliceItem],
    carry: &[i64],
    advanced: &[i64],
    length: usize,
    stride: isize,
) -> Result<PrimitiveView> {
    let mindepth = view.ndim();
    let tail_dims = tail.iter().filter(|item| item.consumes_dimension()).count();
    if tail.is_empty() || mindepth - 1 == tail_dims {
        getitem_next(view, tail, carry, advanced, length, stride, false)
    } else {
        let mut items = vec![SliceItem::full_range(), SliceItem::Ellipsis];
        items.extend_from_slice(tail);
        getitem_next(view, &items, carry, advanced, length, stride, false)
    }
}

fn next_newaxis(
    view: &PrimitiveView,
    tail: &[SliceItem],
    carry: &[i64],
    advanced: &[i64],
    length: usize,
    stride: isize,
) -> Result<PrimitiveView> {
    let out = getitem_next(view, tail, carry, advanced, length, stride, false)?;

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

#[allow(clippy::too_many_arguments)]
fn next_array(
    view: &PrimitiveView,
    index: &[i64],
    ashape: &[usize],
    tail: &[SliceItem],
    carry: &[i64],
    advanced: &[i64],
    length: usize,
    first: bool,
) -> Result<PrimitiveView> {
    if view.ndim() < 2 {
        return Err(Error::TooManyDimensions);
    }
    let skip = view.shape()[1] as i64;

    let mut flathead = Vec::with_capacity(index.len());
    for &raw in index {
        let mut regular = raw;
        if regular < 0 {
            regular += skip;
        }
        if regular < 0 || regular >= skip {
            return Err(Error::IndexOutOfRange {
                index: raw,
                length: skip as usize,
            });
        }
        flathead.push(regular);
    }

    let next = flattened(view, first);

    if advanced.is_empty() {
        // first index array: its positions become the advanced slots
        let n = flathead.len();
        let mut nextcarry = Vec::with_capacity(carry.len() * n);
        let mut nextadvanced = Vec::with_capacity(carry.len() * n);
        for &c in carry {
            for (j, &h) in flathead.iter().enumerate() {
                nextcarry.push(c * skip + h);
                nextadvanced.push(j as i64);
            }
        }
        let out = getitem_next(
            &next,
            tail,
            &nextcarry,
            &nextadvanced,
            length * n,
            next.strides()[0],
            false,
        )?;

        let mut outshape = vec![length];
        outshape.extend_from_slice(ashape);
        outshape.extend_from_slice(&out.shape()[1..]);
        let mut outstrides = out.strides().to_vec();
        for &dim in ashape.iter().rev() {
            outstrides.insert(0, dim as isize * outstrides[0]);
        }
        // identities cannot follow an index array of more than one dimension
        let identities = if ashape.len() == 1 {
            out.identities().cloned()
        } else {
            None
        };
        Ok(out.rebuild(
            out.buffer().clone(),
            outshape,
            outstrides,
            out.byte_offset(),
            identities,
        ))
    } else {
        // later index arrays pair element-wise with the first one
        let mut nextcarry = Vec::with_capacity(carry.len());
        for (i, &c) in carry.iter().enumerate() {
            let slot = advanced[i] as usize;
            if slot >= flathead.len() {
                return Err(Error::AdvancedIndexMismatch {
                    expected: flathead.len(),
                    actual: slot,
                });
            }
            nextcarry.push(c * skip + flathead[slot]);
        }
        let array_length = ashape.first().copied().unwrap_or(0);
        let out = getitem_next(
            &next,
            tail,
            &nextcarry,
            advanced,
            length * array_length,
            next.strides()[0],
            false,
        )?;

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
}
