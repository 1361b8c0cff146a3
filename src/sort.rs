//! Segmented sort and argsort
//!
//! Groups are contiguous sub-ranges of a 1-D view, delimited by `starts`
//! (the next group's start, or the view's end, closes each range). Sorting
//! never crosses a group boundary. `argsort` returns indices local to each
//! group, the provenance form callers use to reorder sibling nodes.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::types::{DType, Element};
use crate::view::PrimitiveView;

/// Resolve group begin/end pairs against a view of `length` elements
fn group_ranges(starts: &[i64], outlength: usize, length: usize) -> Result<Vec<(usize, usize)>> {
    if starts.len() < outlength {
        return Err(Error::ShapeMismatch {
            left: vec![outlength],
            right: vec![starts.len()],
        });
    }
    let mut ranges = Vec::with_capacity(outlength);
    for group in 0..outlength {
        let begin = starts[group];
        let end = match starts.get(group + 1) {
            Some(&next) => next,
            None => length as i64,
        };
        if begin < 0 || end < begin || end > length as i64 {
            return Err(Error::IndexOutOfRange {
                index: begin,
                length,
            });
        }
        ranges.push((begin as usize, end as usize));
    }
    Ok(ranges)
}

fn compare<T: PartialOrd>(a: &T, b: &T, ascending: bool) -> Ordering {
    let ord = a.partial_cmp(b).unwrap_or(Ordering::Equal);
    if ascending { ord } else { ord.reverse() }
}

fn sort_typed<T>(
    mut values: Vec<T>,
    ranges: &[(usize, usize)],
    ascending: bool,
    stable: bool,
) -> Vec<T>
where
    T: Element + PartialOrd,
{
    for &(begin, end) in ranges {
        let segment = &mut values[begin..end];
        if stable {
            segment.sort_by(|a, b| compare(a, b, ascending));
        } else {
            segment.sort_unstable_by(|a, b| compare(a, b, ascending));
        }
    }
    values
}

fn argsort_typed<T>(
    values: &[T],
    ranges: &[(usize, usize)],
    ascending: bool,
    stable: bool,
) -> Vec<i64>
where
    T: Element + PartialOrd,
{
    let mut out = Vec::with_capacity(values.len());
    for &(begin, end) in ranges {
        let mut local: Vec<usize> = (0..end - begin).collect();
        if stable {
            local.sort_by(|&i, &j| compare(&values[begin + i], &values[begin + j], ascending));
        } else {
            local.sort_unstable_by(|&i, &j| {
                compare(&values[begin + i], &values[begin + j], ascending)
            });
        }
        out.extend(local.into_iter().map(|i| i as i64));
    }
    out
}

macro_rules! sortable_kinds {
    ($view:expr, $mac:ident) => {
        match $view.dtype() {
            DType::Bool => $mac!(bool),
            DType::I8 => $mac!(i8),
            DType::U8 => $mac!(u8),
            DType::I16 => $mac!(i16),
            DType::U16 => $mac!(u16),
            DType::I32 => $mac!(i32),
            DType::U32 => $mac!(u32),
            DType::I64 => $mac!(i64),
            DType::U64 => $mac!(u64),
            DType::F32 => $mac!(f32),
            DType::F64 => $mac!(f64),
            dtype => return Err(Error::UnsupportedReduction { dtype }),
        }
    };
}

impl PrimitiveView {
    /// Sort each group's values in place of their group, leaving group
    /// boundaries where they were
    pub fn sort(
        &self,
        starts: &[i64],
        outlength: usize,
        ascending: bool,
        stable: bool,
    ) -> Result<PrimitiveView> {
        if self.ndim() != 1 {
            return Err(Error::TooManyDimensions);
        }
        let ranges = group_ranges(starts, outlength, self.len()?)?;
        macro_rules! run {
            ($t:ty) => {
                PrimitiveView::from_vec(sort_typed(
                    self.to_vec::<$t>()?,
                    &ranges,
                    ascending,
                    stable,
                ))
            };
        }
        Ok(sortable_kinds!(self, run).with_parameters(self.parameters().clone()))
    }

    /// Per-group sort order as indices local to each group
    pub fn argsort(
        &self,
        starts: &[i64],
        outlength: usize,
        ascending: bool,
        stable: bool,
    ) -> Result<PrimitiveView> {
        if self.ndim() != 1 {
            return Err(Error::TooManyDimensions);
        }
        let ranges = group_ranges(starts, outlength, self.len()?)?;
        macro_rules! run {
            ($t:ty) => {
                PrimitiveView::from_vec(argsort_typed(
                    &self.to_vec::<$t>()?,
                    &ranges,
                    ascending,
                    stable,
                ))
            };
        }
        Ok(sortable_kinds!(self, run))
    }

    /// Lexicographic sort of length-delimited byte strings
    ///
    /// `offsets` delimits the strings (`offsets[i]..offsets[i+1]` is string
    /// `i`). Returns the reordered bytes together with the offsets of the
    /// sorted strings.
    pub fn sort_strings(
        &self,
        offsets: &[i64],
        ascending: bool,
        stable: bool,
    ) -> Result<(PrimitiveView, Vec<i64>)> {
        if self.dtype() != DType::U8 || self.ndim() != 1 {
            return Err(Error::UnsupportedElementKind {
                dtype: self.dtype(),
            });
        }
        let bytes = self.to_vec::<u8>()?;

        let mut strings: Vec<&[u8]> = Vec::with_capacity(offsets.len().saturating_sub(1));
        for window in offsets.windows(2) {
            let (begin, end) = (window[0], window[1]);
            if begin < 0 || end < begin || end > bytes.len() as i64 {
                return Err(Error::IndexOutOfRange {
                    index: end,
                    length: bytes.len(),
                });
            }
            strings.push(&bytes[begin as usize..end as usize]);
        }

        let by = |a: &&[u8], b: &&[u8]| {
            let ord = a.cmp(b);
            if ascending { ord } else { ord.reverse() }
        };
        if stable {
            strings.sort_by(by);
        } else {
            strings.sort_unstable_by(by);
        }

        let mut sorted = Vec::with_capacity(bytes.len());
        let mut new_offsets = Vec::with_capacity(strings.len() + 1);
        new_offsets.push(0);
        for string in strings {
            sorted.extend_from_slice(string);
            new_offsets.push(sorted.len() as i64);
        }
        Ok((
            PrimitiveView::from_vec(sorted).with_parameters(self.parameters().clone()),
            new_offsets,
        ))
    }
}
