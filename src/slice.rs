//! Slice requests: ordered sequences of per-dimension items
//!
//! A [`Slice`] is parsed once at construction and then interpreted by the
//! get-item machinery, either as stride rewriting (zero-copy) or as an
//! index-carry gather, depending on whether any item is "advanced"
//! (an integer index array, possibly derived from a boolean mask).

use crate::error::{Error, Result};

/// One item of a slice request, addressing one dimension (or inserting one)
#[derive(Debug, Clone, PartialEq)]
pub enum SliceItem {
    /// Pick a single position, dropping the dimension
    At(i64),
    /// NumPy-style range with optional bounds; `step` defaults to 1 and must
    /// be nonzero
    Range {
        start: Option<i64>,
        stop: Option<i64>,
        step: i64,
    },
    /// Expand to full ranges over the dimensions the rest of the slice skips
    Ellipsis,
    /// Insert a length-1 dimension
    NewAxis,
    /// Integer index array (advanced indexing); `shape` is the index array's
    /// own shape and `index` its row-major flattening
    Array { index: Vec<i64>, shape: Vec<usize> },
    /// Select a named field: always rejected by primitive arrays
    Field(String),
    /// Select several named fields: always rejected by primitive arrays
    Fields(Vec<String>),
    /// Option-type selection; needs the variable-length node hierarchy
    Missing,
    /// Jagged (per-row variable-length) selection; needs the variable-length
    /// node hierarchy
    Jagged,
}

impl SliceItem {
    /// Full range `:` with step 1
    pub fn full_range() -> Self {
        SliceItem::Range {
            start: None,
            stop: None,
            step: 1,
        }
    }

    /// Range with explicit step
    pub fn range(start: Option<i64>, stop: Option<i64>, step: i64) -> Self {
        SliceItem::Range { start, stop, step }
    }

    /// 1-D integer index array
    pub fn array(index: Vec<i64>) -> Self {
        let shape = vec![index.len()];
        SliceItem::Array { index, shape }
    }

    /// Boolean mask, converted to the integer positions of its `true` slots
    pub fn from_mask(mask: &[bool]) -> Self {
        let index: Vec<i64> = mask
            .iter()
            .enumerate()
            .filter(|&(_, &keep)| keep)
            .map(|(i, _)| i as i64)
            .collect();
        SliceItem::array(index)
    }

    /// Whether this item consumes one dimension of the sliced array
    pub fn consumes_dimension(&self) -> bool {
        matches!(
            self,
            SliceItem::At(_) | SliceItem::Range { .. } | SliceItem::Array { .. }
        )
    }

    pub fn is_advanced(&self) -> bool {
        matches!(self, SliceItem::Array { .. })
    }
}

/// An ordered, validated slice request
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    items: Vec<SliceItem>,
}

impl Slice {
    /// Validate and seal a sequence of slice items
    ///
    /// Rejects zero steps and advanced index arrays of differing lengths
    /// (once two or more index arrays participate they broadcast
    /// element-wise, so their lengths must already agree).
    pub fn new(items: Vec<SliceItem>) -> Result<Self> {
        let mut advanced_len: Option<usize> = None;
        for item in &items {
            match item {
                SliceItem::Range { step, .. } if *step == 0 => {
                    return Err(Error::ZeroStep);
                }
                SliceItem::Array { index, .. } => {
                    if let Some(expected) = advanced_len {
                        if index.len() != expected {
                            return Err(Error::AdvancedIndexMismatch {
                                expected,
                                actual: index.len(),
                            });
                        }
                    } else {
                        advanced_len = Some(index.len());
                    }
                }
                _ => {}
            }
        }
        Ok(Slice { items })
    }

    /// A single-item slice
    pub fn of(item: SliceItem) -> Result<Self> {
        Slice::new(vec![item])
    }

    pub fn items(&self) -> &[SliceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any item triggers advanced (carry-path) indexing
    pub fn is_advanced(&self) -> bool {
        self.items.iter().any(SliceItem::is_advanced)
    }

    /// Number of dimensions the slice consumes
    pub fn dim_length(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.consumes_dimension())
            .count()
    }

    pub(crate) fn has_missing_or_jagged(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, SliceItem::Missing | SliceItem::Jagged))
    }

    pub(crate) fn field_name(&self) -> Option<&str> {
        self.items.iter().find_map(|item| match item {
            SliceItem::Field(name) => Some(name.as_str()),
            SliceItem::Fields(names) => names.first().map(String::as_str),
            _ => None,
        })
    }
}

/// Normalize a range against a dimension of `length`, NumPy-style
///
/// Negative bounds wrap once; absent bounds extend to the array edge in the
/// step's direction. Returns the resolved `start` plus the number of
/// addressed positions.
pub(crate) fn regularize_range(
    start: Option<i64>,
    stop: Option<i64>,
    step: i64,
    length: usize,
) -> (i64, usize) {
    debug_assert!(step != 0);
    let len = length as i64;
    let (start, stop) = if step > 0 {
        let mut start = match start {
            None => 0,
            Some(s) if s < 0 => s + len,
            Some(s) => s,
        };
        start = start.clamp(0, len);
        let mut stop = match stop {
            None => len,
            Some(s) if s < 0 => s + len,
            Some(s) => s,
        };
        stop = stop.clamp(0, len);
        if stop < start {
            stop = start;
        }
        (start, stop)
    } else {
        let mut start = match start {
            None => len - 1,
            Some(s) if s < 0 => s + len,
            Some(s) => s,
        };
        start = start.clamp(-1, len - 1);
        let mut stop = match stop {
            None => -1,
            Some(s) if s < 0 => s + len,
            Some(s) => s,
        };
        stop = stop.clamp(-1, len - 1);
        if stop > start {
            stop = start;
        }
        (start, stop)
    };

    let numer = (start - stop).unsigned_abs();
    let denom = step.unsigned_abs();
    let lenhead = numer.div_ceil(denom) as usize;
    (start, lenhead)
}
