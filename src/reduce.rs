//! Segmented reductions
//!
//! Callers describe a partition of a 1-D view into groups with a `parents`
//! table (per-element group id) and an `outlength` (group count including
//! empty groups). Each reducer folds every group to one slot of the output,
//! widening integers to 64 bits so narrow kinds cannot overflow. Half and
//! complex kinds are rejected; that gap is deliberate.

use crate::error::{Error, Result};
use crate::nodes::{Node, OptionNode, RegularNode};
use crate::types::{DType, Element};
use crate::view::PrimitiveView;

/// Grouped reduction operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Count,
    CountNonzero,
    Sum,
    Prod,
    Any,
    All,
    Min,
    Max,
}

impl Reducer {
    /// Element kind of the reduction output for a given input kind
    pub fn return_dtype(self, dtype: DType) -> Result<DType> {
        if dtype == DType::F16 || dtype.is_complex() {
            return Err(Error::UnsupportedReduction { dtype });
        }
        Ok(match self {
            Reducer::Count | Reducer::CountNonzero => DType::I64,
            Reducer::Any | Reducer::All => DType::Bool,
            Reducer::Sum | Reducer::Prod => match dtype {
                DType::Bool | DType::I8 | DType::I16 | DType::I32 | DType::I64 => DType::I64,
                DType::U8 | DType::U16 | DType::U32 | DType::U64 => DType::U64,
                other => other,
            },
            Reducer::Min | Reducer::Max => dtype,
        })
    }
}

/// Fold each element into its group's accumulator
fn segmented<T, A>(
    values: Vec<T>,
    parents: &[i64],
    outlength: usize,
    init: A,
    fold: impl Fn(A, T) -> A,
) -> Vec<A>
where
    T: Copy,
    A: Copy,
{
    let mut out = vec![init; outlength];
    for (i, value) in values.into_iter().enumerate() {
        let group = parents[i] as usize;
        out[group] = fold(out[group], value);
    }
    out
}

impl PrimitiveView {
    /// Reduce each group to one value, in group-id order
    ///
    /// `mask: true` wraps the result in an option node marking empty groups
    /// invalid; `keepdims: true` wraps it in a length-1 regular node so the
    /// output keeps the input's nesting depth.
    pub fn reduce(
        &self,
        reducer: Reducer,
        parents: &[i64],
        outlength: usize,
        mask: bool,
        keepdims: bool,
    ) -> Result<Node> {
        if self.ndim() != 1 {
            return Err(Error::TooManyDimensions);
        }
        let length = self.len()?;
        if parents.len() != length {
            return Err(Error::ShapeMismatch {
                left: vec![length],
                right: vec![parents.len()],
            });
        }
        reducer.return_dtype(self.dtype())?;

        let mut counts = vec![0usize; outlength];
        for &parent in parents {
            if parent < 0 || parent as usize >= outlength {
                return Err(Error::IndexOutOfRange {
                    index: parent,
                    length: outlength,
                });
            }
            counts[parent as usize] += 1;
        }

        macro_rules! fold {
            ($t:ty, $init:expr, $f:expr) => {
                PrimitiveView::from_vec(segmented(
                    self.to_vec::<$t>()?,
                    parents,
                    outlength,
                    $init,
                    $f,
                ))
            };
        }
        macro_rules! arith {
            ($acc:ty, $init:expr, $op:tt) => {
                match self.dtype() {
                    DType::Bool => fold!(bool, $init as $acc, |a, v| a $op (v as $acc)),
                    DType::I8 => fold!(i8, $init as i64, |a, v| a $op (v as i64)),
                    DType::I16 => fold!(i16, $init as i64, |a, v| a $op (v as i64)),
                    DType::I32 => fold!(i32, $init as i64, |a, v| a $op (v as i64)),
                    DType::I64 => fold!(i64, $init as i64, |a, v| a $op v),
                    DType::U8 => fold!(u8, $init as u64, |a, v| a $op (v as u64)),
                    DType::U16 => fold!(u16, $init as u64, |a, v| a $op (v as u64)),
                    DType::U32 => fold!(u32, $init as u64, |a, v| a $op (v as u64)),
                    DType::U64 => fold!(u64, $init as u64, |a, v| a $op v),
                    DType::F32 => fold!(f32, $init as f32, |a, v| a $op v),
                    DType::F64 => fold!(f64, $init as f64, |a, v| a $op v),
                    dtype => return Err(Error::UnsupportedReduction { dtype }),
                }
            };
        }
        macro_rules! ordered {
            ($init_int:ident, $init_float:ident, $f:expr) => {
                match self.dtype() {
                    DType::Bool => fold!(bool, Reducer::Min == reducer, |a: bool, v: bool| {
                        if reducer == Reducer::Min { a && v } else { a || v }
                    }),
                    DType::I8 => fold!(i8, i8::$init_int, $f),
                    DType::I16 => fold!(i16, i16::$init_int, $f),
                    DType::I32 => fold!(i32, i32::$init_int, $f),
                    DType::I64 => fold!(i64, i64::$init_int, $f),
                    DType::U8 => fold!(u8, u8::$init_int, $f),
                    DType::U16 => fold!(u16, u16::$init_int, $f),
                    DType::U32 => fold!(u32, u32::$init_int, $f),
                    DType::U64 => fold!(u64, u64::$init_int, $f),
                    DType::F32 => fold!(f32, f32::$init_float, $f),
                    DType::F64 => fold!(f64, f64::$init_float, $f),
                    dtype => return Err(Error::UnsupportedReduction { dtype }),
                }
            };
        }
        macro_rules! each_kind {
            ($init:expr, $f:expr) => {
                match self.dtype() {
                    DType::Bool => fold!(bool, $init, $f),
                    DType::I8 => fold!(i8, $init, $f),
                    DType::I16 => fold!(i16, $init, $f),
                    DType::I32 => fold!(i32, $init, $f),
                    DType::I64 => fold!(i64, $init, $f),
                    DType::U8 => fold!(u8, $init, $f),
                    DType::U16 => fold!(u16, $init, $f),
                    DType::U32 => fold!(u32, $init, $f),
                    DType::U64 => fold!(u64, $init, $f),
                    DType::F32 => fold!(f32, $init, $f),
                    DType::F64 => fold!(f64, $init, $f),
                    dtype => return Err(Error::UnsupportedReduction { dtype }),
                }
            };
        }

        let reduced = match reducer {
            Reducer::Count => {
                PrimitiveView::from_vec(counts.iter().map(|&c| c as i64).collect::<Vec<i64>>())
            }
            Reducer::CountNonzero => {
                each_kind!(0i64, |a, v| a + Element::is_nonzero(v) as i64)
            }
            Reducer::Sum => arith!(i64, 0, +),
            Reducer::Prod => arith!(i64, 1, *),
            Reducer::Any => each_kind!(false, |a, v| a || Element::is_nonzero(v)),
            Reducer::All => each_kind!(true, |a, v| a && Element::is_nonzero(v)),
            Reducer::Min => ordered!(MAX, INFINITY, |a, v| if v < a { v } else { a }),
            Reducer::Max => ordered!(MIN, NEG_INFINITY, |a, v| if v > a { v } else { a }),
        };

        let mut node = Node::Primitive(reduced);
        if mask {
            let validity: Vec<bool> = counts.iter().map(|&c| c > 0).collect();
            node = Node::Option(OptionNode::new(validity, node));
        }
        if keepdims {
            node = Node::Regular(RegularNode::new(node, 1));
        }
        Ok(node)
    }
}
