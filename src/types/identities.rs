//! Row-identity (provenance) tables attached to views

use crate::error::{Error, Result};

/// One identity per logical row of a view
///
/// Every view-producing operation either propagates or regathers the table,
/// keeping its length equal to the view's logical length at all times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identities {
    data: Vec<i64>,
}

impl Identities {
    /// Fresh identities `0..length`
    pub fn new(length: usize) -> Self {
        Identities {
            data: (0..length as i64).collect(),
        }
    }

    pub fn from_vec(data: Vec<i64>) -> Self {
        Identities { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, at: usize) -> i64 {
        self.data[at]
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.data
    }

    /// Regather through a carry: output row `i` takes identity `carry[i]`
    pub fn carried(&self, carry: &[i64]) -> Result<Identities> {
        let mut data = Vec::with_capacity(carry.len());
        for &row in carry {
            if row < 0 || row as usize >= self.data.len() {
                return Err(Error::IndexOutOfRange {
                    index: row,
                    length: self.data.len(),
                });
            }
            data.push(self.data[row as usize]);
        }
        Ok(Identities { data })
    }
}
