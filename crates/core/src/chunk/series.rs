//! Single-column chunks.

use super::align::{align, range_index};
use super::reduce::Reduction;
use crate::error::{Error, Result};
use crate::value::{BinaryOp, Value};
use alloc::string::String;
use alloc::vec::Vec;

/// A labelled column of values.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    name: Option<String>,
    index: Vec<Value>,
    values: Vec<Value>,
}

impl Series {
    /// Creates a series from an index and values of equal length.
    pub fn new(index: Vec<Value>, values: Vec<Value>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(Error::length_mismatch(index.len(), values.len()));
        }
        Ok(Self {
            name: None,
            index,
            values,
        })
    }

    /// Creates a series with a positional index `0..len`.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self {
            name: None,
            index: range_index(values.len()),
            values,
        }
    }

    /// Creates an empty series.
    pub fn empty() -> Self {
        Self {
            name: None,
            index: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Sets the series name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub(crate) fn with_name_opt(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Replaces the index.
    pub fn with_index(mut self, index: Vec<Value>) -> Result<Self> {
        if index.len() != self.values.len() {
            return Err(Error::length_mismatch(self.values.len(), index.len()));
        }
        self.index = index;
        Ok(self)
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn index(&self) -> &[Value] {
        &self.index
    }

    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at the first occurrence of `label`.
    pub fn get(&self, label: &Value) -> Option<&Value> {
        self.index
            .iter()
            .position(|l| l == label)
            .map(|i| &self.values[i])
    }

    /// Reduces all values to one.
    pub fn reduce(&self, reduction: Reduction) -> Result<Value> {
        reduction.apply(self.values.iter())
    }

    pub fn sum(&self) -> Result<Value> {
        self.reduce(Reduction::Sum)
    }

    pub fn count(&self) -> Value {
        super::reduce::count_values(self.values.iter())
    }

    pub fn mean(&self) -> Result<Value> {
        self.reduce(Reduction::Mean)
    }

    /// Applies `f` to every value, keeping index and name.
    pub fn map_values<F>(&self, mut f: F) -> Result<Series>
    where
        F: FnMut(&Value) -> Result<Value>,
    {
        let values = self.values.iter().map(&mut f).collect::<Result<Vec<_>>>()?;
        Ok(Series {
            name: self.name.clone(),
            index: self.index.clone(),
            values,
        })
    }

    /// Applies `op` with a scalar. `reversed` puts the scalar on the left.
    pub fn binary_scalar(&self, op: BinaryOp, rhs: &Value, reversed: bool) -> Result<Series> {
        self.map_values(|v| {
            if reversed {
                rhs.binary(op, v)
            } else {
                v.binary(op, rhs)
            }
        })
    }

    /// Applies `op` element-wise after aligning both indexes.
    ///
    /// Labels present on one side only produce Null.
    pub fn binary(&self, op: BinaryOp, rhs: &Series) -> Result<Series> {
        self.zip_aligned(rhs, |l, r| match (l, r) {
            (Some(a), Some(b)) => a.binary(op, b),
            _ => Ok(Value::Null),
        })
    }

    /// Adds element-wise after aligning, treating a label missing on one side as `fill`.
    pub fn add_fill(&self, rhs: &Series, fill: &Value) -> Result<Series> {
        self.zip_aligned(rhs, |l, r| {
            let a = l.unwrap_or(fill);
            let b = r.unwrap_or(fill);
            a.binary(BinaryOp::Add, b)
        })
    }

    fn zip_aligned<F>(&self, rhs: &Series, mut f: F) -> Result<Series>
    where
        F: FnMut(Option<&Value>, Option<&Value>) -> Result<Value>,
    {
        let alignment = align(&self.index, &rhs.index);
        let values = alignment
            .left
            .iter()
            .zip(alignment.right.iter())
            .map(|(l, r)| f(l.map(|i| &self.values[i]), r.map(|i| &rhs.values[i])))
            .collect::<Result<Vec<_>>>()?;
        let name = if self.name == rhs.name {
            self.name.clone()
        } else {
            None
        };
        Ok(Series {
            name,
            index: alignment.labels,
            values,
        })
    }

    /// Concatenates series along rows. The first part's name wins.
    pub fn concat(parts: &[&Series]) -> Series {
        let total = parts.iter().map(|s| s.len()).sum();
        let mut index = Vec::with_capacity(total);
        let mut values = Vec::with_capacity(total);
        for part in parts {
            index.extend(part.index.iter().cloned());
            values.extend(part.values.iter().cloned());
        }
        Series {
            name: parts.first().and_then(|s| s.name.clone()),
            index,
            values,
        }
    }

    /// Returns the rows at the given positions.
    pub fn take(&self, positions: &[usize]) -> Series {
        Series {
            name: self.name.clone(),
            index: positions.iter().map(|&i| self.index[i].clone()).collect(),
            values: positions.iter().map(|&i| self.values[i].clone()).collect(),
        }
    }

    /// Returns the first `n` rows.
    pub fn head(&self, n: usize) -> Series {
        let end = n.min(self.len());
        self.slice(0, end)
    }

    /// Returns the last `n` rows.
    pub fn tail(&self, n: usize) -> Series {
        let start = self.len().saturating_sub(n);
        self.slice(start, self.len())
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> Series {
        Series {
            name: self.name.clone(),
            index: self.index[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        }
    }
}
