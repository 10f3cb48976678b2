//! Multi-column chunks.

use super::align::{align, range_index};
use super::reduce::Reduction;
use super::series::Series;
use crate::error::{Error, Result};
use crate::value::{BinaryOp, Value};
use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// A table of named columns sharing one index. Data is stored column-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    index: Vec<Value>,
    data: Vec<Vec<Value>>,
}

impl Frame {
    /// Creates a frame, checking that every column matches the index length.
    pub fn new(columns: Vec<String>, index: Vec<Value>, data: Vec<Vec<Value>>) -> Result<Self> {
        if columns.len() != data.len() {
            return Err(Error::length_mismatch(columns.len(), data.len()));
        }
        if let Some(col) = data.iter().find(|c| c.len() != index.len()) {
            return Err(Error::length_mismatch(index.len(), col.len()));
        }
        let distinct: BTreeSet<&String> = columns.iter().collect();
        if distinct.len() != columns.len() {
            return Err(Error::invalid_operation("duplicate column labels"));
        }
        Ok(Self {
            columns,
            index,
            data,
        })
    }

    /// Creates a frame from `(name, values)` pairs with a positional index.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let (names, data): (Vec<String>, Vec<Vec<Value>>) = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .unzip();
        let len = data.first().map(|c| c.len()).unwrap_or(0);
        Self::new(names, range_index(len), data)
    }

    /// Creates an empty frame with the given column labels.
    pub fn empty<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for name in columns.into_iter().map(Into::into) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        let data = vec![Vec::new(); names.len()];
        Self {
            columns: names,
            index: Vec::new(),
            data,
        }
    }

    /// Replaces the index.
    pub fn with_index(mut self, index: Vec<Value>) -> Result<Self> {
        if index.len() != self.len() {
            return Err(Error::length_mismatch(self.len(), index.len()));
        }
        self.index = index;
        Ok(self)
    }

    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn index(&self) -> &[Value] {
        &self.index
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns the position of a column label.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the raw values of a column.
    pub fn column_values(&self, name: &str) -> Result<&[Value]> {
        self.position(name)
            .map(|i| self.data[i].as_slice())
            .ok_or_else(|| Error::column_not_found(name))
    }

    /// Returns a column as a named series.
    pub fn column(&self, name: &str) -> Result<Series> {
        let values = self.column_values(name)?.to_vec();
        Ok(Series::new(self.index.clone(), values)?.with_name(name))
    }

    /// Selects a subset of columns, in the requested order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Frame> {
        let mut columns = Vec::with_capacity(names.len());
        let mut data = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            data.push(self.column_values(name)?.to_vec());
            columns.push(String::from(name));
        }
        Frame::new(columns, self.index.clone(), data)
    }

    /// Reduces each column to one value; the result is indexed by column label.
    pub fn reduce(&self, reduction: Reduction) -> Result<Series> {
        let values = self
            .data
            .iter()
            .map(|col| reduction.apply(col.iter()))
            .collect::<Result<Vec<_>>>()?;
        Series::new(self.column_labels(), values)
    }

    pub fn sum(&self) -> Result<Series> {
        self.reduce(Reduction::Sum)
    }

    pub fn count(&self) -> Result<Series> {
        self.reduce(Reduction::Count)
    }

    pub fn mean(&self) -> Result<Series> {
        self.reduce(Reduction::Mean)
    }

    pub(crate) fn column_labels(&self) -> Vec<Value> {
        self.columns.iter().map(|c| Value::String(c.clone())).collect()
    }

    /// Applies `f` to every cell.
    pub fn map_values<F>(&self, mut f: F) -> Result<Frame>
    where
        F: FnMut(&Value) -> Result<Value>,
    {
        let data = self
            .data
            .iter()
            .map(|col| col.iter().map(&mut f).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Frame {
            columns: self.columns.clone(),
            index: self.index.clone(),
            data,
        })
    }

    /// Applies `op` with a scalar. `reversed` puts the scalar on the left.
    pub fn binary_scalar(&self, op: BinaryOp, rhs: &Value, reversed: bool) -> Result<Frame> {
        self.map_values(|v| {
            if reversed {
                rhs.binary(op, v)
            } else {
                v.binary(op, rhs)
            }
        })
    }

    /// Applies `op` after aligning columns and index.
    pub fn binary(&self, op: BinaryOp, rhs: &Frame) -> Result<Frame> {
        self.combine(rhs, |l, r| l.binary(op, r))
    }

    /// Adds after aligning, treating cells missing on one side as `fill`.
    pub fn add_fill(&self, rhs: &Frame, fill: &Value) -> Result<Frame> {
        self.combine(rhs, |l, r| l.add_fill(r, fill))
    }

    fn combine<F>(&self, rhs: &Frame, mut f: F) -> Result<Frame>
    where
        F: FnMut(&Series, &Series) -> Result<Series>,
    {
        let rows = align(&self.index, &rhs.index);
        let cols = align(&self.column_labels(), &rhs.column_labels());

        let mut columns = Vec::with_capacity(cols.labels.len());
        let mut data = Vec::with_capacity(cols.labels.len());
        for (label, (l, r)) in cols.labels.iter().zip(cols.left.iter().zip(cols.right.iter())) {
            let left = self.column_or_missing(*l)?;
            let right = rhs.column_or_missing(*r)?;
            let combined = f(&left, &right)?;
            columns.push(label.as_str().map(String::from).unwrap_or_default());
            data.push(combined.values().to_vec());
        }
        Frame::new(columns, rows.labels, data)
    }

    fn column_or_missing(&self, position: Option<usize>) -> Result<Series> {
        match position {
            Some(i) => Series::new(self.index.clone(), self.data[i].clone()),
            None => Series::new(self.index.clone(), vec![Value::Null; self.len()]),
        }
    }

    /// Sets a column to the given values, replacing it or appending it.
    pub fn assign(&self, name: &str, values: Vec<Value>) -> Result<Frame> {
        if values.len() != self.len() {
            return Err(Error::length_mismatch(self.len(), values.len()));
        }
        let mut out = self.clone();
        match out.position(name) {
            Some(i) => out.data[i] = values,
            None => {
                out.columns.push(String::from(name));
                out.data.push(values);
            }
        }
        Ok(out)
    }

    /// Relabels columns in order.
    pub fn with_columns(mut self, columns: Vec<String>) -> Result<Frame> {
        if columns.len() != self.width() {
            return Err(Error::length_mismatch(self.width(), columns.len()));
        }
        self.columns = columns;
        Frame::new(self.columns, self.index, self.data)
    }

    /// Concatenates frames with identical columns along rows.
    pub fn concat_rows(parts: &[&Frame]) -> Result<Frame> {
        let first = match parts.first() {
            Some(f) => *f,
            None => return Ok(Frame::empty(Vec::<String>::new())),
        };
        let mut out = first.clone();
        for part in &parts[1..] {
            if part.columns != first.columns {
                return Err(Error::schema_violation(&first.columns, &part.columns));
            }
            out.index.extend(part.index.iter().cloned());
            for (dst, src) in out.data.iter_mut().zip(part.data.iter()) {
                dst.extend(src.iter().cloned());
            }
        }
        Ok(out)
    }

    /// Returns the rows at the given positions.
    pub fn take(&self, positions: &[usize]) -> Frame {
        Frame {
            columns: self.columns.clone(),
            index: positions.iter().map(|&i| self.index[i].clone()).collect(),
            data: self
                .data
                .iter()
                .map(|col| positions.iter().map(|&i| col[i].clone()).collect())
                .collect(),
        }
    }

    /// Returns the first `n` rows.
    pub fn head(&self, n: usize) -> Frame {
        self.slice(0, n.min(self.len()))
    }

    /// Returns the last `n` rows.
    pub fn tail(&self, n: usize) -> Frame {
        self.slice(self.len().saturating_sub(n), self.len())
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> Frame {
        Frame {
            columns: self.columns.clone(),
            index: self.index[start..end].to_vec(),
            data: self.data.iter().map(|c| c[start..end].to_vec()).collect(),
        }
    }

    /// Iterates over `(label, values)` column pairs.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.data.iter().map(Vec::as_slice))
    }
}
