//! Per-chunk grouping.

use super::frame::Frame;
use super::reduce::Reduction;
use super::series::Series;
use super::Chunk;
use crate::error::{Error, Result};
use crate::value::Value;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// What a chunk is grouped by.
#[derive(Clone, Debug, PartialEq)]
pub enum Grouper {
    /// A column of the grouped frame; the column is excluded from the result.
    Column(String),
    /// One key per row, matched positionally.
    Labels(Vec<Value>),
}

impl Grouper {
    /// Builds positional labels from a key chunk (series values, or a scalar for one row).
    pub fn from_chunk(chunk: &Chunk) -> Result<Grouper> {
        match chunk {
            Chunk::Series(s) => Ok(Grouper::Labels(s.values().to_vec())),
            Chunk::Scalar(v) => Ok(Grouper::Labels(alloc::vec![v.clone()])),
            Chunk::Frame(f) if f.width() == 1 => {
                Ok(Grouper::Labels(f.iter_columns().next().map(|(_, v)| v.to_vec()).unwrap_or_default()))
            }
            Chunk::Frame(_) => Err(Error::invalid_operation(
                "grouping key must be a single column",
            )),
        }
    }
}

impl From<&str> for Grouper {
    fn from(column: &str) -> Self {
        Grouper::Column(String::from(column))
    }
}

impl From<String> for Grouper {
    fn from(column: String) -> Self {
        Grouper::Column(column)
    }
}

impl From<Vec<Value>> for Grouper {
    fn from(labels: Vec<Value>) -> Self {
        Grouper::Labels(labels)
    }
}

/// Column selection for indexing chunks and grouped chunks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// A single column; selects a series.
    Column(String),
    /// A list of columns; selects a frame.
    Columns(Vec<String>),
}

impl Selector {
    /// Returns the column labels named by this selector.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Selector::Column(c) => alloc::vec![c.as_str()],
            Selector::Columns(cs) => cs.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for Selector {
    fn from(column: &str) -> Self {
        Selector::Column(String::from(column))
    }
}

impl From<String> for Selector {
    fn from(column: String) -> Self {
        Selector::Column(column)
    }
}

impl From<&[&str]> for Selector {
    fn from(columns: &[&str]) -> Self {
        Selector::Columns(columns.iter().map(|c| String::from(*c)).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Selector {
    fn from(columns: [&str; N]) -> Self {
        Selector::Columns(columns.iter().map(|c| String::from(*c)).collect())
    }
}

impl From<Vec<String>> for Selector {
    fn from(columns: Vec<String>) -> Self {
        Selector::Columns(columns)
    }
}

/// A chunk grouped by a key, optionally narrowed to some columns.
#[derive(Clone, Debug)]
pub struct GroupBy<'a> {
    chunk: &'a Chunk,
    grouper: &'a Grouper,
    selector: Option<&'a Selector>,
}

impl<'a> GroupBy<'a> {
    pub(crate) fn new(chunk: &'a Chunk, grouper: &'a Grouper) -> Self {
        Self {
            chunk,
            grouper,
            selector: None,
        }
    }

    /// Restricts the aggregation to the selected columns.
    pub fn select(mut self, selector: Option<&'a Selector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn sum(&self) -> Result<Chunk> {
        self.reduce(Reduction::Sum)
    }

    pub fn count(&self) -> Result<Chunk> {
        self.reduce(Reduction::Count)
    }

    pub fn mean(&self) -> Result<Chunk> {
        self.reduce(Reduction::Mean)
    }

    /// Reduces every group. Keys come out sorted; missing keys are dropped.
    pub fn reduce(&self, reduction: Reduction) -> Result<Chunk> {
        let rows = self.chunk.len();
        let keys = self.keys()?;
        if keys.len() != rows {
            return Err(Error::length_mismatch(rows, keys.len()));
        }

        let mut groups: BTreeMap<&Value, Vec<usize>> = BTreeMap::new();
        for (row, key) in keys.iter().enumerate() {
            if !key.is_missing() {
                groups.entry(key).or_default().push(row);
            }
        }
        let index: Vec<Value> = groups.keys().map(|k| (*k).clone()).collect();

        let reduce_column = |values: &[Value]| -> Result<Vec<Value>> {
            groups
                .values()
                .map(|rows| reduction.apply(rows.iter().map(|&r| &values[r])))
                .collect()
        };

        match self.target()? {
            Target::Series(series) => {
                let values = reduce_column(series.values())?;
                Ok(Chunk::Series(
                    Series::new(index, values)?.with_name_opt(series.name().map(String::from)),
                ))
            }
            Target::Frame(frame) => {
                let mut columns = Vec::with_capacity(frame.width());
                let mut data = Vec::with_capacity(frame.width());
                for (name, values) in frame.iter_columns() {
                    columns.push(String::from(name));
                    data.push(reduce_column(values)?);
                }
                Ok(Chunk::Frame(Frame::new(columns, index, data)?))
            }
        }
    }

    fn keys(&self) -> Result<&'a [Value]> {
        match (self.grouper, self.chunk) {
            (Grouper::Labels(labels), _) => Ok(labels.as_slice()),
            (Grouper::Column(name), Chunk::Frame(frame)) => frame.column_values(name),
            (Grouper::Column(name), _) => Err(Error::invalid_operation(alloc::format!(
                "cannot group a {} by column {:?}",
                self.chunk.kind(),
                name
            ))),
        }
    }

    fn target(&self) -> Result<Target> {
        match (self.chunk, self.selector) {
            (Chunk::Frame(frame), None) => {
                let keep: Vec<&str> = frame
                    .columns()
                    .iter()
                    .map(String::as_str)
                    .filter(|c| !matches!(self.grouper, Grouper::Column(k) if k.as_str() == *c))
                    .collect();
                Ok(Target::Frame(frame.select(&keep)?))
            }
            (Chunk::Frame(frame), Some(Selector::Column(c))) => Ok(Target::Series(frame.column(c)?)),
            (Chunk::Frame(frame), Some(Selector::Columns(cs))) => Ok(Target::Frame(frame.select(cs.as_slice())?)),
            (Chunk::Series(series), None) => Ok(Target::Series(series.clone())),
            (Chunk::Series(_), Some(_)) => Err(Error::invalid_operation(
                "cannot select columns of a grouped series",
            )),
            (Chunk::Scalar(_), _) => Err(Error::invalid_operation("cannot group a scalar")),
        }
    }
}

enum Target {
    Series(Series),
    Frame(Frame),
}
