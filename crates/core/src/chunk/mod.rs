//! Chunks: the discrete units of tabular data that flow through a stream.
//!
//! A chunk is a multi-column `Frame`, a single-column `Series`, or a bare
//! `Scalar` (the result of reducing a series). The operations here are the
//! fixed set the streaming layer relies on: column selection, reductions,
//! grouping, aligned arithmetic, concatenation and slicing.

mod align;
mod display;
mod frame;
mod groupby;
mod reduce;
mod series;

pub use frame::Frame;
pub use groupby::{GroupBy, Grouper, Selector};
pub use reduce::{count_values, mean_values, sum_values, Reduction};
pub use series::Series;

use crate::error::{Error, Result};
use crate::value::{BinaryOp, Value};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Structural kind of a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    Frame,
    Series,
    Scalar,
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkKind::Frame => f.write_str("frame"),
            ChunkKind::Series => f.write_str("series"),
            ChunkKind::Scalar => f.write_str("scalar"),
        }
    }
}

/// One unit of tabular data.
#[derive(Clone, Debug, PartialEq)]
pub enum Chunk {
    Frame(Frame),
    Series(Series),
    Scalar(Value),
}

impl Chunk {
    /// Returns the structural kind.
    pub fn kind(&self) -> ChunkKind {
        match self {
            Chunk::Frame(_) => ChunkKind::Frame,
            Chunk::Series(_) => ChunkKind::Series,
            Chunk::Scalar(_) => ChunkKind::Scalar,
        }
    }

    /// Number of rows; a scalar counts as one.
    pub fn len(&self) -> usize {
        match self {
            Chunk::Frame(f) => f.len(),
            Chunk::Series(s) => s.len(),
            Chunk::Scalar(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column labels of a frame.
    pub fn columns(&self) -> Option<&[String]> {
        match self {
            Chunk::Frame(f) => Some(f.columns()),
            _ => None,
        }
    }

    /// Row labels; scalars have none.
    pub fn index(&self) -> Option<&[Value]> {
        match self {
            Chunk::Frame(f) => Some(f.index()),
            Chunk::Series(s) => Some(s.index()),
            Chunk::Scalar(_) => None,
        }
    }

    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            Chunk::Frame(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_series(&self) -> Option<&Series> {
        match self {
            Chunk::Series(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Chunk::Scalar(v) => Some(v),
            _ => None,
        }
    }

    fn expect_frame(&self, op: &str) -> Result<&Frame> {
        self.as_frame().ok_or_else(|| {
            Error::invalid_operation(format!("{} requires a frame, got a {}", op, self.kind()))
        })
    }

    /// Selects a column (series) or a list of columns (frame).
    pub fn get(&self, selector: &Selector) -> Result<Chunk> {
        let frame = self.expect_frame("column selection")?;
        match selector {
            Selector::Column(c) => Ok(Chunk::Series(frame.column(c)?)),
            Selector::Columns(cs) => Ok(Chunk::Frame(frame.select(cs.as_slice())?)),
        }
    }

    /// Reduces a chunk one level: frame to series, series to scalar.
    pub fn reduce(&self, reduction: Reduction) -> Result<Chunk> {
        match self {
            Chunk::Frame(f) => Ok(Chunk::Series(f.reduce(reduction)?)),
            Chunk::Series(s) => Ok(Chunk::Scalar(s.reduce(reduction)?)),
            Chunk::Scalar(v) => Ok(Chunk::Scalar(reduction.apply(core::iter::once(v))?)),
        }
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

    /// Groups the chunk's rows by `grouper`.
    pub fn groupby<'a>(&'a self, grouper: &'a Grouper) -> GroupBy<'a> {
        GroupBy::new(self, grouper)
    }

    /// Applies a binary operator, broadcasting scalars and aligning labels.
    pub fn binary(&self, op: BinaryOp, rhs: &Chunk) -> Result<Chunk> {
        match (self, rhs) {
            (Chunk::Scalar(a), Chunk::Scalar(b)) => Ok(Chunk::Scalar(a.binary(op, b)?)),
            (Chunk::Series(a), Chunk::Scalar(b)) => Ok(Chunk::Series(a.binary_scalar(op, b, false)?)),
            (Chunk::Scalar(a), Chunk::Series(b)) => Ok(Chunk::Series(b.binary_scalar(op, a, true)?)),
            (Chunk::Frame(a), Chunk::Scalar(b)) => Ok(Chunk::Frame(a.binary_scalar(op, b, false)?)),
            (Chunk::Scalar(a), Chunk::Frame(b)) => Ok(Chunk::Frame(b.binary_scalar(op, a, true)?)),
            (Chunk::Series(a), Chunk::Series(b)) => Ok(Chunk::Series(a.binary(op, b)?)),
            (Chunk::Frame(a), Chunk::Frame(b)) => Ok(Chunk::Frame(a.binary(op, b)?)),
            _ => Err(Error::unsupported_operand(
                op,
                format!("{}", self.kind()),
                format!("{}", rhs.kind()),
            )),
        }
    }

    pub fn add(&self, rhs: &Chunk) -> Result<Chunk> {
        self.binary(BinaryOp::Add, rhs)
    }

    pub fn mul(&self, rhs: &Chunk) -> Result<Chunk> {
        self.binary(BinaryOp::Mul, rhs)
    }

    pub fn rem(&self, rhs: &Chunk) -> Result<Chunk> {
        self.binary(BinaryOp::Rem, rhs)
    }

    pub fn div(&self, rhs: &Chunk) -> Result<Chunk> {
        self.binary(BinaryOp::Div, rhs)
    }

    pub fn floor_div(&self, rhs: &Chunk) -> Result<Chunk> {
        self.binary(BinaryOp::FloorDiv, rhs)
    }

    /// Adds with outer-join alignment: a label on one side only counts `fill` on the other.
    ///
    /// Scalars broadcast as in `binary`; a missing scalar is replaced by `fill`.
    pub fn add_fill(&self, rhs: &Chunk, fill: &Value) -> Result<Chunk> {
        let or_fill = |v: &Value| if v.is_missing() { fill.clone() } else { v.clone() };
        match (self, rhs) {
            (Chunk::Series(a), Chunk::Series(b)) => Ok(Chunk::Series(a.add_fill(b, fill)?)),
            (Chunk::Frame(a), Chunk::Frame(b)) => Ok(Chunk::Frame(a.add_fill(b, fill)?)),
            (Chunk::Scalar(a), Chunk::Scalar(b)) => {
                Ok(Chunk::Scalar(or_fill(a).binary(BinaryOp::Add, &or_fill(b))?))
            }
            (Chunk::Scalar(a), other) => Chunk::Scalar(or_fill(a)).add(other),
            (other, Chunk::Scalar(b)) => other.add(&Chunk::Scalar(or_fill(b))),
            _ => Err(Error::unsupported_operand(
                BinaryOp::Add,
                format!("{}", self.kind()),
                format!("{}", rhs.kind()),
            )),
        }
    }

    /// Concatenates same-kind chunks along rows.
    pub fn concat_rows(parts: &[&Chunk]) -> Result<Chunk> {
        let first = parts
            .first()
            .ok_or_else(|| Error::invalid_operation("nothing to concatenate"))?;
        match first {
            Chunk::Frame(_) => {
                let frames = parts
                    .iter()
                    .map(|c| c.as_frame().ok_or_else(|| kind_violation(first, c)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Chunk::Frame(Frame::concat_rows(&frames)?))
            }
            Chunk::Series(_) => {
                let series = parts
                    .iter()
                    .map(|c| c.as_series().ok_or_else(|| kind_violation(first, c)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Chunk::Series(Series::concat(&series)))
            }
            Chunk::Scalar(_) => {
                let values = parts
                    .iter()
                    .map(|c| c.as_scalar().cloned().ok_or_else(|| kind_violation(first, c)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Chunk::Series(Series::from_values(values)))
            }
        }
    }

    /// Places chunks side by side and labels the resulting columns.
    ///
    /// Every part must share the first part's index. Series contribute one
    /// column, frames all of theirs.
    pub fn concat_columns(parts: &[&Chunk], columns: &[String]) -> Result<Chunk> {
        let index = parts
            .first()
            .and_then(|c| c.index())
            .ok_or_else(|| Error::invalid_operation("column concatenation needs labelled chunks"))?;

        let mut data: Vec<Vec<Value>> = Vec::new();
        for part in parts {
            match part {
                Chunk::Series(s) if s.index() == index => data.push(s.values().to_vec()),
                Chunk::Frame(f) if f.index() == index => {
                    data.extend(f.iter_columns().map(|(_, v)| v.to_vec()))
                }
                Chunk::Scalar(_) => {
                    return Err(Error::invalid_operation("cannot concatenate a scalar as a column"))
                }
                _ => {
                    return Err(Error::index_mismatch(
                        "chunks concatenated by column must share one index",
                    ))
                }
            }
        }
        if data.len() != columns.len() {
            return Err(Error::length_mismatch(data.len(), columns.len()));
        }
        Ok(Chunk::Frame(Frame::new(columns.to_vec(), index.to_vec(), data)?))
    }

    /// Sets a frame column from a scalar (broadcast) or a series sharing the frame's index.
    pub fn assign(&self, column: &str, value: &Chunk) -> Result<Chunk> {
        let frame = self.expect_frame("column assignment")?;
        let values = match value {
            Chunk::Scalar(v) => alloc::vec![v.clone(); frame.len()],
            Chunk::Series(s) if s.index() == frame.index() => s.values().to_vec(),
            Chunk::Series(_) => {
                return Err(Error::index_mismatch("assigned series must share the frame's index"))
            }
            Chunk::Frame(_) => {
                return Err(Error::invalid_operation("cannot assign a frame to one column"))
            }
        };
        Ok(Chunk::Frame(frame.assign(column, values)?))
    }

    /// Returns the first `n` rows.
    pub fn head(&self, n: usize) -> Chunk {
        match self {
            Chunk::Frame(f) => Chunk::Frame(f.head(n)),
            Chunk::Series(s) => Chunk::Series(s.head(n)),
            Chunk::Scalar(v) => Chunk::Scalar(v.clone()),
        }
    }

    /// Returns the last `n` rows.
    pub fn tail(&self, n: usize) -> Chunk {
        match self {
            Chunk::Frame(f) => Chunk::Frame(f.tail(n)),
            Chunk::Series(s) => Chunk::Series(s.tail(n)),
            Chunk::Scalar(v) => Chunk::Scalar(v.clone()),
        }
    }

    /// Keeps the rows whose index label is at least `lower`.
    pub fn slice_from(&self, lower: &Value) -> Result<Chunk> {
        let index = self
            .index()
            .ok_or_else(|| Error::invalid_operation("cannot slice a scalar by label"))?;
        let keep: Vec<usize> = index
            .iter()
            .enumerate()
            .filter(|(_, label)| *label >= lower)
            .map(|(i, _)| i)
            .collect();
        Ok(match self {
            Chunk::Frame(f) => Chunk::Frame(f.take(&keep)),
            Chunk::Series(s) => Chunk::Series(s.take(&keep)),
            Chunk::Scalar(v) => Chunk::Scalar(v.clone()),
        })
    }

    /// Largest index label, if any.
    pub fn max_index(&self) -> Option<&Value> {
        self.index().and_then(|idx| idx.iter().max())
    }

    /// Rounds float cells to `decimals` places.
    pub fn round(&self, decimals: i32) -> Result<Chunk> {
        Ok(match self {
            Chunk::Frame(f) => Chunk::Frame(f.map_values(|v| Ok(v.round(decimals)))?),
            Chunk::Series(s) => Chunk::Series(s.map_values(|v| Ok(v.round(decimals)))?),
            Chunk::Scalar(v) => Chunk::Scalar(v.round(decimals)),
        })
    }
}

fn kind_violation(expected: &Chunk, got: &Chunk) -> Error {
    Error::type_violation(expected.kind(), got.kind())
}

impl From<Frame> for Chunk {
    fn from(f: Frame) -> Self {
        Chunk::Frame(f)
    }
}

impl From<Series> for Chunk {
    fn from(s: Series) -> Self {
        Chunk::Series(s)
    }
}

impl From<Value> for Chunk {
    fn from(v: Value) -> Self {
        Chunk::Scalar(v)
    }
}

impl From<i64> for Chunk {
    fn from(v: i64) -> Self {
        Chunk::Scalar(Value::Int64(v))
    }
}

impl From<f64> for Chunk {
    fn from(v: f64) -> Self {
        Chunk::Scalar(Value::Float64(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn frame(a: &[i64], b: &[i64]) -> Chunk {
        Chunk::Frame(
            Frame::from_columns([
                ("a", a.iter().map(|v| Value::Int64(*v)).collect()),
                ("b", b.iter().map(|v| Value::Int64(*v)).collect()),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_kind_and_len() {
        assert_eq!(frame(&[1], &[2]).kind(), ChunkKind::Frame);
        assert_eq!(Chunk::from(1i64).kind(), ChunkKind::Scalar);
        assert_eq!(Chunk::from(1i64).len(), 1);
        assert_eq!(frame(&[1, 2], &[3, 4]).len(), 2);
    }

    #[test]
    fn test_get_column_and_columns() {
        let c = frame(&[1, 2], &[3, 4]);
        assert_eq!(c.get(&Selector::from("a")).unwrap().kind(), ChunkKind::Series);
        assert_eq!(c.get(&Selector::from(["b", "a"])).unwrap().columns().unwrap()[0], "b");
        assert!(Chunk::from(1i64).get(&Selector::from("a")).is_err());
    }

    #[test]
    fn test_reduce_levels() {
        let c = frame(&[1, 2], &[3, 4]);
        let s = c.sum().unwrap();
        assert_eq!(s.kind(), ChunkKind::Series);
        assert_eq!(s.sum().unwrap(), Chunk::Scalar(Value::Int64(10)));
    }

    #[test]
    fn test_scalar_broadcast_over_series() {
        let s = Chunk::Series(Series::from_values([1i64, 2]));
        let out = Chunk::from(10i64).add(&s).unwrap();
        assert_eq!(out.as_series().unwrap().values(), &[Value::Int64(11), Value::Int64(12)]);
    }

    #[test]
    fn test_frame_series_arithmetic_is_rejected() {
        let c = frame(&[1], &[2]);
        let s = Chunk::Series(Series::from_values([1i64]));
        let err = c.add(&s).unwrap_err();
        assert!(err.to_string().contains("frame"));
    }

    #[test]
    fn test_add_fill_scalar_start() {
        let s = Chunk::Series(Series::from_values([1i64, 2]));
        let out = Chunk::from(0i64).add_fill(&s, &Value::Int64(0)).unwrap();
        assert_eq!(out, s);
    }

    #[test]
    fn test_concat_rows_kinds() {
        let a = frame(&[1], &[2]);
        let b = frame(&[3], &[4]);
        let out = Chunk::concat_rows(&[&a, &b]).unwrap();
        assert_eq!(out.len(), 2);

        let s = Chunk::Series(Series::from_values([1i64]));
        assert!(matches!(
            Chunk::concat_rows(&[&a, &s]),
            Err(Error::TypeViolation { .. })
        ));
    }

    #[test]
    fn test_concat_columns() {
        let a = frame(&[1, 2], &[3, 4]);
        let s = Chunk::Series(Series::from_values([5i64, 6]));
        let cols: Vec<String> = ["a", "b", "c"].iter().map(|c| c.to_string()).collect();
        let out = Chunk::concat_columns(&[&a, &s], &cols).unwrap();
        assert_eq!(out.columns().unwrap(), cols.as_slice());

        let short = Chunk::Series(Series::from_values([5i64]));
        assert!(matches!(
            Chunk::concat_columns(&[&a, &short], &cols),
            Err(Error::IndexMismatch { .. })
        ));
    }

    #[test]
    fn test_assign_scalar() {
        let c = frame(&[1, 2], &[3, 4]);
        let out = c.assign("c", &Chunk::from(0i64)).unwrap();
        assert_eq!(
            out.as_frame().unwrap().column_values("c").unwrap(),
            &[Value::Int64(0), Value::Int64(0)]
        );
    }

    #[test]
    fn test_slice_from_and_max_index() {
        let s = Chunk::Series(
            Series::new(
                vec![Value::DateTime(0), Value::DateTime(1000), Value::DateTime(2000)],
                vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)],
            )
            .unwrap(),
        );
        assert_eq!(s.max_index(), Some(&Value::DateTime(2000)));
        let out = s.slice_from(&Value::DateTime(1000)).unwrap();
        assert_eq!(out.as_series().unwrap().values(), &[Value::Int64(2), Value::Int64(3)]);
    }

    #[test]
    fn test_round() {
        let s = Chunk::Series(Series::from_values([1.26f64, 2.0]));
        let out = s.round(1).unwrap();
        assert_eq!(out.as_series().unwrap().values(), &[Value::Float64(1.3), Value::Float64(2.0)]);
    }
}
