//! Column reductions: sum, count and mean.

use crate::error::Result;
use crate::value::{BinaryOp, Value};

/// Reductions available per chunk and per group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reduction {
    Sum,
    Count,
    Mean,
}

impl Reduction {
    /// Reduces a sequence of values, skipping missing ones.
    pub fn apply<'a>(&self, values: impl Iterator<Item = &'a Value> + Clone) -> Result<Value> {
        match self {
            Reduction::Sum => sum_values(values),
            Reduction::Count => Ok(count_values(values)),
            Reduction::Mean => mean_values(values),
        }
    }
}

/// Sums non-missing values. An empty sum is `Int64(0)`.
pub fn sum_values<'a>(values: impl Iterator<Item = &'a Value>) -> Result<Value> {
    let mut acc: Option<Value> = None;
    for v in values.filter(|v| !v.is_missing()) {
        acc = Some(match acc {
            None => v.clone(),
            Some(a) => a.binary(BinaryOp::Add, v)?,
        });
    }
    Ok(acc.unwrap_or(Value::Int64(0)))
}

/// Counts non-missing values.
pub fn count_values<'a>(values: impl Iterator<Item = &'a Value>) -> Value {
    Value::Int64(values.filter(|v| !v.is_missing()).count() as i64)
}

/// Mean of non-missing values; NaN when there are none.
pub fn mean_values<'a>(values: impl Iterator<Item = &'a Value> + Clone) -> Result<Value> {
    let sum = sum_values(values.clone())?;
    let count = count_values(values);
    sum.binary(BinaryOp::Div, &count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn test_sum_skips_missing() {
        let values = vec![Value::Int64(1), Value::Null, Value::Int64(2)];
        assert_eq!(sum_values(values.iter()).unwrap(), Value::Int64(3));
        assert_eq!(count_values(values.iter()), Value::Int64(2));
    }

    #[test]
    fn test_empty_reductions() {
        let values: Vec<Value> = Vec::new();
        assert_eq!(sum_values(values.iter()).unwrap(), Value::Int64(0));
        assert_eq!(count_values(values.iter()), Value::Int64(0));
        assert!(mean_values(values.iter()).unwrap().is_missing());
    }

    #[test]
    fn test_mean() {
        let values = vec![Value::Int64(1), Value::Float64(2.0), Value::Int64(6)];
        assert_eq!(Reduction::Mean.apply(values.iter()).unwrap(), Value::Float64(3.0));
    }
}
