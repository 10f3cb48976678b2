//! Label alignment shared by series and frame operators.

use crate::value::Value;
use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use hashbrown::HashMap;

/// Positions of each output label on the left and right inputs.
pub(crate) struct Alignment {
    pub labels: Vec<Value>,
    pub left: Vec<Option<usize>>,
    pub right: Vec<Option<usize>>,
}

/// Aligns two label sequences.
///
/// Equal sequences align positionally. Otherwise the output is the sorted
/// union of distinct labels and each side resolves a label to its first
/// occurrence.
///
/// Labels match by `Value` equality, which keeps variants apart:
/// `Int64(1)` and `Float64(1.0)` are two different labels and land on two
/// output rows.
pub(crate) fn align(left: &[Value], right: &[Value]) -> Alignment {
    if left == right {
        let positions: Vec<Option<usize>> = (0..left.len()).map(Some).collect();
        return Alignment {
            labels: left.to_vec(),
            left: positions.clone(),
            right: positions,
        };
    }

    let left_pos = first_positions(left);
    let right_pos = first_positions(right);
    let labels: Vec<Value> = left
        .iter()
        .chain(right.iter())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let left = labels.iter().map(|l| left_pos.get(l).copied()).collect();
    let right = labels.iter().map(|l| right_pos.get(l).copied()).collect();
    Alignment { labels, left, right }
}

fn first_positions(labels: &[Value]) -> HashMap<&Value, usize> {
    let mut positions = HashMap::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        positions.entry(label).or_insert(i);
    }
    positions
}

/// Default positional index `0..len`.
pub(crate) fn range_index(len: usize) -> Vec<Value> {
    (0..len as i64).map(Value::Int64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_align_equal_is_positional() {
        let labels = vec![Value::Int64(2), Value::Int64(1)];
        let a = align(&labels, &labels);
        assert_eq!(a.labels, labels);
        assert_eq!(a.left, vec![Some(0), Some(1)]);
    }

    #[test]
    fn test_align_union_sorted() {
        let left = vec![Value::from("b"), Value::from("a")];
        let right = vec![Value::from("c"), Value::from("a")];
        let a = align(&left, &right);
        assert_eq!(a.labels, vec![Value::from("a"), Value::from("b"), Value::from("c")]);
        assert_eq!(a.left, vec![Some(1), Some(0), None]);
        assert_eq!(a.right, vec![Some(1), None, Some(0)]);
    }
    #[test]
    fn test_align_keeps_int_and_float_labels_apart() {
        let left = vec![Value::Int64(1)];
        let right = vec![Value::Float64(1.0)];
        let a = align(&left, &right);
        assert_eq!(a.labels.len(), 2);
        assert_eq!(a.left.iter().filter(|p| p.is_some()).count(), 1);
        assert_eq!(a.right.iter().filter(|p| p.is_some()).count(), 1);
    }
}
