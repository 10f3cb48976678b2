//! Value type definitions for streamframe.
//!
//! This module defines the `Value` enum which represents a single cell of a
//! chunk, a label of a chunk index, or a group key, together with the
//! element-wise arithmetic used by chunk operators.

use crate::error::{Error, Result};
use crate::types::DataType;
use alloc::format;
use alloc::string::{String, ToString};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

/// A value that can be stored in a chunk cell or used as an index label.
#[derive(Clone, Debug)]
pub enum Value {
    /// Missing value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 64-bit signed integer
    Int64(i64),
    /// 64-bit floating point
    Float64(f64),
    /// UTF-8 string
    String(String),
    /// DateTime stored as Unix timestamp in milliseconds
    DateTime(i64),
}

/// Element-wise binary operators supported on values and chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Mul,
    Rem,
    Div,
    FloorDiv,
}

impl BinaryOp {
    /// Returns the operator symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Mul => "*",
            BinaryOp::Rem => "%",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
        }
    }
}

impl Value {
    /// Returns the data type of this value, or None if it's Null.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float64(_) => Some(DataType::Float64),
            Value::String(_) => Some(DataType::String),
            Value::DateTime(_) => Some(DataType::DateTime),
        }
    }

    /// Returns true if this value is Null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for Null and for a floating point NaN.
    #[inline]
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Returns the boolean value if this is a Boolean, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the i64 value if this is an Int64, None otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the f64 value if this is a Float64, None otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Returns the datetime timestamp if this is a DateTime, None otherwise.
    pub fn as_datetime(&self) -> Option<i64> {
        match self {
            Value::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    /// Widens any numeric value to f64.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    fn to_i64_exact(&self) -> Option<i64> {
        match self {
            Value::Boolean(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Applies a binary operator.
    ///
    /// Null on either side yields Null. Integers stay integers except for
    /// true division; integer `%` and `//` by zero yield Null. `%` and `//`
    /// round toward negative infinity.
    pub fn binary(&self, op: BinaryOp, rhs: &Value) -> Result<Value> {
        if self.is_null() || rhs.is_null() {
            return Ok(Value::Null);
        }

        if let (Some(a), Some(b)) = (self.to_i64_exact(), rhs.to_i64_exact()) {
            return Ok(int_binary(op, a, b));
        }

        if let (Some(a), Some(b)) = (self.to_f64(), rhs.to_f64()) {
            return Ok(Value::Float64(float_binary(op, a, b)));
        }

        match (self, op, rhs) {
            (Value::String(a), BinaryOp::Add, Value::String(b)) => {
                let mut out = a.clone();
                out.push_str(b);
                Ok(Value::String(out))
            }
            (Value::DateTime(t), BinaryOp::Add, Value::Int64(ms))
            | (Value::Int64(ms), BinaryOp::Add, Value::DateTime(t)) => {
                Ok(Value::DateTime(t.wrapping_add(*ms)))
            }
            _ => Err(Error::unsupported_operand(
                op,
                self.type_name(),
                rhs.type_name(),
            )),
        }
    }

    /// Rounds a float to the given number of decimals; other values pass through.
    pub fn round(&self, decimals: i32) -> Value {
        match self {
            Value::Float64(v) => {
                let factor = libm::pow(10.0, decimals as f64);
                Value::Float64(libm::round(v * factor) / factor)
            }
            other => other.clone(),
        }
    }

    /// Returns the type name used in error messages.
    pub fn type_name(&self) -> String {
        match self.data_type() {
            Some(dt) => dt.name().to_string(),
            None => "null".to_string(),
        }
    }
}

fn int_binary(op: BinaryOp, a: i64, b: i64) -> Value {
    match op {
        BinaryOp::Add => Value::Int64(a.wrapping_add(b)),
        BinaryOp::Mul => Value::Int64(a.wrapping_mul(b)),
        BinaryOp::Div => Value::Float64(a as f64 / b as f64),
        BinaryOp::Rem => {
            if b == 0 {
                return Value::Null;
            }
            let r = a.wrapping_rem(b);
            if r != 0 && ((r < 0) != (b < 0)) {
                Value::Int64(r + b)
            } else {
                Value::Int64(r)
            }
        }
        BinaryOp::FloorDiv => {
            if b == 0 {
                return Value::Null;
            }
            let q = a.wrapping_div(b);
            if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
                Value::Int64(q - 1)
            } else {
                Value::Int64(q)
            }
        }
    }
}

fn float_binary(op: BinaryOp, a: f64, b: f64) -> f64 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => {
            let r = a % b;
            if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                r + b
            } else {
                r
            }
        }
        BinaryOp::FloorDiv => libm::floor(a / b),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::Int64(i) => i.hash(state),
            Value::Float64(f) => {
                if f.is_nan() {
                    f64::NAN.to_bits().hash(state)
                } else {
                    f.to_bits().hash(state)
                }
            }
            Value::String(s) => s.hash(state),
            Value::DateTime(d) => d.hash(state),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
            (Value::Float64(a), Value::Float64(b)) => {
                // Handle NaN: treat NaN as greater than all other values
                match (a.is_nan(), b.is_nan()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
                }
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            // Different types: order by type discriminant
            _ => self.type_order().cmp(&other.type_order()),
        }
    }
}

impl Value {
    /// Returns a type ordering value for comparing different types.
    fn type_order(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Int64(_) => 2,
            Value::Float64(_) => 3,
            Value::String(_) => 4,
            Value::DateTime(_) => 5,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Float64(v) if v.is_nan() => f.write_str("NaN"),
            Value::Float64(v) => {
                let text = format!("{}", v);
                if text.contains('.') || text.contains("inf") {
                    f.write_str(&text)
                } else {
                    write!(f, "{}.0", text)
                }
            }
            Value::String(v) => f.write_str(v),
            Value::DateTime(v) => write!(f, "@{}ms", v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int64(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_value_type_check() {
        assert_eq!(Value::Int64(42).data_type(), Some(DataType::Int64));
        assert_eq!(Value::Null.data_type(), None);
        assert!(Value::Null.is_null());
        assert!(Value::Float64(f64::NAN).is_missing());
    }

    #[test]
    fn test_integer_arithmetic() {
        let a = Value::Int64(7);
        let b = Value::Int64(2);
        assert_eq!(a.binary(BinaryOp::Add, &b).unwrap(), Value::Int64(9));
        assert_eq!(a.binary(BinaryOp::Mul, &b).unwrap(), Value::Int64(14));
        assert_eq!(a.binary(BinaryOp::Div, &b).unwrap(), Value::Float64(3.5));
        assert_eq!(a.binary(BinaryOp::FloorDiv, &b).unwrap(), Value::Int64(3));
        assert_eq!(a.binary(BinaryOp::Rem, &b).unwrap(), Value::Int64(1));
    }

    #[test]
    fn test_floor_semantics_for_negatives() {
        let a = Value::Int64(-7);
        let b = Value::Int64(2);
        assert_eq!(a.binary(BinaryOp::FloorDiv, &b).unwrap(), Value::Int64(-4));
        assert_eq!(a.binary(BinaryOp::Rem, &b).unwrap(), Value::Int64(1));

        let x = Value::Float64(-7.0);
        assert_eq!(x.binary(BinaryOp::FloorDiv, &b).unwrap(), Value::Float64(-4.0));
        assert_eq!(x.binary(BinaryOp::Rem, &b).unwrap(), Value::Float64(1.0));
    }

    #[test]
    fn test_integer_division_by_zero() {
        let a = Value::Int64(1);
        let zero = Value::Int64(0);
        assert_eq!(a.binary(BinaryOp::FloorDiv, &zero).unwrap(), Value::Null);
        assert_eq!(a.binary(BinaryOp::Rem, &zero).unwrap(), Value::Null);
        assert!(a.binary(BinaryOp::Div, &zero).unwrap().as_f64().unwrap().is_infinite());
    }

    #[test]
    fn test_mixed_numeric_promotes_to_float() {
        let v = Value::Int64(1).binary(BinaryOp::Add, &Value::Float64(0.5)).unwrap();
        assert_eq!(v, Value::Float64(1.5));
    }

    #[test]
    fn test_null_propagates() {
        let v = Value::Null.binary(BinaryOp::Add, &Value::Int64(1)).unwrap();
        assert!(v.is_null());
    }

    #[test]
    fn test_string_concat_and_mismatch() {
        let v = Value::from("ab").binary(BinaryOp::Add, &Value::from("c")).unwrap();
        assert_eq!(v.as_str(), Some("abc"));

        let err = Value::from("ab").binary(BinaryOp::Mul, &Value::Int64(2)).unwrap_err();
        assert!(err.to_string().contains("*"));
    }

    #[test]
    fn test_round() {
        assert_eq!(Value::Float64(1.2345).round(2), Value::Float64(1.23));
        assert_eq!(Value::Int64(3).round(2), Value::Int64(3));
    }

    #[test]
    fn test_value_ordering() {
        assert!(Value::Int64(1) < Value::Int64(2));
        assert!(Value::String("a".into()) < Value::String("b".into()));
        assert!(Value::Null < Value::Int64(0));
        assert!(Value::DateTime(1) < Value::DateTime(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Float64(2.0).to_string(), "2.0");
        assert_eq!(Value::Float64(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Int64(5).to_string(), "5");
    }

    #[test]
    fn test_value_from_impls() {
        let v: Value = 42i32.into();
        assert_eq!(v.as_i64(), Some(42));

        let v: Value = Some(1.5f64).into();
        assert_eq!(v.as_f64(), Some(1.5));

        let v: Value = None::<i64>.into();
        assert!(v.is_null());
    }
}
