//! Data type definitions for streamframe values.

/// Data types a chunk cell can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean type (true/false)
    Boolean,
    /// 64-bit signed integer
    Int64,
    /// 64-bit floating point number
    Float64,
    /// UTF-8 string
    String,
    /// Timestamp stored as Unix time in milliseconds
    DateTime,
}

impl DataType {
    /// Returns true if values of this type take part in arithmetic.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Boolean | DataType::Int64 | DataType::Float64)
    }

    /// Returns true if this type can order an index for time-based windows.
    pub fn is_time_like(&self) -> bool {
        matches!(self, DataType::DateTime)
    }

    /// Returns the short display name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "bool",
            DataType::Int64 => "int64",
            DataType::Float64 => "float64",
            DataType::String => "string",
            DataType::DateTime => "datetime",
        }
    }
}
