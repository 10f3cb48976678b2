//! Error types for streamframe.

use crate::chunk::ChunkKind;
use crate::value::BinaryOp;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Result type alias for streamframe operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for streamframe operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A chunk's columns differ from the handle's example.
    SchemaViolation {
        expected: Vec<String>,
        got: Vec<String>,
    },
    /// A chunk is not of the kind the handle expects.
    TypeViolation {
        expected: ChunkKind,
        got: ChunkKind,
    },
    /// A name is neither an operation nor a current column.
    UnknownMember {
        owner: &'static str,
        name: String,
    },
    /// Column not found in a chunk.
    ColumnNotFound {
        column: String,
    },
    /// Operator applied to values it is not defined for.
    UnsupportedOperand {
        op: BinaryOp,
        left: String,
        right: String,
    },
    /// Two sequences that must line up have different lengths.
    LengthMismatch {
        expected: usize,
        got: usize,
    },
    /// Chunks that must share an index do not.
    IndexMismatch {
        message: String,
    },
    /// Window specification or window input is invalid.
    InvalidWindow {
        message: String,
    },
    /// Invalid operation.
    InvalidOperation {
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SchemaViolation { expected, got } => {
                write!(
                    f,
                    "Schema violation: input expected to have columns {:?}, got {:?}",
                    expected, got
                )
            }
            Error::TypeViolation { expected, got } => {
                write!(f, "Type violation: expected {}, got {}", expected, got)
            }
            Error::UnknownMember { owner, name } => {
                write!(f, "{} has no member {:?}", owner, name)
            }
            Error::ColumnNotFound { column } => {
                write!(f, "Column not found: {}", column)
            }
            Error::UnsupportedOperand { op, left, right } => {
                write!(
                    f,
                    "Unsupported operand types for {}: {} and {}",
                    op.symbol(),
                    left,
                    right
                )
            }
            Error::LengthMismatch { expected, got } => {
                write!(f, "Length mismatch: expected {}, got {}", expected, got)
            }
            Error::IndexMismatch { message } => {
                write!(f, "Index mismatch: {}", message)
            }
            Error::InvalidWindow { message } => {
                write!(f, "Invalid window: {}", message)
            }
            Error::InvalidOperation { message } => {
                write!(f, "Invalid operation: {}", message)
            }
        }
    }
}

impl Error {
    /// Creates a schema violation error.
    pub fn schema_violation(expected: &[String], got: &[String]) -> Self {
        Error::SchemaViolation {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Creates a type violation error.
    pub fn type_violation(expected: ChunkKind, got: ChunkKind) -> Self {
        Error::TypeViolation { expected, got }
    }

    /// Creates an unknown member error.
    pub fn unknown_member(owner: &'static str, name: impl Into<String>) -> Self {
        Error::UnknownMember {
            owner,
            name: name.into(),
        }
    }

    /// Creates a column not found error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Error::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Creates an unsupported operand error.
    pub fn unsupported_operand(op: BinaryOp, left: impl Into<String>, right: impl Into<String>) -> Self {
        Error::UnsupportedOperand {
            op,
            left: left.into(),
            right: right.into(),
        }
    }

    /// Creates a length mismatch error.
    pub fn length_mismatch(expected: usize, got: usize) -> Self {
        Error::LengthMismatch { expected, got }
    }

    /// Creates an index mismatch error.
    pub fn index_mismatch(message: impl Into<String>) -> Self {
        Error::IndexMismatch {
            message: message.into(),
        }
    }

    /// Creates an invalid window error.
    pub fn invalid_window(message: impl Into<String>) -> Self {
        Error::InvalidWindow {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Error::InvalidOperation {
            message: message.into(),
        }
    }

    /// Returns true if this error was raised by input validation at `emit`.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::SchemaViolation { .. } | Error::TypeViolation { .. }
        )
    }
}
