//! streamframe core - chunk values, tabular operations and error types.
//!
//! This crate provides the data side of streamframe:
//!
//! - `Value`: a single cell, index label or group key
//! - `Chunk`: one unit of tabular data (`Frame`, `Series` or scalar)
//! - `Grouper` / `Selector`: grouping keys and column selections
//! - `Window`: row-count and duration window specifications
//! - `Error`: error types shared by every streamframe crate
//!
//! # Example
//!
//! ```rust
//! use streamframe_core::{Chunk, Frame, Grouper, Value};
//!
//! let chunk = Chunk::Frame(
//!     Frame::from_columns([
//!         ("key", vec![Value::from("a"), Value::from("b"), Value::from("a")]),
//!         ("x", vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)]),
//!     ])
//!     .unwrap(),
//! );
//!
//! let grouper = Grouper::from("key");
//! let sums = chunk.groupby(&grouper).sum().unwrap();
//! let x = sums.as_frame().unwrap().column_values("x").unwrap();
//! assert_eq!(x, &[Value::Int64(4), Value::Int64(2)]);
//! ```

#![no_std]

extern crate alloc;

pub mod chunk;
mod error;
mod types;
mod value;
mod window;

pub use chunk::{Chunk, ChunkKind, Frame, GroupBy, Grouper, Reduction, Selector, Series};
pub use error::{Error, Result};
pub use types::DataType;
pub use value::{BinaryOp, Value};
pub use window::Window;
