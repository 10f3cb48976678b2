//! Streamframe - table-like handles over streams of chunks.
//!
//! A handle pairs a push-based stream of chunks with an *example* chunk that
//! describes their shape. Table operations (column selection, arithmetic,
//! running aggregates, grouping, rolling windows) build new handles over
//! derived streams and compute the new example up front, so the shape of a
//! pipeline is known and checked before any data flows.
//!
//! # Core Concepts
//!
//! - `Streaming`: the generic handle; accepts any chunk
//! - `StreamingFrame` / `StreamingSeries`: typed handles that verify chunks
//! - `Handle`: a derived handle tagged by variant, chosen by `classify`
//! - `GroupedHandle`: a deferred `groupby` awaiting `sum` or `mean`
//!
//! # Example
//!
//! ```
//! use streamframe::{Frame, StreamingFrame, Value};
//!
//! let sdf = StreamingFrame::with_columns(["name", "amount"]);
//! let totals = sdf.groupby("name").select("amount").sum().unwrap();
//! let out = totals.sink_to_list();
//!
//! let chunk = Frame::from_columns([
//!     ("name", vec![Value::from("alice"), Value::from("bob")]),
//!     ("amount", vec![Value::Int64(10), Value::Int64(5)]),
//! ])
//! .unwrap();
//! sdf.emit(chunk).unwrap();
//! assert_eq!(out.borrow().len(), 1);
//! ```

#![no_std]

extern crate alloc;

pub mod frame;
pub mod groupby;
pub mod kind;
pub mod operand;
pub mod series;
pub mod streaming;

pub use frame::StreamingFrame;
pub use groupby::{GroupKey, GroupedHandle};
pub use kind::{classify, Kind};
pub use operand::Operand;
pub use series::StreamingSeries;
pub use streaming::{Handle, Streaming};

// Re-export commonly used types from dependencies
pub use streamframe_core::{Chunk, Error, Frame, Grouper, Result, Selector, Series, Value, Window};
