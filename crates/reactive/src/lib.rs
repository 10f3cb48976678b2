//! Streamframe Reactive - synchronous push-based dataflow.
//!
//! This crate implements the stream graph that chunks travel through. A
//! source `Stream` is fed with `emit`; combinators (`map`, `filter`,
//! `accumulate`, `scan`, `zip`, ...) derive child streams that receive
//! transformed values before `emit` returns.
//!
//! # Core Concepts
//!
//! - `Stream<T>`: a shared handle to one dataflow node
//! - `SubscriptionManager<T>`: the ordered, fallible callbacks of a node
//! - `Journal`: the undo log of one tick, rolled back when delivery fails
//!
//! # Example
//!
//! ```
//! use streamframe_reactive::Stream;
//!
//! let source: Stream<i64> = Stream::new();
//! let totals = source.accumulate(None, |acc, x| Ok(acc + x)).sink_to_list();
//!
//! source.emit(1).unwrap();
//! source.emit(2).unwrap();
//! assert_eq!(*totals.borrow(), vec![1, 3]);
//! ```

#![no_std]

extern crate alloc;

pub mod journal;
pub mod stream;
pub mod subscription;

pub use journal::Journal;
pub use stream::{Stream, StreamId};
pub use subscription::{SubscriberFn, Subscription, SubscriptionId, SubscriptionManager};

// Re-export commonly used types from dependencies
pub use streamframe_core::{Error, Result};
