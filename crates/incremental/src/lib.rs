//! Streamframe Incremental - running aggregates over chunk sequences.
//!
//! This crate holds the accumulator family behind streaming aggregation.
//! Each accumulator is a pure function from the previous state and one new
//! chunk to the next state and the visible output, so the streaming layer
//! can thread it through a fold and commit state only when it succeeds.
//!
//! # Accumulators
//!
//! - `accumulate_sum`: running per-column or scalar sum
//! - `accumulate_mean` / `MeanState`: running mean from sums and counts
//! - `groupby_sum` / `groupby_mean`: keyed running totals merged by outer join
//! - `roll`: bounded tail of rows for row-count and duration windows
//!
//! # Example
//!
//! ```
//! use streamframe_core::{Chunk, Series};
//! use streamframe_incremental::accumulate_sum;
//!
//! let mut total = Chunk::from(0i64);
//! for values in [vec![1i64, 2], vec![3]] {
//!     total = accumulate_sum(&total, &Chunk::Series(Series::from_values(values))).unwrap();
//! }
//! assert_eq!(total, Chunk::from(6i64));
//! ```

#![no_std]

extern crate alloc;

pub mod operators;

pub use operators::{
    accumulate_mean, accumulate_sum, group_reduce, groupby_mean, groupby_mean_keyed, groupby_sum,
    groupby_sum_keyed, roll, MeanState,
};
