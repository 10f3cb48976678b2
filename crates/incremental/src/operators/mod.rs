//! Accumulator functions.

pub mod aggregate;
pub mod group;
pub mod rolling;

pub use aggregate::{accumulate_mean, accumulate_sum, MeanState};
pub use group::{group_reduce, groupby_mean, groupby_mean_keyed, groupby_sum, groupby_sum_keyed};
pub use rolling::roll;
