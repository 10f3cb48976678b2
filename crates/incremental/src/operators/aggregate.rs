//! Running aggregates over a sequence of chunks.
//!
//! Each function folds one new chunk into the previous state and returns the
//! next state; nothing here mutates its inputs, so a failing call leaves the
//! caller's state as it was.

use streamframe_core::{Chunk, Result, Value};

/// Running SUM.
///
/// Frames reduce to a per-column series, series to a scalar. The first call
/// is usually made with `Chunk::from(0i64)` as the accumulator, which
/// broadcasts against whatever the first reduction produces.
pub fn accumulate_sum(accumulator: &Chunk, new: &Chunk) -> Result<Chunk> {
    accumulator.add(&new.sum()?)
}

/// State of a running MEAN: totals and non-null counts.
///
/// The visible mean is always `sums / counts`, recomputed from the state on
/// every update and never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct MeanState {
    sums: Chunk,
    counts: Chunk,
}

impl MeanState {
    /// Creates an empty state shaped like the reduction of `example`.
    ///
    /// A frame example gives per-column zeros, anything else scalar zeros.
    pub fn zero(example: &Chunk) -> Result<Self> {
        let zeros = match example {
            Chunk::Frame(_) => example.count()?.mul(&Chunk::from(0i64))?,
            _ => Chunk::from(0i64),
        };
        Ok(Self {
            sums: zeros.clone(),
            counts: zeros,
        })
    }

    /// Creates a state from explicit totals.
    pub fn from_parts(sums: Chunk, counts: Chunk) -> Self {
        Self { sums, counts }
    }

    #[inline]
    pub fn sums(&self) -> &Chunk {
        &self.sums
    }

    #[inline]
    pub fn counts(&self) -> &Chunk {
        &self.counts
    }

    /// Returns `sums / counts`.
    pub fn mean(&self) -> Result<Chunk> {
        self.sums.div(&self.counts)
    }
}

/// Running MEAN. Returns the next state and the visible mean.
pub fn accumulate_mean(state: &MeanState, new: &Chunk) -> Result<(MeanState, Chunk)> {
    let zero = Value::Int64(0);
    let sums = state.sums.add_fill(&new.sum()?, &zero)?;
    let counts = state.counts.add_fill(&new.count()?, &zero)?;
    let next = MeanState { sums, counts };
    let mean = next.mean()?;
    Ok((next, mean))
}
