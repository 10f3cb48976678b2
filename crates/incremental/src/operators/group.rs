//! Grouped running aggregates.
//!
//! Every chunk is grouped on its own, reduced, and merged into the keyed
//! running totals with outer-join addition: a key seen on one side only
//! counts as zero on the other.

use super::aggregate::MeanState;
use streamframe_core::{Chunk, Grouper, Reduction, Result, Selector, Value};

/// Groups one chunk, narrows it to `selector` and reduces every group.
pub fn group_reduce(
    chunk: &Chunk,
    grouper: &Grouper,
    selector: Option<&Selector>,
    reduction: Reduction,
) -> Result<Chunk> {
    chunk.groupby(grouper).select(selector).reduce(reduction)
}

/// Grouped running SUM.
///
/// `accumulator` is `None` before the first chunk, in which case the
/// chunk's own grouped sum becomes the total.
pub fn groupby_sum(
    accumulator: Option<&Chunk>,
    new: &Chunk,
    grouper: &Grouper,
    selector: Option<&Selector>,
) -> Result<Chunk> {
    let sums = group_reduce(new, grouper, selector, Reduction::Sum)?;
    match accumulator {
        None => Ok(sums),
        Some(acc) => acc.add_fill(&sums, &Value::Int64(0)),
    }
}

/// Grouped running MEAN. Returns the next state and the visible means.
pub fn groupby_mean(
    state: Option<&MeanState>,
    new: &Chunk,
    grouper: &Grouper,
    selector: Option<&Selector>,
) -> Result<(MeanState, Chunk)> {
    let sums = group_reduce(new, grouper, selector, Reduction::Sum)?;
    let counts = group_reduce(new, grouper, selector, Reduction::Count)?;
    let next = match state {
        None => MeanState::from_parts(sums, counts),
        Some(state) => {
            let zero = Value::Int64(0);
            MeanState::from_parts(
                state.sums().add_fill(&sums, &zero)?,
                state.counts().add_fill(&counts, &zero)?,
            )
        }
    };
    let mean = next.mean()?;
    Ok((next, mean))
}

/// Variant of `groupby_sum` for a key that arrives as its own chunk,
/// zipped with the data chunk.
pub fn groupby_sum_keyed(
    accumulator: Option<&Chunk>,
    new: &Chunk,
    keys: &Chunk,
    selector: Option<&Selector>,
) -> Result<Chunk> {
    groupby_sum(accumulator, new, &Grouper::from_chunk(keys)?, selector)
}

/// Variant of `groupby_mean` for a key that arrives as its own chunk.
pub fn groupby_mean_keyed(
    state: Option<&MeanState>,
    new: &Chunk,
    keys: &Chunk,
    selector: Option<&Selector>,
) -> Result<(MeanState, Chunk)> {
    groupby_mean(state, new, &Grouper::from_chunk(keys)?, selector)
}
