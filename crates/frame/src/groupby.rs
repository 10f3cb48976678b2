//! Deferred grouping of a streaming handle.
//!
//! `groupby` only records what to group by. The stream is built when `sum`
//! or `mean` is called: each chunk is grouped and reduced on its own, then
//! merged into running keyed totals. A streaming key is zipped with the
//! grouped handle first, so every data chunk is grouped by the key chunk that
//! arrived alongside it.

use crate::frame::StreamingFrame;
use crate::series::StreamingSeries;
use crate::streaming::{Handle, Streaming};
use alloc::string::String;
use alloc::vec::Vec;
use streamframe_core::{Chunk, Error, Grouper, Reduction, Result, Selector, Value};
use streamframe_incremental::{
    group_reduce, groupby_mean, groupby_mean_keyed, groupby_sum, groupby_sum_keyed, MeanState,
};

/// What a grouped handle groups by.
#[derive(Clone, Debug)]
pub enum GroupKey {
    /// A column name or label array fixed up front.
    Static(Grouper),
    /// A handle whose chunks pair up, tick for tick, with the grouped handle's.
    Streaming(Streaming),
}

impl From<Grouper> for GroupKey {
    fn from(grouper: Grouper) -> Self {
        GroupKey::Static(grouper)
    }
}

impl From<&str> for GroupKey {
    fn from(column: &str) -> Self {
        GroupKey::Static(Grouper::from(column))
    }
}

impl From<String> for GroupKey {
    fn from(column: String) -> Self {
        GroupKey::Static(Grouper::from(column))
    }
}

impl From<Vec<Value>> for GroupKey {
    fn from(labels: Vec<Value>) -> Self {
        GroupKey::Static(Grouper::Labels(labels))
    }
}

impl From<&StreamingSeries> for GroupKey {
    fn from(series: &StreamingSeries) -> Self {
        GroupKey::Streaming(Streaming::clone(series))
    }
}

impl From<StreamingSeries> for GroupKey {
    fn from(series: StreamingSeries) -> Self {
        GroupKey::Streaming(series.into_streaming())
    }
}

impl From<&StreamingFrame> for GroupKey {
    fn from(frame: &StreamingFrame) -> Self {
        GroupKey::Streaming(Streaming::clone(frame))
    }
}

impl From<&Handle> for GroupKey {
    fn from(handle: &Handle) -> Self {
        GroupKey::Streaming(Streaming::clone(handle))
    }
}

impl From<Handle> for GroupKey {
    fn from(handle: Handle) -> Self {
        GroupKey::Streaming(handle.into_streaming())
    }
}

/// A grouping awaiting an aggregate.
#[derive(Clone, Debug)]
pub struct GroupedHandle<'a> {
    root: &'a Streaming,
    key: GroupKey,
    selector: Option<Selector>,
}

impl<'a> GroupedHandle<'a> {
    pub(crate) fn new(root: &'a Streaming, key: GroupKey) -> Self {
        Self {
            root,
            key,
            selector: None,
        }
    }

    /// Restricts the aggregate to one column (series result) or a list of
    /// columns (frame result).
    pub fn select(self, selector: impl Into<Selector>) -> Self {
        Self {
            selector: Some(selector.into()),
            ..self
        }
    }

    /// Restricts the aggregate to one column of the grouped frame.
    ///
    /// A name that is not a column is reported as `UnknownMember`.
    pub fn column(self, name: &str) -> Result<Self> {
        let known = self
            .root
            .example()
            .columns()
            .is_some_and(|cs| cs.iter().any(|c| c == name));
        if !known {
            return Err(Error::unknown_member("GroupedHandle", name));
        }
        Ok(self.select(name))
    }

    /// Running grouped sum.
    ///
    /// Each tick emits the totals of every key seen so far; keys missing from
    /// a chunk keep their previous total.
    pub fn sum(self) -> Result<Handle> {
        let example = self.example(Reduction::Sum)?;
        let selector = self.selector;
        let node = match self.key {
            GroupKey::Static(grouper) => self.root.stream().scan(
                None::<Chunk>,
                move |totals: &Option<Chunk>, chunk: &Chunk| {
                    let next = groupby_sum(totals.as_ref(), chunk, &grouper, selector.as_ref())?;
                    Ok((Some(next.clone()), next))
                },
            ),
            GroupKey::Streaming(key) => self.root.stream().zip(key.stream()).scan(
                None::<Chunk>,
                move |totals: &Option<Chunk>, (chunk, keys): &(Chunk, Chunk)| {
                    let next = groupby_sum_keyed(totals.as_ref(), chunk, keys, selector.as_ref())?;
                    Ok((Some(next.clone()), next))
                },
            ),
        };
        Ok(Handle::from_parts(node, example))
    }

    /// Running grouped mean.
    ///
    /// Sums and counts are carried per key; each tick emits their ratio.
    pub fn mean(self) -> Result<Handle> {
        let example = self.example(Reduction::Mean)?;
        let selector = self.selector;
        let node = match self.key {
            GroupKey::Static(grouper) => self.root.stream().scan(
                None::<MeanState>,
                move |state: &Option<MeanState>, chunk: &Chunk| {
                    let (next, mean) =
                        groupby_mean(state.as_ref(), chunk, &grouper, selector.as_ref())?;
                    Ok((Some(next), mean))
                },
            ),
            GroupKey::Streaming(key) => self.root.stream().zip(key.stream()).scan(
                None::<MeanState>,
                move |state: &Option<MeanState>, (chunk, keys): &(Chunk, Chunk)| {
                    let (next, mean) =
                        groupby_mean_keyed(state.as_ref(), chunk, keys, selector.as_ref())?;
                    Ok((Some(next), mean))
                },
            ),
        };
        Ok(Handle::from_parts(node, example))
    }

    /// Applies the reduction to the examples.
    fn example(&self, reduction: Reduction) -> Result<Chunk> {
        let example = self.root.example();
        let grouper = match &self.key {
            GroupKey::Streaming(key) => Grouper::from_chunk(key.example())?,
            // Label arrays describe real chunks; the example only takes as
            // many labels as it has rows.
            GroupKey::Static(Grouper::Labels(labels)) => {
                Grouper::Labels(labels.iter().take(example.len()).cloned().collect())
            }
            GroupKey::Static(grouper) => grouper.clone(),
        };
        group_reduce(example, &grouper, self.selector.as_ref(), reduction)
    }
}
