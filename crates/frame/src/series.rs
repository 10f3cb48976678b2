//! Single-column streaming handles.

use crate::groupby::{GroupKey, GroupedHandle};
use crate::kind::Kind;
use crate::streaming::{Handle, Streaming};
use core::fmt;
use core::ops::Deref;
use streamframe_core::{Chunk, Result, Series};
use streamframe_reactive::Stream;

/// A stream of series chunks.
#[derive(Clone, Debug)]
pub struct StreamingSeries(Streaming);

impl StreamingSeries {
    /// Creates a series handle over a new source node.
    pub fn new(example: Series) -> Self {
        Self(Streaming::with_kind(Stream::new(), Chunk::Series(example), Kind::Series))
    }

    pub(crate) fn from_streaming(inner: Streaming) -> Self {
        Self(inner)
    }

    pub fn into_streaming(self) -> Streaming {
        self.0
    }

    /// Running sum of every value seen so far.
    pub fn sum(&self) -> Result<Handle> {
        self.0.running_sum()
    }

    /// Running mean of every value seen so far.
    pub fn mean(&self) -> Result<Handle> {
        self.0.running_mean()
    }

    pub fn round(&self, decimals: i32) -> Result<Handle> {
        self.0.round_partitions(decimals)
    }

    /// Groups this series by a static or streaming key.
    pub fn groupby(&self, key: impl Into<GroupKey>) -> GroupedHandle<'_> {
        GroupedHandle::new(&self.0, key.into())
    }
}

impl Deref for StreamingSeries {
    type Target = Streaming;

    fn deref(&self) -> &Streaming {
        &self.0
    }
}

impl AsRef<Streaming> for StreamingSeries {
    fn as_ref(&self) -> &Streaming {
        &self.0
    }
}

impl fmt::Display for StreamingSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use streamframe_core::{Error, Frame, Value};

    #[test]
    fn test_series_rejects_frames() {
        let s = StreamingSeries::new(Series::empty());
        let frame = Chunk::Frame(Frame::from_columns([("a", vec![Value::Int64(1)])]).unwrap());
        assert!(matches!(s.emit(frame), Err(Error::TypeViolation { .. })));
    }

    #[test]
    fn test_running_sum() {
        let s = StreamingSeries::new(Series::empty());
        let total = s.sum().unwrap();
        assert_eq!(total.example(), &Chunk::from(0i64));

        let out = total.sink_to_list();
        s.emit(Series::from_values([1i64, 2])).unwrap();
        s.emit(Series::from_values([3i64])).unwrap();
        assert_eq!(*out.borrow(), vec![Chunk::from(3i64), Chunk::from(6i64)]);
    }

    #[test]
    fn test_running_mean() {
        let s = StreamingSeries::new(Series::empty());
        let mean = s.mean().unwrap();
        let out = mean.sink_to_list();

        s.emit(Series::from_values([1i64, 2])).unwrap();
        s.emit(Series::from_values([6i64])).unwrap();
        assert_eq!(*out.borrow(), vec![Chunk::from(1.5f64), Chunk::from(3.0f64)]);
    }

    #[test]
    fn test_round() {
        let s = StreamingSeries::new(Series::from_values([1.26f64]));
        let rounded = s.round(1).unwrap();
        assert_eq!(rounded.example(), &Chunk::Series(Series::from_values([1.3f64])));
    }
}
