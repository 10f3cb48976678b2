//! Typed streaming handles.
//!
//! A handle binds one stream node to an *example*: a small chunk that
//! describes the shape of everything flowing through the node. Every
//! derivation applies its operation to the example eagerly, so a broken
//! pipeline fails when it is built rather than when data arrives, and the
//! derived handle's variant is chosen by classifying the new example.

use crate::frame::StreamingFrame;
use crate::kind::{classify, Kind};
use crate::operand::Operand;
use crate::series::StreamingSeries;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::ops::Deref;
use streamframe_core::{BinaryOp, Chunk, ChunkKind, Error, Result, Window};
use streamframe_incremental::{accumulate_mean, accumulate_sum, roll, MeanState};
use streamframe_reactive::Stream;

/// A stream of chunks paired with an example of their shape.
#[derive(Clone)]
pub struct Streaming {
    node: Stream<Chunk>,
    example: Chunk,
    kind: Kind,
}

impl Streaming {
    /// Creates a generic handle over a new source node.
    ///
    /// Generic handles accept any chunk at `emit`.
    pub fn new(example: impl Into<Chunk>) -> Self {
        Self::with_kind(Stream::new(), example.into(), Kind::Generic)
    }

    pub(crate) fn with_kind(node: Stream<Chunk>, example: Chunk, kind: Kind) -> Self {
        Self { node, example, kind }
    }

    /// The underlying stream node.
    #[inline]
    pub fn stream(&self) -> &Stream<Chunk> {
        &self.node
    }

    #[inline]
    pub fn example(&self) -> &Chunk {
        &self.example
    }

    /// The variant this handle was built as.
    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Checks that `chunk` may flow through this handle.
    ///
    /// Generic handles accept anything. Series handles require a series and
    /// frame handles a frame with exactly the example's columns, in order.
    pub fn verify(&self, chunk: &Chunk) -> Result<()> {
        let expected = match self.kind {
            Kind::Generic => return Ok(()),
            Kind::Series => ChunkKind::Series,
            Kind::Frame => ChunkKind::Frame,
        };
        if chunk.kind() != expected {
            return Err(Error::type_violation(expected, chunk.kind()));
        }
        if let (Some(want), Some(got)) = (self.example.columns(), chunk.columns()) {
            if want != got {
                return Err(Error::schema_violation(want, got));
            }
        }
        Ok(())
    }

    /// Verifies `chunk` and pushes it through every derived handle.
    ///
    /// Returns the first error raised downstream during this tick; a chunk
    /// that fails verification never enters the graph.
    pub fn emit(&self, chunk: impl Into<Chunk>) -> Result<()> {
        let chunk = chunk.into();
        if let Err(err) = self.verify(&chunk) {
            tracing::warn!(stream = self.node.id(), kind = %self.kind, error = %err, "rejected chunk");
            return Err(err);
        }
        self.node.emit(chunk)
    }

    /// Collects every chunk reaching this handle.
    pub fn sink_to_list(&self) -> Rc<RefCell<Vec<Chunk>>> {
        self.node.sink_to_list()
    }

    /// Applies `f` to every chunk.
    ///
    /// Without an explicit `example` the new example is `f(example)`. Extra
    /// arguments are captured by the closure.
    pub fn map_partitions<F>(&self, f: F, example: Option<Chunk>) -> Result<Handle>
    where
        F: Fn(&Chunk) -> Result<Chunk> + 'static,
    {
        let example = match example {
            Some(example) => example,
            None => f(&self.example)?,
        };
        let node = self.node.map(move |chunk| f(chunk));
        Ok(Handle::from_parts(node, example))
    }

    /// Folds every chunk into a running value that is also the output.
    ///
    /// With `start = None` the first chunk seeds the state and is emitted
    /// as it is. The new example is `f(start, example)`, or the current
    /// example when there is no start.
    pub fn accumulate_partitions<F>(
        &self,
        start: Option<Chunk>,
        f: F,
        example: Option<Chunk>,
    ) -> Result<Handle>
    where
        F: Fn(&Chunk, &Chunk) -> Result<Chunk> + 'static,
    {
        let example = match (example, &start) {
            (Some(example), _) => example,
            (None, Some(start)) => f(start, &self.example)?,
            (None, None) => self.example.clone(),
        };
        let node = self.node.accumulate(start, move |acc, chunk| f(acc, chunk));
        Ok(Handle::from_parts(node, example))
    }

    /// Folds every chunk into private state, emitting a separate output.
    ///
    /// `f` returns `(new_state, output)`. The new example is the output half
    /// of `f(start, example)`; computing it does not touch the live state.
    pub fn accumulate_partitions_with_state<S, F>(
        &self,
        start: S,
        f: F,
        example: Option<Chunk>,
    ) -> Result<Handle>
    where
        S: 'static,
        F: Fn(&S, &Chunk) -> Result<(S, Chunk)> + 'static,
    {
        let example = match example {
            Some(example) => example,
            None => f(&start, &self.example)?.1,
        };
        let node = self.node.scan(start, move |state, chunk| f(state, chunk));
        Ok(Handle::from_parts(node, example))
    }

    /// Sliding window over the most recent rows.
    ///
    /// `Window::Rows(n)` keeps the last `n` rows. `Window::Duration(d)`
    /// keeps rows whose datetime index lies within `d` of the latest one and
    /// always uses `min_periods = 1`, whatever is passed here. Ticks with
    /// fewer than `min_periods` retained rows produce no output.
    ///
    /// The rolled handle keeps this handle's variant and example.
    pub fn rolling(&self, window: Window, min_periods: usize) -> Result<Handle> {
        if let Window::Rows(0) = window {
            return Err(Error::invalid_window("row window must be positive"));
        }
        let min_periods = window.effective_min_periods(min_periods);
        let node = self
            .node
            .scan(None::<Chunk>, move |buffer, chunk| {
                let (retained, visible) = roll(buffer.as_ref(), chunk, &window, min_periods)?;
                Ok((Some(retained), visible))
            })
            .filter_map(|visible: &Option<Chunk>| Ok(visible.clone()));
        Ok(Handle::wrap(Streaming::with_kind(node, self.example.clone(), self.kind)))
    }

    /// Applies a binary operator against a constant or another handle.
    ///
    /// A streaming operand is zipped with this handle first, so outputs
    /// appear once both sides have delivered a chunk.
    pub fn binary(&self, op: BinaryOp, rhs: impl Into<Operand>) -> Result<Handle> {
        match rhs.into() {
            Operand::Constant(constant) => {
                self.map_partitions(move |chunk| chunk.binary(op, &constant), None)
            }
            Operand::Stream(other) => {
                let example = self.example.binary(op, &other.example)?;
                let node = self
                    .node
                    .zip(&other.node)
                    .map(move |(lhs, rhs): &(Chunk, Chunk)| lhs.binary(op, rhs));
                Ok(Handle::from_parts(node, example))
            }
        }
    }

    pub fn add(&self, rhs: impl Into<Operand>) -> Result<Handle> {
        self.binary(BinaryOp::Add, rhs)
    }

    pub fn mul(&self, rhs: impl Into<Operand>) -> Result<Handle> {
        self.binary(BinaryOp::Mul, rhs)
    }

    pub fn rem(&self, rhs: impl Into<Operand>) -> Result<Handle> {
        self.binary(BinaryOp::Rem, rhs)
    }

    pub fn div(&self, rhs: impl Into<Operand>) -> Result<Handle> {
        self.binary(BinaryOp::Div, rhs)
    }

    pub fn floor_div(&self, rhs: impl Into<Operand>) -> Result<Handle> {
        self.binary(BinaryOp::FloorDiv, rhs)
    }

    /// Running sum: per column for frames, a scalar for series.
    pub(crate) fn running_sum(&self) -> Result<Handle> {
        self.accumulate_partitions(Some(Chunk::from(0i64)), accumulate_sum, None)
    }

    /// Running mean, carried as sums and counts.
    pub(crate) fn running_mean(&self) -> Result<Handle> {
        let start = MeanState::zero(&self.example)?;
        self.accumulate_partitions_with_state(start, accumulate_mean, None)
    }

    pub(crate) fn round_partitions(&self, decimals: i32) -> Result<Handle> {
        self.map_partitions(move |chunk| chunk.round(decimals), None)
    }

    /// Renders the html preview.
    pub fn to_html(&self) -> String {
        format!(
            "<h5>{} - elements like</h5>\n{}",
            self.kind,
            self.example.head(2).to_html()
        )
    }
}

impl AsRef<Streaming> for Streaming {
    fn as_ref(&self) -> &Streaming {
        self
    }
}

impl fmt::Display for Streaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - elements like:\n{}", self.kind, self.example.head(2))
    }
}

impl fmt::Debug for Streaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Streaming")
            .field("kind", &self.kind)
            .field("stream", &self.node)
            .field("example", &self.example)
            .finish()
    }
}

/// Any handle, tagged by variant.
#[derive(Clone, Debug)]
pub enum Handle {
    Frame(StreamingFrame),
    Series(StreamingSeries),
    Generic(Streaming),
}

impl Handle {
    /// Wraps a derived node, choosing the variant from `example`.
    pub fn from_parts(node: Stream<Chunk>, example: Chunk) -> Handle {
        let kind = classify(&example);
        tracing::debug!(stream = node.id(), kind = %kind, "derived handle");
        Handle::wrap(Streaming::with_kind(node, example, kind))
    }

    pub(crate) fn wrap(inner: Streaming) -> Handle {
        match inner.kind {
            Kind::Frame => Handle::Frame(StreamingFrame::from_streaming(inner)),
            Kind::Series => Handle::Series(StreamingSeries::from_streaming(inner)),
            Kind::Generic => Handle::Generic(inner),
        }
    }

    pub fn as_frame(&self) -> Option<&StreamingFrame> {
        match self {
            Handle::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_series(&self) -> Option<&StreamingSeries> {
        match self {
            Handle::Series(series) => Some(series),
            _ => None,
        }
    }

    /// Converts into a frame handle, or reports what the handle holds instead.
    pub fn into_frame(self) -> Result<StreamingFrame> {
        match self {
            Handle::Frame(frame) => Ok(frame),
            other => Err(Error::type_violation(ChunkKind::Frame, other.example().kind())),
        }
    }

    /// Converts into a series handle, or reports what the handle holds instead.
    pub fn into_series(self) -> Result<StreamingSeries> {
        match self {
            Handle::Series(series) => Ok(series),
            other => Err(Error::type_violation(ChunkKind::Series, other.example().kind())),
        }
    }

    /// The handle without its variant.
    pub fn into_streaming(self) -> Streaming {
        match self {
            Handle::Frame(frame) => frame.into_streaming(),
            Handle::Series(series) => series.into_streaming(),
            Handle::Generic(inner) => inner,
        }
    }
}

impl Deref for Handle {
    type Target = Streaming;

    fn deref(&self) -> &Streaming {
        match self {
            Handle::Frame(frame) => &**frame,
            Handle::Series(series) => &**series,
            Handle::Generic(inner) => inner,
        }
    }
}

impl AsRef<Streaming> for Handle {
    fn as_ref(&self) -> &Streaming {
        self.deref()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.deref(), f)
    }
}
