//! Multi-column streaming handles.

use crate::groupby::{GroupKey, GroupedHandle};
use crate::kind::Kind;
use crate::operand::Operand;
use crate::series::StreamingSeries;
use crate::streaming::{Handle, Streaming};
use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;
use streamframe_core::{Chunk, Error, Frame, Result, Selector};
use streamframe_reactive::Stream;

/// A stream of frame chunks sharing one column layout.
///
/// Every chunk emitted into a frame handle must carry exactly the example's
/// columns, in the same order.
#[derive(Clone, Debug)]
pub struct StreamingFrame(Streaming);

impl StreamingFrame {
    /// Creates a frame handle over a new source node.
    pub fn new(example: Frame) -> Self {
        Self(Streaming::with_kind(Stream::new(), Chunk::Frame(example), Kind::Frame))
    }

    /// Creates a frame handle whose example is an empty frame with these columns.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Frame::empty(columns))
    }

    pub(crate) fn from_streaming(inner: Streaming) -> Self {
        Self(inner)
    }

    pub fn into_streaming(self) -> Streaming {
        self.0
    }

    /// Column labels of the example, in order.
    pub fn columns(&self) -> &[String] {
        self.0.example().columns().unwrap_or(&[])
    }

    fn has_column(&self, name: &str) -> bool {
        self.columns().iter().any(|c| c == name)
    }

    /// Selects one column (series handle) or a list of columns (frame handle).
    pub fn get(&self, selector: impl Into<Selector>) -> Result<Handle> {
        let selector = selector.into();
        self.0.map_partitions(move |chunk| chunk.get(&selector), None)
    }

    /// Selects one column by name.
    ///
    /// Unlike `get`, a name that is not a column is reported as
    /// `UnknownMember`.
    pub fn column(&self, name: &str) -> Result<StreamingSeries> {
        if !self.has_column(name) {
            return Err(Error::unknown_member("StreamingFrame", name));
        }
        self.get(name)?.into_series()
    }

    /// Adds or replaces columns with the chunks of other handles.
    ///
    /// This frame's stream and every operand are zipped, so a tick is
    /// produced once all of them have delivered. Each operand must be a
    /// series sharing the frame's index; new columns are appended after the
    /// existing ones.
    pub fn assign<I, S, H>(&self, columns: I) -> Result<StreamingFrame>
    where
        I: IntoIterator<Item = (S, H)>,
        S: Into<String>,
        H: AsRef<Streaming>,
    {
        let mut names: Vec<String> = Vec::new();
        let mut operands: Vec<Streaming> = Vec::new();
        for (name, operand) in columns {
            let operand = operand.as_ref();
            if operand.kind() != Kind::Series {
                return Err(Error::invalid_operation(format!(
                    "only series can be assigned as columns, got a {}",
                    operand.kind()
                )));
            }
            names.push(name.into());
            operands.push(operand.clone());
        }
        if operands.is_empty() {
            return Ok(self.clone());
        }

        let mut parts: Vec<&Chunk> = Vec::with_capacity(operands.len() + 1);
        parts.push(self.0.example());
        parts.extend(operands.iter().map(|o| o.example()));
        let example = assign_columns(&parts, &names)?;

        let nodes: Vec<_> = operands.iter().map(|o| o.stream().clone()).collect();
        let node = self
            .0
            .stream()
            .zip_all(&nodes)
            .map(move |tick: &Vec<Chunk>| {
                let parts: Vec<&Chunk> = tick.iter().collect();
                assign_columns(&parts, &names)
            });
        Handle::from_parts(node, example).into_frame()
    }

    /// Returns a new handle with `keys` set from `value`.
    ///
    /// A series handle fills one column, a frame handle fills one column per
    /// key from its columns in order, and a constant is assigned to every
    /// chunk. The receiver is left unchanged; rebind to the returned handle.
    pub fn set_item(
        &self,
        keys: impl Into<Selector>,
        value: impl Into<Operand>,
    ) -> Result<StreamingFrame> {
        let keys: Selector = keys.into();
        let keys: Vec<String> = keys.names().into_iter().map(ToOwned::to_owned).collect();
        match value.into() {
            Operand::Stream(stream) => match stream.kind() {
                Kind::Series => {
                    let [key] = keys.as_slice() else {
                        return Err(Error::length_mismatch(1, keys.len()));
                    };
                    self.assign([(key.clone(), stream)])
                }
                Kind::Frame => {
                    let source = StreamingFrame::from_streaming(stream);
                    if source.columns().len() != keys.len() {
                        return Err(Error::length_mismatch(keys.len(), source.columns().len()));
                    }
                    let columns = keys
                        .iter()
                        .zip(source.columns())
                        .map(|(key, column)| Ok((key.clone(), source.column(column)?)))
                        .collect::<Result<Vec<_>>>()?;
                    self.assign(columns)
                }
                Kind::Generic => Err(Error::invalid_operation(
                    "cannot assign a stream of scalars to columns",
                )),
            },
            Operand::Constant(constant) => {
                let handle = self.0.map_partitions(
                    move |chunk| {
                        keys.iter()
                            .try_fold(chunk.clone(), |acc, key| acc.assign(key, &constant))
                    },
                    None,
                )?;
                handle.into_frame()
            }
        }
    }

    /// Groups rows by a column name, a label array or a streaming key.
    pub fn groupby(&self, key: impl Into<GroupKey>) -> GroupedHandle<'_> {
        GroupedHandle::new(&self.0, key.into())
    }

    /// Running per-column sum.
    pub fn sum(&self) -> Result<Handle> {
        self.0.running_sum()
    }

    /// Running per-column mean.
    pub fn mean(&self) -> Result<Handle> {
        self.0.running_mean()
    }

    pub fn round(&self, decimals: i32) -> Result<Handle> {
        self.0.round_partitions(decimals)
    }
}

/// Places operand series next to the frame in `parts[0]`.
///
/// Fresh names are concatenated column-wise; a name that already exists
/// replaces that column in place.
fn assign_columns(parts: &[&Chunk], names: &[String]) -> Result<Chunk> {
    let (frame, operands) = parts
        .split_first()
        .ok_or_else(|| Error::invalid_operation("nothing to assign to"))?;
    let existing = frame.columns().unwrap_or(&[]);
    let fresh = names.iter().enumerate().all(|(i, name)| {
        !existing.contains(name) && !names[..i].contains(name)
    });
    if fresh {
        let labels: Vec<String> = existing.iter().chain(names).cloned().collect();
        return Chunk::concat_columns(parts, &labels);
    }
    names
        .iter()
        .zip(operands)
        .try_fold((*frame).clone(), |acc, (name, value)| acc.assign(name, value))
}

impl Deref for StreamingFrame {
    type Target = Streaming;

    fn deref(&self) -> &Streaming {
        &self.0
    }
}

impl AsRef<Streaming> for StreamingFrame {
    fn as_ref(&self) -> &Streaming {
        &self.0
    }
}

impl fmt::Display for StreamingFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
