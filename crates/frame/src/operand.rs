//! Right-hand operands and arithmetic operator sugar.

use crate::frame::StreamingFrame;
use crate::series::StreamingSeries;
use crate::streaming::{Handle, Streaming};
use core::ops::{Add, Div, Mul, Rem};
use streamframe_core::{Chunk, Frame, Result, Series, Value};

/// Right-hand side of a handle operation: a fixed chunk or another stream.
#[derive(Clone, Debug)]
pub enum Operand {
    Constant(Chunk),
    Stream(Streaming),
}

impl From<Chunk> for Operand {
    fn from(chunk: Chunk) -> Self {
        Operand::Constant(chunk)
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Constant(Chunk::Scalar(value))
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Constant(Chunk::from(value))
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Constant(Chunk::from(value))
    }
}

impl From<Series> for Operand {
    fn from(series: Series) -> Self {
        Operand::Constant(Chunk::Series(series))
    }
}

impl From<Frame> for Operand {
    fn from(frame: Frame) -> Self {
        Operand::Constant(Chunk::Frame(frame))
    }
}

impl From<Streaming> for Operand {
    fn from(stream: Streaming) -> Self {
        Operand::Stream(stream)
    }
}

impl From<&Streaming> for Operand {
    fn from(stream: &Streaming) -> Self {
        Operand::Stream(stream.clone())
    }
}

impl From<Handle> for Operand {
    fn from(handle: Handle) -> Self {
        Operand::Stream(handle.into_streaming())
    }
}

impl From<&Handle> for Operand {
    fn from(handle: &Handle) -> Self {
        Operand::Stream(Streaming::clone(handle))
    }
}

impl From<StreamingFrame> for Operand {
    fn from(frame: StreamingFrame) -> Self {
        Operand::Stream(frame.into_streaming())
    }
}

impl From<&StreamingFrame> for Operand {
    fn from(frame: &StreamingFrame) -> Self {
        Operand::Stream(Streaming::clone(frame))
    }
}

impl From<StreamingSeries> for Operand {
    fn from(series: StreamingSeries) -> Self {
        Operand::Stream(series.into_streaming())
    }
}

impl From<&StreamingSeries> for Operand {
    fn from(series: &StreamingSeries) -> Self {
        Operand::Stream(Streaming::clone(series))
    }
}

// `&handle + rhs` and friends; the result is fallible because the example is
// checked eagerly.
macro_rules! impl_binary_ops {
    ($($ty:ty),*) => {$(
        impl<R: Into<Operand>> Add<R> for &$ty {
            type Output = Result<Handle>;
            fn add(self, rhs: R) -> Result<Handle> {
                AsRef::<Streaming>::as_ref(self).add(rhs)
            }
        }

        impl<R: Into<Operand>> Mul<R> for &$ty {
            type Output = Result<Handle>;
            fn mul(self, rhs: R) -> Result<Handle> {
                AsRef::<Streaming>::as_ref(self).mul(rhs)
            }
        }

        impl<R: Into<Operand>> Rem<R> for &$ty {
            type Output = Result<Handle>;
            fn rem(self, rhs: R) -> Result<Handle> {
                AsRef::<Streaming>::as_ref(self).rem(rhs)
            }
        }

        impl<R: Into<Operand>> Div<R> for &$ty {
            type Output = Result<Handle>;
            fn div(self, rhs: R) -> Result<Handle> {
                AsRef::<Streaming>::as_ref(self).div(rhs)
            }
        }
    )*};
}

impl_binary_ops!(Streaming, StreamingFrame, StreamingSeries, Handle);

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use streamframe_core::Series;

    fn ints(values: &[i64]) -> Chunk {
        Chunk::Series(Series::from_values(values.iter().copied()))
    }

    #[test]
    fn test_operator_sugar_matches_methods() {
        let s = StreamingSeries::new(Series::from_values([2i64, 5]));
        let doubled = (&s * 2i64).unwrap();
        assert_eq!(doubled.example(), &ints(&[4, 10]));

        let modded = (&s % 2i64).unwrap();
        assert_eq!(modded.example(), &ints(&[0, 1]));

        let halved = (&s / 2i64).unwrap();
        assert_eq!(
            halved.example(),
            &Chunk::Series(Series::from_values([1.0f64, 2.5]))
        );
    }

    #[test]
    fn test_operator_with_streaming_rhs() {
        let a = StreamingSeries::new(Series::empty());
        let b = StreamingSeries::new(Series::empty());
        let total = (&a + &b).unwrap();
        let out = total.sink_to_list();

        a.emit(ints(&[1, 2])).unwrap();
        b.emit(ints(&[10, 20])).unwrap();
        assert_eq!(*out.borrow(), vec![ints(&[11, 22])]);
    }
}
