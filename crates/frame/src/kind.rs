//! Handle variants.

use core::fmt;
use streamframe_core::Chunk;

/// Which handle variant wraps a stream, decided from its example.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Frame,
    Series,
    Generic,
}

impl Kind {
    /// Name used in previews.
    pub fn type_name(&self) -> &'static str {
        match self {
            Kind::Frame => "StreamingFrame",
            Kind::Series => "StreamingSeries",
            Kind::Generic => "Streaming",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Classifies an example chunk.
pub fn classify(example: &Chunk) -> Kind {
    match example {
        Chunk::Frame(_) => Kind::Frame,
        Chunk::Series(_) => Kind::Series,
        Chunk::Scalar(_) => Kind::Generic,
    }
}
