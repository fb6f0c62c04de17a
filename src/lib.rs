pub mod error;
pub mod sequence;
pub mod source;

#[cfg(test)]
mod testing;

pub use error::{Result, SequenceError};
pub use sequence::{Iter, Sequence, Visit};
pub use source::{Cursor, CursorFactory, Source, SourceDescriptor};
