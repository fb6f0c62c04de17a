//! Producers that a [`Sequence`](crate::Sequence) can be built from.
//!
//! A producer is either repeatable, in which case it hands out a fresh
//! [`Cursor`] whenever asked, or it is a single [`Cursor`] that can only be
//! walked once.

mod adapters;

use std::{fmt, rc::Rc};

use crate::error::{Result, SequenceError};

pub use adapters::{FnCursor, IterCursor, IterFactory};

/// A stateful traversal handle.
pub trait Cursor<T> {
    /// Produces the next value, or `None` once the cursor is finished.
    ///
    /// Once this has returned `Ok(None)`, every later call must also return
    /// `Ok(None)`. An `Err` does not finish the cursor.
    fn advance(&mut self) -> Result<Option<T>>;
}

impl<T, C> Cursor<T> for Box<C>
where
    C: Cursor<T> + ?Sized,
{
    fn advance(&mut self) -> Result<Option<T>> {
        (**self).advance()
    }
}

/// A producer that can be traversed any number of times.
pub trait CursorFactory<T> {
    /// Returns a new cursor positioned at the start. Cursors returned by
    /// separate calls share no state.
    fn cursor(&self) -> Box<dyn Cursor<T>>;
}

pub enum Source<T> {
    Repeatable(Rc<dyn CursorFactory<T>>),
    SingleUse(Box<dyn Cursor<T>>),
}

impl<T> Source<T> {
    pub fn repeatable<F>(factory: F) -> Self
    where
        F: CursorFactory<T> + 'static,
    {
        Source::Repeatable(Rc::new(factory))
    }

    pub fn single_use<C>(cursor: C) -> Self
    where
        C: Cursor<T> + 'static,
    {
        Source::SingleUse(Box::new(cursor))
    }

    /// A repeatable source that calls `f` each time a traversal starts.
    pub fn from_iter_fn<F, I>(f: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::repeatable(IterFactory::new(f))
    }

    /// A single-use source draining `iter`.
    pub fn from_iterator<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::single_use(IterCursor::new(iter.into_iter()))
    }

    /// Picks the source kind from the capabilities a descriptor exposes.
    ///
    /// A factory takes precedence over a cursor. Neither the factory nor the
    /// cursor is touched.
    pub fn classify(descriptor: SourceDescriptor<T>) -> Result<Self> {
        let SourceDescriptor { factory, cursor } = descriptor;
        let source = match (factory, cursor) {
            (Some(factory), _) => Source::Repeatable(factory),
            (None, Some(cursor)) => Source::SingleUse(cursor),
            (None, None) => {
                tracing::debug!("source exposes no traversal capability");
                return Err(SequenceError::UnsupportedSourceKind);
            }
        };
        tracing::trace!(kind = source.kind_name(), "classified source");
        Ok(source)
    }

    pub fn is_repeatable(&self) -> bool {
        matches!(self, Source::Repeatable(_))
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Source::Repeatable(_) => "repeatable",
            Source::SingleUse(_) => "single-use",
        }
    }
}

impl<T> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Source").field(&self.kind_name()).finish()
    }
}

impl<T> TryFrom<SourceDescriptor<T>> for Source<T> {
    type Error = SequenceError;

    fn try_from(descriptor: SourceDescriptor<T>) -> Result<Self> {
        Source::classify(descriptor)
    }
}

/// The traversal capabilities of a producer whose kind is only known at
/// runtime.
pub struct SourceDescriptor<T> {
    factory: Option<Rc<dyn CursorFactory<T>>>,
    cursor: Option<Box<dyn Cursor<T>>>,
}

impl<T> SourceDescriptor<T> {
    pub fn new() -> Self {
        Self {
            factory: None,
            cursor: None,
        }
    }

    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: CursorFactory<T> + 'static,
    {
        self.factory = Some(Rc::new(factory));
        self
    }

    pub fn with_cursor<C>(mut self, cursor: C) -> Self
    where
        C: Cursor<T> + 'static,
    {
        self.cursor = Some(Box::new(cursor));
        self
    }

    pub fn has_factory(&self) -> bool {
        self.factory.is_some()
    }

    pub fn has_cursor(&self) -> bool {
        self.cursor.is_some()
    }
}

impl<T> Default for SourceDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}
