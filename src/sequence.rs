//! Lazy sequences over repeatable and single-use sources.
//!
//! A sequence built from a repeatable source mints a fresh cursor for every
//! operation. A sequence built from a single-use source memoizes what its
//! cursor produces, so each position is produced at most once no matter how
//! many operations run against it or against sequences derived from it.
//!
//! Sequences are not `Send` or `Sync`. Callbacks run while no internal borrow
//! is held and may traverse the same sequence again.

mod iter;
mod memo;

use std::{fmt, rc::Rc};

use num_traits::PrimInt;

use crate::{
    error::{Result, SequenceError},
    source::{CursorFactory, Source, SourceDescriptor},
};

use memo::MemoCache;

pub use iter::Iter;

/// The portion of the underlying source a sequence exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Window {
    start: usize,
    /// `None` means unbounded.
    limit: Option<usize>,
}

impl Window {
    const FULL: Window = Window {
        start: 0,
        limit: None,
    };

    fn take(self, count: usize) -> Self {
        Window {
            start: self.start,
            limit: Some(self.limit.map_or(count, |limit| limit.min(count))),
        }
    }

    fn skip(self, count: usize) -> Self {
        Window {
            start: self.start.saturating_add(count),
            limit: self.limit.map(|limit| limit.saturating_sub(count)),
        }
    }
}

enum SequenceKind<T> {
    Repeatable(Rc<dyn CursorFactory<T>>),
    Memoized(MemoCache<T>),
}

impl<T> Clone for SequenceKind<T> {
    fn clone(&self) -> Self {
        match self {
            SequenceKind::Repeatable(factory) => SequenceKind::Repeatable(factory.clone()),
            SequenceKind::Memoized(cache) => SequenceKind::Memoized(cache.clone()),
        }
    }
}

/// What a [`Sequence::for_each`] callback returns to decide whether to go on.
pub trait Visit {
    fn should_continue(self) -> bool;
}

impl Visit for bool {
    fn should_continue(self) -> bool {
        self
    }
}

impl Visit for () {
    fn should_continue(self) -> bool {
        true
    }
}

pub struct Sequence<T> {
    kind: SequenceKind<T>,
    window: Window,
}

impl<T> Sequence<T> {
    pub fn new(source: Source<T>) -> Self {
        let kind = match source {
            Source::Repeatable(factory) => SequenceKind::Repeatable(factory),
            Source::SingleUse(cursor) => SequenceKind::Memoized(MemoCache::new(cursor)),
        };
        Self {
            kind,
            window: Window::FULL,
        }
    }

    pub fn from_descriptor(descriptor: SourceDescriptor<T>) -> Result<Self> {
        Ok(Self::new(Source::classify(descriptor)?))
    }

    pub fn from_iter_fn<F, I>(f: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::new(Source::from_iter_fn(f))
    }

    pub fn from_iterator<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::new(Source::from_iterator(iter))
    }

    pub fn is_memoized(&self) -> bool {
        matches!(self.kind, SequenceKind::Memoized(_))
    }

    /// The number of values the shared cache holds, or `None` for sequences
    /// over repeatable sources.
    pub fn cached_len(&self) -> Option<usize> {
        match &self.kind {
            SequenceKind::Repeatable(_) => None,
            SequenceKind::Memoized(cache) => Some(cache.len()),
        }
    }

    /// Whether a memoized sequence has seen its cursor finish. Always `false`
    /// for repeatable sources.
    pub fn is_exhausted(&self) -> bool {
        match &self.kind {
            SequenceKind::Repeatable(_) => false,
            SequenceKind::Memoized(cache) => cache.is_finished(),
        }
    }

    /// Returns a sequence of at most the first `count` elements.
    ///
    /// Nothing is advanced. A memoized sequence and the result share their
    /// cache.
    pub fn take<N>(&self, count: N) -> Result<Self>
    where
        N: PrimInt,
    {
        Ok(self.with_window(self.window.take(to_bound(count)?)))
    }

    /// Returns a sequence without the first `count` elements.
    pub fn skip<N>(&self, count: N) -> Result<Self>
    where
        N: PrimInt,
    {
        Ok(self.with_window(self.window.skip(to_bound(count)?)))
    }

    fn with_window(&self, window: Window) -> Self {
        Self {
            kind: self.kind.clone(),
            window,
        }
    }
}

impl<T> Sequence<T>
where
    T: Clone,
{
    pub fn iter(&self) -> Iter<T> {
        match &self.kind {
            SequenceKind::Repeatable(factory) => Iter::fresh(factory.clone(), self.window),
            SequenceKind::Memoized(cache) => Iter::memoized(cache.clone(), self.window),
        }
    }

    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.iter().collect()
    }

    pub fn collect<C>(&self) -> Result<C>
    where
        C: FromIterator<T>,
    {
        self.iter().collect()
    }

    pub fn extend_into<C>(&self, target: &mut C) -> Result<()>
    where
        C: Extend<T>,
    {
        for value in self.iter() {
            target.extend(Some(value?));
        }
        Ok(())
    }

    /// Calls `callback` on each element in order and returns how many
    /// elements were visited.
    ///
    /// Stops as soon as `callback` returns `false`. That element is included
    /// in the count.
    pub fn for_each<F, R>(&self, mut callback: F) -> Result<usize>
    where
        F: FnMut(T) -> R,
        R: Visit,
    {
        let mut visited = 0;
        for value in self.iter() {
            let value = value?;
            visited += 1;
            if !callback(value).should_continue() {
                break;
            }
        }
        Ok(visited)
    }

    pub fn count(&self) -> Result<usize> {
        self.for_each(|_| true)
    }

    pub fn first(&self) -> Result<Option<T>> {
        self.iter().next().transpose()
    }

    pub fn get(&self, index: usize) -> Result<Option<T>> {
        self.with_window(self.window.skip(index)).first()
    }
}

fn to_bound<N>(count: N) -> Result<usize>
where
    N: PrimInt,
{
    if count < N::zero() {
        return Err(SequenceError::InvalidBound);
    }
    Ok(count.to_usize().unwrap_or(usize::MAX))
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        self.with_window(self.window)
    }
}

impl<T> From<Source<T>> for Sequence<T> {
    fn from(source: Source<T>) -> Self {
        Sequence::new(source)
    }
}

impl<T> TryFrom<SourceDescriptor<T>> for Sequence<T> {
    type Error = SequenceError;

    fn try_from(descriptor: SourceDescriptor<T>) -> Result<Self> {
        Sequence::from_descriptor(descriptor)
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T>
where
    T: Clone,
{
    type Item = Result<T>;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Iter<T> {
        self.iter()
    }
}

impl<T> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            SequenceKind::Repeatable(_) => "repeatable",
            SequenceKind::Memoized(_) => "memoized",
        };
        f.debug_struct("Sequence")
            .field("kind", &kind)
            .field("start", &self.window.start)
            .field("limit", &self.window.limit)
            .finish()
    }
}
