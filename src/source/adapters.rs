use std::iter::Fuse;

use super::{Cursor, CursorFactory};
use crate::error::Result;

/// A single-use cursor over a standard iterator.
pub struct IterCursor<I> {
    iter: Fuse<I>,
}

impl<I> IterCursor<I>
where
    I: Iterator,
{
    pub fn new(iter: I) -> Self {
        Self { iter: iter.fuse() }
    }
}

impl<I> Cursor<I::Item> for IterCursor<I>
where
    I: Iterator,
{
    fn advance(&mut self) -> Result<Option<I::Item>> {
        Ok(self.iter.next())
    }
}

/// A cursor driven by a closure that may fail.
///
/// Stays finished after the closure first reports `Ok(None)`. Errors leave it
/// live, so the next call invokes the closure again.
pub struct FnCursor<F> {
    body: F,
    finished: bool,
}

impl<F> FnCursor<F> {
    pub fn new<T>(body: F) -> Self
    where
        F: FnMut() -> Result<Option<T>>,
    {
        Self {
            body,
            finished: false,
        }
    }
}

impl<T, F> Cursor<T> for FnCursor<F>
where
    F: FnMut() -> Result<Option<T>>,
{
    fn advance(&mut self) -> Result<Option<T>> {
        if self.finished {
            return Ok(None);
        }
        let next = (self.body)()?;
        if next.is_none() {
            self.finished = true;
        }
        Ok(next)
    }
}

/// A repeatable source that builds a new iterator for every traversal.
pub struct IterFactory<F> {
    make_iter: F,
}

impl<F> IterFactory<F> {
    pub fn new(make_iter: F) -> Self {
        Self { make_iter }
    }
}

impl<T, F, I> CursorFactory<T> for IterFactory<F>
where
    F: Fn() -> I,
    I: IntoIterator<Item = T>,
    I::IntoIter: 'static,
{
    fn cursor(&self) -> Box<dyn Cursor<T>> {
        tracing::trace!("minting cursor");
        Box::new(IterCursor::new((self.make_iter)().into_iter()))
    }
}
