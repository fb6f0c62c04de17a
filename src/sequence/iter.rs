use std::rc::Rc;

use super::{memo::MemoCache, Window};
use crate::{
    error::Result,
    source::{Cursor, CursorFactory},
};

enum Position<T> {
    /// A repeatable source. The cursor is minted on the first pull, and
    /// `skip` elements are discarded before anything is yielded.
    Fresh {
        factory: Rc<dyn CursorFactory<T>>,
        cursor: Option<Box<dyn Cursor<T>>>,
        skip: usize,
    },
    /// A read index into a shared cache.
    Memoized { cache: MemoCache<T>, next: usize },
    Finished,
}

/// A single traversal over a [`Sequence`](crate::Sequence).
///
/// Yields `Err` when the underlying cursor fails. The failed position is
/// retried on the next call.
pub struct Iter<T> {
    position: Position<T>,
    remaining: Option<usize>,
}

impl<T> Iter<T> {
    pub(super) fn fresh(factory: Rc<dyn CursorFactory<T>>, window: Window) -> Self {
        Self {
            position: Position::Fresh {
                factory,
                cursor: None,
                skip: window.start,
            },
            remaining: window.limit,
        }
    }

    pub(super) fn memoized(cache: MemoCache<T>, window: Window) -> Self {
        Self {
            position: Position::Memoized {
                cache,
                next: window.start,
            },
            remaining: window.limit,
        }
    }

    fn pull(&mut self) -> Result<Option<T>>
    where
        T: Clone,
    {
        match &mut self.position {
            Position::Fresh {
                factory,
                cursor,
                skip,
            } => {
                let cursor = cursor.get_or_insert_with(|| factory.cursor());
                while *skip > 0 {
                    if cursor.advance()?.is_none() {
                        return Ok(None);
                    }
                    *skip -= 1;
                }
                cursor.advance()
            }
            Position::Memoized { cache, next } => {
                let value = cache.get(*next)?;
                if value.is_some() {
                    *next += 1;
                }
                Ok(value)
            }
            Position::Finished => Ok(None),
        }
    }
}

impl<T> Iterator for Iter<T>
where
    T: Clone,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == Some(0) {
            return None;
        }
        match self.pull() {
            Ok(Some(value)) => {
                if let Some(remaining) = &mut self.remaining {
                    *remaining -= 1;
                }
                Some(Ok(value))
            }
            Ok(None) => {
                self.position = Position::Finished;
                None
            }
            Err(err) => Some(Err(err)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.position {
            Position::Finished => (0, Some(0)),
            _ => (0, self.remaining),
        }
    }
}
