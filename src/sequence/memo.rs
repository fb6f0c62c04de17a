//! The append-only store behind sequences built from single-use sources.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{
    error::{Result, SequenceError},
    source::Cursor,
};

struct MemoState<T> {
    /// `values[i]` is what the cursor produced on its `i`-th advance.
    values: Vec<T>,
    /// `None` once the cursor has reported that it is finished.
    cursor: Option<Box<dyn Cursor<T>>>,
}

struct MemoShared<T> {
    /// Mirrors `state.values.len()`. Readable while `state` is borrowed.
    len: Cell<usize>,
    finished: Cell<bool>,
    state: RefCell<MemoState<T>>,
}

/// Shared handle to a single-use cursor and everything it has produced so far.
///
/// Clones share the same state, so every sequence derived from the original
/// reads from and extends one cache.
pub(crate) struct MemoCache<T> {
    shared: Rc<MemoShared<T>>,
}

impl<T> MemoCache<T> {
    pub fn new(cursor: Box<dyn Cursor<T>>) -> Self {
        Self {
            shared: Rc::new(MemoShared {
                len: Cell::new(0),
                finished: Cell::new(false),
                state: RefCell::new(MemoState {
                    values: Vec::new(),
                    cursor: Some(cursor),
                }),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.shared.len.get()
    }

    pub fn is_finished(&self) -> bool {
        self.shared.finished.get()
    }
}

impl<T> MemoCache<T>
where
    T: Clone,
{
    /// Returns the value at `index`, advancing the cursor only for positions
    /// that have not been produced yet.
    pub fn get(&self, index: usize) -> Result<Option<T>> {
        let shared = &*self.shared;
        let mut guard = shared
            .state
            .try_borrow_mut()
            .map_err(|_| SequenceError::Reentrant)?;
        let state = &mut *guard;

        while state.values.len() <= index {
            let Some(cursor) = state.cursor.as_mut() else {
                return Ok(None);
            };
            match cursor.advance() {
                Ok(Some(value)) => {
                    tracing::trace!(index = state.values.len(), "memoized value");
                    state.values.push(value);
                    shared.len.set(state.values.len());
                }
                Ok(None) => {
                    tracing::debug!(len = state.values.len(), "memoized cursor finished");
                    state.cursor = None;
                    shared.finished.set(true);
                }
                Err(err) => {
                    tracing::debug!(index = state.values.len(), error = %err, "cursor failed");
                    return Err(err);
                }
            }
        }

        Ok(state.values.get(index).cloned())
    }
}

impl<T> Clone for MemoCache<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{source::FnCursor, testing::SimpleIterable};
    use std::cell::Cell;

    #[derive(thiserror::Error, Debug)]
    #[error("producer broke")]
    struct Broken;

    #[test]
    fn fills_in_index_order() -> anyhow::Result<()> {
        let iterable = SimpleIterable::new(10);
        let cache: MemoCache<usize> = MemoCache::new(Box::new(iterable.iterator()));
        assert_eq!(cache.get(3)?, Some(3));
        assert_eq!(iterable.calls(), vec![0, 1, 2, 3]);
        assert_eq!(cache.len(), 4);
        Ok(())
    }

    #[test]
    fn hits_do_not_advance() -> anyhow::Result<()> {
        let iterable = SimpleIterable::new(10);
        let cache: MemoCache<usize> = MemoCache::new(Box::new(iterable.iterator()));
        cache.get(2)?;
        assert_eq!(cache.get(0)?, Some(0));
        assert_eq!(cache.get(2)?, Some(2));
        assert_eq!(iterable.calls(), vec![0, 1, 2]);
        Ok(())
    }

    #[test]
    fn records_finish_once() -> anyhow::Result<()> {
        let advances = Rc::new(Cell::new(0));
        let counter = advances.clone();
        let mut values = 0..2;
        let cache: MemoCache<i32> = MemoCache::new(Box::new(FnCursor::new(move || {
            counter.set(counter.get() + 1);
            Ok(values.next())
        })));
        assert_eq!(cache.get(5)?, None);
        assert!(cache.is_finished());
        assert_eq!(cache.get(7)?, None);
        assert_eq!(cache.get(1)?, Some(1));
        assert_eq!(advances.get(), 3);
        Ok(())
    }

    #[test]
    fn failed_advance_is_not_cached() -> anyhow::Result<()> {
        let fail_next = Rc::new(Cell::new(false));
        let trigger = fail_next.clone();
        let mut next = 0;
        let cache: MemoCache<i32> = MemoCache::new(Box::new(FnCursor::new(move || {
            if trigger.replace(false) {
                return Err(SequenceError::producer(Broken));
            }
            next += 1;
            Ok(Some(next - 1))
        })));

        assert_eq!(cache.get(1)?, Some(1));
        fail_next.set(true);
        let err = cache.get(2).unwrap_err();
        assert!(err.is_producer());
        assert_eq!(cache.len(), 2);
        assert!(!cache.is_finished());

        assert_eq!(cache.get(2)?, Some(2));
        assert_eq!(cache.len(), 3);
        Ok(())
    }

    #[test]
    fn reports_reentrant_advance() {
        let slot: Rc<RefCell<Option<MemoCache<i32>>>> = Rc::new(RefCell::new(None));
        let inner = slot.clone();
        let cache: MemoCache<i32> = MemoCache::new(Box::new(FnCursor::new(move || {
            let cache = inner.borrow().clone();
            match cache {
                Some(cache) => Ok(cache.get(0)?),
                None => Ok(None),
            }
        })));
        *slot.borrow_mut() = Some(cache.clone());
        assert!(matches!(cache.get(0), Err(SequenceError::Reentrant)));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn introspection_during_advance() -> anyhow::Result<()> {
        let slot: Rc<RefCell<Option<MemoCache<usize>>>> = Rc::new(RefCell::new(None));
        let inner = slot.clone();
        let mut produced = 0;
        let observed = Rc::new(RefCell::new(Vec::new()));
        let record = observed.clone();
        let cache: MemoCache<usize> = MemoCache::new(Box::new(FnCursor::new(move || {
            if let Some(cache) = inner.borrow().as_ref() {
                record.borrow_mut().push((cache.len(), cache.is_finished()));
            }
            if produced == 2 {
                return Ok(None);
            }
            produced += 1;
            Ok(Some(produced - 1))
        })));
        *slot.borrow_mut() = Some(cache.clone());

        assert_eq!(cache.get(5)?, None);
        assert_eq!(*observed.borrow(), vec![(0, false), (1, false), (2, false)]);
        assert_eq!(cache.len(), 2);
        assert!(cache.is_finished());
        Ok(())
    }
}
