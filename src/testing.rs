//! Instrumented producers for tests.

use std::{cell::RefCell, rc::Rc};

use crate::{
    error::Result,
    source::{Cursor, CursorFactory},
};

/// A repeatable source of `0..max` whose cursors record every position they
/// produce.
#[derive(Clone)]
pub struct SimpleIterable {
    max: usize,
    watcher: Rc<RefCell<Vec<usize>>>,
}

impl SimpleIterable {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            watcher: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A single cursor over this iterable, sharing its recorder.
    pub fn iterator(&self) -> SimpleIterator {
        SimpleIterator {
            iterable: self.clone(),
            value: 0,
        }
    }

    pub fn calls(&self) -> Vec<usize> {
        self.watcher.borrow().clone()
    }
}

impl CursorFactory<usize> for SimpleIterable {
    fn cursor(&self) -> Box<dyn Cursor<usize>> {
        Box::new(self.iterator())
    }
}

pub struct SimpleIterator {
    iterable: SimpleIterable,
    value: usize,
}

impl Cursor<usize> for SimpleIterator {
    fn advance(&mut self) -> Result<Option<usize>> {
        if self.value >= self.iterable.max {
            return Ok(None);
        }
        let value = self.value;
        self.iterable.watcher.borrow_mut().push(value);
        self.value += 1;
        Ok(Some(value))
    }
}
