use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::{
    binding::Specifier,
    value::{ArrayRef, Cell},
};

#[derive(Debug)]
struct Segment {
    data: Rc<RefCell<Vec<Cell>>>,
    index: usize,
    specifier: Specifier,
}

/// The cursor an evaluation reads its code from.
///
/// Normally a single array position. MACRO results are pushed as extra
/// segments that are read to exhaustion before the enclosing array resumes.
#[derive(Debug)]
pub struct Feed {
    segments: Vec<Segment>,
}

impl Feed {
    pub fn new(array: &ArrayRef) -> Self {
        Self {
            segments: vec![Segment {
                data: Rc::clone(&array.data),
                index: array.index,
                specifier: array.specifier.clone(),
            }],
        }
    }

    fn drop_exhausted(&mut self) {
        while let Some(top) = self.segments.last() {
            if top.index < top.data.borrow().len() {
                break;
            }
            self.segments.pop();
        }
    }

    pub fn is_end(&mut self) -> bool {
        self.drop_exhausted();
        self.segments.is_empty()
    }

    /// The next cell and the specifier it must be resolved under.
    pub fn peek(&mut self) -> Option<(Cell, Specifier)> {
        self.drop_exhausted();
        let top = self.segments.last()?;
        let cell = top.data.borrow().get(top.index).cloned()?;
        Some((cell, top.specifier.clone()))
    }

    pub fn next(&mut self) -> Option<(Cell, Specifier)> {
        let item = self.peek()?;
        if let Some(top) = self.segments.last_mut() {
            top.index += 1;
        }
        Some(item)
    }

    /// Makes `array`'s cells the next thing this feed yields.
    pub fn splice(&mut self, array: &ArrayRef) {
        if array.is_empty() {
            return;
        }
        self.segments.push(Segment {
            data: Rc::clone(&array.data),
            index: array.index,
            specifier: array.specifier.clone(),
        });
    }
}
