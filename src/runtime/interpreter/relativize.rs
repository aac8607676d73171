use std::rc::Rc;

use crate::runtime::{
    binding::{Binding, Specifier, resolve},
    context::Keylist,
    interpreter::Interpreter,
    value::{ArrayRef, Cell, Payload, WordClass},
};

impl Interpreter {
    /// Deep-copies a body, binding words that name a key of `keylist`
    /// relative to it so each invocation resolves them in its own frame.
    ///
    /// Words that only resolve through the body's specifier (an enclosing
    /// frame or patch) are made specific first, so nested bodies keep
    /// seeing the outer frame.
    pub(crate) fn relativize(&self, body: &ArrayRef, keylist: &Rc<Keylist>) -> ArrayRef {
        let copied = body
            .to_vec()
            .into_iter()
            .map(|cell| self.relativize_cell(cell, &body.specifier, keylist))
            .collect();
        ArrayRef::new(copied)
    }

    fn relativize_cell(&self, mut cell: Cell, specifier: &Specifier, keylist: &Rc<Keylist>) -> Cell {
        match &mut cell.payload {
            Payload::Word(WordClass::Refinement, _) => {}
            Payload::Word(_, word) => {
                if let Some(index) = keylist.find(word.canon) {
                    word.binding = Binding::Relative {
                        keylist: Rc::clone(keylist),
                        index,
                    };
                } else if !specifier.is_specified() {
                    if let Ok((ctx, index)) = resolve(&self.arena, word, specifier, String::new) {
                        word.binding = Binding::Specific { ctx, index };
                    }
                }
            }
            Payload::Array(_, array) => {
                let inner = if array.specifier.is_specified() {
                    specifier.clone()
                } else {
                    array.specifier.clone()
                };
                *array = self.relativize(&array.with_specifier(inner), keylist);
            }
            _ => {}
        }
        cell
    }
}
