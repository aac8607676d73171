use std::rc::Rc;

use crate::runtime::{
    action::Action,
    arena::ContextRef,
    error::RenError,
    value::{ArrayRef, Cell},
};
use crate::syntax::symbol::Symbol;

/// Where a frame's argument cells live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Live(ContextRef),
    /// Handed to a FRAME! value by ENCLOSE; this record may no longer touch it.
    Stolen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Fulfill,
    Typecheck,
    Dispatch,
    Done,
    Thrown,
    Stolen,
}

/// What a dispatcher asks the frame loop to do next.
#[derive(Debug)]
pub enum Bounce {
    Out(Cell),
    /// Run the same storage under another phase.
    Redo { phase: Rc<Action>, typecheck: bool },
    /// Splice this block into the caller's feed.
    Splice(ArrayRef),
    /// Produced no value (COMMENT, ELIDE).
    Invisible,
}

/// The outcome of one evaluation step or call.
#[derive(Debug)]
pub enum Completion {
    Value(Cell),
    Invisible,
    Splice(ArrayRef),
}

/// The in-flight record of one action invocation.
#[derive(Debug)]
pub struct Frame {
    pub storage: Storage,
    /// The phase currently being dispatched.
    pub phase: Rc<Action>,
    /// The action the caller invoked.
    pub original: Rc<Action>,
    /// Context the action cell was bound to (definitional RETURN, methods).
    pub binding: Option<ContextRef>,
    pub label: Option<Symbol>,
    pub state: FrameState,
    /// CHAIN actions still to run on the output, last to run first.
    pub pending: Vec<Rc<Action>>,
}

impl Frame {
    pub fn new(
        ctx: ContextRef,
        action: Rc<Action>,
        binding: Option<ContextRef>,
        label: Option<Symbol>,
    ) -> Self {
        Self {
            storage: Storage::Live(ctx),
            phase: Rc::clone(&action),
            original: action,
            binding,
            label,
            state: FrameState::Fulfill,
            pending: Vec::new(),
        }
    }

    pub fn ctx(&self) -> Result<ContextRef, RenError> {
        match self.storage {
            Storage::Live(ctx) => Ok(ctx),
            Storage::Stolen => Err(RenError::FrameStolen),
        }
    }
}
