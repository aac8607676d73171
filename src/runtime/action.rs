use std::cell::Cell as Counter;
use std::fmt;
use std::rc::Rc;

use crate::runtime::{
    context::Keylist,
    error::Eval,
    frame::{Bounce, Frame},
    interpreter::Interpreter,
    kind::{Kind, TypeSet},
    value::{ArrayRef, Cell},
};
use crate::syntax::symbol::Symbol;

/// Signature of a native implemented in Rust.
pub type NativeFn = fn(&mut Interpreter, &mut Frame) -> Eval<Bounce>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamClass {
    /// Evaluated argument.
    Normal,
    /// Taken literally from the feed (`'name`).
    Quoted,
    /// `/name [types]`: takes one evaluated argument when used.
    Refinement,
    /// `/name` with no types: LOGIC! true when used.
    Flag,
    /// `<local>` slot, never fulfilled.
    Local,
    /// Definitional RETURN slot of FUNC and MACRO.
    Return,
}

/// One parameter descriptor.
#[derive(Debug, Clone)]
pub struct Param {
    pub spelling: Symbol,
    pub canon: Symbol,
    pub class: ParamClass,
    pub types: TypeSet,
    /// `<opt>`: NULL (and the `~null~` isotope) accepted.
    pub optional: bool,
    /// `<end>`: may be omitted at the end of the feed.
    pub endable: bool,
    /// `<isotope>`: any isotope accepted.
    pub isotopes: bool,
}

impl Param {
    pub fn accepts(&self, value: &Cell) -> bool {
        if value.is_isotope() {
            return self.isotopes || (self.optional && value.is_nullish());
        }
        if value.is_null() {
            return self.optional || self.endable;
        }
        self.types.contains(value.kind())
    }

    /// Whether callers must supply this parameter.
    pub fn is_argument(&self) -> bool {
        matches!(self.class, ParamClass::Normal | ParamClass::Quoted)
    }

    pub fn accepts_kind(&self, kind: Kind) -> bool {
        self.types.contains(kind)
    }
}

/// The interface of an action: a keylist plus parameter descriptors in
/// matching order (`params[i]` describes slot `i + 1`).
#[derive(Debug, Clone)]
pub struct Paramlist {
    pub keylist: Rc<Keylist>,
    pub params: Vec<Param>,
}

impl Paramlist {
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// 1-based slot of a parameter by canon.
    pub fn find(&self, canon: Symbol) -> Option<usize> {
        self.params
            .iter()
            .position(|param| param.canon == canon)
            .map(|pos| pos + 1)
    }

    pub fn param(&self, slot: usize) -> &Param {
        &self.params[slot - 1]
    }

    pub fn return_slot(&self) -> Option<usize> {
        self.params
            .iter()
            .position(|param| param.class == ParamClass::Return)
            .map(|pos| pos + 1)
    }
}

/// Per-action behavior, one variant per kind of dispatcher.
pub enum Dispatcher {
    Native(NativeFn),
    Func { body: ArrayRef },
    Lambda { body: ArrayRef },
    Does { body: ArrayRef },
    Macro { body: ArrayRef },
    Adapter { prelude: ArrayRef, adaptee: Rc<Action> },
    Chainer { pipeline: Vec<Rc<Action>> },
    Encloser { inner: Rc<Action>, outer: Rc<Action> },
    Augmenter { base: Rc<Action> },
    Reorderer { original: Rc<Action> },
    Specializer { base: Rc<Action> },
    Generic { verb: Symbol },
    /// Runs its block while the count is positive, then yields NULL forever.
    Downshot { remaining: Counter<i64> },
    /// Yields NULL while the count is negative, then runs its block.
    Upshot { pending: Counter<i64> },
}

impl Dispatcher {
    pub fn name(&self) -> &'static str {
        match self {
            Dispatcher::Native(_) => "native",
            Dispatcher::Func { .. } => "func",
            Dispatcher::Lambda { .. } => "lambda",
            Dispatcher::Does { .. } => "does",
            Dispatcher::Macro { .. } => "macro",
            Dispatcher::Adapter { .. } => "adapter",
            Dispatcher::Chainer { .. } => "chainer",
            Dispatcher::Encloser { .. } => "encloser",
            Dispatcher::Augmenter { .. } => "augmenter",
            Dispatcher::Reorderer { .. } => "reorderer",
            Dispatcher::Specializer { .. } => "specializer",
            Dispatcher::Generic { .. } => "generic",
            Dispatcher::Downshot { .. } => "downshot",
            Dispatcher::Upshot { .. } => "upshot",
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dispatcher::{}", self.name())
    }
}

/// A callable: interface, optional specializations, and behavior.
#[derive(Debug)]
pub struct Action {
    pub paramlist: Rc<Paramlist>,
    /// Values per parameter slot; unspecialized slots hold `~unset~`.
    pub exemplar: Option<Rc<Vec<Cell>>>,
    pub dispatcher: Dispatcher,
    /// Caller-facing fulfillment order as 1-based slots (REORDER).
    pub order: Option<Rc<Vec<usize>>>,
    pub enfix: bool,
    /// Deferred enfix is not taken while an argument is being gathered.
    pub defer: bool,
}

impl Action {
    pub fn new(paramlist: Rc<Paramlist>, dispatcher: Dispatcher) -> Self {
        Self {
            paramlist,
            exemplar: None,
            dispatcher,
            order: None,
            enfix: false,
            defer: false,
        }
    }

    /// Builds an action reusing another's interface, specializations and
    /// caller order.
    pub fn derived_from(base: &Action, dispatcher: Dispatcher) -> Self {
        Self {
            paramlist: Rc::clone(&base.paramlist),
            exemplar: base.exemplar.clone(),
            dispatcher,
            order: base.order.clone(),
            enfix: false,
            defer: false,
        }
    }

    pub fn is_specialized(&self, slot: usize) -> bool {
        self.exemplar
            .as_ref()
            .is_some_and(|values| !values[slot - 1].is_unset())
    }

    /// Initial slot values for a new frame.
    pub fn initial_values(&self) -> Vec<Cell> {
        match &self.exemplar {
            Some(values) => values.as_ref().clone(),
            None => vec![Cell::unset(); self.paramlist.len()],
        }
    }

    /// Slots callers fill positionally, in caller order.
    pub fn caller_order(&self) -> Vec<usize> {
        if let Some(order) = &self.order {
            return order.iter().copied().collect();
        }
        (1..=self.paramlist.len())
            .filter(|slot| self.paramlist.param(*slot).is_argument() && !self.is_specialized(*slot))
            .collect()
    }

    /// First argument slot in spec order, specialized or not; GENERIC
    /// dispatches on it.
    pub fn first_argument_slot(&self) -> Option<usize> {
        (1..=self.paramlist.len()).find(|slot| self.paramlist.param(*slot).is_argument())
    }

    /// Cells this action keeps alive: specializations, bodies and the
    /// actions it wraps.
    pub(crate) fn referenced_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self
            .exemplar
            .as_ref()
            .map(|values| values.as_ref().clone())
            .unwrap_or_default();
        match &self.dispatcher {
            Dispatcher::Func { body }
            | Dispatcher::Lambda { body }
            | Dispatcher::Does { body }
            | Dispatcher::Macro { body } => cells.push(Cell::array(
                crate::runtime::value::ArrayClass::Block,
                body.clone(),
            )),
            Dispatcher::Adapter { prelude, adaptee } => {
                cells.push(Cell::array(
                    crate::runtime::value::ArrayClass::Block,
                    prelude.clone(),
                ));
                cells.push(Cell::action(Rc::clone(adaptee)));
            }
            Dispatcher::Chainer { pipeline } => {
                cells.extend(pipeline.iter().cloned().map(Cell::action));
            }
            Dispatcher::Encloser { inner, outer } => {
                cells.push(Cell::action(Rc::clone(inner)));
                cells.push(Cell::action(Rc::clone(outer)));
            }
            Dispatcher::Augmenter { base }
            | Dispatcher::Specializer { base }
            | Dispatcher::Reorderer { original: base } => cells.push(Cell::action(Rc::clone(base))),
            Dispatcher::Native(_)
            | Dispatcher::Generic { .. }
            | Dispatcher::Downshot { .. }
            | Dispatcher::Upshot { .. } => {}
        }
        cells
    }
}
