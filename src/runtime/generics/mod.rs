//! Type-class handlers for GENERIC actions.
//!
//! A generic verb has no behavior of its own: the type of its first
//! argument picks a handler here, which answers the verb or reports that
//! it cannot.

use tracing::trace;

use crate::runtime::{
    error::{Eval, RenError},
    frame::{Bounce, Frame},
    interpreter::Interpreter,
    kind::Kind,
    value::Cell,
};
use crate::syntax::symbol::Symbol;

mod array;
mod context;
mod money;
mod number;
mod pair;
mod port;
mod text;


/// Families of datatypes that share one handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Number,
    Pair,
    Money,
    Array,
    Text,
    Context,
    Port,
}

impl TypeClass {
    pub fn of(kind: Kind) -> Option<TypeClass> {
        match kind {
            Kind::Integer | Kind::Decimal => Some(TypeClass::Number),
            Kind::Pair => Some(TypeClass::Pair),
            Kind::Money => Some(TypeClass::Money),
            Kind::Block | Kind::Group | Kind::Path | Kind::SetPath | Kind::GetPath => {
                Some(TypeClass::Array)
            }
            Kind::Text | Kind::Tag => Some(TypeClass::Text),
            Kind::Object | Kind::Frame => Some(TypeClass::Context),
            Kind::Port => Some(TypeClass::Port),
            _ => None,
        }
    }
}

/// Values of every parameter of the running phase, in spec order.
pub(crate) struct GenericArgs {
    pub values: Vec<Cell>,
}

impl GenericArgs {
    pub fn get(&self, index: usize) -> &Cell {
        &self.values[index]
    }

    /// Whether a refinement or flag at `index` was used.
    pub fn used(&self, index: usize) -> bool {
        self.values
            .get(index)
            .is_some_and(|value| !value.is_null() && value.as_logic() != Some(false))
    }
}

pub(crate) fn cannot_use(ev: &Interpreter, verb: Symbol, value: &Cell) -> RenError {
    RenError::CannotUse {
        verb: ev.spelling(verb).to_string(),
        type_name: value.type_name().to_string(),
    }
}

pub(crate) fn dispatch_generic(ev: &mut Interpreter, frame: &mut Frame, verb: Symbol) -> Eval<Bounce> {
    let ctx = frame.ctx()?;
    let values = ev.arena.get(ctx)?.values()[..frame.phase.paramlist.len()].to_vec();
    let Some(first) = frame
        .phase
        .first_argument_slot()
        .map(|slot| values[slot - 1].clone())
    else {
        return Err(RenError::BadParameter(format!(
            "generic {} has no argument to dispatch on",
            ev.spelling(verb)
        ))
        .into());
    };
    let args = GenericArgs { values };
    let class = TypeClass::of(first.kind());
    trace!(verb = ev.spelling(verb), class = ?class, "generic dispatch");

    let out = match class {
        Some(TypeClass::Number) => number::act(ev, verb, &args)?,
        Some(TypeClass::Pair) => pair::act(ev, verb, &args)?,
        Some(TypeClass::Money) => money::act(ev, verb, &args)?,
        Some(TypeClass::Array) => array::act(ev, verb, &args)?,
        Some(TypeClass::Text) => text::act(ev, verb, &args)?,
        Some(TypeClass::Context) => context::act(ev, verb, &args)?,
        Some(TypeClass::Port) => port::act(ev, verb, &args)?,
        None => None,
    };
    match out {
        Some(value) => Ok(Bounce::Out(value)),
        None => Err(cannot_use(ev, verb, &first).into()),
    }
}
