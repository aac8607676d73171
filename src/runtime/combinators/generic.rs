use std::rc::Rc;

use crate::runtime::{
    action::{Action, Dispatcher},
    error::Eval,
    interpreter::Interpreter,
    paramlist::{ReturnMode, make_paramlist},
    value::ArrayRef,
};
use crate::syntax::symbol::Symbol;

/// GENERIC: an action whose behavior is chosen by the type class of its
/// first argument, under the verb `verb`.
pub(crate) fn make_generic(ev: &Interpreter, verb: Symbol, spec: &ArrayRef) -> Eval<Rc<Action>> {
    let paramlist = make_paramlist(&spec.to_vec(), &ev.interner, ReturnMode::None)?;
    let verb = ev.interner.canon(verb);
    Ok(Rc::new(Action::new(Rc::new(paramlist), Dispatcher::Generic { verb })))
}
