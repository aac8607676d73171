use std::rc::Rc;

use tracing::debug;

use crate::runtime::{
    error::Eval,
    generics::GenericArgs,
    interpreter::Interpreter,
    port::PortOutcome,
    value::Cell,
};
use crate::syntax::symbol::Symbol;

/// Hands the verb to the port's actor with the remaining arguments.
pub(super) fn act(ev: &mut Interpreter, verb: Symbol, args: &GenericArgs) -> Eval<Option<Cell>> {
    let Some(port) = args.get(0).as_port().map(Rc::clone) else {
        return Ok(None);
    };
    debug!(scheme = %port.scheme, verb = ev.spelling(verb), "port action");
    let actor = Rc::clone(&port.actor);
    match actor.act(ev, &port, verb, &args.values[1..])? {
        PortOutcome::Handled(value) => Ok(Some(value)),
        PortOutcome::Unhandled => Ok(None),
    }
}
