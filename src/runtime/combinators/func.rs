use std::rc::Rc;

use crate::runtime::{
    action::{Action, Dispatcher},
    binding::Specifier,
    error::{Eval, Signal},
    frame::{Bounce, Frame},
    interpreter::Interpreter,
    paramlist::{ReturnMode, make_paramlist},
    value::{ArrayRef, Cell},
};
use crate::syntax::symbol::sym;

/// FUNC: a body run in a fresh frame per call, with a definitional RETURN.
pub(crate) fn make_func(ev: &Interpreter, spec: &ArrayRef, body: &ArrayRef) -> Eval<Rc<Action>> {
    let paramlist = make_paramlist(&spec.to_vec(), &ev.interner, ReturnMode::Definitional)?;
    let body = ev.relativize(body, &paramlist.keylist);
    Ok(Rc::new(Action::new(Rc::new(paramlist), Dispatcher::Func { body })))
}

/// Points the RETURN slot at this invocation, runs `body` in the frame and
/// turns a matching RETURN throw into the frame's output.
pub(crate) fn run_body_with_return(
    ev: &mut Interpreter,
    frame: &Frame,
    body: &ArrayRef,
) -> Eval<Cell> {
    let ctx = frame.ctx()?;
    if let Some(slot) = frame.phase.paramlist.return_slot() {
        let ret = Cell::action_bound(Rc::clone(ev.return_action()), Some(ctx), Some(sym::RETURN));
        ev.arena.get_mut(ctx)?.set(slot, ret);
    }
    let body = body.with_specifier(Specifier::Frame(ctx));
    match ev.eval_block(&body) {
        Err(Signal::Throw { label, value }) if ev.is_return_for(&label, ctx) => Ok(value),
        other => other,
    }
}

pub(crate) fn dispatch_func(ev: &mut Interpreter, frame: &mut Frame, body: &ArrayRef) -> Eval<Bounce> {
    run_body_with_return(ev, frame, body).map(Bounce::Out)
}
