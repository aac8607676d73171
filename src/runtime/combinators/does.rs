use std::rc::Rc;

use crate::runtime::{
    action::{Action, Dispatcher},
    error::Eval,
    frame::{Bounce, Frame},
    paramlist::paramlist_from,
    interpreter::Interpreter,
    value::ArrayRef,
};

/// DOES: an action with no parameters that evaluates a block.
pub(crate) fn make_does(body: &ArrayRef) -> Rc<Action> {
    Rc::new(Action::new(
        Rc::new(paramlist_from(Vec::new())),
        Dispatcher::Does { body: body.clone() },
    ))
}

pub(crate) fn dispatch_does(ev: &mut Interpreter, _frame: &mut Frame, body: &ArrayRef) -> Eval<Bounce> {
    ev.eval_block(body).map(Bounce::Out)
}
