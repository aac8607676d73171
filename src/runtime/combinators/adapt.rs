use std::rc::Rc;

use crate::runtime::{
    action::{Action, Dispatcher},
    binding::Specifier,
    error::Eval,
    frame::{Bounce, Frame},
    interpreter::Interpreter,
    value::ArrayRef,
};

/// ADAPT: runs `prelude` against the fulfilled frame (it may rewrite
/// arguments), then hands the same frame to `adaptee`.
pub(crate) fn make_adapt(ev: &Interpreter, adaptee: &Rc<Action>, prelude: &ArrayRef) -> Rc<Action> {
    let prelude = ev.relativize(prelude, &adaptee.paramlist.keylist);
    Rc::new(Action::derived_from(
        adaptee,
        Dispatcher::Adapter {
            prelude,
            adaptee: Rc::clone(adaptee),
        },
    ))
}

pub(crate) fn dispatch_adapter(
    ev: &mut Interpreter,
    frame: &mut Frame,
    prelude: &ArrayRef,
    adaptee: &Rc<Action>,
) -> Eval<Bounce> {
    let ctx = frame.ctx()?;
    ev.eval_block(&prelude.with_specifier(Specifier::Frame(ctx)))?;
    Ok(Bounce::Redo {
        phase: Rc::clone(adaptee),
        typecheck: true,
    })
}
