use std::rc::Rc;

use tracing::debug;

use crate::runtime::{
    action::{Action, Dispatcher},
    error::{Eval, RenError},
    frame::{Bounce, Frame, FrameState, Storage},
    interpreter::Interpreter,
    kind::Kind,
    value::Cell,
};

/// ENCLOSE: the caller's fulfilled frame is handed, as a FRAME! value, to
/// `outer`, which decides whether and how to run `inner` with it.
pub(crate) fn make_enclose(inner: &Rc<Action>, outer: &Rc<Action>) -> Eval<Rc<Action>> {
    let takes_frame = outer
        .caller_order()
        .first()
        .is_some_and(|slot| outer.paramlist.param(*slot).accepts_kind(Kind::Frame));
    if !takes_frame {
        return Err(RenError::BadParameter(
            "ENCLOSE needs an outer action whose first argument accepts frame!".to_string(),
        )
        .into());
    }
    Ok(Rc::new(Action::derived_from(
        inner,
        Dispatcher::Encloser {
            inner: Rc::clone(inner),
            outer: Rc::clone(outer),
        },
    )))
}

pub(crate) fn dispatch_encloser(
    ev: &mut Interpreter,
    frame: &mut Frame,
    inner: &Rc<Action>,
    outer: &Rc<Action>,
) -> Eval<Bounce> {
    let ctx = frame.ctx()?;
    let stolen = ev.arena.steal(ctx)?;
    frame.storage = Storage::Stolen;
    frame.state = FrameState::Stolen;
    ev.arena.get_mut(stolen)?.slots[0] = Cell::action(Rc::clone(inner));
    debug!(label = %ev.label_text(frame.label), "enclosed frame handed to outer action");

    let value = Cell::frame(stolen, Rc::clone(inner), frame.binding);
    ev.apply(outer, vec![value]).map(Bounce::Out)
}
