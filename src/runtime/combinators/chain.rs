use std::rc::Rc;

use crate::runtime::{
    action::{Action, Dispatcher},
    error::{Eval, RenError},
    frame::{Bounce, Frame},
};

/// CHAIN: calls the first action with the caller's arguments and pipes
/// each output into the next action as its only argument.
pub(crate) fn make_chain(pipeline: Vec<Rc<Action>>) -> Eval<Rc<Action>> {
    let Some(first) = pipeline.first() else {
        return Err(RenError::InvalidArg("CHAIN needs at least one action".to_string()).into());
    };
    for (position, action) in pipeline.iter().enumerate().skip(1) {
        let mandatory = action
            .caller_order()
            .into_iter()
            .filter(|slot| !action.paramlist.param(*slot).endable)
            .count();
        if mandatory != 1 {
            return Err(RenError::BadParameter(format!(
                "chained action {} must take exactly one argument, it takes {mandatory}",
                position + 1
            ))
            .into());
        }
    }
    let action = Action::derived_from(first, Dispatcher::Chainer { pipeline: pipeline.clone() });
    Ok(Rc::new(action))
}

pub(crate) fn dispatch_chainer(frame: &mut Frame, pipeline: &[Rc<Action>]) -> Eval<Bounce> {
    frame.pending.extend(pipeline[1..].iter().rev().cloned());
    Ok(Bounce::Redo {
        phase: Rc::clone(&pipeline[0]),
        typecheck: false,
    })
}
