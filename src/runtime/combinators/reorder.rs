use std::rc::Rc;

use crate::runtime::{
    action::{Action, Dispatcher},
    error::{Eval, RenError},
    interpreter::Interpreter,
    value::Cell,
};

/// REORDER: same action, different caller-facing argument order.
///
/// Every mandatory argument must be named exactly once; endable arguments
/// that are not named keep their relative order at the end.
pub(crate) fn make_reorder(ev: &Interpreter, original: &Rc<Action>, names: &[Cell]) -> Eval<Rc<Action>> {
    let params = &original.paramlist;
    let mut order: Vec<usize> = Vec::with_capacity(names.len());
    for name in names {
        let Some(word) = name.as_word() else {
            return Err(RenError::BadParameter(format!(
                "REORDER expects words, got {}",
                name.type_name()
            ))
            .into());
        };
        let spelling = ev.spelling(word.spelling);
        let Some(slot) = params.find(word.canon) else {
            return Err(RenError::BadParameter(format!("unknown parameter {spelling}")).into());
        };
        if !params.param(slot).is_argument() || original.is_specialized(slot) {
            return Err(RenError::BadParameter(format!("{spelling} is not an argument")).into());
        }
        if order.contains(&slot) {
            return Err(RenError::BadParameter(format!("{spelling} named twice")).into());
        }
        order.push(slot);
    }
    for slot in original.caller_order() {
        if order.contains(&slot) {
            continue;
        }
        let param = params.param(slot);
        if !param.endable {
            return Err(RenError::BadParameter(format!(
                "REORDER must name mandatory parameter {}",
                ev.spelling(param.spelling)
            ))
            .into());
        }
        order.push(slot);
    }

    let mut action = Action::derived_from(
        original,
        Dispatcher::Reorderer {
            original: Rc::clone(original),
        },
    );
    action.order = Some(Rc::new(order));
    Ok(Rc::new(action))
}
