use std::rc::Rc;

use crate::runtime::{
    action::{Action, Dispatcher},
    combinators::func::run_body_with_return,
    error::{Eval, RenError},
    frame::{Bounce, Frame},
    interpreter::Interpreter,
    paramlist::{ReturnMode, make_paramlist},
    value::ArrayRef,
};

/// MACRO: like FUNC, but the block it produces is spliced into the
/// caller's feed and evaluated as if it had been written there.
pub(crate) fn make_macro(ev: &Interpreter, spec: &ArrayRef, body: &ArrayRef) -> Eval<Rc<Action>> {
    let paramlist = make_paramlist(&spec.to_vec(), &ev.interner, ReturnMode::Definitional)?;
    let body = ev.relativize(body, &paramlist.keylist);
    Ok(Rc::new(Action::new(Rc::new(paramlist), Dispatcher::Macro { body })))
}

pub(crate) fn dispatch_macro(ev: &mut Interpreter, frame: &mut Frame, body: &ArrayRef) -> Eval<Bounce> {
    let out = run_body_with_return(ev, frame, body)?;
    match out.as_block() {
        Some(block) => Ok(Bounce::Splice(block.clone())),
        None => Err(RenError::MacroNotBlock {
            got: out.type_name().to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::interpreter::Interpreter;
    use crate::runtime::value::Cell;

    #[test]
    fn spliced_code_takes_following_arguments() {
        let mut ev = Interpreter::new();
        let result = ev
            .do_source(
                "m: macro [] [[add 1]]
                 m 2",
            )
            .unwrap();
        assert_eq!(result.value(), &Cell::integer(3));
    }

    #[test]
    fn non_block_results_fail() {
        let mut ev = Interpreter::new();
        let err = ev.do_source("m: macro [] [10] m").unwrap_err();
        assert_eq!(err.id(), "macro-not-block");
    }
}
