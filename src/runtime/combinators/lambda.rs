use std::rc::Rc;

use crate::runtime::{
    action::{Action, Dispatcher},
    error::{Eval, RenError},
    frame::{Bounce, Frame},
    interpreter::Interpreter,
    paramlist::{ReturnMode, parse_params, paramlist_from},
    value::{ArrayRef, Cell},
};

/// LAMBDA: no RETURN, no typechecking, and no copying of the body. The
/// body runs under a patch exposing the frame's arguments by name.
pub(crate) fn make_lambda(ev: &Interpreter, spec: &ArrayRef, body: &ArrayRef) -> Eval<Rc<Action>> {
    let mut params = parse_params(&spec.to_vec(), &ev.interner, ReturnMode::None)?;
    for param in &mut params {
        if !param.is_argument() {
            return Err(RenError::BadParameter(format!(
                "lambda parameters must be plain words, not {}",
                ev.spelling(param.spelling)
            ))
            .into());
        }
        param.types = crate::runtime::kind::TypeSet::any_value();
        param.optional = true;
        param.isotopes = true;
    }
    let paramlist = paramlist_from(params);
    Ok(Rc::new(Action::new(
        Rc::new(paramlist),
        Dispatcher::Lambda { body: body.clone() },
    )))
}

pub(crate) fn dispatch_lambda(ev: &mut Interpreter, frame: &mut Frame, body: &ArrayRef) -> Eval<Bounce> {
    let ctx = frame.ctx()?;
    let specifier = ev.patches.patch(ctx, &body.specifier);
    let out = ev.eval_block(&body.with_specifier(specifier))?;
    Ok(Bounce::Out(out))
}

#[cfg(test)]
mod tests {
    use crate::runtime::interpreter::Interpreter;
    use crate::runtime::value::Cell;

    #[test]
    fn arguments_are_visible_by_name() {
        let mut ev = Interpreter::new();
        let result = ev.do_source("sq: lambda [x] [x * x] sq 7").unwrap();
        assert_eq!(result.value(), &Cell::integer(49));
    }

    #[test]
    fn body_is_shared_between_calls() {
        let mut ev = Interpreter::new();
        ev.do_source("f: lambda [x] [x] f 1 f 2").unwrap();
        let before = ev.patches.created();
        ev.do_source("f 3").unwrap();
        assert_eq!(ev.patches.created(), before + 1);
    }

    #[test]
    fn empty_body_is_void() {
        let mut ev = Interpreter::new();
        let result = ev.do_source("f: lambda [] [] meta f").unwrap();
        assert_eq!(ev.mold(result.value()), "~void~");
    }
}
