use std::rc::Rc;

use crate::runtime::{
    action::{Action, Dispatcher, ParamClass},
    context::{ContextKind, Varlist},
    error::{Eval, RenError},
    interpreter::Interpreter,
    value::{ArrayRef, Cell, Payload, WordClass},
};

/// SPECIALIZE: fixes some arguments of `base`. The definition block runs
/// with the base's parameters visible by name; every parameter it sets is
/// removed from the caller-facing interface.
pub(crate) fn make_specialize(ev: &mut Interpreter, base: &Rc<Action>, def: &ArrayRef) -> Eval<Rc<Action>> {
    for cell in def.to_vec() {
        if let Payload::Word(WordClass::Set, word) = cell.payload() {
            if base.paramlist.find(word.canon).is_none() {
                return Err(RenError::BadParameter(format!(
                    "{} is not a parameter of the specialized action",
                    ev.spelling(word.spelling)
                ))
                .into());
            }
        }
    }

    let ctx = ev.arena.alloc(Varlist::new(
        ContextKind::Frame,
        Rc::clone(&base.paramlist.keylist),
        Cell::action(Rc::clone(base)),
        base.initial_values(),
    ));
    let specifier = ev.patches.patch(ctx, &def.specifier);
    ev.eval_block(&def.with_specifier(specifier))?;
    let values = ev.arena.get(ctx)?.values().to_vec();

    for (index, value) in values.iter().enumerate() {
        let slot = index + 1;
        if value.is_unset() || base.is_specialized(slot) {
            continue;
        }
        let param = base.paramlist.param(slot);
        let ok = match param.class {
            ParamClass::Flag => value.is_null() || value.as_logic().is_some(),
            ParamClass::Local | ParamClass::Return => true,
            _ => param.accepts(value),
        };
        if !ok {
            return Err(RenError::ExpectArg {
                action: "specialize".to_string(),
                param: ev.spelling(param.spelling).to_string(),
                got: value.type_name().to_string(),
            }
            .into());
        }
    }

    let mut action = Action::derived_from(
        base,
        Dispatcher::Specializer {
            base: Rc::clone(base),
        },
    );
    action.order = base.order.as_ref().map(|order| {
        Rc::new(
            order
                .iter()
                .copied()
                .filter(|slot| values[slot - 1].is_unset())
                .collect(),
        )
    });
    action.exemplar = Some(Rc::new(values));
    Ok(Rc::new(action))
}

#[cfg(test)]
mod tests {
    use crate::runtime::interpreter::Interpreter;
    use crate::runtime::value::Cell;

    #[test]
    fn specialized_arguments_leave_the_interface() {
        let mut ev = Interpreter::new();
        let result = ev
            .do_source("add10: specialize :add [value2: 10] add10 5")
            .unwrap();
        assert_eq!(result.value(), &Cell::integer(15));
    }

    #[test]
    fn refinements_can_be_specialized() {
        let mut ev = Interpreter::new();
        let result = ev
            .do_source(
                "append-only: specialize :append [only: true]
                 length-of append-only [1] [2 3]",
            )
            .unwrap();
        assert_eq!(result.value(), &Cell::integer(2));
    }

    #[test]
    fn unknown_names_fail() {
        let mut ev = Interpreter::new();
        let err = ev.do_source("specialize :add [nope: 1]").unwrap_err();
        assert_eq!(err.id(), "bad-parameter");
    }

    #[test]
    fn values_are_typechecked() {
        let mut ev = Interpreter::new();
        let err = ev
            .do_source("f: func [n [integer!]] [n] specialize :f [n: \"x\"]")
            .unwrap_err();
        assert_eq!(err.id(), "expect-arg");
    }
}
