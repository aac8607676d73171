use std::rc::Rc;

use crate::runtime::{
    action::{Action, Dispatcher},
    combinators::{
        adapt::make_adapt, augment::make_augment, chain::make_chain, does::make_does,
        enclose::make_enclose, func::make_func, generic::make_generic, lambda::make_lambda,
        macros::make_macro, oneshot::make_n_shot, reorder::make_reorder,
        specialize::make_specialize,
    },
    error::{Eval, RenError},
    frame::{Bounce, Frame},
    interpreter::Interpreter,
    value::Cell,
};

use super::helpers::{arg_action, arg_block, arg_integer, reduce_block, type_error, used};

fn out(action: Rc<Action>) -> Eval<Bounce> {
    Ok(Bounce::Out(Cell::action(action)))
}

pub(super) fn native_func(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let spec = arg_block(ev, frame, 1, "func", "spec")?;
    let body = arg_block(ev, frame, 2, "func", "body")?;
    out(make_func(ev, &spec, &body)?)
}

pub(super) fn native_lambda(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let spec = arg_block(ev, frame, 1, "lambda", "spec")?;
    let body = arg_block(ev, frame, 2, "lambda", "body")?;
    out(make_lambda(ev, &spec, &body)?)
}

pub(super) fn native_does(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let body = arg_block(ev, frame, 1, "does", "body")?;
    out(make_does(&body))
}

pub(super) fn native_macro(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let spec = arg_block(ev, frame, 1, "macro", "spec")?;
    let body = arg_block(ev, frame, 2, "macro", "body")?;
    out(make_macro(ev, &spec, &body)?)
}

pub(super) fn native_adapt(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let adaptee = arg_action(ev, frame, 1, "adapt", "adaptee")?;
    let prelude = arg_block(ev, frame, 2, "adapt", "prelude")?;
    out(make_adapt(ev, &adaptee, &prelude))
}

/// CHAIN [:f :g ...]: the block is reduced and must yield only actions.
pub(super) fn native_chain(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let block = arg_block(ev, frame, 1, "chain", "pipeline")?;
    let pipeline = reduce_block(ev, &block)?
        .into_iter()
        .map(|cell| {
            cell.as_action()
                .map(Rc::clone)
                .ok_or_else(|| type_error("chain", "pipeline item", "action!", &cell))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if pipeline.is_empty() {
        return Err(RenError::BadParameter("CHAIN needs at least one action".to_string()).into());
    }
    out(make_chain(pipeline)?)
}

pub(super) fn native_enclose(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let inner = arg_action(ev, frame, 1, "enclose", "inner")?;
    let outer = arg_action(ev, frame, 2, "enclose", "outer")?;
    out(make_enclose(&inner, &outer)?)
}

pub(super) fn native_augment(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let base = arg_action(ev, frame, 1, "augment", "base")?;
    let spec = arg_block(ev, frame, 2, "augment", "spec")?;
    out(make_augment(ev, &base, &spec)?)
}

pub(super) fn native_reorder(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let original = arg_action(ev, frame, 1, "reorder", "original")?;
    let ordering = arg_block(ev, frame, 2, "reorder", "ordering")?;
    out(make_reorder(ev, &original, &ordering.to_vec())?)
}

pub(super) fn native_specialize(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let base = arg_action(ev, frame, 1, "specialize", "base")?;
    let def = arg_block(ev, frame, 2, "specialize", "def")?;
    out(make_specialize(ev, &base, &def)?)
}

pub(super) fn native_n_shot(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let n = arg_integer(ev, frame, 1, "n-shot", "n")?;
    let spelling = ev.intern("block");
    let canon = ev.interner.canon(spelling);
    out(make_n_shot((spelling, canon), n))
}

pub(super) fn native_generic(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let verb = ev.arg(frame, 1)?;
    let Some(verb) = verb.as_symbol() else {
        return Err(type_error("generic", "verb", "word!", &verb).into());
    };
    let spec = arg_block(ev, frame, 2, "generic", "spec")?;
    out(make_generic(ev, verb, &spec)?)
}

/// ENFIX action /defer: the same behavior, taking its first argument from
/// the left.
pub(super) fn native_enfix(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let base = arg_action(ev, frame, 1, "enfix", "action")?;
    let defer = used(ev, frame, 2)?;
    let mut action = Action::derived_from(
        &base,
        Dispatcher::Specializer {
            base: Rc::clone(&base),
        },
    );
    action.enfix = true;
    action.defer = defer;
    out(Rc::new(action))
}
