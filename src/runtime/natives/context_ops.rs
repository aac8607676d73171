use std::rc::Rc;

use tracing::debug;

use crate::runtime::{
    action::ParamClass,
    arena::ContextRef,
    binding::Specifier,
    context::{ContextKind, Key, Keylist, Varlist},
    error::{Eval, RenError},
    frame::{Bounce, Frame},
    interpreter::Interpreter,
    kind::Kind,
    value::{ArrayRef, Cell, CellFlags, Payload, WordClass},
};

use super::helpers::{type_error, used};

/// GET word /any: without /ANY the value decays as on an ordinary fetch.
pub(super) fn native_get(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let source = ev.arg(frame, 1)?;
    let any = used(ev, frame, 2)?;
    let value = match source.payload() {
        Payload::Word(_, word) => {
            let raw = ev.fetch(word, &Specifier::Specified)?;
            if any {
                raw
            } else {
                ev.decay(word.spelling, raw)?
            }
        }
        Payload::Array(_, path) if matches!(source.kind(), Kind::Path | Kind::GetPath) => {
            ev.get_path(path)?
        }
        _ => return Err(type_error("get", "source", "word! or path!", &source).into()),
    };
    Ok(Bounce::Out(value))
}

pub(super) fn native_set(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let target = ev.arg(frame, 1)?;
    let value = ev.arg(frame, 2)?;
    match target.payload() {
        Payload::Word(_, word) => ev.assign(word, &Specifier::Specified, value.clone())?,
        Payload::Array(_, path) if matches!(target.kind(), Kind::Path | Kind::SetPath) => {
            ev.set_path(path, value.clone())?
        }
        _ => return Err(type_error("set", "target", "word! or path!", &target).into()),
    }
    Ok(Bounce::Out(value))
}

/// MAKE object!/frame!/error! and MAKE of an existing object (derivation).
pub(super) fn native_make(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let kind = ev.arg(frame, 1)?;
    let def = ev.arg(frame, 2)?;
    match (kind.as_datatype(), kind.payload()) {
        (Some(Kind::Object), _) => {
            let Some(body) = def.as_block() else {
                return Err(type_error("make", "def", "block!", &def).into());
            };
            let ctx = ev.arena.alloc(Varlist::new(
                ContextKind::Object,
                Rc::new(Keylist::default()),
                Cell::blank(),
                Vec::new(),
            ));
            make_object(ev, ctx, body).map(Bounce::Out)
        }
        (None, Payload::Object(parent)) => {
            let Some(body) = def.as_block() else {
                return Err(type_error("make", "def", "block!", &def).into());
            };
            let ctx = ev.arena.duplicate(*parent)?;
            make_object(ev, ctx, body).map(Bounce::Out)
        }
        (Some(Kind::Frame), _) => {
            let Payload::Action {
                action, binding, ..
            } = def.payload()
            else {
                return Err(type_error("make", "def", "action!", &def).into());
            };
            let mut values = action.initial_values();
            for (param, value) in action.paramlist.params.iter().zip(values.iter_mut()) {
                if matches!(param.class, ParamClass::Refinement | ParamClass::Flag)
                    && value.is_unset()
                {
                    *value = Cell::null();
                }
            }
            let ctx = ev.arena.alloc(Varlist::new(
                ContextKind::Frame,
                Rc::clone(&action.paramlist.keylist),
                Cell::action(Rc::clone(action)),
                values,
            ));
            Ok(Bounce::Out(Cell::frame(ctx, Rc::clone(action), *binding)))
        }
        (Some(Kind::Error), _) => {
            let message = def.as_text().unwrap_or_else(|| ev.form(&def));
            Ok(Bounce::Out(Cell::error(RenError::User(message))))
        }
        _ => Err(type_error("make", "type", "object!, frame! or error!", &kind).into()),
    }
}

/// Adds a key for each top-level SET-WORD! of `body`, then runs the body
/// with the object's fields overlaid on its bindings.
fn make_object(ev: &mut Interpreter, ctx: ContextRef, body: &ArrayRef) -> Eval<Cell> {
    {
        let varlist = ev.arena.get_mut(ctx)?;
        for cell in body.to_vec() {
            if let Payload::Word(WordClass::Set, word) = cell.payload() {
                if varlist.find(word.canon).is_none() {
                    varlist.add_key(
                        Key {
                            spelling: word.spelling,
                            canon: word.canon,
                        },
                        Cell::unset(),
                    );
                }
            }
        }
    }
    let specifier = ev.patches.patch(ctx, &body.specifier);
    ev.eval_block(&body.with_specifier(specifier))?;
    debug!(fields = ev.arena.get(ctx)?.len(), "made object");
    Ok(Cell::object(ctx))
}

pub(super) fn native_type_of(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let value = ev.arg(frame, 1)?;
    if value.is_nullish() {
        return Ok(Bounce::Out(Cell::null()));
    }
    Ok(Bounce::Out(Cell::datatype(value.kind())))
}

pub(super) fn native_null_q(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    Ok(Bounce::Out(Cell::logic(ev.arg(frame, 1)?.is_nullish())))
}

pub(super) fn native_action_q(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    Ok(Bounce::Out(Cell::logic(ev.arg(frame, 1)?.as_action().is_some())))
}

pub(super) fn native_const(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    Ok(Bounce::Out(ev.arg(frame, 1)?.with_flag(CellFlags::CONST)))
}

pub(super) fn native_mutable(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let mut value = ev.arg(frame, 1)?;
    value.clear_flag(CellFlags::CONST);
    Ok(Bounce::Out(value))
}
