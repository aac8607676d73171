use std::cmp::Ordering;

use crate::runtime::{
    compare::{compare, equal},
    error::{Eval, RenError},
    frame::{Bounce, Frame},
    interpreter::Interpreter,
    kind::Kind,
    value::Cell,
};

fn operands(ev: &Interpreter, frame: &Frame) -> Result<(Cell, Cell), RenError> {
    Ok((ev.arg(frame, 1)?.decayed(), ev.arg(frame, 2)?.decayed()))
}

/// Ordering for the inequality natives; only like kinds (or two numbers)
/// can be ordered.
fn order(name: &str, a: &Cell, b: &Cell) -> Result<Ordering, RenError> {
    let numeric = |kind: Kind| matches!(kind, Kind::Integer | Kind::Decimal);
    let (ka, kb) = (a.kind(), b.kind());
    if ka != kb && !(numeric(ka) && numeric(kb)) {
        return Err(RenError::InvalidArg(format!(
            "{name} cannot compare {} with {}",
            a.type_name(),
            b.type_name()
        )));
    }
    Ok(compare(a, b, false))
}

pub(super) fn native_equal_q(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let (a, b) = operands(ev, frame)?;
    Ok(Bounce::Out(Cell::logic(equal(&a, &b, false))))
}

pub(super) fn native_strict_equal_q(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let (a, b) = operands(ev, frame)?;
    Ok(Bounce::Out(Cell::logic(equal(&a, &b, true))))
}

pub(super) fn native_not_equal_q(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let (a, b) = operands(ev, frame)?;
    Ok(Bounce::Out(Cell::logic(!equal(&a, &b, false))))
}

pub(super) fn native_lesser_q(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let (a, b) = operands(ev, frame)?;
    Ok(Bounce::Out(Cell::logic(order("lesser?", &a, &b)?.is_lt())))
}

pub(super) fn native_greater_q(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let (a, b) = operands(ev, frame)?;
    Ok(Bounce::Out(Cell::logic(order("greater?", &a, &b)?.is_gt())))
}

pub(super) fn native_lesser_or_equal_q(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let (a, b) = operands(ev, frame)?;
    Ok(Bounce::Out(Cell::logic(order("lesser-or-equal?", &a, &b)?.is_le())))
}

pub(super) fn native_greater_or_equal_q(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let (a, b) = operands(ev, frame)?;
    Ok(Bounce::Out(Cell::logic(order("greater-or-equal?", &a, &b)?.is_ge())))
}
