use std::rc::Rc;

use crate::runtime::{
    compare::same_label,
    error::{Eval, RenError, Signal},
    feed::Feed,
    frame::{Bounce, Completion, Frame},
    interpreter::{Interpreter, Lookahead},
    value::{Cell, Payload},
};

use super::helpers::{
    arg_block, arg_integer, heavy, reduce_block, run_branch, truthy, type_error, used,
};

pub(super) fn native_if(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let condition = ev.arg(frame, 1)?;
    if !truthy("if", &condition)? {
        return Ok(Bounce::Out(Cell::null()));
    }
    let branch = ev.arg(frame, 2)?;
    Ok(Bounce::Out(heavy(run_branch(ev, &branch, &condition)?)))
}

pub(super) fn native_either(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let condition = ev.arg(frame, 1)?;
    let slot = if truthy("either", &condition)? { 2 } else { 3 };
    let branch = ev.arg(frame, slot)?;
    Ok(Bounce::Out(heavy(run_branch(ev, &branch, &condition)?)))
}

/// Runs its branch only when the left side is plain NULL.
pub(super) fn native_else(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let left = ev.arg(frame, 1)?;
    if !left.is_null() {
        return Ok(Bounce::Out(left));
    }
    let branch = ev.arg(frame, 2)?;
    Ok(Bounce::Out(run_branch(ev, &branch, &left)?))
}

/// Runs its branch unless the left side is plain NULL.
pub(super) fn native_then(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let left = ev.arg(frame, 1)?;
    if left.is_null() {
        return Ok(Bounce::Out(left));
    }
    let branch = ev.arg(frame, 2)?;
    Ok(Bounce::Out(heavy(run_branch(ev, &branch, &left.decayed())?)))
}

pub(super) fn native_not(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let value = ev.arg(frame, 1)?;
    Ok(Bounce::Out(Cell::logic(!truthy("not", &value)?)))
}

/// Evaluates expressions until one is falsey (giving NULL); otherwise the
/// last value.
pub(super) fn native_all(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let block = arg_block(ev, frame, 1, "all", "block")?;
    let mut feed = Feed::new(&block);
    let mut out = Cell::void();
    while !feed.is_end() {
        if let Completion::Value(value) = ev.eval_step(&mut feed, Lookahead::Full)? {
            if !truthy("all", &value)? {
                return Ok(Bounce::Out(Cell::null()));
            }
            out = value;
        }
    }
    Ok(Bounce::Out(out))
}

/// The first truthy expression value, or NULL.
pub(super) fn native_any(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let block = arg_block(ev, frame, 1, "any", "block")?;
    let mut feed = Feed::new(&block);
    while !feed.is_end() {
        if let Completion::Value(value) = ev.eval_step(&mut feed, Lookahead::Full)? {
            if truthy("any", &value)? {
                return Ok(Bounce::Out(value));
            }
        }
    }
    Ok(Bounce::Out(Cell::null()))
}

pub(super) fn native_while(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let condition = arg_block(ev, frame, 1, "while", "condition")?;
    let body = arg_block(ev, frame, 2, "while", "body")?;
    let mut out = Cell::null();
    loop {
        let test = ev.eval_block(&condition)?;
        if !truthy("while", &test)? {
            break;
        }
        out = heavy(ev.eval_block(&body)?);
    }
    Ok(Bounce::Out(out))
}

pub(super) fn native_repeat(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let count = arg_integer(ev, frame, 1, "repeat", "count")?;
    let body = arg_block(ev, frame, 2, "repeat", "body")?;
    let mut out = Cell::null();
    for _ in 0..count.max(0) {
        out = heavy(ev.eval_block(&body)?);
    }
    Ok(Bounce::Out(out))
}

/// DO of a block, a FRAME! (consuming it), an action, or source text.
pub(super) fn native_do(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let source = ev.arg(frame, 1)?;
    if source.is_null() {
        return Ok(Bounce::Out(Cell::null()));
    }
    if let Some(block) = source.as_block() {
        let block = block.clone();
        return Ok(Bounce::Out(ev.eval_block(&block)?));
    }
    if let Payload::Frame {
        ctx,
        phase,
        binding,
    } = source.payload()
    {
        let phase = Rc::clone(phase);
        return Ok(Bounce::Out(ev.do_frame(*ctx, phase, *binding)?));
    }
    if let Some(action) = source.as_action() {
        let action = Rc::clone(action);
        return Ok(Bounce::Out(ev.apply(&action, Vec::new())?));
    }
    if let Some(text) = source.as_text() {
        return Ok(Bounce::Out(ev.do_text(&text)?));
    }
    Err(type_error("do", "source", "block!, frame!, action! or text!", &source).into())
}

pub(super) fn native_reduce(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let block = arg_block(ev, frame, 1, "reduce", "block")?;
    let values = reduce_block(ev, &block)?;
    Ok(Bounce::Out(Cell::block(values)))
}

pub(super) fn native_comment(_ev: &mut Interpreter, _frame: &mut Frame) -> Eval<Bounce> {
    Ok(Bounce::Invisible)
}

pub(super) fn native_elide(_ev: &mut Interpreter, _frame: &mut Frame) -> Eval<Bounce> {
    Ok(Bounce::Invisible)
}

pub(super) fn native_quote(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    Ok(Bounce::Out(ev.arg(frame, 1)?.quoted(1)))
}

pub(super) fn native_the(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    Ok(Bounce::Out(ev.arg(frame, 1)?))
}

pub(super) fn native_meta(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    Ok(Bounce::Out(ev.arg(frame, 1)?.meta()))
}

pub(super) fn native_unmeta(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    Ok(Bounce::Out(ev.arg(frame, 1)?.unmeta()))
}

/// THROW value /name: a plain throw is labeled with BLANK.
pub(super) fn native_throw(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let value = ev.arg(frame, 1)?;
    let label = if used(ev, frame, 2)? {
        ev.arg(frame, 2)?
    } else {
        Cell::blank()
    };
    Err(Signal::Throw { label, value })
}

pub(super) fn native_catch(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let block = arg_block(ev, frame, 1, "catch", "block")?;
    let wanted = if used(ev, frame, 2)? {
        ev.arg(frame, 2)?
    } else {
        Cell::blank()
    };
    match ev.eval_block(&block) {
        Ok(_) => Ok(Bounce::Out(Cell::null())),
        Err(Signal::Throw { label, value }) if same_label(&label, &wanted) => {
            Ok(Bounce::Out(value))
        }
        Err(signal) => Err(signal),
    }
}

pub(super) fn native_fail(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let reason = ev.arg(frame, 1)?;
    if let Some(error) = reason.as_error() {
        return Err(error.clone().into());
    }
    let message = reason.as_text().unwrap_or_else(|| ev.form(&reason));
    Err(RenError::User(message).into())
}

/// Evaluates a block; a failure becomes its ERROR! value, success gives
/// NULL. Throws pass through.
pub(super) fn native_trap(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let block = arg_block(ev, frame, 1, "trap", "block")?;
    match ev.eval_block(&block) {
        Ok(_) => Ok(Bounce::Out(Cell::null())),
        Err(Signal::Fail(error)) => Ok(Bounce::Out(Cell::error(error))),
        Err(throw) => Err(throw),
    }
}

pub(super) fn native_quit(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let value = if used(ev, frame, 1)? {
        ev.arg(frame, 1)?
    } else {
        Cell::null()
    };
    Err(Signal::Throw {
        label: ev.quit_label(),
        value,
    })
}

/// Definitional RETURN: only meaningful through a function's RETURN slot,
/// which binds this action to the invocation it exits.
pub(super) fn native_return(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let Some(target) = frame.binding else {
        return Err(RenError::InvalidArg("RETURN used outside of a function".to_string()).into());
    };
    let value = ev.arg(frame, 1)?;
    Err(Signal::Throw {
        label: Cell::action_bound(Rc::clone(ev.return_action()), Some(target), None),
        value,
    })
}
