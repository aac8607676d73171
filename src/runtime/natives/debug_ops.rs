use crate::runtime::{
    error::{Eval, Signal},
    frame::{Bounce, Frame},
    interpreter::Interpreter,
    value::Cell,
};

use super::helpers::{none, reduce_block, used};

/// PRINT: a block is reduced and its values formed with spaces between.
pub(super) fn native_print(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let value = ev.arg(frame, 1)?;
    let line = match value.as_block() {
        Some(block) => {
            let block = block.clone();
            reduce_block(ev, &block)?
                .iter()
                .map(|cell| ev.form(cell))
                .collect::<Vec<_>>()
                .join(" ")
        }
        None => ev.form(&value),
    };
    ev.output.push(line);
    Ok(Bounce::Out(none()))
}

pub(super) fn native_probe(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let value = ev.arg(frame, 1)?;
    let line = ev.mold(&value);
    ev.output.push(line);
    Ok(Bounce::Out(value))
}

pub(super) fn native_mold(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let value = ev.arg(frame, 1)?;
    Ok(Bounce::Out(Cell::text(ev.mold(&value))))
}

pub(super) fn native_form(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let value = ev.arg(frame, 1)?;
    Ok(Bounce::Out(Cell::text(ev.form(&value))))
}

pub(super) fn native_breakpoint(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    ev.breakpoint(frame.label).map(Bounce::Out)
}

/// RESUME /with value /do code: leaves the debugger console, handing back
/// the code the breakpoint should run in its place.
pub(super) fn native_resume(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let code = if used(ev, frame, 2)? {
        ev.arg(frame, 2)?
    } else if used(ev, frame, 1)? {
        Cell::block(vec![ev.arg(frame, 1)?.meta()])
    } else {
        Cell::block(Vec::new())
    };
    Err(Signal::Throw {
        label: ev.resume_label(),
        value: code,
    })
}
