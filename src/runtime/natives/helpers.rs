use std::rc::Rc;

use crate::runtime::{
    action::Action,
    error::{Eval, RenError},
    feed::Feed,
    frame::{Completion, Frame},
    interpreter::{Interpreter, Lookahead},
    value::{ArrayRef, Cell},
};
use crate::syntax::symbol::sym;

pub(super) fn type_error(name: &str, label: &str, expected: &str, got: &Cell) -> RenError {
    RenError::InvalidArg(format!(
        "{} expected {} to be {}, got {}",
        name,
        label,
        expected,
        got.type_name()
    ))
}

/// Whether refinement or flag `slot` was used by the caller.
pub(super) fn used(ev: &Interpreter, frame: &Frame, slot: usize) -> Result<bool, RenError> {
    let value = ev.arg(frame, slot)?;
    Ok(!value.is_null() && value.as_logic() != Some(false))
}

pub(super) fn arg_block(
    ev: &Interpreter,
    frame: &Frame,
    slot: usize,
    name: &str,
    label: &str,
) -> Result<ArrayRef, RenError> {
    let value = ev.arg(frame, slot)?;
    match value.as_block() {
        Some(block) => Ok(block.clone()),
        None => Err(type_error(name, label, "block!", &value)),
    }
}

pub(super) fn arg_action(
    ev: &Interpreter,
    frame: &Frame,
    slot: usize,
    name: &str,
    label: &str,
) -> Result<Rc<Action>, RenError> {
    let value = ev.arg(frame, slot)?;
    match value.as_action() {
        Some(action) => Ok(Rc::clone(action)),
        None => Err(type_error(name, label, "action!", &value)),
    }
}

pub(super) fn arg_integer(
    ev: &Interpreter,
    frame: &Frame,
    slot: usize,
    name: &str,
    label: &str,
) -> Result<i64, RenError> {
    let value = ev.arg(frame, slot)?;
    value
        .as_integer()
        .ok_or_else(|| type_error(name, label, "integer!", &value))
}

/// Conditional truth of `value`; isotopes other than `~null~` have none.
pub(super) fn truthy(name: &str, value: &Cell) -> Result<bool, RenError> {
    value.is_truthy().ok_or_else(|| {
        RenError::InvalidArg(format!("{name} cannot test an isotope for truth"))
    })
}

/// A branch that produced NULL reports the `~null~` isotope instead, so
/// ELSE can tell "branch ran" from "branch did not run".
pub(super) fn heavy(value: Cell) -> Cell {
    if value.is_null() {
        Cell::isotope(sym::NULL)
    } else {
        value
    }
}

/// Runs a branch: a block is evaluated, an action is called with `input`
/// when it takes an argument.
pub(super) fn run_branch(ev: &mut Interpreter, branch: &Cell, input: &Cell) -> Eval<Cell> {
    if let Some(block) = branch.as_block() {
        let block = block.clone();
        return ev.eval_block(&block);
    }
    if let Some(action) = branch.as_action() {
        let action = Rc::clone(action);
        let args = if action.caller_order().is_empty() {
            Vec::new()
        } else {
            vec![input.clone()]
        };
        return ev.apply(&action, args);
    }
    Err(type_error("branch", "branch", "block! or action!", branch).into())
}

/// Evaluates each expression of `block`, keeping every value produced.
/// NULLs are skipped since arrays cannot hold them.
pub(super) fn reduce_block(ev: &mut Interpreter, block: &ArrayRef) -> Eval<Vec<Cell>> {
    let mut feed = Feed::new(block);
    let mut values = Vec::new();
    while !feed.is_end() {
        if let Completion::Value(value) = ev.eval_step(&mut feed, Lookahead::Full)? {
            if value.is_nullish() {
                continue;
            }
            if value.is_isotope() {
                return Err(RenError::IsotopeInArray.into());
            }
            values.push(value);
        }
    }
    Ok(values)
}

/// Result of natives run only for their effect.
pub(super) fn none() -> Cell {
    Cell::isotope(sym::NONE)
}
