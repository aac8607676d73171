use std::cell::Cell as Counter;
use std::rc::Rc;

use crate::runtime::{
    action::{Action, Dispatcher, Param, ParamClass},
    error::{Eval, RenError},
    frame::{Bounce, Frame},
    interpreter::Interpreter,
    kind::{Kind, TypeSet},
    paramlist::paramlist_from,
    value::Cell,
};
use crate::syntax::symbol::Symbol;

/// N-SHOT: an action taking a block that it evaluates on its first `n`
/// calls and ignores (returning NULL) afterwards. A negative `n` ignores
/// the first `-n` calls and evaluates every call after that.
pub(crate) fn make_n_shot(block_param: (Symbol, Symbol), n: i64) -> Rc<Action> {
    let (spelling, canon) = block_param;
    let param = Param {
        spelling,
        canon,
        class: ParamClass::Normal,
        types: TypeSet::of(&[Kind::Block]),
        optional: false,
        endable: false,
        isotopes: false,
    };
    let dispatcher = if n >= 0 {
        Dispatcher::Downshot {
            remaining: Counter::new(n),
        }
    } else {
        Dispatcher::Upshot {
            pending: Counter::new(n),
        }
    };
    Rc::new(Action::new(Rc::new(paramlist_from(vec![param])), dispatcher))
}

fn run_block(ev: &mut Interpreter, frame: &Frame) -> Eval<Bounce> {
    let block = ev.arg(frame, 1)?;
    let Some(block) = block.as_block() else {
        return Err(RenError::InvalidArg("N-SHOT action needs a block".to_string()).into());
    };
    let block = block.clone();
    ev.eval_block(&block).map(Bounce::Out)
}

pub(crate) fn dispatch_downshot(ev: &mut Interpreter, frame: &mut Frame, remaining: &Counter<i64>) -> Eval<Bounce> {
    if remaining.get() == 0 {
        return Ok(Bounce::Out(Cell::null()));
    }
    remaining.set(remaining.get() - 1);
    run_block(ev, frame)
}

pub(crate) fn dispatch_upshot(ev: &mut Interpreter, frame: &mut Frame, pending: &Counter<i64>) -> Eval<Bounce> {
    if pending.get() < 0 {
        pending.set(pending.get() + 1);
        return Ok(Bounce::Out(Cell::null()));
    }
    run_block(ev, frame)
}

#[cfg(test)]
mod tests {
    use crate::runtime::interpreter::Interpreter;
    use crate::runtime::value::Cell;

    #[test]
    fn two_shot_runs_twice_then_yields_null() {
        let mut ev = Interpreter::new();
        ev.do_source("twice: n-shot 2 x: 0").unwrap();
        for expected in [1, 2, 2, 2] {
            ev.do_source("twice [x: x + 1]").unwrap();
            assert_eq!(ev.get_var("x"), Some(Cell::integer(expected)));
        }
        let result = ev.do_source("null? twice [x: x + 1]").unwrap();
        assert_eq!(result.value(), &Cell::logic(true));
    }

    #[test]
    fn negative_counts_skip_first_calls() {
        let mut ev = Interpreter::new();
        ev.do_source("later: n-shot -2 x: 0").unwrap();
        for expected in [0, 0, 1, 2] {
            ev.do_source("later [x: x + 1]").unwrap();
            assert_eq!(ev.get_var("x"), Some(Cell::integer(expected)));
        }
    }
}
