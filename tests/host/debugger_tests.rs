use std::cell::Cell as Counter;
use std::rc::Rc;

use ren::{Cell, EvalHook, Interpreter, Outcome, ScriptedConsole};

struct StepCounter {
    steps: Counter<usize>,
}

impl EvalHook for StepCounter {
    fn on_step(&self, _ev: &Interpreter, _cell: &Cell) {
        self.steps.set(self.steps.get() + 1);
    }
}

#[test]
fn breakpoint_without_debugger_is_a_no_op() {
    let mut ev = Interpreter::new();
    let outcome = ev.do_source("breakpoint 1 + 1").unwrap();
    assert_eq!(outcome.value(), &Cell::integer(2));
}

#[test]
fn console_lines_run_until_resume() {
    let mut ev = Interpreter::new();
    let console = ScriptedConsole::new(["x", "x: 10", "resume/with x + 1", "x: 99"]);
    let transcript = console.transcript();
    ev.set_debugger(Box::new(console));

    let outcome = ev.do_source("x: 1 y: breakpoint y").unwrap();
    assert_eq!(outcome.value(), &Cell::integer(11));
    assert_eq!(ev.get_var("x"), Some(Cell::integer(10)));
    assert_eq!(*transcript.borrow(), vec!["== 1".to_string(), "== 10".to_string()]);
}

#[test]
fn resume_do_runs_code_in_place_of_the_breakpoint() {
    let mut ev = Interpreter::new();
    ev.set_debugger(Box::new(ScriptedConsole::new(["resume/do [n: n * 2 n]"])));
    let outcome = ev
        .do_source("f: func [] [n: 21 breakpoint] f")
        .unwrap();
    assert_eq!(outcome.value(), &Cell::integer(42));
}

#[test]
fn quit_from_the_console_ends_evaluation() {
    let mut ev = Interpreter::new();
    ev.set_debugger(Box::new(ScriptedConsole::new(["quit/with 7"])));
    let outcome = ev.do_source("before: 1 breakpoint after: 2").unwrap();
    assert_eq!(outcome, Outcome::Quit(Cell::integer(7)));
    assert_eq!(ev.get_var("before"), Some(Cell::integer(1)));
    assert_eq!(ev.get_var("after"), Some(Cell::unset()));
}

#[test]
fn console_errors_are_recorded_and_do_not_escape() {
    let mut ev = Interpreter::new();
    let console = ScriptedConsole::new(["1 / 0", "throw 5", "resume"]);
    let transcript = console.transcript();
    ev.set_debugger(Box::new(console));

    let outcome = ev.do_source("breakpoint 3").unwrap();
    assert_eq!(outcome.value(), &Cell::integer(3));
    let transcript = transcript.borrow();
    assert_eq!(transcript.len(), 2);
    assert!(transcript[0].starts_with("** zero-divide"));
    assert!(transcript[1].starts_with("** no-catch"));
}

#[test]
fn console_can_install_a_step_hook() {
    let counter = Rc::new(StepCounter {
        steps: Counter::new(0),
    });
    let mut ev = Interpreter::new();
    ev.set_debugger(Box::new(ScriptedConsole::new(Vec::<String>::new()).with_hook(counter.clone())));

    ev.do_source("a: 1").unwrap();
    assert_eq!(counter.steps.get(), 0);
    ev.do_source("breakpoint a: 2 a").unwrap();
    let after_breakpoint = counter.steps.get();
    assert!(after_breakpoint > 0);

    ev.set_hook(None);
    ev.do_source("a: 3").unwrap();
    assert_eq!(counter.steps.get(), after_breakpoint);
}
