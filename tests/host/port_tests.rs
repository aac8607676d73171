use std::cell::RefCell;
use std::rc::Rc;

use ren::{Cell, Eval, Interpreter, Kind, Port, PortActor, PortOutcome, RenError, Symbol, sym};

/// An in-memory line buffer. CLOSE is left to the default (unhandled).
#[derive(Default)]
struct MemoryPort {
    open: RefCell<bool>,
    lines: RefCell<Vec<String>>,
    verbs: RefCell<Vec<String>>,
}

impl PortActor for MemoryPort {
    fn act(&self, ev: &mut Interpreter, port: &Port, verb: Symbol, args: &[Cell]) -> Eval<PortOutcome> {
        self.verbs
            .borrow_mut()
            .push(format!("{}:{}", port.scheme, ev.spelling(verb)));
        if verb == sym::OPEN {
            *self.open.borrow_mut() = true;
            return Ok(PortOutcome::Handled(Cell::logic(true)));
        }
        if !*self.open.borrow() {
            return Err(RenError::User("port is not open".to_string()).into());
        }
        match verb {
            sym::WRITE | sym::APPEND => {
                let line = ev.form(&args[0]);
                self.lines.borrow_mut().push(line);
                Ok(PortOutcome::Handled(Cell::integer(self.lines.borrow().len() as i64)))
            }
            sym::READ => {
                let lines = self.lines.borrow().iter().map(Cell::text).collect();
                Ok(PortOutcome::Handled(Cell::block(lines)))
            }
            _ => Ok(PortOutcome::Unhandled),
        }
    }
}

fn setup() -> (Interpreter, Rc<MemoryPort>) {
    let actor = Rc::new(MemoryPort::default());
    let mut ev = Interpreter::new();
    let port = ev.make_port("memory", actor.clone());
    ev.set_var("p", port).unwrap();
    (ev, actor)
}

#[test]
fn generic_verbs_route_to_the_actor() {
    let (mut ev, actor) = setup();
    ev.do_source("open p write p \"first\" append p 2").unwrap();
    let outcome = ev.do_source("read p").unwrap();
    assert_eq!(ev.mold(outcome.value()), "[\"first\" \"2\"]");
    assert_eq!(
        *actor.verbs.borrow(),
        vec!["memory:open", "memory:write", "memory:append", "memory:read"]
    );
}

#[test]
fn unhandled_verbs_cannot_be_used() {
    let (mut ev, _actor) = setup();
    ev.do_source("open p").unwrap();
    let err = ev.do_source("close p").unwrap_err();
    assert_eq!(err.id(), "cannot-use");
    assert_eq!(err.to_string(), "cannot use close on port! value");
}

#[test]
fn actor_failures_propagate() {
    let (mut ev, _actor) = setup();
    let err = ev.do_source("read p").unwrap_err();
    assert_eq!(err.id(), "user");
    let result = ev.do_source("mold trap [read p]").unwrap();
    assert_eq!(result.value(), &Cell::text("make error! [id: user message: \"port is not open\"]"));
}

#[test]
fn ports_are_typechecked_like_other_values() {
    let (mut ev, _actor) = setup();
    assert_eq!(ev.do_source("open 1").unwrap_err().id(), "expect-arg");
    assert_eq!(ev.do_source("type-of p").unwrap().value(), &Cell::datatype(Kind::Port));
}
