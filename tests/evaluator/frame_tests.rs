use ren::{Cell, Interpreter};

fn eval(ev: &mut Interpreter, source: &str) -> Cell {
    ev.do_source(source).unwrap().value().clone()
}

#[test]
fn frames_are_consumed_by_do() {
    let mut ev = Interpreter::new();
    eval(
        &mut ev,
        "f: func [a b] [a * b]
         fr: make frame! :f
         fr/a: 6
         fr/b: 7",
    );
    assert_eq!(eval(&mut ev, "fr/a"), Cell::integer(6));
    assert_eq!(eval(&mut ev, "do fr"), Cell::integer(42));
    assert_eq!(ev.do_source("do fr").unwrap_err().id(), "frame-consumed");
}

#[test]
fn a_copy_survives_running_the_original() {
    let mut ev = Interpreter::new();
    eval(
        &mut ev,
        "fr: make frame! :subtract
         fr/value1: 10
         fr/value2: 4
         saved: copy fr",
    );
    assert_eq!(eval(&mut ev, "do fr"), Cell::integer(6));
    assert_eq!(eval(&mut ev, "saved/value2: 1 do saved"), Cell::integer(9));
}

#[test]
fn frames_of_specialized_actions_hide_fixed_arguments() {
    let mut ev = Interpreter::new();
    eval(
        &mut ev,
        "add1: specialize :add [value2: 1]
         fr: make frame! :add1
         fr/value1: 41",
    );
    assert_eq!(eval(&mut ev, "do fr"), Cell::integer(42));
}

#[test]
fn enclosing_function_edits_frame_before_running_it() {
    let mut ev = Interpreter::new();
    let result = eval(
        &mut ev,
        "logged: copy []
         clamp: enclose :add func [f [frame!]] [
             if f/value1 > 100 [f/value1: 100]
             append logged f/value1
             do f
         ]
         clamp 500 1",
    );
    assert_eq!(result, Cell::integer(101));
    assert_eq!(ev.mold(&ev.get_var("logged").unwrap()), "[100]");
}

#[test]
fn frame_fields_reject_unknown_names() {
    let mut ev = Interpreter::new();
    let err = ev
        .do_source("fr: make frame! :add fr/nope: 1")
        .unwrap_err();
    assert_eq!(err.id(), "bad-path");
}

#[test]
fn frame_typechecks_when_run() {
    let mut ev = Interpreter::new();
    let err = ev
        .do_source(
            "fr: make frame! :add
             fr/value1: \"one\"
             fr/value2: 2
             do fr",
        )
        .unwrap_err();
    assert_eq!(err.id(), "expect-arg");
}
