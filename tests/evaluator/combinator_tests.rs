use ren::{Cell, Interpreter};

fn eval(ev: &mut Interpreter, source: &str) -> Cell {
    ev.do_source(source).unwrap().value().clone()
}

fn fresh(setup: &str) -> Interpreter {
    let mut ev = Interpreter::new();
    ev.do_source(setup).unwrap();
    ev
}

#[test]
fn chain_equals_nested_application() {
    let mut ev = fresh(
        "f1: func [a b] [a * 10 + b]
         f2: func [x] [x - 1]
         c: chain [:f1 :f2]",
    );
    for (a, b) in [(1, 2), (0, 0), (-3, 7)] {
        let chained = eval(&mut ev, &format!("c {a} {b}"));
        let nested = eval(&mut ev, &format!("f2 f1 {a} {b}"));
        assert_eq!(chained, nested);
    }
}

#[test]
fn chain_stops_when_first_action_throws() {
    let mut ev = fresh(
        "hits: 0
         boom: func [x] [throw x]
         count: func [x] [hits: hits + 1 x]
         c: chain [:boom :count]",
    );
    assert_eq!(eval(&mut ev, "catch [c 4]"), Cell::integer(4));
    assert_eq!(ev.get_var("hits"), Some(Cell::integer(0)));
}

#[test]
fn adapt_with_inert_prelude_is_transparent() {
    let mut ev = fresh(
        "log: 0
         f: func [a b] [a - b]
         g: adapt :f [log: log + 1]",
    );
    for (a, b) in [(5, 3), (0, 9), (100, 1)] {
        let adapted = eval(&mut ev, &format!("g {a} {b}"));
        let plain = eval(&mut ev, &format!("f {a} {b}"));
        assert_eq!(adapted, plain);
    }
    assert_eq!(ev.get_var("log"), Some(Cell::integer(3)));
}

#[test]
fn adapt_prelude_throw_skips_the_adaptee() {
    let mut ev = fresh(
        "ran: false
         f: func [x] [ran: true x]
         g: adapt :f [throw 0]",
    );
    assert_eq!(eval(&mut ev, "catch [g 1]"), Cell::integer(0));
    assert_eq!(ev.get_var("ran"), Some(Cell::logic(false)));
}

#[test]
fn reorder_swaps_argument_order() {
    let mut ev = fresh(
        "f: func [a b] [reduce [a b]]
         r: reorder :f [b a]",
    );
    let reordered = eval(&mut ev, "mold r 1 2");
    let direct = eval(&mut ev, "mold f 2 1");
    assert_eq!(reordered, direct);
    assert_eq!(reordered, Cell::text("[2 1]"));
    assert_eq!(ev.do_source("reorder :f [b]").unwrap_err().id(), "bad-parameter");
}

#[test]
fn enclose_returning_a_constant_never_runs_inner() {
    let mut ev = fresh(
        "touched: 0
         inner: func [x] [touched: touched + 1 x]
         e: enclose :inner func [f [frame!]] [42]",
    );
    assert_eq!(eval(&mut ev, "e 1"), Cell::integer(42));
    assert_eq!(eval(&mut ev, "e 2"), Cell::integer(42));
    assert_eq!(ev.get_var("touched"), Some(Cell::integer(0)));
}

#[test]
fn n_shot_two_runs_twice() {
    let mut ev = fresh("once-twice: n-shot 2 runs: 0");
    for expected in [1, 2] {
        eval(&mut ev, "once-twice [runs: runs + 1]");
        assert_eq!(ev.get_var("runs"), Some(Cell::integer(expected)));
    }
    for _ in 0..3 {
        assert!(eval(&mut ev, "once-twice [runs: runs + 1]").is_null());
    }
    assert_eq!(ev.get_var("runs"), Some(Cell::integer(2)));
}

#[test]
fn macro_splices_code_into_the_caller() {
    let mut ev = fresh("twice: macro [value] [reduce ['add value value]]");
    assert_eq!(eval(&mut ev, "twice 4"), Cell::integer(8));
    assert_eq!(eval(&mut ev, "1 + twice 2"), Cell::integer(5));
}

#[test]
fn does_and_lambda() {
    let mut ev = fresh("n: 1 bump: does [n: n + 1] sq: lambda [x] [x * x]");
    eval(&mut ev, "bump bump");
    assert_eq!(ev.get_var("n"), Some(Cell::integer(3)));
    assert_eq!(eval(&mut ev, "sq 9"), Cell::integer(81));
}

#[test]
fn lambda_has_no_return() {
    let mut ev = Interpreter::new();
    let err = ev.do_source("l: lambda [x] [return x] l 1").unwrap_err();
    assert_eq!(err.id(), "invalid-arg");
}

#[test]
fn user_generic_dispatches_on_first_argument() {
    let mut ev = fresh("plus: generic 'add [left [any-scalar!] right [any-scalar!]]");
    assert_eq!(eval(&mut ev, "plus 2 3"), Cell::integer(5));
    assert_eq!(eval(&mut ev, "mold plus $1.00 $0.50"), Cell::text("$1.50"));
    assert_eq!(eval(&mut ev, "mold plus 1x1 2"), Cell::text("3x3"));
}

#[test]
fn augmented_refinement_through_specialize() {
    let mut ev = fresh(
        "f: func [a] [a]
         g: adapt augment :f [/scale [integer!]] [if scale [a: a * scale]]
         h: specialize :g [scale: 3]",
    );
    assert_eq!(eval(&mut ev, "g 2"), Cell::integer(2));
    assert_eq!(eval(&mut ev, "g/scale 2 5"), Cell::integer(10));
    assert_eq!(eval(&mut ev, "h 4"), Cell::integer(12));
}

#[test]
fn combinators_stack() {
    let mut ev = fresh(
        "add5: specialize :add [value2: 5]
         dbl: adapt :add5 [value1: value1 * 2]
         pipeline: chain [:dbl :negate]",
    );
    assert_eq!(eval(&mut ev, "pipeline 10"), Cell::integer(-25));
}
