use ren::{Bounce, Cell, Eval, Frame, Interpreter, Kind, Outcome};

fn eval(ev: &mut Interpreter, source: &str) -> Cell {
    ev.do_source(source).unwrap().value().clone()
}

fn native_checked_square(ev: &mut Interpreter, frame: &mut Frame) -> Eval<Bounce> {
    let value = ev.arg(frame, 1)?;
    let n = value
        .as_integer()
        .unwrap_or_else(|| panic!("dispatcher saw {}", value.type_name()));
    Ok(Bounce::Out(Cell::integer(n * n)))
}

#[test]
fn typecheck_guards_the_dispatcher() {
    let mut ev = Interpreter::new();
    ev.register_native("square", "n [integer!]", native_checked_square)
        .unwrap();
    assert_eq!(eval(&mut ev, "square 9"), Cell::integer(81));
    for bad in ["square 1.5", "square \"9\"", "square null", "square [9]", "square ~none~"] {
        let err = ev.do_source(bad).unwrap_err();
        assert_eq!(err.id(), "expect-arg", "{bad}");
    }
    // derived actions are checked as well
    let err = ev
        .do_source("sq: adapt :square [n: \"x\"] sq 1")
        .unwrap_err();
    assert_eq!(err.id(), "expect-arg");
}

#[test]
fn words_compare_by_canon_unless_strict() {
    let mut ev = Interpreter::new();
    for (a, b) in [("'foo", "'FOO"), ("'Foo", "'fOO"), ("'a-b", "'A-B")] {
        let lax = eval(&mut ev, &format!("{a} = {b}"));
        let strict = eval(&mut ev, &format!("{a} == {b}"));
        assert_eq!(lax, Cell::logic(true), "{a} = {b}");
        assert_eq!(strict, Cell::logic(false), "{a} == {b}");
    }
    assert_eq!(eval(&mut ev, "'foo == 'foo"), Cell::logic(true));
}

#[test]
fn words_differing_in_case_share_a_variable() {
    let mut ev = Interpreter::new();
    assert_eq!(eval(&mut ev, "Count: 1 count: count + 1 COUNT"), Cell::integer(2));
}

#[test]
fn scalar_cells_read_back_what_they_hold() {
    assert_eq!(Cell::integer(-42).as_integer(), Some(-42));
    assert_eq!(Cell::decimal(2.5).as_decimal(), Some(2.5));
    assert_eq!(Cell::pair(3, -4).as_pair(), Some((3, -4)));
    assert_eq!(Cell::money(-1999).as_money(), Some(-1999));
    assert_eq!(Cell::text("héllo").as_text().as_deref(), Some("héllo"));

    let mut ev = Interpreter::new();
    let word = eval(&mut ev, "'Mixed-Case");
    let spelling = word.as_symbol().unwrap();
    assert_eq!(ev.spelling(spelling), "Mixed-Case");
    assert_eq!(word.kind(), Kind::Word);
}

#[test]
fn loaded_scalars_keep_their_values() {
    let mut ev = Interpreter::new();
    assert_eq!(eval(&mut ev, "12x-3").as_pair(), Some((12, -3)));
    assert_eq!(eval(&mut ev, "$4.05").as_money(), Some(405));
    assert_eq!(eval(&mut ev, "0.25").as_decimal(), Some(0.25));
}

#[test]
fn enfix_evaluates_left_to_right_after_prefix_arguments() {
    let mut ev = Interpreter::new();
    assert_eq!(eval(&mut ev, "1 + 2 * 3 - 4"), Cell::integer(5));
    assert_eq!(eval(&mut ev, "negate 2 * 3"), Cell::integer(-6));
    assert_eq!(eval(&mut ev, "10 - negate 2 * 3"), Cell::integer(16));
    assert_eq!(
        eval(&mut ev, "x: 0 if 1 < 2 [x: 1] else [x: 2] x"),
        Cell::integer(1)
    );
}

#[test]
fn user_defined_enfix() {
    let mut ev = Interpreter::new();
    assert_eq!(
        eval(&mut ev, "plus-ten: enfix func [a b] [a + b + 10] 1 plus-ten 2"),
        Cell::integer(13)
    );
}

#[test]
fn return_leaves_only_its_own_function() {
    let mut ev = Interpreter::new();
    let result = eval(
        &mut ev,
        "inner: func [] [return 1 999]
         outer: func [] [x: inner return x + 10 999]
         outer",
    );
    assert_eq!(result, Cell::integer(11));
}

#[test]
fn return_from_a_nested_block() {
    let mut ev = Interpreter::new();
    let result = eval(
        &mut ev,
        "find-big: func [blk] [
             n: 0
             while [n < length-of blk] [
                 n: n + 1
                 if (pick blk n) > 10 [return pick blk n]
             ]
             null
         ]
         find-big [3 7 42 5]",
    );
    assert_eq!(result, Cell::integer(42));
}

#[test]
fn recursion_within_the_depth_limit() {
    let mut ev = Interpreter::new();
    let result = eval(
        &mut ev,
        "fact: func [n] [either n <= 1 [1] [n * fact n - 1]]
         fact 5",
    );
    assert_eq!(result, Cell::integer(120));
}

#[test]
fn uncaught_throw_reports_its_label() {
    let mut ev = Interpreter::new();
    let err = ev.do_source("throw/name 1 'nowhere").unwrap_err();
    assert_eq!(err.id(), "no-catch");
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn quit_from_inside_a_function() {
    let mut ev = Interpreter::new();
    let outcome = ev.do_source("f: func [] [quit/with 3 4] f 5").unwrap();
    assert_eq!(outcome, Outcome::Quit(Cell::integer(3)));
}
