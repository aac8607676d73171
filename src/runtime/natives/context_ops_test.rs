use crate::runtime::{interpreter::Interpreter, kind::Kind, value::Cell};

fn run(ev: &mut Interpreter, source: &str) -> Cell {
    ev.do_source(source).unwrap().value().clone()
}

#[test]
fn get_any_reads_isotopes_raw() {
    let mut ev = Interpreter::new();
    run(&mut ev, "x: if true [null]");
    assert!(run(&mut ev, "x").is_null());
    let raw = run(&mut ev, "get/any 'x");
    assert_eq!(ev.mold(&raw), "~null~");
    assert_eq!(run(&mut ev, "null? x"), Cell::logic(true));
}

#[test]
fn unset_and_other_isotopes_fail_on_plain_fetch() {
    let mut ev = Interpreter::new();
    assert_eq!(ev.do_source("y").unwrap_err().id(), "no-value");
    assert_eq!(ev.do_source("z: ~none~ z").unwrap_err().id(), "bad-isotope");
    assert_eq!(ev.do_source("get 'z").unwrap_err().id(), "bad-isotope");
}

#[test]
fn set_assigns_through_words_and_paths() {
    let mut ev = Interpreter::new();
    assert_eq!(run(&mut ev, "set 'a 5 a"), Cell::integer(5));
    assert_eq!(
        run(&mut ev, "o: make object! [f: 1] set 'o/f 2 o/f"),
        Cell::integer(2)
    );
}

#[test]
fn objects_see_their_own_fields() {
    let mut ev = Interpreter::new();
    let result = run(
        &mut ev,
        "o: make object! [a: 1 b: a + 1]
         o/b",
    );
    assert_eq!(result, Cell::integer(2));
    let molded = run(&mut ev, "mold o");
    assert_eq!(molded.as_text().as_deref(), Some("make object! [a: 1 b: 2]"));
}

#[test]
fn derived_objects_copy_the_parent() {
    let mut ev = Interpreter::new();
    run(
        &mut ev,
        "base: make object! [a: 1]
         child: make base [b: 2 a: 10]",
    );
    assert_eq!(run(&mut ev, "base/a"), Cell::integer(1));
    assert_eq!(run(&mut ev, "child/a"), Cell::integer(10));
    assert_eq!(run(&mut ev, "length-of child"), Cell::integer(2));
}

#[test]
fn frames_can_be_filled_and_run_once() {
    let mut ev = Interpreter::new();
    let result = run(
        &mut ev,
        "f: func [a b] [a - b]
         fr: make frame! :f
         fr/a: 10 fr/b: 3
         do fr",
    );
    assert_eq!(result, Cell::integer(7));
    assert_eq!(ev.do_source("do fr").unwrap_err().id(), "frame-consumed");
}

#[test]
fn copied_frames_run_independently() {
    let mut ev = Interpreter::new();
    let result = run(
        &mut ev,
        "fr: make frame! :add
         fr/value1: 1 fr/value2: 2
         fr2: copy fr
         (do fr) + (do fr2)",
    );
    assert_eq!(result, Cell::integer(6));
}

#[test]
fn unfilled_frame_arguments_fail() {
    let mut ev = Interpreter::new();
    let err = ev
        .do_source("fr: make frame! :add fr/value1: 1 do fr")
        .unwrap_err();
    assert_eq!(err.id(), "need-non-end");
}

#[test]
fn type_of_reports_kinds() {
    let mut ev = Interpreter::new();
    assert_eq!(run(&mut ev, "type-of 1"), Cell::datatype(Kind::Integer));
    assert_eq!(run(&mut ev, "type-of 'x"), Cell::datatype(Kind::Word));
    assert_eq!(run(&mut ev, "type-of the 'x"), Cell::datatype(Kind::Quoted));
    assert!(run(&mut ev, "type-of null").is_null());
    assert_eq!(run(&mut ev, "integer! = type-of 2"), Cell::logic(true));
}

#[test]
fn const_blocks_refuse_modification() {
    let mut ev = Interpreter::new();
    let err = ev.do_source("b: const [1 2] append b 3").unwrap_err();
    assert_eq!(err.id(), "const-series");
    assert_eq!(
        run(&mut ev, "c: mutable b append c 3 length-of c"),
        Cell::integer(3)
    );
}

#[test]
fn make_error_builds_user_errors() {
    let mut ev = Interpreter::new();
    let err = ev.do_source("fail make error! \"bad\"").unwrap_err();
    assert_eq!(err.id(), "user");
    assert_eq!(err.to_string(), "bad");
}
