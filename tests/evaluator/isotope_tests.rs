use ren::{Cell, Interpreter, sym};

fn eval(ev: &mut Interpreter, source: &str) -> Cell {
    ev.do_source(source).unwrap().value().clone()
}

#[test]
fn heavy_null_decays_only_on_plain_fetch() {
    let mut ev = Interpreter::new();
    eval(&mut ev, "x: if true [null]");

    let stored = ev.get_var("x").unwrap();
    assert!(stored.is_isotope_of(sym::NULL));

    let raw = eval(&mut ev, "get/any 'x");
    assert!(raw.is_isotope_of(sym::NULL));
    assert!(!raw.is_null());

    let plain = eval(&mut ev, "x");
    assert!(plain.is_null());
    assert!(!plain.is_isotope());
}

#[test]
fn plain_null_is_not_heavy() {
    let mut ev = Interpreter::new();
    eval(&mut ev, "y: null");
    assert!(eval(&mut ev, "get/any 'y").is_null());
    assert_eq!(eval(&mut ev, "mold meta get/any 'y"), Cell::text("'"));
}

#[test]
fn meta_distinguishes_the_two_nulls() {
    let mut ev = Interpreter::new();
    let heavy = eval(&mut ev, "meta if true [null]");
    let light = eval(&mut ev, "meta if false [null]");
    assert_ne!(heavy, light);
    assert_eq!(ev.mold(&heavy), "~null~");
}

#[test]
fn null_from_either_branch_does_not_trigger_else() {
    let mut ev = Interpreter::new();
    let taken = eval(&mut ev, "either true [null] [1] else [2]");
    assert!(taken.is_isotope_of(sym::NULL));
    let other = eval(&mut ev, "either false [1] [null] else [2]");
    assert!(other.is_isotope_of(sym::NULL));
    assert_eq!(eval(&mut ev, "either false [1] [2] else [3]"), Cell::integer(2));
    assert!(eval(&mut ev, "x: either true [null] [1] x").is_null());
}

#[test]
fn isotopes_cannot_enter_blocks() {
    let mut ev = Interpreter::new();
    assert_eq!(
        ev.do_source("append [] get/any 'undefined-thing").unwrap_err().id(),
        "isotope-in-array"
    );
    assert_eq!(ev.do_source("reduce [~none~]").unwrap_err().id(), "isotope-in-array");
}

#[test]
fn isotopes_only_reach_parameters_that_ask_for_them() {
    let mut ev = Interpreter::new();
    let err = ev.do_source("f: func [x] [x] f ~bad~").unwrap_err();
    assert_eq!(err.id(), "expect-arg");
    let result = eval(&mut ev, "g: func [x [<isotope> any-value!]] [meta get/any 'x] g ~bad~");
    assert_eq!(ev.mold(&result), "~bad~");
}

#[test]
fn bad_word_values_in_blocks_stay_inert() {
    let mut ev = Interpreter::new();
    let first = eval(&mut ev, "pick [~foo~ 1] 1");
    assert!(!first.is_isotope());
    assert_eq!(ev.mold(&first), "~foo~");
}
