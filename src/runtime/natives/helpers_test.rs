use crate::runtime::{interpreter::Interpreter, value::Cell};
use crate::syntax::symbol::sym;

use super::helpers::{heavy, none, reduce_block, truthy, type_error};

#[test]
fn type_error_names_the_argument() {
    let err = type_error("repeat", "count", "integer!", &Cell::logic(true));
    assert_eq!(err.id(), "invalid-arg");
    assert_eq!(
        err.to_string(),
        "repeat expected count to be integer!, got logic!"
    );
}

#[test]
fn heavy_only_touches_null() {
    assert_eq!(heavy(Cell::null()), Cell::isotope(sym::NULL));
    assert_eq!(heavy(Cell::integer(1)), Cell::integer(1));
}

#[test]
fn truthiness() {
    assert!(!truthy("if", &Cell::null()).unwrap());
    assert!(!truthy("if", &Cell::logic(false)).unwrap());
    assert!(truthy("if", &Cell::integer(0)).unwrap());
    assert!(!truthy("if", &Cell::isotope(sym::NULL)).unwrap());
    assert!(truthy("if", &none()).is_err());
}

#[test]
fn reduce_skips_nulls() {
    let mut ev = Interpreter::new();
    let Ok(outcome) = ev.do_source("[1 + 2 null 4]") else {
        panic!("block did not evaluate");
    };
    let block = outcome.value().as_block().unwrap().clone();
    let Ok(values) = reduce_block(&mut ev, &block) else {
        panic!("reduce failed");
    };
    assert_eq!(values, vec![Cell::integer(3), Cell::integer(4)]);
}
