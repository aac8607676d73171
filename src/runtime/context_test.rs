use std::rc::Rc;

use crate::runtime::context::{ContextKind, Key, Keylist, Varlist, descends_from};
use crate::runtime::value::Cell;
use crate::syntax::interner::Interner;

fn key(interner: &mut Interner, name: &str) -> Key {
    let spelling = interner.intern(name);
    Key {
        spelling,
        canon: interner.canon(spelling),
    }
}

#[test]
fn find_is_case_insensitive_and_one_based() {
    let mut interner = Interner::new();
    let a = key(&mut interner, "alpha");
    let b = key(&mut interner, "Beta");
    let keylist = Keylist::new(vec![a, b]);

    let upper = interner.intern("BETA");
    assert_eq!(keylist.find(interner.canon(upper)), Some(2));
    assert_eq!(keylist.find(a.canon), Some(1));
    assert_eq!(keylist.key(2).spelling, b.spelling);
}

#[test]
fn adding_a_key_to_a_shared_keylist_copies_it() {
    let mut interner = Interner::new();
    let x = key(&mut interner, "x");
    let y = key(&mut interner, "y");
    let shared = Rc::new(Keylist::new(vec![x]));

    let mut first = Varlist::new(
        ContextKind::Object,
        Rc::clone(&shared),
        Cell::blank(),
        vec![Cell::integer(1)],
    );
    let second = Varlist::new(
        ContextKind::Object,
        Rc::clone(&shared),
        Cell::blank(),
        vec![Cell::integer(2)],
    );

    let index = first.add_key(y, Cell::integer(3));
    assert_eq!(index, 2);
    assert!(!Rc::ptr_eq(&first.keylist, &shared));
    assert_eq!(shared.len(), 1, "shared keylist must not be mutated");
    assert!(Rc::ptr_eq(&second.keylist, &shared));
    assert_eq!(first.len(), 2);
}

#[test]
fn adding_a_key_to_a_unique_keylist_mutates_in_place() {
    let mut interner = Interner::new();
    let x = key(&mut interner, "x");
    let y = key(&mut interner, "y");
    let mut only = Varlist::new(
        ContextKind::Object,
        Rc::new(Keylist::new(vec![x])),
        Cell::blank(),
        vec![Cell::integer(1)],
    );
    let before = Rc::as_ptr(&only.keylist);
    only.add_key(y, Cell::integer(2));
    assert_eq!(Rc::as_ptr(&only.keylist), before);
}

#[test]
fn derived_keylists_descend_from_their_base() {
    let mut interner = Interner::new();
    let a = key(&mut interner, "a");
    let b = key(&mut interner, "b");
    let base = Rc::new(Keylist::new(vec![a]));
    let derived = Rc::new(Keylist::derived(&base, [b]));
    let unrelated = Rc::new(Keylist::new(vec![a]));

    assert!(descends_from(&derived, &base));
    assert!(descends_from(&base, &base));
    assert!(!descends_from(&base, &derived));
    assert!(!descends_from(&unrelated, &base));
    assert_eq!(derived.find(a.canon), Some(1));
    assert_eq!(derived.find(b.canon), Some(2));
}
