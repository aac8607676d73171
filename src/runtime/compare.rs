//! Ordering of cells for equality, comparison natives and SORT.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::runtime::value::{Cell, CellFlags, Payload};

/// Compares two cells.
///
/// Non-strict comparison lets INTEGER! and DECIMAL! meet numerically, folds
/// TEXT! case and compares words by canon. Strict comparison requires the
/// same kind and exact spelling. Cells of unrelated kinds order by kind.
pub fn compare(a: &Cell, b: &Cell, strict: bool) -> Ordering {
    let by_quotes = a.quotes.cmp(&b.quotes);
    if by_quotes != Ordering::Equal {
        return by_quotes;
    }
    let by_isotope = a
        .has_flag(CellFlags::ISOTOPE)
        .cmp(&b.has_flag(CellFlags::ISOTOPE));
    if by_isotope != Ordering::Equal {
        return by_isotope;
    }

    match (&a.payload, &b.payload) {
        (Payload::Null, Payload::Null) | (Payload::Blank, Payload::Blank) => Ordering::Equal,
        (Payload::Logic(x), Payload::Logic(y)) => x.cmp(y),
        (Payload::Integer(x), Payload::Integer(y)) => x.cmp(y),
        (Payload::Decimal(x), Payload::Decimal(y)) => x.total_cmp(y),
        (Payload::Integer(x), Payload::Decimal(y)) if !strict => (*x as f64).total_cmp(y),
        (Payload::Decimal(x), Payload::Integer(y)) if !strict => x.total_cmp(&(*y as f64)),
        (Payload::Pair { x: ax, y: ay }, Payload::Pair { x: bx, y: by }) => {
            ay.cmp(by).then(ax.cmp(bx))
        }
        (Payload::Money(x), Payload::Money(y)) => x.cmp(y),
        (Payload::Text(x), Payload::Text(y)) => compare_text(&x.borrow(), &y.borrow(), strict),
        (Payload::Tag(x), Payload::Tag(y)) => compare_text(x, y, strict),
        (Payload::Word(xc, x), Payload::Word(yc, y)) if xc == yc => {
            if strict {
                x.spelling.cmp(&y.spelling)
            } else {
                x.canon.cmp(&y.canon)
            }
        }
        (Payload::Array(xc, x), Payload::Array(yc, y)) if xc == yc => {
            let left = x.to_vec();
            let right = y.to_vec();
            for (l, r) in left.iter().zip(right.iter()) {
                let ordering = compare(l, r, strict);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            left.len().cmp(&right.len())
        }
        (Payload::BadWord(x), Payload::BadWord(y)) => x.cmp(y),
        (
            Payload::Action {
                action: x,
                binding: xb,
                ..
            },
            Payload::Action {
                action: y,
                binding: yb,
                ..
            },
        ) => Rc::as_ptr(x)
            .cmp(&Rc::as_ptr(y))
            .then_with(|| xb.cmp(yb)),
        (Payload::Object(x), Payload::Object(y)) => x.cmp(y),
        (Payload::Frame { ctx: x, .. }, Payload::Frame { ctx: y, .. }) => x.cmp(y),
        (Payload::Datatype(x), Payload::Datatype(y)) => x.cmp(y),
        (Payload::Typeset(x), Payload::Typeset(y)) => {
            if x == y {
                Ordering::Equal
            } else {
                x.kinds().cmp(y.kinds())
            }
        }
        (Payload::Error(x), Payload::Error(y)) => {
            if Rc::ptr_eq(x, y) || (!strict && x == y) {
                Ordering::Equal
            } else {
                x.id().cmp(y.id()).then_with(|| x.to_string().cmp(&y.to_string()))
            }
        }
        (Payload::Port(x), Payload::Port(y)) => Rc::as_ptr(x).cmp(&Rc::as_ptr(y)),
        _ => a.heart().cmp(&b.heart()),
    }
}

fn compare_text(a: &str, b: &str, strict: bool) -> Ordering {
    if strict {
        a.cmp(b)
    } else {
        a.to_lowercase().cmp(&b.to_lowercase())
    }
}

pub fn equal(a: &Cell, b: &Cell, strict: bool) -> bool {
    compare(a, b, strict) == Ordering::Equal
}

/// Whether a throw's label matches the label a catcher is waiting for.
///
/// Action labels match by identity and binding, so one invocation's RETURN
/// never satisfies another invocation's catch.
pub fn same_label(thrown: &Cell, wanted: &Cell) -> bool {
    match (&thrown.payload, &wanted.payload) {
        (
            Payload::Action {
                action: x,
                binding: xb,
                ..
            },
            Payload::Action {
                action: y,
                binding: yb,
                ..
            },
        ) => Rc::ptr_eq(x, y) && xb == yb,
        _ => equal(thrown, wanted, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::value::{Word, WordClass};
    use crate::syntax::interner::Interner;

    fn word(interner: &mut Interner, spelling: &str) -> Cell {
        let sym = interner.intern(spelling);
        Cell::word(WordClass::Word, Word::unbound(sym, interner.canon(sym)))
    }

    #[test]
    fn case_variants_are_equal_only_non_strictly() {
        let mut interner = Interner::new();
        let variants = ["hello", "Hello", "HELLO", "hElLo"];
        let cells: Vec<Cell> = variants.iter().map(|v| word(&mut interner, v)).collect();
        for a in &cells {
            for b in &cells {
                assert!(equal(a, b, false));
                let same_spelling = a.as_symbol() == b.as_symbol();
                assert_eq!(equal(a, b, true), same_spelling);
            }
        }
    }

    #[test]
    fn integers_and_decimals_meet_non_strictly() {
        assert!(equal(&Cell::integer(1), &Cell::decimal(1.0), false));
        assert!(!equal(&Cell::integer(1), &Cell::decimal(1.0), true));
        assert_eq!(
            compare(&Cell::integer(2), &Cell::decimal(1.5), false),
            Ordering::Greater
        );
    }

    #[test]
    fn blank_and_null_equal_themselves() {
        assert!(equal(&Cell::blank(), &Cell::blank(), true));
        assert!(equal(&Cell::null(), &Cell::null(), true));
        assert!(!equal(&Cell::null(), &Cell::blank(), false));
    }

    #[test]
    fn text_folds_case_non_strictly() {
        assert!(equal(&Cell::text("abc"), &Cell::text("ABC"), false));
        assert!(!equal(&Cell::text("abc"), &Cell::text("ABC"), true));
    }

    #[test]
    fn quote_levels_and_isotopes_are_distinct() {
        assert!(!equal(&Cell::integer(1), &Cell::integer(1).quoted(1), false));
        let null_isotope = Cell::isotope(crate::syntax::symbol::sym::NULL);
        assert!(!equal(&null_isotope, &null_isotope.meta(), true));
    }

    #[test]
    fn blocks_compare_elementwise() {
        let a = Cell::block(vec![Cell::integer(1), Cell::integer(2)]);
        let b = Cell::block(vec![Cell::integer(1), Cell::integer(3)]);
        let c = Cell::block(vec![Cell::integer(1), Cell::integer(2)]);
        assert_eq!(compare(&a, &b, true), Ordering::Less);
        assert!(equal(&a, &c, true));
    }
}
