//! Source-like rendering of cells (MOLD) and display rendering (FORM).

use std::fmt::Write;

use crate::runtime::{
    arena::ContextArena,
    value::{ArrayClass, ArrayRef, Cell, Payload, WordClass},
};
use crate::syntax::interner::Interner;

const MAX_NESTING: usize = 64;

pub struct Molder<'a> {
    interner: &'a Interner,
    arena: &'a ContextArena,
    out: String,
    depth: usize,
}

impl<'a> Molder<'a> {
    pub fn new(interner: &'a Interner, arena: &'a ContextArena) -> Self {
        Self {
            interner,
            arena,
            out: String::new(),
            depth: 0,
        }
    }

    pub fn mold(mut self, cell: &Cell) -> String {
        self.cell(cell);
        self.out
    }

    pub fn form(mut self, cell: &Cell) -> String {
        self.form_cell(cell);
        self.out
    }

    fn name(&self, symbol: crate::syntax::symbol::Symbol) -> &str {
        self.interner.resolve(symbol)
    }

    fn form_cell(&mut self, cell: &Cell) {
        if cell.quotes() > 0 || cell.is_isotope() {
            self.cell(cell);
            return;
        }
        match cell.payload() {
            Payload::Text(text) => self.out.push_str(&text.borrow()),
            Payload::Tag(tag) => self.out.push_str(tag),
            Payload::Word(_, word) => {
                let name = self.name(word.spelling).to_string();
                self.out.push_str(&name);
            }
            Payload::Array(ArrayClass::Block | ArrayClass::Group, array) => {
                self.nested(|molder| {
                    for (i, element) in array.to_vec().iter().enumerate() {
                        if i > 0 {
                            molder.out.push(' ');
                        }
                        molder.form_cell(element);
                    }
                });
            }
            Payload::Error(error) => self.out.push_str(&error.to_string()),
            _ => self.cell(cell),
        }
    }

    fn nested(&mut self, body: impl FnOnce(&mut Self)) {
        if self.depth >= MAX_NESTING {
            self.out.push_str("...");
            return;
        }
        self.depth += 1;
        body(self);
        self.depth -= 1;
    }

    fn cell(&mut self, cell: &Cell) {
        for _ in 0..cell.quotes() {
            self.out.push('\'');
        }
        match cell.payload() {
            Payload::Null => {
                if cell.quotes() == 0 {
                    self.out.push_str("null");
                }
            }
            Payload::Blank => self.out.push('_'),
            Payload::Logic(value) => {
                let _ = write!(self.out, "#[{value}]");
            }
            Payload::Integer(value) => {
                let _ = write!(self.out, "{value}");
            }
            Payload::Decimal(value) => self.decimal(*value),
            Payload::Pair { x, y } => {
                let _ = write!(self.out, "{x}x{y}");
            }
            Payload::Money(amount) => {
                let sign = if *amount < 0 { "-" } else { "" };
                let abs = amount.unsigned_abs();
                let _ = write!(self.out, "{sign}${}.{:02}", abs / 100, abs % 100);
            }
            Payload::Text(text) => self.text(&text.borrow()),
            Payload::Tag(tag) => {
                let _ = write!(self.out, "<{tag}>");
            }
            Payload::Word(class, word) => {
                let name = self.name(word.spelling).to_string();
                match class {
                    WordClass::Word => self.out.push_str(&name),
                    WordClass::Set => {
                        let _ = write!(self.out, "{name}:");
                    }
                    WordClass::Get => {
                        let _ = write!(self.out, ":{name}");
                    }
                    WordClass::Refinement => {
                        let _ = write!(self.out, "/{name}");
                    }
                }
            }
            Payload::Array(class, array) => self.array(*class, array),
            Payload::BadWord(label) => {
                let name = self.name(*label).to_string();
                let _ = write!(self.out, "~{name}~");
            }
            Payload::Action { label, .. } => match label {
                Some(label) => {
                    let name = self.name(*label).to_string();
                    let _ = write!(self.out, "#[action! {name}]");
                }
                None => self.out.push_str("#[action!]"),
            },
            Payload::Object(ctx) => {
                self.out.push_str("make object! [");
                self.fields(*ctx);
                self.out.push(']');
            }
            Payload::Frame { ctx, .. } => {
                if self.arena.is_inert(*ctx) {
                    self.out.push_str("#[frame! inert]");
                } else {
                    self.out.push_str("#[frame! [");
                    self.fields(*ctx);
                    self.out.push_str("]]");
                }
            }
            Payload::Datatype(kind) => self.out.push_str(kind.name()),
            Payload::Typeset(set) => {
                self.out.push_str("make typeset! [");
                let names: Vec<&str> = set.kinds().map(|kind| kind.name()).collect();
                self.out.push_str(&names.join(" "));
                self.out.push(']');
            }
            Payload::Error(error) => {
                self.out.push_str("make error! [id: ");
                let _ = write!(self.out, "{} message: ", error.id());
                self.text(&error.to_string());
                self.out.push(']');
            }
            Payload::Port(port) => {
                let _ = write!(self.out, "#[port! {}]", port.scheme);
            }
        }
    }

    fn decimal(&mut self, value: f64) {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
            let _ = write!(self.out, "{value:.1}");
        } else {
            let _ = write!(self.out, "{value}");
        }
    }

    fn text(&mut self, text: &str) {
        self.out.push('"');
        for c in text.chars() {
            match c {
                '"' => self.out.push_str("^\""),
                '^' => self.out.push_str("^^"),
                '\n' => self.out.push_str("^/"),
                '\t' => self.out.push_str("^-"),
                other => self.out.push(other),
            }
        }
        self.out.push('"');
    }

    fn array(&mut self, class: ArrayClass, array: &ArrayRef) {
        let cells = array.to_vec();
        let (open, separator, close) = match class {
            ArrayClass::Block => ("[", " ", "]"),
            ArrayClass::Group => ("(", " ", ")"),
            ArrayClass::Path => ("", "/", ""),
            ArrayClass::SetPath => ("", "/", ":"),
            ArrayClass::GetPath => (":", "/", ""),
        };
        self.out.push_str(open);
        self.nested(|molder| {
            for (i, element) in cells.iter().enumerate() {
                if i > 0 {
                    molder.out.push_str(separator);
                }
                molder.cell(element);
            }
        });
        self.out.push_str(close);
    }

    fn fields(&mut self, ctx: crate::runtime::arena::ContextRef) {
        let Ok(varlist) = self.arena.get(ctx) else {
            self.out.push_str("...");
            return;
        };
        let entries: Vec<(String, Cell)> = varlist
            .keylist
            .keys()
            .iter()
            .zip(varlist.values())
            .map(|(key, value)| (self.name(key.spelling).to_string(), value.clone()))
            .collect();
        self.nested(|molder| {
            for (i, (name, value)) in entries.iter().enumerate() {
                if i > 0 {
                    molder.out.push(' ');
                }
                let _ = write!(molder.out, "{name}: ");
                if value.is_null() {
                    molder.out.push_str("null");
                } else {
                    molder.cell(&field_source(value));
                }
            }
        });
    }
}

/// Field values render as source that would recreate them: words, paths
/// and groups gain a quote.
fn field_source(value: &Cell) -> Cell {
    if value.is_isotope() {
        return value.meta();
    }
    match value.payload() {
        Payload::Word(..) | Payload::Array(ArrayClass::Path | ArrayClass::Group, _) => {
            value.clone().quoted(1)
        }
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::value::Word;

    fn mold(cell: &Cell) -> String {
        let interner = Interner::new();
        let arena = ContextArena::new();
        Molder::new(&interner, &arena).mold(cell)
    }

    #[test]
    fn scalars() {
        assert_eq!(mold(&Cell::null()), "null");
        assert_eq!(mold(&Cell::blank()), "_");
        assert_eq!(mold(&Cell::logic(true)), "#[true]");
        assert_eq!(mold(&Cell::decimal(2.0)), "2.0");
        assert_eq!(mold(&Cell::decimal(2.5)), "2.5");
        assert_eq!(mold(&Cell::pair(1, 2)), "1x2");
        assert_eq!(mold(&Cell::money(150)), "$1.50");
        assert_eq!(mold(&Cell::money(-150)), "-$1.50");
        assert_eq!(mold(&Cell::text("a\"b\n")), "\"a^\"b^/\"");
    }

    #[test]
    fn quoting_and_isotopes() {
        assert_eq!(mold(&Cell::null().quoted(1)), "'");
        assert_eq!(mold(&Cell::integer(1).quoted(2)), "''1");
        assert_eq!(mold(&Cell::void()), "~void~");
        assert_eq!(mold(&Cell::void().meta()), "~void~");
    }

    #[test]
    fn arrays() {
        let mut interner = Interner::new();
        let arena = ContextArena::new();
        let a = interner.intern("a");
        let word = |class| Cell::word(class, Word::unbound(a, a));
        let block = Cell::block(vec![
            word(WordClass::Set),
            Cell::integer(1),
            Cell::array(
                ArrayClass::Group,
                ArrayRef::new(vec![word(WordClass::Get), word(WordClass::Refinement)]),
            ),
        ]);
        assert_eq!(Molder::new(&interner, &arena).mold(&block), "[a: 1 (:a /a)]");
        assert_eq!(Molder::new(&interner, &arena).form(&block), "a 1 a a");

        let path = Cell::array(
            ArrayClass::SetPath,
            ArrayRef::new(vec![word(WordClass::Word), Cell::integer(2)]),
        );
        assert_eq!(Molder::new(&interner, &arena).mold(&path), "a/2:");
    }

    #[test]
    fn self_containing_blocks_terminate() {
        let block = ArrayRef::new(vec![]);
        block
            .data
            .borrow_mut()
            .push(Cell::array(ArrayClass::Block, block.clone()));
        let text = mold(&Cell::array(ArrayClass::Block, block));
        assert!(text.contains("..."));
    }
}
