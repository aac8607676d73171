/// A unique identifier for an interned spelling.
///
/// Symbols are created by the `Interner` and should not be constructed manually.
/// Two spellings that differ only in case get distinct symbols that share a
/// canon; see [`crate::syntax::interner::Interner::canon`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Creates a new symbol from a raw index.
    ///
    /// This is intended for internal use by the `Interner` only.
    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this symbol.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Spellings every interner seeds first, in this exact order, so the
/// constants in [`sym`] are valid for any `Interner`.
pub(crate) const WELL_KNOWN: &[&str] = &[
    "unset", "void", "none", "null", "return", "append", "length-of", "pick", "copy", "add",
    "subtract", "multiply", "divide", "negate", "open", "read", "write", "close", "sort",
];

/// Well-known symbols (bad-word labels, the definitional return key and the
/// generic verbs the built-in type classes answer).
pub mod sym {
    use super::Symbol;

    pub const UNSET: Symbol = Symbol::new(0);
    pub const VOID: Symbol = Symbol::new(1);
    pub const NONE: Symbol = Symbol::new(2);
    pub const NULL: Symbol = Symbol::new(3);
    pub const RETURN: Symbol = Symbol::new(4);
    pub const APPEND: Symbol = Symbol::new(5);
    pub const LENGTH_OF: Symbol = Symbol::new(6);
    pub const PICK: Symbol = Symbol::new(7);
    pub const COPY: Symbol = Symbol::new(8);
    pub const ADD: Symbol = Symbol::new(9);
    pub const SUBTRACT: Symbol = Symbol::new(10);
    pub const MULTIPLY: Symbol = Symbol::new(11);
    pub const DIVIDE: Symbol = Symbol::new(12);
    pub const NEGATE: Symbol = Symbol::new(13);
    pub const OPEN: Symbol = Symbol::new(14);
    pub const READ: Symbol = Symbol::new(15);
    pub const WRITE: Symbol = Symbol::new(16);
    pub const CLOSE: Symbol = Symbol::new(17);
    pub const SORT: Symbol = Symbol::new(18);
}
