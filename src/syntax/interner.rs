use std::{
    collections::HashMap,
    hash::{BuildHasher, Hash, Hasher, RandomState},
};

use crate::syntax::symbol::{Symbol, WELL_KNOWN};

/// Byte range of an interned spelling inside the shared storage buffer.
#[derive(Debug, Clone, Copy)]
struct Entry {
    start: usize,
    end: usize,
    /// Case-folded spelling this entry belongs to.
    canon: Symbol,
    /// Next member of the circular synonym ring.
    synonym: Symbol,
}

/// A spelling interner that also tracks case-insensitive synonym classes.
///
/// Every distinct spelling gets its own [`Symbol`]. Spellings that differ only
/// in case share a *canon* (the lowercase spelling), and all members of a
/// class are linked into a circular ring, so walking `synonyms` from any member
/// visits the whole class.
///
/// # Example
///
/// ```
/// use ren::syntax::interner::Interner;
///
/// let mut interner = Interner::new();
/// let upper = interner.intern("Foo");
/// let lower = interner.intern("foo");
///
/// assert_ne!(upper, lower);
/// assert_eq!(interner.canon(upper), interner.canon(lower));
/// assert_eq!(interner.resolve(upper), "Foo");
/// ```
#[derive(Debug, Clone)]
pub struct Interner {
    hasher: RandomState,
    buckets: HashMap<u64, Vec<Symbol>>,
    entries: Vec<Entry>,
    storage: String,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Creates an interner seeded with the well-known symbols.
    pub fn new() -> Self {
        let mut interner = Self {
            hasher: RandomState::new(),
            buckets: HashMap::default(),
            entries: Vec::new(),
            storage: String::new(),
        };
        interner.seed();
        interner
    }

    fn seed(&mut self) {
        for (index, spelling) in WELL_KNOWN.iter().enumerate() {
            let sym = self.intern(spelling);
            assert_eq!(
                sym.index(),
                index,
                "well-known symbol `{spelling}` interned out of order"
            );
        }
    }

    /// Returns the number of distinct spellings interned so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Interns a spelling and returns its symbol.
    ///
    /// # Panics
    ///
    /// Panics if the number of unique spellings exceeds `u32::MAX`.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(existing) = self.lookup(s) {
            return existing;
        }

        let index = self.entries.len();
        assert!(
            index <= u32::MAX as usize,
            "symbol table overflow: cannot intern more than {} unique spellings",
            u32::MAX
        );
        let sym = Symbol::new(index as u32);

        let start = self.storage.len();
        self.storage.push_str(s);
        let end = self.storage.len();

        self.entries.push(Entry {
            start,
            end,
            canon: sym,
            synonym: sym,
        });
        let hash = self.hash_str(s);
        self.buckets.entry(hash).or_default().push(sym);

        let folded = s.to_lowercase();
        if folded != s {
            let canon = self.intern(&folded);
            let ring_next = self.entries[canon.index()].synonym;
            self.entries[sym.index()].canon = canon;
            self.entries[sym.index()].synonym = ring_next;
            self.entries[canon.index()].synonym = sym;
        }
        sym
    }

    /// Finds the symbol for a spelling without interning it.
    pub fn lookup(&self, s: &str) -> Option<Symbol> {
        let hash = self.hash_str(s);
        self.buckets
            .get(&hash)?
            .iter()
            .copied()
            .find(|candidate| self.try_resolve(*candidate) == Some(s))
    }

    /// Resolves a symbol to its exact spelling.
    ///
    /// # Panics
    ///
    /// Panics if the symbol was not created by this interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.try_resolve(sym)
            .unwrap_or_else(|| panic!("invalid symbol: {:?}", sym))
    }

    pub fn try_resolve(&self, sym: Symbol) -> Option<&str> {
        let entry = self.entries.get(sym.index())?;
        self.storage.get(entry.start..entry.end)
    }

    /// Returns the canon (case-folded) symbol of `sym`'s synonym class.
    pub fn canon(&self, sym: Symbol) -> Symbol {
        self.entries[sym.index()].canon
    }

    /// Returns every spelling in `sym`'s synonym class, starting with `sym`.
    pub fn synonyms(&self, sym: Symbol) -> Vec<Symbol> {
        let mut ring = vec![sym];
        let mut next = self.entries[sym.index()].synonym;
        while next != sym {
            ring.push(next);
            next = self.entries[next.index()].synonym;
        }
        ring
    }

    /// Non-strict comparison: same synonym class.
    pub fn same_canon(&self, a: Symbol, b: Symbol) -> bool {
        self.canon(a) == self.canon(b)
    }

    fn hash_str(&self, s: &str) -> u64 {
        let mut h = self.hasher.build_hasher();
        s.hash(&mut h);
        h.finish()
    }
}
