use std::rc::Rc;

use crate::runtime::value::Cell;
use crate::syntax::symbol::Symbol;

/// A context key: the exact spelling plus its case-folded canon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub spelling: Symbol,
    pub canon: Symbol,
}

/// The ordered key sequence shared by every context of one shape.
///
/// Keys are addressed by 1-based index, matching the varlist slot that holds
/// their value (slot 0 is the rootvar). A keylist is treated as immutable once
/// it is shared; see [`Varlist::add_key`].
#[derive(Debug, Clone, Default)]
pub struct Keylist {
    keys: Vec<Key>,
    ancestor: Option<Rc<Keylist>>,
}

impl Keylist {
    pub fn new(keys: Vec<Key>) -> Self {
        Self {
            keys,
            ancestor: None,
        }
    }

    /// Builds a keylist extending `base`; the base keys stay a prefix.
    pub fn derived(base: &Rc<Keylist>, extra: impl IntoIterator<Item = Key>) -> Self {
        let mut keys = base.keys.clone();
        keys.extend(extra);
        Self {
            keys,
            ancestor: Some(Rc::clone(base)),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Key at a 1-based index.
    pub fn key(&self, index: usize) -> Key {
        self.keys[index - 1]
    }

    /// Case-insensitive search; returns the 1-based index.
    pub fn find(&self, canon: Symbol) -> Option<usize> {
        self.keys
            .iter()
            .position(|key| key.canon == canon)
            .map(|pos| pos + 1)
    }

    pub fn ancestor(&self) -> Option<&Rc<Keylist>> {
        self.ancestor.as_ref()
    }

    pub(crate) fn push(&mut self, key: Key) -> usize {
        self.keys.push(key);
        self.keys.len()
    }
}

/// True if `keylist` is `base` or derives from it through ancestors.
pub fn descends_from(keylist: &Rc<Keylist>, base: &Rc<Keylist>) -> bool {
    let mut current = Some(keylist);
    while let Some(list) = current {
        if Rc::ptr_eq(list, base) {
            return true;
        }
        current = list.ancestor.as_ref();
    }
    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Object,
    Frame,
}

/// Storage of one context instance.
#[derive(Debug, Clone)]
pub struct Varlist {
    pub kind: ContextKind,
    pub keylist: Rc<Keylist>,
    /// `slots[0]` is the rootvar; `slots[i]` holds the value of key `i`.
    pub slots: Vec<Cell>,
}

impl Varlist {
    pub fn new(kind: ContextKind, keylist: Rc<Keylist>, rootvar: Cell, values: Vec<Cell>) -> Self {
        debug_assert_eq!(keylist.len(), values.len());
        let mut slots = Vec::with_capacity(values.len() + 1);
        slots.push(rootvar);
        slots.extend(values);
        Self {
            kind,
            keylist,
            slots,
        }
    }

    pub fn len(&self) -> usize {
        self.keylist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keylist.is_empty()
    }

    pub fn rootvar(&self) -> &Cell {
        &self.slots[0]
    }

    pub fn find(&self, canon: Symbol) -> Option<usize> {
        self.keylist.find(canon)
    }

    pub fn get(&self, index: usize) -> &Cell {
        &self.slots[index]
    }

    pub fn set(&mut self, index: usize, value: Cell) {
        self.slots[index] = value;
    }

    /// Values without the rootvar, in key order.
    pub fn values(&self) -> &[Cell] {
        &self.slots[1..]
    }

    /// Appends a key, copying the keylist first if anyone else shares it.
    pub fn add_key(&mut self, key: Key, value: Cell) -> usize {
        let index = Rc::make_mut(&mut self.keylist).push(key);
        self.slots.push(value);
        debug_assert_eq!(self.slots.len(), index + 1);
        index
    }
}
