use std::{cell::RefCell, rc::Rc};

use crate::runtime::{
    action::Action,
    arena::ContextRef,
    binding::{Binding, Specifier},
    error::RenError,
    kind::{Kind, TypeSet},
    port::Port,
};
use crate::syntax::symbol::{Symbol, sym};

/// Flag bits carried beside the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellFlags(u8);

impl CellFlags {
    pub const CONST: CellFlags = CellFlags(1);
    pub const UNEVALUATED: CellFlags = CellFlags(1 << 1);
    pub const ISOTOPE: CellFlags = CellFlags(1 << 2);

    pub fn contains(self, other: CellFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: CellFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: CellFlags) {
        self.0 &= !other.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Word,
    Set,
    Get,
    Refinement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayClass {
    Block,
    Group,
    Path,
    SetPath,
    GetPath,
}

/// A word's identity and binding.
#[derive(Debug, Clone)]
pub struct Word {
    pub spelling: Symbol,
    pub canon: Symbol,
    pub binding: Binding,
}

impl Word {
    pub fn unbound(spelling: Symbol, canon: Symbol) -> Self {
        Self {
            spelling,
            canon,
            binding: Binding::Unbound,
        }
    }
}

/// A position in a shared array plus the specifier for its relative words.
#[derive(Debug, Clone)]
pub struct ArrayRef {
    pub data: Rc<RefCell<Vec<Cell>>>,
    pub index: usize,
    pub specifier: Specifier,
}

impl ArrayRef {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            data: Rc::new(RefCell::new(cells)),
            index: 0,
            specifier: Specifier::Specified,
        }
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len().saturating_sub(self.index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cells from the current index to the tail.
    pub fn to_vec(&self) -> Vec<Cell> {
        self.data
            .borrow()
            .get(self.index..)
            .map(|cells| cells.to_vec())
            .unwrap_or_default()
    }

    /// 0-based relative to the current index.
    pub fn get(&self, offset: usize) -> Option<Cell> {
        self.data.borrow().get(self.index + offset).cloned()
    }

    pub fn with_specifier(&self, specifier: Specifier) -> Self {
        Self {
            data: Rc::clone(&self.data),
            index: self.index,
            specifier,
        }
    }

    pub fn same_series(&self, other: &ArrayRef) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

/// The "heart" of a cell. Payload fields are only meaningful for their variant.
#[derive(Debug, Clone)]
pub enum Payload {
    Null,
    Blank,
    Logic(bool),
    Integer(i64),
    Decimal(f64),
    Pair { x: i64, y: i64 },
    /// Hundredths of a currency unit.
    Money(i64),
    Text(Rc<RefCell<String>>),
    Tag(Rc<str>),
    Word(WordClass, Word),
    Array(ArrayClass, ArrayRef),
    BadWord(Symbol),
    Action {
        action: Rc<Action>,
        binding: Option<ContextRef>,
        label: Option<Symbol>,
    },
    Object(ContextRef),
    Frame {
        ctx: ContextRef,
        phase: Rc<Action>,
        binding: Option<ContextRef>,
    },
    Datatype(Kind),
    Typeset(TypeSet),
    Error(Rc<RenError>),
    Port(Rc<Port>),
}

/// A runtime value: payload, quote level and flags.
#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) payload: Payload,
    pub(crate) quotes: u8,
    pub(crate) flags: CellFlags,
}

impl Cell {
    fn from_payload(payload: Payload) -> Self {
        Self {
            payload,
            quotes: 0,
            flags: CellFlags::default(),
        }
    }

    pub fn null() -> Self {
        Self::from_payload(Payload::Null)
    }

    pub fn blank() -> Self {
        Self::from_payload(Payload::Blank)
    }

    pub fn logic(value: bool) -> Self {
        Self::from_payload(Payload::Logic(value))
    }

    pub fn integer(value: i64) -> Self {
        Self::from_payload(Payload::Integer(value))
    }

    pub fn decimal(value: f64) -> Self {
        Self::from_payload(Payload::Decimal(value))
    }

    pub fn pair(x: i64, y: i64) -> Self {
        Self::from_payload(Payload::Pair { x, y })
    }

    pub fn money(hundredths: i64) -> Self {
        Self::from_payload(Payload::Money(hundredths))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::from_payload(Payload::Text(Rc::new(RefCell::new(value.into()))))
    }

    pub fn tag(value: &str) -> Self {
        Self::from_payload(Payload::Tag(Rc::from(value)))
    }

    pub fn word(class: WordClass, word: Word) -> Self {
        Self::from_payload(Payload::Word(class, word))
    }

    pub fn array(class: ArrayClass, array: ArrayRef) -> Self {
        Self::from_payload(Payload::Array(class, array))
    }

    pub fn block(cells: Vec<Cell>) -> Self {
        Self::array(ArrayClass::Block, ArrayRef::new(cells))
    }

    pub fn bad_word(label: Symbol) -> Self {
        Self::from_payload(Payload::BadWord(label))
    }

    pub fn isotope(label: Symbol) -> Self {
        let mut cell = Self::bad_word(label);
        cell.flags.insert(CellFlags::ISOTOPE);
        cell
    }

    /// The sentinel held by parameters and variables that were never set.
    pub fn unset() -> Self {
        Self::isotope(sym::UNSET)
    }

    pub fn void() -> Self {
        Self::isotope(sym::VOID)
    }

    pub fn action(action: Rc<Action>) -> Self {
        Self::from_payload(Payload::Action {
            action,
            binding: None,
            label: None,
        })
    }

    pub fn action_bound(action: Rc<Action>, binding: Option<ContextRef>, label: Option<Symbol>) -> Self {
        Self::from_payload(Payload::Action {
            action,
            binding,
            label,
        })
    }

    pub fn object(ctx: ContextRef) -> Self {
        Self::from_payload(Payload::Object(ctx))
    }

    pub fn frame(ctx: ContextRef, phase: Rc<Action>, binding: Option<ContextRef>) -> Self {
        Self::from_payload(Payload::Frame {
            ctx,
            phase,
            binding,
        })
    }

    pub fn datatype(kind: Kind) -> Self {
        Self::from_payload(Payload::Datatype(kind))
    }

    pub fn typeset(set: TypeSet) -> Self {
        Self::from_payload(Payload::Typeset(set))
    }

    pub fn error(error: RenError) -> Self {
        Self::from_payload(Payload::Error(Rc::new(error)))
    }

    pub fn port(port: Rc<Port>) -> Self {
        Self::from_payload(Payload::Port(port))
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn quotes(&self) -> u8 {
        self.quotes
    }

    /// Kind of the payload, ignoring quote levels.
    pub fn heart(&self) -> Kind {
        match &self.payload {
            Payload::Null => Kind::Null,
            Payload::Blank => Kind::Blank,
            Payload::Logic(_) => Kind::Logic,
            Payload::Integer(_) => Kind::Integer,
            Payload::Decimal(_) => Kind::Decimal,
            Payload::Pair { .. } => Kind::Pair,
            Payload::Money(_) => Kind::Money,
            Payload::Text(_) => Kind::Text,
            Payload::Tag(_) => Kind::Tag,
            Payload::Word(class, _) => match class {
                WordClass::Word => Kind::Word,
                WordClass::Set => Kind::SetWord,
                WordClass::Get => Kind::GetWord,
                WordClass::Refinement => Kind::Refinement,
            },
            Payload::Array(class, _) => match class {
                ArrayClass::Block => Kind::Block,
                ArrayClass::Group => Kind::Group,
                ArrayClass::Path => Kind::Path,
                ArrayClass::SetPath => Kind::SetPath,
                ArrayClass::GetPath => Kind::GetPath,
            },
            Payload::BadWord(_) => Kind::BadWord,
            Payload::Action { .. } => Kind::Action,
            Payload::Object(_) => Kind::Object,
            Payload::Frame { .. } => Kind::Frame,
            Payload::Datatype(_) => Kind::Datatype,
            Payload::Typeset(_) => Kind::Typeset,
            Payload::Error(_) => Kind::Error,
            Payload::Port(_) => Kind::Port,
        }
    }

    pub fn kind(&self) -> Kind {
        if self.quotes > 0 {
            Kind::Quoted
        } else {
            self.heart()
        }
    }

    pub fn type_name(&self) -> &'static str {
        if self.is_isotope() {
            "isotope"
        } else {
            self.kind().name()
        }
    }

    pub fn has_flag(&self, flag: CellFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn set_flag(&mut self, flag: CellFlags) {
        self.flags.insert(flag);
    }

    pub fn clear_flag(&mut self, flag: CellFlags) {
        self.flags.remove(flag);
    }

    pub fn with_flag(mut self, flag: CellFlags) -> Self {
        self.flags.insert(flag);
        self
    }

    /// Adds `depth` quote levels.
    pub fn quoted(mut self, depth: u8) -> Self {
        self.quotes = self.quotes.saturating_add(depth);
        self.flags.remove(CellFlags::UNEVALUATED);
        self
    }

    /// Removes one quote level; unquoted cells are returned unchanged.
    pub fn unquoted(mut self) -> Self {
        self.quotes = self.quotes.saturating_sub(1);
        self
    }

    pub fn is_null(&self) -> bool {
        self.quotes == 0 && matches!(self.payload, Payload::Null)
    }

    pub fn is_blank(&self) -> bool {
        self.quotes == 0 && matches!(self.payload, Payload::Blank)
    }

    pub fn is_isotope(&self) -> bool {
        self.flags.contains(CellFlags::ISOTOPE)
    }

    pub fn isotope_label(&self) -> Option<Symbol> {
        match self.payload {
            Payload::BadWord(label) if self.is_isotope() => Some(label),
            _ => None,
        }
    }

    pub fn is_isotope_of(&self, label: Symbol) -> bool {
        self.isotope_label() == Some(label)
    }

    pub fn is_unset(&self) -> bool {
        self.is_isotope_of(sym::UNSET)
    }

    /// NULL, or the `~null~` isotope.
    pub fn is_nullish(&self) -> bool {
        self.is_null() || self.is_isotope_of(sym::NULL)
    }

    /// Decay applied on an ordinary variable fetch: the `~null~` isotope
    /// becomes plain NULL, everything else is returned as is.
    pub fn decayed(&self) -> Cell {
        if self.is_isotope_of(sym::NULL) {
            Cell::null()
        } else {
            self.clone()
        }
    }

    /// Conditional truth. Isotopes other than `~null~` have no truth value.
    pub fn is_truthy(&self) -> Option<bool> {
        if self.is_isotope() {
            return if self.is_isotope_of(sym::NULL) {
                Some(false)
            } else {
                None
            };
        }
        if self.quotes > 0 {
            return Some(true);
        }
        Some(!matches!(
            self.payload,
            Payload::Null | Payload::Blank | Payload::Logic(false)
        ))
    }

    /// META: NULL becomes a lone quote, an isotope becomes its plain bad-word,
    /// anything else gains one quote level.
    pub fn meta(&self) -> Cell {
        if self.is_isotope() {
            let mut plain = self.clone();
            plain.flags.remove(CellFlags::ISOTOPE);
            plain
        } else {
            self.clone().quoted(1)
        }
    }

    /// Inverse of [`Cell::meta`].
    pub fn unmeta(&self) -> Cell {
        if self.quotes > 0 {
            return self.clone().unquoted();
        }
        match self.payload {
            Payload::BadWord(label) => Cell::isotope(label),
            _ => self.clone(),
        }
    }

    pub fn as_logic(&self) -> Option<bool> {
        match self.payload {
            Payload::Logic(value) if self.quotes == 0 => Some(value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.payload {
            Payload::Integer(value) if self.quotes == 0 => Some(value),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self.payload {
            Payload::Decimal(value) if self.quotes == 0 => Some(value),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(i64, i64)> {
        match self.payload {
            Payload::Pair { x, y } if self.quotes == 0 => Some((x, y)),
            _ => None,
        }
    }

    pub fn as_money(&self) -> Option<i64> {
        match self.payload {
            Payload::Money(value) if self.quotes == 0 => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match &self.payload {
            Payload::Text(text) if self.quotes == 0 => Some(text.borrow().clone()),
            _ => None,
        }
    }

    pub fn as_word(&self) -> Option<&Word> {
        match &self.payload {
            Payload::Word(_, word) => Some(word),
            _ => None,
        }
    }

    /// Symbol of a WORD!/SET-WORD!/GET-WORD!/REFINEMENT!, regardless of class.
    pub fn as_symbol(&self) -> Option<Symbol> {
        self.as_word().map(|word| word.spelling)
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match &self.payload {
            Payload::Array(_, array) => Some(array),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&ArrayRef> {
        match &self.payload {
            Payload::Array(ArrayClass::Block, array) if self.quotes == 0 => Some(array),
            _ => None,
        }
    }

    pub fn as_action(&self) -> Option<&Rc<Action>> {
        match &self.payload {
            Payload::Action { action, .. } if self.quotes == 0 => Some(action),
            _ => None,
        }
    }

    pub fn as_context(&self) -> Option<ContextRef> {
        match &self.payload {
            Payload::Object(ctx) | Payload::Frame { ctx, .. } if self.quotes == 0 => Some(*ctx),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&RenError> {
        match &self.payload {
            Payload::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_port(&self) -> Option<&Rc<Port>> {
        match &self.payload {
            Payload::Port(port) => Some(port),
            _ => None,
        }
    }

    pub fn as_datatype(&self) -> Option<Kind> {
        match self.payload {
            Payload::Datatype(kind) => Some(kind),
            _ => None,
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        crate::runtime::compare::compare(self, other, true).is_eq()
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::integer(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::logic(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::decimal(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::text(value)
    }
}
