use std::fmt;

/// The datatype of a cell as seen from user code.
///
/// `Quoted` is never a heart; it is what [`crate::runtime::value::Cell::kind`]
/// reports for any cell carrying one or more quote levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Null,
    Blank,
    Logic,
    Integer,
    Decimal,
    Pair,
    Money,
    Text,
    Tag,
    Word,
    SetWord,
    GetWord,
    Refinement,
    Block,
    Group,
    Path,
    SetPath,
    GetPath,
    BadWord,
    Action,
    Object,
    Frame,
    Datatype,
    Typeset,
    Error,
    Port,
    Quoted,
}

pub const ALL_KINDS: &[Kind] = &[
    Kind::Null,
    Kind::Blank,
    Kind::Logic,
    Kind::Integer,
    Kind::Decimal,
    Kind::Pair,
    Kind::Money,
    Kind::Text,
    Kind::Tag,
    Kind::Word,
    Kind::SetWord,
    Kind::GetWord,
    Kind::Refinement,
    Kind::Block,
    Kind::Group,
    Kind::Path,
    Kind::SetPath,
    Kind::GetPath,
    Kind::BadWord,
    Kind::Action,
    Kind::Object,
    Kind::Frame,
    Kind::Datatype,
    Kind::Typeset,
    Kind::Error,
    Kind::Port,
    Kind::Quoted,
];

impl Kind {
    /// The datatype word, e.g. `integer!`.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Blank => "blank!",
            Kind::Logic => "logic!",
            Kind::Integer => "integer!",
            Kind::Decimal => "decimal!",
            Kind::Pair => "pair!",
            Kind::Money => "money!",
            Kind::Text => "text!",
            Kind::Tag => "tag!",
            Kind::Word => "word!",
            Kind::SetWord => "set-word!",
            Kind::GetWord => "get-word!",
            Kind::Refinement => "refinement!",
            Kind::Block => "block!",
            Kind::Group => "group!",
            Kind::Path => "path!",
            Kind::SetPath => "set-path!",
            Kind::GetPath => "get-path!",
            Kind::BadWord => "bad-word!",
            Kind::Action => "action!",
            Kind::Object => "object!",
            Kind::Frame => "frame!",
            Kind::Datatype => "datatype!",
            Kind::Typeset => "typeset!",
            Kind::Error => "error!",
            Kind::Port => "port!",
            Kind::Quoted => "quoted!",
        }
    }

    pub fn from_name(name: &str) -> Option<Kind> {
        ALL_KINDS
            .iter()
            .copied()
            .find(|kind| *kind != Kind::Null && kind.name().eq_ignore_ascii_case(name))
    }

    fn bit(self) -> u32 {
        1 << (self as u32)
    }

    pub fn is_array(self) -> bool {
        matches!(
            self,
            Kind::Block | Kind::Group | Kind::Path | Kind::SetPath | Kind::GetPath
        )
    }

    pub fn is_word(self) -> bool {
        matches!(
            self,
            Kind::Word | Kind::SetWord | Kind::GetWord | Kind::Refinement
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of kinds, used for parameter type constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeSet(u32);

impl TypeSet {
    pub const EMPTY: TypeSet = TypeSet(0);

    pub fn of(kinds: &[Kind]) -> TypeSet {
        kinds.iter().fold(TypeSet::EMPTY, |set, kind| set.with(*kind))
    }

    /// Every kind except NULL.
    pub fn any_value() -> TypeSet {
        let all = TypeSet::of(ALL_KINDS);
        all.without(Kind::Null)
    }

    pub fn with(self, kind: Kind) -> TypeSet {
        TypeSet(self.0 | kind.bit())
    }

    pub fn without(self, kind: Kind) -> TypeSet {
        TypeSet(self.0 & !kind.bit())
    }

    pub fn union(self, other: TypeSet) -> TypeSet {
        TypeSet(self.0 | other.0)
    }

    pub fn contains(self, kind: Kind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn kinds(self) -> impl Iterator<Item = Kind> {
        ALL_KINDS.iter().copied().filter(move |kind| self.contains(*kind))
    }

    /// Resolves a named typeset word such as `any-number!`.
    pub fn from_name(name: &str) -> Option<TypeSet> {
        let set = match name.to_ascii_lowercase().as_str() {
            "any-value!" => TypeSet::any_value(),
            "any-number!" => TypeSet::of(&[Kind::Integer, Kind::Decimal]),
            "any-scalar!" => TypeSet::of(&[Kind::Integer, Kind::Decimal, Kind::Pair, Kind::Money]),
            "any-word!" => TypeSet::of(&[Kind::Word, Kind::SetWord, Kind::GetWord, Kind::Refinement]),
            "any-array!" => TypeSet::of(&[
                Kind::Block,
                Kind::Group,
                Kind::Path,
                Kind::SetPath,
                Kind::GetPath,
            ]),
            "any-series!" => TypeSet::of(&[
                Kind::Block,
                Kind::Group,
                Kind::Path,
                Kind::SetPath,
                Kind::GetPath,
                Kind::Text,
                Kind::Tag,
            ]),
            "any-context!" => TypeSet::of(&[Kind::Object, Kind::Frame, Kind::Port, Kind::Error]),
            _ => return None,
        };
        Some(set)
    }

    pub(crate) const NAMED: &'static [&'static str] = &[
        "any-value!",
        "any-number!",
        "any-scalar!",
        "any-word!",
        "any-array!",
        "any-series!",
        "any-context!",
    ];
}
