use std::fmt;

/// One element of a scanned path such as `obj/field/2`.
#[derive(Debug, Clone, PartialEq)]
pub enum PathPart {
    Word(String),
    Integer(i64),
}

/// Whether a path is plain (`a/b`), a set-path (`a/b:`) or a get-path (`:a/b`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Plain,
    Set,
    Get,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Integer(i64),
    Decimal(f64),
    Pair(i64, i64),
    /// Amount in hundredths.
    Money(i64),
    Text(String),
    Tag(String),
    Word(String),
    SetWord(String),
    GetWord(String),
    Refinement(String),
    Path { parts: Vec<PathPart>, class: PathClass },
    BadWord(String),
    Blank,
    BlockOpen,
    BlockClose,
    GroupOpen,
    GroupClose,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Number of leading apostrophes (quote level).
    pub quotes: u8,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, quotes: u8, line: usize) -> Self {
        Self { kind, quotes, line }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({:?}, quotes={}, line={})", self.kind, self.quotes, self.line)
    }
}
