//! Builds unbound cells from scanned tokens.

use crate::runtime::{
    error::RenError,
    value::{ArrayClass, ArrayRef, Cell, Word, WordClass},
};
use crate::syntax::{
    interner::Interner,
    lexer::Lexer,
    token::{PathClass, PathPart, Token, TokenKind},
};

/// Scans and loads `source` into a sequence of unbound cells.
pub fn load(source: &str, interner: &mut Interner) -> Result<Vec<Cell>, RenError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut loader = Loader {
        tokens,
        pos: 0,
        interner,
    };
    let cells = loader.sequence(None)?;
    Ok(cells)
}

struct Loader<'a> {
    tokens: Vec<Token>,
    pos: usize,
    interner: &'a mut Interner,
}

impl Loader<'_> {
    /// Reads cells until `close` (or end of input when `close` is `None`).
    fn sequence(&mut self, close: Option<(&TokenKind, usize)>) -> Result<Vec<Cell>, RenError> {
        let mut cells = Vec::new();
        loop {
            let Some(token) = self.tokens.get(self.pos).cloned() else {
                return match close {
                    None => Ok(cells),
                    Some((_, line)) => Err(RenError::Scan {
                        line,
                        message: "missing closing bracket".to_string(),
                    }),
                };
            };
            self.pos += 1;
            match (&token.kind, close) {
                (TokenKind::BlockClose | TokenKind::GroupClose, Some((expected, _)))
                    if token.kind == *expected =>
                {
                    if token.quotes > 0 {
                        return Err(scan_error(&token, "quote before closing bracket"));
                    }
                    return Ok(cells);
                }
                (TokenKind::BlockClose | TokenKind::GroupClose, _) => {
                    return Err(scan_error(&token, "unexpected closing bracket"));
                }
                _ => {}
            }
            let cell = self.cell(&token)?;
            cells.push(cell.quoted(token.quotes));
        }
    }

    fn word(&mut self, name: &str) -> Word {
        let spelling = self.interner.intern(name);
        Word::unbound(spelling, self.interner.canon(spelling))
    }

    fn cell(&mut self, token: &Token) -> Result<Cell, RenError> {
        let cell = match &token.kind {
            TokenKind::Integer(value) => Cell::integer(*value),
            TokenKind::Decimal(value) => Cell::decimal(*value),
            TokenKind::Pair(x, y) => Cell::pair(*x, *y),
            TokenKind::Money(amount) => Cell::money(*amount),
            TokenKind::Text(text) => Cell::text(text.clone()),
            TokenKind::Tag(tag) => Cell::tag(tag),
            TokenKind::Blank => Cell::blank(),
            TokenKind::BadWord(label) => Cell::bad_word(self.interner.intern(label)),
            TokenKind::Word(name) => Cell::word(WordClass::Word, self.word(name)),
            TokenKind::SetWord(name) => Cell::word(WordClass::Set, self.word(name)),
            TokenKind::GetWord(name) => Cell::word(WordClass::Get, self.word(name)),
            TokenKind::Refinement(name) => Cell::word(WordClass::Refinement, self.word(name)),
            TokenKind::Path { parts, class } => {
                let cells = parts
                    .iter()
                    .map(|part| match part {
                        PathPart::Word(name) => Cell::word(WordClass::Word, self.word(name)),
                        PathPart::Integer(n) => Cell::integer(*n),
                    })
                    .collect();
                let class = match class {
                    PathClass::Plain => ArrayClass::Path,
                    PathClass::Set => ArrayClass::SetPath,
                    PathClass::Get => ArrayClass::GetPath,
                };
                Cell::array(class, ArrayRef::new(cells))
            }
            TokenKind::BlockOpen => {
                let cells = self.sequence(Some((&TokenKind::BlockClose, token.line)))?;
                Cell::array(ArrayClass::Block, ArrayRef::new(cells))
            }
            TokenKind::GroupOpen => {
                let cells = self.sequence(Some((&TokenKind::GroupClose, token.line)))?;
                Cell::array(ArrayClass::Group, ArrayRef::new(cells))
            }
            TokenKind::BlockClose | TokenKind::GroupClose => {
                return Err(scan_error(token, "unexpected closing bracket"));
            }
        };
        Ok(cell)
    }
}

fn scan_error(token: &Token, message: &str) -> RenError {
    RenError::Scan {
        line: token.line,
        message: message.to_string(),
    }
}
