//! Source text scanner.
//!
//! Produces a flat token stream; nesting is resolved by the loader.

use crate::runtime::error::RenError;
use crate::syntax::token::{PathClass, PathPart, Token, TokenKind};

#[derive(Debug, Clone)]
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '[' | ']' | '(' | ')' | '"' | '{' | '}' | ';')
}

impl Lexer {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into().chars().collect(),
            position: 0,
            line: 1,
        }
    }

    /// Scans the whole input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, RenError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current()?;
        self.position += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> RenError {
        RenError::Scan {
            line: self.line,
            message: message.into(),
        }
    }

    fn skip_ignorable(&mut self) {
        while let Some(c) = self.current() {
            if c.is_whitespace() {
                self.advance();
            } else if c == ';' {
                while let Some(c) = self.current() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, RenError> {
        self.skip_ignorable();
        let Some(_) = self.current() else {
            return Ok(None);
        };

        let line = self.line;
        let mut quotes: u8 = 0;
        while self.current() == Some('\'') {
            quotes = quotes
                .checked_add(1)
                .ok_or_else(|| self.error("too many quote levels"))?;
            self.advance();
        }

        let kind = match self.current() {
            None => return Err(self.error("dangling quote at end of input")),
            Some('[') => {
                self.advance();
                TokenKind::BlockOpen
            }
            Some('(') => {
                self.advance();
                TokenKind::GroupOpen
            }
            Some(']') | Some(')') if quotes > 0 => {
                return Err(self.error("quote mark before closing delimiter"));
            }
            Some(']') => {
                self.advance();
                TokenKind::BlockClose
            }
            Some(')') => {
                self.advance();
                TokenKind::GroupClose
            }
            Some('"') => TokenKind::Text(self.read_quoted_text()?),
            Some('{') => TokenKind::Text(self.read_braced_text()?),
            Some('}') => return Err(self.error("unmatched `}`")),
            Some('<') if self.peek().is_some_and(|c| c.is_ascii_alphabetic()) => {
                TokenKind::Tag(self.read_tag()?)
            }
            Some(_) => {
                let run = self.read_run();
                self.classify(&run)?
            }
        };

        Ok(Some(Token::new(kind, quotes, line)))
    }

    fn read_run(&mut self) -> String {
        let mut run = String::new();
        while let Some(c) = self.current() {
            if is_delimiter(c) {
                break;
            }
            run.push(c);
            self.advance();
        }
        run
    }

    fn read_escape(&mut self) -> Result<char, RenError> {
        match self.advance() {
            Some('/') => Ok('\n'),
            Some('-') => Ok('\t'),
            Some('"') => Ok('"'),
            Some('^') => Ok('^'),
            Some('{') => Ok('{'),
            Some('}') => Ok('}'),
            Some(other) => Err(self.error(format!("unknown escape `^{other}`"))),
            None => Err(self.error("unterminated escape")),
        }
    }

    fn read_quoted_text(&mut self) -> Result<String, RenError> {
        self.advance(); // opening quote
        let mut text = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => return Err(self.error("unterminated string")),
                Some('"') => return Ok(text),
                Some('^') => text.push(self.read_escape()?),
                Some(c) => text.push(c),
            }
        }
    }

    fn read_braced_text(&mut self) -> Result<String, RenError> {
        self.advance(); // opening brace
        let mut depth = 1usize;
        let mut text = String::new();
        loop {
            match self.advance() {
                None => return Err(self.error("unterminated braced string")),
                Some('^') => text.push(self.read_escape()?),
                Some('{') => {
                    depth += 1;
                    text.push('{');
                }
                Some('}') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(text);
                    }
                    text.push('}');
                }
                Some(c) => text.push(c),
            }
        }
    }

    fn read_tag(&mut self) -> Result<String, RenError> {
        self.advance(); // <
        let mut tag = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => return Err(self.error("unterminated tag")),
                Some('>') => return Ok(tag),
                Some(c) => tag.push(c),
            }
        }
    }

    fn classify(&self, run: &str) -> Result<TokenKind, RenError> {
        if run == "_" {
            return Ok(TokenKind::Blank);
        }
        if run.len() >= 3 && run.starts_with('~') && run.ends_with('~') {
            let label = &run[1..run.len() - 1];
            if label.contains('~') || label.contains('/') {
                return Err(self.error(format!("malformed bad-word `{run}`")));
            }
            return Ok(TokenKind::BadWord(label.to_string()));
        }
        if run.starts_with('$') || run.starts_with("-$") {
            return self.classify_money(run);
        }
        if looks_numeric(run) {
            return self.classify_number(run);
        }
        if run == "/" || run == "//" {
            return Ok(TokenKind::Word(run.to_string()));
        }
        match run {
            "/:" | "//:" => return Ok(TokenKind::SetWord(run[..run.len() - 1].to_string())),
            ":/" | "://" => return Ok(TokenKind::GetWord(run[1..].to_string())),
            _ => {}
        }
        if let Some(rest) = run.strip_prefix('/') {
            if rest.contains('/') || rest.is_empty() {
                return Err(self.error(format!("malformed refinement `{run}`")));
            }
            return Ok(TokenKind::Refinement(rest.to_string()));
        }
        if run.contains('/') {
            return self.classify_path(run);
        }
        if run.len() > 1 {
            if let Some(name) = run.strip_suffix(':') {
                return Ok(TokenKind::SetWord(name.to_string()));
            }
            if let Some(name) = run.strip_prefix(':') {
                return Ok(TokenKind::GetWord(name.to_string()));
            }
        }
        if run == ":" {
            return Err(self.error("lone `:` is not a valid word"));
        }
        Ok(TokenKind::Word(run.to_string()))
    }

    fn classify_number(&self, run: &str) -> Result<TokenKind, RenError> {
        if let Some((x, y)) = run.split_once('x') {
            let x = x.parse::<i64>();
            let y = y.parse::<i64>();
            return match (x, y) {
                (Ok(x), Ok(y)) => Ok(TokenKind::Pair(x, y)),
                _ => Err(self.error(format!("malformed pair `{run}`"))),
            };
        }
        if run.contains('.') || run.contains('e') || run.contains('E') {
            return run
                .parse::<f64>()
                .map(TokenKind::Decimal)
                .map_err(|_| self.error(format!("malformed decimal `{run}`")));
        }
        run.parse::<i64>()
            .map(TokenKind::Integer)
            .map_err(|_| self.error(format!("malformed or out-of-range integer `{run}`")))
    }

    fn classify_money(&self, run: &str) -> Result<TokenKind, RenError> {
        let bad = || self.error(format!("malformed money `{run}`"));
        let (outer, body) = match run.strip_prefix('-') {
            Some(rest) => (true, &rest[1..]),
            None => (false, &run[1..]),
        };
        // `$-1.50` is the same amount as `-$1.50`
        let (inner, digits) = match body.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, body),
        };
        if outer && inner {
            return Err(bad());
        }
        let negative = outer || inner;
        let all_digits = |text: &str| text.bytes().all(|b| b.is_ascii_digit());
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() || fraction.len() > 2 || !all_digits(whole) || !all_digits(fraction) {
            return Err(bad());
        }
        let whole: i64 = whole.parse().map_err(|_| bad())?;
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| bad())? * 10,
            _ => fraction.parse::<i64>().map_err(|_| bad())?,
        };
        let amount = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(cents))
            .ok_or_else(bad)?;
        Ok(TokenKind::Money(if negative { -amount } else { amount }))
    }

    fn classify_path(&self, run: &str) -> Result<TokenKind, RenError> {
        let (class, body) = if let Some(body) = run.strip_suffix(':') {
            (PathClass::Set, body)
        } else if let Some(body) = run.strip_prefix(':') {
            (PathClass::Get, body)
        } else {
            (PathClass::Plain, run)
        };
        let mut parts = Vec::new();
        for piece in body.split('/') {
            if piece.is_empty() {
                return Err(self.error(format!("malformed path `{run}`")));
            }
            match piece.parse::<i64>() {
                Ok(n) => parts.push(PathPart::Integer(n)),
                Err(_) => parts.push(PathPart::Word(piece.to_string())),
            }
        }
        Ok(TokenKind::Path { parts, class })
    }
}

fn looks_numeric(run: &str) -> bool {
    let mut chars = run.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('+') | Some('-') | Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}
