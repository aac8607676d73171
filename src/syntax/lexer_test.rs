use super::lexer::Lexer;
use super::token::{PathClass, PathPart, TokenKind};

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new(input)
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn word_classes() {
    assert_eq!(
        kinds("foo bar: :baz /only"),
        vec![
            TokenKind::Word("foo".to_string()),
            TokenKind::SetWord("bar".to_string()),
            TokenKind::GetWord("baz".to_string()),
            TokenKind::Refinement("only".to_string()),
        ]
    );
}

#[test]
fn operator_words() {
    assert_eq!(
        kinds("+ <= /: <>:"),
        vec![
            TokenKind::Word("+".to_string()),
            TokenKind::Word("<=".to_string()),
            TokenKind::SetWord("/".to_string()),
            TokenKind::SetWord("<>".to_string()),
        ]
    );
}

#[test]
fn scalars() {
    assert_eq!(
        kinds("12 -3 1.5 2x3 $1.05 -$2 _"),
        vec![
            TokenKind::Integer(12),
            TokenKind::Integer(-3),
            TokenKind::Decimal(1.5),
            TokenKind::Pair(2, 3),
            TokenKind::Money(105),
            TokenKind::Money(-200),
            TokenKind::Blank,
        ]
    );
}

#[test]
fn strings_and_tags() {
    assert_eq!(
        kinds("\"a^/b\" {x {y}} <opt>"),
        vec![
            TokenKind::Text("a\nb".to_string()),
            TokenKind::Text("x {y}".to_string()),
            TokenKind::Tag("opt".to_string()),
        ]
    );
}

#[test]
fn paths() {
    assert_eq!(
        kinds("a/b/2 o/f: :o/f"),
        vec![
            TokenKind::Path {
                parts: vec![
                    PathPart::Word("a".to_string()),
                    PathPart::Word("b".to_string()),
                    PathPart::Integer(2),
                ],
                class: PathClass::Plain,
            },
            TokenKind::Path {
                parts: vec![PathPart::Word("o".to_string()), PathPart::Word("f".to_string())],
                class: PathClass::Set,
            },
            TokenKind::Path {
                parts: vec![PathPart::Word("o".to_string()), PathPart::Word("f".to_string())],
                class: PathClass::Get,
            },
        ]
    );
}

#[test]
fn quotes_and_bad_words() {
    let tokens = Lexer::new("''x ~null~").tokenize().unwrap();
    assert_eq!(tokens[0].quotes, 2);
    assert_eq!(tokens[0].kind, TokenKind::Word("x".to_string()));
    assert_eq!(tokens[1].kind, TokenKind::BadWord("null".to_string()));
}

#[test]
fn comments_and_lines() {
    let tokens = Lexer::new("a ; ignored\n[b]").tokenize().unwrap();
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[1].kind, TokenKind::BlockOpen);
    assert_eq!(tokens[1].line, 2);
}

#[test]
fn scan_errors_carry_the_line() {
    let err = Lexer::new("ok\n\"open").tokenize().unwrap_err();
    assert_eq!(err.id(), "scan");
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn malformed_scalars_are_rejected() {
    assert!(Lexer::new("1x").tokenize().is_err());
    assert!(Lexer::new("$1.234").tokenize().is_err());
    assert!(Lexer::new("99999999999999999999").tokenize().is_err());
    assert!(Lexer::new("-$-1.00").tokenize().is_err());
    assert!(Lexer::new("$1.-5").tokenize().is_err());
}

#[test]
fn sign_after_the_dollar_applies_to_the_whole_amount() {
    assert_eq!(
        kinds("$-1.50 -$1.50 $-0.05"),
        vec![
            TokenKind::Money(-150),
            TokenKind::Money(-150),
            TokenKind::Money(-5),
        ]
    );
}
