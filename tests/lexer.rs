//! Tests for the lexer
//!
//! These tests verify that the lexer correctly tokenizes JavaScript source.

#![allow(clippy::unwrap_used, clippy::panic)]

use jsparse::lexer::{Lexer, NumericValue, TokenKind};
use jsparse::ErrorKind;

fn lex(source: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(source);
    let mut tokens = vec![];
    loop {
        let token = lexer.next_token().unwrap();
        if token.kind == TokenKind::Eof {
            break;
        }
        tokens.push(token.kind);
    }
    tokens
}

fn lex_err(source: &str) -> ErrorKind {
    let mut lexer = Lexer::new(source);
    loop {
        match lexer.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => panic!("expected a lexical error"),
            Ok(_) => continue,
            Err(err) => return err.kind,
        }
    }
}

fn number(value: NumericValue, raw: &str) -> TokenKind {
    TokenKind::Number {
        value,
        raw: raw.to_string(),
    }
}

#[test]
fn test_numbers() {
    assert_eq!(lex("42"), vec![number(NumericValue::Integer(42), "42")]);
    assert_eq!(lex("3.14"), vec![number(NumericValue::Float(3.14), "3.14")]);
    assert_eq!(lex("1e3"), vec![number(NumericValue::Float(1e3), "1e3")]);
    assert_eq!(lex("0xff"), vec![number(NumericValue::Integer(255), "0xff")]);
    assert_eq!(
        lex("0b1010"),
        vec![number(NumericValue::Integer(10), "0b1010")]
    );
    assert_eq!(lex("0o17"), vec![number(NumericValue::Integer(15), "0o17")]);
}

#[test]
fn test_numeric_separators() {
    assert_eq!(
        lex("1_000_000"),
        vec![number(NumericValue::Integer(1_000_000), "1_000_000")]
    );
    assert_eq!(
        lex("0xff_ff"),
        vec![number(NumericValue::Integer(0xffff), "0xff_ff")]
    );
}

#[test]
fn test_number_with_trailing_dot_member() {
    // `1..toString()` keeps the first dot in the number
    assert_eq!(
        lex("1..toString()"),
        vec![
            number(NumericValue::Float(1.0), "1."),
            TokenKind::Dot,
            TokenKind::Identifier("toString".to_string()),
            TokenKind::LParen,
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_strings_and_escapes() {
    assert_eq!(
        lex(r#""hello""#),
        vec![TokenKind::String("hello".to_string())]
    );
    assert_eq!(
        lex(r#"'a\nb'"#),
        vec![TokenKind::String("a\nb".to_string())]
    );
    assert_eq!(
        lex(r#""A\u{1F600}""#),
        vec![TokenKind::String("A\u{1F600}".to_string())]
    );
}

#[test]
fn test_unterminated_string_is_fatal() {
    assert_eq!(lex_err("\"abc"), ErrorKind::UnterminatedString);
    assert_eq!(lex_err("'abc\ndef'"), ErrorKind::UnterminatedString);
}

#[test]
fn test_invalid_escape_is_fatal() {
    assert_eq!(lex_err(r#""\u{}""#), ErrorKind::InvalidEscape);
    assert_eq!(lex_err(r#""\uZZ00""#), ErrorKind::InvalidEscape);
}

#[test]
fn test_keywords_and_identifiers() {
    assert_eq!(
        lex("let of await"),
        vec![TokenKind::Let, TokenKind::Of, TokenKind::Await]
    );
    assert_eq!(
        lex("letter"),
        vec![TokenKind::Identifier("letter".to_string())]
    );
}

#[test]
fn test_unicode_identifiers() {
    assert_eq!(
        lex("\u{3b1}\u{3b2}"),
        vec![TokenKind::Identifier("\u{3b1}\u{3b2}".to_string())]
    );
    assert_eq!(lex("$_a1"), vec![TokenKind::Identifier("$_a1".to_string())]);
}

#[test]
fn test_multi_char_operators() {
    assert_eq!(
        lex(">>>= ?? ?. => ... **="),
        vec![
            TokenKind::GtGtGtEq,
            TokenKind::QuestionQuestion,
            TokenKind::QuestionDot,
            TokenKind::Arrow,
            TokenKind::DotDotDot,
            TokenKind::StarStarEq,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        lex("a // line\n/* block\nmore */ b"),
        vec![
            TokenKind::Identifier("a".to_string()),
            TokenKind::Identifier("b".to_string()),
        ]
    );
    assert_eq!(lex_err("/* open"), ErrorKind::UnterminatedComment);
}

#[test]
fn test_newline_before_flag() {
    let mut lexer = Lexer::new("a\nb c");
    let a = lexer.next_token().unwrap();
    let b = lexer.next_token().unwrap();
    let c = lexer.next_token().unwrap();
    assert!(!a.newline_before);
    assert!(b.newline_before);
    assert!(!c.newline_before);
}

#[test]
fn test_spans_track_lines_and_columns() {
    let mut lexer = Lexer::new("a\n  b");
    let a = lexer.next_token().unwrap();
    let b = lexer.next_token().unwrap();
    assert_eq!((a.span.line, a.span.column), (1, 1));
    assert_eq!((b.span.line, b.span.column), (2, 3));
}

#[test]
fn test_template_tokens() {
    // After a head the `}` closing the substitution must be rescanned
    // as the next template piece, the way the parser drives it.
    let mut lexer = Lexer::new("`a${x}b`");
    let head = lexer.next_token().unwrap();
    assert!(matches!(&head.kind, TokenKind::TemplateHead(chunk) if chunk.raw == "a"));
    let x = lexer.next_token().unwrap();
    assert!(matches!(&x.kind, TokenKind::Identifier(name) if name == "x"));
    let rbrace = lexer.next_token().unwrap();
    assert_eq!(rbrace.kind, TokenKind::RBrace);
    let tail = lexer.rescan_template_continuation(rbrace.span).unwrap();
    assert!(matches!(&tail.kind, TokenKind::TemplateTail(chunk) if chunk.raw == "b"));
    let eof = lexer.next_token().unwrap();
    assert_eq!(eof.kind, TokenKind::Eof);
}

#[test]
fn test_regex_rescan() {
    let mut lexer = Lexer::new("/ab+c/gi");
    let slash = lexer.next_token().unwrap();
    assert_eq!(slash.kind, TokenKind::Slash);
    let regex = lexer.rescan_as_regex(slash.span).unwrap();
    let TokenKind::RegExp { pattern, flags } = regex.kind else {
        panic!("expected regex token");
    };
    assert_eq!(pattern, "ab+c");
    assert_eq!(flags, "gi");
}

#[test]
fn test_regex_with_class_and_escape() {
    let mut lexer = Lexer::new(r"/a\/[/]b/u");
    let slash = lexer.next_token().unwrap();
    let regex = lexer.rescan_as_regex(slash.span).unwrap();
    let TokenKind::RegExp { pattern, flags } = regex.kind else {
        panic!("expected regex token");
    };
    assert_eq!(pattern, r"a\/[/]b");
    assert_eq!(flags, "u");
}

#[test]
fn test_checkpoint_restore() {
    let mut lexer = Lexer::new("a b c");
    let _a = lexer.next_token().unwrap();
    let checkpoint = lexer.checkpoint();
    let b1 = lexer.next_token().unwrap();
    lexer.restore(checkpoint);
    let b2 = lexer.next_token().unwrap();
    assert_eq!(b1.kind, b2.kind);
    assert_eq!(b1.span, b2.span);
}
