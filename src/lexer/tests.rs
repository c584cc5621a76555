//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (integers, floats, hex, signs)
//! - String literals with escape sequences
//! - Operators and punctuation
//! - Comments and positions
//! - Error cases

use std::rc::Rc;

use crate::errors::errors::ErrorImpl;

use super::{
    lexer::tokenize,
    tokens::{TokenKind, TokenSlice, TokenStream},
};

fn lex(source: &str) -> TokenStream {
    tokenize(source, Rc::new("test.lang".to_string())).unwrap()
}

fn kinds(stream: &TokenStream) -> Vec<TokenKind> {
    stream.tokens().iter().map(|token| token.kind).collect()
}

#[test]
fn test_tokenize_keywords() {
    let tokens = lex("let const fn return if else while namespace echo true false null as");

    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Let,
            TokenKind::Const,
            TokenKind::Fn,
            TokenKind::Return,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::Namespace,
            TokenKind::Echo,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            TokenKind::As,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = lex("foo bar baz_123 _underscore CamelCase");

    assert_eq!(tokens.kind(0), TokenKind::Identifier);
    assert_eq!(tokens.literal(0), "foo");
    assert_eq!(tokens.literal(2), "baz_123");
    assert_eq!(tokens.literal(3), "_underscore");
    assert_eq!(tokens.literal(4), "CamelCase");
    assert_eq!(tokens.kind(5), TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let tokens = lex("42 3.14 3.14f .5 7. 0");

    assert_eq!(tokens.kind(0), TokenKind::Integer);
    assert_eq!(tokens.literal(0), "42");
    assert_eq!(tokens.kind(1), TokenKind::Float);
    assert_eq!(tokens.literal(1), "3.14");
    assert_eq!(tokens.kind(2), TokenKind::Float);
    assert_eq!(tokens.literal(2), "3.14f");
    assert_eq!(tokens.kind(3), TokenKind::Float);
    assert_eq!(tokens.literal(3), ".5");
    assert_eq!(tokens.kind(4), TokenKind::Float);
    assert_eq!(tokens.kind(5), TokenKind::Integer);
}

#[test]
fn test_tokenize_hex() {
    let tokens = lex("0xFF 0x1aB2");

    assert_eq!(tokens.kind(0), TokenKind::Hex);
    assert_eq!(tokens.literal(0), "0xFF");
    assert_eq!(tokens.kind(1), TokenKind::Hex);
    assert_eq!(tokens.literal(1), "0x1aB2");
}

#[test]
fn test_negative_literal_after_operator() {
    let tokens = lex("x = -42;");

    assert_eq!(tokens.kind(2), TokenKind::Integer);
    assert_eq!(tokens.literal(2), "-42");
}

#[test]
fn test_negative_hex_literal() {
    let tokens = lex("x = -0x10; y -0x1");

    assert_eq!(tokens.kind(2), TokenKind::Hex);
    assert_eq!(tokens.literal(2), "-0x10");
    assert_eq!(tokens.kind(3), TokenKind::Semicolon);
    assert_eq!(tokens.kind(5), TokenKind::Dash);
    assert_eq!(tokens.kind(6), TokenKind::Hex);
    assert_eq!(tokens.literal(6), "0x1");
}

#[test]
fn test_minus_after_operand_is_subtraction() {
    let tokens = lex("x -1");

    assert_eq!(
        kinds(&tokens),
        vec![TokenKind::Identifier, TokenKind::Dash, TokenKind::Integer, TokenKind::EOF]
    );
    assert_eq!(tokens.literal(2), "1");
}

#[test]
fn test_tokenize_strings() {
    let tokens = lex(r#""hello" 'world' "multiple words""#);

    assert_eq!(tokens.kind(0), TokenKind::String);
    assert_eq!(tokens.literal(0), "hello");
    assert_eq!(tokens.literal(1), "world");
    assert_eq!(tokens.literal(2), "multiple words");
    assert_eq!(tokens.kind(3), TokenKind::EOF);
}

#[test]
fn test_tokenize_escaped_quote_in_string() {
    let tokens = lex(r#""quote\"test" 'it\'s'"#);

    assert_eq!(tokens.literal(0), "quote\"test");
    assert_eq!(tokens.literal(1), "it's");
}

#[test]
fn test_tokenize_string_escapes() {
    let tokens = lex(r#""a\nb" "tab\there" "back\\slash""#);

    assert_eq!(tokens.literal(0), "a\nb");
    assert_eq!(tokens.literal(1), "tab\there");
    assert_eq!(tokens.literal(2), "back\\slash");
}

#[test]
fn test_unterminated_string() {
    let result = tokenize("let s = \"never closed", Rc::new("test.lang".to_string()));
    let error = result.unwrap_err();

    assert_eq!(error.get_error_name(), "UnterminatedString");
    assert_eq!(error.get_position().line, 1);
    assert_eq!(error.get_position().column, 9);
    match error.get_impl() {
        ErrorImpl::UnterminatedString { snippet } => assert!(snippet.starts_with("\"never")),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_escaped_quote_does_not_terminate() {
    let result = tokenize(r#""ends with escape\""#, Rc::new("test.lang".to_string()));

    assert!(result.is_err());
}

#[test]
fn test_tokenize_operators() {
    let tokens = lex("= || && == != < > >= <= + - * / % ^ ++ -- !");

    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Assignment,
            TokenKind::Or,
            TokenKind::And,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::LessEquals,
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Caret,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::Not,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    let tokens = lex("( ) { } [ ] . , ; : :: -> @");

    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Dot,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::ColonColon,
            TokenKind::Arrow,
            TokenKind::At,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let tokens = lex("let x = 5; // trailing comment\nlet y = 10;");

    assert_eq!(tokens.kind(4), TokenKind::Semicolon);
    assert_eq!(tokens.kind(5), TokenKind::Let);
    assert_eq!(tokens.literal(6), "y");
}

#[test]
fn test_token_positions() {
    let tokens = lex("let x = 1;\n  x++;");

    let let_token = tokens.get(0).unwrap();
    assert_eq!((let_token.line, let_token.column), (1, 1));

    let number = tokens.get(3).unwrap();
    assert_eq!((number.line, number.column), (1, 9));

    let second_x = tokens.get(5).unwrap();
    assert_eq!((second_x.line, second_x.column), (2, 3));
}

#[test]
fn test_tokenize_unknown_token() {
    let result = tokenize("let x = #;", Rc::new("test.lang".to_string()));
    let error = result.unwrap_err();

    assert_eq!(error.get_error_name(), "UnknownToken");
    assert_eq!(error.get_position().column, 9);
}

#[test]
fn test_full_slice_excludes_eof() {
    let tokens = lex("let x = 42;");

    assert_eq!(tokens.len(), 6);
    assert_eq!(tokens.full_slice(), TokenSlice::new(0, 5));
    assert_eq!(tokens.text(TokenSlice::new(0, 2)), "let x");
}

#[test]
fn test_tokenize_function_declaration() {
    let tokens = lex("fn add(a: int32, b: int32) -> int32 { return a + b; }");

    assert_eq!(tokens.kind(0), TokenKind::Fn);
    assert_eq!(tokens.literal(1), "add");
    assert_eq!(tokens.kind(2), TokenKind::OpenParen);
    assert_eq!(tokens.kind(4), TokenKind::Colon);
    assert_eq!(tokens.kind(10), TokenKind::CloseParen);
    assert_eq!(tokens.kind(11), TokenKind::Arrow);
}

#[test]
fn test_tokenize_empty_source() {
    let tokens = lex("   \n\t ");

    assert_eq!(kinds(&tokens), vec![TokenKind::EOF]);
    assert!(tokens.full_slice().is_empty());
}
