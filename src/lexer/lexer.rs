use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, MK_RECOGNIZER,
};

use super::tokens::{Token, TokenKind, TokenStream, RESERVED_LOOKUP};

/// Custom recognizer body; receives the text matched by the recognizer's
/// regex and is responsible for advancing the lexer.
pub type Handler = fn(&mut Lexer, &str) -> Result<(), Error>;

pub enum Action {
    Skip,
    Emit(TokenKind),
    Handle(Handler),
}

pub struct Recognizer {
    regex: Regex,
    action: Action,
}

lazy_static! {
    /// Sub-recognizers in priority order; the first match at the cursor wins.
    static ref RECOGNIZERS: Vec<Recognizer> = vec![
        MK_RECOGNIZER!("\\s+", Action::Skip),
        MK_RECOGNIZER!("//[^\\n]*", Action::Skip),
        MK_RECOGNIZER!("[\"']", Action::Handle(string_handler)),
        MK_RECOGNIZER!("-?0[xX][0-9a-fA-F]+|-?(?:[0-9]+\\.[0-9]*|\\.[0-9]+)f?|-?[0-9]+", Action::Handle(number_handler)),
        MK_RECOGNIZER!("[a-zA-Z_][a-zA-Z0-9_]*", Action::Handle(symbol_handler)),
        MK_RECOGNIZER!("::" => TokenKind::ColonColon),
        MK_RECOGNIZER!("->" => TokenKind::Arrow),
        MK_RECOGNIZER!("==" => TokenKind::Equals),
        MK_RECOGNIZER!("!=" => TokenKind::NotEquals),
        MK_RECOGNIZER!("<=" => TokenKind::LessEquals),
        MK_RECOGNIZER!(">=" => TokenKind::GreaterEquals),
        MK_RECOGNIZER!("\\|\\|" => TokenKind::Or),
        MK_RECOGNIZER!("&&" => TokenKind::And),
        MK_RECOGNIZER!("\\+\\+" => TokenKind::PlusPlus),
        MK_RECOGNIZER!("--" => TokenKind::MinusMinus),
        MK_RECOGNIZER!("=" => TokenKind::Assignment),
        MK_RECOGNIZER!("!" => TokenKind::Not),
        MK_RECOGNIZER!("<" => TokenKind::Less),
        MK_RECOGNIZER!(">" => TokenKind::Greater),
        MK_RECOGNIZER!("\\+" => TokenKind::Plus),
        MK_RECOGNIZER!("-" => TokenKind::Dash),
        MK_RECOGNIZER!("\\*" => TokenKind::Star),
        MK_RECOGNIZER!("/" => TokenKind::Slash),
        MK_RECOGNIZER!("%" => TokenKind::Percent),
        MK_RECOGNIZER!("\\^" => TokenKind::Caret),
        MK_RECOGNIZER!("\\(" => TokenKind::OpenParen),
        MK_RECOGNIZER!("\\)" => TokenKind::CloseParen),
        MK_RECOGNIZER!("\\{" => TokenKind::OpenCurly),
        MK_RECOGNIZER!("\\}" => TokenKind::CloseCurly),
        MK_RECOGNIZER!("\\[" => TokenKind::OpenBracket),
        MK_RECOGNIZER!("\\]" => TokenKind::CloseBracket),
        MK_RECOGNIZER!("\\." => TokenKind::Dot),
        MK_RECOGNIZER!(";" => TokenKind::Semicolon),
        MK_RECOGNIZER!(":" => TokenKind::Colon),
        MK_RECOGNIZER!("," => TokenKind::Comma),
        MK_RECOGNIZER!("@" => TokenKind::At),
    ];
}

/// Longest snippet of source carried by an `UnterminatedString` error.
const SNIPPET_LENGTH: usize = 24;

pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    line: u32,
    column: u32,
    stream: TokenStream,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, file: Rc<String>) -> Lexer<'src> {
        Lexer {
            source,
            pos: 0,
            line: 1,
            column: 1,
            stream: TokenStream::new(file),
        }
    }

    /// Advances `n` bytes, keeping line and column in step.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        for ch in self.source[self.pos..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    pub fn push(&mut self, kind: TokenKind, literal: String) {
        self.push_at(kind, literal, self.line, self.column);
    }

    fn push_at(&mut self, kind: TokenKind, literal: String, line: u32, column: u32) {
        self.stream.push(Token { kind, line, column }, literal);
    }

    pub fn remainder(&self) -> &'src str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column, Rc::clone(self.stream.file()))
    }

    fn last_kind(&self) -> Option<TokenKind> {
        self.stream.tokens().last().map(|token| token.kind)
    }
}

fn number_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    // `a -1` is a subtraction, `a = -1` a negative literal.
    if matched.starts_with('-') && lexer.last_kind().is_some_and(|kind| kind.ends_operand()) {
        lexer.push(TokenKind::Dash, String::from("-"));
        lexer.advance_n(1);
        return Ok(());
    }

    let kind = if matched.contains(|c: char| c == 'x' || c == 'X') {
        TokenKind::Hex
    } else if matched.contains('.') {
        TokenKind::Float
    } else {
        TokenKind::Integer
    };

    lexer.push(kind, matched.to_string());
    lexer.advance_n(matched.len());
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push(kind, matched.to_string());
    lexer.advance_n(matched.len());
    Ok(())
}

fn string_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    let start = lexer.position();
    let (line, column) = (lexer.line, lexer.column);
    let rest = lexer.remainder();
    let quote = matched.chars().next().unwrap_or('"');

    let mut result = String::new();
    let mut chars = rest.char_indices().skip(1);
    let mut consumed = None;

    while let Some((index, ch)) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some((_, 'n')) => result.push('\n'),
                Some((_, 't')) => result.push('\t'),
                Some((_, 'r')) => result.push('\r'),
                Some((_, '0')) => result.push('\0'),
                Some((_, escaped)) => result.push(escaped),
                None => break,
            }
        } else if ch == quote {
            consumed = Some(index + ch.len_utf8());
            break;
        } else {
            result.push(ch);
        }
    }

    let Some(consumed) = consumed else {
        let snippet = rest.chars().take(SNIPPET_LENGTH).collect::<String>();
        return Err(Error::new(ErrorImpl::UnterminatedString { snippet }, start));
    };

    lexer.push_at(TokenKind::String, result, line, column);
    lexer.advance_n(consumed);
    Ok(())
}

/// Turns raw source text into a token stream terminated by an EOF token.
///
/// Fails on the first character no recognizer accepts, or on a string
/// literal that runs into the end of input.
pub fn tokenize(source: &str, file: Rc<String>) -> Result<TokenStream, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let rest = lex.remainder();
        let recognized = RECOGNIZERS
            .iter()
            .find_map(|recognizer| recognizer.regex.find(rest).map(|m| (recognizer, m.as_str())));

        let Some((recognizer, matched)) = recognized else {
            let token = rest.chars().next().map(String::from).unwrap_or_default();
            return Err(Error::new(ErrorImpl::UnknownToken { token }, lex.position()));
        };

        match &recognizer.action {
            Action::Skip => lex.advance_n(matched.len()),
            Action::Emit(kind) => {
                lex.push(*kind, matched.to_string());
                lex.advance_n(matched.len());
            }
            Action::Handle(handler) => handler(&mut lex, matched)?,
        }
    }

    lex.push(TokenKind::EOF, String::from("EOF"));
    trace!(file = %lex.stream.file(), tokens = lex.stream.len(), "tokenized");
    Ok(lex.stream)
}
