use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display, rc::Rc};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("let", TokenKind::Let);
        map.insert("const", TokenKind::Const);
        map.insert("fn", TokenKind::Fn);
        map.insert("return", TokenKind::Return);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("namespace", TokenKind::Namespace);
        map.insert("echo", TokenKind::Echo);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("null", TokenKind::Null);
        map.insert("as", TokenKind::As);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Integer,
    Float,
    Hex,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Dot,
    Semicolon,
    Colon,
    ColonColon,
    Comma,
    Arrow,
    At,

    PlusPlus,
    MinusMinus,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,
    Caret,

    // Reserved
    Let,
    Const,
    Fn,
    Return,
    If,
    Else,
    While,
    Namespace,
    Echo,
    True,
    False,
    Null,
    As,
}

impl TokenKind {
    /// Whether a token of this kind can end an operand, which decides if a
    /// following `-` is a binary minus or the sign of a numeric literal.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Integer
                | TokenKind::Float
                | TokenKind::Hex
                | TokenKind::String
                | TokenKind::CloseParen
                | TokenKind::CloseBracket
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    /// Tokens whose literal may name an operator in the registry.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Assignment
                | TokenKind::Equals
                | TokenKind::NotEquals
                | TokenKind::Less
                | TokenKind::LessEquals
                | TokenKind::Greater
                | TokenKind::GreaterEquals
                | TokenKind::Or
                | TokenKind::And
                | TokenKind::Plus
                | TokenKind::Dash
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Caret
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Integer | TokenKind::Float | TokenKind::Hex | TokenKind::True | TokenKind::False
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One lexical token. The literal text lives in the owning stream's
/// parallel table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
    pub column: u32,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.kind, self.line, self.column)
    }
}

/// Half-open `[start, end)` range of token indices in one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenSlice {
    pub start: u32,
    pub end: u32,
}

impl TokenSlice {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "inverted token slice {}..{}", start, end);
        TokenSlice { start, end }
    }

    pub fn single(index: u32) -> Self {
        TokenSlice::new(index, index + 1)
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: u32) -> bool {
        (self.start..self.end).contains(&index)
    }

    /// Smallest slice covering both.
    pub fn join(&self, other: TokenSlice) -> TokenSlice {
        TokenSlice::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Back-reference to a token: the stream is identified by its file index
/// inside the owning module. Never owns the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenReference {
    pub stream: usize,
    pub index: u32,
}

/// Immutable, columnar token storage for one source file.
#[derive(Debug, Clone)]
pub struct TokenStream {
    file: Rc<String>,
    tokens: Vec<Token>,
    literals: Vec<String>,
}

impl TokenStream {
    pub(crate) fn new(file: Rc<String>) -> Self {
        TokenStream {
            file,
            tokens: vec![],
            literals: vec![],
        }
    }

    pub(crate) fn push(&mut self, token: Token, literal: String) {
        self.tokens.push(token);
        self.literals.push(literal);
    }

    pub fn file(&self) -> &Rc<String> {
        &self.file
    }

    /// Number of tokens, including the trailing EOF token.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<Token> {
        self.tokens.get(index as usize).copied()
    }

    pub fn kind(&self, index: u32) -> TokenKind {
        self.get(index).map_or(TokenKind::EOF, |token| token.kind)
    }

    pub fn literal(&self, index: u32) -> &str {
        self.literals.get(index as usize).map_or("", |literal| literal.as_str())
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = (Token, &str)> {
        self.tokens
            .iter()
            .copied()
            .zip(self.literals.iter().map(|literal| literal.as_str()))
    }

    /// Every token except the trailing EOF.
    pub fn full_slice(&self) -> TokenSlice {
        let end = match self.tokens.last() {
            Some(token) if token.kind == TokenKind::EOF => self.tokens.len() - 1,
            _ => self.tokens.len(),
        };
        TokenSlice::new(0, end as u32)
    }

    pub fn slice(&self, slice: TokenSlice) -> &[Token] {
        let end = (slice.end as usize).min(self.tokens.len());
        let start = (slice.start as usize).min(end);
        &self.tokens[start..end]
    }

    /// Source text of a slice, literals joined with single spaces.
    pub fn text(&self, slice: TokenSlice) -> String {
        let end = (slice.end as usize).min(self.literals.len());
        let start = (slice.start as usize).min(end);
        self.literals[start..end].join(" ")
    }
}
