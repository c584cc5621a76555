#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc};

pub mod ast;
pub mod compiler;
pub mod diagnostics;
pub mod errors;
pub mod lexer;
pub mod logger;
pub mod macros;
pub mod parser;
pub mod symbols;
pub mod type_checker;

extern crate regex;

/// A line/column location inside one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(line: u32, column: u32, file: Rc<String>) -> Self {
        Position { line, column, file }
    }

    pub fn null() -> Self {
        Position::new(0, 0, Rc::new(String::from("<null>")))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
