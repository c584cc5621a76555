//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization through an ordered list of regex sub-recognizers
//! - Recognition of keywords, identifiers, literals, and operators
//! - Line/column tracking for every token
//! - Comments and whitespace handling
//!
//! Tokens are stored columnar in a [`tokens::TokenStream`]: token kinds and
//! positions in one table, literal text in a parallel one.

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
