//! Fatal errors for the compiler front end.
//!
//! Only failures that leave nothing to recover into live here:
//!
//! - Lexing failures (unterminated strings, unrecognised characters)
//! - Unreadable source files
//! - Bundle linking failures and refusal to generate code
//!
//! Everything else is reported through [`crate::diagnostics`].

pub mod errors;

#[cfg(test)]
mod tests;
