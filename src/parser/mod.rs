//! Parser building the arena AST of a module.
//!
//! Parsing runs in two passes over already-lexed files:
//!
//! - [`symbols::collect_symbols`] registers every function signature in the
//!   module's namespace table, so calls may precede their target.
//! - [`parser::parse_file`] parses statements and function bodies,
//!   resolving variables through the scope chain and checking every
//!   expression as it is built.
//!
//! Errors are reported to the collector and never abort a file; after a
//! syntax error the parser skips to the next statement.

pub mod context;
pub mod cursor;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod symbols;
pub mod types;
