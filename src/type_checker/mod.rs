//! Type checking and literal coercion.
//!
//! The parser calls into this module whenever an expression is matched
//! against an expected type:
//!
//! - `coercion.rs` - Checks and materializes literals at a target type,
//!   with exact overflow, underflow and precision rules
//! - `type_checker.rs` - Result types of operators, cast kinds and
//!   overload selection

pub mod coercion;
pub mod type_checker;

#[cfg(test)]
mod tests;
