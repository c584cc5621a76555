//! Diagnostics for the recoverable error channel.
//!
//! Syntax errors, unknown names and rejected literal conversions are not
//! fatal: they are recorded as [`issues::Issue`]s in a [`collector::Collector`]
//! and parsing carries on. The collector also owns the registries for
//! named value types and operators, since both are shared by every module
//! parsed in one session.
//!
//! - `issues.rs` - Severity, code references and the issue taxonomy
//! - `collector.rs` - The append-only issue sink and type registry
//! - `operators.rs` - Operator descriptors and the operator registry
//! - `render.rs` - Source excerpts for the driver

pub mod collector;
pub mod issues;
pub mod operators;
pub mod render;

#[cfg(test)]
mod tests;
