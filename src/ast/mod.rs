/// AST (Abstract Syntax Tree) module
/// Contains the node arena and everything stored in it
///
/// Submodules:
/// - arena: The per-module node arena and tagged node references
/// - nodes: Node payloads for every statement and expression form
/// - types: Value types shared by declarations and expressions
pub mod arena;
pub mod nodes;
pub mod types;

#[cfg(test)]
mod tests;
