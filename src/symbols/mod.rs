//! Namespaces, symbols and the function registry.
//!
//! Function signatures are registered here by the first parsing pass, so
//! that the second pass can resolve calls to functions declared later in
//! the same file or in another file of the module. Every function is keyed
//! by its mangled name, which also serves as the link key between modules.

pub mod mangle;
pub mod namespace;
pub mod registry;
