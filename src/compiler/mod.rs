//! Compilation driver.
//!
//! [`module`] turns source files into a parsed [`module::Module`];
//! [`compiler`] links modules into a bundle and hands it to a code
//! generator.

pub mod compiler;
pub mod module;
