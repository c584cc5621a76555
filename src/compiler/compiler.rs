//! Bundle linking and the code generation hand-off.
//!
//! A bundle is every module compiled together. Before any code is
//! generated the bundle is linked: each mangled name must resolve to
//! exactly one function body, unless the function is declared `@extern`
//! and provided from outside.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::{
    ast::{arena::NodeRef, nodes::FunctionDeclNode},
    diagnostics::{collector::Collector, issues::Severity},
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::module::Module;

/// Attribute marking a bodiless declaration as provided at link time.
pub const EXTERN_ATTRIBUTE: &str = "extern";

/// Back end consuming a linked bundle.
pub trait CodeGenerator {
    fn generate(&mut self, bundle: &Bundle) -> Result<(), Error>;
}

/// Where a mangled name is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTarget {
    /// Index into the bundle's modules.
    pub module: usize,
    pub decl: NodeRef<FunctionDeclNode>,
}

/// Modules linked together, ready for code generation.
#[derive(Debug)]
pub struct Bundle<'m> {
    pub modules: &'m [Module],
    /// Definition of every function that has a body, by mangled name.
    pub link_table: IndexMap<String, LinkTarget>,
    /// `@extern` declarations left for the platform linker.
    pub externals: Vec<String>,
}

impl<'m> Bundle<'m> {
    pub fn resolve(&self, mangled_name: &str) -> Option<(&'m Module, &'m FunctionDeclNode)> {
        let target = self.link_table.get(mangled_name)?;
        let module = &self.modules[target.module];
        Some((module, module.arena.get(target.decl)))
    }
}

fn is_extern(module: &Module, decl: &FunctionDeclNode) -> bool {
    decl.attributes
        .iter()
        .any(|attribute| module.arena.get(*attribute).name == EXTERN_ATTRIBUTE)
}

/// Links `modules` into a bundle.
///
/// # Returns
///
/// `DuplicateDefinition` when two modules define the same mangled name,
/// `UnresolvedExternal` for a bodiless declaration nobody defines that is
/// not marked `@extern`.
pub fn link_bundle(modules: &[Module]) -> Result<Bundle<'_>, Error> {
    let mut link_table = IndexMap::new();

    for (index, module) in modules.iter().enumerate() {
        for (mangled_name, decl_ref) in module.functions.iter() {
            let decl = module.arena.get(decl_ref);
            if !decl.is_definition() {
                continue;
            }

            let target = LinkTarget {
                module: index,
                decl: decl_ref,
            };
            if link_table.insert(mangled_name.to_string(), target).is_some() {
                return Err(Error::new(
                    ErrorImpl::DuplicateDefinition {
                        function: mangled_name.to_string(),
                    },
                    decl.code_ref.position(),
                ));
            }
        }
    }

    let mut externals = vec![];
    for module in modules {
        for (mangled_name, decl_ref) in module.functions.iter() {
            let decl = module.arena.get(decl_ref);
            if decl.is_definition() || link_table.contains_key(mangled_name) {
                continue;
            }
            if !is_extern(module, decl) {
                return Err(Error::new(
                    ErrorImpl::UnresolvedExternal {
                        function: mangled_name.to_string(),
                    },
                    decl.code_ref.position(),
                ));
            }
            if !externals.iter().any(|external| external == mangled_name) {
                debug!(function = %mangled_name, "left for the platform linker");
                externals.push(mangled_name.to_string());
            }
        }
    }

    Ok(Bundle {
        modules,
        link_table,
        externals,
    })
}

/// Links `modules` and hands the bundle to `generator`.
///
/// Nothing is linked while `collector` holds a critical issue; the call
/// fails with `CriticalIssues` instead.
pub fn compile_bundle(
    modules: &[Module],
    collector: &Collector,
    generator: &mut impl CodeGenerator,
) -> Result<(), Error> {
    if collector.has_critical_issues() {
        return Err(Error::new(
            ErrorImpl::CriticalIssues {
                count: collector.count(Severity::Error),
            },
            Position::null(),
        ));
    }

    let bundle = link_bundle(modules)?;
    info!(
        modules = modules.len(),
        functions = bundle.link_table.len(),
        externals = bundle.externals.len(),
        "linked bundle"
    );

    generator.generate(&bundle)
}
