use indexmap::IndexMap;

use crate::ast::{arena::NodeRef, nodes::FunctionDeclNode};

/// Every function of a module by mangled name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: IndexMap<String, NodeRef<FunctionDeclNode>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the mangled name is already registered; the first
    /// registration is kept.
    pub fn register(&mut self, mangled_name: &str, decl: NodeRef<FunctionDeclNode>) -> bool {
        if self.functions.contains_key(mangled_name) {
            return false;
        }
        self.functions.insert(mangled_name.to_string(), decl);
        true
    }

    pub fn get(&self, mangled_name: &str) -> Option<NodeRef<FunctionDeclNode>> {
        self.functions.get(mangled_name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeRef<FunctionDeclNode>)> {
        self.functions.iter().map(|(name, decl)| (name.as_str(), *decl))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
