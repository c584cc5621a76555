use indexmap::IndexMap;

use crate::ast::{arena::NodeRef, nodes::FunctionDeclNode};

/// Index of a namespace inside its [`NamespaceTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamespaceId(u32);

impl NamespaceId {
    pub const ROOT: NamespaceId = NamespaceId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Function,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub kind: SymbolKind,
    /// Bare name as written at the declaration.
    pub name: String,
    pub mangled_name: String,
    pub decl: NodeRef<FunctionDeclNode>,
}

#[derive(Debug, Clone)]
pub struct Namespace {
    pub name: String,
    pub parent: Option<NamespaceId>,
    children: IndexMap<String, NamespaceId>,
    /// Keyed by mangled name, so overloads sit side by side.
    symbols: IndexMap<String, Symbol>,
}

impl Namespace {
    fn new(name: &str, parent: Option<NamespaceId>) -> Self {
        Namespace {
            name: name.to_string(),
            parent,
            children: IndexMap::new(),
            symbols: IndexMap::new(),
        }
    }

    pub fn child(&self, name: &str) -> Option<NamespaceId> {
        self.children.get(name).copied()
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, NamespaceId)> {
        self.children.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn symbol(&self, mangled_name: &str) -> Option<&Symbol> {
        self.symbols.get(mangled_name)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    /// Every overload declared here under `name`, in declaration order.
    pub fn functions_named<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Symbol> + 'n
    where
        'a: 'n,
    {
        self.symbols
            .values()
            .filter(move |symbol| symbol.kind == SymbolKind::Function && symbol.name == name)
    }
}

/// The namespace tree of one module. Entries are only ever added; an
/// existing child or symbol is never replaced.
#[derive(Debug, Clone)]
pub struct NamespaceTable {
    namespaces: Vec<Namespace>,
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTable {
    pub fn new() -> Self {
        NamespaceTable {
            namespaces: vec![Namespace::new("", None)],
        }
    }

    pub fn root(&self) -> NamespaceId {
        NamespaceId::ROOT
    }

    pub fn get(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.index()]
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    pub fn get_or_create_child(&mut self, parent: NamespaceId, name: &str) -> NamespaceId {
        if let Some(existing) = self.get(parent).child(name) {
            return existing;
        }

        let id = NamespaceId(self.namespaces.len() as u32);
        self.namespaces.push(Namespace::new(name, Some(parent)));
        self.namespaces[parent.index()]
            .children
            .insert(name.to_string(), id);
        id
    }

    pub fn get_or_create_path<S: AsRef<str>>(&mut self, parent: NamespaceId, path: &[S]) -> NamespaceId {
        path.iter()
            .fold(parent, |current, name| self.get_or_create_child(current, name.as_ref()))
    }

    /// Adds a symbol. Returns the existing symbol, leaving the table
    /// untouched, if the mangled name is already taken in `namespace`.
    pub fn insert_symbol(&mut self, namespace: NamespaceId, symbol: Symbol) -> Result<(), &Symbol> {
        if self.namespaces[namespace.index()]
            .symbols
            .contains_key(&symbol.mangled_name)
        {
            return Err(&self.namespaces[namespace.index()].symbols[&symbol.mangled_name]);
        }

        self.namespaces[namespace.index()]
            .symbols
            .insert(symbol.mangled_name.clone(), symbol);
        Ok(())
    }

    /// `id` followed by each enclosing namespace up to and including the root.
    pub fn ancestors(&self, id: NamespaceId) -> impl Iterator<Item = NamespaceId> + '_ {
        std::iter::successors(Some(id), move |current| self.get(*current).parent)
    }

    /// Names from the outermost non-root namespace down to `id`.
    pub fn path(&self, id: NamespaceId) -> Vec<&str> {
        let mut path = self
            .ancestors(id)
            .filter(|ancestor| *ancestor != NamespaceId::ROOT)
            .map(|ancestor| self.get(ancestor).name.as_str())
            .collect::<Vec<_>>();
        path.reverse();
        path
    }

    pub fn qualified_name(&self, id: NamespaceId) -> String {
        self.path(id).join("::")
    }

    /// Overloads of `name` visible from `from`: those of the nearest
    /// enclosing namespace (starting at `from`) that declares any function
    /// with that name. Sibling namespaces are never searched.
    pub fn lookup_functions(&self, from: NamespaceId, name: &str) -> Vec<&Symbol> {
        for namespace in self.ancestors(from) {
            let found = self.get(namespace).functions_named(name).collect::<Vec<_>>();
            if !found.is_empty() {
                return found;
            }
        }
        vec![]
    }

    /// Resolves a qualified path (`a::b`) against the nearest enclosing
    /// namespace of `from` that has it.
    pub fn resolve_path<S: AsRef<str>>(&self, from: NamespaceId, path: &[S]) -> Option<NamespaceId> {
        self.ancestors(from).find_map(|start| {
            path.iter()
                .try_fold(start, |current, name| self.get(current).child(name.as_ref()))
        })
    }
}
