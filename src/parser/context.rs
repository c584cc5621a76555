use std::rc::Rc;

use crate::{
    ast::{
        arena::{AnyNodeRef, AstNode, NodeRef},
        nodes::{AttributeNode, FunctionDeclNode, ScopeNode, VarDeclNode},
    },
    compiler::module::Module,
    diagnostics::{
        collector::Collector,
        issues::{CodeReference, IssueKind},
    },
    lexer::tokens::{TokenSlice, TokenStream},
    symbols::namespace::NamespaceId,
};

/// Marker returned once a syntax error has been recorded in the collector;
/// the caller recovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reported;

pub type ParseResult<T> = Result<T, Reported>;

/// Per-file parsing state: where new nodes go and what names resolve to.
pub struct Context<'a> {
    pub module: &'a mut Module,
    pub collector: &'a mut Collector,
    pub file_index: usize,
    pub file: Rc<String>,
    tokens: Rc<TokenStream>,
    pub namespace: NamespaceId,
    /// Namespace in effect where the enclosing block opened; `namespace x;`
    /// is relative to it.
    pub block_namespace: NamespaceId,
    pub scope: Option<NodeRef<ScopeNode>>,
    pub function: Option<NodeRef<FunctionDeclNode>>,
    /// Attributes waiting for the function they annotate.
    pub pending_attributes: Vec<NodeRef<AttributeNode>>,
}

impl<'a> Context<'a> {
    pub fn new(module: &'a mut Module, collector: &'a mut Collector, file_index: usize) -> Self {
        let file = Rc::clone(&module.files[file_index].path);
        let tokens = Rc::clone(&module.files[file_index].tokens);
        let namespace = module.namespaces.root();

        Context {
            module,
            collector,
            file_index,
            file,
            tokens,
            namespace,
            block_namespace: namespace,
            scope: None,
            function: None,
            pending_attributes: vec![],
        }
    }

    pub fn tokens(&self) -> &Rc<TokenStream> {
        &self.tokens
    }

    pub fn emplace_node<T: AstNode>(&mut self, node: T) -> NodeRef<T> {
        self.module.arena.alloc(node)
    }

    pub fn get<T: AstNode>(&self, node: NodeRef<T>) -> &T {
        self.module.arena.get(node)
    }

    pub fn get_mut<T: AstNode>(&mut self, node: NodeRef<T>) -> &mut T {
        self.module.arena.get_mut(node)
    }

    /// Code reference for `slice`, positioned at its first token.
    pub fn code_ref(&self, slice: TokenSlice) -> CodeReference {
        let token = self
            .tokens
            .get(slice.start)
            .or_else(|| self.tokens.tokens().last().copied());
        let (line, column) = token.map_or((0, 0), |token| (token.line, token.column));

        CodeReference {
            module: Rc::clone(&self.module.name),
            file: Rc::clone(&self.file),
            slice,
            line,
            column,
        }
    }

    pub fn code_ref_at(&self, index: u32) -> CodeReference {
        self.code_ref(TokenSlice::single(index))
    }

    pub fn report(&mut self, kind: IssueKind, slice: TokenSlice) {
        let code_ref = self.code_ref(slice);
        self.collector.report(kind, code_ref);
    }

    /// Reports `UnexpectedToken` at token `index`.
    pub fn unexpected(&mut self, index: u32, expected: &str) -> Reported {
        let actual = self.tokens.literal(index).to_string();
        self.report(
            IssueKind::UnexpectedToken {
                expected: expected.to_string(),
                actual,
            },
            TokenSlice::single(index),
        );
        Reported
    }

    /// Opens a scope nested in the current one and makes it current.
    pub fn push_scope(&mut self, code_ref: CodeReference) -> NodeRef<ScopeNode> {
        let scope = self.emplace_node(ScopeNode::new(code_ref, self.scope));
        self.scope = Some(scope);
        scope
    }

    /// Closes the current scope, making its parent current again.
    pub fn pop_scope(&mut self) -> NodeRef<ScopeNode> {
        let scope = self.scope.expect("pop_scope called with no active scope");
        self.scope = self.get(scope).parent;
        scope
    }

    /// Appends a statement to the current scope.
    pub fn append(&mut self, node: impl Into<AnyNodeRef>) {
        if let Some(scope) = self.scope {
            let node = node.into();
            self.get_mut(scope).children.push(node);
        }
    }

    /// Walks the scope chain outwards; the innermost binding wins.
    pub fn resolve_variable(&self, name: &str) -> Option<NodeRef<VarDeclNode>> {
        let mut current = self.scope;
        while let Some(scope) = current {
            let node = self.get(scope);
            if let Some(decl) = node.lookup_local(name) {
                return Some(decl);
            }
            current = node.parent;
        }
        None
    }

    /// Binds `decl` in the current scope.
    ///
    /// A name already bound to a constant in this scope cannot be declared
    /// again; any other earlier binding is shadowed.
    pub fn declare_variable(&mut self, decl: NodeRef<VarDeclNode>) -> bool {
        let Some(scope) = self.scope else {
            return false;
        };
        let name = self.get(decl).name.clone();

        if let Some(previous) = self.get(scope).lookup_local(&name) {
            let previous = self.get(previous);
            if previous.is_const {
                let kind = IssueKind::VariableRedeclaration {
                    name,
                    previous: previous.code_ref.clone(),
                };
                let code_ref = self.get(decl).code_ref.clone();
                self.collector.report(kind, code_ref);
                return false;
            }
        }

        self.get_mut(scope).locals.insert(name, decl);
        true
    }
}
