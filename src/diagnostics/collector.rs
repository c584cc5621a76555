use std::collections::HashMap;

use tracing::debug;

use crate::ast::types::{Primitive, ValueType};

use super::{
    issues::{CodeReference, Issue, IssueKind, Severity},
    operators::OperatorRegistry,
};

/// Named class/struct types known to the session. Primitive names are
/// always resolvable and cannot be shadowed.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, ValueType>,
}

impl TypeRegistry {
    /// Registers a named type. Returns `false` if the name is a primitive or
    /// is already registered; the existing entry is kept.
    pub fn register(&mut self, value_type: ValueType) -> bool {
        let Some(name) = value_type.name.clone() else {
            return false;
        };
        if Primitive::from_name(&name).is_some() || self.types.contains_key(&name) {
            return false;
        }
        self.types.insert(name, value_type);
        true
    }

    pub fn resolve(&self, name: &str) -> Option<ValueType> {
        match Primitive::from_name(name) {
            Some(primitive) => Some(ValueType::primitive(primitive)),
            None => self.types.get(name).cloned(),
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Session-wide sink for issues.
///
/// Issues are appended in the order they are found and are never removed,
/// merged or rewritten.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    issues: Vec<Issue>,
    pub types: TypeRegistry,
    pub operators: OperatorRegistry,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: Issue) {
        debug!(
            severity = %issue.severity,
            kind = issue.kind.name(),
            at = %issue.code_ref,
            "{}",
            issue.kind
        );
        self.issues.push(issue);
    }

    /// Records `kind` at `code_ref` with the kind's own severity.
    pub fn report(&mut self, kind: IssueKind, code_ref: CodeReference) {
        self.add(Issue::new(kind, code_ref));
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn has_critical_issues(&self) -> bool {
        self.issues.iter().any(|issue| issue.severity.is_critical())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}
