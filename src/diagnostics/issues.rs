use std::{fmt::Display, rc::Rc};

use thiserror::Error;

use crate::{lexer::tokens::TokenSlice, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Critical issues block code generation.
    pub fn is_critical(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Where an issue points: a token range of one file of one module, plus the
/// line/column of its first token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeReference {
    pub module: Rc<String>,
    pub file: Rc<String>,
    pub slice: TokenSlice,
    pub line: u32,
    pub column: u32,
}

impl CodeReference {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column, Rc::clone(&self.file))
    }
}

impl Display for CodeReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IssueKind {
    #[error("unexpected token `{actual}`, expected {expected}")]
    UnexpectedToken { expected: String, actual: String },
    #[error("unknown variable `{name}`")]
    UnknownVariable { name: String },
    #[error("variable `{name}` is already declared as a constant at {previous}")]
    VariableRedeclaration { name: String, previous: CodeReference },
    #[error("cannot mutate constant `{name}`")]
    ConstantMutation { name: String },
    #[error("unknown type `{name}`")]
    UnknownType { name: String },
    #[error("unknown function `{name}`")]
    UnknownFunction { name: String },
    #[error("no overload of `{name}` accepts arguments ({arguments})")]
    NoMatchingOverload { name: String, arguments: String },
    #[error("ambiguous call to `{name}`: more than one overload accepts these arguments")]
    AmbiguousCall { name: String },
    #[error("function `{name}` is already defined")]
    DuplicateFunction { name: String },
    #[error("type mismatch: expected `{expected}`, found `{actual}`")]
    TypeMismatch { expected: String, actual: String },
    #[error("cannot cast `{from}` to `{to}`")]
    InvalidCast { from: String, to: String },
    #[error("`{value}` of type `{from}` cannot be implicitly converted to `{to}`")]
    InvalidTypeConversion { value: String, from: String, to: String },
    #[error("integer overflow: `{value}` exceeds the maximum {max} of `{target}`")]
    IntegerOverflow { value: String, target: String, max: String },
    #[error("integer underflow: `{value}` is negative and below the minimum {min} of `{target}`")]
    IntegerUnderflow { value: String, target: String, min: String },
    #[error("floating point overflow: `{value}` is out of range for `{target}`")]
    FloatOverflow { value: String, target: String },
    #[error("loss of precision converting `{value}` from `{from}` to `{to}`, value becomes {result}")]
    LossOfPrecision { value: String, from: String, to: String, result: String },
    #[error("`return` outside of a function")]
    ReturnOutsideFunction,
    #[error("unknown attribute `{name}`")]
    UnknownAttribute { name: String },
    #[error("attribute `{name}` does not annotate a function")]
    DanglingAttribute { name: String },
}

impl IssueKind {
    /// Severity the kind is reported with.
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::LossOfPrecision { .. }
            | IssueKind::UnknownAttribute { .. }
            | IssueKind::DanglingAttribute { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IssueKind::UnexpectedToken { .. } => "UnexpectedToken",
            IssueKind::UnknownVariable { .. } => "UnknownVariable",
            IssueKind::VariableRedeclaration { .. } => "VariableRedeclaration",
            IssueKind::ConstantMutation { .. } => "ConstantMutation",
            IssueKind::UnknownType { .. } => "UnknownType",
            IssueKind::UnknownFunction { .. } => "UnknownFunction",
            IssueKind::NoMatchingOverload { .. } => "NoMatchingOverload",
            IssueKind::AmbiguousCall { .. } => "AmbiguousCall",
            IssueKind::DuplicateFunction { .. } => "DuplicateFunction",
            IssueKind::TypeMismatch { .. } => "TypeMismatch",
            IssueKind::InvalidCast { .. } => "InvalidCast",
            IssueKind::InvalidTypeConversion { .. } => "InvalidTypeConversion",
            IssueKind::IntegerOverflow { .. } => "IntegerOverflow",
            IssueKind::IntegerUnderflow { .. } => "IntegerUnderflow",
            IssueKind::FloatOverflow { .. } => "FloatOverflow",
            IssueKind::LossOfPrecision { .. } => "LossOfPrecision",
            IssueKind::ReturnOutsideFunction => "ReturnOutsideFunction",
            IssueKind::UnknownAttribute { .. } => "UnknownAttribute",
            IssueKind::DanglingAttribute { .. } => "DanglingAttribute",
        }
    }
}

/// One collected diagnostic. Never mutated after collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub severity: Severity,
    pub code_ref: CodeReference,
    pub kind: IssueKind,
}

impl Issue {
    pub fn new(kind: IssueKind, code_ref: CodeReference) -> Self {
        Issue {
            severity: kind.severity(),
            code_ref,
            kind,
        }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.severity, self.kind, self.code_ref)
    }
}
