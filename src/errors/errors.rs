use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A failure that stops compilation outright.
///
/// Recoverable problems (bad syntax, unknown names, rejected literal
/// conversions) never take this path; they are collected as issues.
#[derive(Error, Debug, Clone)]
#[error("{internal_error} ({position})")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnterminatedString { .. } => "UnterminatedString",
            ErrorImpl::UnknownToken { .. } => "UnknownToken",
            ErrorImpl::FileRead { .. } => "FileRead",
            ErrorImpl::CriticalIssues { .. } => "CriticalIssues",
            ErrorImpl::UnresolvedExternal { .. } => "UnresolvedExternal",
            ErrorImpl::DuplicateDefinition { .. } => "DuplicateDefinition",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnterminatedString { .. } => {
                ErrorTip::Suggestion(String::from("did you forget a closing quote?"))
            }
            ErrorImpl::UnknownToken { .. } => ErrorTip::None,
            ErrorImpl::FileRead { path, .. } => {
                ErrorTip::Suggestion(format!("check that `{}` exists and is readable", path))
            }
            ErrorImpl::CriticalIssues { count } => ErrorTip::Suggestion(format!(
                "fix the {} error(s) reported above before generating code",
                count
            )),
            ErrorImpl::UnresolvedExternal { function } => ErrorTip::Suggestion(format!(
                "no module in the bundle defines a body for `{}`",
                function
            )),
            ErrorImpl::DuplicateDefinition { function } => ErrorTip::Suggestion(format!(
                "`{}` has a body in more than one module",
                function
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unterminated string literal starting with {snippet:?}")]
    UnterminatedString { snippet: String },
    #[error("unknown token: {token:?}")]
    UnknownToken { token: String },
    #[error("failed to read {path:?}: {message}")]
    FileRead { path: String, message: String },
    #[error("{count} critical issue(s) block code generation")]
    CriticalIssues { count: usize },
    #[error("unresolved external function {function:?}")]
    UnresolvedExternal { function: String },
    #[error("function {function:?} is defined in more than one module")]
    DuplicateDefinition { function: String },
}
