//! Unit tests for fatal error handling.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn position() -> Position {
    Position::new(1, 9, Rc::new("test.lang".to_string()))
}

#[test]
fn test_unknown_token_error() {
    let error = Error::new(
        ErrorImpl::UnknownToken {
            token: "#".to_string(),
        },
        position(),
    );

    assert_eq!(error.get_error_name(), "UnknownToken");
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnterminatedString {
            snippet: "\"abc".to_string(),
        },
        position(),
    );

    assert_eq!(error.get_position().line, 1);
    assert_eq!(error.get_position().column, 9);
}

#[test]
fn test_unterminated_string_error() {
    let error = Error::new(
        ErrorImpl::UnterminatedString {
            snippet: "\"abc".to_string(),
        },
        position(),
    );

    assert_eq!(error.get_error_name(), "UnterminatedString");
    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("closing quote")),
        ErrorTip::None => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_display_includes_position() {
    let error = Error::new(
        ErrorImpl::UnknownToken {
            token: "$".to_string(),
        },
        position(),
    );

    let rendered = error.to_string();
    assert!(rendered.contains("unknown token"));
    assert!(rendered.contains("test.lang:1:9"));
}

#[test]
fn test_critical_issues_error() {
    let error = Error::new(ErrorImpl::CriticalIssues { count: 3 }, Position::null());

    assert_eq!(error.get_error_name(), "CriticalIssues");
    assert_eq!(error.get_tip().to_string(), "fix the 3 error(s) reported above before generating code");
}

#[test]
fn test_link_errors() {
    let unresolved = Error::new(
        ErrorImpl::UnresolvedExternal {
            function: "_putsZZPc".to_string(),
        },
        Position::null(),
    );
    let duplicate = Error::new(
        ErrorImpl::DuplicateDefinition {
            function: "_mainZ".to_string(),
        },
        Position::null(),
    );

    assert_eq!(unresolved.get_error_name(), "UnresolvedExternal");
    assert_eq!(duplicate.get_error_name(), "DuplicateDefinition");
    assert!(duplicate.get_tip().to_string().contains("_mainZ"));
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}
