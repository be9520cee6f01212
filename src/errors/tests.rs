//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorKind, ErrorTip};
use crate::Position;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Some(Position::new(10, 3)),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position(), Some(&Position::new(10, 3)));
}

#[test]
fn test_error_display_with_position() {
    let error = Error::new(
        ErrorImpl::DuplicateIdentifier {
            identifier: "x".to_string(),
        },
        Some(Position::new(4, 12)),
    );

    assert_eq!(
        error.to_string(),
        "identifier x is already declared (row: 4, col: 12)"
    );
    assert_eq!(error.message(), "identifier x is already declared");
}

#[test]
fn test_error_display_without_position() {
    let error = Error::new(ErrorImpl::ReturnOutsideFunction, None);

    assert_eq!(error.get_position(), None);
    assert_eq!(error.to_string(), "return is only allowed inside a function");
}

#[test]
fn test_null_position_is_dropped() {
    let error = Error::new(ErrorImpl::TryMissingHandler, Some(Position::null()));
    assert_eq!(error.get_position(), None);
}

#[test]
fn test_or_position() {
    let error = Error::new(
        ErrorImpl::UndeclaredIdentifier {
            identifier: "foo".to_string(),
        },
        None,
    )
    .or_position(Position::new(2, 5));
    assert_eq!(error.get_position(), Some(&Position::new(2, 5)));

    // An existing position wins
    let error = error.or_position(Position::new(9, 9));
    assert_eq!(error.get_position(), Some(&Position::new(2, 5)));
}

#[test]
fn test_error_kinds() {
    let lexical = Error::new(ErrorImpl::UnrecognisedToken { token: "@".to_string() }, None);
    let syntax = Error::new(ErrorImpl::UnexpectedToken { token: ";".to_string() }, None);
    let number = Error::new(ErrorImpl::NumberParseError { token: "9".repeat(30) }, None);
    let semantic = Error::new(ErrorImpl::TryMissingHandler, None);

    assert_eq!(lexical.kind(), ErrorKind::Lexical);
    assert_eq!(syntax.kind(), ErrorKind::Syntax);
    assert_eq!(number.kind(), ErrorKind::Syntax);
    assert_eq!(semantic.kind(), ErrorKind::Semantic);

    assert!(!syntax.is_semantic());
    assert!(semantic.is_semantic());
}

#[test]
fn test_inconvertible_type_message() {
    let with_context = Error::new(
        ErrorImpl::InconvertibleType {
            from: "string".to_string(),
            to: "int".to_string(),
            context: Some("returned value".to_string()),
        },
        None,
    );
    let without_context = Error::new(
        ErrorImpl::InconvertibleType {
            from: "float".to_string(),
            to: "bool".to_string(),
            context: None,
        },
        None,
    );

    assert_eq!(
        with_context.message(),
        "type string (returned value) is not convertible to int"
    );
    assert_eq!(without_context.message(), "type float is not convertible to bool");
}

#[test]
fn test_argument_errors_state_both_sides() {
    let count = Error::new(
        ErrorImpl::ArgumentCountMismatch {
            function: "add".to_string(),
            expected: 2,
            received: 1,
        },
        None,
    );
    let types = Error::new(
        ErrorImpl::ArgumentTypeMismatch {
            function: "f".to_string(),
            actual: "string, int".to_string(),
            formal: "int, bool".to_string(),
        },
        None,
    );

    assert_eq!(
        count.message(),
        "argument count of add does not match (expected 2, received 1)"
    );
    assert!(types.message().contains("(string, int)"));
    assert!(types.message().contains("(int, bool)"));
}

#[test]
fn test_not_a_variable_message() {
    let error = Error::new(
        ErrorImpl::NotAVariable {
            identifier: "int".to_string(),
        },
        Some(Position::new(1, 1)),
    );

    assert_eq!(error.get_error_name(), "NotAVariable");
    assert_eq!(error.kind(), ErrorKind::Semantic);
    assert_eq!(
        error.to_string(),
        "int is not a variable and cannot be assigned (row: 1, col: 1)"
    );
}

#[test]
fn test_error_tip() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        None,
    );

    match error.get_tip() {
        ErrorTip::Suggestion(msg) => {
            assert!(msg.contains("Unexpected token"));
            assert!(msg.contains("semicolon"));
        }
        ErrorTip::None => panic!("Expected a suggestion tip"),
    }

    let error = Error::new(ErrorImpl::UnresolvedType, None);
    assert!(matches!(error.get_tip(), ErrorTip::None));
    assert_eq!(error.get_tip().to_string(), "");
}

#[test]
fn test_error_names_are_distinct() {
    let names = [
        Error::new(ErrorImpl::ReturnOutsideFunction, None).get_error_name().to_string(),
        Error::new(ErrorImpl::TryMissingHandler, None).get_error_name().to_string(),
        Error::new(ErrorImpl::UnresolvedType, None).get_error_name().to_string(),
        Error::new(
            ErrorImpl::NestedFunctionNotSupported {
                function: "g".to_string(),
            },
            None,
        )
        .get_error_name()
        .to_string(),
        Error::new(
            ErrorImpl::CatchTypeMismatch {
                received: "int".to_string(),
            },
            None,
        )
        .get_error_name()
        .to_string(),
    ];

    assert_eq!(
        names,
        [
            "ReturnOutsideFunction",
            "TryMissingHandler",
            "UnresolvedType",
            "NestedFunctionNotSupported",
            "CatchTypeMismatch",
        ]
    );
}
