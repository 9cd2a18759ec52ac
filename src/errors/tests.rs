//! Unit tests for error handling.
//!
//! This module contains tests for error names, stages and message formats.

use num_bigint::BigInt;

use crate::errors::errors::{Error, ErrorImpl, ErrorTip, Stage};
use crate::Position;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::InvalidCharacter { ch: '@' },
        Position::new(1, 10),
    );

    assert_eq!(error.get_error_name(), "InvalidCharacter");
    assert_eq!(error.stage(), Stage::Lexical);
}

#[test]
fn test_error_position() {
    let error = Error::new(ErrorImpl::UnterminatedString, Position::new(4, 2));

    assert_eq!(error.get_position().line, 4);
    assert_eq!(error.get_position().column, 2);
}

#[test]
fn test_lexical_error_display() {
    let error = Error::new(ErrorImpl::InvalidCharacter { ch: '@' }, Position::new(3, 7));

    assert_eq!(error.to_string(), "Lexical error at 3:7: Invalid character: '@'");
    assert_eq!(error.message(), "Invalid character: '@'");
}

#[test]
fn test_integer_out_of_range_message() {
    let error = Error::new(
        ErrorImpl::IntegerOutOfRange {
            value: BigInt::from(2147483648_i64),
        },
        Position::new(1, 1),
    );

    assert_eq!(
        error.to_string(),
        "Lexical error at 1:1: Integer out of range [-2³¹, 2³¹-1]: 2147483648"
    );
}

#[test]
fn test_identifier_too_long_message() {
    let error = Error::new(
        ErrorImpl::IdentifierTooLong {
            prefix: "a".repeat(20),
        },
        Position::new(1, 1),
    );

    assert_eq!(
        error.message(),
        format!("Identifier too long (max 255): '{}...'", "a".repeat(20))
    );
}

#[test]
fn test_preprocessor_error_display() {
    let error = Error::new(
        ErrorImpl::UnknownDirective {
            directive: "#pragma once".to_string(),
        },
        Position::new(2, 1),
    );

    assert_eq!(error.stage(), Stage::Preprocessor);
    assert_eq!(error.message(), "Unknown preprocessor directive: #pragma once");
    assert_eq!(
        error.to_string(),
        "Preprocessor warning at 2:1: Unknown preprocessor directive: #pragma once"
    );
}

#[test]
fn test_unterminated_block_comment_stage() {
    let error = Error::new(ErrorImpl::UnterminatedBlockComment, Position::new(5, 1));

    assert_eq!(error.get_error_name(), "UnterminatedBlockComment");
    assert_eq!(error.stage(), Stage::Preprocessor);
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.src");
    let error: Error = io.into();

    assert_eq!(error.stage(), Stage::Tooling);
    assert_eq!(error.get_error_name(), "Io");
    assert_eq!(error.to_string(), "error processing io: missing.src");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(ErrorImpl::InvalidCharacter { ch: '$' }, Position::new(1, 1));

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(ErrorImpl::UnterminatedString, Position::new(1, 1));

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}
