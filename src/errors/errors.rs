use std::fmt::Display;

use num_bigint::BigInt;
use thiserror::Error;

use crate::Position;

/// The phase of the pipeline a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preprocessor,
    Lexical,
    Tooling,
}

#[derive(Debug, Clone, PartialEq)]
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

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// The bare message, without the position prefix.
    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn stage(&self) -> Stage {
        match &self.internal_error {
            ErrorImpl::UnknownDirective { .. } | ErrorImpl::UnterminatedBlockComment => {
                Stage::Preprocessor
            }
            ErrorImpl::IdentifierTooLong { .. }
            | ErrorImpl::MalformedFloat { .. }
            | ErrorImpl::MalformedInteger { .. }
            | ErrorImpl::IntegerOutOfRange { .. }
            | ErrorImpl::UnterminatedString
            | ErrorImpl::InvalidCharacter { .. } => Stage::Lexical,
            ErrorImpl::MalformedTokenLine { .. } | ErrorImpl::Io { .. } => Stage::Tooling,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::IdentifierTooLong { .. } => "IdentifierTooLong",
            ErrorImpl::MalformedFloat { .. } => "MalformedFloat",
            ErrorImpl::MalformedInteger { .. } => "MalformedInteger",
            ErrorImpl::IntegerOutOfRange { .. } => "IntegerOutOfRange",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::InvalidCharacter { .. } => "InvalidCharacter",
            ErrorImpl::UnknownDirective { .. } => "UnknownDirective",
            ErrorImpl::UnterminatedBlockComment => "UnterminatedBlockComment",
            ErrorImpl::MalformedTokenLine { .. } => "MalformedTokenLine",
            ErrorImpl::Io { .. } => "Io",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::IdentifierTooLong { .. } => ErrorTip::Suggestion(String::from(
                "Identifiers may be at most 255 characters long",
            )),
            ErrorImpl::MalformedFloat { .. } | ErrorImpl::MalformedInteger { .. } => ErrorTip::None,
            ErrorImpl::IntegerOutOfRange { .. } => ErrorTip::Suggestion(String::from(
                "Integer literals must fit in a signed 32-bit integer",
            )),
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("Did you forget a closing `\"`?"))
            }
            ErrorImpl::InvalidCharacter { .. } => ErrorTip::None,
            ErrorImpl::UnknownDirective { .. } => ErrorTip::Suggestion(String::from(
                "Supported directives are #define, #undef, #ifdef, #ifndef and #endif",
            )),
            ErrorImpl::UnterminatedBlockComment => {
                ErrorTip::Suggestion(String::from("Did you forget a closing `*/`?"))
            }
            ErrorImpl::MalformedTokenLine { .. } | ErrorImpl::Io { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.stage() {
            Stage::Lexical => write!(
                f,
                "Lexical error at {}:{}: {}",
                self.position.line, self.position.column, self.internal_error
            ),
            Stage::Preprocessor => write!(
                f,
                "Preprocessor warning at {}:{}: {}",
                self.position.line, self.position.column, self.internal_error
            ),
            Stage::Tooling => write!(f, "{}", self.internal_error),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::new(
            ErrorImpl::Io {
                message: error.to_string(),
            },
            Position::null(),
        )
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
    #[error("Identifier too long (max 255): '{prefix}...'")]
    IdentifierTooLong { prefix: String },
    #[error("Malformed float: '{lexeme}'")]
    MalformedFloat { lexeme: String },
    #[error("Malformed integer: '{lexeme}'")]
    MalformedInteger { lexeme: String },
    #[error("Integer out of range [-2³¹, 2³¹-1]: {value}")]
    IntegerOutOfRange { value: BigInt },
    #[error("Unterminated string")]
    UnterminatedString,
    #[error("Invalid character: '{ch}'")]
    InvalidCharacter { ch: char },
    #[error("Unknown preprocessor directive: {directive}")]
    UnknownDirective { directive: String },
    #[error("Unterminated block comment")]
    UnterminatedBlockComment,
    #[error("malformed token line: {line:?}")]
    MalformedTokenLine { line: String },
    #[error("error processing io: {message}")]
    Io { message: String },
}
