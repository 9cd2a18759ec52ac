//! Diagnostics produced while preprocessing and scanning.
//!
//! Nothing in the core aborts on bad input. The preprocessor and the
//! scanner record an [`errors::Error`] for every problem they meet and
//! keep going, so a caller always gets transformed text and a complete
//! token stream alongside the collected diagnostics.
//!
//! - Preprocessor warnings: unknown directives, unterminated block comments
//! - Lexical errors: over-long identifiers, bad numeric literals,
//!   unterminated strings, invalid characters
//! - Tooling errors: I/O and token-line parsing, used by the CLI and tests

pub mod errors;

#[cfg(test)]
mod tests;
