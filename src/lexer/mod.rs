//! Lexical analysis module.
//!
//! This module turns source text into a stream of classified tokens for a
//! parser. It handles:
//!
//! - Preprocessing: comment stripping, object-like macros and
//!   `#ifdef`/`#ifndef` blocks, keeping line and column geometry intact
//! - Recognition of keywords, identifiers, literals, and operators
//! - Token position tracking for error reporting
//! - Non-fatal error recovery: every problem is recorded and scanning goes on

pub mod preprocessor;
pub mod scanner;
pub mod tokens;
