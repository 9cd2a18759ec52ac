#![allow(clippy::module_inception)]

use crate::{
    errors::errors::{Error, ErrorTip},
    lexer::{
        preprocessor::{split_lines, split_terminator, Preprocessor},
        scanner::Scanner,
        tokens::Token,
    },
};

pub mod errors;
pub mod lexer;
pub mod macros;

extern crate regex;

/// 1-based line and column, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }

    pub fn null() -> Self {
        Position { line: 0, column: 0 }
    }
}

/// Result of scanning a whole source buffer.
#[derive(Debug, Clone)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub errors: Vec<Error>,
    pub preprocessor_errors: Vec<Error>,
}

impl Tokenized {
    pub fn has_lexical_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub fn tokenize(source: &str, use_preprocessor: bool) -> Tokenized {
    collect(Scanner::new(source, use_preprocessor))
}

pub fn tokenize_with(source: &str, preprocessor: Preprocessor) -> Tokenized {
    collect(Scanner::with_preprocessor(source, preprocessor))
}

fn collect(mut scanner: Scanner) -> Tokenized {
    let tokens: Vec<Token> = scanner.by_ref().collect();
    let (errors, preprocessor_errors) = scanner.into_errors();

    Tokenized {
        tokens,
        errors,
        preprocessor_errors,
    }
}

/// One canonical line per token, each terminated by `\n`.
pub fn render_tokens(tokens: &[Token], show_errors: bool) -> String {
    let mut output = String::new();

    for token in tokens {
        if token.is_error() && !show_errors {
            continue;
        }
        output.push_str(&token.to_string());
        output.push('\n');
    }

    output
}

pub fn get_line_at_position(source: &str, line: usize) -> Option<&str> {
    if line == 0 {
        return None;
    }

    split_lines(source)
        .get(line - 1)
        .copied()
        .map(|text| split_terminator(text).0)
}


pub fn display_error(error: &Error, source: &str) -> String {
    /*
        Lexical error at 20:9: Invalid character: '#'
           |
        20 | int a = #;
           | --------^
    */

    let mut rendered = if let ErrorTip::None = error.get_tip() {
        format!("{}\n", error)
    } else {
        format!("{} ({})\n", error, error.get_tip())
    };

    let position = error.get_position();
    let Some(line_text) = get_line_at_position(source, position.line) else {
        return rendered;
    };

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    rendered.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    rendered.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = position.column.saturating_sub(removed_whitespace).max(1);
    rendered.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    rendered
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (string.chars().skip(start).collect(), start)
}
