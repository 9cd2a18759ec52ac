use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

lazy_static! {
    /// `#name` followed by whitespace or end of line, then the argument text.
    static ref DIRECTIVE: Regex = Regex::new(r"^#(\S*)(?:\s+(.*))?$").unwrap();
}

#[derive(Debug, PartialEq)]
enum Directive<'a> {
    Define { name: &'a str, value: Option<&'a str> },
    Undef(&'a str),
    Ifdef(&'a str),
    Ifndef(&'a str),
    Endif,
    Unknown,
}

fn parse_directive(line: &str) -> Directive<'_> {
    let Some(captures) = DIRECTIVE.captures(line) else {
        return Directive::Unknown;
    };
    let argument = captures.get(2).map_or("", |m| m.as_str()).trim();

    match captures.get(1).map_or("", |m| m.as_str()) {
        "define" => {
            let mut parts = argument.splitn(2, char::is_whitespace);
            let name = parts.next().unwrap_or("");
            let value = parts.next().map(str::trim).filter(|value| !value.is_empty());
            Directive::Define { name, value }
        }
        "undef" => Directive::Undef(argument),
        "ifdef" => Directive::Ifdef(argument),
        "ifndef" => Directive::Ifndef(argument),
        "endif" => Directive::Endif,
        _ => Directive::Unknown,
    }
}

fn is_directive_line(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Splits after every `\n`, `\r\n` or lone `\r`, keeping the terminators.
pub(crate) fn split_lines(source: &str) -> Vec<&str> {
    let bytes = source.as_bytes();
    let mut lines = vec![];
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&source[start..=i]);
                start = i + 1;
            }
            b'\r' => {
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                lines.push(&source[start..=i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < bytes.len() {
        lines.push(&source[start..]);
    }

    lines
}

pub(crate) fn split_terminator(line: &str) -> (&str, &str) {
    let content = line.trim_end_matches(['\r', '\n']);
    (content, &line[content.len()..])
}

/// Replaces every whole-word occurrence of `name` in `line` with `value`.
fn replace_word(line: &str, name: &str, value: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(first) = rest.chars().next() {
        let is_word = is_word_char(first);
        let end = rest
            .find(|ch: char| is_word_char(ch) != is_word)
            .unwrap_or(rest.len());
        let run = &rest[..end];

        if is_word && run == name {
            result.push_str(value);
        } else {
            result.push_str(run);
        }

        rest = &rest[end..];
    }

    result
}

/// Output of one preprocessing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed {
    pub source: String,
    pub errors: Vec<Error>,
}

/// Strips comments, expands object-like macros and resolves
/// `#ifdef`/`#ifndef` blocks.
///
/// The output has the same number of lines as the input and every
/// character that survives keeps its column: comment text is blanked and
/// deleted lines leave their terminator behind.
#[derive(Debug, Default, Clone)]
pub struct Preprocessor {
    /// In definition order; redefining a name keeps its slot.
    macros: Vec<(String, String)>,
    defines: HashMap<String, bool>,
    in_block_comment: bool,
    errors: Vec<Error>,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str, value: &str) {
        log::debug!("Preprocessor::define() {name} -> {value:?}");
        match self.macros.iter_mut().find(|(defined, _)| defined == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.macros.push((name.to_string(), value.to_string())),
        }
        self.defines.insert(name.to_string(), true);
    }

    pub fn undefine(&mut self, name: &str) {
        log::debug!("Preprocessor::undefine() {name}");
        self.macros.retain(|(defined, _)| defined != name);
        self.defines.insert(name.to_string(), false);
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.defines.get(name).copied().unwrap_or(false)
    }

    pub fn macro_value(&self, name: &str) -> Option<&str> {
        self.macros
            .iter()
            .find(|(defined, _)| defined == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn process(mut self, source: &str) -> Preprocessed {
        let lines = split_lines(source);
        let mut output = String::with_capacity(source.len());
        let mut index = 0;

        while index < lines.len() {
            let (content, terminator) = split_terminator(lines[index]);

            if is_directive_line(content) {
                let skip = self.handle_directive(content.trim(), index + 1);
                output.push_str(terminator);
                index += 1;

                if skip {
                    let end = find_endif(&lines, index);
                    log::debug!(
                        "Preprocessor::process() skipping lines {}..{}",
                        index + 1,
                        end + 1
                    );
                    for skipped in &lines[index..end] {
                        output.push_str(split_terminator(skipped).1);
                    }
                    index = end;
                }
                continue;
            }

            let stripped = self.strip_comments(content);
            output.push_str(&self.expand_macros(&stripped));
            output.push_str(terminator);
            index += 1;
        }

        if self.in_block_comment {
            self.record(ErrorImpl::UnterminatedBlockComment, Position::new(lines.len(), 1));
        }

        Preprocessed {
            source: output,
            errors: self.errors,
        }
    }

    /// Applies one directive. Returns true when the lines that follow, up
    /// to the matching `#endif`, must be skipped.
    fn handle_directive(&mut self, line: &str, line_number: usize) -> bool {
        match parse_directive(line) {
            Directive::Define { name, value } => {
                if !name.is_empty() {
                    self.define(name, value.unwrap_or("1"));
                }
                false
            }
            Directive::Undef(name) => {
                self.undefine(name);
                false
            }
            Directive::Ifdef(name) => !self.is_defined(name),
            Directive::Ifndef(name) => self.is_defined(name),
            Directive::Endif => false,
            Directive::Unknown => {
                self.record(
                    ErrorImpl::UnknownDirective {
                        directive: line.to_string(),
                    },
                    Position::new(line_number, 1),
                );
                false
            }
        }
    }

    fn strip_comments(&mut self, line: &str) -> String {
        let chars: Vec<char> = line.chars().collect();
        let mut result = String::with_capacity(line.len());
        let mut in_string = false;
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            let next = chars.get(i + 1).copied();

            if self.in_block_comment {
                if ch == '*' && next == Some('/') {
                    self.in_block_comment = false;
                    result.push_str("  ");
                    i += 2;
                } else {
                    result.push(' ');
                    i += 1;
                }
                continue;
            }

            if in_string {
                // Single-character lookbehind: `"a\\"` keeps the string open.
                if ch == '"' && (i == 0 || chars[i - 1] != '\\') {
                    in_string = false;
                }
                result.push(ch);
                i += 1;
                continue;
            }

            match (ch, next) {
                ('"', _) => {
                    in_string = true;
                    result.push(ch);
                    i += 1;
                }
                ('/', Some('/')) => break,
                ('/', Some('*')) => {
                    self.in_block_comment = true;
                    result.push_str("  ");
                    i += 2;
                }
                _ => {
                    result.push(ch);
                    i += 1;
                }
            }
        }

        result
    }

    /// Longest name first, ties in definition order, rewriting the line in
    /// place after each macro.
    fn expand_macros(&self, line: &str) -> String {
        let mut macros: Vec<&(String, String)> = self.macros.iter().collect();
        macros.sort_by_key(|(name, _)| std::cmp::Reverse(name.len()));

        let mut result = line.to_string();
        for (name, value) in macros {
            result = replace_word(&result, name, value);
        }
        result
    }

    fn record(&mut self, error: ErrorImpl, position: Position) {
        let error = Error::new(error, position);
        log::debug!("{error}");
        self.errors.push(error);
    }
}

/// Index of the `#endif` closing the block opened just before `start`,
/// or `lines.len()` if the block never closes.
fn find_endif(lines: &[&str], start: usize) -> usize {
    let mut depth = 1;

    for (index, line) in lines.iter().enumerate().skip(start) {
        let content = split_terminator(line).0;
        if !is_directive_line(content) {
            continue;
        }

        match parse_directive(content.trim()) {
            Directive::Ifdef(_) | Directive::Ifndef(_) => depth += 1,
            Directive::Endif => {
                depth -= 1;
                if depth == 0 {
                    return index;
                }
            }
            _ => {}
        }
    }

    lines.len()
}

#[cfg(test)]
mod tests {
    use super::{parse_directive, replace_word, split_lines, Directive};

    #[test]
    fn test_split_lines_keeps_terminators() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a\n", "b\r\n", "c\r", "d"]);
        assert_eq!(split_lines(""), Vec::<&str>::new());
        assert_eq!(split_lines("\n\n"), vec!["\n", "\n"]);
    }

    #[test]
    fn test_parse_directive_names() {
        assert_eq!(
            parse_directive("#define FOO bar baz"),
            Directive::Define {
                name: "FOO",
                value: Some("bar baz")
            }
        );
        assert_eq!(
            parse_directive("#define FOO"),
            Directive::Define {
                name: "FOO",
                value: None
            }
        );
        assert_eq!(parse_directive("#undef FOO"), Directive::Undef("FOO"));
        assert_eq!(parse_directive("#ifdef FOO"), Directive::Ifdef("FOO"));
        assert_eq!(parse_directive("#ifndef FOO"), Directive::Ifndef("FOO"));
        assert_eq!(parse_directive("#endif"), Directive::Endif);
    }

    #[test]
    fn test_parse_directive_requires_word_boundary() {
        assert_eq!(parse_directive("#ifdefX FOO"), Directive::Unknown);
        assert_eq!(parse_directive("#endiff"), Directive::Unknown);
        assert_eq!(parse_directive("#"), Directive::Unknown);
    }

    #[test]
    fn test_replace_word_respects_boundaries() {
        assert_eq!(replace_word("FOO FOOX XFOO FOO;", "FOO", "1"), "1 FOOX XFOO 1;");
        assert_eq!(replace_word("(FOO)", "FOO", "bar"), "(bar)");
        assert_eq!(replace_word("", "FOO", "bar"), "");
    }
}
