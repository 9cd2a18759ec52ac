use std::collections::HashMap;

use lazy_static::lazy_static;
use num_bigint::BigInt;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, MK_TOKEN,
};

use super::{
    preprocessor::Preprocessor,
    tokens::{Literal, Token, TokenKind, RESERVED_LOOKUP},
};

pub const MAX_IDENTIFIER_LENGTH: usize = 255;

lazy_static! {
    static ref TWO_CHAR_LOOKUP: Vec<(char, char, TokenKind)> = vec![
        ('=', '=', TokenKind::Equals),
        ('!', '=', TokenKind::NotEquals),
        ('<', '=', TokenKind::LessEquals),
        ('>', '=', TokenKind::GreaterEquals),
        ('&', '&', TokenKind::And),
    ];

    static ref SINGLE_CHAR_LOOKUP: HashMap<char, TokenKind> = {
        let mut map = HashMap::new();
        map.insert('+', TokenKind::Plus);
        map.insert('-', TokenKind::Minus);
        map.insert('*', TokenKind::Star);
        map.insert('/', TokenKind::Slash);
        map.insert('%', TokenKind::Percent);
        map.insert('=', TokenKind::Assignment);
        map.insert('(', TokenKind::OpenParen);
        map.insert(')', TokenKind::CloseParen);
        map.insert('{', TokenKind::OpenCurly);
        map.insert('}', TokenKind::CloseCurly);
        map.insert(';', TokenKind::Semicolon);
        map.insert(',', TokenKind::Comma);
        map.insert('<', TokenKind::Less);
        map.insert('>', TokenKind::Greater);
        map
    };
}

/// Pull-based tokenizer.
///
/// Every call to [`Scanner::next_token`] skips whitespace and recognises
/// exactly one lexeme. Problems are recorded in [`Scanner::errors`] and
/// never interrupt the stream: a bad lexeme still yields a token, possibly
/// of kind [`TokenKind::Error`].
#[derive(Debug, Clone)]
pub struct Scanner {
    source: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    errors: Vec<Error>,
    preprocessor_errors: Vec<Error>,
    lookahead: Option<Token>,
}

impl Scanner {
    pub fn new(source: &str, use_preprocessor: bool) -> Scanner {
        if use_preprocessor {
            Scanner::with_preprocessor(source, Preprocessor::new())
        } else {
            Scanner::from_processed(source, vec![])
        }
    }

    /// Runs `preprocessor`, which may carry predefined macros, over
    /// `source` before scanning.
    pub fn with_preprocessor(source: &str, preprocessor: Preprocessor) -> Scanner {
        let processed = preprocessor.process(source);
        Scanner::from_processed(&processed.source, processed.errors)
    }

    fn from_processed(source: &str, preprocessor_errors: Vec<Error>) -> Scanner {
        Scanner {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            errors: vec![],
            preprocessor_errors,
            lookahead: None,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.lookahead.is_none() && self.pos >= self.source.len()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn preprocessor_errors(&self) -> &[Error] {
        &self.preprocessor_errors
    }

    pub fn into_errors(self) -> (Vec<Error>, Vec<Error>) {
        (self.errors, self.preprocessor_errors)
    }

    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.lookahead.take() {
            return token;
        }

        self.skip_whitespace();

        let position = self.current_position();
        let token = match self.peek_char(0) {
            None => MK_TOKEN!(TokenKind::EOF, String::new(), position),
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                self.read_identifier_or_keyword(position)
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(position),
            Some('"') => self.read_string(position),
            Some(_) => self.read_operator_or_delimiter(position),
        };

        log::trace!("Scanner::next_token() {token}");
        token
    }

    pub fn peek_token(&mut self) -> &Token {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.next_token(),
        };

        self.lookahead.insert(token)
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.source.get(self.pos + offset).copied()
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let ch = self.source[self.pos];
        self.pos += 1;

        match ch {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\r' => {
                if self.peek_char(0) == Some('\n') {
                    self.pos += 1;
                }
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += 1,
        }

        ch
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char(0).is_some_and(&predicate) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        self.advance_while(|ch| matches!(ch, ' ' | '\t' | '\r' | '\n'));
    }

    fn lexeme_from(&self, start: usize) -> String {
        self.source[start..self.pos].iter().collect()
    }

    fn read_identifier_or_keyword(&mut self, position: Position) -> Token {
        let start = self.pos;
        self.advance_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        let lexeme = self.lexeme_from(start);

        if self.pos - start > MAX_IDENTIFIER_LENGTH {
            self.error(
                ErrorImpl::IdentifierTooLong {
                    prefix: lexeme.chars().take(20).collect(),
                },
                position,
            );
        }

        match RESERVED_LOOKUP.get(lexeme.as_str()) {
            Some(TokenKind::True) => {
                MK_TOKEN!(TokenKind::True, lexeme, position, Some(Literal::Bool(true)))
            }
            Some(TokenKind::False) => {
                MK_TOKEN!(TokenKind::False, lexeme, position, Some(Literal::Bool(false)))
            }
            Some(kind) => MK_TOKEN!(*kind, lexeme, position),
            None => MK_TOKEN!(TokenKind::Identifier, lexeme, position),
        }
    }

    fn read_number(&mut self, position: Position) -> Token {
        let start = self.pos;
        self.advance_while(|ch| ch.is_ascii_digit());

        let is_float = self.peek_char(0) == Some('.')
            && self.peek_char(1).is_some_and(|ch| ch.is_ascii_digit());

        if is_float {
            self.advance();
            self.advance_while(|ch| ch.is_ascii_digit());
            let lexeme = self.lexeme_from(start);

            let value = match lexeme.parse::<f64>() {
                Ok(value) => value,
                Err(_) => {
                    self.error(
                        ErrorImpl::MalformedFloat {
                            lexeme: lexeme.clone(),
                        },
                        position,
                    );
                    0.0
                }
            };

            return MK_TOKEN!(
                TokenKind::FloatLiteral,
                lexeme,
                position,
                Some(Literal::Float(value))
            );
        }

        let lexeme = self.lexeme_from(start);
        let value = match lexeme.parse::<BigInt>() {
            Ok(value) => {
                if value < BigInt::from(i32::MIN) || value > BigInt::from(i32::MAX) {
                    self.error(
                        ErrorImpl::IntegerOutOfRange {
                            value: value.clone(),
                        },
                        position,
                    );
                }
                value
            }
            Err(_) => {
                self.error(
                    ErrorImpl::MalformedInteger {
                        lexeme: lexeme.clone(),
                    },
                    position,
                );
                BigInt::default()
            }
        };

        MK_TOKEN!(
            TokenKind::IntLiteral,
            lexeme,
            position,
            Some(Literal::Integer(value))
        )
    }

    fn read_string(&mut self, position: Position) -> Token {
        self.advance();
        let start = self.pos;
        self.advance_while(|ch| ch != '"');
        let content = self.lexeme_from(start);

        if self.at_eof() {
            self.error(ErrorImpl::UnterminatedString, position);
            return MK_TOKEN!(
                TokenKind::Error,
                format!("\"{}", content),
                position,
                Some(Literal::Str(content))
            );
        }

        self.advance();
        MK_TOKEN!(
            TokenKind::StringLiteral,
            format!("\"{}\"", content),
            position,
            Some(Literal::Str(content))
        )
    }

    fn read_operator_or_delimiter(&mut self, position: Position) -> Token {
        let ch = self.advance();

        for (first, second, kind) in TWO_CHAR_LOOKUP.iter() {
            if ch == *first && self.peek_char(0) == Some(*second) {
                self.advance();
                return MK_TOKEN!(*kind, format!("{}{}", first, second), position);
            }
        }

        if let Some(kind) = SINGLE_CHAR_LOOKUP.get(&ch) {
            return MK_TOKEN!(*kind, ch.to_string(), position);
        }

        self.error(ErrorImpl::InvalidCharacter { ch }, position);
        MK_TOKEN!(TokenKind::Error, ch.to_string(), position)
    }

    fn error(&mut self, error: ErrorImpl, position: Position) {
        let error = Error::new(error, position);
        log::debug!("{error}");
        self.errors.push(error);
    }
}

impl Iterator for Scanner {
    type Item = Token;

    /// Yields tokens while input remains. When the source ends in
    /// whitespace the run finishes with the end-of-input token.
    fn next(&mut self) -> Option<Token> {
        if self.is_at_end() {
            None
        } else {
            Some(self.next_token())
        }
    }
}
