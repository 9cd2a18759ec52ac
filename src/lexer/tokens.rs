use lazy_static::lazy_static;
use num_bigint::BigInt;
use regex::Regex;
use std::{collections::HashMap, fmt::Display, str::FromStr};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, MK_TOKEN,
};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("int", TokenKind::Int);
        map.insert("float", TokenKind::Float);
        map.insert("bool", TokenKind::Bool);
        map.insert("return", TokenKind::Return);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("void", TokenKind::Void);
        map.insert("struct", TokenKind::Struct);
        map.insert("fn", TokenKind::Fn);
        map
    };

    static ref NAME_LOOKUP: HashMap<&'static str, TokenKind> = TokenKind::ALL
        .iter()
        .map(|kind| (kind.name(), *kind))
        .collect();

    static ref TOKEN_LINE: Regex = Regex::new(r"(?s)^(\d+):(\d+) ([A-Z_]+) (.*)$").unwrap();
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    // Reserved
    If,
    Else,
    While,
    For,
    Int,
    Float,
    Bool,
    Return,
    True,
    False,
    Void,
    Struct,
    Fn,

    Identifier,
    IntLiteral,
    FloatLiteral,
    StringLiteral,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equals,        // ==
    NotEquals,     // !=
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    And,           // &&
    Assignment,    // =

    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    Semicolon,
    Comma,

    EOF,
    Error,
}

impl TokenKind {
    pub const ALL: [TokenKind; 38] = [
        TokenKind::If,
        TokenKind::Else,
        TokenKind::While,
        TokenKind::For,
        TokenKind::Int,
        TokenKind::Float,
        TokenKind::Bool,
        TokenKind::Return,
        TokenKind::True,
        TokenKind::False,
        TokenKind::Void,
        TokenKind::Struct,
        TokenKind::Fn,
        TokenKind::Identifier,
        TokenKind::IntLiteral,
        TokenKind::FloatLiteral,
        TokenKind::StringLiteral,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::Percent,
        TokenKind::Equals,
        TokenKind::NotEquals,
        TokenKind::Less,
        TokenKind::LessEquals,
        TokenKind::Greater,
        TokenKind::GreaterEquals,
        TokenKind::And,
        TokenKind::Assignment,
        TokenKind::OpenParen,
        TokenKind::CloseParen,
        TokenKind::OpenCurly,
        TokenKind::CloseCurly,
        TokenKind::Semicolon,
        TokenKind::Comma,
        TokenKind::EOF,
        TokenKind::Error,
    ];

    /// Canonical upper-case name used in token renderings.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::If => "KW_IF",
            TokenKind::Else => "KW_ELSE",
            TokenKind::While => "KW_WHILE",
            TokenKind::For => "KW_FOR",
            TokenKind::Int => "KW_INT",
            TokenKind::Float => "KW_FLOAT",
            TokenKind::Bool => "KW_BOOL",
            TokenKind::Return => "KW_RETURN",
            TokenKind::True => "KW_TRUE",
            TokenKind::False => "KW_FALSE",
            TokenKind::Void => "KW_VOID",
            TokenKind::Struct => "KW_STRUCT",
            TokenKind::Fn => "KW_FN",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::IntLiteral => "INT_LITERAL",
            TokenKind::FloatLiteral => "FLOAT_LITERAL",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::Plus => "OP_PLUS",
            TokenKind::Minus => "OP_MINUS",
            TokenKind::Star => "OP_STAR",
            TokenKind::Slash => "OP_SLASH",
            TokenKind::Percent => "OP_PERCENT",
            TokenKind::Equals => "OP_EQ",
            TokenKind::NotEquals => "OP_NEQ",
            TokenKind::Less => "OP_LT",
            TokenKind::LessEquals => "OP_LE",
            TokenKind::Greater => "OP_GT",
            TokenKind::GreaterEquals => "OP_GE",
            TokenKind::And => "OP_AND",
            TokenKind::Assignment => "ASSIGN",
            TokenKind::OpenParen => "LPAREN",
            TokenKind::CloseParen => "RPAREN",
            TokenKind::OpenCurly => "LBRACE",
            TokenKind::CloseCurly => "RBRACE",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
            TokenKind::EOF => "END_OF_FILE",
            TokenKind::Error => "ERROR",
        }
    }

    pub fn from_name(name: &str) -> Option<TokenKind> {
        NAME_LOOKUP.get(name).copied()
    }

    pub fn is_keyword(&self) -> bool {
        RESERVED_LOOKUP.values().any(|kind| kind == self)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decoded value attached to literal and boolean-keyword tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(BigInt),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Integer(value) => write!(f, "{}", value),
            Literal::Float(value) => write!(f, "{}", format_float(*value)),
            Literal::Str(value) => write!(f, "{}", value),
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
        }
    }
}

/// Shortest round-trip form, switching to scientific notation outside
/// the decimal exponent range [-4, 16).
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return String::from("nan");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "inf" } else { "-inf" });
    }
    if value == 0.0 {
        return String::from("0.0");
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if (-4..16).contains(&exponent) {
        let fixed = format!("{}", value);
        if fixed.contains('.') {
            fixed
        } else {
            format!("{}.0", fixed)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
    pub literal: Option<Literal>,
}

impl Token {
    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EOF
    }

    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} {} \"{}\"",
            self.position.line, self.position.column, self.kind, self.lexeme
        )?;

        if let Some(literal) = &self.literal {
            write!(f, " {}", literal)?;
        }

        Ok(())
    }
}

impl FromStr for Token {
    type Err = Error;

    /// Parses one canonical rendering back into a token.
    ///
    /// A lexeme may itself contain `"` and spaces, so every candidate end
    /// quote is tried and the candidate whose rendering reproduces the
    /// input wins.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = || {
            Error::new(
                ErrorImpl::MalformedTokenLine {
                    line: line.to_string(),
                },
                Position::null(),
            )
        };

        let captures = TOKEN_LINE.captures(line).ok_or_else(malformed)?;
        let line_number = captures[1].parse::<usize>().map_err(|_| malformed())?;
        let column = captures[2].parse::<usize>().map_err(|_| malformed())?;
        let kind = TokenKind::from_name(&captures[3]).ok_or_else(malformed)?;
        let rest = &captures[4];

        if !rest.starts_with('"') {
            return Err(malformed());
        }

        for (end, _) in rest.match_indices('"').skip(1) {
            let lexeme = &rest[1..end];
            let tail = &rest[end + 1..];

            let literal_text = if tail.is_empty() {
                None
            } else if let Some(text) = tail.strip_prefix(' ') {
                Some(text)
            } else {
                continue;
            };

            let Some(literal) = decode_literal(kind, literal_text) else {
                continue;
            };

            let candidate = MK_TOKEN!(
                kind,
                lexeme.to_string(),
                Position::new(line_number, column),
                literal
            );

            if candidate.to_string() == line {
                return Ok(candidate);
            }
        }

        Err(malformed())
    }
}

/// Rebuilds the literal a rendering carries. The outer `None` means the
/// text cannot belong to a token of this kind.
fn decode_literal(kind: TokenKind, text: Option<&str>) -> Option<Option<Literal>> {
    match (kind, text) {
        (TokenKind::IntLiteral, Some(text)) => {
            text.parse::<BigInt>().ok().map(|v| Some(Literal::Integer(v)))
        }
        (TokenKind::FloatLiteral, Some(text)) => text.parse().ok().map(|v| Some(Literal::Float(v))),
        (TokenKind::StringLiteral | TokenKind::Error, Some(text)) => {
            Some(Some(Literal::Str(text.to_string())))
        }
        (TokenKind::True | TokenKind::False, Some("True")) => Some(Some(Literal::Bool(true))),
        (TokenKind::True | TokenKind::False, Some("False")) => Some(Some(Literal::Bool(false))),
        (TokenKind::True | TokenKind::False, Some(_)) => None,
        (_, None) => Some(None),
        (_, Some(_)) => None,
    }
}
