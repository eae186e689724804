//! Defines the `Token` record and its classification enums.
//!
//! These are the intermediate representation between the `Engine` (lexer)
//! and whatever consumes its output: a `Validator`, the JSON tree builder,
//! or a caller's own grammar.

use crate::value::ScalarKind;
use std::fmt;

/// The coarse category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Text with no grammatical meaning, e.g. `# note` or `/* ... */`.
    Comment,
    /// A value-like token: strings, numbers, literals and bare identifiers.
    Identifier,
    /// Punctuation: brackets, braces and separators.
    Operator,
    /// A run of whitespace, only produced when whitespace is not skipped.
    Whitespace,
}

impl TokenType {
    /// Trivia tokens are invisible to grammar validation and tree building.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenType::Comment | TokenType::Whitespace)
    }
}

/// The fine-grained meaning of a token, beyond its `TokenType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenDesignation {
    /// `{`
    StartObject,
    /// `}`
    EndObject,
    /// `[`
    StartArray,
    /// `]`
    EndArray,
    /// `,`
    FieldSeparator,
    /// `:`
    FieldAssignment,
    /// A quoted string, e.g. `"hello"`
    String,
    /// A number without fraction or exponent, e.g. `-42`
    Integer,
    /// A number with a fraction or exponent, e.g. `1.5e3`
    Real,
    /// `true` or `false`
    Boolean,
    /// `null`
    Null,
    /// A bare word such as `f3`. Never a valid JSON value.
    Identifier,
    Comment,
    Whitespace,
    /// A tag chosen by a grammar defined outside this crate.
    Custom(&'static str),
}

impl TokenDesignation {
    /// Returns the scalar kind a token of this designation becomes in a
    /// value tree, or `None` if it is not a scalar.
    pub fn scalar_kind(self) -> Option<ScalarKind> {
        match self {
            TokenDesignation::String => Some(ScalarKind::String),
            TokenDesignation::Integer => Some(ScalarKind::Integer),
            TokenDesignation::Real => Some(ScalarKind::Real),
            TokenDesignation::Boolean => Some(ScalarKind::Boolean),
            TokenDesignation::Null => Some(ScalarKind::Null),
            _ => None,
        }
    }

    pub fn is_scalar(self) -> bool {
        self.scalar_kind().is_some()
    }
}

impl fmt::Display for TokenDesignation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenDesignation::StartObject => "start of object",
            TokenDesignation::EndObject => "end of object",
            TokenDesignation::StartArray => "start of array",
            TokenDesignation::EndArray => "end of array",
            TokenDesignation::FieldSeparator => "field separator",
            TokenDesignation::FieldAssignment => "field assignment",
            TokenDesignation::String => "string",
            TokenDesignation::Integer => "integer",
            TokenDesignation::Real => "real",
            TokenDesignation::Boolean => "boolean",
            TokenDesignation::Null => "null",
            TokenDesignation::Identifier => "identifier",
            TokenDesignation::Comment => "comment",
            TokenDesignation::Whitespace => "whitespace",
            TokenDesignation::Custom(name) => *name,
        };
        f.write_str(name)
    }
}

/// A position in the source. Both fields are 0-indexed; the column resets
/// to 0 on the character after a newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub const fn new(line: usize, column: usize) -> Self {
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The inclusive source range covered by a token: `end` is the location of
/// its last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub const fn new(start: Location, end: Location) -> Self {
        Span { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}

/// A single token produced by the `Engine`.
///
/// The type and designation are captured from the descriptor at the moment
/// the token finished, so the descriptor is free to scan the next token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenType,
    designation: TokenDesignation,
    text: String,
    span: Span,
}

impl Token {
    pub fn new(
        kind: TokenType,
        designation: TokenDesignation,
        text: impl Into<String>,
        span: Span,
    ) -> Self {
        Token {
            kind,
            designation,
            text: text.into(),
            span,
        }
    }

    pub fn kind(&self) -> TokenType {
        self.kind
    }

    pub fn designation(&self) -> TokenDesignation {
        self.designation
    }

    /// The raw text exactly as scanned, quotes and brackets included.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
