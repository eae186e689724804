//! Contains the error types for every stage of a parse.
//!
//! `LexError` comes from the `Engine`, `ValidationError` from a `Validator`,
//! `ParseError` from the tree builder (wrapping the other two) and
//! `AccessError` from reading a finished `ValueTree`.
use crate::token::{Location, Span, TokenDesignation};
use crate::validator::Structure;
use crate::value::{NodeKind, ScalarKind};
use std::io;
use thiserror::Error;

/// A failure to turn characters into a token.
#[derive(Debug, Error)]
pub enum LexError {
    /// The first character of a token matched no configured descriptor.
    #[error("no token type starts with {ch:?} at {at}")]
    NoMatch { ch: char, at: Location },

    /// The chosen descriptor had not seen a whole token when scanning stopped.
    #[error("incomplete {designation} token {text:?} at {span}")]
    Incomplete {
        designation: TokenDesignation,
        text: String,
        span: Span,
    },

    #[error("input exceeds the limit of {limit} characters at {at}")]
    InputTooLarge { limit: usize, at: Location },

    #[error("failed to read input at {at}")]
    Io {
        #[source]
        source: io::Error,
        at: Location,
    },

    /// The token was lexically fine but the attached validator refused it.
    #[error(transparent)]
    Rejected(#[from] ValidationError),
}

impl LexError {
    /// The start location of the offending input.
    pub fn location(&self) -> Location {
        match self {
            LexError::NoMatch { at, .. } => *at,
            LexError::Incomplete { span, .. } => span.start,
            LexError::InputTooLarge { at, .. } => *at,
            LexError::Io { at, .. } => *at,
            LexError::Rejected(e) => e.span.start,
        }
    }
}

/// Why a validator refused a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("no valid start token: a document begins with an object, an array or a value")]
    NoStartToken,
    #[error("no token may follow a bare scalar document")]
    TrailingScalar,
    #[error("no token may follow a complete document")]
    TrailingToken,
    #[error("object field name must be a string")]
    FieldNameNotString,
    #[error("expected ':' after object field name")]
    MissingAssignment,
    #[error("expected an object, array or value for object field")]
    MissingFieldValue,
    #[error("expected field separator or closing brace")]
    ObjectSeparatorOrClose,
    #[error("expected an object, array or value as array element")]
    MissingElement,
    #[error("expected array separator or closing bracket")]
    ArraySeparatorOrClose,
    #[error("maximum nesting depth of {0} exceeded")]
    DepthExceeded(usize),
    /// Free-form reason for validators defined outside this crate.
    #[error("{0}")]
    Other(&'static str),
}

/// A token that is well formed but illegal where it appears.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at {span}")]
pub struct ValidationError {
    pub reason: ValidationReason,
    /// The span of the offending token.
    pub span: Span,
}

impl ValidationError {
    pub fn new(reason: ValidationReason, span: Span) -> Self {
        ValidationError { reason, span }
    }
}

/// The primary error type for building a value tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(LexError),

    #[error(transparent)]
    Validation(ValidationError),

    /// The input ended while an object or array was still open.
    #[error("unexpected end of input at {at}: {structure} opened at {opened} is not closed")]
    UnexpectedEnd {
        structure: Structure,
        opened: Location,
        at: Location,
    },

    /// The input held nothing but whitespace and comments.
    #[error("empty input at {at}")]
    EmptyInput { at: Location },

    /// A token reached the builder in a position the validator should have
    /// refused. Only seen with a validator that disagrees with the builder.
    #[error("unexpected {designation} token {text:?} at {span}")]
    Unexpected {
        designation: TokenDesignation,
        text: String,
        span: Span,
    },
}

impl ParseError {
    /// The start location of the failure.
    pub fn location(&self) -> Location {
        match self {
            ParseError::Lex(e) => e.location(),
            ParseError::Validation(e) => e.span.start,
            ParseError::UnexpectedEnd { at, .. } => *at,
            ParseError::EmptyInput { at } => *at,
            ParseError::Unexpected { span, .. } => span.start,
        }
    }

    /// The validation failure, if this error is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ParseError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

// Validator rejections surface as validation errors, not lexical ones.
impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        match err {
            LexError::Rejected(e) => ParseError::Validation(e),
            other => ParseError::Lex(other),
        }
    }
}

impl From<ValidationError> for ParseError {
    fn from(err: ValidationError) -> Self {
        ParseError::Validation(err)
    }
}

/// A failed read of a `ValueTree` node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("expected {expected} but found {found}")]
    TypeMismatch { expected: NodeKind, found: NodeKind },

    #[error("no field named {0:?}")]
    NotFound(String),

    /// Also reported when the node holds no elements at all: indexing an
    /// object or a scalar finds `len` 0.
    #[error("index {index} is out of range: {found} of length {len}")]
    IndexOutOfRange {
        index: usize,
        len: usize,
        found: NodeKind,
    },

    #[error("expected a {expected} scalar but found {found}")]
    KindMismatch {
        expected: ScalarKind,
        found: ScalarKind,
    },

    #[error("{text:?} is not representable as {target}")]
    OutOfRange { text: String, target: &'static str },
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn span(line: usize, start: usize, end: usize) -> Span {
        Span::new(Location::new(line, start), Location::new(line, end))
    }

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError::new(ValidationReason::FieldNameNotString, span(10, 5, 6));
        assert_eq!(
            error.to_string(),
            "object field name must be a string at line 10, column 5 to line 10, column 6"
        );
    }

    #[test]
    fn test_rejection_becomes_validation_error() {
        let rejected = LexError::Rejected(ValidationError::new(
            ValidationReason::NoStartToken,
            span(0, 0, 0),
        ));
        let err = ParseError::from(rejected);
        assert_eq!(
            err.as_validation().map(|e| e.reason),
            Some(ValidationReason::NoStartToken)
        );
        assert_eq!(err.location(), Location::new(0, 0));
    }

    #[test]
    fn test_lex_error_display() {
        let err = LexError::NoMatch {
            ch: '?',
            at: Location::new(2, 7),
        };
        assert_eq!(err.to_string(), "no token type starts with '?' at line 2, column 7");
        assert_eq!(ParseError::from(err).location(), Location::new(2, 7));
    }

    #[test]
    fn test_unexpected_end_display() {
        let err = ParseError::UnexpectedEnd {
            structure: Structure::Array,
            opened: Location::new(0, 3),
            at: Location::new(1, 0),
        };
        assert_eq!(
            err.to_string(),
            "unexpected end of input at line 1, column 0: array opened at line 0, column 3 is not closed"
        );
    }
}
