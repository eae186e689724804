//! # parsekit
//!
//! `parsekit` is a small toolkit for building tokenizers and parsers for
//! textual formats, in 100% safe Rust. It ships with a complete parser for a
//! JSON-like document format built from its own parts.
//!
//! ## Key Features
//!
//! * **Descriptor-driven tokenizer:** An `Engine` turns any `CharSource`
//!   into located `Token`s. What a token is gets decided by pluggable
//!   `TokenDescriptor`s; when several accept the same prefix, the engine
//!   narrows them down character by character.
//! * **Pluggable validation:** A `Validator` attached to the engine vets
//!   every token as it is produced. `JsonValidator` is a pushdown state
//!   machine with precise rejection reasons and a nesting-depth limit.
//! * **Lossless value tree:** Scalars keep their exact token text, so
//!   `to_text()` reproduces every number and string as written.
//! * **Comments:** `#`, `//` and `/* */` comments are accepted anywhere
//!   whitespace is.
//!
//! ## Quick Start
//!
//! ```
//! use parsekit::{parse, ScalarKind};
//!
//! let tree = parse(r#"{ "name": "Babbage", "born": 1791, "tags": ["math", true] }"#).unwrap();
//!
//! assert_eq!(tree.field("name").unwrap().scalar_text().unwrap(), "Babbage");
//! assert_eq!(tree.field("born").unwrap().as_scalar().unwrap().as_i64().unwrap(), 1791);
//! assert_eq!(
//!     tree.field("tags").unwrap().element(1).unwrap().scalar_kind().unwrap(),
//!     ScalarKind::Boolean
//! );
//! assert_eq!(tree.to_text(), r#"{"name":"Babbage","born":1791,"tags":["math",true]}"#);
//! ```
//!
//! ## Streaming Tokens
//!
//! `JsonParser::tokens` yields the validated tokens instead of a tree.
//!
//! ```
//! use parsekit::{JsonParser, StrSource, TokenDesignation};
//!
//! let mut parser = JsonParser::new();
//! let mut source = StrSource::new("[1, /* two */ 2.5]");
//! let designations: Vec<_> = parser
//!     .tokens(&mut source)
//!     .map(|token| token.unwrap().designation())
//!     .collect();
//!
//! assert_eq!(
//!     designations,
//!     vec![
//!         TokenDesignation::StartArray,
//!         TokenDesignation::Integer,
//!         TokenDesignation::FieldSeparator,
//!         TokenDesignation::Real,
//!         TokenDesignation::EndArray,
//!     ]
//! );
//! ```

/// Contains `ParserConfig` and the default limits.
pub mod config;
/// Contains the `TokenDescriptor` trait and the JSON descriptor set.
pub mod descriptor;
/// Contains the error types for every stage of a parse.
pub mod error;
/// Contains the tree builder (`JsonParser`, `Document`) and `TokenStream`.
pub mod parser;
/// Contains the `CharSource` trait and its implementations.
pub mod source;
/// Contains `Token` and its classification and location types.
pub mod token;
/// Contains the descriptor-driven tokenizer `Engine`.
pub mod tokenizer;
/// Contains the `Validator` trait and the JSON grammar state machine.
pub mod validator;
/// Contains the value tree and its serialization logic.
pub mod value;

// Re-export the public-facing types.
pub use config::{
    ParserConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_INPUT_CHARS, MAX_SUPPORTED_DEPTH,
};
pub use descriptor::{
    json_descriptors, BlockComment, Identifier, KeywordLiteral, LineComment, LineMarker,
    NumberLiteral, Punctuation, StringLiteral, TokenDescriptor, Whitespace,
};
pub use error::{AccessError, LexError, ParseError, ValidationError, ValidationReason};
pub use parser::{Document, JsonParser, TokenStream};
pub use source::{CharSource, ReaderSource, StrSource};
pub use token::{Location, Span, Token, TokenDesignation, TokenType};
pub use tokenizer::Engine;
pub use validator::{JsonValidator, Structure, Validator};
pub use value::{Field, NodeKind, Scalar, ScalarKind, Value, ValueTree};

/// Parses a JSON-like document held in a string slice.
///
/// This is shorthand for `Document::parse_str`, using the default
/// `ParserConfig` (depth limit 100, input limit 10M characters).
///
/// # Errors
/// Returns a `ParseError` describing the first problem found, with its
/// location in the input.
///
/// # Examples
/// ```
/// use parsekit::{parse, ValidationReason};
///
/// let err = parse(r#"{"f3":true "f4":false}"#).unwrap_err();
/// assert_eq!(
///     err.as_validation().map(|e| e.reason),
///     Some(ValidationReason::ObjectSeparatorOrClose)
/// );
/// assert_eq!(
///     err.to_string(),
///     "expected field separator or closing brace at line 0, column 11 to line 0, column 14"
/// );
/// ```
pub fn parse(input: &str) -> Result<ValueTree, ParseError> {
    Document::parse_str(input)
}
