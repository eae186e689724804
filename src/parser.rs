//! Contains the tree builder and the element stream.
//!
//! `JsonParser` owns an `Engine` loaded with the JSON descriptor set and a
//! `JsonValidator`, so every token it sees has already been accepted by the
//! grammar. Building the tree is then a matter of one function per
//! nonterminal: `build_object`, `build_array` and `build_value`.
//!
//! `TokenStream` exposes the same validated tokens as an `Iterator` for
//! callers that want the elements rather than a tree.

use crate::config::{ParserConfig, DEFAULT_MAX_DEPTH, MAX_SUPPORTED_DEPTH};
use crate::descriptor::json_descriptors;
use crate::error::{ParseError, ValidationError, ValidationReason};
use crate::source::{CharSource, ReaderSource, StrSource};
use crate::token::{Location, Token, TokenDesignation};
use crate::tokenizer::Engine;
use crate::validator::{JsonValidator, Structure};
use crate::value::{Field, Scalar, Value, ValueTree};
use std::io::BufRead;
use tracing::debug;

/// A reusable parser for JSON-like documents.
///
/// Each call to `parse` or `tokens` resets the engine, so one parser can
/// read any number of sources one after another.
///
/// The builder refuses to nest deeper than its own `max_depth`, never more
/// than `MAX_SUPPORTED_DEPTH`, even when the engine's validator would allow
/// it.
#[derive(Debug)]
pub struct JsonParser {
    engine: Engine,
    max_depth: usize,
}

/// Reports a token the builder has no place for.
fn unexpected(token: Token) -> ParseError {
    let designation = token.designation();
    let span = token.span();
    ParseError::Unexpected {
        designation,
        text: token.into_text(),
        span,
    }
}

impl JsonParser {
    /// A parser with the default limits.
    pub fn new() -> Self {
        Self::with_config(&ParserConfig::default())
    }

    /// A parser whose engine and validator follow `config`.
    pub fn with_config(config: &ParserConfig) -> Self {
        let max_depth = config.max_depth.min(MAX_SUPPORTED_DEPTH);
        let mut engine = Engine::with_config(json_descriptors(), config);
        engine.attach_validator(JsonValidator::with_max_depth(max_depth));
        JsonParser { engine, max_depth }
    }

    /// Builds trees from a caller-assembled engine, e.g. one with extra
    /// descriptors or a stricter validator. Tokens the builder cannot place
    /// are reported as `ParseError::Unexpected`. Nesting is limited to
    /// `DEFAULT_MAX_DEPTH` until `with_max_depth` says otherwise.
    pub fn with_engine(engine: Engine) -> Self {
        JsonParser {
            engine,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the builder's nesting limit, capped at `MAX_SUPPORTED_DEPTH`.
    /// The engine's validator keeps its own limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_SUPPORTED_DEPTH);
        self
    }

    /// Hands back the engine, with its validator still attached.
    pub fn into_engine(self) -> Engine {
        self.engine
    }

    /// Parses one complete document from `source`.
    ///
    /// # Errors
    /// Returns a `ParseError` for a character no descriptor accepts, a token
    /// the grammar refuses, input ending inside an object or array, or an
    /// input holding nothing but whitespace and comments.
    pub fn parse<S>(&mut self, source: &mut S) -> Result<ValueTree, ParseError>
    where
        S: CharSource + ?Sized,
    {
        self.engine.reset();
        let Some(first) = self.next_significant(source)? else {
            return Err(ParseError::EmptyInput {
                at: self.engine.location(),
            });
        };
        let root = self.build_value(source, first, 0)?;

        // The validator refuses anything after a complete document; this
        // catches the rest for engines assembled without one.
        if let Some(token) = self.next_significant(source)? {
            return Err(unexpected(token));
        }
        debug!(
            kind = %root.node_kind(),
            len = root.len(),
            end = %self.engine.location(),
            "document parsed"
        );
        Ok(ValueTree::new(root))
    }

    /// Streams the validated, comment-free tokens of `source`.
    pub fn tokens<'p, S>(&'p mut self, source: &'p mut S) -> TokenStream<'p, S>
    where
        S: CharSource + ?Sized,
    {
        self.engine.reset();
        TokenStream {
            parser: self,
            source,
            done: false,
        }
    }

    /// The next token that is not a comment or whitespace.
    fn next_significant<S>(&mut self, source: &mut S) -> Result<Option<Token>, ParseError>
    where
        S: CharSource + ?Sized,
    {
        while let Some(token) = self.engine.next_token(source)? {
            if !token.is_trivia() {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }

    /// Like `next_significant`, but end of input is an error: `structure`
    /// opened at `opened` is still waiting to be closed.
    fn expect_token<S>(
        &mut self,
        source: &mut S,
        structure: Structure,
        opened: Location,
    ) -> Result<Token, ParseError>
    where
        S: CharSource + ?Sized,
    {
        match self.next_significant(source)? {
            Some(token) => Ok(token),
            None => Err(ParseError::UnexpectedEnd {
                structure,
                opened,
                at: self.engine.location(),
            }),
        }
    }

    /// Builds the node starting at `token`, `depth` structures deep: recurses
    /// into objects and arrays, wraps anything else as a scalar leaf.
    fn build_value<S>(
        &mut self,
        source: &mut S,
        token: Token,
        depth: usize,
    ) -> Result<Value, ParseError>
    where
        S: CharSource + ?Sized,
    {
        let designation = token.designation();
        if matches!(
            designation,
            TokenDesignation::StartObject | TokenDesignation::StartArray
        ) && depth >= self.max_depth
        {
            return Err(ValidationError::new(
                ValidationReason::DepthExceeded(self.max_depth),
                token.span(),
            )
            .into());
        }
        match designation {
            TokenDesignation::StartObject => {
                self.build_object(source, token.span().start, depth + 1)
            }
            TokenDesignation::StartArray => self.build_array(source, token.span().start, depth + 1),
            designation => match designation.scalar_kind() {
                Some(kind) => {
                    let span = token.span();
                    Ok(Value::Scalar(Scalar::new(token.into_text(), kind, span)))
                }
                None => Err(unexpected(token)),
            },
        }
    }

    /// Builds an object whose `{` sat at `opened`; its values sit at `depth`.
    fn build_object<S>(
        &mut self,
        source: &mut S,
        opened: Location,
        depth: usize,
    ) -> Result<Value, ParseError>
    where
        S: CharSource + ?Sized,
    {
        let mut fields = Vec::new();
        let mut token = self.expect_token(source, Structure::Object, opened)?;
        loop {
            match token.designation() {
                TokenDesignation::EndObject => break,
                TokenDesignation::String => {}
                _ => return Err(unexpected(token)),
            }
            let raw_name = token.into_text();

            let assignment = self.expect_token(source, Structure::Object, opened)?;
            if assignment.designation() != TokenDesignation::FieldAssignment {
                return Err(unexpected(assignment));
            }
            let value_token = self.expect_token(source, Structure::Object, opened)?;
            let value = self.build_value(source, value_token, depth)?;
            fields.push(Field::new(raw_name, value));

            let next = self.expect_token(source, Structure::Object, opened)?;
            match next.designation() {
                // A `,` may be followed directly by `}`.
                TokenDesignation::FieldSeparator => {
                    token = self.expect_token(source, Structure::Object, opened)?;
                }
                TokenDesignation::EndObject => break,
                _ => return Err(unexpected(next)),
            }
        }
        Ok(Value::Object(fields))
    }

    /// Builds an array whose `[` sat at `opened`; its elements sit at `depth`.
    fn build_array<S>(
        &mut self,
        source: &mut S,
        opened: Location,
        depth: usize,
    ) -> Result<Value, ParseError>
    where
        S: CharSource + ?Sized,
    {
        let mut elements = Vec::new();
        let mut token = self.expect_token(source, Structure::Array, opened)?;
        loop {
            if token.designation() == TokenDesignation::EndArray {
                break;
            }
            elements.push(self.build_value(source, token, depth)?);

            let next = self.expect_token(source, Structure::Array, opened)?;
            match next.designation() {
                TokenDesignation::FieldSeparator => {
                    token = self.expect_token(source, Structure::Array, opened)?;
                }
                TokenDesignation::EndArray => break,
                _ => return Err(unexpected(next)),
            }
        }
        Ok(Value::Array(elements))
    }
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new()
    }
}

/// An `Iterator` over the validated tokens of one source.
///
/// Comments and whitespace are filtered out. The stream ends after the first
/// error; ending inside an object or array yields `ParseError::UnexpectedEnd`
/// naming the innermost structure left open.
#[derive(Debug)]
pub struct TokenStream<'p, S: ?Sized> {
    parser: &'p mut JsonParser,
    source: &'p mut S,
    done: bool,
}

impl<S> Iterator for TokenStream<'_, S>
where
    S: CharSource + ?Sized,
{
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = match self.parser.next_significant(&mut *self.source) {
            Ok(Some(token)) => return Some(Ok(token)),
            Ok(None) => {
                let engine = &self.parser.engine;
                match engine.validator().and_then(|v| v.unclosed()) {
                    Some((structure, opened)) => Err(ParseError::UnexpectedEnd {
                        structure,
                        opened,
                        at: engine.location(),
                    }),
                    None => {
                        self.done = true;
                        return None;
                    }
                }
            }
            Err(e) => Err(e),
        };
        self.done = true;
        Some(result)
    }
}

/// One-shot entry points that parse a single document with the default
/// configuration.
#[derive(Debug, Clone, Copy)]
pub struct Document;

impl Document {
    /// Parses one document from any `CharSource`.
    pub fn parse<S>(source: &mut S) -> Result<ValueTree, ParseError>
    where
        S: CharSource + ?Sized,
    {
        JsonParser::new().parse(source)
    }

    pub fn parse_str(input: &str) -> Result<ValueTree, ParseError> {
        Self::parse(&mut StrSource::new(input))
    }

    /// Parses a document decoded as UTF-8 from `reader`.
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<ValueTree, ParseError> {
        Self::parse(&mut ReaderSource::new(reader))
    }
}
