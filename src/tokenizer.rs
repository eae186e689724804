//! The descriptor-driven tokenizer engine.
//!
//! The engine reads one character at a time from a `CharSource` and hands it
//! to the configured `TokenDescriptor`s. It knows nothing about any grammar:
//! which descriptors accept a character, and which of them survive the
//! characters that follow, decides what each token is.
//!
//! Exactly one character of lookahead is carried between calls. The
//! character that ends a token is not part of it; it is kept in `lookahead`
//! and becomes the first character examined by the next call.

use crate::config::ParserConfig;
use crate::descriptor::TokenDescriptor;
use crate::error::LexError;
use crate::source::CharSource;
use crate::token::{Location, Span, Token};
use crate::validator::Validator;
use tracing::{debug, trace};

/// Turns a character stream into located tokens using a descriptor set.
pub struct Engine {
    /// The configured descriptors, in registration order.
    descriptors: Vec<Box<dyn TokenDescriptor>>,
    /// Indices into `descriptors` still in the running for the current token.
    candidates: Vec<usize>,
    /// Text of the token being scanned.
    text: String,
    /// The character read past the end of the previous token.
    lookahead: Option<char>,
    /// Where `lookahead` sits in the source.
    lookahead_at: Location,
    /// Set once the source has reported end of stream.
    exhausted: bool,
    /// Location of the next character to be read.
    cursor: Location,
    /// Characters read from the current source.
    consumed: usize,
    max_input_chars: Option<usize>,
    skip_whitespace: bool,
    validator: Option<Box<dyn Validator>>,
}

impl Engine {
    /// Creates an engine with the default `ParserConfig`.
    pub fn new(descriptors: Vec<Box<dyn TokenDescriptor>>) -> Self {
        Self::with_config(descriptors, &ParserConfig::default())
    }

    /// Creates an engine reading with `config`'s input limit and whitespace
    /// handling. The depth limit belongs to the validator, not the engine.
    pub fn with_config(descriptors: Vec<Box<dyn TokenDescriptor>>, config: &ParserConfig) -> Self {
        let mut engine = Engine {
            candidates: Vec::with_capacity(descriptors.len()),
            descriptors,
            text: String::new(),
            lookahead: None,
            lookahead_at: Location::default(),
            exhausted: false,
            cursor: Location::default(),
            consumed: 0,
            max_input_chars: config.max_input_chars,
            skip_whitespace: config.skip_whitespace,
            validator: None,
        };
        engine.reset();
        engine
    }

    /// Attaches the validator every finished token is checked against,
    /// replacing any previous one.
    pub fn attach_validator<V: Validator + 'static>(&mut self, validator: V) {
        self.validator = Some(Box::new(validator));
    }

    /// Removes the attached validator; later tokens go unchecked.
    pub fn detach_validator(&mut self) -> Option<Box<dyn Validator>> {
        self.validator.take()
    }

    /// The attached validator, if any.
    pub fn validator(&self) -> Option<&dyn Validator> {
        self.validator.as_deref()
    }

    /// Prepares the engine for a new source: position tracking, lookahead,
    /// descriptor state and the validator all start over.
    pub fn reset(&mut self) {
        self.lookahead = None;
        self.lookahead_at = Location::default();
        self.exhausted = false;
        self.cursor = Location::default();
        self.consumed = 0;
        self.text.clear();
        self.candidates.clear();
        for descriptor in &mut self.descriptors {
            descriptor.init();
        }
        if let Some(validator) = self.validator.as_mut() {
            validator.reset();
        }
        debug!(descriptors = self.descriptors.len(), "engine reset");
    }

    /// The location of the next unread character (end of input once the
    /// source is exhausted).
    pub fn location(&self) -> Location {
        if self.lookahead.is_some() {
            self.lookahead_at
        } else {
            self.cursor
        }
    }

    /// Reads one character, advancing the cursor. Returns the character and
    /// its own location.
    fn read_next<S>(&mut self, source: &mut S) -> Result<Option<(char, Location)>, LexError>
    where
        S: CharSource + ?Sized,
    {
        if self.exhausted {
            return Ok(None);
        }
        let at = self.cursor;
        let ch = source
            .next_char()
            .map_err(|err| LexError::Io { source: err, at })?;
        let Some(ch) = ch else {
            self.exhausted = true;
            return Ok(None);
        };

        self.consumed += 1;
        if let Some(limit) = self.max_input_chars {
            if self.consumed > limit {
                return Err(LexError::InputTooLarge { limit, at });
            }
        }
        if ch == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 0;
        } else {
            self.cursor.column += 1;
        }
        Ok(Some((ch, at)))
    }

    /// Takes the carried lookahead, or reads a fresh character.
    fn first_char<S>(&mut self, source: &mut S) -> Result<Option<(char, Location)>, LexError>
    where
        S: CharSource + ?Sized,
    {
        match self.lookahead.take() {
            Some(ch) => Ok(Some((ch, self.lookahead_at))),
            None => self.read_next(source),
        }
    }

    /// Scans the next token from `source`.
    ///
    /// Returns `Ok(None)` at end of stream when no token is pending. A
    /// finished token is checked by the attached validator, if any, before
    /// it is returned.
    pub fn next_token<S>(&mut self, source: &mut S) -> Result<Option<Token>, LexError>
    where
        S: CharSource + ?Sized,
    {
        // 1. Skip whitespace between tokens.
        let Some((mut ch, mut at)) = self.first_char(source)? else {
            return Ok(None);
        };
        while self.skip_whitespace && ch.is_whitespace() {
            match self.read_next(source)? {
                Some((next, next_at)) => (ch, at) = (next, next_at),
                None => return Ok(None),
            }
        }

        // 2. Every descriptor that accepts the first character is a candidate.
        self.candidates.clear();
        for (index, descriptor) in self.descriptors.iter_mut().enumerate() {
            if descriptor.is_start(ch) {
                self.candidates.push(index);
            }
        }
        if self.candidates.is_empty() {
            return Err(LexError::NoMatch { ch, at });
        }

        self.text.clear();
        self.text.push(ch);
        let start = at;
        let mut end = at;

        // 3. Narrow the candidates until one is left, then let it decide
        //    alone where the token ends.
        let mut resolved = self.candidates.len() == 1;
        while let Some((next, next_at)) = self.read_next(source)? {
            if resolved {
                if !self.descriptors[self.candidates[0]].is_continuation(next) {
                    self.lookahead = Some(next);
                    self.lookahead_at = next_at;
                    break;
                }
            } else {
                let first_alive = self.candidates[0];
                let descriptors = &mut self.descriptors;
                self.candidates
                    .retain(|&index| descriptors[index].is_continuation(next));
                match self.candidates.len() {
                    0 => {
                        // Nobody takes the character: the token ends here and
                        // keeps the first-registered surviving type.
                        self.candidates.push(first_alive);
                        self.lookahead = Some(next);
                        self.lookahead_at = next_at;
                        break;
                    }
                    1 => resolved = true,
                    _ => {}
                }
            }
            self.text.push(next);
            end = next_at;
        }

        // 4. The first-registered survivor owns the token.
        let descriptor = &self.descriptors[self.candidates[0]];
        let span = Span::new(start, end);
        if !descriptor.is_complete() {
            return Err(LexError::Incomplete {
                designation: descriptor.designation(),
                text: std::mem::take(&mut self.text),
                span,
            });
        }
        let token = Token::new(
            descriptor.kind(),
            descriptor.designation(),
            self.text.as_str(),
            span,
        );
        trace!(
            designation = %token.designation(),
            text = token.text(),
            line = start.line,
            column = start.column,
            "token"
        );

        // 5. The validator has the last word.
        if let Some(validator) = self.validator.as_mut() {
            validator.check(&token)?;
        }
        Ok(Some(token))
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("descriptors", &self.descriptors)
            .field("lookahead", &self.lookahead)
            .field("cursor", &self.cursor)
            .field("exhausted", &self.exhausted)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}
