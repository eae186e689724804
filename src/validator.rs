//! Grammar validation: the pushdown state machine for JSON-like documents.
//!
//! The `Engine` hands every finished token to its attached `Validator`. The
//! JSON validator keeps one `Frame` per open nesting level; the frame on top
//! of the stack says what may come next at that level. Opening brackets push
//! a frame, the matching closer pops it, and everything else moves the top
//! frame's state along or is rejected with a reason naming the broken
//! expectation.

use crate::error::{ValidationError, ValidationReason};
use crate::token::{Location, Token, TokenDesignation};
use std::fmt;
use tracing::trace;

/// A grammar check applied to each token as it leaves the engine.
pub trait Validator {
    /// Accepts or rejects `token` given everything checked since the last
    /// `reset`.
    fn check(&mut self, token: &Token) -> Result<(), ValidationError>;

    /// Forgets all state so the validator can check a new source.
    fn reset(&mut self);

    /// The innermost structure still open, with the location of its opening
    /// token. `None` when the input may legitimately end here.
    fn unclosed(&self) -> Option<(Structure, Location)> {
        None
    }
}

/// A nesting structure of the document grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    Object,
    Array,
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Structure::Object => "object",
            Structure::Array => "array",
        })
    }
}

/// What an object frame expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectState {
    /// A string field name, or `}`.
    FieldName,
    /// `:`
    FieldAssignment,
    /// An object, an array or a scalar.
    FieldValue,
    /// `,` or `}`.
    FieldSeparator,
}

/// What an array frame expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    /// An object, an array, a scalar, or `]`.
    Element,
    /// `,` or `]`.
    Separator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// The top-level expectation. `complete` once a top-level object or
    /// array has closed.
    Start { complete: bool },
    Object { state: ObjectState, opened: Location },
    Array { state: ArrayState, opened: Location },
    /// A bare scalar document: nothing may follow.
    Value,
}

/// How the stack changes after a token is accepted.
enum Step {
    Stay,
    Push(Frame),
    Pop,
}

/// Opens a nested structure for `token` if it is an opening bracket, or
/// accepts it as a plain scalar. `None` if it is neither.
fn value_step(token: &Token) -> Option<Step> {
    let opened = token.span().start;
    match token.designation() {
        TokenDesignation::StartObject => Some(Step::Push(Frame::Object {
            state: ObjectState::FieldName,
            opened,
        })),
        TokenDesignation::StartArray => Some(Step::Push(Frame::Array {
            state: ArrayState::Element,
            opened,
        })),
        d if d.is_scalar() => Some(Step::Stay),
        _ => None,
    }
}

/// The pushdown validator for the JSON-like document grammar.
///
/// Comments and whitespace tokens are ignored and never change state.
#[derive(Debug, Clone)]
pub struct JsonValidator {
    stack: Vec<Frame>,
    max_depth: usize,
}

impl JsonValidator {
    pub fn new() -> Self {
        Self::with_max_depth(crate::config::DEFAULT_MAX_DEPTH)
    }

    /// A validator refusing more than `max_depth` nested objects/arrays.
    pub fn with_max_depth(max_depth: usize) -> Self {
        JsonValidator {
            stack: vec![Frame::Start { complete: false }],
            max_depth,
        }
    }

    /// Number of frames on the stack, including the bottom Start frame.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn push(&mut self, frame: Frame) {
        trace!(depth = self.stack.len() + 1, frame = ?frame, "push");
        self.stack.push(frame);
    }

    fn pop(&mut self) {
        // The Start frame is never popped.
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        if let [Frame::Start { complete }] = self.stack.as_mut_slice() {
            *complete = true;
        }
        trace!(depth = self.stack.len(), "pop");
    }
}

impl Default for JsonValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for JsonValidator {
    fn check(&mut self, token: &Token) -> Result<(), ValidationError> {
        if token.is_trivia() {
            return Ok(());
        }
        let designation = token.designation();
        let reject = |reason| Err(ValidationError::new(reason, token.span()));
        // Checked before any frame state moves, so a refused opener leaves
        // the validator where it was.
        let max_depth = self.max_depth;
        let full = self.stack.len() > max_depth;
        let admit = |step: Step| match step {
            Step::Push(Frame::Object { .. } | Frame::Array { .. }) if full => Err(
                ValidationError::new(ValidationReason::DepthExceeded(max_depth), token.span()),
            ),
            step => Ok(step),
        };

        let Some(frame) = self.stack.last_mut() else {
            // Unreachable while the Start frame is never popped.
            return reject(ValidationReason::NoStartToken);
        };

        let step = match frame {
            Frame::Start { complete: true } => return reject(ValidationReason::TrailingToken),
            Frame::Start { complete: false } => match value_step(token) {
                Some(Step::Stay) => Step::Push(Frame::Value),
                Some(step) => admit(step)?,
                None => return reject(ValidationReason::NoStartToken),
            },
            Frame::Value => return reject(ValidationReason::TrailingScalar),

            Frame::Object { state, .. } => match (*state, designation) {
                (ObjectState::FieldName, TokenDesignation::EndObject) => Step::Pop,
                (ObjectState::FieldName, TokenDesignation::String) => {
                    *state = ObjectState::FieldAssignment;
                    Step::Stay
                }
                (ObjectState::FieldName, _) => {
                    return reject(ValidationReason::FieldNameNotString)
                }
                (ObjectState::FieldAssignment, TokenDesignation::FieldAssignment) => {
                    *state = ObjectState::FieldValue;
                    Step::Stay
                }
                (ObjectState::FieldAssignment, _) => {
                    return reject(ValidationReason::MissingAssignment)
                }
                (ObjectState::FieldValue, _) => match value_step(token) {
                    Some(step) => {
                        let step = admit(step)?;
                        *state = ObjectState::FieldSeparator;
                        step
                    }
                    None => return reject(ValidationReason::MissingFieldValue),
                },
                (ObjectState::FieldSeparator, TokenDesignation::FieldSeparator) => {
                    *state = ObjectState::FieldName;
                    Step::Stay
                }
                (ObjectState::FieldSeparator, TokenDesignation::EndObject) => Step::Pop,
                (ObjectState::FieldSeparator, _) => {
                    return reject(ValidationReason::ObjectSeparatorOrClose)
                }
            },

            Frame::Array { state, .. } => match (*state, designation) {
                (ArrayState::Element, TokenDesignation::EndArray) => Step::Pop,
                (ArrayState::Element, _) => match value_step(token) {
                    Some(step) => {
                        let step = admit(step)?;
                        *state = ArrayState::Separator;
                        step
                    }
                    None => return reject(ValidationReason::MissingElement),
                },
                (ArrayState::Separator, TokenDesignation::FieldSeparator) => {
                    *state = ArrayState::Element;
                    Step::Stay
                }
                (ArrayState::Separator, TokenDesignation::EndArray) => Step::Pop,
                (ArrayState::Separator, _) => {
                    return reject(ValidationReason::ArraySeparatorOrClose)
                }
            },
        };

        match step {
            Step::Stay => Ok(()),
            Step::Push(frame) => {
                self.push(frame);
                Ok(())
            }
            Step::Pop => {
                self.pop();
                Ok(())
            }
        }
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.stack.push(Frame::Start { complete: false });
    }

    fn unclosed(&self) -> Option<(Structure, Location)> {
        match self.stack.last()? {
            Frame::Object { opened, .. } => Some((Structure::Object, *opened)),
            Frame::Array { opened, .. } => Some((Structure::Array, *opened)),
            Frame::Start { .. } | Frame::Value => None,
        }
    }
}
