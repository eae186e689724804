//! Token descriptors: one stateful recognizer per lexical category.
//!
//! The `Engine` never knows what a string or a number looks like. It offers
//! each character to the descriptors it was configured with and lets them
//! decide. A descriptor keeps the scan state for the token in progress in a
//! small stage enum, reset whenever `is_start` or `init` is called, so nothing
//! leaks from one token into the next.
//!
//! Descriptors only change state when they *accept* a character. A rejected
//! character leaves the descriptor exactly as it was, so its `designation`
//! and `is_complete` answers still describe the text accepted so far.

use crate::token::{TokenDesignation, TokenType};
use std::fmt;

/// A recognizer for one lexical category.
pub trait TokenDescriptor: fmt::Debug {
    /// Resets the scan state before a fresh source is scanned.
    fn init(&mut self) {}

    /// Whether `ch` can begin a token of this category. Resets scan state.
    fn is_start(&mut self, ch: char) -> bool;

    /// Whether `ch` extends the token currently being scanned.
    fn is_continuation(&mut self, ch: char) -> bool;

    /// Whether the characters accepted so far form a whole token.
    fn is_complete(&self) -> bool {
        true
    }

    fn kind(&self) -> TokenType;

    /// May depend on the scan state, e.g. integer vs real numbers.
    fn designation(&self) -> TokenDesignation;
}

/// A strictly single-character token such as `{` or `,`.
#[derive(Debug, Clone)]
pub struct Punctuation {
    ch: char,
    designation: TokenDesignation,
}

impl Punctuation {
    /// Recognizes the single character `ch` as a `designation` token.
    pub const fn new(ch: char, designation: TokenDesignation) -> Self {
        Punctuation { ch, designation }
    }

    /// `{`
    pub const fn start_object() -> Self {
        Self::new('{', TokenDesignation::StartObject)
    }

    /// `}`
    pub const fn end_object() -> Self {
        Self::new('}', TokenDesignation::EndObject)
    }

    /// `[`
    pub const fn start_array() -> Self {
        Self::new('[', TokenDesignation::StartArray)
    }

    /// `]`
    pub const fn end_array() -> Self {
        Self::new(']', TokenDesignation::EndArray)
    }

    /// `,` between fields and between elements.
    pub const fn field_separator() -> Self {
        Self::new(',', TokenDesignation::FieldSeparator)
    }

    /// `:` between a field name and its value.
    pub const fn field_assignment() -> Self {
        Self::new(':', TokenDesignation::FieldAssignment)
    }
}

impl TokenDescriptor for Punctuation {
    fn is_start(&mut self, ch: char) -> bool {
        ch == self.ch
    }

    fn is_continuation(&mut self, _ch: char) -> bool {
        false
    }

    fn kind(&self) -> TokenType {
        TokenType::Operator
    }

    fn designation(&self) -> TokenDesignation {
        self.designation
    }
}

/// Which opener a `LineComment` answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMarker {
    /// `# ...`
    Hash,
    /// `// ...`
    DoubleSlash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineStage {
    /// Seen the first `/` of `//`.
    Opener,
    Body,
    /// Accepted the terminating newline.
    Closed,
}

/// A comment running to the end of the line, newline included.
#[derive(Debug, Clone)]
pub struct LineComment {
    marker: LineMarker,
    stage: LineStage,
}

impl LineComment {
    /// A comment running from `marker` to the end of the line.
    pub const fn new(marker: LineMarker) -> Self {
        LineComment {
            marker,
            stage: LineStage::Body,
        }
    }

    pub const fn hash() -> Self {
        Self::new(LineMarker::Hash)
    }

    pub const fn double_slash() -> Self {
        Self::new(LineMarker::DoubleSlash)
    }
}

impl TokenDescriptor for LineComment {
    fn init(&mut self) {
        self.stage = LineStage::Body;
    }

    fn is_start(&mut self, ch: char) -> bool {
        match (self.marker, ch) {
            (LineMarker::Hash, '#') => {
                self.stage = LineStage::Body;
                true
            }
            (LineMarker::DoubleSlash, '/') => {
                self.stage = LineStage::Opener;
                true
            }
            _ => false,
        }
    }

    fn is_continuation(&mut self, ch: char) -> bool {
        match self.stage {
            LineStage::Opener if ch == '/' => {
                self.stage = LineStage::Body;
                true
            }
            LineStage::Opener => false,
            LineStage::Body => {
                if ch == '\n' {
                    self.stage = LineStage::Closed;
                }
                true
            }
            LineStage::Closed => false,
        }
    }

    // A comment on the last line may end with the input instead of a newline.
    fn is_complete(&self) -> bool {
        self.stage != LineStage::Opener
    }

    fn kind(&self) -> TokenType {
        TokenType::Comment
    }

    fn designation(&self) -> TokenDesignation {
        TokenDesignation::Comment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockStage {
    /// Seen `/`, need `*`.
    Opener,
    Body,
    /// Seen a `*` that may start the closer.
    Star,
    Closed,
}

/// A `/* ... */` comment. Does not nest.
#[derive(Debug, Clone)]
pub struct BlockComment {
    stage: BlockStage,
}

impl BlockComment {
    pub const fn new() -> Self {
        BlockComment {
            stage: BlockStage::Opener,
        }
    }
}

impl Default for BlockComment {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenDescriptor for BlockComment {
    fn init(&mut self) {
        self.stage = BlockStage::Opener;
    }

    fn is_start(&mut self, ch: char) -> bool {
        self.stage = BlockStage::Opener;
        ch == '/'
    }

    fn is_continuation(&mut self, ch: char) -> bool {
        self.stage = match (self.stage, ch) {
            (BlockStage::Opener, '*') => BlockStage::Body,
            (BlockStage::Opener, _) | (BlockStage::Closed, _) => return false,
            (BlockStage::Body, '*') | (BlockStage::Star, '*') => BlockStage::Star,
            (BlockStage::Star, '/') => BlockStage::Closed,
            (BlockStage::Body, _) | (BlockStage::Star, _) => BlockStage::Body,
        };
        true
    }

    fn is_complete(&self) -> bool {
        self.stage == BlockStage::Closed
    }

    fn kind(&self) -> TokenType {
        TokenType::Comment
    }

    fn designation(&self) -> TokenDesignation {
        TokenDesignation::Comment
    }
}

/// A run of whitespace. Only reachable when the engine does not skip
/// whitespace itself.
#[derive(Debug, Clone, Default)]
pub struct Whitespace;

impl TokenDescriptor for Whitespace {
    fn is_start(&mut self, ch: char) -> bool {
        ch.is_whitespace()
    }

    fn is_continuation(&mut self, ch: char) -> bool {
        ch.is_whitespace()
    }

    fn kind(&self) -> TokenType {
        TokenType::Whitespace
    }

    fn designation(&self) -> TokenDesignation {
        TokenDesignation::Whitespace
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberStage {
    /// Seen a leading `-`, need a digit.
    Sign,
    Integer,
    /// Seen `.`, need a digit.
    FractionStart,
    Fraction,
    /// Seen `e` or `E`, need a sign or a digit.
    ExponentStart,
    /// Seen the exponent sign, need a digit.
    ExponentSign,
    Exponent,
}

/// `-?digits(.digits)?([eE][+-]?digits)?`
#[derive(Debug, Clone)]
pub struct NumberLiteral {
    stage: NumberStage,
}

impl NumberLiteral {
    pub const fn new() -> Self {
        NumberLiteral {
            stage: NumberStage::Integer,
        }
    }
}

impl Default for NumberLiteral {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenDescriptor for NumberLiteral {
    fn init(&mut self) {
        self.stage = NumberStage::Integer;
    }

    fn is_start(&mut self, ch: char) -> bool {
        self.stage = if ch == '-' {
            NumberStage::Sign
        } else {
            NumberStage::Integer
        };
        ch == '-' || ch.is_ascii_digit()
    }

    fn is_continuation(&mut self, ch: char) -> bool {
        use NumberStage::*;
        let next = match (self.stage, ch) {
            (Sign | Integer, '0'..='9') => Integer,
            (Integer, '.') => FractionStart,
            (FractionStart | Fraction, '0'..='9') => Fraction,
            (Integer | Fraction, 'e' | 'E') => ExponentStart,
            (ExponentStart, '+' | '-') => ExponentSign,
            (ExponentStart | ExponentSign | Exponent, '0'..='9') => Exponent,
            _ => return false,
        };
        self.stage = next;
        true
    }

    fn is_complete(&self) -> bool {
        matches!(
            self.stage,
            NumberStage::Integer | NumberStage::Fraction | NumberStage::Exponent
        )
    }

    fn kind(&self) -> TokenType {
        TokenType::Identifier
    }

    fn designation(&self) -> TokenDesignation {
        match self.stage {
            NumberStage::Sign | NumberStage::Integer => TokenDesignation::Integer,
            _ => TokenDesignation::Real,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordStage {
    Idle,
    Matching { word: &'static str, matched: usize },
}

/// One of a fixed set of words with distinct first characters, such as
/// `true`/`false` or `null`.
#[derive(Debug, Clone)]
pub struct KeywordLiteral {
    words: &'static [&'static str],
    designation: TokenDesignation,
    stage: WordStage,
}

impl KeywordLiteral {
    /// Matches any of `words` exactly and tags it with `designation`.
    pub const fn new(words: &'static [&'static str], designation: TokenDesignation) -> Self {
        KeywordLiteral {
            words,
            designation,
            stage: WordStage::Idle,
        }
    }

    pub const fn boolean() -> Self {
        Self::new(&["true", "false"], TokenDesignation::Boolean)
    }

    pub const fn null() -> Self {
        Self::new(&["null"], TokenDesignation::Null)
    }
}

impl TokenDescriptor for KeywordLiteral {
    fn init(&mut self) {
        self.stage = WordStage::Idle;
    }

    fn is_start(&mut self, ch: char) -> bool {
        self.stage = self
            .words
            .iter()
            .find(|word| word.starts_with(ch))
            .map_or(WordStage::Idle, |&word| WordStage::Matching {
                word,
                matched: ch.len_utf8(),
            });
        self.stage != WordStage::Idle
    }

    fn is_continuation(&mut self, ch: char) -> bool {
        match self.stage {
            WordStage::Matching { word, matched } if word[matched..].starts_with(ch) => {
                self.stage = WordStage::Matching {
                    word,
                    matched: matched + ch.len_utf8(),
                };
                true
            }
            _ => false,
        }
    }

    fn is_complete(&self) -> bool {
        matches!(self.stage, WordStage::Matching { word, matched } if matched == word.len())
    }

    fn kind(&self) -> TokenType {
        TokenType::Identifier
    }

    fn designation(&self) -> TokenDesignation {
        self.designation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringStage {
    Body,
    /// The previous character was an unescaped `\`.
    Escape,
    Closed,
}

/// A double-quoted string. The token keeps both quotes; escape sequences are
/// only skipped over here, decoding happens on access.
#[derive(Debug, Clone)]
pub struct StringLiteral {
    stage: StringStage,
}

impl StringLiteral {
    pub const fn new() -> Self {
        StringLiteral {
            stage: StringStage::Body,
        }
    }
}

impl Default for StringLiteral {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenDescriptor for StringLiteral {
    fn init(&mut self) {
        self.stage = StringStage::Body;
    }

    fn is_start(&mut self, ch: char) -> bool {
        self.stage = StringStage::Body;
        ch == '"'
    }

    fn is_continuation(&mut self, ch: char) -> bool {
        self.stage = match (self.stage, ch) {
            (StringStage::Closed, _) => return false,
            (StringStage::Escape, _) => StringStage::Body,
            (StringStage::Body, '\\') => StringStage::Escape,
            (StringStage::Body, '"') => StringStage::Closed,
            (StringStage::Body, _) => StringStage::Body,
        };
        true
    }

    fn is_complete(&self) -> bool {
        self.stage == StringStage::Closed
    }

    fn kind(&self) -> TokenType {
        TokenType::Identifier
    }

    fn designation(&self) -> TokenDesignation {
        TokenDesignation::String
    }
}

/// A bare word of letters, digits and underscores.
#[derive(Debug, Clone, Default)]
pub struct Identifier;

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

impl TokenDescriptor for Identifier {
    fn is_start(&mut self, ch: char) -> bool {
        is_identifier_char(ch)
    }

    fn is_continuation(&mut self, ch: char) -> bool {
        is_identifier_char(ch)
    }

    fn kind(&self) -> TokenType {
        TokenType::Identifier
    }

    fn designation(&self) -> TokenDesignation {
        TokenDesignation::Identifier
    }
}

/// A fresh descriptor set for the JSON-like document grammar.
///
/// Order matters only when several candidates survive to the end of a
/// token: numbers and keywords are registered before `Identifier`, so
/// `123` and `true` keep their specific designations while `123abc` and
/// `trueish` become identifiers.
pub fn json_descriptors() -> Vec<Box<dyn TokenDescriptor>> {
    vec![
        Box::new(LineComment::hash()),
        Box::new(LineComment::double_slash()),
        Box::new(BlockComment::new()),
        Box::new(NumberLiteral::new()),
        Box::new(KeywordLiteral::boolean()),
        Box::new(KeywordLiteral::null()),
        Box::new(Punctuation::field_separator()),
        Box::new(Punctuation::field_assignment()),
        Box::new(StringLiteral::new()),
        Box::new(Punctuation::start_object()),
        Box::new(Punctuation::end_object()),
        Box::new(Punctuation::start_array()),
        Box::new(Punctuation::end_array()),
        Box::new(Identifier),
    ]
}
