//! Parser limits and scanning options.

/// The default maximum nesting depth (e.g., `[[[]]]`) to prevent runaway input.
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// The deepest nesting the tree builder will descend into, whatever the
/// configured `max_depth`. The builder recurses once per level.
pub const MAX_SUPPORTED_DEPTH: usize = 512;
/// The default maximum number of characters read from one source (10M).
pub const DEFAULT_MAX_INPUT_CHARS: usize = 10 * 1024 * 1024;

/// Options shared by the `Engine` and the JSON validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest allowed object/array nesting.
    pub max_depth: usize,
    /// Characters the engine may read before failing, `None` for no limit.
    pub max_input_chars: Option<usize>,
    /// When `false` the engine hands whitespace to the descriptors instead
    /// of skipping it, so a grammar can keep it as tokens.
    pub skip_whitespace: bool,
}

impl ParserConfig {
    pub const fn new() -> Self {
        ParserConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_chars: Some(DEFAULT_MAX_INPUT_CHARS),
            skip_whitespace: true,
        }
    }

    /// No size limit, and nesting up to `MAX_SUPPORTED_DEPTH`. Only for
    /// trusted input.
    pub const fn unlimited() -> Self {
        ParserConfig {
            max_depth: MAX_SUPPORTED_DEPTH,
            max_input_chars: None,
            skip_whitespace: true,
        }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub const fn with_max_input_chars(mut self, max_input_chars: Option<usize>) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    pub const fn with_skip_whitespace(mut self, skip_whitespace: bool) -> Self {
        self.skip_whitespace = skip_whitespace;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}
