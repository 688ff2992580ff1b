//! Writer configuration for generated source.

use throwgen_core::conventions::STATEMENT_TERMINATOR;

/// Default indent unit: four spaces per level.
pub const DEFAULT_INDENT_UNIT: &str = "    ";

/// Layout configuration for [`IndentedWriter`](super::IndentedWriter)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// String written once per indentation level at the start of a line
    pub indent_unit: String,
    /// Token appended by `statement()` before the newline
    pub statement_terminator: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent_unit: DEFAULT_INDENT_UNIT.to_string(),
            statement_terminator: STATEMENT_TERMINATOR.to_string(),
        }
    }
}

impl WriterConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indent unit string
    pub fn with_indent_unit(mut self, unit: impl Into<String>) -> Self {
        self.indent_unit = unit.into();
        self
    }

    /// Use `width` spaces as the indent unit
    pub fn with_indent_width(self, width: usize) -> Self {
        self.with_indent_unit(" ".repeat(width))
    }
}
