//! Output writer with indentation tracking
//!
//! Builds brace-structured source text line by line. The writer knows nothing about the emitted
//! language beyond the indent unit and the statement terminator.

use super::config::WriterConfig;

/// Writer that tracks indentation and builds generated output
///
/// Every operation returns `&mut Self` so emission code can chain tokens the way the output reads:
///
/// ```rust
/// use throwgen::format::IndentedWriter;
///
/// let mut w = IndentedWriter::default();
/// w.token("class C").line().token("{").line().indent();
/// w.token("int x").statement();
/// w.dedent().token("}").line();
/// assert_eq!(w.finish(), "class C\n{\n    int x;\n}\n");
/// ```
#[derive(Debug)]
pub struct IndentedWriter {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Configuration
    config: WriterConfig,
    /// Whether we're at the start of a line
    at_line_start: bool,
}

impl Default for IndentedWriter {
    fn default() -> Self {
        Self::new(WriterConfig::default())
    }
}

impl IndentedWriter {
    /// Create a new writer with the given config
    pub fn new(config: WriterConfig) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            config,
            at_line_start: true,
        }
    }

    /// Get the generated output
    pub fn finish(self) -> String {
        self.output
    }

    /// Increase indentation level for lines started from now on
    pub fn indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    /// Decrease indentation level for lines started from now on
    pub fn dedent(&mut self) -> &mut Self {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
        self
    }

    /// Write indentation if at line start
    fn write_indent(&mut self) {
        if self.at_line_start {
            for _ in 0..self.indent_level {
                self.output.push_str(&self.config.indent_unit);
            }
            self.at_line_start = false;
        }
    }

    /// Append a token without ending the current line
    pub fn token(&mut self, s: &str) -> &mut Self {
        if s.is_empty() {
            return self;
        }
        self.write_indent();
        self.output.push_str(s);
        self
    }

    /// End the current line
    pub fn line(&mut self) -> &mut Self {
        self.output.push('\n');
        self.at_line_start = true;
        self
    }

    /// End the current statement: terminator, then newline
    pub fn statement(&mut self) -> &mut Self {
        if !self.config.statement_terminator.is_empty() {
            self.write_indent();
            self.output.push_str(&self.config.statement_terminator);
        }
        self.line()
    }

    /// Append `items` separated by `separator`, without a trailing separator
    pub fn separated<I, F>(&mut self, items: I, separator: &str, mut write_item: F) -> &mut Self
    where
        I: IntoIterator,
        F: FnMut(&mut Self, I::Item),
    {
        for (index, item) in items.into_iter().enumerate() {
            if index > 0 {
                self.token(separator);
            }
            write_item(self, item);
        }
        self
    }

    /// Get current indentation level
    pub fn current_indent(&self) -> usize {
        self.indent_level
    }

    /// Get the configuration
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }
}
