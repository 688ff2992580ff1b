//! Structured text output for generated source
//!
//! - `writer` - [`IndentedWriter`], the line/indent-aware buffer every artifact is built with
//! - `config` - [`WriterConfig`], indent unit and statement terminator

mod config;
mod writer;

pub use config::{DEFAULT_INDENT_UNIT, WriterConfig};
pub use writer::IndentedWriter;
