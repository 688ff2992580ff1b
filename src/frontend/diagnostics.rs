//! Diagnostic helpers shared by the manifest loader and the CLI.
//!
//! Errors themselves are `miette::Diagnostic` types defined next to the code that raises them; this module
//! only maps positions and renders reports.

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, SourceOffset};

/// Byte offset of a 1-based `line`/`column` position in `source`, clamped to the source length.
///
/// Columns count bytes, as `serde_json` reports them.
pub fn offset_at(source: &str, line: usize, column: usize) -> SourceOffset {
    let mut line_start = 0;
    for _ in 1..line.max(1) {
        match source[line_start..].find('\n') {
            Some(i) => line_start += i + 1,
            None => return SourceOffset::from(source.len()),
        }
    }
    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());
    SourceOffset::from((line_start + column.saturating_sub(1)).min(line_end))
}

/// Render a diagnostic without colors or unicode, e.g. for logs and snapshot tests.
pub fn render_plain(diagnostic: &dyn Diagnostic) -> String {
    let mut out = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::ascii()).with_width(100);
    if handler.render_report(&mut out, diagnostic).is_err() {
        return diagnostic.to_string();
    }
    out
}
