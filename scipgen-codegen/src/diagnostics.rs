//! Diagnostics: recording, severity filtering and source-annotated printing.
//!
//! Diagnostics below the configured severity are dropped before they are
//! retained, so they never count toward the exit-code decision. Printing
//! resolves a symbol back to its definition occurrence and renders a
//! caret-annotated excerpt; when no definition occurrence exists, a one-line
//! message naming the bare symbol is printed instead.

use std::io::Write;
use std::path::PathBuf;

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{Buffer, ColorChoice, StandardStream, WriteColor};
use tracing::debug;

use scipgen_scip::Index;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Severity {
    /// Recoverable oddity; does not affect the exit code.
    Warning,
    /// Generation gap the user must resolve.
    #[default]
    Error,
}

/// A recorded diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity of the diagnostic.
    pub severity: Severity,
    /// Symbol the diagnostic is attached to.
    pub symbol: String,
    /// Human-readable message.
    pub message: String,
    /// Related diagnostics, e.g. conflict markers on sibling declarations.
    pub additional_information: Vec<Diagnostic>,
}

impl Diagnostic {
    /// Creates a diagnostic with no related information.
    #[must_use]
    pub fn new(severity: Severity, symbol: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            symbol: symbol.into(),
            message: message.into(),
            additional_information: Vec::new(),
        }
    }
}

/// Accumulates diagnostics for one run.
pub struct Reporter {
    threshold: Severity,
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl Reporter {
    /// Creates a reporter that retains diagnostics at or above `threshold`.
    #[must_use]
    pub fn new(threshold: Severity) -> Self {
        Self {
            threshold,
            diagnostics: Vec::new(),
            error_count: 0,
        }
    }

    /// Records a warning diagnostic.
    pub fn warn(&mut self, symbol: impl Into<String>, message: impl Into<String>) {
        self.report(Diagnostic::new(Severity::Warning, symbol, message));
    }

    /// Records an error diagnostic.
    pub fn error(&mut self, symbol: impl Into<String>, message: impl Into<String>) {
        self.report(Diagnostic::new(Severity::Error, symbol, message));
    }

    /// Records a prepared diagnostic, subject to severity filtering.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity < self.threshold {
            debug!(
                symbol = %diagnostic.symbol,
                "suppressed diagnostic below severity threshold"
            );
            return;
        }
        if diagnostic.severity == Severity::Error {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Number of retained error-severity diagnostics.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// All retained diagnostics, in recording order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Prints every retained diagnostic to stderr.
pub fn print_diagnostics(index: &Index, reporter: &Reporter) {
    let mut writer = StandardStream::stderr(ColorChoice::Auto);
    for diagnostic in reporter.diagnostics() {
        emit(&mut writer, index, diagnostic);
    }
}

/// Renders every retained diagnostic to a plain string.
#[must_use]
pub fn render_diagnostics(index: &Index, reporter: &Reporter) -> String {
    let mut buffer = Buffer::no_color();
    for diagnostic in reporter.diagnostics() {
        emit(&mut buffer, index, diagnostic);
    }
    String::from_utf8_lossy(buffer.as_slice()).into_owned()
}

fn emit(writer: &mut dyn WriteColor, index: &Index, diagnostic: &Diagnostic) {
    let severity = match diagnostic.severity {
        Severity::Warning => codespan_reporting::diagnostic::Severity::Warning,
        Severity::Error => codespan_reporting::diagnostic::Severity::Error,
    };

    let mut notes = Vec::new();
    for related in &diagnostic.additional_information {
        notes.push(format!("{}: {}", descriptor(&related.symbol), related.message));
    }

    if let Some((name, source, span)) = resolve_excerpt(index, &diagnostic.symbol) {
        let mut files = SimpleFiles::new();
        let file_id = files.add(name, source);
        let rendered = CsDiagnostic::new(severity)
            .with_message(&diagnostic.message)
            .with_labels(vec![Label::primary(file_id, span)])
            .with_notes(notes);
        let config = term::Config::default();
        let _ = term::emit(writer, &config, &files, &rendered);
        return;
    }

    // No definition occurrence: best-effort one-line message.
    let prefix = match diagnostic.severity {
        Severity::Warning => "warning",
        Severity::Error => "error",
    };
    let _ = writeln!(
        writer,
        "{prefix}: {} ({})",
        diagnostic.message,
        descriptor(&diagnostic.symbol)
    );
    for note in notes {
        let _ = writeln!(writer, "  note: {note}");
    }
}

/// The descriptor part of a symbol, or the whole string when it does not
/// parse.
fn descriptor(symbol: &str) -> &str {
    match scipgen_scip::parse_symbol(symbol) {
        Ok(parsed) => parsed.descriptor,
        Err(_) => symbol,
    }
}

/// Finds the first definition occurrence of `symbol` and loads its source
/// excerpt from disk.
fn resolve_excerpt(index: &Index, symbol: &str) -> Option<(String, String, std::ops::Range<usize>)> {
    let root = project_root_path(index)?;
    for document in &index.documents {
        for occurrence in &document.occurrences {
            if occurrence.symbol == symbol && occurrence.is_definition() {
                let source = std::fs::read_to_string(root.join(&document.relative_path)).ok()?;
                let span = range_to_span(&source, &occurrence.range)?;
                return Some((document.relative_path.clone(), source, span));
            }
        }
    }
    None
}

fn project_root_path(index: &Index) -> Option<PathBuf> {
    let root = &index.metadata.project_root;
    if root.is_empty() {
        return None;
    }
    Some(PathBuf::from(
        root.strip_prefix("file://").unwrap_or(root.as_str()),
    ))
}

/// Converts a SCIP occurrence range (`[line, char, line, char]` or the
/// single-line `[line, char, char]` form, zero-based) to a byte span.
fn range_to_span(source: &str, range: &[i32]) -> Option<std::ops::Range<usize>> {
    let (start_line, start_char, end_line, end_char) = match range {
        [start_line, start_char, end_char] => (*start_line, *start_char, *start_line, *end_char),
        [start_line, start_char, end_line, end_char] => {
            (*start_line, *start_char, *end_line, *end_char)
        }
        _ => return None,
    };
    let start = line_col_to_offset(source, start_line as usize, start_char as usize)?;
    let end = line_col_to_offset(source, end_line as usize, end_char as usize)?;
    Some(start..end.max(start))
}

fn line_col_to_offset(source: &str, line: usize, column: usize) -> Option<usize> {
    let mut offset = 0;
    for (current, text) in source.split_inclusive('\n').enumerate() {
        if current == line {
            return Some(offset + column.min(text.len()));
        }
        offset += text.len();
    }
    None
}
