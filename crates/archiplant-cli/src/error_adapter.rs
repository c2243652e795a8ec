//! Error adapter for converting ArchiplantError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Locating Labels
//!
//! Diagnostics name model entities rather than byte ranges. A label is
//! placed on the entity's `"id"` value in the JSON payload, falling back to
//! the first mention of the id. Payload errors carry a line and column.
//!
//! # Multi-Error Support
//!
//! When a [`archiplant_parser::error::ParseError`] contains multiple
//! diagnostics, each diagnostic is rendered independently.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use archiplant::{ArchiplantError, render::RenderError};
use archiplant_parser::error::{Diagnostic, Label, Subject};

/// Adapter for a single archiplant diagnostic.
///
/// This adapter wraps a single [`Diagnostic`] and implements
/// [`MietteDiagnostic`] to enable rich error formatting in the CLI.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// Payload text for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels: Vec<LabeledSpan> = self
            .diag
            .labels()
            .iter()
            .filter_map(|label| labeled_span(label, self.src))
            .collect();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.into_iter()))
    }
}

fn labeled_span(label: &Label, src: &str) -> Option<LabeledSpan> {
    let span = match label.subject() {
        Subject::Location { line, column } => locate_position(src, *line, *column),
        subject => locate_entity(src, subject.id()?),
    }?;

    let message = Some(label.message().to_string());
    Some(if label.is_primary() {
        LabeledSpan::new_primary_with_span(message, span)
    } else {
        LabeledSpan::new_with_span(message, span)
    })
}

/// Finds the quoted id inside the payload, preferring an `"id": "<id>"` pair.
fn locate_entity(src: &str, id: &str) -> Option<SourceSpan> {
    if id.is_empty() {
        return None;
    }

    let needle = format!("\"{id}\"");
    let mut first = None;
    for (offset, _) in src.match_indices(&needle) {
        let span = SourceSpan::new((offset + 1).into(), id.len());
        if declares_id(src, offset) {
            return Some(span);
        }
        first.get_or_insert(span);
    }
    first
}

fn declares_id(src: &str, offset: usize) -> bool {
    src[..offset]
        .trim_end()
        .strip_suffix(':')
        .is_some_and(|key| key.trim_end().ends_with("\"id\""))
}

/// Converts a 1-based line and column into a one-character span.
fn locate_position(src: &str, line: usize, column: usize) -> Option<SourceSpan> {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let line_text = src.get(line_start..)?.lines().next().unwrap_or_default();
    let column_offset: usize = line_text
        .chars()
        .take(column.saturating_sub(1))
        .map(char::len_utf8)
        .sum();

    let offset = (line_start + column_offset).min(src.len());
    let len = usize::from(offset < src.len());
    Some(SourceSpan::new(offset.into(), len))
}

/// Adapter for non-diagnostic [`ArchiplantError`] variants.
///
/// This adapter handles errors that don't have rich diagnostic information,
/// such as I/O errors, rendering errors, export and configuration errors.
pub struct ErrorAdapter<'a>(pub &'a ArchiplantError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ArchiplantError::Io(_) => "archiplant::io",
            ArchiplantError::Payload { .. }
            | ArchiplantError::UnresolvedType { .. }
            | ArchiplantError::Validation { .. } => return None,
            ArchiplantError::UnsupportedType(_) => "archiplant::unsupported_type",
            ArchiplantError::Render(_) => "archiplant::render",
            ArchiplantError::Export(_) => "archiplant::export",
            ArchiplantError::Config(_) => "archiplant::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            ArchiplantError::Render(RenderError::Io(_)) => {
                "install PlantUML or set ARCHIPLANT_PLANTUML_JAR / ARCHIPLANT_PLANTUML_COMMAND"
            }
            ArchiplantError::Render(RenderError::Timeout(_)) => {
                "raise ARCHIPLANT_RENDER_TIMEOUT or simplify the diagram"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single diagnostic or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic located in the payload.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert an [`ArchiplantError`] into a list of reportable errors.
///
/// For parse failures this returns one [`Reportable`] for each diagnostic,
/// warnings included. For other error variants, this returns a single
/// [`Reportable`].
pub fn to_reportables(err: &ArchiplantError) -> Vec<Reportable<'_>> {
    match err.parse_error() {
        Some((parse_err, src)) => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        None => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use archiplant_parser::error::{ErrorCode, ParseError};

    use super::*;

    const SRC: &str = r#"{
  "elements": [
    {"id": "crm", "name": "CRM", "element_type": "Application_Component"}
  ],
  "relationships": [
    {"id": "r1", "from": "crm", "to": "ghost", "type": "Serving"}
  ]
}"#;

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("test error")
            .with_code(ErrorCode::E200)
            .with_label(Subject::relationship("r1"), "here")
            .with_help("try this");
        let err = ArchiplantError::new_parse_error(ParseError::from(diag), SRC);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "test error");
                assert_eq!(d.code().unwrap().to_string(), "E200");
                assert_eq!(d.help().unwrap().to_string(), "try this");
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diags = vec![
            Diagnostic::error("first error").with_code(ErrorCode::E200),
            Diagnostic::error("second error").with_code(ErrorCode::E201),
            Diagnostic::warning("third warning"),
        ];
        let err = ArchiplantError::new_parse_error(ParseError::from(diags), SRC);

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 3);
        assert_eq!(reportables[0].to_string(), "first error");
        assert_eq!(reportables[1].to_string(), "second error");
        assert_eq!(reportables[2].to_string(), "third warning");
    }

    #[test]
    fn test_non_parse_error() {
        let err = ArchiplantError::Config("bad config".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Configuration error: bad config");
                assert_eq!(e.code().unwrap().to_string(), "archiplant::config");
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_label_on_declared_id() {
        let diag = Diagnostic::error("element problem")
            .with_label(Subject::element("crm"), "declared here")
            .with_secondary_label(Subject::relationship("r1"), "used here");
        let adapter = DiagnosticAdapter::new(&diag, SRC);

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);

        let crm = SRC.find("\"crm\"").unwrap() + 1;
        assert_eq!(labels[0].offset(), crm);
        assert_eq!(labels[0].len(), 3);
        assert!(labels[0].primary());
        assert_eq!(labels[0].label(), Some("declared here"));

        let r1 = SRC.find("\"r1\"").unwrap() + 1;
        assert_eq!(labels[1].offset(), r1);
        assert!(!labels[1].primary());
    }

    #[test]
    fn test_label_falls_back_to_reference() {
        let diag = Diagnostic::error("missing").with_label(Subject::element("ghost"), "unknown");
        let adapter = DiagnosticAdapter::new(&diag, SRC);

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels[0].offset(), SRC.find("\"ghost\"").unwrap() + 1);
    }

    #[test]
    fn test_unlocatable_labels_dropped() {
        let diag = Diagnostic::error("nowhere").with_label(Subject::group("nope"), "missing");
        let adapter = DiagnosticAdapter::new(&diag, SRC);

        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_location_label() {
        let src = "{\n  \"elements\": [,]\n}";
        let diag = Diagnostic::error("syntax")
            .with_label(Subject::Location { line: 2, column: 16 }, "payload rejected here");
        let adapter = DiagnosticAdapter::new(&diag, src);

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(&src[labels[0].offset()..labels[0].offset() + 1], ",");
    }
}
