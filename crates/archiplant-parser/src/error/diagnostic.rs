//! The core diagnostic type for the Archiplant error system.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, labels naming the entities involved, and help text.

use std::fmt;

use crate::error::{
    Severity,
    error_code::ErrorCode,
    label::{Label, Subject},
};

/// A rich diagnostic message about a model.
///
/// Diagnostics provide detailed information about errors and warnings,
/// including:
/// - A severity level
/// - An optional error code for documentation and searchability
/// - A primary message describing the issue
/// - One or more labels naming the offending entities
/// - Optional help text with suggestions
///
/// # Example
///
/// ```text
/// error[E100]: unknown element type `Buisness_Actor`
///   --> element `customer`
///    = help: did you mean `Business_Actor`?
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use archiplant_parser::error::{Diagnostic, ErrorCode, Subject};
    ///
    /// let diag = Diagnostic::error("unknown relationship type `uses`")
    ///     .with_code(ErrorCode::E102)
    ///     .with_label(Subject::relationship("r1"), "declared here")
    ///     .with_help("did you mean `Serving`?");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Returns the id of the entity the primary label names, if any.
    pub fn entity_id(&self) -> Option<&str> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .and_then(|label| label.subject().id())
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, subject: Subject, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(subject, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, subject: Subject, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(subject, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Create a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E100]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Error, "test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_with_labels() {
        let diag = Diagnostic::error("duplicate identifier")
            .with_label(Subject::element("a"), "duplicate here")
            .with_secondary_label(Subject::element("a"), "first declared here");

        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
        assert_eq!(diag.entity_id(), Some("a"));
    }

    #[test]
    fn test_diagnostic_display_with_code() {
        let diag = Diagnostic::error("unknown layer `Busines`").with_code(ErrorCode::E101);

        assert_eq!(diag.to_string(), "error[E101]: unknown layer `Busines`");
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::warning("relationship not permitted");

        assert_eq!(diag.to_string(), "warning: relationship not permitted");
    }

    #[test]
    fn test_diagnostic_with_help() {
        let diag = Diagnostic::error("unknown element type").with_help("did you mean `Goal`?");

        assert_eq!(diag.help(), Some("did you mean `Goal`?"));
    }
}
