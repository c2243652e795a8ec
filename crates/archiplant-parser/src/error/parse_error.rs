//! The ParseError type for wrapping model diagnostics.
//!
//! [`ParseError`] wraps one or more [`Diagnostic`]s that occurred while
//! decoding, normalizing or validating a model.

use std::fmt;

use crate::error::{Diagnostic, Phase};

/// A type alias for `Result<T, ParseError>`.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Error type for the parsing lifecycle.
///
/// Wraps one or more diagnostics. Warnings collected before the failure
/// are included so callers see the complete picture.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Iterate over the error-severity diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity().is_error())
    }

    /// Returns the phase that rejected the model.
    ///
    /// This is the phase of the first coded error. Errors without a code
    /// are treated as validation failures.
    pub fn phase(&self) -> Phase {
        self.errors()
            .find_map(|diag| diag.code())
            .map_or(Phase::Validation, |code| code.phase())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.errors().next().or(self.diagnostics.first()) {
            write!(f, "{}", first)?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_error_from_diagnostic() {
        let diag = Diagnostic::error("test error").with_code(ErrorCode::E100);
        let err: ParseError = diag.into();

        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.diagnostics()[0].message(), "test error");
        assert_eq!(err.phase(), Phase::Normalization);
    }

    #[test]
    fn test_parse_error_display_single() {
        let err: ParseError = Diagnostic::error("undefined group").into();

        assert_eq!(err.to_string(), "error: undefined group");
    }

    #[test]
    fn test_parse_error_display_multiple() {
        let diags = vec![
            Diagnostic::error("first error"),
            Diagnostic::error("second error"),
            Diagnostic::error("third error"),
        ];
        let err: ParseError = diags.into();

        assert_eq!(err.to_string(), "error: first error (+2 more)");
    }

    #[test]
    fn test_parse_error_display_skips_leading_warnings() {
        let diags = vec![
            Diagnostic::warning("not permitted").with_code(ErrorCode::E205),
            Diagnostic::error("group cycle").with_code(ErrorCode::E207),
        ];
        let err: ParseError = diags.into();

        assert_eq!(err.to_string(), "error[E207]: group cycle (+1 more)");
        assert_eq!(err.phase(), Phase::Validation);
        assert_eq!(err.errors().count(), 1);
    }
}
