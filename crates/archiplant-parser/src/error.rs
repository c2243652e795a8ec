//! Error and diagnostic system for the Archiplant parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labels pointing at model entities for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, labels naming
//! the offending entities, and help text. Multiple diagnostics are wrapped in
//! [`ParseError`] for returning from the parsing lifecycle.
//!
//! # Example
//!
//! ```
//! # use archiplant_parser::error::{Diagnostic, ErrorCode, Subject};
//!
//! let diag = Diagnostic::error("element id `crm` is declared more than once")
//!     .with_code(ErrorCode::E202)
//!     .with_label(Subject::element("crm"), "duplicate declaration")
//!     .with_help("give every element, relationship and group a unique id");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::{ErrorCode, Phase};
pub use label::{Label, Subject};
pub use parse_error::{ParseError, Result};
pub use severity::Severity;
