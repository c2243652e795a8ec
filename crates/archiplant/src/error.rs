//! Error types for Archiplant operations.
//!
//! This module provides the main error type [`ArchiplantError`] which wraps
//! the error conditions that can occur while turning a model payload into a
//! diagram.

use std::io;

use thiserror::Error;

use archiplant_parser::error::{ParseError, Phase};

use crate::{export::xml::XmlExportError, render::RenderError};

/// The main error type for Archiplant operations.
///
/// # Diagnostic Variants
///
/// `Payload`, `UnresolvedType` and `Validation` carry the full list of
/// diagnostics together with the payload text they refer to, so callers can
/// point at the offending entities.
#[derive(Debug, Error)]
pub enum ArchiplantError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Payload { err: ParseError, src: String },

    #[error("{err}")]
    UnresolvedType { err: ParseError, src: String },

    #[error("{err}")]
    Validation { err: ParseError, src: String },

    /// A model type with no generator template. Validated models never
    /// produce this.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<XmlExportError> for ArchiplantError {
    fn from(error: XmlExportError) -> Self {
        Self::Export(Box::new(error))
    }
}

impl ArchiplantError {
    /// Create the error variant matching the phase that rejected the model.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        let src = src.into();
        match err.phase() {
            Phase::Payload => Self::Payload { err, src },
            Phase::Normalization => Self::UnresolvedType { err, src },
            Phase::Validation => Self::Validation { err, src },
        }
    }

    /// Returns the diagnostics and payload text for parse failures.
    pub fn parse_error(&self) -> Option<(&ParseError, &str)> {
        match self {
            Self::Payload { err, src }
            | Self::UnresolvedType { err, src }
            | Self::Validation { err, src } => Some((err, src)),
            _ => None,
        }
    }
}
