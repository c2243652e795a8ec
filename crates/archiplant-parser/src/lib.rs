//! # Archiplant Parser
//!
//! Front half of the Archiplant pipeline: decodes a JSON model payload,
//! normalizes its free-form names into canonical ArchiMate types, and
//! validates the result against the ArchiMate structural rules.
//!
//! ## Usage
//!
//! ```
//! # use archiplant_parser::{parse, ParseConfig, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"{
//!         "title": "CRM",
//!         "elements": [
//!             {"id": "crm", "name": "CRM System", "element_type": "Application_Component"},
//!             {"id": "sales", "name": "Sales", "element_type": "business-process"}
//!         ],
//!         "relationships": [
//!             {"id": "r1", "from": "crm", "to": "sales", "type": "serves"}
//!         ]
//!     }"#;
//!
//!     let validated = parse(source, &ParseConfig::default())?;
//!     assert_eq!(validated.model().elements().len(), 2);
//!     Ok(())
//! }
//! ```

pub mod error;
mod lookup;
mod normalize;
pub mod payload;
mod validate;

use log::{debug, info};

use archiplant_core::model::Model;

pub use normalize::{
    resolve_direction, resolve_element_type, resolve_layer, resolve_relationship_kind,
    resolve_spacing, resolve_theme,
};

use error::{Diagnostic, Result};
use payload::RawModel;

/// Configuration for the validation phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseConfig {
    /// Report relationship matrix violations as errors instead of warnings.
    pub strict: bool,
}

impl ParseConfig {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }
}

/// A model that passed validation, with any warnings raised on the way.
#[derive(Debug, Clone)]
pub struct ValidatedModel {
    model: Model,
    warnings: Vec<Diagnostic>,
}

impl ValidatedModel {
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn into_model(self) -> Model {
        self.model
    }
}

/// Parse a JSON payload into a validated model.
///
/// Runs the complete front half of the pipeline:
///
/// 1. **Decode** - Deserialize the JSON text into a [`RawModel`]
/// 2. **Normalize** - Resolve type, layer and option names
/// 3. **Validate** - Check references, layers and the relationship matrix
///
/// # Errors
///
/// Returns a [`ParseError`](error::ParseError) holding every diagnostic of
/// the first phase that failed.
pub fn parse(source: &str, config: &ParseConfig) -> Result<ValidatedModel> {
    let raw = payload::from_json(source)?;
    build(&raw, config)
}

/// Normalize and validate an already decoded payload.
///
/// # Errors
///
/// Returns a [`ParseError`](error::ParseError) if normalization or
/// validation reports an error.
pub fn build(raw: &RawModel, config: &ParseConfig) -> Result<ValidatedModel> {
    info!(
        elements = raw.elements.len(),
        relationships = raw.relationships.len(),
        groups = raw.groups.len();
        "Building model"
    );

    let model = normalize::normalize(raw)?;
    let warnings = validate::validate(&model, config)?;

    if !warnings.is_empty() {
        debug!(warnings = warnings.len(); "Model accepted with warnings");
    }

    Ok(ValidatedModel { model, warnings })
}
