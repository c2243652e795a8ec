//! Archiplant - PlantUML ArchiMate diagrams from JSON architecture models.
//!
//! A model payload passes through four stages: the normalizer resolves the
//! free-form type names, the validator checks the ArchiMate structural rules,
//! the generator writes PlantUML text and an external renderer turns that text
//! into an image. An experimental exporter writes the same model as an Archi
//! exchange document, and [`report`] summarizes it as Markdown.

pub mod config;
pub mod export;
pub mod generate;
pub mod render;
pub mod report;

mod error;
mod ident;

pub use archiplant_core::{color, element, layer, layout, model, relationship, style};
pub use archiplant_parser::{ValidatedModel, error as diagnostics, payload};

pub use error::ArchiplantError;

use log::{debug, info, trace, warn};

use archiplant_core::layout::LayoutOptions;
use archiplant_parser::ParseConfig;

use config::AppConfig;
use export::{XmlExport, XmlExporter};
use generate::Generator;
use payload::RawModel;
use render::{ImageFormat, PlantUmlRenderer, Renderer};

/// Builder for turning model payloads into diagrams.
///
/// One builder holds one configuration and can process any number of models.
/// Models never share state, so a builder may be used from several threads.
///
/// # Examples
///
/// ```rust,no_run
/// use archiplant::{DiagramBuilder, config::AppConfig, render::ImageFormat};
///
/// let source = r#"{
///     "title": "CRM",
///     "elements": [
///         {"id": "a", "name": "Clerk", "element_type": "Business_Actor"},
///         {"id": "b", "name": "CRM", "element_type": "Application_Component"}
///     ],
///     "relationships": [
///         {"id": "r1", "from": "b", "to": "a", "type": "Serving"}
///     ]
/// }"#;
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let model = builder.parse(source).expect("Failed to parse");
/// let puml = builder.generate(&model).expect("Failed to generate");
/// let png = builder.render(&puml, ImageFormat::Png).expect("Failed to render");
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this builder runs with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON payload into a validated model.
    ///
    /// # Errors
    ///
    /// Returns `ArchiplantError` for malformed payloads, unresolvable type
    /// names and structural rule violations. Each carries every diagnostic of
    /// the failing phase.
    pub fn parse(&self, source: &str) -> Result<ValidatedModel, ArchiplantError> {
        info!("Parsing model payload");

        let model = archiplant_parser::parse(source, &self.parse_config())
            .map_err(|err| ArchiplantError::new_parse_error(err, source))?;

        self.accepted(model)
    }

    /// Normalize and validate an already decoded payload.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse), minus payload decoding errors.
    pub fn build(&self, raw: &RawModel) -> Result<ValidatedModel, ArchiplantError> {
        info!("Building model from decoded payload");

        let model = archiplant_parser::build(raw, &self.parse_config()).map_err(|err| {
            let source = serde_json::to_string_pretty(raw).unwrap_or_default();
            ArchiplantError::new_parse_error(err, source)
        })?;

        self.accepted(model)
    }

    /// Resolves the layout options for `model`.
    ///
    /// The model's own layout block overrides the configured defaults,
    /// except for locked settings.
    pub fn layout_options(&self, model: &ValidatedModel) -> LayoutOptions {
        let layout = self.config.layout();
        layout
            .defaults()
            .merge(model.model().layout(), layout.locked())
    }

    /// Generate PlantUML source text for a validated model.
    ///
    /// # Errors
    ///
    /// Returns `ArchiplantError::UnsupportedType` if the model holds a type
    /// the generator has no template for.
    pub fn generate(&self, model: &ValidatedModel) -> Result<String, ArchiplantError> {
        let options = self.layout_options(model);
        debug!(options:?; "Layout options resolved");

        let source = Generator::new(options).generate(model.model())?;
        info!(bytes = source.len(); "PlantUML generated successfully");
        Ok(source)
    }

    /// Render PlantUML source with the configured renderer.
    ///
    /// # Errors
    ///
    /// Returns `ArchiplantError::Render` if the renderer fails or times out.
    pub fn render(&self, source: &str, format: ImageFormat) -> Result<Vec<u8>, ArchiplantError> {
        let renderer = PlantUmlRenderer::from_config(self.config.renderer());
        self.render_with(&renderer, source, format)
    }

    /// Render PlantUML source with an explicit renderer.
    ///
    /// # Errors
    ///
    /// Returns `ArchiplantError::Render` if the renderer fails.
    pub fn render_with<R: Renderer + ?Sized>(
        &self,
        renderer: &R,
        source: &str,
        format: ImageFormat,
    ) -> Result<Vec<u8>, ArchiplantError> {
        let image = renderer.render(source, format)?;
        info!(format:%, bytes = image.len(); "Diagram rendered successfully");
        Ok(image)
    }

    /// Export a validated model as an Archi exchange document.
    ///
    /// # Errors
    ///
    /// Returns `ArchiplantError::Export` if the document cannot be written.
    pub fn export_xml(&self, model: &ValidatedModel) -> Result<XmlExport, ArchiplantError> {
        let exporter = XmlExporter::new(self.config.export().universal_fix());
        Ok(exporter.export(model.model())?)
    }

    /// Write the Markdown architecture report for a validated model.
    ///
    /// `image` names a rendered diagram to embed, relative to the report.
    pub fn report(&self, model: &ValidatedModel, image: Option<&str>) -> String {
        report::architecture_markdown(model.model(), image)
    }

    fn parse_config(&self) -> ParseConfig {
        ParseConfig::new(self.config.validation().strict())
    }

    fn accepted(&self, model: ValidatedModel) -> Result<ValidatedModel, ArchiplantError> {
        for warning in model.warnings() {
            warn!(code:? = warning.code(); "{}", warning.message());
        }
        debug!(
            elements = model.model().elements().len(),
            relationships = model.model().relationships().len(),
            groups = model.model().groups().len();
            "Model validated successfully"
        );
        trace!(model:? = model.model(); "Validated model");
        Ok(model)
    }
}
