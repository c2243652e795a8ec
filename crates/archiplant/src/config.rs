//! Configuration types for Archiplant diagram generation.
//!
//! This module provides the configuration structures that control layout
//! defaults, validation strictness, the external renderer and the XML export.
//! All types implement [`serde::Deserialize`] for loading from external
//! sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`LayoutConfig`] - Default [`LayoutOptions`] and the settings a request may not override.
//! - [`ValidationConfig`] - Strict or relaxed relationship matrix checks.
//! - [`RendererConfig`] - How PlantUML is launched and for how long.
//! - [`ExportConfig`] - XML export toggles.
//!
//! # Example
//!
//! ```
//! # use archiplant::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! assert!(!config.validation().strict());
//! assert!(config.export().universal_fix());
//! ```

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

use archiplant_core::layout::{LayoutOptions, LayoutSetting};

use crate::render::ImageFormat;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Validation configuration section.
    #[serde(default)]
    validation: ValidationConfig,

    /// Renderer configuration section.
    #[serde(default)]
    renderer: RendererConfig,

    /// Export configuration section.
    #[serde(default)]
    export: ExportConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        layout: LayoutConfig,
        validation: ValidationConfig,
        renderer: RendererConfig,
        export: ExportConfig,
    ) -> Self {
        Self {
            layout,
            validation,
            renderer,
            export,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the validation configuration.
    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    /// Returns the renderer configuration.
    pub fn renderer(&self) -> &RendererConfig {
        &self.renderer
    }

    /// Returns the export configuration.
    pub fn export(&self) -> &ExportConfig {
        &self.export
    }

    /// Returns the layout configuration for modification.
    pub fn layout_mut(&mut self) -> &mut LayoutConfig {
        &mut self.layout
    }

    /// Returns the validation configuration for modification.
    pub fn validation_mut(&mut self) -> &mut ValidationConfig {
        &mut self.validation
    }

    /// Returns the renderer configuration for modification.
    pub fn renderer_mut(&mut self) -> &mut RendererConfig {
        &mut self.renderer
    }

    /// Returns the export configuration for modification.
    pub fn export_mut(&mut self) -> &mut ExportConfig {
        &mut self.export
    }
}

/// Layout defaults and locks.
///
/// The defaults are flattened into the `[layout]` table, next to the
/// `locked` list:
///
/// ```toml
/// [layout]
/// theme = "professional"
/// show_legend = true
/// locked = ["theme"]
/// ```
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(flatten)]
    defaults: LayoutOptions,

    #[serde(default)]
    locked: Vec<LayoutSetting>,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    ///
    /// # Arguments
    ///
    /// * `defaults` - Options used when a request leaves a setting unset.
    /// * `locked` - Settings that keep their default regardless of the request.
    pub fn new(defaults: LayoutOptions, locked: Vec<LayoutSetting>) -> Self {
        Self { defaults, locked }
    }

    /// Returns the default layout options.
    pub fn defaults(&self) -> LayoutOptions {
        self.defaults
    }

    /// Returns the locked settings.
    pub fn locked(&self) -> &[LayoutSetting] {
        &self.locked
    }

    /// Replaces the default options.
    pub fn set_defaults(&mut self, defaults: LayoutOptions) {
        self.defaults = defaults;
    }

    /// Locks `setting` against request overrides.
    pub fn lock(&mut self, setting: LayoutSetting) {
        if !self.locked.contains(&setting) {
            self.locked.push(setting);
        }
    }
}

/// Validation strictness.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ValidationConfig {
    /// Report relationship matrix violations as errors.
    #[serde(default)]
    strict: bool,
}

impl ValidationConfig {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }
}

/// External PlantUML renderer settings.
///
/// A configured `command` takes precedence over `plantuml_jar`. With neither
/// set, a `plantuml` executable on `PATH` is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Java executable used to run the jar.
    java: String,

    /// Path to `plantuml.jar`.
    plantuml_jar: Option<PathBuf>,

    /// A PlantUML launcher to run instead of the jar.
    command: Option<String>,

    /// Seconds to wait for one rendering before giving up.
    timeout_secs: u64,

    /// Image formats produced by default.
    formats: Vec<ImageFormat>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            java: "java".to_string(),
            plantuml_jar: None,
            command: None,
            timeout_secs: 60,
            formats: vec![ImageFormat::Png],
        }
    }
}

impl RendererConfig {
    pub fn java(&self) -> &str {
        &self.java
    }

    pub fn plantuml_jar(&self) -> Option<&PathBuf> {
        self.plantuml_jar.as_ref()
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn formats(&self) -> &[ImageFormat] {
        &self.formats
    }

    pub fn set_java(&mut self, java: impl Into<String>) {
        self.java = java.into();
    }

    pub fn set_plantuml_jar(&mut self, jar: impl Into<PathBuf>) {
        self.plantuml_jar = Some(jar.into());
    }

    pub fn set_command(&mut self, command: impl Into<String>) {
        self.command = Some(command.into());
    }

    pub fn set_timeout_secs(&mut self, timeout_secs: u64) {
        self.timeout_secs = timeout_secs;
    }
}

/// XML export toggles.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Write the XML model next to the diagram.
    xml: bool,

    /// Rewrite relationships the matrix rejects as associations.
    universal_fix: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            xml: false,
            universal_fix: true,
        }
    }
}

impl ExportConfig {
    pub fn xml(&self) -> bool {
        self.xml
    }

    pub fn universal_fix(&self) -> bool {
        self.universal_fix
    }

    pub fn set_xml(&mut self, xml: bool) {
        self.xml = xml;
    }

    pub fn set_universal_fix(&mut self, universal_fix: bool) {
        self.universal_fix = universal_fix;
    }
}
