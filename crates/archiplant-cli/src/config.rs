//! Configuration loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory)
//! and applying `ARCHIPLANT_*` environment overrides on top.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use archiplant::{
    ArchiplantError,
    config::AppConfig,
    layout::{LayoutOptions, LayoutSetting},
};
use archiplant_parser::{resolve_direction, resolve_spacing, resolve_theme};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Invalid value `{value}` for {key}: {reason}")]
    Env {
        key: String,
        value: String,
        reason: String,
    },
}

impl From<ConfigError> for ArchiplantError {
    fn from(err: ConfigError) -> Self {
        ArchiplantError::Config(err.to_string())
    }
}

/// Find and load configuration, then apply environment overrides.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (archiplant/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - An `ARCHIPLANT_*` variable holds an invalid value
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ArchiplantError> {
    let mut config = find_config(explicit_path)?;
    apply_env(&mut config, |key| env::var(key).ok())?;
    Ok(config)
}

fn find_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ArchiplantError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new("archiplant/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "archiplant", "archiplant") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    // 4. If no config is found, return default config
    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, ArchiplantError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content).map_err(Into::into)
}

fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Applies `ARCHIPLANT_*` overrides read through `lookup`.
///
/// A layout variable sets the default and locks it, so requests cannot
/// override what the deployment pinned.
pub fn apply_env(
    config: &mut AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let mut defaults = config.layout().defaults();
    let mut locked = Vec::new();

    for setting in LayoutSetting::ALL {
        let key = format!("ARCHIPLANT_{}", setting.to_string().to_ascii_uppercase());
        if let Some(value) = lookup(&key) {
            set_layout(&mut defaults, setting, &key, &value)?;
            debug!(key, value; "Layout default pinned by environment");
            locked.push(setting);
        }
    }

    if !locked.is_empty() {
        let layout = config.layout_mut();
        layout.set_defaults(defaults);
        for setting in locked {
            layout.lock(setting);
        }
    }

    if let Some(value) = lookup("ARCHIPLANT_STRICT") {
        let strict = parse_bool("ARCHIPLANT_STRICT", &value)?;
        config.validation_mut().set_strict(strict);
    }

    let renderer = config.renderer_mut();
    if let Some(jar) = lookup("ARCHIPLANT_PLANTUML_JAR") {
        renderer.set_plantuml_jar(jar);
    }
    if let Some(java) = lookup("ARCHIPLANT_JAVA") {
        renderer.set_java(java);
    }
    if let Some(command) = lookup("ARCHIPLANT_PLANTUML_COMMAND") {
        renderer.set_command(command);
    }
    if let Some(value) = lookup("ARCHIPLANT_RENDER_TIMEOUT") {
        let secs = value
            .trim()
            .parse::<u64>()
            .map_err(|err| invalid("ARCHIPLANT_RENDER_TIMEOUT", &value, err.to_string()))?;
        renderer.set_timeout_secs(secs);
    }

    if let Some(value) = lookup("ARCHIPLANT_UNIVERSAL_FIX") {
        let enabled = parse_bool("ARCHIPLANT_UNIVERSAL_FIX", &value)?;
        config.export_mut().set_universal_fix(enabled);
    }

    Ok(())
}

fn set_layout(
    options: &mut LayoutOptions,
    setting: LayoutSetting,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match setting {
        LayoutSetting::Direction => {
            options.direction = parse_keyword(key, value, resolve_direction, "a layout direction")?
        }
        LayoutSetting::Spacing => {
            options.spacing = parse_keyword(key, value, resolve_spacing, "a spacing preset")?
        }
        LayoutSetting::Theme => {
            options.theme = parse_keyword(key, value, resolve_theme, "a theme name")?
        }
        LayoutSetting::ShowTitle => options.show_title = parse_bool(key, value)?,
        LayoutSetting::ShowLegend => options.show_legend = parse_bool(key, value)?,
        LayoutSetting::GroupByLayer => options.group_by_layer = parse_bool(key, value)?,
        LayoutSetting::ShowElementTypes => options.show_element_types = parse_bool(key, value)?,
        LayoutSetting::ShowRelationshipLabels => {
            options.show_relationship_labels = parse_bool(key, value)?
        }
        LayoutSetting::HideUnlinked => options.hide_unlinked = parse_bool(key, value)?,
        LayoutSetting::RemoveUnlinked => options.remove_unlinked = parse_bool(key, value)?,
    }
    Ok(())
}

/// Resolves `value` with the same vocabulary model payloads use.
fn parse_keyword<T>(
    key: &str,
    value: &str,
    resolve: fn(&str) -> Option<T>,
    expected: &str,
) -> Result<T, ConfigError> {
    resolve(value).ok_or_else(|| invalid(key, value, format!("expected {expected}")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value, "expected a boolean")),
    }
}

fn invalid(key: &str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Env {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write, time::Duration};

    use archiplant::{
        layout::{LayoutDirection, Spacing, Theme},
        render::ImageFormat,
    };

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [layout]
            direction = "left_to_right"
            spacing = "comfortable"
            theme = "professional"
            show_legend = true
            locked = ["theme", "show_legend"]

            [validation]
            strict = true

            [renderer]
            plantuml_jar = "/opt/plantuml.jar"
            timeout_secs = 30
            formats = ["png", "svg"]

            [export]
            xml = true
            universal_fix = false
            "#,
        )
        .unwrap();

        let defaults = config.layout().defaults();
        assert_eq!(defaults.direction, LayoutDirection::LeftToRight);
        assert_eq!(defaults.spacing, Spacing::Comfortable);
        assert_eq!(defaults.theme, Theme::Professional);
        assert!(defaults.show_legend);
        assert!(defaults.group_by_layer);
        assert_eq!(
            config.layout().locked(),
            &[LayoutSetting::Theme, LayoutSetting::ShowLegend]
        );
        assert!(config.validation().strict());
        assert_eq!(config.renderer().timeout(), Duration::from_secs(30));
        assert_eq!(config.renderer().formats(), &[ImageFormat::Png, ImageFormat::Svg]);
        assert!(config.export().xml());
        assert!(!config.export().universal_fix());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();

        assert!(!config.validation().strict());
        assert!(config.layout().locked().is_empty());
        assert_eq!(config.layout().defaults(), LayoutOptions::default());
    }

    #[test]
    fn test_parse_invalid_config() {
        let err = parse_config("[layout]\ntheme = \"neon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[validation]\nstrict = true").unwrap();

        let config = find_config(Some(file.path())).unwrap();
        assert!(config.validation().strict());
    }

    #[test]
    fn test_missing_explicit_path() {
        let err = find_config(Some("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ArchiplantError::Config(_)));
    }

    #[test]
    fn test_env_pins_layout() {
        let mut config = AppConfig::default();
        apply_env(
            &mut config,
            lookup(&[
                ("ARCHIPLANT_THEME", "Dark"),
                ("ARCHIPLANT_DIRECTION", "left-to-right"),
                ("ARCHIPLANT_SHOW_LEGEND", "yes"),
            ]),
        )
        .unwrap();

        let defaults = config.layout().defaults();
        assert_eq!(defaults.theme, Theme::Dark);
        assert_eq!(defaults.direction, LayoutDirection::LeftToRight);
        assert!(defaults.show_legend);
        assert_eq!(
            config.layout().locked(),
            &[
                LayoutSetting::Direction,
                LayoutSetting::Theme,
                LayoutSetting::ShowLegend
            ]
        );
    }

    #[test]
    fn test_env_accepts_payload_spellings() {
        let mut config = AppConfig::default();
        apply_env(
            &mut config,
            lookup(&[
                ("ARCHIPLANT_DIRECTION", "vertical"),
                ("ARCHIPLANT_SPACING", "loose"),
                ("ARCHIPLANT_THEME", "PROFESSIONAL"),
                ("ARCHIPLANT_REMOVE_UNLINKED", "true"),
            ]),
        )
        .unwrap();

        let defaults = config.layout().defaults();
        assert_eq!(defaults.direction, LayoutDirection::TopToBottom);
        assert_eq!(defaults.spacing, Spacing::Comfortable);
        assert_eq!(defaults.theme, Theme::Professional);
        assert!(defaults.remove_unlinked);
        assert!(config.layout().locked().contains(&LayoutSetting::RemoveUnlinked));
    }

    #[test]
    fn test_env_renderer_and_export() {
        let mut config = AppConfig::default();
        apply_env(
            &mut config,
            lookup(&[
                ("ARCHIPLANT_STRICT", "1"),
                ("ARCHIPLANT_PLANTUML_COMMAND", "plantuml -Playout=smetana"),
                ("ARCHIPLANT_RENDER_TIMEOUT", "5"),
                ("ARCHIPLANT_UNIVERSAL_FIX", "off"),
            ]),
        )
        .unwrap();

        assert!(config.validation().strict());
        assert_eq!(config.renderer().command(), Some("plantuml -Playout=smetana"));
        assert_eq!(config.renderer().timeout(), Duration::from_secs(5));
        assert!(!config.export().universal_fix());
        assert!(config.layout().locked().is_empty());
    }

    #[test]
    fn test_env_invalid_values() {
        let mut config = AppConfig::default();

        let err = apply_env(&mut config, lookup(&[("ARCHIPLANT_SPACING", "roomy")])).unwrap_err();
        assert!(err.to_string().contains("ARCHIPLANT_SPACING"));
        assert!(err.to_string().contains("expected a spacing preset"));

        let err = apply_env(&mut config, lookup(&[("ARCHIPLANT_STRICT", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { .. }));
    }
}
