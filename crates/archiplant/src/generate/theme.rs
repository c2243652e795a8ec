//! Theme bundles and the skinparams they produce.

use archiplant_core::{layer::Layer, layout::Theme};

/// Fixed color, font and shape parameters of one [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeStyle {
    pub background: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
    pub border: &'static str,
    pub font_name: &'static str,
    pub font_size: u8,
    pub border_thickness: u8,
    /// Corner radius, or `None` for square corners.
    pub round_corner: Option<u8>,
    pub shadow: bool,
    /// Minimal diagrams draw components as plain rectangles and hide stereotypes.
    pub minimal: bool,
}

const BASE: ThemeStyle = ThemeStyle {
    background: "#FFFFFF",
    primary: "#007ACC",
    secondary: "#6C757D",
    accent: "#28A745",
    text: "#212529",
    border: "#DEE2E6",
    font_name: "Arial",
    font_size: 12,
    border_thickness: 2,
    round_corner: Some(10),
    shadow: true,
    minimal: false,
};

impl ThemeStyle {
    /// Returns the bundle for `theme`.
    pub fn of(theme: Theme) -> Self {
        match theme {
            Theme::Modern => BASE,
            Theme::Classic => Self {
                background: "#F8F9FA",
                primary: "#6C757D",
                secondary: "#ADB5BD",
                accent: "#495057",
                text: "#212529",
                border: "#CED4DA",
                border_thickness: 1,
                round_corner: None,
                shadow: false,
                ..BASE
            },
            Theme::Colorful => Self {
                background: "#FFF8E1",
                primary: "#FF5722",
                secondary: "#FFC107",
                accent: "#4CAF50",
                text: "#212529",
                border: "#FF9800",
                border_thickness: 3,
                ..BASE
            },
            Theme::Minimal => Self {
                background: "#FFFFFF",
                primary: "#000000",
                secondary: "#CCCCCC",
                accent: "#666666",
                text: "#000000",
                border: "#CCCCCC",
                border_thickness: 1,
                round_corner: None,
                shadow: false,
                minimal: true,
                ..BASE
            },
            Theme::Dark => Self {
                background: "#2D3748",
                primary: "#63B3ED",
                secondary: "#4A5568",
                accent: "#68D391",
                text: "#E2E8F0",
                border: "#4A5568",
                ..BASE
            },
            Theme::Professional => Self {
                background: "#FFFFFF",
                primary: "#2C5282",
                secondary: "#4A5568",
                accent: "#3182CE",
                text: "#2D3748",
                border: "#CBD5E0",
                font_name: "Segoe UI",
                font_size: 11,
                round_corner: Some(5),
                ..BASE
            },
        }
    }

    /// Returns the `skinparam componentStyle` value.
    pub fn component_style(&self) -> &'static str {
        if self.minimal { "rectangle" } else { "uml2" }
    }

    /// Returns the skinparam block for this theme, one line per entry.
    pub fn skinparams(&self) -> Vec<String> {
        let mut lines = vec![
            format!("skinparam backgroundColor {}", self.background),
            format!("skinparam defaultFontName {}", quote_font(self.font_name)),
            format!("skinparam defaultFontSize {}", self.font_size),
            format!("skinparam defaultFontColor {}", self.text),
            format!("skinparam shadowing {}", self.shadow),
        ];
        if let Some(radius) = self.round_corner {
            lines.push(format!("skinparam roundCorner {radius}"));
        }

        lines.extend([
            "skinparam archimate {".to_string(),
            format!("  borderThickness {}", self.border_thickness),
            format!("  borderColor {}", self.border),
            format!("  fontColor {}", self.text),
            "}".to_string(),
            "skinparam arrow {".to_string(),
            format!("  thickness {}", self.border_thickness),
            format!("  color {}", self.primary),
            format!("  fontColor {}", self.text),
            "}".to_string(),
            "skinparam note {".to_string(),
            format!("  backgroundColor {}", self.background),
            format!("  borderColor {}", self.secondary),
            format!("  fontColor {}", self.text),
            "}".to_string(),
            "skinparam package {".to_string(),
            format!("  borderColor {}", self.secondary),
            format!("  fontColor {}", self.text),
            "}".to_string(),
            "skinparam legend {".to_string(),
            format!("  backgroundColor {}", self.background),
            format!("  borderColor {}", self.border),
            format!("  fontColor {}", self.text),
            "}".to_string(),
        ]);

        if self.minimal {
            lines.push("hide stereotype".to_string());
        }
        lines
    }
}

/// Returns the legend and fill color of a layer.
pub fn layer_color(layer: Layer) -> &'static str {
    match layer {
        Layer::Business => "#FF6B6B",
        Layer::Application => "#4ECDC4",
        Layer::Technology => "#45B7D1",
        Layer::Physical => "#FFA07A",
        Layer::Motivation => "#98D8C8",
        Layer::Strategy => "#F7DC6F",
        Layer::Implementation => "#BB8FCE",
    }
}

fn quote_font(name: &str) -> String {
    if name.contains(' ') {
        format!("\"{name}\"")
    } else {
        name.to_string()
    }
}
