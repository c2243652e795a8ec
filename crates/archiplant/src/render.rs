//! Image rendering of generated PlantUML text.
//!
//! Rendering is delegated to an external engine behind the [`Renderer`]
//! trait. [`PlantUmlRenderer`] runs the PlantUML tool as a subprocess.

mod plantuml;

use std::{fmt, io, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use plantuml::{Launcher, PlantUmlRenderer};

/// Image formats the renderer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 2] = [ImageFormat::Png, ImageFormat::Svg];

    /// File extension of rendered images, without the dot.
    pub fn extension(self) -> &'static str {
        self.into()
    }
}

impl From<ImageFormat> for &'static str {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            _ => Err("unsupported image format, expected `png` or `svg`"),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Errors raised by a rendering engine.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The engine exited unsuccessfully. `stderr` is its error output verbatim.
    #[error("renderer failed: {stderr}")]
    Failed { stderr: String },

    #[error("renderer timed out after {:?}", .0)]
    Timeout(Duration),

    #[error("renderer I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Turns PlantUML source into image bytes.
pub trait Renderer {
    /// Renders `source` into an image of the given `format`.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the engine cannot be started, fails, or
    /// does not finish in time.
    fn render(&self, source: &str, format: ImageFormat) -> Result<Vec<u8>, RenderError>;
}
