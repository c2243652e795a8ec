//! ArchiMate layers.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One of the seven ArchiMate layers.
///
/// The declaration order is the canonical order used wherever layers are
/// listed, such as layer packages and the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Business,
    Application,
    Technology,
    Physical,
    Motivation,
    Strategy,
    Implementation,
}

impl Layer {
    /// All layers in canonical order.
    pub const ALL: [Layer; 7] = [
        Layer::Business,
        Layer::Application,
        Layer::Technology,
        Layer::Physical,
        Layer::Motivation,
        Layer::Strategy,
        Layer::Implementation,
    ];

    /// Returns the display name of the layer, e.g. `"Business"`.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl From<Layer> for &'static str {
    fn from(layer: Layer) -> Self {
        match layer {
            Layer::Business => "Business",
            Layer::Application => "Application",
            Layer::Technology => "Technology",
            Layer::Physical => "Physical",
            Layer::Motivation => "Motivation",
            Layer::Strategy => "Strategy",
            Layer::Implementation => "Implementation",
        }
    }
}

impl FromStr for Layer {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::ALL
            .into_iter()
            .find(|layer| layer.name().eq_ignore_ascii_case(s))
            .ok_or("unknown layer")
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
