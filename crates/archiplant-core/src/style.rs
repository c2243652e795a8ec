//! Styling options attached to individual model entities.
//!
//! # Overview
//!
//! - [`Direction`]: Layout hint for a single relationship arrow.
//! - [`LineStyle`]: User override of a relationship's line pattern.
//! - [`GroupType`]: Container shape used for groups and per-element grouping.
//! - [`NotePosition`]: Placement of an attached note.
//! - [`PortDirection`]: Kind of a component port.
//!
//! Every type converts to its canonical lowercase name through
//! `From<T> for &'static str`, and parses back from it with [`FromStr`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! keyword_enum {
    ($name:ident { $($variant:ident => $keyword:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => $keyword),+
                }
            }
        }

        impl FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($keyword => Ok($name::$variant),)+
                    _ => Err(concat!("unknown ", stringify!($name))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", <&'static str>::from(*self))
            }
        }
    };
}

/// Direction hint for a relationship arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

keyword_enum!(Direction {
    Up => "up",
    Down => "down",
    Left => "left",
    Right => "right",
});

/// Line pattern requested for a relationship.
///
/// The PlantUML modifier replaces the arrow's built-in style while keeping
/// its glyph. `Solid` maps to `plain` so it can undo a built-in pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    Bold,
}

keyword_enum!(LineStyle {
    Solid => "solid",
    Dashed => "dashed",
    Dotted => "dotted",
    Bold => "bold",
});

impl LineStyle {
    /// Returns the PlantUML inline style modifier.
    pub fn modifier(self) -> &'static str {
        match self {
            Self::Solid => "plain",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Bold => "bold",
        }
    }
}

/// Container shape for groups.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    #[default]
    Package,
    Node,
    Folder,
    Frame,
    Cloud,
    Database,
    Rectangle,
}

keyword_enum!(GroupType {
    Package => "package",
    Node => "node",
    Folder => "folder",
    Frame => "frame",
    Cloud => "cloud",
    Database => "database",
    Rectangle => "rectangle",
});

/// Placement of an attached note relative to its element.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotePosition {
    Top,
    Bottom,
    Left,
    #[default]
    Right,
}

keyword_enum!(NotePosition {
    Top => "top",
    Bottom => "bottom",
    Left => "left",
    Right => "right",
});

/// Direction of a component port.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    In,
    Out,
    #[default]
    InOut,
}

keyword_enum!(PortDirection {
    In => "in",
    Out => "out",
    InOut => "in_out",
});

impl PortDirection {
    /// Returns the PlantUML port keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::In => "portin",
            Self::Out => "portout",
            Self::InOut => "port",
        }
    }
}
