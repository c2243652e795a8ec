//! Layout and styling options for one generation request.
//!
//! A request may carry a partial [`LayoutRequest`]. It is merged over the
//! process defaults into a complete [`LayoutOptions`] value with
//! [`LayoutOptions::merge`]. Settings listed as locked keep their default no
//! matter what the request asks for.
//!
//! # Example
//!
//! ```
//! use archiplant_core::layout::{LayoutOptions, LayoutRequest, LayoutSetting, Theme};
//!
//! let request = LayoutRequest {
//!     theme: Some(Theme::Dark),
//!     show_legend: Some(true),
//!     ..LayoutRequest::default()
//! };
//!
//! let options = LayoutOptions::default().merge(&request, &[LayoutSetting::Theme]);
//! assert_eq!(options.theme, Theme::Modern);
//! assert!(options.show_legend);
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Overall flow direction of the diagram.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    #[default]
    TopToBottom,
    LeftToRight,
}

impl LayoutDirection {
    /// Returns the PlantUML direction directive.
    pub fn directive(self) -> &'static str {
        match self {
            Self::TopToBottom => "top to bottom direction",
            Self::LeftToRight => "left to right direction",
        }
    }
}

/// Spacing preset between diagram nodes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    #[default]
    Compact,
    Balanced,
    Comfortable,
}

impl Spacing {
    /// Returns the `(nodesep, ranksep)` pair for this preset.
    pub fn separation(self) -> (u32, u32) {
        match self {
            Self::Compact => (20, 30),
            Self::Balanced => (40, 50),
            Self::Comfortable => (60, 80),
        }
    }
}

/// Named visual theme.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Modern,
    Classic,
    Colorful,
    Minimal,
    Dark,
    Professional,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Modern,
        Theme::Classic,
        Theme::Colorful,
        Theme::Minimal,
        Theme::Dark,
        Theme::Professional,
    ];
}

/// A single layout option, used to lock options against request overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutSetting {
    Direction,
    Spacing,
    Theme,
    ShowTitle,
    ShowLegend,
    GroupByLayer,
    ShowElementTypes,
    ShowRelationshipLabels,
    HideUnlinked,
    RemoveUnlinked,
}

impl LayoutSetting {
    pub const ALL: [LayoutSetting; 10] = [
        LayoutSetting::Direction,
        LayoutSetting::Spacing,
        LayoutSetting::Theme,
        LayoutSetting::ShowTitle,
        LayoutSetting::ShowLegend,
        LayoutSetting::GroupByLayer,
        LayoutSetting::ShowElementTypes,
        LayoutSetting::ShowRelationshipLabels,
        LayoutSetting::HideUnlinked,
        LayoutSetting::RemoveUnlinked,
    ];
}

macro_rules! snake_case_names {
    ($name:ident { $($variant:ident => $keyword:literal),+ $(,)? }) => {
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

snake_case_names!(LayoutDirection {
    TopToBottom => "top_to_bottom",
    LeftToRight => "left_to_right",
});

snake_case_names!(Spacing {
    Compact => "compact",
    Balanced => "balanced",
    Comfortable => "comfortable",
});

snake_case_names!(Theme {
    Modern => "modern",
    Classic => "classic",
    Colorful => "colorful",
    Minimal => "minimal",
    Dark => "dark",
    Professional => "professional",
});

snake_case_names!(LayoutSetting {
    Direction => "direction",
    Spacing => "spacing",
    Theme => "theme",
    ShowTitle => "show_title",
    ShowLegend => "show_legend",
    GroupByLayer => "group_by_layer",
    ShowElementTypes => "show_element_types",
    ShowRelationshipLabels => "show_relationship_labels",
    HideUnlinked => "hide_unlinked",
    RemoveUnlinked => "remove_unlinked",
});

/// The layout block of a request. Unset fields fall back to the defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LayoutRequest {
    pub direction: Option<LayoutDirection>,
    pub spacing: Option<Spacing>,
    pub theme: Option<Theme>,
    pub show_title: Option<bool>,
    pub show_legend: Option<bool>,
    pub group_by_layer: Option<bool>,
    pub show_element_types: Option<bool>,
    pub show_relationship_labels: Option<bool>,
    pub hide_unlinked: Option<bool>,
    pub remove_unlinked: Option<bool>,
}

/// Fully resolved layout options for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub direction: LayoutDirection,
    pub spacing: Spacing,
    pub theme: Theme,
    pub show_title: bool,
    pub show_legend: bool,
    pub group_by_layer: bool,
    pub show_element_types: bool,
    pub show_relationship_labels: bool,
    /// Declares elements without relationships but hides them.
    pub hide_unlinked: bool,
    /// Leaves elements without relationships out. `hide_unlinked` wins when
    /// both are set.
    pub remove_unlinked: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::default(),
            spacing: Spacing::default(),
            theme: Theme::default(),
            show_title: false,
            show_legend: false,
            group_by_layer: true,
            show_element_types: false,
            show_relationship_labels: true,
            hide_unlinked: false,
            remove_unlinked: false,
        }
    }
}

impl LayoutOptions {
    /// Applies a request's overrides on top of these options.
    ///
    /// Settings in `locked` keep their current value.
    pub fn merge(self, request: &LayoutRequest, locked: &[LayoutSetting]) -> Self {
        let open = |setting: LayoutSetting| !locked.contains(&setting);
        let pick = |setting: LayoutSetting, requested: Option<bool>, current: bool| match requested {
            Some(value) if open(setting) => value,
            _ => current,
        };

        Self {
            direction: request
                .direction
                .filter(|_| open(LayoutSetting::Direction))
                .unwrap_or(self.direction),
            spacing: request
                .spacing
                .filter(|_| open(LayoutSetting::Spacing))
                .unwrap_or(self.spacing),
            theme: request
                .theme
                .filter(|_| open(LayoutSetting::Theme))
                .unwrap_or(self.theme),
            show_title: pick(LayoutSetting::ShowTitle, request.show_title, self.show_title),
            show_legend: pick(LayoutSetting::ShowLegend, request.show_legend, self.show_legend),
            group_by_layer: pick(
                LayoutSetting::GroupByLayer,
                request.group_by_layer,
                self.group_by_layer,
            ),
            show_element_types: pick(
                LayoutSetting::ShowElementTypes,
                request.show_element_types,
                self.show_element_types,
            ),
            show_relationship_labels: pick(
                LayoutSetting::ShowRelationshipLabels,
                request.show_relationship_labels,
                self.show_relationship_labels,
            ),
            hide_unlinked: pick(
                LayoutSetting::HideUnlinked,
                request.hide_unlinked,
                self.hide_unlinked,
            ),
            remove_unlinked: pick(
                LayoutSetting::RemoveUnlinked,
                request.remove_unlinked,
                self.remove_unlinked,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LayoutOptions::default();

        assert_eq!(options.direction, LayoutDirection::TopToBottom);
        assert_eq!(options.spacing, Spacing::Compact);
        assert_eq!(options.theme, Theme::Modern);
        assert!(options.group_by_layer);
        assert!(options.show_relationship_labels);
        assert!(!options.show_legend);
        assert!(!options.hide_unlinked);
        assert!(!options.remove_unlinked);
    }

    #[test]
    fn test_merge_unlinked_handling() {
        let request = LayoutRequest {
            hide_unlinked: Some(true),
            remove_unlinked: Some(true),
            ..LayoutRequest::default()
        };

        let options = LayoutOptions::default().merge(&request, &[LayoutSetting::RemoveUnlinked]);

        assert!(options.hide_unlinked);
        assert!(!options.remove_unlinked);
        assert_eq!("remove_unlinked".parse(), Ok(LayoutSetting::RemoveUnlinked));
    }

    #[test]
    fn test_merge_applies_overrides() {
        let request = LayoutRequest {
            direction: Some(LayoutDirection::LeftToRight),
            spacing: Some(Spacing::Comfortable),
            show_title: Some(true),
            group_by_layer: Some(false),
            ..LayoutRequest::default()
        };

        let options = LayoutOptions::default().merge(&request, &[]);

        assert_eq!(options.direction, LayoutDirection::LeftToRight);
        assert_eq!(options.spacing, Spacing::Comfortable);
        assert!(options.show_title);
        assert!(!options.group_by_layer);
    }

    #[test]
    fn test_merge_respects_locks() {
        let request = LayoutRequest {
            direction: Some(LayoutDirection::LeftToRight),
            show_relationship_labels: Some(false),
            ..LayoutRequest::default()
        };

        let options = LayoutOptions::default().merge(
            &request,
            &[LayoutSetting::Direction, LayoutSetting::ShowRelationshipLabels],
        );

        assert_eq!(options.direction, LayoutDirection::TopToBottom);
        assert!(options.show_relationship_labels);
    }

    #[test]
    fn test_spacing_separation() {
        assert_eq!(Spacing::Compact.separation(), (20, 30));
        assert_eq!(Spacing::Balanced.separation(), (40, 50));
        assert_eq!(Spacing::Comfortable.separation(), (60, 80));
    }

    #[test]
    fn test_names() {
        assert_eq!(Theme::Professional.to_string(), "professional");
        assert_eq!("show_legend".parse(), Ok(LayoutSetting::ShowLegend));
        assert_eq!(
            LayoutDirection::LeftToRight.directive(),
            "left to right direction"
        );
    }
}
