//! The raw request payload.
//!
//! These types mirror the JSON document a caller submits. Every enumerated
//! field is still a free-form string here; the normalizer turns a
//! [`RawModel`] into a typed [`archiplant_core::model::Model`].
//!
//! Missing fields fall back to empty values so that a forgotten `id` is
//! reported by validation with the offending entity named, rather than as
//! an opaque decoding failure.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use crate::error::{Diagnostic, ErrorCode, Subject};

/// A complete model request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawModel {
    pub title: Option<String>,
    pub description: Option<String>,
    pub elements: Vec<RawElement>,
    pub relationships: Vec<RawRelationship>,
    pub groups: Vec<RawGroup>,
    pub layout: RawLayout,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawElement {
    pub id: String,
    pub name: Option<String>,
    #[serde(alias = "type")]
    pub element_type: String,
    pub layer: Option<String>,
    pub group_id: Option<String>,
    pub description: Option<String>,
    pub documentation: Option<String>,
    pub stereotype: Option<String>,
    pub properties: IndexMap<String, serde_json::Value>,
    pub ports: Vec<RawPort>,
    pub interfaces: Vec<RawInterface>,
    pub notes: Vec<RawNote>,
    pub color: Option<String>,
    pub show_as_component: bool,
    pub grouping_style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawRelationship {
    pub id: String,
    #[serde(alias = "from", alias = "source")]
    pub from_element: String,
    #[serde(alias = "to", alias = "target")]
    pub to_element: String,
    #[serde(alias = "type")]
    pub relationship_type: String,
    pub direction: Option<String>,
    pub color: Option<String>,
    pub line_style: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawGroup {
    pub id: String,
    pub name: Option<String>,
    #[serde(alias = "type")]
    pub group_type: Option<String>,
    #[serde(alias = "parent")]
    pub parent_group_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawPort {
    pub id: String,
    pub name: Option<String>,
    pub direction: Option<String>,
    pub interface_type: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawInterface {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawNote {
    pub content: String,
    pub position: Option<String>,
    #[serde(alias = "floating")]
    pub is_floating: bool,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
}

/// Per-request layout overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawLayout {
    pub direction: Option<String>,
    pub spacing: Option<String>,
    pub theme: Option<String>,
    pub show_title: Option<bool>,
    pub show_legend: Option<bool>,
    pub group_by_layer: Option<bool>,
    pub show_element_types: Option<bool>,
    pub show_relationship_labels: Option<bool>,
    pub hide_unlinked: Option<bool>,
    pub remove_unlinked: Option<bool>,
}

/// Decodes a JSON payload.
///
/// Syntax errors are reported as [`ErrorCode::E001`], well-formed JSON of
/// the wrong shape as [`ErrorCode::E002`]. Both carry the position serde
/// reported.
pub(crate) fn from_json(source: &str) -> Result<RawModel, Diagnostic> {
    serde_json::from_str(source).map_err(|err| {
        let code = match err.classify() {
            Category::Data => ErrorCode::E002,
            Category::Io | Category::Syntax | Category::Eof => ErrorCode::E001,
        };
        let location = Subject::Location {
            line: err.line(),
            column: err.column(),
        };

        Diagnostic::error(format!("{}: {err}", code.description()))
            .with_code(code)
            .with_label(location, "payload rejected here")
    })
}
