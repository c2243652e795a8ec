//! Markdown architecture report.
//!
//! The report summarizes a validated model for readers without a PlantUML
//! viewer: counts per layer, the elements of every layer, the relationship
//! list and a short connectivity analysis.

use std::fmt::Write;

use indexmap::IndexMap;
use log::debug;

use archiplant_core::{
    layer::Layer,
    model::{Element, Model},
};

const DEFAULT_TITLE: &str = "Architecture Model";
const DESCRIPTION_WIDTH: usize = 50;
const MOST_CONNECTED: usize = 5;

/// Writes the report for `model`.
///
/// `image` is the file name of a rendered diagram to embed, relative to the
/// report.
pub fn architecture_markdown(model: &Model, image: Option<&str>) -> String {
    let title = model.title().unwrap_or(DEFAULT_TITLE);
    let mut report = String::new();

    let _ = writeln!(&mut report, "# {}\n", inline(title));
    if let Some(description) = model.description() {
        let _ = writeln!(&mut report, "**Description:** {}\n", inline(description));
    }
    if let Some(image) = image {
        let _ = writeln!(&mut report, "![{}]({image})\n", inline(title));
    }

    let by_layer = by_layer(model);
    write_overview(&mut report, model, &by_layer);
    write_elements(&mut report, &by_layer);
    write_relationships(&mut report, model);
    write_insights(&mut report, model);

    let _ = writeln!(&mut report, "---\n\n*Generated by archiplant*");

    debug!(bytes = report.len(); "Architecture report written");
    report
}

/// Elements grouped by layer, layers in canonical order.
fn by_layer(model: &Model) -> IndexMap<Layer, Vec<&Element>> {
    let mut layers: IndexMap<Layer, Vec<&Element>> = IndexMap::new();
    for element in model.elements() {
        layers.entry(element.layer()).or_default().push(element);
    }
    layers.sort_unstable_keys();
    layers
}

fn write_overview(
    report: &mut String,
    model: &Model,
    by_layer: &IndexMap<Layer, Vec<&Element>>,
) {
    let _ = writeln!(report, "## Overview\n");
    let _ = writeln!(report, "| Metric | Count |\n|--------|-------|");
    let _ = writeln!(report, "| Total Elements | {} |", model.elements().len());
    let _ = writeln!(
        report,
        "| Total Relationships | {} |",
        model.relationships().len()
    );
    for (layer, elements) in by_layer {
        let _ = writeln!(report, "| {layer} Elements | {} |", elements.len());
    }
    let _ = writeln!(report);
}

fn write_elements(report: &mut String, by_layer: &IndexMap<Layer, Vec<&Element>>) {
    let _ = writeln!(report, "## Elements by Layer\n");

    for (layer, elements) in by_layer {
        let _ = writeln!(report, "### {layer} Layer\n");
        let _ = writeln!(
            report,
            "| Element | Type | Description |\n|---------|------|-------------|"
        );

        let mut sorted = elements.clone();
        sorted.sort_by(|a, b| a.name().cmp(b.name()));
        for element in sorted {
            let description = element
                .description()
                .or(element.documentation())
                .map(shortened)
                .unwrap_or_default();
            let _ = writeln!(
                report,
                "| {} | {} | {} |",
                cell(element.name()),
                element.element_type().exchange_name(),
                cell(&description)
            );
        }
        let _ = writeln!(report);
    }
}

fn write_relationships(report: &mut String, model: &Model) {
    let _ = writeln!(report, "## Relationships\n");

    if !model.relationships().is_empty() {
        let _ = writeln!(
            report,
            "| Source | Relationship | Target |\n|--------|--------------|--------|"
        );
        for relationship in model.relationships() {
            let _ = writeln!(
                report,
                "| {} | {} | {} |",
                cell(display_name(model, relationship.source())),
                relationship.kind(),
                cell(display_name(model, relationship.target()))
            );
        }
    }
    let _ = writeln!(report);
}

fn write_insights(report: &mut String, model: &Model) {
    let _ = writeln!(report, "## Architecture Insights\n");

    if model.relationships().is_empty() {
        let _ = writeln!(
            report,
            "No specific insights available for this architecture.\n"
        );
        return;
    }

    let mut kinds: IndexMap<&str, usize> = IndexMap::new();
    let mut connections: IndexMap<&str, usize> = IndexMap::new();
    for relationship in model.relationships() {
        *kinds.entry(relationship.kind().name()).or_default() += 1;
        for end in [relationship.source(), relationship.target()] {
            *connections.entry(end).or_default() += 1;
        }
    }
    // Stable sorts, so ties keep first-seen order.
    kinds.sort_by(|_, a, _, b| b.cmp(a));
    connections.sort_by(|_, a, _, b| b.cmp(a));

    let _ = writeln!(report, "### Relationship Analysis\n");
    for (kind, count) in &kinds {
        let _ = writeln!(report, "- **{kind}**: {count} {}", plural(*count, "relationship"));
    }

    let most_connected: Vec<(&Element, usize)> = connections
        .iter()
        .filter_map(|(id, count)| model.element(id).map(|element| (element, *count)))
        .take(MOST_CONNECTED)
        .collect();
    if !most_connected.is_empty() {
        let _ = writeln!(report, "\n### Most Connected Elements\n");
        for (element, count) in most_connected {
            let _ = writeln!(
                report,
                "- **{}**: {count} {}",
                inline(element.name()),
                plural(count, "connection")
            );
        }
    }
    let _ = writeln!(report);
}

fn display_name<'a>(model: &'a Model, id: &'a str) -> &'a str {
    model
        .element(id)
        .map(Element::name)
        .or_else(|| model.group(id).map(|group| group.name()))
        .unwrap_or(id)
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

fn shortened(text: &str) -> String {
    if text.chars().count() > DESCRIPTION_WIDTH {
        let head: String = text.chars().take(DESCRIPTION_WIDTH).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Text on a single Markdown line.
fn inline(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text inside a table cell.
fn cell(text: &str) -> String {
    inline(text).replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use archiplant_core::{
        element::ElementType,
        model::{Group, Relationship},
        relationship::RelationshipKind,
        style::GroupType,
    };

    use super::*;

    fn element(id: &str, name: &str, element_type: ElementType) -> Element {
        Element::new(id, name, element_type, element_type.layer())
    }

    fn sample() -> Model {
        Model::new(Some("Front office".to_string()))
            .with_description("Who serves the clerk")
            .with_element(element("clerk", "Clerk", ElementType::BusinessActor))
            .with_element(element("role", "Teller", ElementType::BusinessRole))
            .with_element(
                element("crm", "CRM", ElementType::ApplicationComponent)
                    .with_description("Customer relationship management for the whole bank"),
            )
            .with_group(Group::new("g", "Branch", GroupType::Package))
            .with_relationship(Relationship::new("r1", "crm", "clerk", RelationshipKind::Serving))
            .with_relationship(Relationship::new("r2", "clerk", "role", RelationshipKind::Assignment))
            .with_relationship(Relationship::new("r3", "crm", "role", RelationshipKind::Serving))
            .with_relationship(Relationship::new("r4", "g", "crm", RelationshipKind::Composition))
    }

    #[test]
    fn test_header_and_overview() {
        let report = architecture_markdown(&sample(), Some("Front_office.png"));

        assert!(report.starts_with(
            "# Front office\n\n**Description:** Who serves the clerk\n\n![Front office](Front_office.png)\n\n## Overview\n"
        ));
        assert!(report.contains("| Total Elements | 3 |\n| Total Relationships | 4 |\n| Business Elements | 2 |\n| Application Elements | 1 |\n"));
        assert!(report.trim_end().ends_with("*Generated by archiplant*"));
    }

    #[test]
    fn test_elements_sorted_by_name_within_layer() {
        let report = architecture_markdown(&sample(), None);

        let clerk = report.find("| Clerk | BusinessActor |  |").unwrap();
        let teller = report.find("| Teller | BusinessRole |  |").unwrap();
        assert!(clerk < teller);
        assert!(report.contains("### Application Layer"));
        assert!(report.contains(
            "| CRM | ApplicationComponent | Customer relationship management for the whole ban... |"
        ));
        assert!(!report.contains("!["));
    }

    #[test]
    fn test_relationships_use_names() {
        let report = architecture_markdown(&sample(), None);

        assert!(report.contains("| CRM | Serving | Clerk |"));
        assert!(report.contains("| Branch | Composition | CRM |"));
    }

    #[test]
    fn test_insights() {
        let report = architecture_markdown(&sample(), None);

        assert!(report.contains(
            "### Relationship Analysis\n\n- **Serving**: 2 relationships\n- **Assignment**: 1 relationship\n- **Composition**: 1 relationship\n"
        ));
        assert!(report.contains(
            "### Most Connected Elements\n\n- **CRM**: 3 connections\n- **Clerk**: 2 connections\n- **Teller**: 2 connections\n"
        ));
    }

    #[test]
    fn test_empty_model() {
        let report = architecture_markdown(&Model::new(None), None);

        assert!(report.starts_with("# Architecture Model\n"));
        assert!(report.contains("| Total Elements | 0 |"));
        assert!(report.contains("No specific insights available for this architecture."));
    }

    #[test]
    fn test_cells_escaped() {
        let model = Model::new(Some("Ops\nView".to_string()))
            .with_element(element("a", "A | B", ElementType::Goal));
        let report = architecture_markdown(&model, None);

        assert!(report.starts_with("# Ops View\n"));
        assert!(report.contains("| A \\| B | Goal |  |"));
    }
}
