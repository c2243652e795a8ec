//! PlantUML source generation.
//!
//! The [`Generator`] turns a validated [`Model`] into PlantUML ArchiMate text.
//! Output depends only on the model and the [`LayoutOptions`], so generating
//! the same model twice yields byte-identical text.
//!
//! # Output Layout
//!
//! ```text
//! @startuml + includes
//! theme skinparams
//! title / description / direction
//! groups (pre-order), then ungrouped elements
//! hide lines for unlinked elements
//! ' Relationships
//! legend
//! @enduml
//! ```

pub mod arrow;
pub mod element;
pub mod theme;

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, info};

use archiplant_core::{
    layer::Layer,
    layout::LayoutOptions,
    model::{Element, Group, Model},
};

use crate::error::ArchiplantError;

use arrow::{default_label, template_for};
use element::{alias, element_lines, quoted};
use theme::{ThemeStyle, layer_color};

const INDENT: &str = "  ";

/// Generates PlantUML text for one model under fixed layout options.
#[derive(Debug, Clone, Copy)]
pub struct Generator {
    options: LayoutOptions,
    style: ThemeStyle,
}

impl Generator {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            style: ThemeStyle::of(options.theme),
        }
    }

    /// Generates the complete PlantUML document for `model`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiplantError::UnsupportedType`] if a relationship kind has
    /// no arrow template.
    pub fn generate(&self, model: &Model) -> Result<String, ArchiplantError> {
        info!(
            elements = model.elements().len(),
            relationships = model.relationships().len(),
            theme:% = self.options.theme;
            "Generating PlantUML"
        );

        let mut lines: Vec<String> = vec![
            "@startuml".to_string(),
            "!pragma charset UTF-8".to_string(),
            "!include <archimate/Archimate>".to_string(),
            String::new(),
        ];
        lines.extend(self.style.skinparams());
        lines.push(format!(
            "skinparam componentStyle {}",
            self.style.component_style()
        ));
        lines.push(String::new());

        if self.options.show_title {
            if let Some(title) = model.title() {
                lines.push(format!("title {}", quoted(title)));
            }
        }
        if let Some(description) = model.description() {
            lines.extend(
                description
                    .lines()
                    .map(|line| format!("' {}", line.replace('\r', " "))),
            );
        }

        let (nodesep, ranksep) = self.options.spacing.separation();
        lines.push(self.options.direction.directive().to_string());
        lines.push(format!("skinparam nodesep {nodesep}"));
        lines.push(format!("skinparam ranksep {ranksep}"));
        lines.push(String::new());

        let unlinked = unlinked(model);
        let removed: &[&str] = if self.options.remove_unlinked && !self.options.hide_unlinked {
            &unlinked
        } else {
            &[]
        };
        if !removed.is_empty() {
            debug!(removed = removed.len(); "Leaving out unlinked elements");
        }

        self.write_body(model, removed, &mut lines);
        lines.push(String::new());

        if self.options.hide_unlinked && !unlinked.is_empty() {
            lines.extend(unlinked.iter().map(|id| format!("hide {}", alias(id))));
            lines.push(String::new());
        }

        lines.push("' Relationships".to_string());
        for relationship in model.relationships() {
            let template = template_for(relationship.kind()).ok_or_else(|| {
                ArchiplantError::UnsupportedType(relationship.kind().to_string())
            })?;

            let mut line = format!(
                "{} {} {}",
                alias(relationship.source()),
                template.render_for(relationship),
                alias(relationship.target())
            );
            if self.options.show_relationship_labels {
                let label = relationship
                    .label()
                    .map(quoted)
                    .unwrap_or_else(|| default_label(relationship.kind()));
                line.push_str(&format!(" : {label}"));
            }
            lines.push(line);
        }

        if self.options.show_legend {
            lines.push(String::new());
            lines.extend(legend(&model.layers()));
        }

        lines.push(String::new());
        lines.push("@enduml".to_string());

        debug!(lines = lines.len(); "PlantUML generated");
        Ok(lines.join("\n") + "\n")
    }

    fn write_body(&self, model: &Model, removed: &[&str], lines: &mut Vec<String>) {
        let forest = GroupForest::new(model, removed);

        for root in &forest.roots {
            self.write_group(&forest, root, 0, lines);
        }

        let ungrouped: Vec<&Element> = model
            .elements()
            .iter()
            .filter(|element| !forest.owns(element) && !removed.contains(&element.id()))
            .collect();

        let mut by_layer: IndexMap<Layer, Vec<&Element>> = IndexMap::new();
        for &element in &ungrouped {
            by_layer.entry(element.layer()).or_default().push(element);
        }
        by_layer.sort_unstable_keys();

        if self.options.group_by_layer && by_layer.len() > 1 {
            for (layer, elements) in &by_layer {
                lines.push(format!("package \"{layer}\" {{"));
                for element in elements {
                    self.write_element(element, 1, lines);
                }
                lines.push("}".to_string());
            }
        } else {
            for element in ungrouped {
                self.write_element(element, 0, lines);
            }
        }
    }

    fn write_group(
        &self,
        forest: &GroupForest<'_>,
        group: &Group,
        depth: usize,
        lines: &mut Vec<String>,
    ) {
        let indent = INDENT.repeat(depth);
        lines.push(format!(
            "{indent}{} \"{}\" as {} {{",
            group.group_type(),
            quoted(group.name()),
            alias(group.id())
        ));

        for child in forest.children(group.id()) {
            self.write_group(forest, child, depth + 1, lines);
        }
        for element in forest.members(group.id()) {
            self.write_element(element, depth + 1, lines);
        }

        lines.push(format!("{indent}}}"));
    }

    fn write_element(&self, element: &Element, depth: usize, lines: &mut Vec<String>) {
        let indent = INDENT.repeat(depth);
        lines.extend(
            element_lines(element, self.options.show_element_types)
                .into_iter()
                .map(|line| format!("{indent}{line}")),
        );
    }
}

/// Groups arranged as a parent/child forest, with their member elements.
///
/// Children and members keep input order.
struct GroupForest<'a> {
    roots: Vec<&'a Group>,
    children: IndexMap<&'a str, Vec<&'a Group>>,
    members: IndexMap<&'a str, Vec<&'a Element>>,
}

impl<'a> GroupForest<'a> {
    /// Builds the forest. Elements in `removed` are not members of any group.
    fn new(model: &'a Model, removed: &[&str]) -> Self {
        let mut roots = Vec::new();
        let mut children: IndexMap<&str, Vec<&Group>> = IndexMap::new();
        for group in model.groups() {
            match group.parent_id() {
                Some(parent) if model.group(parent).is_some() => {
                    children.entry(parent).or_default().push(group)
                }
                _ => roots.push(group),
            }
        }

        let mut members: IndexMap<&str, Vec<&Element>> = IndexMap::new();
        for element in model.elements() {
            if removed.contains(&element.id()) {
                continue;
            }
            if let Some(group_id) = element.group_id() {
                if model.group(group_id).is_some() {
                    members.entry(group_id).or_default().push(element);
                }
            }
        }

        Self {
            roots,
            children,
            members,
        }
    }

    fn children(&self, id: &str) -> &[&'a Group] {
        self.children.get(id).map_or(&[], Vec::as_slice)
    }

    fn members(&self, id: &str) -> &[&'a Element] {
        self.members.get(id).map_or(&[], Vec::as_slice)
    }

    fn owns(&self, element: &Element) -> bool {
        element
            .group_id()
            .is_some_and(|group_id| self.members.contains_key(group_id))
    }
}

/// Ids of elements no relationship touches, in declaration order.
fn unlinked(model: &Model) -> Vec<&str> {
    let linked: HashSet<&str> = model
        .relationships()
        .iter()
        .flat_map(|relationship| [relationship.source(), relationship.target()])
        .collect();

    model
        .elements()
        .iter()
        .map(Element::id)
        .filter(|id| !linked.contains(id))
        .collect()
}

fn legend(layers: &[Layer]) -> Vec<String> {
    let mut lines = vec!["legend right".to_string()];
    lines.extend(
        layers
            .iter()
            .map(|layer| format!("  <back:{}>    </back> {layer}", layer_color(*layer))),
    );
    lines.push("end legend".to_string());
    lines
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use archiplant_core::{
        element::ElementType,
        layout::{LayoutDirection, Spacing, Theme},
        model::Relationship,
        relationship::RelationshipKind,
    };

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn options_strategy() -> impl Strategy<Value = LayoutOptions> {
        (
            prop::sample::select(Theme::ALL.to_vec()),
            prop::sample::select(vec![Spacing::Compact, Spacing::Balanced, Spacing::Comfortable]),
            prop::sample::select(vec![LayoutDirection::TopToBottom, LayoutDirection::LeftToRight]),
            any::<[bool; 7]>(),
        )
            .prop_map(|(theme, spacing, direction, flags)| LayoutOptions {
                direction,
                spacing,
                theme,
                show_title: flags[0],
                show_legend: flags[1],
                group_by_layer: flags[2],
                show_element_types: flags[3],
                show_relationship_labels: flags[4],
                hide_unlinked: flags[5],
                remove_unlinked: flags[6],
            })
    }

    fn model_strategy() -> impl Strategy<Value = Model> {
        let elements = prop::collection::vec(prop::sample::select(ElementType::ALL), 1..12);
        let kinds = prop::collection::vec(
            (
                prop::sample::select(RelationshipKind::ALL.to_vec()),
                any::<prop::sample::Index>(),
                any::<prop::sample::Index>(),
            ),
            0..16,
        );

        (elements, kinds).prop_map(|(types, links)| {
            let mut model = Model::new(Some("Generated".to_string()));
            for (i, element_type) in types.iter().enumerate() {
                model = model.with_element(Element::new(
                    format!("e{i}"),
                    format!("Element {i}"),
                    *element_type,
                    element_type.layer(),
                ));
            }
            for (i, (kind, source, target)) in links.into_iter().enumerate() {
                model = model.with_relationship(Relationship::new(
                    format!("r{i}"),
                    format!("e{}", source.index(types.len())),
                    format!("e{}", target.index(types.len())),
                    kind,
                ));
            }
            model
        })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Two generations of the same model are byte-identical.
    fn check_deterministic(model: &Model, options: LayoutOptions) -> Result<(), TestCaseError> {
        let first = Generator::new(options).generate(model);
        let second = Generator::new(options).generate(model);

        prop_assert!(first.is_ok());
        prop_assert_eq!(first.ok(), second.ok());
        Ok(())
    }

    /// Every element id appears as an alias in the output.
    fn check_every_element_emitted(
        model: &Model,
        options: LayoutOptions,
    ) -> Result<(), TestCaseError> {
        let output = Generator::new(options)
            .generate(model)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        let dropped = if options.remove_unlinked && !options.hide_unlinked {
            unlinked(model)
        } else {
            Vec::new()
        };

        for element in model
            .elements()
            .iter()
            .filter(|element| !dropped.contains(&element.id()))
        {
            let id = element.id();
            prop_assert!(
                output.contains(&format!("({id},")) || output.contains(&format!(" as {id}")),
                "missing {}",
                id
            );
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn deterministic(model in model_strategy(), options in options_strategy()) {
            check_deterministic(&model, options)?;
        }

        #[test]
        fn every_element_emitted(model in model_strategy(), options in options_strategy()) {
            check_every_element_emitted(&model, options)?;
        }
    }
}
