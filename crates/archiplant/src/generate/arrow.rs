//! Arrow templates for relationship kinds.
//!
//! Every [`RelationshipKind`] has one fixed [`ArrowTemplate`]. Direction
//! hints and user styling are spliced into the middle of the arrow as PlantUML
//! inline modifiers, so the markers at both ends never change.

use archiplant_core::{
    model::Relationship,
    relationship::RelationshipKind,
    style::{Direction, LineStyle},
};

/// The glyphs making up one arrow, e.g. `*--` or `-[dotted]->`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowTemplate {
    /// Source-end marker, e.g. `*` for a filled diamond.
    pub tail: &'static str,
    /// Line segment character: `-` solid, `.` dashed.
    pub line: char,
    /// Target-end marker, e.g. `|>` for a hollow triangle.
    pub head: &'static str,
    /// Built-in inline style, e.g. `dotted`.
    pub style: Option<&'static str>,
}

const fn arrow(
    tail: &'static str,
    line: char,
    head: &'static str,
    style: Option<&'static str>,
) -> ArrowTemplate {
    ArrowTemplate {
        tail,
        line,
        head,
        style,
    }
}

static TEMPLATES: [(RelationshipKind, ArrowTemplate); 12] = [
    (RelationshipKind::Access, arrow("", '-', ">", Some("dotted"))),
    (RelationshipKind::Aggregation, arrow("o", '-', "", None)),
    (RelationshipKind::Assignment, arrow("*", '-', ">", None)),
    (RelationshipKind::Association, arrow("", '-', "", None)),
    (RelationshipKind::DirectedAssociation, arrow("", '-', ">", Some("plain"))),
    (RelationshipKind::Composition, arrow("*", '-', "", None)),
    (RelationshipKind::Flow, arrow("", '.', ">", None)),
    (RelationshipKind::Influence, arrow("", '-', ">", Some("dashed"))),
    (RelationshipKind::Realization, arrow("", '.', "|>", None)),
    (RelationshipKind::Serving, arrow("", '-', ">", None)),
    (RelationshipKind::Specialization, arrow("", '-', "|>", None)),
    (RelationshipKind::Triggering, arrow("", '-', ">", Some("bold"))),
];

/// Looks up the template for `kind`.
pub fn template_for(kind: RelationshipKind) -> Option<&'static ArrowTemplate> {
    TEMPLATES
        .iter()
        .find(|(candidate, _)| *candidate == kind)
        .map(|(_, template)| template)
}

impl ArrowTemplate {
    /// Renders the arrow with optional direction and styling modifiers.
    ///
    /// A user `line_style` replaces the built-in style. A color is appended
    /// after the style.
    pub fn render(
        &self,
        direction: Option<Direction>,
        line_style: Option<LineStyle>,
        color: Option<&str>,
    ) -> String {
        let style = line_style.map(LineStyle::modifier).or(self.style);
        let modifiers: Vec<&str> = style.into_iter().chain(color).collect();

        let mut arrow = String::from(self.tail);
        arrow.push(self.line);
        if let Some(direction) = direction {
            arrow.push_str(direction.into());
        }
        if !modifiers.is_empty() {
            arrow.push('[');
            arrow.push_str(&modifiers.join(","));
            arrow.push(']');
        }
        arrow.push(self.line);
        arrow.push_str(self.head);
        arrow
    }

    /// Renders the arrow for `relationship`, applying its own styling.
    pub fn render_for(&self, relationship: &Relationship) -> String {
        let color = relationship.color().map(|color| color.to_hex());
        self.render(
            relationship.direction(),
            relationship.line_style(),
            color.as_deref(),
        )
    }
}

/// Label shown when a relationship has none of its own.
pub fn default_label(kind: RelationshipKind) -> String {
    let mut label = String::new();
    for (i, c) in kind.name().chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            label.push(' ');
        }
        label.extend(c.to_lowercase());
    }
    label
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_every_kind_has_a_template() {
        for kind in RelationshipKind::ALL {
            assert!(template_for(kind).is_some(), "{kind}");
        }
    }

    #[test]
    fn test_templates_are_distinct() {
        let arrows: HashSet<String> = RelationshipKind::ALL
            .into_iter()
            .filter_map(template_for)
            .map(|template| template.render(None, None, None))
            .collect();

        assert_eq!(arrows.len(), 12);
    }

    #[test]
    fn test_base_glyphs() {
        let render = |kind| template_for(kind).unwrap().render(None, None, None);

        assert_eq!(render(RelationshipKind::Composition), "*--");
        assert_eq!(render(RelationshipKind::Aggregation), "o--");
        assert_eq!(render(RelationshipKind::Assignment), "*-->");
        assert_eq!(render(RelationshipKind::Specialization), "--|>");
        assert_eq!(render(RelationshipKind::Realization), "..|>");
        assert_eq!(render(RelationshipKind::Serving), "-->");
        assert_eq!(render(RelationshipKind::Access), "-[dotted]->");
        assert_eq!(render(RelationshipKind::Flow), "..>");
    }

    #[test]
    fn test_modifiers_keep_markers() {
        let composition = template_for(RelationshipKind::Composition).unwrap();
        assert_eq!(
            composition.render(Some(Direction::Up), None, Some("#FF0000")),
            "*-up[#FF0000]-"
        );

        let access = template_for(RelationshipKind::Access).unwrap();
        assert_eq!(
            access.render(None, Some(LineStyle::Bold), None),
            "-[bold]->"
        );
        assert_eq!(
            access.render(Some(Direction::Left), None, Some("#00FF00")),
            "-left[dotted,#00FF00]->"
        );
    }

    #[test]
    fn test_default_label() {
        assert_eq!(default_label(RelationshipKind::Serving), "serving");
        assert_eq!(
            default_label(RelationshipKind::DirectedAssociation),
            "directed association"
        );
    }
}
