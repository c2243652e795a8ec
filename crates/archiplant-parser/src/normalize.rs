//! Normalization of raw payloads into the typed model.
//!
//! Every free-form name in a [`RawModel`] is resolved to its canonical
//! value through a [`Vocabulary`]. Lookup is forgiving about case and
//! separators, and accepts the synonyms users commonly write. Names that
//! cannot be resolved are all collected, each with the closest known
//! spelling as a suggestion, before the model is rejected.

use std::sync::LazyLock;

use log::{debug, trace};

use archiplant_core::{
    color::Color,
    element::ElementType,
    layer::Layer,
    layout::{LayoutDirection, LayoutRequest, Spacing, Theme},
    model::{Element, Group, Interface, Model, Note, Port, Relationship},
    relationship::RelationshipKind,
    style::{Direction, GroupType, LineStyle, NotePosition, PortDirection},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError, Subject},
    lookup::Vocabulary,
    payload::{RawElement, RawGroup, RawLayout, RawModel, RawNote, RawPort, RawRelationship},
};

// =============================================================================
// Vocabularies
// =============================================================================

static ELEMENT_TYPES: LazyLock<Vocabulary<ElementType>> = LazyLock::new(|| {
    let canonical = ElementType::ALL.iter().fold(
        Vocabulary::new(|t: ElementType| t.plantuml_macro().to_string()),
        |vocabulary, element_type| {
            vocabulary
                .with(element_type.plantuml_macro(), *element_type)
                .with(element_type.exchange_name(), *element_type)
        },
    );

    // Bare behavior and structure names default to the business layer.
    canonical
        .with("Actor", ElementType::BusinessActor)
        .with("Role", ElementType::BusinessRole)
        .with("Collaboration", ElementType::BusinessCollaboration)
        .with("Interface", ElementType::BusinessInterface)
        .with("Process", ElementType::BusinessProcess)
        .with("Function", ElementType::BusinessFunction)
        .with("Interaction", ElementType::BusinessInteraction)
        .with("Event", ElementType::BusinessEvent)
        .with("Service", ElementType::BusinessService)
        .with("Object", ElementType::BusinessObject)
        .with("Business_Location", ElementType::Location)
        .with("Component", ElementType::ApplicationComponent)
        .with("Artefact", ElementType::Artifact)
});

static LAYERS: LazyLock<Vocabulary<Layer>> = LazyLock::new(|| {
    let canonical = Layer::ALL.into_iter().fold(
        Vocabulary::new(|layer: Layer| layer.name().to_string()),
        |vocabulary, layer| {
            vocabulary
                .with(layer.name(), layer)
                .with(&format!("{}_layer", layer.name()), layer)
        },
    );

    canonical
        .with("app", Layer::Application)
        .with_all(&["tech", "infrastructure"], Layer::Technology)
        .with_all(
            &["migration", "implementation_migration", "implementation_and_migration"],
            Layer::Implementation,
        )
});

static RELATIONSHIP_KINDS: LazyLock<Vocabulary<RelationshipKind>> = LazyLock::new(|| {
    let canonical = RelationshipKind::ALL.into_iter().fold(
        Vocabulary::new(|kind: RelationshipKind| kind.name().to_string()),
        |vocabulary, kind| {
            vocabulary
                .with(kind.name(), kind)
                .with(&format!("Rel_{}", kind.name()), kind)
        },
    );

    canonical
        .with_all(
            &["accesses", "reads", "writes", "AccessRelationship"],
            RelationshipKind::Access,
        )
        .with_all(
            &["aggregates", "AggregationRelationship"],
            RelationshipKind::Aggregation,
        )
        .with_all(
            &["assigned", "assigned_to", "assigns", "AssignmentRelationship"],
            RelationshipKind::Assignment,
        )
        .with_all(
            &["associated", "associates", "associated_with", "AssociationRelationship"],
            RelationshipKind::Association,
        )
        .with_all(
            &["association_dir", "directed", "Rel_Association_dir"],
            RelationshipKind::DirectedAssociation,
        )
        .with_all(
            &["composes", "composed_of", "contains", "CompositionRelationship"],
            RelationshipKind::Composition,
        )
        .with_all(&["flows", "flows_to", "FlowRelationship"], RelationshipKind::Flow)
        .with_all(
            &["influences", "InfluenceRelationship"],
            RelationshipKind::Influence,
        )
        .with_all(
            &["realizes", "realises", "implements", "RealizationRelationship"],
            RelationshipKind::Realization,
        )
        .with_all(&["serves", "serve", "ServingRelationship"], RelationshipKind::Serving)
        .with_all(
            &[
                "specializes",
                "specialises",
                "inherits",
                "is_a",
                "generalization",
                "SpecializationRelationship",
            ],
            RelationshipKind::Specialization,
        )
        .with_all(
            &["triggers", "TriggeringRelationship"],
            RelationshipKind::Triggering,
        )
});

static GROUP_TYPES: LazyLock<Vocabulary<GroupType>> = LazyLock::new(|| {
    keywords(GroupType::ALL)
        .with("pkg", GroupType::Package)
        .with("box", GroupType::Rectangle)
});

static DIRECTIONS: LazyLock<Vocabulary<Direction>> = LazyLock::new(|| {
    keywords(Direction::ALL)
        .with("top", Direction::Up)
        .with("bottom", Direction::Down)
});

static LINE_STYLES: LazyLock<Vocabulary<LineStyle>> = LazyLock::new(|| {
    keywords(LineStyle::ALL)
        .with("plain", LineStyle::Solid)
        .with("dash", LineStyle::Dashed)
        .with("dot", LineStyle::Dotted)
        .with("thick", LineStyle::Bold)
});

static NOTE_POSITIONS: LazyLock<Vocabulary<NotePosition>> = LazyLock::new(|| {
    keywords(NotePosition::ALL)
        .with("above", NotePosition::Top)
        .with("below", NotePosition::Bottom)
});

static PORT_DIRECTIONS: LazyLock<Vocabulary<PortDirection>> = LazyLock::new(|| {
    keywords(PortDirection::ALL)
        .with_all(&["input", "portin"], PortDirection::In)
        .with_all(&["output", "portout"], PortDirection::Out)
        .with_all(&["bidirectional", "both", "port"], PortDirection::InOut)
});

static LAYOUT_DIRECTIONS: LazyLock<Vocabulary<LayoutDirection>> = LazyLock::new(|| {
    Vocabulary::new(|direction: LayoutDirection| direction.to_string())
        .with_all(
            &["top_to_bottom", "top_bottom", "vertical", "tb", "top_down"],
            LayoutDirection::TopToBottom,
        )
        .with_all(
            &["left_to_right", "left_right", "horizontal", "lr"],
            LayoutDirection::LeftToRight,
        )
});

static SPACINGS: LazyLock<Vocabulary<Spacing>> = LazyLock::new(|| {
    Vocabulary::new(|spacing: Spacing| spacing.to_string())
        .with_all(&["compact", "tight"], Spacing::Compact)
        .with_all(&["balanced", "normal"], Spacing::Balanced)
        .with_all(&["comfortable", "wide", "loose"], Spacing::Comfortable)
});

static THEMES: LazyLock<Vocabulary<Theme>> = LazyLock::new(|| {
    Theme::ALL.into_iter().fold(
        Vocabulary::new(|theme: Theme| theme.to_string()),
        |vocabulary, theme| vocabulary.with(&theme.to_string(), theme),
    )
});

/// Builds a vocabulary from an enum's canonical keywords.
fn keywords<T>(values: &'static [T]) -> Vocabulary<T>
where
    T: Copy + PartialEq + std::fmt::Display + 'static,
    &'static str: From<T>,
{
    values.iter().fold(
        Vocabulary::new(|value: T| value.to_string()),
        |vocabulary, value| vocabulary.with(<&'static str>::from(*value), *value),
    )
}

// =============================================================================
// Public lookups
// =============================================================================

/// Resolves an element type name, e.g. `business-actor` or `DataObject`.
pub fn resolve_element_type(name: &str) -> Option<ElementType> {
    ELEMENT_TYPES.resolve(name).ok()
}

/// Resolves a relationship type name, e.g. `serves` or `Rel_Serving`.
pub fn resolve_relationship_kind(name: &str) -> Option<RelationshipKind> {
    RELATIONSHIP_KINDS.resolve(name).ok()
}

/// Resolves a layer name, e.g. `tech`.
pub fn resolve_layer(name: &str) -> Option<Layer> {
    LAYERS.resolve(name).ok()
}

/// Resolves a layout direction, e.g. `vertical` or `left-to-right`.
pub fn resolve_direction(name: &str) -> Option<LayoutDirection> {
    LAYOUT_DIRECTIONS.resolve(name).ok()
}

/// Resolves a spacing preset, e.g. `loose`.
pub fn resolve_spacing(name: &str) -> Option<Spacing> {
    SPACINGS.resolve(name).ok()
}

pub fn resolve_theme(name: &str) -> Option<Theme> {
    THEMES.resolve(name).ok()
}

// =============================================================================
// Normalizer
// =============================================================================

/// Converts a raw payload into a typed [`Model`].
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every unresolvable name in the payload.
pub(crate) fn normalize(raw: &RawModel) -> Result<Model, ParseError> {
    let mut normalizer = Normalizer::default();
    let model = normalizer.model(raw);
    normalizer.collector.finish()?;

    debug!(
        elements = model.elements().len(),
        relationships = model.relationships().len(),
        groups = model.groups().len();
        "Model normalized"
    );
    trace!(model:?; "Normalized model");

    Ok(model)
}

#[derive(Default)]
struct Normalizer {
    collector: DiagnosticCollector,
}

impl Normalizer {
    fn model(&mut self, raw: &RawModel) -> Model {
        let mut model = Model::new(non_empty(raw.title.as_deref()))
            .with_layout(self.layout(&raw.layout));

        if let Some(description) = non_empty(raw.description.as_deref()) {
            model = model.with_description(description);
        }

        for group in &raw.groups {
            if let Some(group) = self.group(group) {
                model = model.with_group(group);
            }
        }
        for element in &raw.elements {
            if let Some(element) = self.element(element) {
                model = model.with_element(element);
            }
        }
        for relationship in &raw.relationships {
            if let Some(relationship) = self.relationship(relationship) {
                model = model.with_relationship(relationship);
            }
        }

        model
    }

    fn element(&mut self, raw: &RawElement) -> Option<Element> {
        let subject = Subject::element(&raw.id);

        let element_type = self.required(
            &ELEMENT_TYPES,
            &raw.element_type,
            ErrorCode::E100,
            "element type",
            &subject,
        );
        let layer = match raw.layer.as_deref() {
            Some(layer) => self.required(&LAYERS, layer, ErrorCode::E101, "layer", &subject),
            None => element_type.map(ElementType::layer),
        };
        let color = self.color(raw.color.as_deref(), &subject);
        let grouping_style = self.optional(
            &GROUP_TYPES,
            raw.grouping_style.as_deref(),
            ErrorCode::E103,
            "grouping style",
            &subject,
        );
        let ports: Vec<Port> = raw
            .ports
            .iter()
            .filter_map(|port| self.port(port, &subject))
            .collect();
        let notes: Vec<Note> = raw
            .notes
            .iter()
            .filter_map(|note| self.note(note, &subject))
            .collect();

        let (element_type, layer) = (element_type?, layer?);
        let (color, grouping_style) = (color?, grouping_style?);
        let name = raw.name.as_deref().unwrap_or(&raw.id);
        let mut element = Element::new(&raw.id, name, element_type, layer)
            .with_show_as_component(raw.show_as_component);

        if let Some(group_id) = non_empty(raw.group_id.as_deref()) {
            element = element.with_group(group_id);
        }
        if let Some(description) = non_empty(raw.description.as_deref()) {
            element = element.with_description(description);
        }
        if let Some(documentation) = non_empty(raw.documentation.as_deref()) {
            element = element.with_documentation(documentation);
        }
        if let Some(stereotype) = non_empty(raw.stereotype.as_deref()) {
            element = element.with_stereotype(stereotype);
        }
        for (key, value) in &raw.properties {
            let value = match value {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            element = element.with_property(key, value);
        }
        for interface in &raw.interfaces {
            let name = interface.name.as_deref().unwrap_or(&interface.id);
            let mut interface_record = Interface::new(&interface.id, name);
            if let Some(description) = non_empty(interface.description.as_deref()) {
                interface_record = interface_record.with_description(description);
            }
            element = element.with_interface(interface_record);
        }
        for port in ports {
            element = element.with_port(port);
        }
        for note in notes {
            element = element.with_note(note);
        }
        if let Some(color) = color {
            element = element.with_color(color);
        }
        if let Some(grouping_style) = grouping_style {
            element = element.with_grouping_style(grouping_style);
        }

        Some(element)
    }

    fn port(&mut self, raw: &RawPort, owner: &Subject) -> Option<Port> {
        let direction = self
            .optional(
                &PORT_DIRECTIONS,
                raw.direction.as_deref(),
                ErrorCode::E104,
                "port direction",
                owner,
            )?
            .unwrap_or_default();

        let name = raw.name.as_deref().unwrap_or(&raw.id);
        let mut port = Port::new(&raw.id, name, direction);
        if let Some(interface_type) = non_empty(raw.interface_type.as_deref()) {
            port = port.with_interface_type(interface_type);
        }
        if let Some(description) = non_empty(raw.description.as_deref()) {
            port = port.with_description(description);
        }
        Some(port)
    }

    fn note(&mut self, raw: &RawNote, owner: &Subject) -> Option<Note> {
        let position = self.optional(
            &NOTE_POSITIONS,
            raw.position.as_deref(),
            ErrorCode::E104,
            "note position",
            owner,
        );
        let background = self.color(raw.background_color.as_deref(), owner);
        let border = self.color(raw.border_color.as_deref(), owner);

        let mut note = Note::new(&raw.content)
            .with_position(position?.unwrap_or_default())
            .with_floating(raw.is_floating);
        if let Some(color) = background? {
            note = note.with_background_color(color);
        }
        if let Some(color) = border? {
            note = note.with_border_color(color);
        }
        Some(note)
    }

    fn relationship(&mut self, raw: &RawRelationship) -> Option<Relationship> {
        let subject = Subject::relationship(&raw.id);

        let kind = self.required(
            &RELATIONSHIP_KINDS,
            &raw.relationship_type,
            ErrorCode::E102,
            "relationship type",
            &subject,
        );
        let direction = self.optional(
            &DIRECTIONS,
            raw.direction.as_deref(),
            ErrorCode::E104,
            "direction",
            &subject,
        );
        let line_style = self.optional(
            &LINE_STYLES,
            raw.line_style.as_deref(),
            ErrorCode::E104,
            "line style",
            &subject,
        );
        let color = self.color(raw.color.as_deref(), &subject);

        let mut relationship =
            Relationship::new(&raw.id, &raw.from_element, &raw.to_element, kind?);
        if let Some(direction) = direction? {
            relationship = relationship.with_direction(direction);
        }
        if let Some(line_style) = line_style? {
            relationship = relationship.with_line_style(line_style);
        }
        if let Some(color) = color? {
            relationship = relationship.with_color(color);
        }
        if let Some(label) = non_empty(raw.label.as_deref()) {
            relationship = relationship.with_label(label);
        }
        if let Some(description) = non_empty(raw.description.as_deref()) {
            relationship = relationship.with_description(description);
        }
        Some(relationship)
    }

    fn group(&mut self, raw: &RawGroup) -> Option<Group> {
        let subject = Subject::group(&raw.id);

        let group_type = self
            .optional(
                &GROUP_TYPES,
                raw.group_type.as_deref(),
                ErrorCode::E103,
                "group type",
                &subject,
            )?
            .unwrap_or_default();

        let name = raw.name.as_deref().unwrap_or(&raw.id);
        let mut group = Group::new(&raw.id, name, group_type);
        if let Some(parent_id) = non_empty(raw.parent_group_id.as_deref()) {
            group = group.with_parent(parent_id);
        }
        Some(group)
    }

    fn layout(&mut self, raw: &RawLayout) -> LayoutRequest {
        LayoutRequest {
            direction: self.layout_option(&LAYOUT_DIRECTIONS, raw.direction.as_deref(), "direction"),
            spacing: self.layout_option(&SPACINGS, raw.spacing.as_deref(), "spacing"),
            theme: self.layout_option(&THEMES, raw.theme.as_deref(), "theme"),
            show_title: raw.show_title,
            show_legend: raw.show_legend,
            group_by_layer: raw.group_by_layer,
            show_element_types: raw.show_element_types,
            show_relationship_labels: raw.show_relationship_labels,
            hide_unlinked: raw.hide_unlinked,
            remove_unlinked: raw.remove_unlinked,
        }
    }

    fn layout_option<T: Copy + PartialEq>(
        &mut self,
        vocabulary: &Vocabulary<T>,
        value: Option<&str>,
        option: &str,
    ) -> Option<T> {
        let value = value?;
        match vocabulary.resolve(value) {
            Ok(resolved) => Some(resolved),
            Err(unresolved) => {
                let mut diag = Diagnostic::error(format!(
                    "invalid value `{value}` for layout option `{option}`"
                ))
                .with_code(ErrorCode::E104);
                if let Some(help) = unresolved.help() {
                    diag = diag.with_help(help);
                }
                self.collector.emit(diag);
                None
            }
        }
    }

    /// Resolves a mandatory name, reporting a missing or unknown value.
    fn required<T: Copy + PartialEq>(
        &mut self,
        vocabulary: &Vocabulary<T>,
        value: &str,
        code: ErrorCode,
        what: &str,
        subject: &Subject,
    ) -> Option<T> {
        if value.trim().is_empty() {
            self.collector.emit(
                Diagnostic::error(format!("{subject} has no {what}"))
                    .with_code(code)
                    .with_label(subject.clone(), format!("{what} missing")),
            );
            return None;
        }
        self.resolve(vocabulary, value, code, what, subject)
    }

    /// Resolves an optional name. The outer `None` means resolution failed.
    fn optional<T: Copy + PartialEq>(
        &mut self,
        vocabulary: &Vocabulary<T>,
        value: Option<&str>,
        code: ErrorCode,
        what: &str,
        subject: &Subject,
    ) -> Option<Option<T>> {
        match value.filter(|value| !value.trim().is_empty()) {
            Some(value) => self.resolve(vocabulary, value, code, what, subject).map(Some),
            None => Some(None),
        }
    }

    fn resolve<T: Copy + PartialEq>(
        &mut self,
        vocabulary: &Vocabulary<T>,
        value: &str,
        code: ErrorCode,
        what: &str,
        subject: &Subject,
    ) -> Option<T> {
        match vocabulary.resolve(value) {
            Ok(resolved) => Some(resolved),
            Err(unresolved) => {
                let mut diag = Diagnostic::error(format!("unknown {what} `{value}`"))
                    .with_code(code)
                    .with_label(subject.clone(), format!("used by this {}", subject_kind(subject)));
                if let Some(help) = unresolved.help() {
                    diag = diag.with_help(help);
                }
                self.collector.emit(diag);
                None
            }
        }
    }

    /// Parses an optional color. The outer `None` means parsing failed.
    fn color(&mut self, value: Option<&str>, subject: &Subject) -> Option<Option<Color>> {
        let Some(value) = value.filter(|value| !value.trim().is_empty()) else {
            return Some(None);
        };
        match Color::new(value) {
            Ok(color) => Some(Some(color)),
            Err(err) => {
                self.collector.emit(
                    Diagnostic::error(format!("invalid color `{value}`"))
                        .with_code(ErrorCode::E105)
                        .with_label(subject.clone(), err)
                        .with_help("use a CSS color name or a hex value such as `#4ECDC4`"),
                );
                None
            }
        }
    }
}

fn subject_kind(subject: &Subject) -> &'static str {
    match subject {
        Subject::Element(_) => "element",
        Subject::Relationship(_) => "relationship",
        Subject::Group(_) => "group",
        Subject::Location { .. } => "payload",
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::RawElement;

    fn raw_element(id: &str, element_type: &str) -> RawElement {
        RawElement {
            id: id.to_string(),
            element_type: element_type.to_string(),
            ..RawElement::default()
        }
    }

    #[test]
    fn test_element_type_spellings() {
        for spelling in [
            "Business_Process",
            "business_process",
            "business-process",
            "BusinessProcess",
            "BUSINESS PROCESS",
            "process",
        ] {
            assert_eq!(
                resolve_element_type(spelling),
                Some(ElementType::BusinessProcess),
                "{spelling}"
            );
        }
    }

    #[test]
    fn test_element_type_aliases() {
        assert_eq!(resolve_element_type("Component"), Some(ElementType::ApplicationComponent));
        assert_eq!(resolve_element_type("Data_Object"), Some(ElementType::DataObject));
        assert_eq!(resolve_element_type("Course_of_Action"), Some(ElementType::CourseOfAction));
        assert_eq!(resolve_element_type("Contract"), Some(ElementType::Contract));
        assert_eq!(resolve_element_type("Business_Contract"), Some(ElementType::Contract));
        assert_eq!(resolve_element_type("node"), Some(ElementType::Node));
        assert_eq!(
            resolve_element_type("Implementation_Event"),
            Some(ElementType::ImplementationEvent)
        );
        assert_eq!(resolve_element_type("Quantum_Thing"), None);
    }

    #[test]
    fn test_relationship_aliases() {
        assert_eq!(resolve_relationship_kind("serving"), Some(RelationshipKind::Serving));
        assert_eq!(resolve_relationship_kind("Rel_Serving"), Some(RelationshipKind::Serving));
        assert_eq!(resolve_relationship_kind("serves"), Some(RelationshipKind::Serving));
        assert_eq!(
            resolve_relationship_kind("directed_association"),
            Some(RelationshipKind::DirectedAssociation)
        );
        assert_eq!(
            resolve_relationship_kind("Rel_Association_dir"),
            Some(RelationshipKind::DirectedAssociation)
        );
        assert_eq!(
            resolve_relationship_kind("RealizationRelationship"),
            Some(RelationshipKind::Realization)
        );
    }

    #[test]
    fn test_layer_aliases() {
        assert_eq!(resolve_layer("BUSINESS"), Some(Layer::Business));
        assert_eq!(resolve_layer("tech"), Some(Layer::Technology));
        assert_eq!(resolve_layer("Application Layer"), Some(Layer::Application));
        assert_eq!(resolve_layer("implementation_migration"), Some(Layer::Implementation));
    }

    #[test]
    fn test_unknown_type_suggests_correction() {
        let raw = RawModel {
            elements: vec![raw_element("a", "Buisness_Actor")],
            ..RawModel::default()
        };

        let err = normalize(&raw).unwrap_err();
        let diag = &err.diagnostics()[0];

        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.message(), "unknown element type `Buisness_Actor`");
        assert_eq!(diag.help(), Some("did you mean `Business_Actor`?"));
        assert_eq!(diag.entity_id(), Some("a"));
    }

    #[test]
    fn test_all_failures_collected() {
        let raw = RawModel {
            elements: vec![
                raw_element("a", "Nope"),
                RawElement {
                    color: Some("not-a-color".to_string()),
                    ..raw_element("b", "Goal")
                },
            ],
            relationships: vec![RawRelationship {
                id: "r1".to_string(),
                from_element: "a".to_string(),
                to_element: "b".to_string(),
                relationship_type: "befriends".to_string(),
                ..RawRelationship::default()
            }],
            layout: RawLayout {
                theme: Some("neon".to_string()),
                ..RawLayout::default()
            },
            ..RawModel::default()
        };

        let err = normalize(&raw).unwrap_err();
        let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();

        assert_eq!(
            codes,
            vec![ErrorCode::E104, ErrorCode::E100, ErrorCode::E105, ErrorCode::E102]
        );
    }

    #[test]
    fn test_layer_inferred_when_missing() {
        let raw = RawModel {
            elements: vec![raw_element("goal", "goal")],
            ..RawModel::default()
        };

        let model = normalize(&raw).unwrap();
        let element = &model.elements()[0];

        assert_eq!(element.layer(), Layer::Motivation);
        assert_eq!(element.name(), "goal");
    }

    #[test]
    fn test_declared_layer_kept() {
        let raw = RawModel {
            elements: vec![RawElement {
                layer: Some("business".to_string()),
                ..raw_element("goal", "Goal")
            }],
            ..RawModel::default()
        };

        let model = normalize(&raw).unwrap();
        assert_eq!(model.elements()[0].layer(), Layer::Business);
    }

    #[test]
    fn test_missing_type_reported() {
        let raw = RawModel {
            elements: vec![raw_element("a", "  ")],
            ..RawModel::default()
        };

        let err = normalize(&raw).unwrap_err();
        assert_eq!(err.diagnostics()[0].message(), "element `a` has no element type");
    }

    #[test]
    fn test_attachments_normalized() {
        let raw = RawModel {
            elements: vec![RawElement {
                ports: vec![RawPort {
                    id: "p1".to_string(),
                    direction: Some("output".to_string()),
                    ..RawPort::default()
                }],
                notes: vec![RawNote {
                    content: "hello".to_string(),
                    position: Some("Above".to_string()),
                    background_color: Some("FFFFCC".to_string()),
                    ..RawNote::default()
                }],
                grouping_style: Some("Frame".to_string()),
                ..raw_element("c", "Application_Component")
            }],
            ..RawModel::default()
        };

        let model = normalize(&raw).unwrap();
        let element = &model.elements()[0];

        assert_eq!(element.ports()[0].direction(), PortDirection::Out);
        assert_eq!(element.ports()[0].name(), "p1");
        assert_eq!(element.notes()[0].position(), NotePosition::Top);
        assert_eq!(
            element.notes()[0].background_color().map(Color::to_hex),
            Some("#FFFFCC".to_string())
        );
        assert_eq!(element.grouping_style(), Some(GroupType::Frame));
    }

    #[test]
    fn test_layout_aliases() {
        let raw = RawModel {
            layout: RawLayout {
                direction: Some("horizontal".to_string()),
                spacing: Some("normal".to_string()),
                theme: Some("Dark".to_string()),
                show_legend: Some(true),
                ..RawLayout::default()
            },
            ..RawModel::default()
        };

        let layout = normalize(&raw).unwrap().layout().clone();

        assert_eq!(layout.direction, Some(LayoutDirection::LeftToRight));
        assert_eq!(layout.spacing, Some(Spacing::Balanced));
        assert_eq!(layout.theme, Some(Theme::Dark));
        assert_eq!(layout.show_legend, Some(true));
    }

    #[test]
    fn test_unlinked_flags_carried() {
        let raw = RawModel {
            layout: RawLayout {
                remove_unlinked: Some(true),
                ..RawLayout::default()
            },
            ..RawModel::default()
        };

        let layout = normalize(&raw).unwrap().layout().clone();

        assert_eq!(layout.remove_unlinked, Some(true));
        assert_eq!(layout.hide_unlinked, None);
    }

    #[test]
    fn test_layout_lookups() {
        assert_eq!(resolve_spacing("loose"), Some(Spacing::Comfortable));
        assert_eq!(resolve_spacing("Wide"), Some(Spacing::Comfortable));
        assert_eq!(resolve_direction("vertical"), Some(LayoutDirection::TopToBottom));
        assert_eq!(resolve_direction("left-to-right"), Some(LayoutDirection::LeftToRight));
        assert_eq!(resolve_theme("PROFESSIONAL"), Some(Theme::Professional));
        assert_eq!(resolve_theme("neon"), None);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn element_type_strategy() -> impl Strategy<Value = ElementType> {
        prop::sample::select(ElementType::ALL)
    }

    /// Respells a name with random case and a random word separator.
    fn respell_strategy(name: &'static str) -> impl Strategy<Value = String> {
        let separators = prop::sample::select(vec!["_", "-", " ", ""]);
        (separators, prop::collection::vec(any::<bool>(), name.len())).prop_map(
            move |(separator, upper)| {
                name.split('_')
                    .collect::<Vec<_>>()
                    .join(separator)
                    .chars()
                    .zip(upper.iter().cycle())
                    .map(|(c, upper)| {
                        if *upper {
                            c.to_ascii_uppercase()
                        } else {
                            c.to_ascii_lowercase()
                        }
                    })
                    .collect()
            },
        )
    }

    fn respelled_type_strategy() -> impl Strategy<Value = (ElementType, String)> {
        element_type_strategy().prop_flat_map(|element_type| {
            respell_strategy(element_type.plantuml_macro())
                .prop_map(move |spelling| (element_type, spelling))
        })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Case and separator conventions never change the resolved type.
    fn check_respelling_resolves(
        element_type: ElementType,
        spelling: &str,
    ) -> Result<(), TestCaseError> {
        prop_assert_eq!(resolve_element_type(spelling), Some(element_type));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn respelling_resolves((element_type, spelling) in respelled_type_strategy()) {
            check_respelling_resolves(element_type, &spelling)?;
        }
    }
}
