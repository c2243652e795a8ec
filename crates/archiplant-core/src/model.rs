//! The normalized ArchiMate model.
//!
//! These records are built by the parser from a raw request payload after
//! every free-form string has been resolved to a canonical value. A
//! [`Model`] is constructed fresh for each request and owns all of its
//! entities; relationships and groups refer to each other by id.
//!
//! # Example
//!
//! ```
//! use archiplant_core::{
//!     element::ElementType,
//!     layer::Layer,
//!     model::{Element, Model, Relationship},
//!     relationship::RelationshipKind,
//! };
//!
//! let model = Model::new(Some("Portal".to_string()))
//!     .with_element(Element::new("a", "Customer", ElementType::BusinessActor, Layer::Business))
//!     .with_element(Element::new(
//!         "b",
//!         "Portal",
//!         ElementType::ApplicationComponent,
//!         Layer::Application,
//!     ))
//!     .with_relationship(Relationship::new("r1", "b", "a", RelationshipKind::Serving));
//!
//! assert_eq!(model.layers(), vec![Layer::Business, Layer::Application]);
//! ```

use crate::{
    color::Color,
    element::ElementType,
    layer::Layer,
    layout::LayoutRequest,
    relationship::{Endpoint, RelationshipKind},
    style::{Direction, GroupType, LineStyle, NotePosition, PortDirection},
};

/// A port exposed by an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    id: String,
    name: String,
    direction: PortDirection,
    interface_type: Option<String>,
    description: Option<String>,
}

impl Port {
    pub fn new(id: impl Into<String>, name: impl Into<String>, direction: PortDirection) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            direction,
            interface_type: None,
            description: None,
        }
    }

    pub fn with_interface_type(mut self, interface_type: impl Into<String>) -> Self {
        self.interface_type = Some(interface_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> PortDirection {
        self.direction
    }

    pub fn interface_type(&self) -> Option<&str> {
        self.interface_type.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A provided interface drawn as a lollipop next to its element.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    id: String,
    name: String,
    description: Option<String>,
}

impl Interface {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A note attached to an element, or floating beside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    content: String,
    position: NotePosition,
    floating: bool,
    background_color: Option<Color>,
    border_color: Option<Color>,
}

impl Note {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            position: NotePosition::default(),
            floating: false,
            background_color: None,
            border_color: None,
        }
    }

    pub fn with_position(mut self, position: NotePosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_floating(mut self, floating: bool) -> Self {
        self.floating = floating;
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_border_color(mut self, color: Color) -> Self {
        self.border_color = Some(color);
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn position(&self) -> NotePosition {
        self.position
    }

    pub fn is_floating(&self) -> bool {
        self.floating
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    pub fn border_color(&self) -> Option<Color> {
        self.border_color
    }
}

/// An ArchiMate element.
///
/// The declared `layer` is kept separately from `element_type` so that a
/// mismatch between the two can be reported instead of silently fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: String,
    name: String,
    element_type: ElementType,
    layer: Layer,
    group_id: Option<String>,
    description: Option<String>,
    documentation: Option<String>,
    stereotype: Option<String>,
    properties: Vec<(String, String)>,
    ports: Vec<Port>,
    interfaces: Vec<Interface>,
    notes: Vec<Note>,
    color: Option<Color>,
    show_as_component: bool,
    grouping_style: Option<GroupType>,
}

impl Element {
    /// Creates an element with no optional attributes.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        element_type: ElementType,
        layer: Layer,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            element_type,
            layer,
            group_id: None,
            description: None,
            documentation: None,
            stereotype: None,
            properties: Vec::new(),
            ports: Vec::new(),
            interfaces: Vec::new(),
            notes: Vec::new(),
            color: None,
            show_as_component: false,
            grouping_style: None,
        }
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.stereotype = Some(stereotype.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    pub fn with_port(mut self, port: Port) -> Self {
        self.ports.push(port);
        self
    }

    pub fn with_interface(mut self, interface: Interface) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_show_as_component(mut self, show_as_component: bool) -> Self {
        self.show_as_component = show_as_component;
        self
    }

    pub fn with_grouping_style(mut self, grouping_style: GroupType) -> Self {
        self.grouping_style = Some(grouping_style);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the documentation text, falling back to the description.
    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref().or(self.description())
    }

    pub fn stereotype(&self) -> Option<&str> {
        self.stereotype.as_deref()
    }

    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn show_as_component(&self) -> bool {
        self.show_as_component
    }

    pub fn grouping_style(&self) -> Option<GroupType> {
        self.grouping_style
    }
}

/// A relationship between two elements or groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    id: String,
    source: String,
    target: String,
    kind: RelationshipKind,
    direction: Option<Direction>,
    color: Option<Color>,
    line_style: Option<LineStyle>,
    label: Option<String>,
    description: Option<String>,
}

impl Relationship {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        kind: RelationshipKind,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind,
            direction: None,
            color: None,
            line_style: None,
            label: None,
            description: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_line_style(mut self, line_style: LineStyle) -> Self {
        self.line_style = Some(line_style);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the element or group the relationship starts at.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Id of the element or group the relationship points to.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn line_style(&self) -> Option<LineStyle> {
        self.line_style
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_self_reference(&self) -> bool {
        self.source == self.target
    }
}

/// A visual container for elements and other groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    id: String,
    name: String,
    group_type: GroupType,
    parent_id: Option<String>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>, group_type: GroupType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group_type,
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group_type(&self) -> GroupType {
        self.group_type
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }
}

/// A complete model for one generation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    title: Option<String>,
    description: Option<String>,
    elements: Vec<Element>,
    relationships: Vec<Relationship>,
    groups: Vec<Group>,
    layout: LayoutRequest,
}

impl Model {
    pub fn new(title: Option<String>) -> Self {
        Self {
            title,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_layout(mut self, layout: LayoutRequest) -> Self {
        self.layout = layout;
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn layout(&self) -> &LayoutRequest {
        &self.layout
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|element| element.id() == id)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.id() == id)
    }

    /// Resolves an id to the kind of entity it names, elements first.
    pub fn endpoint(&self, id: &str) -> Option<Endpoint> {
        self.element(id)
            .map(|element| Endpoint::Element(element.element_type()))
            .or_else(|| self.group(id).map(|_| Endpoint::Group))
    }

    /// Returns the distinct layers used by elements, in canonical order.
    pub fn layers(&self) -> Vec<Layer> {
        let mut layers: Vec<Layer> = self.elements.iter().map(Element::layer).collect();
        layers.sort();
        layers.dedup();
        layers
    }
}
