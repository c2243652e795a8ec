//! Archi model exchange document export.
//!
//! The exporter writes the validated model as an `archimate:model` document
//! with one folder per concept family and a single layered overview view.
//! Every XML id is derived from a model id, so exporting the same model twice
//! gives the same document. Each id family has its own prefix (`id-el-`,
//! `id-rel-`, `id-obj-`, `id-conn-`, `id-folder-`) and model ids are escaped
//! injectively, so no two nodes of the document share an id.
//!
//! Exporting is experimental. Callers treat its failures as warnings.

pub mod fix;
mod layout;

use std::string::FromUtf8Error;

use indexmap::IndexMap;
use log::{debug, info};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use thiserror::Error;

use archiplant_core::{
    element::ElementType,
    layer::Layer,
    model::{Element, Model, Relationship},
    relationship::RelationshipKind,
};

pub use fix::{Fix, FixReport};
use layout::{Placement, layout};

use crate::ident;

const ARCHIMATE_NS: &str = "http://www.archimatetool.com/archimate";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const FORMAT_VERSION: &str = "4.9.0";
const DEFAULT_NAME: &str = "Architecture Model";

#[derive(Debug, Error)]
pub enum XmlExportError {
    #[error("failed to write XML: {0}")]
    Write(String),

    #[error("XML output is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

/// An exported document together with the fix pass summary.
#[derive(Debug, Clone)]
pub struct XmlExport {
    document: String,
    fix_report: FixReport,
}

impl XmlExport {
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn fix_report(&self) -> &FixReport {
        &self.fix_report
    }

    pub fn into_document(self) -> String {
        self.document
    }
}

/// Writes models as Archi exchange documents.
#[derive(Debug, Clone, Copy)]
pub struct XmlExporter {
    universal_fix: bool,
}

impl Default for XmlExporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl XmlExporter {
    /// Creates an exporter. With `universal_fix` set, relationships the
    /// matrix rejects are exported as associations.
    pub fn new(universal_fix: bool) -> Self {
        Self { universal_fix }
    }

    /// Exports `model`.
    ///
    /// # Errors
    ///
    /// Returns [`XmlExportError`] if the document cannot be written.
    pub fn export(&self, model: &Model) -> Result<XmlExport, XmlExportError> {
        let (kinds, fix_report) = fix::apply(model, self.universal_fix);
        info!(
            relationships = fix_report.total(),
            fixed = fix_report.fixes().len();
            "Exporting XML model"
        );

        let name = model.title().unwrap_or(DEFAULT_NAME);
        let model_id = format!("id-model-{}", safe(name));

        let mut doc = Document::new();
        doc.declaration()?;
        doc.start(
            "archimate:model",
            &[
                ("xmlns:archimate", ARCHIMATE_NS),
                ("xmlns:xsi", XSI_NS),
                ("name", name),
                ("id", model_id.as_str()),
                ("version", FORMAT_VERSION),
            ],
        )?;

        for folder in Folder::CONCEPTS {
            doc.start_folder(folder)?;
            for element in model.elements() {
                if Folder::of(element) == folder {
                    write_element(&mut doc, element)?;
                }
            }
            if folder == Folder::Other {
                for group in model.groups() {
                    doc.empty(
                        "element",
                        &[
                            ("xsi:type", "archimate:Grouping"),
                            ("name", group.name()),
                            ("id", concept_id(group.id()).as_str()),
                        ],
                    )?;
                }
            }
            doc.end("folder")?;
        }

        doc.start_folder(Folder::Relations)?;
        for (relationship, kind) in model.relationships().iter().zip(&kinds) {
            write_relationship(&mut doc, relationship, *kind)?;
        }
        doc.end("folder")?;

        doc.start_folder(Folder::Diagrams)?;
        write_view(&mut doc, model)?;
        doc.end("folder")?;

        if let Some(description) = model.description() {
            doc.text("purpose", description)?;
        }
        doc.end("archimate:model")?;

        let document = doc.finish()?;
        debug!(bytes = document.len(); "XML model written");
        Ok(XmlExport {
            document,
            fix_report,
        })
    }
}

/// Archi top-level folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Folder {
    Strategy,
    Business,
    Application,
    Technology,
    Motivation,
    ImplementationMigration,
    Other,
    Relations,
    Diagrams,
}

impl Folder {
    /// Folders holding elements, in document order.
    const CONCEPTS: [Folder; 7] = [
        Folder::Strategy,
        Folder::Business,
        Folder::Application,
        Folder::Technology,
        Folder::Motivation,
        Folder::ImplementationMigration,
        Folder::Other,
    ];

    fn of(element: &Element) -> Self {
        if element.element_type() == ElementType::Location {
            return Self::Other;
        }
        match element.layer() {
            Layer::Strategy => Self::Strategy,
            Layer::Business => Self::Business,
            Layer::Application => Self::Application,
            Layer::Technology | Layer::Physical => Self::Technology,
            Layer::Motivation => Self::Motivation,
            Layer::Implementation => Self::ImplementationMigration,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Strategy => "Strategy",
            Self::Business => "Business",
            Self::Application => "Application",
            Self::Technology => "Technology & Physical",
            Self::Motivation => "Motivation",
            Self::ImplementationMigration => "Implementation & Migration",
            Self::Other => "Other",
            Self::Relations => "Relations",
            Self::Diagrams => "Views",
        }
    }

    fn folder_type(self) -> &'static str {
        match self {
            Self::Strategy => "strategy",
            Self::Business => "business",
            Self::Application => "application",
            Self::Technology => "technology",
            Self::Motivation => "motivation",
            Self::ImplementationMigration => "implementation_migration",
            Self::Other => "other",
            Self::Relations => "relations",
            Self::Diagrams => "diagrams",
        }
    }
}

fn write_element(doc: &mut Document, element: &Element) -> Result<(), XmlExportError> {
    let xsi_type = format!("archimate:{}", element.element_type().exchange_name());
    doc.start(
        "element",
        &[
            ("xsi:type", xsi_type.as_str()),
            ("name", element.name()),
            ("id", concept_id(element.id()).as_str()),
        ],
    )?;
    if let Some(documentation) = element.documentation().or(element.description()) {
        doc.text("documentation", documentation)?;
    }
    for (key, value) in element.properties() {
        doc.empty("property", &[("key", key.as_str()), ("value", value.as_str())])?;
    }
    doc.end("element")
}

fn write_relationship(
    doc: &mut Document,
    relationship: &Relationship,
    kind: RelationshipKind,
) -> Result<(), XmlExportError> {
    let xsi_type = format!("archimate:{}", kind.exchange_name());
    let id = relation_id(relationship.id());
    let source = concept_id(relationship.source());
    let target = concept_id(relationship.target());

    let mut attributes = vec![
        ("xsi:type", xsi_type.as_str()),
        ("id", id.as_str()),
        ("source", source.as_str()),
        ("target", target.as_str()),
    ];
    if let Some(label) = relationship.label() {
        attributes.push(("name", label));
    }
    if kind == RelationshipKind::DirectedAssociation {
        attributes.push(("directed", "true"));
    }

    match relationship.description() {
        Some(description) => {
            doc.start("element", &attributes)?;
            doc.text("documentation", description)?;
            doc.end("element")
        }
        None => doc.empty("element", &attributes),
    }
}

fn write_view(doc: &mut Document, model: &Model) -> Result<(), XmlExportError> {
    let placements = layout(model);

    let mut incoming: IndexMap<&str, Vec<String>> = IndexMap::new();
    for relationship in model.relationships() {
        incoming
            .entry(relationship.target())
            .or_default()
            .push(connection_id(relationship));
    }

    doc.start(
        "element",
        &[
            ("xsi:type", "archimate:ArchimateDiagramModel"),
            ("name", "Overview"),
            ("id", "id-view-overview"),
            ("connectionRouterType", "2"),
        ],
    )?;
    doc.empty("property", &[("key", "viewpoint"), ("value", "layered")])?;

    for (id, placement) in &placements {
        let object_id = object_id(id);
        let concept_id = concept_id(id);
        let targets = incoming
            .get(id.as_str())
            .map(|ids| ids.join(" "))
            .unwrap_or_default();

        let mut attributes = vec![
            ("xsi:type", "archimate:DiagramObject"),
            ("id", object_id.as_str()),
        ];
        if !targets.is_empty() {
            attributes.push(("targetConnections", targets.as_str()));
        }
        attributes.push(("archimateElement", concept_id.as_str()));
        doc.start("child", &attributes)?;

        let bounds = placement.bounds;
        let (x, y, width, height) = (
            bounds.x.to_string(),
            bounds.y.to_string(),
            bounds.width.to_string(),
            bounds.height.to_string(),
        );
        doc.empty(
            "bounds",
            &[
                ("x", x.as_str()),
                ("y", y.as_str()),
                ("width", width.as_str()),
                ("height", height.as_str()),
            ],
        )?;

        for relationship in model
            .relationships()
            .iter()
            .filter(|relationship| relationship.source() == id.as_str())
        {
            write_connection(doc, relationship, &placements)?;
        }
        doc.end("child")?;
    }

    doc.end("element")
}

fn write_connection(
    doc: &mut Document,
    relationship: &Relationship,
    placements: &IndexMap<String, Placement>,
) -> Result<(), XmlExportError> {
    let id = connection_id(relationship);
    let source = object_id(relationship.source());
    let target = object_id(relationship.target());
    let concept = relation_id(relationship.id());
    let attributes = [
        ("xsi:type", "archimate:Connection"),
        ("id", id.as_str()),
        ("source", source.as_str()),
        ("target", target.as_str()),
        ("archimateRelationship", concept.as_str()),
    ];

    let bendpoints = match (
        placements.get(relationship.source()),
        placements.get(relationship.target()),
    ) {
        (Some(from), Some(to)) if from.band != to.band => bendpoints(from, to),
        _ => Vec::new(),
    };

    if bendpoints.is_empty() {
        return doc.empty("sourceConnection", &attributes);
    }

    doc.start("sourceConnection", &attributes)?;
    for offsets in bendpoints {
        let [start_x, start_y, end_x, end_y] = offsets.map(|offset| offset.to_string());
        doc.empty(
            "bendpoint",
            &[
                ("startX", start_x.as_str()),
                ("startY", start_y.as_str()),
                ("endX", end_x.as_str()),
                ("endY", end_y.as_str()),
            ],
        )?;
    }
    doc.end("sourceConnection")
}

/// Two bendpoints routing a cross-band connection through the horizontal
/// midline between the boxes.
///
/// Archi stores each bendpoint as offsets from the source and target centres.
fn bendpoints(from: &Placement, to: &Placement) -> Vec<[i32; 4]> {
    let (sx, sy) = from.bounds.center();
    let (tx, ty) = to.bounds.center();
    let mid = (sy + ty) / 2;

    vec![
        [0, mid - sy, sx - tx, mid - ty],
        [tx - sx, mid - sy, 0, mid - ty],
    ]
}

/// Maps a model id onto the XML id alphabet.
fn safe(id: &str) -> String {
    ident::escape(id, |c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.'))
}

/// Id of an element or grouping. Relationship ends use it too, since an end
/// may be either.
fn concept_id(id: &str) -> String {
    format!("id-el-{}", safe(id))
}

fn relation_id(id: &str) -> String {
    format!("id-rel-{}", safe(id))
}

fn object_id(id: &str) -> String {
    format!("id-obj-{}", safe(id))
}

fn connection_id(relationship: &Relationship) -> String {
    format!("id-conn-{}", safe(relationship.id()))
}

/// Thin event-level wrapper over the indenting writer.
struct Document {
    writer: Writer<Vec<u8>>,
}

impl Document {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), XmlExportError> {
        self.writer
            .write_event(event)
            .map_err(|err| XmlExportError::Write(err.to_string()))
    }

    fn declaration(&mut self) -> Result<(), XmlExportError> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), XmlExportError> {
        let tag = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.write(Event::Start(tag))
    }

    fn start_folder(&mut self, folder: Folder) -> Result<(), XmlExportError> {
        let id = format!("id-folder-{}", folder.folder_type());
        self.start(
            "folder",
            &[
                ("name", folder.name()),
                ("id", id.as_str()),
                ("type", folder.folder_type()),
            ],
        )
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), XmlExportError> {
        let tag = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.write(Event::Empty(tag))
    }

    fn end(&mut self, name: &str) -> Result<(), XmlExportError> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, name: &str, text: &str) -> Result<(), XmlExportError> {
        self.start(name, &[])?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn finish(self) -> Result<String, XmlExportError> {
        Ok(String::from_utf8(self.writer.into_inner())?)
    }
}
