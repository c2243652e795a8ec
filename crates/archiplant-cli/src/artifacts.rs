//! Output artifacts written for one model.
//!
//! Every run gets its own directory below the output directory, named after
//! the sanitized model title (`Front_office`, then `Front_office-2`, ...), so
//! files of an earlier run are never mistaken for this one's. Files are named
//! after the title too. `architecture.md` and `metadata.json` summarize the
//! run.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Serialize;

use archiplant::{ArchiplantError, ValidatedModel, export::FixReport};

/// File name of the run summary.
pub const METADATA_FILE: &str = "metadata.json";

/// File name of the Markdown architecture report.
pub const REPORT_FILE: &str = "architecture.md";

/// Turns a model title into a file stem.
///
/// Alphanumerics, `-` and `_` are kept, spaces become `_` and anything else
/// is dropped. An empty result becomes `diagram`.
pub fn safe_title(title: Option<&str>) -> String {
    let stem: String = title
        .unwrap_or_default()
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();

    if stem.is_empty() {
        "diagram".to_string()
    } else {
        stem
    }
}

/// Writes the files of one run into a directory.
#[derive(Debug)]
pub struct ArtifactWriter {
    dir: PathBuf,
    stem: String,
    files: Vec<String>,
}

impl ArtifactWriter {
    /// Creates a fresh run directory for `stem` below `base`.
    ///
    /// `base` is created if needed. The run directory is `<stem>`, or
    /// `<stem>-N` with the first free `N` when earlier runs exist.
    pub fn create(base: impl AsRef<Path>, stem: impl Into<String>) -> Result<Self, ArchiplantError> {
        let base = base.as_ref();
        let stem = stem.into();
        fs::create_dir_all(base)?;

        let mut attempt = 1;
        let dir = loop {
            let name = if attempt == 1 {
                stem.clone()
            } else {
                format!("{stem}-{attempt}")
            };
            let candidate = base.join(name);
            match fs::create_dir(&candidate) {
                Ok(()) => break candidate,
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(err) => return Err(err.into()),
            }
        };
        debug!(dir = dir.display().to_string(); "Run directory created");

        Ok(Self {
            dir,
            stem,
            files: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of the files written so far.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Writes `<stem>.<extension>` and returns its path.
    pub fn write(
        &mut self,
        extension: &str,
        contents: impl AsRef<[u8]>,
    ) -> Result<PathBuf, ArchiplantError> {
        let name = format!("{}.{extension}", self.stem);
        self.write_named(name, contents)
    }

    /// Writes `architecture.md`.
    pub fn write_report(&mut self, report: &str) -> Result<PathBuf, ArchiplantError> {
        self.write_named(REPORT_FILE.to_string(), report)
    }

    /// Name of the first image written, PNG before SVG.
    pub fn image(&self) -> Option<&str> {
        ["png", "svg"].into_iter().find_map(|extension| {
            self.files
                .iter()
                .find(|name| name.rsplit_once('.').is_some_and(|(_, ext)| ext == extension))
                .map(String::as_str)
        })
    }

    fn write_named(
        &mut self,
        name: String,
        contents: impl AsRef<[u8]>,
    ) -> Result<PathBuf, ArchiplantError> {
        let path = self.dir.join(&name);
        fs::write(&path, contents)?;
        debug!(path = path.display().to_string(); "Artifact written");
        self.files.push(name);
        Ok(path)
    }

    /// Writes `metadata.json`, listing every file written before it.
    pub fn write_metadata(&self, metadata: &Metadata<'_>) -> Result<PathBuf, ArchiplantError> {
        let path = self.dir.join(METADATA_FILE);
        let json = serde_json::to_string_pretty(metadata)
            .map_err(|err| ArchiplantError::Export(Box::new(err)))?;
        fs::write(&path, json)?;
        Ok(path)
    }
}

/// Summary of one run.
#[derive(Debug, Serialize)]
pub struct Metadata<'a> {
    title: Option<&'a str>,
    elements: usize,
    relationships: usize,
    groups: usize,
    layers: Vec<&'static str>,
    relationship_categories: BTreeMap<&'static str, usize>,
    warnings: Vec<&'a str>,
    files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    render_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    xml_export: Option<XmlSummary>,
}

#[derive(Debug, Serialize)]
struct XmlSummary {
    relationships: usize,
    preserved: usize,
    fixed: usize,
    preservation_rate: f64,
}

impl<'a> Metadata<'a> {
    pub fn new(model: &'a ValidatedModel) -> Self {
        let inner = model.model();

        let mut relationship_categories = BTreeMap::new();
        for relationship in inner.relationships() {
            let category: &'static str = relationship.kind().category().into();
            *relationship_categories.entry(category).or_insert(0) += 1;
        }

        Self {
            title: inner.title(),
            elements: inner.elements().len(),
            relationships: inner.relationships().len(),
            groups: inner.groups().len(),
            layers: inner.layers().into_iter().map(|layer| layer.name()).collect(),
            relationship_categories,
            warnings: model.warnings().iter().map(|w| w.message()).collect(),
            files: Vec::new(),
            render_error: None,
            xml_export: None,
        }
    }

    pub fn with_files(mut self, files: &[String]) -> Self {
        self.files = files.to_vec();
        self
    }

    pub fn with_render_error(mut self, error: &ArchiplantError) -> Self {
        self.render_error = Some(error.to_string());
        self
    }

    pub fn with_fix_report(mut self, report: &FixReport) -> Self {
        self.xml_export = Some(XmlSummary {
            relationships: report.total(),
            preserved: report.preserved(),
            fixed: report.fixes().len(),
            preservation_rate: report.preservation_rate(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use archiplant::DiagramBuilder;

    use super::*;

    #[test]
    fn test_safe_title() {
        assert_eq!(safe_title(Some("Front office")), "Front_office");
        assert_eq!(safe_title(Some("CRM / ERP: v2")), "CRM__ERP_v2");
        assert_eq!(safe_title(Some("core-banking_2")), "core-banking_2");
        assert_eq!(safe_title(Some("../../etc")), "etc");
        assert_eq!(safe_title(Some("***")), "diagram");
        assert_eq!(safe_title(None), "diagram");
    }

    #[test]
    fn test_writer_tracks_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ArtifactWriter::create(dir.path().join("out"), "model").unwrap();

        let path = writer.write("puml", "@startuml\n@enduml\n").unwrap();
        writer.write("svg", "<svg/>").unwrap();
        writer.write_report("# model\n").unwrap();

        assert_eq!(path, dir.path().join("out").join("model").join("model.puml"));
        assert_eq!(
            writer.files(),
            &["model.puml", "model.svg", "architecture.md"].map(String::from)
        );
        assert_eq!(writer.image(), Some("model.svg"));
        assert!(path.exists());
    }

    #[test]
    fn test_each_run_gets_fresh_directory() {
        let dir = tempfile::tempdir().unwrap();

        let mut first = ArtifactWriter::create(dir.path(), "model").unwrap();
        first.write("png", "PNG").unwrap();
        let second = ArtifactWriter::create(dir.path(), "model").unwrap();
        let third = ArtifactWriter::create(dir.path(), "model").unwrap();

        assert_eq!(first.dir(), dir.path().join("model"));
        assert_eq!(second.dir(), dir.path().join("model-2"));
        assert_eq!(third.dir(), dir.path().join("model-3"));
        assert!(!second.dir().join("model.png").exists());
        assert_eq!(second.image(), None);
    }

    #[test]
    fn test_metadata_summary() {
        let source = r#"{
            "title": "Summary",
            "elements": [
                {"id": "a", "name": "A", "element_type": "Business_Actor"},
                {"id": "b", "name": "B", "element_type": "Business_Role"},
                {"id": "c", "name": "C", "element_type": "Application_Component"}
            ],
            "relationships": [
                {"id": "r1", "from": "a", "to": "b", "type": "Assignment"},
                {"id": "r2", "from": "c", "to": "b", "type": "Serving"},
                {"id": "r3", "from": "a", "to": "b", "type": "Access"}
            ]
        }"#;
        let model = DiagramBuilder::default().parse(source).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let mut writer = ArtifactWriter::create(dir.path(), "Summary").unwrap();
        writer.write("puml", "@startuml\n@enduml\n").unwrap();

        let metadata = Metadata::new(&model)
            .with_files(writer.files())
            .with_render_error(&ArchiplantError::Config("no renderer".to_string()));
        let path = writer.write_metadata(&metadata).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["title"], "Summary");
        assert_eq!(json["elements"], 3);
        assert_eq!(json["relationships"], 3);
        assert_eq!(json["groups"], 0);
        assert_eq!(json["layers"], serde_json::json!(["Business", "Application"]));
        assert_eq!(json["warnings"].as_array().unwrap().len(), 1);
        assert_eq!(json["files"], serde_json::json!(["Summary.puml"]));
        assert!(json["render_error"].as_str().unwrap().contains("no renderer"));
        assert!(json.get("xml_export").is_none());
    }
}
