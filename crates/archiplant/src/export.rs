//! Model export to interchange formats.
//!
//! Only the Archi exchange document is supported, see [`xml`].

pub mod xml;

pub use xml::{FixReport, XmlExport, XmlExportError, XmlExporter};
