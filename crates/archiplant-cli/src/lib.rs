//! CLI logic for the Archiplant diagram tool.
//!
//! This module contains the core CLI logic for the Archiplant diagram tool.

pub mod error_adapter;

mod args;
mod artifacts;
mod config;

pub use args::Args;

use std::{fs, path::PathBuf};

use log::{info, warn};

use archiplant::{ArchiplantError, DiagramBuilder};

use artifacts::{ArtifactWriter, Metadata, safe_title};

/// Run the Archiplant CLI application
///
/// This function processes the input file through the Archiplant pipeline
/// and writes the PlantUML source, the rendered images, the optional XML
/// export, the architecture report and a metadata summary into a fresh run
/// directory below the output directory.
///
/// The PlantUML source, the report and the metadata are written even when
/// rendering fails. An XML export failure is logged and does not fail the run.
///
/// Returns the run directory.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `ArchiplantError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Payload, type resolution and validation errors
/// - Rendering errors, after the other artifacts have been written
pub fn run(args: &Args) -> Result<PathBuf, ArchiplantError> {
    info!(
        input_path = args.input,
        output_dir = args.output_dir;
        "Processing model"
    );

    // Load configuration
    let mut app_config = config::load_config(args.config.as_ref())?;
    if args.strict {
        app_config.validation_mut().set_strict(true);
    }
    if args.xml {
        app_config.export_mut().set_xml(true);
    }

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let model = builder.parse(&source)?;
    let puml = builder.generate(&model)?;

    let mut writer = ArtifactWriter::create(&args.output_dir, safe_title(model.model().title()))?;
    writer.write("puml", &puml)?;

    let mut render_error = None;
    if args.no_render {
        info!("Rendering skipped");
    } else {
        let formats = if args.format.is_empty() {
            builder.config().renderer().formats().to_vec()
        } else {
            args.format.clone()
        };

        for format in formats {
            match builder.render(&puml, format) {
                Ok(image) => {
                    writer.write(format.extension(), image)?;
                }
                Err(err) => {
                    warn!(format:%, err:%; "Rendering failed");
                    render_error.get_or_insert(err);
                }
            }
        }
    }

    let mut fix_report = None;
    if builder.config().export().xml() {
        match builder.export_xml(&model) {
            Ok(export) => {
                fix_report = Some(export.fix_report().clone());
                writer.write("xml", export.into_document())?;
            }
            Err(err) => warn!(err:%; "XML export failed"),
        }
    }

    let report = builder.report(&model, writer.image());
    writer.write_report(&report)?;

    let mut metadata = Metadata::new(&model).with_files(writer.files());
    if let Some(err) = &render_error {
        metadata = metadata.with_render_error(err);
    }
    if let Some(report) = &fix_report {
        metadata = metadata.with_fix_report(report);
    }
    writer.write_metadata(&metadata)?;

    info!(
        output_dir = writer.dir().display().to_string(),
        files = writer.files().len();
        "Artifacts written"
    );

    match render_error {
        Some(err) => Err(err),
        None => Ok(writer.dir().to_path_buf()),
    }
}
