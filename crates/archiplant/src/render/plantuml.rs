//! Subprocess renderer backed by the PlantUML tool.

use std::{
    ffi::OsString,
    fs,
    io::Read,
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};

use log::{debug, info, warn};

use super::{ImageFormat, RenderError, Renderer};
use crate::config::RendererConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(25);
/// How long to keep collecting output after the process exited. A detached
/// grandchild may hold the pipes open indefinitely.
const DRAIN_GRACE: Duration = Duration::from_secs(2);
const SOURCE_FILE: &str = "diagram.puml";

/// How the PlantUML process is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
    /// `java -jar plantuml.jar`.
    Jar { java: String, jar: PathBuf },
    /// Any launcher program with leading arguments, e.g. a `plantuml` script.
    Command { program: String, args: Vec<String> },
}

impl Launcher {
    fn command(&self) -> Command {
        match self {
            Self::Jar { java, jar } => {
                let mut command = Command::new(java);
                command
                    .arg("-Djava.awt.headless=true")
                    .arg("-jar")
                    .arg(jar);
                command
            }
            Self::Command { program, args } => {
                let mut command = Command::new(program);
                command.args(args);
                command
            }
        }
    }
}

/// Renders by writing the source to a scratch directory and invoking PlantUML
/// on it.
///
/// Each call uses its own temporary directory, so concurrent renderings never
/// share files.
#[derive(Debug, Clone)]
pub struct PlantUmlRenderer {
    launcher: Launcher,
    timeout: Duration,
}

impl PlantUmlRenderer {
    pub fn new(launcher: Launcher, timeout: Duration) -> Self {
        Self { launcher, timeout }
    }

    /// Builds a renderer from configuration.
    ///
    /// A configured command wins over a jar. With neither, `plantuml` is
    /// looked up on `PATH`.
    pub fn from_config(config: &RendererConfig) -> Self {
        let launcher = if let Some(command) = config.command() {
            let mut parts = command.split_whitespace().map(str::to_string);
            let program = parts.next().unwrap_or_else(|| "plantuml".to_string());
            Launcher::Command {
                program,
                args: parts.collect(),
            }
        } else if let Some(jar) = config.plantuml_jar() {
            Launcher::Jar {
                java: config.java().to_string(),
                jar: jar.clone(),
            }
        } else {
            Launcher::Command {
                program: "plantuml".to_string(),
                args: Vec::new(),
            }
        };
        Self::new(launcher, config.timeout())
    }

    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn wait(&self, mut child: Child) -> Result<String, RenderError> {
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= self.timeout {
                warn!(timeout:? = self.timeout; "PlantUML timed out, killing it");
                if let Err(err) = child.kill() {
                    debug!(err:%; "Kill after timeout failed");
                }
                if let Err(err) = child.wait() {
                    warn!(err:%; "Could not reap PlantUML after kill");
                }
                return Err(RenderError::Timeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let deadline = Instant::now() + DRAIN_GRACE;
        let stdout = stdout.map(|pipe| collect(pipe, deadline)).unwrap_or_default();
        let stderr = stderr.map(|pipe| collect(pipe, deadline)).unwrap_or_default();
        if !stdout.is_empty() {
            debug!(stdout:%; "PlantUML output");
        }

        if status.success() {
            Ok(stderr)
        } else {
            Err(RenderError::Failed { stderr })
        }
    }
}

impl Renderer for PlantUmlRenderer {
    fn render(&self, source: &str, format: ImageFormat) -> Result<Vec<u8>, RenderError> {
        let scratch = tempfile::tempdir()?;
        let source_path = scratch.path().join(SOURCE_FILE);
        fs::write(&source_path, source)?;

        info!(format:%, launcher:? = self.launcher; "Rendering diagram");

        let child = self
            .launcher
            .command()
            .arg(format!("-t{}", format.extension()))
            .arg("-charset")
            .arg("UTF-8")
            .arg(&source_path)
            .env("JAVA_TOOL_OPTIONS", "-Djava.awt.headless=true")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stderr = self.wait(child)?;

        let image_path = output_path(&source_path, format);
        match fs::read(&image_path) {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), path:? = image_path; "Image rendered");
                Ok(bytes)
            }
            Err(err) => {
                debug!(err:%, path:? = image_path; "Renderer produced no image");
                let stderr = if stderr.is_empty() {
                    format!("no image produced at {}", image_path.display())
                } else {
                    stderr
                };
                Err(RenderError::Failed { stderr })
            }
        }
    }
}

fn output_path(source: &Path, format: ImageFormat) -> PathBuf {
    source.with_extension(OsString::from(format.extension()))
}

/// Reads a pipe to the end on its own thread so the child never blocks on a
/// full pipe buffer.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(err) = pipe.read_to_end(&mut buf) {
            debug!(err:%; "Reading PlantUML output failed");
        }
        // The receiver is gone if collecting gave up first.
        let _ = sender.send(String::from_utf8_lossy(&buf).into_owned());
    });
    receiver
}

/// Waits for a drained pipe until `deadline`.
fn collect(pipe: Receiver<String>, deadline: Instant) -> String {
    match pipe.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(output) => output,
        Err(err) => {
            warn!(err:%; "PlantUML output not collected, a child process keeps the pipe open");
            String::new()
        }
    }
}
