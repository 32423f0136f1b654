//! Where rendered figures go.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use climate_common::scenario::slugify;
use renderer::MapFigure;
use tempfile::TempDir;
use tracing::{info, warn};

/// Receives each figure as it is rendered, in run order.
pub trait FigureSink {
    fn present(&mut self, scenario: &str, month: &str, figure: &MapFigure) -> Result<()>;
}

/// `{scenario}_{month}.png` with both parts slugified.
pub fn figure_file_name(scenario: &str, month: &str) -> String {
    format!("{}_{}.png", slugify(scenario), slugify(month))
}

/// Writes every figure as a PNG file into one directory.
#[derive(Debug)]
pub struct PngDirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PngDirectorySink {
    /// Create the sink, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FigureSink for PngDirectorySink {
    fn present(&mut self, scenario: &str, month: &str, figure: &MapFigure) -> Result<()> {
        let path = self.dir.join(figure_file_name(scenario, month));
        let png = figure.to_png()?;
        std::fs::write(&path, &png)
            .with_context(|| format!("Failed to write figure: {}", path.display()))?;
        info!(path = %path.display(), bytes = png.len(), "Wrote figure");
        self.written.push(path);
        Ok(())
    }
}

/// Opens every figure with an external viewer and waits for it to exit.
///
/// Figures are written to a private temporary directory that is removed when
/// the sink is dropped.
pub struct ViewerSink {
    program: String,
    args: Vec<String>,
    dir: TempDir,
}

impl ViewerSink {
    /// `command` is split on whitespace; the figure path is appended as the
    /// last argument.
    pub fn new(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let Some(program) = parts.next() else {
            bail!("viewer command is empty");
        };
        let dir = tempfile::Builder::new()
            .prefix("climate-maps-")
            .tempdir()
            .context("Failed to create temporary directory for the viewer")?;
        Ok(Self {
            program,
            args: parts.collect(),
            dir,
        })
    }
}

impl FigureSink for ViewerSink {
    fn present(&mut self, scenario: &str, month: &str, figure: &MapFigure) -> Result<()> {
        let path = self.dir.path().join(figure_file_name(scenario, month));
        std::fs::write(&path, figure.to_png()?)
            .with_context(|| format!("Failed to write figure: {}", path.display()))?;

        info!(viewer = %self.program, path = %path.display(), "Opening figure");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&path)
            .status()
            .with_context(|| format!("Failed to run viewer '{}'", self.program))?;
        if !status.success() {
            warn!(viewer = %self.program, %status, "Viewer exited with an error");
        }
        Ok(())
    }
}
