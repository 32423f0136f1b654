//! One regional map per scenario and month.

use anyhow::{Context, Result};
use climate_common::ClimateDataset;
use renderer::{render_map, Coastline, FontSource, MapFigure, MapSpec};
use rusttype::Font;
use tracing::{debug, warn};

use crate::config::MapsConfig;

/// Units shown when the variable declares none.
const DEFAULT_UNITS: &str = "°C";

/// First title line.
pub fn map_title(label: &str, month: &str, units: &str) -> String {
    format!("Temperatura Máxima - {} ({}) [{}]", label, month, units)
}

/// Everything shared by all renders of a run.
pub struct MapStyle {
    pub variable: String,
    /// Figure template; the title is filled in per render.
    pub spec: MapSpec,
    pub font: Option<Font<'static>>,
    pub source_line: String,
    pub colorbar_label: Option<String>,
}

impl MapStyle {
    /// Resolve palette, coastline and font from `config`.
    pub fn from_config(config: &MapsConfig) -> Result<Self> {
        let coastline = match &config.coastline {
            Some(path) => Coastline::from_geojson_file(path)
                .with_context(|| format!("Failed to load coastline: {}", path.display()))?,
            None => Coastline::recife(),
        };

        let font = FontSource::from_option(config.figure.font_path.clone())
            .load()
            .context("Failed to load figure font")?;

        let spec = MapSpec {
            extent: config.extent.bbox(),
            colormap: config.palette.colormap()?,
            coastline: Some(coastline),
            width: config.figure.width,
            height: config.figure.height,
            font_size: config.figure.font_size,
            ..Default::default()
        };

        Ok(Self {
            variable: config.variable.clone(),
            spec,
            font,
            source_line: config.figure.source.clone(),
            colorbar_label: config.figure.colorbar_label.clone(),
        })
    }
}

/// Render month `time_index` of `dataset` for scenario `label`.
///
/// Reads exactly that time step; no temporal reduction is applied.
///
/// # Errors
/// `ClimateError::IndexOutOfRange` when `time_index` is past the end of the
/// time axis, `ClimateError::MissingField` when the variable is absent, and
/// rendering errors from the renderer.
pub fn render_month(
    dataset: &ClimateDataset,
    label: &str,
    time_index: usize,
    month: &str,
    style: &MapStyle,
) -> Result<MapFigure> {
    let var = dataset.variable(&style.variable)?;
    let units = var.units.as_deref().unwrap_or(DEFAULT_UNITS);
    let field = dataset.slice_time(&style.variable, time_index)?;

    if field.is_all_missing() {
        warn!(scenario = %label, month = %month, "Slice has no valid cells");
    }

    let spec = MapSpec {
        title: vec![map_title(label, month, units), style.source_line.clone()],
        colorbar_label: Some(
            style
                .colorbar_label
                .clone()
                .unwrap_or_else(|| format!("{} [{}]", style.variable, units)),
        ),
        ..style.spec.clone()
    };

    let figure = render_map(&field, &spec, style.font.as_ref())?;
    debug!(scenario = %label, month = %month, time_index, range = ?figure.range, "Rendered map");
    Ok(figure)
}
