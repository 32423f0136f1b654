//! climate-maps configuration.
//!
//! Sources, lowest precedence first:
//! - built-in defaults (the five GISS-E2-1-G scenarios, Janeiro/Julho/Dezembro,
//!   the Recife box and YlOrRd)
//! - an optional YAML file
//! - `CLIMATE_MAPS_*` environment variables
//! - command-line flags (applied by `main`)
//!
//! Paths accept `~` and `${VAR}` expansion.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use climate_common::{
    default_months, default_scenarios, BoundingBox, RepresentativeMonth, Scenario, UnitPolicy,
};
use netcdf_parser::{LoadOptions, DEFAULT_VARIABLE};
use renderer::Colormap;
use serde::{Deserialize, Serialize};

pub const ENV_DATA_ROOT: &str = "CLIMATE_MAPS_DATA_ROOT";
pub const ENV_OUTPUT_DIR: &str = "CLIMATE_MAPS_OUTPUT_DIR";
pub const ENV_FONT: &str = renderer::text::FONT_ENV;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapsConfig {
    /// Data variable to read from every file
    pub variable: String,
    /// Directory relative scenario paths are resolved against
    pub data_root: Option<PathBuf>,
    /// Scenarios in processing order
    pub scenarios: Vec<Scenario>,
    /// Months rendered for every scenario
    pub months: Vec<RepresentativeMonth>,
    pub extent: ExtentConfig,
    pub palette: PaletteConfig,
    pub figure: FigureConfig,
    /// GeoJSON coastline; the built-in Recife coast when unset
    pub coastline: Option<PathBuf>,
    pub output: OutputConfig,
    pub units: UnitPolicy,
    /// Abort the run on the first scenario error
    pub fail_fast: bool,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            variable: DEFAULT_VARIABLE.to_string(),
            data_root: None,
            scenarios: default_scenarios(),
            months: default_months(),
            extent: ExtentConfig::default(),
            palette: PaletteConfig::default(),
            figure: FigureConfig::default(),
            coastline: None,
            output: OutputConfig::default(),
            units: UnitPolicy::Auto,
            fail_fast: false,
        }
    }
}

/// Map extent in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtentConfig {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl ExtentConfig {
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.min_lon, self.min_lat, self.max_lon, self.max_lat)
    }
}

impl Default for ExtentConfig {
    fn default() -> Self {
        BoundingBox::recife().into()
    }
}

impl From<BoundingBox> for ExtentConfig {
    fn from(b: BoundingBox) -> Self {
        Self {
            min_lon: b.min_x,
            min_lat: b.min_y,
            max_lon: b.max_x,
            max_lat: b.max_y,
        }
    }
}

/// A built-in colormap name or a list of `#rrggbb` stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaletteConfig {
    Named(String),
    Stops(Vec<String>),
}

impl Default for PaletteConfig {
    fn default() -> Self {
        PaletteConfig::Named("YlOrRd".to_string())
    }
}

impl PaletteConfig {
    pub fn colormap(&self) -> Result<Colormap> {
        let cmap = match self {
            PaletteConfig::Named(name) => Colormap::named(name)?,
            PaletteConfig::Stops(stops) => Colormap::from_hex("custom", stops.as_slice())?,
        };
        Ok(cmap)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FigureConfig {
    pub width: u32,
    pub height: u32,
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    /// Colour bar label; `"{variable} [{units}]"` when unset
    pub colorbar_label: Option<String>,
    /// Second title line
    pub source: String,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 900,
            font_path: None,
            font_size: 16.0,
            colorbar_label: None,
            source: "Fonte: NASA GISS Climate Model".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving `{scenario}_{month}.png`
    pub dir: PathBuf,
    /// Command that opens each figure instead of keeping it in `dir`
    pub viewer: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("maps"),
            viewer: None,
        }
    }
}

impl MapsConfig {
    /// Read `path`, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                Self::from_yaml(&content)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Apply `CLIMATE_MAPS_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`; empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(root) = get(ENV_DATA_ROOT) {
            self.data_root = Some(PathBuf::from(root));
        }
        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            self.output.dir = PathBuf::from(dir);
        }
        if let Some(font) = get(ENV_FONT) {
            self.figure.font_path = Some(PathBuf::from(font));
        }
    }

    /// Expand `~` and `${VAR}` in every configured path.
    pub fn expand_paths(&mut self) -> Result<()> {
        if let Some(root) = &self.data_root {
            self.data_root = Some(expand(root)?);
        }
        for scenario in &mut self.scenarios {
            scenario.path = expand(&scenario.path)?;
        }
        if let Some(font) = &self.figure.font_path {
            self.figure.font_path = Some(expand(font)?);
        }
        if let Some(coast) = &self.coastline {
            self.coastline = Some(expand(coast)?);
        }
        self.output.dir = expand(&self.output.dir)?;
        Ok(())
    }

    /// Keep only the scenarios named in `labels`, in configured order.
    pub fn select_scenarios(&mut self, labels: &[String]) -> Result<()> {
        if labels.is_empty() {
            return Ok(());
        }
        for label in labels {
            if !self.scenarios.iter().any(|s| &s.label == label) {
                let known: Vec<_> = self.scenarios.iter().map(|s| s.label.as_str()).collect();
                bail!("Unknown scenario '{}' (configured: {})", label, known.join(", "));
            }
        }
        self.scenarios.retain(|s| labels.contains(&s.label));
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.variable.trim().is_empty() {
            bail!("variable must not be empty");
        }
        if self.scenarios.is_empty() {
            bail!("no scenarios configured");
        }
        for (i, a) in self.scenarios.iter().enumerate() {
            if self.scenarios[..i].iter().any(|b| b.label == a.label) {
                bail!("duplicate scenario label '{}'", a.label);
            }
        }
        if !self.extent.bbox().is_valid() {
            bail!("invalid extent {:?}: min must be below max", self.extent);
        }
        if self.figure.width == 0 || self.figure.height == 0 {
            bail!(
                "figure size {}x{} must be non-zero",
                self.figure.width,
                self.figure.height
            );
        }
        if self.figure.font_size.is_nan() || self.figure.font_size <= 0.0 {
            bail!("font_size must be positive");
        }
        self.palette.colormap().context("invalid palette")?;
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            variable: self.variable.clone(),
            units: self.units,
        }
    }
}

fn expand(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("Failed to expand path: {}", raw))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduce_fixed_run() {
        let config = MapsConfig::default();
        assert_eq!(config.variable, "tasmax");
        assert_eq!(config.scenarios.len(), 5);
        assert_eq!(config.scenarios[3].label, "2030 com práticas mitigantes");
        assert_eq!(
            config.months.iter().map(|m| m.index).collect::<Vec<_>>(),
            vec![0, 6, 11]
        );
        assert_eq!(config.extent.bbox(), BoundingBox::recife());
        assert_eq!(config.palette.colormap().unwrap().name(), "YlOrRd");
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
variable: tas
palette: [ "#ffffff", "#ff0000" ]
figure:
  width: 800
scenarios:
  - label: "2010"
    path: a.nc
  - label: "2050"
    path: /abs/b.nc
months:
  - index: 3
    label: Abril
"#;
        let config = MapsConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.variable, "tas");
        assert_eq!(config.figure.width, 800);
        assert_eq!(config.figure.height, 900);
        assert_eq!(config.scenarios.len(), 2);
        assert_eq!(config.months, vec![RepresentativeMonth::new(3, "Abril")]);
        assert_eq!(config.palette.colormap().unwrap().name(), "custom");
        assert_eq!(config.extent, ExtentConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(MapsConfig::from_yaml("colour_map: jet\n").is_err());
    }

    #[test]
    fn test_units_policy_names() {
        let config = MapsConfig::from_yaml("units: kelvin_to_celsius\n").unwrap();
        assert_eq!(config.units, UnitPolicy::KelvinToCelsius);
        assert_eq!(config.load_options().units, UnitPolicy::KelvinToCelsius);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = MapsConfig::default();
        config.apply_env_from(|key| match key {
            ENV_DATA_ROOT => Some("/data/cmip6".to_string()),
            ENV_OUTPUT_DIR => Some("".to_string()),
            _ => None,
        });
        assert_eq!(config.data_root, Some(PathBuf::from("/data/cmip6")));
        // empty values are ignored
        assert_eq!(config.output.dir, PathBuf::from("maps"));
        assert_eq!(config.figure.font_path, None);
    }

    #[test]
    fn test_select_scenarios() {
        let mut config = MapsConfig::default();
        config
            .select_scenarios(&["2024".to_string(), "2010".to_string()])
            .unwrap();
        let labels: Vec<_> = config.scenarios.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["2010", "2024"]);

        assert!(config.select_scenarios(&["1999".to_string()]).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = MapsConfig::default();
        config.extent.min_lon = -34.0;
        assert!(config.validate().is_err());

        let mut config = MapsConfig::default();
        config.palette = PaletteConfig::Named("viridis".to_string());
        assert!(config.validate().is_err());

        let mut config = MapsConfig::default();
        config.scenarios.push(config.scenarios[0].clone());
        assert!(config.validate().is_err());

        let mut config = MapsConfig::default();
        config.scenarios.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_round_trip_of_defaults() {
        let config = MapsConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(MapsConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_expand_home() {
        let mut config = MapsConfig {
            data_root: Some(PathBuf::from("~/cmip6")),
            ..Default::default()
        };
        config.expand_paths().unwrap();
        let root = config.data_root.unwrap();
        assert!(!root.to_string_lossy().starts_with('~'));
    }
}
