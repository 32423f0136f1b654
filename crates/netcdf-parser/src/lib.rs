//! NetCDF reader for monthly climate-model output (CMIP6 style).
//!
//! Loads one gridded variable such as `tasmax` together with its `time`,
//! `lat` and `lon` coordinates into a [`ClimateDataset`]. CF packing and
//! missing-value attributes are decoded on load so downstream code only sees
//! physical values with `NaN` for missing cells.
//!
//! # Implementation Notes
//!
//! Reading goes through the `netcdf` crate (libnetcdf/HDF5). Call
//! [`silence_hdf5_errors`] once at startup to keep HDF5 diagnostics for
//! absent optional attributes off stderr.

pub mod cf;
pub mod error;
mod native;

use std::path::Path;

use climate_common::{ClimateDataset, UnitPolicy};
use tracing::info;

pub use cf::CfPacking;
pub use error::{NetCdfError, NetCdfResult};
pub use native::silence_hdf5_errors;

/// Default variable: daily-maximum near-surface air temperature.
pub const DEFAULT_VARIABLE: &str = "tasmax";

/// What to read from a dataset file.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Name of the data variable
    pub variable: String,
    /// Unit conversion applied to the variable's values
    pub units: UnitPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            variable: DEFAULT_VARIABLE.to_string(),
            units: UnitPolicy::Auto,
        }
    }
}

/// Open a climate dataset file and load the configured variable.
///
/// # Errors
///
/// - [`NetCdfError::IoError`] when the file does not exist
/// - [`NetCdfError::InvalidFormat`] when it cannot be opened or read as NetCDF
/// - [`NetCdfError::MissingData`] when the variable or a coordinate is absent
pub fn open_climate_dataset<P: AsRef<Path>>(
    path: P,
    label: &str,
    options: &LoadOptions,
) -> NetCdfResult<ClimateDataset> {
    let path = path.as_ref();
    let dataset = native::read_dataset(path, label, &options.variable, options.units)?;

    info!(
        label = %label,
        path = %path.display(),
        variable = %options.variable,
        time_steps = dataset.time_len(),
        lat = dataset.lat.len(),
        lon = dataset.lon.len(),
        "Loaded climate dataset"
    );

    Ok(dataset)
}
