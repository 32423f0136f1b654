//! Native NetCDF reading using the netcdf library.
//!
//! Reads a single `(time, lat, lon)` variable plus its coordinate axes and
//! builds a [`ClimateDataset`]. Dimension names are mapped onto the canonical
//! `time`/`lat`/`lon`; other dimensions of length one are squeezed.

use std::path::Path;
use std::sync::Once;

use climate_common::{
    ClimateDataset, DataVariable, TimeAxis, UnitPolicy, LAT_DIM, LON_DIM, TIME_DIM,
};
use tracing::{debug, warn};

use crate::cf::CfPacking;
use crate::error::{NetCdfError, NetCdfResult};

const TIME_NAMES: &[&str] = &["time", "t", "Time"];
const LAT_NAMES: &[&str] = &["lat", "latitude", "y", "nav_lat"];
const LON_NAMES: &[&str] = &["lon", "longitude", "x", "nav_lon"];

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This function disables that output by
/// calling H5Eset_auto2 with null handlers. Safe to call multiple times.
///
/// Call it early in `main()` before any HDF5/NetCDF operations occur.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Open `path` and load `variable` with its coordinates.
pub(crate) fn read_dataset(
    path: &Path,
    label: &str,
    variable: &str,
    units: UnitPolicy,
) -> NetCdfResult<ClimateDataset> {
    silence_hdf5_errors();

    if !path.exists() {
        return Err(NetCdfError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("dataset file not found: {}", path.display()),
        )));
    }

    let file = netcdf::open(path).map_err(|e| {
        NetCdfError::InvalidFormat(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let var = file
        .variable(variable)
        .ok_or_else(|| NetCdfError::MissingData(format!("variable '{}'", variable)))?;

    // Map each dimension to its canonical role, dropping singleton extras
    let mut dims = Vec::new();
    let mut shape = Vec::new();
    for dim in var.dimensions() {
        let name = dim.name();
        let canonical = canonical_dim(&name);
        match canonical {
            Some(c) => {
                dims.push(c.to_string());
                shape.push(dim.len());
            }
            None if dim.len() == 1 => {
                debug!(dimension = %name, "Squeezing singleton dimension");
            }
            None => {
                dims.push(name.clone());
                shape.push(dim.len());
            }
        }
    }

    let time = if dims.iter().any(|d| d == TIME_DIM) {
        read_time_axis(&file)?
    } else {
        TimeAxis::default()
    };
    let lat = read_coord(&file, LAT_NAMES)?;
    let lon = read_coord(&file, LON_NAMES)?;

    let packing = read_packing(&var);
    let declared_units = get_str_attr(&var, "units");
    let (transform, units) = units.resolve(declared_units.as_deref());

    let raw: Vec<f32> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", variable, e)))?;
    let values = packing.decode(&raw, transform);

    let missing = values.iter().filter(|v| v.is_nan()).count();
    debug!(
        variable = %variable,
        dims = ?dims,
        shape = ?shape,
        missing,
        declared_units = ?declared_units,
        units = ?units,
        "Read variable"
    );
    if missing == values.len() {
        warn!(variable = %variable, path = %path.display(), "Variable contains only missing values");
    }

    let mut dataset = ClimateDataset::new(label, time, lat, lon).with_source(path);
    dataset.insert_variable(DataVariable {
        name: variable.to_string(),
        dims,
        shape,
        units,
        values,
    });
    Ok(dataset)
}

/// Canonical name for a dimension, if it plays a time/lat/lon role.
fn canonical_dim(name: &str) -> Option<&'static str> {
    if TIME_NAMES.contains(&name) {
        Some(TIME_DIM)
    } else if LAT_NAMES.contains(&name) {
        Some(LAT_DIM)
    } else if LON_NAMES.contains(&name) {
        Some(LON_DIM)
    } else {
        None
    }
}

fn read_time_axis(file: &netcdf::File) -> NetCdfResult<TimeAxis> {
    for name in TIME_NAMES {
        if let Some(var) = file.variable(name) {
            let values: Vec<f64> = var.get_values(..)?;
            return Ok(TimeAxis::new(
                values,
                get_str_attr(&var, "units"),
                get_str_attr(&var, "calendar"),
            ));
        }
    }
    // Time dimension without a coordinate variable: use step indices
    for name in TIME_NAMES {
        if let Some(dim) = file.dimension(name) {
            return Ok(TimeAxis::new(
                (0..dim.len()).map(|i| i as f64).collect(),
                None,
                None,
            ));
        }
    }
    Err(NetCdfError::MissingData("time coordinate".to_string()))
}

/// Read a 1-D coordinate variable.
fn read_coord(file: &netcdf::File, names: &[&str]) -> NetCdfResult<Vec<f64>> {
    for name in names {
        if let Some(var) = file.variable(name) {
            if var.dimensions().len() != 1 {
                return Err(NetCdfError::InvalidFormat(format!(
                    "coordinate '{}' is not one-dimensional",
                    name
                )));
            }
            let data: Vec<f64> = var.get_values(..)?;
            return Ok(data);
        }
    }
    Err(NetCdfError::MissingData(format!(
        "coordinate {}",
        names.join(" or ")
    )))
}

fn read_packing(var: &netcdf::Variable) -> CfPacking {
    let missing = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|name| get_f64_attr(var, name))
        .collect();
    CfPacking {
        scale_factor: get_f64_attr(var, "scale_factor").unwrap_or(1.0),
        add_offset: get_f64_attr(var, "add_offset").unwrap_or(0.0),
        missing,
    }
}

// =============================================================================
// Attribute helpers
// =============================================================================

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Numeric attribute widened to f64, whatever its stored type.
fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Double(d) => Some(d),
        netcdf::AttributeValue::Float(f) => Some(f as f64),
        netcdf::AttributeValue::Int(i) => Some(i as f64),
        netcdf::AttributeValue::Short(s) => Some(s as f64),
        netcdf::AttributeValue::Schar(b) => Some(b as f64),
        netcdf::AttributeValue::Uchar(b) => Some(b as f64),
        netcdf::AttributeValue::Ushort(s) => Some(s as f64),
        netcdf::AttributeValue::Uint(i) => Some(i as f64),
        netcdf::AttributeValue::Doubles(v) => v.first().copied(),
        netcdf::AttributeValue::Floats(v) => v.first().map(|&f| f as f64),
        _ => None,
    }
}

fn get_str_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_dim_names() {
        assert_eq!(canonical_dim("latitude"), Some(LAT_DIM));
        assert_eq!(canonical_dim("lon"), Some(LON_DIM));
        assert_eq!(canonical_dim("time"), Some(TIME_DIM));
        assert_eq!(canonical_dim("bnds"), None);
    }
}
