//! Writes small CF-style NetCDF files for reader tests.

use std::path::Path;

use climate_common::ClimateDataset;

/// CMIP6 fill value for float variables.
pub const CMIP_FILL_VALUE: f32 = 1.0e20;

/// Layout and contents of a fixture file.
#[derive(Debug, Clone)]
pub struct NcFixture {
    pub variable: String,
    pub units: String,
    pub time: Vec<f64>,
    pub time_units: String,
    pub calendar: String,
    pub lat_name: String,
    pub lon_name: String,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    /// Row-major `(time, lat, lon)`; `NaN` is written as the fill value
    pub values: Vec<f32>,
    /// Write the time coordinate variable and dimension
    pub with_time: bool,
}

impl NcFixture {
    /// Fixture mirroring `dataset`'s `variable`, converting °C back to Kelvin
    /// so the file looks like raw CMIP output.
    pub fn kelvin_from(dataset: &ClimateDataset, variable: &str) -> Self {
        let var = dataset
            .variable(variable)
            .expect("fixture source must contain the variable");
        Self {
            variable: variable.to_string(),
            units: "K".to_string(),
            time: dataset.time.values.clone(),
            time_units: dataset
                .time
                .units
                .clone()
                .unwrap_or_else(|| "days since 2010-01-01".to_string()),
            calendar: dataset.time.calendar.clone().unwrap_or_else(|| "standard".to_string()),
            lat_name: "lat".to_string(),
            lon_name: "lon".to_string(),
            lat: dataset.lat.clone(),
            lon: dataset.lon.clone(),
            values: var.values.iter().map(|v| v + 273.15).collect(),
            with_time: true,
        }
    }

    /// Write the fixture to `path`.
    pub fn write(&self, path: &Path) -> Result<(), netcdf::Error> {
        let mut file = netcdf::create(path)?;
        file.add_attribute("source", "climate-maps test fixture")?;

        if self.with_time {
            file.add_dimension("time", self.time.len())?;
        }
        file.add_dimension(&self.lat_name, self.lat.len())?;
        file.add_dimension(&self.lon_name, self.lon.len())?;

        if self.with_time {
            let mut time_var = file.add_variable::<f64>("time", &["time"])?;
            time_var.put_attribute("units", self.time_units.as_str())?;
            time_var.put_attribute("calendar", self.calendar.as_str())?;
            time_var.put_values(&self.time, ..)?;
        }

        {
            let mut lat_var = file.add_variable::<f64>(&self.lat_name, &[self.lat_name.as_str()])?;
            lat_var.put_attribute("units", "degrees_north")?;
            lat_var.put_values(&self.lat, ..)?;
        }

        {
            let mut lon_var = file.add_variable::<f64>(&self.lon_name, &[self.lon_name.as_str()])?;
            lon_var.put_attribute("units", "degrees_east")?;
            lon_var.put_values(&self.lon, ..)?;
        }

        let dims: Vec<&str> = if self.with_time {
            vec!["time", self.lat_name.as_str(), self.lon_name.as_str()]
        } else {
            vec![self.lat_name.as_str(), self.lon_name.as_str()]
        };
        let mut var = file.add_variable::<f32>(&self.variable, &dims)?;
        var.set_fill_value(CMIP_FILL_VALUE)?;
        var.put_attribute("missing_value", CMIP_FILL_VALUE)?;
        var.put_attribute("units", self.units.as_str())?;
        var.put_attribute("standard_name", "air_temperature")?;

        let raw: Vec<f32> = self
            .values
            .iter()
            .map(|&v| if v.is_nan() { CMIP_FILL_VALUE } else { v })
            .collect();
        var.put_values(&raw, ..)?;

        Ok(())
    }
}
