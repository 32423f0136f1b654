//! In-memory climate datasets.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{ClimateError, ClimateResult};
use crate::field::SpatialField;
use crate::time::TimeAxis;

/// Canonical dimension names; loaders map `latitude`/`longitude` etc. onto these.
pub const TIME_DIM: &str = "time";
pub const LAT_DIM: &str = "lat";
pub const LON_DIM: &str = "lon";

/// A data variable with its dimension names, shape and row-major values.
#[derive(Debug, Clone, PartialEq)]
pub struct DataVariable {
    pub name: String,
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub units: Option<String>,
    pub values: Vec<f32>,
}

impl DataVariable {
    /// Position of dimension `dim`, if the variable has it.
    pub fn dim_index(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    /// Validate a `(time, lat, lon)` layout and return `(nt, ny, nx)`.
    pub fn time_lat_lon_shape(&self) -> ClimateResult<(usize, usize, usize)> {
        if self.dim_index(TIME_DIM).is_none() {
            return Err(ClimateError::missing(format!(
                "time dimension of variable '{}'",
                self.name
            )));
        }
        if self.dims != [TIME_DIM, LAT_DIM, LON_DIM] {
            return Err(ClimateError::InvalidShape {
                name: self.name.clone(),
                message: format!("expected dims (time, lat, lon), found {:?}", self.dims),
            });
        }
        let (nt, ny, nx) = (self.shape[0], self.shape[1], self.shape[2]);
        if self.values.len() != nt * ny * nx {
            return Err(ClimateError::InvalidShape {
                name: self.name.clone(),
                message: format!("{} values for shape {:?}", self.values.len(), self.shape),
            });
        }
        Ok((nt, ny, nx))
    }
}

/// A labelled dataset with shared `time`, `lat` and `lon` coordinates.
///
/// Immutable once built: reducers and the map renderer only borrow it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateDataset {
    pub label: String,
    pub source: Option<PathBuf>,
    pub time: TimeAxis,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    variables: BTreeMap<String, DataVariable>,
}

impl ClimateDataset {
    pub fn new(label: impl Into<String>, time: TimeAxis, lat: Vec<f64>, lon: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            source: None,
            time,
            lat,
            lon,
            variables: BTreeMap::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Add a `(time, lat, lon)` variable sized to this dataset's axes.
    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        units: Option<String>,
        values: Vec<f32>,
    ) -> ClimateResult<Self> {
        let name = name.into();
        let var = DataVariable {
            name: name.clone(),
            dims: vec![TIME_DIM.into(), LAT_DIM.into(), LON_DIM.into()],
            shape: vec![self.time.len(), self.lat.len(), self.lon.len()],
            units,
            values,
        };
        var.time_lat_lon_shape()?;
        self.variables.insert(name, var);
        Ok(self)
    }

    /// Insert a variable as-is, without layout checks.
    pub fn insert_variable(&mut self, var: DataVariable) {
        self.variables.insert(var.name.clone(), var);
    }

    /// Look up a variable; absent variables are a [`ClimateError::MissingField`].
    pub fn variable(&self, name: &str) -> ClimateResult<&DataVariable> {
        self.variables
            .get(name)
            .ok_or_else(|| ClimateError::missing(format!("variable '{}'", name)))
    }

    /// Length of the time dimension.
    pub fn time_len(&self) -> usize {
        self.time.len()
    }

    /// The 2-D slice of `variable` at `time_index`; no temporal reduction.
    pub fn slice_time(&self, variable: &str, time_index: usize) -> ClimateResult<SpatialField> {
        let var = self.variable(variable)?;
        let (nt, ny, nx) = var.time_lat_lon_shape()?;
        if time_index >= nt {
            return Err(ClimateError::IndexOutOfRange {
                index: time_index,
                len: nt,
            });
        }
        let plane = ny * nx;
        let start = time_index * plane;
        SpatialField::new(
            self.lat.clone(),
            self.lon.clone(),
            var.values[start..start + plane].to_vec(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(nt: usize) -> ClimateDataset {
        let values: Vec<f32> = (0..nt * 2 * 2).map(|i| i as f32).collect();
        ClimateDataset::new(
            "test",
            TimeAxis::new((0..nt).map(|i| i as f64).collect(), None, None),
            vec![-9.0, -8.0],
            vec![-35.0, -34.0],
        )
        .with_variable("tasmax", None, values)
        .unwrap()
    }

    #[test]
    fn test_slice_time_selects_plane() {
        let ds = dataset(3);
        let slice = ds.slice_time("tasmax", 1).unwrap();
        assert_eq!(slice.values(), &[4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_slice_time_out_of_range() {
        let ds = dataset(12);
        assert!(ds.slice_time("tasmax", 11).is_ok());
        let err = ds.slice_time("tasmax", 12).unwrap_err();
        assert!(matches!(err, ClimateError::IndexOutOfRange { index: 12, len: 12 }));
    }

    #[test]
    fn test_missing_variable() {
        let ds = dataset(1);
        let err = ds.slice_time("tas", 0).unwrap_err();
        assert!(matches!(err, ClimateError::MissingField(_)));
    }

    #[test]
    fn test_variable_without_time_dimension() {
        let mut ds = dataset(1);
        ds.insert_variable(DataVariable {
            name: "orog".into(),
            dims: vec![LAT_DIM.into(), LON_DIM.into()],
            shape: vec![2, 2],
            units: None,
            values: vec![0.0; 4],
        });
        let err = ds.slice_time("orog", 0).unwrap_err();
        assert!(matches!(err, ClimateError::MissingField(msg) if msg.contains("time")));
    }

    #[test]
    fn test_with_variable_rejects_wrong_length() {
        let res = ClimateDataset::new(
            "bad",
            TimeAxis::new(vec![0.0], None, None),
            vec![0.0],
            vec![0.0],
        )
        .with_variable("tasmax", None, vec![1.0, 2.0]);
        assert!(matches!(res, Err(ClimateError::InvalidShape { .. })));
    }
}
