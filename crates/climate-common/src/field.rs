//! Two-dimensional `(lat, lon)` fields.

use crate::bbox::normalize_lon;
use crate::error::{ClimateError, ClimateResult};

/// A 2-D field on a regular or irregular lat/lon grid.
///
/// Values are stored row-major with one row per latitude, in the order of
/// the `lat` axis. Missing cells hold `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialField {
    lat: Vec<f64>,
    lon: Vec<f64>,
    values: Vec<f32>,
}

impl SpatialField {
    /// Build a field, checking that `values` matches the axes.
    pub fn new(lat: Vec<f64>, lon: Vec<f64>, values: Vec<f32>) -> ClimateResult<Self> {
        if values.len() != lat.len() * lon.len() {
            return Err(ClimateError::InvalidShape {
                name: "field".to_string(),
                message: format!(
                    "{} values for a {}x{} (lat x lon) grid",
                    values.len(),
                    lat.len(),
                    lon.len()
                ),
            });
        }
        Ok(Self { lat, lon, values })
    }

    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of longitude columns.
    pub fn width(&self) -> usize {
        self.lon.len()
    }

    /// Number of latitude rows.
    pub fn height(&self) -> usize {
        self.lat.len()
    }

    /// Value at `(row, col)`, `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        self.values.get(row * self.width() + col).copied()
    }

    /// Number of cells holding a value.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    /// True when every cell is missing (also for an empty field).
    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(|v| v.is_nan())
    }

    /// Minimum and maximum of the finite cells.
    pub fn finite_range(&self) -> Option<(f32, f32)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Index of the latitude row whose cell contains `lat`, or `None` when
    /// the coordinate lies outside the grid's outer cell edges.
    pub fn lat_index(&self, lat: f64) -> Option<usize> {
        nearest_cell(&self.lat, lat)
    }

    /// Index of the longitude column whose cell contains `lon`.
    ///
    /// Both the query and the axis are compared in -180..180, so grids stored
    /// on 0..360 longitudes are matched transparently.
    pub fn lon_index(&self, lon: f64) -> Option<usize> {
        let target = normalize_lon(lon);
        let mut best: Option<(usize, f64)> = None;
        for (i, &center) in self.lon.iter().enumerate() {
            let mut d = (normalize_lon(center) - target).abs();
            if d > 180.0 {
                d = 360.0 - d;
            }
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        let (idx, dist) = best?;
        if dist <= half_spacing(&self.lon, idx) {
            Some(idx)
        } else {
            None
        }
    }

    /// Value of the cell containing `(lon, lat)`.
    pub fn sample(&self, lon: f64, lat: f64) -> Option<f32> {
        let row = self.lat_index(lat)?;
        let col = self.lon_index(lon)?;
        self.get(row, col)
    }
}

/// Nearest axis point, accepted only if `x` lies within half a grid step of it.
fn nearest_cell(axis: &[f64], x: f64) -> Option<usize> {
    let (idx, dist) = axis
        .iter()
        .enumerate()
        .map(|(i, &c)| (i, (c - x).abs()))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;
    if dist <= half_spacing(axis, idx) {
        Some(idx)
    } else {
        None
    }
}

/// Half the distance to the neighbouring axis point; unbounded for a
/// single-point axis.
fn half_spacing(axis: &[f64], idx: usize) -> f64 {
    let step = match (idx.checked_sub(1).and_then(|i| axis.get(i)), axis.get(idx + 1)) {
        (_, Some(next)) => (next - axis[idx]).abs(),
        (Some(prev), None) => (axis[idx] - prev).abs(),
        (None, None) => return f64::INFINITY,
    };
    let step = if step > 180.0 { 360.0 - step } else { step };
    step / 2.0 + 1e-9
}
