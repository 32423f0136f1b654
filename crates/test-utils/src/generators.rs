//! Synthetic monthly datasets with predictable values.
//!
//! All generators produce a 12-step, January-indexed `tasmax` series in °C on
//! the fine Recife grid from [`crate::fixtures::grid`] unless noted.

use climate_common::{ClimateDataset, TimeAxis};

use crate::fixtures::{grid, time};

/// Variable name used by every generator.
pub const VARIABLE: &str = "tasmax";

/// Twelve mid-month steps of 2010 in `days since 2010-01-01`.
pub fn monthly_time_axis() -> TimeAxis {
    TimeAxis::new(
        time::MID_MONTH_DAYS.to_vec(),
        Some(time::DAYS_SINCE_2010.to_string()),
        Some("standard".to_string()),
    )
}

/// Builds a 12-month dataset whose value at `(t, row, col)` is `value(t, row, col)`.
///
/// Return `f32::NAN` from the closure to mark a cell missing.
pub fn monthly_dataset<F>(label: &str, lat: Vec<f64>, lon: Vec<f64>, value: F) -> ClimateDataset
where
    F: Fn(usize, usize, usize) -> f32,
{
    let time = monthly_time_axis();
    let (nt, ny, nx) = (time.len(), lat.len(), lon.len());
    let mut values = Vec::with_capacity(nt * ny * nx);
    for t in 0..nt {
        for row in 0..ny {
            for col in 0..nx {
                values.push(value(t, row, col));
            }
        }
    }
    ClimateDataset::new(label, time, lat, lon)
        .with_variable(VARIABLE, Some("°C".to_string()), values)
        .expect("generator produces consistent shapes")
}

/// January holds `value` everywhere; every other month is missing.
pub fn first_month_only_dataset(value: f32) -> ClimateDataset {
    monthly_dataset("first-month-only", grid::fine_lat(), grid::fine_lon(), |t, _, _| {
        if t == 0 {
            value
        } else {
            f32::NAN
        }
    })
}

/// Every cell of every month missing.
pub fn all_missing_dataset() -> ClimateDataset {
    monthly_dataset("all-missing", grid::fine_lat(), grid::fine_lon(), |_, _, _| f32::NAN)
}

/// A warm coastal seasonal cycle: `28 + 2*sin(month)` plus a north-south gradient.
///
/// Months differ from each other, so a single month never equals the time mean.
pub fn seasonal_dataset() -> ClimateDataset {
    monthly_dataset("seasonal", grid::fine_lat(), grid::fine_lon(), |t, row, col| {
        let season = (t as f32 / 12.0 * std::f32::consts::TAU).sin() * 2.0;
        28.0 + season + row as f32 * 0.1 + col as f32 * 0.05
    })
}

/// Seasonal values with a diagonal of cells missing in odd months.
pub fn patchy_dataset() -> ClimateDataset {
    monthly_dataset("patchy", grid::fine_lat(), grid::fine_lon(), |t, row, col| {
        if t % 2 == 1 && row % 3 == col {
            f32::NAN
        } else {
            20.0 + t as f32
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_month_only_layout() {
        let ds = first_month_only_dataset(20.0);
        let var = ds.variable(VARIABLE).unwrap();
        let plane = ds.lat.len() * ds.lon.len();
        assert!(var.values[..plane].iter().all(|&v| v == 20.0));
        assert!(var.values[plane..].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_seasonal_months_differ() {
        let ds = seasonal_dataset();
        let jan = ds.slice_time(VARIABLE, 0).unwrap();
        let jul = ds.slice_time(VARIABLE, 6).unwrap();
        assert_ne!(jan.values(), jul.values());
    }
}
