//! Reductions over the time dimension.

use climate_common::{ClimateDataset, ClimateResult, SpatialField};
use rayon::prelude::*;
use tracing::debug;

/// How missing (`NaN`) entries participate in a mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Exclude missing entries from both sum and count; a cell with no
    /// present entries stays missing.
    Skip,
    /// Any missing entry makes the result missing.
    Propagate,
}

impl MissingPolicy {
    /// Mean of `values` under this policy; `NaN` when undefined.
    pub fn mean<I>(self, values: I) -> f64
    where
        I: IntoIterator<Item = f32>,
    {
        let mut sum = 0.0f64;
        let mut count = 0usize;
        for v in values {
            if v.is_nan() {
                match self {
                    MissingPolicy::Skip => continue,
                    MissingPolicy::Propagate => return f64::NAN,
                }
            }
            sum += v as f64;
            count += 1;
        }
        if count == 0 {
            f64::NAN
        } else {
            sum / count as f64
        }
    }
}

/// Per-cell mean of `variable` over the time dimension.
///
/// Pure: the dataset is only borrowed and repeated calls give identical
/// fields.
///
/// # Errors
///
/// [`climate_common::ClimateError::MissingField`] when the variable is absent
/// or has no time dimension.
pub fn compute_mean(
    dataset: &ClimateDataset,
    variable: &str,
    policy: MissingPolicy,
) -> ClimateResult<SpatialField> {
    let var = dataset.variable(variable)?;
    let (nt, ny, nx) = var.time_lat_lon_shape()?;
    let plane = ny * nx;
    let values = &var.values;

    let means: Vec<f32> = (0..plane)
        .into_par_iter()
        .map(|cell| policy.mean((0..nt).map(|t| values[t * plane + cell])) as f32)
        .collect();

    let field = SpatialField::new(dataset.lat.clone(), dataset.lon.clone(), means)?;
    debug!(
        label = %dataset.label,
        variable = %variable,
        time_steps = nt,
        cells = plane,
        valid_cells = field.valid_count(),
        policy = ?policy,
        "Computed temporal mean"
    );
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_ignores_missing() {
        let m = MissingPolicy::Skip.mean([10.0, f32::NAN, 20.0]);
        assert_eq!(m, 15.0);
    }

    #[test]
    fn test_skip_all_missing_is_nan() {
        assert!(MissingPolicy::Skip.mean([f32::NAN, f32::NAN]).is_nan());
        assert!(MissingPolicy::Skip.mean(std::iter::empty()).is_nan());
    }

    #[test]
    fn test_propagate_poisons() {
        assert!(MissingPolicy::Propagate.mean([10.0, f32::NAN]).is_nan());
        assert_eq!(MissingPolicy::Propagate.mean([10.0, 30.0]), 20.0);
    }
}
