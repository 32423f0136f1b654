//! Scalar summary of a reduced field.

use std::fmt;

use climate_common::SpatialField;

use crate::reduce::MissingPolicy;

/// Outcome of summarising a reduced field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnnualSummary {
    /// Every cell of the field is missing
    NoData,
    /// Mean over the field's cells
    Mean(f64),
}

impl AnnualSummary {
    pub fn mean(&self) -> Option<f64> {
        match self {
            AnnualSummary::NoData => None,
            AnnualSummary::Mean(m) => Some(*m),
        }
    }
}

impl fmt::Display for AnnualSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnualSummary::NoData => write!(f, "no data available"),
            // Debug keeps a trailing ".0" on whole numbers (20.0, not 20)
            AnnualSummary::Mean(m) => write!(f, "{:?}", m),
        }
    }
}

/// Summarise `field`: [`AnnualSummary::NoData`] when every cell is missing,
/// otherwise the mean of its cells under `policy`.
pub fn summarize(field: &SpatialField, policy: MissingPolicy) -> AnnualSummary {
    if field.is_all_missing() {
        return AnnualSummary::NoData;
    }
    AnnualSummary::Mean(policy.mean(field.values().iter().copied()))
}
