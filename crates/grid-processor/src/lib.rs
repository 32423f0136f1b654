//! Grid reductions for monthly climate datasets.
//!
//! Two operations feed the per-scenario report:
//!
//! ```text
//! ClimateDataset (time, lat, lon)
//!      │
//!      ▼
//! compute_mean(dataset, variable, MissingPolicy)   ── per-cell mean over time
//!      │
//!      ▼
//! SpatialField (lat, lon)
//!      │
//!      ▼
//! summarize(field, MissingPolicy)                  ── one scalar, or NoData
//! ```
//!
//! Missing-value handling is always an explicit [`MissingPolicy`]; the
//! analysis default is [`MissingPolicy::Skip`].
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{compute_mean, summarize, MissingPolicy};
//!
//! let mean = compute_mean(&dataset, "tasmax", MissingPolicy::Skip)?;
//! println!("{}", summarize(&mean, MissingPolicy::Skip));
//! ```

pub mod reduce;
pub mod summary;

pub use reduce::{compute_mean, MissingPolicy};
pub use summary::{summarize, AnnualSummary};
