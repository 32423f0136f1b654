//! Common types shared by the climate-maps crates.
//!
//! A [`ClimateDataset`] is a labelled `(time, lat, lon)` grid loaded from a
//! scenario file; a [`SpatialField`] is the 2-D `(lat, lon)` result of
//! slicing or reducing one of its variables.

pub mod bbox;
pub mod dataset;
pub mod error;
pub mod field;
pub mod month;
pub mod scenario;
pub mod time;
pub mod units;

pub use bbox::{BboxParseError, BoundingBox};
pub use dataset::{ClimateDataset, DataVariable, LAT_DIM, LON_DIM, TIME_DIM};
pub use error::{ClimateError, ClimateResult};
pub use field::SpatialField;
pub use month::{default_months, RepresentativeMonth};
pub use scenario::{default_scenarios, Scenario};
pub use time::{Calendar, TimeAxis};
pub use units::{UnitPolicy, UnitTransform};
