//! Annual maximum-temperature summaries and regional monthly maps for a
//! list of climate scenarios.
//!
//! The binary wires these modules together; they are exposed as a library
//! so the scenario loop can be driven from tests with in-memory datasets.

pub mod config;
pub mod driver;
pub mod maps;
pub mod sink;

pub use config::MapsConfig;
pub use driver::{run, DatasetLoader, Failure, NetCdfLoader, RunReport};
pub use maps::{map_title, render_month, MapStyle};
pub use sink::{figure_file_name, FigureSink, PngDirectorySink, ViewerSink};
