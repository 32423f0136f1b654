//! Map rendering for gridded climate fields.
//!
//! A [`figure::MapSpec`] describes one regional map (extent, palette, title);
//! [`figure::render_map`] turns a [`climate_common::SpatialField`] into an
//! RGBA figure with:
//! - a colour-mapped surface, one block per grid cell
//! - a coastline overlay
//! - a colour bar with ticks
//! - a title block
//!
//! [`png`] encodes the result.

pub mod coastline;
pub mod colormap;
pub mod error;
pub mod figure;
pub mod gradient;
pub mod legend;
pub mod png;
pub mod text;

pub use coastline::Coastline;
pub use colormap::{Color, Colormap};
pub use error::{RenderError, RenderResult};
pub use figure::{render_map, MapFigure, MapSpec};
pub use gradient::{render_field, ValueRange};
pub use legend::{nice_ticks, Colorbar};
pub use png::{encode_png, encode_png_with_text};
pub use text::FontSource;
