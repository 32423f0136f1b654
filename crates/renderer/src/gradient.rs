//! Color-mapped raster of a gridded field over a geographic extent.

use climate_common::{BoundingBox, SpatialField};
use image::RgbaImage;
use rayon::prelude::*;

use crate::colormap::Colormap;
use crate::error::{RenderError, RenderResult};

/// Data range mapped onto the colormap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Finite min/max of the whole field (not just the visible extent), or
    /// `None` when every cell is missing.
    pub fn from_field(field: &SpatialField) -> Option<Self> {
        field.finite_range().map(|(min, max)| Self { min, max })
    }

    /// Span used for normalisation; degenerate ranges map to 1.
    pub fn span(&self) -> f32 {
        let range = self.max - self.min;
        if range.abs() < 0.001 {
            1.0
        } else {
            range
        }
    }

    /// Position of `value` in `[0, 1]`.
    pub fn normalize(&self, value: f32) -> f32 {
        ((value - self.min) / self.span()).clamp(0.0, 1.0)
    }
}

/// Cell index for each pixel along one axis, `None` where the pixel falls
/// outside the grid.
fn pixel_lookup<F>(pixels: u32, lookup: F) -> Vec<Option<usize>>
where
    F: Fn(u32) -> Option<usize>,
{
    (0..pixels).map(lookup).collect()
}

/// Render `field` as blocks of constant color covering `extent`, north up.
///
/// Each pixel takes the value of the grid cell containing its centre, so
/// coarse model grids appear as cells rather than being smoothed.
///
/// # Returns
/// RGBA image of `width` x `height`; missing or off-grid pixels get
/// `cmap.missing`.
pub fn render_field(
    field: &SpatialField,
    extent: &BoundingBox,
    width: u32,
    height: u32,
    range: ValueRange,
    cmap: &Colormap,
) -> RenderResult<RgbaImage> {
    if !extent.is_valid() {
        return Err(RenderError::InvalidExtent(format!("{:?}", extent)));
    }
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidSize {
            width,
            height,
            message: "map panel has no area".to_string(),
        });
    }

    let cols = pixel_lookup(width, |px| {
        let (lon, _) = extent.pixel_center(px, 0, width, height);
        field.lon_index(lon)
    });
    let rows = pixel_lookup(height, |py| {
        let (_, lat) = extent.pixel_center(0, py, width, height);
        field.lat_index(lat)
    });

    let row_bytes = width as usize * 4;
    let mut pixels = vec![0u8; row_bytes * height as usize];

    pixels
        .par_chunks_mut(row_bytes)
        .zip(rows.par_iter())
        .for_each(|(line, row)| {
            for (px, col) in cols.iter().enumerate() {
                let value = match (row, col) {
                    (Some(r), Some(c)) => field.get(*r, *c),
                    _ => None,
                };
                let color = match value {
                    Some(v) if !v.is_nan() => cmap.sample(range.normalize(v)),
                    _ => cmap.missing,
                };
                let i = px * 4;
                line[i] = color.r;
                line[i + 1] = color.g;
                line[i + 2] = color.b;
                line[i + 3] = color.a;
            }
        });

    RgbaImage::from_raw(width, height, pixels).ok_or_else(|| RenderError::InvalidSize {
        width,
        height,
        message: "pixel buffer does not match dimensions".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::Color;

    #[test]
    fn test_value_range_normalize() {
        let r = ValueRange::new(20.0, 30.0);
        assert_eq!(r.normalize(25.0), 0.5);
        assert_eq!(r.normalize(10.0), 0.0);
        assert_eq!(r.normalize(40.0), 1.0);
    }

    #[test]
    fn test_degenerate_range() {
        let r = ValueRange::new(20.0, 20.0);
        assert_eq!(r.span(), 1.0);
        assert_eq!(r.normalize(20.0), 0.0);
    }

    #[test]
    fn test_render_two_cells() {
        // Two latitude rows covering the top and bottom halves of the extent
        let extent = BoundingBox::new(-35.0, -9.0, -34.0, -8.0);
        let field = SpatialField::new(vec![-8.25, -8.75], vec![-34.5], vec![30.0, 20.0]).unwrap();
        let cmap = Colormap::yl_or_rd();
        let img = render_field(&field, &extent, 4, 4, ValueRange::new(20.0, 30.0), &cmap).unwrap();

        let top: Color = {
            let p = img.get_pixel(0, 0).0;
            Color::new(p[0], p[1], p[2], p[3])
        };
        let bottom: Color = {
            let p = img.get_pixel(0, 3).0;
            Color::new(p[0], p[1], p[2], p[3])
        };
        assert_eq!(top, cmap.sample(1.0));
        assert_eq!(bottom, cmap.sample(0.0));
    }

    #[test]
    fn test_missing_cells_use_missing_color() {
        let extent = BoundingBox::new(-35.0, -9.0, -34.0, -8.0);
        let field = SpatialField::new(vec![-8.5], vec![-34.5], vec![f32::NAN]).unwrap();
        let cmap = Colormap::yl_or_rd();
        let img = render_field(&field, &extent, 2, 2, ValueRange::new(0.0, 1.0), &cmap).unwrap();
        assert!(img.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_zero_size_rejected() {
        let extent = BoundingBox::recife();
        let field = SpatialField::new(vec![-8.5], vec![-34.5], vec![1.0]).unwrap();
        let err = render_field(&field, &extent, 0, 10, ValueRange::new(0.0, 1.0), &Colormap::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidSize { .. }));
    }
}
