//! Composition of a complete map figure.
//!
//! Layout, top to bottom: title block, map panel (aspect ratio of the
//! extent in plate carrée) with the colour bar on its right.

use climate_common::{BoundingBox, SpatialField};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use rusttype::Font;
use tracing::debug;

use crate::coastline::Coastline;
use crate::colormap::Colormap;
use crate::error::{RenderError, RenderResult};
use crate::gradient::{render_field, ValueRange};
use crate::legend::Colorbar;
use crate::png::encode_png_with_text;
use crate::text::{Align, TextPainter};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const COAST: Rgba<u8> = Rgba([20, 20, 20, 255]);

const MARGIN: u32 = 20;
const COLORBAR_WIDTH: u32 = 18;
const COLORBAR_GAP: u32 = 16;
/// Room for ticks, tick labels and the rotated label.
const COLORBAR_TEXT: u32 = 80;
const MIN_PANEL: u32 = 16;

/// Everything needed to draw one map, apart from the data.
#[derive(Debug, Clone)]
pub struct MapSpec {
    pub extent: BoundingBox,
    pub colormap: Colormap,
    /// Title lines, drawn centred above the panel.
    pub title: Vec<String>,
    pub colorbar_label: Option<String>,
    pub coastline: Option<Coastline>,
    /// Fixed colour range; defaults to the finite min/max of the field.
    pub range: Option<ValueRange>,
    pub width: u32,
    pub height: u32,
    pub font_size: f32,
}

impl Default for MapSpec {
    fn default() -> Self {
        Self {
            extent: BoundingBox::recife(),
            colormap: Colormap::yl_or_rd(),
            title: Vec::new(),
            colorbar_label: None,
            coastline: Some(Coastline::recife()),
            range: None,
            width: 600,
            height: 900,
            font_size: 16.0,
        }
    }
}

/// A rendered figure.
#[derive(Debug, Clone)]
pub struct MapFigure {
    pub image: RgbaImage,
    pub title: Vec<String>,
    /// Colour range actually used, `None` when the field had no valid cells.
    pub range: Option<ValueRange>,
    /// Where the map panel sits inside `image`.
    pub panel: Rect,
}

impl MapFigure {
    /// PNG bytes, with the title lines as `Title`/`Description` text chunks.
    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        let mut text = Vec::new();
        if let Some(first) = self.title.first() {
            text.push(("Title", first.as_str()));
        }
        if let Some(second) = self.title.get(1) {
            text.push(("Description", second.as_str()));
        }
        text.push(("Software", "climate-maps"));
        encode_png_with_text(&self.image, &text)
    }
}

/// Panel rectangle fitted to the extent's aspect ratio inside the space left
/// after title and colour bar.
fn layout(spec: &MapSpec, title_height: u32) -> RenderResult<Rect> {
    let side = COLORBAR_GAP + COLORBAR_WIDTH + COLORBAR_TEXT;
    let avail_w = spec.width.saturating_sub(2 * MARGIN + side);
    let avail_h = spec.height.saturating_sub(2 * MARGIN + title_height);
    if avail_w < MIN_PANEL || avail_h < MIN_PANEL {
        return Err(RenderError::InvalidSize {
            width: spec.width,
            height: spec.height,
            message: "too small for title, map and colour bar".to_string(),
        });
    }

    let aspect = spec.extent.height() / spec.extent.width();
    let (mut w, mut h) = (avail_w as f64, avail_w as f64 * aspect);
    if h > avail_h as f64 {
        h = avail_h as f64;
        w = h / aspect;
    }
    let (w, h) = ((w.round() as u32).max(1), (h.round() as u32).max(1));

    let x = MARGIN + (avail_w - w.min(avail_w)) / 2;
    let y = MARGIN + title_height + (avail_h - h.min(avail_h)) / 2;
    Ok(Rect::at(x as i32, y as i32).of_size(w, h))
}

/// Render `field` as a regional map.
///
/// The field is drawn cell by cell over `spec.extent`; cells outside the
/// extent are cut off, and an extent larger than the grid leaves the
/// uncovered area in the colormap's missing colour.
pub fn render_map(
    field: &SpatialField,
    spec: &MapSpec,
    font: Option<&Font<'static>>,
) -> RenderResult<MapFigure> {
    if !spec.extent.is_valid() {
        return Err(RenderError::InvalidExtent(format!("{:?}", spec.extent)));
    }

    let painter = TextPainter::new(font);
    let line_height = (spec.font_size * 1.4).ceil() as u32;
    let title_height = if painter.has_font() {
        spec.title.len() as u32 * line_height + MARGIN / 2
    } else {
        0
    };

    let panel = layout(spec, title_height)?;
    let range = spec.range.or_else(|| ValueRange::from_field(field));
    debug!(
        width = spec.width,
        height = spec.height,
        panel_w = panel.width(),
        panel_h = panel.height(),
        ?range,
        "Rendering map"
    );

    let mut image = RgbaImage::from_pixel(spec.width, spec.height, BACKGROUND);

    // Map panel
    let mut map = render_field(
        field,
        &spec.extent,
        panel.width(),
        panel.height(),
        range.unwrap_or(ValueRange::new(0.0, 1.0)),
        &spec.colormap,
    )?;
    if let Some(coast) = &spec.coastline {
        coast.clipped_to(&spec.extent).draw(&mut map, &spec.extent, COAST);
    }
    image::imageops::overlay(&mut image, &map, panel.left() as i64, panel.top() as i64);
    draw_hollow_rect_mut(&mut image, panel, INK);

    if range.is_none() {
        let (cx, cy) = (
            panel.left() + panel.width() as i32 / 2,
            panel.top() + panel.height() as i32 / 2,
        );
        painter.draw(&mut image, "sem dados", cx, cy, spec.font_size, Align::Center, INK);
    }

    // Colour bar, same height as the panel
    let bar = Rect::at(
        panel.right() + 1 + COLORBAR_GAP as i32,
        panel.top(),
    )
    .of_size(COLORBAR_WIDTH, panel.height());
    Colorbar {
        cmap: &spec.colormap,
        range,
        label: spec.colorbar_label.as_deref(),
        font_size: spec.font_size * 0.8,
    }
    .draw(&mut image, bar, &painter);

    // Title
    let centre = (spec.width / 2) as i32;
    for (i, line) in spec.title.iter().enumerate() {
        let y = MARGIN as i32 / 2 + (i as u32 * line_height) as i32;
        painter.draw(&mut image, line, centre, y, spec.font_size, Align::Center, INK);
    }

    Ok(MapFigure {
        image,
        title: spec.title.clone(),
        range,
        panel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_field(value: f32) -> SpatialField {
        SpatialField::new(vec![-9.0, -8.0], vec![-35.0, -34.5], vec![value; 4]).unwrap()
    }

    #[test]
    fn test_panel_keeps_extent_aspect() {
        let spec = MapSpec::default();
        let panel = layout(&spec, 0).unwrap();
        let ratio = panel.height() as f64 / panel.width() as f64;
        // Recife box is three times taller than wide
        assert!((ratio - 3.0).abs() < 0.05, "ratio {}", ratio);
        assert!(panel.right() < spec.width as i32);
        assert!(panel.bottom() < spec.height as i32);
    }

    #[test]
    fn test_too_small_figure_rejected() {
        let spec = MapSpec {
            width: 100,
            height: 100,
            ..Default::default()
        };
        let err = render_map(&uniform_field(25.0), &spec, None).unwrap_err();
        assert!(matches!(err, RenderError::InvalidSize { .. }));
    }

    #[test]
    fn test_all_missing_field_still_renders() {
        let figure = render_map(&uniform_field(f32::NAN), &MapSpec::default(), None).unwrap();
        assert!(figure.range.is_none());
        assert_eq!(figure.image.dimensions(), (600, 900));
    }

    #[test]
    fn test_explicit_range_wins() {
        let spec = MapSpec {
            range: Some(ValueRange::new(0.0, 50.0)),
            ..Default::default()
        };
        let figure = render_map(&uniform_field(25.0), &spec, None).unwrap();
        assert_eq!(figure.range, Some(ValueRange::new(0.0, 50.0)));
    }
}
