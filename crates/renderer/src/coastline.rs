//! Coastline overlay.
//!
//! A coarse built-in polyline covers the Pernambuco/Alagoas coast around
//! Recife. Other regions can load coastlines from GeoJSON (for example a
//! Natural Earth `ne_10m_coastline` extract).

use std::path::Path;

use climate_common::bbox::normalize_lon;
use climate_common::BoundingBox;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_antialiased_line_segment_mut;
use imageproc::pixelops::interpolate;
use serde_json::Value;
use tracing::debug;

use crate::error::{RenderError, RenderResult};

/// Coast from Itamaracá (north) to Maceió (south), as (lon, lat).
const RECIFE_COAST: &[(f64, f64)] = &[
    (-34.83, -7.75),
    (-34.82, -7.93),
    (-34.835, -8.01),
    (-34.87, -8.063),
    (-34.89, -8.12),
    (-34.905, -8.18),
    (-34.915, -8.21),
    (-34.93, -8.24),
    (-34.95, -8.33),
    (-34.948, -8.355),
    (-34.96, -8.40),
    (-35.00, -8.505),
    (-35.03, -8.56),
    (-35.10, -8.76),
    (-35.14, -8.90),
    (-35.22, -9.01),
    (-35.26, -9.09),
    (-35.29, -9.16),
    (-35.37, -9.26),
    (-35.50, -9.40),
    (-35.72, -9.66),
];

/// A set of polylines in geographic coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coastline {
    lines: Vec<Vec<(f64, f64)>>,
}

impl Coastline {
    pub fn new(lines: Vec<Vec<(f64, f64)>>) -> Self {
        Self { lines }
    }

    /// Built-in coast around Recife.
    pub fn recife() -> Self {
        Self::new(vec![RECIFE_COAST.to_vec()])
    }

    pub fn lines(&self) -> &[Vec<(f64, f64)>] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.len() < 2)
    }

    /// Load from a GeoJSON file.
    pub fn from_geojson_file(path: &Path) -> RenderResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let coast = Self::from_geojson(&content)?;
        debug!(path = %path.display(), lines = coast.lines.len(), "Loaded coastline");
        Ok(coast)
    }

    /// Parse a GeoJSON document.
    ///
    /// Accepts a FeatureCollection, Feature or bare geometry. LineString,
    /// MultiLineString, Polygon and MultiPolygon geometries contribute lines;
    /// other geometry types are ignored.
    pub fn from_geojson(json: &str) -> RenderResult<Self> {
        let doc: Value = serde_json::from_str(json)?;
        let mut lines = Vec::new();
        collect_lines(&doc, &mut lines)?;
        if lines.is_empty() {
            return Err(RenderError::Coastline(
                "GeoJSON contains no line or polygon geometry".to_string(),
            ));
        }
        Ok(Self { lines })
    }

    /// Only the polylines with at least one vertex inside `extent`, with
    /// one neighbouring vertex kept on either side so edges stay continuous.
    pub fn clipped_to(&self, extent: &BoundingBox) -> Self {
        let mut out = Vec::new();
        for line in &self.lines {
            let inside: Vec<bool> = line
                .iter()
                .map(|&(lon, lat)| extent.contains_point(normalize_lon(lon), lat))
                .collect();
            let mut current: Vec<(f64, f64)> = Vec::new();
            for i in 0..line.len() {
                let near = inside[i]
                    || (i > 0 && inside[i - 1])
                    || inside.get(i + 1).copied().unwrap_or(false);
                if near {
                    current.push(line[i]);
                } else if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
            if !current.is_empty() {
                out.push(current);
            }
        }
        out.retain(|l| l.len() >= 2);
        Self { lines: out }
    }

    /// Draw onto `img`, which covers `extent` north up.
    pub fn draw(&self, img: &mut RgbaImage, extent: &BoundingBox, color: Rgba<u8>) {
        let (w, h) = img.dimensions();
        for line in &self.lines {
            for pair in line.windows(2) {
                let (x0, y0) = extent.to_pixel(normalize_lon(pair[0].0), pair[0].1, w, h);
                let (x1, y1) = extent.to_pixel(normalize_lon(pair[1].0), pair[1].1, w, h);
                // Segments jumping across the antimeridian would span the map
                if (x1 - x0).abs() > w as f32 * 4.0 {
                    continue;
                }
                draw_antialiased_line_segment_mut(
                    img,
                    (x0.round() as i32, y0.round() as i32),
                    (x1.round() as i32, y1.round() as i32),
                    color,
                    interpolate,
                );
            }
        }
    }
}

fn collect_lines(value: &Value, out: &mut Vec<Vec<(f64, f64)>>) -> RenderResult<()> {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let features = value
                .get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| RenderError::Coastline("FeatureCollection without features".into()))?;
            for feature in features {
                collect_lines(feature, out)?;
            }
        }
        Some("Feature") => {
            if let Some(geometry) = value.get("geometry").filter(|g| !g.is_null()) {
                collect_lines(geometry, out)?;
            }
        }
        Some("GeometryCollection") => {
            if let Some(geometries) = value.get("geometries").and_then(Value::as_array) {
                for g in geometries {
                    collect_lines(g, out)?;
                }
            }
        }
        Some("LineString") => out.push(positions(coordinates(value)?)?),
        Some("MultiLineString") | Some("Polygon") => {
            for ring in array(coordinates(value)?)? {
                out.push(positions(ring)?);
            }
        }
        Some("MultiPolygon") => {
            for polygon in array(coordinates(value)?)? {
                for ring in array(polygon)? {
                    out.push(positions(ring)?);
                }
            }
        }
        Some(_) => {}
        None => return Err(RenderError::Coastline("object without a type".into())),
    }
    Ok(())
}

fn coordinates(value: &Value) -> RenderResult<&Value> {
    value
        .get("coordinates")
        .ok_or_else(|| RenderError::Coastline("geometry without coordinates".into()))
}

fn array(value: &Value) -> RenderResult<&Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| RenderError::Coastline(format!("expected an array, found {}", value)))
}

fn positions(value: &Value) -> RenderResult<Vec<(f64, f64)>> {
    array(value)?
        .iter()
        .map(|p| match p.as_array().map(Vec::as_slice) {
            Some([lon, lat, ..]) => match (lon.as_f64(), lat.as_f64()) {
                (Some(lon), Some(lat)) => Ok((lon, lat)),
                _ => Err(RenderError::Coastline(format!("non-numeric position {}", p))),
            },
            _ => Err(RenderError::Coastline(format!("invalid position {}", p))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recife_coast_crosses_extent() {
        let coast = Coastline::recife();
        let clipped = coast.clipped_to(&BoundingBox::recife());
        assert!(!clipped.is_empty());
        // Recife itself is on the built-in coast
        assert!(clipped.lines()[0].contains(&(-34.87, -8.063)));
    }

    #[test]
    fn test_clip_far_extent_is_empty() {
        let coast = Coastline::recife();
        let clipped = coast.clipped_to(&BoundingBox::new(10.0, 40.0, 11.0, 41.0));
        assert!(clipped.is_empty());
    }

    #[test]
    fn test_geojson_feature_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "LineString", "coordinates": [[-35, -8], [-34.9, -8.1]]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "MultiPolygon", "coordinates": [[[[0, 0], [1, 0], [1, 1], [0, 0]]]]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Point", "coordinates": [0, 0]}}
            ]
        }"#;
        let coast = Coastline::from_geojson(json).unwrap();
        assert_eq!(coast.lines().len(), 2);
        assert_eq!(coast.lines()[0], vec![(-35.0, -8.0), (-34.9, -8.1)]);
        assert_eq!(coast.lines()[1].len(), 4);
    }

    #[test]
    fn test_geojson_without_lines_rejected() {
        let json = r#"{"type": "Point", "coordinates": [0, 0]}"#;
        assert!(matches!(
            Coastline::from_geojson(json),
            Err(RenderError::Coastline(_))
        ));
    }

    #[test]
    fn test_geojson_bad_position() {
        let json = r#"{"type": "LineString", "coordinates": [[0], [1, 1]]}"#;
        assert!(Coastline::from_geojson(json).is_err());
    }

    #[test]
    fn test_draw_marks_pixels() {
        let extent = BoundingBox::recife();
        let mut img = RgbaImage::from_pixel(50, 150, Rgba([255, 255, 255, 255]));
        Coastline::recife().draw(&mut img, &extent, Rgba([0, 0, 0, 255]));
        assert!(img.pixels().any(|p| p.0[0] < 128));
    }
}
