//! Geographic bounding box used to crop rendered maps.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees (EPSG:4326).
///
/// `x` is longitude and `y` is latitude. Longitudes are expected in the
/// -180..180 convention; use [`normalize_lon`] to compare against grids that
/// use 0..360.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Metropolitan region of Recife (Pernambuco, Brazil).
    pub fn recife() -> Self {
        Self::new(-35.0, -9.5, -34.5, -8.0)
    }

    /// Parse an extent string: "minlon,minlat,maxlon,maxlat"
    pub fn from_extent_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let parse = |p: &str| {
            p.parse::<f64>()
                .map_err(|_| BboxParseError::InvalidNumber(p.to_string()))
        };

        let bbox = Self::new(
            parse(parts[0])?,
            parse(parts[1])?,
            parse(parts[2])?,
            parse(parts[3])?,
        );

        if !bbox.is_valid() {
            return Err(BboxParseError::Degenerate(s.to_string()));
        }

        Ok(bbox)
    }

    /// Width of the bounding box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// A box is usable for rendering when both spans are positive and finite.
    pub fn is_valid(&self) -> bool {
        self.width().is_finite() && self.height().is_finite() && self.width() > 0.0 && self.height() > 0.0
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Map a geographic point to fractional pixel coordinates of a
    /// `width` x `height` raster covering this box, north up.
    pub fn to_pixel(&self, lon: f64, lat: f64, width: u32, height: u32) -> (f32, f32) {
        let px = (lon - self.min_x) / self.width() * width as f64;
        let py = (self.max_y - lat) / self.height() * height as f64;
        (px as f32, py as f32)
    }

    /// Geographic coordinate at the centre of pixel `(px, py)`.
    pub fn pixel_center(&self, px: u32, py: u32, width: u32, height: u32) -> (f64, f64) {
        let lon = self.min_x + (px as f64 + 0.5) / width as f64 * self.width();
        let lat = self.max_y - (py as f64 + 0.5) / height as f64 * self.height();
        (lon, lat)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::recife()
    }
}

/// Normalize a longitude into the -180..180 range.
pub fn normalize_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid maps 180 to -180; keep the eastern edge where it was
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid extent format: {0}. Expected 'minlon,minlat,maxlon,maxlat'")]
    InvalidFormat(String),

    #[error("Invalid number in extent: {0}")]
    InvalidNumber(String),

    #[error("Extent has no area: {0}")]
    Degenerate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extent() {
        let bbox = BoundingBox::from_extent_string("-35.0,-9.5,-34.5,-8.0").unwrap();
        assert_eq!(bbox, BoundingBox::recife());
    }

    #[test]
    fn test_normalize_lon() {
        assert_eq!(normalize_lon(325.0), -35.0);
        assert_eq!(normalize_lon(-35.0), -35.0);
        assert_eq!(normalize_lon(180.0), 180.0);
        assert_eq!(normalize_lon(0.0), 0.0);
        assert_eq!(normalize_lon(359.5), -0.5);
    }

    #[test]
    fn test_pixel_roundtrip_corners() {
        let bbox = BoundingBox::recife();
        let (px, py) = bbox.to_pixel(-35.0, -8.0, 100, 300);
        assert_eq!((px, py), (0.0, 0.0));
        let (px, py) = bbox.to_pixel(-34.5, -9.5, 100, 300);
        assert!((px - 100.0).abs() < 1e-3);
        assert!((py - 300.0).abs() < 1e-3);
    }
}
