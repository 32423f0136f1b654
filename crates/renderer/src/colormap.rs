//! Sequential colormaps for temperature maps.

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> RenderResult<Self> {
        hex_to_rgb(hex)
            .map(|(r, g, b)| Self::rgb(r, g, b))
            .ok_or_else(|| RenderError::InvalidColor(hex.to_string()))
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

/// ColorBrewer YlOrRd, 9 classes (yellow → orange → red)
const YL_OR_RD: [&str; 9] = [
    "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#bd0026",
    "#800026",
];

/// ColorBrewer OrRd, 9 classes
const OR_RD: [&str; 9] = [
    "#fff7ec", "#fee8c8", "#fdd49e", "#fdbb84", "#fc8d59", "#ef6548", "#d7301f", "#b30000",
    "#7f0000",
];

/// ColorBrewer Reds, 9 classes
const REDS: [&str; 9] = [
    "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d", "#a50f15",
    "#67000d",
];

/// A continuous colormap built from evenly spaced color stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    stops: Vec<Color>,
    /// Color for missing cells
    pub missing: Color,
}

impl Colormap {
    /// Build from evenly spaced stops; at least two are required.
    pub fn new(name: impl Into<String>, stops: Vec<Color>) -> RenderResult<Self> {
        let name = name.into();
        if stops.len() < 2 {
            return Err(RenderError::UnknownColormap(format!(
                "{} needs at least two color stops",
                name
            )));
        }
        Ok(Self {
            name,
            stops,
            missing: Color::transparent(),
        })
    }

    /// Build from `#rrggbb` strings.
    pub fn from_hex<S: AsRef<str>>(name: impl Into<String>, hex: &[S]) -> RenderResult<Self> {
        let stops = hex
            .iter()
            .map(|h| Color::from_hex(h.as_ref()))
            .collect::<RenderResult<Vec<_>>>()?;
        Self::new(name, stops)
    }

    /// Look up a built-in colormap by its matplotlib name (case-insensitive).
    pub fn named(name: &str) -> RenderResult<Self> {
        let (canonical, stops): (&str, &[&str]) = match name.to_ascii_lowercase().as_str() {
            "ylorrd" => ("YlOrRd", &YL_OR_RD),
            "orrd" => ("OrRd", &OR_RD),
            "reds" => ("Reds", &REDS),
            _ => return Err(RenderError::UnknownColormap(name.to_string())),
        };
        Self::from_hex(canonical, stops)
    }

    /// The warm sequential palette used for maximum temperature.
    pub fn yl_or_rd() -> Self {
        Self::stops_unchecked("YlOrRd", &YL_OR_RD)
    }

    fn stops_unchecked(name: &str, hex: &[&str]) -> Self {
        let stops = hex
            .iter()
            .filter_map(|h| hex_to_rgb(h))
            .map(|(r, g, b)| Color::rgb(r, g, b))
            .collect();
        Self {
            name: name.to_string(),
            stops,
            missing: Color::transparent(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color at normalized position `t` in `[0, 1]` (clamped).
    pub fn sample(&self, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = (self.stops.len() - 1) as f32;
        let scaled = t * segments;
        let idx = (scaled.floor() as usize).min(self.stops.len() - 2);
        interpolate_color(self.stops[idx], self.stops[idx + 1], scaled - idx as f32)
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self::yl_or_rd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#ffffcc"), Some((255, 255, 204)));
        assert_eq!(hex_to_rgb("800026"), Some((128, 0, 38)));
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("#gggggg"), None);
    }

    #[test]
    fn test_yl_or_rd_endpoints() {
        let cmap = Colormap::yl_or_rd();
        assert_eq!(cmap.sample(0.0), Color::rgb(255, 255, 204));
        assert_eq!(cmap.sample(1.0), Color::rgb(128, 0, 38));
        // clamped
        assert_eq!(cmap.sample(-3.0), cmap.sample(0.0));
        assert_eq!(cmap.sample(7.0), cmap.sample(1.0));
    }

    #[test]
    fn test_yl_or_rd_gets_redder() {
        let cmap = Colormap::yl_or_rd();
        let greens: Vec<u8> = (0..=10).map(|i| cmap.sample(i as f32 / 10.0).g).collect();
        assert!(greens.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_named_lookup() {
        assert_eq!(Colormap::named("ylorrd").unwrap(), Colormap::named("YlOrRd").unwrap());
        assert!(Colormap::named("Reds").is_ok());
        assert!(matches!(
            Colormap::named("jet"),
            Err(RenderError::UnknownColormap(_))
        ));
    }

    #[test]
    fn test_single_stop_rejected() {
        assert!(Colormap::from_hex("one", &["#ffffff"]).is_err());
    }

    #[test]
    fn test_interpolate_midpoint() {
        let c = interpolate_color(Color::rgb(0, 0, 0), Color::rgb(255, 255, 255), 0.5);
        assert_eq!(c, Color::rgb(128, 128, 128));
    }
}
