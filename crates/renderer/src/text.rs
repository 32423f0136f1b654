//! Font loading and text drawing.
//!
//! DejaVu Sans is embedded so titles and labels are always drawn. A different
//! TrueType font can be given as an explicit path or through the
//! `CLIMATE_MAPS_FONT` environment variable.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use tracing::{debug, warn};

use crate::error::{RenderError, RenderResult};

/// Embedded font data - DejaVu Sans (covers the accented Portuguese titles)
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Environment variable naming a TrueType font file.
pub const FONT_ENV: &str = "CLIMATE_MAPS_FONT";

/// The embedded figure font.
pub fn embedded_font() -> RenderResult<Font<'static>> {
    Font::try_from_bytes(FONT_DATA)
        .ok_or_else(|| RenderError::Font("embedded font is not a TrueType font".to_string()))
}

/// Where to get the figure font.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FontSource {
    /// `CLIMATE_MAPS_FONT` when set and usable, else the embedded font.
    #[default]
    Auto,
    /// Only this file.
    Path(PathBuf),
    /// Render without text.
    Disabled,
}

impl FontSource {
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map(FontSource::Path).unwrap_or_default()
    }

    /// Resolve and load a font.
    ///
    /// `Path` fails if the file is unusable. `Auto` always yields a font; an
    /// unusable `CLIMATE_MAPS_FONT` is logged and the embedded font used.
    /// Only `Disabled` returns `None`.
    pub fn load(&self) -> RenderResult<Option<Font<'static>>> {
        match self {
            FontSource::Disabled => Ok(None),
            FontSource::Path(path) => load_font(path).map(Some),
            FontSource::Auto => {
                if let Some(path) = std::env::var_os(FONT_ENV).map(PathBuf::from) {
                    match load_font(&path) {
                        Ok(font) => return Ok(Some(font)),
                        Err(e) => warn!(
                            path = %path.display(),
                            error = %e,
                            "Ignoring {}, using the embedded font",
                            FONT_ENV
                        ),
                    }
                }
                embedded_font().map(Some)
            }
        }
    }
}

fn load_font(path: &Path) -> RenderResult<Font<'static>> {
    let bytes = std::fs::read(path)?;
    let font = Font::try_from_vec(bytes)
        .ok_or_else(|| RenderError::Font(format!("{} is not a TrueType font", path.display())))?;
    debug!(path = %path.display(), "Loaded font");
    Ok(font)
}

/// Horizontal placement relative to the anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Text drawing with an optional font; every call is a no-op without one.
pub struct TextPainter<'a> {
    font: Option<&'a Font<'static>>,
}

impl<'a> TextPainter<'a> {
    pub fn new(font: Option<&'a Font<'static>>) -> Self {
        Self { font }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Width and height in pixels, (0, 0) without a font.
    pub fn measure(&self, text: &str, size: f32) -> (i32, i32) {
        match self.font {
            Some(font) => text_size(Scale::uniform(size), font, text),
            None => (0, 0),
        }
    }

    /// Draw `text` with its top edge at `y`.
    pub fn draw(
        &self,
        img: &mut RgbaImage,
        text: &str,
        x: i32,
        y: i32,
        size: f32,
        align: Align,
        color: Rgba<u8>,
    ) {
        let Some(font) = self.font else {
            return;
        };
        let (w, _) = self.measure(text, size);
        let x = match align {
            Align::Left => x,
            Align::Center => x - w / 2,
            Align::Right => x - w,
        };
        draw_text_mut(img, color, x, y, Scale::uniform(size), font, text);
    }
}
