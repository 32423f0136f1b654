//! Vertical colour bar with tick labels.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::colormap::Colormap;
use crate::gradient::ValueRange;
use crate::text::{Align, TextPainter};

const TICK_LENGTH: i32 = 5;

/// "Nice" tick values (multiples of 1, 2, 2.5 or 5 times a power of ten)
/// inside `[min, max]`, at most about `max_ticks` of them.
pub fn nice_ticks(min: f64, max: f64, max_ticks: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max < min {
        return Vec::new();
    }
    if max - min < 1e-9 || max_ticks < 2 {
        return vec![min];
    }

    let step = nice_step((max - min) / (max_ticks - 1) as f64);
    let first = (min / step).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 2.5 {
        2.5
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Format a tick with as many decimals as the spacing needs (up to 3).
pub fn format_tick(value: f64, ticks: &[f64]) -> String {
    let step = match ticks {
        [a, b, ..] => (b - a).abs(),
        _ => value.abs().max(1.0),
    };
    let decimals = (0..=3)
        .find(|&d| {
            let scaled = step * 10f64.powi(d);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(3) as usize;
    let text = format!("{:.*}", decimals, value);
    // Avoid "-0"
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        text.trim_start_matches('-').to_string()
    } else {
        text
    }
}

/// Placement and content of a colour bar.
#[derive(Debug, Clone)]
pub struct Colorbar<'a> {
    pub cmap: &'a Colormap,
    /// `None` draws an empty bar (no valid data).
    pub range: Option<ValueRange>,
    pub label: Option<&'a str>,
    pub font_size: f32,
}

impl Colorbar<'_> {
    /// Draw into `rect`; ticks, tick labels and the rotated label go to the
    /// right of the bar.
    pub fn draw(&self, img: &mut RgbaImage, rect: Rect, painter: &TextPainter<'_>) {
        let black = Rgba([0, 0, 0, 255]);
        let (x, y) = (rect.left(), rect.top());
        let (w, h) = (rect.width() as i32, rect.height() as i32);

        match self.range {
            Some(range) => {
                for dy in 0..h {
                    let t = 1.0 - (dy as f32 + 0.5) / h as f32;
                    let color = self.cmap.sample(t).into();
                    draw_filled_rect_mut(img, Rect::at(x, y + dy).of_size(w as u32, 1), color);
                }

                let ticks = nice_ticks(range.min as f64, range.max as f64, 6);
                let mut widest = 0;
                for &tick in &ticks {
                    let t = range.normalize(tick as f32);
                    let ty = y + ((1.0 - t) * (h - 1) as f32).round() as i32;
                    let x0 = (x + w) as f32;
                    draw_line_segment_mut(
                        img,
                        (x0, ty as f32),
                        (x0 + TICK_LENGTH as f32, ty as f32),
                        black,
                    );

                    let text = format_tick(tick, &ticks);
                    let (tw, th) = painter.measure(&text, self.font_size);
                    widest = widest.max(tw);
                    painter.draw(
                        img,
                        &text,
                        x + w + TICK_LENGTH + 3,
                        ty - th / 2,
                        self.font_size,
                        Align::Left,
                        black,
                    );
                }

                if let Some(label) = self.label {
                    let label_x = x + w + TICK_LENGTH + 3 + widest + 6;
                    draw_rotated_label(img, label, label_x, y, h, self.font_size, painter);
                }
            }
            None => {
                draw_filled_rect_mut(
                    img,
                    Rect::at(x, y).of_size(w as u32, h as u32),
                    self.cmap.missing.into(),
                );
            }
        }

        draw_hollow_rect_mut(img, rect, black);
    }
}

/// Label reading bottom to top, centred on the bar height.
fn draw_rotated_label(
    img: &mut RgbaImage,
    label: &str,
    x: i32,
    bar_top: i32,
    bar_height: i32,
    size: f32,
    painter: &TextPainter<'_>,
) {
    let (tw, th) = painter.measure(label, size);
    if tw <= 0 || th <= 0 {
        return;
    }
    let mut strip = RgbaImage::new(tw as u32 + 2, th as u32 + 4);
    painter.draw(&mut strip, label, 1, 2, size, Align::Left, Rgba([0, 0, 0, 255]));
    let rotated = image::imageops::rotate270(&strip);
    let top = bar_top + (bar_height - rotated.height() as i32) / 2;
    image::imageops::overlay(img, &rotated, x as i64, top as i64);
}
