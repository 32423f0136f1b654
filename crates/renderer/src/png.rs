//! PNG encoding for rendered figures.
//!
//! Figures are written as 8-bit RGBA (color type 6) with optional `tEXt`
//! chunks carrying the title and data source.

use std::io::Write;

use image::RgbaImage;

use crate::error::{RenderError, RenderResult};

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Encode `img` as PNG.
pub fn encode_png(img: &RgbaImage) -> RenderResult<Vec<u8>> {
    encode_png_with_text(img, &[])
}

/// Encode `img` as PNG, adding one `tEXt` chunk per `(keyword, text)` pair.
///
/// Keywords must be 1-79 Latin-1 characters; text is stored as Latin-1 with
/// unrepresentable characters replaced by `?`.
pub fn encode_png_with_text(img: &RgbaImage, text: &[(&str, &str)]) -> RenderResult<Vec<u8>> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidSize {
            width,
            height,
            message: "cannot encode an empty image".to_string(),
        });
    }

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(6); // RGBA
    ihdr.push(0); // deflate
    ihdr.push(0); // adaptive filtering
    ihdr.push(0); // no interlace
    write_chunk(&mut png, b"IHDR", &ihdr);

    for (keyword, value) in text {
        write_chunk(&mut png, b"tEXt", &text_chunk(keyword, value)?);
    }

    let idat = deflate_scanlines(img.as_raw(), width as usize, height as usize)
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat);

    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn text_chunk(keyword: &str, value: &str) -> RenderResult<Vec<u8>> {
    let key = latin1(keyword);
    if key.is_empty() || key.len() > 79 || key.contains(&0) {
        return Err(RenderError::Encode(format!("invalid tEXt keyword '{}'", keyword)));
    }
    let mut data = key;
    data.push(0);
    data.extend(latin1(value).into_iter().filter(|&b| b != 0));
    Ok(data)
}

fn latin1(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Filter and deflate RGBA scanlines for the IDAT chunk.
///
/// Rows use the Sub filter: figures are dominated by flat colour runs, which
/// Sub turns into zeros.
fn deflate_scanlines(pixels: &[u8], width: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let stride = width * 4;
    let mut filtered = Vec::with_capacity(height * (1 + stride));
    for row in pixels.chunks_exact(stride).take(height) {
        filtered.push(1); // Sub
        filtered.extend_from_slice(&row[..4]);
        for i in 4..stride {
            filtered.push(row[i].wrapping_sub(row[i - 4]));
        }
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&filtered)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_signature_and_ihdr() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[..8], &SIGNATURE);
        assert_eq!(&png[12..16], b"IHDR");
        assert_eq!(u32::from_be_bytes([png[16], png[17], png[18], png[19]]), 3);
        assert_eq!(u32::from_be_bytes([png[20], png[21], png[22], png[23]]), 2);
        assert_eq!(&png[png.len() - 8..png.len() - 4], b"IEND");
    }

    #[test]
    fn test_text_chunk_latin1() {
        let data = text_chunk("Title", "Temperatura Máxima").unwrap();
        assert_eq!(&data[..6], b"Title\0");
        // á is 0xE1 in Latin-1
        assert!(data.contains(&0xE1));
    }

    #[test]
    fn test_bad_keyword_rejected() {
        assert!(text_chunk("", "x").is_err());
        assert!(text_chunk(&"k".repeat(80), "x").is_err());
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = RgbaImage::new(0, 0);
        assert!(matches!(encode_png(&img), Err(RenderError::InvalidSize { .. })));
    }
}
