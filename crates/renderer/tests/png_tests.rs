//! PNG output decoded back with the `image` crate.

use image::{Rgba, RgbaImage};
use renderer::{encode_png, render_map, MapSpec};
use test_utils::{seasonal_dataset, VARIABLE};

#[test]
fn test_encoded_png_decodes_to_same_pixels() {
    let mut img = RgbaImage::new(7, 5);
    for (x, y, px) in img.enumerate_pixels_mut() {
        *px = Rgba([(x * 30) as u8, (y * 50) as u8, 200, if x == 0 { 0 } else { 255 }]);
    }
    let png = encode_png(&img).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded, img);
}

#[test]
fn test_figure_png_carries_title() {
    let slice = seasonal_dataset().slice_time(VARIABLE, 0).unwrap();
    let spec = MapSpec {
        title: vec![
            "Temperatura Máxima - 2010 (Janeiro) [°C]".to_string(),
            "Fonte: NASA GISS Climate Model".to_string(),
        ],
        ..Default::default()
    };
    let figure = render_map(&slice, &spec, None).unwrap();
    let png = figure.to_png().unwrap();

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (spec.width, spec.height));

    let needle = b"Fonte: NASA GISS Climate Model";
    assert!(png.windows(needle.len()).any(|w| w == needle));
}
