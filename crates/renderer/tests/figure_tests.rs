//! Map figures rendered from synthetic fields.

use climate_common::{BoundingBox, SpatialField};
use image::Rgba;
use renderer::{render_map, Coastline, Colormap, FontSource, MapSpec, ValueRange};
use test_utils::{all_missing_dataset, fixtures::grid, seasonal_dataset, VARIABLE};

fn no_coast() -> MapSpec {
    MapSpec {
        coastline: None,
        ..Default::default()
    }
}

fn panel_center(figure: &renderer::MapFigure) -> (u32, u32) {
    let p = figure.panel;
    (
        (p.left() + p.width() as i32 / 2) as u32,
        (p.top() + p.height() as i32 / 2) as u32,
    )
}

#[test]
fn test_colour_range_comes_from_the_slice() {
    let ds = seasonal_dataset();
    let slice = ds.slice_time(VARIABLE, 0).unwrap();
    let figure = render_map(&slice, &no_coast(), None).unwrap();

    let (lo, hi) = slice.finite_range().unwrap();
    assert_eq!(figure.range, Some(ValueRange::new(lo, hi)));
}

#[test]
fn test_panel_is_fully_covered_by_fine_grid() {
    let slice = seasonal_dataset().slice_time(VARIABLE, 3).unwrap();
    let figure = render_map(&slice, &no_coast(), None).unwrap();
    let p = figure.panel;

    // Interior of the panel (inside the frame) holds colormap colours only
    for y in (p.top() + 2)..(p.bottom() - 1) {
        for x in (p.left() + 2)..(p.right() - 1) {
            let px = figure.image.get_pixel(x as u32, y as u32);
            assert_ne!(*px, Rgba([255, 255, 255, 255]), "uncovered pixel at {},{}", x, y);
        }
    }
}

#[test]
fn test_descending_latitude_renders_north_up() {
    let ascending =
        SpatialField::new(vec![-9.25, -8.75, -8.25], vec![-34.75], vec![20.0, 25.0, 30.0]).unwrap();
    let descending =
        SpatialField::new(vec![-8.25, -8.75, -9.25], vec![-34.75], vec![30.0, 25.0, 20.0]).unwrap();

    let a = render_map(&ascending, &no_coast(), None).unwrap();
    let b = render_map(&descending, &no_coast(), None).unwrap();
    assert_eq!(a.image, b.image);

    // North (top of the panel) is the hot end of YlOrRd
    let p = a.panel;
    let x = (p.left() + p.width() as i32 / 2) as u32;
    let top = a.image.get_pixel(x, (p.top() + 5) as u32);
    let bottom = a.image.get_pixel(x, (p.bottom() - 5) as u32);
    assert!(top.0[1] < bottom.0[1]);
}

#[test]
fn test_giss_grid_on_0_360_longitudes() {
    let values = (0..9).map(|i| 25.0 + i as f32).collect();
    let field = SpatialField::new(grid::GISS_LAT.to_vec(), grid::GISS_LON.to_vec(), values).unwrap();
    let figure = render_map(&field, &no_coast(), None).unwrap();

    let (x, y) = panel_center(&figure);
    assert_ne!(*figure.image.get_pixel(x, y), Rgba([255, 255, 255, 255]));
}

#[test]
fn test_field_outside_extent_leaves_panel_blank() {
    let field = SpatialField::new(vec![40.0, 41.0], vec![10.0, 11.0], vec![1.0; 4]).unwrap();
    let figure = render_map(&field, &no_coast(), None).unwrap();
    let (x, y) = panel_center(&figure);
    assert_eq!(*figure.image.get_pixel(x, y), Rgba([255, 255, 255, 255]));
}

#[test]
fn test_all_missing_slice_renders_without_range() {
    let slice = all_missing_dataset().slice_time(VARIABLE, 0).unwrap();
    let figure = render_map(&slice, &MapSpec::default(), None).unwrap();
    assert!(figure.range.is_none());
}

#[test]
fn test_coastline_changes_the_image() {
    let slice = seasonal_dataset().slice_time(VARIABLE, 0).unwrap();
    let plain = render_map(&slice, &no_coast(), None).unwrap();
    let coast = render_map(
        &slice,
        &MapSpec {
            coastline: Some(Coastline::recife()),
            ..Default::default()
        },
        None,
    )
    .unwrap();
    assert_ne!(plain.image, coast.image);
}

#[test]
fn test_custom_extent_and_palette() {
    let slice = seasonal_dataset().slice_time(VARIABLE, 0).unwrap();
    let spec = MapSpec {
        extent: BoundingBox::new(-35.0, -9.0, -34.0, -8.0),
        colormap: Colormap::named("Reds").unwrap(),
        coastline: None,
        width: 500,
        height: 400,
        ..Default::default()
    };
    let figure = render_map(&slice, &spec, None).unwrap();
    assert_eq!(figure.image.dimensions(), (500, 400));
    // Square extent gives a square panel
    assert!((figure.panel.width() as i32 - figure.panel.height() as i32).abs() <= 1);
}

#[test]
fn test_default_font_draws_the_title() {
    let slice = seasonal_dataset().slice_time(VARIABLE, 0).unwrap();
    let spec = MapSpec {
        title: vec![
            "Temperatura Máxima - 2010 (Janeiro) [°C]".to_string(),
            "Fonte: NASA GISS Climate Model".to_string(),
        ],
        ..no_coast()
    };
    let font = FontSource::default().load().unwrap();
    assert!(font.is_some());
    let figure = render_map(&slice, &spec, font.as_ref()).unwrap();

    // Everything above the panel is title area
    let top = figure.panel.top() as u32;
    assert!(top > 0);
    let inked = (0..top)
        .flat_map(|y| (0..figure.image.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| figure.image.get_pixel(x, y).0[0] < 128)
        .count();
    assert!(inked > 50, "only {} title pixels", inked);
}
