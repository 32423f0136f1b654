//! Tests for BoundingBox parsing and geometry.

use climate_common::bbox::{normalize_lon, BboxParseError, BoundingBox};

// ============================================================================
// from_extent_string tests
// ============================================================================

#[test]
fn test_parse_extent_with_spaces() {
    let bbox = BoundingBox::from_extent_string(" -35 , -9.5, -34.5 ,-8 ").unwrap();
    assert_eq!(bbox.min_x, -35.0);
    assert_eq!(bbox.min_y, -9.5);
    assert_eq!(bbox.max_x, -34.5);
    assert_eq!(bbox.max_y, -8.0);
}

#[test]
fn test_parse_extent_wrong_arity() {
    let err = BoundingBox::from_extent_string("-35,-9.5,-34.5").unwrap_err();
    assert!(matches!(err, BboxParseError::InvalidFormat(_)));
}

#[test]
fn test_parse_extent_bad_number() {
    let err = BoundingBox::from_extent_string("-35,south,-34.5,-8").unwrap_err();
    assert!(matches!(err, BboxParseError::InvalidNumber(s) if s == "south"));
}

#[test]
fn test_parse_extent_inverted() {
    let err = BoundingBox::from_extent_string("-34.5,-8,-35,-9.5").unwrap_err();
    assert!(matches!(err, BboxParseError::Degenerate(_)));
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_recife_dimensions() {
    let bbox = BoundingBox::recife();
    assert!((bbox.width() - 0.5).abs() < 1e-12);
    assert!((bbox.height() - 1.5).abs() < 1e-12);
    assert!(bbox.is_valid());
    assert!(bbox.contains_point(-34.9, -8.05));
    assert!(!bbox.contains_point(-34.4, -8.05));
}

#[test]
fn test_pixel_center_is_inside() {
    let bbox = BoundingBox::recife();
    let (lon, lat) = bbox.pixel_center(0, 0, 50, 150);
    assert!(bbox.contains_point(lon, lat));
    assert!((lon - (-34.995)).abs() < 1e-9);
    assert!((lat - (-8.005)).abs() < 1e-9);
}

#[test]
fn test_normalize_negative_wrap() {
    assert_eq!(normalize_lon(-190.0), 170.0);
    assert_eq!(normalize_lon(540.0), 180.0);
}
