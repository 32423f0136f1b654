//! Common test fixtures for climate-maps tests.

/// Bounding boxes as (min_lon, min_lat, max_lon, max_lat).
pub mod bbox {
    /// Metropolitan region of Recife
    pub const RECIFE: (f64, f64, f64, f64) = (-35.0, -9.5, -34.5, -8.0);

    /// Pernambuco coast, a wider box around Recife
    pub const PERNAMBUCO_COAST: (f64, f64, f64, f64) = (-36.0, -10.0, -34.0, -7.0);
}

/// Grid axes around Recife.
pub mod grid {
    /// GISS-E2-1-G (2° x 2.5°) latitude centres bracketing Recife
    pub const GISS_LAT: [f64; 3] = [-11.0, -9.0, -7.0];

    /// GISS-E2-1-G longitude centres bracketing Recife, 0..360 convention
    pub const GISS_LON: [f64; 3] = [321.25, 323.75, 326.25];

    /// A fine 0.25° grid over the Recife box, -180..180 convention
    pub fn fine_lat() -> Vec<f64> {
        (0..7).map(|i| -9.625 + i as f64 * 0.25).collect()
    }

    pub fn fine_lon() -> Vec<f64> {
        (0..3).map(|i| -34.875 + i as f64 * 0.25).collect()
    }
}

/// CF time units used by the fixtures.
pub mod time {
    pub const DAYS_SINCE_2010: &str = "days since 2010-01-01 00:00:00";

    /// Mid-month offsets of a 365-day year
    pub const MID_MONTH_DAYS: [f64; 12] = [
        15.5, 45.0, 74.5, 105.0, 135.5, 166.0, 196.5, 227.5, 258.0, 288.5, 319.0, 349.5,
    ];
}
