//! CF-convention value decoding: packing and missing-value sentinels.

use climate_common::UnitTransform;

/// Magnitudes at or above this are treated as missing regardless of attributes.
const IMPLAUSIBLE_MAGNITUDE: f64 = 1e30;

/// Packing and missing-value attributes of one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct CfPacking {
    pub scale_factor: f64,
    pub add_offset: f64,
    /// `_FillValue` and `missing_value` entries, in raw (packed) units
    pub missing: Vec<f64>,
}

impl Default for CfPacking {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            add_offset: 0.0,
            missing: Vec::new(),
        }
    }
}

impl CfPacking {
    /// Whether a raw value is a missing-value sentinel.
    pub fn is_missing(&self, raw: f32) -> bool {
        if !raw.is_finite() {
            return true;
        }
        let raw = raw as f64;
        if raw.abs() >= IMPLAUSIBLE_MAGNITUDE {
            return true;
        }
        // Sentinels such as 1e20 do not survive the round trip through f32 exactly
        self.missing
            .iter()
            .any(|&m| raw == m || (raw - m).abs() <= m.abs() * 1e-6)
    }

    /// The unpacking step as a transform (identity when unpacked).
    pub fn transform(&self) -> UnitTransform {
        if self.scale_factor == 1.0 && self.add_offset == 0.0 {
            UnitTransform::None
        } else {
            UnitTransform::Linear {
                scale: self.scale_factor as f32,
                offset: self.add_offset as f32,
            }
        }
    }

    /// Decode raw values: sentinels become `NaN`, then packing and `units`
    /// conversion are applied in that order.
    pub fn decode(&self, raw: &[f32], units: UnitTransform) -> Vec<f32> {
        let unpack = self.transform();
        raw.iter()
            .map(|&v| {
                if self.is_missing(v) {
                    f32::NAN
                } else {
                    units.apply(unpack.apply(v))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_common::units::KELVIN_OFFSET;

    #[test]
    fn test_cmip_fill_value_detected() {
        let packing = CfPacking {
            missing: vec![1e20],
            ..Default::default()
        };
        assert!(packing.is_missing(1e20_f32));
        assert!(!packing.is_missing(300.0));
    }

    #[test]
    fn test_nan_and_huge_values_missing() {
        let packing = CfPacking::default();
        assert!(packing.is_missing(f32::NAN));
        assert!(packing.is_missing(f32::INFINITY));
        assert!(packing.is_missing(9.96921e36));
    }

    #[test]
    fn test_decode_packed_kelvin() {
        let packing = CfPacking {
            scale_factor: 0.01,
            add_offset: 273.15,
            missing: vec![-32767.0],
        };
        let out = packing.decode(&[2700.0, -32767.0], UnitTransform::Subtract(KELVIN_OFFSET));
        assert!((out[0] - 27.0).abs() < 1e-3);
        assert!(out[1].is_nan());
    }
}
