//! Precision mode selection for frame computation.
//!
//! At a coordinate of order 1, the f64 ulp is ≈ 2·10⁻¹⁶; once the view
//! width drops below ~10⁻¹³ the pixel spacing has lost more than three
//! digits and banding appears. An extended (double-double) kernel buys a
//! few more decades; past 10⁻¹⁷ only perturbation against a quad
//! reference orbit stays faithful.

use crate::{EngineError, QuadFloat};
use serde::{Deserialize, Serialize};

/// Widest view the plain f64 kernel renders without visible banding.
pub const DOUBLE_WIDTH_LIMIT: f64 = 1.0e-13;

/// Widest view the extended kernel handles; below this, perturbation.
pub const EXTENDED_WIDTH_LIMIT: f64 = 1.0e-17;

/// Arithmetic strategy for one frame. A closed set: the dispatcher is a
/// single match over it.
///
/// Discriminants are the wire codes callers see; 2 is reserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrecisionMode {
    Double = 0,
    Extended = 1,
    Perturbation = 3,
}

impl PrecisionMode {
    /// Numeric code for FFI-style callers.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Classify a view width already measured at quad precision.
    ///
    /// The comparison itself runs on the f64 cast: both thresholds sit
    /// well inside f64 range and the boundary is heuristic, not
    /// precision-critical. What matters is that the subtraction
    /// producing `w` happened in quad.
    pub fn classify_view_width(w: &QuadFloat) -> Self {
        let w = w.to_f64();
        if w > DOUBLE_WIDTH_LIMIT {
            PrecisionMode::Double
        } else if w > EXTENDED_WIDTH_LIMIT {
            PrecisionMode::Extended
        } else {
            PrecisionMode::Perturbation
        }
    }
}

/// Classify a frame without computing it, so callers can budget
/// iterations ahead of time.
///
/// `_width` (the pixel count) is accepted for call-compatibility with
/// `compute` but does not influence the classification.
pub fn choose_precision_mode(
    xmin: &str,
    xmax: &str,
    _width: u32,
) -> Result<PrecisionMode, EngineError> {
    let xmin = QuadFloat::from_string(xmin).map_err(EngineError::InvalidRegion)?;
    let xmax = QuadFloat::from_string(xmax).map_err(EngineError::InvalidRegion)?;
    let w = xmax.sub(&xmin);
    if !w.is_positive() {
        return Err(EngineError::InvalidRegion(
            "xmax must be greater than xmin".to_string(),
        ));
    }
    Ok(PrecisionMode::classify_view_width(&w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shallow_view_selects_double() {
        let mode = choose_precision_mode("-2.0", "1.0", 800).unwrap();
        assert_eq!(mode, PrecisionMode::Double);
        assert_eq!(mode.code(), 0);
    }

    #[test]
    fn mid_depth_view_selects_extended() {
        // Width 1e-15 sits between the two thresholds.
        let mode = choose_precision_mode("0.25", "0.250000000000001", 800).unwrap();
        assert_eq!(mode, PrecisionMode::Extended);
        assert_eq!(mode.code(), 1);
    }

    #[test]
    fn deep_view_selects_perturbation() {
        let mode = choose_precision_mode(
            "-0.743643887037151000005",
            "-0.743643887037150999995",
            800,
        )
        .unwrap();
        assert_eq!(mode, PrecisionMode::Perturbation);
        assert_eq!(mode.code(), 3);
    }

    #[test]
    fn width_exactly_at_double_limit_is_extended() {
        // The double range is an open bound: w must exceed 1e-13.
        let w = QuadFloat::from_f64(DOUBLE_WIDTH_LIMIT);
        assert_eq!(
            PrecisionMode::classify_view_width(&w),
            PrecisionMode::Extended
        );
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(choose_precision_mode("1.0", "-2.0", 800).is_err());
    }

    #[test]
    fn malformed_bound_is_rejected() {
        assert!(choose_precision_mode("abc", "1.0", 800).is_err());
    }
}
