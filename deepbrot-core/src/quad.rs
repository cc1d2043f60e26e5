//! Fixed 128-bit ("quad") precision real arithmetic.
//!
//! Coordinate strings carry up to ~36 significant digits, far beyond f64.
//! All region parsing and reference-orbit math runs at this precision;
//! everything per-pixel runs in f64 (or double-double) derived from it.

use dashu_base::Approximation;
use dashu_float::{DBig, FBig};
use serde::{Deserialize, Serialize};

/// Mantissa bits carried by every [`QuadFloat`].
pub const QUAD_PRECISION_BITS: usize = 128;

/// A real number held at 128 binary digits of precision.
///
/// Precision is a crate-wide constant rather than a per-value field:
/// the engine never needs more than quad for its reference math, and a
/// uniform precision keeps arithmetic results predictable.
#[derive(Clone, Debug)]
pub struct QuadFloat {
    value: FBig,
}

impl QuadFloat {
    /// Create from f64. Exact: every finite f64 fits in 128 bits.
    pub fn from_f64(val: f64) -> Self {
        let value = if val == 0.0 {
            FBig::ZERO.with_precision(QUAD_PRECISION_BITS).unwrap()
        } else {
            FBig::try_from(val)
                .unwrap()
                .with_precision(QUAD_PRECISION_BITS)
                .unwrap()
        };
        Self { value }
    }

    /// Zero at quad precision.
    pub fn zero() -> Self {
        Self::from_f64(0.0)
    }

    /// Parse a decimal string (plain or scientific notation).
    ///
    /// The decimal is parsed exactly, then converted to binary with the
    /// target precision in one step, so no digits are lost to an
    /// intermediate f64.
    pub fn from_string(val: &str) -> Result<Self, String> {
        let dbig = val
            .parse::<DBig>()
            .map_err(|e| format!("failed to parse decimal '{}': {}", val, e))?;
        let fbig_halfaway = match dbig.with_base_and_precision::<2>(QUAD_PRECISION_BITS) {
            Approximation::Exact(v) => v,
            Approximation::Inexact(v, _) => v,
        };
        let value = fbig_halfaway.with_rounding::<dashu_float::round::mode::Zero>();
        Ok(Self { value })
    }

    /// Nearest f64. Loses the low ~75 bits.
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().value()
    }

    pub fn add(&self, other: &Self) -> Self {
        Self {
            value: &self.value + &other.value,
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self {
            value: &self.value - &other.value,
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self {
            value: &self.value * &other.value,
        }
    }

    pub fn div(&self, other: &Self) -> Self {
        Self {
            value: &self.value / &other.value,
        }
    }

    /// Midpoint of two values, computed at quad precision.
    pub fn midpoint(&self, other: &Self) -> Self {
        self.add(other).div(&Self::from_f64(2.0))
    }

    pub fn is_positive(&self) -> bool {
        self.value > FBig::<dashu_float::round::mode::Zero>::ZERO
    }

    /// Split into leading + residual f64 words for the extended kernel.
    pub fn to_extended(&self) -> crate::ExtendedFloat {
        let hi = self.to_f64();
        if !hi.is_finite() {
            return crate::ExtendedFloat::from_f64(hi);
        }
        let lo = self.sub(&Self::from_f64(hi)).to_f64();
        crate::ExtendedFloat::from_parts(hi, lo)
    }
}

impl PartialEq for QuadFloat {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for QuadFloat {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl std::fmt::Display for QuadFloat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Serialize, Deserialize)]
struct QuadFloatSerde {
    value: String,
}

impl Serialize for QuadFloat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        QuadFloatSerde {
            value: self.value.to_string(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for QuadFloat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let serde = QuadFloatSerde::deserialize(deserializer)?;
        QuadFloat::from_string(&serde.value).map_err(serde::de::Error::custom)
    }
}
