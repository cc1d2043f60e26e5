//! Extended-precision scalar arithmetic as an unevaluated f64 pair.
//!
//! The value is hi + lo with |lo| ≤ ½ ulp(hi), giving ~106 mantissa bits.
//! This stands in for the x87 80-bit format the engine's extended kernel
//! calls for; Rust has no native 80-bit float, and an error-free pair is
//! the portable equivalent with a wider mantissa.

/// Double-double real: value = hi + lo.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExtendedFloat {
    pub hi: f64,
    pub lo: f64,
}

/// Exact sum: returns (s, err) with a + b = s + err.
#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

/// Exact sum assuming |a| >= |b|.
#[inline]
fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let err = b - (s - a);
    (s, err)
}

/// Exact product via FMA: returns (p, err) with a * b = p + err.
#[inline]
fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let err = a.mul_add(b, -p);
    (p, err)
}

impl ExtendedFloat {
    pub const ZERO: Self = Self { hi: 0.0, lo: 0.0 };

    #[inline]
    pub fn from_f64(val: f64) -> Self {
        Self { hi: val, lo: 0.0 }
    }

    /// Reconstruct from an explicit hi/lo pair (e.g. a quad value split
    /// into leading and residual f64 parts).
    #[inline]
    pub fn from_parts(hi: f64, lo: f64) -> Self {
        let (s, e) = quick_two_sum(hi, lo);
        Self { hi: s, lo: e }
    }

    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.hi + self.lo
    }

    #[inline]
    pub fn add(&self, other: &Self) -> Self {
        let (s, e) = two_sum(self.hi, other.hi);
        let e = e + self.lo + other.lo;
        let (hi, lo) = quick_two_sum(s, e);
        Self { hi, lo }
    }

    #[inline]
    pub fn sub(&self, other: &Self) -> Self {
        let (s, e) = two_sum(self.hi, -other.hi);
        let e = e + self.lo - other.lo;
        let (hi, lo) = quick_two_sum(s, e);
        Self { hi, lo }
    }

    #[inline]
    pub fn mul(&self, other: &Self) -> Self {
        let (p, e) = two_prod(self.hi, other.hi);
        let e = e + self.hi * other.lo + self.lo * other.hi;
        let (hi, lo) = quick_two_sum(p, e);
        Self { hi, lo }
    }

    /// Scale by a plain f64 (used for pixel-index × step products).
    #[inline]
    pub fn mul_f64(&self, rhs: f64) -> Self {
        let (p, e) = two_prod(self.hi, rhs);
        let e = e + self.lo * rhs;
        let (hi, lo) = quick_two_sum(p, e);
        Self { hi, lo }
    }

    /// Compare against a plain f64 threshold.
    #[inline]
    pub fn gt_f64(&self, rhs: f64) -> bool {
        self.hi > rhs || (self.hi == rhs && self.lo > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_sub_ulp_residue() {
        // 1 + 2^-80 is unrepresentable in f64 but exact in double-double.
        let tiny = 2.0_f64.powi(-80);
        let sum = ExtendedFloat::from_f64(1.0).add(&ExtendedFloat::from_f64(tiny));
        assert_eq!(sum.hi, 1.0);
        assert_eq!(sum.lo, tiny);
    }

    #[test]
    fn sub_recovers_cancelled_digits() {
        let a = ExtendedFloat::from_parts(1.0, 2.0_f64.powi(-70));
        let b = ExtendedFloat::from_f64(1.0);
        let diff = a.sub(&b);
        assert_eq!(diff.to_f64(), 2.0_f64.powi(-70));
    }

    #[test]
    fn mul_captures_rounding_error() {
        // (1 + 2^-40)^2 = 1 + 2^-39 + 2^-80; the last term is below
        // f64 resolution relative to 1 but survives in the pair.
        let x = ExtendedFloat::from_f64(1.0 + 2.0_f64.powi(-40));
        let sq = x.mul(&x);
        let expect_hi = 1.0 + 2.0_f64.powi(-39);
        assert_eq!(sq.hi, expect_hi);
        assert_eq!(sq.lo, 2.0_f64.powi(-80));
    }

    #[test]
    fn mul_f64_matches_full_mul() {
        let a = ExtendedFloat::from_parts(0.1, 1e-18);
        let full = a.mul(&ExtendedFloat::from_f64(3.0));
        let fast = a.mul_f64(3.0);
        assert_eq!(full, fast);
    }

    #[test]
    fn gt_f64_uses_low_word_on_ties() {
        let just_above = ExtendedFloat::from_parts(256.0, 1e-20);
        let exactly = ExtendedFloat::from_f64(256.0);
        assert!(just_above.gt_f64(256.0));
        assert!(!exactly.gt_f64(256.0));
    }
}
