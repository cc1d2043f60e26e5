//! Linear (series) approximation over the reference orbit.
//!
//! While the quadratic term of the perturbation recurrence is
//! negligible, δ_n ≈ B_n·δc with B₀ = 0 and B_{n+1} = 2·X_n·B_n + 1.
//! Every pixel can then start at `skip_iter` with its delta seeded from
//! a single complex multiply instead of iterating from zero.

use crate::reference::ReferenceOrbit;

/// Validity cutoff for |B_n|·r_view. Conservative on purpose: it keeps
/// the dropped δ² term well below f64 ulp at the magnitudes involved.
pub const APPROX_THRESHOLD: f64 = 1.0e-12;

/// Series coefficient and the iteration count it lets pixels skip.
#[derive(Clone, Copy, Debug)]
pub struct SeriesApproximation {
    pub b_re: f64,
    pub b_im: f64,
    /// Largest start iteration the approximation covers; always below
    /// the orbit's `ref_iter`.
    pub skip_iter: u32,
}

impl SeriesApproximation {
    /// Walk the coefficient recurrence until |B|·r_view crosses the
    /// threshold. `r_view` is the half-diagonal of the view in delta
    /// space.
    pub fn compute(orbit: &ReferenceOrbit, r_view: f64) -> Self {
        let mut b_re = 0.0_f64;
        let mut b_im = 0.0_f64;
        let mut skip_iter = 0u32;

        for n in 0..orbit.ref_iter as usize {
            let b_mag = (b_re * b_re + b_im * b_im).sqrt();
            if b_mag * r_view >= APPROX_THRESHOLD {
                break;
            }
            skip_iter = n as u32;

            let zr = orbit.re_f64[n];
            let zi = orbit.im_f64[n];
            let next_re = 2.0 * (zr * b_re - zi * b_im) + 1.0;
            let next_im = 2.0 * (zr * b_im + zi * b_re);
            b_re = next_re;
            b_im = next_im;
        }

        Self {
            b_re,
            b_im,
            skip_iter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepbrot_core::QuadFloat;

    fn orbit_at(re: f64, im: f64, max_iter: u32) -> ReferenceOrbit {
        ReferenceOrbit::compute(&(QuadFloat::from_f64(re), QuadFloat::from_f64(im)), max_iter)
            .unwrap()
    }

    #[test]
    fn zero_orbit_keeps_b_at_one() {
        // Center 0: every X_n = 0, so B_n = 1 for all n >= 1 and a deep
        // view lets the skip run the whole orbit.
        let orbit = orbit_at(0.0, 0.0, 64);
        let series = SeriesApproximation::compute(&orbit, 1e-15);
        assert_eq!(series.skip_iter, 63);
        assert_eq!(series.b_re, 1.0);
        assert_eq!(series.b_im, 0.0);
    }

    #[test]
    fn wide_view_skips_nothing() {
        // r_view ~ 1: |B_1| = 1 already violates the cutoff.
        let orbit = orbit_at(-0.5, 0.0, 64);
        let series = SeriesApproximation::compute(&orbit, 1.0);
        assert!(series.skip_iter <= 1);
    }

    #[test]
    fn skip_never_reaches_ref_iter() {
        let orbit = orbit_at(-0.743643887037151, 0.131825904205330, 2048);
        let series = SeriesApproximation::compute(&orbit, 1e-20);
        assert!(series.skip_iter < orbit.ref_iter);
    }

    #[test]
    fn deeper_views_skip_more() {
        let orbit = orbit_at(-0.743643887037151, 0.131825904205330, 2048);
        let shallow = SeriesApproximation::compute(&orbit, 1e-8);
        let deep = SeriesApproximation::compute(&orbit, 1e-20);
        assert!(deep.skip_iter > shallow.skip_iter);
        assert!(deep.skip_iter > 0);
    }

    #[test]
    fn recurrence_matches_hand_computation() {
        // Orbit at c = (1, 0): X = 0, 1, 2 with ref escape at |2|^2 > 4
        // failing (4 not > 4), X_3 = 5 escapes. B_1 = 1, B_2 = 2*1*1+1 = 3.
        let orbit = orbit_at(1.0, 0.0, 16);
        // Tiny r_view so only the loop bound stops the recurrence.
        let series = SeriesApproximation::compute(&orbit, 1e-30);
        assert_eq!(series.skip_iter, orbit.ref_iter - 1);
        // After n = 0 and n = 1 the coefficient is B_2 = 3.
        let two_steps = {
            let (mut br, mut bi) = (0.0, 0.0);
            for n in 0..2 {
                let (zr, zi) = (orbit.re_f64[n], orbit.im_f64[n]);
                let nr = 2.0 * (zr * br - zi * bi) + 1.0;
                let ni = 2.0 * (zr * bi + zi * br);
                br = nr;
                bi = ni;
            }
            (br, bi)
        };
        assert_eq!(two_steps, (3.0, 0.0));
    }
}
