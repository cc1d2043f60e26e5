//! Closed-form interior tests for the two largest Mandelbrot lobes.
//!
//! Both run in f64 in every kernel: they are fast rejections, not
//! precision-critical steps, and applying them uniformly avoids seams at
//! the lobe boundaries between precision modes.

/// Main cardioid test: with `q = (cr − ¼)² + ci²`, the point is inside
/// when `q·(q + (cr − ¼)) < ¼·ci²`.
#[inline]
pub fn in_main_cardioid(cr: f64, ci: f64) -> bool {
    let xq = cr - 0.25;
    let q = xq * xq + ci * ci;
    q * (q + xq) < 0.25 * ci * ci
}

/// Period-2 bulb test: the disc of radius ¼ centered at (−1, 0).
#[inline]
pub fn in_period2_bulb(cr: f64, ci: f64) -> bool {
    let xr = cr + 1.0;
    xr * xr + ci * ci < 0.0625
}

/// Combined fast-rejection predicate used by all kernels.
#[inline]
pub fn in_known_interior(cr: f64, ci: f64) -> bool {
    in_main_cardioid(cr, ci) || in_period2_bulb(cr, ci)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_in_cardioid() {
        assert!(in_main_cardioid(0.0, 0.0));
    }

    #[test]
    fn cardioid_cusp_neighborhood() {
        // Just left of the cusp at 0.25 is inside; just right is out.
        assert!(in_main_cardioid(0.24, 0.0));
        assert!(!in_main_cardioid(0.26, 0.0));
    }

    #[test]
    fn minus_one_is_in_bulb_not_cardioid() {
        assert!(in_period2_bulb(-1.0, 0.0));
        assert!(!in_main_cardioid(-1.0, 0.0));
        assert!(in_known_interior(-1.0, 0.0));
    }

    #[test]
    fn bulb_boundary_is_radius_quarter() {
        assert!(in_period2_bulb(-1.24, 0.0));
        assert!(!in_period2_bulb(-1.26, 0.0));
        assert!(in_period2_bulb(-1.0, 0.24));
        assert!(!in_period2_bulb(-1.0, 0.26));
    }

    #[test]
    fn exterior_points_are_rejected_by_both() {
        assert!(!in_known_interior(2.0, 0.0));
        assert!(!in_known_interior(-2.0, -1.0));
        assert!(!in_known_interior(0.0, 1.5));
    }

    #[test]
    fn seahorse_valley_point_is_not_known_interior() {
        // Deep-zoom reference center: near the boundary, not in a lobe.
        assert!(!in_known_interior(-0.743643887037151, 0.131825904205330));
    }
}
