//! Double-double arithmetic under iteration-like workloads.

use deepbrot_core::{ExtendedFloat, QuadFloat};

#[test]
fn squaring_near_one_keeps_residual_digits() {
    let eps = 2.0_f64.powi(-60);
    let x = ExtendedFloat::from_parts(1.0, eps);
    let sq = x.mul(&x);
    // (1 + e)^2 = 1 + 2e + e^2; 2e is far below ulp(1) in plain f64.
    let diff = sq.sub(&ExtendedFloat::from_f64(1.0));
    assert!((diff.to_f64() - 2.0 * eps).abs() < 1e-30);
}

#[test]
fn iteration_state_stays_consistent_with_quad() {
    // Drive z <- z^2 + c for a few steps in both quad and double-double;
    // the extended path must track quad far better than f64 ulp.
    let c_re_q = QuadFloat::from_string("0.2500000000000001").unwrap();
    let c_im_q = QuadFloat::from_string("0.0000000000000001").unwrap();
    let c_re = c_re_q.to_extended();
    let c_im = c_im_q.to_extended();

    let mut zr_q = QuadFloat::zero();
    let mut zi_q = QuadFloat::zero();
    let mut zr = ExtendedFloat::ZERO;
    let mut zi = ExtendedFloat::ZERO;

    for _ in 0..32 {
        let zr2_q = zr_q.mul(&zr_q);
        let zi2_q = zi_q.mul(&zi_q);
        let new_zi_q = QuadFloat::from_f64(2.0)
            .mul(&zr_q)
            .mul(&zi_q)
            .add(&c_im_q);
        zr_q = zr2_q.sub(&zi2_q).add(&c_re_q);
        zi_q = new_zi_q;

        let zr2 = zr.mul(&zr);
        let zi2 = zi.mul(&zi);
        let new_zi = ExtendedFloat::from_f64(2.0).mul(&zr).mul(&zi).add(&c_im);
        zr = zr2.sub(&zi2).add(&c_re);
        zi = new_zi;
    }

    let err_re = zr_q.sub(&QuadFloat::from_f64(zr.hi)).to_f64() - zr.lo;
    let err_im = zi_q.sub(&QuadFloat::from_f64(zi.hi)).to_f64() - zi.lo;
    assert!(err_re.abs() < 1e-28, "re error {}", err_re);
    assert!(err_im.abs() < 1e-28, "im error {}", err_im);
}

#[test]
fn comparison_against_escape_radius() {
    let below = ExtendedFloat::from_f64(255.999999);
    let above = ExtendedFloat::from_parts(256.0, 1e-25);
    assert!(!below.gt_f64(256.0));
    assert!(above.gt_f64(256.0));
}
