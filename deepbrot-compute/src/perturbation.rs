//! Vectorized perturbation kernel — the deep-zoom hot path.
//!
//! Every pixel iterates its delta against the shared reference orbit:
//! δ_{n+1} = 2·X_n·δ_n + δ_n² + δc, with the escape test applied to the
//! reconstructed orbit |X_n + δ_n|². Four pixels ride one vector; the
//! loop body is unrolled by four between escape checks, and escaped
//! lanes are retired by mask so their deltas cannot blow up the next
//! vector multiply. Pixel rows are distributed across rayon workers.
//!
//! The escape radius here is 4, not the scalar kernels' 256: the delta
//! representation cannot afford iterations past escape, where |X + δ|
//! grows double-exponentially.

use crate::interior::in_known_interior;
use crate::reference::ReferenceOrbit;
use crate::series::SeriesApproximation;
use crate::simd::{any_lane, from_lanes, mask_none, splat, CmpGt, LaneF64, LANES};
use deepbrot_core::{interior_sentinel, smooth_iteration, EngineError, QuadFloat, Region};
use rayon::prelude::*;

/// Squared escape radius for the perturbation kernel.
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Per-frame observability for the perturbation path.
#[derive(Clone, Copy, Debug, Default)]
pub struct PerturbationStats {
    /// Length of the usable reference orbit.
    pub ref_iter: u32,
    /// Iterations every pixel skipped via the series seed.
    pub skip_iter: u32,
}

/// Shared read-only state for one frame; workers borrow it.
struct FrameCtx<'a> {
    re: &'a [f64],
    im: &'a [f64],
    limit: usize,
    skip: usize,
    b_re: f64,
    b_im: f64,
    center_re: f64,
    center_im: f64,
    dx: f64,
    dy: f64,
    width: usize,
    height: usize,
    max_iter: u32,
}

/// Render one frame with the perturbation kernel.
///
/// The reference orbit is built on the calling thread, shared read-only
/// with the row workers, and dropped before this function returns.
pub fn render_frame(
    region: &Region,
    width: u32,
    height: u32,
    max_iter: u32,
    out: &mut [f64],
) -> Result<PerturbationStats, EngineError> {
    if out.len() != width as usize * height as usize {
        return Err(EngineError::InvalidSize(format!(
            "output buffer holds {} cells, frame needs {}",
            out.len(),
            width as usize * height as usize
        )));
    }

    let center = region.center();
    let (dx_q, dy_q) = region.pixel_steps(width, height);

    let orbit = ReferenceOrbit::compute(&center, max_iter)?;

    // Half-diagonal of the view in delta space, measured in quad and
    // only then cast down.
    let half_w = dx_q.mul(&QuadFloat::from_f64(width as f64 / 2.0));
    let half_h = dy_q.mul(&QuadFloat::from_f64(height as f64 / 2.0));
    let r_view = half_w
        .mul(&half_w)
        .add(&half_h.mul(&half_h))
        .to_f64()
        .sqrt();

    let series = SeriesApproximation::compute(&orbit, r_view);
    log::debug!(
        "perturbation frame {}x{}: ref_iter={}, skip_iter={}",
        width,
        height,
        orbit.ref_iter,
        series.skip_iter
    );

    let ctx = FrameCtx {
        re: &orbit.re_f64,
        im: &orbit.im_f64,
        limit: orbit.ref_iter as usize,
        skip: series.skip_iter as usize,
        b_re: series.b_re,
        b_im: series.b_im,
        center_re: center.0.to_f64(),
        center_im: center.1.to_f64(),
        dx: dx_q.to_f64(),
        dy: dy_q.to_f64(),
        width: width as usize,
        height: height as usize,
        max_iter,
    };

    out.par_chunks_mut(ctx.width)
        .enumerate()
        .for_each(|(py, row)| render_row(&ctx, py, row));

    Ok(PerturbationStats {
        ref_iter: orbit.ref_iter,
        skip_iter: series.skip_iter,
    })
}

fn render_row(ctx: &FrameCtx, py: usize, row: &mut [f64]) {
    let half_w = ctx.width as f64 / 2.0;
    let dci = (py as f64 - ctx.height as f64 / 2.0) * ctx.dy;

    let mut px = 0usize;
    while px + LANES <= ctx.width {
        let vdcr = from_lanes(|k| ((px + k) as f64 - half_w) * ctx.dx);
        let vdci = splat(dci);
        let values = vector_lanes(ctx, vdcr, vdci);
        row[px..px + LANES].copy_from_slice(&values);
        px += LANES;
    }
    for px in px..ctx.width {
        let dcr = (px as f64 - half_w) * ctx.dx;
        row[px] = scalar_pixel(ctx, dcr, dci);
    }
}

/// One delta iteration for four lanes; squares are kept live across
/// steps like the scalar kernels do.
#[inline]
#[allow(clippy::too_many_arguments)]
fn delta_step(
    dzr: &mut LaneF64,
    dzi: &mut LaneF64,
    dzr2: &mut LaneF64,
    dzi2: &mut LaneF64,
    x: f64,
    y: f64,
    vdcr: LaneF64,
    vdci: LaneF64,
) {
    let two_x = splat(2.0 * x);
    let two_y = splat(2.0 * y);
    let term_r = *dzr2 - *dzi2 + vdcr;
    let term_i = (*dzr * *dzi) * splat(2.0) + vdci;
    let next_r = two_x.mul_add(*dzr, term_r - two_y * *dzi);
    let next_i = two_x.mul_add(*dzi, two_y.mul_add(*dzr, term_i));
    *dzr = next_r;
    *dzi = next_i;
    *dzr2 = next_r * next_r;
    *dzi2 = next_i * next_i;
}

/// Iterate four pixels to completion and return their output cells.
fn vector_lanes(ctx: &FrameCtx, vdcr: LaneF64, vdci: LaneF64) -> [f64; LANES] {
    let sentinel = interior_sentinel(ctx.max_iter);

    // Interior pre-check on the reconstructed c. At perturbation depths
    // δc is far below ulp(c), so this classifies lanes the same way the
    // scalar kernels would.
    let dcr_arr = vdcr.to_array();
    let dci_arr = vdci.to_array();
    let mut active = from_lanes(|k| {
        if in_known_interior(ctx.center_re + dcr_arr[k], ctx.center_im + dci_arr[k]) {
            0.0
        } else {
            f64::from_bits(u64::MAX)
        }
    });
    if !any_lane(active) {
        return [sentinel; LANES];
    }

    // Seed deltas from the series coefficient.
    let (mut dzr, mut dzi) = if ctx.skip > 0 {
        let vb_re = splat(ctx.b_re);
        let vb_im = splat(ctx.b_im);
        (
            vb_re * vdcr - vb_im * vdci,
            vb_re * vdci + vb_im * vdcr,
        )
    } else {
        (splat(0.0), splat(0.0))
    };
    dzr = active & dzr;
    dzi = active & dzi;
    let mut dzr2 = dzr * dzr;
    let mut dzi2 = dzi * dzi;

    let mut escaped = mask_none();
    let mut viter = splat(0.0);
    let mut vmod = splat(0.0);

    let vradius = splat(ESCAPE_RADIUS_SQ);
    let limit = ctx.limit;
    let mut i = ctx.skip;

    // Main loop: four iterations per escape check.
    while i + 4 <= limit {
        delta_step(&mut dzr, &mut dzi, &mut dzr2, &mut dzi2, ctx.re[i], ctx.im[i], vdcr, vdci);
        delta_step(&mut dzr, &mut dzi, &mut dzr2, &mut dzi2, ctx.re[i + 1], ctx.im[i + 1], vdcr, vdci);
        delta_step(&mut dzr, &mut dzi, &mut dzr2, &mut dzi2, ctx.re[i + 2], ctx.im[i + 2], vdcr, vdci);
        delta_step(&mut dzr, &mut dzi, &mut dzr2, &mut dzi2, ctx.re[i + 3], ctx.im[i + 3], vdcr, vdci);

        // The deltas now sit at iteration i+4; compare against that
        // reference point, clamped to the last recorded step.
        let check_idx = if i + 4 < limit { i + 4 } else { limit - 1 };
        let vx = splat(ctx.re[check_idx]);
        let vy = splat(ctx.im[check_idx]);
        let zr = vx + dzr;
        let zi = vy + dzi;
        let vm = zr * zr + zi * zi;

        let hit = vm.cmp_gt(vradius);
        let newly = active & hit;
        viter = newly.blend(splat((i + 4) as f64), viter);
        vmod = newly.blend(vm, vmod);
        escaped = escaped | newly;
        active = active & !hit;

        if !any_lane(active) {
            break;
        }

        // Retired lanes keep iterating arithmetically; zeroing their
        // deltas stops the values from exploding into inf/NaN.
        dzr = active & dzr;
        dzi = active & dzi;
        dzr2 = dzr * dzr;
        dzi2 = dzi * dzi;

        i += 4;
    }

    // Remainder: fewer than four iterations left, checked one by one.
    if any_lane(active) {
        while i < limit {
            let x = ctx.re[i];
            let y = ctx.im[i];
            let zr = splat(x) + dzr;
            let zi = splat(y) + dzi;
            let vm = zr * zr + zi * zi;

            let hit = vm.cmp_gt(vradius);
            let newly = active & hit;
            viter = newly.blend(splat(i as f64), viter);
            vmod = newly.blend(vm, vmod);
            escaped = escaped | newly;
            active = active & !hit;

            if !any_lane(active) {
                break;
            }

            delta_step(&mut dzr, &mut dzi, &mut dzr2, &mut dzi2, x, y, vdcr, vdci);
            dzr = active & dzr;
            dzi = active & dzi;
            dzr2 = dzr * dzr;
            dzi2 = dzi * dzi;

            i += 1;
        }
    }

    let esc_bits = escaped.move_mask();
    let iters = viter.to_array();
    let mods = vmod.to_array();
    let mut values = [sentinel; LANES];
    for (k, value) in values.iter_mut().enumerate() {
        if esc_bits & (1 << k) != 0 {
            *value = smooth_iteration(iters[k] as u32, mods[k]);
        }
    }
    values
}

/// Tail path for the `width mod 4` pixels of a row; identical delta
/// recurrence, escape checked every iteration.
fn scalar_pixel(ctx: &FrameCtx, dcr: f64, dci: f64) -> f64 {
    if in_known_interior(ctx.center_re + dcr, ctx.center_im + dci) {
        return interior_sentinel(ctx.max_iter);
    }

    let (mut dzr, mut dzi) = if ctx.skip > 0 {
        (
            ctx.b_re * dcr - ctx.b_im * dci,
            ctx.b_re * dci + ctx.b_im * dcr,
        )
    } else {
        (0.0, 0.0)
    };
    let mut dzr2 = dzr * dzr;
    let mut dzi2 = dzi * dzi;

    for i in ctx.skip..ctx.limit {
        let x = ctx.re[i];
        let y = ctx.im[i];
        let zr = x + dzr;
        let zi = y + dzi;
        let modulus = zr * zr + zi * zi;
        if modulus > ESCAPE_RADIUS_SQ {
            return smooth_iteration(i as u32, modulus);
        }

        let two_x = 2.0 * x;
        let two_y = 2.0 * y;
        let next_r = (two_x * dzr - two_y * dzi) + dzr2 - dzi2 + dcr;
        let next_i = (two_x * dzi + two_y * dzr) + 2.0 * dzr * dzi + dci;
        dzr = next_r;
        dzi = next_i;
        dzr2 = dzr * dzr;
        dzi2 = dzi * dzi;
    }
    interior_sentinel(ctx.max_iter)
}
