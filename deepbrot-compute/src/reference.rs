//! Reference orbit computation for the perturbation kernel.
//!
//! The view's center point is iterated at quad precision; every step is
//! recorded both at full precision and as its f64 cast. Worker threads
//! only ever read the casts; the quad array is the authoritative record
//! the casts were taken from.

use deepbrot_core::{EngineError, QuadFloat};

/// A pre-computed reference orbit for one frame.
///
/// The f64 casts are stored per component so the perturbation kernel can
/// broadcast a single lane without touching interleaved pairs.
pub struct ReferenceOrbit {
    /// Orbit values X_n at quad precision.
    pub quad: Vec<(QuadFloat, QuadFloat)>,
    /// f64 casts of the real parts, index-aligned with `quad`.
    pub re_f64: Vec<f64>,
    /// f64 casts of the imaginary parts.
    pub im_f64: Vec<f64>,
    /// First step with |X_n|² > 4, or `max_iter` if the orbit never
    /// escapes. Pixel iteration never runs past this index.
    pub ref_iter: u32,
}

impl ReferenceOrbit {
    /// Iterate the center at quad precision, recording up to `max_iter`
    /// steps. Fails with `OutOfMemory` if the buffers cannot be
    /// reserved; the buffers are dropped on every exit path.
    pub fn compute(center: &(QuadFloat, QuadFloat), max_iter: u32) -> Result<Self, EngineError> {
        let cap = max_iter as usize + 1;
        let mut quad = Vec::new();
        let mut re_f64 = Vec::new();
        let mut im_f64 = Vec::new();
        quad.try_reserve_exact(cap)
            .map_err(|_| EngineError::OutOfMemory)?;
        re_f64
            .try_reserve_exact(cap)
            .map_err(|_| EngineError::OutOfMemory)?;
        im_f64
            .try_reserve_exact(cap)
            .map_err(|_| EngineError::OutOfMemory)?;

        let four = QuadFloat::from_f64(4.0);
        let two = QuadFloat::from_f64(2.0);

        let mut zr = QuadFloat::zero();
        let mut zi = QuadFloat::zero();
        let mut zr2 = QuadFloat::zero();
        let mut zi2 = QuadFloat::zero();

        let mut ref_iter = max_iter;

        for i in 0..max_iter {
            quad.push((zr.clone(), zi.clone()));
            re_f64.push(zr.to_f64());
            im_f64.push(zi.to_f64());

            if zr2.add(&zi2).gt(&four) {
                ref_iter = i;
                break;
            }

            zi = two.mul(&zr).mul(&zi).add(&center.1);
            zr = zr2.sub(&zi2).add(&center.0);
            zr2 = zr.mul(&zr);
            zi2 = zi.mul(&zi);
        }

        Ok(Self {
            quad,
            re_f64,
            im_f64,
            ref_iter,
        })
    }
}
