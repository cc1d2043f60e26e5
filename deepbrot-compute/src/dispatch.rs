//! Frame entry points: mode selection and kernel dispatch.
//!
//! The three arithmetic strategies form a closed set and the dispatch
//! is a single match; rows go to rayon workers in every mode, because
//! iteration cost varies by orders of magnitude between interior and
//! frontier pixels and a static split would leave threads idle.

use crate::perturbation;
use crate::scalar::{smooth_escape_extended, smooth_escape_f64};
use deepbrot_core::{EngineError, FrameRequest, PrecisionMode};
use rayon::prelude::*;

/// What one `compute` call did, for callers that want to surface it.
#[derive(Clone, Copy, Debug)]
pub struct FrameStats {
    pub mode: PrecisionMode,
    /// Reference orbit length; 0 outside perturbation mode.
    pub ref_iter: u32,
    /// Series skip count; 0 outside perturbation mode.
    pub skip_iter: u32,
}

/// Compute one frame.
///
/// Parses the request bounds at quad precision, classifies the view
/// width, and runs the matching kernel. On success every cell of `out`
/// holds either a positive smooth iteration count or the `−max_iter`
/// sentinel. On error the buffer is untouched, except for
/// `OutOfMemory` where its contents are undefined.
pub fn compute(request: &FrameRequest, out: &mut [f64]) -> Result<FrameStats, EngineError> {
    let region = request.parse()?;
    let (width, height, max_iter) = (request.width, request.height, request.max_iter);

    let cells = width as usize * height as usize;
    if out.len() != cells {
        return Err(EngineError::InvalidSize(format!(
            "output buffer holds {} cells, frame needs {}",
            out.len(),
            cells
        )));
    }

    let mode = PrecisionMode::classify_view_width(&region.view_width());
    log::debug!(
        "computing {}x{} frame, max_iter={}, mode={:?}",
        width,
        height,
        max_iter,
        mode
    );

    match mode {
        PrecisionMode::Double => {
            let (dx_q, dy_q) = region.pixel_steps(width, height);
            let xmin = region.xmin.to_f64();
            let ymin = region.ymin.to_f64();
            let dx = dx_q.to_f64();
            let dy = dy_q.to_f64();

            out.par_chunks_mut(width as usize)
                .enumerate()
                .for_each(|(py, row)| {
                    let ci = ymin + dy * py as f64;
                    for (px, cell) in row.iter_mut().enumerate() {
                        let cr = xmin + dx * px as f64;
                        *cell = smooth_escape_f64(cr, ci, max_iter);
                    }
                });

            Ok(FrameStats {
                mode,
                ref_iter: 0,
                skip_iter: 0,
            })
        }
        PrecisionMode::Extended => {
            let (dx_q, dy_q) = region.pixel_steps(width, height);
            let xmin = region.xmin.to_extended();
            let ymin = region.ymin.to_extended();
            let dx = dx_q.to_extended();
            let dy = dy_q.to_extended();

            out.par_chunks_mut(width as usize)
                .enumerate()
                .for_each(|(py, row)| {
                    let ci = ymin.add(&dy.mul_f64(py as f64));
                    for (px, cell) in row.iter_mut().enumerate() {
                        let cr = xmin.add(&dx.mul_f64(px as f64));
                        *cell = smooth_escape_extended(cr, ci, max_iter);
                    }
                });

            Ok(FrameStats {
                mode,
                ref_iter: 0,
                skip_iter: 0,
            })
        }
        PrecisionMode::Perturbation => {
            let stats = perturbation::render_frame(&region, width, height, max_iter, out)?;
            Ok(FrameStats {
                mode,
                ref_iter: stats.ref_iter,
                skip_iter: stats.skip_iter,
            })
        }
    }
}

/// Legacy entry point for callers without deep-zoom needs: f64 bounds,
/// double kernel only.
#[allow(clippy::too_many_arguments)]
pub fn compute_f64(
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
    width: u32,
    height: u32,
    max_iter: u32,
    out: &mut [f64],
) -> Result<(), EngineError> {
    if width == 0 || height == 0 || max_iter == 0 {
        return Err(EngineError::InvalidSize(
            "width, height and max_iter must be positive".to_string(),
        ));
    }
    if !(xmax > xmin) || !(ymax > ymin) {
        return Err(EngineError::InvalidRegion(
            "bounds must satisfy xmax > xmin and ymax > ymin".to_string(),
        ));
    }
    let cells = width as usize * height as usize;
    if out.len() != cells {
        return Err(EngineError::InvalidSize(format!(
            "output buffer holds {} cells, frame needs {}",
            out.len(),
            cells
        )));
    }

    let dx = (xmax - xmin) / width as f64;
    let dy = (ymax - ymin) / height as f64;

    out.par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(py, row)| {
            let ci = ymin + dy * py as f64;
            for (px, cell) in row.iter_mut().enumerate() {
                let cr = xmin + dx * px as f64;
                *cell = smooth_escape_f64(cr, ci, max_iter);
            }
        });

    Ok(())
}
