//! Frame requests and the parsed quad-precision region.

use crate::{EngineError, QuadFloat};
use serde::{Deserialize, Serialize};

/// One frame of work as the caller states it: view bounds as decimal
/// strings (up to ~36 significant digits survive), pixel dimensions, and
/// the iteration cap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameRequest {
    pub xmin: String,
    pub xmax: String,
    pub ymin: String,
    pub ymax: String,
    pub width: u32,
    pub height: u32,
    pub max_iter: u32,
}

impl FrameRequest {
    pub fn new(
        xmin: &str,
        xmax: &str,
        ymin: &str,
        ymax: &str,
        width: u32,
        height: u32,
        max_iter: u32,
    ) -> Self {
        Self {
            xmin: xmin.to_string(),
            xmax: xmax.to_string(),
            ymin: ymin.to_string(),
            ymax: ymax.to_string(),
            width,
            height,
            max_iter,
        }
    }

    /// Validate sizes and parse the bounds at quad precision.
    pub fn parse(&self) -> Result<Region, EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidSize(format!(
                "pixel dimensions must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_iter == 0 {
            return Err(EngineError::InvalidSize(
                "max_iter must be positive".to_string(),
            ));
        }

        let xmin = QuadFloat::from_string(&self.xmin).map_err(EngineError::InvalidRegion)?;
        let xmax = QuadFloat::from_string(&self.xmax).map_err(EngineError::InvalidRegion)?;
        let ymin = QuadFloat::from_string(&self.ymin).map_err(EngineError::InvalidRegion)?;
        let ymax = QuadFloat::from_string(&self.ymax).map_err(EngineError::InvalidRegion)?;

        if !xmax.sub(&xmin).is_positive() {
            return Err(EngineError::InvalidRegion(
                "xmax must be greater than xmin".to_string(),
            ));
        }
        if !ymax.sub(&ymin).is_positive() {
            return Err(EngineError::InvalidRegion(
                "ymax must be greater than ymin".to_string(),
            ));
        }

        Ok(Region {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }
}

/// View bounds parsed at quad precision. Invariant: `xmax > xmin` and
/// `ymax > ymin`.
#[derive(Clone, Debug)]
pub struct Region {
    pub xmin: QuadFloat,
    pub xmax: QuadFloat,
    pub ymin: QuadFloat,
    pub ymax: QuadFloat,
}

impl Region {
    pub fn view_width(&self) -> QuadFloat {
        self.xmax.sub(&self.xmin)
    }

    pub fn view_height(&self) -> QuadFloat {
        self.ymax.sub(&self.ymin)
    }

    /// Center point, the anchor for the reference orbit.
    pub fn center(&self) -> (QuadFloat, QuadFloat) {
        (
            self.xmin.midpoint(&self.xmax),
            self.ymin.midpoint(&self.ymax),
        )
    }

    /// Per-pixel steps (dx, dy) for the given raster size.
    pub fn pixel_steps(&self, width: u32, height: u32) -> (QuadFloat, QuadFloat) {
        (
            self.view_width().div(&QuadFloat::from_f64(width as f64)),
            self.view_height().div(&QuadFloat::from_f64(height as f64)),
        )
    }
}
