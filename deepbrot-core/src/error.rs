//! Engine error types.

use thiserror::Error;

/// Failures reported at the `compute` boundary.
///
/// There is no partial-progress contract: on `InvalidRegion` and
/// `InvalidSize` the output buffer is untouched; on `OutOfMemory` its
/// contents are undefined. Numerical pathologies (NaN deltas,
/// perturbation glitches) are not errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("invalid size: {0}")]
    InvalidSize(String),

    #[error("reference orbit allocation failed")]
    OutOfMemory,
}
