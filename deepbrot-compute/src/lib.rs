pub mod dispatch;
pub mod interior;
pub mod perturbation;
pub mod reference;
pub mod scalar;
pub mod series;
pub mod simd;

pub use dispatch::{compute, compute_f64, FrameStats};
pub use perturbation::{render_frame, PerturbationStats};
pub use reference::ReferenceOrbit;
pub use scalar::{escape_count, smooth_escape_extended, smooth_escape_f64};
pub use series::SeriesApproximation;

// Re-export core types for convenience
pub use deepbrot_core::*;
