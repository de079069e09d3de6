//! # Squat-Signal
//!
//! Signal processing for per-frame keypoint and tracked-object traces.
//!
//! ## Pipeline Stages
//!
//! 1. **Validity**: mask out low-confidence and non-finite samples
//! 2. **Repair**: linear interpolation across dropped frames
//! 3. **Smoothing**: Savitzky-Golay filtering per coordinate axis
//! 4. **Peak detection**: spacing-constrained local maxima for rep bottoms

pub mod filtering;
pub mod peaks;
pub mod sanitizer;

pub use filtering::*;
pub use peaks::*;
pub use sanitizer::*;
