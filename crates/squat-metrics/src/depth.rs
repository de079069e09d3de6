//! Depth-quality classification of rep bottoms.

use squat_core::DepthBands;

use crate::record::DepthQuality;

/// Bucket a bottom knee angle (degrees). Each band includes its lower bound.
pub fn classify_depth(bottom_angle: f64, bands: &DepthBands) -> DepthQuality {
    if bottom_angle < bands.below_parallel_deg {
        DepthQuality::Below
    } else if bottom_angle < bands.parallel_deg {
        DepthQuality::Parallel
    } else {
        DepthQuality::Partial
    }
}
