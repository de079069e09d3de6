//! Choice of the analysed leg.

use ndarray::{ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use squat_core::{FrameSeries, Keypoint, Side};

/// Chosen side with the evidence behind it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideSelection {
    pub side: Side,
    pub left_mean_confidence: f64,
    pub right_mean_confidence: f64,
}

/// Pick the leg whose hip, knee and ankle have the higher mean confidence
/// over the whole sequence. Ties, and undefined means, go to the right side.
pub fn select_side(frames: &FrameSeries) -> SideSelection {
    select_side_from_confidences(frames.confidences().view())
}

/// Same as [`select_side`] on a raw `(frames, 17)` confidence array
pub fn select_side_from_confidences(confidences: ArrayView2<'_, f64>) -> SideSelection {
    let left_mean_confidence = mean_confidence(confidences, Side::Left.joints());
    let right_mean_confidence = mean_confidence(confidences, Side::Right.joints());

    let side = if left_mean_confidence > right_mean_confidence {
        Side::Left
    } else {
        Side::Right
    };

    tracing::debug!(
        "Selected {:?} side (left mean confidence {:.3}, right {:.3})",
        side,
        left_mean_confidence,
        right_mean_confidence
    );

    SideSelection {
        side,
        left_mean_confidence,
        right_mean_confidence,
    }
}

fn mean_confidence(confidences: ArrayView2<'_, f64>, joints: [Keypoint; 3]) -> f64 {
    let indices: Vec<usize> = joints.iter().map(|kp| kp.index()).collect();
    confidences
        .select(Axis(1), &indices)
        .mean()
        .unwrap_or(f64::NAN)
}
