//! Output record of a squat analysis.

use serde::{Deserialize, Serialize};
use squat_core::Side;

/// Depth reached at the bottom of a rep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthQuality {
    /// Knee angle under the below-parallel band
    Below,
    Parallel,
    /// Knee angle at or above the parallel band
    Partial,
}

impl DepthQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepthQuality::Below => "below",
            DepthQuality::Parallel => "parallel",
            DepthQuality::Partial => "partial",
        }
    }
}

/// Lateral bar drift over one rep window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BarPathDeviation {
    /// Population standard deviation of the horizontal bar position (pixels)
    Defined { std_px: f64 },
    /// Too few finite samples in the window
    Undefined { finite_samples: usize },
}

impl BarPathDeviation {
    pub fn value(&self) -> Option<f64> {
        match self {
            BarPathDeviation::Defined { std_px } => Some(*std_px),
            BarPathDeviation::Undefined { .. } => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, BarPathDeviation::Defined { .. })
    }
}

/// One segmented repetition.
///
/// `start_frame..end_frame` is a half-open window around `bottom_frame`;
/// windows of neighbouring reps may overlap when the radius exceeds half the
/// peak spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rep {
    /// 1-based ordinal
    pub index: usize,
    pub bottom_frame: usize,
    pub start_frame: usize,
    pub end_frame: usize,
    pub depth_quality: DepthQuality,
    pub bottom_angle_degrees: f64,
}

impl Rep {
    pub fn window_len(&self) -> usize {
        self.end_frame - self.start_frame
    }
}

/// Complete per-video metrics package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Leg the metrics were computed on
    pub side: Side,
    pub fps: u32,
    pub total_reps: usize,
    pub reps: Vec<Rep>,
    /// Knee angle per frame (degrees)
    pub knee_angle: Vec<f64>,
    /// Hip-below-knee depth proxy per frame (pixels)
    pub depth: Vec<f64>,
    /// Hip horizontally over the ankle, per frame
    pub hip_heel_alignment: Vec<bool>,
    /// Seconds between consecutive rep bottoms
    pub tempo_per_rep: Vec<f64>,
    /// One entry per rep
    pub bar_path_deviation: Vec<BarPathDeviation>,
}

impl MetricsRecord {
    pub fn frame_count(&self) -> usize {
        self.knee_angle.len()
    }

    pub fn to_json(&self) -> squat_core::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
