//! Rep segmentation over the hip-depth signal.

use ndarray::{Array1, ArrayView2, Zip};
use serde::{Deserialize, Serialize};
use squat_core::{AnalysisConfig, Error, Result};
use squat_signal::PeakFinder;

/// Depth proxy per frame: `hip_y - knee_y`.
///
/// Image y grows downward, so the value rises as the hip drops towards and
/// past knee level; rep bottoms are maxima.
pub fn depth_signal(hip: ArrayView2<'_, f64>, knee: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
    if hip.dim() != knee.dim() || hip.ncols() != 2 {
        return Err(Error::input_shape(
            "depth signal knee trace",
            format!("{:?}", hip.shape()),
            format!("{:?}", knee.shape()),
        ));
    }

    Ok(Zip::from(hip.column(1))
        .and(knee.column(1))
        .map_collect(|&hip_y, &knee_y| hip_y - knee_y))
}

/// Frame window of one detected rep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepWindow {
    pub bottom_frame: usize,
    pub start_frame: usize,
    pub end_frame: usize,
}

/// Peak-based rep segmenter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepSegmenter {
    pub finder: PeakFinder,

    /// Frames kept on each side of a bottom
    pub window_radius: usize,
}

impl Default for RepSegmenter {
    fn default() -> Self {
        Self {
            finder: PeakFinder::default(),
            window_radius: 15,
        }
    }
}

impl RepSegmenter {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            finder: PeakFinder::new(
                config.segmentation.min_peak_height,
                config.segmentation.min_peak_distance,
            ),
            window_radius: config.segmentation.window_radius,
        }
    }

    /// Rep windows in ascending bottom order; empty when no bottom clears the floor.
    pub fn segment(&self, depth: &[f64]) -> Vec<RepWindow> {
        let frame_count = depth.len();
        let bottoms = self.finder.find(depth);

        tracing::debug!("Detected {} rep bottoms over {} frames", bottoms.len(), frame_count);

        bottoms
            .into_iter()
            .map(|bottom_frame| RepWindow {
                bottom_frame,
                start_frame: bottom_frame.saturating_sub(self.window_radius),
                end_frame: bottom_frame.saturating_add(self.window_radius).min(frame_count),
            })
            .collect()
    }
}

/// Seconds between consecutive rep bottoms
pub fn rep_tempo(windows: &[RepWindow], fps: u32) -> Vec<f64> {
    windows
        .windows(2)
        .map(|w| (w[1].bottom_frame - w[0].bottom_frame) as f64 / fps as f64)
        .collect()
}
