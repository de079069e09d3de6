//! Session- and rep-level aggregates for storage and coaching feedback.

use serde::{Deserialize, Serialize};

use crate::alignment::aligned_fraction;
use crate::record::{BarPathDeviation, DepthQuality, MetricsRecord};

/// Number of reps per depth band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthCounts {
    pub below: usize,
    pub parallel: usize,
    pub partial: usize,
}

impl DepthCounts {
    fn add(&mut self, quality: DepthQuality) {
        match quality {
            DepthQuality::Below => self.below += 1,
            DepthQuality::Parallel => self.parallel += 1,
            DepthQuality::Partial => self.partial += 1,
        }
    }
}

/// Flattened per-rep row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepSummary {
    pub index: usize,
    pub bottom_frame: usize,
    pub start_frame: usize,
    pub end_frame: usize,
    pub bottom_angle_degrees: f64,
    /// Depth proxy at the bottom frame; `None` when the record has no sample there
    pub depth_value: Option<f64>,
    pub depth_quality: DepthQuality,
    /// Time to the next bottom; `None` for the last rep
    pub tempo_secs: Option<f64>,
    /// Aligned in at least the configured share of window frames
    pub hip_heel_aligned: bool,
    pub bar_path_deviation: BarPathDeviation,
}

/// Whole-set aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_reps: usize,
    /// Mean depth proxy over rep bottoms
    pub avg_bottom_depth: Option<f64>,
    /// Deepest bottom knee angle
    pub min_knee_angle: Option<f64>,
    pub mean_tempo_secs: Option<f64>,
    /// Share of all frames with the hip over the ankle
    pub alignment_fraction: Option<f64>,
    /// Mean over reps with a defined bar-path deviation
    pub mean_bar_path_deviation: Option<f64>,
    pub depth_counts: DepthCounts,
}

impl MetricsRecord {
    /// One row per rep; `rep_aligned_fraction` is the share of aligned frames
    /// a rep window needs to count as aligned.
    pub fn rep_summaries(&self, rep_aligned_fraction: f64) -> Vec<RepSummary> {
        self.reps
            .iter()
            .enumerate()
            .map(|(i, rep)| RepSummary {
                index: rep.index,
                bottom_frame: rep.bottom_frame,
                start_frame: rep.start_frame,
                end_frame: rep.end_frame,
                bottom_angle_degrees: rep.bottom_angle_degrees,
                depth_value: self.depth.get(rep.bottom_frame).copied(),
                depth_quality: rep.depth_quality,
                tempo_secs: self.tempo_per_rep.get(i).copied(),
                hip_heel_aligned: aligned_fraction(
                    &self.hip_heel_alignment,
                    rep.start_frame,
                    rep.end_frame,
                )
                .is_some_and(|f| f >= rep_aligned_fraction),
                bar_path_deviation: self
                    .bar_path_deviation
                    .get(i)
                    .copied()
                    .unwrap_or(BarPathDeviation::Undefined { finite_samples: 0 }),
            })
            .collect()
    }

    pub fn session_summary(&self) -> SessionSummary {
        let mut depth_counts = DepthCounts::default();
        for rep in &self.reps {
            depth_counts.add(rep.depth_quality);
        }

        let bottoms: Vec<f64> = self
            .reps
            .iter()
            .filter_map(|r| self.depth.get(r.bottom_frame).copied())
            .collect();
        let min_knee_angle = self
            .reps
            .iter()
            .map(|r| r.bottom_angle_degrees)
            .filter(|a| a.is_finite())
            .reduce(f64::min);
        let deviations: Vec<f64> = self
            .bar_path_deviation
            .iter()
            .filter_map(BarPathDeviation::value)
            .collect();

        SessionSummary {
            total_reps: self.total_reps,
            avg_bottom_depth: finite_mean(&bottoms),
            min_knee_angle,
            mean_tempo_secs: finite_mean(&self.tempo_per_rep),
            alignment_fraction: aligned_fraction(
                &self.hip_heel_alignment,
                0,
                self.hip_heel_alignment.len(),
            ),
            mean_bar_path_deviation: finite_mean(&deviations),
            depth_counts,
        }
    }
}

fn finite_mean(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().sum::<f64>() / finite.len() as f64)
}
