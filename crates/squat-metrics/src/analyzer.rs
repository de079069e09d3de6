//! Complete squat analyzer orchestrating all metric components.

use ndarray::Array2;
use squat_core::{
    joint_angles, AnalysisConfig, Error, FrameSeries, Keypoint, LimbTrace, Result,
    TrackedObjectTrace,
};
use squat_signal::TraceSanitizer;

use crate::alignment::hip_heel_alignment;
use crate::bar_path::bar_path_deviation;
use crate::depth::classify_depth;
use crate::record::{MetricsRecord, Rep};
use crate::request::AnalysisRequest;
use crate::segmentation::{depth_signal, rep_tempo, RepSegmenter};
use crate::side::select_side;

/// Stateless squat analyzer.
///
/// Holds only the validated configuration and the filters derived from it, so
/// one instance can be shared across threads and every call is a pure
/// function of its inputs.
#[derive(Debug, Clone)]
pub struct SquatAnalyzer {
    config: AnalysisConfig,
    sanitizer: TraceSanitizer,
    segmenter: RepSegmenter,
}

impl SquatAnalyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let sanitizer = TraceSanitizer::from_config(&config)?;
        let segmenter = RepSegmenter::from_config(&config);

        Ok(Self {
            config,
            sanitizer,
            segmenter,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the full analysis over one recorded set
    pub fn analyze(
        &self,
        frames: &FrameSeries,
        barbell: &TrackedObjectTrace,
        fps: u32,
    ) -> Result<MetricsRecord> {
        if fps == 0 {
            return Err(Error::InvalidInput("fps must be positive".into()));
        }
        if barbell.frame_count() != frames.frame_count() {
            return Err(Error::input_shape(
                "tracked object trace",
                format!("{} frames", frames.frame_count()),
                format!("{} frames", barbell.frame_count()),
            ));
        }

        let selection = select_side(frames);
        let side = selection.side;

        let limb = LimbTrace {
            side,
            hip: self.repair_joint(frames, side.hip())?,
            knee: self.repair_joint(frames, side.knee())?,
            ankle: self.repair_joint(frames, side.ankle())?,
        };
        let bar = self
            .sanitizer
            .sanitize("barbell", barbell.positions(), barbell.confidences())?;

        let knee_angle = joint_angles(
            limb.hip.view(),
            limb.knee.view(),
            limb.ankle.view(),
            self.config.geometry.epsilon,
        )?;
        let depth = depth_signal(limb.hip.view(), limb.knee.view())?;
        let depth = depth.to_vec();

        let windows = self.segmenter.segment(&depth);

        let reps: Vec<Rep> = windows
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let bottom_angle_degrees = knee_angle[w.bottom_frame];
                Rep {
                    index: i + 1,
                    bottom_frame: w.bottom_frame,
                    start_frame: w.start_frame,
                    end_frame: w.end_frame,
                    depth_quality: classify_depth(bottom_angle_degrees, &self.config.depth),
                    bottom_angle_degrees,
                }
            })
            .collect();

        let hip_heel_alignment = hip_heel_alignment(
            limb.hip.column(0),
            limb.ankle.column(0),
            self.config.alignment.tolerance_px,
        )?;

        let tempo_per_rep = rep_tempo(&windows, fps);

        let bar_x = bar.column(0);
        let bar_path_deviation: Vec<_> = reps
            .iter()
            .map(|rep| {
                let dev = bar_path_deviation(
                    bar_x,
                    rep.start_frame,
                    rep.end_frame,
                    self.config.bar_path.min_samples,
                );
                if !dev.is_defined() {
                    tracing::debug!("Bar path undefined for rep {}: {:?}", rep.index, dev);
                }
                dev
            })
            .collect();

        tracing::info!(
            frames = frames.frame_count(),
            reps = reps.len(),
            fps,
            side = ?side,
            "Squat analysis complete"
        );

        Ok(MetricsRecord {
            side,
            fps,
            total_reps: reps.len(),
            reps,
            knee_angle: knee_angle.to_vec(),
            depth,
            hip_heel_alignment,
            tempo_per_rep,
            bar_path_deviation,
        })
    }

    /// Analyze a decoded JSON request
    pub fn analyze_request(&self, request: &AnalysisRequest) -> Result<MetricsRecord> {
        let (frames, barbell) = request.to_inputs()?;
        self.analyze(&frames, &barbell, request.fps)
    }

    fn repair_joint(&self, frames: &FrameSeries, keypoint: Keypoint) -> Result<Array2<f64>> {
        self.sanitizer.sanitize(
            &format!("{keypoint:?}"),
            frames.joint_positions(keypoint),
            frames.joint_confidences(keypoint),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BarPathDeviation, DepthQuality};
    use squat_core::Side;
    use std::f64::consts::PI;

    const KNEE: [f64; 2] = [300.0, 400.0];
    const THIGH: f64 = 100.0;
    const SHIN: f64 = 100.0;

    /// Knee angle over time: standing (180°) with cosine dips to each bottom angle.
    fn knee_angle_profile(frames: usize, bottoms: &[(usize, f64)]) -> Vec<f64> {
        (0..frames)
            .map(|t| {
                bottoms
                    .iter()
                    .filter_map(|&(b, angle)| {
                        let d = t as f64 - b as f64;
                        (d.abs() < 30.0).then(|| {
                            let w = 0.5 * (1.0 + (PI * d / 30.0).cos());
                            180.0 - (180.0 - angle) * w
                        })
                    })
                    .fold(180.0, f64::min)
            })
            .collect()
    }

    /// Side-view squat: ankle straight below a fixed knee, hip swinging around the knee.
    fn synthetic_set(
        angles: &[f64],
        side: Side,
        confidence: f64,
    ) -> (FrameSeries, TrackedObjectTrace) {
        let n = angles.len();
        let mut xy = vec![[[f64::NAN; 2]; Keypoint::COUNT]; n];
        let mut conf = vec![[0.0; Keypoint::COUNT]; n];

        for (t, &deg) in angles.iter().enumerate() {
            let theta = deg.to_radians();
            let hip = [KNEE[0] - THIGH * theta.sin(), KNEE[1] + THIGH * theta.cos()];
            let ankle = [KNEE[0], KNEE[1] + SHIN];

            xy[t][side.hip().index()] = hip;
            xy[t][side.knee().index()] = KNEE;
            xy[t][side.ankle().index()] = ankle;
            for kp in side.joints() {
                conf[t][kp.index()] = confidence;
            }
        }

        let bar: Vec<[f64; 2]> = (0..n)
            .map(|t| [500.0 + 2.0 * (t as f64 * 0.3).sin(), 250.0])
            .collect();
        let bar_conf = vec![0.9; n];

        (
            FrameSeries::from_frames(&xy, &conf).unwrap(),
            TrackedObjectTrace::from_frames(&bar, &bar_conf).unwrap(),
        )
    }

    fn analyzer() -> SquatAnalyzer {
        SquatAnalyzer::new(AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_end_to_end_two_reps() {
        let angles = knee_angle_profile(120, &[(30, 80.0), (90, 85.0)]);
        let (frames, bar) = synthetic_set(&angles, Side::Right, 1.0);

        let record = analyzer().analyze(&frames, &bar, 30).unwrap();

        assert_eq!(record.total_reps, 2);
        assert_eq!(record.side, Side::Right);
        assert_eq!(record.reps[0].bottom_frame, 30);
        assert_eq!(record.reps[1].bottom_frame, 90);
        assert_eq!(record.reps[0].index, 1);
        assert_eq!(record.reps[1].index, 2);
        assert_eq!(record.tempo_per_rep, vec![2.0]);

        for (rep, expected) in record.reps.iter().zip([80.0, 85.0]) {
            assert!((rep.bottom_angle_degrees - expected).abs() < 1.0);
            assert_eq!(rep.depth_quality, DepthQuality::Below);
        }

        assert_eq!(record.bar_path_deviation.len(), 2);
        for dev in &record.bar_path_deviation {
            let std = dev.value().unwrap();
            assert!((0.0..5.0).contains(&std));
        }

        assert_eq!(record.knee_angle.len(), 120);
        assert_eq!(record.depth.len(), 120);
        assert_eq!(record.hip_heel_alignment.len(), 120);
        // standing: hip straight over the ankle
        assert!(record.hip_heel_alignment[0]);
        // bottom: hip ~100px behind the ankle
        assert!(!record.hip_heel_alignment[30]);
    }

    #[test]
    fn test_parallel_rep_with_lowered_floor() {
        let angles = knee_angle_profile(120, &[(30, 95.0), (90, 120.0)]);
        let (frames, bar) = synthetic_set(&angles, Side::Left, 0.9);

        let mut config = AnalysisConfig::default();
        config.segmentation.min_peak_height = -60.0;
        let record = SquatAnalyzer::new(config)
            .unwrap()
            .analyze(&frames, &bar, 30)
            .unwrap();

        assert_eq!(record.side, Side::Left);
        assert_eq!(record.total_reps, 2);
        assert_eq!(record.reps[0].depth_quality, DepthQuality::Parallel);
        assert_eq!(record.reps[1].depth_quality, DepthQuality::Partial);
    }

    #[test]
    fn test_standing_only_yields_no_reps() {
        let angles = vec![180.0; 90];
        let (frames, bar) = synthetic_set(&angles, Side::Right, 1.0);

        let record = analyzer().analyze(&frames, &bar, 30).unwrap();
        assert_eq!(record.total_reps, 0);
        assert!(record.reps.is_empty());
        assert!(record.tempo_per_rep.is_empty());
        assert!(record.bar_path_deviation.is_empty());
    }

    #[test]
    fn test_dropped_frames_are_repaired() {
        let angles = knee_angle_profile(120, &[(30, 80.0), (90, 80.0)]);
        let (frames, bar) = synthetic_set(&angles, Side::Right, 1.0);

        let mut xy = frames.positions().clone();
        let mut conf = frames.confidences().clone();
        for t in [10usize, 11, 60, 100] {
            let hip = Side::Right.hip().index();
            xy[[t, hip, 0]] = f64::NAN;
            xy[[t, hip, 1]] = f64::NAN;
            conf[[t, hip]] = 0.0;
        }
        let frames = FrameSeries::new(xy, conf).unwrap();

        let record = analyzer().analyze(&frames, &bar, 30).unwrap();
        assert_eq!(record.total_reps, 2);
        assert!(record.knee_angle.iter().all(|a| a.is_finite()));
    }

    #[test]
    fn test_missing_bar_samples_make_rep_undefined() {
        let angles = knee_angle_profile(120, &[(30, 80.0), (90, 80.0)]);
        let (frames, _) = synthetic_set(&angles, Side::Right, 1.0);

        // the bar is only seen in the first half; the tail is held at the last sighting
        let bar_xy: Vec<[f64; 2]> = (0..120)
            .map(|t| if t < 60 { [500.0, 250.0] } else { [f64::NAN, f64::NAN] })
            .collect();
        let bar_conf: Vec<f64> = (0..120).map(|t| if t < 60 { 0.9 } else { 0.0 }).collect();
        let bar = TrackedObjectTrace::from_frames(&bar_xy, &bar_conf).unwrap();

        let record = analyzer().analyze(&frames, &bar, 30).unwrap();
        let held = record.bar_path_deviation[1].value().unwrap();
        assert!(held.abs() < 1e-9);

        let mut config = AnalysisConfig::default();
        config.bar_path.min_samples = 31;
        let record = SquatAnalyzer::new(config)
            .unwrap()
            .analyze(&frames, &bar, 30)
            .unwrap();
        assert!(record
            .bar_path_deviation
            .iter()
            .all(|d| matches!(d, BarPathDeviation::Undefined { finite_samples: 30 })));
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let angles = knee_angle_profile(60, &[]);
        let (frames, _) = synthetic_set(&angles, Side::Right, 1.0);
        let (_, bar) = synthetic_set(&angles[..50], Side::Right, 1.0);

        assert!(matches!(
            analyzer().analyze(&frames, &bar, 30),
            Err(Error::InputShape { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_fps() {
        let angles = knee_angle_profile(60, &[]);
        let (frames, bar) = synthetic_set(&angles, Side::Right, 1.0);
        assert!(matches!(
            analyzer().analyze(&frames, &bar, 0),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_fully_occluded_leg_is_fatal() {
        let angles = knee_angle_profile(60, &[(30, 80.0)]);
        let (frames, bar) = synthetic_set(&angles, Side::Right, 0.2);

        assert!(matches!(
            analyzer().analyze(&frames, &bar, 30),
            Err(Error::InsufficientValidSamples { .. })
        ));
    }

    #[test]
    fn test_deterministic() {
        let angles = knee_angle_profile(120, &[(30, 80.0), (90, 85.0)]);
        let (frames, bar) = synthetic_set(&angles, Side::Right, 1.0);
        let analyzer = analyzer();

        let first = analyzer.analyze(&frames, &bar, 30).unwrap();
        let second = analyzer.analyze(&frames, &bar, 30).unwrap();
        assert_eq!(first, second);
    }
}
