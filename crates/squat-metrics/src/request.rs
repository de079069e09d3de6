//! JSON request accepted from the pose and object-detection collaborators.

use serde::{Deserialize, Serialize};
use squat_core::{Error, FrameSeries, Keypoint, Result, TrackedObjectTrace};

fn default_fps() -> u32 {
    30
}

/// Decoded per-frame detector output.
///
/// JSON has no NaN, so undetected coordinates travel as `null` and decode as
/// non-finite placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// `[frame][joint] -> [x, y]`, 17 joints per frame
    pub xy: Vec<Vec<[Option<f64>; 2]>>,
    /// `[frame][joint] -> confidence`
    pub conf: Vec<Vec<Option<f64>>>,
    /// `[frame] -> [x, y]` of the tracked bar
    pub barbell_xy: Vec<[Option<f64>; 2]>,
    /// `[frame] -> confidence` of the tracked bar
    pub barbell_conf: Vec<Option<f64>>,
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl AnalysisRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert into validated input series
    pub fn to_inputs(&self) -> Result<(FrameSeries, TrackedObjectTrace)> {
        if self.conf.len() != self.xy.len() {
            return Err(Error::input_shape(
                "conf",
                format!("{} frames", self.xy.len()),
                format!("{} frames", self.conf.len()),
            ));
        }

        let mut positions = Vec::with_capacity(self.xy.len());
        let mut confidences = Vec::with_capacity(self.conf.len());

        for (frame, (joints, conf)) in self.xy.iter().zip(&self.conf).enumerate() {
            if joints.len() != Keypoint::COUNT || conf.len() != Keypoint::COUNT {
                return Err(Error::input_shape(
                    format!("frame {frame}"),
                    format!("{} joints", Keypoint::COUNT),
                    format!("{} positions, {} confidences", joints.len(), conf.len()),
                ));
            }

            let mut xy = [[f64::NAN; 2]; Keypoint::COUNT];
            let mut c = [f64::NAN; Keypoint::COUNT];
            for j in 0..Keypoint::COUNT {
                xy[j] = decode_point(joints[j]);
                c[j] = conf[j].unwrap_or(f64::NAN);
            }
            positions.push(xy);
            confidences.push(c);
        }

        let frames = FrameSeries::from_frames(&positions, &confidences)?;

        let bar_xy: Vec<[f64; 2]> = self.barbell_xy.iter().copied().map(decode_point).collect();
        let bar_conf: Vec<f64> = self
            .barbell_conf
            .iter()
            .map(|c| c.unwrap_or(0.0))
            .collect();
        let barbell = TrackedObjectTrace::from_frames(&bar_xy, &bar_conf)?;

        Ok((frames, barbell))
    }
}

fn decode_point(point: [Option<f64>; 2]) -> [f64; 2] {
    point.map(|v| v.unwrap_or(f64::NAN))
}
