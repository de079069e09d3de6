//! Fundamental types for the squat analysis system.

use ndarray::{s, Array1, Array2, Array3, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 17-joint skeletal keypoint definition (COCO format)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Keypoint {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl Keypoint {
    pub const COUNT: usize = 17;

    pub fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEye),
            2 => Some(Self::RightEye),
            3 => Some(Self::LeftEar),
            4 => Some(Self::RightEar),
            5 => Some(Self::LeftShoulder),
            6 => Some(Self::RightShoulder),
            7 => Some(Self::LeftElbow),
            8 => Some(Self::RightElbow),
            9 => Some(Self::LeftWrist),
            10 => Some(Self::RightWrist),
            11 => Some(Self::LeftHip),
            12 => Some(Self::RightHip),
            13 => Some(Self::LeftKnee),
            14 => Some(Self::RightKnee),
            15 => Some(Self::LeftAnkle),
            16 => Some(Self::RightAnkle),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Body side whose leg is analysed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn hip(self) -> Keypoint {
        match self {
            Side::Left => Keypoint::LeftHip,
            Side::Right => Keypoint::RightHip,
        }
    }

    pub fn knee(self) -> Keypoint {
        match self {
            Side::Left => Keypoint::LeftKnee,
            Side::Right => Keypoint::RightKnee,
        }
    }

    pub fn ankle(self) -> Keypoint {
        match self {
            Side::Left => Keypoint::LeftAnkle,
            Side::Right => Keypoint::RightAnkle,
        }
    }

    /// Hip, knee and ankle, in that order
    pub fn joints(self) -> [Keypoint; 3] {
        [self.hip(), self.knee(), self.ankle()]
    }
}

/// Per-frame 2D positions and confidences for the full 17-joint layout.
///
/// Positions have shape `(frames, 17, 2)` in image pixels (x right, y down),
/// confidences have shape `(frames, 17)`. Undetected joints carry non-finite
/// coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrameSeries")]
pub struct FrameSeries {
    positions: Array3<f64>,
    confidences: Array2<f64>,
}

#[derive(Deserialize)]
struct RawFrameSeries {
    positions: Array3<f64>,
    confidences: Array2<f64>,
}

impl TryFrom<RawFrameSeries> for FrameSeries {
    type Error = Error;

    fn try_from(raw: RawFrameSeries) -> Result<Self> {
        Self::new(raw.positions, raw.confidences)
    }
}

impl FrameSeries {
    pub fn new(positions: Array3<f64>, confidences: Array2<f64>) -> Result<Self> {
        let (frames, joints, dims) = positions.dim();
        if joints != Keypoint::COUNT || dims != 2 {
            return Err(Error::input_shape(
                "keypoint positions",
                format!("[{frames}, {}, 2]", Keypoint::COUNT),
                format!("{:?}", positions.shape()),
            ));
        }
        if confidences.dim() != (frames, Keypoint::COUNT) {
            return Err(Error::input_shape(
                "keypoint confidences",
                format!("[{frames}, {}]", Keypoint::COUNT),
                format!("{:?}", confidences.shape()),
            ));
        }

        Ok(Self {
            positions,
            confidences,
        })
    }

    /// Build from per-frame fixed-size arrays
    pub fn from_frames(
        positions: &[[[f64; 2]; Keypoint::COUNT]],
        confidences: &[[f64; Keypoint::COUNT]],
    ) -> Result<Self> {
        if positions.len() != confidences.len() {
            return Err(Error::input_shape(
                "keypoint confidences",
                format!("{} frames", positions.len()),
                format!("{} frames", confidences.len()),
            ));
        }

        let frames = positions.len();
        let xy = Array3::from_shape_fn((frames, Keypoint::COUNT, 2), |(f, j, d)| {
            positions[f][j][d]
        });
        let conf = Array2::from_shape_fn((frames, Keypoint::COUNT), |(f, j)| confidences[f][j]);

        Self::new(xy, conf)
    }

    pub fn frame_count(&self) -> usize {
        self.positions.dim().0
    }

    pub fn positions(&self) -> &Array3<f64> {
        &self.positions
    }

    pub fn confidences(&self) -> &Array2<f64> {
        &self.confidences
    }

    /// `(frames, 2)` view of one joint's trajectory
    pub fn joint_positions(&self, keypoint: Keypoint) -> ArrayView2<'_, f64> {
        self.positions.slice(s![.., keypoint.index(), ..])
    }

    pub fn joint_confidences(&self, keypoint: Keypoint) -> ArrayView1<'_, f64> {
        self.confidences.column(keypoint.index())
    }
}

/// Per-frame position and confidence of one tracked implement (the barbell).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrackedObjectTrace")]
pub struct TrackedObjectTrace {
    positions: Array2<f64>,
    confidences: Array1<f64>,
}

#[derive(Deserialize)]
struct RawTrackedObjectTrace {
    positions: Array2<f64>,
    confidences: Array1<f64>,
}

impl TryFrom<RawTrackedObjectTrace> for TrackedObjectTrace {
    type Error = Error;

    fn try_from(raw: RawTrackedObjectTrace) -> Result<Self> {
        Self::new(raw.positions, raw.confidences)
    }
}

impl TrackedObjectTrace {
    pub fn new(positions: Array2<f64>, confidences: Array1<f64>) -> Result<Self> {
        let (frames, dims) = positions.dim();
        if dims != 2 {
            return Err(Error::input_shape(
                "tracked object positions",
                format!("[{frames}, 2]"),
                format!("{:?}", positions.shape()),
            ));
        }
        if confidences.len() != frames {
            return Err(Error::input_shape(
                "tracked object confidences",
                format!("{frames} frames"),
                format!("{} frames", confidences.len()),
            ));
        }

        Ok(Self {
            positions,
            confidences,
        })
    }

    pub fn from_frames(positions: &[[f64; 2]], confidences: &[f64]) -> Result<Self> {
        let xy = Array2::from_shape_fn((positions.len(), 2), |(f, d)| positions[f][d]);
        Self::new(xy, Array1::from(confidences.to_vec()))
    }

    pub fn frame_count(&self) -> usize {
        self.positions.dim().0
    }

    pub fn positions(&self) -> ArrayView2<'_, f64> {
        self.positions.view()
    }

    pub fn confidences(&self) -> ArrayView1<'_, f64> {
        self.confidences.view()
    }
}

/// Repaired hip, knee and ankle trajectories of the analysed side, each `(frames, 2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LimbTrace {
    pub side: Side,
    pub hip: Array2<f64>,
    pub knee: Array2<f64>,
    pub ankle: Array2<f64>,
}

impl LimbTrace {
    pub fn frame_count(&self) -> usize {
        self.hip.nrows()
    }
}
