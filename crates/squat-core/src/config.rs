//! Analysis configuration.
//!
//! Every tunable constant of the pipeline lives here and is passed in by the
//! caller, so a deployment recording at a different frame rate can widen the
//! smoothing window or rep spacing without touching the algorithms.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry::DEFAULT_ANGLE_EPSILON;

/// Complete analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Sample validity rules
    pub validity: ValidityConfig,

    /// Savitzky-Golay smoothing parameters
    pub smoothing: SmoothingConfig,

    /// Joint-angle computation
    pub geometry: GeometryConfig,

    /// Peak detection and rep windowing
    pub segmentation: SegmentationConfig,

    /// Knee-angle bands for depth quality
    pub depth: DepthBands,

    /// Bar-path dispersion
    pub bar_path: BarPathConfig,

    /// Hip-over-heel alignment
    pub alignment: AlignmentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidityConfig {
    /// A sample is valid when its confidence is strictly above this value
    pub confidence_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Window length in frames (odd)
    pub window_length: usize,

    /// Polynomial order, below the window length
    pub poly_order: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Guard added to the limb-vector magnitude product
    pub epsilon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Minimum depth value for a peak to count as a rep bottom (inclusive)
    pub min_peak_height: f64,

    /// Minimum spacing between accepted rep bottoms (frames)
    pub min_peak_distance: usize,

    /// Half-width of the window around each bottom (frames)
    pub window_radius: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthBands {
    /// Bottom knee angles below this are "below parallel" (degrees)
    pub below_parallel_deg: f64,

    /// Bottom knee angles below this (and not below parallel) are "parallel" (degrees)
    pub parallel_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarPathConfig {
    /// Minimum finite horizontal samples in a rep window
    pub min_samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Maximum horizontal hip-ankle offset still counted as aligned (pixels)
    pub tolerance_px: f64,

    /// Fraction of aligned frames for a rep to count as aligned
    pub rep_aligned_fraction: f64,
}

impl Default for ValidityConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window_length: 9, // tuned for 30 fps
            poly_order: 2,
        }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_ANGLE_EPSILON,
        }
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_peak_height: 0.0,
            min_peak_distance: 30,
            window_radius: 15,
        }
    }
}

impl Default for DepthBands {
    fn default() -> Self {
        Self {
            below_parallel_deg: 90.0,
            parallel_deg: 100.0,
        }
    }
}

impl Default for BarPathConfig {
    fn default() -> Self {
        Self { min_samples: 15 }
    }
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            tolerance_px: 50.0,
            rep_aligned_fraction: 0.5,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from file, overridable by `SQUAT_` environment variables
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(Self::environment())
            .build()?;

        let parsed: Self = settings.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Load from environment variables, e.g. `SQUAT_SEGMENTATION__MIN_PEAK_DISTANCE=60`
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()?;

        let parsed: Self = settings.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("SQUAT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Reject parameter combinations the algorithms cannot honour
    pub fn validate(&self) -> Result<()> {
        let threshold = self.validity.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::Config(format!(
                "confidence_threshold must be within [0, 1], got {threshold}"
            )));
        }

        let SmoothingConfig {
            window_length,
            poly_order,
        } = self.smoothing;
        if window_length < 3 || window_length % 2 == 0 {
            return Err(Error::Config(format!(
                "smoothing window_length must be odd and at least 3, got {window_length}"
            )));
        }
        if poly_order >= window_length {
            return Err(Error::Config(format!(
                "smoothing poly_order ({poly_order}) must be below window_length ({window_length})"
            )));
        }

        if !(self.geometry.epsilon > 0.0) {
            return Err(Error::Config(format!(
                "geometry epsilon must be positive, got {}",
                self.geometry.epsilon
            )));
        }

        if self.segmentation.min_peak_distance == 0 {
            return Err(Error::Config("min_peak_distance must be at least 1".into()));
        }

        if !(self.depth.parallel_deg > self.depth.below_parallel_deg) {
            return Err(Error::Config(format!(
                "parallel_deg ({}) must exceed below_parallel_deg ({})",
                self.depth.parallel_deg, self.depth.below_parallel_deg
            )));
        }

        if !(self.alignment.tolerance_px >= 0.0) {
            return Err(Error::Config(format!(
                "alignment tolerance must be non-negative, got {}",
                self.alignment.tolerance_px
            )));
        }
        if !(0.0..=1.0).contains(&self.alignment.rep_aligned_fraction) {
            return Err(Error::Config(format!(
                "rep_aligned_fraction must be within [0, 1], got {}",
                self.alignment.rep_aligned_fraction
            )));
        }

        Ok(())
    }
}
