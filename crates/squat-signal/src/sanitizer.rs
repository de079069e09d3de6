//! Repair pipeline for noisy per-frame detections.
//!
//! Pose and object detectors drop out on individual frames (occlusion, motion
//! blur, subject leaving the crop). Each coordinate axis is repaired
//! independently:
//!
//! 1. **Validity**: a sample counts only when its confidence clears the
//!    threshold and the coordinate is finite
//! 2. **Interpolation**: invalid samples are linearly interpolated from the
//!    nearest valid frames, holding the edge value before the first and after
//!    the last valid frame
//! 3. **Smoothing**: a Savitzky-Golay filter removes frame-to-frame jitter

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use squat_core::{AnalysisConfig, Error, Result};

use crate::filtering::SavitzkyGolayFilter;

/// Per-frame validity: confidence strictly above `threshold` and both coordinates finite.
pub fn validity_mask(
    positions: ArrayView2<'_, f64>,
    confidences: ArrayView1<'_, f64>,
    threshold: f64,
) -> Array1<bool> {
    Zip::from(positions.rows())
        .and(confidences)
        .map_collect(|xy, &conf| conf > threshold && xy.iter().all(|v| v.is_finite()))
}

/// Replace samples flagged invalid by linear interpolation between valid neighbours.
///
/// Returns `None` when no sample is valid or the mask length differs from `values`.
pub fn interpolate_invalid(values: &[f64], valid: &[bool]) -> Option<Vec<f64>> {
    if values.len() != valid.len() {
        return None;
    }
    let anchors: Vec<usize> = (0..values.len()).filter(|&i| valid[i]).collect();
    let (&first, &last) = (anchors.first()?, anchors.last()?);

    let mut output = values.to_vec();
    let mut next = 0usize;

    for (i, out) in output.iter_mut().enumerate() {
        if valid[i] {
            continue;
        }
        if i < first {
            *out = values[first];
            continue;
        }
        if i > last {
            *out = values[last];
            continue;
        }

        while anchors[next + 1] < i {
            next += 1;
        }
        let (i0, i1) = (anchors[next], anchors[next + 1]);
        let alpha = (i - i0) as f64 / (i1 - i0) as f64;
        *out = values[i0] + alpha * (values[i1] - values[i0]);
    }

    Some(output)
}

/// Trace sanitizer implementing the complete repair pipeline
#[derive(Debug, Clone)]
pub struct TraceSanitizer {
    /// Samples at or below this confidence are treated as missing
    pub confidence_threshold: f64,

    filter: SavitzkyGolayFilter,
}

impl TraceSanitizer {
    pub fn new(confidence_threshold: f64, filter: SavitzkyGolayFilter) -> Self {
        Self {
            confidence_threshold,
            filter,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            confidence_threshold: config.validity.confidence_threshold,
            filter: SavitzkyGolayFilter::new(
                config.smoothing.window_length,
                config.smoothing.poly_order,
            )?,
        })
    }

    /// Configure the confidence threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn window_size(&self) -> usize {
        self.filter.window_size()
    }

    /// Repair and smooth a `(frames, 2)` position series.
    ///
    /// `series` names the trace in errors and logs. Sequences shorter than the
    /// smoothing window come back unmodified.
    pub fn sanitize(
        &self,
        series: &str,
        positions: ArrayView2<'_, f64>,
        confidences: ArrayView1<'_, f64>,
    ) -> Result<Array2<f64>> {
        let (frames, dims) = positions.dim();
        if dims != 2 {
            return Err(Error::input_shape(
                format!("{series} positions"),
                format!("[{frames}, 2]"),
                format!("{:?}", positions.shape()),
            ));
        }
        if confidences.len() != frames {
            return Err(Error::input_shape(
                format!("{series} confidences"),
                format!("{frames} frames"),
                format!("{} frames", confidences.len()),
            ));
        }

        if frames < self.filter.window_size() {
            tracing::warn!(
                "Skipping smoothing of {}: {} frames is shorter than the {}-frame window",
                series,
                frames,
                self.filter.window_size()
            );
            return Ok(positions.to_owned());
        }

        let mask = validity_mask(positions, confidences, self.confidence_threshold);
        let mut output = positions.to_owned();

        for mut axis in output.axis_iter_mut(Axis(1)) {
            let values = axis.to_vec();
            let good: Vec<bool> = values
                .iter()
                .zip(mask.iter())
                .map(|(v, &ok)| ok && v.is_finite())
                .collect();

            let repaired = interpolate_invalid(&values, &good).ok_or_else(|| {
                Error::InsufficientValidSamples {
                    series: series.to_string(),
                    len: frames,
                }
            })?;

            let smoothed = self.filter.filter_signal(&repaired);
            axis.assign(&Array1::from(smoothed));
        }

        Ok(output)
    }
}
