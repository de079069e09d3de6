//! Hip-over-heel alignment.

use ndarray::{ArrayView1, Zip};
use squat_core::{Error, Result};

/// Per-frame check that the hip sits within `tolerance` pixels horizontally of the ankle.
pub fn hip_heel_alignment(
    hip_x: ArrayView1<'_, f64>,
    ankle_x: ArrayView1<'_, f64>,
    tolerance: f64,
) -> Result<Vec<bool>> {
    if hip_x.len() != ankle_x.len() {
        return Err(Error::input_shape(
            "alignment ankle trace",
            format!("{} frames", hip_x.len()),
            format!("{} frames", ankle_x.len()),
        ));
    }

    Ok(Zip::from(hip_x)
        .and(ankle_x)
        .map_collect(|&hip, &ankle| (hip - ankle).abs() <= tolerance)
        .to_vec())
}

/// Share of aligned frames within `[start, end)`; `None` for an empty window.
pub fn aligned_fraction(alignment: &[bool], start: usize, end: usize) -> Option<f64> {
    let end = end.min(alignment.len());
    let window = alignment.get(start..end)?;
    if window.is_empty() {
        return None;
    }
    Some(window.iter().filter(|&&a| a).count() as f64 / window.len() as f64)
}
