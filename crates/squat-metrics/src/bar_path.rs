//! Bar-path stability per rep.

use ndarray::ArrayView1;

use crate::record::BarPathDeviation;

/// Population standard deviation of the bar's horizontal position over
/// `[start, end)`, ignoring non-finite samples.
///
/// Windows reaching past the trace are clipped.
pub fn bar_path_deviation(
    bar_x: ArrayView1<'_, f64>,
    start: usize,
    end: usize,
    min_samples: usize,
) -> BarPathDeviation {
    let end = end.min(bar_x.len());
    let start = start.min(end);

    let samples: Vec<f64> = bar_x
        .slice(ndarray::s![start..end])
        .iter()
        .copied()
        .filter(|x| x.is_finite())
        .collect();

    if samples.is_empty() || samples.len() < min_samples {
        return BarPathDeviation::Undefined {
            finite_samples: samples.len(),
        };
    }

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

    BarPathDeviation::Defined {
        std_px: variance.sqrt(),
    }
}
