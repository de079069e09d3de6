//! Savitzky-Golay smoothing for per-frame coordinate traces.

use nalgebra::DMatrix;
use squat_core::{Error, Result};

/// Savitzky-Golay filter for smoothing while preserving peaks
#[derive(Debug, Clone)]
pub struct SavitzkyGolayFilter {
    window_size: usize,
    poly_order: usize,
    /// Row `k` holds the weights that evaluate the local fit at window offset `k`
    weights: DMatrix<f64>,
}

impl SavitzkyGolayFilter {
    /// Create new Savitzky-Golay filter
    ///
    /// # Arguments
    /// * `window_size` - Must be odd and > poly_order
    /// * `poly_order` - Polynomial order (typically 2 or 3)
    pub fn new(window_size: usize, poly_order: usize) -> Result<Self> {
        if window_size % 2 == 0 {
            return Err(Error::Config(format!(
                "Savitzky-Golay window must be odd, got {window_size}"
            )));
        }
        if window_size <= poly_order {
            return Err(Error::Config(format!(
                "Savitzky-Golay window ({window_size}) must be larger than polynomial order ({poly_order})"
            )));
        }

        let weights = Self::compute_weights(window_size, poly_order)?;

        Ok(Self {
            window_size,
            poly_order,
            weights,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn poly_order(&self) -> usize {
        self.poly_order
    }

    /// Least-squares projection `V (VᵀV)⁻¹ Vᵀ` over the window offsets.
    fn compute_weights(window_size: usize, poly_order: usize) -> Result<DMatrix<f64>> {
        let half = (window_size / 2) as f64;
        let vandermonde = DMatrix::from_fn(window_size, poly_order + 1, |i, j| {
            (i as f64 - half).powi(j as i32)
        });

        let normal = vandermonde.transpose() * &vandermonde;
        let inverse = normal.try_inverse().ok_or_else(|| {
            Error::Config(format!(
                "Singular Savitzky-Golay design for window {window_size}, order {poly_order}"
            ))
        })?;

        Ok(&vandermonde * inverse * vandermonde.transpose())
    }

    /// Weights applied at the window centre
    pub fn coefficients(&self) -> Vec<f64> {
        self.weights.row(self.window_size / 2).iter().copied().collect()
    }

    /// Filter a signal using Savitzky-Golay smoothing.
    ///
    /// Edge samples are taken from the polynomial fitted to the first and last
    /// full window. Signals shorter than the window are returned unchanged.
    pub fn filter_signal(&self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        if n < self.window_size {
            return signal.to_vec();
        }

        let half = self.window_size / 2;
        let mut result = Vec::with_capacity(n);

        let head = &signal[..self.window_size];
        for k in 0..half {
            result.push(self.evaluate(k, head));
        }

        for i in half..(n - half) {
            result.push(self.evaluate(half, &signal[i - half..=i + half]));
        }

        let tail = &signal[n - self.window_size..];
        for k in (half + 1)..self.window_size {
            result.push(self.evaluate(k, tail));
        }

        result
    }

    fn evaluate(&self, offset: usize, window: &[f64]) -> f64 {
        self.weights
            .row(offset)
            .iter()
            .zip(window)
            .map(|(w, x)| w * x)
            .sum()
    }
}
