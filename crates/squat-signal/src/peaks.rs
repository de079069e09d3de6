//! Local-maximum detection with height and spacing constraints.

/// Spacing-constrained peak finder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakFinder {
    /// Peaks below this value are discarded (inclusive floor)
    pub min_height: f64,

    /// Minimum index distance between two accepted peaks
    pub min_distance: usize,
}

impl Default for PeakFinder {
    fn default() -> Self {
        Self {
            min_height: 0.0,
            min_distance: 30,
        }
    }
}

impl PeakFinder {
    pub fn new(min_height: f64, min_distance: usize) -> Self {
        Self {
            min_height,
            min_distance,
        }
    }

    /// Indices of accepted peaks in ascending order.
    ///
    /// When two candidates are closer than `min_distance`, the higher one
    /// survives; equal heights keep the later index.
    pub fn find(&self, signal: &[f64]) -> Vec<usize> {
        let peaks: Vec<usize> = local_maxima(signal)
            .into_iter()
            .filter(|&p| signal[p] >= self.min_height)
            .collect();

        if self.min_distance <= 1 || peaks.len() < 2 {
            return peaks;
        }

        let mut keep = vec![true; peaks.len()];

        // Stable sort: among equal heights the later peak comes last and is visited first
        let mut priority: Vec<usize> = (0..peaks.len()).collect();
        priority.sort_by(|&a, &b| {
            signal[peaks[a]]
                .partial_cmp(&signal[peaks[b]])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for &j in priority.iter().rev() {
            if !keep[j] {
                continue;
            }

            let mut k = j;
            while k > 0 && peaks[j] - peaks[k - 1] < self.min_distance {
                keep[k - 1] = false;
                k -= 1;
            }

            let mut k = j + 1;
            while k < peaks.len() && peaks[k] - peaks[j] < self.min_distance {
                keep[k] = false;
                k += 1;
            }
        }

        peaks
            .into_iter()
            .zip(keep)
            .filter_map(|(p, kept)| kept.then_some(p))
            .collect()
    }
}

/// Strict local maxima; flat tops collapse to their middle sample.
///
/// The first and last samples are never maxima and comparisons involving a
/// non-finite sample never succeed.
pub fn local_maxima(signal: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if signal.len() < 3 {
        return maxima;
    }

    let i_max = signal.len() - 1;
    let mut i = 1;

    while i < i_max {
        if signal[i - 1] < signal[i] {
            let mut ahead = i + 1;
            while ahead < i_max && signal[ahead] == signal[i] {
                ahead += 1;
            }

            if signal[ahead] < signal[i] {
                maxima.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }

    maxima
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump_signal(len: usize, centres: &[(usize, f64)]) -> Vec<f64> {
        (0..len)
            .map(|i| {
                centres
                    .iter()
                    .map(|&(c, h)| h * (-((i as f64 - c as f64).powi(2)) / 50.0).exp())
                    .sum::<f64>()
                    - 1.0
            })
            .collect()
    }

    #[test]
    fn test_two_separated_peaks() {
        let signal = bump_signal(120, &[(30, 10.0), (90, 10.0)]);
        let peaks = PeakFinder::default().find(&signal);
        assert_eq!(peaks, vec![30, 90]);
    }

    #[test]
    fn test_spacing_keeps_highest() {
        let mut signal = vec![0.0; 60];
        signal[20] = 5.0;
        signal[30] = 8.0;
        signal[45] = 4.0;

        let peaks = PeakFinder::new(0.0, 30).find(&signal);
        assert_eq!(peaks, vec![30]);

        let peaks = PeakFinder::new(0.0, 15).find(&signal);
        assert_eq!(peaks, vec![30, 45]);
    }

    #[test]
    fn test_equal_heights_keep_later() {
        let mut signal = vec![0.0; 40];
        signal[10] = 3.0;
        signal[20] = 3.0;

        assert_eq!(PeakFinder::new(0.0, 30).find(&signal), vec![20]);
    }

    #[test]
    fn test_height_floor_inclusive() {
        let signal = [-1.0, 0.0, -1.0, 2.0, -1.0, -0.5, -1.0];
        let peaks = PeakFinder::new(0.0, 1).find(&signal);
        assert_eq!(peaks, vec![1, 3]);
    }

    #[test]
    fn test_plateau_and_edges() {
        let signal = [5.0, 1.0, 3.0, 3.0, 3.0, 3.0, 1.0, 2.0];
        assert_eq!(local_maxima(&signal), vec![3]);

        let rising = [0.0, 1.0, 2.0, 3.0];
        assert!(local_maxima(&rising).is_empty());
    }

    #[test]
    fn test_nan_never_peak() {
        let signal = [0.0, 1.0, f64::NAN, 1.0, 0.0];
        assert!(local_maxima(&signal).is_empty());
    }

    #[test]
    fn test_flat_signal_has_no_peaks() {
        assert!(PeakFinder::default().find(&[2.0; 50]).is_empty());
        assert!(PeakFinder::default().find(&[]).is_empty());
    }
}
