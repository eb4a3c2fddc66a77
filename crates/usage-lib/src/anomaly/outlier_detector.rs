//! Usage outlier detection
//!
//! Scores every sample with an isolation forest fitted on the usage values
//! of the series and flags the highest-scoring `contamination` fraction.
//! Trees are grown from a seeded RNG, so a fixed seed gives identical flags.

use crate::error::{AnalyticsError, Result};
use crate::models::{AnomalyFlag, SeriesStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Minimum samples required for outlier detection
pub const MIN_SAMPLES_FOR_DETECTION: usize = 10;

/// Expected fraction of anomalous samples
pub const DEFAULT_CONTAMINATION: f64 = 0.05;

/// Number of isolation trees
pub const DEFAULT_TREES: usize = 100;

/// Upper bound on the sub-sample each tree is grown from
pub const DEFAULT_MAX_SAMPLES: usize = 256;

pub const DEFAULT_SEED: u64 = 42;

/// Euler-Mascheroni constant
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Flags statistical outliers in the usage values of a series
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    /// Fraction of samples expected to be outliers, in (0, 0.5]
    pub contamination: f64,
    pub n_trees: usize,
    pub max_samples: usize,
    pub seed: u64,
}

impl AnomalyDetector {
    pub fn new(contamination: f64) -> Self {
        Self {
            contamination,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees.max(1);
        self
    }

    /// Score and flag every sample, in series order
    pub fn flag_anomalies(&self, series: &SeriesStore) -> Result<Vec<AnomalyFlag>> {
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(AnalyticsError::InvalidContamination(self.contamination));
        }
        if series.len() < MIN_SAMPLES_FOR_DETECTION {
            return Err(AnalyticsError::InsufficientData {
                required: MIN_SAMPLES_FOR_DETECTION,
                actual: series.len(),
            });
        }

        let values = series.usage_values();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let forest = IsolationForest::fit(&values, self.n_trees, self.max_samples, &mut rng);

        let scores: Vec<f64> = values.iter().map(|v| forest.score(*v)).collect();
        let threshold = quantile(&scores, 1.0 - self.contamination);

        Ok(scores
            .into_iter()
            .enumerate()
            .map(|(index, score)| AnomalyFlag {
                index,
                score,
                is_anomaly: score > threshold,
            })
            .collect())
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self {
            contamination: DEFAULT_CONTAMINATION,
            n_trees: DEFAULT_TREES,
            max_samples: DEFAULT_MAX_SAMPLES,
            seed: DEFAULT_SEED,
        }
    }
}

/// Flag outliers with default forest settings
pub fn flag_anomalies(series: &SeriesStore, contamination: f64) -> Result<Vec<AnomalyFlag>> {
    AnomalyDetector::new(contamination).flag_anomalies(series)
}

/// Ensemble of random isolation trees over one-dimensional values
struct IsolationForest {
    trees: Vec<IsolationNode>,
    /// Average path length of a tree grown from `sample_size` points
    normalizer: f64,
}

enum IsolationNode {
    Leaf {
        size: usize,
    },
    Split {
        threshold: f64,
        left: Box<IsolationNode>,
        right: Box<IsolationNode>,
    },
}

impl IsolationForest {
    fn fit(values: &[f64], n_trees: usize, max_samples: usize, rng: &mut StdRng) -> Self {
        let sample_size = max_samples.min(values.len()).max(2);
        let height_limit = (sample_size as f64).log2().ceil() as usize;

        let trees = (0..n_trees.max(1))
            .map(|_| {
                let subsample: Vec<f64> =
                    rand::seq::index::sample(&mut *rng, values.len(), sample_size.min(values.len()))
                        .iter()
                        .map(|i| values[i])
                        .collect();
                grow(subsample, 0, height_limit, rng)
            })
            .collect();

        Self {
            trees,
            normalizer: average_path_length(sample_size),
        }
    }

    /// Anomaly score in (0, 1]; values near 1 isolate quickly
    fn score(&self, value: f64) -> f64 {
        let mean_depth = self
            .trees
            .iter()
            .map(|tree| path_length(tree, value, 0))
            .sum::<f64>()
            / self.trees.len() as f64;

        2f64.powf(-mean_depth / self.normalizer)
    }
}

fn grow(values: Vec<f64>, depth: usize, height_limit: usize, rng: &mut StdRng) -> IsolationNode {
    if depth >= height_limit || values.len() <= 1 {
        return IsolationNode::Leaf { size: values.len() };
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max - min < f64::EPSILON {
        return IsolationNode::Leaf { size: values.len() };
    }

    let threshold = rng.gen_range(min..max);
    let (left, right): (Vec<f64>, Vec<f64>) = values.into_iter().partition(|v| *v < threshold);

    IsolationNode::Split {
        threshold,
        left: Box::new(grow(left, depth + 1, height_limit, rng)),
        right: Box::new(grow(right, depth + 1, height_limit, rng)),
    }
}

fn path_length(node: &IsolationNode, value: f64, depth: usize) -> f64 {
    match node {
        IsolationNode::Leaf { size } => depth as f64 + average_path_length(*size),
        IsolationNode::Split {
            threshold,
            left,
            right,
        } => {
            if value < *threshold {
                path_length(left, value, depth + 1)
            } else {
                path_length(right, value, depth + 1)
            }
        }
    }
}

/// Average path length of an unsuccessful binary search tree lookup
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linearly interpolated quantile, `q` in [0, 1]
fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{constant_series, series_from, single_leak_scenario};

    fn top_index(flags: &[AnomalyFlag]) -> usize {
        flags
            .iter()
            .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap())
            .map(|f| f.index)
            .unwrap()
    }

    #[test]
    fn test_single_spike_is_top_outlier() {
        let flags = AnomalyDetector::default()
            .flag_anomalies(&single_leak_scenario())
            .unwrap();

        assert_eq!(flags.len(), 48);
        assert_eq!(top_index(&flags), 10);
        assert!(flags[10].is_anomaly);
        assert_eq!(flags.iter().filter(|f| f.is_anomaly).count(), 1);
    }

    #[test]
    fn test_flags_aligned_with_series() {
        let flags = flag_anomalies(&single_leak_scenario(), 0.05).unwrap();
        for (i, flag) in flags.iter().enumerate() {
            assert_eq!(flag.index, i);
            assert!(flag.score > 0.0 && flag.score <= 1.0);
        }
    }

    #[test]
    fn test_constant_series_has_no_outliers() {
        let flags = flag_anomalies(&constant_series(48, 100.0), 0.05).unwrap();
        assert!(flags.iter().all(|f| !f.is_anomaly));
    }

    #[test]
    fn test_flagged_fraction_near_contamination() {
        let mut points: Vec<(f64, f64)> = (0..200)
            .map(|i| (80.0 + ((i * 37) % 71) as f64, 0.0))
            .collect();
        let spikes = [20, 60, 100, 140, 180];
        for (k, idx) in spikes.iter().enumerate() {
            points[*idx] = (300.0 + 10.0 * k as f64, 0.0);
        }
        let series = series_from(&points);

        let flags = AnomalyDetector::new(0.05).flag_anomalies(&series).unwrap();
        let flagged = flags.iter().filter(|f| f.is_anomaly).count();

        assert!((5..=12).contains(&flagged), "flagged {}", flagged);
        for idx in spikes {
            assert!(flags[idx].is_anomaly, "spike at {} not flagged", idx);
        }
    }

    #[test]
    fn test_insufficient_samples() {
        let err = flag_anomalies(&constant_series(9, 100.0), 0.05).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InsufficientData {
                required: MIN_SAMPLES_FOR_DETECTION,
                actual: 9
            }
        );
    }

    #[test]
    fn test_invalid_contamination() {
        let series = single_leak_scenario();
        assert!(matches!(
            flag_anomalies(&series, 0.0),
            Err(AnalyticsError::InvalidContamination(_))
        ));
        assert!(matches!(
            flag_anomalies(&series, 0.6),
            Err(AnalyticsError::InvalidContamination(_))
        ));
        assert!(matches!(
            flag_anomalies(&series, f64::NAN),
            Err(AnalyticsError::InvalidContamination(_))
        ));
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let points: Vec<(f64, f64)> = (0..60)
            .map(|i| (90.0 + ((i * 13) % 47) as f64, 0.0))
            .collect();
        let series = series_from(&points);

        let detector = AnomalyDetector::default().with_seed(7);
        assert_eq!(
            detector.flag_anomalies(&series).unwrap(),
            detector.flag_anomalies(&series).unwrap()
        );
    }

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        assert!((average_path_length(256) - 10.244).abs() < 0.01);
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&values, 0.5), 3.0);
        assert!((quantile(&values, 0.95) - 4.8).abs() < 1e-9);
    }
}
