use crate::metrics::sharpe_ratio;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

//sharpe ratio corrected for the number of strategy variants tried
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeflatedSharpe {
    //per-trade sharpe of the observed sequence
    pub sharpe: f64,
    pub deflated: f64,
    pub std_error: f64,

    //sample skewness and (non-excess) kurtosis of trade pnl
    pub skewness: f64,
    pub kurtosis: f64,

    //sharpe a best-of-n search would reach by luck, sqrt(2 ln n) * se
    pub expected_max: f64,

    //probability the true sharpe exceeds expected_max
    pub probability: f64,

    pub n_trials: usize,
    pub n_trades: usize,
}

//third and fourth standardized moments, (0, 3) when undefined
fn moments(pnls: &[f64]) -> (f64, f64) {
    let n = pnls.len() as f64;
    let mean = pnls.mean();
    let var = pnls.population_variance();
    if pnls.len() < 2 || !var.is_finite() || var == 0.0 {
        return (0.0, 3.0);
    }

    let m3 = pnls.iter().map(|p| (p - mean).powi(3)).sum::<f64>() / n;
    let m4 = pnls.iter().map(|p| (p - mean).powi(4)).sum::<f64>() / n;

    (m3 / var.powf(1.5), m4 / (var * var))
}

//sr - sqrt(2 ln n_trials) * se(sr), exact sr for a single trial
pub fn deflated_sharpe(pnls: &[f64], n_trials: usize) -> DeflatedSharpe {
    let sharpe = sharpe_ratio(pnls);
    let n_trials = n_trials.max(1);

    if pnls.len() < 2 {
        return DeflatedSharpe {
            sharpe,
            deflated: sharpe,
            kurtosis: 3.0,
            n_trials,
            n_trades: pnls.len(),
            ..DeflatedSharpe::default()
        };
    }

    let (skewness, kurtosis) = moments(pnls);
    let n = pnls.len() as f64;

    let variance =
        (1.0 - skewness * sharpe + (kurtosis - 1.0) / 4.0 * sharpe * sharpe) / (n - 1.0);
    let std_error = variance.max(0.0).sqrt();

    let expected_max = if n_trials > 1 {
        (2.0 * (n_trials as f64).ln()).sqrt() * std_error
    } else {
        0.0
    };

    let probability = if std_error > 0.0 {
        Normal::new(0.0, 1.0)
            .map(|normal| normal.cdf((sharpe - expected_max) / std_error))
            .unwrap_or(0.0)
    } else if sharpe > expected_max {
        1.0
    } else {
        0.0
    };

    DeflatedSharpe {
        sharpe,
        deflated: sharpe - expected_max,
        std_error,
        skewness,
        kurtosis,
        expected_max,
        probability,
        n_trials,
        n_trades: pnls.len(),
    }
}
