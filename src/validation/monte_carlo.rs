use crate::metrics::{max_drawdown, sharpe_ratio};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};

//how each monte carlo run reorders the trade pnl sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResampleMode {
    //a permutation of the original trades
    Shuffle,
    //contiguous blocks drawn with replacement, same total length
    Block { block_size: usize },
}

//summary of one statistic across all runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub mean: f64,
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
}

impl Distribution {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Distribution::default();
        }
        let mut data = Data::new(values.to_vec());
        Distribution {
            mean: values.mean(),
            p5: data.percentile(5),
            p50: data.percentile(50),
            p95: data.percentile(95),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub runs: usize,
    pub final_return: Distribution,
    pub sharpe: Distribution,
    pub max_drawdown: Distribution,

    //fraction of runs that finish with a positive cumulative return
    pub survival_rate: f64,

    //fraction of runs whose drawdown exceeded the configured limit
    pub drawdown_breach_rate: f64,
}

//per-run statistics
struct RunStats {
    final_return: f64,
    sharpe: f64,
    max_drawdown: f64,
}

//each run gets its own seed so results do not depend on thread scheduling
fn run_seed(seed: u64, run: usize) -> u64 {
    seed ^ (run as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

//resamples the pnl sequence `runs` times and summarizes each path
//drawdown_limit is absolute (account currency)
pub fn monte_carlo(
    pnls: &[f64],
    mode: ResampleMode,
    runs: usize,
    seed: u64,
    drawdown_limit: f64,
) -> MonteCarloResult {
    if pnls.is_empty() || runs == 0 {
        return MonteCarloResult::default();
    }

    let stats: Vec<RunStats> = (0..runs)
        .into_par_iter()
        .map(|run| {
            let mut rng = StdRng::seed_from_u64(run_seed(seed, run));
            let path = match mode {
                ResampleMode::Shuffle => shuffled(pnls, &mut rng),
                ResampleMode::Block { block_size } => block_resample(pnls, block_size, &mut rng),
            };
            RunStats {
                final_return: path.iter().sum(),
                sharpe: sharpe_ratio(&path),
                max_drawdown: max_drawdown(&path),
            }
        })
        .collect();

    let finals: Vec<f64> = stats.iter().map(|s| s.final_return).collect();
    let sharpes: Vec<f64> = stats.iter().map(|s| s.sharpe).collect();
    let drawdowns: Vec<f64> = stats.iter().map(|s| s.max_drawdown).collect();

    let survived = finals.iter().filter(|&&f| f > 0.0).count();
    let breached = drawdowns.iter().filter(|&&d| d > drawdown_limit).count();

    MonteCarloResult {
        runs,
        final_return: Distribution::from_values(&finals),
        sharpe: Distribution::from_values(&sharpes),
        max_drawdown: Distribution::from_values(&drawdowns),
        survival_rate: survived as f64 / runs as f64,
        drawdown_breach_rate: breached as f64 / runs as f64,
    }
}

//k random permutations of the trade sequence
pub fn trade_shuffle(pnls: &[f64], runs: usize, seed: u64, drawdown_limit: f64) -> MonteCarloResult {
    monte_carlo(pnls, ResampleMode::Shuffle, runs, seed, drawdown_limit)
}

//block bootstrap keeping short-range ordering between neighbouring trades
pub fn block_bootstrap(
    pnls: &[f64],
    block_size: usize,
    runs: usize,
    seed: u64,
    drawdown_limit: f64,
) -> MonteCarloResult {
    monte_carlo(
        pnls,
        ResampleMode::Block { block_size },
        runs,
        seed,
        drawdown_limit,
    )
}

fn shuffled(pnls: &[f64], rng: &mut StdRng) -> Vec<f64> {
    let mut path = pnls.to_vec();
    path.shuffle(rng);
    path
}

//block starts are uniform over every full-length window, the last block is truncated
fn block_resample(pnls: &[f64], block_size: usize, rng: &mut StdRng) -> Vec<f64> {
    let n = pnls.len();
    let block = block_size.clamp(1, n);
    let mut path = Vec::with_capacity(n);

    while path.len() < n {
        let start = rng.gen_range(0..=n - block);
        let take = block.min(n - path.len());
        path.extend_from_slice(&pnls[start..start + take]);
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffle_keeps_the_multiset() {
        let pnls = vec![1.0, -2.0, 3.0, 4.0, -5.0];
        let mut rng = StdRng::seed_from_u64(7);
        let mut path = shuffled(&pnls, &mut rng);
        path.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(path, vec![-5.0, -2.0, 1.0, 3.0, 4.0]);
    }

    #[test]
    fn blocks_are_contiguous_slices() {
        let pnls: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let path = block_resample(&pnls, 5, &mut rng);
        assert_eq!(path.len(), 20);
        for chunk in path.chunks(5) {
            for pair in chunk.windows(2) {
                assert_eq!(pair[1], pair[0] + 1.0);
            }
        }
    }

    #[test]
    fn oversized_block_is_the_whole_series() {
        let pnls = vec![1.0, 2.0, 3.0];
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(block_resample(&pnls, 10, &mut rng), pnls);
    }

    #[test]
    fn same_seed_same_distribution() {
        let pnls: Vec<f64> = (0..30).map(|i| if i % 3 == 0 { -15.0 } else { 10.0 }).collect();
        let a = block_bootstrap(&pnls, 4, 200, 99, 50.0);
        let b = block_bootstrap(&pnls, 4, 200, 99, 50.0);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let result = trade_shuffle(&[], 100, 42, 10.0);
        assert_eq!(result, MonteCarloResult::default());
    }
}
