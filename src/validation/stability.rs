use crate::metrics::sharpe_ratio;
use crate::portfolio::Trade;
use chrono::Datelike;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};

//volatility regime of a trade, from the rolling stdev of recent trade pnl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatilityRegime {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeStability {
    //1 / (1 + cv of regime sharpes), 0 with fewer than two usable regimes
    pub index: f64,
    pub regime_sharpes: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeConcentration {
    //best quarter pnl / total pnl, 1.0 when total pnl is not positive
    pub share: f64,
    pub best_quarter: Option<String>,
    pub quarterly_pnl: IndexMap<String, f64>,
}

//trailing-window stdev of pnl, the window expands over the first trades
pub fn rolling_volatility(pnls: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(2);
    (0..pnls.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &pnls[start..=i];
            if slice.len() < 2 {
                0.0
            } else {
                slice.std_dev()
            }
        })
        .collect()
}

//tercile labels of each trade's rolling volatility
pub fn volatility_regimes(pnls: &[f64], window: usize) -> Vec<VolatilityRegime> {
    let vols = rolling_volatility(pnls, window);
    if vols.is_empty() {
        return Vec::new();
    }

    let mut data = Data::new(vols.clone());
    let low_cut = data.quantile(1.0 / 3.0);
    let high_cut = data.quantile(2.0 / 3.0);

    vols.iter()
        .map(|&v| {
            if v <= low_cut {
                VolatilityRegime::Low
            } else if v <= high_cut {
                VolatilityRegime::Medium
            } else {
                VolatilityRegime::High
            }
        })
        .collect()
}

//edge stability index over rolling-volatility terciles
pub fn edge_stability(pnls: &[f64], window: usize) -> EdgeStability {
    let regimes = volatility_regimes(pnls, window);
    let labels: Vec<&str> = regimes
        .iter()
        .map(|r| match r {
            VolatilityRegime::Low => "low",
            VolatilityRegime::Medium => "medium",
            VolatilityRegime::High => "high",
        })
        .collect();
    edge_stability_by_label(pnls, &labels)
}

//edge stability index over caller-supplied regime labels (one per trade)
pub fn edge_stability_by_label(pnls: &[f64], labels: &[&str]) -> EdgeStability {
    let mut grouped: IndexMap<String, Vec<f64>> = IndexMap::new();
    for (&pnl, &label) in pnls.iter().zip(labels) {
        grouped.entry(label.to_string()).or_default().push(pnl);
    }

    //a regime with a single trade has no sharpe
    let regime_sharpes: IndexMap<String, f64> = grouped
        .into_iter()
        .filter(|(_, values)| values.len() >= 2)
        .map(|(label, values)| (label, sharpe_ratio(&values)))
        .collect();

    if regime_sharpes.len() < 2 {
        return EdgeStability {
            index: 0.0,
            regime_sharpes,
        };
    }

    let sharpes: Vec<f64> = regime_sharpes.values().copied().collect();
    let mean = sharpes.as_slice().mean();
    let std = sharpes.as_slice().population_std_dev();

    let index = if mean.abs() > f64::EPSILON {
        1.0 / (1.0 + std / mean.abs())
    } else {
        0.0
    };

    EdgeStability {
        index,
        regime_sharpes,
    }
}

fn quarter_key(trade: &Trade) -> String {
    let t = trade.exit_time;
    format!("{}Q{}", t.year(), (t.month() - 1) / 3 + 1)
}

//share of total pnl coming from the single best calendar quarter (by exit time)
pub fn regime_concentration(trades: &[Trade]) -> RegimeConcentration {
    let mut quarterly_pnl: IndexMap<String, f64> = IndexMap::new();
    for trade in trades {
        *quarterly_pnl.entry(quarter_key(trade)).or_insert(0.0) += trade.pnl;
    }

    let total: f64 = quarterly_pnl.values().sum();
    let best = quarterly_pnl
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(k, v)| (k.clone(), *v));

    let share = match &best {
        Some((_, pnl)) if total > 0.0 => pnl / total,
        _ => 1.0,
    };

    RegimeConcentration {
        share,
        best_quarter: best.map(|(k, _)| k),
        quarterly_pnl,
    }
}
