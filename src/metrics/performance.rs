use crate::metrics::timeseries::max_drawdown;
use crate::portfolio::Trade;
use indexmap::IndexMap;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//performance metrics derived from a closed trade list
//an empty list yields the all-zero default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,

    //percent, 0-100
    pub win_rate: f64,

    pub gross_profit: f64,
    //positive magnitude
    pub gross_loss: f64,
    pub total_return: f64,

    //+inf when there are wins and no losses, written as "inf" in json
    #[serde(with = "unbounded")]
    pub profit_factor: f64,

    pub avg_win: f64,
    //positive magnitude
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub expectancy: f64,

    //per-trade, not annualized
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,

    //absolute, on the cumulative pnl curve
    pub max_drawdown: f64,

    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,

    pub avg_duration_bars: f64,
    pub exit_reasons: IndexMap<String, usize>,
}

//json has no infinity, so non-finite ratios travel as text
mod unbounded {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Ratio {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let ratio = if value.is_finite() {
            Ratio::Number(*value)
        } else {
            Ratio::Text(value.to_string())
        };
        ratio.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Ratio::deserialize(deserializer)? {
            Ratio::Number(value) => Ok(value),
            Ratio::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

impl PerformanceMetrics {
    //calculate metrics from trades in the order they occurred
    pub fn from_trades(trades: &[Trade]) -> Self {
        if trades.is_empty() {
            return PerformanceMetrics::default();
        }

        let pnls: Vec<f64> = trades.iter().map(|t| t.pnl).collect();

        let wins: Vec<f64> = pnls.iter().filter(|p| **p > 0.0).copied().collect();
        let losses: Vec<f64> = pnls.iter().filter(|p| **p < 0.0).copied().collect();

        let total = trades.len();
        let gross_profit: f64 = wins.iter().sum();
        let gross_loss: f64 = losses.iter().sum::<f64>().abs();
        let total_return: f64 = pnls.iter().sum();

        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_win = if wins.is_empty() {
            0.0
        } else {
            gross_profit / wins.len() as f64
        };

        let avg_loss = if losses.is_empty() {
            0.0
        } else {
            gross_loss / losses.len() as f64
        };

        let max_dd = max_drawdown(&pnls);
        let calmar = if max_dd > 0.0 {
            total_return / max_dd
        } else {
            0.0
        };

        let (max_consecutive_wins, max_consecutive_losses) = streaks(&pnls);

        let mut exit_reasons = IndexMap::new();
        for trade in trades {
            *exit_reasons
                .entry(trade.exit_reason.as_str().to_string())
                .or_insert(0) += 1;
        }

        PerformanceMetrics {
            total_trades: total,
            winning_trades: wins.len(),
            losing_trades: losses.len(),
            win_rate: wins.len() as f64 / total as f64 * 100.0,
            gross_profit,
            gross_loss,
            total_return,
            profit_factor,
            avg_win,
            avg_loss,
            largest_win: wins.iter().fold(0.0f64, |a, &b| a.max(b)),
            largest_loss: losses.iter().fold(0.0f64, |a, &b| a.min(b)),
            expectancy: total_return / total as f64,
            sharpe_ratio: sharpe_ratio(&pnls),
            sortino_ratio: sortino_ratio(&pnls),
            calmar_ratio: calmar,
            max_drawdown: max_dd,
            max_consecutive_wins,
            max_consecutive_losses,
            avg_duration_bars: trades.iter().map(|t| t.duration_bars as f64).sum::<f64>()
                / total as f64,
            exit_reasons,
        }
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        let rows: Vec<(&str, String)> = vec![
            ("Number of Trades", format!("{}", self.total_trades)),
            (
                "Wins / Losses",
                format!("{} / {}", self.winning_trades, self.losing_trades),
            ),
            ("Win Rate", format!("{:.2}%", self.win_rate)),
            ("Total Return", format!("{:.2}", self.total_return)),
            ("Gross Profit", format!("{:.2}", self.gross_profit)),
            ("Gross Loss", format!("{:.2}", self.gross_loss)),
            ("Profit Factor", format!("{:.3}", self.profit_factor)),
            ("Avg Win", format!("{:.2}", self.avg_win)),
            ("Avg Loss", format!("{:.2}", self.avg_loss)),
            ("Largest Win", format!("{:.2}", self.largest_win)),
            ("Largest Loss", format!("{:.2}", self.largest_loss)),
            ("Expectancy", format!("{:.2}", self.expectancy)),
            ("Sharpe Ratio", format!("{:.3}", self.sharpe_ratio)),
            ("Sortino Ratio", format!("{:.3}", self.sortino_ratio)),
            ("Calmar Ratio", format!("{:.3}", self.calmar_ratio)),
            ("Max Drawdown", format!("{:.2}", self.max_drawdown)),
            (
                "Max Consecutive Wins",
                format!("{}", self.max_consecutive_wins),
            ),
            (
                "Max Consecutive Losses",
                format!("{}", self.max_consecutive_losses),
            ),
            ("Avg Duration (bars)", format!("{:.1}", self.avg_duration_bars)),
        ];

        for (name, value) in rows {
            table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
        }

        for (reason, count) in &self.exit_reasons {
            table.add_row(Row::new(vec![
                Cell::new(&format!("Exits: {}", reason)),
                Cell::new(&format!("{}", count)),
            ]));
        }

        table.printstd();
    }
}

//mean / sample stdev of per-trade pnl, 0 with fewer than 2 trades or no dispersion
pub fn sharpe_ratio(pnls: &[f64]) -> f64 {
    if pnls.len() < 2 {
        return 0.0;
    }

    let mean = pnls.mean();
    let std_dev = pnls.std_dev();

    if !std_dev.is_finite() || std_dev == 0.0 {
        return 0.0;
    }

    mean / std_dev
}

//mean / stdev of the losing subset, 0 without enough losing trades
pub fn sortino_ratio(pnls: &[f64]) -> f64 {
    if pnls.is_empty() {
        return 0.0;
    }

    let negative: Vec<f64> = pnls.iter().filter(|&&p| p < 0.0).copied().collect();
    if negative.len() < 2 {
        return 0.0;
    }

    let downside_dev = negative.as_slice().std_dev();
    if !downside_dev.is_finite() || downside_dev == 0.0 {
        return 0.0;
    }

    pnls.mean() / downside_dev
}

//longest runs of winning and losing trades, a flat trade breaks both
fn streaks(pnls: &[f64]) -> (usize, usize) {
    let (mut max_wins, mut max_losses) = (0, 0);
    let (mut wins, mut losses) = (0, 0);

    for &pnl in pnls {
        if pnl > 0.0 {
            wins += 1;
            losses = 0;
        } else if pnl < 0.0 {
            losses += 1;
            wins = 0;
        } else {
            wins = 0;
            losses = 0;
        }
        max_wins = max_wins.max(wins);
        max_losses = max_losses.max(losses);
    }

    (max_wins, max_losses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaks_in_order() {
        assert_eq!(streaks(&[1.0, 1.0, -1.0, 1.0, 1.0, 1.0, -1.0, -1.0]), (3, 2));
        assert_eq!(streaks(&[1.0, 0.0, 1.0]), (1, 0));
    }

    #[test]
    fn sharpe_needs_two_trades_and_dispersion() {
        assert_eq!(sharpe_ratio(&[5.0]), 0.0);
        assert_eq!(sharpe_ratio(&[5.0, 5.0, 5.0]), 0.0);

        //mean 1, sample stdev sqrt(8)
        let s = sharpe_ratio(&[-1.0, 3.0]);
        assert!((s - 1.0 / 8.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn sortino_zero_without_losses() {
        assert_eq!(sortino_ratio(&[1.0, 2.0, 3.0]), 0.0);
        let s = sortino_ratio(&[10.0, -1.0, -3.0]);
        //mean 2, losing subset stdev sqrt(2)
        assert!((s - 2.0 / 2.0_f64.sqrt()).abs() < 1e-12);
    }
}
