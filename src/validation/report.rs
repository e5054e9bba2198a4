use crate::config::ValidationConfig;
use crate::metrics::PerformanceMetrics;
use crate::portfolio::{pnl_series, Trade};
use crate::validation::deflated_sharpe::{deflated_sharpe, DeflatedSharpe};
use crate::validation::monte_carlo::{block_bootstrap, trade_shuffle, MonteCarloResult};
use crate::validation::news::{news_sensitivity, NewsEvent, NewsSensitivity};
use crate::validation::ruin::risk_of_ruin_from_metrics;
use crate::validation::stability::{
    edge_stability, regime_concentration, EdgeStability, RegimeConcentration,
};
use crate::validation::walk_forward::{walk_forward, WalkForwardResult};
use indexmap::IndexMap;
use prettytable::{Cell, Row, Table};
use serde::Serialize;
use tracing::info;

//score of one robustness check against its threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CheckResult {
    pub score: f64,
    pub threshold: f64,
    pub passed: bool,
}

impl CheckResult {
    pub fn at_least(score: f64, threshold: f64) -> Self {
        CheckResult {
            score,
            threshold,
            passed: score >= threshold,
        }
    }

    pub fn at_most(score: f64, threshold: f64) -> Self {
        CheckResult {
            score,
            threshold,
            passed: score <= threshold,
        }
    }
}

//everything the validator measured; it reports and never alters the trades
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub metrics: PerformanceMetrics,
    pub monte_carlo: MonteCarloResult,
    pub bootstrap: MonteCarloResult,
    pub deflated_sharpe: DeflatedSharpe,
    pub edge_stability: EdgeStability,
    pub risk_of_ruin: f64,
    pub walk_forward: WalkForwardResult,
    pub regime_concentration: RegimeConcentration,
    pub news: Option<NewsSensitivity>,
    pub checks: IndexMap<String, CheckResult>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.checks.values().all(|c| c.passed)
    }

    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.get(name)
    }

    pub fn pretty_print_table(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("Check"),
            Cell::new("Score"),
            Cell::new("Threshold"),
            Cell::new("Result"),
        ]));

        for (name, check) in &self.checks {
            table.add_row(Row::new(vec![
                Cell::new(name),
                Cell::new(&format!("{:.4}", check.score)),
                Cell::new(&format!("{:.4}", check.threshold)),
                Cell::new(if check.passed { "PASS" } else { "FAIL" }),
            ]));
        }

        table.printstd();
    }
}

//runs every robustness check over a chronological trade list
//news checks are skipped when no feed is given
pub fn validate(
    trades: &[Trade],
    news: Option<&[NewsEvent]>,
    config: &ValidationConfig,
) -> ValidationReport {
    let pnls = pnl_series(trades);
    let metrics = PerformanceMetrics::from_trades(trades);
    let thresholds = &config.thresholds;
    let drawdown_limit = config.max_drawdown_limit_fraction * config.initial_capital;

    let monte_carlo = trade_shuffle(&pnls, config.mc_runs, config.seed, drawdown_limit);
    let bootstrap = block_bootstrap(
        &pnls,
        config.mc_block_size,
        config.mc_runs,
        config.seed,
        drawdown_limit,
    );
    let deflated = deflated_sharpe(&pnls, config.deflation_n_trials);
    let stability = edge_stability(&pnls, config.regime_window);
    let ruin = risk_of_ruin_from_metrics(&metrics, config.risk_per_trade_fraction);
    let wf = walk_forward(&pnls, config.walk_forward_folds);
    let concentration = regime_concentration(trades);
    let news = news.map(|events| news_sensitivity(trades, events, config.news_window_minutes));

    let mut checks = IndexMap::new();
    checks.insert(
        "monte_carlo_survival".to_string(),
        CheckResult::at_least(monte_carlo.survival_rate, thresholds.min_mc_survival_rate),
    );
    checks.insert(
        "bootstrap_survival".to_string(),
        CheckResult::at_least(bootstrap.survival_rate, thresholds.min_bootstrap_survival_rate),
    );
    checks.insert(
        "deflated_sharpe".to_string(),
        CheckResult::at_least(deflated.deflated, thresholds.min_deflated_sharpe),
    );
    checks.insert(
        "edge_stability".to_string(),
        CheckResult::at_least(stability.index, thresholds.min_edge_stability),
    );
    checks.insert(
        "risk_of_ruin".to_string(),
        CheckResult::at_most(ruin, thresholds.max_risk_of_ruin),
    );
    checks.insert(
        "walk_forward_consistency".to_string(),
        CheckResult::at_least(wf.consistency, thresholds.min_walk_forward_consistency),
    );
    checks.insert(
        "regime_concentration".to_string(),
        CheckResult::at_most(concentration.share, thresholds.max_regime_concentration),
    );
    if let Some(sensitivity) = &news {
        checks.insert(
            "news_sensitivity".to_string(),
            CheckResult::at_most(sensitivity.collapse, thresholds.max_news_collapse),
        );
    }

    let report = ValidationReport {
        metrics,
        monte_carlo,
        bootstrap,
        deflated_sharpe: deflated,
        edge_stability: stability,
        risk_of_ruin: ruin,
        walk_forward: wf,
        regime_concentration: concentration,
        news,
        checks,
    };

    info!(
        trades = trades.len(),
        passed = report.passed(),
        failed = report.checks.values().filter(|c| !c.passed).count(),
        "validation finished"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_directions() {
        assert!(CheckResult::at_least(0.96, 0.95).passed);
        assert!(!CheckResult::at_least(0.90, 0.95).passed);
        assert!(CheckResult::at_most(0.005, 0.01).passed);
        assert!(!CheckResult::at_most(0.5, 0.01).passed);
    }

    #[test]
    fn empty_trade_list_reports_without_panicking() {
        let report = validate(&[], None, &ValidationConfig::default());
        assert_eq!(report.metrics.total_trades, 0);
        assert_eq!(report.monte_carlo.survival_rate, 0.0);
        assert_eq!(report.risk_of_ruin, 1.0);
        assert!(report.check("news_sensitivity").is_none());
        assert!(!report.passed());
    }
}
