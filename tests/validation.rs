mod common;

use auric::prelude::*;
use auric::validation::{
    block_bootstrap, deflated_sharpe, edge_stability, news_sensitivity, regime_concentration,
    risk_of_ruin_from_metrics, trade_shuffle, walk_forward,
};
use chrono::{Duration, TimeZone, Utc};
use common::*;

fn alternating(n: usize) -> Vec<f64> {
    (0..n).map(|i| if i % 2 == 0 { 20.0 } else { -10.0 }).collect()
}

#[test]
fn scenario_c_shuffles_all_survive() {
    let result = trade_shuffle(&alternating(50), 1000, 42, 15_000.0);

    assert_eq!(result.runs, 1000);
    assert_eq!(result.survival_rate, 1.0);
    //every permutation sums to the same total
    assert_eq!(result.final_return.mean, 250.0);
    assert_eq!(result.final_return.p5, 250.0);
    assert_eq!(result.drawdown_breach_rate, 0.0);
}

#[test]
fn scenario_d_single_trial_is_plain_sharpe() {
    let trades = daily_trades(&[12.0, -4.0, 8.0, 3.0, -6.0, 15.0, 2.0, -1.0]);
    let pnls: Vec<f64> = trades.iter().map(|t| t.pnl).collect();

    let metrics = PerformanceMetrics::from_trades(&trades);
    let dsr = deflated_sharpe(&pnls, 1);

    assert_eq!(dsr.deflated, metrics.sharpe_ratio);
    assert_eq!(dsr.sharpe, metrics.sharpe_ratio);
}

#[test]
fn shuffle_is_reproducible_from_seed() {
    let pnls = vec![15.0, -7.0, 3.0, -12.0, 9.0, 4.0, -2.0, 11.0, -6.0, 5.0];
    let a = trade_shuffle(&pnls, 300, 7, 20.0);
    let b = trade_shuffle(&pnls, 300, 7, 20.0);
    let c = trade_shuffle(&pnls, 300, 8, 20.0);

    assert_eq!(a, b);
    assert_ne!(a.max_drawdown, c.max_drawdown);
}

#[test]
fn bootstrap_of_losers_never_survives() {
    let result = block_bootstrap(&[-1.0, -2.0, -3.0, -4.0], 2, 100, 1, 5.0);
    assert_eq!(result.survival_rate, 0.0);
    assert!(result.drawdown_breach_rate > 0.0);
}

#[test]
fn ruin_is_certain_without_edge() {
    let metrics = PerformanceMetrics::from_trades(&daily_trades(&[10.0, -10.0, -10.0, 10.0]));
    assert_eq!(risk_of_ruin_from_metrics(&metrics, 0.02), 1.0);

    //60% winners at equal size: (0.4 / 0.6)^50
    let pnls: Vec<f64> = (0..40).map(|i| if i % 5 < 3 { 10.0 } else { -10.0 }).collect();
    let edge = PerformanceMetrics::from_trades(&daily_trades(&pnls));
    assert!(risk_of_ruin_from_metrics(&edge, 0.02) < 1e-6);

    //a positive edge from payoff alone does not beat even odds
    let payoff = PerformanceMetrics::from_trades(&daily_trades(&alternating(40)));
    assert_eq!(risk_of_ruin_from_metrics(&payoff, 0.02), 1.0);
}

#[test]
fn walk_forward_on_steady_edge_is_consistent() {
    let result = walk_forward(&alternating(60), 5);
    assert_eq!(result.folds.len(), 5);
    assert_eq!(result.consistency, 1.0);
}

#[test]
fn edge_stability_stays_in_unit_interval() {
    let pnls: Vec<f64> = (0..90)
        .map(|i| if i % 3 == 0 { -(i as f64 % 17.0) } else { 5.0 + (i % 7) as f64 })
        .collect();
    let esi = edge_stability(&pnls, 10);
    assert!(esi.index >= 0.0 && esi.index <= 1.0);
}

#[test]
fn regime_concentration_by_quarter() {
    let day = |m: u32| Utc.with_ymd_and_hms(2024, m, 10, 0, 0, 0).unwrap();
    let trades = vec![
        trade(1, 10.0, day(1)),
        trade(2, 50.0, day(2)),
        trade(3, 20.0, day(5)),
        trade(4, 40.0, day(8)),
    ];
    let result = regime_concentration(&trades);

    assert_eq!(result.best_quarter.as_deref(), Some("2024Q1"));
    assert_eq!(result.share, 0.5);

    let losing = regime_concentration(&daily_trades(&[-5.0, 2.0]));
    assert_eq!(losing.share, 1.0);
}

#[test]
fn news_driven_edge_collapses() {
    let trades = daily_trades(&[50.0, 5.0, -5.0, 5.0]);
    //first trade entered 4 hours before its exit
    let events = vec![NewsEvent::new(trades[0].entry_time + Duration::minutes(10))];

    let result = news_sensitivity(&trades, &events, 30);
    assert_eq!(result.news_trades, 1);
    assert_eq!(result.base_return, 55.0);
    assert_eq!(result.filtered_return, 5.0);
    assert!((result.collapse - 50.0 / 55.0).abs() < 1e-12);

    let far = vec![NewsEvent::new(trades[0].entry_time + Duration::hours(2))];
    assert_eq!(news_sensitivity(&trades, &far, 30).collapse, 0.0);
}

#[test]
fn report_runs_every_check() {
    let trades = daily_trades(&alternating(50));
    let events = vec![NewsEvent::new(trades[10].entry_time)];
    let config = ValidationConfig {
        mc_runs: 200,
        ..ValidationConfig::default()
    };

    let report = validate(&trades, Some(&events), &config);

    let names: Vec<&str> = report.checks.keys().map(|k| k.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "monte_carlo_survival",
            "bootstrap_survival",
            "deflated_sharpe",
            "edge_stability",
            "risk_of_ruin",
            "walk_forward_consistency",
            "regime_concentration",
            "news_sensitivity",
        ]
    );
    assert!(report.check("monte_carlo_survival").unwrap().passed);
    assert!(report.check("walk_forward_consistency").unwrap().passed);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["checks"]["risk_of_ruin"]["passed"].is_boolean());
}

#[test]
fn news_loader_sorts_events() {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,title,impact").unwrap();
    writeln!(file, "2024-03-01T13:30:00Z,NFP,high").unwrap();
    writeln!(file, "2024-02-01T19:00:00Z,FOMC,high").unwrap();

    let events = load_news_csv(file.path()).unwrap();
    assert_eq!(events[0].title.as_deref(), Some("FOMC"));
    assert_eq!(events[1].impact.as_deref(), Some("high"));
}
