mod common;

use auric::prelude::*;
use common::*;

#[test]
fn scenario_b_all_winners() {
    let trades = daily_trades(&[10.0; 100]);
    let metrics = PerformanceMetrics::from_trades(&trades);

    assert_eq!(metrics.total_trades, 100);
    assert_eq!(metrics.win_rate, 100.0);
    assert_eq!(metrics.profit_factor, f64::INFINITY);
    assert_eq!(metrics.max_drawdown, 0.0);
    assert_eq!(metrics.total_return, 1000.0);
    assert_eq!(metrics.sharpe_ratio, 0.0);
    assert_eq!(metrics.sortino_ratio, 0.0);
    assert_eq!(metrics.calmar_ratio, 0.0);
    assert_eq!(metrics.max_consecutive_wins, 100);
}

#[test]
fn infinite_profit_factor_survives_json() {
    let metrics = PerformanceMetrics::from_trades(&daily_trades(&[10.0, 5.0]));
    let json = serde_json::to_value(&metrics).unwrap();
    assert_eq!(json["profit_factor"], "inf");

    let restored: PerformanceMetrics = serde_json::from_value(json).unwrap();
    assert_eq!(restored.profit_factor, f64::INFINITY);
    assert_eq!(restored, metrics);

    let finite = PerformanceMetrics::from_trades(&daily_trades(&[10.0, -5.0]));
    let json = serde_json::to_value(&finite).unwrap();
    assert_eq!(json["profit_factor"], 2.0);
}

#[test]
fn mixed_sequence() {
    let trades = daily_trades(&[10.0, -5.0, 20.0, -10.0, -5.0, 15.0]);
    let metrics = PerformanceMetrics::from_trades(&trades);

    assert_eq!(metrics.winning_trades, 3);
    assert_eq!(metrics.losing_trades, 3);
    assert_eq!(metrics.win_rate, 50.0);
    assert_eq!(metrics.gross_profit, 45.0);
    assert_eq!(metrics.gross_loss, 20.0);
    assert_eq!(metrics.profit_factor, 2.25);
    assert_eq!(metrics.avg_win, 15.0);
    assert_eq!(metrics.largest_win, 20.0);
    assert_eq!(metrics.largest_loss, -10.0);

    //cumulative 10, 5, 25, 15, 10, 25
    assert_eq!(metrics.max_drawdown, 15.0);
    assert!((metrics.calmar_ratio - 25.0 / 15.0).abs() < 1e-12);
    assert_eq!(metrics.max_consecutive_wins, 1);
    assert_eq!(metrics.max_consecutive_losses, 2);
    assert_eq!(metrics.exit_reasons["TakeProfit"], 3);
    assert_eq!(metrics.exit_reasons["StopLoss"], 3);
}

#[test]
fn all_losers_have_zero_profit_factor() {
    let metrics = PerformanceMetrics::from_trades(&daily_trades(&[-1.0, -2.0]));
    assert_eq!(metrics.profit_factor, 0.0);
    assert_eq!(metrics.win_rate, 0.0);
    assert_eq!(metrics.max_drawdown, 3.0);
}

#[test]
fn empty_trades_give_zero_metrics() {
    let metrics = PerformanceMetrics::from_trades(&[]);
    assert_eq!(metrics, PerformanceMetrics::default());
    assert_eq!(metrics.win_rate, 0.0);
    assert_eq!(metrics.profit_factor, 0.0);
}

#[test]
fn metrics_survive_csv_round_trip() {
    let mut trades = daily_trades(&[12.5, -3.25, 7.125, -9.0, 0.1, 44.4]);
    trades[0].confidence = Some(72.0);
    trades[1].strategy_tag = Some("breakout".to_string());

    let file = tempfile::NamedTempFile::new().unwrap();
    save_trades_csv(&trades, file.path()).unwrap();
    let loaded = load_trades_csv(file.path()).unwrap();

    assert_eq!(loaded, trades);
    assert_eq!(
        PerformanceMetrics::from_trades(&loaded),
        PerformanceMetrics::from_trades(&trades)
    );
}

#[test]
fn metrics_survive_json_round_trip() {
    let trades = daily_trades(&[1.5, -0.5, 2.25]);
    let json = serde_json::to_string(&trades).unwrap();
    let loaded: Vec<Trade> = serde_json::from_str(&json).unwrap();
    assert_eq!(
        PerformanceMetrics::from_trades(&loaded),
        PerformanceMetrics::from_trades(&trades)
    );
}

#[test]
fn pnl_curve_tracks_drawdown() {
    let trades = daily_trades(&[10.0, -4.0, -4.0, 12.0]);
    let curve = calculate_pnl_curve(&trades);

    let cumulative: Vec<f64> = curve.iter().map(|p| p.cumulative_pnl).collect();
    let drawdown: Vec<f64> = curve.iter().map(|p| p.drawdown).collect();
    assert_eq!(cumulative, vec![10.0, 6.0, 2.0, 14.0]);
    assert_eq!(drawdown, vec![0.0, 4.0, 8.0, 0.0]);
    assert_eq!(curve[3].timestamp, trades[3].exit_time);
}
