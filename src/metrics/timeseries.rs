use crate::portfolio::Trade;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//a point on the cumulative pnl curve, one per closed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlPoint {
    pub timestamp: DateTime<Utc>,
    pub pnl: f64,
    pub cumulative_pnl: f64,
    pub drawdown: f64,
}

impl PnlPoint {
    pub fn new(timestamp: DateTime<Utc>, pnl: f64, cumulative_pnl: f64, drawdown: f64) -> Self {
        PnlPoint {
            timestamp,
            pnl,
            cumulative_pnl,
            drawdown,
        }
    }
}

//builds the cumulative pnl curve with absolute drawdown from the running peak
//the curve starts at 0 so an opening loss counts as drawdown
pub fn calculate_pnl_curve(trades: &[Trade]) -> Vec<PnlPoint> {
    let mut curve = Vec::with_capacity(trades.len());
    let mut peak = 0.0_f64;
    let mut cumulative = 0.0;

    for trade in trades {
        cumulative += trade.pnl;
        peak = peak.max(cumulative);
        curve.push(PnlPoint::new(
            trade.exit_time,
            trade.pnl,
            cumulative,
            peak - cumulative,
        ));
    }

    curve
}

//largest peak-to-trough decline of the cumulative pnl, tracked from a 0 start
pub fn max_drawdown(pnls: &[f64]) -> f64 {
    let mut peak = 0.0_f64;
    let mut cumulative = 0.0;
    let mut max_dd = 0.0_f64;

    for pnl in pnls {
        cumulative += pnl;
        peak = peak.max(cumulative);
        max_dd = max_dd.max(peak - cumulative);
    }

    max_dd
}
