use crate::strategy::Direction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//why a position was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    Timeout,
    EndOfData,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::StopLoss => "StopLoss",
            ExitReason::TakeProfit => "TakeProfit",
            ExitReason::Timeout => "Timeout",
            ExitReason::EndOfData => "EndOfData",
        }
    }
}

//a closed position, never mutated after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: u64,
    pub instrument: String,
    pub direction: Direction,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,

    //fill price after spread and slippage
    pub entry_price: f64,
    pub exit_price: f64,

    //stop level in force when the position closed (after trailing)
    pub stop_loss: f64,
    pub take_profit: f64,

    pub size: f64,

    //realized pnl in account currency, net of costs
    pub pnl: f64,
    pub pnl_pips: f64,
    pub costs: f64,

    pub exit_reason: ExitReason,
    pub duration_bars: usize,
    pub duration_secs: i64,

    pub confidence: Option<f64>,
    pub strategy_tag: Option<String>,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn is_loss(&self) -> bool {
        self.pnl < 0.0
    }

    //the level that must equal exit_price for this exit reason
    pub fn expected_exit_level(&self) -> Option<f64> {
        match self.exit_reason {
            ExitReason::StopLoss => Some(self.stop_loss),
            ExitReason::TakeProfit => Some(self.take_profit),
            ExitReason::Timeout | ExitReason::EndOfData => None,
        }
    }
}

//extracts the pnl series in chronological order
pub fn pnl_series(trades: &[Trade]) -> Vec<f64> {
    trades.iter().map(|t| t.pnl).collect()
}
