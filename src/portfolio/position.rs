use crate::instrument::Instrument;
use crate::portfolio::trade::{ExitReason, Trade};
use crate::strategy::{Direction, Signal};
use chrono::{DateTime, Utc};

//an open position, owned by the simulator until it becomes a trade
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub id: u64,
    pub instrument: String,
    pub direction: Direction,

    //index of the entry bar in the instrument's series
    pub entry_index: usize,
    pub entry_time: DateTime<Utc>,

    //fill price after spread and slippage
    pub entry_price: f64,

    //current stop, moves only in the position's favour
    pub stop_loss: f64,
    pub take_profit: f64,

    pub size: f64,

    //atr multiple, none when trailing is off
    pub trailing_distance: Option<f64>,

    pub confidence: Option<f64>,
    pub strategy_tag: Option<String>,
}

impl Position {
    //opens a position from an accepted signal
    pub fn open(id: u64, signal: &Signal, entry_index: usize, fill_price: f64, size: f64) -> Self {
        Position {
            id,
            instrument: signal.instrument.clone(),
            direction: signal.direction,
            entry_index,
            entry_time: signal.timestamp,
            entry_price: fill_price,
            stop_loss: signal.stop_loss,
            take_profit: signal.take_profit,
            size,
            trailing_distance: signal.trailing_distance(),
            confidence: signal.confidence,
            strategy_tag: signal.strategy_tag.clone(),
        }
    }

    //recomputes the trailing stop from a bar close and the atr at that bar
    //returns true if the stop moved
    pub fn trail(&mut self, close: f64, atr: Option<f64>) -> bool {
        let (distance, atr) = match (self.trailing_distance, atr) {
            (Some(d), Some(a)) if a > 0.0 => (d, a),
            _ => return false,
        };

        let candidate = close - self.direction.sign() * distance * atr;

        let favourable = match self.direction {
            Direction::Long => candidate > self.stop_loss,
            Direction::Short => candidate < self.stop_loss,
        };

        if favourable {
            self.stop_loss = candidate;
        }
        favourable
    }

    //converts the position into an immutable trade
    pub fn close(
        self,
        exit_index: usize,
        exit_time: DateTime<Utc>,
        exit_price: f64,
        exit_reason: ExitReason,
        instrument: &Instrument,
        transaction_cost: f64,
    ) -> Trade {
        let price_diff = (exit_price - self.entry_price) * self.direction.sign();
        let costs = transaction_cost * self.size;
        let pnl = instrument.pnl_from_price_move(price_diff, self.size) - costs;

        Trade {
            id: self.id,
            instrument: self.instrument,
            direction: self.direction,
            entry_time: self.entry_time,
            exit_time,
            entry_price: self.entry_price,
            exit_price,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            size: self.size,
            pnl,
            pnl_pips: instrument.price_to_pips(price_diff),
            costs,
            exit_reason,
            duration_bars: exit_index.saturating_sub(self.entry_index),
            duration_secs: (exit_time - self.entry_time).num_seconds(),
            confidence: self.confidence,
            strategy_tag: self.strategy_tag,
        }
    }
}
