use crate::config::{SimulationConfig, SizingPolicy};
use crate::instrument::Instrument;
use crate::portfolio::trade::Trade;

//running balance of one simulation
//trades are booked when their position closes and settled in exit-time order
#[derive(Debug, Clone)]
pub struct Account {
    //initial account balance
    pub initial_balance: f64,

    //balance after every settled trade
    pub balance: f64,

    //closed trades whose exit lies after the current cursor
    pending: Vec<Trade>,

    risk_per_trade_fraction: f64,
    max_position_fraction: f64,
    sizing: SizingPolicy,
}

impl Account {
    //creates a new account from the simulation settings
    pub fn new(config: &SimulationConfig) -> Self {
        Account {
            initial_balance: config.initial_balance,
            balance: config.initial_balance,
            pending: Vec::new(),
            risk_per_trade_fraction: config.risk_per_trade_fraction,
            max_position_fraction: config.max_position_fraction,
            sizing: config.sizing,
        }
    }

    //books a closed trade for settlement at its exit time
    pub fn book(&mut self, trade: Trade) {
        let at = self
            .pending
            .partition_point(|t| (t.exit_time, t.id) <= (trade.exit_time, trade.id));
        self.pending.insert(at, trade);
    }

    //applies every booked trade that exited at or before the cursor
    //returns the settled trades in exit order
    pub fn settle_until(&mut self, cursor: chrono::DateTime<chrono::Utc>) -> Vec<Trade> {
        let due = self.pending.partition_point(|t| t.exit_time <= cursor);
        let settled: Vec<Trade> = self.pending.drain(..due).collect();
        for trade in &settled {
            self.apply(trade.pnl);
        }
        settled
    }

    //applies everything still pending
    pub fn settle_all(&mut self) -> Vec<Trade> {
        let settled: Vec<Trade> = self.pending.drain(..).collect();
        for trade in &settled {
            self.apply(trade.pnl);
        }
        settled
    }

    fn apply(&mut self, pnl: f64) {
        self.balance += pnl;
    }

    //no new positions once the balance is gone
    pub fn is_exhausted(&self) -> bool {
        self.balance <= 0.0
    }

    //capital put at risk by one trade at the current balance
    pub fn risk_amount(&self) -> f64 {
        self.risk_per_trade_fraction * self.balance.max(0.0)
    }

    //size for a new position, 0 when no valid size exists
    pub fn position_size(&self, entry_price: f64, stop_loss: f64, instrument: &Instrument) -> f64 {
        let stop_distance = (entry_price - stop_loss).abs();
        if stop_distance <= 0.0 || entry_price <= 0.0 || self.is_exhausted() {
            return 0.0;
        }

        let raw = match self.sizing {
            SizingPolicy::FixedFractional => self.risk_amount() / stop_distance,
            SizingPolicy::PipRisk => {
                let risk_per_unit = instrument.price_to_pips(stop_distance) * instrument.pip_value;
                if risk_per_unit <= 0.0 {
                    return 0.0;
                }
                self.risk_amount() / risk_per_unit
            }
            SizingPolicy::FixedUnits { units } => units,
        };

        //notional cap
        let max_size = self.max_position_fraction * self.balance / entry_price;
        raw.min(max_size).max(0.0)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
