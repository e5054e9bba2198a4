use crate::config::SimulationConfig;
use crate::data::indicators::ATR;
use crate::data::{InstrumentData, MarketData};
use crate::engine::error::{RejectReason, RejectedSignal};
use crate::engine::execution::{entry_fill_price, level_exit, HoldLimit};
use crate::metrics::{calculate_pnl_curve, PerformanceMetrics, PnlPoint};
use crate::portfolio::{Account, ExitReason, Position, Trade};
use crate::strategy::{Direction, Signal};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

//result of a simulation
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub summary: PerformanceMetrics,
    pub pnl_curve: Vec<PnlPoint>,

    //closed trades in exit order
    pub trades: Vec<Trade>,
    pub rejected: Vec<RejectedSignal>,

    pub initial_balance: f64,
    pub final_balance: f64,

    //balance hit zero and later signals were refused
    pub capital_exhausted: bool,
}

//walks signals forward through the bars, one open position per instrument
pub struct PositionSimulator<'a> {
    config: SimulationConfig,
    market: &'a MarketData,
}

impl<'a> PositionSimulator<'a> {
    //creates a new simulator over shared market data
    pub fn new(config: SimulationConfig, market: &'a MarketData) -> Self {
        PositionSimulator { config, market }
    }

    //runs the simulation over a time-ordered signal stream
    pub fn run<I>(&self, signals: I) -> BacktestResult
    where
        I: IntoIterator<Item = Signal>,
    {
        let mut account = Account::new(&self.config);
        let mut busy_until: HashMap<String, DateTime<Utc>> = HashMap::new();
        let mut cursor: Option<DateTime<Utc>> = None;
        let mut trades = Vec::new();
        let mut rejected = Vec::new();
        let mut capital_exhausted = false;
        let mut next_id = 1;

        for signal in signals {
            if let Some(at) = cursor {
                if signal.timestamp < at {
                    reject(&mut rejected, signal, RejectReason::BehindCursor(at));
                    continue;
                }
            }
            cursor = Some(signal.timestamp);

            //realize everything that closed up to now before sizing
            trades.extend(account.settle_until(signal.timestamp));

            if account.is_exhausted() {
                capital_exhausted = true;
                reject(&mut rejected, signal, RejectReason::ExhaustedCapital);
                continue;
            }

            match self.open(&signal, &account, &busy_until, next_id) {
                Ok((position, data)) => {
                    next_id += 1;
                    let trade = self.walk(position, data);
                    busy_until.insert(trade.instrument.clone(), trade.exit_time);
                    account.book(trade);
                }
                Err(reason) => reject(&mut rejected, signal, reason),
            }
        }

        trades.extend(account.settle_all());
        if account.is_exhausted() {
            capital_exhausted = true;
        }

        info!(
            trades = trades.len(),
            rejected = rejected.len(),
            final_balance = account.balance,
            "simulation finished"
        );

        BacktestResult {
            summary: PerformanceMetrics::from_trades(&trades),
            pnl_curve: calculate_pnl_curve(&trades),
            trades,
            rejected,
            initial_balance: account.initial_balance,
            final_balance: account.balance,
            capital_exhausted,
        }
    }

    //flat -> open transition, or the reason the signal is dropped
    fn open(
        &self,
        signal: &Signal,
        account: &Account,
        busy_until: &HashMap<String, DateTime<Utc>>,
        id: u64,
    ) -> Result<(Position, &'a InstrumentData), RejectReason> {
        signal.validate()?;

        let data = self
            .market
            .get(&signal.instrument)
            .ok_or(RejectReason::UnknownInstrument)?;

        if let Some(&until) = busy_until.get(&signal.instrument) {
            if signal.timestamp < until {
                return Err(RejectReason::PositionOpen(until));
            }
        }

        let entry_index = data
            .series
            .index_of(signal.timestamp)
            .ok_or(RejectReason::UnknownTimestamp(signal.timestamp))?;

        if entry_index + 1 >= data.series.len() {
            return Err(RejectReason::NoBarsAfterEntry);
        }

        let fill = entry_fill_price(signal, &data.instrument, self.config.slippage);

        //spread and slippage can push the fill through a tight level
        let ordered = match signal.direction {
            Direction::Long => signal.stop_loss < fill && fill < signal.take_profit,
            Direction::Short => signal.take_profit < fill && fill < signal.stop_loss,
        };
        if !ordered {
            return Err(RejectReason::FillBeyondLevels(fill));
        }

        let size = account.position_size(fill, signal.stop_loss, &data.instrument);
        if size <= 0.0 {
            return Err(RejectReason::ZeroSize);
        }

        debug!(
            instrument = %signal.instrument,
            direction = ?signal.direction,
            entry = fill,
            size,
            "position opened"
        );

        Ok((Position::open(id, signal, entry_index, fill, size), data))
    }

    //open -> flat: steps bar by bar until an exit fires or the data ends
    fn walk(&self, mut position: Position, data: &InstrumentData) -> Trade {
        let bars = data.series.bars();
        let limit = HoldLimit {
            max_bars: self.config.max_hold_bars,
            max_secs: self.config.max_hold_duration_secs,
        };

        for (i, bar) in bars.iter().enumerate().skip(position.entry_index + 1) {
            //exits are checked against the stop in force before this bar
            if let Some((reason, price)) =
                level_exit(&position, bar, self.config.intrabar_priority)
            {
                return self.close(position, data, i, bar.timestamp, price, reason);
            }

            if limit.expired(&position, i, bar) {
                return self.close(position, data, i, bar.timestamp, bar.close, ExitReason::Timeout);
            }

            position.trail(bar.close, data.indicators.value(ATR, i));
        }

        //open() guarantees at least one bar after entry
        let last = bars.len() - 1;
        let bar = &bars[last];
        self.close(position, data, last, bar.timestamp, bar.close, ExitReason::EndOfData)
    }

    fn close(
        &self,
        position: Position,
        data: &InstrumentData,
        index: usize,
        time: DateTime<Utc>,
        price: f64,
        reason: ExitReason,
    ) -> Trade {
        let trade = position.close(
            index,
            time,
            price,
            reason,
            &data.instrument,
            self.config.transaction_cost,
        );
        debug!(
            instrument = %trade.instrument,
            reason = trade.exit_reason.as_str(),
            exit = trade.exit_price,
            pnl = trade.pnl,
            "position closed"
        );
        trade
    }
}

fn reject(rejected: &mut Vec<RejectedSignal>, signal: Signal, reason: RejectReason) {
    warn!(
        instrument = %signal.instrument,
        timestamp = %signal.timestamp,
        label = reason.label(),
        %reason,
        "signal dropped"
    );
    rejected.push(RejectedSignal { signal, reason });
}

//runs one simulation
pub fn simulate<I>(market: &MarketData, signals: I, config: &SimulationConfig) -> BacktestResult
where
    I: IntoIterator<Item = Signal>,
{
    PositionSimulator::new(config.clone(), market).run(signals)
}
